//! Primitive types for 2D rendering

use serde::{Deserialize, Serialize};

/// A length either relative to the viewport or in pixels
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Length {
    /// Percentage of the panel (the simulation's 0-100 space)
    Percent(f32),
    Px(f32),
}

/// RGB color
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rgb(pub u8, pub u8, pub u8);

/// How a shape is filled or stroked
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Paint {
    None,
    Solid(Rgb),
    /// Reference to a gradient definition
    Gradient(Gradient),
}

/// Gradients defined once per document
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Gradient {
    RadarGlow,
    MissileTrail,
}

impl Gradient {
    pub fn id(self) -> &'static str {
        match self {
            Gradient::RadarGlow => "radarGlow",
            Gradient::MissileTrail => "missileTrail",
        }
    }
}

/// Shared drawing attributes
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Style {
    pub fill: Paint,
    pub stroke: Paint,
    pub stroke_width: f32,
    pub opacity: f32,
    /// Animation class (dropped under reduced motion)
    pub class: Option<&'static str>,
}

impl Style {
    pub const fn fill(color: Rgb) -> Self {
        Self {
            fill: Paint::Solid(color),
            stroke: Paint::None,
            stroke_width: 0.0,
            opacity: 1.0,
            class: None,
        }
    }

    pub const fn stroke(paint: Paint, width: f32) -> Self {
        Self {
            fill: Paint::None,
            stroke: paint,
            stroke_width: width,
            opacity: 1.0,
            class: None,
        }
    }

    pub const fn with_opacity(mut self, opacity: f32) -> Self {
        self.opacity = opacity;
        self
    }

    pub const fn with_class(mut self, class: &'static str) -> Self {
        self.class = Some(class);
        self
    }
}

/// One drawable element
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Primitive {
    Circle {
        cx: Length,
        cy: Length,
        r: Length,
        style: Style,
    },
    Line {
        x1: Length,
        y1: Length,
        x2: Length,
        y2: Length,
        style: Style,
    },
    Text {
        x: Length,
        y: Length,
        text: &'static str,
        font_size: f32,
        color: Rgb,
    },
}

impl Primitive {
    pub fn style_mut(&mut self) -> Option<&mut Style> {
        match self {
            Primitive::Circle { style, .. } | Primitive::Line { style, .. } => Some(style),
            Primitive::Text { .. } => None,
        }
    }
}

/// Colors for panel elements
pub mod colors {
    use super::Rgb;

    pub const PRIMARY: Rgb = Rgb(74, 92, 58);
    pub const THREAT: Rgb = Rgb(234, 56, 76);
    pub const MISSILE: Rgb = Rgb(249, 115, 22);
    pub const WHITE: Rgb = Rgb(255, 255, 255);
}
