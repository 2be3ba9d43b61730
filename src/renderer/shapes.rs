//! Shape generation for panel elements
//!
//! Each function returns the primitives for one element of the panel, in
//! back-to-front order.

use glam::Vec2;

use super::primitive::colors::*;
use super::primitive::{Gradient, Length, Paint, Primitive, Style};
use crate::polar_offset;

/// Radar reach as a share of the panel
pub const RADAR_RADIUS: f32 = 45.0;
/// Number of fixed range rings
pub const RANGE_RINGS: usize = 3;

fn pct(v: f32) -> Length {
    Length::Percent(v)
}

fn circle(center: Vec2, r: Length, style: Style) -> Primitive {
    Primitive::Circle {
        cx: pct(center.x),
        cy: pct(center.y),
        r,
        style,
    }
}

/// Radial glow under the sweep
pub fn radar_glow(origin: Vec2) -> Vec<Primitive> {
    let style = Style {
        fill: Paint::Gradient(Gradient::RadarGlow),
        ..Style::fill(PRIMARY)
    }
    .with_class("radar-pulse");
    vec![circle(origin, pct(RADAR_RADIUS), style)]
}

/// Sweep line at `angle` degrees (0 = right, increasing clockwise on screen)
pub fn radar_sweep(origin: Vec2, angle: f32) -> Vec<Primitive> {
    let tip = polar_offset(origin, RADAR_RADIUS, angle);
    vec![Primitive::Line {
        x1: pct(origin.x),
        y1: pct(origin.y),
        x2: pct(tip.x),
        y2: pct(tip.y),
        style: Style::stroke(Paint::Solid(PRIMARY), 2.0).with_opacity(0.5),
    }]
}

/// Fixed range rings at even fractions of the radar radius
pub fn range_rings(origin: Vec2) -> Vec<Primitive> {
    let step = RADAR_RADIUS / RANGE_RINGS as f32;
    (1..=RANGE_RINGS)
        .map(|i| {
            circle(
                origin,
                pct(step * i as f32),
                Style::stroke(Paint::Solid(PRIMARY), 1.0).with_opacity(0.2),
            )
        })
        .collect()
}

/// Drone: blinking core, outer ring, warning glyph
pub fn drone_marker(pos: Vec2) -> Vec<Primitive> {
    vec![
        circle(
            pos,
            Length::Px(8.0),
            Style::fill(THREAT).with_class("threat-blink"),
        ),
        circle(
            pos,
            Length::Px(12.0),
            Style::stroke(Paint::Solid(THREAT), 2.0).with_opacity(0.5),
        ),
        Primitive::Text {
            x: pct(pos.x),
            y: pct(pos.y - 3.0),
            text: "\u{26a0}",
            font_size: 10.0,
            color: THREAT,
        },
    ]
}

/// Missile: trail below the head, then the head
pub fn missile_marker(pos: Vec2) -> Vec<Primitive> {
    vec![
        Primitive::Line {
            x1: pct(pos.x),
            y1: pct(pos.y),
            x2: pct(pos.x),
            y2: pct(pos.y + 5.0),
            style: Style::stroke(Paint::Gradient(Gradient::MissileTrail), 3.0),
        },
        circle(pos, Length::Px(4.0), Style::fill(MISSILE)),
    ]
}

/// Intercept burst with a check mark
pub fn intercept_marker(pos: Vec2) -> Vec<Primitive> {
    vec![
        circle(
            pos,
            Length::Px(15.0),
            Style::fill(MISSILE)
                .with_opacity(0.6)
                .with_class("animate-ping"),
        ),
        Primitive::Text {
            x: pct(pos.x),
            y: pct(pos.y + 1.0),
            text: "\u{2713}",
            font_size: 20.0,
            color: MISSILE,
        },
    ]
}

/// Defender at the launch point
pub fn defender(origin: Vec2) -> Vec<Primitive> {
    vec![
        circle(origin, Length::Px(10.0), Style::fill(PRIMARY)),
        Primitive::Text {
            x: pct(origin.x),
            y: pct(origin.y + 3.0),
            text: "\u{1f6e1}",
            font_size: 12.0,
            color: WHITE,
        },
    ]
}
