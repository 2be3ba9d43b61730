//! SVG serialization of a scene

use std::fmt::Write;

use super::primitive::colors::{MISSILE, PRIMARY};
use super::primitive::{Gradient, Length, Paint, Primitive, Rgb, Style};
use super::scene::Scene;

const FONT_FAMILY: &str = "Roboto Mono, monospace";

impl std::fmt::Display for Length {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Length::Percent(v) => write!(f, "{}%", round3(*v)),
            Length::Px(v) => write!(f, "{}", round3(*v)),
        }
    }
}

impl std::fmt::Display for Rgb {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "rgb({}, {}, {})", self.0, self.1, self.2)
    }
}

impl std::fmt::Display for Paint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Paint::None => f.write_str("none"),
            Paint::Solid(color) => write!(f, "{color}"),
            Paint::Gradient(g) => write!(f, "url(#{})", g.id()),
        }
    }
}

/// Keep output stable and compact
fn round3(v: f32) -> f32 {
    (v * 1000.0).round() / 1000.0
}

fn gradient_defs(out: &mut String) {
    let glow = PRIMARY;
    let trail = MISSILE;
    let _ = write!(
        out,
        "<defs>\
         <radialGradient id=\"{glow_id}\">\
         <stop offset=\"0%\" stop-color=\"{glow}\" stop-opacity=\"0.3\"/>\
         <stop offset=\"100%\" stop-color=\"{glow}\" stop-opacity=\"0\"/>\
         </radialGradient>\
         <linearGradient id=\"{trail_id}\" x1=\"0%\" y1=\"0%\" x2=\"0%\" y2=\"100%\">\
         <stop offset=\"0%\" stop-color=\"{trail}\" stop-opacity=\"0\"/>\
         <stop offset=\"100%\" stop-color=\"{trail}\" stop-opacity=\"0.8\"/>\
         </linearGradient>\
         </defs>",
        glow_id = Gradient::RadarGlow.id(),
        trail_id = Gradient::MissileTrail.id(),
    );
}

fn style_attrs(out: &mut String, style: &Style) {
    let _ = write!(out, " fill=\"{}\"", style.fill);
    if style.stroke != Paint::None {
        let _ = write!(
            out,
            " stroke=\"{}\" stroke-width=\"{}\"",
            style.stroke,
            round3(style.stroke_width)
        );
    }
    if style.opacity < 1.0 {
        let _ = write!(out, " opacity=\"{}\"", round3(style.opacity));
    }
    if let Some(class) = style.class {
        let _ = write!(out, " class=\"{}\"", class);
    }
}

fn primitive(out: &mut String, p: &Primitive) {
    match p {
        Primitive::Circle { cx, cy, r, style } => {
            let _ = write!(out, "<circle cx=\"{cx}\" cy=\"{cy}\" r=\"{r}\"");
            style_attrs(out, style);
            out.push_str("/>");
        }
        Primitive::Line {
            x1,
            y1,
            x2,
            y2,
            style,
        } => {
            let _ = write!(out, "<line x1=\"{x1}\" y1=\"{y1}\" x2=\"{x2}\" y2=\"{y2}\"");
            style_attrs(out, style);
            out.push_str("/>");
        }
        Primitive::Text {
            x,
            y,
            text,
            font_size,
            color,
        } => {
            let _ = write!(
                out,
                "<text x=\"{x}\" y=\"{y}\" text-anchor=\"middle\" fill=\"{color}\" \
                 font-size=\"{}\" font-family=\"{FONT_FAMILY}\">{text}</text>",
                round3(*font_size)
            );
        }
    }
}

/// Render a scene as a standalone SVG element filling its container
pub fn to_svg(scene: &Scene) -> String {
    let mut out = String::with_capacity(256 + scene.primitives.len() * 128);
    out.push_str(
        "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"100%\" height=\"100%\" \
         class=\"absolute inset-0 w-full h-full\">",
    );
    gradient_defs(&mut out);
    for p in &scene.primitives {
        primitive(&mut out, p);
    }
    out.push_str("</svg>");
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::renderer::{RenderOptions, scene};
    use crate::sim::{SimSnapshot, SimState};
    use crate::tuning::Tuning;
    use glam::Vec2;

    #[test]
    fn test_length_formatting() {
        assert_eq!(Length::Percent(50.0).to_string(), "50%");
        assert_eq!(Length::Percent(12.34567).to_string(), "12.346%");
        assert_eq!(Length::Px(8.0).to_string(), "8");
    }

    #[test]
    fn test_document_structure() {
        let mut state = SimState::new(1);
        state.insert_drone(Vec2::new(25.0, 40.0), 0.5, 0.0);
        let snap = SimSnapshot::capture(&state, &Tuning::default());
        let svg = to_svg(&scene(&snap, &RenderOptions::default()));

        assert!(svg.starts_with("<svg"));
        assert!(svg.ends_with("</svg>"));
        assert!(svg.contains("<radialGradient id=\"radarGlow\">"));
        assert!(svg.contains("fill=\"url(#radarGlow)\""));
        assert!(svg.contains(
            "<circle cx=\"25%\" cy=\"40%\" r=\"8\" fill=\"rgb(234, 56, 76)\" class=\"threat-blink\"/>"
        ));
        assert_eq!(svg.matches("<circle").count(), 1 + 3 + 2 + 1);
    }

    #[test]
    fn test_sweep_line_at_zero() {
        let snap = SimSnapshot::capture(&SimState::new(1), &Tuning::default());
        let svg = to_svg(&scene(&snap, &RenderOptions::default()));
        assert!(svg.contains("<line x1=\"50%\" y1=\"100%\" x2=\"95%\" y2=\"100%\""));
    }
}
