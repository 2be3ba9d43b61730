//! Panel rendering module
//!
//! Pure projection of a simulation snapshot into SVG primitives. Nothing in
//! here mutates simulation state.

pub mod primitive;
pub mod scene;
pub mod shapes;
pub mod svg;

pub use primitive::{Length, Paint, Primitive, Rgb, Style};
pub use scene::{RenderOptions, Scene, scene};
pub use svg::to_svg;
