//! AEGIS Intercept - animated drone interception panel
//!
//! Core modules:
//! - `sim`: Deterministic simulation (scheduler, entity store, guidance)
//! - `audio`: Procedural audio cues for simulation events
//! - `renderer`: Projection of simulation state into SVG primitives
//! - `session`: Owned simulation session with create/dispose lifecycle
//! - `tuning`: Data-driven simulation balance
//! - `settings`: User preferences (volume, reduced motion)

pub mod audio;
pub mod renderer;
pub mod session;
pub mod settings;
pub mod sim;
pub mod tuning;

pub use audio::{AudioCue, AudioEngine, AudioOutput};
pub use session::Session;
pub use settings::Settings;
pub use tuning::Tuning;

use glam::Vec2;

/// Simulation configuration constants
pub mod consts {
    /// Spawn task period (ms)
    pub const SPAWN_PERIOD_MS: u64 = 3000;
    /// Radar sweep task period (ms)
    pub const RADAR_PERIOD_MS: u64 = 30;
    /// Physics task period (ms)
    pub const PHYSICS_PERIOD_MS: u64 = 50;
    /// Delay between detection and interceptor launch (ms)
    pub const LAUNCH_DELAY_MS: u64 = 1000;

    /// Maximum concurrently active drones
    pub const MAX_DRONES: usize = 3;

    /// Viewport is a normalized 0-100 space on both axes
    pub const VIEWPORT_SIZE: f32 = 100.0;
    /// Drones enter just above the top edge
    pub const DRONE_SPAWN_Y: f32 = -5.0;
    /// Drones past this y have escaped
    pub const DRONE_ESCAPE_Y: f32 = 105.0;
    /// Vertical speed range, units per physics tick
    pub const DRONE_MIN_SPEED: f32 = 0.3;
    pub const DRONE_MAX_SPEED: f32 = 0.8;

    /// Interceptor launch point (bottom-center)
    pub const LAUNCH_X: f32 = 50.0;
    pub const LAUNCH_Y: f32 = 100.0;
    /// Missile step per physics tick
    pub const MISSILE_SPEED: f32 = 2.0;
    /// Interception happens below this distance
    pub const INTERCEPT_RADIUS: f32 = 3.0;

    /// Radar sweep increment per radar tick (degrees)
    pub const RADAR_STEP_DEG: f32 = 2.0;

    /// Host frame delta clamp (prevents a burst of catch-up ticks)
    pub const MAX_FRAME_MS: u64 = 250;
}

/// Wrap an angle in degrees to [0, 360)
#[inline]
pub fn normalize_degrees(angle: f32) -> f32 {
    let wrapped = angle.rem_euclid(360.0);
    // rem_euclid can round up to exactly 360.0 for tiny negative inputs
    if wrapped >= 360.0 { 0.0 } else { wrapped }
}

/// Point at `radius` from `center` along `degrees` (screen space, y down)
#[inline]
pub fn polar_offset(center: Vec2, radius: f32, degrees: f32) -> Vec2 {
    let theta = degrees.to_radians();
    center + Vec2::new(theta.cos(), theta.sin()) * radius
}
