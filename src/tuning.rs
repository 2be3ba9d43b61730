//! Data-driven simulation balance
//!
//! Every timing and geometry constant the simulation uses, serializable so a
//! host can override them from JSON. Defaults come from [`crate::consts`].

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::*;

/// Simulation tuning values
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    // === Scheduler ===
    /// Spawn task period (ms)
    pub spawn_period_ms: u64,
    /// Radar task period (ms)
    pub radar_period_ms: u64,
    /// Physics task period (ms)
    pub physics_period_ms: u64,
    /// Delay from detection to interceptor launch (ms)
    pub launch_delay_ms: u64,

    // === Drones ===
    /// Spawn is skipped while this many drones are active
    pub max_drones: usize,
    pub spawn_y: f32,
    pub escape_y: f32,
    pub min_speed: f32,
    pub max_speed: f32,

    // === Missiles ===
    pub launch_point: Vec2,
    pub missile_speed: f32,
    pub intercept_radius: f32,

    // === Radar ===
    pub radar_step_deg: f32,

    /// How long intercepted ids stay in the intercept log (ms).
    /// `None` keeps them for the whole session.
    pub intercept_retention_ms: Option<u64>,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            spawn_period_ms: SPAWN_PERIOD_MS,
            radar_period_ms: RADAR_PERIOD_MS,
            physics_period_ms: PHYSICS_PERIOD_MS,
            launch_delay_ms: LAUNCH_DELAY_MS,

            max_drones: MAX_DRONES,
            spawn_y: DRONE_SPAWN_Y,
            escape_y: DRONE_ESCAPE_Y,
            min_speed: DRONE_MIN_SPEED,
            max_speed: DRONE_MAX_SPEED,

            launch_point: Vec2::new(LAUNCH_X, LAUNCH_Y),
            missile_speed: MISSILE_SPEED,
            intercept_radius: INTERCEPT_RADIUS,

            radar_step_deg: RADAR_STEP_DEG,

            intercept_retention_ms: None,
        }
    }
}

impl Tuning {
    /// Parse tuning from JSON; missing fields take their defaults
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str::<Self>(json).map(Self::sanitized)
    }

    /// Parse tuning from JSON, falling back to defaults on error
    pub fn from_json_or_default(json: &str) -> Self {
        match Self::from_json(json) {
            Ok(tuning) => tuning,
            Err(e) => {
                log::warn!("Invalid tuning JSON ({}), using defaults", e);
                Self::default()
            }
        }
    }

    /// Repair values the scheduler and guidance cannot work with
    pub fn sanitized(mut self) -> Self {
        for (name, period) in [
            ("spawn_period_ms", &mut self.spawn_period_ms),
            ("radar_period_ms", &mut self.radar_period_ms),
            ("physics_period_ms", &mut self.physics_period_ms),
        ] {
            if *period == 0 {
                log::warn!("Tuning: {} must be positive, using 1", name);
                *period = 1;
            }
        }

        if !is_positive(self.min_speed) {
            log::warn!("Tuning: min_speed must be positive, using default");
            self.min_speed = DRONE_MIN_SPEED;
        }
        if !(self.max_speed.is_finite() && self.max_speed > self.min_speed) {
            log::warn!("Tuning: max_speed must exceed min_speed, widening range");
            self.max_speed = self.min_speed + (DRONE_MAX_SPEED - DRONE_MIN_SPEED);
        }
        // Widening is lost to rounding at very large speeds
        if !(self.max_speed.is_finite() && self.max_speed > self.min_speed) {
            log::warn!("Tuning: drone speed range unusable, using defaults");
            self.min_speed = DRONE_MIN_SPEED;
            self.max_speed = DRONE_MAX_SPEED;
        }
        if !is_positive(self.missile_speed) {
            log::warn!("Tuning: missile_speed must be positive, using default");
            self.missile_speed = MISSILE_SPEED;
        }
        if !is_positive(self.intercept_radius) {
            log::warn!("Tuning: intercept_radius must be positive, using default");
            self.intercept_radius = INTERCEPT_RADIUS;
        }
        if !self.radar_step_deg.is_finite() {
            log::warn!("Tuning: radar_step_deg must be finite, using default");
            self.radar_step_deg = RADAR_STEP_DEG;
        }

        // The next drone-advance pass has to see the id to remove the drone
        if let Some(retention) = self.intercept_retention_ms {
            if retention < self.physics_period_ms {
                log::warn!("Tuning: intercept_retention_ms shorter than a physics tick, extending");
                self.intercept_retention_ms = Some(self.physics_period_ms);
            }
        }

        self
    }
}

fn is_positive(v: f32) -> bool {
    v.is_finite() && v > 0.0
}
