//! Guidance and collision
//!
//! One physics tick: drones fall, missiles home on their targets, and
//! missiles close enough to their target intercept it.

use glam::Vec2;

use super::state::{SimEvent, SimState};
use crate::tuning::Tuning;

/// Result of steering one missile toward its target
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Steer {
    /// Target within the intercept radius
    Intercept,
    /// New missile position after one step
    Move(Vec2),
}

/// Steer a missile one step toward `target`.
///
/// A distance of zero counts as an interception, so the normalization
/// below never divides by zero.
#[inline]
pub fn steer(missile: Vec2, target: Vec2, speed: f32, intercept_radius: f32) -> Steer {
    let delta = target - missile;
    let distance = delta.length();
    if distance < intercept_radius {
        return Steer::Intercept;
    }
    Steer::Move(missile + delta / distance * speed)
}

/// Advance drones and drop those that escaped or were intercepted
pub fn advance_drones(state: &mut SimState, tuning: &Tuning) {
    let escape_y = tuning.escape_y;
    let intercepted = &state.intercepted;
    state.drones.retain_mut(|drone| {
        drone.advance();
        drone.pos.y < escape_y && !intercepted.contains_key(&drone.id)
    });
}

/// Steer every missile against the current drone positions
pub fn guide_missiles(state: &mut SimState, tuning: &Tuning, events: &mut Vec<SimEvent>) {
    let mut struck = Vec::new();

    let drones = &state.drones;
    state.missiles.retain_mut(|missile| {
        // Stale target: hold position
        let Some(target) = drones.iter().find(|d| d.id == missile.target) else {
            return true;
        };

        match steer(
            missile.pos,
            target.pos,
            tuning.missile_speed,
            tuning.intercept_radius,
        ) {
            Steer::Intercept => {
                struck.push((missile.id, target.id));
                false
            }
            Steer::Move(pos) => {
                missile.pos = pos;
                true
            }
        }
    });

    for (missile, drone) in struck {
        if state.intercepted.insert(drone, state.time_ms).is_none() {
            log::debug!("Missile {} intercepted drone {}", missile, drone);
            events.push(SimEvent::Interception { missile, drone });
        }
    }
}

/// Drop intercepted ids older than the retention window
pub fn evict_intercepts(state: &mut SimState, tuning: &Tuning) {
    let Some(retention) = tuning.intercept_retention_ms else {
        return;
    };
    let now = state.time_ms;
    state
        .intercepted
        .retain(|_, struck_at| now.saturating_sub(*struck_at) < retention);
}

/// Run one full physics tick (drone advance always precedes guidance)
pub fn physics_tick(state: &mut SimState, tuning: &Tuning, events: &mut Vec<SimEvent>) {
    advance_drones(state, tuning);
    guide_missiles(state, tuning, events);
    evict_intercepts(state, tuning);
}
