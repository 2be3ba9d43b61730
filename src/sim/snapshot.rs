//! Read-only view of the entity store for renderers and status readouts

use serde::{Deserialize, Serialize};

use glam::Vec2;

use super::state::{Drone, EntityId, Missile, SimState};
use crate::tuning::Tuning;

/// Counts shown next to the panel
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusReadout {
    /// Active drones
    pub threats: usize,
    /// Entries in the intercept log
    pub intercepted: usize,
    /// Active missiles
    pub missiles_in_flight: usize,
}

/// Snapshot of the simulation after a frame
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimSnapshot {
    pub time_ms: u64,
    pub drones: Vec<Drone>,
    pub missiles: Vec<Missile>,
    /// Intercepted ids in ascending order
    pub intercepted: Vec<EntityId>,
    pub radar_angle: f32,
    /// Where missiles launch from; the radar and defender are drawn here
    pub launch_point: Vec2,
    pub status: StatusReadout,
}

impl SimSnapshot {
    pub fn capture(state: &SimState, tuning: &Tuning) -> Self {
        Self {
            time_ms: state.time_ms,
            drones: state.drones.clone(),
            missiles: state.missiles.clone(),
            intercepted: state.intercepted.keys().copied().collect(),
            radar_angle: state.radar_angle,
            launch_point: tuning.launch_point,
            status: StatusReadout {
                threats: state.drones.len(),
                intercepted: state.intercepted.len(),
                missiles_in_flight: state.missiles.len(),
            },
        }
    }

    pub fn drone(&self, id: EntityId) -> Option<&Drone> {
        self.drones.iter().find(|d| d.id == id)
    }
}
