//! Entity store and core simulation types
//!
//! Everything the scheduler mutates lives in [`SimState`].

use std::collections::BTreeMap;

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use crate::consts::VIEWPORT_SIZE;
use crate::normalize_degrees;
use crate::tuning::Tuning;

/// Entity identifier (shared counter for drones and missiles)
pub type EntityId = u32;

/// A hostile contact descending through the viewport
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Drone {
    pub id: EntityId,
    /// Position in the 0-100 viewport space
    pub pos: Vec2,
    /// Vertical speed, units per physics tick
    pub speed: f32,
    /// Heading in degrees (cosmetic)
    pub heading: f32,
}

impl Drone {
    /// Move one physics tick down the screen
    #[inline]
    pub fn advance(&mut self) {
        self.pos.y += self.speed;
    }
}

/// An interceptor homing on one drone
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Missile {
    pub id: EntityId,
    pub pos: Vec2,
    /// Drone this missile homes toward
    pub target: EntityId,
}

/// Discrete simulation events (consumed by audio and hosts)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SimEvent {
    /// A drone entered the viewport
    Detection { drone: EntityId },
    /// An interceptor left the launch point
    Launch { missile: EntityId, target: EntityId },
    /// A missile reached its target
    Interception { missile: EntityId, drone: EntityId },
}

/// Complete simulation state (the entity store)
#[derive(Debug, Clone)]
pub struct SimState {
    /// Seed the RNG was created from
    pub seed: u64,
    /// Simulation clock (ms since session start)
    pub time_ms: u64,
    /// Active drones (spawn order, which is ascending id)
    pub drones: Vec<Drone>,
    /// Active missiles (launch order)
    pub missiles: Vec<Missile>,
    /// Intercepted drone ids with the time they were struck
    pub intercepted: BTreeMap<EntityId, u64>,
    /// Radar sweep angle in degrees, [0, 360)
    pub radar_angle: f32,
    rng: Pcg32,
    next_id: EntityId,
}

impl SimState {
    /// Create an empty state with the given seed
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            time_ms: 0,
            drones: Vec::new(),
            missiles: Vec::new(),
            intercepted: BTreeMap::new(),
            radar_angle: 0.0,
            rng: Pcg32::seed_from_u64(seed),
            next_id: 1,
        }
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> EntityId {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Look up an active drone
    pub fn drone(&self, id: EntityId) -> Option<&Drone> {
        self.drones.iter().find(|d| d.id == id)
    }

    pub fn is_intercepted(&self, id: EntityId) -> bool {
        self.intercepted.contains_key(&id)
    }

    /// Spawn a drone with randomized x, speed and heading
    pub fn spawn_drone(&mut self, tuning: &Tuning) -> EntityId {
        let x = self.rng.random_range(0.0..VIEWPORT_SIZE);
        let speed = self.rng.random_range(tuning.min_speed..tuning.max_speed);
        let heading = self.rng.random_range(0.0..360.0);
        self.insert_drone(Vec2::new(x, tuning.spawn_y), speed, heading)
    }

    /// Insert a drone at an explicit position (scripted scenarios)
    pub fn insert_drone(&mut self, pos: Vec2, speed: f32, heading: f32) -> EntityId {
        let id = self.next_entity_id();
        self.drones.push(Drone {
            id,
            pos,
            speed,
            heading: normalize_degrees(heading),
        });
        id
    }

    /// Launch a missile at `target` from the launch point
    pub fn launch_missile(&mut self, target: EntityId, tuning: &Tuning) -> EntityId {
        let id = self.next_entity_id();
        self.missiles.push(Missile {
            id,
            pos: tuning.launch_point,
            target,
        });
        id
    }

    /// Remove a drone without intercepting it
    pub fn remove_drone(&mut self, id: EntityId) -> Option<Drone> {
        let idx = self.drones.iter().position(|d| d.id == id)?;
        Some(self.drones.remove(idx))
    }
}
