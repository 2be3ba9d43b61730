//! Deterministic simulation module
//!
//! All interception logic lives here. This module must be pure and deterministic:
//! - Time advances only through explicit deltas
//! - Seeded RNG only
//! - Stable iteration order (spawn/launch order, ascending ids)
//! - No rendering or platform dependencies

pub mod guidance;
pub mod scheduler;
pub mod snapshot;
pub mod state;

pub use guidance::{Steer, physics_tick, steer};
pub use scheduler::{PendingLaunch, PeriodicTask, Scheduler, TaskKind};
pub use snapshot::{SimSnapshot, StatusReadout};
pub use state::{Drone, EntityId, Missile, SimEvent, SimState};
