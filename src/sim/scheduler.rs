//! Fixed-step scheduler
//!
//! Three periodic tasks (spawn, radar, physics) and the delayed launches the
//! spawn task schedules, driven by synthetic time deltas. Every firing that
//! falls inside an `advance` window runs in chronological order; firings due
//! at the same instant run launches first, then spawn, physics and radar.

use serde::{Deserialize, Serialize};

use super::guidance::physics_tick;
use super::state::{EntityId, SimEvent, SimState};
use crate::normalize_degrees;
use crate::tuning::Tuning;

/// Scheduled task kinds, in same-instant priority order
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum TaskKind {
    Launch,
    Spawn,
    Physics,
    Radar,
}

/// Latest reachable clock value; a due time of `u64::MAX` never fires
const CLOCK_LIMIT_MS: u64 = u64::MAX - 1;

/// A recurring task with interval semantics (first fire one period in)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PeriodicTask {
    pub period_ms: u64,
    pub next_due_ms: u64,
}

impl PeriodicTask {
    pub fn new(period_ms: u64, now_ms: u64) -> Self {
        let period_ms = period_ms.max(1);
        Self {
            period_ms,
            next_due_ms: now_ms.saturating_add(period_ms),
        }
    }

    fn fire(&mut self) {
        self.next_due_ms = self.next_due_ms.saturating_add(self.period_ms);
    }
}

/// A missile launch waiting for its delay to elapse
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendingLaunch {
    pub due_ms: u64,
    pub target: EntityId,
}

/// Drives all simulation tasks from elapsed time
#[derive(Debug, Clone)]
pub struct Scheduler {
    now_ms: u64,
    running: bool,
    spawn: PeriodicTask,
    radar: PeriodicTask,
    physics: PeriodicTask,
    /// Sorted by due time (insertion order breaks ties)
    pending: Vec<PendingLaunch>,
    launch_delay_ms: u64,
}

impl Scheduler {
    /// Create a scheduler with all tasks started at time zero
    pub fn new(tuning: &Tuning) -> Self {
        Self {
            now_ms: 0,
            running: true,
            spawn: PeriodicTask::new(tuning.spawn_period_ms, 0),
            radar: PeriodicTask::new(tuning.radar_period_ms, 0),
            physics: PeriodicTask::new(tuning.physics_period_ms, 0),
            pending: Vec::new(),
            launch_delay_ms: tuning.launch_delay_ms,
        }
    }

    pub fn now_ms(&self) -> u64 {
        self.now_ms
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Launches scheduled but not yet fired
    pub fn pending_launches(&self) -> &[PendingLaunch] {
        &self.pending
    }

    /// Restart all periodic tasks from the current clock
    pub fn start(&mut self) {
        if self.running {
            return;
        }
        self.spawn = PeriodicTask::new(self.spawn.period_ms, self.now_ms);
        self.radar = PeriodicTask::new(self.radar.period_ms, self.now_ms);
        self.physics = PeriodicTask::new(self.physics.period_ms, self.now_ms);
        self.running = true;
        log::info!("Scheduler started at {} ms", self.now_ms);
    }

    /// Cancel all tasks, including launches still waiting on their delay
    pub fn stop(&mut self) {
        if !self.running {
            return;
        }
        if !self.pending.is_empty() {
            log::debug!("Cancelling {} pending launch(es)", self.pending.len());
        }
        self.pending.clear();
        self.running = false;
        log::info!("Scheduler stopped at {} ms", self.now_ms);
    }

    /// Earliest due task, if any falls at or before `deadline`
    fn next_due(&self, deadline: u64) -> Option<(u64, TaskKind)> {
        let mut candidates = [
            (self.spawn.next_due_ms, TaskKind::Spawn),
            (self.physics.next_due_ms, TaskKind::Physics),
            (self.radar.next_due_ms, TaskKind::Radar),
        ]
        .to_vec();
        if let Some(launch) = self.pending.first() {
            candidates.push((launch.due_ms, TaskKind::Launch));
        }
        candidates
            .into_iter()
            .filter(|(due, _)| *due <= deadline)
            .min()
    }

    /// Advance the clock by `dt_ms`, firing every task that comes due
    pub fn advance(
        &mut self,
        state: &mut SimState,
        tuning: &Tuning,
        dt_ms: u64,
        events: &mut Vec<SimEvent>,
    ) {
        if !self.running {
            return;
        }

        let deadline = self.now_ms.saturating_add(dt_ms).min(CLOCK_LIMIT_MS);
        while let Some((due, kind)) = self.next_due(deadline) {
            self.now_ms = due;
            state.time_ms = due;
            match kind {
                TaskKind::Launch => {
                    let launch = self.pending.remove(0);
                    fire_launch(state, tuning, launch.target, events);
                }
                TaskKind::Spawn => {
                    self.spawn.fire();
                    if let Some(drone) = fire_spawn(state, tuning, events) {
                        self.schedule_launch(drone);
                    }
                }
                TaskKind::Physics => {
                    self.physics.fire();
                    physics_tick(state, tuning, events);
                }
                TaskKind::Radar => {
                    self.radar.fire();
                    fire_radar(state, tuning);
                }
            }
        }

        self.now_ms = deadline;
        state.time_ms = deadline;
    }

    fn schedule_launch(&mut self, target: EntityId) {
        let due_ms = self.now_ms.saturating_add(self.launch_delay_ms);
        let idx = self.pending.partition_point(|p| p.due_ms <= due_ms);
        self.pending.insert(idx, PendingLaunch { due_ms, target });
    }
}

/// Spawn task body: add a drone unless the cap is reached
pub fn fire_spawn(
    state: &mut SimState,
    tuning: &Tuning,
    events: &mut Vec<SimEvent>,
) -> Option<EntityId> {
    if state.drones.len() >= tuning.max_drones {
        return None;
    }
    let drone = state.spawn_drone(tuning);
    log::debug!("Drone {} detected", drone);
    events.push(SimEvent::Detection { drone });
    Some(drone)
}

/// Delayed launch body: fire at `target` if it is still active
pub fn fire_launch(
    state: &mut SimState,
    tuning: &Tuning,
    target: EntityId,
    events: &mut Vec<SimEvent>,
) -> Option<EntityId> {
    if state.drone(target).is_none() {
        log::debug!("Launch skipped, drone {} no longer active", target);
        return None;
    }
    let missile = state.launch_missile(target, tuning);
    log::debug!("Missile {} launched at drone {}", missile, target);
    events.push(SimEvent::Launch { missile, target });
    Some(missile)
}

/// Radar task body: rotate the sweep
pub fn fire_radar(state: &mut SimState, tuning: &Tuning) {
    state.radar_angle = normalize_degrees(state.radar_angle + tuning.radar_step_deg);
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec2;
    use proptest::prelude::*;

    fn setup(seed: u64) -> (SimState, Scheduler, Tuning) {
        let tuning = Tuning::default();
        (SimState::new(seed), Scheduler::new(&tuning), tuning)
    }

    #[test]
    fn test_first_spawn_after_one_period() {
        let (mut state, mut sched, tuning) = setup(1);
        let mut events = Vec::new();

        sched.advance(&mut state, &tuning, 2999, &mut events);
        assert!(state.drones.is_empty());

        sched.advance(&mut state, &tuning, 1, &mut events);
        assert_eq!(state.drones.len(), 1);
        assert!(matches!(events[..], [SimEvent::Detection { .. }]));
        assert_eq!(sched.pending_launches()[0].due_ms, 4000);
    }

    #[test]
    fn test_launch_follows_detection_by_delay() {
        let (mut state, mut sched, tuning) = setup(1);
        let mut events = Vec::new();

        sched.advance(&mut state, &tuning, 3999, &mut events);
        assert!(state.missiles.is_empty());

        sched.advance(&mut state, &tuning, 1, &mut events);
        assert_eq!(state.missiles.len(), 1);
        let drone = state.drones[0].id;
        assert_eq!(state.missiles[0].target, drone);
        // Launches run before the physics tick due at the same instant
        assert_eq!(state.missiles[0].pos, Vec2::new(50.0, 100.0) + {
            let d = state.drones[0].pos - Vec2::new(50.0, 100.0);
            d / d.length() * 2.0
        });
        assert!(matches!(
            events.last(),
            Some(SimEvent::Launch { target, .. }) if *target == drone
        ));
    }

    #[test]
    fn test_firing_counts_match_periods() {
        let (mut state, mut sched, tuning) = setup(1);
        let mut events = Vec::new();
        sched.advance(&mut state, &tuning, 900, &mut events);
        // 900 / 30 radar ticks
        assert_eq!(state.radar_angle, 60.0);
        assert_eq!(sched.now_ms(), 900);
        assert_eq!(state.time_ms, 900);
    }

    #[test]
    fn test_split_and_single_advance_agree() {
        let (mut a, mut sched_a, tuning) = setup(42);
        let (mut b, mut sched_b, _) = setup(42);
        let mut events_a = Vec::new();
        let mut events_b = Vec::new();

        sched_a.advance(&mut a, &tuning, 20_000, &mut events_a);
        for _ in 0..1250 {
            sched_b.advance(&mut b, &tuning, 16, &mut events_b);
        }

        assert_eq!(a.drones, b.drones);
        assert_eq!(a.missiles, b.missiles);
        assert_eq!(a.intercepted, b.intercepted);
        assert_eq!(a.radar_angle, b.radar_angle);
        assert_eq!(events_a, events_b);
    }

    #[test]
    fn test_spawn_cap() {
        let (mut state, _, tuning) = setup(1);
        let mut events = Vec::new();
        for _ in 0..5 {
            fire_spawn(&mut state, &tuning, &mut events);
        }
        assert_eq!(state.drones.len(), 3);
        assert_eq!(events.len(), 3);
    }

    #[test]
    fn test_stop_cancels_pending_launch() {
        let (mut state, mut sched, tuning) = setup(1);
        let mut events = Vec::new();

        sched.advance(&mut state, &tuning, 3500, &mut events);
        assert_eq!(sched.pending_launches().len(), 1);

        sched.stop();
        assert!(sched.pending_launches().is_empty());
        sched.advance(&mut state, &tuning, 5000, &mut events);
        assert!(state.missiles.is_empty());
        assert_eq!(sched.now_ms(), 3500);
    }

    #[test]
    fn test_restart_resumes_from_clock() {
        let (mut state, mut sched, tuning) = setup(1);
        let mut events = Vec::new();
        sched.advance(&mut state, &tuning, 1000, &mut events);
        sched.stop();
        sched.start();
        sched.advance(&mut state, &tuning, 2999, &mut events);
        assert!(state.drones.is_empty());
        sched.advance(&mut state, &tuning, 1, &mut events);
        assert_eq!(state.drones.len(), 1);
    }

    #[test]
    fn test_launch_skipped_for_removed_target() {
        let (mut state, mut sched, tuning) = setup(1);
        let mut events = Vec::new();
        sched.advance(&mut state, &tuning, 3000, &mut events);
        let drone = state.drones[0].id;
        state.remove_drone(drone);

        sched.advance(&mut state, &tuning, 1000, &mut events);
        assert!(state.missiles.is_empty());
        assert!(sched.pending_launches().is_empty());
    }

    #[test]
    fn test_radar_cycles_every_180_ticks() {
        let (mut state, _, tuning) = setup(1);
        let mut seen = Vec::new();
        for _ in 0..180 {
            fire_radar(&mut state, &tuning);
            seen.push(state.radar_angle);
        }
        assert_eq!(seen[0], 2.0);
        assert_eq!(seen[178], 358.0);
        assert_eq!(seen[179], 0.0);
    }

    #[test]
    fn test_huge_periods_and_deltas_saturate() {
        let tuning = Tuning {
            spawn_period_ms: u64::MAX,
            radar_period_ms: u64::MAX,
            physics_period_ms: u64::MAX,
            ..Default::default()
        };
        let mut state = SimState::new(4);
        let mut sched = Scheduler::new(&tuning);
        let mut events = Vec::new();

        sched.advance(&mut state, &tuning, 5000, &mut events);
        sched.advance(&mut state, &tuning, u64::MAX, &mut events);
        sched.advance(&mut state, &tuning, u64::MAX, &mut events);
        assert!(events.is_empty());
        assert!(state.drones.is_empty());
        assert_eq!(sched.now_ms(), u64::MAX - 1);
        assert_eq!(state.time_ms, u64::MAX - 1);
    }

    #[test]
    fn test_huge_delta_fires_due_tasks_once_each() {
        let half = u64::MAX / 2;
        let tuning = Tuning {
            spawn_period_ms: half,
            radar_period_ms: u64::MAX,
            physics_period_ms: u64::MAX,
            ..Default::default()
        };
        let mut state = SimState::new(4);
        let mut sched = Scheduler::new(&tuning);
        let mut events = Vec::new();

        sched.advance(&mut state, &tuning, u64::MAX, &mut events);
        // Spawns at half and 2 * half; the second launch would land past the clock limit
        assert_eq!(state.drones.len(), 2);
        assert_eq!(state.missiles.len(), 1);
        assert_eq!(sched.pending_launches().len(), 1);
        assert_eq!(sched.pending_launches()[0].due_ms, u64::MAX);
    }

    proptest! {
        #[test]
        fn prop_drone_cap_holds(seed in any::<u64>(), steps in prop::collection::vec(1u64..400, 1..200)) {
            let (mut state, mut sched, tuning) = setup(seed);
            let mut events = Vec::new();
            for dt in steps {
                sched.advance(&mut state, &tuning, dt, &mut events);
                prop_assert!(state.drones.len() <= tuning.max_drones);
            }
        }

        #[test]
        fn prop_radar_step_sequence(ticks in 1usize..1000) {
            let (mut state, _, tuning) = setup(1);
            let mut expected = 0.0f32;
            for _ in 0..ticks {
                fire_radar(&mut state, &tuning);
                expected = (expected + 2.0) % 360.0;
                prop_assert_eq!(state.radar_angle, expected);
            }
        }
    }
}
