//! Simulation session
//!
//! Owns the entity store, the scheduler and the audio engine for one panel
//! instance. Hosts create a session, feed it frame deltas, read snapshots,
//! and dispose of it when the panel goes away.

use crate::audio::AudioEngine;
use crate::renderer::{self, RenderOptions, Scene};
use crate::sim::{Scheduler, SimEvent, SimSnapshot, SimState};
use crate::tuning::Tuning;

#[derive(Debug)]
pub struct Session {
    state: SimState,
    scheduler: Scheduler,
    audio: AudioEngine,
    tuning: Tuning,
    /// Events produced by the most recent `advance`
    events: Vec<SimEvent>,
    disposed: bool,
}

impl Session {
    /// Start a session; all periodic tasks begin at time zero
    pub fn create(tuning: Tuning, seed: u64, audio: AudioEngine) -> Self {
        let tuning = tuning.sanitized();
        log::info!("Session created with seed: {}", seed);
        Self {
            state: SimState::new(seed),
            scheduler: Scheduler::new(&tuning),
            audio,
            tuning,
            events: Vec::new(),
            disposed: false,
        }
    }

    /// Session with default tuning and no sound
    pub fn silent(seed: u64) -> Self {
        Self::create(Tuning::default(), seed, AudioEngine::silent())
    }

    /// Advance simulated time, play cues for what happened, and return the
    /// events of this frame
    pub fn advance(&mut self, dt_ms: u64) -> &[SimEvent] {
        self.events.clear();
        if self.disposed {
            return &self.events;
        }

        self.scheduler
            .advance(&mut self.state, &self.tuning, dt_ms, &mut self.events);
        self.audio.handle_events(&self.events);
        &self.events
    }

    pub fn snapshot(&self) -> SimSnapshot {
        SimSnapshot::capture(&self.state, &self.tuning)
    }

    pub fn scene(&self, options: &RenderOptions) -> Scene {
        renderer::scene(&self.snapshot(), options)
    }

    pub fn render_svg(&self, options: &RenderOptions) -> String {
        renderer::to_svg(&self.scene(options))
    }

    pub fn state(&self) -> &SimState {
        &self.state
    }

    /// Direct access to the entity store (scripted scenarios)
    pub fn state_mut(&mut self) -> &mut SimState {
        &mut self.state
    }

    pub fn tuning(&self) -> &Tuning {
        &self.tuning
    }

    pub fn scheduler(&self) -> &Scheduler {
        &self.scheduler
    }

    pub fn audio(&self) -> &AudioEngine {
        &self.audio
    }

    pub fn audio_mut(&mut self) -> &mut AudioEngine {
        &mut self.audio
    }

    /// Sound toggle; the first enable initializes the audio output
    pub fn set_sound_enabled(&mut self, enabled: bool) {
        if self.disposed {
            return;
        }
        self.audio.set_enabled(enabled);
    }

    pub fn set_volume(&mut self, volume: f32) {
        self.audio.set_volume(volume);
    }

    pub fn is_disposed(&self) -> bool {
        self.disposed
    }

    /// Cancel every timer (pending launches included) and release audio
    pub fn dispose(&mut self) {
        if self.disposed {
            return;
        }
        self.scheduler.stop();
        self.audio.dispose();
        self.disposed = true;
        log::info!("Session disposed at {} ms", self.state.time_ms);
    }
}

impl Drop for Session {
    fn drop(&mut self) {
        self.dispose();
    }
}
