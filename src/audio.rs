//! Procedural audio cues for simulation events
//!
//! Every cue is a short sequence of oscillator tones with an exponential
//! gain envelope - no sample files. Sound is opt-in: nothing plays until
//! [`AudioEngine::enable`] is called from a user gesture, and the output is
//! created lazily on that first enable.

use std::cell::RefCell;
use std::f32::consts::TAU;
use std::rc::Rc;

use serde::{Deserialize, Serialize};

use crate::sim::SimEvent;

/// Peak gain of a tone at full volume
pub const CUE_GAIN: f32 = 0.3;
/// Gain every envelope decays to before the tone stops
pub const ENVELOPE_FLOOR: f32 = 0.01;

/// Oscillator waveform
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Waveform {
    Sine,
    Square,
    Sawtooth,
    Triangle,
}

impl Waveform {
    /// Sample the waveform at `phase` cycles (only the fractional part matters)
    pub fn sample(self, phase: f32) -> f32 {
        let p = phase.fract();
        match self {
            Waveform::Sine => (p * TAU).sin(),
            Waveform::Square => {
                if p < 0.5 {
                    1.0
                } else {
                    -1.0
                }
            }
            Waveform::Sawtooth => 2.0 * p - 1.0,
            Waveform::Triangle => 1.0 - 4.0 * (p - 0.5).abs(),
        }
    }
}

/// One note of a cue
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Tone {
    /// Offset from the start of the cue (seconds)
    pub delay: f32,
    pub freq: f32,
    /// Length of the envelope (seconds)
    pub duration: f32,
    pub waveform: Waveform,
}

const fn tone(delay: f32, freq: f32, duration: f32, waveform: Waveform) -> Tone {
    Tone {
        delay,
        freq,
        duration,
        waveform,
    }
}

const DETECTION_TONES: [Tone; 2] = [
    tone(0.0, 800.0, 0.1, Waveform::Square),
    tone(0.1, 600.0, 0.1, Waveform::Square),
];

const LAUNCH_TONES: [Tone; 1] = [tone(0.0, 300.0, 0.2, Waveform::Sawtooth)];

const INTERCEPTION_TONES: [Tone; 3] = [
    tone(0.0, 200.0, 0.05, Waveform::Square),
    tone(0.05, 150.0, 0.1, Waveform::Triangle),
    tone(0.1, 100.0, 0.15, Waveform::Sine),
];

/// Sound cue types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AudioCue {
    /// New drone on radar - two-tone beep
    Detection,
    /// Interceptor away - rasp
    Launch,
    /// Target destroyed - descending crunch
    Interception,
}

impl AudioCue {
    pub fn tones(self) -> &'static [Tone] {
        match self {
            AudioCue::Detection => &DETECTION_TONES,
            AudioCue::Launch => &LAUNCH_TONES,
            AudioCue::Interception => &INTERCEPTION_TONES,
        }
    }
}

impl From<&SimEvent> for AudioCue {
    fn from(event: &SimEvent) -> Self {
        match event {
            SimEvent::Detection { .. } => AudioCue::Detection,
            SimEvent::Launch { .. } => AudioCue::Launch,
            SimEvent::Interception { .. } => AudioCue::Interception,
        }
    }
}

/// A tone scaled to the current volume, ready for an output
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ToneBurst {
    pub tone: Tone,
    /// Gain at the start of the envelope
    pub start_gain: f32,
    /// Gain at the end of the envelope
    pub end_gain: f32,
}

impl ToneBurst {
    pub fn new(tone: Tone, volume: f32) -> Self {
        let start_gain = volume.max(0.0) * CUE_GAIN;
        // Quiet bursts keep the full-volume decay ratio instead of rising to the floor
        let end_gain = if start_gain > ENVELOPE_FLOOR {
            ENVELOPE_FLOOR
        } else {
            start_gain * (ENVELOPE_FLOOR / CUE_GAIN)
        };
        Self {
            tone,
            start_gain,
            end_gain,
        }
    }

    /// Whether the envelope has anything to play
    pub fn is_silent(&self) -> bool {
        !(self.start_gain > 0.0)
    }

    /// Envelope gain `t` seconds after the tone starts (0 after it stops)
    pub fn gain_at(&self, t: f32) -> f32 {
        let d = self.tone.duration;
        if t < 0.0 || t > d || d <= 0.0 || self.is_silent() {
            return 0.0;
        }
        self.start_gain * (self.end_gain / self.start_gain).powf(t / d)
    }

    /// Synthesize the tone as mono PCM (delay excluded)
    pub fn render(&self, sample_rate: u32) -> Vec<f32> {
        let rate = sample_rate as f32;
        let len = (self.tone.duration * rate).round() as usize;
        (0..len)
            .map(|i| {
                let t = i as f32 / rate;
                self.tone.waveform.sample(self.tone.freq * t) * self.gain_at(t)
            })
            .collect()
    }
}

/// Something that can play tone bursts
pub trait AudioOutput {
    fn play(&mut self, burst: &ToneBurst);
}

/// Native output: logs bursts instead of playing them
#[derive(Debug, Default)]
pub struct LogOutput;

impl AudioOutput for LogOutput {
    fn play(&mut self, burst: &ToneBurst) {
        log::debug!(
            "tone {:.0} Hz {:?} {:.2}s (+{:.2}s) gain {:.3}",
            burst.tone.freq,
            burst.tone.waveform,
            burst.tone.duration,
            burst.tone.delay,
            burst.start_gain
        );
    }
}

/// Records bursts into a shared buffer
#[derive(Debug, Default, Clone)]
pub struct MemoryOutput {
    played: Rc<RefCell<Vec<ToneBurst>>>,
}

impl MemoryOutput {
    pub fn new() -> Self {
        Self::default()
    }

    /// Handle to the recorded bursts (stays valid after the output moves)
    pub fn handle(&self) -> Rc<RefCell<Vec<ToneBurst>>> {
        self.played.clone()
    }
}

impl AudioOutput for MemoryOutput {
    fn play(&mut self, burst: &ToneBurst) {
        self.played.borrow_mut().push(*burst);
    }
}

type OutputFactory = Box<dyn FnMut() -> Option<Box<dyn AudioOutput>>>;

/// Audio cue engine
pub struct AudioEngine {
    factory: Option<OutputFactory>,
    output: Option<Box<dyn AudioOutput>>,
    enabled: bool,
    volume: f32,
}

impl std::fmt::Debug for AudioEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AudioEngine")
            .field("initialized", &self.output.is_some())
            .field("enabled", &self.enabled)
            .field("volume", &self.volume)
            .finish()
    }
}

impl Default for AudioEngine {
    fn default() -> Self {
        Self::platform()
    }
}

impl AudioEngine {
    /// Engine whose output is created by `factory` on first enable
    pub fn new<F>(factory: F) -> Self
    where
        F: FnMut() -> Option<Box<dyn AudioOutput>> + 'static,
    {
        Self {
            factory: Some(Box::new(factory)),
            output: None,
            enabled: false,
            volume: 1.0,
        }
    }

    /// Engine that never produces sound
    pub fn silent() -> Self {
        Self {
            factory: None,
            output: None,
            enabled: false,
            volume: 1.0,
        }
    }

    /// Engine using the platform's default output
    #[cfg(target_arch = "wasm32")]
    pub fn platform() -> Self {
        Self::new(|| {
            web::WebAudioOutput::new().map(|out| Box::new(out) as Box<dyn AudioOutput>)
        })
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn platform() -> Self {
        Self::new(|| Some(Box::new(LogOutput) as Box<dyn AudioOutput>))
    }

    /// Turn sound on (must follow a user gesture in browsers)
    pub fn enable(&mut self) {
        if let Some(mut factory) = self.factory.take() {
            self.output = factory();
            if self.output.is_none() {
                log::warn!("Failed to initialize audio output - audio disabled");
            } else {
                log::info!("Audio output initialized");
            }
        }
        self.enabled = true;
    }

    pub fn disable(&mut self) {
        self.enabled = false;
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        if enabled {
            self.enable();
        } else {
            self.disable();
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Whether cues would currently reach an output
    pub fn is_audible(&self) -> bool {
        self.enabled && self.output.is_some() && self.volume > 0.0
    }

    /// Set volume (0.0 - 1.0)
    pub fn set_volume(&mut self, volume: f32) {
        self.volume = if volume.is_nan() {
            0.0
        } else {
            volume.clamp(0.0, 1.0)
        };
    }

    pub fn volume(&self) -> f32 {
        self.volume
    }

    /// Play a cue
    pub fn play(&mut self, cue: AudioCue) {
        if !self.is_audible() {
            return;
        }
        let volume = self.volume;
        let Some(output) = self.output.as_mut() else {
            return;
        };
        for tone in cue.tones() {
            output.play(&ToneBurst::new(*tone, volume));
        }
    }

    /// Play the cue for each event, in order
    pub fn handle_events(&mut self, events: &[SimEvent]) {
        for event in events {
            self.play(AudioCue::from(event));
        }
    }

    /// Release the output; later cues are no-ops
    pub fn dispose(&mut self) {
        self.factory = None;
        if self.output.take().is_some() {
            log::info!("Audio output released");
        }
        self.enabled = false;
    }
}

#[cfg(target_arch = "wasm32")]
pub mod web {
    //! Web Audio API output

    use wasm_bindgen_futures::JsFuture;
    use web_sys::{AudioContext, AudioContextState, GainNode, OscillatorNode, OscillatorType};

    use super::{AudioOutput, ToneBurst, Waveform};

    pub struct WebAudioOutput {
        ctx: AudioContext,
    }

    impl WebAudioOutput {
        /// Create the audio context (may fail outside a secure context)
        pub fn new() -> Option<Self> {
            let ctx = AudioContext::new().ok()?;
            let out = Self { ctx };
            out.resume();
            Some(out)
        }

        /// Resume a suspended context (browsers suspend until a gesture)
        fn resume(&self) {
            if self.ctx.state() != AudioContextState::Suspended {
                return;
            }
            if let Ok(promise) = self.ctx.resume() {
                wasm_bindgen_futures::spawn_local(async move {
                    if JsFuture::from(promise).await.is_err() {
                        log::warn!("AudioContext resume rejected");
                    }
                });
            }
        }

        /// Create an oscillator with gain envelope
        fn create_osc(&self, freq: f32, osc_type: OscillatorType) -> Option<(OscillatorNode, GainNode)> {
            let osc = self.ctx.create_oscillator().ok()?;
            let gain = self.ctx.create_gain().ok()?;

            osc.set_type(osc_type);
            osc.frequency().set_value(freq);
            osc.connect_with_audio_node(&gain).ok()?;
            gain.connect_with_audio_node(&self.ctx.destination()).ok()?;

            Some((osc, gain))
        }
    }

    fn osc_type(waveform: Waveform) -> OscillatorType {
        match waveform {
            Waveform::Sine => OscillatorType::Sine,
            Waveform::Square => OscillatorType::Square,
            Waveform::Sawtooth => OscillatorType::Sawtooth,
            Waveform::Triangle => OscillatorType::Triangle,
        }
    }

    impl AudioOutput for WebAudioOutput {
        fn play(&mut self, burst: &ToneBurst) {
            // Exponential ramps reject a zero target
            if burst.is_silent() {
                return;
            }
            self.resume();

            let tone = burst.tone;
            let Some((osc, gain)) = self.create_osc(tone.freq, osc_type(tone.waveform)) else {
                return;
            };
            let t = self.ctx.current_time() + tone.delay as f64;
            let end = t + tone.duration as f64;

            gain.gain().set_value_at_time(burst.start_gain, t).ok();
            gain.gain()
                .exponential_ramp_to_value_at_time(burst.end_gain, end)
                .ok();

            osc.start_with_when(t).ok();
            osc.stop_with_when(end).ok();
        }
    }

    impl Drop for WebAudioOutput {
        fn drop(&mut self) {
            let _ = self.ctx.close();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn recording_engine() -> (AudioEngine, Rc<RefCell<Vec<ToneBurst>>>) {
        let out = MemoryOutput::new();
        let played = out.handle();
        let mut slot = Some(out);
        let engine = AudioEngine::new(move || {
            slot.take().map(|o| Box::new(o) as Box<dyn AudioOutput>)
        });
        (engine, played)
    }

    #[test]
    fn test_launch_cue_at_half_volume() {
        let (mut engine, played) = recording_engine();
        engine.set_volume(0.5);
        engine.enable();
        engine.play(AudioCue::Launch);

        let played = played.borrow();
        assert_eq!(played.len(), 1);
        let burst = played[0];
        assert_eq!(burst.tone.freq, 300.0);
        assert_eq!(burst.tone.duration, 0.2);
        assert_eq!(burst.tone.waveform, Waveform::Sawtooth);
        assert_eq!(burst.start_gain, 0.5 * CUE_GAIN);
    }

    #[test]
    fn test_disabled_engine_is_silent() {
        let (mut engine, played) = recording_engine();
        engine.set_volume(0.5);
        engine.enable();
        engine.play(AudioCue::Launch);
        engine.disable();
        engine.play(AudioCue::Launch);
        assert_eq!(played.borrow().len(), 1);
    }

    #[test]
    fn test_nothing_plays_before_enable() {
        let (mut engine, played) = recording_engine();
        engine.play(AudioCue::Detection);
        assert!(played.borrow().is_empty());
        assert!(!engine.is_audible());
    }

    #[test]
    fn test_output_initialized_once() {
        let calls = Rc::new(RefCell::new(0));
        let counter = calls.clone();
        let mut engine = AudioEngine::new(move || {
            *counter.borrow_mut() += 1;
            Some(Box::new(MemoryOutput::new()) as Box<dyn AudioOutput>)
        });
        engine.enable();
        engine.disable();
        engine.enable();
        engine.enable();
        assert_eq!(*calls.borrow(), 1);
    }

    #[test]
    fn test_failed_output_is_noop() {
        let mut engine = AudioEngine::new(|| None);
        engine.enable();
        assert!(engine.is_enabled());
        assert!(!engine.is_audible());
        engine.play(AudioCue::Interception);
    }

    #[test]
    fn test_cue_tables() {
        let detection = AudioCue::Detection.tones();
        assert_eq!(detection.len(), 2);
        assert_eq!((detection[0].freq, detection[1].freq), (800.0, 600.0));
        assert_eq!(detection[1].delay, 0.1);

        let interception = AudioCue::Interception.tones();
        let freqs: Vec<f32> = interception.iter().map(|t| t.freq).collect();
        assert_eq!(freqs, vec![200.0, 150.0, 100.0]);
        let waves: Vec<Waveform> = interception.iter().map(|t| t.waveform).collect();
        assert_eq!(
            waves,
            vec![Waveform::Square, Waveform::Triangle, Waveform::Sine]
        );
        assert_eq!(interception[2].delay, 0.1);
    }

    #[test]
    fn test_events_map_to_cues() {
        let (mut engine, played) = recording_engine();
        engine.enable();
        engine.handle_events(&[
            SimEvent::Detection { drone: 1 },
            SimEvent::Launch { missile: 2, target: 1 },
            SimEvent::Interception { missile: 2, drone: 1 },
        ]);
        assert_eq!(played.borrow().len(), 2 + 1 + 3);
    }

    #[test]
    fn test_envelope_decays() {
        let burst = ToneBurst::new(LAUNCH_TONES[0], 1.0);
        assert!((burst.gain_at(0.0) - CUE_GAIN).abs() < 1e-6);
        assert!((burst.gain_at(0.2) - ENVELOPE_FLOOR).abs() < 1e-6);
        assert_eq!(burst.gain_at(0.25), 0.0);

        let mut last = f32::INFINITY;
        for i in 0..=20 {
            let g = burst.gain_at(i as f32 * 0.01);
            assert!(g < last);
            last = g;
        }
    }

    #[test]
    fn test_quiet_envelope_still_decays() {
        let burst = ToneBurst::new(LAUNCH_TONES[0], 0.02);
        assert!(burst.end_gain < burst.start_gain);
        assert!(burst.gain_at(0.2) < burst.gain_at(0.0));
        assert!((burst.gain_at(0.0) - 0.02 * CUE_GAIN).abs() < 1e-6);

        let mut last = f32::INFINITY;
        for i in 0..=20 {
            let g = burst.gain_at(i as f32 * 0.01);
            assert!(g.is_finite() && g < last);
            last = g;
        }
    }

    #[test]
    fn test_zero_volume_envelope_is_silent() {
        let burst = ToneBurst::new(LAUNCH_TONES[0], 0.0);
        assert!(burst.is_silent());
        for i in 0..=20 {
            assert_eq!(burst.gain_at(i as f32 * 0.01), 0.0);
        }
        assert!(burst.render(8000).iter().all(|s| *s == 0.0));
    }

    #[test]
    fn test_render_length_and_bounds() {
        let burst = ToneBurst::new(DETECTION_TONES[0], 0.5);
        let samples = burst.render(8000);
        assert_eq!(samples.len(), 800);
        assert!(samples.iter().all(|s| s.abs() <= 0.5 * CUE_GAIN + 1e-6));
    }

    #[test]
    fn test_volume_clamped() {
        let mut engine = AudioEngine::silent();
        engine.set_volume(3.0);
        assert_eq!(engine.volume(), 1.0);
        engine.set_volume(-1.0);
        assert_eq!(engine.volume(), 0.0);
    }

    #[test]
    fn test_dispose_silences() {
        let (mut engine, played) = recording_engine();
        engine.enable();
        engine.dispose();
        engine.enable();
        engine.play(AudioCue::Launch);
        assert!(played.borrow().is_empty());
    }
}
