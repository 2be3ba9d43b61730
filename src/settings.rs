//! Panel settings and preferences
//!
//! Persisted in LocalStorage. Sound itself is never persisted as "on":
//! browsers only allow audio after a user gesture, so every visit starts
//! muted and the toggle has to be pressed again.

use serde::{Deserialize, Serialize};

use crate::renderer::RenderOptions;

/// Panel settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === Audio ===
    /// Cue volume (0.0 - 1.0)
    pub volume: f32,

    // === HUD ===
    /// Show the threat/intercept/missile counters
    pub show_status: bool,

    // === Accessibility ===
    /// Reduced motion (no pulse, blink or ping animations)
    pub reduced_motion: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            volume: 0.5,
            show_status: true,
            reduced_motion: false,
        }
    }
}

impl Settings {
    /// Set volume, clamped to 0.0 - 1.0
    pub fn set_volume(&mut self, volume: f32) {
        self.volume = if volume.is_nan() {
            0.0
        } else {
            volume.clamp(0.0, 1.0)
        };
    }

    pub fn render_options(&self) -> RenderOptions {
        RenderOptions {
            reduced_motion: self.reduced_motion,
        }
    }

    /// Parse settings JSON, repairing out-of-range values
    pub fn from_json(json: &str) -> Option<Self> {
        let mut settings: Self = serde_json::from_str(json).ok()?;
        settings.set_volume(settings.volume);
        Some(settings)
    }

    /// LocalStorage key
    #[cfg(target_arch = "wasm32")]
    const STORAGE_KEY: &'static str = "aegis_intercept_settings";

    /// Load settings from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY) {
                if let Some(settings) = Self::from_json(&json) {
                    log::info!("Loaded settings from LocalStorage");
                    return settings;
                }
            }
        }

        log::info!("Using default settings");
        Self::default()
    }

    /// Save settings to LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn save(&self) {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(json) = serde_json::to_string(self) {
                let _ = storage.set_item(Self::STORAGE_KEY, &json);
                log::info!("Settings saved");
            }
        }
    }

    /// Native stubs
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        Self::default()
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn save(&self) {
        // No-op for native
    }
}
