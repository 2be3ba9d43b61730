//! AEGIS Intercept entry point
//!
//! Handles platform-specific initialization and drives the simulation
//! session from the host's frame clock.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_panel {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{Document, HtmlInputElement};

    use aegis_intercept::consts::MAX_FRAME_MS;
    use aegis_intercept::{AudioEngine, Session, Settings, Tuning};

    /// Panel instance: session plus host-side presentation state
    struct Panel {
        session: Session,
        settings: Settings,
        document: Document,
        sound_on: bool,
        last_time: f64,
    }

    impl Panel {
        fn new(document: Document, seed: u64) -> Self {
            let settings = Settings::load();
            let tuning = load_tuning(&document);
            let mut session = Session::create(tuning, seed, AudioEngine::platform());
            session.set_volume(settings.volume);
            Self {
                session,
                settings,
                document,
                sound_on: false,
                last_time: 0.0,
            }
        }

        /// Run simulation for the elapsed frame time
        fn update(&mut self, time: f64) {
            let dt = if self.last_time > 0.0 {
                (time - self.last_time).max(0.0) as u64
            } else {
                0
            };
            self.last_time = time;
            self.session.advance(dt.min(MAX_FRAME_MS));
        }

        /// Render the current frame into the panel container
        fn render(&self) {
            if let Some(el) = self.document.get_element_by_id("interception-panel") {
                el.set_inner_html(&self.session.render_svg(&self.settings.render_options()));
            }
        }

        /// Update status readout elements in DOM
        fn update_hud(&self) {
            let Some(panel) = self.document.get_element_by_id("status-panel") else {
                return;
            };
            if !self.settings.show_status {
                let _ = panel.set_attribute("class", "hidden");
                return;
            }
            let _ = panel.set_attribute("class", "");

            let status = self.session.snapshot().status;
            for (id, value) in [
                ("status-threats", status.threats),
                ("status-intercepted", status.intercepted),
                ("status-missiles", status.missiles_in_flight),
            ] {
                if let Some(el) = self.document.get_element_by_id(id) {
                    el.set_text_content(Some(&value.to_string()));
                }
            }
        }

        fn toggle_sound(&mut self) {
            self.sound_on = !self.sound_on;
            self.session.set_sound_enabled(self.sound_on);
            if let Some(btn) = self.document.get_element_by_id("sound-toggle") {
                btn.set_text_content(Some(if self.sound_on { "\u{1f50a}" } else { "\u{1f507}" }));
            }
            log::info!("Sound {}", if self.sound_on { "on" } else { "off" });
        }

        fn set_volume(&mut self, volume: f32) {
            self.settings.set_volume(volume);
            self.session.set_volume(self.settings.volume);
            self.settings.save();
        }
    }

    /// Optional tuning override from `<script id="aegis-tuning" type="application/json">`
    fn load_tuning(document: &Document) -> Tuning {
        document
            .get_element_by_id("aegis-tuning")
            .and_then(|el| el.text_content())
            .map(|json| Tuning::from_json_or_default(&json))
            .unwrap_or_default()
    }

    pub fn run() {
        console_error_panic_hook::set_once();
        if console_log::init_with_level(log::Level::Info).is_err() {
            return;
        }

        log::info!("AEGIS Intercept starting...");

        let Some(document) = web_sys::window().and_then(|w| w.document()) else {
            log::error!("No document - panel not started");
            return;
        };

        let seed = js_sys::Date::now() as u64;
        let panel = Rc::new(RefCell::new(Panel::new(document.clone(), seed)));

        setup_sound_controls(&document, panel.clone());
        setup_teardown(panel.clone());

        request_animation_frame(panel);

        log::info!("AEGIS Intercept running!");
    }

    fn request_animation_frame(panel: Rc<RefCell<Panel>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let closure = Closure::once(move |time: f64| {
            panel_loop(panel, time);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn panel_loop(panel: Rc<RefCell<Panel>>, time: f64) {
        {
            let mut p = panel.borrow_mut();
            if p.session.is_disposed() {
                return;
            }
            p.update(time);
            p.render();
            p.update_hud();
        }

        request_animation_frame(panel);
    }

    fn setup_sound_controls(document: &Document, panel: Rc<RefCell<Panel>>) {
        if let Some(btn) = document.get_element_by_id("sound-toggle") {
            let panel = panel.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                panel.borrow_mut().toggle_sound();
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        if let Some(input) = document
            .get_element_by_id("volume")
            .and_then(|el| el.dyn_into::<HtmlInputElement>().ok())
        {
            input.set_value(&panel.borrow().settings.volume.to_string());
            let slider = input.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                let volume = slider.value().parse::<f32>().unwrap_or(0.0);
                panel.borrow_mut().set_volume(volume);
            });
            let _ = input.add_event_listener_with_callback("input", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    /// Dispose the session when the page goes away
    fn setup_teardown(panel: Rc<RefCell<Panel>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
            panel.borrow_mut().session.dispose();
        });
        let _ = window.add_event_listener_with_callback("pagehide", closure.as_ref().unchecked_ref());
        closure.forget();
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() {
    wasm_panel::run();
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

/// Headless run: simulate at ~60 fps, log events, print the last frame as SVG
#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use aegis_intercept::sim::SimEvent;
    use aegis_intercept::{AudioEngine, Session, Settings, Tuning};

    const FRAME_MS: u64 = 16;
    const RUN_MS: u64 = 30_000;

    env_logger::init();
    log::info!("AEGIS Intercept (native) starting...");

    let mut args = std::env::args().skip(1);
    let seed = args.next().and_then(|s| s.parse().ok()).unwrap_or(0xAE615);
    let tuning = args
        .next()
        .and_then(|path| std::fs::read_to_string(&path).ok())
        .map(|json| Tuning::from_json_or_default(&json))
        .unwrap_or_default();

    let settings = Settings::load();
    let mut session = Session::create(tuning, seed, AudioEngine::platform());
    session.set_volume(settings.volume);
    session.set_sound_enabled(true);

    let mut elapsed = 0;
    while elapsed < RUN_MS {
        for event in session.advance(FRAME_MS) {
            match event {
                SimEvent::Detection { drone } => log::info!("Threat detected: drone {}", drone),
                SimEvent::Launch { missile, target } => {
                    log::info!("Missile {} away at drone {}", missile, target)
                }
                SimEvent::Interception { missile, drone } => {
                    log::info!("Drone {} intercepted by missile {}", drone, missile)
                }
            }
        }
        elapsed += FRAME_MS;
    }

    let status = session.snapshot().status;
    log::info!(
        "Threats: {}  Intercepted: {}  Missiles in flight: {}",
        status.threats,
        status.intercepted,
        status.missiles_in_flight
    );
    println!("{}", session.render_svg(&settings.render_options()));

    session.dispose();
}
