//! Astro Gap entry point
//!
//! Handles platform-specific initialization and runs the game loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{AddEventListenerOptions, Document, KeyboardEvent, TouchEvent};

    use astro_gap::driver::FrameDriver;
    use astro_gap::highscores::HighScoreStore;
    use astro_gap::persistence::{KeyValueStore, LocalStorage, MemoryStore};
    use astro_gap::platform::{RawInput, map_input, time_seed};
    use astro_gap::sim::{GamePhase, Playfield};
    use astro_gap::snapshot::{Scoreboard, Snapshot};
    use astro_gap::tuning::Tuning;

    // Drawing happens in page script; it receives one JSON snapshot per frame
    #[wasm_bindgen(inline_js = "
        export function render_snapshot(json) {
            if (typeof window.renderAstroGap === 'function') {
                window.renderAstroGap(JSON.parse(json));
            }
        }

        export function tuning_overrides() {
            return window.astroGapTuning ? JSON.stringify(window.astroGapTuning) : null;
        }
    ")]
    extern "C" {
        fn render_snapshot(json: &str);
        fn tuning_overrides() -> Option<String>;
    }

    /// Game instance holding the driver and DOM bookkeeping
    struct Game {
        driver: FrameDriver,
        // Track phase to toggle overlays only on transitions
        last_phase: GamePhase,
        last_countdown: Option<u32>,
    }

    impl Game {
        fn new(driver: FrameDriver) -> Self {
            Self {
                driver,
                last_phase: GamePhase::Idle,
                last_countdown: None,
            }
        }

        /// Run one frame and hand the result to the page
        fn frame(&mut self, time: f64) {
            let snapshot = self.driver.on_frame(time);
            match snapshot.to_json() {
                Ok(json) => render_snapshot(&json),
                Err(e) => log::warn!("Snapshot serialization failed: {}", e),
            }
            update_scoreboard(&snapshot.scoreboard);

            if snapshot.phase != self.last_phase {
                self.on_phase_change(&snapshot);
                self.last_phase = snapshot.phase;
            }
            if snapshot.countdown != self.last_countdown {
                if let Some(left) = snapshot.countdown {
                    set_text(&document(), "countdown-timer", left);
                }
                self.last_countdown = snapshot.countdown;
            }
        }

        fn on_phase_change(&self, snapshot: &Snapshot) {
            let document = document();
            match snapshot.phase {
                GamePhase::GameOver => {
                    set_text(&document, "final-score", snapshot.scoreboard.score);
                    set_text(&document, "end-high-score", snapshot.scoreboard.high_score);
                    set_visible(&document, "game-over", true);
                }
                GamePhase::Running => {
                    set_visible(&document, "game-over", false);
                    set_visible(&document, "start-screen", false);
                    set_visible(&document, "score-display", true);
                }
                GamePhase::Idle => {
                    set_visible(&document, "game-over", false);
                    set_visible(&document, "start-screen", true);
                }
            }
        }
    }

    fn document() -> Document {
        web_sys::window()
            .and_then(|w| w.document())
            .expect("no document")
    }

    fn now_ms() -> f64 {
        web_sys::window()
            .and_then(|w| w.performance())
            .map(|p| p.now())
            .unwrap_or_else(js_sys::Date::now)
    }

    fn set_text(document: &Document, id: &str, value: u32) {
        if let Some(el) = document.get_element_by_id(id) {
            el.set_text_content(Some(&value.to_string()));
        }
    }

    fn set_visible(document: &Document, id: &str, visible: bool) {
        if let Some(el) = document.get_element_by_id(id) {
            let classes = el.class_list();
            let _ = if visible {
                classes.remove_1("hidden")
            } else {
                classes.add_1("hidden")
            };
        }
    }

    fn update_scoreboard(board: &Scoreboard) {
        let document = document();
        set_text(&document, "current-score", board.score);
        set_text(&document, "high-score", board.high_score);
        set_text(&document, "bullet-count", board.ammo);
    }

    fn open_store() -> Box<dyn KeyValueStore> {
        match LocalStorage::open() {
            Ok(storage) => Box::new(storage),
            Err(e) => {
                log::warn!("{}; high score will not persist", e);
                Box::new(MemoryStore::new())
            }
        }
    }

    pub fn run() {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).expect("Failed to init logger");

        log::info!("Astro Gap starting...");

        let tuning = tuning_overrides()
            .map(|json| Tuning::from_json_or_default(&json))
            .unwrap_or_default();

        let seed = time_seed();
        let driver = FrameDriver::new(
            Playfield::REFERENCE,
            tuning,
            seed,
            HighScoreStore::new(open_store()),
        );
        update_scoreboard(&driver.scoreboard());
        let game = Rc::new(RefCell::new(Game::new(driver)));

        setup_input_handlers(game.clone());
        setup_buttons(game.clone());
        setup_timers(game.clone());

        // Start game loop (the start screen animates behind the overlay)
        request_animation_frame(game);

        log::info!("Astro Gap running!");
    }

    fn push_raw(game: &Rc<RefCell<Game>>, raw: RawInput) {
        if let Some(action) = map_input(&raw) {
            game.borrow_mut().driver.push_input(action);
        }
    }

    fn setup_input_handlers(game: Rc<RefCell<Game>>) {
        let document = document();

        // Arrow keys
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                push_raw(&game, RawInput::Key(event.code()));
            });
            let _ = document
                .add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Touches lift the ship and must not scroll the page
        let options = AddEventListenerOptions::new();
        options.set_passive(false);
        {
            let closure = Closure::<dyn FnMut(_)>::new(move |event: TouchEvent| {
                event.prevent_default();
                push_raw(&game, RawInput::TouchStart);
            });
            let _ = document.add_event_listener_with_callback_and_add_event_listener_options(
                "touchstart",
                closure.as_ref().unchecked_ref(),
                &options,
            );
            closure.forget();
        }
        for name in ["touchmove", "touchend"] {
            let closure = Closure::<dyn FnMut(_)>::new(move |event: TouchEvent| {
                event.prevent_default();
            });
            let _ = document.add_event_listener_with_callback_and_add_event_listener_options(
                name,
                closure.as_ref().unchecked_ref(),
                &options,
            );
            closure.forget();
        }
    }

    fn setup_buttons(game: Rc<RefCell<Game>>) {
        let document = document();

        let buttons: [(&str, fn(&mut FrameDriver)); 2] = [
            ("start-button", |d| {
                d.start(now_ms());
            }),
            ("restart-button", |d| d.restart(now_ms())),
        ];

        for (id, action) in buttons {
            let Some(btn) = document.get_element_by_id(id) else {
                log::warn!("Missing #{}", id);
                continue;
            };
            // Click and touchend both fire on mobile; the driver ignores the
            // second start, and a double restart is harmless
            for event_name in ["click", "touchend"] {
                let game = game.clone();
                let closure = Closure::<dyn FnMut(_)>::new(move |event: web_sys::Event| {
                    event.prevent_default();
                    let mut g = game.borrow_mut();
                    action(&mut g.driver);
                    update_scoreboard(&g.driver.scoreboard());
                });
                let _ = btn.add_event_listener_with_callback(
                    event_name,
                    closure.as_ref().unchecked_ref(),
                );
                closure.forget();
            }
        }
    }

    /// Auto-fire runs on wall-clock time, independent of the frame rate.
    /// The restart countdown is paced by the driver from frame timestamps.
    fn setup_timers(game: Rc<RefCell<Game>>) {
        let window = web_sys::window().expect("no window");
        let fire_ms = game.borrow().driver.state().tuning.fire_interval_ms;

        let closure = Closure::<dyn FnMut()>::new(move || {
            let mut g = game.borrow_mut();
            if g.driver.on_fire_timer() {
                update_scoreboard(&g.driver.scoreboard());
            }
        });
        let _ = window.set_interval_with_callback_and_timeout_and_arguments_0(
            closure.as_ref().unchecked_ref(),
            fire_ms as i32,
        );
        closure.forget();
    }

    fn request_animation_frame(game: Rc<RefCell<Game>>) {
        let window = web_sys::window().expect("no window");
        let closure = Closure::once(move |time: f64| {
            game_loop(game, time);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn game_loop(game: Rc<RefCell<Game>>, time: f64) {
        game.borrow_mut().frame(time);
        request_animation_frame(game);
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() {
    wasm_game::run();
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Astro Gap (native) starting...");
    log::info!("Native mode runs a headless autopilot session - build for wasm32 to play");

    let seed = std::env::args()
        .nth(1)
        .and_then(|arg| arg.parse().ok())
        .unwrap_or_else(astro_gap::platform::time_seed);
    headless::run(seed);
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

#[cfg(not(target_arch = "wasm32"))]
mod headless {
    use astro_gap::driver::{FixedInterval, FrameDriver, Lifecycle};
    use astro_gap::highscores::HighScoreStore;
    use astro_gap::persistence::MemoryStore;
    use astro_gap::sim::{GameState, InputAction, Playfield};
    use astro_gap::tuning::Tuning;

    /// Two minutes at 60 Hz
    const MAX_FRAMES: u32 = 60 * 120;

    /// Play one session with a simple autopilot on simulated wall-clock time
    pub fn run(seed: u64) {
        let mut driver = FrameDriver::new(
            Playfield::REFERENCE,
            Tuning::default(),
            seed,
            HighScoreStore::new(Box::new(MemoryStore::new())),
        );
        let frame_ms = driver.state().tuning.reference_frame_ms();
        let mut fire_timer = FixedInterval::new(driver.state().tuning.fire_interval_ms);

        let mut now = 0.0;
        driver.start(now);
        fire_timer.due(now);

        let mut frames = 0;
        while frames < MAX_FRAMES {
            now += frame_ms;
            for _ in 0..fire_timer.due(now) {
                driver.on_fire_timer();
            }
            if let Some(action) = autopilot(driver.state()) {
                driver.push_input(action);
            }
            driver.on_frame(now);
            frames += 1;
            if matches!(driver.lifecycle(), Lifecycle::GameOver { .. }) {
                break;
            }
        }

        let board = driver.scoreboard();
        println!(
            "Seed {}: {} frames, score {}, best {}, ammo {}",
            seed, frames, board.score, board.high_score, board.ammo
        );
    }

    /// Steer the ship's centre toward the middle of the nearest gap ahead
    fn autopilot(state: &GameState) -> Option<InputAction> {
        let ship = &state.ship;
        let target = state
            .obstacles
            .iter()
            .filter(|o| o.right() >= ship.pos.x)
            .min_by(|a, b| a.x.total_cmp(&b.x))
            .map(|o| (o.gap.top + o.gap.bottom) / 2.0)
            .unwrap_or(state.field.height / 2.0);

        let centre = ship.pos.y + ship.size.y / 2.0;
        if centre > target + ship.size.y / 2.0 && ship.velocity > 0.0 {
            Some(InputAction::Lift)
        } else if centre < target - ship.size.y * 2.0 && ship.velocity < 0.0 {
            Some(InputAction::DownForce)
        } else {
            None
        }
    }
}
