//! Orbit Trail entry point
//!
//! Handles platform-specific initialization and runs the game loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, KeyboardEvent, PointerEvent};

    use orbit_trail::highscore::LocalStorageHighScoreStore;
    use orbit_trail::renderer::{Viewport, build_frame, canvas};
    use orbit_trail::sim::GameStatus;
    use orbit_trail::{Game, GameConfig};

    /// LocalStorage key for an optional JSON config override
    const CONFIG_KEY: &str = "orbit_trail_config";

    /// Game plus the canvas it draws on
    struct App {
        game: Game,
        canvas: HtmlCanvasElement,
        ctx: CanvasRenderingContext2d,
    }

    impl App {
        fn frame(&mut self, timestamp: f64) {
            for event in self.game.frame(timestamp) {
                log::debug!("{:?}", event);
            }

            let (w, h) = (self.canvas.width() as f64, self.canvas.height() as f64);
            let commands = build_frame(
                &self.game.state,
                &self.game.config,
                self.game.game_time_ms(),
                Viewport::new(w as f32, h as f32),
            );
            if let Err(e) = canvas::execute(&self.ctx, w, h, &commands) {
                log::warn!("Render error: {:?}", e);
            }
        }

        fn is_running(&self) -> bool {
            self.game.state.status == GameStatus::Run
        }
    }

    fn load_config() -> GameConfig {
        let stored = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten()
            .and_then(|s| s.get_item(CONFIG_KEY).ok().flatten());

        match stored {
            Some(json) => GameConfig::from_json_str(&json).unwrap_or_else(|e| {
                log::warn!("Ignoring stored config: {}", e);
                GameConfig::default()
            }),
            None => GameConfig::default(),
        }
    }

    fn setup() -> Option<App> {
        let document = web_sys::window()?.document()?;
        let canvas = document
            .get_element_by_id("canvas")?
            .dyn_into::<HtmlCanvasElement>()
            .ok()?;
        let ctx = canvas
            .get_context("2d")
            .ok()??
            .dyn_into::<CanvasRenderingContext2d>()
            .ok()?;

        let seed = js_sys::Date::now() as u64;
        let game = Game::new(load_config(), seed, Box::new(LocalStorageHighScoreStore))
            .map_err(|e| log::error!("Invalid config: {}", e))
            .ok()?;
        Some(App { game, canvas, ctx })
    }

    pub fn run() {
        console_error_panic_hook::set_once();
        let _ = console_log::init_with_level(log::Level::Info);
        log::info!("Orbit Trail starting...");

        let Some(app) = setup() else {
            log::error!("Startup failed: no #canvas 2d context or invalid config");
            return;
        };
        let app = Rc::new(RefCell::new(app));

        setup_keyboard(app.clone());
        setup_pointer(app.clone());
        setup_auto_pause(app.clone());
        start_loop(app);
    }

    fn setup_keyboard(app: Rc<RefCell<App>>) {
        let Some(window) = web_sys::window() else {
            return;
        };

        {
            let app = app.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                match event.key().as_str() {
                    " " => {
                        event.prevent_default();
                        app.borrow_mut().game.input.primary = true;
                    }
                    "p" | "P" if !event.repeat() => {
                        app.borrow_mut().game.input.pause = true;
                    }
                    _ => {}
                }
            });
            let _ = window.add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
            if event.key() == " " {
                app.borrow_mut().game.input.primary = false;
            }
        });
        let _ = window.add_event_listener_with_callback("keyup", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    /// Touch / mouse: holding anywhere on the canvas acts like space
    fn setup_pointer(app: Rc<RefCell<App>>) {
        let canvas = app.borrow().canvas.clone();

        for (name, held) in [
            ("pointerdown", true),
            ("pointerup", false),
            ("pointercancel", false),
            ("pointerleave", false),
        ] {
            let app = app.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: PointerEvent| {
                event.prevent_default();
                app.borrow_mut().game.input.primary = held;
            });
            let _ = canvas.add_event_listener_with_callback(name, closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_auto_pause(app: Rc<RefCell<App>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let Some(document) = window.document() else {
            return;
        };

        // Visibility change (tab switch, minimize)
        {
            let app = app.clone();
            let document_clone = document.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                if document_clone.visibility_state() == web_sys::VisibilityState::Hidden {
                    let mut a = app.borrow_mut();
                    if a.is_running() {
                        a.game.input.pause = true;
                        a.game.input.primary = false;
                        log::info!("Auto-paused (tab hidden)");
                    }
                }
            });
            let _ = document.add_event_listener_with_callback(
                "visibilitychange",
                closure.as_ref().unchecked_ref(),
            );
            closure.forget();
        }

        // Window blur (click outside)
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::FocusEvent| {
            let mut a = app.borrow_mut();
            if a.is_running() {
                a.game.input.pause = true;
                a.game.input.primary = false;
                log::info!("Auto-paused (window blur)");
            }
        });
        let _ = window.add_event_listener_with_callback("blur", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn request_animation_frame(callback: &Closure<dyn FnMut(f64)>) {
        let requested = web_sys::window()
            .map(|w| w.request_animation_frame(callback.as_ref().unchecked_ref()).is_ok())
            .unwrap_or(false);
        if !requested {
            log::error!("requestAnimationFrame failed, game loop stopped");
        }
    }

    fn start_loop(app: Rc<RefCell<App>>) {
        let callback: Rc<RefCell<Option<Closure<dyn FnMut(f64)>>>> = Rc::new(RefCell::new(None));
        let next = callback.clone();

        *callback.borrow_mut() = Some(Closure::<dyn FnMut(f64)>::new(move |timestamp: f64| {
            app.borrow_mut().frame(timestamp);
            if let Some(cb) = next.borrow().as_ref() {
                request_animation_frame(cb);
            }
        }));

        if let Some(cb) = callback.borrow().as_ref() {
            request_animation_frame(cb);
        }
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() {
    wasm_game::run();
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use orbit_trail::GameConfig;

    env_logger::init();
    log::info!("Orbit Trail (native) starting...");
    log::info!("Native mode runs a headless demo - build for wasm32 to play");

    let config = match std::env::args().nth(1) {
        Some(path) => GameConfig::load_or_default(path),
        None => GameConfig::default(),
    };
    if let Err(e) = demo::run(config) {
        log::error!("Invalid config: {}", e);
        std::process::exit(1);
    }
}

#[cfg(not(target_arch = "wasm32"))]
mod demo {
    use orbit_trail::consts::DEMO_FRAME_MS;
    use orbit_trail::sim::{GameEvent, GameStatus};
    use orbit_trail::{ConfigError, Game, GameConfig, MemoryHighScoreStore};

    /// Runs to play before stopping
    const DEMO_RUNS: u32 = 3;
    /// Hard stop so a lucky autopilot can't run forever (10 minutes of frames)
    const DEMO_MAX_FRAMES: u32 = 60 * 60 * 10;

    /// Hold push while in the inner half of the annulus
    fn autopilot(game: &Game) -> bool {
        let lowest = game.config.lowest_player_distance_pc();
        let highest = game.config.highest_player_distance_pc();
        game.state.player.distance_pc < (lowest + highest) / 2.0
    }

    pub fn run(config: GameConfig) -> Result<(), ConfigError> {
        let mut game = Game::new(config, 42, Box::new(MemoryHighScoreStore::new()))?;
        let mut runs = 0;
        let mut timestamp = 0.0;

        for _ in 0..DEMO_MAX_FRAMES {
            timestamp += DEMO_FRAME_MS;
            game.input.primary = match game.state.status {
                GameStatus::Init | GameStatus::LostCanRestart => true,
                GameStatus::Run => autopilot(&game),
                GameStatus::Pause | GameStatus::Lost => false,
            };

            for event in game.frame(timestamp) {
                log::info!("{:?}", event);
                if let GameEvent::Lost { score } = event {
                    runs += 1;
                    println!("Run {}: score {}", runs, score);
                }
            }
            if runs >= DEMO_RUNS {
                break;
            }
        }

        println!(
            "Demo finished after {} run(s); high score {}",
            runs,
            game.state.high_score.unwrap_or(0)
        );
        Ok(())
    }
}
