//! Coin Cannon entry point
//!
//! On the web: wires DOM input to the engine and drives it from
//! `requestAnimationFrame`. Natively: plays a scripted headless session.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::MouseEvent;

    use coin_cannon::persistence::LocalStore;
    use coin_cannon::platform::web::DomPresenter;
    use coin_cannon::{Engine, GameEvent, Tuning};

    type WebEngine = Engine<DomPresenter, LocalStore>;

    /// Game instance: the engine plus frame timing
    struct Game {
        engine: WebEngine,
        last_time: f64,
    }

    impl Game {
        fn frame(&mut self, time: f64) {
            let dt = if self.last_time > 0.0 {
                time - self.last_time
            } else {
                0.0
            };
            self.last_time = time;
            self.engine.advance(dt);

            for event in self.engine.drain_events() {
                if let GameEvent::GameOver { coins } = event {
                    log::info!("Game over at {} coins, session restarted", coins);
                }
            }
        }
    }

    pub fn run() -> Result<(), JsValue> {
        console_error_panic_hook::set_once();
        if let Err(e) = console_log::init_with_level(log::Level::Info) {
            web_sys::console::warn_1(&JsValue::from_str(&e.to_string()));
        }

        log::info!("Coin Cannon starting...");

        let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;
        let document = window
            .document()
            .ok_or_else(|| JsValue::from_str("no document"))?;

        let presenter = DomPresenter::new(document)?;
        let seed = js_sys::Date::now() as u64;
        let engine = Engine::new(presenter, LocalStore, Tuning::load(), seed);

        let game = Rc::new(RefCell::new(Game {
            engine,
            last_time: 0.0,
        }));

        setup_input_handlers(game.clone());
        request_animation_frame(game);

        log::info!("Coin Cannon running!");
        Ok(())
    }

    fn setup_input_handlers(game: Rc<RefCell<Game>>) {
        let (background, pause_button) = {
            let g = game.borrow();
            let presenter = g.engine.presenter();
            (presenter.background().clone(), presenter.pause_button().clone())
        };

        // Pointer move - cannon tracks the pointer across the play area
        {
            let game = game.clone();
            let target = background.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: MouseEvent| {
                let rect = target.get_bounding_client_rect();
                let x = event.client_x() as f32 - rect.left() as f32;
                game.borrow_mut().engine.pointer_moved(x);
            });
            let _ = background
                .add_event_listener_with_callback("mousemove", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Click - fire
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                game.borrow_mut().engine.fire();
            });
            let _ = background
                .add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Pause button
        {
            let closure = Closure::<dyn FnMut(_)>::new(move |event: MouseEvent| {
                // Keep the click from reaching the play area and firing
                event.stop_propagation();
                let phase = game.borrow_mut().engine.toggle_pause();
                log::info!("Pause toggled: {:?}", phase);
            });
            let _ = pause_button
                .add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn request_animation_frame(game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
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
pub fn wasm_main() -> Result<(), JsValue> {
    wasm_game::run()
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Coin Cannon (native) starting...");
    log::info!("Native mode plays a headless session - run with `trunk serve` for the web version");

    let seed = std::env::args()
        .nth(1)
        .and_then(|s| s.parse::<u64>().ok())
        .unwrap_or(42);
    let tuning = native::load_tuning();

    let summary = native::autoplay(seed, tuning, 60_000.0);
    println!(
        "\nSeed {}: {} coins, {} lives left, {} game over(s), best {}",
        seed, summary.coins, summary.lives, summary.game_overs, summary.best
    );
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

#[cfg(not(target_arch = "wasm32"))]
mod native {
    use coin_cannon::persistence::MemoryStore;
    use coin_cannon::platform::HeadlessPresenter;
    use coin_cannon::{Engine, GameEvent, Tuning};

    /// Frame length of the scripted session (ms)
    const FRAME_MS: f64 = 16.0;
    /// Frames between shots
    const FIRE_EVERY: u32 = 12;

    pub struct Summary {
        pub coins: u64,
        pub lives: u8,
        pub game_overs: u32,
        pub best: u64,
    }

    /// Tuning from the JSON file named by `COIN_CANNON_TUNING`, if any
    pub fn load_tuning() -> Tuning {
        let Ok(path) = std::env::var("COIN_CANNON_TUNING") else {
            return Tuning::default();
        };
        match std::fs::read_to_string(&path) {
            Ok(json) => match Tuning::from_json(&json) {
                Ok(tuning) => {
                    log::info!("Loaded tuning from {}", path);
                    tuning
                }
                Err(e) => {
                    log::warn!("Ignoring tuning in {}: {}", path, e);
                    Tuning::default()
                }
            },
            Err(e) => {
                log::warn!("Could not read {}: {}", path, e);
                Tuning::default()
            }
        }
    }

    /// Play for `duration_ms`, keeping the cannon under the lowest ball and
    /// firing at a steady rate
    pub fn autoplay(seed: u64, tuning: Tuning, duration_ms: f64) -> Summary {
        let mut engine = Engine::new(HeadlessPresenter::default(), MemoryStore::new(), tuning, seed);
        let mut game_overs = 0;
        let mut frame = 0u32;

        while engine.now_ms() < duration_ms {
            let target = engine
                .state()
                .balls
                .iter()
                .max_by(|a, b| a.pos.y.total_cmp(&b.pos.y))
                .map(|ball| ball.pos.x + ball.radius);
            if let Some(x) = target {
                engine.pointer_moved(x);
            }
            if frame % FIRE_EVERY == 0 {
                engine.fire();
            }

            engine.advance(FRAME_MS);
            frame += 1;

            for event in engine.drain_events() {
                match event {
                    GameEvent::NewHighScore { score } => log::debug!("New high score {}", score),
                    GameEvent::LifeLost { lives } => log::info!("Life lost, {} left", lives),
                    GameEvent::GameOver { coins } => {
                        game_overs += 1;
                        log::info!("Game over with {} coins", coins);
                    }
                    _ => {}
                }
            }
        }

        match serde_json::to_string(engine.state()) {
            Ok(json) => log::debug!("Final state: {}", json),
            Err(e) => log::warn!("Could not serialize final state: {}", e),
        }

        Summary {
            coins: engine.state().coins,
            lives: engine.state().lives,
            game_overs,
            best: engine.high_score().best,
        }
    }
}
