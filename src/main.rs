//! Starfall entry point
//!
//! Handles platform-specific initialization and runs the game loop. No
//! gameplay decisions happen here: the shell forwards key edges to the
//! simulation and paints whatever snapshot the tick hands back.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, KeyboardEvent};

    use starfall::config::Config;
    use starfall::consts::*;
    use starfall::sim::{GamePhase, GameState, InputState, Key, PlayerSprite, tick};

    /// Game instance holding all state
    struct Game {
        state: GameState,
        input: InputState,
        ctx: Option<CanvasRenderingContext2d>,
        accumulator: f32,
        last_time: f64,
    }

    impl Game {
        fn new(seed: u64, config: Config) -> Self {
            Self {
                state: GameState::new(seed, config),
                input: InputState::new(),
                ctx: None,
                accumulator: 0.0,
                last_time: 0.0,
            }
        }

        /// Run simulation substeps for one frame
        fn update(&mut self, dt: f32) {
            let dt = dt.min(0.1);
            self.accumulator += dt;

            let mut substeps = 0;
            while self.accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
                let input = self.input.drain_tick();
                tick(&mut self.state, &input);
                self.accumulator -= SIM_DT;
                substeps += 1;
            }
        }

        /// Paint the current snapshot, back to front
        fn render(&self) {
            let Some(ctx) = &self.ctx else {
                return;
            };
            let state = &self.state;

            ctx.set_fill_style_str("#000");
            ctx.fill_rect(0.0, 0.0, FIELD_WIDTH as f64, FIELD_HEIGHT as f64);

            for particle in &state.particles {
                ctx.set_fill_style_str(particle_color(particle.color));
                ctx.fill_rect(
                    particle.pos.x as f64,
                    particle.pos.y as f64,
                    particle.size.x as f64,
                    particle.size.y as f64,
                );
            }

            let (left, right) = self.input.held();
            let ship_color = match state.player_sprite(left, right) {
                PlayerSprite::Wrecked => "#f44336",
                PlayerSprite::BankingLeft | PlayerSprite::BankingRight => "#81d4fa",
                PlayerSprite::Idle => "#4fc3f7",
            };
            ctx.set_fill_style_str(ship_color);
            ctx.fill_rect(
                state.player.pos.x as f64,
                state.player.pos.y as f64,
                SHIP_SIZE as f64,
                SHIP_SIZE as f64,
            );

            for bullet in &state.bullets {
                let color = if bullet.is_live() { "#aeea00" } else { "#fff176" };
                ctx.set_fill_style_str(color);
                ctx.fill_rect(
                    bullet.pos.x as f64,
                    bullet.pos.y as f64,
                    BULLET_WIDTH as f64,
                    BULLET_HEIGHT as f64,
                );
            }

            for enemy in &state.enemies {
                ctx.set_fill_style_str("#ab47bc");
                ctx.fill_rect(
                    enemy.pos.x as f64,
                    enemy.pos.y as f64,
                    SHIP_SIZE as f64,
                    SHIP_SIZE as f64,
                );
                ctx.set_fill_style_str("#ff7043");
                for bullet in &enemy.bullets {
                    ctx.fill_rect(
                        bullet.pos.x as f64,
                        bullet.pos.y as f64,
                        BULLET_WIDTH as f64,
                        BULLET_HEIGHT as f64,
                    );
                }
            }

            ctx.set_fill_style_str("#8d6e63");
            for rock in &state.rocks {
                ctx.fill_rect(
                    rock.pos.x as f64,
                    rock.pos.y as f64,
                    SHIP_SIZE as f64,
                    SHIP_SIZE as f64,
                );
            }
        }

        /// Mirror score and phase into the DOM
        fn update_hud(&self) {
            let Some(document) = web_sys::window().and_then(|w| w.document()) else {
                return;
            };

            if let Some(el) = document.get_element_by_id("hud-score") {
                el.set_text_content(Some(&self.state.score.to_string()));
            }

            if let Some(el) = document.get_element_by_id("overlay") {
                let message = match self.state.phase {
                    GamePhase::NotStarted => "Press Enter to start",
                    GamePhase::Over => "Game over - press R to restart",
                    GamePhase::Running => "",
                };
                el.set_text_content(Some(message));
            }
        }
    }

    /// Map a DOM key name onto a simulation key
    fn key_from_name(name: &str) -> Option<Key> {
        match name {
            "ArrowLeft" => Some(Key::Left),
            "ArrowRight" => Some(Key::Right),
            " " | "ArrowUp" => Some(Key::Fire),
            "Enter" => Some(Key::Start),
            "r" | "R" => Some(Key::Restart),
            _ => None,
        }
    }

    pub fn run() {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).expect("Failed to init logger");

        log::info!("Starfall starting...");

        let window = web_sys::window().expect("no window");
        let document = window.document().expect("no document");

        let canvas: HtmlCanvasElement = document
            .get_element_by_id("canvas")
            .expect("no canvas")
            .dyn_into()
            .expect("not a canvas");
        canvas.set_width(FIELD_WIDTH as u32);
        canvas.set_height(FIELD_HEIGHT as u32);

        let seed = js_sys::Date::now() as u64;
        let config = Config::load();
        let game = Rc::new(RefCell::new(Game::new(seed, config)));

        log::info!("Game initialized with seed: {}", seed);

        // A missing 2d context degrades to a blank page with a live HUD
        // rather than a crash
        match canvas
            .get_context("2d")
            .ok()
            .flatten()
            .and_then(|obj| obj.dyn_into::<CanvasRenderingContext2d>().ok())
        {
            Some(ctx) => game.borrow_mut().ctx = Some(ctx),
            None => log::error!("Canvas 2d context unavailable, rendering disabled"),
        }

        setup_input_handlers(game.clone());
        request_animation_frame(game);

        log::info!("Starfall running!");
    }

    fn setup_input_handlers(game: Rc<RefCell<Game>>) {
        let window = web_sys::window().unwrap();

        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                if let Some(key) = key_from_name(&event.key()) {
                    event.prevent_default();
                    game.borrow_mut().input.key_down(key);
                }
            });
            let _ = window
                .add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        {
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                if let Some(key) = key_from_name(&event.key()) {
                    game.borrow_mut().input.key_up(key);
                }
            });
            let _ = window
                .add_event_listener_with_callback("keyup", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn request_animation_frame(game: Rc<RefCell<Game>>) {
        let window = web_sys::window().unwrap();
        let closure = Closure::once(move |time: f64| {
            game_loop(game, time);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn game_loop(game: Rc<RefCell<Game>>, time: f64) {
        {
            let mut g = game.borrow_mut();

            let dt = if g.last_time > 0.0 {
                ((time - g.last_time) / 1000.0) as f32
            } else {
                SIM_DT
            };
            g.last_time = time;

            g.update(dt);
            g.render();
            g.update_hud();
        }

        request_animation_frame(game);
    }

    fn particle_color(index: u32) -> &'static str {
        match index {
            0 => "#37474f",
            1 => "#546e7a",
            2 => "#78909c",
            _ => "#b0bec5",
        }
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
    log::info!("Starfall (native) starting...");
    log::info!("Native mode is headless - run with `trunk serve` for the web version");

    smoke_run();
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

/// Drive ten simulated seconds with scripted input and report the outcome
#[cfg(not(target_arch = "wasm32"))]
fn smoke_run() {
    use starfall::config::Config;
    use starfall::sim::{GameState, InputState, Key, tick};

    let mut state = GameState::new(0xC0FFEE, Config::default());
    let mut input = InputState::new();

    input.key_down(Key::Start);
    for i in 0u32..600 {
        if i % 10 == 0 {
            input.key_down(Key::Fire);
        }
        if i % 40 == 0 {
            input.key_down(Key::Right);
            input.key_up(Key::Left);
        } else if i % 40 == 20 {
            input.key_up(Key::Right);
            input.key_down(Key::Left);
        }
        let frame = input.drain_tick();
        tick(&mut state, &frame);
    }

    println!(
        "10s headless run: phase {:?}, score {}, {} enemies, {} rocks, {} bullets in flight",
        state.phase,
        state.score,
        state.enemies.len(),
        state.rocks.len(),
        state.bullets.len()
    );
}
