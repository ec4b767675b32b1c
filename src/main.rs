//! Jungle Jump entry point
//!
//! Browser: one session update and one draw per animation frame.
//! Native: a headless scripted run through the first level.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;

    use glam::DVec2;
    use wasm_bindgen::prelude::*;
    use web_sys::{HtmlCanvasElement, KeyboardEvent, MouseEvent};

    use jungle_jump::audio::{AudioManager, AudioSink};
    use jungle_jump::consts::*;
    use jungle_jump::levels::LevelSet;
    use jungle_jump::platform::KeyboardState;
    use jungle_jump::platform::input::is_game_key;
    use jungle_jump::renderer::{CanvasRenderer, FrameView, RenderSink, play_again_hit};
    use jungle_jump::sim::SessionStatus;
    use jungle_jump::{GameSession, PhysicsTuning, ResetTicket, Settings};

    /// Game instance holding all state
    struct Game {
        session: GameSession,
        keyboard: KeyboardState,
        renderer: CanvasRenderer,
        audio: AudioManager,
        settings: Settings,
    }

    impl Game {
        /// Advance one frame and draw it. Returns a reset to schedule, if any.
        fn frame(&mut self, time: f64) -> Option<ResetTicket> {
            let input = self.keyboard.snapshot();
            let report = self.session.update(&input);

            for cue in &report.cues {
                self.audio.play(*cue);
            }

            let view = FrameView::from_session(&self.session, time, self.settings.reduced_motion);
            self.renderer.render(&view);

            report.reset
        }
    }

    pub fn run() {
        console_error_panic_hook::set_once();
        let _ = console_log::init_with_level(log::Level::Info);

        log::info!("Jungle Jump starting...");

        let Some(document) = web_sys::window().and_then(|w| w.document()) else {
            log::error!("No document, cannot start");
            return;
        };

        let Some(canvas) = document
            .get_element_by_id("canvas")
            .and_then(|el| el.dyn_into::<HtmlCanvasElement>().ok())
        else {
            log::error!("No #canvas element, cannot start");
            return;
        };

        let settings = Settings::from_optional_json(canvas.get_attribute("data-settings").as_deref());
        let tuning = PhysicsTuning::from_optional_json(canvas.get_attribute("data-tuning").as_deref());

        let levels = match LevelSet::builtin() {
            Ok(levels) => levels,
            Err(e) => {
                log::error!("Level pack rejected: {}", e);
                return;
            }
        };

        let seed = js_sys::Date::now() as u64;
        let Some(renderer) = CanvasRenderer::new(&canvas, seed) else {
            log::warn!("Canvas 2D context unavailable, cannot draw");
            return;
        };

        let game = Rc::new(RefCell::new(Game {
            session: GameSession::new(levels, tuning),
            keyboard: KeyboardState::new(),
            renderer,
            audio: AudioManager::new(&settings),
            settings,
        }));

        if let Some(loading) = document.get_element_by_id("loading") {
            let _ = loading.set_attribute("class", "hidden");
        }

        setup_input_handlers(&canvas, game.clone());
        request_animation_frame(game);
    }

    fn setup_input_handlers(canvas: &HtmlCanvasElement, game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else { return };

        // Key down
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                let code = event.code();
                if is_game_key(&code) {
                    event.prevent_default();
                }
                let mut g = game.borrow_mut();
                g.audio.resume();
                g.keyboard.key_down(&code);
            });
            let _ = window.add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Key up
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                game.borrow_mut().keyboard.key_up(&event.code());
            });
            let _ = window.add_event_listener_with_callback("keyup", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Window blur: keyup never arrives for keys held while focus leaves
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                game.borrow_mut().keyboard.release_all();
            });
            let _ = window.add_event_listener_with_callback("blur", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Play again
        {
            let canvas_clone = canvas.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: MouseEvent| {
                let bounds = canvas_clone.get_bounding_client_rect();
                if bounds.width() <= 0.0 || bounds.height() <= 0.0 {
                    return;
                }
                let point = DVec2::new(
                    (event.client_x() as f64 - bounds.x()) * V_WIDTH / bounds.width(),
                    (event.client_y() as f64 - bounds.y()) * V_HEIGHT / bounds.height(),
                );

                let mut g = game.borrow_mut();
                g.audio.resume();
                if g.session.state().status == SessionStatus::Won && play_again_hit(point) {
                    g.session.restart_game();
                }
            });
            let _ = canvas.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    /// Reset the level after the death effect, unless something else moved
    /// the session on in the meantime
    fn schedule_reset(game: Rc<RefCell<Game>>, ticket: ResetTicket, delay_ms: u32) {
        let Some(window) = web_sys::window() else { return };
        let closure = Closure::once(move || {
            game.borrow_mut().session.apply_reset(ticket);
        });
        if window
            .set_timeout_with_callback_and_timeout_and_arguments_0(
                closure.as_ref().unchecked_ref(),
                delay_ms.min(i32::MAX as u32) as i32,
            )
            .is_err()
        {
            log::warn!("setTimeout failed, death reset will not fire");
        }
        closure.forget();
    }

    fn request_animation_frame(game: Rc<RefCell<Game>>) {
        let Some(window) = web_sys::window() else { return };
        let closure = Closure::once(move |time: f64| {
            game_loop(game, time);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn game_loop(game: Rc<RefCell<Game>>, time: f64) {
        let (ticket, delay) = {
            let mut g = game.borrow_mut();
            (g.frame(time), g.settings.death_delay_ms)
        };

        if let Some(ticket) = ticket {
            schedule_reset(game.clone(), ticket, delay);
        }

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
    use jungle_jump::audio::NullAudio;
    use jungle_jump::autopilot::{level_one_route, play_level};
    use jungle_jump::consts::FRAME_HZ;
    use jungle_jump::levels::LevelSet;
    use jungle_jump::{GameSession, PhysicsTuning, Settings};

    env_logger::init();
    log::info!("Jungle Jump (native) starting...");
    log::info!("Native mode runs headless - serve the wasm build for the playable version");

    let levels = match LevelSet::builtin() {
        Ok(levels) => levels,
        Err(e) => {
            log::error!("Level pack rejected: {}", e);
            std::process::exit(1);
        }
    };

    let settings = Settings::default();
    let mut session = GameSession::new(levels, PhysicsTuning::default());
    let summary = play_level(
        &mut session,
        level_one_route,
        &mut NullAudio,
        settings.death_delay_frames(FRAME_HZ),
        60 * 60,
    );
    println!(
        "{} frames: {} jumps, {} bananas, {} deaths, reached level {}{}",
        summary.frames,
        summary.jumps,
        summary.collected,
        summary.deaths,
        summary.level_reached,
        if summary.won { " (won)" } else { "" }
    );
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}
