use crate::fun_fact::provider_for_key;
use crate::high_score::{MemoryStore, ScoreStore};
use crate::web_renderer::WebRenderer;
use crate::web_services::{FetchProvider, LocalStorageStore};
use crate::{FunFactProvider, Game, GameConfig, Input, Renderer};
use log::{error, info, warn};
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;

struct GameLoop {
    game: Game,
    renderer: WebRenderer,
    provider: Box<dyn FunFactProvider>,
}

impl GameLoop {
    fn new(api_key: Option<String>) -> Result<Self, JsValue> {
        let config = GameConfig::default();
        let fun_fact_config = config.fun_fact.clone();
        let provider = provider_for_key(api_key, |key| {
            Box::new(FetchProvider::new(fun_fact_config, key))
        });

        let store: Box<dyn ScoreStore> = match web_sys::window().map(|w| w.local_storage()) {
            Some(Ok(Some(_))) => Box::new(LocalStorageStore),
            _ => {
                warn!("localStorage unavailable; high score will not persist");
                Box::new(MemoryStore::new())
            }
        };

        let game = Game::new(config, store).map_err(|e| JsValue::from_str(&e.to_string()))?;
        let mut renderer = WebRenderer::new("gameCanvas")?;
        renderer
            .init()
            .map_err(|e| JsValue::from_str(&e.to_string()))?;

        Ok(Self {
            game,
            renderer,
            provider,
        })
    }

    fn update_frame(&mut self, current_time: f64) -> Result<(), JsValue> {
        while let Some(input) = self
            .renderer
            .poll_input()
            .map_err(|e| JsValue::from_str(&e.to_string()))?
        {
            if input != Input::Quit {
                self.game.handle_input(input, current_time);
            }
        }

        if let Some(outcome) = self.game.update(current_time) {
            if outcome.is_terminal() {
                self.provider.request(self.game.generation());
            }
        }

        while let Some(fact) = self.provider.poll() {
            self.game.offer_fun_fact(fact);
        }

        // Renderer manages its own frame rate
        self.renderer
            .render(&self.game)
            .map_err(|e| JsValue::from_str(&e.to_string()))?;

        Ok(())
    }
}

fn request_frame(callback: &Closure<dyn FnMut()>) -> Result<(), JsValue> {
    let window = web_sys::window().ok_or("no window")?;
    window.request_animation_frame(callback.as_ref().unchecked_ref())?;
    Ok(())
}

/// Entry point called from the page. `api_key` enables remote fun facts.
#[wasm_bindgen]
pub fn start_game(api_key: Option<String>) -> Result<(), JsValue> {
    console_error_panic_hook::set_once();
    if log::set_logger(&wasm_bindgen_console_logger::DEFAULT_LOGGER).is_ok() {
        log::set_max_level(log::LevelFilter::Info);
    }

    info!("starting neon snake");

    let game_loop = match GameLoop::new(api_key) {
        Ok(gl) => Rc::new(RefCell::new(gl)),
        Err(e) => {
            error!("failed to create game loop: {:?}", e);
            return Err(e);
        }
    };

    // requestAnimationFrame loop; the tick timer inside `Game` decides
    // when a frame also advances the snake.
    let f: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));
    let g = f.clone();

    *g.borrow_mut() = Some(Closure::wrap(Box::new(move || {
        let mut game_loop = game_loop.borrow_mut();
        let current_time = game_loop.renderer.current_time();

        if let Err(e) = game_loop.update_frame(current_time) {
            error!("game loop stopped: {:?}", e);
            return; // Stop loop on error
        }

        if let Some(callback) = f.borrow().as_ref() {
            if let Err(e) = request_frame(callback) {
                error!("could not schedule frame: {:?}", e);
            }
        }
    }) as Box<dyn FnMut()>));

    if let Some(callback) = g.borrow().as_ref() {
        request_frame(callback)?;
    }

    Ok(())
}
