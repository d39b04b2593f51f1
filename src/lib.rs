pub mod config;
pub mod error;
pub mod fun_fact;
pub mod game;
pub mod grid;
pub mod high_score;
pub mod renderer;
pub mod snake;
pub mod tick;
pub mod timer;

#[cfg(not(target_arch = "wasm32"))]
pub mod cli_renderer;
#[cfg(not(target_arch = "wasm32"))]
pub mod file_store;

#[cfg(target_arch = "wasm32")]
mod web_main;
#[cfg(target_arch = "wasm32")]
mod web_renderer;
#[cfg(target_arch = "wasm32")]
mod web_services;

pub use config::GameConfig;
pub use error::{Error, Result};
pub use fun_fact::{FunFact, FunFactProvider};
pub use game::{Cell, Game, GameState};
pub use grid::{Direction, Grid, Position};
pub use renderer::{Input, Renderer};
pub use tick::{Crash, TickOutcome};

#[cfg(not(target_arch = "wasm32"))]
pub use cli_renderer::CliRenderer;
#[cfg(not(target_arch = "wasm32"))]
pub use fun_fact::ThreadedProvider;
#[cfg(target_arch = "wasm32")]
pub use web_main::start_game;
