#[cfg(not(target_arch = "wasm32"))]
fn main() -> std::io::Result<()> {
    cli::run()
}

// The browser build is driven from `start_game`; there is no native entry.
#[cfg(target_arch = "wasm32")]
fn main() {}

#[cfg(not(target_arch = "wasm32"))]
mod cli {
    use log::{info, warn};
    use neon_snake::file_store::{config_dir, FileStore};
    use neon_snake::high_score::{MemoryStore, ScoreStore};
    use neon_snake::{CliRenderer, Game, GameConfig, Input, Renderer, ThreadedProvider};
    use std::fs;
    use std::io;
    use std::time::Instant;

    /// Logging goes to `neon-snake.log` in the config dir, and only when
    /// `RUST_LOG` is set; stderr is hidden behind the alternate screen.
    fn init_logging() {
        if std::env::var_os("RUST_LOG").is_none() {
            return;
        }
        let Ok(dir) = config_dir() else {
            return;
        };
        if fs::create_dir_all(&dir).is_err() {
            return;
        }
        if let Ok(file) = fs::File::create(dir.join("neon-snake.log")) {
            env_logger::Builder::from_default_env()
                .target(env_logger::Target::Pipe(Box::new(file)))
                .init();
        }
    }

    fn load_config() -> GameConfig {
        let path = match config_dir() {
            Ok(dir) => dir.join("config.json"),
            Err(e) => {
                warn!("{}; using default settings", e);
                return GameConfig::default();
            }
        };

        match fs::read_to_string(&path) {
            Ok(text) => match GameConfig::from_json(&text) {
                Ok(config) => {
                    info!("loaded settings from {}", path.display());
                    config
                }
                Err(e) => {
                    warn!("ignoring {}: {}", path.display(), e);
                    GameConfig::default()
                }
            },
            Err(_) => GameConfig::default(),
        }
    }

    fn open_store() -> Box<dyn ScoreStore> {
        match FileStore::new() {
            Ok(store) => Box::new(store),
            Err(e) => {
                warn!("high score will not be saved: {}", e);
                Box::new(MemoryStore::new())
            }
        }
    }

    pub fn run() -> io::Result<()> {
        init_logging();

        let config = load_config();
        let mut provider = ThreadedProvider::from_env(config.fun_fact.clone());
        let mut game = Game::new(config, open_store())
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidInput, e.to_string()))?;

        let (term_width, term_height) = crossterm::terminal::size()?;
        let needed = (game.grid().size() + 2) as u16;
        if term_width < needed * 2 || term_height < needed + 6 {
            return Err(io::Error::new(
                io::ErrorKind::Other,
                format!(
                    "terminal too small: need {}x{}, have {}x{}",
                    needed * 2,
                    needed + 6,
                    term_width,
                    term_height
                ),
            ));
        }

        let mut renderer = CliRenderer::new();
        renderer.init()?;

        let clock = Instant::now();
        let now_ms = || clock.elapsed().as_secs_f64() * 1000.0;

        loop {
            if let Some(input) = renderer.poll_input()? {
                if input == Input::Quit {
                    break;
                }
                game.handle_input(input, now_ms());
            }

            if let Some(outcome) = game.update(now_ms()) {
                if outcome.is_terminal() {
                    provider.request(game.generation());
                }
            }

            while let Some(fact) = provider.poll() {
                game.offer_fun_fact(fact);
            }

            // Renderer manages its own frame rate
            renderer.render(&game)?;
        }

        renderer.cleanup()?;
        Ok(())
    }
}
