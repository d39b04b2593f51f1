use crate::config::GameConfig;
use crate::error::Result;
use crate::fun_fact::{local_fact, FunFact};
use crate::grid::{Direction, Grid, Position};
use crate::high_score::{HighScore, ScoreStore};
use crate::renderer::Input;
use crate::snake::{place_food, Snake};
use crate::tick::{advance, Board, Crash, TickOutcome};
use crate::timer::TickTimer;
use log::{debug, info};
use rand::rngs::StdRng;
use rand::SeedableRng;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameState {
    Start,
    Playing,
    GameOver,
}

/// What a renderer draws in one grid cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cell {
    Empty,
    Head,
    Body,
    Food,
}

pub struct Game {
    config: GameConfig,
    grid: Grid,
    state: GameState,
    board: Board,
    /// Committed direction, read at the start of every tick.
    direction: Direction,
    score: u32,
    /// Tick interval; `Some` exactly while playing.
    speed: Option<u64>,
    high_score: HighScore,
    new_record: bool,
    /// Bumped on every start so late fun-fact answers can be recognised.
    generation: u64,
    last_crash: Option<Crash>,
    placeholder_fact: &'static str,
    fun_fact: Option<String>,
    timer: TickTimer,
    rng: StdRng,
}

impl Game {
    pub fn new(config: GameConfig, store: Box<dyn ScoreStore>) -> Result<Self> {
        Self::with_rng(config, store, StdRng::from_entropy())
    }

    pub fn with_rng(
        config: GameConfig,
        store: Box<dyn ScoreStore>,
        mut rng: StdRng,
    ) -> Result<Self> {
        config.validate()?;
        let grid = Grid::new(config.grid_size)?;
        let high_score = HighScore::load(store, &config.storage_key);

        let snake = Snake::initial(&grid);
        // A fresh grid always has room beside a three-cell snake.
        let food = place_food(&grid, &snake, &mut rng).unwrap_or_else(|| grid.center());

        Ok(Self {
            config,
            grid,
            state: GameState::Start,
            board: Board { snake, food },
            direction: Direction::Right,
            score: 0,
            speed: None,
            high_score,
            new_record: false,
            generation: 0,
            last_crash: None,
            placeholder_fact: "",
            fun_fact: None,
            timer: TickTimer::new(),
            rng,
        })
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn state(&self) -> GameState {
        self.state
    }

    pub fn snake(&self) -> &Snake {
        &self.board.snake
    }

    pub fn food(&self) -> Position {
        self.board.food
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn speed(&self) -> Option<u64> {
        self.speed
    }

    pub fn high_score(&self) -> u32 {
        self.high_score.best()
    }

    /// True when the last finished session set a new high score.
    pub fn is_new_record(&self) -> bool {
        self.new_record
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn last_crash(&self) -> Option<Crash> {
        self.last_crash
    }

    /// Text for the game-over screen: the fetched fact once it has arrived,
    /// a built-in one until then.
    pub fn fun_fact(&self) -> &str {
        self.fun_fact.as_deref().unwrap_or(self.placeholder_fact)
    }

    pub fn fun_fact_pending(&self) -> bool {
        self.state == GameState::GameOver && self.fun_fact.is_none()
    }

    pub fn timer(&self) -> &TickTimer {
        &self.timer
    }

    /// Nothing is on the board until the first session starts.
    pub fn cell_at(&self, x: i32, y: i32) -> Cell {
        if self.state == GameState::Start {
            return Cell::Empty;
        }
        let pos = Position::new(x, y);
        if self.board.snake.head() == pos {
            Cell::Head
        } else if self.board.snake.contains(pos) {
            Cell::Body
        } else if self.board.food == pos {
            Cell::Food
        } else {
            Cell::Empty
        }
    }

    /// Routes one input event. `Quit` is left to the front end.
    pub fn handle_input(&mut self, input: Input, now_ms: f64) {
        match input {
            Input::Direction(direction) => self.set_direction(direction),
            Input::Start => self.start(now_ms),
            Input::Restart => self.restart(now_ms),
            Input::Quit => {}
        }
    }

    /// Starts the first session. Only valid on the title screen.
    pub fn start(&mut self, now_ms: f64) {
        if self.state != GameState::Start {
            return;
        }
        self.begin(now_ms);
    }

    /// Starts a new session after game over. Only valid on the game-over
    /// screen.
    pub fn restart(&mut self, now_ms: f64) {
        if self.state != GameState::GameOver {
            return;
        }
        self.begin(now_ms);
    }

    fn begin(&mut self, now_ms: f64) {
        let snake = Snake::initial(&self.grid);
        let food = place_food(&self.grid, &snake, &mut self.rng)
            .unwrap_or_else(|| self.grid.center());
        self.board = Board { snake, food };
        self.direction = Direction::Right;
        self.score = 0;
        self.speed = Some(self.config.start_speed_ms);
        self.new_record = false;
        self.last_crash = None;
        self.fun_fact = None;
        self.generation += 1;
        self.state = GameState::Playing;
        self.timer.arm(now_ms, self.config.start_speed_ms);

        info!("session {} started", self.generation);
    }

    /// Commits a new direction for the next tick. Reversals and input
    /// outside of play are ignored.
    pub fn set_direction(&mut self, direction: Direction) {
        if self.state != GameState::Playing {
            return;
        }
        if direction == self.direction.opposite() {
            return;
        }
        self.direction = direction;
    }

    /// Runs a tick if the timer is due. Returns the tick's outcome, if any.
    pub fn update(&mut self, now_ms: f64) -> Option<TickOutcome> {
        if !self.timer.poll(now_ms) {
            return None;
        }

        let before = self.speed;
        let outcome = self.tick()?;

        if let Some(speed) = self.speed {
            if before != Some(speed) {
                self.timer.arm(now_ms, speed);
            }
        }
        Some(outcome)
    }

    /// Advances exactly one step, regardless of the timer. `None` unless
    /// playing.
    pub fn tick(&mut self) -> Option<TickOutcome> {
        if self.state != GameState::Playing {
            return None;
        }

        let outcome = advance(&self.grid, &mut self.board, self.direction, &mut self.rng);

        if outcome.ate() {
            self.score += self.config.food_score;
            self.speed = self.speed.map(|speed| self.config.faster(speed));
            debug!("ate food: score {} speed {:?}", self.score, self.speed);
        }

        match outcome {
            TickOutcome::Crashed(crash) => self.finish(Some(crash)),
            TickOutcome::Filled => self.finish(None),
            TickOutcome::Moved | TickOutcome::Ate => {}
        }

        Some(outcome)
    }

    fn finish(&mut self, crash: Option<Crash>) {
        self.state = GameState::GameOver;
        self.speed = None;
        self.timer.cancel();
        self.last_crash = crash;
        self.new_record = self.high_score.record(self.score);
        self.placeholder_fact = local_fact(&mut self.rng);

        info!(
            "session {} over ({:?}): score {}, best {}",
            self.generation,
            crash,
            self.score,
            self.high_score.best()
        );
    }

    /// Shows `fact` if it belongs to the session that just ended. Returns
    /// false for stale or unexpected answers.
    pub fn offer_fun_fact(&mut self, fact: FunFact) -> bool {
        if self.state != GameState::GameOver || fact.generation != self.generation {
            debug!("dropping fun fact for session {}", fact.generation);
            return false;
        }
        self.fun_fact = Some(fact.text);
        true
    }

    #[cfg(test)]
    pub(crate) fn place(&mut self, snake: Snake, food: Position, direction: Direction) {
        self.board = Board { snake, food };
        self.direction = direction;
    }
}
