use crate::game::{Cell, Game, GameState};
use crate::grid::Direction;
use crate::renderer::{wrap_text, Input, Renderer};
use crate::tick::Crash;
use crossterm::{
    cursor,
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind},
    execute, queue,
    style::{Color, Print, ResetColor, SetBackgroundColor, SetForegroundColor},
    terminal::{self, ClearType},
};
use std::io::{self, Write};
use std::time::{Duration, Instant};

/// Width of the message area under the board, in characters.
const TEXT_WIDTH: usize = 40;

pub struct CliRenderer {
    last_render: Instant,
    target_frame_time: Duration,
}

impl Default for CliRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl CliRenderer {
    pub fn new() -> Self {
        Self {
            last_render: Instant::now(),
            // Target 30 FPS
            target_frame_time: Duration::from_millis(33),
        }
    }

    fn draw_cell(&self, cell: Cell, stdout: &mut io::Stdout) -> io::Result<()> {
        match cell {
            Cell::Empty => {
                queue!(stdout, SetBackgroundColor(Color::Black), Print("  "))?;
            }
            Cell::Head => {
                queue!(
                    stdout,
                    SetBackgroundColor(Color::Cyan),
                    SetForegroundColor(Color::Black),
                    Print("<>")
                )?;
            }
            Cell::Body => {
                queue!(stdout, SetBackgroundColor(Color::DarkCyan), Print("  "))?;
            }
            Cell::Food => {
                queue!(
                    stdout,
                    SetBackgroundColor(Color::Black),
                    SetForegroundColor(Color::Red),
                    Print("()")
                )?;
            }
        }
        Ok(())
    }

    fn draw_border_row(&self, size: i32, stdout: &mut io::Stdout) -> io::Result<()> {
        queue!(
            stdout,
            SetBackgroundColor(Color::DarkGrey),
            Print(" ".repeat((size as usize + 2) * 2)),
            ResetColor,
            Print("\r\n")
        )
    }

    fn draw_line(
        &self,
        row: u16,
        text: &str,
        color: Color,
        stdout: &mut io::Stdout,
    ) -> io::Result<()> {
        queue!(
            stdout,
            cursor::MoveTo(0, row),
            terminal::Clear(ClearType::CurrentLine),
            SetForegroundColor(color),
            Print(text),
            ResetColor
        )
    }

    fn draw_info(&self, game: &Game, stdout: &mut io::Stdout) -> io::Result<()> {
        let mut row = (game.grid().size() + 2) as u16;

        self.draw_line(
            row,
            &format!("Score: {}  Best: {}", game.score(), game.high_score()),
            Color::White,
            stdout,
        )?;
        row += 1;

        let mut lines: Vec<(String, Color)> = Vec::new();
        match game.state() {
            GameState::Start => {
                lines.push(("NEON SNAKE".to_string(), Color::Cyan));
                lines.push(("Press Enter to start".to_string(), Color::White));
            }
            GameState::Playing => {
                lines.push((
                    "Arrows / WASD to steer | Q to quit".to_string(),
                    Color::DarkGrey,
                ));
            }
            GameState::GameOver => {
                let cause = match game.last_crash() {
                    Some(Crash::Wall) => "hit the wall",
                    Some(Crash::Body) => "bit your own tail",
                    None => "filled the board",
                };
                lines.push((format!("GAME OVER: you {}", cause), Color::Red));
                if game.is_new_record() {
                    lines.push(("New high score!".to_string(), Color::Yellow));
                }
                let fact_color = if game.fun_fact_pending() {
                    Color::DarkGrey
                } else {
                    Color::Grey
                };
                for line in wrap_text(game.fun_fact(), TEXT_WIDTH) {
                    lines.push((line, fact_color));
                }
                lines.push((
                    "Press R to play again | Q to quit".to_string(),
                    Color::White,
                ));
            }
        }

        for (text, color) in lines {
            self.draw_line(row, &text, color, stdout)?;
            row += 1;
        }
        queue!(stdout, terminal::Clear(ClearType::FromCursorDown))?;
        Ok(())
    }
}

impl Renderer for CliRenderer {
    fn init(&mut self) -> io::Result<()> {
        terminal::enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(
            stdout,
            terminal::EnterAlternateScreen,
            terminal::Clear(ClearType::All),
            cursor::Hide
        )?;
        Ok(())
    }

    fn render(&mut self, game: &Game) -> io::Result<()> {
        // Frame rate limiting: skip rendering if not enough time has passed
        if self.last_render.elapsed() < self.target_frame_time {
            return Ok(());
        }

        self.last_render = Instant::now();

        let mut stdout = io::stdout();
        let size = game.grid().size();

        queue!(stdout, cursor::MoveTo(0, 0))?;
        self.draw_border_row(size, &mut stdout)?;

        for y in 0..size {
            queue!(stdout, SetBackgroundColor(Color::DarkGrey), Print("  "))?;
            for x in 0..size {
                self.draw_cell(game.cell_at(x, y), &mut stdout)?;
            }
            queue!(
                stdout,
                SetBackgroundColor(Color::DarkGrey),
                Print("  "),
                ResetColor,
                Print("\r\n")
            )?;
        }
        self.draw_border_row(size, &mut stdout)?;

        self.draw_info(game, &mut stdout)?;

        stdout.flush()?;
        Ok(())
    }

    fn cleanup(&mut self) -> io::Result<()> {
        let mut stdout = io::stdout();
        execute!(
            stdout,
            cursor::Show,
            terminal::LeaveAlternateScreen,
            ResetColor
        )?;
        terminal::disable_raw_mode()?;
        Ok(())
    }

    fn poll_input(&mut self) -> io::Result<Option<Input>> {
        if event::poll(Duration::from_millis(10))? {
            if let Event::Key(KeyEvent { code, kind, .. }) = event::read()? {
                if kind != KeyEventKind::Press {
                    return Ok(None);
                }
                let input = match code {
                    KeyCode::Up => Some(Input::Direction(Direction::Up)),
                    KeyCode::Down => Some(Input::Direction(Direction::Down)),
                    KeyCode::Left => Some(Input::Direction(Direction::Left)),
                    KeyCode::Right => Some(Input::Direction(Direction::Right)),
                    KeyCode::Enter => Some(Input::Start),
                    KeyCode::Esc => Some(Input::Quit),
                    KeyCode::Char(c) => Input::from_key(c.encode_utf8(&mut [0; 4])),
                    _ => None,
                };
                return Ok(input);
            }
        }
        Ok(None)
    }
}

impl Drop for CliRenderer {
    fn drop(&mut self) {
        let _ = self.cleanup();
    }
}
