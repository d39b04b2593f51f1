use crate::game::Game;
use crate::grid::Direction;
use std::io;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Input {
    Direction(Direction),
    /// Begins the first session from the title screen.
    Start,
    /// Begins a new session from the game-over screen.
    Restart,
    Quit,
}

impl Input {
    /// Maps a DOM `KeyboardEvent.key` value (or the terminal equivalent).
    pub fn from_key(key: &str) -> Option<Input> {
        let input = match key {
            "ArrowUp" | "w" | "W" => Input::Direction(Direction::Up),
            "ArrowDown" | "s" | "S" => Input::Direction(Direction::Down),
            "ArrowLeft" | "a" | "A" => Input::Direction(Direction::Left),
            "ArrowRight" | "d" | "D" => Input::Direction(Direction::Right),
            "Enter" | " " => Input::Start,
            "r" | "R" => Input::Restart,
            "q" | "Q" | "Escape" => Input::Quit,
            _ => return None,
        };
        Some(input)
    }

    /// Maps the `data-direction` attribute of an on-screen touch button.
    pub fn from_button(name: &str) -> Option<Input> {
        match name {
            "up" => Some(Input::Direction(Direction::Up)),
            "down" => Some(Input::Direction(Direction::Down)),
            "left" => Some(Input::Direction(Direction::Left)),
            "right" => Some(Input::Direction(Direction::Right)),
            "start" => Some(Input::Start),
            "restart" => Some(Input::Restart),
            _ => None,
        }
    }

    /// Classifies a touch gesture by its displacement in pixels. Short
    /// gestures count as a tap, which only starts from the title screen.
    pub fn from_swipe(dx: f64, dy: f64, threshold: f64) -> Input {
        if dx.abs() <= threshold && dy.abs() <= threshold {
            return Input::Start;
        }
        let direction = if dx.abs() > dy.abs() {
            if dx > 0.0 {
                Direction::Right
            } else {
                Direction::Left
            }
        } else if dy > 0.0 {
            Direction::Down
        } else {
            Direction::Up
        };
        Input::Direction(direction)
    }
}

/// Greedy word wrap for overlay text. Words longer than `width` get a
/// line of their own.
pub fn wrap_text(text: &str, width: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();
    for word in text.split_whitespace() {
        if !current.is_empty() && current.chars().count() + 1 + word.chars().count() > width {
            lines.push(std::mem::take(&mut current));
        }
        if !current.is_empty() {
            current.push(' ');
        }
        current.push_str(word);
    }
    if !current.is_empty() {
        lines.push(current);
    }
    lines
}

/// Trait that abstracts rendering implementation.
/// This allows for different rendering backends (CLI, Web, etc.)
pub trait Renderer {
    fn init(&mut self) -> io::Result<()>;

    fn render(&mut self, game: &Game) -> io::Result<()>;

    /// Restore terminal/display state
    fn cleanup(&mut self) -> io::Result<()>;

    fn poll_input(&mut self) -> io::Result<Option<Input>>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn arrow_and_wasd_keys_map_to_directions() {
        assert_eq!(
            Input::from_key("ArrowUp"),
            Some(Input::Direction(Direction::Up))
        );
        assert_eq!(Input::from_key("w"), Some(Input::Direction(Direction::Up)));
        assert_eq!(
            Input::from_key("S"),
            Some(Input::Direction(Direction::Down))
        );
        assert_eq!(
            Input::from_key("a"),
            Some(Input::Direction(Direction::Left))
        );
        assert_eq!(
            Input::from_key("ArrowRight"),
            Some(Input::Direction(Direction::Right))
        );
        assert_eq!(Input::from_key("x"), None);
    }

    #[test]
    fn start_and_restart_use_separate_keys() {
        assert_eq!(Input::from_key("Enter"), Some(Input::Start));
        assert_eq!(Input::from_key(" "), Some(Input::Start));
        assert_eq!(Input::from_key("r"), Some(Input::Restart));
        assert_eq!(Input::from_key("R"), Some(Input::Restart));
        assert_eq!(Input::from_key("Escape"), Some(Input::Quit));
    }

    #[test]
    fn buttons_map_by_name() {
        assert_eq!(
            Input::from_button("left"),
            Some(Input::Direction(Direction::Left))
        );
        assert_eq!(Input::from_button("start"), Some(Input::Start));
        assert_eq!(Input::from_button("restart"), Some(Input::Restart));
        assert_eq!(Input::from_button("jump"), None);
    }

    #[test]
    fn swipe_uses_dominant_axis() {
        assert_eq!(
            Input::from_swipe(50.0, 10.0, 30.0),
            Input::Direction(Direction::Right)
        );
        assert_eq!(
            Input::from_swipe(-50.0, 40.0, 30.0),
            Input::Direction(Direction::Left)
        );
        assert_eq!(
            Input::from_swipe(5.0, 60.0, 30.0),
            Input::Direction(Direction::Down)
        );
        assert_eq!(
            Input::from_swipe(5.0, -60.0, 30.0),
            Input::Direction(Direction::Up)
        );
        assert_eq!(Input::from_swipe(3.0, -4.0, 30.0), Input::Start);
    }

    #[test]
    fn wrap_breaks_on_word_boundaries() {
        let lines = wrap_text("Snakes smell with their tongues and feel vibrations", 16);
        assert_eq!(
            lines,
            vec!["Snakes smell", "with their", "tongues and feel", "vibrations"]
        );
    }

    #[test]
    fn wrap_keeps_long_words_whole() {
        assert_eq!(
            wrap_text("supercalifragilistic", 5),
            vec!["supercalifragilistic"]
        );
        assert!(wrap_text("   ", 10).is_empty());
    }
}
