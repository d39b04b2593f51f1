use crate::error::{Error, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    pub fn moved(&self, direction: Direction) -> Self {
        match direction {
            Direction::Up => Position::new(self.x, self.y - 1),
            Direction::Down => Position::new(self.x, self.y + 1),
            Direction::Left => Position::new(self.x - 1, self.y),
            Direction::Right => Position::new(self.x + 1, self.y),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::Up,
        Direction::Down,
        Direction::Left,
        Direction::Right,
    ];

    pub fn opposite(&self) -> Direction {
        match self {
            Direction::Up => Direction::Down,
            Direction::Down => Direction::Up,
            Direction::Left => Direction::Right,
            Direction::Right => Direction::Left,
        }
    }
}

pub const MIN_GRID_SIZE: i32 = 4;
pub const MAX_GRID_SIZE: i32 = 100;

/// Square playing field of `size` x `size` cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Grid {
    size: i32,
}

impl Grid {
    /// The starting snake needs two free columns left of the center cell.
    pub fn new(size: i32) -> Result<Self> {
        if size < MIN_GRID_SIZE {
            return Err(Error::Config(format!("grid size {} is too small", size)));
        }
        if size > MAX_GRID_SIZE {
            return Err(Error::Config(format!("grid size {} is too large", size)));
        }
        Ok(Self { size })
    }

    pub fn size(&self) -> i32 {
        self.size
    }

    pub fn cell_count(&self) -> usize {
        (self.size as usize).pow(2)
    }

    pub fn contains(&self, pos: Position) -> bool {
        pos.x >= 0 && pos.y >= 0 && pos.x < self.size && pos.y < self.size
    }

    pub fn center(&self) -> Position {
        Position::new(self.size / 2, self.size / 2)
    }

    /// All cells, row by row.
    pub fn cells(&self) -> impl Iterator<Item = Position> {
        let size = self.size;
        (0..size).flat_map(move |y| (0..size).map(move |x| Position::new(x, y)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bounds_are_half_open() {
        let grid = Grid::new(20).unwrap();
        assert!(grid.contains(Position::new(0, 0)));
        assert!(grid.contains(Position::new(19, 19)));
        assert!(!grid.contains(Position::new(20, 0)));
        assert!(!grid.contains(Position::new(0, 20)));
        assert!(!grid.contains(Position::new(-1, 5)));
        assert!(!grid.contains(Position::new(5, -1)));
    }

    #[test]
    fn moved_follows_screen_axes() {
        let p = Position::new(5, 5);
        assert_eq!(p.moved(Direction::Up), Position::new(5, 4));
        assert_eq!(p.moved(Direction::Down), Position::new(5, 6));
        assert_eq!(p.moved(Direction::Left), Position::new(4, 5));
        assert_eq!(p.moved(Direction::Right), Position::new(6, 5));
    }

    #[test]
    fn opposite_is_an_involution() {
        for d in Direction::ALL {
            assert_ne!(d, d.opposite());
            assert_eq!(d, d.opposite().opposite());
        }
    }

    #[test]
    fn cells_cover_grid_once() {
        let grid = Grid::new(4).unwrap();
        let cells: Vec<_> = grid.cells().collect();
        assert_eq!(cells.len(), grid.cell_count());
        assert_eq!(cells[0], Position::new(0, 0));
        assert_eq!(cells[5], Position::new(1, 1));
    }

    #[test]
    fn tiny_grid_rejected() {
        assert!(Grid::new(3).is_err());
        assert!(Grid::new(4).is_ok());
    }

    #[test]
    fn huge_grid_rejected() {
        let grid = Grid::new(MAX_GRID_SIZE).unwrap();
        assert_eq!(grid.cell_count(), 10_000);
        assert!(Grid::new(MAX_GRID_SIZE + 1).is_err());
        assert!(Grid::new(50_000).is_err());
    }
}
