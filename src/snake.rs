//! Snake body and food placement.

use crate::grid::{Grid, Position};
use rand::Rng;
use std::collections::VecDeque;

/// Random samples tried before falling back to scanning free cells.
const MAX_RANDOM_ATTEMPTS: usize = 64;

/// Body segments, head first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snake {
    body: VecDeque<Position>,
}

impl Snake {
    /// Three segments, head on the center cell, tail extending left.
    pub fn initial(grid: &Grid) -> Self {
        let center = grid.center();
        let body = (0..3)
            .map(|i| Position::new(center.x - i, center.y))
            .collect();
        Self { body }
    }

    /// Builds a snake from explicit segments. Returns `None` if empty.
    pub fn from_segments(segments: impl IntoIterator<Item = Position>) -> Option<Self> {
        let body: VecDeque<Position> = segments.into_iter().collect();
        if body.is_empty() {
            None
        } else {
            Some(Self { body })
        }
    }

    pub fn head(&self) -> Position {
        self.body[0]
    }

    pub fn len(&self) -> usize {
        self.body.len()
    }

    pub fn is_empty(&self) -> bool {
        self.body.is_empty()
    }

    pub fn segments(&self) -> impl Iterator<Item = &Position> {
        self.body.iter()
    }

    pub fn contains(&self, pos: Position) -> bool {
        self.body.contains(&pos)
    }

    /// True if `pos` hits any segment after the head.
    pub fn body_hits(&self, pos: Position) -> bool {
        self.body.iter().skip(1).any(|&seg| seg == pos)
    }

    pub(crate) fn push_head(&mut self, pos: Position) {
        self.body.push_front(pos);
    }

    pub(crate) fn drop_tail(&mut self) {
        if self.body.len() > 1 {
            self.body.pop_back();
        }
    }
}

/// Picks a random cell not covered by `snake`.
///
/// Random sampling is tried first; when the snake covers half the grid or
/// sampling keeps missing, the free cells are listed and one is chosen
/// uniformly. Returns `None` only when the grid is full.
pub fn place_food<R: Rng>(grid: &Grid, snake: &Snake, rng: &mut R) -> Option<Position> {
    if snake.len() * 2 < grid.cell_count() {
        for _ in 0..MAX_RANDOM_ATTEMPTS {
            let pos = Position::new(rng.gen_range(0..grid.size()), rng.gen_range(0..grid.size()));
            if !snake.contains(pos) {
                return Some(pos);
            }
        }
    }

    let free: Vec<Position> = grid.cells().filter(|&p| !snake.contains(p)).collect();
    if free.is_empty() {
        return None;
    }
    Some(free[rng.gen_range(0..free.len())])
}
