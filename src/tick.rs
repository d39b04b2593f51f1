//! One discrete movement step.
//!
//! `advance` only touches the board it is given. Score, speed and session
//! state are the caller's business; the returned [`TickOutcome`] says what
//! happened.

use crate::grid::{Direction, Grid, Position};
use crate::snake::{place_food, Snake};
use rand::Rng;

/// Why a session ended on a tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Crash {
    Wall,
    Body,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// Head advanced, tail dropped.
    Moved,
    /// Head advanced onto food; the snake grew and new food was placed.
    Ate,
    /// Head would leave the grid or hit the body. Board untouched.
    Crashed(Crash),
    /// Head ate the last food and the body now covers every cell.
    Filled,
}

impl TickOutcome {
    pub fn is_terminal(&self) -> bool {
        matches!(self, TickOutcome::Crashed(_) | TickOutcome::Filled)
    }

    pub fn ate(&self) -> bool {
        matches!(self, TickOutcome::Ate | TickOutcome::Filled)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    pub snake: Snake,
    pub food: Position,
}

pub fn advance<R: Rng>(
    grid: &Grid,
    board: &mut Board,
    direction: Direction,
    rng: &mut R,
) -> TickOutcome {
    let new_head = board.snake.head().moved(direction);

    if !grid.contains(new_head) {
        return TickOutcome::Crashed(Crash::Wall);
    }

    // The tail still occupies its cell at this point, so moving into it is a hit.
    if board.snake.body_hits(new_head) {
        return TickOutcome::Crashed(Crash::Body);
    }

    board.snake.push_head(new_head);

    if new_head != board.food {
        board.snake.drop_tail();
        return TickOutcome::Moved;
    }

    match place_food(grid, &board.snake, rng) {
        Some(food) => {
            board.food = food;
            TickOutcome::Ate
        }
        None => TickOutcome::Filled,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn snake(cells: &[(i32, i32)]) -> Snake {
        Snake::from_segments(cells.iter().map(|&(x, y)| Position::new(x, y))).unwrap()
    }

    fn cells(snake: &Snake) -> Vec<(i32, i32)> {
        snake.segments().map(|p| (p.x, p.y)).collect()
    }

    fn direction_strategy() -> impl Strategy<Value = Direction> {
        prop_oneof![
            Just(Direction::Up),
            Just(Direction::Down),
            Just(Direction::Left),
            Just(Direction::Right),
        ]
    }

    #[test]
    fn plain_move_keeps_length() {
        let grid = Grid::new(20).unwrap();
        let mut board = Board {
            snake: snake(&[(10, 10), (9, 10), (8, 10)]),
            food: Position::new(0, 0),
        };
        let mut rng = StdRng::seed_from_u64(1);

        let outcome = advance(&grid, &mut board, Direction::Right, &mut rng);

        assert_eq!(outcome, TickOutcome::Moved);
        assert_eq!(cells(&board.snake), vec![(11, 10), (10, 10), (9, 10)]);
        assert_eq!(board.food, Position::new(0, 0));
    }

    #[test]
    fn eating_grows_and_replaces_food() {
        let grid = Grid::new(20).unwrap();
        let mut board = Board {
            snake: snake(&[(10, 10), (9, 10), (8, 10)]),
            food: Position::new(11, 10),
        };
        let mut rng = StdRng::seed_from_u64(1);

        let outcome = advance(&grid, &mut board, Direction::Right, &mut rng);

        assert_eq!(outcome, TickOutcome::Ate);
        assert_eq!(
            cells(&board.snake),
            vec![(11, 10), (10, 10), (9, 10), (8, 10)]
        );
        assert!(!board.snake.contains(board.food));
        assert!(grid.contains(board.food));
    }

    #[test]
    fn leaving_left_edge_crashes() {
        let grid = Grid::new(20).unwrap();
        let mut board = Board {
            snake: snake(&[(0, 5), (1, 5), (2, 5)]),
            food: Position::new(10, 10),
        };
        let before = board.clone();
        let mut rng = StdRng::seed_from_u64(1);

        let outcome = advance(&grid, &mut board, Direction::Left, &mut rng);

        assert_eq!(outcome, TickOutcome::Crashed(Crash::Wall));
        assert_eq!(board, before);
    }

    #[test]
    fn each_wall_crashes() {
        let grid = Grid::new(5).unwrap();
        let cases = [
            ((2, 0), Direction::Up),
            ((2, 4), Direction::Down),
            ((0, 2), Direction::Left),
            ((4, 2), Direction::Right),
        ];
        let mut rng = StdRng::seed_from_u64(1);
        for ((x, y), dir) in cases {
            let mut board = Board {
                snake: snake(&[(x, y)]),
                food: Position::new(2, 2),
            };
            assert_eq!(
                advance(&grid, &mut board, dir, &mut rng),
                TickOutcome::Crashed(Crash::Wall)
            );
        }
    }

    #[test]
    fn turning_into_body_crashes() {
        // Head at (5,5) with the body curling up and around to (5,6).
        let grid = Grid::new(20).unwrap();
        let mut board = Board {
            snake: snake(&[(5, 5), (6, 5), (6, 6), (5, 6), (4, 6)]),
            food: Position::new(0, 0),
        };
        let before = board.clone();
        let mut rng = StdRng::seed_from_u64(1);

        let outcome = advance(&grid, &mut board, Direction::Down, &mut rng);

        assert_eq!(outcome, TickOutcome::Crashed(Crash::Body));
        assert_eq!(board, before);
    }

    #[test]
    fn moving_into_current_tail_crashes() {
        // A 2x2 loop: the tail cell is still occupied when the head arrives.
        let grid = Grid::new(20).unwrap();
        let mut board = Board {
            snake: snake(&[(5, 5), (6, 5), (6, 6), (5, 6)]),
            food: Position::new(0, 0),
        };
        let mut rng = StdRng::seed_from_u64(1);

        assert_eq!(
            advance(&grid, &mut board, Direction::Down, &mut rng),
            TickOutcome::Crashed(Crash::Body)
        );
    }

    #[test]
    fn reversing_into_neck_crashes() {
        let grid = Grid::new(20).unwrap();
        let mut board = Board {
            snake: snake(&[(10, 10), (9, 10), (8, 10)]),
            food: Position::new(0, 0),
        };
        let mut rng = StdRng::seed_from_u64(1);

        assert_eq!(
            advance(&grid, &mut board, Direction::Left, &mut rng),
            TickOutcome::Crashed(Crash::Body)
        );
    }

    #[test]
    fn eating_last_free_cell_fills_grid() {
        let grid = Grid::new(4).unwrap();
        // Snake covers every cell except (3,0); head at (2,0) next to it.
        let mut body: Vec<(i32, i32)> = vec![(2, 0), (1, 0), (0, 0)];
        for y in 1..4 {
            let row: Vec<i32> = if y % 2 == 1 {
                (0..4).collect()
            } else {
                (0..4).rev().collect()
            };
            body.extend(row.into_iter().map(|x| (x, y)));
        }
        let mut board = Board {
            snake: snake(&body),
            food: Position::new(3, 0),
        };
        let mut rng = StdRng::seed_from_u64(1);

        let outcome = advance(&grid, &mut board, Direction::Right, &mut rng);

        assert_eq!(outcome, TickOutcome::Filled);
        assert_eq!(board.snake.len(), grid.cell_count());
    }

    proptest! {
        /// Random play never breaks the board invariants.
        #[test]
        fn prop_board_invariants_hold(
            seed in any::<u64>(),
            moves in prop::collection::vec(direction_strategy(), 1..200),
        ) {
            let grid = Grid::new(12).unwrap();
            let mut rng = StdRng::seed_from_u64(seed);
            let snake = Snake::initial(&grid);
            let food = place_food(&grid, &snake, &mut rng).unwrap();
            let mut board = Board { snake, food };

            for direction in moves {
                let len_before = board.snake.len();
                let before = board.clone();
                let outcome = advance(&grid, &mut board, direction, &mut rng);

                match outcome {
                    TickOutcome::Moved => prop_assert_eq!(board.snake.len(), len_before),
                    TickOutcome::Ate => prop_assert_eq!(board.snake.len(), len_before + 1),
                    TickOutcome::Crashed(_) => {
                        prop_assert_eq!(&board, &before);
                        break;
                    }
                    TickOutcome::Filled => break,
                }

                prop_assert!(!board.snake.contains(board.food));
                prop_assert!(board.snake.segments().all(|&p| grid.contains(p)));
                let unique: std::collections::HashSet<_> = board.snake.segments().collect();
                prop_assert_eq!(unique.len(), board.snake.len());
            }
        }
    }
}
