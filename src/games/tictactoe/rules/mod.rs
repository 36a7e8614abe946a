//! Game rules for tic-tac-toe.
//!
//! Pure functions over a [`Board`]. Rules never mutate state, so evaluating
//! an unchanged board always yields the same [`Outcome`].

pub mod draw;
pub mod win;

pub use draw::is_full;
pub use win::check_winner;

use super::{Board, Outcome};
use tracing::instrument;

/// Evaluates the board: a winning line beats a full board.
#[instrument(skip(board))]
pub fn evaluate(board: &Board) -> Outcome {
    if let Some(mark) = check_winner(board) {
        Outcome::Win(mark)
    } else if is_full(board) {
        Outcome::Tie
    } else {
        Outcome::InProgress
    }
}

#[cfg(test)]
mod tests {
    use super::super::{Mark, Position, Square};
    use super::*;

    fn board_from(rows: [&str; 3]) -> Board {
        let mut board = Board::new();
        for (r, row) in rows.iter().enumerate() {
            for (c, ch) in row.chars().enumerate() {
                let square = match ch {
                    'X' => Square::Occupied(Mark::X),
                    'O' => Square::Occupied(Mark::O),
                    _ => Square::Empty,
                };
                if let Some(pos) = Position::from_row_col(r as i64, c as i64) {
                    board.set(pos, square);
                }
            }
        }
        board
    }

    #[test]
    fn test_empty_board_in_progress() {
        assert_eq!(evaluate(&Board::new()), Outcome::InProgress);
    }

    #[test]
    fn test_every_line_wins() {
        let lines = [
            ["XXX", "...", "..."],
            ["...", "XXX", "..."],
            ["...", "...", "XXX"],
            ["X..", "X..", "X.."],
            [".X.", ".X.", ".X."],
            ["..X", "..X", "..X"],
            ["X..", ".X.", "..X"],
            ["..X", ".X.", "X.."],
        ];
        for rows in lines {
            assert_eq!(evaluate(&board_from(rows)), Outcome::Win(Mark::X), "{rows:?}");
        }
    }

    #[test]
    fn test_full_board_without_line_is_tie() {
        let board = board_from(["XOX", "OXX", "OXO"]);
        assert_eq!(evaluate(&board), Outcome::Tie);
    }

    #[test]
    fn test_win_on_full_board_is_win() {
        let board = board_from(["XXX", "OOX", "XOO"]);
        assert_eq!(evaluate(&board), Outcome::Win(Mark::X));
    }

    #[test]
    fn test_mixed_line_is_not_win() {
        let board = board_from(["XOX", "...", "..."]);
        assert_eq!(evaluate(&board), Outcome::InProgress);
    }

    #[test]
    fn test_evaluate_is_idempotent() {
        let board = board_from(["OX.", ".O.", "X.O"]);
        let first = evaluate(&board);
        assert_eq!(first, Outcome::Win(Mark::O));
        assert_eq!(evaluate(&board), first);
        assert_eq!(evaluate(&board), first);
    }
}
