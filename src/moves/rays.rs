//! Ray casting shared by the sliding pieces and by attack detection.

use crate::game_state::board::Board;
use crate::game_state::chess_types::{Color, Piece, Square};

/// Walks from `square` in `(d_row, d_col)` and pushes every empty square,
/// then the first occupied one if it holds an opposing piece.
pub fn cast_ray(
    board: &Board,
    square: Square,
    color: Color,
    (d_row, d_col): (i8, i8),
    out: &mut Vec<Square>,
) {
    let mut cursor = square.offset(d_row, d_col);
    while let Some(to) = cursor {
        match board.piece_at(to) {
            None => out.push(to),
            Some(piece) => {
                if piece.color != color {
                    out.push(to);
                }
                break;
            }
        }
        cursor = to.offset(d_row, d_col);
    }
}

/// First piece met along a ray, with its square.
pub fn first_piece_along(
    board: &Board,
    square: Square,
    (d_row, d_col): (i8, i8),
) -> Option<(Square, Piece)> {
    let mut cursor = square.offset(d_row, d_col);
    while let Some(at) = cursor {
        if let Some(piece) = board.piece_at(at) {
            return Some((at, piece));
        }
        cursor = at.offset(d_row, d_col);
    }
    None
}

/// Squares strictly between two squares on a shared rank, file or diagonal.
/// Empty when they are adjacent or not aligned.
pub fn squares_between(a: Square, b: Square) -> Vec<Square> {
    let d_row = b.row() as i8 - a.row() as i8;
    let d_col = b.col() as i8 - a.col() as i8;
    let aligned = d_row == 0 || d_col == 0 || d_row.abs() == d_col.abs();
    if !aligned || a == b {
        return Vec::new();
    }

    let step = (d_row.signum(), d_col.signum());
    let mut out = Vec::new();
    let mut cursor = a.offset(step.0, step.1);
    while let Some(at) = cursor {
        if at == b {
            break;
        }
        out.push(at);
        cursor = at.offset(step.0, step.1);
    }
    out
}
