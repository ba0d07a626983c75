//! King stepping: one square in any of the eight directions.
//!
//! Castling is not a king step; it needs rule state and lives in the legal
//! move generator.

use crate::game_state::board::Board;
use crate::game_state::chess_types::{Color, Square};

pub const KING_OFFSETS: [(i8, i8); 8] = [
    (-1, -1),
    (-1, 0),
    (-1, 1),
    (0, -1),
    (0, 1),
    (1, -1),
    (1, 0),
    (1, 1),
];

#[inline]
pub fn king_targets(square: Square) -> impl Iterator<Item = Square> {
    KING_OFFSETS
        .iter()
        .filter_map(move |&(d_row, d_col)| square.offset(d_row, d_col))
}

pub fn king_moves(board: &Board, square: Square, color: Color, out: &mut Vec<Square>) {
    for to in king_targets(square) {
        match board.piece_at(to) {
            Some(piece) if piece.color == color => {}
            _ => out.push(to),
        }
    }
}
