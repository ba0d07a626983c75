//! Pawn pushes and diagonal captures.
//!
//! En passant needs the previous ply and is added by the legal move
//! generator, not here.

use crate::game_state::board::Board;
use crate::game_state::chess_types::{Color, Square};

/// The two squares a pawn of `color` on `square` attacks.
#[inline]
pub fn pawn_attack_targets(square: Square, color: Color) -> impl Iterator<Item = Square> {
    let d_row = color.pawn_direction();
    [-1i8, 1]
        .into_iter()
        .filter_map(move |d_col| square.offset(d_row, d_col))
}

pub fn pawn_moves(board: &Board, square: Square, color: Color, out: &mut Vec<Square>) {
    let d_row = color.pawn_direction();

    if let Some(one) = square.offset(d_row, 0) {
        if board.is_empty_at(one) {
            out.push(one);

            if square.row() == color.pawn_start_row() {
                if let Some(two) = one.offset(d_row, 0) {
                    if board.is_empty_at(two) {
                        out.push(two);
                    }
                }
            }
        }
    }

    for to in pawn_attack_targets(square, color) {
        if let Some(target) = board.piece_at(to) {
            if target.color != color {
                out.push(to);
            }
        }
    }
}
