//! Knight movement: a fixed table of eight jumps, bounds-checked per square.

use crate::game_state::board::Board;
use crate::game_state::chess_types::{Color, Square};

pub const KNIGHT_OFFSETS: [(i8, i8); 8] = [
    (-2, -1),
    (-2, 1),
    (-1, -2),
    (-1, 2),
    (1, -2),
    (1, 2),
    (2, -1),
    (2, 1),
];

/// On-board squares a knight on `square` jumps to, ignoring occupancy.
#[inline]
pub fn knight_targets(square: Square) -> impl Iterator<Item = Square> {
    KNIGHT_OFFSETS
        .iter()
        .filter_map(move |&(d_row, d_col)| square.offset(d_row, d_col))
}

/// Jumps onto empty squares or squares holding an opposing piece.
pub fn knight_moves(board: &Board, square: Square, color: Color, out: &mut Vec<Square>) {
    for to in knight_targets(square) {
        match board.piece_at(to) {
            Some(piece) if piece.color == color => {}
            _ => out.push(to),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{knight_moves, knight_targets};
    use crate::game_state::board::Board;
    use crate::game_state::chess_types::{Color, Square};

    #[test]
    fn knight_on_d4_has_eight_targets() {
        let d4 = Square::from_algebraic("d4").expect("d4");
        assert_eq!(knight_targets(d4).count(), 8);
    }

    #[test]
    fn knight_in_corner_has_two_targets() {
        let a1 = Square::from_algebraic("a1").expect("a1");
        assert_eq!(knight_targets(a1).count(), 2);
    }

    #[test]
    fn starting_knight_skips_own_pawn() {
        let board = Board::initial();
        let mut out = Vec::new();
        knight_moves(&board, Square::from_algebraic("g1").expect("g1"), Color::White, &mut out);
        let mut names: Vec<String> = out.iter().map(|sq| sq.to_string()).collect();
        names.sort();
        assert_eq!(names, vec!["f3", "h3"]);
    }
}
