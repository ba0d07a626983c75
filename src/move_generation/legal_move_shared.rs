//! Piece-kind dispatch for pseudo-legal destinations.

use crate::game_state::board::Board;
use crate::game_state::chess_types::{Piece, PieceKind, Square};
use crate::moves::bishop_moves::bishop_moves;
use crate::moves::king_moves::king_moves;
use crate::moves::knight_moves::knight_moves;
use crate::moves::pawn_moves::pawn_moves;
use crate::moves::queen_moves::queen_moves;
use crate::moves::rook_moves::rook_moves;

/// Destinations obeying the movement rules of whatever stands on `square`,
/// without regard to the mover's king. Empty for an empty square.
pub fn pseudo_moves(square: Square, board: &Board) -> Vec<Square> {
    match board.piece_at(square) {
        Some(piece) => pseudo_moves_for(piece, square, board),
        None => Vec::new(),
    }
}

pub fn pseudo_moves_for(piece: Piece, square: Square, board: &Board) -> Vec<Square> {
    let mut out = Vec::with_capacity(28);
    match piece.kind {
        PieceKind::Pawn => pawn_moves(board, square, piece.color, &mut out),
        PieceKind::Knight => knight_moves(board, square, piece.color, &mut out),
        PieceKind::Bishop => bishop_moves(board, square, piece.color, &mut out),
        PieceKind::Rook => rook_moves(board, square, piece.color, &mut out),
        PieceKind::Queen => queen_moves(board, square, piece.color, &mut out),
        PieceKind::King => king_moves(board, square, piece.color, &mut out),
    }
    out
}

#[cfg(test)]
mod tests {
    use super::pseudo_moves;
    use crate::game_state::board::Board;
    use crate::game_state::chess_types::{Color, Square};

    #[test]
    fn empty_square_has_no_pseudo_moves() {
        let board = Board::initial();
        assert!(pseudo_moves(Square::from_algebraic("e4").expect("e4"), &board).is_empty());
    }

    #[test]
    fn starting_pseudo_move_total_is_twenty_per_side() {
        let board = Board::initial();
        let white: usize = board
            .pieces(Color::White)
            .map(|(sq, _)| pseudo_moves(sq, &board).len())
            .sum();
        assert_eq!(white, 20);
    }
}
