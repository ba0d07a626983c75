use crate::game_state::board::Board;
use crate::game_state::chess_types::{Color, Square};
use crate::moves::bishop_moves::BISHOP_DIRECTIONS;
use crate::moves::rays::cast_ray;
use crate::moves::rook_moves::ROOK_DIRECTIONS;

pub fn queen_moves(board: &Board, square: Square, color: Color, out: &mut Vec<Square>) {
    for direction in BISHOP_DIRECTIONS.into_iter().chain(ROOK_DIRECTIONS) {
        cast_ray(board, square, color, direction, out);
    }
}

#[cfg(test)]
mod tests {
    use super::queen_moves;
    use crate::game_state::board::Board;
    use crate::game_state::chess_types::{Color, Piece, PieceKind, Square};

    #[test]
    fn central_queen_on_empty_board() {
        let d4 = Square::from_algebraic("d4").expect("d4");
        let board = Board::empty().with_piece(d4, Piece::new(PieceKind::Queen, Color::White));
        let mut out = Vec::new();
        queen_moves(&board, d4, Color::White, &mut out);
        assert_eq!(out.len(), 27);
    }
}
