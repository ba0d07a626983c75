use crate::game_state::board::Board;
use crate::game_state::chess_types::{Color, Square};
use crate::moves::rays::cast_ray;

pub const ROOK_DIRECTIONS: [(i8, i8); 4] = [(-1, 0), (1, 0), (0, -1), (0, 1)];

pub fn rook_moves(board: &Board, square: Square, color: Color, out: &mut Vec<Square>) {
    for direction in ROOK_DIRECTIONS {
        cast_ray(board, square, color, direction, out);
    }
}
