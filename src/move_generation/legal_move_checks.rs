//! Attack and check detection.
//!
//! [`is_square_attacked`] is the single source of truth for "is this square
//! attacked". Check detection, castling-path safety and the checkmate oracle
//! all go through it or through [`checkers`], which applies the same
//! decomposition but reports every attacker of a king.

use crate::game_state::board::Board;
use crate::game_state::chess_types::{Color, PieceKind, Square};
use crate::moves::bishop_moves::BISHOP_DIRECTIONS;
use crate::moves::king_moves::king_targets;
use crate::moves::knight_moves::knight_targets;
use crate::moves::pawn_moves::pawn_attack_targets;
use crate::moves::rays::first_piece_along;
use crate::moves::rook_moves::ROOK_DIRECTIONS;

#[inline]
pub fn king_square(board: &Board, color: Color) -> Option<Square> {
    board.find_king(color)
}

/// A king that is missing from the board is never in check.
#[inline]
pub fn is_in_check(color: Color, board: &Board) -> bool {
    let Some(king_sq) = king_square(board, color) else {
        return false;
    };
    is_square_attacked(king_sq, color.opposite(), board)
}

pub fn is_square_attacked(square: Square, by_color: Color, board: &Board) -> bool {
    !attackers_of(square, by_color, board, true).is_empty()
}

/// Squares of every `color.opposite()` piece currently giving check to the
/// `color` king.
pub fn checkers(color: Color, board: &Board) -> Vec<Square> {
    let Some(king_sq) = king_square(board, color) else {
        return Vec::new();
    };
    attackers_of(king_sq, color.opposite(), board, false)
}

fn attackers_of(square: Square, by_color: Color, board: &Board, first_only: bool) -> Vec<Square> {
    let mut found = Vec::new();
    let holds = |at: Square, kind: PieceKind| {
        board
            .piece_at(at)
            .is_some_and(|piece| piece.color == by_color && piece.kind == kind)
    };

    // A pawn attacks `square` from one row behind it, seen from its own side.
    for from in pawn_attack_targets(square, by_color.opposite()) {
        if holds(from, PieceKind::Pawn) {
            found.push(from);
            if first_only {
                return found;
            }
        }
    }

    for from in knight_targets(square) {
        if holds(from, PieceKind::Knight) {
            found.push(from);
            if first_only {
                return found;
            }
        }
    }

    for direction in BISHOP_DIRECTIONS {
        if let Some((at, piece)) = first_piece_along(board, square, direction) {
            if piece.color == by_color && matches!(piece.kind, PieceKind::Bishop | PieceKind::Queen)
            {
                found.push(at);
                if first_only {
                    return found;
                }
            }
        }
    }

    for direction in ROOK_DIRECTIONS {
        if let Some((at, piece)) = first_piece_along(board, square, direction) {
            if piece.color == by_color && matches!(piece.kind, PieceKind::Rook | PieceKind::Queen) {
                found.push(at);
                if first_only {
                    return found;
                }
            }
        }
    }

    for from in king_targets(square) {
        if holds(from, PieceKind::King) {
            found.push(from);
            if first_only {
                return found;
            }
        }
    }

    found
}

#[cfg(test)]
mod tests {
    use super::{checkers, is_in_check, is_square_attacked};
    use crate::game_state::board::Board;
    use crate::game_state::chess_types::{Color, Square};
    use crate::utils::fen_parser::parse_fen;

    fn sq(name: &str) -> Square {
        Square::from_algebraic(name).expect("test square should parse")
    }

    #[test]
    fn starting_position_attacks() {
        let board = Board::initial();
        assert!(is_square_attacked(sq("e3"), Color::White, &board));
        assert!(is_square_attacked(sq("f3"), Color::White, &board));
        assert!(!is_square_attacked(sq("e4"), Color::White, &board));
        assert!(is_square_attacked(sq("f6"), Color::Black, &board));
        assert!(!is_in_check(Color::White, &board));
        assert!(!is_in_check(Color::Black, &board));
    }

    #[test]
    fn pawn_attacks_point_forward_only() {
        let (board, _) = parse_fen("4k3/8/8/3p4/8/8/8/4K3 w - - 0 1").expect("FEN should parse");
        assert!(is_square_attacked(sq("c4"), Color::Black, &board));
        assert!(is_square_attacked(sq("e4"), Color::Black, &board));
        assert!(!is_square_attacked(sq("c6"), Color::Black, &board));
        assert!(!is_square_attacked(sq("d4"), Color::Black, &board));
    }

    #[test]
    fn sliders_are_blocked_by_any_piece() {
        let (board, _) =
            parse_fen("4k3/8/8/8/8/8/4P3/r3K2r w - - 0 1").expect("FEN should parse");
        // Both rooks hit e1 along the back rank.
        assert_eq!(checkers(Color::White, &board).len(), 2);

        let (blocked, _) =
            parse_fen("4k3/4r3/8/8/8/8/4P3/4K3 w - - 0 1").expect("FEN should parse");
        assert!(!is_in_check(Color::White, &blocked));
        assert!(is_square_attacked(sq("e3"), Color::Black, &blocked));
    }

    #[test]
    fn adjacent_king_counts_as_attacker() {
        let (board, _) = parse_fen("8/8/8/3k4/8/8/8/4K3 w - - 0 1").expect("FEN should parse");
        assert!(is_square_attacked(sq("e4"), Color::Black, &board));
        assert!(is_square_attacked(sq("d2"), Color::White, &board));
        assert!(!is_square_attacked(sq("d3"), Color::White, &board));
    }

    #[test]
    fn missing_king_is_not_in_check() {
        assert!(!is_in_check(Color::White, &Board::empty()));
        assert!(checkers(Color::White, &Board::empty()).is_empty());
    }
}
