//! Checkmate and stalemate determination.
//!
//! [`is_checkmate`] works from the board alone and answers by asking how a
//! check could be met: take the checker, step the king away, or put
//! something in the way of a sliding checker. A double check can only be
//! met by the king. Because the board carries no en-passant window, an
//! en-passant capture is never considered as an answer here.
//!
//! [`classify`] has the full [`GameState`] and defers to the legal move
//! generator with special moves on. The two agree except in the rare
//! position where capturing the checking pawn en passant is the only
//! defence: `is_checkmate` reports mate, `classify` reports check.

use crate::game_state::board::Board;
use crate::game_state::chess_types::{Color, Square};
use crate::game_state::game_state::GameState;
use crate::move_generation::legal_move_checks::{
    checkers, is_in_check, is_square_attacked, king_square,
};
use crate::move_generation::legal_move_generator::{has_legal_move, MoveGenOptions};
use crate::move_generation::legal_move_shared::pseudo_moves;
use crate::moves::rays::squares_between;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GameStatus {
    Active,
    Check,
    Checkmate,
    Stalemate,
}

impl GameStatus {
    #[inline]
    pub const fn is_terminal(self) -> bool {
        matches!(self, GameStatus::Checkmate | GameStatus::Stalemate)
    }
}

pub fn is_checkmate(color: Color, board: &Board) -> bool {
    let checking = checkers(color, board);
    if checking.is_empty() {
        return false;
    }
    let Some(king_sq) = king_square(board, color) else {
        return false;
    };

    if can_king_escape(color, king_sq, board) {
        return false;
    }
    if checking.len() > 1 {
        return true;
    }

    let checker = checking[0];
    if can_cover(color, checker, board) {
        return false;
    }

    let slider = board
        .piece_at(checker)
        .is_some_and(|piece| piece.kind.is_slider());
    if slider
        && squares_between(king_sq, checker)
            .into_iter()
            .any(|between| can_cover(color, between, board))
    {
        return false;
    }

    true
}

/// True when the king on `king_sq` has a pseudo move onto a square that is
/// not attacked once it stands there.
pub fn can_king_escape(color: Color, king_sq: Square, board: &Board) -> bool {
    pseudo_moves(king_sq, board).into_iter().any(|to| {
        let trial = board.with_move(king_sq, to);
        !is_square_attacked(to, color.opposite(), &trial)
    })
}

/// True when some `color` piece can move onto `target` and leave its own
/// king out of check.
pub fn can_cover(color: Color, target: Square, board: &Board) -> bool {
    board.pieces(color).any(|(from, _)| {
        pseudo_moves(from, board).contains(&target)
            && !is_in_check(color, &board.with_move(from, target))
    })
}

/// Not in check, and no legal move at all (special moves included).
pub fn is_stalemate(color: Color, board: &Board, state: &GameState) -> bool {
    !is_in_check(color, board) && !has_legal_move(board, &as_mover(color, state), MoveGenOptions::default())
}

pub fn classify(color: Color, board: &Board, state: &GameState) -> GameStatus {
    let in_check = is_in_check(color, board);
    let can_move = has_legal_move(board, &as_mover(color, state), MoveGenOptions::default());
    match (in_check, can_move) {
        (true, false) => GameStatus::Checkmate,
        (true, true) => GameStatus::Check,
        (false, false) => GameStatus::Stalemate,
        (false, true) => GameStatus::Active,
    }
}

fn as_mover(color: Color, state: &GameState) -> GameState {
    GameState {
        side_to_move: color,
        ..*state
    }
}

#[cfg(test)]
mod tests {
    use rand::prelude::IndexedRandom;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use super::{classify, is_checkmate, is_stalemate, GameStatus};
    use crate::game_state::board::Board;
    use crate::game_state::chess_types::{Color, PieceKind, Square};
    use crate::game_state::game_state::{initial_position, GameState};
    use crate::move_generation::legal_move_apply::{apply_move, make_move};
    use crate::move_generation::legal_move_checks::is_in_check;
    use crate::move_generation::legal_move_generator::{all_legal_moves, MoveGenOptions};
    use crate::utils::fen_parser::parse_fen;

    fn sq(name: &str) -> Square {
        Square::from_algebraic(name).expect("test square should parse")
    }

    fn play(board: &Board, state: &GameState, from: &str, to: &str) -> (Board, GameState) {
        let (b, s, _) =
            apply_move(board, state, sq(from), sq(to), None).expect("scripted move should be legal");
        (b, s)
    }

    #[test]
    fn fools_mate() {
        let (board, state) = initial_position();
        let (board, state) = play(&board, &state, "f2", "f3");
        let (board, state) = play(&board, &state, "e7", "e5");
        let (board, state) = play(&board, &state, "g2", "g4");
        let (board, state, record) = apply_move(&board, &state, sq("d8"), sq("h4"), None)
            .expect("queen delivers mate");

        assert!(record.is_checkmate);
        assert!(is_checkmate(Color::White, &board));
        assert!(all_legal_moves(&board, &state, MoveGenOptions::default()).is_empty());
        assert_eq!(classify(Color::White, &board, &state), GameStatus::Checkmate);
    }

    #[test]
    fn scholars_mate_protected_queen() {
        let (board, state) =
            parse_fen("r1bqkb1r/pppp1Qpp/2n2n2/4p3/2B1P3/8/PPPP1PPP/RNB1K1NR b KQkq - 0 4")
                .expect("FEN should parse");
        assert!(is_checkmate(Color::Black, &board));
        assert_eq!(classify(Color::Black, &board, &state), GameStatus::Checkmate);
    }

    #[test]
    fn interposition_saves_a_back_rank_check() {
        let (mated, _) =
            parse_fen("4k3/8/8/8/8/8/6PP/r6K w - - 0 1").expect("FEN should parse");
        assert!(is_checkmate(Color::White, &mated));

        let (blocked, _) =
            parse_fen("4k3/8/8/8/8/4B3/6PP/r6K w - - 0 1").expect("FEN should parse");
        assert!(is_in_check(Color::White, &blocked));
        assert!(!is_checkmate(Color::White, &blocked));
    }

    #[test]
    fn pinned_defender_cannot_block() {
        // The g2 bishop could block on f1 but is pinned by the a8 queen.
        let (pinned, _) =
            parse_fen("q3k3/8/8/8/8/8/6BP/r6K w - - 0 1").expect("FEN should parse");
        assert!(is_checkmate(Color::White, &pinned));

        let (free, _) =
            parse_fen("4k3/8/8/8/8/8/6BP/r6K w - - 0 1").expect("FEN should parse");
        assert!(!is_checkmate(Color::White, &free));
    }

    #[test]
    fn double_check_allows_only_king_moves() {
        let (board, state) =
            parse_fen("4k3/6b1/5N2/8/8/8/8/4R1K1 b - - 0 1").expect("FEN should parse");
        let moves = all_legal_moves(&board, &state, MoveGenOptions::default());
        assert!(!moves.is_empty());
        assert!(moves.iter().all(|m| m.from == sq("e8")));
        assert!(!is_checkmate(Color::Black, &board));
        assert_eq!(classify(Color::Black, &board, &state), GameStatus::Check);
    }

    #[test]
    fn double_check_mate_despite_possible_block() {
        // Knight f6 and rook e1 both check; the f7 bishop could block on e6,
        // but that leaves the knight's check standing.
        let (board, _) =
            parse_fen("3rkr2/3p1b2/5N2/8/8/8/8/4R1K1 b - - 0 1").expect("FEN should parse");
        assert!(is_checkmate(Color::Black, &board));
    }

    #[test]
    fn stalemate_is_not_checkmate() {
        let (board, state) =
            parse_fen("7k/5Q2/6K1/8/8/8/8/8 b - - 0 1").expect("FEN should parse");
        assert!(!is_checkmate(Color::Black, &board));
        assert!(is_stalemate(Color::Black, &board, &state));
        assert_eq!(classify(Color::Black, &board, &state), GameStatus::Stalemate);
        assert!(GameStatus::Stalemate.is_terminal());
    }

    #[test]
    fn en_passant_escape_separates_the_two_oracles() {
        let (board, state) =
            parse_fen("3q3k/8/p7/1pP5/K7/7r/3b4/8 w - b6 0 1").expect("FEN should parse");
        assert!(is_checkmate(Color::White, &board));
        assert_eq!(classify(Color::White, &board, &state), GameStatus::Check);

        let moves = all_legal_moves(&board, &state, MoveGenOptions::default());
        assert_eq!(moves.len(), 1);
        assert_eq!(moves[0].to, sq("b6"));
    }

    #[test]
    fn oracle_agrees_with_exhaustive_search_on_random_playouts() {
        let plain = MoveGenOptions {
            include_special_moves: false,
            ..MoveGenOptions::default()
        };
        let mut rng = StdRng::seed_from_u64(0xc4ec);
        for _ in 0..60 {
            let (mut board, mut state) = initial_position();
            for _ in 0..200 {
                let mover = state.side_to_move;
                let no_plain_moves = all_legal_moves(&board, &state, plain).is_empty();
                assert_eq!(
                    is_checkmate(mover, &board),
                    is_in_check(mover, &board) && no_plain_moves,
                    "oracle disagreement"
                );

                let moves = all_legal_moves(&board, &state, MoveGenOptions::default());
                // Under-promotions only widen the tree.
                let moves: Vec<_> = moves
                    .into_iter()
                    .filter(|m| m.promotion.is_none_or(|kind| kind == PieceKind::Queen))
                    .collect();
                let Some(pick) = moves.choose(&mut rng) else {
                    break;
                };
                let (next, next_state, _) =
                    make_move(&board, &state, *pick).expect("legal move applies");
                board = next;
                state = next_state;
            }
        }
    }
}
