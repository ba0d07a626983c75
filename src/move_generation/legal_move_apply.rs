//! Move application.
//!
//! [`make_move`] turns a request into a new board and rule state, resolving
//! castling rook relocation, en-passant pawn removal and promotion. It checks
//! only that the request is well formed. [`apply_move`] is the validated
//! entry point: it insists the destination is legal, then annotates the
//! resulting record with check and checkmate.

use crate::chess_errors::{ChessError, ChessResult};
use crate::game_state::board::Board;
use crate::game_state::chess_rules::{KINGSIDE_ROOK_COL, QUEENSIDE_ROOK_COL};
use crate::game_state::chess_types::{Color, Piece, PieceKind, Square};
use crate::game_state::game_state::{CastlingRights, GameState, LastMove};
use crate::move_generation::checkmate::{classify, GameStatus};
use crate::move_generation::legal_move_generator::legal_moves;
use crate::moves::move_descriptions::{Move, MoveKind, MoveRequest};

/// Board, rule state and record produced by one ply.
pub type Applied = (Board, GameState, Move);

/// Applies a validated move for `state.side_to_move`.
///
/// Fails with [`ChessError::IllegalMove`] if `to` is not among
/// `legal_moves(from, ..)`, and with [`ChessError::PromotionRequired`] if a
/// pawn enters the last rank without a choice.
pub fn apply_move(
    board: &Board,
    state: &GameState,
    from: Square,
    to: Square,
    promotion: Option<PieceKind>,
) -> ChessResult<Applied> {
    let piece = board
        .piece_at(from)
        .ok_or(ChessError::NoPieceSelected(from))?;
    if piece.color != state.side_to_move {
        return Err(ChessError::WrongColorPiece {
            square: from,
            owner: piece.color,
            to_move: state.side_to_move,
        });
    }

    if !legal_moves(from, board, state).contains(&to) {
        return Err(ChessError::IllegalMove { from, to });
    }

    let request = MoveRequest {
        from,
        to,
        promotion,
    };
    let (next_board, next_state, mut record) = make_move(board, state, request)?;

    let status = classify(next_state.side_to_move, &next_board, &next_state);
    record.is_check = matches!(status, GameStatus::Check | GameStatus::Checkmate);
    record.is_checkmate = status == GameStatus::Checkmate;

    tracing::trace!(%request, %record, "applied move");
    Ok((next_board, next_state, record))
}

/// Whether moving `piece` onto `to` promotes it.
#[inline]
pub fn is_promotion(piece: Piece, to: Square) -> bool {
    piece.kind == PieceKind::Pawn && to.row() == piece.color.promotion_row()
}

/// Applies `request` without consulting the legal move list.
///
/// The record's check flags are left unset.
pub fn make_move(board: &Board, state: &GameState, request: MoveRequest) -> ChessResult<Applied> {
    let MoveRequest {
        from,
        to,
        promotion,
    } = request;
    let piece = board
        .piece_at(from)
        .ok_or(ChessError::NoPieceSelected(from))?;

    match (is_promotion(piece, to), promotion) {
        (true, None) => return Err(ChessError::PromotionRequired { from, to }),
        (true, Some(kind)) if !kind.is_promotion_target() => {
            return Err(ChessError::InvalidPromotion(kind))
        }
        (false, Some(kind)) => return Err(ChessError::InvalidPromotion(kind)),
        _ => {}
    }

    let mut next = *board;
    let mut captured = next.piece_at(to);
    let col_delta = to.col() as i8 - from.col() as i8;
    let row_delta = to.row() as i8 - from.row() as i8;

    let kind = match piece.kind {
        PieceKind::King if col_delta.abs() == 2 => {
            let home = from.row();
            let (rook_col, rook_to_col, kind) = if col_delta > 0 {
                (KINGSIDE_ROOK_COL, to.col() - 1, MoveKind::CastleKingside)
            } else {
                (QUEENSIDE_ROOK_COL, to.col() + 1, MoveKind::CastleQueenside)
            };
            if let (Some(rook_from), Some(rook_to)) =
                (Square::new(home, rook_col), Square::new(home, rook_to_col))
            {
                next.relocate(rook_from, rook_to);
            }
            kind
        }
        PieceKind::Pawn if col_delta != 0 && captured.is_none() => {
            if let Some(victim) = Square::new(from.row(), to.col()) {
                captured = next.take(victim);
            }
            MoveKind::EnPassant
        }
        PieceKind::Pawn if row_delta.abs() == 2 => MoveKind::DoubleStep,
        _ => MoveKind::Normal,
    };

    next.relocate(from, to);
    if let Some(promoted) = promotion {
        next.set(to, Some(Piece::new(promoted, piece.color)));
    }

    let mut next_state = *state;
    next_state.side_to_move = piece.color.opposite();
    next_state.last_move = Some(LastMove { piece, from, to });
    next_state.en_passant_target = (kind == MoveKind::DoubleStep).then_some(to);
    update_castling_rights(&mut next_state.castling_rights, piece, from, to);

    let record = Move {
        piece,
        from,
        to,
        kind,
        captured,
        promotion,
        is_check: false,
        is_checkmate: false,
    };

    Ok((next, next_state, record))
}

fn update_castling_rights(rights: &mut CastlingRights, piece: Piece, from: Square, to: Square) {
    if piece.kind == PieceKind::King {
        rights.revoke_all(piece.color);
    }

    // A rook leaving its corner, or anything landing on one, ends that right.
    for color in Color::ALL {
        let home = color.home_row();
        for touched in [from, to] {
            if touched.row() != home {
                continue;
            }
            match touched.col() {
                KINGSIDE_ROOK_COL => rights.set_kingside(color, false),
                QUEENSIDE_ROOK_COL => rights.set_queenside(color, false),
                _ => {}
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{apply_move, make_move};
    use crate::chess_errors::ChessError;
    use crate::game_state::board::Board;
    use crate::game_state::chess_types::{Color, Piece, PieceKind, Square};
    use crate::game_state::game_state::{initial_position, GameState};
    use crate::moves::move_descriptions::{MoveKind, MoveRequest};
    use crate::utils::fen_parser::parse_fen;

    fn sq(name: &str) -> Square {
        Square::from_algebraic(name).expect("test square should parse")
    }

    fn play(board: &Board, state: &GameState, from: &str, to: &str) -> (Board, GameState) {
        let (b, s, _) = apply_move(board, state, sq(from), sq(to), None).expect("move should be legal");
        (b, s)
    }

    #[test]
    fn double_step_opens_en_passant_window_for_one_ply() {
        let (board, state) = initial_position();
        let (board, state) = play(&board, &state, "e2", "e4");
        assert_eq!(state.en_passant_target, Some(sq("e4")));
        assert_eq!(state.side_to_move, Color::Black);

        let (_, state) = play(&board, &state, "g8", "f6");
        assert_eq!(state.en_passant_target, None);
    }

    #[test]
    fn en_passant_removes_the_passed_pawn() {
        let (board, state) = parse_fen("4k3/3p4/8/4P3/8/8/8/4K3 b - - 0 1").expect("FEN should parse");
        let (board, state) = play(&board, &state, "d7", "d5");
        let (board, _, record) =
            apply_move(&board, &state, sq("e5"), sq("d6"), None).expect("en passant should be legal");

        assert_eq!(record.kind, MoveKind::EnPassant);
        assert_eq!(record.captured, Some(Piece::new(PieceKind::Pawn, Color::Black)));
        assert!(board.is_empty_at(sq("d5")));
        assert_eq!(
            board.piece_at(sq("d6")),
            Some(Piece::new(PieceKind::Pawn, Color::White))
        );
    }

    #[test]
    fn castling_relocates_rook_and_revokes_rights() {
        let (board, state) =
            parse_fen("r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1").expect("FEN should parse");
        let (board, state, record) =
            apply_move(&board, &state, sq("e1"), sq("g1"), None).expect("castling should be legal");

        assert_eq!(record.kind, MoveKind::CastleKingside);
        assert_eq!(board.piece_at(sq("f1")), Some(Piece::new(PieceKind::Rook, Color::White)));
        assert!(board.is_empty_at(sq("h1")));
        assert!(!state.castling_rights.kingside(Color::White));
        assert!(!state.castling_rights.queenside(Color::White));
        assert!(state.castling_rights.kingside(Color::Black));

        let (board, _, record) =
            apply_move(&board, &state, sq("e8"), sq("c8"), None).expect("black castles long");
        assert_eq!(record.kind, MoveKind::CastleQueenside);
        assert_eq!(board.piece_at(sq("d8")), Some(Piece::new(PieceKind::Rook, Color::Black)));
        assert!(board.is_empty_at(sq("a8")));
    }

    #[test]
    fn capturing_a_corner_rook_revokes_its_right() {
        let (board, state) =
            parse_fen("r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1").expect("FEN should parse");
        let (_, state) = play(&board, &state, "a1", "a8");
        assert!(!state.castling_rights.queenside(Color::White));
        assert!(!state.castling_rights.queenside(Color::Black));
        assert!(state.castling_rights.kingside(Color::Black));
        assert!(state.castling_rights.kingside(Color::White));
    }

    #[test]
    fn promotion_requires_a_choice() {
        let (board, state) = parse_fen("7k/P7/8/8/8/8/8/4K3 w - - 0 1").expect("FEN should parse");
        let err = apply_move(&board, &state, sq("a7"), sq("a8"), None).expect_err("choice needed");
        assert_eq!(
            err,
            ChessError::PromotionRequired {
                from: sq("a7"),
                to: sq("a8")
            }
        );

        let err = apply_move(&board, &state, sq("a7"), sq("a8"), Some(PieceKind::King))
            .expect_err("kings are not a promotion target");
        assert_eq!(err, ChessError::InvalidPromotion(PieceKind::King));

        let (board, _, record) = apply_move(&board, &state, sq("a7"), sq("a8"), Some(PieceKind::Queen))
            .expect("promotion should apply");
        assert_eq!(board.piece_at(sq("a8")), Some(Piece::new(PieceKind::Queen, Color::White)));
        assert!(record.is_check);
        assert!(!record.is_checkmate);
    }

    #[test]
    fn selection_errors_are_reported() {
        let (board, state) = initial_position();
        assert_eq!(
            apply_move(&board, &state, sq("e4"), sq("e5"), None).expect_err("empty square"),
            ChessError::NoPieceSelected(sq("e4"))
        );
        assert!(matches!(
            apply_move(&board, &state, sq("e7"), sq("e5"), None),
            Err(ChessError::WrongColorPiece { .. })
        ));
        assert_eq!(
            apply_move(&board, &state, sq("e2"), sq("e5"), None).expect_err("too far"),
            ChessError::IllegalMove {
                from: sq("e2"),
                to: sq("e5")
            }
        );
        assert!(matches!(
            apply_move(&board, &state, sq("e2"), sq("e4"), Some(PieceKind::Queen)),
            Err(ChessError::InvalidPromotion(PieceKind::Queen))
        ));
    }

    #[test]
    fn make_move_keeps_source_board_intact() {
        let (board, state) = initial_position();
        let (next, _, record) =
            make_move(&board, &state, MoveRequest::new(sq("g1"), sq("f3"))).expect("knight move");
        assert_eq!(board, Board::initial());
        assert!(next.is_empty_at(sq("g1")));
        assert_eq!(record.kind, MoveKind::Normal);
        assert!(!record.is_capture());
    }
}
