//! Full legal move generation pipeline.
//!
//! Collects piece-wise pseudo-legal destinations, adds castling and en
//! passant when asked to, then drops every candidate that would leave the
//! mover's own king in check once fully applied to a copy of the board.
//! The same generator serves move-input highlighting, move validation and
//! the search; [`MoveGenOptions`] is the only thing that differs.

use crate::game_state::board::Board;
use crate::game_state::chess_rules::{KINGSIDE_ROOK_COL, KING_START_COL, QUEENSIDE_ROOK_COL};
use crate::game_state::chess_types::{Color, Piece, PieceKind, Square};
use crate::game_state::game_state::GameState;
use crate::move_generation::legal_move_apply::{is_promotion, make_move};
use crate::move_generation::legal_move_checks::{is_in_check, is_square_attacked};
use crate::move_generation::legal_move_shared::pseudo_moves_for;
use crate::moves::move_descriptions::MoveRequest;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MoveGenOptions {
    /// Adds castling and en-passant captures to the candidates.
    pub include_special_moves: bool,
    /// Emits one request per promotion piece instead of a single queen
    /// promotion.
    pub expand_promotions: bool,
}

impl Default for MoveGenOptions {
    fn default() -> Self {
        Self {
            include_special_moves: true,
            expand_promotions: true,
        }
    }
}

/// Legal destinations for the piece on `square`, special moves included.
///
/// Empty when the square is empty or holds a piece of the side not to move.
pub fn legal_moves(square: Square, board: &Board, state: &GameState) -> Vec<Square> {
    legal_moves_with(square, board, state, MoveGenOptions::default())
}

pub fn legal_moves_with(
    square: Square,
    board: &Board,
    state: &GameState,
    options: MoveGenOptions,
) -> Vec<Square> {
    let Some(piece) = board.piece_at(square) else {
        return Vec::new();
    };
    if piece.color != state.side_to_move {
        return Vec::new();
    }

    let mut candidates = pseudo_moves_for(piece, square, board);

    if options.include_special_moves {
        match piece.kind {
            PieceKind::King => castling_targets(board, state, square, piece.color, &mut candidates),
            PieceKind::Pawn => {
                if let Some(to) = en_passant_destination(state, board, square, piece.color) {
                    candidates.push(to);
                }
            }
            _ => {}
        }
    }

    candidates.retain(|&to| leaves_king_safe(board, state, piece, square, to));
    candidates
}

/// Every legal move for the side to move, in row-major origin order.
pub fn all_legal_moves(board: &Board, state: &GameState, options: MoveGenOptions) -> Vec<MoveRequest> {
    let mut out = Vec::with_capacity(48);
    for (from, piece) in board.pieces(state.side_to_move) {
        for to in legal_moves_with(from, board, state, options) {
            if !is_promotion(piece, to) {
                out.push(MoveRequest::new(from, to));
            } else if options.expand_promotions {
                out.extend(
                    PieceKind::PROMOTIONS
                        .iter()
                        .map(|&kind| MoveRequest::new(from, to).with_promotion(kind)),
                );
            } else {
                out.push(MoveRequest::new(from, to).with_promotion(PieceKind::Queen));
            }
        }
    }
    out
}

/// True when the side to move has at least one legal move.
pub fn has_legal_move(board: &Board, state: &GameState, options: MoveGenOptions) -> bool {
    board
        .pieces(state.side_to_move)
        .any(|(from, _)| !legal_moves_with(from, board, state, options).is_empty())
}

fn leaves_king_safe(board: &Board, state: &GameState, piece: Piece, from: Square, to: Square) -> bool {
    let mut request = MoveRequest::new(from, to);
    if is_promotion(piece, to) {
        request = request.with_promotion(PieceKind::Queen);
    }
    match make_move(board, state, request) {
        Ok((next, _, _)) => {
            let safe = !is_in_check(piece.color, &next);
            if !safe {
                tracing::trace!(%request, "rejected: leaves king in check");
            }
            safe
        }
        Err(err) => {
            tracing::trace!(%request, %err, "rejected candidate");
            false
        }
    }
}

fn castling_targets(
    board: &Board,
    state: &GameState,
    king_sq: Square,
    color: Color,
    out: &mut Vec<Square>,
) {
    let home = color.home_row();
    if king_sq.row() != home || king_sq.col() != KING_START_COL {
        return;
    }
    if is_in_check(color, board) {
        return;
    }

    let rights = state.castling_rights;
    let sides = [
        (rights.kingside(color), KINGSIDE_ROOK_COL, 1i8),
        (rights.queenside(color), QUEENSIDE_ROOK_COL, -1i8),
    ];

    for (allowed, rook_col, direction) in sides {
        if !allowed {
            continue;
        }
        let Some(rook_sq) = Square::new(home, rook_col) else {
            continue;
        };
        if board.piece_at(rook_sq) != Some(Piece::new(PieceKind::Rook, color)) {
            continue;
        }

        let path_clear = between_on_rank(home, KING_START_COL, rook_col)
            .all(|sq| board.is_empty_at(sq));
        if !path_clear {
            continue;
        }

        // The king may not stand on, cross, or land on an attacked square.
        let king_path_safe = (1..=2).all(|step| {
            king_sq
                .offset(0, direction * step)
                .is_some_and(|sq| {
                    let trial = board.with_move(king_sq, sq);
                    !is_square_attacked(sq, color.opposite(), &trial)
                })
        });
        if !king_path_safe {
            continue;
        }

        if let Some(to) = king_sq.offset(0, direction * 2) {
            out.push(to);
        }
    }
}

fn between_on_rank(row: u8, a: u8, b: u8) -> impl Iterator<Item = Square> {
    let (lo, hi) = if a < b { (a, b) } else { (b, a) };
    (lo + 1..hi).filter_map(move |col| Square::new(row, col))
}

fn en_passant_destination(
    state: &GameState,
    board: &Board,
    square: Square,
    color: Color,
) -> Option<Square> {
    let target = state.en_passant_target?;
    if square.row() != color.en_passant_row() || target.row() != square.row() {
        return None;
    }
    if (target.col() as i8 - square.col() as i8).abs() != 1 {
        return None;
    }
    if board.piece_at(target) != Some(Piece::new(PieceKind::Pawn, color.opposite())) {
        return None;
    }
    let to = target.offset(color.pawn_direction(), 0)?;
    board.is_empty_at(to).then_some(to)
}
