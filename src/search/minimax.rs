//! Fixed-depth minimax search with alpha-beta pruning.
//!
//! Scores come from black's point of view, so black maximizes and white
//! minimizes. Moves are enumerated with the shared legal move generator,
//! promotions are searched as queen promotions only, and positions without a
//! legal move are scored as mate (adjusted by ply so quicker mates win) or
//! stalemate.

use std::sync::atomic::{AtomicBool, Ordering};

use crate::chess_errors::{ChessError, ChessResult};
use crate::game_state::board::Board;
use crate::game_state::chess_types::Color;
use crate::game_state::game_state::GameState;
use crate::move_generation::legal_move_apply::{apply_move, make_move};
use crate::move_generation::legal_move_checks::is_in_check;
use crate::move_generation::legal_move_generator::{all_legal_moves, MoveGenOptions};
use crate::moves::move_descriptions::{Move, MoveRequest};
use crate::search::board_scoring::{BoardScorer, PieceSquareScorer, MATE_SCORE};

const INFINITY: i32 = i32::MAX;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchConfig {
    pub depth: u8,
    /// Lets the engine castle and capture en passant.
    pub include_special_moves: bool,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            depth: 3,
            include_special_moves: true,
        }
    }
}

impl SearchConfig {
    /// Depth in plies, never less than one.
    #[must_use]
    pub const fn with_depth(mut self, depth: u8) -> Self {
        self.depth = if depth == 0 { 1 } else { depth };
        self
    }

    /// Restricts the engine to plain moves: no castling, no en passant.
    #[must_use]
    pub const fn without_special_moves(mut self) -> Self {
        self.include_special_moves = false;
        self
    }

    fn move_options(&self) -> MoveGenOptions {
        MoveGenOptions {
            include_special_moves: self.include_special_moves,
            expand_promotions: false,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SearchResult {
    pub best: Option<MoveRequest>,
    pub score: i32,
    pub nodes: u64,
    pub depth: u8,
}

/// Searches for `state.side_to_move` with the default evaluation.
pub fn search(board: &Board, state: &GameState, config: &SearchConfig) -> ChessResult<SearchResult> {
    search_with_scorer(board, state, config, &PieceSquareScorer, None)
}

/// Like [`search`], returning [`ChessError::SearchAborted`] as soon as
/// `stop` is raised.
pub fn search_with_stop(
    board: &Board,
    state: &GameState,
    config: &SearchConfig,
    stop: &AtomicBool,
) -> ChessResult<SearchResult> {
    search_with_scorer(board, state, config, &PieceSquareScorer, Some(stop))
}

pub fn search_with_scorer<S: BoardScorer>(
    board: &Board,
    state: &GameState,
    config: &SearchConfig,
    scorer: &S,
    stop: Option<&AtomicBool>,
) -> ChessResult<SearchResult> {
    let mut ctx = SearchContext {
        scorer,
        options: config.move_options(),
        stop,
        nodes: 0,
    };

    // The root always expands, so `best` is `None` only without legal moves.
    let depth = config.depth.max(1);
    let (best, score) = minimax_root(&mut ctx, board, state, depth)?;

    tracing::debug!(
        side = %state.side_to_move,
        depth,
        nodes = ctx.nodes,
        score,
        best = ?best.map(|request| request.to_string()),
        "search finished"
    );

    Ok(SearchResult {
        best,
        score,
        nodes: ctx.nodes,
        depth,
    })
}

/// Chosen move for the side to move, applied and annotated.
///
/// `None` when the side to move has no legal move.
pub fn best_move(board: &Board, state: &GameState, config: &SearchConfig) -> ChessResult<Option<Move>> {
    let result = search(board, state, config)?;
    record_for(board, state, result.best)
}

/// [`best_move`] for `color` on a board with no castling rights or
/// en-passant window.
pub fn best_move_for(board: &Board, color: Color) -> ChessResult<Option<Move>> {
    best_move(board, &GameState::bare(color), &SearchConfig::default())
}

pub(crate) fn record_for(
    board: &Board,
    state: &GameState,
    best: Option<MoveRequest>,
) -> ChessResult<Option<Move>> {
    match best {
        Some(request) => {
            let (_, _, record) = apply_move(board, state, request.from, request.to, request.promotion)?;
            Ok(Some(record))
        }
        None => Ok(None),
    }
}

/// Score of a position with no legal move for the side to move.
pub fn terminal_score(board: &Board, state: &GameState, ply: u8) -> i32 {
    if !is_in_check(state.side_to_move, board) {
        return 0;
    }
    let mate = MATE_SCORE - i32::from(ply);
    match state.side_to_move {
        Color::Black => -mate,
        Color::White => mate,
    }
}

struct SearchContext<'a, S: BoardScorer> {
    scorer: &'a S,
    options: MoveGenOptions,
    stop: Option<&'a AtomicBool>,
    nodes: u64,
}

impl<S: BoardScorer> SearchContext<'_, S> {
    #[inline]
    fn check_stop(&self) -> ChessResult<()> {
        match self.stop {
            Some(flag) if flag.load(Ordering::Relaxed) => Err(ChessError::SearchAborted),
            _ => Ok(()),
        }
    }
}

fn minimax_root<S: BoardScorer>(
    ctx: &mut SearchContext<'_, S>,
    board: &Board,
    state: &GameState,
    depth: u8,
) -> ChessResult<(Option<MoveRequest>, i32)> {
    ctx.check_stop()?;
    ctx.nodes += 1;

    let moves = all_legal_moves(board, state, ctx.options);
    if moves.is_empty() {
        return Ok((None, terminal_score(board, state, 0)));
    }

    let maximizing = state.side_to_move == Color::Black;
    let mut alpha = -INFINITY;
    let mut beta = INFINITY;
    let mut best_move = None;
    let mut best_score = if maximizing { -INFINITY } else { INFINITY };

    for request in moves {
        let (next, next_state, _) = make_move(board, state, request)?;
        let score = minimax(ctx, &next, &next_state, depth - 1, 1, alpha, beta)?;

        if (maximizing && score > best_score) || (!maximizing && score < best_score) {
            best_score = score;
            best_move = Some(request);
        }
        if maximizing {
            alpha = alpha.max(score);
        } else {
            beta = beta.min(score);
        }
        if beta <= alpha {
            break;
        }
    }

    Ok((best_move, best_score))
}

fn minimax<S: BoardScorer>(
    ctx: &mut SearchContext<'_, S>,
    board: &Board,
    state: &GameState,
    depth: u8,
    ply: u8,
    mut alpha: i32,
    mut beta: i32,
) -> ChessResult<i32> {
    ctx.check_stop()?;
    ctx.nodes += 1;

    if depth == 0 {
        return Ok(ctx.scorer.score(board));
    }

    let moves = all_legal_moves(board, state, ctx.options);
    if moves.is_empty() {
        return Ok(terminal_score(board, state, ply));
    }

    let maximizing = state.side_to_move == Color::Black;
    let mut best = if maximizing { -INFINITY } else { INFINITY };

    for request in moves {
        let (next, next_state, _) = make_move(board, state, request)?;
        let score = minimax(ctx, &next, &next_state, depth - 1, ply.saturating_add(1), alpha, beta)?;

        if maximizing {
            best = best.max(score);
            alpha = alpha.max(score);
        } else {
            best = best.min(score);
            beta = beta.min(score);
        }
        if beta <= alpha {
            break;
        }
    }

    Ok(best)
}
