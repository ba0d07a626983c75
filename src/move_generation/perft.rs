use std::panic;
use std::thread;

use crate::chess_errors::ChessResult;
use crate::game_state::board::Board;
use crate::game_state::game_state::GameState;
use crate::move_generation::legal_move_apply::make_move;
use crate::move_generation::legal_move_checks::is_in_check;
use crate::move_generation::legal_move_generator::{all_legal_moves, MoveGenOptions};
use crate::moves::move_descriptions::{Move, MoveKind};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PerftCounts {
    pub nodes: usize,
    pub captures: usize,
    pub en_passant: usize,
    pub castles: usize,
    pub promotions: usize,
    pub checks: usize,
}

impl PerftCounts {
    fn merge(&mut self, rhs: PerftCounts) {
        self.nodes += rhs.nodes;
        self.captures += rhs.captures;
        self.en_passant += rhs.en_passant;
        self.castles += rhs.castles;
        self.promotions += rhs.promotions;
        self.checks += rhs.checks;
    }

    fn record_leaf(&mut self, mv: &Move, next: &Board, next_state: &GameState) {
        self.nodes += 1;
        if mv.is_capture() {
            self.captures += 1;
        }
        match mv.kind {
            MoveKind::EnPassant => self.en_passant += 1,
            MoveKind::CastleKingside | MoveKind::CastleQueenside => self.castles += 1,
            MoveKind::Normal | MoveKind::DoubleStep => {}
        }
        if mv.promotion.is_some() {
            self.promotions += 1;
        }
        if is_in_check(next_state.side_to_move, next) {
            self.checks += 1;
        }
    }
}

/// Leaf-node statistics of the full legal move tree, every promotion piece
/// counted separately.
pub fn perft(board: &Board, state: &GameState, depth: u8) -> ChessResult<PerftCounts> {
    perft_single_thread(board, state, depth)
}

pub fn perft_single_thread(board: &Board, state: &GameState, depth: u8) -> ChessResult<PerftCounts> {
    let mut total = PerftCounts::default();
    if depth == 0 {
        total.nodes = 1;
        return Ok(total);
    }
    perft_recurse(board, state, depth, &mut total)?;
    Ok(total)
}

/// Splits the root moves across scoped worker threads, one per move.
pub fn perft_multi_threaded(board: &Board, state: &GameState, depth: u8) -> ChessResult<PerftCounts> {
    if depth <= 1 {
        return perft_single_thread(board, state, depth);
    }

    let root_moves = all_legal_moves(board, state, MoveGenOptions::default());
    let results: Vec<ChessResult<PerftCounts>> = thread::scope(|scope| {
        let handles: Vec<_> = root_moves
            .into_iter()
            .map(|request| {
                scope.spawn(move || {
                    let (next, next_state, _) = make_move(board, state, request)?;
                    perft_single_thread(&next, &next_state, depth - 1)
                })
            })
            .collect();

        handles
            .into_iter()
            .map(|handle| handle.join().unwrap_or_else(|payload| panic::resume_unwind(payload)))
            .collect()
    });

    let mut total = PerftCounts::default();
    for result in results {
        total.merge(result?);
    }
    Ok(total)
}

fn perft_recurse(
    board: &Board,
    state: &GameState,
    depth: u8,
    counts: &mut PerftCounts,
) -> ChessResult<()> {
    for request in all_legal_moves(board, state, MoveGenOptions::default()) {
        let (next, next_state, mv) = make_move(board, state, request)?;
        if depth == 1 {
            counts.record_leaf(&mv, &next, &next_state);
        } else {
            perft_recurse(&next, &next_state, depth - 1, counts)?;
        }
    }
    Ok(())
}
