//! Minimax alpha-beta engine, the default automated opponent.

use std::sync::atomic::AtomicBool;

use crate::chess_errors::ChessResult;
use crate::engines::engine_trait::Engine;
use crate::game_state::board::Board;
use crate::game_state::game_state::GameState;
use crate::moves::move_descriptions::MoveRequest;
use crate::search::minimax::{search, search_with_stop, SearchConfig};

#[derive(Debug, Clone, Copy, Default)]
pub struct MinimaxEngine {
    config: SearchConfig,
}

impl MinimaxEngine {
    pub fn new(config: SearchConfig) -> Self {
        Self { config }
    }

    #[inline]
    pub fn config(&self) -> &SearchConfig {
        &self.config
    }
}

impl Engine for MinimaxEngine {
    fn name(&self) -> &str {
        "Minimax"
    }

    fn choose_move(&self, board: &Board, state: &GameState) -> ChessResult<Option<MoveRequest>> {
        Ok(search(board, state, &self.config)?.best)
    }

    fn choose_move_with_stop(
        &self,
        board: &Board,
        state: &GameState,
        stop: &AtomicBool,
    ) -> ChessResult<Option<MoveRequest>> {
        Ok(search_with_stop(board, state, &self.config, stop)?.best)
    }
}
