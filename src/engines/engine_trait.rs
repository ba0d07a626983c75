//! Engine abstraction used by the game session.
//!
//! The session holds its automated opponent as `Arc<dyn Engine>` and calls it
//! from a worker thread, so engines must be shareable and take `&self`.

use std::sync::atomic::AtomicBool;

use crate::chess_errors::ChessResult;
use crate::game_state::board::Board;
use crate::game_state::game_state::GameState;
use crate::moves::move_descriptions::MoveRequest;

pub trait Engine: Send + Sync {
    fn name(&self) -> &str;

    /// Move for `state.side_to_move`, or `None` when there is none.
    fn choose_move(&self, board: &Board, state: &GameState) -> ChessResult<Option<MoveRequest>>;

    /// Cancellable variant. Engines that cannot be interrupted ignore `stop`.
    fn choose_move_with_stop(
        &self,
        board: &Board,
        state: &GameState,
        _stop: &AtomicBool,
    ) -> ChessResult<Option<MoveRequest>> {
        self.choose_move(board, state)
    }
}
