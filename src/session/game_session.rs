//! Game session orchestration.
//!
//! [`Session`] owns the current position, the ply history and the phase of
//! play. It validates human input, applies moves through the rules layer,
//! classifies the resulting position, and in vs-computer games schedules the
//! automated reply on a worker thread.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use crate::chess_errors::{ChessError, ChessResult};
use crate::engines::engine_minimax::MinimaxEngine;
use crate::engines::engine_trait::Engine;
use crate::game_state::board::Board;
use crate::game_state::chess_rules::capture_value;
use crate::game_state::chess_types::{Color, Piece, PieceKind, Square};
use crate::game_state::game_state::{initial_position, GameState};
use crate::move_generation::checkmate::{classify, GameStatus};
use crate::move_generation::legal_move_apply::{apply_move, is_promotion};
use crate::move_generation::legal_move_generator::legal_moves;
use crate::moves::move_descriptions::{Move, MoveRequest};
use crate::search::minimax::SearchConfig;
use crate::session::computer_reply::{ComputerReply, PendingReply};
use crate::session::history::{BoardHistory, HistoryEntry, MoveHistory};

pub const SEARCH_DEPTH_ENV: &str = "CHESS_SEARCH_DEPTH";
pub const REPLY_DELAY_ENV: &str = "CHESS_REPLY_DELAY_MS";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GameMode {
    VsComputer,
    VsHuman,
}

impl fmt::Display for GameMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GameMode::VsComputer => f.write_str("vs computer"),
            GameMode::VsHuman => f.write_str("vs player"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionConfig {
    pub mode: GameMode,
    pub computer_color: Color,
    /// Pause before the computer starts thinking.
    pub reply_delay: Duration,
    pub search: SearchConfig,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            mode: GameMode::VsComputer,
            computer_color: Color::Black,
            reply_delay: Duration::from_millis(500),
            search: SearchConfig::default(),
        }
    }
}

impl SessionConfig {
    /// Defaults overridden by `CHESS_SEARCH_DEPTH` and `CHESS_REPLY_DELAY_MS`.
    ///
    /// Unparseable values are logged and ignored.
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(value) = std::env::var(SEARCH_DEPTH_ENV) {
            match value.trim().parse::<u8>() {
                Ok(depth) if depth > 0 => config.search.depth = depth,
                _ => tracing::warn!(%value, "ignoring invalid {SEARCH_DEPTH_ENV}"),
            }
        }

        if let Ok(value) = std::env::var(REPLY_DELAY_ENV) {
            match value.trim().parse::<u64>() {
                Ok(ms) => config.reply_delay = Duration::from_millis(ms),
                Err(_) => tracing::warn!(%value, "ignoring invalid {REPLY_DELAY_ENV}"),
            }
        }

        config
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Outcome {
    Checkmate { winner: Color },
    Stalemate,
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::Checkmate { winner } => write!(f, "checkmate, {winner} wins"),
            Outcome::Stalemate => f.write_str("stalemate"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Phase {
    AwaitingMove,
    AwaitingPromotionChoice { from: Square, to: Square },
    GameOver(Outcome),
}

/// Result of a human move submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Submission {
    Played(Move),
    /// The pawn move is held until [`Session::choose_promotion`].
    AwaitingPromotion,
}

pub struct Session {
    player_name: String,
    config: SessionConfig,
    engine: Arc<dyn Engine>,
    board: Board,
    state: GameState,
    status: GameStatus,
    phase: Phase,
    history: Vec<HistoryEntry>,
    selected: Option<Square>,
    pending: Option<PendingReply>,
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("player_name", &self.player_name)
            .field("config", &self.config)
            .field("engine", &self.engine.name())
            .field("phase", &self.phase)
            .field("status", &self.status)
            .field("plies", &self.history.len())
            .field("reply_pending", &self.pending.is_some())
            .finish()
    }
}

impl Session {
    pub fn new(player_name: impl Into<String>, mode: GameMode, config: SessionConfig) -> Self {
        let config = SessionConfig { mode, ..config };
        let engine: Arc<dyn Engine> = Arc::new(MinimaxEngine::new(config.search));
        Self::with_engine(player_name, config, engine)
    }

    /// Session whose automated opponent is `engine`.
    pub fn with_engine(
        player_name: impl Into<String>,
        config: SessionConfig,
        engine: Arc<dyn Engine>,
    ) -> Self {
        let (board, state) = initial_position();
        let mut session = Self {
            player_name: player_name.into(),
            config,
            engine,
            board,
            state,
            status: GameStatus::Active,
            phase: Phase::AwaitingMove,
            history: Vec::new(),
            selected: None,
            pending: None,
        };
        tracing::info!(
            player = %session.player_name,
            mode = %session.config.mode,
            engine = session.engine.name(),
            "session started"
        );
        session.schedule_reply_if_due();
        session
    }

    #[inline]
    pub fn player_name(&self) -> &str {
        &self.player_name
    }

    #[inline]
    pub fn mode(&self) -> GameMode {
        self.config.mode
    }

    #[inline]
    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    #[inline]
    pub fn board(&self) -> &Board {
        &self.board
    }

    #[inline]
    pub fn state(&self) -> &GameState {
        &self.state
    }

    #[inline]
    pub fn side_to_move(&self) -> Color {
        self.state.side_to_move
    }

    #[inline]
    pub fn status(&self) -> GameStatus {
        self.status
    }

    #[inline]
    pub fn phase(&self) -> Phase {
        self.phase
    }

    #[inline]
    pub fn selected(&self) -> Option<Square> {
        self.selected
    }

    pub fn move_history(&self) -> MoveHistory<'_> {
        MoveHistory::new(&self.history)
    }

    pub fn board_history(&self) -> BoardHistory<'_> {
        BoardHistory::new(&self.history)
    }

    /// Origin and destination of the most recent ply, for highlighting.
    pub fn last_move(&self) -> Option<(Square, Square)> {
        self.state.last_move.map(|last| (last.from, last.to))
    }

    /// Pieces captured by `color`, most valuable first.
    pub fn captured_by(&self, color: Color) -> Vec<Piece> {
        let mut captured: Vec<Piece> = self
            .history
            .iter()
            .filter(|entry| entry.mv.piece.color == color)
            .filter_map(|entry| entry.mv.captured)
            .collect();
        captured.sort_by_key(|piece| std::cmp::Reverse(capture_value(piece.kind)));
        captured
    }

    /// True when the automated opponent is to move in a live game.
    pub fn is_computer_turn(&self) -> bool {
        self.config.mode == GameMode::VsComputer
            && self.state.side_to_move == self.config.computer_color
            && self.phase == Phase::AwaitingMove
    }

    #[inline]
    pub fn reply_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Selects the piece on `square` and returns its legal destinations.
    pub fn select(&mut self, square: Square) -> ChessResult<Vec<Square>> {
        self.ensure_human_can_move()?;
        self.check_owner(square)?;
        self.selected = Some(square);
        Ok(legal_moves(square, &self.board, &self.state))
    }

    pub fn deselect(&mut self) {
        self.selected = None;
    }

    /// Plays a human move.
    ///
    /// A pawn move into the last rank without `promotion` parks the session
    /// in [`Phase::AwaitingPromotionChoice`] and returns
    /// [`Submission::AwaitingPromotion`]; nothing is recorded until the
    /// choice arrives.
    pub fn submit_move(
        &mut self,
        from: Square,
        to: Square,
        promotion: Option<PieceKind>,
    ) -> ChessResult<Submission> {
        self.ensure_human_can_move()?;
        let piece = self.check_owner(from)?;

        if !legal_moves(from, &self.board, &self.state).contains(&to) {
            return Err(ChessError::IllegalMove { from, to });
        }

        if promotion.is_none() && is_promotion(piece, to) {
            self.phase = Phase::AwaitingPromotionChoice { from, to };
            self.selected = None;
            tracing::info!(%from, %to, "awaiting promotion choice");
            return Ok(Submission::AwaitingPromotion);
        }

        let mv = self.play(MoveRequest { from, to, promotion })?;
        Ok(Submission::Played(mv))
    }

    /// Completes a pending promotion with `kind`.
    pub fn choose_promotion(&mut self, kind: PieceKind) -> ChessResult<Move> {
        let Phase::AwaitingPromotionChoice { from, to } = self.phase else {
            return Err(ChessError::NotAwaitingPromotion);
        };
        if !kind.is_promotion_target() {
            return Err(ChessError::InvalidPromotion(kind));
        }
        self.phase = Phase::AwaitingMove;
        match self.play(MoveRequest::new(from, to).with_promotion(kind)) {
            Ok(mv) => Ok(mv),
            Err(err) => {
                self.phase = Phase::AwaitingPromotionChoice { from, to };
                Err(err)
            }
        }
    }

    /// Picks up a finished computer reply, if any, without blocking.
    ///
    /// Returns the computer's move once it has been applied.
    pub fn poll_computer_reply(&mut self) -> ChessResult<Option<Move>> {
        let Some(reply) = self.pending.as_ref().and_then(PendingReply::try_take) else {
            return Ok(None);
        };
        self.pending = None;
        self.accept_reply(reply)
    }

    /// Blocks until the scheduled computer reply arrives and applies it.
    ///
    /// `Ok(None)` when no reply is scheduled.
    pub fn wait_for_computer_reply(&mut self) -> ChessResult<Option<Move>> {
        let Some(pending) = self.pending.take() else {
            return Ok(None);
        };
        match pending.wait() {
            Some(reply) => self.accept_reply(reply),
            None => {
                self.schedule_reply_if_due();
                Ok(None)
            }
        }
    }

    /// Runs the engine synchronously for the computer's side, skipping the
    /// thinking delay.
    pub fn play_computer_move(&mut self) -> ChessResult<Option<Move>> {
        if !self.is_computer_turn() {
            return Err(ChessError::NotComputerTurn);
        }
        self.cancel_pending();
        match self.engine.choose_move(&self.board, &self.state)? {
            Some(request) => self.play(request).map(Some),
            None => Ok(None),
        }
    }

    /// Takes back the last ply, or the last two when the computer has just
    /// replied so that the human is to move again.
    pub fn undo(&mut self) -> ChessResult<()> {
        self.cancel_pending();
        self.selected = None;

        if let Phase::AwaitingPromotionChoice { from, .. } = self.phase {
            self.phase = Phase::AwaitingMove;
            tracing::info!(%from, "discarded pending promotion");
            return Ok(());
        }

        let Some(last) = self.history.last() else {
            return Err(ChessError::NothingToUndo);
        };

        let plies = match self.config.mode {
            GameMode::VsComputer
                if last.mv.piece.color == self.config.computer_color && self.history.len() >= 2 =>
            {
                2
            }
            _ => 1,
        };
        self.history.truncate(self.history.len() - plies);

        match self.history.last() {
            Some(entry) => {
                self.board = entry.board;
                self.state = entry.state;
                self.status = entry.status;
            }
            None => {
                (self.board, self.state) = initial_position();
                self.status = GameStatus::Active;
            }
        }
        self.phase = phase_for(self.status, self.state.side_to_move);

        tracing::info!(plies, remaining = self.history.len(), "undo");
        self.schedule_reply_if_due();
        Ok(())
    }

    /// Resets to the initial position.
    pub fn new_game(&mut self) {
        self.cancel_pending();
        (self.board, self.state) = initial_position();
        self.status = GameStatus::Active;
        self.phase = Phase::AwaitingMove;
        self.history.clear();
        self.selected = None;
        tracing::info!(player = %self.player_name, "new game");
        self.schedule_reply_if_due();
    }

    fn ensure_human_can_move(&self) -> ChessResult<()> {
        match self.phase {
            Phase::GameOver(_) => return Err(ChessError::GameOver),
            Phase::AwaitingPromotionChoice { from, .. } => {
                return Err(ChessError::PromotionPending(from))
            }
            Phase::AwaitingMove => {}
        }
        if self.is_computer_turn() {
            return Err(ChessError::ComputerToMove);
        }
        Ok(())
    }

    fn check_owner(&self, square: Square) -> ChessResult<Piece> {
        let piece = self
            .board
            .piece_at(square)
            .ok_or(ChessError::NoPieceSelected(square))?;
        if piece.color != self.state.side_to_move {
            return Err(ChessError::WrongColorPiece {
                square,
                owner: piece.color,
                to_move: self.state.side_to_move,
            });
        }
        Ok(piece)
    }

    fn play(&mut self, request: MoveRequest) -> ChessResult<Move> {
        let (board, state, mv) =
            apply_move(&self.board, &self.state, request.from, request.to, request.promotion)?;
        let status = classify(state.side_to_move, &board, &state);

        self.history.push(HistoryEntry {
            board,
            state,
            mv,
            status,
        });
        self.board = board;
        self.state = state;
        self.status = status;
        self.phase = phase_for(status, state.side_to_move);
        self.selected = None;

        tracing::info!(ply = self.history.len(), %mv, ?status, "move applied");
        if let Phase::GameOver(outcome) = self.phase {
            tracing::info!(%outcome, "game over");
        }

        self.schedule_reply_if_due();
        Ok(mv)
    }

    fn accept_reply(&mut self, reply: ComputerReply) -> ChessResult<Option<Move>> {
        if reply.ply != self.history.len() || !self.is_computer_turn() {
            tracing::warn!(
                reply_ply = reply.ply,
                current_ply = self.history.len(),
                "discarding stale computer reply"
            );
            self.schedule_reply_if_due();
            return Ok(None);
        }
        let played = match reply.result {
            Ok(Some(request)) => self.play(request).map(Some),
            Ok(None) => Ok(None),
            Err(err) => Err(err),
        };
        // A failed reply must not leave the computer's turn unattended.
        if played.is_err() {
            self.schedule_reply_if_due();
        }
        played
    }

    fn schedule_reply_if_due(&mut self) {
        if !self.is_computer_turn() {
            return;
        }
        let ply = self.history.len();
        tracing::debug!(ply, delay_ms = self.config.reply_delay.as_millis() as u64, "scheduling computer reply");
        self.pending = Some(PendingReply::schedule(
            Arc::clone(&self.engine),
            self.board,
            self.state,
            ply,
            self.config.reply_delay,
        ));
    }

    fn cancel_pending(&mut self) {
        if let Some(mut pending) = self.pending.take() {
            tracing::debug!(ply = pending.ply(), "cancelling computer reply");
            pending.cancel();
        }
    }
}

fn phase_for(status: GameStatus, side_to_move: Color) -> Phase {
    match status {
        GameStatus::Checkmate => Phase::GameOver(Outcome::Checkmate {
            winner: side_to_move.opposite(),
        }),
        GameStatus::Stalemate => Phase::GameOver(Outcome::Stalemate),
        GameStatus::Active | GameStatus::Check => Phase::AwaitingMove,
    }
}
