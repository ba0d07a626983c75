//! Delayed, cancellable computer replies.
//!
//! A worker thread waits out the cosmetic thinking delay on a cancel channel,
//! then searches a private copy of the position and sends the result back.
//! Cancelling sends on the channel and raises the search's stop flag; the
//! worker is joined when the handle is dropped.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender, TryRecvError};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use crate::chess_errors::ChessResult;
use crate::engines::engine_trait::Engine;
use crate::game_state::board::Board;
use crate::game_state::game_state::GameState;
use crate::moves::move_descriptions::MoveRequest;

/// Engine answer tagged with the history length it was computed for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComputerReply {
    pub ply: usize,
    pub result: ChessResult<Option<MoveRequest>>,
}

pub struct PendingReply {
    ply: usize,
    stop: Arc<AtomicBool>,
    cancel_tx: Sender<()>,
    reply_rx: Receiver<ComputerReply>,
    worker: Option<JoinHandle<()>>,
}

impl PendingReply {
    pub fn schedule(
        engine: Arc<dyn Engine>,
        board: Board,
        state: GameState,
        ply: usize,
        delay: Duration,
    ) -> Self {
        let stop = Arc::new(AtomicBool::new(false));
        let (cancel_tx, cancel_rx) = mpsc::channel::<()>();
        let (reply_tx, reply_rx) = mpsc::channel();

        let worker_stop = Arc::clone(&stop);
        let worker = thread::spawn(move || {
            match cancel_rx.recv_timeout(delay) {
                Err(RecvTimeoutError::Timeout) => {}
                Ok(()) | Err(RecvTimeoutError::Disconnected) => {
                    tracing::debug!(ply, "computer reply cancelled before search");
                    return;
                }
            }

            let result = engine.choose_move_with_stop(&board, &state, &worker_stop);
            if worker_stop.load(Ordering::Relaxed) {
                tracing::debug!(ply, "computer reply cancelled during search");
                return;
            }
            // The receiver is gone if the session moved on; nothing to do then.
            let _ = reply_tx.send(ComputerReply { ply, result });
        });

        Self {
            ply,
            stop,
            cancel_tx,
            reply_rx,
            worker: Some(worker),
        }
    }

    /// History length this reply was scheduled for.
    #[inline]
    pub fn ply(&self) -> usize {
        self.ply
    }

    /// Non-blocking check for a finished reply.
    ///
    /// `None` while the worker is still waiting or searching, and also once
    /// it has exited without replying.
    pub fn try_take(&self) -> Option<ComputerReply> {
        match self.reply_rx.try_recv() {
            Ok(reply) => Some(reply),
            Err(TryRecvError::Empty | TryRecvError::Disconnected) => None,
        }
    }

    /// Blocks until the worker replies or exits.
    pub fn wait(&self) -> Option<ComputerReply> {
        self.reply_rx.recv().ok()
    }

    pub fn cancel(&mut self) {
        self.stop.store(true, Ordering::Relaxed);
        let _ = self.cancel_tx.send(());
    }
}

impl Drop for PendingReply {
    fn drop(&mut self) {
        self.cancel();
        if let Some(worker) = self.worker.take() {
            if worker.join().is_err() {
                tracing::warn!(ply = self.ply, "computer reply worker panicked");
            }
        }
    }
}
