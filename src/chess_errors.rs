//! Errors used throughout the chess core.
//!
//! `ChessError` is the single error type returned by rule validation,
//! notation parsing, search, and session orchestration. Every variant is a
//! local, recoverable condition: callers report it back to whoever submitted
//! the input and ask again. A search that finds no move is not an error; it
//! signals a terminal position that the oracle classifies.

use thiserror::Error;

use crate::game_state::chess_types::{Color, PieceKind, Square};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ChessError {
    /// Destination is not among the legal moves of the selected piece.
    #[error("illegal move from {from} to {to}")]
    IllegalMove { from: Square, to: Square },

    /// A pawn move into the last rank was submitted without a piece choice.
    #[error("move from {from} to {to} promotes a pawn; a promotion piece is required")]
    PromotionRequired { from: Square, to: Square },

    /// The promotion choice is not a queen, rook, bishop, or knight, or the
    /// move does not promote at all.
    #[error("invalid promotion to {0}")]
    InvalidPromotion(PieceKind),

    #[error("no piece on {0}")]
    NoPieceSelected(Square),

    #[error("piece on {square} belongs to {owner}, but it is {to_move}'s turn")]
    WrongColorPiece {
        square: Square,
        owner: Color,
        to_move: Color,
    },

    #[error("invalid square notation: {0:?}")]
    InvalidSquare(String),

    #[error("invalid FEN: {0}")]
    InvalidFen(String),

    #[error("the game is over; start a new game")]
    GameOver,

    #[error("a promotion choice for {0} is still outstanding")]
    PromotionPending(Square),

    #[error("no promotion is pending")]
    NotAwaitingPromotion,

    #[error("nothing to undo")]
    NothingToUndo,

    #[error("it is not the computer's turn")]
    NotComputerTurn,

    /// A human move was submitted while the automated opponent is to move.
    #[error("it is the computer's turn")]
    ComputerToMove,

    #[error("search was cancelled")]
    SearchAborted,
}

pub type ChessResult<T> = Result<T, ChessError>;
