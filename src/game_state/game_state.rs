//! Auxiliary rule state that travels alongside a [`Board`].
//!
//! `GameState` carries the pieces of information a bare board cannot:
//! whose turn it is, which castling rights survive, and whether the last
//! ply opened an en-passant window.

use crate::game_state::board::Board;
use crate::game_state::chess_types::{Color, Piece, Square};

/// Explicit castling permissions, cleared permanently once the king or
/// the corresponding rook leaves its home square.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CastlingRights {
    kingside: [bool; 2],
    queenside: [bool; 2],
}

impl CastlingRights {
    pub const ALL: CastlingRights = CastlingRights {
        kingside: [true; 2],
        queenside: [true; 2],
    };

    pub const NONE: CastlingRights = CastlingRights {
        kingside: [false; 2],
        queenside: [false; 2],
    };

    #[inline]
    pub const fn kingside(&self, color: Color) -> bool {
        self.kingside[color.index()]
    }

    #[inline]
    pub const fn queenside(&self, color: Color) -> bool {
        self.queenside[color.index()]
    }

    #[inline]
    pub fn set_kingside(&mut self, color: Color, allowed: bool) {
        self.kingside[color.index()] = allowed;
    }

    #[inline]
    pub fn set_queenside(&mut self, color: Color, allowed: bool) {
        self.queenside[color.index()] = allowed;
    }

    #[inline]
    pub fn revoke_all(&mut self, color: Color) {
        self.kingside[color.index()] = false;
        self.queenside[color.index()] = false;
    }
}

impl Default for CastlingRights {
    fn default() -> Self {
        Self::ALL
    }
}

/// The most recently moved piece and where it travelled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LastMove {
    pub piece: Piece,
    pub from: Square,
    pub to: Square,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GameState {
    pub side_to_move: Color,
    pub last_move: Option<LastMove>,
    /// Square of a pawn that double-stepped on the previous ply.
    pub en_passant_target: Option<Square>,
    pub castling_rights: CastlingRights,
}

impl Default for GameState {
    fn default() -> Self {
        Self::new_game()
    }
}

impl GameState {
    #[inline]
    pub fn new_game() -> Self {
        Self {
            side_to_move: Color::White,
            last_move: None,
            en_passant_target: None,
            castling_rights: CastlingRights::ALL,
        }
    }

    /// State with no history at all: no castling rights, no en-passant window.
    #[inline]
    pub fn bare(side_to_move: Color) -> Self {
        Self {
            side_to_move,
            last_move: None,
            en_passant_target: None,
            castling_rights: CastlingRights::NONE,
        }
    }

    /// Square a capturing pawn lands on when taking `en_passant_target`.
    pub fn en_passant_capture_square(&self) -> Option<Square> {
        let target = self.en_passant_target?;
        target.offset(self.side_to_move.pawn_direction(), 0)
    }
}

/// Standard starting board plus its rule state.
pub fn initial_position() -> (Board, GameState) {
    (Board::initial(), GameState::new_game())
}
