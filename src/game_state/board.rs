//! Mailbox board representation.
//!
//! `Board` is a plain `Copy` array of 64 optional pieces. Every trial position
//! built during legality testing or search is a fresh copy, so the board that
//! belongs to a game session is never touched by speculative work.

use crate::game_state::chess_rules::BACK_RANK;
use crate::game_state::chess_types::{Color, Piece, PieceKind, Square};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Board {
    cells: [[Option<Piece>; 8]; 8],
}

impl Default for Board {
    fn default() -> Self {
        Self::empty()
    }
}

impl Board {
    #[inline]
    pub const fn empty() -> Self {
        Self {
            cells: [[None; 8]; 8],
        }
    }

    /// Standard starting layout, black on rows 0-1 and white on rows 6-7.
    pub fn initial() -> Self {
        let mut board = Self::empty();
        for col in 0..8u8 {
            let kind = BACK_RANK[col as usize];
            board.cells[0][col as usize] = Some(Piece::new(kind, Color::Black));
            board.cells[1][col as usize] = Some(Piece::new(PieceKind::Pawn, Color::Black));
            board.cells[6][col as usize] = Some(Piece::new(PieceKind::Pawn, Color::White));
            board.cells[7][col as usize] = Some(Piece::new(kind, Color::White));
        }
        board
    }

    #[inline]
    pub fn piece_at(&self, square: Square) -> Option<Piece> {
        self.cells[square.row() as usize][square.col() as usize]
    }

    #[inline]
    pub fn is_empty_at(&self, square: Square) -> bool {
        self.piece_at(square).is_none()
    }

    /// Returns a copy with whatever stands on `from` relocated to `to`.
    ///
    /// No legality checking; side effects of castling, en passant and
    /// promotion are the caller's business.
    #[must_use]
    pub fn with_move(&self, from: Square, to: Square) -> Board {
        let mut next = *self;
        next.relocate(from, to);
        next
    }

    pub(crate) fn relocate(&mut self, from: Square, to: Square) {
        let piece = self.take(from);
        self.set(to, piece);
    }

    pub(crate) fn set(&mut self, square: Square, piece: Option<Piece>) {
        self.cells[square.row() as usize][square.col() as usize] = piece;
    }

    pub(crate) fn take(&mut self, square: Square) -> Option<Piece> {
        self.cells[square.row() as usize][square.col() as usize].take()
    }

    /// Builder used by FEN parsing and tests.
    #[must_use]
    pub fn with_piece(mut self, square: Square, piece: Piece) -> Board {
        self.set(square, Some(piece));
        self
    }

    pub fn find_king(&self, color: Color) -> Option<Square> {
        let king = Piece::new(PieceKind::King, color);
        Square::all().find(|sq| self.piece_at(*sq) == Some(king))
    }

    /// Occupied squares of one color in row-major order.
    pub fn pieces(&self, color: Color) -> impl Iterator<Item = (Square, Piece)> + '_ {
        Square::all().filter_map(move |sq| match self.piece_at(sq) {
            Some(piece) if piece.color == color => Some((sq, piece)),
            _ => None,
        })
    }

    /// Every occupied square in row-major order.
    pub fn occupied(&self) -> impl Iterator<Item = (Square, Piece)> + '_ {
        Square::all().filter_map(move |sq| self.piece_at(sq).map(|piece| (sq, piece)))
    }
}

#[cfg(test)]
mod tests {
    use super::Board;
    use crate::game_state::chess_types::{Color, Piece, PieceKind, Square};

    fn sq(name: &str) -> Square {
        Square::from_algebraic(name).expect("test square should parse")
    }

    #[test]
    fn initial_board_has_one_king_per_side() {
        let board = Board::initial();
        assert_eq!(board.find_king(Color::White), Some(sq("e1")));
        assert_eq!(board.find_king(Color::Black), Some(sq("e8")));
        assert_eq!(board.pieces(Color::White).count(), 16);
        assert_eq!(board.pieces(Color::Black).count(), 16);
        assert_eq!(
            board.piece_at(sq("d8")),
            Some(Piece::new(PieceKind::Queen, Color::Black))
        );
    }

    #[test]
    fn with_move_leaves_original_untouched() {
        let board = Board::initial();
        let moved = board.with_move(sq("e2"), sq("e4"));

        assert!(moved.is_empty_at(sq("e2")));
        assert_eq!(
            moved.piece_at(sq("e4")),
            Some(Piece::new(PieceKind::Pawn, Color::White))
        );
        assert_eq!(board, Board::initial());
    }
}
