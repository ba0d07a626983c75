//! Move instructions and move records.
//!
//! A [`MoveRequest`] is what a caller asks for. A [`Move`] is the record of
//! what actually happened once the request was applied, with castling and
//! en-passant side effects already resolved on the board.

use std::fmt;
use std::str::FromStr;

use crate::chess_errors::ChessError;
use crate::game_state::chess_types::{Piece, PieceKind, Square};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MoveRequest {
    pub from: Square,
    pub to: Square,
    pub promotion: Option<PieceKind>,
}

impl MoveRequest {
    #[inline]
    pub const fn new(from: Square, to: Square) -> Self {
        Self {
            from,
            to,
            promotion: None,
        }
    }

    #[inline]
    pub const fn with_promotion(mut self, promotion: PieceKind) -> Self {
        self.promotion = Some(promotion);
        self
    }
}

/// Coordinate notation such as `e2e4` or `e7e8q`.
impl fmt::Display for MoveRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.from, self.to)?;
        if let Some(kind) = self.promotion {
            let letter = match kind {
                PieceKind::Queen => 'q',
                PieceKind::Rook => 'r',
                PieceKind::Bishop => 'b',
                PieceKind::Knight => 'n',
                PieceKind::Pawn => 'p',
                PieceKind::King => 'k',
            };
            write!(f, "{letter}")?;
        }
        Ok(())
    }
}

/// Parses coordinate notation. A trailing letter names the promotion piece
/// and is validated only as a piece letter here.
impl FromStr for MoveRequest {
    type Err = ChessError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let text = s.trim();
        if !text.is_ascii() || !(4..=5).contains(&text.len()) {
            return Err(ChessError::InvalidSquare(text.to_owned()));
        }

        let from = Square::from_algebraic(&text[0..2])?;
        let to = Square::from_algebraic(&text[2..4])?;
        let mut request = MoveRequest::new(from, to);
        if let Some(letter) = text[4..].chars().next() {
            let kind = PieceKind::from_letter(letter)
                .ok_or_else(|| ChessError::InvalidSquare(text.to_owned()))?;
            request = request.with_promotion(kind);
        }
        Ok(request)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MoveKind {
    Normal,
    DoubleStep,
    EnPassant,
    CastleKingside,
    CastleQueenside,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Move {
    /// Piece as it stood on `from` before moving.
    pub piece: Piece,
    pub from: Square,
    pub to: Square,
    pub kind: MoveKind,
    /// Captured piece, including a pawn taken en passant.
    pub captured: Option<Piece>,
    pub promotion: Option<PieceKind>,
    pub is_check: bool,
    pub is_checkmate: bool,
}

impl Move {
    #[inline]
    pub const fn is_capture(&self) -> bool {
        self.captured.is_some()
    }

    /// Glyph of the piece standing on `to` after the move (the promoted
    /// piece for promotions).
    pub fn glyph(&self) -> char {
        match self.promotion {
            Some(kind) => Piece::new(kind, self.piece.color).glyph(),
            None => self.piece.glyph(),
        }
    }

    #[inline]
    pub const fn request(&self) -> MoveRequest {
        MoveRequest {
            from: self.from,
            to: self.to,
            promotion: self.promotion,
        }
    }
}

/// History notation: glyph, `x` on captures, destination, then `#` or `+`.
impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.glyph())?;
        if self.is_capture() {
            write!(f, "x")?;
        }
        write!(f, "{}", self.to)?;
        if self.is_checkmate {
            write!(f, "#")?;
        } else if self.is_check {
            write!(f, "+")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::{Move, MoveKind, MoveRequest};
    use crate::game_state::chess_types::{Color, Piece, PieceKind, Square};

    fn sq(name: &str) -> Square {
        Square::from_algebraic(name).expect("test square should parse")
    }

    #[test]
    fn history_notation_marks_capture_and_mate() {
        let mv = Move {
            piece: Piece::new(PieceKind::Queen, Color::Black),
            from: sq("d8"),
            to: sq("h4"),
            kind: MoveKind::Normal,
            captured: None,
            promotion: None,
            is_check: true,
            is_checkmate: true,
        };
        assert_eq!(mv.to_string(), "♛h4#");

        let capture = Move {
            captured: Some(Piece::new(PieceKind::Pawn, Color::White)),
            is_checkmate: false,
            ..mv
        };
        assert_eq!(capture.to_string(), "♛xh4+");
    }

    #[test]
    fn promotion_uses_promoted_glyph() {
        let mv = Move {
            piece: Piece::new(PieceKind::Pawn, Color::White),
            from: sq("a7"),
            to: sq("a8"),
            kind: MoveKind::Normal,
            captured: None,
            promotion: Some(PieceKind::Knight),
            is_check: false,
            is_checkmate: false,
        };
        assert_eq!(mv.to_string(), "♘a8");
        assert_eq!(mv.request().to_string(), "a7a8n");
    }

    #[test]
    fn request_coordinate_notation() {
        let request = MoveRequest::new(sq("e2"), sq("e4"));
        assert_eq!(request.to_string(), "e2e4");
        assert_eq!("e2e4".parse::<MoveRequest>(), Ok(request));
        assert_eq!(
            "e7e8q".parse::<MoveRequest>(),
            Ok(MoveRequest::new(sq("e7"), sq("e8")).with_promotion(PieceKind::Queen))
        );
        assert!("e2".parse::<MoveRequest>().is_err());
        assert!("e2e9".parse::<MoveRequest>().is_err());
        assert!("e7e8x".parse::<MoveRequest>().is_err());
    }
}
