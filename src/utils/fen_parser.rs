//! FEN-to-position parser.
//!
//! Builds a [`Board`] and its [`GameState`] from a Forsyth-Edwards Notation
//! string. Used to set up positions for tests, benches and the CLI; it is not
//! a save format. The halfmove and fullmove fields are optional and, when
//! present, only validated.

use crate::chess_errors::{ChessError, ChessResult};
use crate::game_state::board::Board;
use crate::game_state::chess_types::{Color, Piece, PieceKind, Square};
use crate::game_state::game_state::{CastlingRights, GameState};

pub fn parse_fen(fen: &str) -> ChessResult<(Board, GameState)> {
    let mut parts = fen.split_whitespace();

    let board_part = parts.next().ok_or_else(|| invalid("missing board layout"))?;
    let side_part = parts.next().ok_or_else(|| invalid("missing side-to-move"))?;
    let castling_part = parts.next().ok_or_else(|| invalid("missing castling rights"))?;
    let en_passant_part = parts.next().ok_or_else(|| invalid("missing en-passant square"))?;

    for (label, field) in [("halfmove clock", parts.next()), ("fullmove number", parts.next())] {
        if let Some(value) = field {
            value
                .parse::<u16>()
                .map_err(|_| invalid(format!("invalid {label}: {value}")))?;
        }
    }
    if parts.next().is_some() {
        return Err(invalid("FEN has extra trailing fields"));
    }

    let board = parse_board(board_part)?;
    let side_to_move = parse_side_to_move(side_part)?;
    let castling_rights = parse_castling_rights(castling_part)?;
    let en_passant_target = parse_en_passant_target(en_passant_part, side_to_move)?;

    let state = GameState {
        side_to_move,
        last_move: None,
        en_passant_target,
        castling_rights,
    };
    Ok((board, state))
}

fn invalid(message: impl Into<String>) -> ChessError {
    ChessError::InvalidFen(message.into())
}

fn parse_board(board_part: &str) -> ChessResult<Board> {
    let ranks: Vec<&str> = board_part.split('/').collect();
    if ranks.len() != 8 {
        return Err(invalid("board layout must contain 8 ranks"));
    }

    let mut board = Board::empty();
    // FEN lists rank 8 first, which is row 0.
    for (row, rank_str) in ranks.iter().enumerate() {
        let mut col = 0u8;

        for ch in rank_str.chars() {
            if let Some(empty_count) = ch.to_digit(10) {
                if !(1..=8).contains(&empty_count) {
                    return Err(invalid(format!("invalid empty-square count '{ch}'")));
                }
                col += empty_count as u8;
                continue;
            }

            let piece = piece_from_fen_char(ch)
                .ok_or_else(|| invalid(format!("invalid piece character '{ch}' in board layout")))?;
            let square = Square::new(row as u8, col)
                .ok_or_else(|| invalid("board rank has too many files"))?;
            board = board.with_piece(square, piece);
            col += 1;
        }

        if col != 8 {
            return Err(invalid("board rank does not sum to 8 files"));
        }
    }

    Ok(board)
}

fn parse_side_to_move(side_part: &str) -> ChessResult<Color> {
    match side_part {
        "w" => Ok(Color::White),
        "b" => Ok(Color::Black),
        _ => Err(invalid(format!("invalid side-to-move field: {side_part}"))),
    }
}

fn parse_castling_rights(castling_part: &str) -> ChessResult<CastlingRights> {
    let mut rights = CastlingRights::NONE;
    if castling_part == "-" {
        return Ok(rights);
    }

    for ch in castling_part.chars() {
        match ch {
            'K' => rights.set_kingside(Color::White, true),
            'Q' => rights.set_queenside(Color::White, true),
            'k' => rights.set_kingside(Color::Black, true),
            'q' => rights.set_queenside(Color::Black, true),
            _ => return Err(invalid(format!("invalid castling rights character: {ch}"))),
        }
    }

    Ok(rights)
}

/// FEN names the square the pawn skipped; the rule state tracks the pawn.
fn parse_en_passant_target(en_passant_part: &str, side_to_move: Color) -> ChessResult<Option<Square>> {
    if en_passant_part == "-" {
        return Ok(None);
    }

    let skipped = Square::from_algebraic(en_passant_part)
        .map_err(|_| invalid(format!("invalid en-passant square: {en_passant_part}")))?;
    let mover = side_to_move.opposite();
    skipped
        .offset(mover.pawn_direction(), 0)
        .map(Some)
        .ok_or_else(|| invalid(format!("en-passant square off the board: {en_passant_part}")))
}

fn piece_from_fen_char(ch: char) -> Option<Piece> {
    let color = if ch.is_ascii_uppercase() {
        Color::White
    } else if ch.is_ascii_lowercase() {
        Color::Black
    } else {
        return None;
    };

    PieceKind::from_letter(ch).map(|kind| Piece::new(kind, color))
}

#[cfg(test)]
mod tests {
    use super::parse_fen;
    use crate::chess_errors::ChessError;
    use crate::game_state::board::Board;
    use crate::game_state::chess_rules::STARTING_POSITION_FEN;
    use crate::game_state::chess_types::{Color, Piece, PieceKind, Square};
    use crate::game_state::game_state::{CastlingRights, GameState};
    use crate::utils::render_board::render_board;

    #[test]
    fn parse_starting_fen_and_render_board() {
        let (board, state) = parse_fen(STARTING_POSITION_FEN).expect("starting FEN should parse");

        println!("\n{}", render_board(&board));

        assert_eq!(board, Board::initial());
        assert_eq!(state, GameState::new_game());
    }

    #[test]
    fn en_passant_field_maps_to_pawn_square() {
        let (board, state) =
            parse_fen("4k3/8/8/3pP3/8/8/8/4K3 w - d6 0 3").expect("FEN should parse");
        let d5 = Square::from_algebraic("d5").expect("d5");
        assert_eq!(state.en_passant_target, Some(d5));
        assert_eq!(board.piece_at(d5), Some(Piece::new(PieceKind::Pawn, Color::Black)));
    }

    #[test]
    fn partial_castling_rights() {
        let (_, state) = parse_fen("r3k2r/8/8/8/8/8/8/R3K2R b Kq - 0 1").expect("FEN should parse");
        let rights = state.castling_rights;
        assert!(rights.kingside(Color::White));
        assert!(!rights.queenside(Color::White));
        assert!(!rights.kingside(Color::Black));
        assert!(rights.queenside(Color::Black));
        assert_ne!(rights, CastlingRights::ALL);
        assert_eq!(state.side_to_move, Color::Black);
    }

    #[test]
    fn clocks_are_optional() {
        assert!(parse_fen("4k3/8/8/8/8/8/8/4K3 w - -").is_ok());
    }

    #[test]
    fn malformed_fen_is_rejected() {
        for fen in [
            "",
            "8/8/8/8/8/8/8 w - - 0 1",
            "4k3/8/8/8/8/8/8/4K4 w - - 0 1",
            "4k3/8/8/8/8/8/8/4X3 w - - 0 1",
            "4k3/8/8/8/8/8/8/4K3 x - - 0 1",
            "4k3/8/8/8/8/8/8/4K3 w Z - 0 1",
            "4k3/8/8/8/8/8/8/4K3 w - z9 0 1",
            "4k3/8/8/8/8/8/8/4K3 w - - x 1",
            "4k3/8/8/8/8/8/8/4K3 w - - 0 1 extra",
        ] {
            assert!(
                matches!(parse_fen(fen), Err(ChessError::InvalidFen(_))),
                "expected rejection of {fen:?}"
            );
        }
    }
}
