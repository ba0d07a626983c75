//! Per-ply game history.
//!
//! A session keeps one `Vec<HistoryEntry>`; [`MoveHistory`] and
//! [`BoardHistory`] are borrowed views over it, so the two can never
//! disagree on length.

use crate::game_state::board::Board;
use crate::game_state::game_state::GameState;
use crate::move_generation::checkmate::GameStatus;
use crate::moves::move_descriptions::Move;

/// Position reached after one completed ply, plus the ply itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HistoryEntry {
    pub board: Board,
    pub state: GameState,
    pub mv: Move,
    pub status: GameStatus,
}

#[derive(Debug, Clone, Copy)]
pub struct MoveHistory<'a> {
    entries: &'a [HistoryEntry],
}

impl<'a> MoveHistory<'a> {
    pub(crate) fn new(entries: &'a [HistoryEntry]) -> Self {
        Self { entries }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &'a Move> + 'a {
        self.entries.iter().map(|entry| &entry.mv)
    }

    pub fn last(&self) -> Option<&'a Move> {
        self.entries.last().map(|entry| &entry.mv)
    }

    /// One line per full move, e.g. `1. ♙e4 ♟e5`.
    ///
    /// Assumes white moved first, which holds for every session game.
    pub fn numbered_lines(&self) -> Vec<String> {
        self.entries
            .chunks(2)
            .enumerate()
            .map(|(idx, pair)| {
                let mut line = format!("{}. {}", idx + 1, pair[0].mv);
                if let Some(reply) = pair.get(1) {
                    line.push(' ');
                    line.push_str(&reply.mv.to_string());
                }
                line
            })
            .collect()
    }
}

#[derive(Debug, Clone, Copy)]
pub struct BoardHistory<'a> {
    entries: &'a [HistoryEntry],
}

impl<'a> BoardHistory<'a> {
    pub(crate) fn new(entries: &'a [HistoryEntry]) -> Self {
        Self { entries }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &'a HistoryEntry> + 'a {
        self.entries.iter()
    }

    pub fn get(&self, ply: usize) -> Option<&'a HistoryEntry> {
        self.entries.get(ply)
    }

    pub fn last(&self) -> Option<&'a HistoryEntry> {
        self.entries.last()
    }
}
