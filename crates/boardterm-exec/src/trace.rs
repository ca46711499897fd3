//! Render trace (C8, §4.4): stable per-line ids/versions plus cursor and
//! blink state, so a renderer can detect what changed without re-scanning
//! cell content.

use crate::board::Board;
use crate::cursor::Cursor;

/// Per-line trace entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineTrace {
    pub id: u64,
    pub version: u64,
    pub has_blinking_cells: bool,
}

/// A point-in-time snapshot of everything a renderer needs to decide
/// whether to redraw.
#[derive(Debug, Clone)]
pub struct Snapshot {
    pub width: u32,
    pub height: u32,
    pub lines: Vec<LineTrace>,
    pub cursor: Cursor,
    pub blink_tick: u64,
}

impl Snapshot {
    #[must_use]
    pub fn capture(board: &Board, blink_tick: u64) -> Self {
        let lines = (0..board.height())
            .map(|row| {
                let line = board.line(row);
                let has_blinking_cells = line.cells().iter().any(|c| {
                    let attr = board.attrs.get(c.attribute);
                    attr.is_blinking()
                });
                LineTrace { id: line.id(), version: line.version(), has_blinking_cells }
            })
            .collect();
        Snapshot { width: board.width(), height: board.height(), lines, cursor: board.cursor, blink_tick }
    }

    /// Which rows changed content/version relative to `prior`, by row index.
    #[must_use]
    pub fn changed_rows(&self, prior: &Snapshot) -> Vec<u32> {
        self.lines
            .iter()
            .enumerate()
            .filter(|(i, t)| prior.lines.get(*i).is_none_or(|p| p.id != t.id || p.version != t.version))
            .map(|(i, _)| i as u32)
            .collect()
    }

    #[must_use]
    pub fn cursor_changed(&self, prior: &Snapshot) -> bool {
        self.cursor != prior.cursor
    }

    #[must_use]
    pub fn metric_changed(&self, prior: &Snapshot) -> bool {
        self.width != prior.width || self.height != prior.height
    }

    #[must_use]
    pub fn blink_changed(&self, prior: &Snapshot) -> bool {
        self.blink_tick != prior.blink_tick
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unchanged_board_produces_no_changed_rows() {
        let board = Board::new(5, 2, 0);
        let a = Snapshot::capture(&board, 0);
        let b = Snapshot::capture(&board, 0);
        assert!(a.changed_rows(&b).is_empty());
        assert!(!a.cursor_changed(&b));
    }
}
