//! Board and scroll-back (C6, §3, §4.3).
//!
//! Grounded on §9's "ring buffer with rotation index" design note: the
//! visible window keeps a rotation index for cheap scroll, while
//! scroll-back is an explicit `VecDeque` FIFO, not a second ring.

use std::collections::VecDeque;

use boardterm_line::Line;
use boardterm_model::AttributeTable;

use crate::cursor::Cursor;

/// Top/bottom and left/right margins, each optionally disabled (sentinel
/// "no margin" per §4.3).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Margins {
    pub top: u32,
    pub bottom: u32,
    pub left: Option<u32>,
    pub right: Option<u32>,
}

impl Margins {
    #[must_use]
    pub const fn full(height: u32) -> Self {
        Margins { top: 0, bottom: height, left: None, right: None }
    }

    #[must_use]
    pub fn left_col(&self) -> u32 {
        self.left.unwrap_or(0)
    }

    #[must_use]
    pub fn right_col(&self, width: u32) -> u32 {
        self.right.unwrap_or(width)
    }
}

/// A fixed-height window of lines addressed through a rotation offset, plus
/// cursor, margins, and the attribute table backing every cell in it.
pub struct Board {
    width: u32,
    height: u32,
    lines: Vec<Line>,
    rotation: usize,
    next_line_id: u64,
    pub cursor: Cursor,
    pub margins: Margins,
    pub attrs: AttributeTable,
    pub scrollback: VecDeque<Line>,
    pub scrollback_cap: usize,
    pub reverse_video: bool,
    pub autowrap: bool,
    pub tab_stops: Vec<u32>,
}

impl Board {
    #[must_use]
    pub fn new(width: u32, height: u32, scrollback_cap: usize) -> Self {
        let mut next_line_id = 0;
        let lines = (0..height)
            .map(|_| {
                let l = Line::new(next_line_id, width);
                next_line_id += 1;
                l
            })
            .collect();
        Board {
            width,
            height,
            lines,
            rotation: 0,
            next_line_id,
            cursor: Cursor::new(),
            margins: Margins::full(height),
            attrs: AttributeTable::new(),
            scrollback: VecDeque::new(),
            scrollback_cap,
            reverse_video: false,
            autowrap: true,
            tab_stops: default_tab_stops(width),
        }
    }

    #[must_use]
    pub const fn width(&self) -> u32 {
        self.width
    }

    #[must_use]
    pub const fn height(&self) -> u32 {
        self.height
    }

    fn physical_index(&self, row: u32) -> usize {
        (self.rotation + row as usize) % self.lines.len()
    }

    #[must_use]
    pub fn line(&self, row: u32) -> &Line {
        &self.lines[self.physical_index(row)]
    }

    pub fn line_mut(&mut self, row: u32) -> &mut Line {
        let idx = self.physical_index(row);
        &mut self.lines[idx]
    }

    /// Borrow one line and the attribute table simultaneously, for edit
    /// primitives that need to retain/release handles while mutating cells.
    pub fn line_and_attrs_mut(&mut self, row: u32) -> (&mut Line, &mut AttributeTable) {
        let idx = self.physical_index(row);
        (&mut self.lines[idx], &mut self.attrs)
    }

    /// Rotate the visible window by `shift` rows (positive scrolls content
    /// up). When `transfer`, rows evicted off the top are pushed into
    /// scroll-back (main board only — callers on the alt-screen pass
    /// `transfer = false`).
    pub fn rotate(&mut self, shift: i32, transfer: bool) {
        if shift == 0 {
            return;
        }
        if shift > 0 {
            for _ in 0..shift {
                if transfer {
                    let evicted_idx = self.rotation;
                    let fresh = Line::new(self.next_line_id, self.width);
                    self.next_line_id += 1;
                    let evicted = std::mem::replace(&mut self.lines[evicted_idx], fresh);
                    self.push_scrollback(evicted);
                } else {
                    let idx = self.rotation;
                    self.lines[idx] = Line::new(self.next_line_id, self.width);
                    self.next_line_id += 1;
                }
                self.rotation = (self.rotation + 1) % self.lines.len();
            }
        } else {
            for _ in 0..(-shift) {
                self.rotation = (self.rotation + self.lines.len() - 1) % self.lines.len();
                let idx = self.rotation;
                self.lines[idx] = Line::new(self.next_line_id, self.width);
                self.next_line_id += 1;
            }
        }
    }

    /// Rotate rows `[top, bottom)` by `shift` (positive moves content up,
    /// revealing blank rows at the bottom of the region). Delegates to the
    /// cheap whole-board [`Self::rotate`] when the region is the full
    /// board (§4.3 "full-width... cheap line rotation"); a scroll region
    /// narrower than the board shifts row assignments directly since the
    /// rotation-index trick only holds for the whole ring.
    pub fn rotate_region(&mut self, top: u32, bottom: u32, shift: i32, transfer: bool) {
        if top == 0 && bottom == self.height {
            self.rotate(shift, transfer);
            return;
        }
        if shift == 0 || top >= bottom {
            return;
        }
        let width = self.width;
        if shift > 0 {
            let s = shift as u32;
            for row in top..bottom {
                if row + s < bottom {
                    let src = self.physical_index(row + s);
                    let dst = self.physical_index(row);
                    self.lines.swap(src, dst);
                } else {
                    let idx = self.physical_index(row);
                    let fresh = Line::new(self.next_line_id, width);
                    self.next_line_id += 1;
                    let old = std::mem::replace(&mut self.lines[idx], fresh);
                    if transfer {
                        self.push_scrollback(old);
                    }
                }
            }
        } else {
            let s = (-shift) as u32;
            for row in (top..bottom).rev() {
                if row >= top + s {
                    let src = self.physical_index(row - s);
                    let dst = self.physical_index(row);
                    self.lines.swap(src, dst);
                } else {
                    let idx = self.physical_index(row);
                    self.lines[idx] = Line::new(self.next_line_id, width);
                    self.next_line_id += 1;
                }
            }
        }
    }

    /// Push evicted content into scroll-back explicitly (used by
    /// [`Self::rotate`]'s caller in the executor once it has the line's
    /// final content, since `rotate` itself only manages the ring).
    pub fn push_scrollback(&mut self, line: Line) {
        if self.scrollback_cap == 0 {
            return;
        }
        if self.scrollback.len() >= self.scrollback_cap {
            self.scrollback.pop_front();
        }
        self.scrollback.push_back(line);
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        self.width = width;
        for line in &mut self.lines {
            line.set_home_limit(None, None);
        }
        if height > self.lines.len() as u32 {
            for _ in self.lines.len()..height as usize {
                self.lines.push(Line::new(self.next_line_id, width));
                self.next_line_id += 1;
            }
        } else if height < self.lines.len() as u32 {
            self.lines.truncate(height as usize);
            self.rotation = 0;
        }
        self.height = height;
        self.margins = Margins::full(height);
        self.cursor.clamp_to(width, height);
        self.tab_stops = default_tab_stops(width);
    }
}

fn default_tab_stops(width: u32) -> Vec<u32> {
    (0..width).step_by(8).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rotate_assigns_fresh_ids_and_preserves_scrollback_order() {
        let mut board = Board::new(5, 3, 10);
        let first_id = board.line(0).id();
        board.rotate(1, true);
        assert_ne!(board.line(2).id(), first_id);
    }

    #[test]
    fn resize_grows_and_shrinks_lines() {
        let mut board = Board::new(5, 3, 0);
        board.resize(5, 5);
        assert_eq!(board.height(), 5);
        board.resize(5, 2);
        assert_eq!(board.height(), 2);
    }
}
