//! Terminal executor (C5, §4.3): dispatches decoded [`ControlEvent`]s onto
//! a [`Board`].
//!
//! Grounded on `examples/original_source/src/term.cpp`'s dispatch-table
//! style (CSI keyed on intermediate+final, a separate private-mode
//! sub-table) and on `examples/geldata-vtio/crates/vtio/src/event/mode.rs`
//! for the ANSI-vs-DEC-private split honoured by DECRQM.

use boardterm_decode::{CmdStringKind, ControlEvent, CsiParam};
use boardterm_model::{Cell, Character};

use crate::board::Board;
use crate::cursor::SavedCursor;
use crate::error::ExecNote;
use crate::modes::{resolve, ModeId, ModeStatus, ModeTable};
use crate::sgr::apply_sgr;
use crate::width::default_char_width;

/// Executor-wide configuration (§1.1 ambient configuration layer).
pub struct ExecutorConfig {
    pub scrollback_capacity: usize,
    pub char_width: fn(char) -> u8,
}

impl Default for ExecutorConfig {
    fn default() -> Self {
        ExecutorConfig { scrollback_capacity: 10_000, char_width: default_char_width }
    }
}

/// The terminal executor: owns the main board, the alternate-screen board,
/// and cross-cutting state (saved cursor, DECLRMM/DECOM, tab stops).
pub struct Executor {
    pub board: Board,
    alt_board: Board,
    pub using_alt: bool,
    config: ExecutorConfig,
    saved_cursor: SavedCursor,
    alt_saved_cursor: SavedCursor,
    lrmm_enabled: bool,
    decckm: bool,
    pub mouse_tracking: Option<u16>,
    pub mouse_encoding: Option<u16>,
    pub bracketed_paste: bool,
    pub pending_reply: Vec<u8>,
}

fn sub(p: &CsiParam, i: usize) -> Option<i64> {
    p.get(i).copied().flatten()
}

fn param(params: &[CsiParam], i: usize, default: i64) -> i64 {
    params.get(i).and_then(|p| sub(p, 0)).filter(|v| *v != 0).unwrap_or(default)
}

impl Executor {
    #[must_use]
    pub fn new(width: u32, height: u32, config: ExecutorConfig) -> Self {
        let cap = config.scrollback_capacity;
        Executor {
            board: Board::new(width, height, cap),
            alt_board: Board::new(width, height, 0),
            using_alt: false,
            config,
            saved_cursor: SavedCursor::default(),
            alt_saved_cursor: SavedCursor::default(),
            lrmm_enabled: false,
            decckm: false,
            mouse_tracking: None,
            mouse_encoding: None,
            bracketed_paste: false,
            pending_reply: Vec::new(),
        }
    }

    #[must_use]
    pub const fn cursor_keys_application_mode(&self) -> bool {
        self.decckm
    }

    #[must_use]
    pub const fn active(&self) -> &Board {
        if self.using_alt {
            &self.alt_board
        } else {
            &self.board
        }
    }

    fn active_mut(&mut self) -> &mut Board {
        if self.using_alt {
            &mut self.alt_board
        } else {
            &mut self.board
        }
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        self.board.resize(width, height);
        self.alt_board.resize(width, height);
    }

    /// Execute one decoded event, mutating the active board. Never fails:
    /// unrecognised input is logged and ignored (§7).
    pub fn execute(&mut self, event: &ControlEvent) {
        match event {
            ControlEvent::PlainChar(c) => self.write_char(*c),
            ControlEvent::PlainRun(run) => {
                for c in run {
                    self.write_char(*c);
                }
            }
            ControlEvent::C0(b) => self.exec_c0(*b),
            ControlEvent::EscSeq { intermediates, final_byte } => self.exec_esc(intermediates, *final_byte),
            ControlEvent::CsiSeq { params, intermediates, final_byte, is_private, private_marker } => {
                self.exec_csi(params, intermediates, *final_byte, *is_private, *private_marker);
            }
            ControlEvent::CmdString { kind, payload } => self.exec_cmdstring(*kind, payload),
            ControlEvent::CharString { .. } => {}
            ControlEvent::Invalid(bytes) => tracing::debug!(?bytes, "decoder invalid sequence"),
        }
    }

    fn write_char(&mut self, c: Character) {
        let ch = c.as_char();
        let w = ch.map_or(1, |c| (self.config.char_width)(c)).max(1);
        let board = self.active_mut();
        let width = board.width();
        let (_, limit) = board.line(board.cursor.y).home_limit();
        let limit = if limit == 0 { width } else { limit };
        if board.cursor.x + u32::from(w) > limit {
            if board.autowrap {
                self.exec_c0(b'\r');
                self.linefeed();
            } else {
                return;
            }
        }
        let board = self.active_mut();
        let y = board.cursor.y;
        let x = board.cursor.x;
        let attr = board.cursor.attribute;
        let main = Cell::new(c, attr);
        let mut cells = vec![main];
        for _ in 1..w {
            cells.push(Cell::new(Character(boardterm_model::character::CHARFLAG_WIDE_EXTENSION), attr));
        }
        let mut cells_sized = cells;
        cells_sized.resize(w as usize, Cell::new(Character(boardterm_model::character::CHARFLAG_WIDE_EXTENSION), attr));
        if let Some(first) = cells_sized.first_mut() {
            *first = Cell::new(c, attr);
        }
        let (line, attrs) = board.line_and_attrs_mut(y);
        line.write_cells(x, &cells_sized, attrs);
        board.cursor.x += u32::from(w);
        if board.cursor.x >= width {
            board.cursor.xenl = board.autowrap;
            board.cursor.x = width;
        }
    }

    fn linefeed(&mut self) {
        let board = self.active_mut();
        let bottom = board.margins.bottom;
        if board.cursor.y + 1 >= bottom {
            let transfer = !self.using_alt;
            let top = board.margins.top;
            self.active_mut().rotate_region(top, bottom, 1, transfer);
        } else {
            board_mut_cursor_y_incr(self.active_mut());
        }
        self.active_mut().cursor.xenl = false;
    }

    fn reverse_linefeed(&mut self) {
        let board = self.active_mut();
        let top = board.margins.top;
        if board.cursor.y == top {
            let bottom = board.margins.bottom;
            self.active_mut().rotate_region(top, bottom, -1, false);
        } else {
            let board = self.active_mut();
            board.cursor.y = board.cursor.y.saturating_sub(1);
        }
    }

    fn exec_c0(&mut self, b: u8) {
        let board = self.active_mut();
        match b {
            0x07 => {}
            0x08 => board.cursor.x = board.cursor.x.saturating_sub(1),
            0x09 => {
                let next = board.tab_stops.iter().copied().find(|&t| t > board.cursor.x);
                board.cursor.x = next.unwrap_or(board.width().saturating_sub(1));
            }
            0x0A | 0x0B | 0x0C => self.linefeed(),
            0x0D => {
                let (home, _) = board.line(board.cursor.y).home_limit();
                board.cursor.x = home;
                board.cursor.xenl = false;
            }
            _ => tracing::debug!(byte = b, "unrecognized C0"),
        }
    }

    fn exec_esc(&mut self, intermediates: &[u8], final_byte: u8) {
        if !intermediates.is_empty() {
            tracing::debug!(?intermediates, final_byte, "unrecognized ESC sequence");
            return;
        }
        match final_byte {
            b'7' => self.save_cursor(),
            b'8' => self.restore_cursor(),
            b'D' => self.linefeed(),
            b'M' => self.reverse_linefeed(),
            b'E' => {
                self.exec_c0(b'\r');
                self.linefeed();
            }
            b'H' => {
                let board = self.active_mut();
                let x = board.cursor.x;
                if !board.tab_stops.contains(&x) {
                    board.tab_stops.push(x);
                    board.tab_stops.sort_unstable();
                }
            }
            b'c' => {
                let (w, h) = (self.board.width(), self.board.height());
                *self = Executor::new(w, h, ExecutorConfig::default());
            }
            _ => tracing::debug!(final_byte, "unrecognized ESC sequence"),
        }
    }

    fn save_cursor(&mut self) {
        let board = self.active();
        let saved = SavedCursor { cursor: board.cursor, autowrap: board.autowrap, origin_mode: board.cursor.origin_mode };
        if self.using_alt {
            self.alt_saved_cursor = saved;
        } else {
            self.saved_cursor = saved;
        }
    }

    fn restore_cursor(&mut self) {
        let saved = if self.using_alt { self.alt_saved_cursor } else { self.saved_cursor };
        let board = self.active_mut();
        board.cursor = saved.cursor;
        board.autowrap = saved.autowrap;
        board.cursor.origin_mode = saved.origin_mode;
    }

    fn exec_cmdstring(&mut self, kind: CmdStringKind, payload: &str) {
        if kind == CmdStringKind::Dcs {
            if let Some(body) = payload.strip_prefix('$').and_then(|s| s.strip_prefix('q')) {
                self.exec_decrqss(body);
                return;
            }
        }
        tracing::debug!(?kind, len = payload.len(), "command string ignored");
    }

    fn exec_decrqss(&mut self, body: &str) {
        let valid = matches!(body, "m" | "r" | "s" | "\"q" | "\"p" | "q");
        self.pending_reply.clear();
        self.pending_reply.extend_from_slice(b"\x1bP");
        self.pending_reply.push(if valid { b'1' } else { b'0' });
        self.pending_reply.extend_from_slice(b"$r");
        if !valid {
            tracing::debug!(note = %ExecNote::UnrecognizedRqss(body.to_string()));
        }
        self.pending_reply.extend_from_slice(b"\x1b\\");
    }

    #[allow(clippy::too_many_arguments)]
    fn exec_csi(&mut self, params: &[CsiParam], intermediates: &[u8], final_byte: u8, is_private: bool, private_marker: Option<u8>) {
        if is_private && matches!(private_marker, Some(b'?')) {
            self.exec_dec_private(params, final_byte);
            return;
        }
        if !intermediates.is_empty() {
            tracing::debug!(?intermediates, final_byte, "unrecognized CSI intermediate");
            return;
        }
        let n = |i: usize, d: i64| param(params, i, d);
        let lrmm_enabled = self.lrmm_enabled;
        let board = self.active_mut();
        let width = board.width();
        let height = board.height();
        match final_byte {
            b'A' => board.cursor.y = board.cursor.y.saturating_sub(n(0, 1) as u32),
            b'B' => board.cursor.y = (board.cursor.y + n(0, 1) as u32).min(height - 1),
            b'C' => board.cursor.x = (board.cursor.x + n(0, 1) as u32).min(width.saturating_sub(1)),
            b'D' => board.cursor.x = board.cursor.x.saturating_sub(n(0, 1) as u32),
            b'E' => {
                board.cursor.y = (board.cursor.y + n(0, 1) as u32).min(height - 1);
                board.cursor.x = 0;
            }
            b'F' => {
                board.cursor.y = board.cursor.y.saturating_sub(n(0, 1) as u32);
                board.cursor.x = 0;
            }
            b'G' | b'`' => board.cursor.x = (n(0, 1) - 1).max(0).min(i64::from(width) - 1) as u32,
            b'd' => board.cursor.y = (n(0, 1) - 1).max(0).min(i64::from(height) - 1) as u32,
            b'H' | b'f' => {
                let row = (n(0, 1) - 1).max(0);
                let col = (n(1, 1) - 1).max(0);
                board.cursor.y = row.min(i64::from(height) - 1) as u32;
                board.cursor.x = col.min(i64::from(width) - 1) as u32;
                board.cursor.xenl = false;
            }
            b'J' => self.exec_ed(n(0, 0)),
            b'K' => self.exec_el(n(0, 0)),
            b'L' => {
                let row = board.cursor.y;
                let bottom = board.margins.bottom;
                self.active_mut().rotate_region(row, bottom, n(0, 1) as i32, false);
            }
            b'M' => {
                let row = board.cursor.y;
                let bottom = board.margins.bottom;
                self.active_mut().rotate_region(row, bottom, -(n(0, 1) as i32), false);
            }
            b'@' => {
                let (x, y, attr) = (board.cursor.x, board.cursor.y, board.cursor.attribute);
                let (line, attrs) = board.line_and_attrs_mut(y);
                line.ich(x, n(0, 1) as u32, attr, attrs);
            }
            b'P' => {
                let (x, y, attr) = (board.cursor.x, board.cursor.y, board.cursor.attribute);
                let (line, attrs) = board.line_and_attrs_mut(y);
                line.dch(x, n(0, 1) as u32, attr, attrs);
            }
            b'X' => {
                let (x, y, attr) = (board.cursor.x, board.cursor.y, board.cursor.attribute);
                let (line, attrs) = board.line_and_attrs_mut(y);
                line.ech(x, n(0, 1) as u32, attr, attrs);
            }
            b'm' => {
                let mut attr = board.attrs.get(board.cursor.attribute);
                apply_sgr(&mut attr, params);
                board.cursor.attribute = board.attrs.intern(attr);
            }
            b'r' => {
                let top = (n(0, 1) - 1).max(0) as u32;
                let bottom = n(1, i64::from(height)).min(i64::from(height)) as u32;
                board.margins.top = top;
                board.margins.bottom = bottom.max(top + 1);
                board.cursor.y = 0;
                board.cursor.x = 0;
            }
            b's' => {
                if lrmm_enabled {
                    let left = (n(0, 1) - 1).max(0) as u32;
                    let right = n(1, i64::from(width)).min(i64::from(width)) as u32;
                    board.margins.left = Some(left);
                    board.margins.right = Some(right.max(left + 1));
                }
            }
            b'h' => self.exec_sm_rm(params, true),
            b'l' => self.exec_sm_rm(params, false),
            b'n' => {}
            _ => tracing::debug!(note = %ExecNote::UnrecognizedCsi(final_byte)),
        }
    }

    fn exec_ed(&mut self, mode: i64) {
        let board = self.active_mut();
        let (width, height) = (board.width(), board.height());
        let (y, x, attr) = (board.cursor.y, board.cursor.x, board.cursor.attribute);
        let rows: Vec<u32> = match mode {
            0 => (y..height).collect(),
            1 => (0..=y).collect(),
            _ => (0..height).collect(),
        };
        for row in rows {
            let (lo, hi) = if mode == 0 && row == y {
                (x, width)
            } else if mode == 1 && row == y {
                (0, x + 1)
            } else {
                (0, width)
            };
            let (line, attrs) = board.line_and_attrs_mut(row);
            line.ech(lo, hi - lo, attr, attrs);
        }
    }

    fn exec_el(&mut self, mode: i64) {
        let board = self.active_mut();
        let width = board.width();
        let (y, x, attr) = (board.cursor.y, board.cursor.x, board.cursor.attribute);
        let (lo, hi) = match mode {
            0 => (x, width),
            1 => (0, x + 1),
            _ => (0, width),
        };
        let (line, attrs) = board.line_and_attrs_mut(y);
        line.ech(lo, hi - lo, attr, attrs);
    }

    fn exec_sm_rm(&mut self, params: &[CsiParam], set: bool) {
        for p in params {
            let Some(n) = sub(p, 0) else { continue };
            match resolve(ModeTable::Ansi, n as u16) {
                Some(ModeId::Irm) => {}
                Some(ModeId::Lnm) => {}
                _ => tracing::debug!(note = %ExecNote::UnrecognizedMode(n as u16)),
            }
            let _ = set;
        }
    }

    fn exec_dec_private(&mut self, params: &[CsiParam], final_byte: u8) {
        for p in params {
            let Some(n) = sub(p, 0) else { continue };
            let Some(mode) = resolve(ModeTable::DecPrivate, n as u16) else {
                tracing::debug!(note = %ExecNote::UnrecognizedMode(n as u16));
                continue;
            };
            self.apply_dec_mode(mode, final_byte == b'h');
        }
    }

    fn apply_dec_mode(&mut self, mode: ModeId, set: bool) {
        match mode {
            ModeId::Decawm => self.active_mut().autowrap = set,
            ModeId::Decom => self.active_mut().cursor.origin_mode = set,
            ModeId::Decscnm => self.active_mut().reverse_video = set,
            ModeId::Dectcem => self.active_mut().cursor.visible = set,
            ModeId::Declrmm => self.lrmm_enabled = set,
            ModeId::Deckm => self.decckm = set,
            ModeId::AltScreen => self.set_alt_screen(set),
            ModeId::Deccolm => {
                let h = self.active().height();
                self.resize(if set { 132 } else { 80 }, h);
            }
            ModeId::MouseTracking(n) => self.mouse_tracking = if set { Some(n) } else { None },
            ModeId::MouseEncoding(n) => self.mouse_encoding = if set { Some(n) } else { None },
            ModeId::BracketedPaste => self.bracketed_paste = set,
            _ => {}
        }
    }

    fn set_alt_screen(&mut self, enable: bool) {
        if enable == self.using_alt {
            return;
        }
        if enable {
            self.alt_board = Board::new(self.board.width(), self.board.height(), 0);
        }
        self.using_alt = enable;
    }

    /// Respond to a `DECRQM` (ANSI or DEC-private, addressed by the caller)
    /// with the status for mode `n`.
    #[must_use]
    pub fn query_mode(&self, table: ModeTable, n: u16) -> ModeStatus {
        let Some(mode) = resolve(table, n) else {
            return ModeStatus::NotRecognized;
        };
        let board = self.active();
        let set = match mode {
            ModeId::Decawm => board.autowrap,
            ModeId::Decom => board.cursor.origin_mode,
            ModeId::Decscnm => board.reverse_video,
            ModeId::Dectcem => board.cursor.visible,
            ModeId::Declrmm => self.lrmm_enabled,
            ModeId::Deckm => self.decckm,
            ModeId::AltScreen => self.using_alt,
            ModeId::BracketedPaste => self.bracketed_paste,
            ModeId::MouseTracking(n) => self.mouse_tracking == Some(n),
            ModeId::MouseEncoding(n) => self.mouse_encoding == Some(n),
            _ => return ModeStatus::NotRecognized,
        };
        if set {
            ModeStatus::Set
        } else {
            ModeStatus::Reset
        }
    }
}

fn board_mut_cursor_y_incr(board: &mut Board) {
    board.cursor.y += 1;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_text_advances_cursor() {
        let mut exec = Executor::new(10, 3, ExecutorConfig::default());
        exec.execute(&ControlEvent::PlainChar(Character::from('A')));
        assert_eq!(exec.board.cursor.x, 1);
    }

    #[test]
    fn cup_moves_cursor_to_origin_relative_position() {
        use smallvec::smallvec;
        let mut exec = Executor::new(10, 5, ExecutorConfig::default());
        let params = smallvec![smallvec![Some(2)], smallvec![Some(3)]];
        exec.execute(&ControlEvent::CsiSeq { params, intermediates: Default::default(), final_byte: b'H', is_private: false, private_marker: None });
        assert_eq!((exec.board.cursor.x, exec.board.cursor.y), (2, 1));
    }

    #[test]
    fn linefeed_at_bottom_scrolls_and_preserves_line_ids_order() {
        let mut exec = Executor::new(5, 2, ExecutorConfig::default());
        exec.board.cursor.y = 1;
        let id0 = exec.board.line(0).id();
        exec.execute(&ControlEvent::C0(b'\n'));
        assert_ne!(exec.board.line(1).id(), id0);
    }
}
