//! Facade wiring the decoder, line buffer, executor, board, and input
//! encoder behind one `Terminal` type, in the spirit of
//! `examples/geldata-vtio/crates/vtio/src/lib.rs`'s top-level re-exports.

use boardterm_charset::CharsetRegistry;
use boardterm_decode::{Decoder, DecoderConfig};
use boardterm_exec::{Executor, ExecutorConfig, Snapshot};
use boardterm_input::{encode_key, encode_mouse, encode_paste, EncodedBytes, MouseEvent, ReportMode, SequenceMode};

/// Incremental UTF-8 decoder feeding code points to the sequence decoder.
/// PTY bytes are not guaranteed to align on UTF-8 boundaries across reads,
/// so partial sequences are buffered between calls.
#[derive(Default)]
struct Utf8Accum {
    pending: smallvec::SmallVec<[u8; 4]>,
}

impl Utf8Accum {
    fn push_byte(&mut self, b: u8, out: &mut smallvec::SmallVec<[u32; 32]>) {
        if self.pending.is_empty() {
            if b < 0x80 {
                out.push(u32::from(b));
                return;
            }
            self.pending.push(b);
            return;
        }
        self.pending.push(b);
        let needed = utf8_len(self.pending[0]);
        if self.pending.len() < needed {
            return;
        }
        match std::str::from_utf8(&self.pending) {
            Ok(s) => {
                for ch in s.chars() {
                    out.push(ch as u32);
                }
            }
            Err(_) => out.push(0xFFFD),
        }
        self.pending.clear();
    }
}

fn utf8_len(lead: u8) -> usize {
    if lead & 0x80 == 0 {
        1
    } else if lead & 0xE0 == 0xC0 {
        2
    } else if lead & 0xF0 == 0xE0 {
        3
    } else if lead & 0xF8 == 0xF0 {
        4
    } else {
        1
    }
}

/// Top-level terminal core (C1-C8): consumes PTY bytes, drives the board,
/// and encodes key/mouse events back into PTY bytes.
pub struct Terminal {
    decoder: Decoder,
    registry: CharsetRegistry,
    executor: Executor,
    utf8: Utf8Accum,
    blink_tick: u64,
    last_mouse_pos: Option<(u16, u16)>,
}

impl Terminal {
    #[must_use]
    pub fn new(width: u32, height: u32) -> Self {
        Terminal::with_config(width, height, DecoderConfig::default(), ExecutorConfig::default())
    }

    #[must_use]
    pub fn with_config(width: u32, height: u32, decoder_config: DecoderConfig, executor_config: ExecutorConfig) -> Self {
        Terminal {
            decoder: Decoder::new(decoder_config),
            registry: CharsetRegistry::new(),
            executor: Executor::new(width, height, executor_config),
            utf8: Utf8Accum::default(),
            blink_tick: 0,
            last_mouse_pos: None,
        }
    }

    /// The report mode requested by the host via `DECSET` mouse-tracking
    /// modes 1000-1003, or [`ReportMode::Off`] if none is active.
    #[must_use]
    pub fn mouse_report_mode(&self) -> ReportMode {
        match self.executor.mouse_tracking {
            Some(1000) => ReportMode::DownUp,
            Some(1001) => ReportMode::Highlight,
            Some(1002) => ReportMode::Button,
            Some(1003) => ReportMode::AnyMove,
            _ => ReportMode::Off,
        }
    }

    /// The sequence encoding requested via `DECSET` 1005/1006/1015, or the
    /// classic encoding if the host requested none.
    #[must_use]
    pub fn mouse_sequence_mode(&self) -> SequenceMode {
        match self.executor.mouse_encoding {
            Some(1005) => SequenceMode::Utf8,
            Some(1006) => SequenceMode::Sgr,
            Some(1015) => SequenceMode::Urxvt,
            _ => SequenceMode::Classic,
        }
    }

    #[must_use]
    pub const fn executor(&self) -> &Executor {
        &self.executor
    }

    pub fn executor_mut(&mut self) -> &mut Executor {
        &mut self.executor
    }

    /// Drain PTY bytes through UTF-8 decoding, the sequence decoder, and
    /// the executor, in that order (§5 data flow). Bounded only by the
    /// input slice; a caller implementing the ~20ms drain cap from §5
    /// chunks its calls accordingly.
    pub fn feed_bytes(&mut self, bytes: &[u8]) {
        let mut units: smallvec::SmallVec<[u32; 32]> = smallvec::SmallVec::new();
        for &b in bytes {
            self.utf8.push_byte(b, &mut units);
        }
        for unit in units {
            for event in self.decoder.feed(&self.registry, unit) {
                self.executor.execute(&event);
            }
        }
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        tracing::debug!(width, height, "resizing terminal");
        self.executor.resize(width, height);
    }

    pub fn advance_blink(&mut self) {
        self.blink_tick += 1;
    }

    #[must_use]
    pub fn encode_key(&self, packed: u32) -> EncodedBytes {
        encode_key(packed, self.executor.cursor_keys_application_mode())
    }

    #[must_use]
    pub fn encode_mouse(&mut self, event: MouseEvent) -> Option<EncodedBytes> {
        let report_mode = self.mouse_report_mode();
        let seq_mode = self.mouse_sequence_mode();
        encode_mouse(event, report_mode, seq_mode, &mut self.last_mouse_pos)
    }

    /// Encode pasted text, wrapped in bracketed-paste markers only when the
    /// host has requested them (`DECSET 2004`).
    #[must_use]
    pub fn encode_paste(&self, text: &str) -> EncodedBytes {
        if self.executor.bracketed_paste {
            encode_paste(text)
        } else {
            let mut out = EncodedBytes::new();
            for ch in text.chars() {
                out.extend(encode_key(boardterm_input::key::pack(ch as u32, boardterm_input::Modifiers::empty()), false));
            }
            out
        }
    }

    #[must_use]
    pub fn snapshot(&self) -> Snapshot {
        Snapshot::capture(self.executor.active(), self.blink_tick)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn writes_plain_text_to_board() {
        let mut term = Terminal::new(80, 24);
        term.feed_bytes(b"hello");
        assert_eq!(term.executor().active().cursor.x, 5);
    }

    #[test]
    fn csi_cup_moves_cursor() {
        let mut term = Terminal::new(80, 24);
        term.feed_bytes(b"\x1b[10;5H");
        let cursor = term.executor().active().cursor;
        assert_eq!((cursor.x, cursor.y), (4, 9));
    }

    #[test]
    fn resize_changes_board_dimensions() {
        let mut term = Terminal::new(80, 24);
        term.resize(100, 30);
        assert_eq!(term.executor().active().width(), 100);
        assert_eq!(term.executor().active().height(), 30);
    }

    #[test]
    fn snapshot_tracks_line_version_after_write() {
        let mut term = Terminal::new(80, 24);
        let before = term.snapshot();
        term.feed_bytes(b"x");
        let after = term.snapshot();
        assert!(!after.changed_rows(&before).is_empty());
    }
}
