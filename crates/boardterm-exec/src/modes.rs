//! ANSI and DEC-private mode registry (§4.3).
//!
//! Grounded on `examples/geldata-vtio/crates/vtio/src/event/mode.rs`'s
//! `terminal_mode!` macro (mode number keyed Enable/Disable/Request
//! structs) — reimplemented here as a plain lookup table dispatching to
//! accessor closures rather than the teacher's derive-macro DSL, since SM/
//! RM/DECSET/DECRST need runtime side effects (resize, board swap) the
//! macro's generated structs don't carry.

/// Distinguishes the ANSI mode table (bare `CSI n h`) from the DEC-private
/// table (`CSI ? n h`) so DECRQM never confuses the two (§9, resolved).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ModeTable {
    Ansi,
    DecPrivate,
}

/// Internal mode identifiers the registry maps ANSI/DEC numbers onto.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ModeId {
    /// ANSI mode 4: IRM insert/replace.
    Irm,
    /// ANSI mode 20: LNM linefeed/newline.
    Lnm,
    /// DEC 1: DECCKM application cursor keys.
    Deckm,
    /// DEC 3: DECCOLM 80/132 column.
    Deccolm,
    /// DEC 5: DECSCNM reverse video.
    Decscnm,
    /// DEC 6: DECOM origin mode.
    Decom,
    /// DEC 7: DECAWM autowrap.
    Decawm,
    /// DEC 12: cursor blinking.
    CursorBlink,
    /// DEC 25: DECTCEM cursor visibility.
    Dectcem,
    /// DEC 47/1047/1049: alternate screen buffer.
    AltScreen,
    /// DEC 69: DECLRMM left/right margin mode.
    Declrmm,
    /// DEC 1000-1003: mouse tracking variants, kept as one family and
    /// distinguished by the caller via the raw mode number.
    MouseTracking(u16),
    /// DEC 1005/1006/1015: mouse sequence encoding.
    MouseEncoding(u16),
    /// DEC 2004: bracketed paste.
    BracketedPaste,
    Unknown(u16),
}

/// `DECRQM` reply status (§4.3).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModeStatus {
    NotRecognized,
    Set,
    Reset,
    PermanentlySet,
    PermanentlyReset,
}

impl ModeStatus {
    #[must_use]
    pub const fn code(self) -> u8 {
        match self {
            ModeStatus::NotRecognized => 0,
            ModeStatus::Set => 1,
            ModeStatus::Reset => 2,
            ModeStatus::PermanentlySet => 3,
            ModeStatus::PermanentlyReset => 4,
        }
    }
}

/// Resolve a mode number in the addressed table to an internal id. Returns
/// `None` for a number absent from that specific table — the ANSI and
/// DEC-private tables are distinct lookups, never a shared fallback (§9).
#[must_use]
pub fn resolve(table: ModeTable, n: u16) -> Option<ModeId> {
    match (table, n) {
        (ModeTable::Ansi, 4) => Some(ModeId::Irm),
        (ModeTable::Ansi, 20) => Some(ModeId::Lnm),
        (ModeTable::DecPrivate, 1) => Some(ModeId::Deckm),
        (ModeTable::DecPrivate, 3) => Some(ModeId::Deccolm),
        (ModeTable::DecPrivate, 5) => Some(ModeId::Decscnm),
        (ModeTable::DecPrivate, 6) => Some(ModeId::Decom),
        (ModeTable::DecPrivate, 7) => Some(ModeId::Decawm),
        (ModeTable::DecPrivate, 12) => Some(ModeId::CursorBlink),
        (ModeTable::DecPrivate, 25) => Some(ModeId::Dectcem),
        (ModeTable::DecPrivate, 47 | 1047 | 1049) => Some(ModeId::AltScreen),
        (ModeTable::DecPrivate, 69) => Some(ModeId::Declrmm),
        (ModeTable::DecPrivate, m @ (1000..=1003)) => Some(ModeId::MouseTracking(m)),
        (ModeTable::DecPrivate, m @ (1005 | 1006 | 1015)) => Some(ModeId::MouseEncoding(m)),
        (ModeTable::DecPrivate, 2004) => Some(ModeId::BracketedPaste),
        _ => None,
    }
}
