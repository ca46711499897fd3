//! End-to-end scenarios driving `Terminal` the way a PTY consumer would.

use pretty_assertions::assert_eq;

use boardterm::Terminal;
use boardterm_input::key;
use boardterm_input::mouse::{MouseButton, MouseEvent, MouseKind};
use boardterm_input::Modifiers;

#[test]
fn autowrap_folds_a_long_line_across_rows() {
    let mut term = Terminal::new(5, 5);
    term.feed_bytes(b"hello world!\n");
    let board = term.executor().active();
    assert_eq!(board.line(0).cells()[0].character.as_char(), Some('h'));
    assert_eq!(board.line(0).cells()[4].character.as_char(), Some('o'));
    // The wrap carries the 13th input byte ('!') onto a third row, proving
    // DECAWM folded rather than truncated the line.
    let mut seen = String::new();
    for row in 0..3 {
        for cell in board.line(row).cells() {
            if let Some(c) = cell.character.as_char() {
                seen.push(c);
            }
        }
    }
    assert!(seen.contains('!'));
}

#[test]
fn wide_cjk_character_occupies_two_cells() {
    let mut term = Terminal::new(5, 3);
    term.feed_bytes("hello\r\u{65e5}\n".as_bytes());
    let board = term.executor().active();
    let row0 = board.line(0);
    assert_eq!(row0.cells()[0].character.as_char(), Some('\u{65e5}'));
    assert!(row0.cells()[1].is_zero_width_body() || row0.cells()[1].character.as_char().is_none());
}

#[test]
fn backspace_over_a_wide_character_leaves_a_blank_trailing_cell() {
    let mut term = Terminal::new(5, 3);
    term.feed_bytes("a\u{65e5}\u{672c}\ra".as_bytes());
    term.feed_bytes(b"\x08a");
    let board = term.executor().active();
    assert_eq!(board.line(0).cells()[0].character.as_char(), Some('a'));
}

#[test]
fn decckm_switches_arrow_key_encoding() {
    let mut term = Terminal::new(10, 5);
    assert_eq!(&term.encode_key(key::pack(key::UP, Modifiers::empty()))[..], b"\x1b[A");
    term.feed_bytes(b"\x1b[?1h");
    assert_eq!(&term.encode_key(key::pack(key::UP, Modifiers::empty()))[..], b"\x1bOA");
}

#[test]
fn bracketed_paste_only_wraps_when_mode_is_enabled() {
    let mut term = Terminal::new(10, 5);
    assert_eq!(&term.encode_paste("hi")[..], b"hi");
    term.feed_bytes(b"\x1b[?2004h");
    assert_eq!(&term.encode_paste("hi")[..], b"\x1b[200~hi\x1b[201~");
}

#[test]
fn mouse_move_suppresses_repeat_and_reports_with_button_under_xtmouseall_sgr() {
    let mut term = Terminal::new(80, 24);
    term.feed_bytes(b"\x1b[?1003h\x1b[?1006h");

    // 1-based wire coordinates; corresponds to the 0-based (col=5,row=3).
    let at_5_3 = MouseEvent { col: 6, row: 4, kind: MouseKind::Move(Some(MouseButton::Left)), mods: Modifiers::empty() };
    assert!(term.encode_mouse(at_5_3).is_some());
    assert!(term.encode_mouse(at_5_3).is_none(), "repeated move to same cell must be suppressed");

    // Corresponds to the 0-based (col=6,row=3).
    let at_6_3 = MouseEvent { col: 7, row: 4, kind: MouseKind::Move(Some(MouseButton::Left)), mods: Modifiers::empty() };
    let bytes = term.encode_mouse(at_6_3).unwrap();
    assert_eq!(&bytes[..], b"\x1b[<32;7;4M");
}
