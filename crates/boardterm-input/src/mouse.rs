//! Mouse reporting and encoding (§4.5).

use crate::encode::EncodedBytes;
use crate::key::Modifiers;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MouseButton {
    Left,
    Middle,
    Right,
}

impl MouseButton {
    const fn index(self) -> u32 {
        match self {
            MouseButton::Left => 0,
            MouseButton::Middle => 1,
            MouseButton::Right => 2,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WheelDirection {
    Up,
    Down,
}

impl WheelDirection {
    const fn index(self) -> u32 {
        match self {
            WheelDirection::Up => 64,
            WheelDirection::Down => 65,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MouseKind {
    Down(MouseButton),
    Up(MouseButton),
    Move(Option<MouseButton>),
    Wheel(WheelDirection),
}

/// One raw mouse event: 1-based column/row and the event kind, with the
/// modifiers held at the time of the event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MouseEvent {
    pub col: u16,
    pub row: u16,
    pub kind: MouseKind,
    pub mods: Modifiers,
}

/// Which events the host has asked to have reported (§4.5 "Report modes").
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportMode {
    Off,
    DownOnly,
    DownUp,
    Highlight,
    Button,
    AnyMove,
}

impl ReportMode {
    fn permits(self, kind: MouseKind) -> bool {
        match self {
            ReportMode::Off => false,
            ReportMode::DownOnly => matches!(kind, MouseKind::Down(_) | MouseKind::Wheel(_)),
            ReportMode::DownUp | ReportMode::Highlight => {
                matches!(kind, MouseKind::Down(_) | MouseKind::Up(_) | MouseKind::Wheel(_))
            }
            ReportMode::Button => matches!(
                kind,
                MouseKind::Down(_) | MouseKind::Up(_) | MouseKind::Wheel(_) | MouseKind::Move(Some(_))
            ),
            ReportMode::AnyMove => true,
        }
    }
}

/// Which wire encoding to use for a reported event (§4.5 "Sequence modes").
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SequenceMode {
    Classic,
    Utf8,
    Sgr,
    Urxvt,
}

fn button_code(kind: MouseKind, mods: Modifiers) -> u32 {
    let base = match kind {
        MouseKind::Down(b) | MouseKind::Up(b) => b.index(),
        MouseKind::Move(Some(b)) => b.index() + 32,
        MouseKind::Move(None) => 3 + 32,
        MouseKind::Wheel(w) => w.index(),
    };
    let mut code = base;
    if mods.contains(Modifiers::SHIFT) {
        code += 4;
    }
    if mods.contains(Modifiers::META) || mods.contains(Modifiers::ALTER) {
        code += 8;
    }
    if mods.contains(Modifiers::CONTROL) {
        code += 16;
    }
    code
}

fn push_utf8_coord(out: &mut EncodedBytes, value: u32) {
    if let Some(c) = char::from_u32(value) {
        let mut buf = [0u8; 4];
        out.extend_from_slice(c.encode_utf8(&mut buf).as_bytes());
    }
}

/// Encode one mouse event for the wire, or `None` if the report mode drops
/// it (not permitted, or a move that lands on the same cell as last time).
pub fn encode_mouse(
    event: MouseEvent,
    report_mode: ReportMode,
    seq_mode: SequenceMode,
    last_pos: &mut Option<(u16, u16)>,
) -> Option<EncodedBytes> {
    if !report_mode.permits(event.kind) {
        return None;
    }
    if matches!(event.kind, MouseKind::Move(_)) {
        if *last_pos == Some((event.col, event.row)) {
            return None;
        }
    }
    *last_pos = Some((event.col, event.row));

    let mut out = EncodedBytes::new();
    let code = button_code(event.kind, event.mods);
    let is_release = matches!(event.kind, MouseKind::Up(_));

    match seq_mode {
        SequenceMode::Classic => {
            out.extend_from_slice(b"\x1b[M");
            let cb = (code + 32).min(255) as u8;
            let cx = (u32::from(event.col) + 32).min(255) as u8;
            let cy = (u32::from(event.row) + 32).min(255) as u8;
            out.push(cb);
            out.push(cx);
            out.push(cy);
        }
        SequenceMode::Utf8 => {
            out.extend_from_slice(b"\x1b[M");
            push_utf8_coord(&mut out, code + 32);
            push_utf8_coord(&mut out, u32::from(event.col) + 32);
            push_utf8_coord(&mut out, u32::from(event.row) + 32);
        }
        SequenceMode::Sgr => {
            out.extend_from_slice(b"\x1b[<");
            let mut buf = itoa::Buffer::new();
            out.extend_from_slice(buf.format(code).as_bytes());
            out.push(b';');
            out.extend_from_slice(buf.format(event.col).as_bytes());
            out.push(b';');
            out.extend_from_slice(buf.format(event.row).as_bytes());
            out.push(if is_release { b'm' } else { b'M' });
        }
        SequenceMode::Urxvt => {
            out.extend_from_slice(b"\x1b[");
            let mut buf = itoa::Buffer::new();
            out.extend_from_slice(buf.format(code + 32).as_bytes());
            out.push(b';');
            out.extend_from_slice(buf.format(u32::from(event.col) + 32).as_bytes());
            out.push(b';');
            out.extend_from_slice(buf.format(u32::from(event.row) + 32).as_bytes());
            out.push(b'M');
        }
    }
    Some(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classic_down_left() {
        let mut last = None;
        let event = MouseEvent { col: 5, row: 10, kind: MouseKind::Down(MouseButton::Left), mods: Modifiers::empty() };
        let bytes = encode_mouse(event, ReportMode::DownUp, SequenceMode::Classic, &mut last).unwrap();
        assert_eq!(&bytes[..], &[0x1b, b'[', b'M', 32, 5 + 32, 10 + 32]);
    }

    #[test]
    fn move_without_button_dropped_outside_any_move() {
        let mut last = None;
        let event = MouseEvent { col: 5, row: 10, kind: MouseKind::Move(None), mods: Modifiers::empty() };
        assert!(encode_mouse(event, ReportMode::Button, SequenceMode::Sgr, &mut last).is_none());
    }

    #[test]
    fn repeated_move_suppressed() {
        let mut last = None;
        let event = MouseEvent { col: 5, row: 10, kind: MouseKind::Move(Some(MouseButton::Left)), mods: Modifiers::empty() };
        assert!(encode_mouse(event, ReportMode::AnyMove, SequenceMode::Sgr, &mut last).is_some());
        assert!(encode_mouse(event, ReportMode::AnyMove, SequenceMode::Sgr, &mut last).is_none());
    }

    #[test]
    fn sgr_release_uses_lowercase_m() {
        let mut last = None;
        let event = MouseEvent { col: 1, row: 1, kind: MouseKind::Up(MouseButton::Left), mods: Modifiers::empty() };
        let bytes = encode_mouse(event, ReportMode::DownUp, SequenceMode::Sgr, &mut last).unwrap();
        assert!(bytes.ends_with(b"m"));
    }
}
