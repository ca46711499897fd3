//! Key and paste encoding (§4.5: "Keys are encoded as a 32-bit code ...").

use smallvec::SmallVec;

use crate::key::{self, Modifiers, KEY_BASE};

pub type EncodedBytes = SmallVec<[u8; 16]>;

const ESC: u8 = 0x1b;

fn push_csi(out: &mut EncodedBytes) {
    out.push(ESC);
    out.push(b'[');
}

fn push_ss3(out: &mut EncodedBytes) {
    out.push(ESC);
    out.push(b'O');
}

fn push_decimal(out: &mut EncodedBytes, n: u32) {
    let mut buf = itoa::Buffer::new();
    out.extend_from_slice(buf.format(n).as_bytes());
}

/// Final byte used by the alpha form (`CSI`/`SS3` `<alpha>`) for arrow and
/// navigation keys, or `None` for keys that use the numeric `~` form.
fn alpha_final(code: u32) -> Option<u8> {
    match code {
        key::UP => Some(b'A'),
        key::DOWN => Some(b'B'),
        key::RIGHT => Some(b'C'),
        key::LEFT => Some(b'D'),
        key::HOME => Some(b'H'),
        key::END => Some(b'F'),
        key::F1 => Some(b'P'),
        key::F2 => Some(b'Q'),
        key::F3 => Some(b'R'),
        key::F4 => Some(b'S'),
        _ => None,
    }
}

/// Numeric payload used by the `CSI <n> ~` form.
fn tilde_number(code: u32) -> Option<u32> {
    Some(match code {
        key::INSERT => 2,
        key::DELETE => 3,
        key::PAGE_UP => 5,
        key::PAGE_DOWN => 6,
        key::F5 => 15,
        key::F6 => 17,
        key::F7 => 18,
        key::F8 => 19,
        key::F9 => 20,
        key::F10 => 21,
        key::F11 => 23,
        key::F12 => 24,
        key::F13 => 25,
        key::F14 => 26,
        key::F15 => 28,
        key::F16 => 29,
        key::F17 => 31,
        key::F18 => 32,
        key::F19 => 33,
        key::F20 => 34,
        _ => return None,
    })
}

fn encode_named(out: &mut EncodedBytes, code: u32, mods: Modifiers, decckm: bool) {
    let param = mods.xterm_param();
    if let Some(final_byte) = alpha_final(code) {
        match param {
            None if decckm => {
                push_ss3(out);
                out.push(final_byte);
            }
            None => {
                push_csi(out);
                out.push(final_byte);
            }
            Some(m) => {
                push_csi(out);
                out.push(b'1');
                out.push(b';');
                push_decimal(out, u32::from(m));
                out.push(final_byte);
            }
        }
        return;
    }
    if let Some(n) = tilde_number(code) {
        push_csi(out);
        push_decimal(out, n);
        if let Some(m) = param {
            out.push(b';');
            push_decimal(out, u32::from(m));
        }
        out.push(b'~');
        return;
    }
    // Generic Unicode form for named codes not covered above (keypad,
    // wheel, focus/blur, F21-F24): CSI 27;M;U ~
    tracing::trace!(code, "encoding named key via generic Unicode form");
    push_csi(out);
    out.push(b'2');
    out.push(b'7');
    out.push(b';');
    push_decimal(out, u32::from(param.unwrap_or(1)));
    out.push(b';');
    push_decimal(out, code - KEY_BASE);
    out.push(b'~');
}

/// Encode one key event, given whether the cursor-key application mode
/// (DECCKM) is active, into the bytes written to the PTY.
#[must_use]
pub fn encode_key(packed: u32, decckm: bool) -> EncodedBytes {
    let code = key::code_of(packed);
    let mods = key::mods_of(packed);
    let mut out = EncodedBytes::new();

    if code >= KEY_BASE {
        encode_named(&mut out, code, mods, decckm);
        return out;
    }

    let Some(ch) = char::from_u32(code) else {
        return out;
    };

    if mods.contains(Modifiers::META) {
        out.push(ESC);
    }

    if mods.contains(Modifiers::CONTROL) && ch.is_ascii_alphabetic() {
        out.push(ch.to_ascii_uppercase() as u8 - b'@');
        return out;
    }
    if mods.contains(Modifiers::CONTROL) {
        let ctrl = match ch {
            '@'..='_' => Some(ch as u8 - b'@'),
            '?' => Some(0x7f),
            _ => None,
        };
        if let Some(b) = ctrl {
            out.push(b);
            return out;
        }
    }

    let mut buf = [0u8; 4];
    out.extend_from_slice(ch.encode_utf8(&mut buf).as_bytes());
    out
}

/// Wrap pasted text in bracketed-paste markers, encoding each code point
/// through [`encode_key`] with no modifiers.
#[must_use]
pub fn encode_paste(text: &str) -> EncodedBytes {
    let mut out = EncodedBytes::new();
    out.extend_from_slice(b"\x1b[200~");
    for ch in text.chars() {
        out.extend(encode_key(key::pack(ch as u32, Modifiers::empty()), false));
    }
    out.extend_from_slice(b"\x1b[201~");
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_char_is_utf8() {
        let bytes = encode_key(key::pack('a' as u32, Modifiers::empty()), false);
        assert_eq!(&bytes[..], b"a");
    }

    #[test]
    fn control_letter_is_caret_code() {
        let bytes = encode_key(key::pack('c' as u32, Modifiers::CONTROL), false);
        assert_eq!(&bytes[..], &[0x03]);
    }

    #[test]
    fn meta_prefixes_escape() {
        let bytes = encode_key(key::pack('x' as u32, Modifiers::META), false);
        assert_eq!(&bytes[..], &[0x1b, b'x']);
    }

    #[test]
    fn arrow_uses_ss3_under_decckm() {
        let bytes = encode_key(key::pack(key::UP, Modifiers::empty()), true);
        assert_eq!(&bytes[..], b"\x1bOA");
    }

    #[test]
    fn arrow_uses_csi_without_decckm() {
        let bytes = encode_key(key::pack(key::UP, Modifiers::empty()), false);
        assert_eq!(&bytes[..], b"\x1b[A");
    }

    #[test]
    fn modified_arrow_uses_numbered_csi() {
        let bytes = encode_key(key::pack(key::UP, Modifiers::SHIFT), true);
        assert_eq!(&bytes[..], b"\x1b[1;2A");
    }

    #[test]
    fn tilde_key_with_modifier() {
        let bytes = encode_key(key::pack(key::DELETE, Modifiers::CONTROL), false);
        assert_eq!(&bytes[..], b"\x1b[3;5~");
    }

    #[test]
    fn paste_is_wrapped() {
        let bytes = encode_paste("hi");
        assert_eq!(&bytes[..], b"\x1b[200~hi\x1b[201~");
    }
}
