//! Key codes and modifiers (§4.5).
//!
//! A key is a single `u32`: the low bits hold either a Unicode scalar value
//! or a named-key code above [`KEY_BASE`] (which sits above the maximum
//! valid scalar value, so the two spaces never collide), and the high byte
//! holds a [`Modifiers`] bitset.

bitflags::bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct Modifiers: u32 {
        const SHIFT       = 1 << 0;
        const META        = 1 << 1;
        const CONTROL     = 1 << 2;
        const SUPER       = 1 << 3;
        const HYPER       = 1 << 4;
        const ALTER       = 1 << 5;
        const APPLICATION = 1 << 6;
    }
}

impl Modifiers {
    /// The xterm modifier parameter (`value - 1`), or `None` when no
    /// modifier beyond plain shift/alt/ctrl/meta is set and the sequence
    /// should omit the `;M` parameter entirely.
    #[must_use]
    pub fn xterm_param(self) -> Option<u8> {
        if self.is_empty() {
            return None;
        }
        let mut v: u8 = 1;
        if self.contains(Modifiers::SHIFT) {
            v += 1;
        }
        if self.contains(Modifiers::ALTER) || self.contains(Modifiers::META) {
            v += 2;
        }
        if self.contains(Modifiers::CONTROL) {
            v += 4;
        }
        Some(v)
    }
}

/// Named key codes live above every valid Unicode scalar value.
pub const KEY_BASE: u32 = 0x0011_0000;

const fn base(n: u32) -> u32 {
    KEY_BASE + n
}

pub const F1: u32 = base(1);
pub const F2: u32 = base(2);
pub const F3: u32 = base(3);
pub const F4: u32 = base(4);
pub const F5: u32 = base(5);
pub const F6: u32 = base(6);
pub const F7: u32 = base(7);
pub const F8: u32 = base(8);
pub const F9: u32 = base(9);
pub const F10: u32 = base(10);
pub const F11: u32 = base(11);
pub const F12: u32 = base(12);
pub const F13: u32 = base(13);
pub const F14: u32 = base(14);
pub const F15: u32 = base(15);
pub const F16: u32 = base(16);
pub const F17: u32 = base(17);
pub const F18: u32 = base(18);
pub const F19: u32 = base(19);
pub const F20: u32 = base(20);
pub const F21: u32 = base(21);
pub const F22: u32 = base(22);
pub const F23: u32 = base(23);
pub const F24: u32 = base(24);

pub const UP: u32 = base(30);
pub const DOWN: u32 = base(31);
pub const RIGHT: u32 = base(32);
pub const LEFT: u32 = base(33);
pub const HOME: u32 = base(34);
pub const END: u32 = base(35);

pub const INSERT: u32 = base(40);
pub const DELETE: u32 = base(41);
pub const PAGE_UP: u32 = base(42);
pub const PAGE_DOWN: u32 = base(43);

pub const KP_0: u32 = base(50);
pub const KP_1: u32 = base(51);
pub const KP_2: u32 = base(52);
pub const KP_3: u32 = base(53);
pub const KP_4: u32 = base(54);
pub const KP_5: u32 = base(55);
pub const KP_6: u32 = base(56);
pub const KP_7: u32 = base(57);
pub const KP_8: u32 = base(58);
pub const KP_9: u32 = base(59);
pub const KP_ENTER: u32 = base(60);
pub const KP_PLUS: u32 = base(61);
pub const KP_MINUS: u32 = base(62);

pub const MOUSE_LEFT: u32 = base(70);
pub const MOUSE_MIDDLE: u32 = base(71);
pub const MOUSE_RIGHT: u32 = base(72);
pub const WHEEL_UP: u32 = base(73);
pub const WHEEL_DOWN: u32 = base(74);

pub const FOCUS_IN: u32 = base(80);
pub const FOCUS_OUT: u32 = base(81);

/// Pack a code (char scalar or named-key constant above [`KEY_BASE`]) with
/// modifiers into one `u32`.
#[must_use]
pub const fn pack(code: u32, mods: Modifiers) -> u32 {
    (mods.bits() << 24) | (code & 0x00FF_FFFF)
}

#[must_use]
pub const fn code_of(key: u32) -> u32 {
    key & 0x00FF_FFFF
}

#[must_use]
pub fn mods_of(key: u32) -> Modifiers {
    Modifiers::from_bits_truncate(key >> 24)
}
