//! Code point / character value type (C1).
//!
//! Grounded on `examples/original_source/src/ansi/line.hpp` `character_t`
//! (flag bits layered on top of a 32-bit Unicode scalar) and on the
//! `TerminalPaletteColor`-style thin newtype wrappers used throughout
//! `examples/geldata-vtio/crates/vtio/src/event/color.rs`.

/// Highest valid Unicode scalar value.
pub const UNICODE_MAX: u32 = 0x0010_FFFF;
const UNICODE_MASK: u32 = 0x001F_FFFF;

/// Second cell of a double-width glyph.
pub const CHARFLAG_WIDE_EXTENSION: u32 = 1 << 21;
/// Continuation cell of a grapheme cluster.
pub const CHARFLAG_CLUSTER_EXTENSION: u32 = 1 << 22;
/// Segment-boundary marker, not a glyph.
pub const CHARFLAG_MARKER: u32 = 1 << 23;
/// An ISO-2022 charset/index pair with no Unicode mapping.
pub const CHARFLAG_ISO2022: u32 = 1 << 24;

/// A 32-bit code point carrying either a Unicode scalar or one of the
/// reserved flag bits above.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Character(pub u32);

impl Character {
    pub const NUL: Character = Character(0);
    pub const SPACE: Character = Character(0x20);

    #[must_use]
    pub const fn from_scalar(value: u32) -> Self {
        Character(value & UNICODE_MASK)
    }

    #[must_use]
    pub const fn is_char(value: u32) -> bool {
        value & !UNICODE_MASK == 0
    }

    #[must_use]
    pub const fn is_extension(self) -> bool {
        self.0 & (CHARFLAG_WIDE_EXTENSION | CHARFLAG_CLUSTER_EXTENSION) != 0
    }

    #[must_use]
    pub const fn is_wide_extension(self) -> bool {
        self.0 & CHARFLAG_WIDE_EXTENSION != 0
    }

    #[must_use]
    pub const fn is_cluster_extension(self) -> bool {
        self.0 & CHARFLAG_CLUSTER_EXTENSION != 0
    }

    #[must_use]
    pub const fn is_marker(self) -> bool {
        self.0 & CHARFLAG_MARKER != 0
    }

    #[must_use]
    pub const fn is_iso2022(self) -> bool {
        self.0 & CHARFLAG_ISO2022 != 0
    }

    /// Wide-extension cell carrying no glyph of its own.
    #[must_use]
    pub const fn wide_extension() -> Self {
        Character(CHARFLAG_WIDE_EXTENSION)
    }

    /// Decode as a Unicode scalar if this is a plain (non-extension,
    /// non-marker, non-ISO-2022) character.
    #[must_use]
    pub fn as_char(self) -> Option<char> {
        if self.is_extension() || self.is_marker() || self.is_iso2022() {
            return None;
        }
        char::from_u32(self.0 & UNICODE_MASK)
    }
}

impl From<char> for Character {
    fn from(c: char) -> Self {
        Character(c as u32)
    }
}

/// Segment-boundary markers used by nested directed/reversed strings (§3).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Marker {
    SdsL2r,
    SdsR2l,
    SrsBegin,
    SdsEnd,
    SrsEnd,
}

impl Marker {
    const BASE: u32 = CHARFLAG_MARKER | 0x0010_0000;

    #[must_use]
    pub const fn code(self) -> u32 {
        Self::BASE
            + match self {
                Marker::SdsL2r => 0,
                Marker::SdsR2l => 1,
                Marker::SrsBegin => 2,
                Marker::SdsEnd => 3,
                Marker::SrsEnd => 4,
            }
    }

    #[must_use]
    pub const fn as_character(self) -> Character {
        Character(self.code())
    }

    #[must_use]
    pub const fn from_character(c: Character) -> Option<Self> {
        if !c.is_marker() {
            return None;
        }
        Some(match c.0 - Self::BASE {
            0 => Marker::SdsL2r,
            1 => Marker::SdsR2l,
            2 => Marker::SrsBegin,
            3 => Marker::SdsEnd,
            4 => Marker::SrsEnd,
            _ => return None,
        })
    }

    /// Is this a "start" marker that opens a nested string?
    #[must_use]
    pub const fn is_begin(self) -> bool {
        matches!(self, Marker::SdsL2r | Marker::SdsR2l | Marker::SrsBegin)
    }

    /// Direction implied by a begin marker (only meaningful for begin markers).
    #[must_use]
    pub const fn begin_r2l(self) -> bool {
        matches!(self, Marker::SdsR2l | Marker::SrsBegin)
    }

    /// Matching end marker for a begin marker.
    #[must_use]
    pub const fn matching_end(self) -> Self {
        match self {
            Marker::SdsL2r | Marker::SdsR2l => Marker::SdsEnd,
            Marker::SrsBegin => Marker::SrsEnd,
            Marker::SdsEnd | Marker::SrsEnd => self,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_char_roundtrip() {
        let c = Character::from('A');
        assert_eq!(c.as_char(), Some('A'));
        assert!(!c.is_extension());
        assert!(!c.is_marker());
    }

    #[test]
    fn wide_extension_has_no_char() {
        let c = Character::wide_extension();
        assert!(c.is_wide_extension());
        assert!(c.is_extension());
        assert_eq!(c.as_char(), None);
    }

    #[test]
    fn marker_roundtrip() {
        for m in [
            Marker::SdsL2r,
            Marker::SdsR2l,
            Marker::SrsBegin,
            Marker::SdsEnd,
            Marker::SrsEnd,
        ] {
            let c = m.as_character();
            assert!(c.is_marker());
            assert_eq!(Marker::from_character(c), Some(m));
        }
    }
}
