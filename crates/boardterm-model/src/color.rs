//! Colour values and colour-space tags (§3).
//!
//! Grounded on `examples/geldata-vtio/crates/vtio/src/event/color.rs`
//! (`TerminalPaletteColor`/`TerminalColorAction`, thin newtypes over a raw
//! colour value) and on the SGR colour-space enumeration in §4.3.

/// The colour space a raw 32-bit colour value is interpreted under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(u8)]
pub enum ColorSpace {
    #[default]
    Default = 0,
    Transparent = 1,
    Indexed = 2,
    Rgb = 3,
    Cmy = 4,
    Cmyk = 5,
}

impl ColorSpace {
    #[must_use]
    pub const fn from_bits(bits: u32) -> Self {
        match bits & 0b111 {
            1 => ColorSpace::Transparent,
            2 => ColorSpace::Indexed,
            3 => ColorSpace::Rgb,
            4 => ColorSpace::Cmy,
            5 => ColorSpace::Cmyk,
            _ => ColorSpace::Default,
        }
    }

    #[must_use]
    pub const fn bits(self) -> u32 {
        self as u32
    }
}

/// A colour value plus the colour space it is interpreted under.
///
/// The raw value packs its channels according to `space`:
/// `Indexed` uses the low 8 bits as a 256-colour palette index; `Rgb` packs
/// `0x00RRGGBB`; `Cmy`/`Cmyk` pack one byte per channel, high byte first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Color {
    pub space: ColorSpace,
    pub value: u32,
}

impl Color {
    pub const DEFAULT: Color = Color {
        space: ColorSpace::Default,
        value: 0,
    };

    #[must_use]
    pub const fn indexed(index: u8) -> Self {
        Color {
            space: ColorSpace::Indexed,
            value: index as u32,
        }
    }

    #[must_use]
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Color {
            space: ColorSpace::Rgb,
            value: ((r as u32) << 16) | ((g as u32) << 8) | b as u32,
        }
    }

    #[must_use]
    pub const fn rgb_tuple(self) -> Option<(u8, u8, u8)> {
        match self.space {
            ColorSpace::Rgb => Some((
                (self.value >> 16) as u8,
                (self.value >> 8) as u8,
                self.value as u8,
            )),
            _ => None,
        }
    }

    #[must_use]
    pub const fn cmyk(c: u8, m: u8, y: u8, k: u8) -> Self {
        Color {
            space: ColorSpace::Cmyk,
            value: ((c as u32) << 24) | ((m as u32) << 16) | ((y as u32) << 8) | k as u32,
        }
    }

    #[must_use]
    pub const fn cmy(c: u8, m: u8, y: u8) -> Self {
        Color {
            space: ColorSpace::Cmy,
            value: ((c as u32) << 16) | ((m as u32) << 8) | y as u32,
        }
    }

    #[must_use]
    pub const fn transparent() -> Self {
        Color {
            space: ColorSpace::Transparent,
            value: 0,
        }
    }

    #[must_use]
    pub const fn is_default(self) -> bool {
        matches!(self.space, ColorSpace::Default)
    }
}
