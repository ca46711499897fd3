//! Character attribute flag words and the attribute triple (§3).
//!
//! Grounded on `examples/original_source/src/ansi/attr.hpp` (bit-packed
//! `aflags_t`/`xflags_t` words carrying weight/shape/underline/blink/etc.)
//! and on the `bitflags`-based flag types in
//! `examples/geldata-vtio/crates/vtio/src/event/keyboard/modifier.rs`.

use crate::color::Color;

bitflags::bitflags! {
    /// Single-bit toggles packed into the low bits of [`AFlags`].
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
    pub struct CellToggles: u16 {
        const INVERSE      = 1 << 0;
        const INVISIBLE    = 1 << 1;
        const STRIKE       = 1 << 2;
        const OVERLINE     = 1 << 3;
        const PROPORTIONAL = 1 << 4;
        const SELECTED     = 1 << 5;
        /// DECSCA / SPA / DAQ protection bit.
        const PROTECTED    = 1 << 6;
    }
}

macro_rules! packed_enum {
    ($(#[$meta:meta])* $vis:vis enum $name:ident { $($variant:ident = $val:expr),* $(,)? }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
        #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
        $vis enum $name {
            #[default]
            $($variant = $val,)*
        }
        impl $name {
            #[must_use]
            pub const fn from_bits(bits: u8) -> Self {
                match bits {
                    $($val => $name::$variant,)*
                    _ => packed_enum!(@first $($name::$variant),*),
                }
            }
            #[must_use]
            pub const fn bits(self) -> u8 {
                self as u8
            }
        }
    };
    (@first $first:expr $(, $rest:expr)*) => { $first };
}

packed_enum!(
    /// Character weight.
    pub enum Weight { Normal = 0, Bold = 1, Faint = 2, Heavy = 3 }
);
packed_enum!(
    /// Character shape.
    pub enum Shape { Normal = 0, Italic = 1, Fraktur = 2 }
);
packed_enum!(
    /// Underline style.
    pub enum Underline { None = 0, Single = 1, Double = 2, Curly = 3, Dotted = 4, Dashed = 5 }
);
packed_enum!(
    /// Blink rate.
    pub enum Blink { None = 0, Slow = 1, Rapid = 2 }
);
packed_enum!(
    /// Frame / circle decoration.
    pub enum FrameCircle { None = 0, Frame = 1, Circle = 2 }
);
packed_enum!(
    /// Superscript / subscript.
    pub enum SuperSub { None = 0, Super = 1, Sub = 2 }
);
packed_enum!(
    /// DECDHL / DECDWL line-doubling quadrant, carried per-cell so that
    /// character-width computation (§4.3) can consult it without a line
    /// reference.
    pub enum LineDoubling { None = 0, DoubleWidth = 1, DoubleHeightTop = 2, DoubleHeightBottom = 3 }
);
packed_enum!(
    /// ECMA-48 ideogram decorations (SGR 60-65) and their RLogin 84xx
    /// overload (§1.2 / §9, resolved): distinct flag values, never merged.
    pub enum Ideogram {
        None = 0,
        UnderlineOrRightLine = 1,
        DoubleUnderlineOrDoubleRightLine = 2,
        OverlineOrLeftLine = 3,
        DoubleOverlineOrDoubleLeftLine = 4,
        StressMarking = 5,
    }
);

/// The `aflags` word: weight, shape, underline, blink, and the boolean
/// toggles of [`CellToggles`], plus the colour-space tag for each channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AFlags {
    pub weight: Weight,
    pub shape: Shape,
    pub underline: Underline,
    pub blink: Blink,
    pub frame_circle: FrameCircle,
    pub super_sub: SuperSub,
    pub toggles: CellToggles,
}

impl AFlags {
    #[must_use]
    pub fn is_default(&self) -> bool {
        *self == AFlags::default()
    }
}

/// The `xflags` word: line-doubling quadrant, SCO character rotation,
/// ideogram decorations, and whether the ideogram decoration was requested
/// through the RLogin 84xx SGR form (kept only so it round-trips on
/// DECRQSS/SGR echo, never affects rendering).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct XFlags {
    pub line_doubling: LineDoubling,
    /// SCO character rotation, in units of 45 degrees (0-7).
    pub sco_rotation: u8,
    pub ideogram: Ideogram,
    pub ideogram_rlogin_form: bool,
}

impl XFlags {
    #[must_use]
    pub fn is_default(&self) -> bool {
        *self == XFlags::default()
    }
}

/// The attribute triple `(aflags, xflags, fg, bg, dc)` (§3).
///
/// `dc` is the "decoration colour" used by underline/strike/overline when
/// distinct from `fg` (ECMA-48 SGR 58/59 and friends).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Attribute {
    pub aflags: AFlags,
    pub xflags: XFlags,
    pub fg: Color,
    pub bg: Color,
    pub dc: Color,
}

impl Attribute {
    pub const DEFAULT: Attribute = Attribute {
        aflags: AFlags {
            weight: Weight::Normal,
            shape: Shape::Normal,
            underline: Underline::None,
            blink: Blink::None,
            frame_circle: FrameCircle::None,
            super_sub: SuperSub::None,
            toggles: CellToggles::empty(),
        },
        xflags: XFlags {
            line_doubling: LineDoubling::None,
            sco_rotation: 0,
            ideogram: Ideogram::None,
            ideogram_rlogin_form: false,
        },
        fg: Color::DEFAULT,
        bg: Color::DEFAULT,
        dc: Color::DEFAULT,
    };

    #[must_use]
    pub fn is_default(&self) -> bool {
        *self == Self::DEFAULT
    }

    #[must_use]
    pub fn is_protected(&self) -> bool {
        self.aflags.toggles.contains(CellToggles::PROTECTED)
    }

    #[must_use]
    pub fn is_selected(&self) -> bool {
        self.aflags.toggles.contains(CellToggles::SELECTED)
    }

    #[must_use]
    pub fn is_blinking(&self) -> bool {
        !matches!(self.aflags.blink, Blink::None)
    }

    #[must_use]
    pub fn with_selected(mut self, selected: bool) -> Self {
        self.aflags.toggles.set(CellToggles::SELECTED, selected);
        self
    }

    /// Does this attribute fit the compact scalar representation (no
    /// interning needed)? Only plain indexed/default colours and no
    /// `xflags` qualify, matching the "basic" fast path in §3.
    #[must_use]
    pub fn is_basic(&self) -> bool {
        self.xflags.is_default()
            && matches!(self.fg.space, crate::color::ColorSpace::Default | crate::color::ColorSpace::Indexed)
            && matches!(self.bg.space, crate::color::ColorSpace::Default | crate::color::ColorSpace::Indexed)
            && self.dc.is_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_attribute_is_all_zero_equivalent() {
        assert!(Attribute::default().is_default());
    }

    #[test]
    fn basic_fast_path() {
        let mut a = Attribute::DEFAULT;
        a.fg = Color::indexed(3);
        assert!(a.is_basic());
        a.fg = Color::rgb(1, 2, 3);
        assert!(!a.is_basic());
    }
}
