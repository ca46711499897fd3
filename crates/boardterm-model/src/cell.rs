//! The `Cell` value type (§3): `{character, attribute_handle, width}`.

use crate::character::Character;
use crate::table::AttrHandle;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Cell {
    pub character: Character,
    pub attribute: AttrHandle,
    pub width: u8,
}

impl Cell {
    #[must_use]
    pub const fn blank(attribute: AttrHandle) -> Self {
        Cell { character: Character::NUL, attribute, width: 1 }
    }

    #[must_use]
    pub fn new(character: Character, attribute: AttrHandle) -> Self {
        let width = if character.is_extension() || character.is_marker() { 0 } else { 1 };
        Cell { character, attribute, width }
    }

    #[must_use]
    pub const fn is_zero_width_body(&self) -> bool {
        self.width == 0 && !self.character.is_extension()
    }

    #[must_use]
    pub const fn is_wide_main(&self) -> bool {
        self.width >= 2
    }
}

impl Default for Cell {
    fn default() -> Self {
        Cell::blank(AttrHandle::DEFAULT)
    }
}
