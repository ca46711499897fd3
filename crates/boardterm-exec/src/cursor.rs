//! Cursor state (§3, §4.3).

use boardterm_model::AttrHandle;

/// Cursor position, "last column + 1" overflow flag, and the attribute
/// handle new plain characters are written with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cursor {
    pub x: u32,
    pub y: u32,
    pub xenl: bool,
    pub visible: bool,
    pub attribute: AttrHandle,
    /// DECOM: motion and CUP/HVP are relative to the scroll region.
    pub origin_mode: bool,
}

impl Cursor {
    #[must_use]
    pub const fn new() -> Self {
        Cursor { x: 0, y: 0, xenl: false, visible: true, attribute: AttrHandle::DEFAULT, origin_mode: false }
    }

    /// §8 "Cursor saneness": `0 <= x <= width`, `x == width` only with
    /// `xenl`, `0 <= y < height`.
    #[must_use]
    pub fn is_sane(&self, width: u32, height: u32) -> bool {
        if self.y >= height {
            return false;
        }
        if self.x > width {
            return false;
        }
        if self.x == width && !self.xenl {
            return false;
        }
        true
    }

    pub fn clamp_to(&mut self, width: u32, height: u32) {
        self.x = self.x.min(width);
        self.y = self.y.min(height.saturating_sub(1));
        if self.x < width {
            self.xenl = false;
        }
    }
}

/// Saved cursor state for DECSC/DECRC (§4.3 mode registry: "DECSC/DECRC
/// store/restore cursor + DECAWM + DECOM").
#[derive(Debug, Clone, Copy, Default)]
pub struct SavedCursor {
    pub cursor: Cursor,
    pub autowrap: bool,
    pub origin_mode: bool,
}

impl Default for Cursor {
    fn default() -> Self {
        Self::new()
    }
}
