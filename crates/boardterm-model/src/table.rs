//! Attribute interning table (§3).
//!
//! Attributes beyond the "basic" compact scalar form are interned here and
//! referenced by a 32-bit handle whose MSB marks it as extended. Grounded on
//! the arena-plus-index replacement for cyclic board/line/attribute
//! references called out in §9 ("Cyclic references... replace with an
//! arena-plus-index pattern"); the reference-counted interning itself
//! mirrors how `examples/original_source/src/ansi/attr.hpp`'s `attr_table`
//! keeps cell storage small.

use std::collections::HashMap;

use crate::attribute::Attribute;
use crate::color::Color;

/// MSB of an [`AttrHandle`] marks it as referring to an interned entry.
pub const EXTENDED_BIT: u32 = 1 << 31;
/// Practical upper bound on live interned entries (§7: "a hard limit...
/// that is practically unreachable").
pub const MAX_ENTRIES: u32 = u32::MAX >> 1;

/// A compact reference to an [`Attribute`], either a self-describing scalar
/// (basic attributes, §3) or an index into an [`AttributeTable`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct AttrHandle(u32);

impl AttrHandle {
    pub const DEFAULT: AttrHandle = AttrHandle(0);

    #[must_use]
    pub const fn is_extended(self) -> bool {
        self.0 & EXTENDED_BIT != 0
    }

    const fn table_index(self) -> u32 {
        self.0 & !EXTENDED_BIT
    }

    /// Pack a basic attribute (weight/shape/underline/blink/toggles plus
    /// indexed-or-default fg/bg) into a scalar handle with no table entry.
    fn from_basic(attr: &Attribute) -> Self {
        debug_assert!(attr.is_basic());
        let mut bits: u32 = 0;
        bits |= attr.aflags.weight.bits() as u32;
        bits |= (attr.aflags.shape.bits() as u32) << 2;
        bits |= (attr.aflags.underline.bits() as u32) << 4;
        bits |= (attr.aflags.blink.bits() as u32) << 7;
        bits |= (attr.aflags.frame_circle.bits() as u32) << 9;
        bits |= (attr.aflags.super_sub.bits() as u32) << 11;
        bits |= (attr.aflags.toggles.bits() as u32) << 13;
        let fg_present = matches!(attr.fg.space, crate::color::ColorSpace::Indexed);
        let bg_present = matches!(attr.bg.space, crate::color::ColorSpace::Indexed);
        bits |= (fg_present as u32) << 20;
        bits |= (attr.fg.value & 0xFF) << 21;
        bits |= (bg_present as u32) << 29;
        // bit 30 reserved, bit 31 (EXTENDED_BIT) stays 0.
        debug_assert!(bits & EXTENDED_BIT == 0);
        let _ = bg_present;
        AttrHandle(bits)
    }

    fn to_basic(self) -> Attribute {
        debug_assert!(!self.is_extended());
        let bits = self.0;
        let toggles = crate::attribute::CellToggles::from_bits_truncate(((bits >> 13) & 0x7F) as u16);
        let fg_present = (bits >> 20) & 1 != 0;
        let fg_idx = ((bits >> 21) & 0xFF) as u8;
        let bg_present = (bits >> 29) & 1 != 0;
        Attribute {
            aflags: crate::attribute::AFlags {
                weight: crate::attribute::Weight::from_bits((bits & 0b11) as u8),
                shape: crate::attribute::Shape::from_bits(((bits >> 2) & 0b11) as u8),
                underline: crate::attribute::Underline::from_bits(((bits >> 4) & 0b111) as u8),
                blink: crate::attribute::Blink::from_bits(((bits >> 7) & 0b11) as u8),
                frame_circle: crate::attribute::FrameCircle::from_bits(((bits >> 9) & 0b11) as u8),
                super_sub: crate::attribute::SuperSub::from_bits(((bits >> 11) & 0b11) as u8),
                toggles,
            },
            xflags: Default::default(),
            fg: if fg_present { Color::indexed(fg_idx) } else { Color::DEFAULT },
            bg: if bg_present { Color::indexed(0) } else { Color::DEFAULT },
            dc: Color::DEFAULT,
        }
    }
}

struct Entry {
    attr: Attribute,
    refcount: u32,
}

/// Reference-counted attribute interning table, owned by the board (§3, §9).
#[derive(Default)]
pub struct AttributeTable {
    entries: Vec<Option<Entry>>,
    free_list: Vec<u32>,
    dedup: HashMap<Attribute, u32>,
}

impl AttributeTable {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolve a handle back to a full [`Attribute`].
    #[must_use]
    pub fn get(&self, handle: AttrHandle) -> Attribute {
        if !handle.is_extended() {
            return handle.to_basic();
        }
        let idx = handle.table_index() as usize;
        self.entries[idx]
            .as_ref()
            .map(|e| e.attr)
            .unwrap_or(Attribute::DEFAULT)
    }

    /// Intern `attr`, returning a handle. Bumps the refcount of an existing
    /// entry on a dedup hit rather than allocating a new one.
    ///
    /// # Panics
    /// If the table has reached [`MAX_ENTRIES`] live entries (§7: an
    /// unreachable-in-practice hard limit whose violation aborts).
    pub fn intern(&mut self, attr: Attribute) -> AttrHandle {
        if attr.is_basic() {
            return AttrHandle::from_basic(&attr);
        }
        if let Some(&idx) = self.dedup.get(&attr) {
            self.entries[idx as usize].as_mut().unwrap().refcount += 1;
            return AttrHandle(idx | EXTENDED_BIT);
        }
        let idx = if let Some(idx) = self.free_list.pop() {
            self.entries[idx as usize] = Some(Entry { attr, refcount: 1 });
            idx
        } else {
            let idx = self.entries.len() as u32;
            assert!(idx < MAX_ENTRIES, "attribute table exhausted");
            self.entries.push(Some(Entry { attr, refcount: 1 }));
            idx
        };
        self.dedup.insert(attr, idx);
        AttrHandle(idx | EXTENDED_BIT)
    }

    /// Increment the refcount of an already-interned handle (used when a
    /// cell is duplicated, e.g. during line composition/scroll).
    pub fn retain(&mut self, handle: AttrHandle) {
        if !handle.is_extended() {
            return;
        }
        if let Some(entry) = self.entries[handle.table_index() as usize].as_mut() {
            entry.refcount += 1;
        }
    }

    /// Decrement the refcount of a handle, freeing the slot at zero.
    pub fn release(&mut self, handle: AttrHandle) {
        if !handle.is_extended() {
            return;
        }
        let idx = handle.table_index();
        let Some(entry) = self.entries[idx as usize].as_mut() else {
            return;
        };
        entry.refcount -= 1;
        if entry.refcount == 0 {
            let attr = self.entries[idx as usize].take().unwrap().attr;
            self.dedup.remove(&attr);
            self.free_list.push(idx);
        }
    }

    /// Current refcount for an extended handle (0 for freed/unknown,
    /// `u32::MAX` for basic handles which need no accounting).
    #[must_use]
    pub fn refcount(&self, handle: AttrHandle) -> u32 {
        if !handle.is_extended() {
            return u32::MAX;
        }
        self.entries[handle.table_index() as usize]
            .as_ref()
            .map_or(0, |e| e.refcount)
    }

    #[must_use]
    pub fn live_entries(&self) -> usize {
        self.entries.iter().filter(|e| e.is_some()).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::Color;

    #[test]
    fn basic_attribute_needs_no_table_entry() {
        let mut table = AttributeTable::new();
        let mut attr = Attribute::DEFAULT;
        attr.fg = Color::indexed(2);
        let h = table.intern(attr);
        assert!(!h.is_extended());
        assert_eq!(table.live_entries(), 0);
        assert_eq!(table.get(h).fg, Color::indexed(2));
    }

    #[test]
    fn extended_attribute_dedups_and_refcounts() {
        let mut table = AttributeTable::new();
        let mut attr = Attribute::DEFAULT;
        attr.fg = Color::rgb(10, 20, 30);
        let h1 = table.intern(attr);
        let h2 = table.intern(attr);
        assert!(h1.is_extended());
        assert_eq!(h1, h2);
        assert_eq!(table.refcount(h1), 2);
        table.release(h1);
        assert_eq!(table.refcount(h1), 1);
        table.release(h2);
        assert_eq!(table.live_entries(), 0);
    }
}
