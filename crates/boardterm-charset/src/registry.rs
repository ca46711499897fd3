//! ISO-2022 designator registry: resolves `ESC I... F` designator
//! sequences to a [`CharsetId`] and maps charset index → Unicode (§4.1, §6).
//!
//! Grounded on `examples/original_source/src/iso2022.hpp`/`iso2022.cpp`
//! (the `iso2022_t` charset table keyed by designator final byte plus
//! intermediates) and on the explicit-context replacement for the
//! "lazily initialised process-wide store" design note in §9: the registry
//! here is constructed and owned, never a global.

use std::collections::HashMap;

use boardterm_model::Character;

/// Which designator slot (G0-G3) a charset has been loaded into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Slot {
    G0,
    G1,
    G2,
    G3,
}

impl Slot {
    #[must_use]
    pub const fn index(self) -> usize {
        match self {
            Slot::G0 => 0,
            Slot::G1 => 1,
            Slot::G2 => 2,
            Slot::G3 => 3,
        }
    }
}

/// Stable identifier for a registered charset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CharsetId(pub u32);

impl CharsetId {
    /// ASCII (ISO-IR 6), the default G0 charset.
    pub const ASCII: CharsetId = CharsetId(0);
    /// ISO 8859-1 right half (ISO-IR 100 / "Latin-1 96-set").
    pub const LATIN1_96: CharsetId = CharsetId(1);
    /// First user-assignable id; built-ins occupy `0..FIRST_USER`.
    pub const FIRST_USER: u32 = 16;
}

/// Designator "shape": how many bytes form one character, and whether the
/// code space is 94 (excludes `SP`/`DEL`) or 96 (includes `SP`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Arity {
    /// `SB94`: single-byte, 94-character set (e.g. ASCII variants).
    Sb94,
    /// `SB96`: single-byte, 96-character set (e.g. Latin-1 right half).
    Sb96,
    /// `MB94`: multi-byte (`n` bytes), 94^n-character set (e.g. JIS X 0208).
    Mb94(u8),
    /// `MB96`: multi-byte, 96^n-character set.
    Mb96(u8),
}

impl Arity {
    #[must_use]
    pub const fn bytes_per_char(self) -> u8 {
        match self {
            Arity::Sb94 | Arity::Sb96 => 1,
            Arity::Mb94(n) | Arity::Mb96(n) => n,
        }
    }

    #[must_use]
    pub const fn is_96(self) -> bool {
        matches!(self, Arity::Sb96 | Arity::Mb96(_))
    }
}

#[derive(Debug, Clone)]
struct CharsetEntry {
    name: String,
    arity: Arity,
    /// Sparse index → Unicode overrides loaded via `map`/`define` directives
    /// (§6); absent entries fall back to the built-in table for the id.
    overrides: HashMap<u32, Option<char>>,
}

/// `(intermediates, final_byte)` key identifying a designator sequence,
/// e.g. `ESC ( B` is `(intermediates = [b'('], final = b'B')`.
pub type DesignatorKey = (Vec<u8>, u8);

/// The ISO-2022 charset registry (C2): designator → charset id, plus
/// per-charset index → Unicode resolution.
pub struct CharsetRegistry {
    designators: HashMap<DesignatorKey, CharsetId>,
    entries: HashMap<CharsetId, CharsetEntry>,
    next_id: u32,
}

impl Default for CharsetRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl CharsetRegistry {
    #[must_use]
    pub fn new() -> Self {
        let mut reg = CharsetRegistry {
            designators: HashMap::new(),
            entries: HashMap::new(),
            next_id: CharsetId::FIRST_USER,
        };
        reg.entries.insert(
            CharsetId::ASCII,
            CharsetEntry { name: "ASCII".into(), arity: Arity::Sb94, overrides: HashMap::new() },
        );
        reg.entries.insert(
            CharsetId::LATIN1_96,
            CharsetEntry { name: "ISO-IR-100".into(), arity: Arity::Sb96, overrides: HashMap::new() },
        );
        reg.designators.insert((vec![b'('], b'B'), CharsetId::ASCII);
        reg.designators.insert((vec![b'('], b'@'), CharsetId::ASCII);
        reg.designators.insert((vec![b'-'], b'A'), CharsetId::LATIN1_96);
        reg
    }

    /// Register a new charset under `name`/`arity`, returning its id. If a
    /// charset with the same name and arity is already registered, returns
    /// the existing id instead of duplicating (directive files commonly
    /// `load` a charset already brought in by a prior `SBnn`/`MBnn` line).
    pub fn define_charset(&mut self, name: &str, arity: Arity) -> CharsetId {
        if let Some((&id, _)) = self.entries.iter().find(|(_, e)| e.name == name && e.arity == arity) {
            return id;
        }
        let id = CharsetId(self.next_id);
        self.next_id += 1;
        self.entries.insert(id, CharsetEntry { name: name.to_string(), arity, overrides: HashMap::new() });
        id
    }

    /// Bind a designator sequence (the bytes between `ESC` and the final
    /// byte, and the final byte itself) to a charset id.
    pub fn bind_designator(&mut self, intermediates: &[u8], final_byte: u8, id: CharsetId) {
        self.designators.insert((intermediates.to_vec(), final_byte), id);
    }

    #[must_use]
    pub fn resolve_designator(&self, intermediates: &[u8], final_byte: u8) -> Option<CharsetId> {
        self.designators.get(&(intermediates.to_vec(), final_byte)).copied()
    }

    #[must_use]
    pub fn arity(&self, id: CharsetId) -> Option<Arity> {
        self.entries.get(&id).map(|e| e.arity)
    }

    /// Override a single code position's mapping (`map`/`define` §6).
    /// `index` is the 0-based ku/ten-derived position.
    pub fn set_override(&mut self, id: CharsetId, index: u32, value: Option<char>) {
        if let Some(e) = self.entries.get_mut(&id) {
            e.overrides.insert(index, value);
        }
    }

    /// Resolve an accumulated base-94/96 index for `id` to a [`Character`].
    /// Falls back to [`Character::from_scalar`] with the
    /// `CHARFLAG_ISO2022` tag when no mapping is known, per §3's
    /// "ISO-2022 non-Unicode" code point kind.
    #[must_use]
    pub fn lookup(&self, id: CharsetId, index: u32) -> Character {
        if id == CharsetId::ASCII {
            return Character::from_scalar(index.wrapping_add(0x20));
        }
        if id == CharsetId::LATIN1_96 {
            return Character::from_scalar(index.wrapping_add(0xA0));
        }
        if let Some(entry) = self.entries.get(&id) {
            if let Some(over) = entry.overrides.get(&index) {
                return match over {
                    Some(c) => Character::from(*c),
                    None => Character::from_scalar(0xFFFD),
                };
            }
        }
        Character::from_scalar(index | boardterm_model::character::CHARFLAG_ISO2022)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ascii_designator_resolves() {
        let reg = CharsetRegistry::new();
        assert_eq!(reg.resolve_designator(&[b'('], b'B'), Some(CharsetId::ASCII));
        assert_eq!(reg.lookup(CharsetId::ASCII, 1), Character::from('A'));
    }

    #[test]
    fn user_charset_roundtrip() {
        let mut reg = CharsetRegistry::new();
        let id = reg.define_charset("JIS_X0201_KANA", Arity::Sb94);
        reg.bind_designator(&[b'('], b'I', id);
        reg.set_override(id, 1, Some('\u{FF61}'));
        assert_eq!(reg.resolve_designator(&[b'('], b'I'), Some(id));
        assert_eq!(reg.lookup(id, 1), Character::from('\u{FF61}'));
    }
}
