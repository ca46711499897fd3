//! ISO-2022 charset registry and designation (C2, §4.1 "charset
//! designation" collaborator, §6).
//!
//! `boardterm-decode` drives designation (`ESC I... F`) and invocation
//! (`SI`/`SO`/`LS2`/`LS3`/`SS2`/`SS3`) against a [`CharsetRegistry`]; this
//! crate owns only the charset table itself and the definition-file
//! directive language that populates it.

pub mod defs;
pub mod registry;

pub use defs::{apply, parse_all, parse_line, CharsetDefError, CharsetTableSource, Directive};
pub use registry::{Arity, CharsetId, CharsetRegistry, Slot};
