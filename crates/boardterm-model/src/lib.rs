//! Character / attribute value model (C1).
//!
//! Immutable value types shared by every other `boardterm-*` crate: code
//! points (with the wide-extension/cluster-extension/marker/ISO-2022 flag
//! bits, §3), the attribute triple and its interning table, and cells.

pub mod attribute;
pub mod cell;
pub mod character;
pub mod color;
pub mod table;

pub use attribute::Attribute;
pub use cell::Cell;
pub use character::{Character, Marker};
pub use color::{Color, ColorSpace};
pub use table::{AttrHandle, AttributeTable};
