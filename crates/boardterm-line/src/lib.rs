//! Line buffer (C3, §4.2): monospaced and proportional cell storage,
//! bidirectional presentation/data coordinate conversion, nested
//! directed/reversed string segments, and cell-level edit primitives.

pub mod line;
pub mod nested;

pub use line::{attribute_is_protected, Line, LineFlags, Range, SegmentOp, ShiftFlags, WordClass};
pub use nested::NestedString;
