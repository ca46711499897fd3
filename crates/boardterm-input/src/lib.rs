//! Key and mouse input encoding (C7, §4.5).

pub mod encode;
pub mod key;
pub mod mouse;

pub use encode::{encode_key, encode_paste, EncodedBytes};
pub use key::{Modifiers, KEY_BASE};
pub use mouse::{encode_mouse, MouseButton, MouseEvent, MouseKind, ReportMode, SequenceMode, WheelDirection};
