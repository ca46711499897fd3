//! Sequence decoder (C4, §4.1): code-point stream to typed control events,
//! with an ISO-2022 GL/GR shifting sub-machine (§4.1, wired to C2).

pub mod config;
pub mod event;
pub mod iso2022;
pub mod machine;

pub use config::DecoderConfig;
pub use event::{CharStringKind, CmdStringKind, ControlEvent, CsiParam};
pub use iso2022::Iso2022State;
pub use machine::Decoder;
