//! Control event types emitted by the decoder (§4.1).
//!
//! Grounded on `examples/geldata-vtio/crates/vtparser/src/registry.rs`'s
//! `EscapeSequenceIntroducer` enum for the string-type taxonomy (DCS/OSC/
//! PM/APC) and on `examples/geldata-vtio/crates/vtio/src/event/mod.rs`'s
//! `UnrecognizedInputEvent` for the shape of the `Invalid` fallback.

use smallvec::SmallVec;

use boardterm_model::Character;

/// Which command-string introducer produced a [`ControlEvent::CmdString`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CmdStringKind {
    Dcs,
    Osc,
    Pm,
    Apc,
    /// `ESC k … ST`, enabled via `title_definition_string_enabled` (§4.1).
    TitleDefinition,
}

/// Which character-string introducer produced a [`ControlEvent::CharString`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CharStringKind {
    Sos,
}

/// One CSI parameter, possibly split into colon-separated sub-parameters
/// (ISO 8613-6 style, e.g. `38:2::R:G:B`). An absent parameter between two
/// semicolons is `None` for its lone (non-sub) slot.
pub type CsiParam = SmallVec<[Option<i64>; 4]>;

/// A decoded control event (§4.1 contract).
#[derive(Debug, Clone, PartialEq)]
pub enum ControlEvent {
    PlainChar(Character),
    /// A batched run of plain characters sharing the trivial ISO-2022
    /// fast path (§4.1 "Batching"); semantics are identical to emitting
    /// each as a separate `PlainChar`.
    PlainRun(SmallVec<[Character; 16]>),
    C0(u8),
    EscSeq { intermediates: SmallVec<[u8; 2]>, final_byte: u8 },
    CsiSeq { params: SmallVec<[CsiParam; 8]>, intermediates: SmallVec<[u8; 2]>, final_byte: u8, is_private: bool, private_marker: Option<u8> },
    CmdString { kind: CmdStringKind, payload: String },
    CharString { kind: CharStringKind, payload: String },
    Invalid(Vec<u8>),
}
