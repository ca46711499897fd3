//! Executor error/log policy (§7).

/// Reasons the executor logs-and-ignores rather than failing (§7: "executor
/// unrecognised sequence", "executor bad parameter"). Never surfaced as a
/// `Result` error to callers of [`crate::executor::Executor::execute`] — the
/// executor always makes progress — but kept as a typed reason for
/// `tracing` events and for tests asserting on log content.
#[derive(Debug, Clone, thiserror::Error, PartialEq, Eq)]
pub enum ExecNote {
    #[error("unrecognized CSI final byte {0:#x}")]
    UnrecognizedCsi(u8),
    #[error("unrecognized mode number {0}")]
    UnrecognizedMode(u16),
    #[error("CUP coordinate clamped to region")]
    ClampedCoordinate,
    #[error("unrecognized DECRQSS request {0:?}")]
    UnrecognizedRqss(String),
}
