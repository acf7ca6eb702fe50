use thiserror::Error;

/// Validation failures from timeline reconciliation.
///
/// These are expected, recoverable outcomes of ordinary interactive use
/// (a user dropped onto an occupied slot, a pointer went out of bounds),
/// so every message is written to be shown to the user as-is.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CoreError {
    #[error("segment index {index} is out of bounds (timeline has {segment_count} segments)")]
    IndexOutOfBounds { index: usize, segment_count: usize },

    #[error("invalid range: start {start} is after end {end}")]
    InvalidRange { start: usize, end: usize },

    #[error("segments {start} to {end} overlap an existing image")]
    RangeOverlap { start: usize, end: usize },

    #[error("segment {index} is already covered by a different image")]
    SlotOccupied { index: usize },

    #[error("image group {0} not found")]
    GroupNotFound(usize),
}

pub type Result<T> = std::result::Result<T, CoreError>;
