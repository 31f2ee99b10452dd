//! Error types for prism-core operations

use prism_shape::{Coord, Extent};

/// Result type for prism-core operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in prism-core operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Allocator could not satisfy a request
    #[error("allocation failed: {requested} elements ({bytes} bytes)")]
    Allocation { requested: usize, bytes: usize },

    /// Linear index past the element count
    #[error("index out of range: {index} >= {count}")]
    OutOfRange { index: usize, count: usize },

    /// Coordinate outside its extent
    #[error("coordinate out of range: {coord} not within {extent}")]
    CoordOutOfRange { coord: Coord, extent: Extent },

    /// Coordinate rank differs from the extent rank
    #[error("rank mismatch: expected {expected}, got {actual}")]
    RankMismatch { expected: usize, actual: usize },

    /// Rebind target too small for the extent
    #[error("size mismatch: need {expected} elements, target holds {actual}")]
    SizeMismatch { expected: usize, actual: usize },

    /// Storage no longer targets any memory
    #[error("storage is detached: no backing memory is bound")]
    Detached,

    /// Kernel identity must be a non-empty name
    #[error("kernel name is empty")]
    EmptyKernelName,

    /// A dispatch record carries exactly one launch shape
    #[error("launch shape already recorded: {existing}")]
    ShapeAlreadyRecorded { existing: &'static str },
}

impl Error {
    /// Create an allocation error for a request of `requested` elements
    pub fn allocation(requested: usize, bytes: usize) -> Self {
        Self::Allocation { requested, bytes }
    }

    /// Create a linear out-of-range error
    pub fn out_of_range(index: usize, count: usize) -> Self {
        Self::OutOfRange { index, count }
    }

    /// Create a coordinate out-of-range error
    pub fn coord_out_of_range(coord: Coord, extent: Extent) -> Self {
        Self::CoordOutOfRange { coord, extent }
    }
}

/// Outcome of a weak-reference rebind
///
/// The weak form of late-rebind never fails on an expired referent; it
/// reports the no-op instead of swallowing it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[must_use]
pub enum Rebind {
    /// Referent was alive; the storage now targets it
    Rebound,
    /// Referent had expired; the previous pointer is retained
    Expired,
}

impl Rebind {
    /// Whether the rebind took effect
    pub const fn is_rebound(&self) -> bool {
        matches!(self, Self::Rebound)
    }
}
