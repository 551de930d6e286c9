//! Owned strided arrays with shared storage, and the reference fixture backend.
//!
//! # Core Types
//!
//! - [`StridedArray`]: Owned dynamic-rank strided array whose storage is
//!   reference-counted, so metadata transformations return views that share
//!   the backing buffer
//! - [`StridedLib`]: [`strided_traits::ArrayLib`] implementation over
//!   [`StridedArray`]
//!
//! # Metadata Transformations
//!
//! These operate only on dims/strides/offset and never copy the underlying data:
//! - `permute`: Reorder dimensions
//! - `slice`: Restrict each axis to a sub-range (moves the offset)
//! - `reshape`: Reinterpret a contiguous array with new dims
//!
//! Writes (`set`, `assign`) are copy-on-write: a view that shares storage
//! with another array gets its own buffer before it is modified.

pub mod backend;
pub mod view;

pub use backend::StridedLib;
pub use view::{row_major_strides, StridedArray};

// ============================================================================
// Error types
// ============================================================================

/// Errors that can occur during strided array operations.
#[derive(Debug, thiserror::Error)]
pub enum StridedError {
    /// Array ranks do not match.
    #[error("rank mismatch: {0} vs {1}")]
    RankMismatch(usize, usize),

    /// Array shapes are incompatible for the operation.
    #[error("shape mismatch: {0:?} vs {1:?}")]
    ShapeMismatch(Vec<usize>, Vec<usize>),

    /// Invalid axis index for the given array rank.
    #[error("invalid axis {axis} for rank {rank}")]
    InvalidAxis { axis: usize, rank: usize },

    /// Integer overflow while computing array offset.
    #[error("offset overflow while computing pointer")]
    OffsetOverflow,

    /// Slice range does not fit inside the axis.
    #[error("slice {start}..{end} out of bounds for axis {axis} of length {dim}")]
    SliceOutOfBounds {
        axis: usize,
        start: usize,
        end: usize,
        dim: usize,
    },

    /// Reshape target has a different element count.
    #[error("cannot reshape {from} elements into {to} elements")]
    SizeMismatch { from: usize, to: usize },

    /// Division of array elements by a zero count.
    #[error("division by zero")]
    DivisionByZero,

    /// Failed to convert a count into the element type.
    #[error("failed to convert {0} into the element type")]
    ScalarConversion(usize),
}

/// Result type for strided array operations.
pub type Result<T> = std::result::Result<T, StridedError>;
