//! Deterministic array fixtures for testing multidimensional array libraries.
//!
//! Every generator here is a pure function of an [`ArrayLib`] backend and a
//! few numeric parameters, and returns a lazy iterator of freshly built
//! arrays. No randomness is involved, so a failing test reproduces exactly,
//! on any machine and on any worker of a distributed run.
//!
//! # Generators
//!
//! - [`seq_array`]: one array of a given shape filled with `1/n, 2/n, ..., n/n`
//!   in row-major order (a single `0.5` when the shape has at most one element)
//! - [`scalar_gen`]: every shape that must behave like a scalar: a true
//!   scalar, a rank-0 array, `(1, ..., 1)` singletons, and singleton slices
//!   of larger arrays
//! - [`broadcasts_to`]: every equal-or-one source shape of a target, minus
//!   the target itself (`2^n - 1` arrays)
//! - [`permutes_to`]: every non-identity transposition that lands on the
//!   target shape (`n! - 1` arrays)
//!
//! The shape-only enumerations behind the last two are available as
//! [`broadcast_source_shapes`] and [`permutation_sources`].
//!
//! # Example
//!
//! ```rust
//! use strided_fixtures::{broadcasts_to, permutes_to, StridedLib};
//!
//! let lib = StridedLib::<f64>::new();
//!
//! let shapes: Vec<Vec<usize>> = broadcasts_to(&lib, &[3, 4])
//!     .map(|a| a.unwrap().dims().to_vec())
//!     .collect();
//! assert_eq!(shapes, vec![vec![3, 1], vec![1, 4], vec![1, 1]]);
//!
//! let permuted: Vec<_> = permutes_to(&lib, &[2, 3]).collect::<Result<_, _>>().unwrap();
//! assert_eq!(permuted.len(), 1);
//! assert_eq!(permuted[0].dims(), &[2, 3]);
//! ```
//!
//! # Configuration
//!
//! The rank sweep of [`scalar_gen`] is bounded by a [`MaxDim`], normally read
//! from `LEGATE_MAX_DIM` through [`FixtureConfig::from_env`] at the start of
//! each test.
//!
//! # Errors
//!
//! Backend failures are yielded unchanged as `Err(L::Error)`, after which
//! the iterator is exhausted. [`FixtureError`] only covers configuration.

mod broadcast;
mod config;
mod permute;
mod scalar;
mod seq;

pub use broadcast::{broadcast_source_shapes, broadcasts_to, BroadcastShapes, BroadcastSources};
pub use config::{FixtureConfig, MaxDim, DEFAULT_MAX_DIM, MAX_DIM_ENV};
pub use permute::{
    permutation_sources, permutes_to, PermutationShapes, PermutationSources, PermutedSource,
};
pub use scalar::{scalar_gen, ScalarVariants, SLICE_BASE_EXTENT};
pub use seq::seq_array;

pub use strided_traits::{ArrayLib, FixtureScalar};
pub use strided_view::{StridedArray, StridedError, StridedLib};

// ============================================================================
// Error types
// ============================================================================

/// Errors in fixture configuration.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FixtureError {
    /// The maximum dimensionality must allow at least one axis.
    #[error("invalid max dim {0}: must be at least 1")]
    InvalidMaxDim(usize),

    /// The environment value is not a non-negative integer.
    #[error("cannot parse {var}={value:?} as a dimension count")]
    UnparsableMaxDim { var: &'static str, value: String },
}

/// Result type for fixture configuration.
pub type Result<T> = std::result::Result<T, FixtureError>;
