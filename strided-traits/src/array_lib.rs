//! Capability trait for array backends driven by the fixture generators.
//!
//! The generators in `strided-fixtures` never touch storage directly. They
//! go through the small set of constructors and metadata transformations
//! below, so the same enumeration can be replayed against several backends
//! and the results compared element by element.

use std::ops::Range;

use crate::scalar::FixtureScalar;

/// A multidimensional array library, as seen by the fixture generators.
///
/// Array handles are passed by value into the transforming methods
/// (`reshape`, `slice`, `transpose`, `divide`) so backends with shared
/// storage can return views without copying. Every method reports failures
/// through [`ArrayLib::Error`]; generators propagate these unchanged.
///
/// # Axis conventions
///
/// - Shapes are row-major: the last axis varies fastest in [`ArrayLib::to_vec`]
///   and in the sequence produced by [`ArrayLib::arange`] + [`ArrayLib::reshape`].
/// - [`ArrayLib::transpose`] follows the NumPy convention: output axis `i` is
///   input axis `axes[i]`.
pub trait ArrayLib {
    /// Element type stored in arrays of this backend.
    type Elem: FixtureScalar;
    /// Owned array handle.
    type Array;
    /// Backend failure (allocation, invalid shape, invalid axes).
    type Error: std::error::Error;

    /// Construct a rank-0 array holding `value`.
    fn scalar(&self, value: Self::Elem) -> Result<Self::Array, Self::Error>;

    /// Construct an array of shape `dims` with every element set to `value`.
    fn full(&self, dims: &[usize], value: Self::Elem) -> Result<Self::Array, Self::Error>;

    /// Construct the rank-1 array `start, start + 1, ..., stop - 1`.
    fn arange(&self, start: usize, stop: usize) -> Result<Self::Array, Self::Error>;

    /// Reinterpret `array` with shape `dims`, keeping row-major element order.
    fn reshape(&self, array: Self::Array, dims: &[usize]) -> Result<Self::Array, Self::Error>;

    /// Restrict every axis of `array` to the corresponding range.
    ///
    /// `ranges.len()` must equal the rank of `array`.
    fn slice(&self, array: Self::Array, ranges: &[Range<usize>])
        -> Result<Self::Array, Self::Error>;

    /// Reorder the axes of `array`; output axis `i` comes from input axis `axes[i]`.
    fn transpose(&self, array: Self::Array, axes: &[usize]) -> Result<Self::Array, Self::Error>;

    /// Divide every element by `divisor`.
    fn divide(&self, array: Self::Array, divisor: usize) -> Result<Self::Array, Self::Error>;

    /// Overwrite every element of `dest` with the element of `src` at the same index.
    ///
    /// Shapes must match exactly. `dest` keeps its own layout.
    fn assign(&self, dest: &mut Self::Array, src: &Self::Array) -> Result<(), Self::Error>;

    /// Shape of `array`.
    fn dims(&self, array: &Self::Array) -> Vec<usize>;

    /// Elements of `array` in row-major (C) order.
    fn to_vec(&self, array: &Self::Array) -> Vec<Self::Elem>;
}
