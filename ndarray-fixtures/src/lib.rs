//! [`ArrayLib`] backend for `ndarray`.
//!
//! Handles are `ArcArray<T, IxDyn>`, so slicing and transposing share storage
//! the same way they do in `strided-view`. Running the fixture generators
//! against both backends and comparing the results checks that neither
//! backend depends on layout details the other does not have.
//!
//! # Example
//!
//! ```ignore
//! use ndarray_fixtures::NdarrayLib;
//! use strided_traits::ArrayLib;
//!
//! let lib = NdarrayLib::<f64>::new();
//! let a = lib.full(&[5, 5], 1.0)?;
//! let s = lib.slice(a, &[1..2, 1..2])?;
//! assert_eq!(lib.dims(&s), vec![1, 1]);
//! ```

use std::marker::PhantomData;
use std::ops::Range;

use ndarray::{ArcArray, IxDyn, Slice};
use strided_traits::{ArrayLib, FixtureScalar};

/// Error type for ndarray-fixtures operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Shape(#[from] ndarray::ShapeError),

    #[error("rank mismatch: {0} vs {1}")]
    RankMismatch(usize, usize),

    #[error("shape mismatch: {0:?} vs {1:?}")]
    ShapeMismatch(Vec<usize>, Vec<usize>),

    #[error("invalid axis {axis} for rank {rank}")]
    InvalidAxis { axis: usize, rank: usize },

    #[error("slice {start}..{end} out of bounds for axis {axis} of length {dim}")]
    SliceOutOfBounds {
        axis: usize,
        start: usize,
        end: usize,
        dim: usize,
    },

    #[error("division by zero")]
    DivisionByZero,

    #[error("failed to convert {0} into the element type")]
    ScalarConversion(usize),
}

pub type Result<T> = std::result::Result<T, Error>;

/// Dynamic-rank shared `ndarray` handle.
pub type NdArray<T> = ArcArray<T, IxDyn>;

/// Fixture backend over [`ndarray::ArcArray`].
pub struct NdarrayLib<T> {
    _elem: PhantomData<fn() -> T>,
}

impl<T> NdarrayLib<T> {
    pub fn new() -> Self {
        Self { _elem: PhantomData }
    }
}

impl<T> Default for NdarrayLib<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Clone for NdarrayLib<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for NdarrayLib<T> {}

impl<T> std::fmt::Debug for NdarrayLib<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NdarrayLib")
            .field("elem", &std::any::type_name::<T>())
            .finish()
    }
}

/// Reject anything that is not a permutation of `0..rank`.
///
/// `permuted_axes` panics on bad input, so this runs first.
fn check_permutation(axes: &[usize], rank: usize) -> Result<()> {
    if axes.len() != rank {
        return Err(Error::RankMismatch(axes.len(), rank));
    }
    let mut seen = vec![false; rank];
    for &axis in axes {
        if axis >= rank || seen[axis] {
            return Err(Error::InvalidAxis { axis, rank });
        }
        seen[axis] = true;
    }
    Ok(())
}

fn check_ranges(shape: &[usize], ranges: &[Range<usize>]) -> Result<()> {
    if ranges.len() != shape.len() {
        return Err(Error::RankMismatch(ranges.len(), shape.len()));
    }
    for (axis, (range, &dim)) in ranges.iter().zip(shape.iter()).enumerate() {
        if range.start > range.end || range.end > dim {
            return Err(Error::SliceOutOfBounds {
                axis,
                start: range.start,
                end: range.end,
                dim,
            });
        }
    }
    Ok(())
}

impl<T: FixtureScalar> ArrayLib for NdarrayLib<T> {
    type Elem = T;
    type Array = NdArray<T>;
    type Error = Error;

    fn scalar(&self, value: T) -> Result<NdArray<T>> {
        Ok(ArcArray::from_elem(IxDyn(&[]), value))
    }

    fn full(&self, dims: &[usize], value: T) -> Result<NdArray<T>> {
        Ok(ArcArray::from_elem(IxDyn(dims), value))
    }

    fn arange(&self, start: usize, stop: usize) -> Result<NdArray<T>> {
        let values = (start..stop.max(start))
            .map(|i| num_traits::cast(i).ok_or(Error::ScalarConversion(i)))
            .collect::<Result<Vec<T>>>()?;
        let len = values.len();
        Ok(ArcArray::from_shape_vec(IxDyn(&[len]), values)?)
    }

    fn reshape(&self, array: NdArray<T>, dims: &[usize]) -> Result<NdArray<T>> {
        // Logical iteration order is row-major regardless of memory layout.
        let values: Vec<T> = array.iter().copied().collect();
        Ok(ArcArray::from_shape_vec(IxDyn(dims), values)?)
    }

    fn slice(&self, mut array: NdArray<T>, ranges: &[Range<usize>]) -> Result<NdArray<T>> {
        check_ranges(array.shape(), ranges)?;
        array.slice_each_axis_inplace(|ax| Slice::from(ranges[ax.axis.index()].clone()));
        Ok(array)
    }

    fn transpose(&self, array: NdArray<T>, axes: &[usize]) -> Result<NdArray<T>> {
        check_permutation(axes, array.ndim())?;
        Ok(array.permuted_axes(IxDyn(axes)))
    }

    fn divide(&self, array: NdArray<T>, divisor: usize) -> Result<NdArray<T>> {
        if divisor == 0 {
            return Err(Error::DivisionByZero);
        }
        let d: T = num_traits::cast(divisor).ok_or(Error::ScalarConversion(divisor))?;
        Ok(array.mapv(|x| x / d).into_shared())
    }

    fn assign(&self, dest: &mut NdArray<T>, src: &NdArray<T>) -> Result<()> {
        if dest.shape() != src.shape() {
            return Err(Error::ShapeMismatch(
                dest.shape().to_vec(),
                src.shape().to_vec(),
            ));
        }
        dest.assign(src);
        Ok(())
    }

    fn dims(&self, array: &NdArray<T>) -> Vec<usize> {
        array.shape().to_vec()
    }

    fn to_vec(&self, array: &NdArray<T>) -> Vec<T> {
        array.iter().copied().collect()
    }
}
