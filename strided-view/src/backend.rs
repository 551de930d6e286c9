//! [`ArrayLib`] implementation over [`StridedArray`].

use std::marker::PhantomData;
use std::ops::Range;

use strided_traits::{ArrayLib, FixtureScalar};

use crate::view::StridedArray;
use crate::{Result, StridedError};

/// Reference fixture backend: every handle is a [`StridedArray`].
///
/// Slices and transposes are zero-copy views, so fixtures built through this
/// backend exercise offset and permuted layouts for real.
pub struct StridedLib<T> {
    _elem: PhantomData<fn() -> T>,
}

impl<T> StridedLib<T> {
    pub fn new() -> Self {
        Self { _elem: PhantomData }
    }
}

impl<T> Default for StridedLib<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Clone for StridedLib<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for StridedLib<T> {}

impl<T> std::fmt::Debug for StridedLib<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StridedLib")
            .field("elem", &std::any::type_name::<T>())
            .finish()
    }
}

impl<T: FixtureScalar> ArrayLib for StridedLib<T> {
    type Elem = T;
    type Array = StridedArray<T>;
    type Error = StridedError;

    fn scalar(&self, value: T) -> Result<StridedArray<T>> {
        Ok(StridedArray::scalar(value))
    }

    fn full(&self, dims: &[usize], value: T) -> Result<StridedArray<T>> {
        Ok(StridedArray::full(dims, value))
    }

    fn arange(&self, start: usize, stop: usize) -> Result<StridedArray<T>> {
        StridedArray::arange(start, stop)
    }

    fn reshape(&self, array: StridedArray<T>, dims: &[usize]) -> Result<StridedArray<T>> {
        array.reshape(dims)
    }

    fn slice(&self, array: StridedArray<T>, ranges: &[Range<usize>]) -> Result<StridedArray<T>> {
        array.slice(ranges)
    }

    fn transpose(&self, array: StridedArray<T>, axes: &[usize]) -> Result<StridedArray<T>> {
        array.permute(axes)
    }

    fn divide(&self, array: StridedArray<T>, divisor: usize) -> Result<StridedArray<T>> {
        if divisor == 0 {
            return Err(StridedError::DivisionByZero);
        }
        let d: T = num_traits::cast(divisor).ok_or(StridedError::ScalarConversion(divisor))?;
        Ok(array.map(|&x| x / d))
    }

    fn assign(&self, dest: &mut StridedArray<T>, src: &StridedArray<T>) -> Result<()> {
        dest.assign(src)
    }

    fn dims(&self, array: &StridedArray<T>) -> Vec<usize> {
        array.dims().to_vec()
    }

    fn to_vec(&self, array: &StridedArray<T>) -> Vec<T> {
        array.to_row_major_vec()
    }
}
