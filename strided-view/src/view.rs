//! Dynamic-rank owned strided arrays with reference-counted storage.
//!
//! A [`StridedArray`] is a `(data, dims, strides, offset)` tuple. Cloning an
//! array, or applying a metadata transformation to it, shares `data`; only
//! writes detach the buffer.

use std::ops::Range;
use std::sync::Arc;

use crate::{Result, StridedError};

// ============================================================================
// Layout helpers
// ============================================================================

/// Compute row-major strides (C default: last index varies fastest).
pub fn row_major_strides(dims: &[usize]) -> Vec<isize> {
    let rank = dims.len();
    if rank == 0 {
        return vec![];
    }
    let mut strides = vec![1isize; rank];
    for i in (0..rank - 1).rev() {
        strides[i] = strides[i + 1] * dims[i + 1] as isize;
    }
    strides
}

/// Call `f` with every multi-index of `dims`, last axis fastest.
///
/// A rank-0 shape has exactly one (empty) index.
fn for_each_index_row_major(dims: &[usize], mut f: impl FnMut(&[usize])) {
    let total: usize = dims.iter().product();
    let rank = dims.len();
    let mut idx = vec![0usize; rank];
    for _ in 0..total {
        f(&idx);
        for d in (0..rank).rev() {
            idx[d] += 1;
            if idx[d] < dims[d] {
                break;
            }
            idx[d] = 0;
        }
    }
}

// ============================================================================
// StridedArray
// ============================================================================

/// Owned strided multidimensional array with shared storage.
///
/// Freshly constructed arrays are row-major with offset 0. Views produced by
/// [`permute`](Self::permute), [`slice`](Self::slice) and
/// [`reshape`](Self::reshape) keep pointing at the same buffer, which can be
/// observed with [`shares_storage`](Self::shares_storage).
pub struct StridedArray<T> {
    data: Arc<Vec<T>>,
    dims: Arc<[usize]>,
    strides: Arc<[isize]>,
    offset: isize,
}

impl<T: std::fmt::Debug> std::fmt::Debug for StridedArray<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StridedArray")
            .field("dims", &self.dims)
            .field("strides", &self.strides)
            .field("offset", &self.offset)
            .field("storage_len", &self.data.len())
            .finish()
    }
}

impl<T> Clone for StridedArray<T> {
    fn clone(&self) -> Self {
        Self {
            data: self.data.clone(),
            dims: self.dims.clone(),
            strides: self.strides.clone(),
            offset: self.offset,
        }
    }
}

impl<T: Clone> StridedArray<T> {
    /// Create a row-major array with every element set to `value`.
    pub fn full(dims: &[usize], value: T) -> Self {
        let total: usize = dims.iter().product();
        Self::from_row_major_vec(vec![value; total], dims)
    }

    /// Create a rank-0 array holding `value`.
    pub fn scalar(value: T) -> Self {
        Self::full(&[], value)
    }

    /// Create a row-major array with values produced by a function.
    ///
    /// The function is called with indices in row-major iteration order.
    pub fn from_fn_row_major(dims: &[usize], mut f: impl FnMut(&[usize]) -> T) -> Self {
        let total: usize = dims.iter().product();
        let mut data = Vec::with_capacity(total);
        for_each_index_row_major(dims, |idx| data.push(f(idx)));
        Self::from_row_major_vec(data, dims)
    }

    /// Collect the elements in row-major order.
    pub fn to_row_major_vec(&self) -> Vec<T> {
        self.row_major_offsets()
            .into_iter()
            .map(|off| self.data[off].clone())
            .collect()
    }

    /// Reinterpret the array with new dims, keeping row-major element order.
    ///
    /// Contiguous arrays share storage with the result; anything else is
    /// materialized first.
    pub fn reshape(&self, dims: &[usize]) -> Result<Self> {
        let from = self.len();
        let to: usize = dims.iter().product();
        if from != to {
            return Err(StridedError::SizeMismatch { from, to });
        }
        if self.is_contiguous() {
            return Ok(Self {
                data: self.data.clone(),
                dims: Arc::from(dims),
                strides: Arc::from(row_major_strides(dims)),
                offset: 0,
            });
        }
        Ok(Self::from_row_major_vec(self.to_row_major_vec(), dims))
    }

    /// Overwrite every element with the element of `src` at the same index.
    ///
    /// The layout of `self` (strides, offset) is kept.
    pub fn assign(&mut self, src: &StridedArray<T>) -> Result<()> {
        if self.dims != src.dims {
            return Err(StridedError::ShapeMismatch(
                self.dims.to_vec(),
                src.dims.to_vec(),
            ));
        }
        let values = src.to_row_major_vec();
        let offsets = self.row_major_offsets();
        let data = self.make_unique();
        for (off, value) in offsets.into_iter().zip(values) {
            data[off] = value;
        }
        Ok(())
    }

    fn make_unique(&mut self) -> &mut Vec<T> {
        if Arc::strong_count(&self.data) > 1 {
            tracing::trace!(
                storage_len = self.data.len(),
                "strided array write detaches shared storage"
            );
        }
        Arc::make_mut(&mut self.data)
    }
}

impl<T: num_traits::NumCast> StridedArray<T> {
    /// Create the rank-1 array `start, start + 1, ..., stop - 1`.
    ///
    /// An empty range yields a length-0 array.
    pub fn arange(start: usize, stop: usize) -> Result<Self> {
        let data = (start..stop.max(start))
            .map(|i| num_traits::cast(i).ok_or(StridedError::ScalarConversion(i)))
            .collect::<Result<Vec<T>>>()?;
        let len = data.len();
        Ok(Self::from_row_major_vec(data, &[len]))
    }
}

impl<T> StridedArray<T> {
    fn from_row_major_vec(data: Vec<T>, dims: &[usize]) -> Self {
        Self {
            data: Arc::new(data),
            dims: Arc::from(dims),
            strides: Arc::from(row_major_strides(dims)),
            offset: 0,
        }
    }

    #[inline]
    pub fn dims(&self) -> &[usize] {
        &self.dims
    }

    #[inline]
    pub fn strides(&self) -> &[isize] {
        &self.strides
    }

    #[inline]
    pub fn offset(&self) -> isize {
        self.offset
    }

    #[inline]
    pub fn ndim(&self) -> usize {
        self.dims.len()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.dims.iter().product()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.dims.iter().any(|&d| d == 0)
    }

    /// Length of the backing buffer, which exceeds [`len`](Self::len) for slices.
    #[inline]
    pub fn storage_len(&self) -> usize {
        self.data.len()
    }

    /// Whether `self` and `other` read from the same buffer.
    pub fn shares_storage(&self, other: &StridedArray<T>) -> bool {
        Arc::ptr_eq(&self.data, &other.data)
    }

    /// Whether this is a plain row-major tile covering its whole buffer.
    ///
    /// Strides of size-1 axes are ignored.
    pub fn is_contiguous(&self) -> bool {
        if self.offset != 0 || self.data.len() != self.len() {
            return false;
        }
        let expected = row_major_strides(&self.dims);
        self.dims
            .iter()
            .zip(self.strides.iter().zip(expected.iter()))
            .all(|(&d, (&s, &e))| d <= 1 || s == e)
    }

    /// Permute dimensions: output axis `i` is input axis `perm[i]`.
    pub fn permute(&self, perm: &[usize]) -> Result<StridedArray<T>> {
        let rank = self.dims.len();
        if perm.len() != rank {
            return Err(StridedError::RankMismatch(perm.len(), rank));
        }
        let mut seen = vec![false; rank];
        for &p in perm {
            if p >= rank || seen[p] {
                return Err(StridedError::InvalidAxis { axis: p, rank });
            }
            seen[p] = true;
        }
        let new_dims: Vec<usize> = perm.iter().map(|&p| self.dims[p]).collect();
        let new_strides: Vec<isize> = perm.iter().map(|&p| self.strides[p]).collect();
        Ok(StridedArray {
            data: self.data.clone(),
            dims: Arc::from(new_dims),
            strides: Arc::from(new_strides),
            offset: self.offset,
        })
    }

    /// Restrict each axis to `ranges[axis]` (zero-copy).
    pub fn slice(&self, ranges: &[Range<usize>]) -> Result<StridedArray<T>> {
        let rank = self.dims.len();
        if ranges.len() != rank {
            return Err(StridedError::RankMismatch(ranges.len(), rank));
        }
        let mut new_dims = Vec::with_capacity(rank);
        let mut offset = self.offset;
        for (axis, range) in ranges.iter().enumerate() {
            let dim = self.dims[axis];
            if range.start > range.end || range.end > dim {
                return Err(StridedError::SliceOutOfBounds {
                    axis,
                    start: range.start,
                    end: range.end,
                    dim,
                });
            }
            if range.end > range.start {
                let shift = self.strides[axis]
                    .checked_mul(range.start as isize)
                    .ok_or(StridedError::OffsetOverflow)?;
                offset = offset
                    .checked_add(shift)
                    .ok_or(StridedError::OffsetOverflow)?;
            }
            new_dims.push(range.end - range.start);
        }
        Ok(StridedArray {
            data: self.data.clone(),
            dims: Arc::from(new_dims),
            strides: self.strides.clone(),
            offset,
        })
    }

    /// Build a new contiguous array by applying `f` to every element.
    pub fn map<U>(&self, mut f: impl FnMut(&T) -> U) -> StridedArray<U> {
        let data: Vec<U> = self
            .row_major_offsets()
            .into_iter()
            .map(|off| f(&self.data[off]))
            .collect();
        StridedArray::from_row_major_vec(data, &self.dims)
    }

    fn element_offset(&self, indices: &[usize]) -> usize {
        assert_eq!(indices.len(), self.dims.len(), "wrong number of indices");
        let mut idx = self.offset;
        for (i, &index) in indices.iter().enumerate() {
            assert!(
                index < self.dims[i],
                "index {} out of bounds for dim {}",
                index,
                self.dims[i]
            );
            idx += index as isize * self.strides[i];
        }
        idx as usize
    }

    fn row_major_offsets(&self) -> Vec<usize> {
        let mut offsets = Vec::with_capacity(self.len());
        for_each_index_row_major(&self.dims, |idx| {
            let mut off = self.offset;
            for (&i, &s) in idx.iter().zip(self.strides.iter()) {
                off += i as isize * s;
            }
            offsets.push(off as usize);
        });
        offsets
    }
}

impl<T: Copy> StridedArray<T> {
    /// Get an element by multi-dimensional index.
    pub fn get(&self, indices: &[usize]) -> T {
        self.data[self.element_offset(indices)]
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_row_major_strides() {
        assert_eq!(row_major_strides(&[3, 4]), vec![4, 1]);
        assert_eq!(row_major_strides(&[2, 3, 4]), vec![12, 4, 1]);
        assert!(row_major_strides(&[]).is_empty());
    }

    #[test]
    fn test_for_each_index_rank0_visits_once() {
        let mut seen = Vec::new();
        for_each_index_row_major(&[], |idx| seen.push(idx.to_vec()));
        assert_eq!(seen, vec![Vec::<usize>::new()]);
    }

    #[test]
    fn test_for_each_index_order() {
        let mut seen = Vec::new();
        for_each_index_row_major(&[2, 2], |idx| seen.push(idx.to_vec()));
        assert_eq!(seen, vec![vec![0, 0], vec![0, 1], vec![1, 0], vec![1, 1]]);
    }

    #[test]
    fn test_full_and_scalar() {
        let a = StridedArray::full(&[2, 3], 7.0);
        assert_eq!(a.dims(), &[2, 3]);
        assert_eq!(a.strides(), &[3, 1]);
        assert!(a.is_contiguous());
        assert!(a.to_row_major_vec().iter().all(|&x| x == 7.0));

        let s = StridedArray::scalar(2.5);
        assert_eq!(s.ndim(), 0);
        assert_eq!(s.len(), 1);
        assert_eq!(s.get(&[]), 2.5);
    }

    #[test]
    fn test_full_zero_sized() {
        let a = StridedArray::full(&[0, 3], 1.0);
        assert!(a.is_empty());
        assert_eq!(a.len(), 0);
        assert!(a.to_row_major_vec().is_empty());
    }

    #[test]
    fn test_strided_tensor_row_major() {
        let t = StridedArray::<f64>::from_fn_row_major(&[2, 3], |idx| (idx[0] * 3 + idx[1]) as f64);
        assert_eq!(t.dims(), &[2, 3]);
        assert_eq!(t.strides(), &[3, 1]);
        assert_eq!(t.get(&[0, 0]), 0.0);
        assert_eq!(t.get(&[0, 1]), 1.0);
        assert_eq!(t.get(&[1, 0]), 3.0);
        assert_eq!(t.get(&[1, 2]), 5.0);
    }

    #[test]
    fn test_arange() {
        let a = StridedArray::<f64>::arange(1, 5).unwrap();
        assert_eq!(a.dims(), &[4]);
        assert_eq!(a.to_row_major_vec(), vec![1.0, 2.0, 3.0, 4.0]);

        let empty = StridedArray::<f64>::arange(3, 3).unwrap();
        assert_eq!(empty.dims(), &[0]);
    }

    #[test]
    fn test_arange_conversion_failure() {
        let err = StridedArray::<u8>::arange(250, 260).unwrap_err();
        assert!(matches!(err, StridedError::ScalarConversion(256)));
    }

    #[test]
    fn test_permute() {
        let a = StridedArray::<f64>::from_fn_row_major(&[2, 3], |idx| (idx[0] * 3 + idx[1]) as f64);
        let p = a.permute(&[1, 0]).unwrap();
        assert_eq!(p.dims(), &[3, 2]);
        assert_eq!(p.strides(), &[1, 3]);
        assert!(p.shares_storage(&a));
        assert!(!p.is_contiguous());
        assert_eq!(p.get(&[0, 0]), 0.0);
        assert_eq!(p.get(&[1, 0]), 1.0);
        assert_eq!(p.get(&[0, 1]), 3.0);
        assert_eq!(p.to_row_major_vec(), vec![0.0, 3.0, 1.0, 4.0, 2.0, 5.0]);
    }

    #[test]
    fn test_permute_invalid() {
        let a = StridedArray::full(&[2, 3], 0.0);
        assert!(matches!(
            a.permute(&[0]),
            Err(StridedError::RankMismatch(1, 2))
        ));
        assert!(matches!(
            a.permute(&[0, 0]),
            Err(StridedError::InvalidAxis { axis: 0, rank: 2 })
        ));
        assert!(matches!(
            a.permute(&[0, 2]),
            Err(StridedError::InvalidAxis { axis: 2, rank: 2 })
        ));
    }

    #[test]
    fn test_slice_is_offset_view() {
        let a = StridedArray::<f64>::from_fn_row_major(&[5, 5], |idx| (idx[0] * 5 + idx[1]) as f64);
        let s = a.slice(&[1..2, 1..2]).unwrap();
        assert_eq!(s.dims(), &[1, 1]);
        assert_eq!(s.offset(), 6);
        assert_eq!(s.storage_len(), 25);
        assert!(s.shares_storage(&a));
        assert!(!s.is_contiguous());
        assert_eq!(s.get(&[0, 0]), 6.0);
    }

    #[test]
    fn test_slice_out_of_bounds() {
        let a = StridedArray::full(&[3], 0.0);
        assert!(matches!(
            a.slice(&[2..4]),
            Err(StridedError::SliceOutOfBounds {
                axis: 0,
                start: 2,
                end: 4,
                dim: 3
            })
        ));
        assert!(matches!(
            a.slice(&[0..1, 0..1]),
            Err(StridedError::RankMismatch(2, 1))
        ));
    }

    #[test]
    fn test_reshape_contiguous_shares_storage() {
        let a = StridedArray::<f64>::arange(0, 6).unwrap();
        let r = a.reshape(&[2, 3]).unwrap();
        assert!(r.shares_storage(&a));
        assert_eq!(r.get(&[1, 0]), 3.0);
        assert!(matches!(
            a.reshape(&[4]),
            Err(StridedError::SizeMismatch { from: 6, to: 4 })
        ));
    }

    #[test]
    fn test_reshape_permuted_materializes() {
        let a = StridedArray::<f64>::from_fn_row_major(&[2, 3], |idx| (idx[0] * 3 + idx[1]) as f64);
        let p = a.permute(&[1, 0]).unwrap();
        let r = p.reshape(&[6]).unwrap();
        assert!(!r.shares_storage(&a));
        assert_eq!(r.to_row_major_vec(), vec![0.0, 3.0, 1.0, 4.0, 2.0, 5.0]);
    }

    #[test]
    fn test_assign_keeps_layout_and_detaches() {
        let src = StridedArray::<f64>::arange(1, 7).unwrap().reshape(&[2, 3]).unwrap();
        let mut dest = StridedArray::full(&[2, 3], 0.5);
        let alias = dest.clone();
        dest.assign(&src).unwrap();
        assert!(dest.is_contiguous());
        assert!(!dest.shares_storage(&src));
        assert!(!dest.shares_storage(&alias));
        assert_eq!(dest.to_row_major_vec(), vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
        assert!(alias.to_row_major_vec().iter().all(|&x| x == 0.5));
    }

    #[test]
    fn test_assign_from_permuted_source() {
        let base = StridedArray::<f64>::from_fn_row_major(&[3, 2], |idx| (idx[0] * 2 + idx[1]) as f64);
        let src = base.permute(&[1, 0]).unwrap();
        let mut dest = StridedArray::full(&[2, 3], 0.0);
        dest.assign(&src).unwrap();
        assert_eq!(dest.to_row_major_vec(), vec![0.0, 2.0, 4.0, 1.0, 3.0, 5.0]);
    }

    #[test]
    fn test_assign_shape_mismatch() {
        let src = StridedArray::full(&[3, 2], 1.0);
        let mut dest = StridedArray::full(&[2, 3], 0.0);
        assert!(matches!(
            dest.assign(&src),
            Err(StridedError::ShapeMismatch(_, _))
        ));
    }

    #[test]
    fn test_map_is_contiguous() {
        let a = StridedArray::<f64>::arange(1, 5).unwrap().reshape(&[2, 2]).unwrap();
        let t = a.permute(&[1, 0]).unwrap();
        let m = t.map(|&x| x / 4.0);
        assert!(m.is_contiguous());
        assert_eq!(m.to_row_major_vec(), vec![0.25, 0.75, 0.5, 1.0]);
    }
}
