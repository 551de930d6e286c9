use std::iter::FusedIterator;
use std::ops::Range;

use strided_traits::ArrayLib;

use crate::config::MaxDim;

/// Extent of every axis of the array that singleton slices are cut from.
pub const SLICE_BASE_EXTENT: usize = 5;

const SLICE_RANGE: Range<usize> = 1..2;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Stage {
    Pure,
    RankZero,
    Singleton(usize),
    SingletonSlice(usize),
    Done,
}

impl Stage {
    fn rank(ndim: usize, max_dim: usize) -> Self {
        if ndim < max_dim {
            Stage::Singleton(ndim)
        } else {
            Stage::Done
        }
    }

    fn advance(self, max_dim: usize) -> Self {
        match self {
            Stage::Pure => Stage::RankZero,
            Stage::RankZero => Stage::rank(1, max_dim),
            Stage::Singleton(ndim) => Stage::SingletonSlice(ndim),
            Stage::SingletonSlice(ndim) => Stage::rank(ndim + 1, max_dim),
            Stage::Done => Stage::Done,
        }
    }
}

/// Iterator returned by [`scalar_gen`].
pub struct ScalarVariants<'a, L: ArrayLib> {
    lib: &'a L,
    value: L::Elem,
    max_dim: usize,
    stage: Stage,
}

impl<L: ArrayLib> Clone for ScalarVariants<'_, L> {
    fn clone(&self) -> Self {
        Self {
            lib: self.lib,
            value: self.value,
            max_dim: self.max_dim,
            stage: self.stage,
        }
    }
}

/// Generate every scalar-like representation of `value`.
///
/// In order: the backend's scalar, a rank-0 array, then for each rank `d`
/// in `1..max_dim` a `(1,) * d` array followed by the `[1:2] * d` slice of a
/// `(5,) * d` array. Rank `max_dim` itself is not visited. The sequence has
/// `2 + 2 * (max_dim - 1)` elements.
pub fn scalar_gen<L: ArrayLib>(lib: &L, value: L::Elem, max_dim: MaxDim) -> ScalarVariants<'_, L> {
    ScalarVariants {
        lib,
        value,
        max_dim: max_dim.get(),
        stage: Stage::Pure,
    }
}

impl<L: ArrayLib> ScalarVariants<'_, L> {
    fn remaining(&self) -> usize {
        // Two arrays for every rank in from..max_dim.
        let ranks_from = |from: usize| 2 * self.max_dim.saturating_sub(from);
        match self.stage {
            Stage::Pure => 2 + ranks_from(1),
            Stage::RankZero => 1 + ranks_from(1),
            Stage::Singleton(ndim) => ranks_from(ndim),
            Stage::SingletonSlice(ndim) => 1 + ranks_from(ndim + 1),
            Stage::Done => 0,
        }
    }
}

impl<L: ArrayLib> Iterator for ScalarVariants<'_, L> {
    type Item = Result<L::Array, L::Error>;

    fn next(&mut self) -> Option<Self::Item> {
        let stage = self.stage;
        let item = match stage {
            Stage::Done => return None,
            Stage::Pure => self.lib.scalar(self.value),
            Stage::RankZero => self.lib.full(&[], self.value),
            Stage::Singleton(ndim) => self.lib.full(&vec![1; ndim], self.value),
            Stage::SingletonSlice(ndim) => self
                .lib
                .full(&vec![SLICE_BASE_EXTENT; ndim], self.value)
                .and_then(|base| self.lib.slice(base, &vec![SLICE_RANGE; ndim])),
        };
        tracing::trace!(?stage, ok = item.is_ok(), "scalar variant");
        self.stage = match item {
            Ok(_) => stage.advance(self.max_dim),
            Err(_) => Stage::Done,
        };
        Some(item)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        // An error ends the sequence early, so only the upper bound is exact.
        (0, Some(self.remaining()))
    }
}

impl<L: ArrayLib> FusedIterator for ScalarVariants<'_, L> {}

#[cfg(test)]
mod tests {
    use super::*;
    use strided_view::StridedLib;

    #[test]
    fn test_stage_order() {
        let mut stage = Stage::Pure;
        let mut seen = vec![stage];
        while stage != Stage::Done {
            stage = stage.advance(3);
            seen.push(stage);
        }
        assert_eq!(
            seen,
            vec![
                Stage::Pure,
                Stage::RankZero,
                Stage::Singleton(1),
                Stage::SingletonSlice(1),
                Stage::Singleton(2),
                Stage::SingletonSlice(2),
                Stage::Done,
            ]
        );
    }

    #[test]
    fn test_max_dim_one_has_no_rank_sweep() {
        let lib = StridedLib::<f64>::new();
        let dims: Vec<Vec<usize>> = scalar_gen(&lib, 1.0, MaxDim::new(1).unwrap())
            .map(|a| a.unwrap().dims().to_vec())
            .collect();
        assert_eq!(dims, vec![vec![], vec![]]);
    }

    #[test]
    fn test_size_hint_counts_down() {
        let lib = StridedLib::<f64>::new();
        let mut it = scalar_gen(&lib, 1.0, MaxDim::new(3).unwrap());
        for expected in (0..=6).rev() {
            assert_eq!(it.size_hint(), (0, Some(expected)));
            it.next();
        }
        assert!(it.next().is_none());
    }

    #[test]
    fn test_slice_variant_is_offset_view() {
        let lib = StridedLib::<f64>::new();
        let arrays: Vec<_> = scalar_gen(&lib, 2.0, MaxDim::new(3).unwrap())
            .collect::<Result<_, _>>()
            .unwrap();
        let slice_2d = &arrays[5];
        assert_eq!(slice_2d.dims(), &[1, 1]);
        assert_eq!(slice_2d.storage_len(), 25);
        assert_eq!(slice_2d.offset(), 6);
        let plain_2d = &arrays[4];
        assert_eq!(plain_2d.storage_len(), 1);
    }
}
