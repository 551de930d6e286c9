use std::iter::FusedIterator;

use num_traits::Float;
use strided_traits::ArrayLib;

use crate::seq::seq_array;

/// Rearrange `axes` into its lexicographic successor.
///
/// Returns `false` (leaving `axes` untouched) when it is already the last
/// permutation.
fn next_permutation(axes: &mut [usize]) -> bool {
    let n = axes.len();
    if n < 2 {
        return false;
    }
    let mut i = n - 1;
    while i > 0 && axes[i - 1] >= axes[i] {
        i -= 1;
    }
    if i == 0 {
        return false;
    }
    let mut j = n - 1;
    while axes[j] <= axes[i - 1] {
        j -= 1;
    }
    axes.swap(i - 1, j);
    axes[i..].reverse();
    true
}

/// A base shape together with the transposition that maps it onto the target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PermutedSource {
    /// Shape of the untransposed array.
    pub source_dims: Vec<usize>,
    /// Transpose argument: output axis `i` is source axis `axes[i]`.
    pub axes: Vec<usize>,
}

impl PermutedSource {
    /// Shape obtained by transposing `source_dims` with `axes`.
    pub fn target_dims(&self) -> Vec<usize> {
        self.axes.iter().map(|&a| self.source_dims[a]).collect()
    }
}

/// Transpositions onto a target, as yielded by [`permutation_sources`].
#[derive(Debug, Clone)]
pub struct PermutationShapes {
    target: Vec<usize>,
    axes: Option<Vec<usize>>,
}

/// Enumerate every non-identity permutation of the target's axes.
///
/// Permutations come in lexicographic order starting after the identity, so
/// there are `n! - 1` of them and none for rank 0 or 1. For each one the
/// source shape satisfies `source_dims[axes[i]] == target[i]`.
///
/// ```rust
/// use strided_fixtures::permutation_sources;
///
/// let sources: Vec<_> = permutation_sources(&[2, 3]).collect();
/// assert_eq!(sources.len(), 1);
/// assert_eq!(sources[0].source_dims, vec![3, 2]);
/// assert_eq!(sources[0].axes, vec![1, 0]);
/// ```
pub fn permutation_sources(target: &[usize]) -> PermutationShapes {
    let mut axes: Vec<usize> = (0..target.len()).collect();
    let axes = next_permutation(&mut axes).then_some(axes);
    PermutationShapes {
        target: target.to_vec(),
        axes,
    }
}

impl Iterator for PermutationShapes {
    type Item = PermutedSource;

    fn next(&mut self) -> Option<PermutedSource> {
        let axes = self.axes.as_mut()?;
        let mut source_dims = vec![0; self.target.len()];
        for (i, &j) in axes.iter().enumerate() {
            source_dims[j] = self.target[i];
        }
        let source = PermutedSource {
            source_dims,
            axes: axes.clone(),
        };
        if !next_permutation(axes) {
            self.axes = None;
        }
        Some(source)
    }
}

impl FusedIterator for PermutationShapes {}

/// Iterator returned by [`permutes_to`].
pub struct PermutationSources<'a, L> {
    lib: &'a L,
    sources: PermutationShapes,
    failed: bool,
}

impl<L> Clone for PermutationSources<'_, L> {
    fn clone(&self) -> Self {
        Self {
            lib: self.lib,
            sources: self.sources.clone(),
            failed: self.failed,
        }
    }
}

/// Generate transposed [`seq_array`]s whose shape is exactly `target`.
///
/// Each array is built with the source shape of one
/// [`permutation_sources`] entry and then transposed with its axes, so the
/// data layout differs from a freshly allocated array of the target shape.
pub fn permutes_to<'a, L>(lib: &'a L, target: &[usize]) -> PermutationSources<'a, L>
where
    L: ArrayLib,
    L::Elem: Float,
{
    PermutationSources {
        lib,
        sources: permutation_sources(target),
        failed: false,
    }
}

impl<L> Iterator for PermutationSources<'_, L>
where
    L: ArrayLib,
    L::Elem: Float,
{
    type Item = Result<L::Array, L::Error>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }
        let PermutedSource { source_dims, axes } = self.sources.next()?;
        tracing::trace!(?source_dims, ?axes, "permutation source");
        let item =
            seq_array(self.lib, &source_dims).and_then(|base| self.lib.transpose(base, &axes));
        self.failed = item.is_err();
        Some(item)
    }
}

impl<L> FusedIterator for PermutationSources<'_, L>
where
    L: ArrayLib,
    L::Elem: Float,
{
}
