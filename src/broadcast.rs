use std::iter::FusedIterator;

use num_traits::Float;
use strided_traits::ArrayLib;

use crate::seq::seq_array;

/// Advance a keep-mask to its lexicographic successor, with `true` before `false`.
///
/// Returns `false` once every combination has been visited.
fn advance_mask(mask: &mut [bool]) -> bool {
    for keep in mask.iter_mut().rev() {
        if *keep {
            *keep = false;
            return true;
        }
        *keep = true;
    }
    false
}

/// Source shapes that broadcast to a target, as yielded by [`broadcast_source_shapes`].
#[derive(Debug, Clone)]
pub struct BroadcastShapes {
    target: Vec<usize>,
    mask: Option<Vec<bool>>,
}

/// Enumerate every shape whose axes each equal the target's extent or 1.
///
/// Masks run over `{keep, collapse}^n` in lexicographic order with keep
/// first; the leading all-keep mask (the target itself) is skipped, leaving
/// `2^n - 1` shapes. A rank-0 target yields nothing.
///
/// ```rust
/// use strided_fixtures::broadcast_source_shapes;
///
/// let shapes: Vec<_> = broadcast_source_shapes(&[3, 4]).collect();
/// assert_eq!(shapes, vec![vec![3, 1], vec![1, 4], vec![1, 1]]);
/// ```
pub fn broadcast_source_shapes(target: &[usize]) -> BroadcastShapes {
    let mut mask = vec![true; target.len()];
    let mask = advance_mask(&mut mask).then_some(mask);
    BroadcastShapes {
        target: target.to_vec(),
        mask,
    }
}

impl Iterator for BroadcastShapes {
    type Item = Vec<usize>;

    fn next(&mut self) -> Option<Vec<usize>> {
        let mask = self.mask.as_mut()?;
        let shape = self
            .target
            .iter()
            .zip(mask.iter())
            .map(|(&dim, &keep)| if keep { dim } else { 1 })
            .collect();
        if !advance_mask(mask) {
            self.mask = None;
        }
        Some(shape)
    }
}

impl FusedIterator for BroadcastShapes {}

/// Iterator returned by [`broadcasts_to`].
pub struct BroadcastSources<'a, L> {
    lib: &'a L,
    shapes: BroadcastShapes,
    failed: bool,
}

impl<L> Clone for BroadcastSources<'_, L> {
    fn clone(&self) -> Self {
        Self {
            lib: self.lib,
            shapes: self.shapes.clone(),
            failed: self.failed,
        }
    }
}

/// Generate [`seq_array`]s for every shape of [`broadcast_source_shapes`]`(target)`.
pub fn broadcasts_to<'a, L>(lib: &'a L, target: &[usize]) -> BroadcastSources<'a, L>
where
    L: ArrayLib,
    L::Elem: Float,
{
    BroadcastSources {
        lib,
        shapes: broadcast_source_shapes(target),
        failed: false,
    }
}

impl<L> Iterator for BroadcastSources<'_, L>
where
    L: ArrayLib,
    L::Elem: Float,
{
    type Item = Result<L::Array, L::Error>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }
        let dims = self.shapes.next()?;
        tracing::trace!(?dims, target = ?self.shapes.target, "broadcast source");
        let item = seq_array(self.lib, &dims);
        self.failed = item.is_err();
        Some(item)
    }
}

impl<L> FusedIterator for BroadcastSources<'_, L>
where
    L: ArrayLib,
    L::Elem: Float,
{
}
