use num_traits::{Float, One};
use strided_traits::ArrayLib;

/// Build an array of shape `dims` holding `1/n, 2/n, ..., n/n` in row-major order.
///
/// `n` is the element count. Values are distinct, lie in `(0, 1]` and need
/// no RNG. When `n <= 1` the array is left at the constant `0.5`.
///
/// The sequence is written into an array obtained from [`ArrayLib::full`]
/// rather than returned from `reshape` directly, so the result is a plain
/// tile with the backend's natural layout and no view transformations.
pub fn seq_array<L>(lib: &L, dims: &[usize]) -> Result<L::Array, L::Error>
where
    L: ArrayLib,
    L::Elem: Float,
{
    let one = <L::Elem as One>::one();
    let half = one / (one + one);
    let mut arr = lib.full(dims, half)?;
    let size: usize = dims.iter().product();
    if size > 1 {
        let values = lib.arange(1, size + 1)?;
        let values = lib.reshape(values, dims)?;
        let values = lib.divide(values, size)?;
        lib.assign(&mut arr, &values)?;
    }
    tracing::trace!(?dims, size, "seq_array");
    Ok(arr)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use strided_view::StridedLib;

    #[test]
    fn test_seq_array_2x3() {
        let lib = StridedLib::<f64>::new();
        let a = seq_array(&lib, &[2, 3]).unwrap();
        assert_eq!(a.dims(), &[2, 3]);
        assert!(a.is_contiguous());
        assert_relative_eq!(a.get(&[0, 0]), 1.0 / 6.0);
        assert_relative_eq!(a.get(&[0, 2]), 3.0 / 6.0);
        assert_relative_eq!(a.get(&[1, 0]), 4.0 / 6.0);
        assert_eq!(a.get(&[1, 2]), 1.0);
    }

    #[test]
    fn test_seq_array_degenerate_shapes() {
        let lib = StridedLib::<f64>::new();
        for dims in [&[][..], &[1][..], &[1, 1, 1][..]] {
            let a = seq_array(&lib, dims).unwrap();
            assert_eq!(a.dims(), dims);
            assert_eq!(a.to_row_major_vec(), vec![0.5]);
        }
    }

    #[test]
    fn test_seq_array_zero_sized() {
        let lib = StridedLib::<f64>::new();
        let a = seq_array(&lib, &[3, 0]).unwrap();
        assert_eq!(a.dims(), &[3, 0]);
        assert!(a.to_row_major_vec().is_empty());
    }

    #[test]
    fn test_seq_array_singleton_fill_per_float_type() {
        let a = seq_array(&StridedLib::<f32>::new(), &[1, 1]).unwrap();
        assert_eq!(a.to_row_major_vec(), vec![0.5f32]);
        let b = seq_array(&StridedLib::<f64>::new(), &[]).unwrap();
        assert_eq!(b.get(&[]), 0.5f64);
    }

    #[test]
    fn test_seq_array_f32() {
        let lib = StridedLib::<f32>::new();
        let a = seq_array(&lib, &[4]).unwrap();
        assert_eq!(a.to_row_major_vec(), vec![0.25, 0.5, 0.75, 1.0]);
    }
}
