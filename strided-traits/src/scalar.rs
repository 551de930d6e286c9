//! Element type bounds for fixture arrays.

use std::fmt::Debug;

/// Shared trait bounds for every element type a fixture backend can hold.
///
/// `NumCast` lets backends build `arange` sequences and divide by element
/// counts without knowing the concrete type. Floating-point specific
/// behaviour (the `0.5` fill of `seq_array`) is requested separately with a
/// `num_traits::Float` bound at the call site, so integer backends can still
/// serve scalar fixtures.
pub trait FixtureScalar:
    Copy + Send + Sync + PartialEq + Debug + num_traits::Num + num_traits::NumCast
{
}

impl<T> FixtureScalar for T where
    T: Copy + Send + Sync + PartialEq + Debug + num_traits::Num + num_traits::NumCast
{
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_fixture_scalar<T: FixtureScalar>() {}

    #[test]
    fn test_standard_types() {
        assert_fixture_scalar::<f32>();
        assert_fixture_scalar::<f64>();
        assert_fixture_scalar::<i32>();
        assert_fixture_scalar::<i64>();
        assert_fixture_scalar::<u8>();
    }

    #[test]
    fn test_numcast_from_count() {
        // Element counts are always converted through NumCast.
        let n: f64 = num_traits::cast(12usize).unwrap();
        assert_eq!(n, 12.0);
        let small: Option<u8> = num_traits::cast(300usize);
        assert!(small.is_none());
    }
}
