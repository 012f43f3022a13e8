use super::{FloatT, ScalarMath};

impl<T: FloatT> ScalarMath for T {
    type T = T;
    fn modulus(&self, divisor: T) -> T {
        // a tiny remainder of the wrong sign rounds `r + divisor` up
        // to `divisor`, so reduce a second time
        ((*self % divisor) + divisor) % divisor
    }
}

/// Number of cells in a packed triangle of an `k x k` matrix
pub(crate) fn triangular_number(k: usize) -> usize {
    (k * (k + 1)) >> 1
}

pub(crate) fn triangular_index(k: usize) -> usize {
    // 0-based index of the k-th diagonal entry in a column
    // packed upper triangle. Same as:
    // triangular number(k+1) - 1 = (((k+1) * (k+2)) >> 1) - 1
    (k * (k + 3)) >> 1
}

#[test]
fn test_triangular_numbers() {
    assert_eq!(triangular_number(0), 0);
    assert_eq!(triangular_number(1), 1);
    assert_eq!(triangular_number(4), 10);
    for k in 0..20 {
        assert_eq!(triangular_index(k), triangular_number(k + 1) - 1);
    }
}

#[test]
fn test_modulus() {
    assert_eq!(7.0_f64.modulus(3.0), 1.0);
    assert_eq!((-7.0_f64).modulus(3.0), 2.0);
    assert_eq!(7.0_f64.modulus(-3.0), -2.0);
    assert_eq!((-7.0_f64).modulus(-3.0), -1.0);
    assert_eq!(0.0_f64.modulus(3.0), 0.0);
    assert_eq!(6.0_f64.modulus(3.0), 0.0);

    // stays inside [0, divisor) for tiny negative values
    assert_eq!((-1e-20_f64).modulus(3.0), 0.0);
    assert_eq!(1e-20_f64.modulus(-3.0), 0.0);
    assert!((-1e-20_f32).modulus(3.0) < 3.0);
}
