use super::FloatT;

// Elementwise and reduction math on scalars and slices.  Packed
// kernels that work directly on storage buffers go through these
// traits, which are implemented generically for floats of type FloatT.

/// Scalar operations on [FloatT](FloatT)
pub trait ScalarMath {
    type T: FloatT;

    /// Canonical modulus, i.e. the remainder of `self / divisor`
    /// carrying the sign of the divisor.
    fn modulus(&self, divisor: Self::T) -> Self::T;
}

/// Vector operations on slices of [FloatT](FloatT)
pub trait VectorMath {
    type T;

    /// Copy values from `src` to `self`
    fn copy_from(&mut self, src: &Self) -> &mut Self;

    /// Apply an elementwise operation on a vector.
    fn scalarop(&mut self, op: impl Fn(Self::T) -> Self::T) -> &mut Self;

    /// Apply an elementwise operation to `v` and assign the
    /// results to `self`.
    fn scalarop_from(&mut self, op: impl Fn(Self::T) -> Self::T, v: &Self) -> &mut Self;

    /// Apply an elementwise binary operation to `x` and `y` and
    /// assign the results to `self`.
    fn binop_from(
        &mut self,
        op: impl Fn(Self::T, Self::T) -> Self::T,
        x: &Self,
        y: &Self,
    ) -> &mut Self;

    /// set all elements to the same value
    fn set(&mut self, c: Self::T) -> &mut Self;

    /// Elementwise scaling.
    fn scale(&mut self, c: Self::T) -> &mut Self;

    /// Elementwise negation of entries.
    fn negate(&mut self) -> &mut Self;

    /// Dot product
    fn dot(&self, y: &Self) -> Self::T;

    /// Sum of elements
    fn sum(&self) -> Self::T;

    /// Sum of elements squared.
    fn sumsq(&self) -> Self::T;

    /// 2-norm
    fn norm(&self) -> Self::T;

    /// Infinity norm
    fn norm_inf(&self) -> Self::T;
}
