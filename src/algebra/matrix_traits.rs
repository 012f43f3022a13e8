#![allow(non_snake_case)]

use crate::algebra::dense::generic;
use crate::algebra::*;
use enum_dispatch::enum_dispatch;
use rand::distributions::Distribution;
use rand::Rng;

/// Element access common to every matrix type.
///
/// `at` and `set_at` are the unchecked fast paths.  They perform no
/// range checks, and an out of range index gives an unspecified value
/// or a panic.  `set_at` fails only when asked to store a non-zero value
/// at a position the matrix has no storage for.  Use `get` and `set`
/// for range checked access.
#[enum_dispatch]
pub trait MatrixAccess<T>
where
    T: FloatT,
{
    fn nrows(&self) -> usize;
    fn ncols(&self) -> usize;

    /// declared structure of the matrix
    fn kind(&self) -> StructureKind;

    fn size(&self) -> (usize, usize) {
        (self.nrows(), self.ncols())
    }

    fn is_square(&self) -> bool {
        self.nrows() == self.ncols()
    }

    /// unchecked read of `(row, col)`
    fn at(&self, row: usize, col: usize) -> T;

    /// unchecked write of `(row, col)`
    fn set_at(&mut self, row: usize, col: usize, value: T) -> Result<(), MatrixError>;

    /// range checked read of `(row, col)`
    fn get(&self, row: usize, col: usize) -> Result<T, MatrixError> {
        MatrixError::check_range(row, col, self.nrows(), self.ncols())?;
        Ok(self.at(row, col))
    }

    /// Range checked write of `(row, col)`.
    ///
    /// Writing exactly zero to a structural zero (a cell outside the
    /// stored triangle or off the diagonal) succeeds and changes nothing.
    /// Any other value there fails with [`MatrixError::InvalidOperation`].
    fn set(&mut self, row: usize, col: usize, value: T) -> Result<(), MatrixError> {
        MatrixError::check_range(row, col, self.nrows(), self.ncols())?;
        self.set_at(row, col, value)
    }
}

/// Arithmetic on matrices of [FloatT](FloatT).
///
/// Every method has a default implementation running the generic dense
/// algorithm through unchecked element access.  Structured matrix
/// types override the methods for which knowing the structure of the
/// operands allows a cheaper loop, and fall back to the default
/// whenever the operand or result structure does not match.
///
/// The `*_into` methods write into a caller supplied result, which may
/// be of any kind able to hold the value.  A result that cannot hold it
/// (e.g. a non-symmetric value written into a symmetric matrix) fails
/// with [`MatrixError::InvalidOperation`].
pub trait MatrixOps<T>: MatrixAccess<T> + Sized
where
    T: FloatT,
{
    /// borrowed operand view of `self`
    fn as_operand(&self) -> MatrixRef<'_, T>;

    /// `result = self + other`
    fn add_into<'a, 'b>(
        &self,
        other: impl Into<MatrixRef<'a, T>>,
        result: impl Into<MatrixMut<'b, T>>,
    ) -> Result<(), MatrixError> {
        generic::add(self.as_operand(), other.into(), result.into())
    }

    /// `result = self - other`
    fn subtract_into<'a, 'b>(
        &self,
        other: impl Into<MatrixRef<'a, T>>,
        result: impl Into<MatrixMut<'b, T>>,
    ) -> Result<(), MatrixError> {
        generic::subtract(self.as_operand(), other.into(), result.into())
    }

    /// `result = c * self`
    fn scale_into<'b>(&self, c: T, result: impl Into<MatrixMut<'b, T>>) -> Result<(), MatrixError> {
        generic::scale(self.as_operand(), c, result.into())
    }

    /// `result = -self`
    fn negate_into<'b>(&self, result: impl Into<MatrixMut<'b, T>>) -> Result<(), MatrixError> {
        generic::negate(self.as_operand(), result.into())
    }

    /// `result = self * other`
    fn multiply_into<'a, 'b>(
        &self,
        other: impl Into<MatrixRef<'a, T>>,
        result: impl Into<MatrixMut<'b, T>>,
    ) -> Result<(), MatrixError> {
        generic::multiply(self.as_operand(), other.into(), result.into())
    }

    /// `result = self * otherᵀ`
    fn transpose_and_multiply_into<'a, 'b>(
        &self,
        other: impl Into<MatrixRef<'a, T>>,
        result: impl Into<MatrixMut<'b, T>>,
    ) -> Result<(), MatrixError> {
        generic::transpose_and_multiply(self.as_operand(), other.into(), result.into())
    }

    /// `result = selfᵀ * other`
    fn transpose_this_and_multiply_into<'a, 'b>(
        &self,
        other: impl Into<MatrixRef<'a, T>>,
        result: impl Into<MatrixMut<'b, T>>,
    ) -> Result<(), MatrixError> {
        generic::transpose_this_and_multiply(self.as_operand(), other.into(), result.into())
    }

    /// `y = self * x`
    fn multiply_vector_into(&self, x: &[T], y: &mut [T]) -> Result<(), MatrixError> {
        generic::multiply_vector(self.as_operand(), x, y)
    }

    /// `y = selfᵀ * x`
    fn transpose_this_and_multiply_vector_into(
        &self,
        x: &[T],
        y: &mut [T],
    ) -> Result<(), MatrixError> {
        generic::transpose_this_and_multiply_vector(self.as_operand(), x, y)
    }

    /// `result = self .* other`
    fn pointwise_multiply_into<'a, 'b>(
        &self,
        other: impl Into<MatrixRef<'a, T>>,
        result: impl Into<MatrixMut<'b, T>>,
    ) -> Result<(), MatrixError> {
        generic::pointwise_multiply(self.as_operand(), other.into(), result.into())
    }

    /// `result = self ./ other`
    fn pointwise_divide_into<'a, 'b>(
        &self,
        other: impl Into<MatrixRef<'a, T>>,
        result: impl Into<MatrixMut<'b, T>>,
    ) -> Result<(), MatrixError> {
        generic::pointwise_divide(self.as_operand(), other.into(), result.into())
    }

    /// elementwise canonical modulus, with the sign of `divisor`
    fn modulus_into<'b>(
        &self,
        divisor: T,
        result: impl Into<MatrixMut<'b, T>>,
    ) -> Result<(), MatrixError> {
        generic::modulus(self.as_operand(), divisor, result.into())
    }

    /// `result = selfᵀ`
    fn transpose_into<'b>(&self, result: impl Into<MatrixMut<'b, T>>) -> Result<(), MatrixError> {
        generic::transpose(self.as_operand(), result.into())
    }

    /// sum of the diagonal entries.  Fails for non-square matrices.
    fn trace(&self) -> Result<T, MatrixError> {
        generic::trace(self.as_operand())
    }

    /// maximum absolute column sum
    fn l1_norm(&self) -> T {
        generic::l1_norm(self.as_operand())
    }

    /// maximum absolute row sum
    fn infinity_norm(&self) -> T {
        generic::infinity_norm(self.as_operand())
    }

    /// square root of the sum of squared entries
    fn frobenius_norm(&self) -> T {
        generic::frobenius_norm(self.as_operand())
    }

    /// Overwrite every stored cell with a fresh sample of `dist`
    fn fill_random<D, R>(&mut self, dist: &D, rng: &mut R) -> Result<(), MatrixError>
    where
        D: Distribution<T>,
        R: Rng + ?Sized,
    {
        for col in 0..self.ncols() {
            for row in 0..self.nrows() {
                self.set_at(row, col, dist.sample(rng))?;
            }
        }
        Ok(())
    }

    // ---------------------------------------------------
    // allocating versions.  The result kind is the tightest
    // one able to hold the value for the operand kinds.

    /// `self + other`
    fn add<'a>(&self, other: impl Into<MatrixRef<'a, T>>) -> Result<AnyMatrix<T>, MatrixError> {
        let other = other.into();
        let kind = StructureKind::for_sum(self.kind(), other.kind());
        let mut result = AnyMatrix::zeros(kind, self.nrows(), self.ncols())?;
        self.add_into(other, &mut result)?;
        Ok(result)
    }

    /// `self - other`
    fn subtract<'a>(
        &self,
        other: impl Into<MatrixRef<'a, T>>,
    ) -> Result<AnyMatrix<T>, MatrixError> {
        let other = other.into();
        let kind = StructureKind::for_sum(self.kind(), other.kind());
        let mut result = AnyMatrix::zeros(kind, self.nrows(), self.ncols())?;
        self.subtract_into(other, &mut result)?;
        Ok(result)
    }

    /// `self * other`
    fn multiply<'a>(
        &self,
        other: impl Into<MatrixRef<'a, T>>,
    ) -> Result<AnyMatrix<T>, MatrixError> {
        let other = other.into();
        let kind = StructureKind::for_product(self.kind(), other.kind());
        let mut result = AnyMatrix::zeros(kind, self.nrows(), other.ncols())?;
        self.multiply_into(other, &mut result)?;
        Ok(result)
    }

    /// `self .* other`
    fn pointwise_multiply<'a>(
        &self,
        other: impl Into<MatrixRef<'a, T>>,
    ) -> Result<AnyMatrix<T>, MatrixError> {
        let other = other.into();
        let kind = StructureKind::for_pointwise_product(self.kind(), other.kind());
        let mut result = AnyMatrix::zeros(kind, self.nrows(), self.ncols())?;
        self.pointwise_multiply_into(other, &mut result)?;
        Ok(result)
    }

    /// `-self`
    fn negate(&self) -> Result<AnyMatrix<T>, MatrixError> {
        let mut result = AnyMatrix::zeros(self.kind(), self.nrows(), self.ncols())?;
        self.negate_into(&mut result)?;
        Ok(result)
    }

    /// `selfᵀ` as a new matrix
    fn transposed(&self) -> Result<AnyMatrix<T>, MatrixError> {
        let kind = StructureKind::for_transpose(self.kind());
        let mut result = AnyMatrix::zeros(kind, self.ncols(), self.nrows())?;
        self.transpose_into(&mut result)?;
        Ok(result)
    }
}
