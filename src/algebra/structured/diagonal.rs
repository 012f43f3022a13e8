#![allow(non_snake_case)]

use super::product::{product_into, Factor};
use crate::algebra::dense::generic;
use crate::algebra::*;
use rand::distributions::Distribution;
use rand::Rng;

/// Square diagonal matrix storing only its diagonal
#[derive(Debug, Clone, PartialEq)]
pub struct DiagonalMatrix<T = f64> {
    pub(crate) data: Vec<T>,
}

impl<T> DiagonalMatrix<T>
where
    T: FloatT,
{
    /// zero diagonal matrix of order `n`
    pub fn new(n: usize) -> Result<Self, MatrixError> {
        MatrixError::check_order(n)?;
        Ok(Self {
            data: vec![T::zero(); n],
        })
    }

    pub fn from_vec(diag: Vec<T>) -> Result<Self, MatrixError> {
        MatrixError::check_order(diag.len())?;
        Ok(Self { data: diag })
    }

    pub fn identity(n: usize) -> Result<Self, MatrixError> {
        MatrixError::check_order(n)?;
        Ok(Self {
            data: vec![T::one(); n],
        })
    }

    pub fn order(&self) -> usize {
        self.data.len()
    }

    pub fn diag(&self) -> &[T] {
        &self.data
    }

    pub fn diag_mut(&mut self) -> &mut [T] {
        &mut self.data
    }

    pub fn to_dense(&self) -> Matrix<T> {
        let mut out = Matrix::zeros((self.order(), self.order()));
        for (k, &d) in self.data.iter().enumerate() {
            out[(k, k)] = d;
        }
        out
    }

    /// Overwrite with a dense value, which must be diagonal
    pub fn assign_from_dense(&mut self, src: &Matrix<T>) -> Result<(), MatrixError> {
        if src.size() != self.size() {
            return Err(MatrixError::InvalidArgument("matrix dimensions must agree"));
        }
        let n = self.order();
        for col in 0..n {
            for row in (0..n).filter(|&row| row != col) {
                if src[(row, col)] != T::zero() {
                    return Err(MatrixError::InvalidOperation {
                        row,
                        col,
                        kind: StructureKind::Diagonal,
                    });
                }
            }
        }
        for (k, d) in self.data.iter_mut().enumerate() {
            *d = src[(k, k)];
        }
        Ok(())
    }

    fn map_into(
        &self,
        result: MatrixMut<'_, T>,
        f: impl Fn(T) -> T,
        fallback: impl FnOnce(MatrixRef<'_, T>, MatrixMut<'_, T>) -> Result<(), MatrixError>,
    ) -> Result<(), MatrixError> {
        match result {
            MatrixMut::Diagonal(C) if C.order() == self.order() => {
                C.data.scalarop_from(f, &self.data);
                Ok(())
            }
            C => fallback(self.as_operand(), C),
        }
    }

    fn combine_into(
        &self,
        other: MatrixRef<'_, T>,
        result: MatrixMut<'_, T>,
        op: impl Fn(T, T) -> T,
        fallback: generic::BinaryOp<T>,
    ) -> Result<(), MatrixError> {
        match (other, result) {
            (MatrixRef::Diagonal(B), MatrixMut::Diagonal(C))
                if B.order() == self.order() && C.order() == self.order() =>
            {
                C.data.binop_from(op, &self.data, &B.data);
                Ok(())
            }
            (B, C) => fallback(self.as_operand(), B, C),
        }
    }
}

impl<T> MatrixAccess<T> for DiagonalMatrix<T>
where
    T: FloatT,
{
    fn nrows(&self) -> usize {
        self.data.len()
    }
    fn ncols(&self) -> usize {
        self.data.len()
    }
    fn kind(&self) -> StructureKind {
        StructureKind::Diagonal
    }
    #[inline]
    fn at(&self, row: usize, col: usize) -> T {
        if row == col {
            self.data[row]
        } else {
            T::zero()
        }
    }
    #[inline]
    fn set_at(&mut self, row: usize, col: usize, value: T) -> Result<(), MatrixError> {
        if row == col {
            self.data[row] = value;
            Ok(())
        } else if value == T::zero() {
            Ok(())
        } else {
            Err(MatrixError::InvalidOperation {
                row,
                col,
                kind: StructureKind::Diagonal,
            })
        }
    }
}

impl<T> MatrixOps<T> for DiagonalMatrix<T>
where
    T: FloatT,
{
    fn as_operand(&self) -> MatrixRef<'_, T> {
        MatrixRef::Diagonal(self)
    }

    fn add_into<'a, 'b>(
        &self,
        other: impl Into<MatrixRef<'a, T>>,
        result: impl Into<MatrixMut<'b, T>>,
    ) -> Result<(), MatrixError> {
        self.combine_into(other.into(), result.into(), |x, y| x + y, generic::add)
    }

    fn subtract_into<'a, 'b>(
        &self,
        other: impl Into<MatrixRef<'a, T>>,
        result: impl Into<MatrixMut<'b, T>>,
    ) -> Result<(), MatrixError> {
        self.combine_into(other.into(), result.into(), |x, y| x - y, generic::subtract)
    }

    fn pointwise_multiply_into<'a, 'b>(
        &self,
        other: impl Into<MatrixRef<'a, T>>,
        result: impl Into<MatrixMut<'b, T>>,
    ) -> Result<(), MatrixError> {
        let other = other.into();
        let result: MatrixMut<'_, T> = result.into();
        match result {
            // zero off the diagonal whatever the other operand holds
            MatrixMut::Diagonal(C) if C.size() == self.size() && other.size() == self.size() => {
                for (k, c) in C.data.iter_mut().enumerate() {
                    *c = self.data[k] * other.at(k, k);
                }
                Ok(())
            }
            result => generic::pointwise_multiply(self.as_operand(), other, result),
        }
    }

    fn scale_into<'b>(&self, c: T, result: impl Into<MatrixMut<'b, T>>) -> Result<(), MatrixError> {
        self.map_into(result.into(), |x| c * x, |a, r| generic::scale(a, c, r))
    }

    fn negate_into<'b>(&self, result: impl Into<MatrixMut<'b, T>>) -> Result<(), MatrixError> {
        self.map_into(result.into(), |x| -x, generic::negate)
    }

    fn modulus_into<'b>(
        &self,
        divisor: T,
        result: impl Into<MatrixMut<'b, T>>,
    ) -> Result<(), MatrixError> {
        self.map_into(
            result.into(),
            |x| x.modulus(divisor),
            |a, r| generic::modulus(a, divisor, r),
        )
    }

    fn transpose_into<'b>(&self, result: impl Into<MatrixMut<'b, T>>) -> Result<(), MatrixError> {
        self.map_into(result.into(), |x| x, generic::transpose)
    }

    fn multiply_into<'a, 'b>(
        &self,
        other: impl Into<MatrixRef<'a, T>>,
        result: impl Into<MatrixMut<'b, T>>,
    ) -> Result<(), MatrixError> {
        product_into(
            Factor::new(self.as_operand(), false),
            Factor::new(other.into(), false),
            result.into(),
        )
    }

    fn transpose_and_multiply_into<'a, 'b>(
        &self,
        other: impl Into<MatrixRef<'a, T>>,
        result: impl Into<MatrixMut<'b, T>>,
    ) -> Result<(), MatrixError> {
        product_into(
            Factor::new(self.as_operand(), false),
            Factor::new(other.into(), true),
            result.into(),
        )
    }

    // Dᵀ = D
    fn transpose_this_and_multiply_into<'a, 'b>(
        &self,
        other: impl Into<MatrixRef<'a, T>>,
        result: impl Into<MatrixMut<'b, T>>,
    ) -> Result<(), MatrixError> {
        self.multiply_into(other, result)
    }

    fn multiply_vector_into(&self, x: &[T], y: &mut [T]) -> Result<(), MatrixError> {
        if x.len() != self.order() || y.len() != self.order() {
            return Err(MatrixError::InvalidArgument(
                "vector lengths must match the matrix dimensions",
            ));
        }
        y.binop_from(|d, x| d * x, &self.data, x);
        Ok(())
    }

    fn transpose_this_and_multiply_vector_into(
        &self,
        x: &[T],
        y: &mut [T],
    ) -> Result<(), MatrixError> {
        self.multiply_vector_into(x, y)
    }

    fn trace(&self) -> Result<T, MatrixError> {
        Ok(self.data.sum())
    }

    fn l1_norm(&self) -> T {
        self.data.norm_inf()
    }

    fn infinity_norm(&self) -> T {
        self.data.norm_inf()
    }

    fn frobenius_norm(&self) -> T {
        self.data.norm()
    }

    fn fill_random<D, R>(&mut self, dist: &D, rng: &mut R) -> Result<(), MatrixError>
    where
        D: Distribution<T>,
        R: Rng + ?Sized,
    {
        for v in self.data.iter_mut() {
            *v = dist.sample(rng);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_diagonal_access() {
        let mut D = DiagonalMatrix::<f64>::new(3).unwrap();
        D.set(1, 1, 2.).unwrap();
        assert_eq!(D.get(1, 1), Ok(2.));
        assert_eq!(D.get(0, 1), Ok(0.));
        assert!(D.set(0, 1, 0.).is_ok());
        assert!(matches!(
            D.set(0, 1, 1.),
            Err(MatrixError::InvalidOperation { .. })
        ));
        assert!(DiagonalMatrix::<f64>::from_vec(vec![]).is_err());
    }

    #[test]
    fn test_diagonal_ops() {
        let D = DiagonalMatrix::from_vec(vec![1., -2., 3.]).unwrap();
        let E = DiagonalMatrix::from_vec(vec![2., 2., 2.]).unwrap();

        let DE = D.multiply(&E).unwrap();
        assert_eq!(DE.kind(), StructureKind::Diagonal);
        assert_eq!(DE.to_dense(), Matrix::from(&[[2., 0., 0.], [0., -4., 0.], [0., 0., 6.]]));

        let sum = D.add(&E).unwrap();
        assert_eq!(sum.kind(), StructureKind::Diagonal);
        assert_eq!(sum.at(1, 1), 0.);

        let A = Matrix::from(&[[1., 2., 3.], [4., 5., 6.], [7., 8., 9.]]);
        let mut out = Matrix::zeros((3, 3));
        D.multiply_into(&A, &mut out).unwrap();
        assert_eq!(out, Matrix::from(&[[1., 2., 3.], [-8., -10., -12.], [21., 24., 27.]]));

        let mut diag = DiagonalMatrix::new(3).unwrap();
        D.pointwise_multiply_into(&A, &mut diag).unwrap();
        assert_eq!(diag.diag(), &[1., -10., 27.]);

        let mut y = [0.; 3];
        D.multiply_vector_into(&[1., 1., 1.], &mut y).unwrap();
        assert_eq!(y, [1., -2., 3.]);

        assert_eq!(D.trace(), Ok(2.));
        assert_eq!(D.l1_norm(), 3.);
        assert_eq!(D.infinity_norm(), 3.);

        // a dense value does not fit
        assert!(D.add_into(&A, &mut diag).is_err());
    }
}
