#![allow(non_snake_case)]

use super::product::{product_into, Factor};
use crate::algebra::dense::generic;
use crate::algebra::*;
use rand::distributions::Distribution;
use rand::Rng;

/// Upper or lower triangular matrix with packed storage.
///
/// Cells outside the stored triangle are structural zeros.  Reading them
/// gives zero, and writing anything other than zero to them fails with
/// [`MatrixError::InvalidOperation`].
#[derive(Debug, Clone, PartialEq)]
pub struct TriangularMatrix<T = f64> {
    pub(crate) store: PackedStore<T>,
}

impl<T> TriangularMatrix<T>
where
    T: FloatT,
{
    /// zero triangular matrix of order `n`
    pub fn new(n: usize, uplo: MatrixTriangle) -> Result<Self, MatrixError> {
        Ok(Self {
            store: PackedStore::new(n, uplo)?,
        })
    }

    pub fn upper(n: usize) -> Result<Self, MatrixError> {
        Self::new(n, MatrixTriangle::Triu)
    }

    pub fn lower(n: usize) -> Result<Self, MatrixError> {
        Self::new(n, MatrixTriangle::Tril)
    }

    /// Adopt a packed triangle of length `n*(n+1)/2`
    pub fn from_packed(n: usize, uplo: MatrixTriangle, data: Vec<T>) -> Result<Self, MatrixError> {
        Ok(Self {
            store: PackedStore::from_data(n, uplo, data)?,
        })
    }

    pub fn from_store(store: PackedStore<T>) -> Self {
        Self { store }
    }

    /// Pack the `uplo` triangle of a square dense matrix.  The other
    /// triangle must be zero.
    pub fn from_dense(A: &Matrix<T>, uplo: MatrixTriangle) -> Result<Self, MatrixError> {
        if !A.is_square() {
            return Err(MatrixError::InvalidArgument(
                "triangular matrices must be square",
            ));
        }
        let mut M = Self::new(A.nrows(), uplo)?;
        M.assign_from_dense(A)
            .map_err(|_| MatrixError::InvalidArgument("matrix has non-zeros outside the triangle"))?;
        Ok(M)
    }

    pub fn uplo(&self) -> MatrixTriangle {
        self.store.uplo()
    }

    pub fn order(&self) -> usize {
        self.store.order()
    }

    pub fn store(&self) -> &PackedStore<T> {
        &self.store
    }

    /// packed triangle
    pub fn data(&self) -> &[T] {
        self.store.data()
    }

    pub fn into_data(self) -> Vec<T> {
        self.store.into_data()
    }

    pub fn to_dense(&self) -> Matrix<T> {
        Matrix::from_fn(self.order(), self.order(), |row, col| self.at(row, col))
    }

    /// The transpose, stored as the opposite triangle
    pub fn transpose(&self) -> Self {
        Self {
            store: self.store.transposed(),
        }
    }

    /// True if every stored off-diagonal entry is zero
    pub fn is_diagonal(&self) -> bool {
        self.store
            .index()
            .cells()
            .filter(|(row, col)| row != col)
            .all(|(row, col)| self.store.at(row, col) == T::zero())
    }

    /// A triangular matrix is symmetric only when it is diagonal
    pub fn is_symmetric(&self) -> bool {
        self.is_diagonal()
    }

    pub fn scale_mut(&mut self, c: T) {
        self.store.scale_mut(c);
    }

    pub fn negate_mut(&mut self) {
        self.store.negate_mut();
    }

    /// Overwrite with a dense value, which must be zero outside the
    /// stored triangle
    pub fn assign_from_dense(&mut self, src: &Matrix<T>) -> Result<(), MatrixError> {
        if src.size() != self.size() {
            return Err(MatrixError::InvalidArgument("matrix dimensions must agree"));
        }
        let n = self.order();
        let uplo = self.uplo();
        for col in 0..n {
            for row in 0..n {
                if !uplo.contains(row, col) && src[(row, col)] != T::zero() {
                    return Err(MatrixError::InvalidOperation {
                        row,
                        col,
                        kind: self.kind(),
                    });
                }
            }
        }
        let index = *self.store.index();
        for (row, col) in index.cells() {
            self.store.set_at(row, col, src[(row, col)]);
        }
        Ok(())
    }

    // true if `other` stores the same triangle of the same order
    fn same_triangle(&self, other: &TriangularMatrix<T>) -> bool {
        other.store.index() == self.store.index()
    }

    // writes `f(row, col)` on the stored triangle of a dense result and
    // `g(row, col)` elsewhere
    fn split_into(
        &self,
        out: &mut Matrix<T>,
        f: impl Fn(usize, usize) -> T,
        g: impl Fn(usize, usize) -> T,
    ) {
        let uplo = self.uplo();
        for col in 0..self.order() {
            for row in 0..self.order() {
                out[(row, col)] = if uplo.contains(row, col) {
                    f(row, col)
                } else {
                    g(row, col)
                };
            }
        }
    }

    // elementwise `op(self, other)`.  A dense result only reads this
    // matrix on its own triangle and uses `op(0, other)` elsewhere.
    fn combine_into(
        &self,
        other: MatrixRef<'_, T>,
        result: MatrixMut<'_, T>,
        op: impl Fn(T, T) -> T,
        fallback: generic::BinaryOp<T>,
    ) -> Result<(), MatrixError> {
        let size = self.size();
        match (other, result) {
            (MatrixRef::Triangular(B), MatrixMut::Triangular(C))
                if self.same_triangle(B) && self.same_triangle(C) =>
            {
                C.store.data_mut().binop_from(op, self.data(), B.data());
                Ok(())
            }
            (MatrixRef::Diagonal(B), MatrixMut::Triangular(C))
                if B.size() == size && self.same_triangle(C) =>
            {
                let index = *C.store.index();
                for (row, col) in index.cells() {
                    C.store
                        .set_at(row, col, op(self.store.at(row, col), B.at(row, col)));
                }
                Ok(())
            }
            (B, MatrixMut::Dense(C)) if B.size() == size && C.size() == size => {
                self.split_into(
                    C,
                    |row, col| op(self.store.at(row, col), B.at(row, col)),
                    |row, col| op(T::zero(), B.at(row, col)),
                );
                Ok(())
            }
            (B, C) => fallback(self.as_operand(), B, C),
        }
    }

    // elementwise `f(self)`
    fn map_into(
        &self,
        result: MatrixMut<'_, T>,
        f: impl Fn(T) -> T,
        fallback: impl FnOnce(MatrixRef<'_, T>, MatrixMut<'_, T>) -> Result<(), MatrixError>,
    ) -> Result<(), MatrixError> {
        let size = self.size();
        match result {
            MatrixMut::Triangular(C) if self.same_triangle(C) => {
                C.store.data_mut().scalarop_from(f, self.data());
                Ok(())
            }
            MatrixMut::Dense(C) if C.size() == size => {
                let zero = f(T::zero());
                self.split_into(C, |row, col| f(self.store.at(row, col)), |_, _| zero);
                Ok(())
            }
            C => fallback(self.as_operand(), C),
        }
    }

    fn check_vectors(&self, x: &[T], y: &[T]) -> Result<(), MatrixError> {
        if x.len() != self.order() || y.len() != self.order() {
            return Err(MatrixError::InvalidArgument(
                "vector lengths must match the matrix dimensions",
            ));
        }
        Ok(())
    }
}

impl<T> MatrixAccess<T> for TriangularMatrix<T>
where
    T: FloatT,
{
    fn nrows(&self) -> usize {
        self.store.order()
    }
    fn ncols(&self) -> usize {
        self.store.order()
    }
    fn kind(&self) -> StructureKind {
        StructureKind::from_triangle(self.store.uplo())
    }
    #[inline]
    fn at(&self, row: usize, col: usize) -> T {
        self.store.at_or_zero(row, col)
    }
    #[inline]
    fn set_at(&mut self, row: usize, col: usize, value: T) -> Result<(), MatrixError> {
        if self.uplo().contains(row, col) {
            self.store.set_at(row, col, value);
            Ok(())
        } else if value == T::zero() {
            Ok(())
        } else {
            Err(MatrixError::InvalidOperation {
                row,
                col,
                kind: self.kind(),
            })
        }
    }
}

impl<T> MatrixOps<T> for TriangularMatrix<T>
where
    T: FloatT,
{
    fn as_operand(&self) -> MatrixRef<'_, T> {
        MatrixRef::Triangular(self)
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
            // zero outside the triangle whatever the other operand holds
            MatrixMut::Triangular(C) if self.same_triangle(C) && other.size() == self.size() => {
                let index = *C.store.index();
                for (row, col) in index.cells() {
                    C.store
                        .set_at(row, col, self.store.at(row, col) * other.at(row, col));
                }
                Ok(())
            }
            result => self.combine_into(other, result, |x, y| x * y, generic::pointwise_multiply),
        }
    }

    fn pointwise_divide_into<'a, 'b>(
        &self,
        other: impl Into<MatrixRef<'a, T>>,
        result: impl Into<MatrixMut<'b, T>>,
    ) -> Result<(), MatrixError> {
        self.combine_into(
            other.into(),
            result.into(),
            |x, y| x / y,
            generic::pointwise_divide,
        )
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
        let result: MatrixMut<'_, T> = result.into();
        match result {
            MatrixMut::Triangular(C) if C.store.index() == &self.store.index().transposed() => {
                for (row, col) in self.store.index().cells() {
                    C.store.set_at(col, row, self.store.at(row, col));
                }
                Ok(())
            }
            result => generic::transpose(self.as_operand(), result),
        }
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

    fn transpose_this_and_multiply_into<'a, 'b>(
        &self,
        other: impl Into<MatrixRef<'a, T>>,
        result: impl Into<MatrixMut<'b, T>>,
    ) -> Result<(), MatrixError> {
        product_into(
            Factor::new(self.as_operand(), true),
            Factor::new(other.into(), false),
            result.into(),
        )
    }

    fn multiply_vector_into(&self, x: &[T], y: &mut [T]) -> Result<(), MatrixError> {
        self.check_vectors(x, y)?;
        let (n, uplo) = (self.order(), self.uplo());
        for (row, yr) in y.iter_mut().enumerate() {
            *yr = uplo
                .cols_in_row(row, n)
                .fold(T::zero(), |acc, col| acc + self.store.at(row, col) * x[col]);
        }
        Ok(())
    }

    fn transpose_this_and_multiply_vector_into(
        &self,
        x: &[T],
        y: &mut [T],
    ) -> Result<(), MatrixError> {
        self.check_vectors(x, y)?;
        let (n, uplo) = (self.order(), self.uplo());
        for (col, yc) in y.iter_mut().enumerate() {
            *yc = uplo
                .rows_in_col(col, n)
                .fold(T::zero(), |acc, row| acc + self.store.at(row, col) * x[row]);
        }
        Ok(())
    }

    fn trace(&self) -> Result<T, MatrixError> {
        Ok((0..self.order()).fold(T::zero(), |acc, k| acc + self.store.at_diagonal(k)))
    }

    fn l1_norm(&self) -> T {
        let (n, uplo) = (self.order(), self.uplo());
        let sums: Vec<T> = (0..n)
            .map(|col| {
                uplo.rows_in_col(col, n)
                    .fold(T::zero(), |acc, row| acc + self.store.at(row, col).abs())
            })
            .collect();
        sums.norm_inf()
    }

    fn infinity_norm(&self) -> T {
        let (n, uplo) = (self.order(), self.uplo());
        let sums: Vec<T> = (0..n)
            .map(|row| {
                uplo.cols_in_row(row, n)
                    .fold(T::zero(), |acc, col| acc + self.store.at(row, col).abs())
            })
            .collect();
        sums.norm_inf()
    }

    fn frobenius_norm(&self) -> T {
        self.data().norm()
    }

    fn fill_random<D, R>(&mut self, dist: &D, rng: &mut R) -> Result<(), MatrixError>
    where
        D: Distribution<T>,
        R: Rng + ?Sized,
    {
        for v in self.store.data_mut() {
            *v = dist.sample(rng);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn lower() -> TriangularMatrix<f64> {
        TriangularMatrix::from_dense(
            &Matrix::from(&[[1., 0., 0.], [-2., 3., 0.], [4., -5., 6.]]),
            MatrixTriangle::Tril,
        )
        .unwrap()
    }

    fn upper() -> TriangularMatrix<f64> {
        TriangularMatrix::from_dense(
            &Matrix::from(&[[1., 2., 3.], [0., 4., 5.], [0., 0., 6.]]),
            MatrixTriangle::Triu,
        )
        .unwrap()
    }

    #[test]
    fn test_triangular_access() {
        let mut L = TriangularMatrix::<f64>::lower(3).unwrap();
        assert_eq!(L.kind(), StructureKind::TriangularLower);

        L.set(2, 0, 5.).unwrap();
        assert_eq!(L.get(2, 0), Ok(5.));
        assert_eq!(L.get(0, 2), Ok(0.));
        assert!(matches!(
            L.set(0, 1, 5.),
            Err(MatrixError::InvalidOperation {
                row: 0,
                col: 1,
                kind: StructureKind::TriangularLower
            })
        ));
        assert!(L.set(0, 1, 0.).is_ok());
        assert!(matches!(L.set(3, 0, 1.), Err(MatrixError::OutOfRange { .. })));

        let mut U = TriangularMatrix::<f64>::upper(3).unwrap();
        assert!(U.set(1, 0, 1.).is_err());
        U.set(0, 1, 1.).unwrap();
        assert_eq!(U.at(1, 0), 0.);
    }

    #[test]
    fn test_triangular_from_dense() {
        let A = Matrix::from(&[[1., 2.], [3., 4.]]);
        assert!(matches!(
            TriangularMatrix::from_dense(&A, MatrixTriangle::Triu),
            Err(MatrixError::InvalidArgument(_))
        ));
        assert!(TriangularMatrix::from_dense(&Matrix::<f64>::zeros((2, 3)), MatrixTriangle::Triu).is_err());

        let L = lower();
        assert_eq!(L.data(), &[1., -2., 4., 3., -5., 6.]);
        assert_eq!(L.to_dense()[(2, 1)], -5.);
    }

    #[test]
    fn test_triangular_symmetry_checks() {
        let L = lower();
        assert!(!L.is_symmetric());
        assert!(!L.is_diagonal());

        let D = TriangularMatrix::from_dense(&Matrix::<f64>::identity(3), MatrixTriangle::Tril)
            .unwrap();
        assert!(D.is_symmetric());
        assert!(D.is_diagonal());
    }

    #[test]
    fn test_triangular_transpose() {
        let L = lower();
        let Lt = L.transpose();
        assert_eq!(Lt.uplo(), MatrixTriangle::Triu);
        assert_eq!(Lt.at(1, 2), -5.);

        let mut out = TriangularMatrix::upper(3).unwrap();
        L.transpose_into(&mut out).unwrap();
        assert_eq!(out, Lt);

        let mut wrong = TriangularMatrix::lower(3).unwrap();
        assert!(L.transpose_into(&mut wrong).is_err());

        let allocated = L.transposed().unwrap();
        assert_eq!(allocated.kind(), StructureKind::TriangularUpper);
    }

    #[test]
    fn test_triangular_elementwise() {
        let L = lower();
        let U = upper();

        let mut out = TriangularMatrix::lower(3).unwrap();
        L.add_into(&L, &mut out).unwrap();
        assert_eq!(out.data(), &[2., -4., 8., 6., -10., 12.]);

        // other triangle into a dense result
        let mut dense = Matrix::zeros((3, 3));
        L.subtract_into(&U, &mut dense).unwrap();
        assert_eq!(
            dense,
            Matrix::from(&[[0., -2., -3.], [-2., -1., -5.], [4., -5., 0.]])
        );

        // and into a triangular result it does not fit
        assert!(matches!(
            L.add_into(&U, &mut out),
            Err(MatrixError::InvalidOperation { .. })
        ));

        L.pointwise_multiply_into(&U, &mut out).unwrap();
        assert_eq!(out.to_dense(), Matrix::from(&[[1., 0., 0.], [0., 12., 0.], [0., 0., 36.]]));

        let full = Matrix::from(&[[2., 2., 2.], [2., 2., 2.], [2., 2., 2.]]);
        L.pointwise_divide_into(&full, &mut dense).unwrap();
        assert_eq!(dense[(2, 0)], 2.);
        assert_eq!(dense[(0, 2)], 0.);

        L.scale_into(2., &mut out).unwrap();
        assert_eq!(out.at(2, 1), -10.);

        L.modulus_into(4., &mut out).unwrap();
        assert_eq!(out.data(), &[1., 2., 0., 3., 3., 2.]);

        L.negate_into(&mut dense).unwrap();
        assert_eq!(dense[(2, 2)], -6.);
        assert_eq!(dense[(0, 2)], 0.);
    }

    #[test]
    fn test_triangular_products() {
        let L = lower();
        let U = upper();
        let Ld = L.to_dense();
        let Ud = U.to_dense();

        for (a, b) in [(&L, &L), (&L, &U), (&U, &L), (&U, &U)] {
            let mut out = Matrix::zeros((3, 3));
            a.multiply_into(b, &mut out).unwrap();
            let mut expected = Matrix::zeros((3, 3));
            a.to_dense().multiply_into(&b.to_dense(), &mut expected).unwrap();
            assert_eq!(out, expected);

            a.transpose_and_multiply_into(b, &mut out).unwrap();
            a.to_dense()
                .transpose_and_multiply_into(&b.to_dense(), &mut expected)
                .unwrap();
            assert_eq!(out, expected);

            a.transpose_this_and_multiply_into(b, &mut out).unwrap();
            a.to_dense()
                .transpose_this_and_multiply_into(&b.to_dense(), &mut expected)
                .unwrap();
            assert_eq!(out, expected);
        }

        // structure preserving results
        let LL = L.multiply(&L).unwrap();
        assert_eq!(LL.kind(), StructureKind::TriangularLower);
        let mut expected = Matrix::zeros((3, 3));
        Ld.multiply_into(&Ld, &mut expected).unwrap();
        assert_eq!(LL.to_dense(), expected);

        let LU = L.multiply(&U).unwrap();
        assert_eq!(LU.kind(), StructureKind::Dense);

        // Uᵀ*L is lower times lower
        let mut out = TriangularMatrix::lower(3).unwrap();
        U.transpose_this_and_multiply_into(&L, &mut out).unwrap();
        Ud.transpose_this_and_multiply_into(&Ld, &mut expected).unwrap();
        assert_eq!(out.to_dense(), expected);
    }

    #[test]
    fn test_triangular_vector_products() {
        let L = lower();
        let x = [1., 1., 1.];
        let mut y = [0.; 3];
        L.multiply_vector_into(&x, &mut y).unwrap();
        assert_eq!(y, [1., 1., 5.]);

        L.transpose_this_and_multiply_vector_into(&x, &mut y).unwrap();
        assert_eq!(y, [3., -2., 6.]);

        assert!(L.multiply_vector_into(&x[0..2], &mut y).is_err());
    }

    #[test]
    fn test_triangular_norms() {
        for M in [lower(), upper()] {
            let Md = M.to_dense();
            assert_eq!(M.l1_norm(), Md.l1_norm());
            assert_eq!(M.infinity_norm(), Md.infinity_norm());
            assert!((M.frobenius_norm() - Md.frobenius_norm()).abs() < 1e-14);
            assert_eq!(M.trace(), Md.trace());
        }
        // column sums 7, 8, 6 and row sums 1, 5, 15
        assert_eq!(lower().l1_norm(), 8.);
        assert_eq!(lower().infinity_norm(), 15.);
    }

    #[test]
    fn test_triangular_fill_random() {
        let mut rng = StdRng::seed_from_u64(7);
        let dist = rand::distributions::Uniform::new(1.0, 2.0);
        let mut U = TriangularMatrix::<f64>::upper(4).unwrap();
        U.fill_random(&dist, &mut rng).unwrap();
        assert!(U.data().iter().all(|&v| v >= 1.0));
        assert_eq!(U.at(3, 0), 0.);
    }
}
