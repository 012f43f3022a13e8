#![allow(non_snake_case)]

use crate::algebra::dense::generic;
use crate::algebra::*;
use rand::distributions::Distribution;
use rand::Rng;

/// Symmetric matrix with packed upper triangle storage.
///
/// Only the cells with `row <= col` are stored, column by column.  Reads
/// and writes of the lower triangle are mirrored into the upper one, so
/// the matrix is symmetric by construction.
///
/// ```text
/// [ 0  1  3  6 ]
/// [ .  2  4  7 ]
/// [ .  .  5  8 ]
/// [ .  .  .  9 ]
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct SymmetricMatrix<T = f64> {
    pub(crate) store: PackedStore<T>,
}

impl<T> SymmetricMatrix<T>
where
    T: FloatT,
{
    /// zero symmetric matrix of order `n`
    pub fn new(n: usize) -> Result<Self, MatrixError> {
        Ok(Self {
            store: PackedStore::new(n, MatrixTriangle::Triu)?,
        })
    }

    /// Adopt a packed upper triangle of length `n*(n+1)/2`
    pub fn from_packed(n: usize, data: Vec<T>) -> Result<Self, MatrixError> {
        Ok(Self {
            store: PackedStore::from_data(n, MatrixTriangle::Triu, data)?,
        })
    }

    /// Pack a square dense matrix, which must be symmetric
    pub fn from_dense(A: &Matrix<T>) -> Result<Self, MatrixError> {
        if !A.is_square() {
            return Err(MatrixError::InvalidArgument(
                "symmetric matrices must be square",
            ));
        }
        if !Self::check_if_symmetric(A) {
            return Err(MatrixError::InvalidArgument("matrix is not symmetric"));
        }
        let mut S = Self::new(A.nrows())?;
        let index = *S.store.index();
        for (row, col) in index.cells() {
            S.store.set_at(row, col, A[(row, col)]);
        }
        Ok(S)
    }

    /// True if `A` is square and `A[i,j] == A[j,i]` everywhere
    pub fn check_if_symmetric<M>(A: &M) -> bool
    where
        M: MatrixAccess<T>,
    {
        if !A.is_square() {
            return false;
        }
        let n = A.nrows();
        (0..n).all(|col| (0..col).all(|row| A.at(row, col) == A.at(col, row)))
    }

    pub fn order(&self) -> usize {
        self.store.order()
    }

    pub fn store(&self) -> &PackedStore<T> {
        &self.store
    }

    /// packed upper triangle
    pub fn data(&self) -> &[T] {
        self.store.data()
    }

    pub fn into_data(self) -> Vec<T> {
        self.store.into_data()
    }

    pub fn to_dense(&self) -> Matrix<T> {
        Matrix::from_fn(self.order(), self.order(), |row, col| self.at(row, col))
    }

    /// A symmetric matrix is its own transpose
    pub fn transpose(&self) -> &Self {
        self
    }

    pub fn is_positive_diagonal(&self) -> bool {
        (0..self.order()).all(|k| self.store.at_diagonal(k) > T::zero())
    }

    /// Returns `yᵀ * self * x`
    pub fn quad_form(&self, y: &[T], x: &[T]) -> T {
        assert_eq!(y.len(), self.order());
        assert_eq!(x.len(), self.order());

        let data = self.data();
        let mut out = T::zero();
        let mut k = 0;
        for col in 0..self.order() {
            let mut tmp1 = T::zero();
            let mut tmp2 = T::zero();
            for row in 0..col {
                let Hrc = data[k];
                tmp1 += Hrc * x[row];
                tmp2 += Hrc * y[row];
                k += 1;
            }
            out += tmp1 * y[col] + tmp2 * x[col] + data[k] * x[col] * y[col];
            k += 1;
        }
        out
    }

    pub fn scale_mut(&mut self, c: T) {
        self.store.scale_mut(c);
    }

    pub fn negate_mut(&mut self) {
        self.store.negate_mut();
    }

    /// Overwrite with a dense value, which must be symmetric
    pub fn assign_from_dense(&mut self, src: &Matrix<T>) -> Result<(), MatrixError> {
        if src.size() != self.size() {
            return Err(MatrixError::InvalidArgument("matrix dimensions must agree"));
        }
        let n = self.order();
        for col in 0..n {
            for row in (col + 1)..n {
                let (upper, lower) = (src[(col, row)], src[(row, col)]);
                if upper != lower && !(upper.is_nan() && lower.is_nan()) {
                    return Err(MatrixError::InvalidOperation {
                        row,
                        col,
                        kind: StructureKind::Symmetric,
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

    // sum of absolute values of each column
    fn col_abs_sums(&self) -> Vec<T> {
        let mut sums = vec![T::zero(); self.order()];
        let data = self.data();
        let mut k = 0;
        for col in 0..self.order() {
            for row in 0..col {
                let v = data[k].abs();
                sums[row] += v;
                sums[col] += v;
                k += 1;
            }
            sums[col] += data[k].abs();
            k += 1;
        }
        sums
    }

    // writes `f(row, col)` for the upper triangle into both triangles
    // of a dense result
    fn mirror_into(&self, out: &mut Matrix<T>, f: impl Fn(usize, usize) -> T) {
        for col in 0..self.order() {
            for row in 0..=col {
                let v = f(row, col);
                out[(row, col)] = v;
                out[(col, row)] = v;
            }
        }
    }

    // elementwise `op(self, other)`.  Packed loops whenever the other
    // operand is symmetric or diagonal and the result is symmetric or dense.
    fn combine_into(
        &self,
        other: MatrixRef<'_, T>,
        result: MatrixMut<'_, T>,
        op: impl Fn(T, T) -> T,
        fallback: generic::BinaryOp<T>,
    ) -> Result<(), MatrixError> {
        let size = self.size();
        let mirrored = matches!(
            other.kind(),
            StructureKind::Symmetric | StructureKind::Diagonal
        );

        match (other, result) {
            (MatrixRef::Symmetric(B), MatrixMut::Symmetric(C))
                if B.size() == size && C.size() == size =>
            {
                C.store.data_mut().binop_from(op, self.data(), B.data());
                Ok(())
            }
            (B, MatrixMut::Symmetric(C)) if mirrored && B.size() == size && C.size() == size => {
                let index = *C.store.index();
                for (row, col) in index.cells() {
                    C.store
                        .set_at(row, col, op(self.store.at(row, col), B.at(row, col)));
                }
                Ok(())
            }
            (B, MatrixMut::Dense(C)) if mirrored && B.size() == size && C.size() == size => {
                self.mirror_into(C, |row, col| op(self.store.at(row, col), B.at(row, col)));
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
            MatrixMut::Symmetric(C) if C.size() == size => {
                C.store.data_mut().scalarop_from(f, self.data());
                Ok(())
            }
            MatrixMut::Dense(C) if C.size() == size => {
                self.mirror_into(C, |row, col| f(self.store.at(row, col)));
                Ok(())
            }
            C => fallback(self.as_operand(), C),
        }
    }
}

impl<T> MatrixAccess<T> for SymmetricMatrix<T>
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
        StructureKind::Symmetric
    }
    #[inline]
    fn at(&self, row: usize, col: usize) -> T {
        self.store.at_mirrored(row, col)
    }
    #[inline]
    fn set_at(&mut self, row: usize, col: usize, value: T) -> Result<(), MatrixError> {
        self.store.set_mirrored(row, col, value);
        Ok(())
    }
}

impl<T> MatrixOps<T> for SymmetricMatrix<T>
where
    T: FloatT,
{
    fn as_operand(&self) -> MatrixRef<'_, T> {
        MatrixRef::Symmetric(self)
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
        self.combine_into(
            other.into(),
            result.into(),
            |x, y| x * y,
            generic::pointwise_multiply,
        )
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
        self.map_into(result.into(), |x| x, generic::transpose)
    }

    // Sᵀ = S
    fn transpose_this_and_multiply_into<'a, 'b>(
        &self,
        other: impl Into<MatrixRef<'a, T>>,
        result: impl Into<MatrixMut<'b, T>>,
    ) -> Result<(), MatrixError> {
        self.multiply_into(other, result)
    }

    fn multiply_vector_into(&self, x: &[T], y: &mut [T]) -> Result<(), MatrixError> {
        let n = self.order();
        if x.len() != n || y.len() != n {
            return Err(MatrixError::InvalidArgument(
                "vector lengths must match the matrix dimensions",
            ));
        }
        y.set(T::zero());
        let data = self.data();
        let mut k = 0;
        for col in 0..n {
            for row in 0..col {
                let Hrc = data[k];
                y[row] += Hrc * x[col];
                y[col] += Hrc * x[row];
                k += 1;
            }
            y[col] += data[k] * x[col];
            k += 1;
        }
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
        Ok((0..self.order()).fold(T::zero(), |acc, k| acc + self.store.at_diagonal(k)))
    }

    fn l1_norm(&self) -> T {
        self.col_abs_sums().norm_inf()
    }

    // row sums equal column sums
    fn infinity_norm(&self) -> T {
        self.l1_norm()
    }

    fn frobenius_norm(&self) -> T {
        // off diagonal terms appear twice
        let two: T = (2.).as_T();
        let mut sumsq = T::zero();
        let mut k = 0;
        for col in 0..self.order() {
            for _ in 0..col {
                sumsq += two * self.data()[k] * self.data()[k];
                k += 1;
            }
            sumsq += self.data()[k] * self.data()[k];
            k += 1;
        }
        sumsq.sqrt()
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

    fn test_matrix() -> SymmetricMatrix<f64> {
        SymmetricMatrix::from_dense(&Matrix::from(&[
            [4., -1., 2.],
            [-1., 5., 0.],
            [2., 0., -6.],
        ]))
        .unwrap()
    }

    #[test]
    fn test_symmetric_packing() {
        let S = test_matrix();
        assert_eq!(S.data(), &[4., -1., 5., 2., 0., -6.]);
        assert_eq!(S.at(2, 0), 2.);
        assert_eq!(S.at(0, 2), 2.);

        let mut S = S;
        S.set(2, 1, 7.).unwrap();
        assert_eq!(S.get(1, 2), Ok(7.));
        assert!(matches!(S.get(3, 0), Err(MatrixError::OutOfRange { .. })));

        assert!(SymmetricMatrix::<f64>::new(0).is_err());
        assert!(SymmetricMatrix::from_packed(3, vec![1.; 5]).is_err());
    }

    #[test]
    fn test_check_if_symmetric() {
        let A = Matrix::from(&[[1., 2.], [2., 1.]]);
        let B = Matrix::from(&[[1., 2.], [3., 1.]]);
        let C = Matrix::from(&[[1., 2., 3.], [2., 1., 3.]]);
        assert!(SymmetricMatrix::check_if_symmetric(&A));
        assert!(!SymmetricMatrix::check_if_symmetric(&B));
        assert!(!SymmetricMatrix::check_if_symmetric(&C));
        assert!(SymmetricMatrix::from_dense(&B).is_err());
        assert!(SymmetricMatrix::from_dense(&C).is_err());
    }

    #[test]
    fn test_symmetric_transpose_is_identity() {
        let S = test_matrix();
        assert!(std::ptr::eq(S.transpose(), &S));

        let St = S.transposed().unwrap();
        assert_eq!(St.kind(), StructureKind::Symmetric);
        assert_eq!(St.to_dense(), S.to_dense());
    }

    #[test]
    fn test_symmetric_elementwise() {
        let S = test_matrix();
        let D = DiagonalMatrix::from_vec(vec![1., 2., 3.]).unwrap();

        let mut out = SymmetricMatrix::new(3).unwrap();
        S.add_into(&S, &mut out).unwrap();
        assert_eq!(out.data(), &[8., -2., 10., 4., 0., -12.]);

        S.subtract_into(&D, &mut out).unwrap();
        assert_eq!(out.data(), &[3., -1., 3., 2., 0., -9.]);

        S.pointwise_multiply_into(&S, &mut out).unwrap();
        assert_eq!(out.data(), &[16., 1., 25., 4., 0., 36.]);

        S.scale_into(0.5, &mut out).unwrap();
        assert_eq!(out.at(2, 2), -3.);

        S.modulus_into(3., &mut out).unwrap();
        assert_eq!(out.data(), &[1., 2., 2., 2., 0., 0.]);

        let mut dense = Matrix::zeros((3, 3));
        S.negate_into(&mut dense).unwrap();
        assert_eq!(dense, Matrix::from(&[[-4., 1., -2.], [1., -5., 0.], [-2., 0., 6.]]));
    }

    #[test]
    fn test_symmetric_with_dense_operand() {
        let S = test_matrix();
        let A = Matrix::from(&[[1., 1., 1.], [0., 0., 0.], [0., 0., 0.]]);

        let mut dense = Matrix::zeros((3, 3));
        S.add_into(&A, &mut dense).unwrap();
        assert_eq!(dense[(0, 1)], 0.);
        assert_eq!(dense[(1, 0)], -1.);

        // not symmetric
        let mut out = SymmetricMatrix::new(3).unwrap();
        assert!(matches!(
            S.add_into(&A, &mut out),
            Err(MatrixError::InvalidOperation { .. })
        ));

        let sum = S.add(&A).unwrap();
        assert_eq!(sum.kind(), StructureKind::Dense);
    }

    #[test]
    fn test_symmetric_products() {
        let S = test_matrix();
        let x = [1., 2., 3.];
        let mut y = [0.; 3];
        S.multiply_vector_into(&x, &mut y).unwrap();
        assert_eq!(y, [8., 9., -16.]);

        let mut z = [0.; 3];
        S.transpose_this_and_multiply_vector_into(&x, &mut z).unwrap();
        assert_eq!(y, z);

        assert_eq!(S.quad_form(&x, &x), x.dot(&y));

        // S*S has a symmetric value but a dense kind
        let SS = S.multiply(&S).unwrap();
        assert_eq!(SS.kind(), StructureKind::Dense);
        let Sd = S.to_dense();
        let mut expected = Matrix::zeros((3, 3));
        Sd.multiply_into(&Sd, &mut expected).unwrap();
        assert_eq!(SS.to_dense(), expected);

        let mut StS = Matrix::zeros((3, 3));
        S.transpose_this_and_multiply_into(&S, &mut StS).unwrap();
        assert_eq!(StS, expected);
    }

    #[test]
    fn test_symmetric_norms() {
        let S = test_matrix();
        let Sd = S.to_dense();
        assert_eq!(S.trace(), Ok(3.));
        assert_eq!(S.l1_norm(), 8.);
        assert_eq!(S.infinity_norm(), 8.);
        assert_eq!(S.l1_norm(), Sd.l1_norm());
        assert!((S.frobenius_norm() - Sd.frobenius_norm()).abs() < 1e-14);
        assert!(!S.is_positive_diagonal());
    }

    #[test]
    fn test_symmetric_fill_random() {
        let mut rng = StdRng::seed_from_u64(42);
        let dist = rand::distributions::Uniform::new(-1.0, 1.0);
        let mut S = SymmetricMatrix::<f64>::new(5).unwrap();
        S.fill_random(&dist, &mut rng).unwrap();

        assert!(S.data().iter().all(|v| (-1.0..1.0).contains(v)));
        assert!(SymmetricMatrix::check_if_symmetric(&S));
    }
}
