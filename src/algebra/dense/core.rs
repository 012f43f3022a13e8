#![allow(non_snake_case)]

use crate::algebra::*;
use std::ops::{Index, IndexMut};

/// Dense matrix in column major format.
///
/// This is the general matrix type against which the structured
/// types are specialized.  Its arithmetic is entirely the generic
/// default of [`MatrixOps`].
#[derive(Debug, Clone, PartialEq)]
pub struct Matrix<T = f64> {
    /// number of rows
    pub m: usize,
    /// number of columns
    pub n: usize,
    /// vector of data in column major format
    pub data: Vec<T>,
}

impl<T> Matrix<T>
where
    T: FloatT,
{
    pub fn zeros(size: (usize, usize)) -> Self {
        let (m, n) = size;
        let data = vec![T::zero(); m * n];
        Self { m, n, data }
    }

    pub fn identity(n: usize) -> Self {
        let mut mat = Matrix::zeros((n, n));
        for i in 0..n {
            mat[(i, i)] = T::one();
        }
        mat
    }

    /// Matrix with entries `f(row, col)`, filled column by column
    pub fn from_fn(m: usize, n: usize, f: impl Fn(usize, usize) -> T) -> Self {
        let mut data = Vec::with_capacity(m * n);
        for col in 0..n {
            for row in 0..m {
                data.push(f(row, col));
            }
        }
        Self { m, n, data }
    }

    /// Matrix from column major data
    ///
    /// # Panics
    /// Panics if `src.len() != m*n`
    pub fn new_from_slice(size: (usize, usize), src: &[T]) -> Self {
        let (m, n) = size;
        assert!(m * n == src.len());
        Self {
            m,
            n,
            data: src.to_vec(),
        }
    }

    pub fn data(&self) -> &[T] {
        &self.data
    }

    pub fn data_mut(&mut self) -> &mut [T] {
        &mut self.data
    }

    #[inline]
    pub(crate) fn index_linear(&self, idx: (usize, usize)) -> usize {
        idx.0 + self.m * idx.1
    }

    pub fn col_slice(&self, col: usize) -> &[T] {
        assert!(col < self.n);
        &self.data[(col * self.m)..(col + 1) * self.m]
    }

    /// Copy of `src` into `self`.  Dimensions must agree.
    pub fn assign_from_dense(&mut self, src: &Matrix<T>) -> Result<(), MatrixError> {
        if self.size() != src.size() {
            return Err(MatrixError::InvalidArgument("matrix dimensions must agree"));
        }
        self.data.copy_from(&src.data);
        Ok(())
    }
}

impl<T> MatrixAccess<T> for Matrix<T>
where
    T: FloatT,
{
    fn nrows(&self) -> usize {
        self.m
    }
    fn ncols(&self) -> usize {
        self.n
    }
    fn kind(&self) -> StructureKind {
        StructureKind::Dense
    }
    #[inline]
    fn at(&self, row: usize, col: usize) -> T {
        self.data[self.index_linear((row, col))]
    }
    #[inline]
    fn set_at(&mut self, row: usize, col: usize, value: T) -> Result<(), MatrixError> {
        let k = self.index_linear((row, col));
        self.data[k] = value;
        Ok(())
    }
}

impl<T> MatrixOps<T> for Matrix<T>
where
    T: FloatT,
{
    fn as_operand(&self) -> MatrixRef<'_, T> {
        MatrixRef::Dense(self)
    }
}

impl<T> Index<(usize, usize)> for Matrix<T>
where
    T: FloatT,
{
    type Output = T;
    fn index(&self, idx: (usize, usize)) -> &Self::Output {
        &self.data[self.index_linear(idx)]
    }
}

impl<T> IndexMut<(usize, usize)> for Matrix<T>
where
    T: FloatT,
{
    fn index_mut(&mut self, idx: (usize, usize)) -> &mut Self::Output {
        let lidx = self.index_linear(idx);
        &mut self.data[lidx]
    }
}

// row major array literals, i.e. Matrix::from(&[[1., 2.], [3., 4.]])
// has first row [1, 2]
impl<const M: usize, const N: usize, T> From<&[[T; N]; M]> for Matrix<T>
where
    T: FloatT,
{
    fn from(rows: &[[T; N]; M]) -> Self {
        Matrix::from_fn(M, N, |row, col| rows[row][col])
    }
}

impl<T> std::fmt::Display for Matrix<T>
where
    T: FloatT,
{
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        writeln!(f)?;
        for i in 0..self.m {
            write!(f, "[ ")?;
            for j in 0..self.n {
                write!(f, " {:?}", self[(i, j)])?;
            }
            writeln!(f, "]")?;
        }
        writeln!(f)?;
        Ok(())
    }
}
