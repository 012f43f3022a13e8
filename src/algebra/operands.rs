use crate::algebra::*;
use enum_dispatch::enum_dispatch;

/// Borrowed matrix operand, tagged with its structure.
///
/// Structure-aware kernels `match` on the operand variant to pick a
/// specialized loop and send everything else to the generic dense path.
#[derive(Debug, Clone, Copy)]
pub enum MatrixRef<'a, T>
where
    T: FloatT,
{
    Dense(&'a Matrix<T>),
    Symmetric(&'a SymmetricMatrix<T>),
    Triangular(&'a TriangularMatrix<T>),
    Diagonal(&'a DiagonalMatrix<T>),
}

/// Mutably borrowed result buffer, tagged with its structure.
#[derive(Debug)]
pub enum MatrixMut<'a, T>
where
    T: FloatT,
{
    Dense(&'a mut Matrix<T>),
    Symmetric(&'a mut SymmetricMatrix<T>),
    Triangular(&'a mut TriangularMatrix<T>),
    Diagonal(&'a mut DiagonalMatrix<T>),
}

/// Owned matrix of any supported structure.  Returned by the
/// allocating arithmetic methods, whose result kind is only known
/// at run time.
#[enum_dispatch(MatrixAccess<T>)]
#[derive(Debug, Clone, PartialEq)]
pub enum AnyMatrix<T>
where
    T: FloatT,
{
    Dense(Matrix<T>),
    Symmetric(SymmetricMatrix<T>),
    Triangular(TriangularMatrix<T>),
    Diagonal(DiagonalMatrix<T>),
}

// ---------------------------------------------------------------
// MatrixAccess on the borrowed forms

macro_rules! dispatch_ref {
    ($self:expr, $m:ident => $body:expr) => {
        match $self {
            MatrixRef::Dense($m) => $body,
            MatrixRef::Symmetric($m) => $body,
            MatrixRef::Triangular($m) => $body,
            MatrixRef::Diagonal($m) => $body,
        }
    };
}

macro_rules! dispatch_mut {
    ($self:expr, $m:ident => $body:expr) => {
        match $self {
            MatrixMut::Dense($m) => $body,
            MatrixMut::Symmetric($m) => $body,
            MatrixMut::Triangular($m) => $body,
            MatrixMut::Diagonal($m) => $body,
        }
    };
}

impl<T> MatrixAccess<T> for MatrixRef<'_, T>
where
    T: FloatT,
{
    fn nrows(&self) -> usize {
        dispatch_ref!(self, m => m.nrows())
    }
    fn ncols(&self) -> usize {
        dispatch_ref!(self, m => m.ncols())
    }
    fn kind(&self) -> StructureKind {
        dispatch_ref!(self, m => m.kind())
    }
    #[inline]
    fn at(&self, row: usize, col: usize) -> T {
        dispatch_ref!(self, m => m.at(row, col))
    }
    fn set_at(&mut self, row: usize, col: usize, _value: T) -> Result<(), MatrixError> {
        // operands are read only
        Err(MatrixError::InvalidOperation {
            row,
            col,
            kind: self.kind(),
        })
    }
}

impl<T> MatrixAccess<T> for MatrixMut<'_, T>
where
    T: FloatT,
{
    fn nrows(&self) -> usize {
        dispatch_mut!(self, m => m.nrows())
    }
    fn ncols(&self) -> usize {
        dispatch_mut!(self, m => m.ncols())
    }
    fn kind(&self) -> StructureKind {
        dispatch_mut!(self, m => m.kind())
    }
    #[inline]
    fn at(&self, row: usize, col: usize) -> T {
        dispatch_mut!(self, m => m.at(row, col))
    }
    #[inline]
    fn set_at(&mut self, row: usize, col: usize, value: T) -> Result<(), MatrixError> {
        dispatch_mut!(self, m => m.set_at(row, col, value))
    }
}

impl<T> MatrixMut<'_, T>
where
    T: FloatT,
{
    /// Overwrite the result with a dense value, verifying that the
    /// result's structure can hold it.
    pub fn assign_dense(&mut self, src: &Matrix<T>) -> Result<(), MatrixError> {
        dispatch_mut!(self, m => m.assign_from_dense(src))
    }
}

// ---------------------------------------------------------------
// conversions

macro_rules! impl_operand_from {
    ($ty:ident, $variant:ident) => {
        impl<'a, T> From<&'a $ty<T>> for MatrixRef<'a, T>
        where
            T: FloatT,
        {
            fn from(m: &'a $ty<T>) -> Self {
                MatrixRef::$variant(m)
            }
        }

        impl<'a, T> From<&'a mut $ty<T>> for MatrixMut<'a, T>
        where
            T: FloatT,
        {
            fn from(m: &'a mut $ty<T>) -> Self {
                MatrixMut::$variant(m)
            }
        }
    };
}
impl_operand_from!(Matrix, Dense);
impl_operand_from!(SymmetricMatrix, Symmetric);
impl_operand_from!(TriangularMatrix, Triangular);
impl_operand_from!(DiagonalMatrix, Diagonal);

impl<'a, T> From<&'a AnyMatrix<T>> for MatrixRef<'a, T>
where
    T: FloatT,
{
    fn from(m: &'a AnyMatrix<T>) -> Self {
        m.view()
    }
}

impl<'a, T> From<&'a mut AnyMatrix<T>> for MatrixMut<'a, T>
where
    T: FloatT,
{
    fn from(m: &'a mut AnyMatrix<T>) -> Self {
        m.view_mut()
    }
}

// ---------------------------------------------------------------
// AnyMatrix

impl<T> AnyMatrix<T>
where
    T: FloatT,
{
    /// zero matrix of the given kind.  Structured kinds must be square.
    pub fn zeros(kind: StructureKind, nrows: usize, ncols: usize) -> Result<Self, MatrixError> {
        if kind != StructureKind::Dense && nrows != ncols {
            return Err(MatrixError::InvalidArgument(
                "structured matrices must be square",
            ));
        }
        let out = match kind {
            StructureKind::Dense => AnyMatrix::Dense(Matrix::zeros((nrows, ncols))),
            StructureKind::Symmetric => AnyMatrix::Symmetric(SymmetricMatrix::new(nrows)?),
            StructureKind::TriangularUpper => AnyMatrix::Triangular(TriangularMatrix::upper(nrows)?),
            StructureKind::TriangularLower => AnyMatrix::Triangular(TriangularMatrix::lower(nrows)?),
            StructureKind::Diagonal => AnyMatrix::Diagonal(DiagonalMatrix::new(nrows)?),
        };
        Ok(out)
    }

    pub fn view(&self) -> MatrixRef<'_, T> {
        match self {
            AnyMatrix::Dense(m) => MatrixRef::Dense(m),
            AnyMatrix::Symmetric(m) => MatrixRef::Symmetric(m),
            AnyMatrix::Triangular(m) => MatrixRef::Triangular(m),
            AnyMatrix::Diagonal(m) => MatrixRef::Diagonal(m),
        }
    }

    pub fn view_mut(&mut self) -> MatrixMut<'_, T> {
        match self {
            AnyMatrix::Dense(m) => MatrixMut::Dense(m),
            AnyMatrix::Symmetric(m) => MatrixMut::Symmetric(m),
            AnyMatrix::Triangular(m) => MatrixMut::Triangular(m),
            AnyMatrix::Diagonal(m) => MatrixMut::Diagonal(m),
        }
    }

    /// dense copy of the logical value
    pub fn to_dense(&self) -> Matrix<T> {
        self.view().to_dense()
    }
}

impl<T> MatrixRef<'_, T>
where
    T: FloatT,
{
    /// dense copy of the logical value
    pub fn to_dense(&self) -> Matrix<T> {
        Matrix::from_fn(self.nrows(), self.ncols(), |row, col| self.at(row, col))
    }
}
