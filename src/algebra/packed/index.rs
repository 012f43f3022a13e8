use crate::algebra::*;

/// Capability shared by packed and skyline layouts: locate the
/// storage position of a logical matrix entry.
pub trait IndexScheme {
    /// order of the square matrix served by the scheme
    fn order(&self) -> usize;

    /// length of the backing storage
    fn storage_len(&self) -> usize;

    /// storage position of `(row, col)`, or `None` if the cell
    /// is a structural zero.  Indices must be in range.
    fn locate(&self, row: usize, col: usize) -> Option<usize>;
}

// The single verified closed form.  Column packed upper triangle,
// column `c` contributes `c+1` consecutive entries.
#[inline]
fn upper_index(row: usize, col: usize) -> usize {
    row + triangular_number(col)
}

/// Position of `(row, col)` within a packed triangle of an
/// `n x n` matrix.  Caller guarantees that `uplo.contains(row, col)`.
///
/// The lower form is the upper form reflected through the
/// anti-diagonal, i.e. `(r, c) -> (n-1-r, n-1-c)`, with the packing
/// order reversed.  This gives the column packed lower triangle where
/// column `c` contributes `n-c` entries.
#[inline]
pub(crate) fn triangle_index(row: usize, col: usize, n: usize, uplo: MatrixTriangle) -> usize {
    match uplo {
        MatrixTriangle::Triu => upper_index(row, col),
        MatrixTriangle::Tril => {
            triangular_number(n) - 1 - upper_index(n - 1 - row, n - 1 - col)
        }
    }
}

/// Position of the `k`-th diagonal entry within a packed triangle
#[inline]
pub(crate) fn triangle_diagonal_index(k: usize, n: usize, uplo: MatrixTriangle) -> usize {
    match uplo {
        MatrixTriangle::Triu => triangular_index(k),
        MatrixTriangle::Tril => triangular_number(n) - 1 - triangular_index(n - 1 - k),
    }
}

/// Index scheme for one packed triangle of a square matrix.
///
/// The upper scheme stores cells with `row <= col` and the lower
/// scheme cells with `row >= col`, both column major:
///
/// ```text
/// Triu, n = 3         Tril, n = 3
/// [ 0  1  3 ]         [ 0  .  . ]
/// [ .  2  4 ]         [ 1  3  . ]
/// [ .  .  5 ]         [ 2  4  5 ]
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PackedIndex {
    order: usize,
    uplo: MatrixTriangle,
}

impl PackedIndex {
    pub fn new(order: usize, uplo: MatrixTriangle) -> Result<Self, MatrixError> {
        MatrixError::check_order(order)?;
        Ok(Self { order, uplo })
    }

    pub fn upper(order: usize) -> Result<Self, MatrixError> {
        Self::new(order, MatrixTriangle::Triu)
    }

    pub fn lower(order: usize) -> Result<Self, MatrixError> {
        Self::new(order, MatrixTriangle::Tril)
    }

    pub fn order(&self) -> usize {
        self.order
    }

    pub fn uplo(&self) -> MatrixTriangle {
        self.uplo
    }

    /// number of packed entries, i.e. `n(n+1)/2`
    pub fn len(&self) -> usize {
        triangular_number(self.order)
    }

    /// Unchecked position of `(row, col)`.  The cell must lie in
    /// range and within the scheme's triangle.
    #[inline]
    pub fn index_of(&self, row: usize, col: usize) -> usize {
        debug_assert!(self.uplo.contains(row, col));
        triangle_index(row, col, self.order, self.uplo)
    }

    /// Unchecked position of the diagonal entry `(k, k)`
    #[inline]
    pub fn index_of_diagonal(&self, k: usize) -> usize {
        triangle_diagonal_index(k, self.order, self.uplo)
    }

    /// Checked version of [`index_of`](PackedIndex::index_of)
    pub fn index_of_checked(&self, row: usize, col: usize) -> Result<usize, MatrixError> {
        MatrixError::check_range(row, col, self.order, self.order)?;
        if !self.uplo.contains(row, col) {
            return Err(MatrixError::InvalidArgument(
                "position lies outside the packed triangle",
            ));
        }
        Ok(self.index_of(row, col))
    }

    /// Position of the upper triangle cell `(row, col)`, `row <= col`.
    /// A lower scheme serves it from the mirrored cell `(col, row)`.
    #[inline]
    pub fn index_of_upper(&self, row: usize, col: usize) -> usize {
        match self.uplo {
            MatrixTriangle::Triu => self.index_of(row, col),
            MatrixTriangle::Tril => self.index_of(col, row),
        }
    }

    /// Position of the lower triangle cell `(row, col)`, `row >= col`.
    /// An upper scheme serves it from the mirrored cell `(col, row)`.
    #[inline]
    pub fn index_of_lower(&self, row: usize, col: usize) -> usize {
        match self.uplo {
            MatrixTriangle::Triu => self.index_of(col, row),
            MatrixTriangle::Tril => self.index_of(row, col),
        }
    }

    /// Position of any cell, normalizing it into the stored triangle
    /// first.  Used for symmetric storage.
    #[inline]
    pub fn index_of_mirrored(&self, row: usize, col: usize) -> usize {
        let (r, c) = if self.uplo.contains(row, col) {
            (row, col)
        } else {
            (col, row)
        };
        triangle_index(r, c, self.order, self.uplo)
    }

    /// the same order with the opposite triangle
    pub(crate) fn transposed(&self) -> Self {
        Self {
            order: self.order,
            uplo: self.uplo.transpose(),
        }
    }

    /// Iterator over the `(row, col)` cells of the triangle
    /// in packing order
    pub fn cells(&self) -> impl Iterator<Item = (usize, usize)> {
        let n = self.order;
        let uplo = self.uplo;
        (0..n).flat_map(move |col| uplo.rows_in_col(col, n).map(move |row| (row, col)))
    }
}

impl IndexScheme for PackedIndex {
    fn order(&self) -> usize {
        self.order
    }
    fn storage_len(&self) -> usize {
        self.len()
    }
    fn locate(&self, row: usize, col: usize) -> Option<usize> {
        if self.uplo.contains(row, col) {
            Some(self.index_of(row, col))
        } else {
            None
        }
    }
}
