#![allow(non_snake_case)]

// Matrix products with at least one structured factor.
//
// Each factor reports, for every row and column, the range of inner
// indices on which it may be non-zero.  The product loop only sums
// over the intersection of the two ranges, so a triangular or diagonal
// factor skips its structural zeros whatever the other factor is.

use crate::algebra::dense::generic::assign_with;
use crate::algebra::*;
use std::ops::Range;

/// One factor of a product, optionally transposed
#[derive(Debug, Clone, Copy)]
pub(crate) enum Factor<'a, T>
where
    T: FloatT,
{
    Triangle {
        store: &'a PackedStore<T>,
        transposed: bool,
    },
    Diagonal(&'a [T]),
    General {
        op: MatrixRef<'a, T>,
        transposed: bool,
    },
}

impl<'a, T> Factor<'a, T>
where
    T: FloatT,
{
    pub(crate) fn new(op: MatrixRef<'a, T>, transposed: bool) -> Self {
        match op {
            MatrixRef::Triangular(t) => Factor::Triangle {
                store: &t.store,
                transposed,
            },
            MatrixRef::Diagonal(d) => Factor::Diagonal(&d.data),
            op => Factor::General { op, transposed },
        }
    }

    fn nrows(&self) -> usize {
        match self {
            Factor::Triangle { store, .. } => store.order(),
            Factor::Diagonal(d) => d.len(),
            Factor::General { op, transposed } => {
                if *transposed {
                    op.ncols()
                } else {
                    op.nrows()
                }
            }
        }
    }

    fn ncols(&self) -> usize {
        match self {
            Factor::General { op, transposed } => {
                if *transposed {
                    op.nrows()
                } else {
                    op.ncols()
                }
            }
            _ => self.nrows(),
        }
    }

    // the triangle holding the non-zeros after transposition
    fn triangle(store: &PackedStore<T>, transposed: bool) -> MatrixTriangle {
        if transposed {
            store.uplo().transpose()
        } else {
            store.uplo()
        }
    }

    fn kind(&self) -> StructureKind {
        match self {
            Factor::Triangle { store, transposed } => {
                StructureKind::from_triangle(Self::triangle(store, *transposed))
            }
            Factor::Diagonal(_) => StructureKind::Diagonal,
            Factor::General { op, transposed } => {
                if *transposed {
                    StructureKind::for_transpose(op.kind())
                } else {
                    op.kind()
                }
            }
        }
    }

    /// columns of `row` which may hold a non-zero
    fn row_span(&self, row: usize) -> Range<usize> {
        match self {
            Factor::Triangle { store, transposed } => {
                Self::triangle(store, *transposed).cols_in_row(row, store.order())
            }
            Factor::Diagonal(_) => row..(row + 1),
            Factor::General { .. } => 0..self.ncols(),
        }
    }

    /// rows of `col` which may hold a non-zero
    fn col_span(&self, col: usize) -> Range<usize> {
        match self {
            Factor::Triangle { store, transposed } => {
                Self::triangle(store, *transposed).rows_in_col(col, store.order())
            }
            Factor::Diagonal(_) => col..(col + 1),
            Factor::General { .. } => 0..self.nrows(),
        }
    }

    #[inline]
    fn at(&self, row: usize, col: usize) -> T {
        match self {
            Factor::Triangle { store, transposed } => {
                if *transposed {
                    store.at_or_zero(col, row)
                } else {
                    store.at_or_zero(row, col)
                }
            }
            Factor::Diagonal(d) => {
                if row == col {
                    d[row]
                } else {
                    T::zero()
                }
            }
            Factor::General { op, transposed } => {
                if *transposed {
                    op.at(col, row)
                } else {
                    op.at(row, col)
                }
            }
        }
    }
}

/// `result = a * b`, summing only where both factors may be non-zero.
///
/// A triangular or diagonal result able to hold the product is
/// written on its stored cells only.  Any other result goes through
/// the validating dense assignment.
pub(crate) fn product_into<T>(
    a: Factor<'_, T>,
    b: Factor<'_, T>,
    result: MatrixMut<'_, T>,
) -> Result<(), MatrixError>
where
    T: FloatT,
{
    if a.ncols() != b.nrows() {
        return Err(MatrixError::InvalidArgument(
            "inner dimensions of the product must agree",
        ));
    }
    let (m, n) = (a.nrows(), b.ncols());
    if result.size() != (m, n) {
        return Err(MatrixError::InvalidArgument(
            "result dimensions do not match the operation",
        ));
    }

    let kind = StructureKind::for_product(a.kind(), b.kind());
    let cell = |row: usize, col: usize| {
        let ra = a.row_span(row);
        let cb = b.col_span(col);
        (ra.start.max(cb.start)..ra.end.min(cb.end))
            .fold(T::zero(), |acc, k| acc + a.at(row, k) * b.at(k, col))
    };

    match result {
        MatrixMut::Triangular(out) if kind.fits_in(out.kind()) => {
            let index = *out.store.index();
            for (row, col) in index.cells() {
                out.store.set_at(row, col, cell(row, col));
            }
            Ok(())
        }
        MatrixMut::Diagonal(out) if kind == StructureKind::Diagonal => {
            for (k, d) in out.data.iter_mut().enumerate() {
                *d = cell(k, k);
            }
            Ok(())
        }
        result => assign_with(result, m, n, cell),
    }
}
