use std::ops::Range;

/// Matrix shape marker for triangular matrices and packed triangles
#[derive(PartialEq, Eq, Copy, Clone, Debug)]
pub enum MatrixTriangle {
    /// Upper triangle, i.e. cells with `row <= col`
    Triu,
    /// Lower triangle, i.e. cells with `row >= col`
    Tril,
}

impl MatrixTriangle {
    /// true if `(row, col)` lies in this triangle (diagonal included)
    #[inline]
    pub fn contains(&self, row: usize, col: usize) -> bool {
        match self {
            MatrixTriangle::Triu => row <= col,
            MatrixTriangle::Tril => row >= col,
        }
    }

    /// the opposite triangle
    #[inline]
    pub fn transpose(&self) -> Self {
        match self {
            MatrixTriangle::Triu => MatrixTriangle::Tril,
            MatrixTriangle::Tril => MatrixTriangle::Triu,
        }
    }

    /// Columns of `row` lying in this triangle of an `n x n` matrix
    #[inline]
    pub fn cols_in_row(&self, row: usize, n: usize) -> Range<usize> {
        match self {
            MatrixTriangle::Triu => row..n,
            MatrixTriangle::Tril => 0..(row + 1),
        }
    }

    /// Rows of `col` lying in this triangle of an `n x n` matrix
    #[inline]
    pub fn rows_in_col(&self, col: usize, n: usize) -> Range<usize> {
        match self {
            MatrixTriangle::Triu => 0..(col + 1),
            MatrixTriangle::Tril => col..n,
        }
    }
}

/// Declared structure of a matrix.
///
/// Every matrix type in this crate reports one of these, and the
/// structure-aware kernels dispatch on the kinds of their operands.
#[derive(PartialEq, Eq, Copy, Clone, Debug, Hash)]
pub enum StructureKind {
    /// General dense storage, no structure assumed
    Dense,
    /// Packed symmetric storage, one triangle stored
    Symmetric,
    /// Packed upper triangle, strictly lower part is structurally zero
    TriangularUpper,
    /// Packed lower triangle, strictly upper part is structurally zero
    TriangularLower,
    /// Diagonal only
    Diagonal,
}

impl std::fmt::Display for StructureKind {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        let name = match self {
            StructureKind::Dense => "dense",
            StructureKind::Symmetric => "symmetric",
            StructureKind::TriangularUpper => "upper triangular",
            StructureKind::TriangularLower => "lower triangular",
            StructureKind::Diagonal => "diagonal",
        };
        write!(f, "{}", name)
    }
}

// ---------------------------------------------------------------
// structure algebra.  Each function returns the tightest kind able
// to hold the result of an operation on operands of the given kinds.

impl StructureKind {
    pub fn from_triangle(uplo: MatrixTriangle) -> Self {
        match uplo {
            MatrixTriangle::Triu => StructureKind::TriangularUpper,
            MatrixTriangle::Tril => StructureKind::TriangularLower,
        }
    }

    /// true if every cell of a matrix of kind `self` can be held
    /// by a matrix of kind `other`
    pub fn fits_in(&self, other: StructureKind) -> bool {
        use StructureKind::*;
        match (self, other) {
            (_, Dense) => true,
            (Diagonal, _) => true,
            (a, b) => *a == b,
        }
    }

    /// kind of `A + B` and `A - B`
    pub fn for_sum(a: StructureKind, b: StructureKind) -> StructureKind {
        if a.fits_in(b) {
            b
        } else if b.fits_in(a) {
            a
        } else {
            StructureKind::Dense
        }
    }

    /// kind of the matrix product `A * B`
    pub fn for_product(a: StructureKind, b: StructureKind) -> StructureKind {
        use StructureKind::*;
        match (a, b) {
            (Diagonal, Diagonal) => Diagonal,
            (Diagonal, TriangularUpper) | (TriangularUpper, Diagonal) => TriangularUpper,
            (Diagonal, TriangularLower) | (TriangularLower, Diagonal) => TriangularLower,
            (TriangularUpper, TriangularUpper) => TriangularUpper,
            (TriangularLower, TriangularLower) => TriangularLower,
            // symmetric times anything is not symmetric in general
            _ => Dense,
        }
    }

    /// kind of the elementwise product `A .* B`
    pub fn for_pointwise_product(a: StructureKind, b: StructureKind) -> StructureKind {
        use StructureKind::*;
        match (a, b) {
            (Diagonal, _) | (_, Diagonal) => Diagonal,
            (TriangularUpper, TriangularLower) | (TriangularLower, TriangularUpper) => Diagonal,
            (TriangularUpper, _) | (_, TriangularUpper) => TriangularUpper,
            (TriangularLower, _) | (_, TriangularLower) => TriangularLower,
            (Symmetric, Symmetric) => Symmetric,
            _ => Dense,
        }
    }

    /// kind of `Aᵀ`
    pub fn for_transpose(a: StructureKind) -> StructureKind {
        use StructureKind::*;
        match a {
            TriangularUpper => TriangularLower,
            TriangularLower => TriangularUpper,
            other => other,
        }
    }

    /// kind of `A * Bᵀ`
    pub fn for_transpose_and_multiply(a: StructureKind, b: StructureKind) -> StructureKind {
        Self::for_product(a, Self::for_transpose(b))
    }

    /// kind of `Aᵀ * B`
    pub fn for_transpose_this_and_multiply(a: StructureKind, b: StructureKind) -> StructureKind {
        Self::for_product(Self::for_transpose(a), b)
    }
}
