//! __packedmat__ provides compact storage for square matrices with
//! structural symmetry, together with arithmetic kernels that work on
//! the compact storage directly.
//!
//! A symmetric or triangular matrix of order `n` has `n*(n+1)/2`
//! independent values.  These are stored as one packed triangle:
//!
//! * [`PackedIndex`](algebra::PackedIndex) maps `(row, col)` to a
//!   position in the packed buffer, for the upper or lower triangle.
//! * [`PackedStore`](algebra::PackedStore) owns (or borrows) the buffer
//!   and provides checked and unchecked element access.
//! * [`SkylineStorage`](algebra::SkylineStorage) stores a symmetric
//!   matrix by columns of variable height.
//! * [`SymmetricMatrix`](algebra::SymmetricMatrix),
//!   [`TriangularMatrix`](algebra::TriangularMatrix) and
//!   [`DiagonalMatrix`](algebra::DiagonalMatrix) implement the full
//!   arithmetic surface of [`MatrixOps`](algebra::MatrixOps), with
//!   specialized loops when the operand structures match and the
//!   general dense algorithm otherwise.
//!
//! ```
//! use packedmat::algebra::*;
//!
//! let L = TriangularMatrix::from_dense(
//!     &Matrix::from(&[[2., 0.], [1., 3.]]),
//!     MatrixTriangle::Tril,
//! ).unwrap();
//! let U = TriangularMatrix::from_dense(
//!     &Matrix::from(&[[1., 4.], [0., 5.]]),
//!     MatrixTriangle::Triu,
//! ).unwrap();
//!
//! let LU = L.multiply(&U).unwrap();
//! assert_eq!(LU.to_dense(), Matrix::from(&[[2., 8.], [1., 19.]]));
//! ```
//!
//! # License
//!
//! Licensed under Apache License, Version 2.0.

#![allow(non_snake_case)]

pub mod algebra;
