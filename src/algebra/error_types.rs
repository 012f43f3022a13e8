use crate::algebra::StructureKind;
use thiserror::Error;

/// Error type returned by matrix construction, checked access and arithmetic.
///
/// All errors are contract violations raised at the point of detection.
/// None of them is transient, so nothing is ever retried.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MatrixError {
    /// Bad constructor input or incompatible operand dimensions
    #[error("Invalid argument: {0}")]
    InvalidArgument(&'static str),

    /// Checked access outside of the matrix
    #[error("Index ({row}, {col}) is out of range for a {nrows} x {ncols} matrix")]
    OutOfRange {
        row: usize,
        col: usize,
        nrows: usize,
        ncols: usize,
    },

    /// Write into a position that has no storage
    #[error("Position ({row}, {col}) has no storage in a {kind} matrix")]
    InvalidOperation {
        row: usize,
        col: usize,
        kind: StructureKind,
    },
}

impl MatrixError {
    pub(crate) fn check_range(
        row: usize,
        col: usize,
        nrows: usize,
        ncols: usize,
    ) -> Result<(), MatrixError> {
        if row >= nrows || col >= ncols {
            Err(MatrixError::OutOfRange {
                row,
                col,
                nrows,
                ncols,
            })
        } else {
            Ok(())
        }
    }

    pub(crate) fn check_order(order: usize) -> Result<(), MatrixError> {
        if order == 0 {
            Err(MatrixError::InvalidArgument("matrix order must be positive"))
        } else {
            Ok(())
        }
    }
}

#[test]
fn test_error_messages() {
    let err = MatrixError::OutOfRange {
        row: 3,
        col: 1,
        nrows: 2,
        ncols: 2,
    };
    assert_eq!(
        err.to_string(),
        "Index (3, 1) is out of range for a 2 x 2 matrix"
    );

    let err = MatrixError::InvalidOperation {
        row: 0,
        col: 1,
        kind: StructureKind::TriangularLower,
    };
    assert_eq!(
        err.to_string(),
        "Position (0, 1) has no storage in a lower triangular matrix"
    );

    assert!(MatrixError::check_order(0).is_err());
    assert!(MatrixError::check_order(1).is_ok());
    assert!(MatrixError::check_range(1, 1, 2, 2).is_ok());
}
