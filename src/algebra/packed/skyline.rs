#![allow(non_snake_case)]

use crate::algebra::*;
use derive_builder::Builder;

/// Envelope selection for [`SkylineStorage`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SkylineEnvelope {
    /// Store each column from its first non-zero entry down to the diagonal
    #[default]
    Detect,
    /// Store the whole upper triangle, i.e. no compression
    WholeTriangle,
}

/// Settings for skyline construction from a dense matrix
#[derive(Builder, Debug, Clone, PartialEq)]
#[builder(build_fn(validate = "Self::validate"))]
pub struct SkylineSettings {
    ///envelope selection
    #[builder(default = "SkylineEnvelope::Detect")]
    pub envelope: SkylineEnvelope,

    ///reject non-symmetric input.  When false the strictly lower
    ///triangle of the input is ignored
    #[builder(default = "true")]
    pub require_symmetric: bool,

    ///entries with magnitude at or below this value are treated as
    ///zero when detecting the envelope
    #[builder(default = "0.0")]
    pub zero_tolerance: f64,
}

impl Default for SkylineSettings {
    fn default() -> SkylineSettings {
        SkylineSettingsBuilder::default().build().unwrap()
    }
}

impl SkylineSettings {
    pub fn validate(&self) -> Result<(), MatrixError> {
        validate_zero_tolerance(self.zero_tolerance)
    }
}

// pre build checker (for auto-validation when using the builder)

impl From<MatrixError> for SkylineSettingsBuilderError {
    fn from(e: MatrixError) -> Self {
        SkylineSettingsBuilderError::ValidationError(e.to_string())
    }
}

impl SkylineSettingsBuilder {
    pub fn validate(&self) -> Result<(), MatrixError> {
        if let Some(tol) = self.zero_tolerance {
            validate_zero_tolerance(tol)?;
        }
        Ok(())
    }
}

fn validate_zero_tolerance(tol: f64) -> Result<(), MatrixError> {
    if tol.is_finite() && tol >= 0.0 {
        Ok(())
    } else {
        Err(MatrixError::InvalidArgument(
            "zero_tolerance must be finite and non-negative",
        ))
    }
}

/// Skyline (envelope) storage of a symmetric matrix.
///
/// Each column `c` stores a contiguous run of rows ending at the
/// diagonal, starting at the first row holding a non-zero.  The run is
/// packed diagonal first, moving up the column, so that
///
/// ```text
/// index(r, c) = column_start[c] + c - r
/// ```
///
/// for every row `r` inside the envelope of column `c`.  Cells above
/// the envelope are structural zeros.  Cells below the diagonal are
/// read from their mirror image.
#[derive(Debug, Clone, PartialEq)]
pub struct SkylineStorage<T> {
    order: usize,
    /// column offsets into `data`, length `order + 1`
    column_start: Vec<usize>,
    data: Vec<T>,
}

impl<T> SkylineStorage<T>
where
    T: FloatT,
{
    /// Build skyline storage from the upper triangle of a square
    /// dense matrix.
    pub fn from_dense(A: &Matrix<T>, settings: &SkylineSettings) -> Result<Self, MatrixError> {
        settings.validate()?;
        if !A.is_square() {
            return Err(MatrixError::InvalidArgument(
                "skyline storage requires a square matrix",
            ));
        }
        let n = A.nrows();
        MatrixError::check_order(n)?;

        if settings.require_symmetric && !SymmetricMatrix::check_if_symmetric(A) {
            return Err(MatrixError::InvalidArgument(
                "skyline storage requires a symmetric matrix",
            ));
        }

        let tol: T = settings.zero_tolerance.as_T();
        let first_rows: Vec<usize> = (0..n)
            .map(|col| match settings.envelope {
                SkylineEnvelope::WholeTriangle => 0,
                SkylineEnvelope::Detect => (0..col)
                    .find(|&row| A[(row, col)].abs() > tol)
                    .unwrap_or(col),
            })
            .collect();

        let mut column_start = Vec::with_capacity(n + 1);
        column_start.push(0);
        for (col, &first) in first_rows.iter().enumerate() {
            let height = col + 1 - first;
            column_start.push(column_start[col] + height);
        }

        let mut data = Vec::with_capacity(column_start[n]);
        for (col, &first) in first_rows.iter().enumerate() {
            data.extend((first..=col).rev().map(|row| A[(row, col)]));
        }

        log::debug!(
            "skyline storage of order {}: {} of {} upper triangle entries stored",
            n,
            data.len(),
            triangular_number(n)
        );

        Ok(Self {
            order: n,
            column_start,
            data,
        })
    }

    pub fn order(&self) -> usize {
        self.order
    }

    pub fn data(&self) -> &[T] {
        &self.data
    }

    pub fn column_start(&self) -> &[usize] {
        &self.column_start
    }

    /// number of stored values
    pub fn envelope_len(&self) -> usize {
        self.data.len()
    }

    /// number of stored values in column `col`, diagonal included
    pub fn column_height(&self, col: usize) -> usize {
        self.column_start[col + 1] - self.column_start[col]
    }

    /// Storage position of `(row, col)`, mirrored into the upper
    /// triangle.  `None` if the cell lies outside the envelope.
    #[inline]
    pub fn index_of(&self, row: usize, col: usize) -> Option<usize> {
        let (r, c) = if row <= col { (row, col) } else { (col, row) };
        if c - r < self.column_height(c) {
            Some(self.column_start[c] + c - r)
        } else {
            None
        }
    }

    /// Unchecked read, zero outside the envelope
    #[inline]
    pub fn at(&self, row: usize, col: usize) -> T {
        self.index_of(row, col)
            .map_or(T::zero(), |k| self.data[k])
    }

    /// Checked read, zero outside the envelope
    pub fn get(&self, row: usize, col: usize) -> Result<T, MatrixError> {
        MatrixError::check_range(row, col, self.order, self.order)?;
        Ok(self.at(row, col))
    }

    /// Unchecked write.  Writing a non-zero outside the envelope fails.
    pub fn set_at(&mut self, row: usize, col: usize, value: T) -> Result<(), MatrixError> {
        match self.index_of(row, col) {
            Some(k) => {
                self.data[k] = value;
                Ok(())
            }
            None if value == T::zero() => Ok(()),
            None => Err(MatrixError::InvalidOperation {
                row,
                col,
                kind: StructureKind::Symmetric,
            }),
        }
    }

    /// Checked write.  Writing a non-zero outside the envelope fails.
    pub fn set(&mut self, row: usize, col: usize, value: T) -> Result<(), MatrixError> {
        MatrixError::check_range(row, col, self.order, self.order)?;
        self.set_at(row, col, value)
    }

    /// Dense symmetric expansion, zero outside the envelope
    pub fn to_dense(&self) -> Matrix<T> {
        Matrix::from_fn(self.order, self.order, |row, col| self.at(row, col))
    }
}

impl<T> IndexScheme for SkylineStorage<T>
where
    T: FloatT,
{
    fn order(&self) -> usize {
        self.order
    }
    fn storage_len(&self) -> usize {
        self.data.len()
    }
    fn locate(&self, row: usize, col: usize) -> Option<usize> {
        self.index_of(row, col)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn banded() -> Matrix<f64> {
        Matrix::from(&[
            [4., 1., 0., 0.],
            [1., 5., 2., 0.],
            [0., 2., 6., 3.],
            [0., 0., 3., 7.],
        ])
    }

    #[test]
    fn test_skyline_envelope_detection() {
        let A = banded();
        let S = SkylineStorage::from_dense(&A, &SkylineSettings::default()).unwrap();

        assert_eq!(S.column_start(), &[0, 1, 3, 5, 7]);
        assert_eq!(S.data(), &[4., 5., 1., 6., 2., 7., 3.]);
        assert_eq!(S.envelope_len(), 7);
        assert_eq!(S.column_height(0), 1);
        assert_eq!(S.column_height(3), 2);

        assert_eq!(S.index_of(1, 1), Some(1));
        assert_eq!(S.index_of(0, 1), Some(2));
        assert_eq!(S.index_of(1, 0), Some(2));
        assert_eq!(S.index_of(0, 2), None);
        assert_eq!(S.locate(2, 3), Some(6));
        assert_eq!(S.storage_len(), 7);
    }

    #[test]
    fn test_skyline_round_trip() {
        let A = banded();
        let S = SkylineStorage::from_dense(&A, &SkylineSettings::default()).unwrap();
        assert_eq!(S.to_dense(), A);

        let settings = SkylineSettingsBuilder::default()
            .envelope(SkylineEnvelope::WholeTriangle)
            .build()
            .unwrap();
        let W = SkylineStorage::from_dense(&A, &settings).unwrap();
        assert_eq!(W.envelope_len(), 10);
        assert_eq!(W.index_of(0, 3), Some(9));
        assert_eq!(W.to_dense(), A);
    }

    #[test]
    fn test_skyline_interior_zero_kept() {
        // the zero at (1,2) lies inside the envelope of column 2
        let A = Matrix::from(&[[1., 0., 2.], [0., 1., 0.], [2., 0., 1.]]);
        let S = SkylineStorage::from_dense(&A, &SkylineSettings::default()).unwrap();
        assert_eq!(S.column_height(1), 1);
        assert_eq!(S.column_height(2), 3);
        assert_eq!(S.index_of(1, 2), Some(3));
        assert_eq!(S.to_dense(), A);
    }

    #[test]
    fn test_skyline_bad_input() {
        let settings = SkylineSettings::default();

        let R = Matrix::<f64>::zeros((2, 3));
        assert!(matches!(
            SkylineStorage::from_dense(&R, &settings),
            Err(MatrixError::InvalidArgument(_))
        ));

        let N = Matrix::from(&[[1., 2.], [3., 4.]]);
        assert!(SkylineStorage::from_dense(&N, &settings).is_err());

        // lower triangle ignored on request
        let settings = SkylineSettingsBuilder::default()
            .require_symmetric(false)
            .build()
            .unwrap();
        let S = SkylineStorage::from_dense(&N, &settings).unwrap();
        assert_eq!(S.at(1, 0), 2.);
    }

    #[test]
    fn test_skyline_writes() {
        let mut S = SkylineStorage::from_dense(&banded(), &SkylineSettings::default()).unwrap();
        S.set(2, 1, -2.).unwrap();
        assert_eq!(S.get(1, 2), Ok(-2.));

        // outside the envelope
        assert!(S.set(0, 3, 0.).is_ok());
        assert!(matches!(
            S.set(0, 3, 1.),
            Err(MatrixError::InvalidOperation { .. })
        ));
        assert!(matches!(
            S.set(4, 0, 1.),
            Err(MatrixError::OutOfRange { .. })
        ));
    }

    #[test]
    fn test_skyline_settings() {
        let settings = SkylineSettings::default();
        assert_eq!(settings.envelope, SkylineEnvelope::Detect);
        assert!(settings.require_symmetric);

        assert!(SkylineSettingsBuilder::default()
            .zero_tolerance(-1.0)
            .build()
            .is_err());

        // small entries dropped from the envelope
        let A = Matrix::from(&[[1., 1e-12], [1e-12, 1.]]);
        let settings = SkylineSettingsBuilder::default()
            .zero_tolerance(1e-10)
            .build()
            .unwrap();
        let S = SkylineStorage::from_dense(&A, &settings).unwrap();
        assert_eq!(S.envelope_len(), 2);
        assert_eq!(S.at(0, 1), 0.);
    }
}
