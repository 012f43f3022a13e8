use crate::algebra::*;
use std::marker::PhantomData;

/// One packed triangle of a square matrix backed by a flat buffer.
///
/// The buffer type `S` is either an owned `Vec<T>` ([`PackedStore`]) or
/// a borrowed `&mut [T]` ([`BorrowedPackedStore`]).  Both forms adopt the
/// caller's buffer without copying: the owned form takes it by move,
/// and the borrowed form writes straight through to the caller's
/// memory for as long as the borrow lives.
#[derive(Debug, Clone, PartialEq)]
pub struct PackedStorage<S, T>
where
    S: AsRef<[T]>,
{
    index: PackedIndex,
    data: S,
    phantom: PhantomData<T>,
}

pub type PackedStore<T> = PackedStorage<Vec<T>, T>;
pub type BorrowedPackedStore<'a, T> = PackedStorage<&'a mut [T], T>;

impl<S, T> PackedStorage<S, T>
where
    S: AsRef<[T]>,
    T: FloatT,
{
    /// Adopt `data` as packed storage for `uplo` of an `order x order`
    /// matrix.  The buffer length must equal `order*(order+1)/2`.
    pub fn from_data(order: usize, uplo: MatrixTriangle, data: S) -> Result<Self, MatrixError> {
        let index = PackedIndex::new(order, uplo)?;
        if data.as_ref().len() != index.len() {
            return Err(MatrixError::InvalidArgument(
                "packed buffer length must equal order*(order+1)/2",
            ));
        }
        Ok(Self {
            index,
            data,
            phantom: PhantomData,
        })
    }

    pub fn index(&self) -> &PackedIndex {
        &self.index
    }

    pub fn order(&self) -> usize {
        self.index.order()
    }

    pub fn uplo(&self) -> MatrixTriangle {
        self.index.uplo()
    }

    pub fn data(&self) -> &[T] {
        self.data.as_ref()
    }

    fn kind(&self) -> StructureKind {
        StructureKind::from_triangle(self.uplo())
    }

    /// Checked read of a cell within the stored triangle
    pub fn get(&self, row: usize, col: usize) -> Result<T, MatrixError> {
        let k = self.index.index_of_checked(row, col)?;
        Ok(self.data()[k])
    }

    /// Checked read of any cell, mirroring across the diagonal
    /// when the cell lies in the unstored triangle
    pub fn get_mirrored(&self, row: usize, col: usize) -> Result<T, MatrixError> {
        MatrixError::check_range(row, col, self.order(), self.order())?;
        Ok(self.at_mirrored(row, col))
    }

    /// Unchecked read of a cell within the stored triangle
    #[inline]
    pub fn at(&self, row: usize, col: usize) -> T {
        self.data()[self.index.index_of(row, col)]
    }

    /// Unchecked read of any cell, mirrored into the stored triangle
    #[inline]
    pub fn at_mirrored(&self, row: usize, col: usize) -> T {
        self.data()[self.index.index_of_mirrored(row, col)]
    }

    /// Unchecked read of the diagonal entry `(k, k)`
    #[inline]
    pub fn at_diagonal(&self, k: usize) -> T {
        self.data()[self.index.index_of_diagonal(k)]
    }

    /// Unchecked read of the upper triangle cell `(row, col)`, `row <= col`.
    /// A lower store reports off-diagonal cells as structural zeros.
    #[inline]
    pub fn at_upper(&self, row: usize, col: usize) -> T {
        match self.uplo() {
            MatrixTriangle::Triu => self.at(row, col),
            MatrixTriangle::Tril if row == col => self.at_diagonal(row),
            MatrixTriangle::Tril => T::zero(),
        }
    }

    /// Unchecked read of the lower triangle cell `(row, col)`, `row >= col`.
    /// An upper store reports off-diagonal cells as structural zeros.
    #[inline]
    pub fn at_lower(&self, row: usize, col: usize) -> T {
        match self.uplo() {
            MatrixTriangle::Tril => self.at(row, col),
            MatrixTriangle::Triu if row == col => self.at_diagonal(row),
            MatrixTriangle::Triu => T::zero(),
        }
    }

    /// Unchecked read of any cell, with zeros outside the stored triangle
    #[inline]
    pub fn at_or_zero(&self, row: usize, col: usize) -> T {
        if self.uplo().contains(row, col) {
            self.at(row, col)
        } else {
            T::zero()
        }
    }
}

impl<S, T> PackedStorage<S, T>
where
    S: AsRef<[T]> + AsMut<[T]>,
    T: FloatT,
{
    pub fn data_mut(&mut self) -> &mut [T] {
        self.data.as_mut()
    }

    /// Checked write of a cell within the stored triangle
    pub fn set(&mut self, row: usize, col: usize, value: T) -> Result<(), MatrixError> {
        MatrixError::check_range(row, col, self.order(), self.order())?;
        if !self.uplo().contains(row, col) {
            return Err(MatrixError::InvalidOperation {
                row,
                col,
                kind: self.kind(),
            });
        }
        self.set_at(row, col, value);
        Ok(())
    }

    /// Unchecked write of a cell within the stored triangle
    #[inline]
    pub fn set_at(&mut self, row: usize, col: usize, value: T) {
        let k = self.index.index_of(row, col);
        self.data_mut()[k] = value;
    }

    /// Unchecked write of any cell, mirrored into the stored triangle
    #[inline]
    pub fn set_mirrored(&mut self, row: usize, col: usize, value: T) {
        let k = self.index.index_of_mirrored(row, col);
        self.data_mut()[k] = value;
    }

    /// Unchecked write of the diagonal entry `(k, k)`
    #[inline]
    pub fn set_diagonal(&mut self, k: usize, value: T) {
        let idx = self.index.index_of_diagonal(k);
        self.data_mut()[idx] = value;
    }

    /// Unchecked write of the upper triangle cell `(row, col)`, `row <= col`.
    /// Fails for off-diagonal cells of a lower store.
    pub fn set_upper(&mut self, row: usize, col: usize, value: T) -> Result<(), MatrixError> {
        match self.uplo() {
            MatrixTriangle::Triu => self.set_at(row, col, value),
            MatrixTriangle::Tril if row == col => self.set_diagonal(row, value),
            MatrixTriangle::Tril => {
                return Err(MatrixError::InvalidOperation {
                    row,
                    col,
                    kind: self.kind(),
                })
            }
        }
        Ok(())
    }

    /// Unchecked write of the lower triangle cell `(row, col)`, `row >= col`.
    /// Fails for off-diagonal cells of an upper store.
    pub fn set_lower(&mut self, row: usize, col: usize, value: T) -> Result<(), MatrixError> {
        match self.uplo() {
            MatrixTriangle::Tril => self.set_at(row, col, value),
            MatrixTriangle::Triu if row == col => self.set_diagonal(row, value),
            MatrixTriangle::Triu => {
                return Err(MatrixError::InvalidOperation {
                    row,
                    col,
                    kind: self.kind(),
                })
            }
        }
        Ok(())
    }

    /// In-place elementwise scaling of the packed values
    pub fn scale_mut(&mut self, c: T) {
        self.data_mut().scale(c);
    }

    /// In-place negation of the packed values
    pub fn negate_mut(&mut self) {
        self.data_mut().negate();
    }
}

impl<T> PackedStore<T>
where
    T: FloatT,
{
    /// zero-filled packed storage
    pub fn new(order: usize, uplo: MatrixTriangle) -> Result<Self, MatrixError> {
        MatrixError::check_order(order)?;
        Self::from_data(order, uplo, vec![T::zero(); triangular_number(order)])
    }

    /// Release the packed buffer
    pub fn into_data(self) -> Vec<T> {
        self.data
    }

    /// Same values, reinterpreted as the mirror triangle.  Cell `(r, c)`
    /// of `self` becomes cell `(c, r)` of the result.
    pub fn transposed(&self) -> PackedStore<T> {
        let index = self.index.transposed();
        let mut out = PackedStorage {
            index,
            data: vec![T::zero(); index.len()],
            phantom: PhantomData,
        };
        for (row, col) in self.index.cells() {
            out.set_at(col, row, self.at(row, col));
        }
        out
    }
}

impl<'a, T> BorrowedPackedStore<'a, T>
where
    T: FloatT,
{
    /// Wrap a caller-owned packed buffer without copying.  Writes
    /// through the store are visible in `data` once the borrow ends.
    pub fn from_slice_mut(
        order: usize,
        uplo: MatrixTriangle,
        data: &'a mut [T],
    ) -> Result<Self, MatrixError> {
        Self::from_data(order, uplo, data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_construction() {
        assert!(PackedStore::<f64>::new(0, MatrixTriangle::Triu).is_err());
        let store = PackedStore::<f64>::new(4, MatrixTriangle::Tril).unwrap();
        assert_eq!(store.data().len(), 10);
        assert!(PackedStore::from_data(3, MatrixTriangle::Triu, vec![0.0; 5]).is_err());
    }

    #[test]
    fn test_store_checked_access() {
        let mut store = PackedStore::<f64>::new(3, MatrixTriangle::Triu).unwrap();
        store.set(0, 2, 7.0).unwrap();
        assert_eq!(store.get(0, 2), Ok(7.0));
        assert_eq!(store.data()[3], 7.0);

        assert!(matches!(
            store.set(2, 0, 1.0),
            Err(MatrixError::InvalidOperation { .. })
        ));
        assert!(matches!(store.get(2, 0), Err(MatrixError::InvalidArgument(_))));
        assert!(matches!(store.get(0, 3), Err(MatrixError::OutOfRange { .. })));
        assert_eq!(store.get_mirrored(2, 0), Ok(7.0));
    }

    #[test]
    fn test_store_opposite_triangle_accessors() {
        let mut upper = PackedStore::<f64>::new(3, MatrixTriangle::Triu).unwrap();
        upper.set_at(0, 1, 2.0);
        upper.set_diagonal(1, 5.0);

        // structural zeros below the diagonal
        assert_eq!(upper.at_lower(1, 0), 0.0);
        assert_eq!(upper.at_lower(1, 1), 5.0);
        assert_eq!(upper.at_upper(0, 1), 2.0);
        assert!(upper.set_lower(1, 0, 3.0).is_err());
        upper.set_lower(2, 2, 9.0).unwrap();
        assert_eq!(upper.at_diagonal(2), 9.0);

        let mut lower = PackedStore::<f64>::new(3, MatrixTriangle::Tril).unwrap();
        lower.set_at(2, 0, 4.0);
        assert_eq!(lower.at_upper(0, 2), 0.0);
        assert_eq!(lower.at_lower(2, 0), 4.0);
        assert_eq!(lower.at_mirrored(0, 2), 4.0);
        assert!(lower.set_upper(0, 2, 1.0).is_err());
        lower.set_upper(0, 0, 1.0).unwrap();
        assert_eq!(lower.at(0, 0), 1.0);
        assert_eq!(lower.at_or_zero(0, 2), 0.0);
    }

    #[test]
    fn test_borrowed_store_aliases_caller_buffer() {
        let mut buf = vec![0.0; 6];
        {
            let mut store = BorrowedPackedStore::from_slice_mut(3, MatrixTriangle::Tril, &mut buf)
                .unwrap();
            store.set_at(2, 1, 8.0);
            store.scale_mut(2.0);
        }
        assert_eq!(buf[4], 16.0);
    }

    #[test]
    fn test_owned_store_adopts_vec() {
        let data = vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0];
        let ptr = data.as_ptr();
        let store = PackedStore::from_data(3, MatrixTriangle::Triu, data).unwrap();
        assert_eq!(store.data().as_ptr(), ptr);
        assert_eq!(store.at(1, 2), 5.0);
    }

    #[test]
    fn test_store_transposed() {
        let store = PackedStore::from_data(3, MatrixTriangle::Triu, vec![1., 2., 3., 4., 5., 6.])
            .unwrap();
        let t = store.transposed();
        assert_eq!(t.uplo(), MatrixTriangle::Tril);
        for (row, col) in store.index().cells() {
            assert_eq!(store.at(row, col), t.at(col, row));
        }
    }
}
