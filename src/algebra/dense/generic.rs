#![allow(non_snake_case)]

// General dense algorithms over unchecked element access.
//
// These are the default implementations of every `MatrixOps` method,
// and the path every structured kernel falls back to when its operands
// do not have a matching structure.  Nothing here assumes anything
// about the kinds of the operands beyond their dimensions.

use crate::algebra::*;

/// Signature shared by the binary elementwise fallbacks
pub(crate) type BinaryOp<T> =
    fn(MatrixRef<'_, T>, MatrixRef<'_, T>, MatrixMut<'_, T>) -> Result<(), MatrixError>;

fn log_fallback(op: &str, a: StructureKind, b: Option<StructureKind>) {
    match b {
        Some(b) => log::trace!("{op}: generic dense path for {a} and {b} operands"),
        None => log::trace!("{op}: generic dense path for {a} operand"),
    }
}

fn check_same_size<A, B, T>(a: &A, b: &B) -> Result<(), MatrixError>
where
    A: MatrixAccess<T>,
    B: MatrixAccess<T>,
    T: FloatT,
{
    if a.size() != b.size() {
        return Err(MatrixError::InvalidArgument("matrix dimensions must agree"));
    }
    Ok(())
}

/// Write `f(row, col)` into every cell of `result`.
///
/// A dense result is written in place.  Any other result is written
/// through a dense temporary which the result then validates against
/// its own structure.
pub(crate) fn assign_with<T>(
    result: MatrixMut<'_, T>,
    nrows: usize,
    ncols: usize,
    f: impl Fn(usize, usize) -> T,
) -> Result<(), MatrixError>
where
    T: FloatT,
{
    if result.size() != (nrows, ncols) {
        return Err(MatrixError::InvalidArgument(
            "result dimensions do not match the operation",
        ));
    }
    match result {
        MatrixMut::Dense(out) => {
            for col in 0..ncols {
                for row in 0..nrows {
                    out[(row, col)] = f(row, col);
                }
            }
            Ok(())
        }
        mut other => {
            let tmp = Matrix::from_fn(nrows, ncols, f);
            other.assign_dense(&tmp)
        }
    }
}

fn elementwise<T>(
    op: &str,
    a: MatrixRef<'_, T>,
    b: MatrixRef<'_, T>,
    result: MatrixMut<'_, T>,
    f: impl Fn(T, T) -> T,
) -> Result<(), MatrixError>
where
    T: FloatT,
{
    check_same_size(&a, &b)?;
    log_fallback(op, a.kind(), Some(b.kind()));
    assign_with(result, a.nrows(), a.ncols(), |r, c| f(a.at(r, c), b.at(r, c)))
}

fn unary<T>(
    op: &str,
    a: MatrixRef<'_, T>,
    result: MatrixMut<'_, T>,
    f: impl Fn(T) -> T,
) -> Result<(), MatrixError>
where
    T: FloatT,
{
    log_fallback(op, a.kind(), None);
    assign_with(result, a.nrows(), a.ncols(), |r, c| f(a.at(r, c)))
}

pub(crate) fn add<T: FloatT>(
    a: MatrixRef<'_, T>,
    b: MatrixRef<'_, T>,
    result: MatrixMut<'_, T>,
) -> Result<(), MatrixError> {
    elementwise("add", a, b, result, |x, y| x + y)
}

pub(crate) fn subtract<T: FloatT>(
    a: MatrixRef<'_, T>,
    b: MatrixRef<'_, T>,
    result: MatrixMut<'_, T>,
) -> Result<(), MatrixError> {
    elementwise("subtract", a, b, result, |x, y| x - y)
}

pub(crate) fn pointwise_multiply<T: FloatT>(
    a: MatrixRef<'_, T>,
    b: MatrixRef<'_, T>,
    result: MatrixMut<'_, T>,
) -> Result<(), MatrixError> {
    elementwise("pointwise_multiply", a, b, result, |x, y| x * y)
}

pub(crate) fn pointwise_divide<T: FloatT>(
    a: MatrixRef<'_, T>,
    b: MatrixRef<'_, T>,
    result: MatrixMut<'_, T>,
) -> Result<(), MatrixError> {
    elementwise("pointwise_divide", a, b, result, |x, y| x / y)
}

pub(crate) fn scale<T: FloatT>(
    a: MatrixRef<'_, T>,
    c: T,
    result: MatrixMut<'_, T>,
) -> Result<(), MatrixError> {
    unary("scale", a, result, |x| c * x)
}

pub(crate) fn negate<T: FloatT>(
    a: MatrixRef<'_, T>,
    result: MatrixMut<'_, T>,
) -> Result<(), MatrixError> {
    unary("negate", a, result, |x| -x)
}

pub(crate) fn modulus<T: FloatT>(
    a: MatrixRef<'_, T>,
    divisor: T,
    result: MatrixMut<'_, T>,
) -> Result<(), MatrixError> {
    unary("modulus", a, result, |x| x.modulus(divisor))
}

pub(crate) fn transpose<T: FloatT>(
    a: MatrixRef<'_, T>,
    result: MatrixMut<'_, T>,
) -> Result<(), MatrixError> {
    log_fallback("transpose", a.kind(), None);
    assign_with(result, a.ncols(), a.nrows(), |r, c| a.at(c, r))
}

// ---------------------------------------------------------------
// products.  O(m*n*k) loops, every term read through `at`.

pub(crate) fn multiply<T: FloatT>(
    a: MatrixRef<'_, T>,
    b: MatrixRef<'_, T>,
    result: MatrixMut<'_, T>,
) -> Result<(), MatrixError> {
    if a.ncols() != b.nrows() {
        return Err(MatrixError::InvalidArgument(
            "inner dimensions of the product must agree",
        ));
    }
    log_fallback("multiply", a.kind(), Some(b.kind()));
    let inner = a.ncols();
    assign_with(result, a.nrows(), b.ncols(), |r, c| {
        (0..inner).fold(T::zero(), |acc, k| acc + a.at(r, k) * b.at(k, c))
    })
}

pub(crate) fn transpose_and_multiply<T: FloatT>(
    a: MatrixRef<'_, T>,
    b: MatrixRef<'_, T>,
    result: MatrixMut<'_, T>,
) -> Result<(), MatrixError> {
    if a.ncols() != b.ncols() {
        return Err(MatrixError::InvalidArgument(
            "inner dimensions of the product must agree",
        ));
    }
    log_fallback("transpose_and_multiply", a.kind(), Some(b.kind()));
    let inner = a.ncols();
    assign_with(result, a.nrows(), b.nrows(), |r, c| {
        (0..inner).fold(T::zero(), |acc, k| acc + a.at(r, k) * b.at(c, k))
    })
}

pub(crate) fn transpose_this_and_multiply<T: FloatT>(
    a: MatrixRef<'_, T>,
    b: MatrixRef<'_, T>,
    result: MatrixMut<'_, T>,
) -> Result<(), MatrixError> {
    if a.nrows() != b.nrows() {
        return Err(MatrixError::InvalidArgument(
            "inner dimensions of the product must agree",
        ));
    }
    log_fallback("transpose_this_and_multiply", a.kind(), Some(b.kind()));
    let inner = a.nrows();
    assign_with(result, a.ncols(), b.ncols(), |r, c| {
        (0..inner).fold(T::zero(), |acc, k| acc + a.at(k, r) * b.at(k, c))
    })
}

pub(crate) fn multiply_vector<T: FloatT>(
    a: MatrixRef<'_, T>,
    x: &[T],
    y: &mut [T],
) -> Result<(), MatrixError> {
    if x.len() != a.ncols() || y.len() != a.nrows() {
        return Err(MatrixError::InvalidArgument(
            "vector lengths must match the matrix dimensions",
        ));
    }
    log_fallback("multiply_vector", a.kind(), None);
    for (r, yr) in y.iter_mut().enumerate() {
        *yr = x
            .iter()
            .enumerate()
            .fold(T::zero(), |acc, (c, &xc)| acc + a.at(r, c) * xc);
    }
    Ok(())
}

pub(crate) fn transpose_this_and_multiply_vector<T: FloatT>(
    a: MatrixRef<'_, T>,
    x: &[T],
    y: &mut [T],
) -> Result<(), MatrixError> {
    if x.len() != a.nrows() || y.len() != a.ncols() {
        return Err(MatrixError::InvalidArgument(
            "vector lengths must match the matrix dimensions",
        ));
    }
    log_fallback("transpose_this_and_multiply_vector", a.kind(), None);
    for (c, yc) in y.iter_mut().enumerate() {
        *yc = x
            .iter()
            .enumerate()
            .fold(T::zero(), |acc, (r, &xr)| acc + a.at(r, c) * xr);
    }
    Ok(())
}

// ---------------------------------------------------------------
// reductions

pub(crate) fn trace<T: FloatT>(a: MatrixRef<'_, T>) -> Result<T, MatrixError> {
    if !a.is_square() {
        return Err(MatrixError::InvalidArgument("trace requires a square matrix"));
    }
    Ok((0..a.nrows()).fold(T::zero(), |acc, k| acc + a.at(k, k)))
}

pub(crate) fn l1_norm<T: FloatT>(a: MatrixRef<'_, T>) -> T {
    let sums: Vec<T> = (0..a.ncols())
        .map(|c| (0..a.nrows()).fold(T::zero(), |acc, r| acc + a.at(r, c).abs()))
        .collect();
    sums.norm_inf()
}

pub(crate) fn infinity_norm<T: FloatT>(a: MatrixRef<'_, T>) -> T {
    let sums: Vec<T> = (0..a.nrows())
        .map(|r| (0..a.ncols()).fold(T::zero(), |acc, c| acc + a.at(r, c).abs()))
        .collect();
    sums.norm_inf()
}

pub(crate) fn frobenius_norm<T: FloatT>(a: MatrixRef<'_, T>) -> T {
    let mut sumsq = T::zero();
    for c in 0..a.ncols() {
        for r in 0..a.nrows() {
            let v = a.at(r, c);
            sumsq += v * v;
        }
    }
    sumsq.sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_matrix() -> Matrix<f64> {
        Matrix::from(&[[1., -2., 3.], [-4., 5., -6.]])
    }

    #[test]
    fn test_generic_products() {
        let A = test_matrix();
        let B = Matrix::from(&[[1., 0.], [0., 1.], [1., 1.]]);

        let mut AB = Matrix::zeros((2, 2));
        multiply(A.as_operand(), B.as_operand(), (&mut AB).into()).unwrap();
        assert_eq!(AB, Matrix::from(&[[4., 1.], [-10., -1.]]));

        // A*Aᵀ and Aᵀ*A
        let mut AAt = Matrix::zeros((2, 2));
        transpose_and_multiply(A.as_operand(), A.as_operand(), (&mut AAt).into()).unwrap();
        assert_eq!(AAt, Matrix::from(&[[14., -32.], [-32., 77.]]));

        let mut AtA = Matrix::zeros((3, 3));
        transpose_this_and_multiply(A.as_operand(), A.as_operand(), (&mut AtA).into()).unwrap();
        assert_eq!(AtA[(0, 0)], 17.);
        assert_eq!(AtA[(0, 2)], 27.);
        assert_eq!(AtA[(2, 0)], 27.);

        // bad inner dimension
        let mut out = Matrix::zeros((2, 2));
        assert!(matches!(
            multiply(A.as_operand(), A.as_operand(), (&mut out).into()),
            Err(MatrixError::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_generic_vector_products() {
        let A = test_matrix();
        let x = [1., 1., 1.];
        let mut y = [0.; 2];
        multiply_vector(A.as_operand(), &x, &mut y).unwrap();
        assert_eq!(y, [2., -5.]);

        let mut z = [0.; 3];
        transpose_this_and_multiply_vector(A.as_operand(), &y, &mut z).unwrap();
        assert_eq!(z, [22., -29., 36.]);

        assert!(multiply_vector(A.as_operand(), &y, &mut z).is_err());
    }

    #[test]
    fn test_generic_norms() {
        let A = test_matrix();
        assert_eq!(l1_norm(A.as_operand()), 9.);
        assert_eq!(infinity_norm(A.as_operand()), 15.);
        assert_eq!(frobenius_norm(A.as_operand()), 91_f64.sqrt());
        assert!(trace(A.as_operand()).is_err());
    }

    #[test]
    fn test_assign_into_structured_result() {
        // a symmetric value fits a symmetric result
        let S = Matrix::from(&[[1., 2.], [2., 3.]]);
        let mut out = SymmetricMatrix::<f64>::new(2).unwrap();
        scale(S.as_operand(), 2., (&mut out).into()).unwrap();
        assert_eq!(out.at(1, 0), 4.);

        // a non-symmetric one does not
        let N = Matrix::from(&[[1., 2.], [0., 3.]]);
        assert!(matches!(
            scale(N.as_operand(), 2., (&mut out).into()),
            Err(MatrixError::InvalidOperation { .. })
        ));
    }
}
