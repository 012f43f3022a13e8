#![allow(non_snake_case)]

use packedmat::algebra::*;
use rand::distributions::{Distribution, Uniform};
use rand::rngs::StdRng;
use rand::SeedableRng;

// random symmetric dense matrix with integer entries
fn random_symmetric(n: usize, rng: &mut StdRng) -> Matrix<f64> {
    let dist = Uniform::new_inclusive(-9, 9);
    let mut A = Matrix::zeros((n, n));
    for col in 0..n {
        for row in 0..=col {
            let v = dist.sample(rng) as f64;
            A[(row, col)] = v;
            A[(col, row)] = v;
        }
    }
    A
}

#[test]
fn test_symmetric_round_trip() {
    let mut rng = StdRng::seed_from_u64(5);
    for n in 1..8 {
        let A = random_symmetric(n, &mut rng);
        let S = SymmetricMatrix::from_dense(&A).unwrap();
        for row in 0..n {
            for col in 0..n {
                assert_eq!(S.get(row, col), Ok(A[(row, col)]));
            }
        }
        assert_eq!(S.to_dense(), A);
        assert_eq!(S.data().len(), n * (n + 1) / 2);
    }
}

#[test]
fn test_symmetric_transpose() {
    let mut rng = StdRng::seed_from_u64(6);
    let S = SymmetricMatrix::from_dense(&random_symmetric(4, &mut rng)).unwrap();
    let St = S.transpose();
    assert!(std::ptr::eq(St, &S));
    for row in 0..4 {
        for col in 0..4 {
            assert_eq!(St.at(row, col), S.at(col, row));
        }
    }
}

#[test]
fn test_owned_buffer_is_adopted() {
    let data = vec![1., 2., 3., 4., 5., 6.];
    let ptr = data.as_ptr();
    let S = SymmetricMatrix::from_packed(3, data).unwrap();
    assert_eq!(S.data().as_ptr(), ptr);
    assert_eq!(S.at(2, 1), 5.);

    let L = TriangularMatrix::from_packed(3, MatrixTriangle::Tril, S.into_data()).unwrap();
    assert_eq!(L.data().as_ptr(), ptr);
    assert_eq!(L.at(2, 1), 5.);
    assert_eq!(L.at(1, 2), 0.);
}

#[test]
fn test_borrowed_buffer_writes_through() {
    let mut buffer = vec![0.0; 6];
    {
        let mut store =
            BorrowedPackedStore::from_slice_mut(3, MatrixTriangle::Triu, &mut buffer).unwrap();
        store.set(1, 2, 5.0).unwrap();
        store.set_diagonal(0, 1.0);
        assert!(store.set(2, 1, 1.0).is_err());
    }
    assert_eq!(buffer, vec![1.0, 0.0, 0.0, 0.0, 5.0, 0.0]);

    let mut short = vec![0.0; 5];
    assert!(BorrowedPackedStore::from_slice_mut(3, MatrixTriangle::Triu, &mut short).is_err());
}

#[test]
fn test_opposite_triangle_accessors() {
    let mut U = PackedStore::<f64>::new(3, MatrixTriangle::Triu).unwrap();
    U.set_upper(0, 2, 4.0).unwrap();
    U.set_lower(1, 1, 2.0).unwrap();
    assert_eq!(U.at_upper(0, 2), 4.0);
    assert_eq!(U.at_lower(2, 0), 0.0);
    assert_eq!(U.at_lower(1, 1), 2.0);
    assert!(matches!(
        U.set_lower(2, 0, 1.0),
        Err(MatrixError::InvalidOperation { row: 2, col: 0, .. })
    ));

    let mut L = PackedStore::<f64>::new(3, MatrixTriangle::Tril).unwrap();
    L.set_lower(2, 0, 4.0).unwrap();
    assert_eq!(L.at_lower(2, 0), 4.0);
    assert_eq!(L.at_upper(0, 2), 0.0);
    assert!(L.set_upper(0, 2, 1.0).is_err());
    L.set_upper(2, 2, 3.0).unwrap();
    assert_eq!(L.at_diagonal(2), 3.0);
}

#[test]
fn test_skyline_idempotence() {
    // symmetric matrix with a variable profile
    let A = Matrix::from(&[
        [5., 1., 0., 0., 0.],
        [1., 6., 0., 2., 0.],
        [0., 0., 7., 3., 0.],
        [0., 2., 3., 8., 4.],
        [0., 0., 0., 4., 9.],
    ]);
    let S = SkylineStorage::from_dense(&A, &SkylineSettings::default()).unwrap();
    assert_eq!(S.to_dense(), A);
    assert_eq!(S.envelope_len(), 9);
    assert!(S.envelope_len() < triangle_len(5));

    // and back again through the dense form
    let S2 = SkylineStorage::from_dense(&S.to_dense(), &SkylineSettings::default()).unwrap();
    assert_eq!(S2, S);

    let mut rng = StdRng::seed_from_u64(11);
    for n in 1..7 {
        let A = random_symmetric(n, &mut rng);
        let S = SkylineStorage::from_dense(&A, &SkylineSettings::default()).unwrap();
        assert_eq!(S.to_dense(), A);
    }
}

#[test]
fn test_skyline_rejects_bad_input() {
    let settings = SkylineSettings::default();
    assert!(matches!(
        SkylineStorage::from_dense(&Matrix::<f64>::zeros((3, 4)), &settings),
        Err(MatrixError::InvalidArgument(_))
    ));
    assert!(matches!(
        SkylineStorage::from_dense(&Matrix::from(&[[1., 0.], [1., 1.]]), &settings),
        Err(MatrixError::InvalidArgument(_))
    ));

    let bad = SkylineSettings {
        zero_tolerance: f64::NAN,
        ..SkylineSettings::default()
    };
    assert!(SkylineStorage::from_dense(&Matrix::<f64>::identity(2), &bad).is_err());
}

fn triangle_len(n: usize) -> usize {
    n * (n + 1) / 2
}
