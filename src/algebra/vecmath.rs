use super::{FloatT, VectorMath};
use itertools::izip;
use std::iter::zip;

impl<T: FloatT> VectorMath for [T] {
    type T = T;
    fn copy_from(&mut self, src: &[T]) -> &mut Self {
        self.copy_from_slice(src);
        self
    }

    fn scalarop(&mut self, op: impl Fn(T) -> T) -> &mut Self {
        for x in &mut *self {
            *x = op(*x);
        }
        self
    }

    fn scalarop_from(&mut self, op: impl Fn(T) -> T, v: &[T]) -> &mut Self {
        assert_eq!(self.len(), v.len());
        for (x, v) in zip(&mut *self, v) {
            *x = op(*v);
        }
        self
    }

    fn binop_from(&mut self, op: impl Fn(T, T) -> T, x: &[T], y: &[T]) -> &mut Self {
        assert_eq!(self.len(), x.len());
        assert_eq!(self.len(), y.len());
        for (w, &x, &y) in izip!(&mut *self, x, y) {
            *w = op(x, y);
        }
        self
    }

    fn set(&mut self, c: T) -> &mut Self {
        self.scalarop(|_x| c)
    }

    fn scale(&mut self, c: T) -> &mut Self {
        self.scalarop(|x| x * c)
    }

    fn negate(&mut self) -> &mut Self {
        self.scalarop(|x| -x)
    }

    fn dot(&self, y: &[T]) -> T {
        zip(self, y).fold(T::zero(), |acc, (&x, &y)| acc + x * y)
    }

    fn sum(&self) -> T {
        self.iter().fold(T::zero(), |acc, &x| acc + x)
    }

    fn sumsq(&self) -> T {
        self.dot(self)
    }

    // 2-norm
    fn norm(&self) -> T {
        T::sqrt(self.sumsq())
    }

    // Returns infinity norm
    fn norm_inf(&self) -> T {
        let mut out = T::zero();
        for v in self.iter().map(|v| v.abs()) {
            if v.is_nan() {
                return T::nan();
            }
            out = if v > out { v } else { out };
        }
        out
    }
}

#[test]
fn test_dot_product() {
    let x = vec![1., 2., 3., 4.];
    let y = vec![4., 5., 6., 7.];
    assert_eq!(x.dot(&y), 60.);
}

#[test]
fn test_norms() {
    let x = vec![3., -4., 0., 1.];
    assert_eq!(x.norm_inf(), 4.);
    assert_eq!(x.sumsq(), 26.);
    assert!([1., f64::NAN, 5.].norm_inf().is_nan());
}

#[test]
fn test_elementwise() {
    let mut w = vec![0.; 3];
    w.binop_from(|a, b| a - b, &[5., 6., 7.], &[1., 2., 3.]);
    assert_eq!(w, vec![4., 4., 4.]);
    w.scale(0.5).negate();
    assert_eq!(w, vec![-2., -2., -2.]);
    w.scalarop_from(|x| x * x, &[1., 2., 3.]);
    assert_eq!(w, vec![1., 4., 9.]);
}
