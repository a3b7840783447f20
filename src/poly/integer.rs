use crate::poly::field;
use zeroize::Zeroize;


/// A dense polynomial in `Z[X]/(X^n - 1)` with one `i32` per coefficient.
///
/// Most operations mutate in place, mirroring how the encryption and signing
/// routines accumulate into owned buffers; the multiplications return a fresh
/// polynomial.
#[derive(Clone, Debug, PartialEq, Eq, Zeroize)]
pub struct IntegerPolynomial {
    /// Coefficients, lowest degree first
    pub coeffs: Vec<i32>,
}


impl IntegerPolynomial {
    /// The zero polynomial with `n` coefficients.
    #[must_use]
    pub fn new(n: usize) -> Self { IntegerPolynomial { coeffs: vec![0; n] } }


    /// Wraps an existing coefficient vector.
    #[must_use]
    pub fn from_coeffs(coeffs: Vec<i32>) -> Self { IntegerPolynomial { coeffs } }


    /// The constant polynomial `1` with `n` coefficients.
    #[must_use]
    pub fn one(n: usize) -> Self {
        let mut p = Self::new(n);
        if let Some(c) = p.coeffs.first_mut() {
            *c = 1;
        }
        p
    }


    /// Ring dimension `n`.
    #[must_use]
    pub fn len(&self) -> usize { self.coeffs.len() }


    /// True for the degenerate `n = 0` container.
    #[must_use]
    pub fn is_empty(&self) -> bool { self.coeffs.is_empty() }


    /// Cyclic convolution without reduction; accumulates in 64 bits.
    #[must_use]
    pub fn mult(&self, other: &IntegerPolynomial) -> IntegerPolynomial {
        IntegerPolynomial::from_coeffs(
            self.mult_wide(other).into_iter().map(truncate_i64).collect(),
        )
    }


    /// Cyclic convolution with every coefficient reduced into `[0, modulus)`.
    #[must_use]
    pub fn mult_mod(&self, other: &IntegerPolynomial, modulus: i32) -> IntegerPolynomial {
        let m = i64::from(modulus);
        IntegerPolynomial::from_coeffs(
            self.mult_wide(other).into_iter().map(|c| truncate_i64(c.rem_euclid(m))).collect(),
        )
    }


    fn mult_wide(&self, other: &IntegerPolynomial) -> Vec<i64> {
        debug_assert_eq!(self.len(), other.len(), "mult: ring dimension mismatch");
        let n = self.len();
        let mut c = vec![0i64; n];
        for (i, &a) in self.coeffs.iter().enumerate() {
            if a == 0 {
                continue;
            }
            let a = i64::from(a);
            for (j, &b) in other.coeffs.iter().enumerate() {
                let k = if i + j >= n { i + j - n } else { i + j };
                c[k] += a * i64::from(b);
            }
        }
        c
    }


    /// `self += other`
    pub fn add(&mut self, other: &IntegerPolynomial) {
        debug_assert_eq!(self.len(), other.len(), "add: ring dimension mismatch");
        self.coeffs.iter_mut().zip(&other.coeffs).for_each(|(a, b)| *a += b);
    }


    /// `self = (self + other) mod modulus`, coefficients in `[0, modulus)`
    pub fn add_mod(&mut self, other: &IntegerPolynomial, modulus: i32) {
        self.add(other);
        self.mod_positive(modulus);
    }


    /// `self -= other`
    pub fn sub(&mut self, other: &IntegerPolynomial) {
        debug_assert_eq!(self.len(), other.len(), "sub: ring dimension mismatch");
        self.coeffs.iter_mut().zip(&other.coeffs).for_each(|(a, b)| *a -= b);
    }


    /// `self = (self - other) mod modulus`, coefficients in `[0, modulus)`
    pub fn sub_mod(&mut self, other: &IntegerPolynomial, modulus: i32) {
        self.sub(other);
        self.mod_positive(modulus);
    }


    /// Multiplies every coefficient by `factor`.
    pub fn mult_scalar(&mut self, factor: i32) { self.coeffs.iter_mut().for_each(|a| *a *= factor); }


    /// `self = 3·self mod q` with coefficients in `[0, q)`.
    pub fn mult3(&mut self, q: i32) {
        self.mult_scalar(3);
        self.mod_positive(q);
    }


    /// Reduces every coefficient into `[0, modulus)`.
    pub fn mod_positive(&mut self, modulus: i32) {
        self.coeffs.iter_mut().for_each(|a| *a = a.rem_euclid(modulus));
    }


    /// Reduces every coefficient into the symmetric range `(-q/2, q/2]`.
    pub fn center_mod(&mut self, q: i32) {
        self.coeffs.iter_mut().for_each(|a| *a = center(*a, q));
    }


    /// Reduces every coefficient mod 3 into `{-1, 0, 1}`.
    pub fn mod3(&mut self) { self.center_mod(3); }


    /// Divides every coefficient by `k`, rounding to the nearest integer (halves away from zero).
    pub fn div_round(&mut self, k: i32) {
        debug_assert!(k > 0, "div_round: non-positive divisor");
        let k2 = (k + 1) / 2;
        self.coeffs.iter_mut().for_each(|a| {
            *a = if *a > 0 { (*a + k2) / k } else { (*a - k2) / k };
        });
    }


    /// Multiplies by `X`, i.e. rotates the coefficients one position up.
    pub fn rotate1(&mut self) {
        if !self.coeffs.is_empty() {
            self.coeffs.rotate_right(1);
        }
    }


    /// The reversed polynomial `a(X^{-1})`: `rev[0] = a[0]`, `rev[i] = a[n - i]`.
    #[must_use]
    pub fn reversed(&self) -> IntegerPolynomial {
        let n = self.len();
        let mut out = self.clone();
        for i in 1..n {
            out.coeffs[i] = self.coeffs[n - i];
        }
        out
    }


    /// Number of coefficients equal to `value`.
    #[must_use]
    pub fn count(&self, value: i32) -> usize { self.coeffs.iter().filter(|&&c| c == value).count() }


    /// `a(1)`
    #[must_use]
    pub fn sum_coeffs(&self) -> i64 { self.coeffs.iter().map(|&c| i64::from(c)).sum() }


    /// True when all coefficients are zero.
    #[must_use]
    pub fn is_zero(&self) -> bool { self.coeffs.iter().all(|&c| c == 0) }


    /// True when the polynomial is the constant `1`.
    #[must_use]
    pub fn is_one(&self) -> bool {
        self.coeffs.first() == Some(&1) && self.coeffs.iter().skip(1).all(|&c| c == 0)
    }


    /// True when all coefficients are in `{-1, 0, 1}`.
    #[must_use]
    pub fn is_ternary(&self) -> bool { self.coeffs.iter().all(|&c| (-1..=1).contains(&c)) }


    /// Centered squared norm: after centering mod `q`, `Σc² − (Σc)²/n`, in 64-bit arithmetic.
    #[must_use]
    pub fn centered_norm_sq(&self, q: i32) -> i64 {
        let n = i64::try_from(self.len()).unwrap_or(i64::MAX);
        if n == 0 {
            return 0;
        }
        let (sum, sq_sum) = self.coeffs.iter().fold((0i64, 0i64), |(s, sq), &c| {
            let c = i64::from(center(c, q));
            (s + c, sq + c * c)
        });
        sq_sum - sum * sum / n
    }


    /// Inverse mod 3 (`fp`), coefficients in `[0, 3)`; `None` when not invertible.
    #[must_use]
    pub fn invert_f3(&self) -> Option<IntegerPolynomial> {
        let inv = field::invert_in_ring(&self.coeffs, 3)?;
        Some(IntegerPolynomial::from_coeffs(inv.into_iter().map(truncate_i64).collect()))
    }


    /// Inverse mod `q` for a power of two `q` (`fq`), coefficients in `[0, q)`.
    ///
    /// The inverse mod 2 is lifted by Newton iteration `b ← b·(2 − a·b)`, doubling the
    /// number of correct bits each round. Returns `None` when not invertible.
    #[must_use]
    pub fn invert_fq(&self, q: i32) -> Option<IntegerPolynomial> {
        debug_assert!(q > 1 && (q & (q - 1)) == 0, "invert_fq: q must be a power of two");
        let inv2 = field::invert_in_ring(&self.coeffs, 2)?;
        let mut b = IntegerPolynomial::from_coeffs(inv2.into_iter().map(truncate_i64).collect());
        let mut v = 2i32;
        while v < q {
            v = v.saturating_mul(v).min(q);
            let ab = self.mult_mod(&b, v);
            let mut two_minus_ab = IntegerPolynomial::new(self.len());
            two_minus_ab.coeffs[0] = 2;
            two_minus_ab.sub_mod(&ab, v);
            b = b.mult_mod(&two_minus_ab, v);
        }
        Some(b)
    }


    /// Overwrites the coefficients with zeros.
    pub fn clear(&mut self) { self.coeffs.zeroize(); }
}


/// `a mod± q`: the representative of `a` in `(-q/2, q/2]`.
pub(crate) fn center(a: i32, q: i32) -> i32 {
    let t = a.rem_euclid(q);
    if t > q / 2 {
        t - q
    } else {
        t
    }
}


#[allow(clippy::cast_possible_truncation)]
fn truncate_i64(c: i64) -> i32 {
    debug_assert!(i32::try_from(c).is_ok(), "coefficient overflows i32");
    c as i32
}


#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_mult_cyclic() {
        // (1 + X)(1 + X^2) in Z[X]/(X^3 - 1) = 1 + X + X^2 + X^3 = 2 + X + X^2
        let a = IntegerPolynomial::from_coeffs(vec![1, 1, 0]);
        let b = IntegerPolynomial::from_coeffs(vec![1, 0, 1]);
        assert_eq!(a.mult(&b).coeffs, vec![2, 1, 1]);
        assert_eq!(a.mult_mod(&b, 2).coeffs, vec![0, 1, 1]);
    }

    #[test]
    fn test_mult_by_zero_and_n1() {
        let a = IntegerPolynomial::from_coeffs(vec![3, -1, 4, 1, -5]);
        assert!(a.mult(&IntegerPolynomial::new(5)).is_zero());
        let x = IntegerPolynomial::from_coeffs(vec![7]);
        let y = IntegerPolynomial::from_coeffs(vec![-3]);
        assert_eq!(x.mult(&y).coeffs, vec![-21]);
        assert_eq!(x.invert_fq(256).map(|p| p.mult_mod(&x, 256).coeffs), Some(vec![1]));
    }

    #[test]
    fn test_center_and_mod3() {
        let mut a = IntegerPolynomial::from_coeffs(vec![0, 1, 127, 128, 129, 255, -1, 300]);
        a.center_mod(256);
        assert_eq!(a.coeffs, vec![0, 1, 127, 128, -127, -1, -1, 44]);
        let mut b = IntegerPolynomial::from_coeffs(vec![-4, -3, -2, 2, 3, 4, 5]);
        b.mod3();
        assert_eq!(b.coeffs, vec![-1, 0, 1, -1, 0, 1, -1]);
    }

    #[test]
    fn test_div_round() {
        let mut a = IntegerPolynomial::from_coeffs(vec![5, 6, -5, -6, 0, 10, 1]);
        a.div_round(4);
        assert_eq!(a.coeffs, vec![1, 2, -1, -2, 0, 3, 0]);
    }

    #[test]
    fn test_rotate_and_reverse() {
        let mut a = IntegerPolynomial::from_coeffs(vec![1, 2, 3, 4]);
        assert_eq!(a.reversed().coeffs, vec![1, 4, 3, 2]);
        a.rotate1();
        assert_eq!(a.coeffs, vec![4, 1, 2, 3]);
    }

    #[test]
    fn test_centered_norm() {
        // Constant offsets do not change the centered norm
        let a = IntegerPolynomial::from_coeffs(vec![1, 1, 1, 1]);
        assert_eq!(a.centered_norm_sq(256), 0);
        let b = IntegerPolynomial::from_coeffs(vec![1, -1, 255, 0]);
        // centered: 1, -1, -1, 0 -> 3 - 1/4 -> 3 - 0
        assert_eq!(b.centered_norm_sq(256), 3);
    }

    #[test]
    fn test_centered_norm_large() {
        let a = IntegerPolynomial::from_coeffs((0..1000).map(|i| if i % 2 == 0 { 1000 } else { -1000 }).collect());
        assert_eq!(a.centered_norm_sq(2048), 1_000_000_000);
    }

    #[test]
    fn test_invert_f3_and_fq() {
        let f = IntegerPolynomial::from_coeffs(vec![1, -1, 1, 0, 1, -1, 0, 0, 1, 0, -1, 1, 0, 0, 0, -1, 0, 0, 0]);
        let fp = f.invert_f3().unwrap();
        assert!(f.mult_mod(&fp, 3).is_one());
        let fq = f.invert_fq(2048).unwrap();
        assert!(f.mult_mod(&fq, 2048).is_one());
        assert!(fq.coeffs.iter().all(|&c| (0..2048).contains(&c)));
    }

    #[test]
    fn test_not_invertible() {
        // f(1) = 0 mod 2 and mod 3
        let f = IntegerPolynomial::from_coeffs(vec![1, -1, 1, -1, 0, 0]);
        assert!(f.invert_fq(256).is_none());
        assert!(f.invert_f3().is_none());
    }

    proptest! {
        #[test]
        fn prop_mult_commutes(a in prop::collection::vec(-1000i32..1000, 17), b in prop::collection::vec(-1000i32..1000, 17)) {
            let a = IntegerPolynomial::from_coeffs(a);
            let b = IntegerPolynomial::from_coeffs(b);
            prop_assert_eq!(a.mult(&b), b.mult(&a));
        }

        #[test]
        fn prop_fq_inverse(coeffs in prop::collection::vec(-1i32..=1, 31)) {
            let f = IntegerPolynomial::from_coeffs(coeffs);
            if let Some(fq) = f.invert_fq(2048) {
                prop_assert!(f.mult_mod(&fq, 2048).is_one());
            }
        }
    }
}
