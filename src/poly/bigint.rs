// Arbitrary-precision polynomials over Z[X]/(X^n - 1). These only appear while
// completing an NTRUSign basis, where the intermediate Bezout-derived polynomials
// carry thousands of bits per coefficient.

use crate::poly::integer::IntegerPolynomial;
use num::{BigInt, Signed, ToPrimitive, Zero};


/// Dense polynomial with `BigInt` coefficients.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BigIntPolynomial {
    pub(crate) coeffs: Vec<BigInt>,
}


/// Fixed-point rational polynomial: each coefficient is `coeffs[i] / 2^scale`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BigDecimalPolynomial {
    coeffs: Vec<BigInt>,
    scale: u64,
}


fn cyclic_convolution(a: &[BigInt], b: &[BigInt]) -> Vec<BigInt> {
    let n = a.len();
    debug_assert_eq!(n, b.len(), "big convolution: ring dimension mismatch");
    let mut c = vec![BigInt::zero(); n];
    for (i, ai) in a.iter().enumerate() {
        for (j, bj) in b.iter().enumerate() {
            let k = if i + j >= n { i + j - n } else { i + j };
            c[k] += ai * bj;
        }
    }
    c
}


/// `round(a / d)` for `d > 0`, halves away from zero.
fn div_round_big(a: &BigInt, d: &BigInt) -> BigInt {
    let half = d >> 1u32;
    if a.is_negative() {
        -((-a + &half) / d)
    } else {
        (a + &half) / d
    }
}


impl BigIntPolynomial {
    /// The zero polynomial with `n` coefficients.
    #[must_use]
    pub fn new(n: usize) -> Self { BigIntPolynomial { coeffs: vec![BigInt::zero(); n] } }


    /// Ring dimension.
    #[must_use]
    pub fn len(&self) -> usize { self.coeffs.len() }


    /// True for the degenerate `n = 0` container.
    #[must_use]
    pub fn is_empty(&self) -> bool { self.coeffs.is_empty() }


    /// `self * b` for a small-coefficient `b`.
    #[must_use]
    pub fn mult_small(&self, b: &IntegerPolynomial) -> BigIntPolynomial {
        let small: Vec<BigInt> = b.coeffs.iter().map(|&c| BigInt::from(c)).collect();
        BigIntPolynomial { coeffs: cyclic_convolution(&self.coeffs, &small) }
    }


    /// `self * b`
    #[must_use]
    pub fn mult(&self, b: &BigIntPolynomial) -> BigIntPolynomial {
        BigIntPolynomial { coeffs: cyclic_convolution(&self.coeffs, &b.coeffs) }
    }


    /// Multiplies every coefficient by `factor`.
    pub fn mult_scalar(&mut self, factor: &BigInt) { self.coeffs.iter_mut().for_each(|c| *c *= factor); }


    /// `self += b`
    pub fn add(&mut self, b: &BigIntPolynomial) {
        self.coeffs.iter_mut().zip(&b.coeffs).for_each(|(a, b)| *a += b);
    }


    /// `self -= b`
    pub fn sub(&mut self, b: &BigIntPolynomial) {
        self.coeffs.iter_mut().zip(&b.coeffs).for_each(|(a, b)| *a -= b);
    }


    /// Divides every coefficient by the positive `divisor`, rounding to nearest.
    pub fn div_round(&mut self, divisor: &BigInt) {
        debug_assert!(divisor.is_positive(), "div_round: non-positive divisor");
        self.coeffs.iter_mut().for_each(|c| *c = div_round_big(c, divisor));
    }


    /// Largest coefficient bit length (of the absolute value).
    #[must_use]
    pub fn max_coeff_bits(&self) -> u64 { self.coeffs.iter().map(BigInt::bits).max().unwrap_or(0) }


    /// Narrows to 32-bit coefficients; `None` if any coefficient does not fit.
    #[must_use]
    pub fn to_integer_polynomial(&self) -> Option<IntegerPolynomial> {
        let coeffs = self.coeffs.iter().map(ToPrimitive::to_i32).collect::<Option<Vec<i32>>>()?;
        Some(IntegerPolynomial::from_coeffs(coeffs))
    }
}


impl From<&IntegerPolynomial> for BigIntPolynomial {
    fn from(p: &IntegerPolynomial) -> Self {
        BigIntPolynomial { coeffs: p.coeffs.iter().map(|&c| BigInt::from(c)).collect() }
    }
}


impl BigDecimalPolynomial {
    /// `num / den` with `scale` fractional bits, each coefficient rounded to nearest.
    #[must_use]
    pub fn from_ratio(num: &BigIntPolynomial, den: &BigInt, scale: u64) -> Self {
        debug_assert!(!den.is_zero(), "from_ratio: zero denominator");
        let negate = den.is_negative();
        let den_abs = den.abs();
        let coeffs = num
            .coeffs
            .iter()
            .map(|c| {
                let c = if negate { -c } else { c.clone() };
                div_round_big(&(c << scale), &den_abs)
            })
            .collect();
        BigDecimalPolynomial { coeffs, scale }
    }


    /// `self * b` keeping the current scale.
    #[must_use]
    pub fn mult(&self, b: &BigIntPolynomial) -> BigDecimalPolynomial {
        BigDecimalPolynomial { coeffs: cyclic_convolution(&self.coeffs, &b.coeffs), scale: self.scale }
    }


    /// `self += b`; both operands must share a scale.
    pub fn add(&mut self, b: &BigDecimalPolynomial) {
        debug_assert_eq!(self.scale, b.scale, "decimal add: scale mismatch");
        self.coeffs.iter_mut().zip(&b.coeffs).for_each(|(a, b)| *a += b);
    }


    /// Divides by two exactly by adding one fractional bit.
    pub fn halve(&mut self) { self.scale += 1; }


    /// Rounds every coefficient to the nearest integer.
    #[must_use]
    pub fn round(&self) -> BigIntPolynomial {
        let unit = BigInt::from(1u8) << self.scale;
        BigIntPolynomial { coeffs: self.coeffs.iter().map(|c| div_round_big(c, &unit)).collect() }
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    fn big(v: &[i64]) -> BigIntPolynomial {
        BigIntPolynomial { coeffs: v.iter().map(|&c| BigInt::from(c)).collect() }
    }

    #[test]
    fn test_mult_matches_small() {
        let a = IntegerPolynomial::from_coeffs(vec![3, -1, 4, 1, -5]);
        let b = IntegerPolynomial::from_coeffs(vec![9, 2, -6, 5, 3]);
        let expected = BigIntPolynomial::from(&a.mult(&b));
        assert_eq!(BigIntPolynomial::from(&a).mult_small(&b), expected);
        assert_eq!(BigIntPolynomial::from(&a).mult(&BigIntPolynomial::from(&b)), expected);
    }

    #[test]
    fn test_div_round() {
        let mut p = big(&[7, -7, 5, -5, 4, 0]);
        p.div_round(&BigInt::from(2));
        assert_eq!(p, big(&[4, -4, 3, -3, 2, 0]));
        let mut q = big(&[10, -10, 11]);
        q.div_round(&BigInt::from(4));
        assert_eq!(q, big(&[3, -3, 3]));
    }

    #[test]
    fn test_decimal_ratio_and_round() {
        let num = big(&[1, -1, 3, 10]);
        let mut d = BigDecimalPolynomial::from_ratio(&num, &BigInt::from(-3), 40);
        // -1/3, 1/3, -1, -10/3
        assert_eq!(d.round(), big(&[0, 0, -1, -3]));
        d.add(&d.clone());
        d.halve();
        assert_eq!(d.round(), big(&[0, 0, -1, -3]));
        let e = BigDecimalPolynomial::from_ratio(&big(&[1, 0, 0, 0]), &BigInt::from(2), 8);
        assert_eq!(e.mult(&big(&[3, 0, 0, 5])).round(), big(&[2, 0, 0, 3]));
    }

    #[test]
    fn test_narrowing() {
        let mut p = big(&[1, 2]);
        assert!(p.to_integer_polynomial().is_some());
        p.mult_scalar(&(BigInt::from(1) << 40u32));
        assert!(p.to_integer_polynomial().is_none());
        assert_eq!(p.max_coeff_bits(), 42);
    }
}
