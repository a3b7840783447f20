use crate::error::Error;
use crate::helpers::random_below;
use crate::poly::integer::IntegerPolynomial;
use rand_core::CryptoRngCore;
use zeroize::Zeroize;


/// A ternary polynomial that records only the positions of its `+1` and `-1`
/// coefficients. Index lists are kept sorted.
#[derive(Clone, Debug, PartialEq, Eq, Zeroize)]
pub struct SparseTernaryPolynomial {
    n: usize,
    ones: Vec<usize>,
    negative_ones: Vec<usize>,
}


/// A ternary polynomial stored densely; multiplication skips the zero coefficients.
#[derive(Clone, Debug, PartialEq, Eq, Zeroize)]
pub struct DenseTernaryPolynomial(IntegerPolynomial);


/// Picks `num_ones + num_neg_ones` distinct positions in `[0, n)` with a partial
/// Fisher-Yates shuffle; the first `num_ones` become `+1`.
fn random_positions(
    rng: &mut impl CryptoRngCore, n: usize, num_ones: usize, num_neg_ones: usize,
) -> Result<(Vec<usize>, Vec<usize>), Error> {
    let total = num_ones + num_neg_ones;
    debug_assert!(total <= n, "random_positions: more nonzero coefficients than n");
    let mut idx: Vec<usize> = (0..n).collect();
    for k in 0..total {
        let j = k + random_below(rng, n - k)?;
        idx.swap(k, j);
    }
    let mut ones = idx[..num_ones].to_vec();
    let mut negative_ones = idx[num_ones..total].to_vec();
    idx.zeroize();
    ones.sort_unstable();
    negative_ones.sort_unstable();
    Ok((ones, negative_ones))
}


impl SparseTernaryPolynomial {
    /// Builds from explicit index lists; every index must be below `n` and the lists disjoint.
    ///
    /// # Errors
    /// Returns [`Error::MalformedEncoding`] on out-of-range or repeated indices.
    pub fn from_indices(
        n: usize, mut ones: Vec<usize>, mut negative_ones: Vec<usize>,
    ) -> Result<Self, Error> {
        ones.sort_unstable();
        negative_ones.sort_unstable();
        let mut seen = vec![false; n];
        for &i in ones.iter().chain(&negative_ones) {
            crate::helpers::ensure!(i < n, Error::MalformedEncoding("ternary index out of range"));
            crate::helpers::ensure!(!seen[i], Error::MalformedEncoding("repeated ternary index"));
            seen[i] = true;
        }
        Ok(SparseTernaryPolynomial { n, ones, negative_ones })
    }


    /// Random polynomial with exactly `num_ones` coefficients `+1` and `num_neg_ones` `-1`.
    ///
    /// # Errors
    /// Propagates [`Error::RandomSource`].
    pub fn generate_random(
        rng: &mut impl CryptoRngCore, n: usize, num_ones: usize, num_neg_ones: usize,
    ) -> Result<Self, Error> {
        let (ones, negative_ones) = random_positions(rng, n, num_ones, num_neg_ones)?;
        Ok(SparseTernaryPolynomial { n, ones, negative_ones })
    }


    /// Records the nonzero positions of a dense ternary polynomial.
    #[must_use]
    pub fn from_dense(p: &IntegerPolynomial) -> Self {
        let mut ones = Vec::new();
        let mut negative_ones = Vec::new();
        for (i, &c) in p.coeffs.iter().enumerate() {
            match c {
                1 => ones.push(i),
                -1 => negative_ones.push(i),
                _ => debug_assert_eq!(c, 0, "from_dense: not ternary"),
            }
        }
        SparseTernaryPolynomial { n: p.len(), ones, negative_ones }
    }


    /// Ring dimension.
    #[must_use]
    pub fn n(&self) -> usize { self.n }


    /// Sorted positions of the `+1` coefficients.
    #[must_use]
    pub fn ones(&self) -> &[usize] { &self.ones }


    /// Sorted positions of the `-1` coefficients.
    #[must_use]
    pub fn negative_ones(&self) -> &[usize] { &self.negative_ones }


    /// `self * b` over the integers; cost proportional to the number of nonzero coefficients.
    #[must_use]
    pub fn mult(&self, b: &IntegerPolynomial) -> IntegerPolynomial {
        debug_assert_eq!(self.n, b.len(), "sparse mult: ring dimension mismatch");
        let n = self.n;
        let mut c = vec![0i32; n];
        let mut accumulate = |positions: &[usize], sign: i32| {
            for &i in positions {
                // c += sign * X^i * b
                for (j, &bj) in b.coeffs.iter().enumerate() {
                    let k = if i + j >= n { i + j - n } else { i + j };
                    c[k] += sign * bj;
                }
            }
        };
        accumulate(&self.ones, 1);
        accumulate(&self.negative_ones, -1);
        IntegerPolynomial::from_coeffs(c)
    }


    /// `self * b` with coefficients reduced into `[0, modulus)`.
    #[must_use]
    pub fn mult_mod(&self, b: &IntegerPolynomial, modulus: i32) -> IntegerPolynomial {
        let mut c = self.mult(b);
        c.mod_positive(modulus);
        c
    }


    /// Expands to a dense polynomial.
    #[must_use]
    pub fn to_integer_polynomial(&self) -> IntegerPolynomial {
        let mut p = IntegerPolynomial::new(self.n);
        self.ones.iter().for_each(|&i| p.coeffs[i] = 1);
        self.negative_ones.iter().for_each(|&i| p.coeffs[i] = -1);
        p
    }
}


impl DenseTernaryPolynomial {
    /// Wraps a dense polynomial whose coefficients are all in `{-1, 0, 1}`.
    ///
    /// # Errors
    /// Returns [`Error::MalformedEncoding`] if a coefficient is outside `{-1, 0, 1}`.
    pub fn new(p: IntegerPolynomial) -> Result<Self, Error> {
        crate::helpers::ensure!(p.is_ternary(), Error::MalformedEncoding("non-ternary coefficient"));
        Ok(DenseTernaryPolynomial(p))
    }


    /// Wraps a polynomial the caller has built from `{-1, 0, 1}` only.
    pub(crate) fn from_ternary_unchecked(p: IntegerPolynomial) -> Self {
        debug_assert!(p.is_ternary(), "from_ternary_unchecked: not ternary");
        DenseTernaryPolynomial(p)
    }


    /// Random polynomial with exactly `num_ones` coefficients `+1` and `num_neg_ones` `-1`.
    ///
    /// # Errors
    /// Propagates [`Error::RandomSource`].
    pub fn generate_random(
        rng: &mut impl CryptoRngCore, n: usize, num_ones: usize, num_neg_ones: usize,
    ) -> Result<Self, Error> {
        let (ones, negative_ones) = random_positions(rng, n, num_ones, num_neg_ones)?;
        let mut p = IntegerPolynomial::new(n);
        ones.iter().for_each(|&i| p.coeffs[i] = 1);
        negative_ones.iter().for_each(|&i| p.coeffs[i] = -1);
        Ok(DenseTernaryPolynomial(p))
    }


    /// Ring dimension.
    #[must_use]
    pub fn n(&self) -> usize { self.0.len() }


    /// `self * b` over the integers.
    #[must_use]
    pub fn mult(&self, b: &IntegerPolynomial) -> IntegerPolynomial { self.0.mult(b) }


    /// `self * b` with coefficients reduced into `[0, modulus)`.
    #[must_use]
    pub fn mult_mod(&self, b: &IntegerPolynomial, modulus: i32) -> IntegerPolynomial {
        self.0.mult_mod(b, modulus)
    }


    /// Borrows the dense coefficients.
    #[must_use]
    pub fn as_integer_polynomial(&self) -> &IntegerPolynomial { &self.0 }


    /// Copies out the dense coefficients.
    #[must_use]
    pub fn to_integer_polynomial(&self) -> IntegerPolynomial { self.0.clone() }
}


#[cfg(test)]
mod tests {
    use super::*;
    use rand_chacha::rand_core::SeedableRng;

    #[test]
    fn test_random_counts() {
        let mut rng = rand_chacha::ChaCha8Rng::seed_from_u64(123);
        for _ in 0..20 {
            let s = SparseTernaryPolynomial::generate_random(&mut rng, 157, 29, 28).unwrap();
            let d = s.to_integer_polynomial();
            assert_eq!(d.count(1), 29);
            assert_eq!(d.count(-1), 28);
            assert_eq!(SparseTernaryPolynomial::from_dense(&d), s);
            let t = DenseTernaryPolynomial::generate_random(&mut rng, 157, 12, 11).unwrap();
            assert_eq!(t.as_integer_polynomial().count(1), 12);
            assert_eq!(t.as_integer_polynomial().count(-1), 11);
        }
    }

    #[test]
    fn test_sparse_mult_matches_dense() {
        let mut rng = rand_chacha::ChaCha8Rng::seed_from_u64(9);
        let s = SparseTernaryPolynomial::generate_random(&mut rng, 61, 10, 9).unwrap();
        let b = IntegerPolynomial::from_coeffs((0..61).map(|i| (i * 37 % 2048) - 1024).collect());
        assert_eq!(s.mult(&b), s.to_integer_polynomial().mult(&b));
        assert_eq!(s.mult_mod(&b, 2048), s.to_integer_polynomial().mult_mod(&b, 2048));
    }

    #[test]
    fn test_from_indices_rejects_duplicates() {
        assert!(SparseTernaryPolynomial::from_indices(5, vec![1, 2], vec![2]).is_err());
        assert!(SparseTernaryPolynomial::from_indices(5, vec![5], vec![]).is_err());
        let p = SparseTernaryPolynomial::from_indices(5, vec![3, 0], vec![4]).unwrap();
        assert_eq!(p.ones(), &[0, 3]);
        assert_eq!(p.to_integer_polynomial().coeffs, vec![1, 0, 0, 1, -1]);
        assert!(DenseTernaryPolynomial::new(IntegerPolynomial::from_coeffs(vec![2, 0])).is_err());
    }
}
