use crate::error::Error;
use crate::poly::integer::IntegerPolynomial;
use crate::poly::ternary::SparseTernaryPolynomial;
use rand_core::CryptoRngCore;
use zeroize::Zeroize;


/// A ternary-derived polynomial of the form `f1*f2 + f3`, with each factor sparse.
///
/// Multiplying by a dense polynomial costs three sparse multiplications and one
/// addition instead of a full convolution.
#[derive(Clone, Debug, PartialEq, Eq, Zeroize)]
pub struct ProductFormPolynomial {
    pub(crate) f1: SparseTernaryPolynomial,
    pub(crate) f2: SparseTernaryPolynomial,
    pub(crate) f3: SparseTernaryPolynomial,
}


impl ProductFormPolynomial {
    /// Assembles the three factors, which must share a ring dimension.
    #[must_use]
    pub fn new(
        f1: SparseTernaryPolynomial, f2: SparseTernaryPolynomial, f3: SparseTernaryPolynomial,
    ) -> Self {
        debug_assert!(f1.n() == f2.n() && f2.n() == f3.n(), "product form: dimension mismatch");
        ProductFormPolynomial { f1, f2, f3 }
    }


    /// Random product-form polynomial; `f1` and `f2` carry `df1`/`df2` ones and minus-ones,
    /// `f3` carries `df3_ones` ones and `df3_neg_ones` minus-ones.
    ///
    /// # Errors
    /// Propagates [`Error::RandomSource`].
    pub fn generate_random(
        rng: &mut impl CryptoRngCore, n: usize, df1: usize, df2: usize, df3_ones: usize,
        df3_neg_ones: usize,
    ) -> Result<Self, Error> {
        let f1 = SparseTernaryPolynomial::generate_random(rng, n, df1, df1)?;
        let f2 = SparseTernaryPolynomial::generate_random(rng, n, df2, df2)?;
        let f3 = SparseTernaryPolynomial::generate_random(rng, n, df3_ones, df3_neg_ones)?;
        Ok(ProductFormPolynomial { f1, f2, f3 })
    }


    /// Ring dimension.
    #[must_use]
    pub fn n(&self) -> usize { self.f1.n() }


    /// `(f1*f2 + f3) * b = f1*(f2*b) + f3*b` over the integers.
    #[must_use]
    pub fn mult(&self, b: &IntegerPolynomial) -> IntegerPolynomial {
        let mut c = self.f1.mult(&self.f2.mult(b));
        c.add(&self.f3.mult(b));
        c
    }


    /// `self * b` with coefficients reduced into `[0, modulus)`.
    #[must_use]
    pub fn mult_mod(&self, b: &IntegerPolynomial, modulus: i32) -> IntegerPolynomial {
        let mut c = self.f2.mult_mod(b, modulus);
        c = self.f1.mult_mod(&c, modulus);
        c.add_mod(&self.f3.mult(b), modulus);
        c
    }


    /// Expands `f1*f2 + f3` to a dense polynomial.
    #[must_use]
    pub fn to_integer_polynomial(&self) -> IntegerPolynomial {
        let mut c = self.f1.mult(&self.f2.to_integer_polynomial());
        c.add(&self.f3.to_integer_polynomial());
        c
    }


    /// The three factors in order.
    #[must_use]
    pub fn factors(&self) -> (&SparseTernaryPolynomial, &SparseTernaryPolynomial, &SparseTernaryPolynomial) {
        (&self.f1, &self.f2, &self.f3)
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use rand_chacha::rand_core::SeedableRng;

    #[test]
    fn test_mult_matches_expanded() {
        let mut rng = rand_chacha::ChaCha8Rng::seed_from_u64(42);
        for _ in 0..10 {
            let f = ProductFormPolynomial::generate_random(&mut rng, 157, 5, 5, 8, 7).unwrap();
            let b = IntegerPolynomial::from_coeffs((0..157).map(|i| (i * 91 + 7) % 256).collect());
            let dense = f.to_integer_polynomial();
            assert_eq!(f.mult(&b), dense.mult(&b));
            assert_eq!(f.mult_mod(&b, 256), dense.mult_mod(&b, 256));
        }
    }

    #[test]
    fn test_expanded_sum() {
        let mut rng = rand_chacha::ChaCha8Rng::seed_from_u64(1);
        let f = ProductFormPolynomial::generate_random(&mut rng, 101, 3, 4, 6, 5).unwrap();
        // f(1) = f1(1)·f2(1) + f3(1) = 0·0 + 1
        assert_eq!(f.to_integer_polynomial().sum_coeffs(), 1);
    }
}
