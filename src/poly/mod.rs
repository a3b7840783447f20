//! Polynomial arithmetic in `Z[X]/(X^n - 1)`.
//!
//! The private key polynomials come in several representations with very different
//! multiplication costs; [`Polynomial`] unifies them behind one tagged enum so the
//! engines can multiply by a key without caring how it is stored.

pub(crate) mod bigint;
pub(crate) mod field;
pub(crate) mod integer;
pub(crate) mod product_form;
pub(crate) mod resultant;
pub(crate) mod ternary;

pub use bigint::{BigDecimalPolynomial, BigIntPolynomial};
pub use integer::IntegerPolynomial;
pub use product_form::ProductFormPolynomial;
pub use resultant::{extended_gcd, resultant, resultant_mod, ModularResultant, Resultant};
pub use ternary::{DenseTernaryPolynomial, SparseTernaryPolynomial};

use crate::error::Error;
use rand_core::CryptoRngCore;
use zeroize::Zeroize;


/// Any of the polynomial representations used for keys and blinding values.
#[derive(Clone, Debug, PartialEq, Eq, Zeroize)]
pub enum Polynomial {
    /// Arbitrary integer coefficients
    Dense(IntegerPolynomial),
    /// Coefficients in `{-1, 0, 1}` stored densely
    DenseTernary(DenseTernaryPolynomial),
    /// Coefficients in `{-1, 0, 1}` stored as index lists
    SparseTernary(SparseTernaryPolynomial),
    /// `f1*f2 + f3` with sparse ternary factors
    ProductForm(ProductFormPolynomial),
}


impl Polynomial {
    /// Random ternary polynomial with the given counts, sparse or dense as requested.
    ///
    /// # Errors
    /// Propagates [`Error::RandomSource`].
    pub fn random_ternary(
        rng: &mut impl CryptoRngCore, n: usize, num_ones: usize, num_neg_ones: usize, sparse: bool,
    ) -> Result<Self, Error> {
        if sparse {
            Ok(Polynomial::SparseTernary(SparseTernaryPolynomial::generate_random(
                rng,
                n,
                num_ones,
                num_neg_ones,
            )?))
        } else {
            Ok(Polynomial::DenseTernary(DenseTernaryPolynomial::generate_random(
                rng,
                n,
                num_ones,
                num_neg_ones,
            )?))
        }
    }


    /// Ring dimension.
    #[must_use]
    pub fn n(&self) -> usize {
        match self {
            Polynomial::Dense(p) => p.len(),
            Polynomial::DenseTernary(p) => p.n(),
            Polynomial::SparseTernary(p) => p.n(),
            Polynomial::ProductForm(p) => p.n(),
        }
    }


    /// `self * b` over the integers.
    #[must_use]
    pub fn mult(&self, b: &IntegerPolynomial) -> IntegerPolynomial {
        match self {
            Polynomial::Dense(p) => p.mult(b),
            Polynomial::DenseTernary(p) => p.mult(b),
            Polynomial::SparseTernary(p) => p.mult(b),
            Polynomial::ProductForm(p) => p.mult(b),
        }
    }


    /// `self * b` with coefficients reduced into `[0, modulus)`.
    #[must_use]
    pub fn mult_mod(&self, b: &IntegerPolynomial, modulus: i32) -> IntegerPolynomial {
        match self {
            Polynomial::Dense(p) => p.mult_mod(b, modulus),
            Polynomial::DenseTernary(p) => p.mult_mod(b, modulus),
            Polynomial::SparseTernary(p) => p.mult_mod(b, modulus),
            Polynomial::ProductForm(p) => p.mult_mod(b, modulus),
        }
    }


    /// Dense coefficients of this polynomial.
    #[must_use]
    pub fn to_integer_polynomial(&self) -> IntegerPolynomial {
        match self {
            Polynomial::Dense(p) => p.clone(),
            Polynomial::DenseTernary(p) => p.to_integer_polynomial(),
            Polynomial::SparseTernary(p) => p.to_integer_polynomial(),
            Polynomial::ProductForm(p) => p.to_integer_polynomial(),
        }
    }


    /// `self + b` as a dense polynomial.
    #[must_use]
    pub fn add(&self, b: &IntegerPolynomial) -> IntegerPolynomial {
        let mut c = self.to_integer_polynomial();
        c.add(b);
        c
    }


    /// `self - b` as a dense polynomial.
    #[must_use]
    pub fn sub(&self, b: &IntegerPolynomial) -> IntegerPolynomial {
        let mut c = self.to_integer_polynomial();
        c.sub(b);
        c
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use rand_chacha::rand_core::SeedableRng;

    #[test]
    fn test_representations_agree() {
        let mut rng = rand_chacha::ChaCha8Rng::seed_from_u64(5);
        let b = IntegerPolynomial::from_coeffs((0..157).map(|i| (i * 13) % 256).collect());
        let sparse = Polynomial::random_ternary(&mut rng, 157, 20, 19, true).unwrap();
        let dense = Polynomial::Dense(sparse.to_integer_polynomial());
        let dense_ternary = Polynomial::DenseTernary(
            DenseTernaryPolynomial::new(sparse.to_integer_polynomial()).unwrap(),
        );
        let product = Polynomial::ProductForm(
            ProductFormPolynomial::generate_random(&mut rng, 157, 5, 5, 8, 8).unwrap(),
        );
        for p in [&sparse, &dense_ternary, &product] {
            let expanded = Polynomial::Dense(p.to_integer_polynomial());
            assert_eq!(p.mult(&b), expanded.mult(&b));
            assert_eq!(p.mult_mod(&b, 256), expanded.mult_mod(&b, 256));
        }
        assert_eq!(sparse.mult(&b), dense.mult(&b));
        let mut round_trip = sparse.add(&b);
        round_trip.sub(&b);
        assert_eq!(round_trip, sparse.to_integer_polynomial());
        assert_eq!(product.n(), 157);
    }
}
