use core::fmt;

use crate::params::{EncryptionParameters, SigningParameters};
use crate::poly::{IntegerPolynomial, Polynomial};
use zeroize::{Zeroize, ZeroizeOnDrop};


/// NTRUEncrypt public key `h = 3·g·fq mod q`, bound to its parameter set. <br>
/// Implements the [`crate::traits::Encryptor`] and [`crate::traits::SerDes`] traits.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EncryptionPublicKey {
    pub(crate) params: EncryptionParameters,
    pub(crate) h: IntegerPolynomial,
}


/// NTRUEncrypt private key: the secret `t` (with `f = t` or `f = 1 + 3t`), its inverse
/// `fp` mod 3 and the public `h`. <br>
/// Implements the [`crate::traits::Decryptor`] and [`crate::traits::SerDes`] traits.
#[derive(Clone, PartialEq, Eq, Zeroize, ZeroizeOnDrop)]
pub struct EncryptionPrivateKey {
    #[zeroize(skip)]
    pub(crate) params: EncryptionParameters,
    pub(crate) t: Polynomial,
    pub(crate) fp: IntegerPolynomial,
    pub(crate) h: IntegerPolynomial,
}


/// NTRUSign public key `h`, bound to its parameter set. <br>
/// Implements the [`crate::traits::Verifier`] and [`crate::traits::SerDes`] traits.
#[derive(Clone, Debug, PartialEq)]
pub struct SigningPublicKey {
    pub(crate) params: SigningParameters,
    pub(crate) h: IntegerPolynomial,
}


/// One layer of the signing lattice: the short vector `f`, its partner `f′`
/// (`F` for a standard basis, `g` for a transpose basis) and the layer's `h`.
#[derive(Clone, PartialEq, Eq, Zeroize)]
pub struct Basis {
    pub(crate) f: Polynomial,
    pub(crate) f_prime: Polynomial,
    pub(crate) h: IntegerPolynomial,
}


/// NTRUSign private key: bases `0..=B`, where basis 0 belongs to the public key. <br>
/// Implements the [`crate::traits::Signer`] and [`crate::traits::SerDes`] traits.
#[derive(Clone, PartialEq, Zeroize, ZeroizeOnDrop)]
pub struct SigningPrivateKey {
    #[zeroize(skip)]
    pub(crate) params: SigningParameters,
    pub(crate) bases: Vec<Basis>,
}


/// NTRUSign signature: the lattice point `s` in `[0, q)` and the retry counter `r`
/// that produced the accepted message representative. <br>
/// Implements the [`crate::traits::SerDes`] trait.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Signature {
    pub(crate) s: IntegerPolynomial,
    pub(crate) r: u32,
    pub(crate) q: i32,
}


impl EncryptionPublicKey {
    /// Parameter set this key belongs to.
    #[must_use]
    pub fn params(&self) -> &EncryptionParameters { &self.params }

    /// The public polynomial `h`.
    #[must_use]
    pub fn h(&self) -> &IntegerPolynomial { &self.h }
}


impl EncryptionPrivateKey {
    /// Parameter set this key belongs to.
    #[must_use]
    pub fn params(&self) -> &EncryptionParameters { &self.params }

    /// The secret polynomial `t`.
    #[must_use]
    pub fn t(&self) -> &Polynomial { &self.t }

    /// The full private polynomial `f`: `t`, or `1 + 3t` for `fast_fp` parameter sets.
    #[must_use]
    pub fn f(&self) -> IntegerPolynomial {
        let mut f = self.t.to_integer_polynomial();
        if self.params.fast_fp {
            f.mult_scalar(3);
            f.coeffs[0] += 1;
        }
        f
    }

    /// Public key matching this private key.
    #[must_use]
    pub fn public_key(&self) -> EncryptionPublicKey {
        EncryptionPublicKey { params: self.params.clone(), h: self.h.clone() }
    }
}


impl SigningPublicKey {
    /// Parameter set this key belongs to.
    #[must_use]
    pub fn params(&self) -> &SigningParameters { &self.params }

    /// The public polynomial `h`.
    #[must_use]
    pub fn h(&self) -> &IntegerPolynomial { &self.h }
}


impl Basis {
    /// The short polynomial `f`.
    #[must_use]
    pub fn f(&self) -> &Polynomial { &self.f }

    /// `F` (standard basis) or `g` (transpose basis).
    #[must_use]
    pub fn f_prime(&self) -> &Polynomial { &self.f_prime }

    /// This layer's `h` in `[0, q)`.
    #[must_use]
    pub fn h(&self) -> &IntegerPolynomial { &self.h }
}


impl SigningPrivateKey {
    /// Parameter set this key belongs to.
    #[must_use]
    pub fn params(&self) -> &SigningParameters { &self.params }

    /// All bases; index 0 is the public basis.
    #[must_use]
    pub fn bases(&self) -> &[Basis] { &self.bases }

    /// Public key matching this private key.
    #[must_use]
    pub fn public_key(&self) -> SigningPublicKey {
        SigningPublicKey { params: self.params.clone(), h: self.bases[0].h.clone() }
    }
}


// Secret coefficients stay out of debug output.
impl fmt::Debug for EncryptionPrivateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EncryptionPrivateKey").field("params", &self.params).finish_non_exhaustive()
    }
}


impl fmt::Debug for SigningPrivateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SigningPrivateKey")
            .field("params", &self.params)
            .field("bases", &self.bases.len())
            .finish_non_exhaustive()
    }
}


impl Signature {
    /// The signature polynomial `s` in `[0, q)`.
    #[must_use]
    pub fn s(&self) -> &IntegerPolynomial { &self.s }

    /// The retry counter mixed into the message representative.
    #[must_use]
    pub fn r(&self) -> u32 { self.r }
}
