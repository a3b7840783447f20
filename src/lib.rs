#![deny(unsafe_code)]
#![warn(clippy::pedantic, missing_docs)]
// Almost all of the 'allow' category...
#![warn(absolute_paths_not_starting_with_crate, dead_code)]
#![warn(elided_lifetimes_in_paths, explicit_outlives_requirements, keyword_idents)]
#![warn(let_underscore_drop, macro_use_extern_crate, meta_variable_misuse, missing_abi)]
#![warn(non_ascii_idents, rust_2021_incompatible_closure_captures)]
#![warn(rust_2021_incompatible_or_patterns, rust_2021_prefixes_incompatible_syntax)]
#![warn(rust_2021_prelude_collisions, single_use_lifetimes, trivial_casts)]
#![warn(trivial_numeric_casts, unreachable_pub, unsafe_op_in_unsafe_fn, unstable_features)]
#![warn(unused_extern_crates, unused_import_braces, unused_lifetimes, unused_macro_rules)]
#![warn(unused_qualifications)]
#![allow(clippy::module_name_repetitions, clippy::many_single_char_names, clippy::similar_names)]
//
#![doc = include_str!("../README.md")]


// Implements NTRUEncrypt (SVES) per IEEE P1363.1 and NTRUSign with perturbations.
// See <https://grouper.ieee.org/groups/1363/lattPK/> and the APR2011 parameter paper
// <https://eprint.iacr.org/2011/198>.

// Functionality map
//
// Polynomial ring Z[X]/(X^n - 1), inversion mod 3 and mod q    --> poly/integer.rs, poly/field.rs
// Sparse, dense and product-form ternary polynomials           --> poly/ternary.rs, poly/product_form.rs
// Resultants and extended gcd over the integers                --> poly/resultant.rs, poly/bigint.rs
// Mod-q, tight ternary, sparse index and SVES bit packing      --> conversion.rs
// IGF-2 index generation, blinding polynomial, MGF-TP-1        --> hashing.rs
// NTRUSign message representative and counter-mode PRNG        --> hashing.rs
// Parameter sets, presets and their byte streams               --> params.rs
// NTRUEncrypt key generation, encryption, decryption           --> encrypt.rs
// NTRUSign basis generation, signing, verification             --> sign.rs
// Key, ciphertext and signature encodings                      --> encodings.rs
// Types are in types.rs, traits are in traits.rs, errors are in error.rs

// Note that debug_assert! statements enforce correct program construction and are not involved
// in any operational dataflow. The ensure! statements implement dataflow validation of
// untrusted input and do not panic. Nothing here runs in constant time.

/// The `rand_core` types are re-exported so that users of ntru do not
/// have to worry about using the exact correct version of `rand_core`.
pub use rand_core::{CryptoRng, Error as RngError, RngCore};

mod conversion;
mod encodings;
mod encrypt;
mod error;
mod hashing;
mod helpers;
mod params;
mod sign;
mod types;

/// Polynomial arithmetic used by both schemes; exposed for inspection and testing.
pub mod poly;

/// All functionality is covered by traits, such that consumers can utilize trait objects as desired.
pub mod traits;

pub use crate::error::Error;
pub use crate::hashing::HashAlg;
pub use crate::params::{BasisType, EncryptionParameters, KeyGenAlg, PolyType, SigningParameters};
pub use crate::types::{
    Basis, EncryptionPrivateKey, EncryptionPublicKey, Signature, SigningPrivateKey, SigningPublicKey,
};


/// NTRUEncrypt: public-key encryption of short messages.
///
/// # Examples
/// ```rust
/// # use std::error::Error;
/// # fn main() -> Result<(), Box<dyn Error>> {
/// use ntru::ntru_encrypt;
/// use ntru::traits::{Decryptor, Encryptor, SerDes};
/// use rand_chacha::rand_core::SeedableRng;
///
/// let mut rng = rand_chacha::ChaCha8Rng::seed_from_u64(123);
/// let params = ntru::EncryptionParameters::TEST157;
/// let (pk, sk) = ntru_encrypt::try_keygen_with_rng(&mut rng, &params)?;
/// let ct = pk.try_encrypt_with_rng(&mut rng, b"abc")?;
/// let sk_bytes = sk.to_bytes();
/// let sk2 = ntru_encrypt::PrivateKey::try_from_bytes(&params, &sk_bytes)?;
/// assert_eq!(sk2.try_decrypt(&ct)?, b"abc");
/// # Ok(())}
/// ```
pub mod ntru_encrypt {
    use crate::error::Error;
    use crate::params::EncryptionParameters;
    use crate::traits::KeyGen;
    use rand_core::CryptoRngCore;


    /// Empty struct to enable `KeyGen` trait objects. Implements the [`crate::traits::KeyGen`] trait.
    pub struct KG;


    /// NTRUEncrypt public key. Implements the [`crate::traits::Encryptor`] and
    /// [`crate::traits::SerDes`] traits.
    pub type PublicKey = crate::types::EncryptionPublicKey;


    /// NTRUEncrypt private key. Implements the [`crate::traits::Decryptor`] and
    /// [`crate::traits::SerDes`] traits.
    // Note: #[derive(Zeroize, ZeroizeOnDrop)] is implemented on the underlying struct.
    pub type PrivateKey = crate::types::EncryptionPrivateKey;


    /// Generates a key pair for `params` with the OS default random number generator.
    /// # Errors
    /// Returns an error when the random number generator fails.
    #[cfg(feature = "default-rng")]
    pub fn try_keygen(params: &EncryptionParameters) -> Result<(PublicKey, PrivateKey), Error> {
        KG::try_keygen(params)
    }


    /// Generates a key pair for `params` with the supplied random number generator.
    /// # Errors
    /// Returns an error when the random number generator fails.
    pub fn try_keygen_with_rng(
        rng: &mut impl CryptoRngCore, params: &EncryptionParameters,
    ) -> Result<(PublicKey, PrivateKey), Error> {
        KG::try_keygen_with_rng(rng, params)
    }


    impl KeyGen for KG {
        type Params = EncryptionParameters;
        type PrivateKey = PrivateKey;
        type PublicKey = PublicKey;

        fn try_keygen_with_rng(
            rng: &mut impl CryptoRngCore, params: &EncryptionParameters,
        ) -> Result<(PublicKey, PrivateKey), Error> {
            crate::encrypt::key_gen(rng, params)
        }
    }
}


/// NTRUSign: deterministic signatures with perturbation bases.
///
/// # Examples
/// ```rust
/// # use std::error::Error;
/// # fn main() -> Result<(), Box<dyn Error>> {
/// use ntru::ntru_sign;
/// use ntru::traits::{SerDes, Signer, Verifier};
/// use rand_chacha::rand_core::SeedableRng;
///
/// let mut rng = rand_chacha::ChaCha8Rng::seed_from_u64(123);
/// let params = ntru::SigningParameters::TEST157;
/// let (pk, sk) = ntru_sign::try_keygen_with_rng(&mut rng, &params)?;
/// let sig = sk.try_sign(b"hello")?;
/// let sig2 = ntru_sign::Signature::try_from_bytes(&params, &sig.to_bytes())?;
/// assert!(pk.try_verify(b"hello", &sig2)?);
/// # Ok(())}
/// ```
pub mod ntru_sign {
    use crate::error::Error;
    use crate::params::SigningParameters;
    use crate::traits::KeyGen;
    use rand_core::CryptoRngCore;


    /// Empty struct to enable `KeyGen` trait objects. Implements the [`crate::traits::KeyGen`] trait.
    pub struct KG;


    /// NTRUSign public key. Implements the [`crate::traits::Verifier`] and
    /// [`crate::traits::SerDes`] traits.
    pub type PublicKey = crate::types::SigningPublicKey;


    /// NTRUSign private key holding all bases. Implements the [`crate::traits::Signer`] and
    /// [`crate::traits::SerDes`] traits.
    // Note: #[derive(Zeroize, ZeroizeOnDrop)] is implemented on the underlying struct.
    pub type PrivateKey = crate::types::SigningPrivateKey;


    /// NTRUSign signature. Implements the [`crate::traits::SerDes`] trait.
    pub type Signature = crate::types::Signature;


    /// Generates a key pair for `params` with the OS default random number generator.
    /// Bases are generated in parallel when the `parallel` feature is enabled.
    /// # Errors
    /// Returns an error when the random number generator fails.
    #[cfg(feature = "default-rng")]
    pub fn try_keygen(params: &SigningParameters) -> Result<(PublicKey, PrivateKey), Error> {
        KG::try_keygen(params)
    }


    /// Generates a key pair for `params` with the supplied random number generator.
    /// # Errors
    /// Returns an error when the random number generator fails.
    pub fn try_keygen_with_rng(
        rng: &mut impl CryptoRngCore, params: &SigningParameters,
    ) -> Result<(PublicKey, PrivateKey), Error> {
        KG::try_keygen_with_rng(rng, params)
    }


    impl KeyGen for KG {
        type Params = SigningParameters;
        type PrivateKey = PrivateKey;
        type PublicKey = PublicKey;

        fn try_keygen_with_rng(
            rng: &mut impl CryptoRngCore, params: &SigningParameters,
        ) -> Result<(PublicKey, PrivateKey), Error> {
            crate::sign::key_gen(rng, params)
        }
    }
}
