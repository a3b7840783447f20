use crate::error::Error;
use rand_core::CryptoRngCore;
#[cfg(feature = "default-rng")]
use rand_core::OsRng;


/// The `KeyGen` trait is implemented by the `KG` struct of the [`crate::ntru_encrypt`] and
/// [`crate::ntru_sign`] namespaces.
pub trait KeyGen {
    /// Parameter set type, e.g., [`crate::EncryptionParameters`]
    type Params;
    /// The public key bound to a parameter set
    type PublicKey;
    /// The private key bound to a parameter set
    type PrivateKey;

    /// Generates a public and private key pair for `params` using the OS default random
    /// number generator. Runs in variable time.
    /// # Errors
    /// Returns an error when the random number generator fails, or
    /// [`Error::InvalidParameters`] when the parameter set cannot generate keys.
    /// # Examples
    /// ```rust
    /// # use std::error::Error;
    /// # fn main() -> Result<(), Box<dyn Error>> {
    /// use ntru::ntru_encrypt;
    /// use ntru::traits::{Decryptor, Encryptor, KeyGen};
    ///
    /// let params = ntru::EncryptionParameters::APR2011_439_FAST;
    /// let (pk, sk) = ntru_encrypt::KG::try_keygen(&params)?;
    /// let ct = pk.try_encrypt(b"secret")?;
    /// assert_eq!(sk.try_decrypt(&ct)?, b"secret");
    /// # Ok(())}
    /// ```
    #[cfg(feature = "default-rng")]
    fn try_keygen(params: &Self::Params) -> Result<(Self::PublicKey, Self::PrivateKey), Error> {
        Self::try_keygen_with_rng(&mut OsRng, params)
    }

    /// Generates a public and private key pair for `params` using a supplied random number
    /// generator. Runs in variable time.
    /// # Errors
    /// Returns an error when the random number generator fails, or
    /// [`Error::InvalidParameters`] when the parameter set cannot generate keys.
    /// # Examples
    /// ```rust
    /// # use std::error::Error;
    /// # fn main() -> Result<(), Box<dyn Error>> {
    /// use ntru::ntru_sign;
    /// use ntru::traits::{KeyGen, Signer, Verifier};
    /// use rand_chacha::rand_core::SeedableRng;
    ///
    /// let mut rng = rand_chacha::ChaCha8Rng::seed_from_u64(123);
    /// let params = ntru::SigningParameters::TEST157;
    /// let (pk, sk) = ntru_sign::KG::try_keygen_with_rng(&mut rng, &params)?;
    /// let sig = sk.try_sign(b"hello")?;
    /// assert!(pk.try_verify(b"hello", &sig)?);
    /// # Ok(())}
    /// ```
    fn try_keygen_with_rng(
        rng: &mut impl CryptoRngCore, params: &Self::Params,
    ) -> Result<(Self::PublicKey, Self::PrivateKey), Error>;
}


/// The `Encryptor` trait is implemented for the NTRUEncrypt public key.
pub trait Encryptor {
    /// Encrypts `message` using the OS default random number generator.
    /// # Errors
    /// Returns [`Error::MessageTooLong`] when the message exceeds the parameter set's limit,
    /// or an error when the random number generator fails.
    #[cfg(feature = "default-rng")]
    fn try_encrypt(&self, message: &[u8]) -> Result<Vec<u8>, Error> {
        self.try_encrypt_with_rng(&mut OsRng, message)
    }

    /// Encrypts `message` using a supplied random number generator.
    /// # Errors
    /// Returns [`Error::MessageTooLong`] when the message exceeds the parameter set's limit,
    /// or an error when the random number generator fails.
    /// # Examples
    /// ```rust
    /// # use std::error::Error;
    /// # fn main() -> Result<(), Box<dyn Error>> {
    /// use ntru::ntru_encrypt;
    /// use ntru::traits::{Decryptor, Encryptor, KeyGen};
    /// use rand_chacha::rand_core::SeedableRng;
    ///
    /// let mut rng = rand_chacha::ChaCha8Rng::seed_from_u64(123);
    /// let params = ntru::EncryptionParameters::TEST157;
    /// let (pk, sk) = ntru_encrypt::KG::try_keygen_with_rng(&mut rng, &params)?;
    /// let ct = pk.try_encrypt_with_rng(&mut rng, &[0x41, 0x42, 0x43])?;
    /// assert_eq!(sk.try_decrypt(&ct)?, [0x41, 0x42, 0x43]);
    /// # Ok(())}
    /// ```
    fn try_encrypt_with_rng(&self, rng: &mut impl CryptoRngCore, message: &[u8]) -> Result<Vec<u8>, Error>;
}


/// The `Decryptor` trait is implemented for the NTRUEncrypt private key.
pub trait Decryptor {
    /// Decrypts `ciphertext`. Runs in variable time.
    /// # Errors
    /// Returns [`Error::InvalidCiphertext`] for any malformed or tampered ciphertext.
    fn try_decrypt(&self, ciphertext: &[u8]) -> Result<Vec<u8>, Error>;
}


/// The `Signer` trait is implemented for the NTRUSign private key.
pub trait Signer {
    /// The signature type
    type Signature;

    /// Signs `message`. Signing is deterministic: the same key and message give the same signature.
    /// # Errors
    /// Returns [`Error::SigningFailed`] when no representative met the norm bound within the
    /// parameter set's retry limit.
    fn try_sign(&self, message: &[u8]) -> Result<Self::Signature, Error>;
}


/// The `Verifier` trait is implemented for the NTRUSign public key.
pub trait Verifier {
    /// The signature type
    type Signature;

    /// Verifies `signature` on `message`, returning `Ok(false)` for an invalid signature.
    /// # Errors
    /// Returns an error when the signature does not match the key's ring dimension.
    fn try_verify(&self, message: &[u8], signature: &Self::Signature) -> Result<bool, Error>;
}


/// The `SerDes` trait provides for serialization and deserialization of keys and signatures.
pub trait SerDes: Sized {
    /// Parameter set needed to interpret the bytes
    type Params;

    /// Produces the byte encoding.
    fn to_bytes(&self) -> Vec<u8>;

    /// Parses and validates the byte encoding for `params`.
    /// # Errors
    /// Returns [`Error::MalformedEncoding`] for a wrong length or out-of-range content.
    /// # Examples
    /// ```rust
    /// # use std::error::Error;
    /// # fn main() -> Result<(), Box<dyn Error>> {
    /// use ntru::ntru_encrypt;
    /// use ntru::traits::{KeyGen, SerDes};
    /// use rand_chacha::rand_core::SeedableRng;
    ///
    /// let mut rng = rand_chacha::ChaCha8Rng::seed_from_u64(123);
    /// let params = ntru::EncryptionParameters::TEST157;
    /// let (pk, _sk) = ntru_encrypt::KG::try_keygen_with_rng(&mut rng, &params)?;
    /// let bytes = pk.to_bytes();
    /// let pk2 = ntru_encrypt::PublicKey::try_from_bytes(&params, &bytes)?;
    /// assert_eq!(pk, pk2);
    /// # Ok(())}
    /// ```
    fn try_from_bytes(params: &Self::Params, bytes: &[u8]) -> Result<Self, Error>;
}
