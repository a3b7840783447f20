use thiserror::Error;


/// Errors surfaced by key generation, encryption, decryption, signing and the
/// (de)serialization routines.
///
/// Decryption failures are deliberately collapsed into a single
/// [`Error::InvalidCiphertext`] variant so that the caller cannot tell which
/// integrity check rejected the ciphertext.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum Error {
    /// The plaintext exceeds `maxMsgLenBytes` of the parameter set.
    #[error("message too long: {len} > {max}")]
    MessageTooLong {
        /// Supplied message length in bytes
        len: usize,
        /// Maximum message length of the parameter set
        max: usize,
    },

    /// The ciphertext failed a decryption integrity check.
    #[error("invalid ciphertext")]
    InvalidCiphertext,

    /// No message representative produced a signature within the norm bound.
    #[error("signing failed: too many retries (max={attempts})")]
    SigningFailed {
        /// The configured `signFailTolerance`
        attempts: u32,
    },

    /// A persisted parameter set names an unknown hash algorithm or enum value.
    #[error("unsupported parameter encoding: {0}")]
    UnsupportedParameterEncoding(String),

    /// A parameter set cannot be used by the requested operation.
    #[error("invalid parameters: {0}")]
    InvalidParameters(&'static str),

    /// A key, signature, ciphertext or parameter byte string is malformed.
    #[error("malformed encoding: {0}")]
    MalformedEncoding(&'static str),

    /// The caller-supplied random number generator failed.
    #[error("random number generator failed")]
    RandomSource,
}
