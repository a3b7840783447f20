//! Parameter sets for NTRUEncrypt and NTRUSign.
//!
//! A parameter set is immutable configuration: the named presets below are
//! associated constants, `by_name` looks them up at runtime, and `to_bytes` /
//! `from_bytes` persist any set in a big-endian stream format.

use crate::error::Error;
use crate::hashing::HashAlg;
use crate::helpers::{ensure, ByteReader, ByteWriter};
use crate::poly::resultant::is_prime;


/// Whether private key and blinding polynomials are simple ternary or product form.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PolyType {
    /// A single ternary polynomial
    Simple,
    /// `f1*f2 + f3` with three sparse ternary factors
    Product,
}


impl PolyType {
    fn to_byte(self) -> u8 {
        match self {
            PolyType::Simple => 0,
            PolyType::Product => 1,
        }
    }

    fn from_byte(b: u8) -> Result<Self, Error> {
        match b {
            0 => Ok(PolyType::Simple),
            1 => Ok(PolyType::Product),
            other => Err(Error::UnsupportedParameterEncoding(format!("polynomial type {other}"))),
        }
    }
}


/// Which polynomials of an NTRUSign basis are published: `(f, F, g·fq)` or `(f, g, F·fq)`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum BasisType {
    /// Standard basis, `h = g·f^{-1}`
    Standard,
    /// Transpose basis, `h = F·f^{-1}`
    Transpose,
}


/// How NTRUSign key generation reduces the completed basis.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum KeyGenAlg {
    /// Exact reduction through the resultant of `f·f̄ + g·ḡ`
    Resultant,
    /// Fixed-point approximation of `f^{-1}` and `g^{-1}`
    Float,
}


/// NTRUEncrypt parameters, including the values derived from `n` and `db`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EncryptionParameters {
    /// Ring dimension
    pub n: usize,
    /// Large modulus, a power of two
    pub q: i32,
    /// Number of ones (and minus ones) in the private polynomial, simple form
    pub df: usize,
    /// Product-form weights
    pub df1: usize,
    /// Product-form weights
    pub df2: usize,
    /// Product-form weights
    pub df3: usize,
    /// Blinding polynomial weight, simple form
    pub dr: usize,
    /// Blinding polynomial weights, product form
    pub dr1: usize,
    /// Blinding polynomial weights, product form
    pub dr2: usize,
    /// Blinding polynomial weights, product form
    pub dr3: usize,
    /// Number of ones in `g`; `g` has one fewer minus one
    pub dg: usize,
    /// Length in bytes of the encoded message length
    pub llen: usize,
    /// Longest message that fits in one ciphertext
    pub max_msg_len_bytes: usize,
    /// Number of random bits prepended to the message
    pub db: usize,
    /// Size of the SVES message buffer in bits
    pub buffer_len_bits: usize,
    /// Number of trits produced from the message buffer
    pub buffer_len_trits: usize,
    /// Minimum count of each of `-1, 0, 1` in the masked message
    pub dm0: usize,
    /// Bits of the public key mixed into the blinding seed
    pub pk_len: usize,
    /// Bits per index candidate in the index generator
    pub c: u32,
    /// Initial hash calls of the index generator
    pub min_calls_r: u32,
    /// Initial hash calls of the mask generator
    pub min_calls_mask: u32,
    /// Whether the mask generator pre-hashes its seed
    pub hash_seed: bool,
    /// Parameter set identifier mixed into the blinding seed
    pub oid: [u8; 3],
    /// Store ternary polynomials as index lists
    pub sparse: bool,
    /// Private key is `f = 1 + 3t`, which makes `f^{-1} mod 3 = 1`
    pub fast_fp: bool,
    /// Simple or product-form private key
    pub poly_type: PolyType,
    /// Hash algorithm for the index and mask generators
    pub hash_alg: HashAlg,
}


impl EncryptionParameters {
    /// 439-dimensional set, simple form, approximately 128-bit security
    pub const APR2011_439: Self =
        Self::new(439, 2048, 146, 130, 128, 9, 32, 9, true, [0, 7, 101], true, false, HashAlg::Sha256);
    /// 439-dimensional set, product form with `f = 1 + 3t`
    pub const APR2011_439_FAST: Self = Self::new_product(
        439, 2048, 9, 8, 5, 130, 128, 9, 32, 9, true, [0, 7, 101], true, true, HashAlg::Sha256,
    );
    /// 743-dimensional set, simple form, approximately 256-bit security
    pub const APR2011_743: Self =
        Self::new(743, 2048, 248, 220, 256, 10, 27, 14, true, [0, 7, 105], false, false, HashAlg::Sha512);
    /// 743-dimensional set, product form with `f = 1 + 3t`
    pub const APR2011_743_FAST: Self = Self::new_product(
        743, 2048, 11, 11, 15, 220, 256, 10, 27, 14, true, [0, 7, 105], false, true, HashAlg::Sha512,
    );
    /// IEEE 1363.1 EES1087EP2
    pub const EES1087EP2: Self =
        Self::new(1087, 2048, 120, 120, 256, 13, 25, 14, true, [0, 6, 3], true, false, HashAlg::Sha512);
    /// IEEE 1363.1 EES1171EP1
    pub const EES1171EP1: Self =
        Self::new(1171, 2048, 106, 106, 256, 13, 20, 15, true, [0, 6, 4], true, false, HashAlg::Sha512);
    /// IEEE 1363.1 EES1499EP1
    pub const EES1499EP1: Self =
        Self::new(1499, 2048, 79, 79, 256, 13, 17, 19, true, [0, 6, 5], true, false, HashAlg::Sha512);
    /// Small insecure set for fast tests
    pub const TEST157: Self =
        Self::new(157, 256, 12, 35, 64, 9, 2, 2, true, [0xff, 0, 1], true, false, HashAlg::Sha256);

    /// All presets with their names.
    pub const PRESETS: [(&'static str, Self); 8] = [
        ("APR2011_439", Self::APR2011_439),
        ("APR2011_439_FAST", Self::APR2011_439_FAST),
        ("APR2011_743", Self::APR2011_743),
        ("APR2011_743_FAST", Self::APR2011_743_FAST),
        ("EES1087EP2", Self::EES1087EP2),
        ("EES1171EP1", Self::EES1171EP1),
        ("EES1499EP1", Self::EES1499EP1),
        ("TEST157", Self::TEST157),
    ];


    /// Simple-form parameter set; the remaining fields are derived.
    #[allow(clippy::too_many_arguments, clippy::fn_params_excessive_bools)]
    #[must_use]
    pub const fn new(
        n: usize, q: i32, df: usize, dm0: usize, db: usize, c: u32, min_calls_r: u32,
        min_calls_mask: u32, hash_seed: bool, oid: [u8; 3], sparse: bool, fast_fp: bool,
        hash_alg: HashAlg,
    ) -> Self {
        Self::derive(
            n, q, df, 0, 0, 0, dm0, db, c, min_calls_r, min_calls_mask, hash_seed, oid, sparse,
            fast_fp, PolyType::Simple, hash_alg,
        )
    }


    /// Product-form parameter set with weights `(df1, df2, df3)`.
    #[allow(clippy::too_many_arguments, clippy::fn_params_excessive_bools)]
    #[must_use]
    pub const fn new_product(
        n: usize, q: i32, df1: usize, df2: usize, df3: usize, dm0: usize, db: usize, c: u32,
        min_calls_r: u32, min_calls_mask: u32, hash_seed: bool, oid: [u8; 3], sparse: bool,
        fast_fp: bool, hash_alg: HashAlg,
    ) -> Self {
        Self::derive(
            n, q, 0, df1, df2, df3, dm0, db, c, min_calls_r, min_calls_mask, hash_seed, oid, sparse,
            fast_fp, PolyType::Product, hash_alg,
        )
    }


    #[allow(clippy::too_many_arguments, clippy::fn_params_excessive_bools)]
    const fn derive(
        n: usize, q: i32, df: usize, df1: usize, df2: usize, df3: usize, dm0: usize, db: usize,
        c: u32, min_calls_r: u32, min_calls_mask: u32, hash_seed: bool, oid: [u8; 3],
        sparse: bool, fast_fp: bool, poly_type: PolyType, hash_alg: HashAlg,
    ) -> Self {
        let llen = 1;
        let max_msg_len_bytes = (n * 3 / 2 / 8).saturating_sub(llen + db / 8 + 1);
        EncryptionParameters {
            n,
            q,
            df,
            df1,
            df2,
            df3,
            dr: df,
            dr1: df1,
            dr2: df2,
            dr3: df3,
            dg: n / 3,
            llen,
            max_msg_len_bytes,
            db,
            buffer_len_bits: (n * 3 / 2 + 7) / 8 * 8 + 1,
            buffer_len_trits: n.saturating_sub(1),
            dm0,
            pk_len: db,
            c,
            min_calls_r,
            min_calls_mask,
            hash_seed,
            oid,
            sparse,
            fast_fp,
            poly_type,
            hash_alg,
        }
    }


    /// Looks up a preset by name, e.g. `"APR2011_439_FAST"`.
    #[must_use]
    pub fn by_name(name: &str) -> Option<Self> {
        Self::PRESETS.iter().find(|(n, _)| *n == name).map(|(_, p)| p.clone())
    }


    /// Looks up a preset by its three-byte identifier.
    #[must_use]
    pub fn by_oid(oid: [u8; 3]) -> Option<Self> {
        Self::PRESETS.iter().find(|(_, p)| p.oid == oid).map(|(_, p)| p.clone())
    }


    /// Length in bytes of a ciphertext or an encoded public key.
    #[must_use]
    pub fn ciphertext_len(&self) -> usize { crate::conversion::mod_q_len(self.n, self.q) }


    /// Serializes the defining fields; derived fields are recomputed on load.
    #[must_use]
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut w = ByteWriter::new();
        for v in [
            self.n,
            usize::try_from(self.q).unwrap_or(0),
            self.df,
            self.df1,
            self.df2,
            self.df3,
            self.db,
            self.dm0,
        ] {
            w.put_i32(i32::try_from(v).unwrap_or(i32::MAX));
        }
        for v in [self.c, self.min_calls_r, self.min_calls_mask] {
            w.put_i32(i32::try_from(v).unwrap_or(i32::MAX));
        }
        w.put_bool(self.hash_seed);
        w.put_bytes(&self.oid);
        w.put_bool(self.sparse);
        w.put_bool(self.fast_fp);
        w.put_u8(self.poly_type.to_byte());
        w.put_utf(self.hash_alg.name());
        w.0
    }


    /// Reads a parameter set written by [`EncryptionParameters::to_bytes`].
    ///
    /// # Errors
    /// Returns [`Error::UnsupportedParameterEncoding`] for an unknown hash name or
    /// polynomial type, and [`Error::MalformedEncoding`] for truncated input,
    /// trailing bytes or inconsistent values.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, Error> {
        let mut r = ByteReader::new(bytes);
        let mut ints = [0usize; 8];
        for v in &mut ints {
            *v = r.get_count()? as usize;
        }
        let [n, q, df, df1, df2, df3, db, dm0] = ints;
        let c = r.get_count()?;
        let min_calls_r = r.get_count()?;
        let min_calls_mask = r.get_count()?;
        let hash_seed = r.get_bool()?;
        let oid_bytes = r.take(3)?;
        let oid = [oid_bytes[0], oid_bytes[1], oid_bytes[2]];
        let sparse = r.get_bool()?;
        let fast_fp = r.get_bool()?;
        let poly_type = PolyType::from_byte(r.get_u8()?)?;
        let hash_alg = HashAlg::from_name(&r.get_utf()?)?;
        ensure!(r.remaining() == 0, Error::MalformedEncoding("trailing parameter bytes"));

        let q = i32::try_from(q).map_err(|_| Error::MalformedEncoding("q out of range"))?;
        let params = Self::derive(
            n, q, df, df1, df2, df3, dm0, db, c, min_calls_r, min_calls_mask, hash_seed, oid,
            sparse, fast_fp, poly_type, hash_alg,
        );
        params.validate()?;
        Ok(params)
    }


    fn validate(&self) -> Result<(), Error> {
        ensure!(self.n >= 5 && self.n <= 2048, Error::MalformedEncoding("n out of range"));
        ensure!(self.q >= 4 && (self.q & (self.q - 1)) == 0, Error::MalformedEncoding("q not a power of two"));
        ensure!((1..=31).contains(&self.c) && (1usize << self.c) >= self.n, Error::MalformedEncoding("c out of range"));
        ensure!(self.db % 8 == 0 && self.db > 0, Error::MalformedEncoding("db not a whole number of bytes"));
        ensure!(self.max_msg_len_bytes > 0, Error::MalformedEncoding("no room for a message"));
        ensure!(3 * self.dm0 <= self.n, Error::MalformedEncoding("dm0 too large"));
        ensure!(self.min_calls_r > 0 && self.min_calls_mask > 0, Error::MalformedEncoding("zero hash calls"));
        let weights_fit = match self.poly_type {
            PolyType::Simple => self.df > 0 && 2 * self.df <= self.n,
            PolyType::Product => {
                [self.df1, self.df2, self.df3].iter().all(|&d| d > 0 && 2 * d <= self.n)
            }
        };
        ensure!(weights_fit, Error::MalformedEncoding("weights out of range"));
        Ok(())
    }
}


/// Largest accepted `bits_f`; the float completion shifts every coefficient by this much.
const MAX_BITS_F: u32 = 64;


/// NTRUSign parameters, including the squared bounds derived from them.
#[derive(Clone, Debug, PartialEq)]
pub struct SigningParameters {
    /// Ring dimension
    pub n: usize,
    /// Modulus, a power of two
    pub q: i32,
    /// `f` and `g` carry `d + 1` ones and `d` minus ones, simple form
    pub d: usize,
    /// Product-form weights
    pub d1: usize,
    /// Product-form weights
    pub d2: usize,
    /// Product-form weights
    pub d3: usize,
    /// Number of perturbation bases
    pub b: usize,
    /// Standard or transpose basis
    pub basis_type: BasisType,
    /// Weight of the public-lattice term in the signature norm
    pub beta: f64,
    /// Signature norm bound
    pub norm_bound: f64,
    /// Bound on the norms of `F` and `G` during key generation
    pub key_norm_bound: f64,
    /// Number of message representatives tried before signing fails
    pub sign_fail_tolerance: u32,
    /// Require `Res(f) mod (2n + 1) != 0`
    pub prime_check: bool,
    /// Store ternary polynomials as index lists
    pub sparse: bool,
    /// Reserved bit-width parameter carried in the persisted format
    pub bits_f: u32,
    /// Basis reduction method
    pub key_gen_alg: KeyGenAlg,
    /// Hash algorithm for the message digest and representative
    pub hash_alg: HashAlg,
    /// Simple or product-form `f` and `g`
    pub poly_type: PolyType,
}


impl SigningParameters {
    /// 439-dimensional transpose-basis set
    pub const APR2011_439: Self = Self::new(
        439, 2048, 146, 1, BasisType::Transpose, 0.165, 490.0, 280.0, false, true,
        KeyGenAlg::Resultant, HashAlg::Sha256,
    );
    /// 439-dimensional product-form set
    pub const APR2011_439_PROD: Self = Self::new_product(
        439, 2048, 9, 8, 5, 1, BasisType::Transpose, 0.165, 490.0, 280.0, false, true,
        KeyGenAlg::Resultant, HashAlg::Sha256,
    );
    /// 743-dimensional transpose-basis set
    pub const APR2011_743: Self = Self::new(
        743, 2048, 248, 1, BasisType::Transpose, 0.127, 560.0, 360.0, true, false,
        KeyGenAlg::Resultant, HashAlg::Sha512,
    );
    /// 743-dimensional product-form set
    pub const APR2011_743_PROD: Self = Self::new_product(
        743, 2048, 11, 11, 15, 1, BasisType::Transpose, 0.127, 560.0, 360.0, true, false,
        KeyGenAlg::Resultant, HashAlg::Sha512,
    );
    /// Small insecure set for fast tests
    pub const TEST157: Self = Self::new(
        157, 256, 29, 1, BasisType::Transpose, 0.38, 200.0, 80.0, false, false,
        KeyGenAlg::Resultant, HashAlg::Sha256,
    );
    /// Small insecure product-form set for fast tests
    pub const TEST157_PROD: Self = Self::new_product(
        157, 256, 5, 5, 8, 1, BasisType::Transpose, 0.38, 200.0, 80.0, false, true,
        KeyGenAlg::Resultant, HashAlg::Sha256,
    );

    /// All presets with their names.
    pub const PRESETS: [(&'static str, Self); 6] = [
        ("APR2011_439", Self::APR2011_439),
        ("APR2011_439_PROD", Self::APR2011_439_PROD),
        ("APR2011_743", Self::APR2011_743),
        ("APR2011_743_PROD", Self::APR2011_743_PROD),
        ("TEST157", Self::TEST157),
        ("TEST157_PROD", Self::TEST157_PROD),
    ];


    /// Simple-form parameter set.
    #[allow(clippy::too_many_arguments, clippy::fn_params_excessive_bools)]
    #[must_use]
    pub const fn new(
        n: usize, q: i32, d: usize, b: usize, basis_type: BasisType, beta: f64, norm_bound: f64,
        key_norm_bound: f64, prime_check: bool, sparse: bool, key_gen_alg: KeyGenAlg,
        hash_alg: HashAlg,
    ) -> Self {
        Self::derive(
            n, q, d, 0, 0, 0, b, basis_type, beta, norm_bound, key_norm_bound, prime_check,
            sparse, key_gen_alg, hash_alg, PolyType::Simple,
        )
    }


    /// Product-form parameter set with weights `(d1, d2, d3)`.
    #[allow(clippy::too_many_arguments, clippy::fn_params_excessive_bools)]
    #[must_use]
    pub const fn new_product(
        n: usize, q: i32, d1: usize, d2: usize, d3: usize, b: usize, basis_type: BasisType,
        beta: f64, norm_bound: f64, key_norm_bound: f64, prime_check: bool, sparse: bool,
        key_gen_alg: KeyGenAlg, hash_alg: HashAlg,
    ) -> Self {
        Self::derive(
            n, q, 0, d1, d2, d3, b, basis_type, beta, norm_bound, key_norm_bound, prime_check,
            sparse, key_gen_alg, hash_alg, PolyType::Product,
        )
    }


    #[allow(clippy::too_many_arguments, clippy::fn_params_excessive_bools)]
    const fn derive(
        n: usize, q: i32, d: usize, d1: usize, d2: usize, d3: usize, b: usize,
        basis_type: BasisType, beta: f64, norm_bound: f64, key_norm_bound: f64,
        prime_check: bool, sparse: bool, key_gen_alg: KeyGenAlg, hash_alg: HashAlg,
        poly_type: PolyType,
    ) -> Self {
        SigningParameters {
            n,
            q,
            d,
            d1,
            d2,
            d3,
            b,
            basis_type,
            beta,
            norm_bound,
            key_norm_bound,
            sign_fail_tolerance: 100,
            prime_check,
            sparse,
            bits_f: 6,
            key_gen_alg,
            hash_alg,
            poly_type,
        }
    }


    /// True when `2n + 1` is prime, so the key generation prime check can run.
    #[must_use]
    pub fn has_prime_modulus(&self) -> bool {
        self.n.checked_mul(2).and_then(|m| i64::try_from(m + 1).ok()).is_some_and(is_prime)
    }


    /// `beta²`
    #[must_use]
    pub fn beta_sq(&self) -> f64 { self.beta * self.beta }


    /// `norm_bound²`
    #[must_use]
    pub fn norm_bound_sq(&self) -> f64 { self.norm_bound * self.norm_bound }


    /// `key_norm_bound²`
    #[must_use]
    pub fn key_norm_bound_sq(&self) -> f64 { self.key_norm_bound * self.key_norm_bound }


    /// Same parameters with a different signing retry limit.
    #[must_use]
    pub fn with_sign_fail_tolerance(mut self, tolerance: u32) -> Self {
        self.sign_fail_tolerance = tolerance;
        self
    }


    /// Same parameters with a different basis reduction method.
    #[must_use]
    pub fn with_key_gen_alg(mut self, alg: KeyGenAlg) -> Self {
        self.key_gen_alg = alg;
        self
    }


    /// Looks up a preset by name, e.g. `"APR2011_743_PROD"`.
    #[must_use]
    pub fn by_name(name: &str) -> Option<Self> {
        Self::PRESETS.iter().find(|(n, _)| *n == name).map(|(_, p)| p.clone())
    }


    /// Length in bytes of an encoded public key.
    #[must_use]
    pub fn public_key_len(&self) -> usize { crate::conversion::mod_q_len(self.n, self.q) }


    /// Length in bytes of a signature: `s` packed mod `q` plus the 4-byte counter.
    #[must_use]
    pub fn signature_len(&self) -> usize { self.public_key_len() + 4 }


    /// Serializes the defining fields; derived fields are recomputed on load.
    #[must_use]
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut w = ByteWriter::new();
        for v in [self.n, usize::try_from(self.q).unwrap_or(0), self.d, self.d1, self.d2, self.d3, self.b] {
            w.put_i32(i32::try_from(v).unwrap_or(i32::MAX));
        }
        w.put_i32(match self.basis_type {
            BasisType::Standard => 0,
            BasisType::Transpose => 1,
        });
        w.put_f64(self.beta);
        w.put_f64(self.norm_bound);
        w.put_f64(self.key_norm_bound);
        w.put_i32(i32::try_from(self.sign_fail_tolerance).unwrap_or(i32::MAX));
        w.put_bool(self.prime_check);
        w.put_bool(self.sparse);
        w.put_i32(i32::try_from(self.bits_f).unwrap_or(i32::MAX));
        w.put_u8(match self.key_gen_alg {
            KeyGenAlg::Resultant => 0,
            KeyGenAlg::Float => 1,
        });
        w.put_utf(self.hash_alg.name());
        w.put_u8(self.poly_type.to_byte());
        w.0
    }


    /// Reads a parameter set written by [`SigningParameters::to_bytes`].
    ///
    /// # Errors
    /// Returns [`Error::UnsupportedParameterEncoding`] for an unknown hash name or enum
    /// value, and [`Error::MalformedEncoding`] for truncated input, trailing bytes or
    /// inconsistent values.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, Error> {
        let mut r = ByteReader::new(bytes);
        let mut ints = [0usize; 7];
        for v in &mut ints {
            *v = r.get_count()? as usize;
        }
        let [n, q, d, d1, d2, d3, b] = ints;
        let basis_type = match r.get_i32()? {
            0 => BasisType::Standard,
            1 => BasisType::Transpose,
            other => return Err(Error::UnsupportedParameterEncoding(format!("basis type {other}"))),
        };
        let beta = r.get_f64()?;
        let norm_bound = r.get_f64()?;
        let key_norm_bound = r.get_f64()?;
        let sign_fail_tolerance = r.get_count()?;
        let prime_check = r.get_bool()?;
        let sparse = r.get_bool()?;
        let bits_f = r.get_count()?;
        let key_gen_alg = match r.get_u8()? {
            0 => KeyGenAlg::Resultant,
            1 => KeyGenAlg::Float,
            other => return Err(Error::UnsupportedParameterEncoding(format!("key generation algorithm {other}"))),
        };
        let hash_alg = HashAlg::from_name(&r.get_utf()?)?;
        let poly_type = PolyType::from_byte(r.get_u8()?)?;
        ensure!(r.remaining() == 0, Error::MalformedEncoding("trailing parameter bytes"));

        let q = i32::try_from(q).map_err(|_| Error::MalformedEncoding("q out of range"))?;
        let mut params = Self::derive(
            n, q, d, d1, d2, d3, b, basis_type, beta, norm_bound, key_norm_bound, prime_check,
            sparse, key_gen_alg, hash_alg, poly_type,
        );
        params.sign_fail_tolerance = sign_fail_tolerance;
        params.bits_f = bits_f;
        params.validate()?;
        Ok(params)
    }


    fn validate(&self) -> Result<(), Error> {
        ensure!(self.n >= 5 && self.n <= 2048, Error::MalformedEncoding("n out of range"));
        ensure!(self.q >= 4 && (self.q & (self.q - 1)) == 0, Error::MalformedEncoding("q not a power of two"));
        ensure!(self.b <= 64, Error::MalformedEncoding("too many bases"));
        ensure!(self.sign_fail_tolerance > 0, Error::MalformedEncoding("zero signing attempts"));
        ensure!(self.bits_f <= MAX_BITS_F, Error::MalformedEncoding("bits_f out of range"));
        ensure!(
            !self.prime_check || self.has_prime_modulus(),
            Error::MalformedEncoding("prime check needs 2n+1 prime")
        );
        let finite = [self.beta, self.norm_bound, self.key_norm_bound].iter().all(|v| v.is_finite() && *v > 0.0);
        ensure!(finite, Error::MalformedEncoding("bounds must be positive"));
        let weights_fit = match self.poly_type {
            PolyType::Simple => self.d > 0 && 2 * self.d + 1 <= self.n,
            PolyType::Product => {
                self.d1 > 0 && self.d2 > 0 && self.d3 > 0 && 2 * self.d1.max(self.d2).max(self.d3) + 1 <= self.n
            }
        };
        ensure!(weights_fit, Error::MalformedEncoding("weights out of range"));
        Ok(())
    }
}
