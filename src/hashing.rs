// This file implements the hash-driven derivations of IEEE P1363.1: the index
// generation function (section 8.4.2.1), blinding polynomial generation, the
// MGF-TP-1 mask generation function (section 8.4.1.1), and the counter-mode
// generator behind the NTRUSign message representative.

use crate::error::Error;
use crate::params::{EncryptionParameters, PolyType};
use crate::poly::{
    DenseTernaryPolynomial, IntegerPolynomial, Polynomial, ProductFormPolynomial,
    SparseTernaryPolynomial,
};
use sha2::{Digest, Sha256, Sha512};


/// Hash algorithm selected by a parameter set.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum HashAlg {
    /// SHA-256, 32-byte output
    Sha256,
    /// SHA-512, 64-byte output
    Sha512,
}


impl HashAlg {
    /// Algorithm name as written into persisted parameter sets.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            HashAlg::Sha256 => "SHA-256",
            HashAlg::Sha512 => "SHA-512",
        }
    }


    /// Parses a persisted algorithm name.
    ///
    /// # Errors
    /// Returns [`Error::UnsupportedParameterEncoding`] for any name other than
    /// `"SHA-256"` or `"SHA-512"`.
    pub fn from_name(name: &str) -> Result<Self, Error> {
        match name {
            "SHA-256" => Ok(HashAlg::Sha256),
            "SHA-512" => Ok(HashAlg::Sha512),
            other => Err(Error::UnsupportedParameterEncoding(other.to_string())),
        }
    }


    /// Digest length in bytes.
    #[must_use]
    pub fn output_len(self) -> usize {
        match self {
            HashAlg::Sha256 => 32,
            HashAlg::Sha512 => 64,
        }
    }


    /// Hashes the concatenation of `parts`.
    #[must_use]
    pub fn digest(self, parts: &[&[u8]]) -> Vec<u8> {
        match self {
            HashAlg::Sha256 => {
                let mut hasher = Sha256::new();
                parts.iter().for_each(|p| Digest::update(&mut hasher, p));
                hasher.finalize().to_vec()
            }
            HashAlg::Sha512 => {
                let mut hasher = Sha512::new();
                parts.iter().for_each(|p| Digest::update(&mut hasher, p));
                hasher.finalize().to_vec()
            }
        }
    }
}


/// Deterministic stream of indices in `[0, n)` derived from a seed.
///
/// The generator hashes `seed || counter` into a bit buffer and cuts `c`-bit
/// candidates from it, least significant bit first, rejecting values at or above
/// `2^c - (2^c mod n)`. The counter is never reset, so one instance must serve
/// exactly one derivation.
pub(crate) struct IndexGenerator {
    seed: Vec<u8>,
    n: u32,
    c: u32,
    min_calls_r: u32,
    hash: HashAlg,
    counter: u32,
    buf: Vec<u8>,
    bit_pos: usize,
    initialized: bool,
}


impl IndexGenerator {
    pub(crate) fn new(seed: &[u8], n: usize, c: u32, min_calls_r: u32, hash: HashAlg) -> Self {
        debug_assert!((1..=31).contains(&c), "IGF: c out of range");
        debug_assert!(n > 0 && (n as u64) <= (1u64 << c), "IGF: n out of range");
        IndexGenerator {
            seed: seed.to_vec(),
            n: u32::try_from(n).unwrap_or(u32::MAX),
            c,
            min_calls_r,
            hash,
            counter: 0,
            buf: Vec::new(),
            bit_pos: 0,
            initialized: false,
        }
    }


    fn append_hash(&mut self) {
        let block = self.hash.digest(&[&self.seed, &self.counter.to_be_bytes()]);
        self.counter += 1;
        // Drop fully consumed bytes before growing the buffer
        let consumed = self.bit_pos / 8;
        self.buf.drain(..consumed);
        self.bit_pos -= consumed * 8;
        self.buf.extend_from_slice(&block);
    }


    fn remaining_bits(&self) -> usize { self.buf.len() * 8 - self.bit_pos }


    fn take_bits(&mut self, count: u32) -> u32 {
        let mut value = 0u32;
        for k in 0..count {
            let pos = self.bit_pos + k as usize;
            let bit = (self.buf[pos / 8] >> (pos % 8)) & 1;
            value |= u32::from(bit) << k;
        }
        self.bit_pos += count as usize;
        value
    }


    /// Next index in `[0, n)`.
    pub(crate) fn next_index(&mut self) -> usize {
        if !self.initialized {
            for _ in 0..self.min_calls_r {
                self.append_hash();
            }
            self.initialized = true;
        }
        let range = 1u64 << self.c;
        let limit = range - range % u64::from(self.n);
        loop {
            while self.remaining_bits() < self.c as usize {
                self.append_hash();
            }
            let candidate = u64::from(self.take_bits(self.c));
            if candidate < limit {
                #[allow(clippy::cast_possible_truncation)]
                return (candidate % u64::from(self.n)) as usize;
            }
        }
    }
}


/// Places `num_neg_ones` `-1`s and then `num_ones` `+1`s at fresh positions drawn from `igf`.
fn blinding_coeffs(igf: &mut IndexGenerator, n: usize, num_ones: usize, num_neg_ones: usize) -> IntegerPolynomial {
    let mut r = IntegerPolynomial::new(n);
    for (value, count) in [(-1, num_neg_ones), (1, num_ones)] {
        for _ in 0..count {
            loop {
                let i = igf.next_index();
                if r.coeffs[i] == 0 {
                    r.coeffs[i] = value;
                    break;
                }
            }
        }
    }
    r
}


/// Derives the blinding polynomial `r` from `seed` with the weights of the parameter set.
pub(crate) fn generate_blinding_poly(seed: &[u8], params: &EncryptionParameters) -> Polynomial {
    let n = params.n;
    let mut igf = IndexGenerator::new(seed, n, params.c, params.min_calls_r, params.hash_alg);
    match params.poly_type {
        PolyType::Simple => {
            let r = blinding_coeffs(&mut igf, n, params.dr, params.dr);
            if params.sparse {
                Polynomial::SparseTernary(SparseTernaryPolynomial::from_dense(&r))
            } else {
                Polynomial::DenseTernary(DenseTernaryPolynomial::from_ternary_unchecked(r))
            }
        }
        PolyType::Product => {
            let r1 = blinding_coeffs(&mut igf, n, params.dr1, params.dr1);
            let r2 = blinding_coeffs(&mut igf, n, params.dr2, params.dr2);
            let r3 = blinding_coeffs(&mut igf, n, params.dr3, params.dr3);
            Polynomial::ProductForm(ProductFormPolynomial::new(
                SparseTernaryPolynomial::from_dense(&r1),
                SparseTernaryPolynomial::from_dense(&r2),
                SparseTernaryPolynomial::from_dense(&r3),
            ))
        }
    }
}


/// MGF-TP-1: a pseudorandom ternary polynomial of length `n` from an arbitrary seed.
///
/// Each hash output byte below 243 yields five base-3 digits `d`, mapped to `d - 1`.
pub(crate) fn mgf(seed: &[u8], n: usize, min_calls: u32, hash_seed: bool, hash: HashAlg) -> IntegerPolynomial {
    let z = if hash_seed { hash.digest(&[seed]) } else { seed.to_vec() };
    let mut counter = 0u32;
    let mut buf = Vec::with_capacity(min_calls as usize * hash.output_len());
    while counter < min_calls {
        buf.extend_from_slice(&hash.digest(&[&z, &counter.to_be_bytes()]));
        counter += 1;
    }

    let mut out = IntegerPolynomial::new(n);
    let mut cur = 0;
    loop {
        for &byte in &buf {
            if byte >= 243 {
                continue;
            }
            let mut o = i32::from(byte);
            for _ in 0..5 {
                if cur == n {
                    return out;
                }
                out.coeffs[cur] = o % 3 - 1;
                o /= 3;
                cur += 1;
            }
        }
        if cur == n {
            return out;
        }
        buf = hash.digest(&[&z, &counter.to_be_bytes()]);
        counter += 1;
    }
}


/// Counter-mode generator seeded with `msgHash || r`: each request concatenates
/// `hash(seed || counter)` blocks and truncates to the requested length.
pub(crate) struct SignerPrng {
    seed: Vec<u8>,
    counter: u32,
    hash: HashAlg,
}


impl SignerPrng {
    pub(crate) fn new(seed: Vec<u8>, hash: HashAlg) -> Self { SignerPrng { seed, counter: 0, hash } }


    pub(crate) fn next_bytes(&mut self, len: usize) -> Vec<u8> {
        let mut out = Vec::with_capacity(len + self.hash.output_len());
        while out.len() < len {
            out.extend_from_slice(&self.hash.digest(&[&self.seed, &self.counter.to_be_bytes()]));
            self.counter += 1;
        }
        out.truncate(len);
        out
    }
}


/// The NTRUSign message representative for attempt `r`: `n` coefficients, each the
/// little-endian value of `ceil(log2(q)/8)` generator bytes masked to `log2(q)` bits.
pub(crate) fn create_message_representative(
    msg_hash: &[u8], r: u32, n: usize, q: i32, hash: HashAlg,
) -> IntegerPolynomial {
    let mut seed = Vec::with_capacity(msg_hash.len() + 4);
    seed.extend_from_slice(msg_hash);
    seed.extend_from_slice(&r.to_be_bytes());
    let mut prng = SignerPrng::new(seed, hash);

    #[allow(clippy::cast_sign_loss)]
    let c = crate::helpers::bits_per_coeff(q as u32);
    let bytes_per_coeff = (c as usize + 7) / 8;
    let mask = (1u32 << c) - 1;
    let mut i = IntegerPolynomial::new(n);
    for coeff in &mut i.coeffs {
        let data = prng.next_bytes(bytes_per_coeff);
        let value = data.iter().rev().fold(0u32, |acc, &b| (acc << 8) | u32::from(b));
        *coeff = i32::try_from(value & mask).unwrap_or(0);
    }
    i
}
