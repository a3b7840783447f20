// This file implements the NTRUEncrypt SVES primitives of IEEE P1363.1: key pair
// generation (section 8.3.1), encryption (section 9.2.2) and decryption (section 9.2.3).

use crate::conversion::{encode_mod4, encode_mod_q, sves_bits_to_trits, sves_trits_to_bits};
use crate::error::Error;
use crate::hashing::{generate_blinding_poly, mgf};
use crate::helpers::{ensure, fill_random};
use crate::params::{EncryptionParameters, PolyType};
use crate::poly::{IntegerPolynomial, Polynomial, ProductFormPolynomial};
use crate::traits::{Decryptor, Encryptor};
use crate::types::{EncryptionPrivateKey, EncryptionPublicKey};
use rand_core::CryptoRngCore;
use tracing::{debug, trace};
use zeroize::Zeroize;


/// Draws the secret `t` with the weights of the parameter set.
///
/// With `fast_fp` the private key is `f = 1 + 3t` and `t` is balanced; otherwise
/// `f = t` carries one more `+1` than `-1` (in `f3` for product form) so `f(1) = 1`.
fn random_t(rng: &mut impl CryptoRngCore, params: &EncryptionParameters) -> Result<Polynomial, Error> {
    let n = params.n;
    let skew = usize::from(!params.fast_fp);
    match params.poly_type {
        PolyType::Simple => Polynomial::random_ternary(rng, n, params.df, params.df - skew, params.sparse),
        PolyType::Product => Ok(Polynomial::ProductForm(ProductFormPolynomial::generate_random(
            rng,
            n,
            params.df1,
            params.df2,
            params.df3,
            params.df3 - skew,
        )?)),
    }
}


/// Computes `fp = f⁻¹ mod 3` for the secret `t`, or `None` when `f` is not invertible.
pub(crate) fn compute_fp(t: &Polynomial, params: &EncryptionParameters) -> Option<IntegerPolynomial> {
    if params.fast_fp {
        Some(IntegerPolynomial::one(params.n))
    } else {
        t.to_integer_polynomial().invert_f3()
    }
}


/// Generates an NTRUEncrypt key pair, resampling `f` and `g` until they are invertible.
pub(crate) fn key_gen(
    rng: &mut impl CryptoRngCore, params: &EncryptionParameters,
) -> Result<(EncryptionPublicKey, EncryptionPrivateKey), Error> {
    let (n, q) = (params.n, params.q);

    // 1. Private polynomial t with fp and fq
    let mut f_attempts = 0u32;
    let (t, fp, mut fq) = loop {
        f_attempts += 1;
        let t = random_t(rng, params)?;
        let mut f = t.to_integer_polynomial();
        if params.fast_fp {
            f.mult_scalar(3);
            f.coeffs[0] += 1;
        }
        let Some(fp) = compute_fp(&t, params) else {
            trace!(attempt = f_attempts, "f not invertible mod 3; resampling");
            continue;
        };
        let fq = f.invert_fq(q);
        f.clear();
        match fq {
            Some(fq) => break (t, fp, fq),
            None => trace!(attempt = f_attempts, "f not invertible mod q; resampling"),
        }
    };

    // 2. g with dg ones and dg - 1 minus ones, invertible mod q
    let mut g_attempts = 0u32;
    let mut g = loop {
        g_attempts += 1;
        let g = Polynomial::random_ternary(rng, n, params.dg, params.dg - 1, false)?.to_integer_polynomial();
        if g.invert_fq(q).is_some() {
            break g;
        }
        trace!(attempt = g_attempts, "g not invertible mod q; resampling");
    };

    // 3. h = 3·g·fq mod q
    let mut h = g.mult_mod(&fq, q);
    h.mult3(q);
    g.clear();
    fq.clear();
    debug!(n, q, f_attempts, g_attempts, "NTRUEncrypt key pair generated");

    let pk = EncryptionPublicKey { params: params.clone(), h: h.clone() };
    let sk = EncryptionPrivateKey { params: params.clone(), t, fp, h };
    Ok((pk, sk))
}


/// The first `pk_len` bits of the encoded public key, mixed into the blinding seed.
fn truncated_public_key(h: &IntegerPolynomial, params: &EncryptionParameters) -> Vec<u8> {
    let mut htrunc = encode_mod_q(&h.coeffs, params.q);
    htrunc.truncate(params.pk_len / 8);
    htrunc
}


/// `sData = OID || m || b || htrunc`
fn blinding_seed(params: &EncryptionParameters, m: &[u8], b: &[u8], htrunc: &[u8]) -> Vec<u8> {
    let mut s = Vec::with_capacity(params.oid.len() + m.len() + b.len() + htrunc.len());
    s.extend_from_slice(&params.oid);
    s.extend_from_slice(m);
    s.extend_from_slice(b);
    s.extend_from_slice(htrunc);
    s
}


/// True when every trit value occurs at least `dm0` times.
fn is_balanced(m: &IntegerPolynomial, dm0: usize) -> bool {
    [-1, 0, 1].iter().all(|&v| m.count(v) >= dm0)
}


/// `mask = MGF(R mod 4)`
fn mask_from(r: &IntegerPolynomial, params: &EncryptionParameters) -> IntegerPolynomial {
    let mut r4 = r.clone();
    r4.mod_positive(4);
    let or4 = encode_mod4(&r4.coeffs);
    mgf(&or4, params.n, params.min_calls_mask, params.hash_seed, params.hash_alg)
}


/// Encrypts `m` under `pk`, drawing a fresh random `b` until the masked message is balanced.
pub(crate) fn encrypt(
    rng: &mut impl CryptoRngCore, pk: &EncryptionPublicKey, m: &[u8],
) -> Result<Vec<u8>, Error> {
    let params = &pk.params;
    let (n, q) = (params.n, params.q);
    ensure!(
        m.len() <= params.max_msg_len_bytes,
        Error::MessageTooLong { len: m.len(), max: params.max_msg_len_bytes }
    );

    let len_byte = u8::try_from(m.len())
        .map_err(|_| Error::MessageTooLong { len: m.len(), max: params.max_msg_len_bytes })?;
    let db_bytes = params.db / 8;
    let htrunc = truncated_public_key(&pk.h, params);
    let mut attempts = 0u32;
    loop {
        attempts += 1;
        // M = b || l || m || 0...
        let mut buffer = vec![0u8; params.buffer_len_bits / 8];
        fill_random(rng, &mut buffer[..db_bytes])?;
        buffer[db_bytes] = len_byte;
        buffer[db_bytes + 1..db_bytes + 1 + m.len()].copy_from_slice(m);
        let mut mtrin = IntegerPolynomial::from_coeffs(sves_bits_to_trits(&buffer, n));

        let s_data = blinding_seed(params, m, &buffer[..db_bytes], &htrunc);
        buffer.zeroize();
        let r = generate_blinding_poly(&s_data, params);
        let mut big_r = r.mult_mod(&pk.h, q);

        let mask = mask_from(&big_r, params);
        mtrin.add(&mask);
        mtrin.mod3();
        if !is_balanced(&mtrin, params.dm0) {
            trace!(attempt = attempts, "masked message not balanced; retrying");
            mtrin.clear();
            continue;
        }

        big_r.add(&mtrin);
        big_r.mod_positive(q);
        mtrin.clear();
        debug!(attempts, len = m.len(), "message encrypted");
        return Ok(encode_mod_q(&big_r.coeffs, q));
    }
}


/// Recovers `ci = f·e mod q mod 3` (times `fp` when `f` is not `1 + 3t`).
fn decrypt_trits(e: &IntegerPolynomial, sk: &EncryptionPrivateKey) -> IntegerPolynomial {
    let params = &sk.params;
    let q = params.q;
    let mut a = sk.t.mult_mod(e, q);
    if params.fast_fp {
        // a = 3·t·e + e
        a.mult3(q);
        a.add(e);
    }
    a.center_mod(q);
    a.mod3();
    let mut ci = if params.fast_fp { a.clone() } else { a.mult_mod(&sk.fp, 3) };
    a.clear();
    ci.mod3();
    ci
}


/// Decrypts `ct` with `sk`. Every integrity failure is reported as [`Error::InvalidCiphertext`].
pub(crate) fn decrypt(sk: &EncryptionPrivateKey, ct: &[u8]) -> Result<Vec<u8>, Error> {
    let params = &sk.params;
    let (n, q) = (params.n, params.q);
    let e = crate::conversion::decode_mod_q(ct, n, q)
        .map(IntegerPolynomial::from_coeffs)
        .map_err(|_| Error::InvalidCiphertext)?;

    let mut ci = decrypt_trits(&e, sk);
    ensure!(is_balanced(&ci, params.dm0), Error::InvalidCiphertext);

    // cR = e - ci mod q
    let mut c_r = e;
    c_r.sub(&ci);
    c_r.mod_positive(q);

    let mask = mask_from(&c_r, params);
    let mut c_mtrin = ci.clone();
    ci.clear();
    c_mtrin.sub(&mask);
    c_mtrin.mod3();
    // Odd n leaves one trit past the last SVES pair; it must decrypt to zero
    let used_trits = n - n % 2;
    let trailing_zero = c_mtrin.coeffs[used_trits..].iter().all(|&c| c == 0);
    let buffer = sves_trits_to_bits(&c_mtrin.coeffs[..used_trits]);
    c_mtrin.clear();
    ensure!(trailing_zero, Error::InvalidCiphertext);
    let mut buffer = buffer.map_err(|_| Error::InvalidCiphertext)?;

    let result = parse_and_check(params, &sk.h, &buffer, &c_r);
    buffer.zeroize();
    result
}


/// Splits `b || l || m || 0...`, re-derives `r` and checks `r·h == cR`.
fn parse_and_check(
    params: &EncryptionParameters, h: &IntegerPolynomial, buffer: &[u8], c_r: &IntegerPolynomial,
) -> Result<Vec<u8>, Error> {
    let db_bytes = params.db / 8;
    ensure!(buffer.len() > db_bytes, Error::InvalidCiphertext);
    let cb = &buffer[..db_bytes];
    let cl = usize::from(buffer[db_bytes]);
    ensure!(cl <= params.max_msg_len_bytes, Error::InvalidCiphertext);
    let msg_end = db_bytes + 1 + cl;
    ensure!(msg_end <= buffer.len(), Error::InvalidCiphertext);
    let cm = &buffer[db_bytes + 1..msg_end];
    ensure!(buffer[msg_end..].iter().all(|&b| b == 0), Error::InvalidCiphertext);

    let htrunc = truncated_public_key(h, params);
    let s_data = blinding_seed(params, cm, cb, &htrunc);
    let r = generate_blinding_poly(&s_data, params);
    let c_r_prime = r.mult_mod(h, params.q);
    ensure!(c_r_prime == *c_r, Error::InvalidCiphertext);
    Ok(cm.to_vec())
}


impl Encryptor for EncryptionPublicKey {
    fn try_encrypt_with_rng(&self, rng: &mut impl CryptoRngCore, message: &[u8]) -> Result<Vec<u8>, Error> {
        encrypt(rng, self, message)
    }
}


impl Decryptor for EncryptionPrivateKey {
    fn try_decrypt(&self, ciphertext: &[u8]) -> Result<Vec<u8>, Error> { decrypt(self, ciphertext) }
}


#[cfg(test)]
mod tests {
    use super::*;
    use rand_chacha::rand_core::SeedableRng;

    #[test]
    fn test_round_trip_all_lengths() {
        let mut rng = rand_chacha::ChaCha8Rng::seed_from_u64(123);
        let params = EncryptionParameters::TEST157;
        let (pk, sk) = key_gen(&mut rng, &params).unwrap();
        for len in 0..=params.max_msg_len_bytes {
            let msg: Vec<u8> = (0..len).map(|i| (i * 7 + 3) as u8).collect();
            let ct = encrypt(&mut rng, &pk, &msg).unwrap();
            assert_eq!(ct.len(), params.ciphertext_len());
            assert_eq!(decrypt(&sk, &ct).unwrap(), msg);
        }
    }

    #[test]
    fn test_message_too_long() {
        let mut rng = rand_chacha::ChaCha8Rng::seed_from_u64(1);
        let params = EncryptionParameters::TEST157;
        let (pk, _) = key_gen(&mut rng, &params).unwrap();
        let msg = vec![0u8; params.max_msg_len_bytes + 1];
        assert_eq!(
            encrypt(&mut rng, &pk, &msg),
            Err(Error::MessageTooLong { len: msg.len(), max: params.max_msg_len_bytes })
        );
    }

    #[test]
    fn test_key_relation() {
        // f·h ≡ 3·g (mod q) with g ternary of weight (dg, dg - 1)
        let mut rng = rand_chacha::ChaCha8Rng::seed_from_u64(7);
        for params in [EncryptionParameters::TEST157, EncryptionParameters::APR2011_439_FAST] {
            let (pk, sk) = key_gen(&mut rng, &params).unwrap();
            let mut fh = sk.f().mult_mod(pk.h(), params.q);
            fh.center_mod(params.q);
            assert!(fh.coeffs.iter().all(|c| c % 3 == 0));
            let g = IntegerPolynomial::from_coeffs(fh.coeffs.iter().map(|c| c / 3).collect());
            assert!(g.is_ternary());
            assert_eq!(g.count(1), params.dg);
            assert_eq!(g.count(-1), params.dg - 1);
        }
    }

    #[test]
    fn test_masked_message_balanced() {
        let mut rng = rand_chacha::ChaCha8Rng::seed_from_u64(99);
        let params = EncryptionParameters::TEST157;
        let (pk, sk) = key_gen(&mut rng, &params).unwrap();
        let ct = encrypt(&mut rng, &pk, b"balance").unwrap();
        let e = IntegerPolynomial::from_coeffs(crate::conversion::decode_mod_q(&ct, params.n, params.q).unwrap());
        assert!(is_balanced(&decrypt_trits(&e, &sk), params.dm0));
    }

    #[test]
    fn test_tampered_ciphertext() {
        let mut rng = rand_chacha::ChaCha8Rng::seed_from_u64(5);
        let params = EncryptionParameters::TEST157;
        let (pk, sk) = key_gen(&mut rng, &params).unwrap();
        let ct = encrypt(&mut rng, &pk, &[0x41, 0x42, 0x43]).unwrap();
        for i in 0..ct.len() {
            let mut bad = ct.clone();
            bad[i] ^= 0x01;
            assert_eq!(decrypt(&sk, &bad), Err(Error::InvalidCiphertext), "byte {i}");
        }
        assert_eq!(decrypt(&sk, &ct[1..]), Err(Error::InvalidCiphertext));
    }
}
