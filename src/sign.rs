// This file implements NTRUSign with perturbations: generation of the `B + 1` lattice
// bases, the deterministic message representative, signing by successive rounding
// against each basis, and the norm-bound verification.

use crate::error::Error;
use crate::hashing::create_message_representative;
use crate::helpers::{ensure, fill_random};
use crate::params::{BasisType, KeyGenAlg, PolyType, SigningParameters};
use crate::poly::{
    extended_gcd, resultant, resultant_mod, BigDecimalPolynomial, IntegerPolynomial, Polynomial,
    ProductFormPolynomial, Resultant,
};
use crate::traits::{Signer, Verifier};
use crate::types::{Basis, Signature, SigningPrivateKey, SigningPublicKey};
use num::{BigInt, One, Zero};
use rand_chacha::ChaCha20Rng;
use rand_core::{CryptoRngCore, SeedableRng};
#[cfg(feature = "parallel")]
use rayon::prelude::*;
use tracing::{debug, trace};
use zeroize::Zeroize;


/// Ternary polynomial with `f(1) = 1`: `d + 1` ones and `d` minus-ones, or the product
/// form `(d1, d1), (d2, d2), (d3 + 1, d3)`.
fn random_ternary(rng: &mut impl CryptoRngCore, params: &SigningParameters) -> Result<Polynomial, Error> {
    let n = params.n;
    match params.poly_type {
        PolyType::Simple => Polynomial::random_ternary(rng, n, params.d + 1, params.d, params.sparse),
        PolyType::Product => Ok(Polynomial::ProductForm(ProductFormPolynomial::generate_random(
            rng,
            n,
            params.d1,
            params.d2,
            params.d3 + 1,
            params.d3,
        )?)),
    }
}


/// Samples until the polynomial is invertible mod `q` (and, with `prime_check`, its
/// resultant does not vanish mod `2n + 1`). Returns the polynomial, its dense form and
/// its inverse mod `q`.
fn sample_invertible(
    rng: &mut impl CryptoRngCore, params: &SigningParameters, name: &'static str,
) -> Result<(Polynomial, IntegerPolynomial, IntegerPolynomial), Error> {
    let check_prime = i64::try_from(2 * params.n + 1).unwrap_or(i64::MAX);
    let mut attempts = 0u32;
    loop {
        attempts += 1;
        let p = random_ternary(rng, params)?;
        let p_int = p.to_integer_polynomial();
        if params.prime_check {
            let m = resultant_mod(&p_int, check_prime)
                .ok_or(Error::InvalidParameters("prime check needs 2n+1 prime"))?;
            if m.res == 0 {
                trace!(poly = name, attempt = attempts, "resultant vanishes mod 2n+1; resampling");
                continue;
            }
        }
        if let Some(inv) = p_int.invert_fq(params.q) {
            return Ok((p, p_int, inv));
        }
        trace!(poly = name, attempt = attempts, "not invertible mod q; resampling");
    }
}


/// Finds `(F, G)` with `f·G − g·F = q`, reduced against `(f, g)`.
///
/// Returns `None` when `gcd(Res f, Res g) ≠ 1` or the reduced polynomials do not fit
/// machine integers; the caller then draws new polynomials.
fn complete_basis(
    f: &IntegerPolynomial, rf: &Resultant, g: &IntegerPolynomial, rg: &Resultant,
    params: &SigningParameters,
) -> Option<(IntegerPolynomial, IntegerPolynomial)> {
    let (x, y, gcd) = extended_gcd(&rf.res, &rg.res);
    if !gcd.is_one() {
        return None;
    }

    // A = q·x·rho_f and B = −q·y·rho_g, so f·A − g·B = q·(x·Res f + y·Res g) = q
    let big_q = BigInt::from(params.q);
    let mut a = rf.rho.clone();
    a.mult_scalar(&(&x * &big_q));
    let mut b = rg.rho.clone();
    b.mult_scalar(&-(&y * &big_q));

    let c = match params.key_gen_alg {
        KeyGenAlg::Resultant => {
            // C = (fRev·B + gRev·A) / (f·fRev + g·gRev), exactly via the resultant of t
            let f_rev = f.reversed();
            let g_rev = g.reversed();
            let mut t = f.mult(&f_rev);
            t.add(&g.mult(&g_rev));
            let rt = resultant(&t);
            if rt.res.is_zero() {
                return None;
            }
            let mut c = b.mult_small(&f_rev);
            c.add(&a.mult_small(&g_rev));
            let mut c = c.mult(&rt.rho);
            c.div_round(&rt.res);
            c
        }
        KeyGenAlg::Float => {
            // C = (B/f + A/g) / 2 in fixed point
            let n_bits = u64::from(usize::BITS - params.n.leading_zeros());
            let scale = a.max_coeff_bits().max(b.max_coeff_bits()) + n_bits + u64::from(params.bits_f);
            let f_inv = BigDecimalPolynomial::from_ratio(&rf.rho, &rf.res, scale);
            let g_inv = BigDecimalPolynomial::from_ratio(&rg.rho, &rg.res, scale);
            let mut c = f_inv.mult(&b);
            c.add(&g_inv.mult(&a));
            c.halve();
            c.round()
        }
    };

    // F = B − C·f, G = A − C·g
    let mut big_f = b;
    big_f.sub(&c.mult_small(f));
    let mut big_g = a;
    big_g.sub(&c.mult_small(g));
    let mut big_f = big_f.to_integer_polynomial()?;
    let mut big_g = big_g.to_integer_polynomial()?;
    minimize_fg(f, g, &mut big_f, &mut big_g);
    Some((big_f, big_g))
}


/// Subtracts or adds rotations of `(f, g)` from `(F, G)` while that shortens `(F, G)`
/// in the centered norm; stops after `n` adjustments or a full round without one.
fn minimize_fg(
    f: &IntegerPolynomial, g: &IntegerPolynomial, big_f: &mut IntegerPolynomial,
    big_g: &mut IntegerPolynomial,
) {
    let n = f.len();
    let n64 = i64::try_from(n).unwrap_or(i64::MAX);
    let norm_sq = |p: &IntegerPolynomial| {
        let sq: i64 = p.coeffs.iter().map(|&c| i64::from(c) * i64::from(c)).sum();
        n64 * sq - p.sum_coeffs() * p.sum_coeffs()
    };
    // Both the threshold and the inner product are scaled by n
    let threshold = 2 * (norm_sq(f) + norm_sq(g));
    let (sum_u, sum_v) = (f.sum_coeffs(), g.sum_coeffs());

    let mut u = f.clone();
    let mut v = g.clone();
    let (mut j, mut k) = (0, 0);
    while k < n && j < n {
        let dot: i64 = big_f
            .coeffs
            .iter()
            .zip(&u.coeffs)
            .chain(big_g.coeffs.iter().zip(&v.coeffs))
            .map(|(&a, &b)| i64::from(a) * i64::from(b))
            .sum();
        let d = 4 * (n64 * dot - big_f.sum_coeffs() * sum_u - big_g.sum_coeffs() * sum_v);
        if d > threshold {
            big_f.sub(&u);
            big_g.sub(&v);
            k += 1;
            j = 0;
        } else if d < -threshold {
            big_f.add(&u);
            big_g.add(&v);
            k += 1;
            j = 0;
        }
        j += 1;
        u.rotate1();
        v.rotate1();
    }
}


/// One attempt at a basis. `None` means the candidate was rejected and must be redrawn.
fn generate_basis(rng: &mut impl CryptoRngCore, params: &SigningParameters) -> Result<Option<Basis>, Error> {
    let q = params.q;
    let (f, mut f_int, mut fq) = sample_invertible(rng, params, "f")?;
    let rf = resultant(&f_int);

    let mut g_attempts = 0u32;
    let (g, mut g_int, mut big_f, mut big_g) = loop {
        g_attempts += 1;
        let (g, g_int, _) = sample_invertible(rng, params, "g")?;
        let rg = resultant(&g_int);
        if let Some((big_f, big_g)) = complete_basis(&f_int, &rf, &g_int, &rg, params) {
            break (g, g_int, big_f, big_g);
        }
        trace!(attempt = g_attempts, "no basis completion for g; resampling");
    };

    let bound = params.key_norm_bound_sq();
    #[allow(clippy::cast_precision_loss)]
    let norm_ok = (big_f.centered_norm_sq(q) as f64) < bound && (big_g.centered_norm_sq(q) as f64) < bound;
    // A standard basis stores F with a q/2 offset, so it must lie in [-q/2, q/2)
    let fits = params.basis_type == BasisType::Transpose
        || big_f.coeffs.iter().all(|&c| -q / 2 <= c && c < q / 2);

    let basis = if norm_ok && fits {
        let (f_prime, h) = match params.basis_type {
            BasisType::Standard => {
                let h = g_int.mult_mod(&fq, q);
                (Polynomial::Dense(big_f.clone()), h)
            }
            BasisType::Transpose => {
                let h = big_f.mult_mod(&fq, q);
                (g, h)
            }
        };
        Some(Basis { f, f_prime, h })
    } else {
        trace!("basis exceeds the key norm bound; restarting");
        None
    };
    f_int.clear();
    g_int.clear();
    fq.clear();
    big_f.clear();
    big_g.clear();
    Ok(basis)
}


/// Draws bases until one satisfies the key norm bound.
fn generate_bounded_basis(
    rng: &mut impl CryptoRngCore, params: &SigningParameters,
) -> Result<Basis, Error> {
    let mut attempts = 0u32;
    loop {
        attempts += 1;
        if let Some(basis) = generate_basis(rng, params)? {
            debug!(attempts, "basis generated");
            return Ok(basis);
        }
    }
}


/// Generates the `B + 1` bases, each from its own `ChaCha20Rng` seeded by `rng`.
/// Basis 0 carries the public key.
pub(crate) fn key_gen(
    rng: &mut impl CryptoRngCore, params: &SigningParameters,
) -> Result<(SigningPublicKey, SigningPrivateKey), Error> {
    ensure!(
        !params.prime_check || params.has_prime_modulus(),
        Error::InvalidParameters("prime check needs 2n+1 prime")
    );
    let mut seeds = vec![[0u8; 32]; params.b + 1];
    for seed in &mut seeds {
        fill_random(rng, seed)?;
    }
    let basis_task = |seed: &[u8; 32]| {
        let mut task_rng = ChaCha20Rng::from_seed(*seed);
        generate_bounded_basis(&mut task_rng, params)
    };

    #[cfg(feature = "parallel")]
    let bases = seeds.par_iter().map(basis_task).collect::<Result<Vec<_>, _>>();
    #[cfg(not(feature = "parallel"))]
    let bases = seeds.iter().map(basis_task).collect::<Result<Vec<_>, _>>();
    seeds.zeroize();
    let bases = bases?;

    debug!(n = params.n, bases = bases.len(), "NTRUSign key pair generated");
    let sk = SigningPrivateKey { params: params.clone(), bases };
    Ok((sk.public_key(), sk))
}


/// `round(f·i/q)·f′ − round(f′·i/q)·f`
fn perturbation(i: &IntegerPolynomial, basis: &Basis, q: i32) -> IntegerPolynomial {
    let mut y = basis.f.mult(i);
    y.div_round(q);
    let mut y = basis.f_prime.mult(&y);
    let mut x = basis.f_prime.mult(i);
    x.div_round(q);
    let x = basis.f.mult(&x);
    y.sub(&x);
    y
}


/// Rounds the representative against bases `B` down to 0, carrying the target to the
/// next basis through the difference of consecutive `h`.
fn sign_representative(mut i: IntegerPolynomial, sk: &SigningPrivateKey) -> IntegerPolynomial {
    let params = &sk.params;
    let q = params.q;
    let mut s = IntegerPolynomial::new(params.n);
    for k in (1..sk.bases.len()).rev() {
        let si = perturbation(&i, &sk.bases[k], q);
        s.add(&si);
        let mut hi = sk.bases[k].h.clone();
        hi.sub(&sk.bases[k - 1].h);
        i = si.mult_mod(&hi, q);
    }
    s.add(&perturbation(&i, &sk.bases[0], q));
    s.mod_positive(q);
    s
}


/// `‖s‖² + β²·‖h·s − i‖² ≤ normBound²` in the centered norm.
fn verify_representative(
    i: &IntegerPolynomial, s: &IntegerPolynomial, h: &IntegerPolynomial, params: &SigningParameters,
) -> bool {
    let q = params.q;
    let mut t = h.mult_mod(s, q);
    t.sub(i);
    #[allow(clippy::cast_precision_loss)]
    let norm_sq = s.centered_norm_sq(q) as f64 + params.beta_sq() * t.centered_norm_sq(q) as f64;
    norm_sq <= params.norm_bound_sq()
}


/// Signs `m`, trying representatives `r = 1, 2, ...` until the signature meets the norm bound.
pub(crate) fn sign(sk: &SigningPrivateKey, m: &[u8]) -> Result<Signature, Error> {
    let params = &sk.params;
    let msg_hash = params.hash_alg.digest(&[m]);
    let h = &sk.bases[0].h;
    for r in 1..=params.sign_fail_tolerance {
        let i = create_message_representative(&msg_hash, r, params.n, params.q, params.hash_alg);
        let s = sign_representative(i.clone(), sk);
        if verify_representative(&i, &s, h, params) {
            debug!(attempts = r, "message signed");
            return Ok(Signature { s, r, q: params.q });
        }
        trace!(attempt = r, "signature exceeds the norm bound; retrying");
    }
    Err(Error::SigningFailed { attempts: params.sign_fail_tolerance })
}


/// Checks `sig` on `m` against `pk`.
pub(crate) fn verify(pk: &SigningPublicKey, m: &[u8], sig: &Signature) -> Result<bool, Error> {
    let params = &pk.params;
    ensure!(sig.s.len() == params.n, Error::MalformedEncoding("signature dimension mismatch"));
    ensure!(sig.q == params.q, Error::MalformedEncoding("signature modulus mismatch"));
    let msg_hash = params.hash_alg.digest(&[m]);
    let i = create_message_representative(&msg_hash, sig.r, params.n, params.q, params.hash_alg);
    Ok(verify_representative(&i, &sig.s, &pk.h, params))
}


impl Signer for SigningPrivateKey {
    type Signature = Signature;

    fn try_sign(&self, message: &[u8]) -> Result<Signature, Error> { sign(self, message) }
}


impl Verifier for SigningPublicKey {
    type Signature = Signature;

    fn try_verify(&self, message: &[u8], signature: &Signature) -> Result<bool, Error> {
        verify(self, message, signature)
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use rand_chacha::rand_core::SeedableRng;

    fn check_completion(alg: KeyGenAlg) {
        let mut rng = rand_chacha::ChaCha8Rng::seed_from_u64(31);
        let params = SigningParameters::TEST157.with_key_gen_alg(alg);
        let (_, f, _) = sample_invertible(&mut rng, &params, "f").unwrap();
        let rf = resultant(&f);
        let (big_f, big_g, g) = loop {
            let (_, g, _) = sample_invertible(&mut rng, &params, "g").unwrap();
            let rg = resultant(&g);
            if let Some((big_f, big_g)) = complete_basis(&f, &rf, &g, &rg, &params) {
                break (big_f, big_g, g);
            }
        };
        // f·G − g·F = q
        let mut lhs = f.mult(&big_g);
        lhs.sub(&g.mult(&big_f));
        let mut expected = IntegerPolynomial::new(params.n);
        expected.coeffs[0] = params.q;
        assert_eq!(lhs, expected);
        assert!(big_f.centered_norm_sq(params.q) < 80 * 80);
    }

    #[test]
    fn test_basis_completion_resultant() { check_completion(KeyGenAlg::Resultant); }

    #[test]
    fn test_basis_completion_float() { check_completion(KeyGenAlg::Float); }

    #[test]
    fn test_minimize_keeps_determinant() {
        let f = IntegerPolynomial::from_coeffs(vec![1, 1, 0, -1, 0]);
        let g = IntegerPolynomial::from_coeffs(vec![0, 1, 1, 0, -1]);
        let mut big_f = IntegerPolynomial::from_coeffs(vec![40, 41, 3, -37, 0]);
        let mut big_g = IntegerPolynomial::from_coeffs(vec![2, 40, 42, 1, -38]);
        let before = big_f.centered_norm_sq(1 << 20) + big_g.centered_norm_sq(1 << 20);
        let mut det = f.mult(&big_g);
        det.sub(&g.mult(&big_f));
        minimize_fg(&f, &g, &mut big_f, &mut big_g);
        let mut det_after = f.mult(&big_g);
        det_after.sub(&g.mult(&big_f));
        assert_eq!(det, det_after);
        assert!(big_f.centered_norm_sq(1 << 20) + big_g.centered_norm_sq(1 << 20) < before);
    }

    #[test]
    fn test_sign_verify_small_sets() {
        let mut rng = rand_chacha::ChaCha8Rng::seed_from_u64(123);
        let standard = SigningParameters { basis_type: BasisType::Standard, ..SigningParameters::TEST157 };
        for params in [SigningParameters::TEST157, SigningParameters::TEST157_PROD, standard] {
            let (pk, sk) = key_gen(&mut rng, &params).unwrap();
            assert_eq!(sk.bases.len(), params.b + 1);
            assert_eq!(sk.public_key(), pk);
            let sig = sign(&sk, b"hello").unwrap();
            assert!(sig.r >= 1);
            assert!(verify(&pk, b"hello", &sig).unwrap());
            assert!(!verify(&pk, b"hellp", &sig).unwrap());

            let mut bad = sig.clone();
            bad.s.coeffs[params.n - 1] ^= 1;
            assert!(!verify(&pk, b"hello", &bad).unwrap());
        }
    }

    #[test]
    fn test_signing_is_deterministic() {
        let mut rng = rand_chacha::ChaCha8Rng::seed_from_u64(8);
        let (_, sk) = key_gen(&mut rng, &SigningParameters::TEST157).unwrap();
        assert_eq!(sign(&sk, b"abc").unwrap(), sign(&sk, b"abc").unwrap());
    }

    #[test]
    fn test_zero_tolerance_fails() {
        let mut rng = rand_chacha::ChaCha8Rng::seed_from_u64(9);
        let params = SigningParameters::TEST157.with_sign_fail_tolerance(0);
        let (_, sk) = key_gen(&mut rng, &params).unwrap();
        assert_eq!(sign(&sk, b"x"), Err(Error::SigningFailed { attempts: 0 }));
    }

    #[test]
    fn test_key_norms() {
        let mut rng = rand_chacha::ChaCha8Rng::seed_from_u64(10);
        let params = SigningParameters::TEST157;
        let (_, sk) = key_gen(&mut rng, &params).unwrap();
        for basis in &sk.bases {
            assert!(basis.h.coeffs.iter().all(|&c| (0..params.q).contains(&c)));
            assert_eq!(basis.f.to_integer_polynomial().sum_coeffs(), 1);
        }
    }

    #[test]
    fn test_verify_rejects_wrong_dimension() {
        let params = SigningParameters::TEST157;
        let pk = SigningPublicKey { params: params.clone(), h: IntegerPolynomial::new(params.n) };
        let sig = Signature { s: IntegerPolynomial::new(5), r: 1, q: params.q };
        assert!(verify(&pk, b"m", &sig).is_err());
    }

    #[test]
    fn test_verify_rejects_wrong_modulus() {
        let mut rng = rand_chacha::ChaCha8Rng::seed_from_u64(11);
        let params = SigningParameters::TEST157;
        let (pk, sk) = key_gen(&mut rng, &params).unwrap();
        let sig = sign(&sk, b"m").unwrap();
        let other = Signature { q: 512, ..sig.clone() };
        assert_eq!(verify(&pk, b"m", &other), Err(Error::MalformedEncoding("signature modulus mismatch")));
        assert!(verify(&pk, b"m", &sig).unwrap());
    }

    #[test]
    fn test_prime_check_key_gen() {
        // 2·173 + 1 = 347 is prime, so the resultant check mod 347 runs for every f and g
        let mut rng = rand_chacha::ChaCha8Rng::seed_from_u64(12);
        let params = SigningParameters { n: 173, prime_check: true, ..SigningParameters::TEST157 };
        let (pk, sk) = key_gen(&mut rng, &params).unwrap();
        for basis in &sk.bases {
            let f = basis.f.to_integer_polynomial();
            assert_ne!(resultant_mod(&f, 347).unwrap().res, 0);
        }
        let sig = sign(&sk, b"hello").unwrap();
        assert!(verify(&pk, b"hello", &sig).unwrap());
        assert!(!verify(&pk, b"hellp", &sig).unwrap());

        // 2·157 + 1 = 315 is composite
        let composite = SigningParameters { prime_check: true, ..SigningParameters::TEST157 };
        assert_eq!(
            key_gen(&mut rng, &composite).map(|_| ()),
            Err(Error::InvalidParameters("prime check needs 2n+1 prime"))
        );
    }
}
