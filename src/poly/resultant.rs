use crate::poly::bigint::BigIntPolynomial;
use crate::poly::field::{invert_in_ring, inv_mod, pow_mod, resultant_in_ring};
use crate::poly::integer::IntegerPolynomial;
use num::{BigInt, Integer, One, Signed, Zero};


/// Resultant of a polynomial `a` with `X^n - 1` over the integers, together with
/// `rho` satisfying `rho * a ≡ res (mod X^n - 1)`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Resultant {
    /// Scaled inverse: `rho * a = res`
    pub rho: BigIntPolynomial,
    /// `Res(a, X^n - 1)`
    pub res: BigInt,
}


/// The resultant relation reduced modulo a prime.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ModularResultant {
    /// `rho mod p`, coefficients in `[0, p)`
    pub rho: Vec<i64>,
    /// `res mod p`, in `[0, p)`
    pub res: i64,
    /// The prime modulus
    pub modulus: i64,
}


/// Deterministic Miller-Rabin; the bases 2, 7 and 61 are exact below 4,759,123,141.
pub(crate) fn is_prime(n: i64) -> bool {
    if n < 2 {
        return false;
    }
    for small in [2, 3, 5, 7, 11, 13, 61] {
        if n % small == 0 {
            return n == small;
        }
    }
    let mut d = n - 1;
    let mut s = 0;
    while d % 2 == 0 {
        d /= 2;
        s += 1;
    }
    #[allow(clippy::cast_sign_loss)]
    let d = d as u64;
    'witness: for a in [2i64, 7, 61] {
        let mut x = pow_mod(a, d, n);
        if x == 1 || x == n - 1 {
            continue;
        }
        for _ in 1..s {
            x = x * x % n;
            if x == n - 1 {
                continue 'witness;
            }
        }
        return false;
    }
    true
}


/// Primes below 2^31 in descending order.
fn descending_primes() -> impl Iterator<Item = i64> {
    (2..(1i64 << 31)).rev().filter(|&p| is_prime(p))
}


/// `Res(a, X^n - 1) mod p` with the matching `rho`, or `None` when `p` is not a prime
/// below 2^31.
#[must_use]
pub fn resultant_mod(a: &IntegerPolynomial, p: i64) -> Option<ModularResultant> {
    (p < (1i64 << 31) && is_prime(p)).then(|| residues_mod_prime(a, p))
}


fn residues_mod_prime(a: &IntegerPolynomial, p: i64) -> ModularResultant {
    let res = resultant_in_ring(&a.coeffs, p);
    let rho = if res == 0 {
        vec![0; a.len()]
    } else {
        // a is a unit mod p, so rho = res · a^{-1}
        invert_in_ring(&a.coeffs, p)
            .map(|inv| inv.into_iter().map(|c| c * res % p).collect())
            .unwrap_or_else(|| vec![0; a.len()])
    };
    ModularResultant { rho, res, modulus: p }
}


/// Folds the residues of one more prime into the running CRT values.
fn crt_step(values: &mut [BigInt], modulus: &BigInt, residues: &[i64], p: i64) {
    let big_p = BigInt::from(p);
    let m_mod_p = modulus.mod_floor(&big_p);
    let m_inv = BigInt::from(inv_mod(bigint_to_i64(&m_mod_p), p));
    for (v, &r) in values.iter_mut().zip(residues) {
        // v' = v + m · ((r - v) · m^{-1} mod p)
        let delta = ((BigInt::from(r) - &*v) * &m_inv).mod_floor(&big_p);
        *v += modulus * delta;
    }
}


fn bigint_to_i64(a: &BigInt) -> i64 {
    use num::ToPrimitive;
    a.to_i64().unwrap_or(0)
}


/// Computes `Res(a, X^n - 1)` and `rho` over the integers by CRT over 31-bit primes.
///
/// The product of primes grows until it exceeds twice the Hadamard bound
/// `||a||^n` on every entry of the adjugate; primes dividing the resultant are
/// skipped. When too many primes divide it the resultant is zero.
#[must_use]
pub fn resultant(a: &IntegerPolynomial) -> Resultant {
    let n = a.len();
    let norm_sq: f64 = a.coeffs.iter().map(|&c| f64::from(c) * f64::from(c)).sum();
    if n == 0 || norm_sq == 0.0 {
        return Resultant { rho: BigIntPolynomial::new(n), res: BigInt::zero() };
    }
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss, clippy::cast_precision_loss)]
    let bound_bits = (0.5 * n as f64 * norm_sq.log2()).ceil().max(0.0) as u64 + 64;
    let max_bad_primes = bound_bits / 30 + 1;

    let mut modulus = BigInt::one();
    let mut values = vec![BigInt::zero(); n + 1];
    let mut bad_primes = 0u64;
    let mut residues = vec![0i64; n + 1];
    for p in descending_primes() {
        if modulus.bits() > bound_bits {
            break;
        }
        let m = residues_mod_prime(a, p);
        if m.res == 0 {
            bad_primes += 1;
            if bad_primes > max_bad_primes {
                return Resultant { rho: BigIntPolynomial::new(n), res: BigInt::zero() };
            }
            continue;
        }
        residues[..n].copy_from_slice(&m.rho);
        residues[n] = m.res;
        crt_step(&mut values, &modulus, &residues, p);
        modulus *= p;
    }

    // Lift into (-m/2, m/2]
    let half = &modulus >> 1u32;
    for v in &mut values {
        if *v > half {
            *v -= &modulus;
        }
    }
    let res = values.pop().unwrap_or_default();
    Resultant { rho: BigIntPolynomial { coeffs: values }, res }
}


/// Extended Euclid over the integers: returns `(x, y, gcd)` with `a·x + b·y = gcd`, `gcd ≥ 0`.
#[must_use]
pub fn extended_gcd(a: &BigInt, b: &BigInt) -> (BigInt, BigInt, BigInt) {
    let e = a.extended_gcd(b);
    if e.gcd.is_negative() {
        (-e.x, -e.y, -e.gcd)
    } else {
        (e.x, e.y, e.gcd)
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    fn check_relation(a: &IntegerPolynomial, r: &Resultant) {
        let prod = r.rho.mult_small(a);
        assert_eq!(prod.coeffs[0], r.res);
        assert!(prod.coeffs[1..].iter().all(Zero::is_zero));
    }

    #[test]
    fn test_is_prime() {
        let primes: Vec<i64> = (0..40).filter(|&p| is_prime(p)).collect();
        assert_eq!(primes, vec![2, 3, 5, 7, 11, 13, 17, 19, 23, 29, 31, 37]);
        assert!(is_prime(2_147_483_647));
        assert!(!is_prime(2_147_483_645));
        assert_eq!(descending_primes().nth(1), Some(2_147_483_629));
        assert!(is_prime(1487));
        assert!(!is_prime(879));
    }

    #[test]
    fn test_resultant_small() {
        // Res(X^2 - 1, 3 + X) = (3 + 1)(3 - 1)
        let a = IntegerPolynomial::from_coeffs(vec![3, 1]);
        let r = resultant(&a);
        assert_eq!(r.res, BigInt::from(8));
        check_relation(&a, &r);
        let b = IntegerPolynomial::from_coeffs(vec![1, 3]);
        assert_eq!(resultant(&b).res, BigInt::from(-8));
    }

    #[test]
    fn test_resultant_relation_ternary() {
        let a = IntegerPolynomial::from_coeffs(vec![1, -1, 0, 1, 1, 0, -1, 0, 1, 1, -1, 0, 0, 1, -1, 1, 0]);
        let r = resultant(&a);
        assert!(!r.res.is_zero());
        check_relation(&a, &r);
        let m = resultant_mod(&a, 1487).unwrap();
        assert_eq!(BigInt::from(m.res), r.res.mod_floor(&BigInt::from(1487)));
    }

    #[test]
    fn test_resultant_zero() {
        // a(1) = 0
        let a = IntegerPolynomial::from_coeffs(vec![1, -1, 1, -1, 0, 0, 0]);
        assert!(resultant(&a).res.is_zero());
        assert_eq!(resultant_mod(&a, 31).unwrap().res, 0);
    }

    #[test]
    fn test_resultant_mod_needs_prime() {
        let a = IntegerPolynomial::from_coeffs(vec![1, 1, 0, -1, 0, 1, 0]);
        assert!(resultant_mod(&a, 15).is_none());
        assert!(resultant_mod(&a, 315).is_none());
        assert!(resultant_mod(&a, 1).is_none());
        assert!(resultant_mod(&a, 347).is_some());
    }

    #[test]
    fn test_extended_gcd() {
        let a = BigInt::from(240);
        let b = BigInt::from(-46);
        let (x, y, g) = extended_gcd(&a, &b);
        assert_eq!(g, BigInt::from(2));
        assert_eq!(&a * &x + &b * &y, g);
    }
}
