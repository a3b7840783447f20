// Dense polynomial arithmetic over the prime field F_p. This backs the ring inversions
// (mod 2 and mod 3) and the modular resultants used by NTRUSign key generation. All
// coefficient vectors are kept reduced into [0, p) and trimmed of high zero terms.
// Moduli are below 2^31 so products fit comfortably in an i64.


/// `base^exp mod p` by right-to-left binary exponentiation.
pub(crate) fn pow_mod(base: i64, exp: u64, p: i64) -> i64 {
    let mut result = 1 % p;
    let mut s = base.rem_euclid(p);
    let mut e = exp;
    while e != 0 {
        if e & 1 != 0 {
            result = result * s % p;
        }
        e >>= 1;
        if e != 0 {
            s = s * s % p;
        }
    }
    result
}


/// Multiplicative inverse of a nonzero element of `F_p` via Fermat.
pub(crate) fn inv_mod(a: i64, p: i64) -> i64 {
    debug_assert!(a.rem_euclid(p) != 0, "inv_mod: zero has no inverse");
    #[allow(clippy::cast_sign_loss)]
    pow_mod(a, (p - 2) as u64, p)
}


fn trim(v: &mut Vec<i64>) {
    while let Some(&0) = v.last() {
        let _ = v.pop();
    }
}


fn reduce(a: &[i32], p: i64) -> Vec<i64> {
    let mut v: Vec<i64> = a.iter().map(|&c| i64::from(c).rem_euclid(p)).collect();
    trim(&mut v);
    v
}


/// `X^n - 1` over `F_p`
fn cyclic_modulus(n: usize, p: i64) -> Vec<i64> {
    let mut m = vec![0i64; n + 1];
    m[0] = p - 1;
    m[n] = 1;
    m
}


/// Polynomial long division; `b` must be trimmed and nonzero.
fn div_rem(a: &[i64], b: &[i64], p: i64) -> (Vec<i64>, Vec<i64>) {
    debug_assert!(b.last().is_some_and(|&c| c != 0), "div_rem: untrimmed divisor");
    let mut r = a.to_vec();
    trim(&mut r);
    if r.len() < b.len() {
        return (Vec::new(), r);
    }
    let db = b.len() - 1;
    let inv_lc = inv_mod(b[db], p);
    let mut q = vec![0i64; r.len() - db];
    while !r.is_empty() && r.len() >= b.len() {
        let shift = r.len() - b.len();
        let coef = r[r.len() - 1] * inv_lc % p;
        q[shift] = coef;
        for (i, &bi) in b.iter().enumerate() {
            r[shift + i] = (r[shift + i] - coef * bi).rem_euclid(p);
        }
        trim(&mut r);
    }
    trim(&mut q);
    (q, r)
}


fn mul(a: &[i64], b: &[i64], p: i64) -> Vec<i64> {
    if a.is_empty() || b.is_empty() {
        return Vec::new();
    }
    let mut c = vec![0i64; a.len() + b.len() - 1];
    for (i, &ai) in a.iter().enumerate() {
        if ai == 0 {
            continue;
        }
        for (j, &bj) in b.iter().enumerate() {
            c[i + j] = (c[i + j] + ai * bj) % p;
        }
    }
    trim(&mut c);
    c
}


fn sub(a: &[i64], b: &[i64], p: i64) -> Vec<i64> {
    let mut c = vec![0i64; a.len().max(b.len())];
    for (i, e) in c.iter_mut().enumerate() {
        let x = a.get(i).copied().unwrap_or(0);
        let y = b.get(i).copied().unwrap_or(0);
        *e = (x - y).rem_euclid(p);
    }
    trim(&mut c);
    c
}


/// Inverse of `a` in `F_p[X]/(X^n - 1)` by the extended Euclidean algorithm, where
/// `n = a.len()`. Returns `None` when `a` shares a factor with `X^n - 1`.
pub(crate) fn invert_in_ring(a: &[i32], p: i64) -> Option<Vec<i64>> {
    let n = a.len();
    if n == 0 {
        return None;
    }
    // Invariant: s_i * a ≡ r_i (mod X^n - 1)
    let mut r0 = cyclic_modulus(n, p);
    let mut r1 = reduce(a, p);
    let mut s0: Vec<i64> = Vec::new();
    let mut s1: Vec<i64> = vec![1];
    while !r1.is_empty() {
        let (q, r) = div_rem(&r0, &r1, p);
        let s2 = sub(&s0, &mul(&q, &s1, p), p);
        r0 = core::mem::replace(&mut r1, r);
        s0 = core::mem::replace(&mut s1, s2);
    }
    // r0 is now the gcd; only a nonzero constant means a unit
    if r0.len() != 1 {
        return None;
    }
    let scale = inv_mod(r0[0], p);
    let mut out = vec![0i64; n];
    for (i, c) in s0.iter().enumerate() {
        out[i % n] = (out[i % n] + c * scale) % p;
    }
    Some(out)
}


/// `Res(X^n - 1, a) mod p`, i.e. the product of `a(ζ)` over the roots `ζ` of `X^n - 1`.
pub(crate) fn resultant_in_ring(a: &[i32], p: i64) -> i64 {
    let n = a.len();
    let mut x = cyclic_modulus(n, p);
    let mut y = reduce(a, p);
    if n == 0 || y.is_empty() {
        return 0;
    }
    let mut acc = 1 % p;
    loop {
        let dx = x.len() - 1;
        let dy = y.len() - 1;
        if dy == 0 {
            return acc * pow_mod(y[0], dx as u64, p) % p;
        }
        let (_, r) = div_rem(&x, &y, p);
        if r.is_empty() {
            return 0;
        }
        let dr = r.len() - 1;
        // res(x, y) = (-1)^(dx·dy) · lc(y)^(dx - dr) · res(y, x mod y)
        if (dx * dy) % 2 == 1 {
            acc = (p - acc) % p;
        }
        acc = acc * pow_mod(y[dy], (dx - dr) as u64, p) % p;
        x = core::mem::replace(&mut y, r);
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    fn cyclic_mult(a: &[i32], b: &[i64], p: i64) -> Vec<i64> {
        let n = a.len();
        let mut c = vec![0i64; n];
        for i in 0..n {
            for j in 0..n {
                c[(i + j) % n] = (c[(i + j) % n] + i64::from(a[i]) * b[j]).rem_euclid(p);
            }
        }
        c
    }

    #[test]
    fn test_invert_mod_3() {
        let a = [1, -1, 0, 1, 1, 0, -1];
        let inv = invert_in_ring(&a, 3).unwrap();
        let prod = cyclic_mult(&a, &inv, 3);
        assert_eq!(prod[0], 1);
        assert!(prod[1..].iter().all(|&c| c == 0));
    }

    #[test]
    fn test_no_inverse() {
        // a(1) = 0 so X - 1 divides a
        let a = [1, -1, 0, 0, 0];
        assert!(invert_in_ring(&a, 3).is_none());
        assert_eq!(resultant_in_ring(&a, 3), 0);
        assert!(invert_in_ring(&[0, 0, 0], 2).is_none());
    }

    #[test]
    fn test_resultant_small() {
        // Res(X^2 - 1, a0 + a1 X) = a(1)·a(-1) = (a0 + a1)(a0 - a1)
        let p = 1_000_003;
        assert_eq!(resultant_in_ring(&[3, 1], p), 8);
        assert_eq!(resultant_in_ring(&[1, 3], p), (p - 8) % p);
        // n = 1: Res(X - 1, c) = c
        assert_eq!(resultant_in_ring(&[5], p), 5);
    }

    #[test]
    fn test_pow_mod() {
        assert_eq!(pow_mod(2, 10, 1_000_007), 1024);
        assert_eq!(pow_mod(3, 0, 7), 1);
        assert_eq!(inv_mod(3, 7), 5);
    }
}
