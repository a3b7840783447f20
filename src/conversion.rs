// Bit-exact array encoders: the mod-q packing shared by keys, ciphertexts and
// signatures, the tight base-3 packing of ternary private keys, and the SVES
// 3-bit/2-trit conversion of IEEE P1363.1 section 9.2.2.

use crate::error::Error;
use crate::helpers::{bits_per_coeff, ensure};


/// Bits used per sparse index; supports ring dimensions up to 2048.
pub(crate) const BITS_PER_INDEX: u32 = 11;

/// SVES: first trit of the pair selected by `bit1·4 + bit2·2 + bit3`.
const COEFF1_TABLE: [i32; 8] = [0, 0, 0, 1, 1, 1, -1, -1];

/// SVES: second trit of the pair selected by `bit1·4 + bit2·2 + bit3`.
const COEFF2_TABLE: [i32; 8] = [0, 1, -1, 0, 1, -1, 0, 1];

// Inverse tables, indexed by `(c1 + 1)·3 + (c2 + 1)`; entry 0 is the illegal pair (-1, -1).
const BIT1_TABLE: [u8; 9] = [1, 1, 1, 0, 0, 0, 1, 0, 1];
const BIT2_TABLE: [u8; 9] = [1, 1, 1, 1, 0, 0, 0, 1, 0];
const BIT3_TABLE: [u8; 9] = [1, 0, 1, 0, 0, 1, 1, 1, 0];


/// Length in bytes of `n` coefficients packed at `ceil(log2(q))` bits each.
pub(crate) fn mod_q_len(n: usize, q: i32) -> usize {
    #[allow(clippy::cast_sign_loss)]
    let bits = bits_per_coeff(q as u32) as usize;
    (n * bits + 7) / 8
}


/// Packs coefficients in `[0, q)` at `ceil(log2(q))` bits each, least significant bit first.
pub(crate) fn encode_mod_q(coeffs: &[i32], q: i32) -> Vec<u8> {
    debug_assert!(q > 1 && (q & (q - 1)) == 0, "encode_mod_q: q must be a power of two");
    debug_assert!(coeffs.iter().all(|c| (0..q).contains(c)), "encode_mod_q: coefficient out of range");
    #[allow(clippy::cast_sign_loss)]
    let bitlen = bits_per_coeff(q as u32);
    let mut out = vec![0u8; mod_q_len(coeffs.len(), q)];
    let mut temp = 0u64; // new values enter at the top, bytes leave from the bottom
    let mut bit_index = 0;
    let mut byte_index = 0;

    #[allow(clippy::cast_sign_loss)]
    for &coeff in coeffs {
        temp |= u64::from(coeff as u32) << bit_index;
        bit_index += bitlen;
        while bit_index > 7 {
            out[byte_index] = temp.to_le_bytes()[0];
            temp >>= 8;
            byte_index += 1;
            bit_index -= 8;
        }
    }
    if bit_index > 0 {
        out[byte_index] = temp.to_le_bytes()[0];
    }
    out
}


/// Reverses [`encode_mod_q`]; `bytes` must hold exactly `n` packed coefficients.
///
/// # Errors
/// Returns [`Error::MalformedEncoding`] on a length mismatch or nonzero padding bits.
pub(crate) fn decode_mod_q(bytes: &[u8], n: usize, q: i32) -> Result<Vec<i32>, Error> {
    ensure!(bytes.len() == mod_q_len(n, q), Error::MalformedEncoding("mod q encoding length"));
    #[allow(clippy::cast_sign_loss)]
    let bitlen = bits_per_coeff(q as u32);
    let mask = (1u64 << bitlen) - 1;
    let mut out = Vec::with_capacity(n);
    let mut temp = 0u64;
    let mut bit_index = 0;

    for &byte in bytes {
        temp |= u64::from(byte) << bit_index;
        bit_index += 8;
        while bit_index >= bitlen && out.len() < n {
            #[allow(clippy::cast_possible_truncation)]
            out.push((temp & mask) as i32);
            temp >>= bitlen;
            bit_index -= bitlen;
        }
    }
    ensure!(temp == 0, Error::MalformedEncoding("nonzero padding bits"));
    Ok(out)
}


/// Packs `coeffs mod 4` at two bits each; used to seed the mask generator from `R`.
pub(crate) fn encode_mod4(coeffs: &[i32]) -> Vec<u8> {
    let reduced: Vec<i32> = coeffs.iter().map(|c| c & 3).collect();
    encode_mod_q(&reduced, 4)
}


/// Tight ternary packing: five trits per byte as `Σ (c_{5k+j} + 1)·3^j`.
pub(crate) fn encode_ternary_tight(coeffs: &[i32]) -> Vec<u8> {
    debug_assert!(coeffs.iter().all(|c| (-1..=1).contains(c)), "tight packing: not ternary");
    coeffs
        .chunks(5)
        .map(|chunk| {
            let value = chunk.iter().rev().fold(0i32, |acc, &c| acc * 3 + (c + 1));
            u8::try_from(value).unwrap_or(0)
        })
        .collect()
}


/// Reverses [`encode_ternary_tight`].
///
/// # Errors
/// Returns [`Error::MalformedEncoding`] on a length mismatch or a byte above 242.
pub(crate) fn decode_ternary_tight(bytes: &[u8], n: usize) -> Result<Vec<i32>, Error> {
    ensure!(bytes.len() == (n + 4) / 5, Error::MalformedEncoding("ternary encoding length"));
    let mut out = Vec::with_capacity(n);
    for &byte in bytes {
        ensure!(byte < 243, Error::MalformedEncoding("ternary byte out of range"));
        let mut value = i32::from(byte);
        for _ in 0..5 {
            if out.len() == n {
                break;
            }
            out.push(value % 3 - 1);
            value /= 3;
        }
    }
    // Unused high digits of the final byte must be zero
    let used = n % 5;
    if used != 0 {
        let last = i32::from(bytes[bytes.len() - 1]);
        let padding = last / 3_i32.pow(u32::try_from(used).unwrap_or(0));
        ensure!(padding == 0, Error::MalformedEncoding("ternary padding"));
    }
    Ok(out)
}


fn get_bit(data: &[u8], index: usize) -> u8 { data.get(index / 8).map_or(0, |b| (b >> (index % 8)) & 1) }


/// SVES bits-to-trits: every three bits (least significant first) yield two trits,
/// producing `n/2` pairs. Positions beyond the pairs stay zero.
pub(crate) fn sves_bits_to_trits(data: &[u8], n: usize) -> Vec<i32> {
    let mut coeffs = vec![0i32; n];
    let mut bit_index = 0;
    for pair in 0..n / 2 {
        let bit1 = get_bit(data, bit_index);
        let bit2 = get_bit(data, bit_index + 1);
        let bit3 = get_bit(data, bit_index + 2);
        bit_index += 3;
        let tbl = usize::from(bit1 * 4 + bit2 * 2 + bit3);
        coeffs[2 * pair] = COEFF1_TABLE[tbl];
        coeffs[2 * pair + 1] = COEFF2_TABLE[tbl];
    }
    coeffs
}


/// SVES trits-to-bits over the first `n/2` pairs, into `((3n/2) + 7)/8` bytes.
///
/// # Errors
/// Returns [`Error::InvalidCiphertext`] on the unused trit pair `(-1, -1)` or a non-ternary trit.
pub(crate) fn sves_trits_to_bits(coeffs: &[i32]) -> Result<Vec<u8>, Error> {
    let n = coeffs.len();
    let mut out = vec![0u8; (n * 3 / 2 + 7) / 8];
    let mut bit_index = 0;
    for pair in coeffs.chunks_exact(2) {
        ensure!(pair.iter().all(|c| (-1..=1).contains(c)), Error::InvalidCiphertext);
        #[allow(clippy::cast_sign_loss)]
        let tbl = ((pair[0] + 1) * 3 + (pair[1] + 1)) as usize;
        ensure!(tbl != 0, Error::InvalidCiphertext);
        for bit in [BIT1_TABLE[tbl], BIT2_TABLE[tbl], BIT3_TABLE[tbl]] {
            out[bit_index / 8] |= bit << (bit_index % 8);
            bit_index += 1;
        }
    }
    Ok(out)
}


/// Packs sparse indices at [`BITS_PER_INDEX`] bits each.
pub(crate) fn encode_indices(indices: &[usize]) -> Vec<u8> {
    let coeffs: Vec<i32> = indices.iter().map(|&i| i32::try_from(i).unwrap_or(0)).collect();
    encode_mod_q(&coeffs, 1 << BITS_PER_INDEX)
}


/// Length in bytes of `count` packed indices.
pub(crate) fn indices_len(count: usize) -> usize { mod_q_len(count, 1 << BITS_PER_INDEX) }


/// Reverses [`encode_indices`]; every index must be below `n`.
///
/// # Errors
/// Returns [`Error::MalformedEncoding`] on a length mismatch or an out-of-range index.
pub(crate) fn decode_indices(bytes: &[u8], count: usize, n: usize) -> Result<Vec<usize>, Error> {
    let raw = decode_mod_q(bytes, count, 1 << BITS_PER_INDEX)?;
    raw.into_iter()
        .map(|i| usize::try_from(i).ok().filter(|&i| i < n).ok_or(Error::MalformedEncoding("index out of range")))
        .collect()
}


#[cfg(test)]
mod tests {
    use super::*;
    use rand::{Rng, SeedableRng};

    #[test]
    fn test_mod_q_known_answer() {
        // 11-bit LSB-first: 0x7ff, 0x001 -> bits 11111111 111 10000 000000 -> ff 0f 00
        assert_eq!(encode_mod_q(&[0x7ff, 1], 2048), vec![0xff, 0x0f, 0x00]);
        assert_eq!(decode_mod_q(&[0xff, 0x0f, 0x00], 2, 2048).unwrap(), vec![0x7ff, 1]);
        assert_eq!(encode_mod_q(&[1, 2, 3, 0], 4), vec![0b0011_1001]);
        assert!(decode_mod_q(&[0xff], 2, 2048).is_err());
        assert!(decode_mod_q(&[0xff, 0x0f, 0x40], 2, 2048).is_err());
    }

    #[test]
    fn test_mod_q_random() {
        let mut rng = rand_chacha::ChaCha8Rng::seed_from_u64(11);
        for q in [4, 256, 2048] {
            let coeffs: Vec<i32> = (0..157).map(|_| rng.gen_range(0..q)).collect();
            let bytes = encode_mod_q(&coeffs, q);
            assert_eq!(bytes.len(), mod_q_len(157, q));
            assert_eq!(decode_mod_q(&bytes, 157, q).unwrap(), coeffs);
        }
    }

    #[test]
    fn test_mod4() {
        assert_eq!(encode_mod4(&[5, 2047, 4, 1]), vec![0b0100_1101]);
    }

    #[test]
    fn test_ternary_tight() {
        // (c + 1) digits 2,1,0,0,0 -> 2 + 1·3 = 5; then 0,1 -> 3
        let coeffs = [1, 0, -1, -1, -1, -1, 0];
        let bytes = encode_ternary_tight(&coeffs);
        assert_eq!(bytes, vec![5, 3]);
        assert_eq!(decode_ternary_tight(&bytes, 7).unwrap(), coeffs.to_vec());
        assert!(decode_ternary_tight(&[243, 3], 7).is_err());
        assert!(decode_ternary_tight(&[5], 7).is_err());
    }

    #[test]
    fn test_ternary_tight_padding_mismatch() {
        // n = 7 leaves three unused high digits in the last byte
        let good = encode_ternary_tight(&[0, 0, 0, 0, 0, 1, 1]);
        assert_eq!(good, vec![121, 8]);
        assert!(decode_ternary_tight(&good, 7).is_ok());
        assert!(decode_ternary_tight(&[121, 8 + 9], 7).is_err());
    }

    #[test]
    fn test_sves_tables_invert() {
        for tbl in 0u8..8 {
            let data = [((tbl >> 2) & 1) | (((tbl >> 1) & 1) << 1) | ((tbl & 1) << 2)];
            let trits = sves_bits_to_trits(&data, 2);
            assert_eq!(trits, vec![COEFF1_TABLE[usize::from(tbl)], COEFF2_TABLE[usize::from(tbl)]]);
            assert_eq!(sves_trits_to_bits(&trits).unwrap(), data.to_vec());
        }
        assert_eq!(sves_trits_to_bits(&[-1, -1]), Err(Error::InvalidCiphertext));
    }

    #[test]
    fn test_sves_message_buffer() {
        let mut rng = rand_chacha::ChaCha8Rng::seed_from_u64(3);
        let n = 157;
        let mut data = vec![0u8; 30];
        rng.fill(&mut data[..29]);
        data[29] &= 0x03; // only 234 bits fit in 78 trit pairs
        let trits = sves_bits_to_trits(&data, n);
        assert_eq!(trits[n - 1], 0);
        assert_eq!(sves_trits_to_bits(&trits[..n - 1]).unwrap()[..29], data[..29]);
        assert_eq!(sves_trits_to_bits(&trits).unwrap(), data);
    }

    #[test]
    fn test_indices() {
        let idx = [0usize, 5, 156, 2047];
        let bytes = encode_indices(&idx);
        assert_eq!(bytes.len(), indices_len(4));
        assert_eq!(decode_indices(&bytes, 4, 2048).unwrap(), idx.to_vec());
        assert!(decode_indices(&bytes, 4, 157).is_err());
    }
}
