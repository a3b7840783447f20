use crate::error::Error;
use rand_core::CryptoRngCore;

/// If the condition is not met, return the given error. Borrowed from the `anyhow` crate.
macro_rules! ensure {
    ($cond:expr, $err:expr $(,)?) => {
        if !$cond {
            return Err($err);
        }
    };
}

pub(crate) use ensure; // make available throughout crate


/// Bit length required to express `a` in bits (`bitlen(0) = 0`)
pub(crate) const fn bit_length(a: u32) -> u32 { u32::BITS - a.leading_zeros() }


/// Bits per coefficient of the mod-`q` packing; `ceil(log2(q))`.
pub(crate) const fn bits_per_coeff(q: u32) -> u32 {
    if q <= 1 {
        0
    } else {
        bit_length(q - 1)
    }
}


/// Fills `out` from the caller's RNG, mapping its failure into [`Error::RandomSource`].
pub(crate) fn fill_random(rng: &mut impl CryptoRngCore, out: &mut [u8]) -> Result<(), Error> {
    rng.try_fill_bytes(out).map_err(|_| Error::RandomSource)
}


/// Uniformly random integer in `[0, bound)` via rejection sampling of 32-bit words.
pub(crate) fn random_below(rng: &mut impl CryptoRngCore, bound: usize) -> Result<usize, Error> {
    debug_assert!(bound > 0 && u32::try_from(bound).is_ok(), "random_below: bound out of range");
    let bound32 = u32::try_from(bound).unwrap_or(u32::MAX);
    let zone = (1u64 << 32) - ((1u64 << 32) % u64::from(bound32));
    let mut word = [0u8; 4];
    loop {
        fill_random(rng, &mut word)?;
        let candidate = u32::from_le_bytes(word);
        if u64::from(candidate) < zone {
            return Ok((candidate % bound32) as usize);
        }
    }
}


/// Java-style `DataOutputStream` helpers used by the parameter persistence format.
pub(crate) struct ByteWriter(pub(crate) Vec<u8>);

impl ByteWriter {
    pub(crate) fn new() -> Self { ByteWriter(Vec::new()) }

    pub(crate) fn put_i32(&mut self, v: i32) { self.0.extend_from_slice(&v.to_be_bytes()); }

    pub(crate) fn put_f64(&mut self, v: f64) { self.0.extend_from_slice(&v.to_bits().to_be_bytes()); }

    pub(crate) fn put_bool(&mut self, v: bool) { self.0.push(u8::from(v)); }

    pub(crate) fn put_u8(&mut self, v: u8) { self.0.push(v); }

    pub(crate) fn put_bytes(&mut self, v: &[u8]) { self.0.extend_from_slice(v); }

    /// Two-byte big-endian length followed by the UTF-8 bytes (ASCII names only).
    pub(crate) fn put_utf(&mut self, s: &str) {
        let len = u16::try_from(s.len()).unwrap_or(u16::MAX);
        self.0.extend_from_slice(&len.to_be_bytes());
        self.0.extend_from_slice(&s.as_bytes()[..usize::from(len)]);
    }
}


/// Cursor over a persisted byte stream; every read is bounds-checked.
pub(crate) struct ByteReader<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> ByteReader<'a> {
    pub(crate) fn new(data: &'a [u8]) -> Self { ByteReader { data, pos: 0 } }

    pub(crate) fn take(&mut self, len: usize) -> Result<&'a [u8], Error> {
        ensure!(
            self.data.len() - self.pos >= len,
            Error::MalformedEncoding("unexpected end of input")
        );
        let out = &self.data[self.pos..self.pos + len];
        self.pos += len;
        Ok(out)
    }

    pub(crate) fn get_i32(&mut self) -> Result<i32, Error> {
        let b = self.take(4)?;
        Ok(i32::from_be_bytes([b[0], b[1], b[2], b[3]]))
    }

    /// Reads a big-endian `i32` that must be non-negative.
    pub(crate) fn get_count(&mut self) -> Result<u32, Error> {
        u32::try_from(self.get_i32()?).map_err(|_| Error::MalformedEncoding("negative field"))
    }

    pub(crate) fn get_f64(&mut self) -> Result<f64, Error> {
        let b = self.take(8)?;
        let mut raw = [0u8; 8];
        raw.copy_from_slice(b);
        Ok(f64::from_bits(u64::from_be_bytes(raw)))
    }

    pub(crate) fn get_bool(&mut self) -> Result<bool, Error> { Ok(self.take(1)?[0] != 0) }

    pub(crate) fn get_u8(&mut self) -> Result<u8, Error> { Ok(self.take(1)?[0]) }

    pub(crate) fn get_utf(&mut self) -> Result<String, Error> {
        let len = self.take(2)?;
        let len = usize::from(u16::from_be_bytes([len[0], len[1]]));
        let raw = self.take(len)?;
        String::from_utf8(raw.to_vec()).map_err(|_| Error::MalformedEncoding("invalid utf-8 name"))
    }

    pub(crate) fn remaining(&self) -> usize { self.data.len() - self.pos }
}


#[cfg(test)]
mod tests {
    use super::*;
    use rand_chacha::rand_core::SeedableRng;

    #[test]
    fn test_bit_length() {
        assert_eq!(bit_length(0), 0);
        assert_eq!(bit_length(1), 1);
        assert_eq!(bit_length(255), 8);
        assert_eq!(bit_length(256), 9);
        assert_eq!(bits_per_coeff(2048), 11);
        assert_eq!(bits_per_coeff(256), 8);
        assert_eq!(bits_per_coeff(4), 2);
    }

    #[test]
    fn test_random_below_in_range() {
        let mut rng = rand_chacha::ChaCha8Rng::seed_from_u64(7);
        for bound in [1usize, 2, 3, 157, 1499] {
            for _ in 0..200 {
                assert!(random_below(&mut rng, bound).unwrap() < bound);
            }
        }
    }

    #[cfg(all(debug_assertions, target_pointer_width = "64"))]
    #[test]
    #[should_panic(expected = "bound out of range")]
    fn test_random_below_oversized_bound() {
        let mut rng = rand_chacha::ChaCha8Rng::seed_from_u64(7);
        let _ = random_below(&mut rng, 1 << 40);
    }

    #[test]
    fn test_stream_round_trip() {
        let mut w = ByteWriter::new();
        w.put_i32(-5);
        w.put_f64(0.165);
        w.put_bool(true);
        w.put_utf("SHA-256");
        let bytes = w.0;
        let mut r = ByteReader::new(&bytes);
        assert_eq!(r.get_i32().unwrap(), -5);
        assert!((r.get_f64().unwrap() - 0.165).abs() < f64::EPSILON);
        assert!(r.get_bool().unwrap());
        assert_eq!(r.get_utf().unwrap(), "SHA-256");
        assert_eq!(r.remaining(), 0);
        assert!(r.get_u8().is_err());
    }
}
