// Byte encodings of keys, ciphertexts and signatures. Ternary private polynomials use
// the tight base-3 packing, product-form polynomials their three sparse index lists,
// and everything else the mod-q bit packing.

use crate::conversion::{
    decode_indices, decode_mod_q, decode_ternary_tight, encode_indices, encode_mod_q,
    encode_ternary_tight, indices_len, mod_q_len,
};
use crate::encrypt::compute_fp;
use crate::error::Error;
use crate::helpers::{ensure, ByteReader, ByteWriter};
use crate::params::{BasisType, EncryptionParameters, PolyType, SigningParameters};
use crate::poly::{
    DenseTernaryPolynomial, IntegerPolynomial, Polynomial, ProductFormPolynomial,
    SparseTernaryPolynomial,
};
use crate::traits::SerDes;
use crate::types::{
    Basis, EncryptionPrivateKey, EncryptionPublicKey, Signature, SigningPrivateKey,
    SigningPublicKey,
};


/// How a private polynomial is stored, and the weights needed to read it back.
#[derive(Clone, Copy)]
enum Shape {
    Ternary { sparse: bool },
    /// `(ones, minus ones)` of `f1`, `f2` and `f3`
    Product([(usize, usize); 3]),
}


impl Shape {
    fn for_encryption(params: &EncryptionParameters) -> Self {
        match params.poly_type {
            PolyType::Simple => Shape::Ternary { sparse: params.sparse },
            PolyType::Product => {
                let df3_neg = params.df3 - usize::from(!params.fast_fp);
                Shape::Product([(params.df1, params.df1), (params.df2, params.df2), (params.df3, df3_neg)])
            }
        }
    }

    fn for_signing(params: &SigningParameters) -> Self {
        match params.poly_type {
            PolyType::Simple => Shape::Ternary { sparse: params.sparse },
            PolyType::Product => {
                Shape::Product([(params.d1, params.d1), (params.d2, params.d2), (params.d3 + 1, params.d3)])
            }
        }
    }
}


fn encode_sparse(p: &SparseTernaryPolynomial, w: &mut ByteWriter) {
    w.put_bytes(&encode_indices(p.ones()));
    w.put_bytes(&encode_indices(p.negative_ones()));
}


fn decode_sparse(
    r: &mut ByteReader<'_>, n: usize, (ones, neg_ones): (usize, usize),
) -> Result<SparseTernaryPolynomial, Error> {
    let o = decode_indices(r.take(indices_len(ones))?, ones, n)?;
    let m = decode_indices(r.take(indices_len(neg_ones))?, neg_ones, n)?;
    SparseTernaryPolynomial::from_indices(n, o, m)
}


fn encode_private_poly(p: &Polynomial, w: &mut ByteWriter) {
    if let Polynomial::ProductForm(pf) = p {
        let (f1, f2, f3) = pf.factors();
        encode_sparse(f1, w);
        encode_sparse(f2, w);
        encode_sparse(f3, w);
    } else {
        w.put_bytes(&encode_ternary_tight(&p.to_integer_polynomial().coeffs));
    }
}


fn decode_private_poly(r: &mut ByteReader<'_>, n: usize, shape: Shape) -> Result<Polynomial, Error> {
    match shape {
        Shape::Ternary { sparse } => {
            let coeffs = IntegerPolynomial::from_coeffs(decode_ternary_tight(r.take((n + 4) / 5)?, n)?);
            if sparse {
                Ok(Polynomial::SparseTernary(SparseTernaryPolynomial::from_dense(&coeffs)))
            } else {
                Ok(Polynomial::DenseTernary(DenseTernaryPolynomial::new(coeffs)?))
            }
        }
        Shape::Product([w1, w2, w3]) => {
            let f1 = decode_sparse(r, n, w1)?;
            let f2 = decode_sparse(r, n, w2)?;
            let f3 = decode_sparse(r, n, w3)?;
            Ok(Polynomial::ProductForm(ProductFormPolynomial::new(f1, f2, f3)))
        }
    }
}


fn decode_h(r: &mut ByteReader<'_>, n: usize, q: i32) -> Result<IntegerPolynomial, Error> {
    Ok(IntegerPolynomial::from_coeffs(decode_mod_q(r.take(mod_q_len(n, q))?, n, q)?))
}


/// `F` of a standard basis, stored as `F + q/2 mod q`.
fn encode_offset(p: &IntegerPolynomial, q: i32, w: &mut ByteWriter) {
    let shifted: Vec<i32> = p.coeffs.iter().map(|&c| (c + q / 2).rem_euclid(q)).collect();
    w.put_bytes(&encode_mod_q(&shifted, q));
}


fn decode_offset(r: &mut ByteReader<'_>, n: usize, q: i32) -> Result<IntegerPolynomial, Error> {
    let mut p = decode_h(r, n, q)?;
    p.coeffs.iter_mut().for_each(|c| *c -= q / 2);
    Ok(p)
}


fn finish(r: &ByteReader<'_>) -> Result<(), Error> {
    ensure!(r.remaining() == 0, Error::MalformedEncoding("trailing bytes"));
    Ok(())
}


impl SerDes for EncryptionPublicKey {
    type Params = EncryptionParameters;

    fn to_bytes(&self) -> Vec<u8> { encode_mod_q(&self.h.coeffs, self.params.q) }

    fn try_from_bytes(params: &EncryptionParameters, bytes: &[u8]) -> Result<Self, Error> {
        let mut r = ByteReader::new(bytes);
        let h = decode_h(&mut r, params.n, params.q)?;
        finish(&r)?;
        Ok(EncryptionPublicKey { params: params.clone(), h })
    }
}


impl SerDes for EncryptionPrivateKey {
    type Params = EncryptionParameters;

    fn to_bytes(&self) -> Vec<u8> {
        let mut w = ByteWriter::new();
        w.put_bytes(&encode_mod_q(&self.h.coeffs, self.params.q));
        encode_private_poly(&self.t, &mut w);
        w.0
    }

    /// `fp` is not stored; it is recomputed from `t`.
    fn try_from_bytes(params: &EncryptionParameters, bytes: &[u8]) -> Result<Self, Error> {
        let mut r = ByteReader::new(bytes);
        let h = decode_h(&mut r, params.n, params.q)?;
        let t = decode_private_poly(&mut r, params.n, Shape::for_encryption(params))?;
        finish(&r)?;
        let fp = compute_fp(&t, params).ok_or(Error::MalformedEncoding("f not invertible mod 3"))?;
        Ok(EncryptionPrivateKey { params: params.clone(), t, fp, h })
    }
}


impl SerDes for SigningPublicKey {
    type Params = SigningParameters;

    fn to_bytes(&self) -> Vec<u8> { encode_mod_q(&self.h.coeffs, self.params.q) }

    fn try_from_bytes(params: &SigningParameters, bytes: &[u8]) -> Result<Self, Error> {
        let mut r = ByteReader::new(bytes);
        let h = decode_h(&mut r, params.n, params.q)?;
        finish(&r)?;
        Ok(SigningPublicKey { params: params.clone(), h })
    }
}


impl SerDes for SigningPrivateKey {
    type Params = SigningParameters;

    /// Each basis as `f || f′ [|| h]` (`h` omitted for basis 0), then the public key.
    fn to_bytes(&self) -> Vec<u8> {
        let q = self.params.q;
        let mut w = ByteWriter::new();
        for (k, basis) in self.bases.iter().enumerate() {
            encode_private_poly(&basis.f, &mut w);
            match self.params.basis_type {
                BasisType::Standard => encode_offset(&basis.f_prime.to_integer_polynomial(), q, &mut w),
                BasisType::Transpose => encode_private_poly(&basis.f_prime, &mut w),
            }
            if k != 0 {
                w.put_bytes(&encode_mod_q(&basis.h.coeffs, q));
            }
        }
        w.put_bytes(&encode_mod_q(&self.bases[0].h.coeffs, q));
        w.0
    }

    fn try_from_bytes(params: &SigningParameters, bytes: &[u8]) -> Result<Self, Error> {
        let (n, q) = (params.n, params.q);
        let shape = Shape::for_signing(params);
        let mut r = ByteReader::new(bytes);
        let mut bases = Vec::with_capacity(params.b + 1);
        for k in 0..=params.b {
            let f = decode_private_poly(&mut r, n, shape)?;
            let f_prime = match params.basis_type {
                BasisType::Standard => Polynomial::Dense(decode_offset(&mut r, n, q)?),
                BasisType::Transpose => decode_private_poly(&mut r, n, shape)?,
            };
            // Basis 0 takes the public key, which comes last
            let h = if k == 0 { IntegerPolynomial::new(n) } else { decode_h(&mut r, n, q)? };
            bases.push(Basis { f, f_prime, h });
        }
        bases[0].h = decode_h(&mut r, n, q)?;
        finish(&r)?;
        Ok(SigningPrivateKey { params: params.clone(), bases })
    }
}


impl SerDes for Signature {
    type Params = SigningParameters;

    /// `encode_mod_q(s) || r` with `r` as a 4-byte big-endian integer.
    fn to_bytes(&self) -> Vec<u8> {
        let mut w = ByteWriter::new();
        w.put_bytes(&encode_mod_q(&self.s.coeffs, self.q));
        w.put_bytes(&self.r.to_be_bytes());
        w.0
    }

    fn try_from_bytes(params: &SigningParameters, bytes: &[u8]) -> Result<Self, Error> {
        ensure!(bytes.len() == params.signature_len(), Error::MalformedEncoding("signature length"));
        let mut r = ByteReader::new(bytes);
        let s = decode_h(&mut r, params.n, params.q)?;
        let counter = r.take(4)?;
        let r = u32::from_be_bytes([counter[0], counter[1], counter[2], counter[3]]);
        Ok(Signature { s, r, q: params.q })
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::traits::{Decryptor, Encryptor, Signer, Verifier};
    use rand_chacha::rand_core::SeedableRng;

    #[test]
    fn test_encryption_keys_round_trip() {
        let mut rng = rand_chacha::ChaCha8Rng::seed_from_u64(21);
        for params in [EncryptionParameters::TEST157, EncryptionParameters::APR2011_439_FAST] {
            let (pk, sk) = crate::encrypt::key_gen(&mut rng, &params).unwrap();
            let pk_bytes = pk.to_bytes();
            assert_eq!(pk_bytes.len(), params.ciphertext_len());
            let pk2 = EncryptionPublicKey::try_from_bytes(&params, &pk_bytes).unwrap();
            assert_eq!(pk2, pk);

            let sk2 = EncryptionPrivateKey::try_from_bytes(&params, &sk.to_bytes()).unwrap();
            assert_eq!(sk2, sk);
            let ct = pk2.try_encrypt_with_rng(&mut rng, b"serialized").unwrap();
            assert_eq!(sk2.try_decrypt(&ct).unwrap(), b"serialized");

            assert!(EncryptionPublicKey::try_from_bytes(&params, &pk_bytes[1..]).is_err());
            let mut long = sk.to_bytes();
            long.push(0);
            assert!(EncryptionPrivateKey::try_from_bytes(&params, &long).is_err());
        }
    }

    #[test]
    fn test_signing_keys_round_trip() {
        let mut rng = rand_chacha::ChaCha8Rng::seed_from_u64(22);
        let standard = SigningParameters { basis_type: BasisType::Standard, ..SigningParameters::TEST157 };
        for params in [SigningParameters::TEST157, SigningParameters::TEST157_PROD, standard] {
            let (pk, sk) = crate::sign::key_gen(&mut rng, &params).unwrap();
            let pk2 = SigningPublicKey::try_from_bytes(&params, &pk.to_bytes()).unwrap();
            assert_eq!(pk2, pk);
            let sk2 = SigningPrivateKey::try_from_bytes(&params, &sk.to_bytes()).unwrap();
            assert_eq!(sk2, sk);

            let sig = sk2.try_sign(b"message").unwrap();
            let sig_bytes = sig.to_bytes();
            assert_eq!(sig_bytes.len(), params.signature_len());
            let sig2 = Signature::try_from_bytes(&params, &sig_bytes).unwrap();
            assert_eq!(sig2, sig);
            assert!(pk2.try_verify(b"message", &sig2).unwrap());
            assert!(Signature::try_from_bytes(&params, &sig_bytes[..sig_bytes.len() - 1]).is_err());
        }
    }

    #[test]
    fn test_malformed_private_polynomial() {
        let params = EncryptionParameters::TEST157;
        let mut bytes = vec![0u8; params.ciphertext_len()];
        // Tight ternary bytes above 242 are invalid
        bytes.extend(core::iter::repeat(0xff).take((params.n + 4) / 5));
        assert_eq!(
            EncryptionPrivateKey::try_from_bytes(&params, &bytes),
            Err(Error::MalformedEncoding("ternary byte out of range"))
        );
    }

    #[test]
    fn test_product_form_indices() {
        let n = 157;
        let f1 = SparseTernaryPolynomial::from_indices(n, vec![1, 150], vec![3, 156]).unwrap();
        let mut w = ByteWriter::new();
        encode_sparse(&f1, &mut w);
        assert_eq!(w.0.len(), 2 * indices_len(2));
        let mut r = ByteReader::new(&w.0);
        assert_eq!(decode_sparse(&mut r, n, (2, 2)).unwrap(), f1);
        let mut r = ByteReader::new(&w.0);
        assert!(decode_sparse(&mut r, 100, (2, 2)).is_err());
    }
}
