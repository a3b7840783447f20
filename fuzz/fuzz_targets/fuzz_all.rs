#![no_main]

use libfuzzer_sys::fuzz_target;
use ntru::traits::{Decryptor, SerDes, Signer, Verifier};
use ntru::{ntru_encrypt, ntru_sign, EncryptionParameters, SigningParameters};
use rand_chacha::rand_core::SeedableRng;

fuzz_target!(|data: &[u8]| {
    let enc = EncryptionParameters::TEST157;
    let sig = SigningParameters::TEST157;

    // Parameter streams must never panic
    let _p = EncryptionParameters::from_bytes(data);
    let _p = SigningParameters::from_bytes(data);

    // Deserialize 'fuzzy' keys; a decent proportion of public keys will deserialize OK
    if let Ok(pk) = ntru_encrypt::PublicKey::try_from_bytes(&enc, data) {
        let _b = pk.to_bytes();
    }
    if let Ok(sk) = ntru_encrypt::PrivateKey::try_from_bytes(&enc, data) {
        let _m = sk.try_decrypt(&[0u8; 157]);
    }
    if let Ok(sk) = ntru_sign::PrivateKey::try_from_bytes(&sig, data) {
        let _s = sk.try_sign(&[0u8, 1, 2, 3]);
    }

    // 'Fuzzy' ciphertexts and signatures against a good key pair
    let mut rng = rand_chacha::ChaCha8Rng::seed_from_u64(123);
    let (_, sk) = ntru_encrypt::try_keygen_with_rng(&mut rng, &enc).unwrap();
    assert!(sk.try_decrypt(data).is_err() || data.len() == enc.ciphertext_len());

    if let Ok(s) = ntru_sign::Signature::try_from_bytes(&sig, data) {
        let (pk, _) = ntru_sign::try_keygen_with_rng(&mut rng, &sig).unwrap();
        let _v = pk.try_verify(&[0u8, 1, 2, 3], &s);
    }
});
