#![no_main]
use libfuzzer_sys::fuzz_target;
use ntru::traits::{SerDes, Signer, Verifier};
use ntru::{ntru_sign, SigningParameters};
use rand_chacha::rand_core::SeedableRng;


fuzz_target!(|data: &[u8]| {
    // Skip empty inputs
    if data.is_empty() {
        return;
    }

    // Static key pair (for speed)
    let params = SigningParameters::TEST157;
    let mut rng = rand_chacha::ChaCha8Rng::seed_from_u64(42);
    let (pk, sk) = ntru_sign::try_keygen_with_rng(&mut rng, &params).unwrap();

    // Valid signature should verify, modified message should not
    if let Ok(sig) = sk.try_sign(data) {
        assert!(pk.try_verify(data, &sig).unwrap());
        let mut modified_msg = data.to_vec();
        modified_msg[0] ^= 1;
        assert!(!pk.try_verify(&modified_msg, &sig).unwrap());

        // Serialized signature verifies the same way
        let sig2 = ntru_sign::Signature::try_from_bytes(&params, &sig.to_bytes()).unwrap();
        assert_eq!(sig, sig2);
    }
});
