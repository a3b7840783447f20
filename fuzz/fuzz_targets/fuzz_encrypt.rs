#![no_main]
use libfuzzer_sys::fuzz_target;
use ntru::traits::{Decryptor, Encryptor};
use ntru::{ntru_encrypt, EncryptionParameters};
use rand_chacha::ChaCha20Rng;
use rand_core::SeedableRng;


// Helper to create deterministic RNG from data
fn create_rng(seed_data: &[u8]) -> ChaCha20Rng {
    let mut arr = [0u8; 32];
    let len = seed_data.len().min(32);
    arr[..len].copy_from_slice(&seed_data[..len]);
    ChaCha20Rng::from_seed(arr)
}


fuzz_target!(|data: &[u8]| {
    let params = EncryptionParameters::TEST157;
    let mut rng = create_rng(data);
    let (pk, sk) = ntru_encrypt::try_keygen_with_rng(&mut rng, &params).unwrap();

    // Whatever fits is encrypted and must come back unchanged
    let msg = &data[..data.len().min(params.max_msg_len_bytes)];
    let ct = pk.try_encrypt_with_rng(&mut rng, msg).unwrap();
    assert_eq!(sk.try_decrypt(&ct).unwrap(), msg);
    if data.len() > params.max_msg_len_bytes {
        assert!(pk.try_encrypt_with_rng(&mut rng, data).is_err());
    }
});
