use crate::{
    error::{CompareError, CompareResult},
    provider::{AlgorithmProvider, KeyPair},
};
use rand::rngs::OsRng;
use rsa::{traits::PublicKeyParts, Pkcs1v15Encrypt, RsaPrivateKey, RsaPublicKey};
use tracing::debug;

pub const RSA_NAME: &str = "RSA";
pub const RSA_KEY_SIZES: [usize; 4] = [1024, 2048, 3072, 4096];
// PKCS#1 v1.5 encryption padding overhead
pub const PKCS1_PADDING_OVERHEAD: usize = 11;

/// RSA with PKCS#1 v1.5 padding, limited to a single block.
#[derive(Debug, Default, Clone, Copy)]
pub struct RsaProvider;

impl RsaProvider {
    pub fn new() -> Self {
        Self
    }

    /// Largest plaintext accepted under `public_key`, derived from the
    /// modulus bit length rather than the requested key size.
    pub fn max_plaintext_len(public_key: &RsaPublicKey) -> usize {
        (public_key.n().bits() / 8).saturating_sub(PKCS1_PADDING_OVERHEAD)
    }

    pub(crate) fn validate_key_size(key_size: usize) -> CompareResult<()> {
        if !RSA_KEY_SIZES.contains(&key_size) {
            return Err(CompareError::UnsupportedKeySize {
                algorithm: RSA_NAME,
                key_size,
            });
        }
        Ok(())
    }

    pub(crate) fn generate(key_size: usize) -> CompareResult<KeyPair<RsaPublicKey, RsaPrivateKey>> {
        let mut rng = OsRng;
        let private_key = RsaPrivateKey::new(&mut rng, key_size)
            .map_err(|e| CompareError::KeyGeneration(e.to_string()))?;
        let public_key = RsaPublicKey::from(&private_key);
        debug!(key_size, "generated RSA key pair");
        Ok(KeyPair::new(public_key, private_key))
    }
}

impl AlgorithmProvider for RsaProvider {
    type PublicKey = RsaPublicKey;
    type PrivateKey = RsaPrivateKey;

    fn name(&self) -> &'static str {
        RSA_NAME
    }

    fn supported_key_sizes(&self) -> &'static [usize] {
        &RSA_KEY_SIZES
    }

    /// Generates a new RSA key pair of exactly `key_size` bits.
    fn generate_key_pair(
        &self,
        key_size: usize,
    ) -> CompareResult<KeyPair<RsaPublicKey, RsaPrivateKey>> {
        Self::validate_key_size(key_size)?;
        Self::generate(key_size)
    }

    /// Encrypts a single block using RSA PKCS#1 v1.5.
    ///
    /// # Arguments
    /// * `plaintext` - At most `modulus_bits / 8 - 11` bytes
    /// * `public_key` - The recipient key
    ///
    /// # Returns
    /// * `CompareResult<Vec<u8>>` - The ciphertext, or `PayloadTooLarge`
    fn encrypt(&self, plaintext: &[u8], public_key: &RsaPublicKey) -> CompareResult<Vec<u8>> {
        let max = Self::max_plaintext_len(public_key);
        if plaintext.len() > max {
            return Err(CompareError::PayloadTooLarge {
                max,
                actual: plaintext.len(),
            });
        }

        let mut rng = OsRng;
        public_key
            .encrypt(&mut rng, Pkcs1v15Encrypt, plaintext)
            .map_err(|e| CompareError::Encryption(e.to_string()))
    }

    fn decrypt(&self, ciphertext: &[u8], private_key: &RsaPrivateKey) -> CompareResult<Vec<u8>> {
        private_key
            .decrypt(Pkcs1v15Encrypt, ciphertext)
            .map_err(|e| CompareError::Decryption(e.to_string()))
    }
}
