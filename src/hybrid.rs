use crate::{
    aes::{SessionCipher, KEY_LEN},
    error::{CompareError, CompareResult},
    provider::{AlgorithmProvider, KeyPair},
    rsa::{RsaProvider, RSA_KEY_SIZES},
};
use arrayref::array_ref;
use rsa::{RsaPrivateKey, RsaPublicKey};
use tracing::trace;
use zeroize::Zeroizing;

pub const HYBRID_NAME: &str = "RSA+AES Hybrid";
const LENGTH_PREFIX_LEN: usize = 4;

/// RSA key exchange plus AES-256-GCM bulk encryption.
///
/// A fresh AES key is generated per call and wrapped with RSA PKCS#1 v1.5,
/// which lifts the RSA plaintext ceiling. Wire format:
///
/// ```text
/// [4-byte big-endian length N][N bytes: RSA-encrypted AES key][AES-GCM payload]
/// ```
#[derive(Debug, Default, Clone, Copy)]
pub struct RsaAesHybridProvider {
    rsa: RsaProvider,
}

impl RsaAesHybridProvider {
    pub fn new() -> Self {
        Self {
            rsa: RsaProvider::new(),
        }
    }
}

/// Joins the encrypted key and payload into the length-prefixed wire format.
pub fn frame(encrypted_key: &[u8], encrypted_payload: &[u8]) -> CompareResult<Vec<u8>> {
    let key_len = u32::try_from(encrypted_key.len()).map_err(|_| {
        CompareError::Encryption("encrypted key does not fit a 32-bit length".to_string())
    })?;

    let mut result =
        Vec::with_capacity(LENGTH_PREFIX_LEN + encrypted_key.len() + encrypted_payload.len());
    result.extend_from_slice(&key_len.to_be_bytes());
    result.extend_from_slice(encrypted_key);
    result.extend_from_slice(encrypted_payload);
    Ok(result)
}

/// Splits the wire format into (encrypted key, encrypted payload).
///
/// Fails closed when the buffer cannot hold the prefix or the declared key.
pub fn unframe(ciphertext: &[u8]) -> CompareResult<(&[u8], &[u8])> {
    if ciphertext.len() < LENGTH_PREFIX_LEN {
        return Err(CompareError::MalformedCiphertext(format!(
            "hybrid ciphertext of {} bytes has no length prefix",
            ciphertext.len()
        )));
    }

    let key_len = u32::from_be_bytes(*array_ref!(ciphertext, 0, LENGTH_PREFIX_LEN)) as usize;
    let body = &ciphertext[LENGTH_PREFIX_LEN..];
    if key_len > body.len() {
        return Err(CompareError::MalformedCiphertext(format!(
            "declared key length {} exceeds remaining {} bytes",
            key_len,
            body.len()
        )));
    }

    trace!(key_len, payload_len = body.len() - key_len, "unframed hybrid ciphertext");
    Ok(body.split_at(key_len))
}

impl AlgorithmProvider for RsaAesHybridProvider {
    type PublicKey = RsaPublicKey;
    type PrivateKey = RsaPrivateKey;

    fn name(&self) -> &'static str {
        HYBRID_NAME
    }

    fn supported_key_sizes(&self) -> &'static [usize] {
        &RSA_KEY_SIZES
    }

    fn generate_key_pair(
        &self,
        key_size: usize,
    ) -> CompareResult<KeyPair<RsaPublicKey, RsaPrivateKey>> {
        RsaProvider::validate_key_size(key_size)?;
        RsaProvider::generate(key_size)
    }

    /// Encrypts data of any length under a per-call AES-256 key.
    ///
    /// # Arguments
    /// * `plaintext` - The data to encrypt
    /// * `public_key` - RSA key used to wrap the AES key
    ///
    /// # Returns
    /// * `CompareResult<Vec<u8>>` - The framed ciphertext or an error
    fn encrypt(&self, plaintext: &[u8], public_key: &RsaPublicKey) -> CompareResult<Vec<u8>> {
        let cipher = SessionCipher::generate();
        let encrypted_payload = cipher.encrypt(plaintext)?;
        let encrypted_key = self.rsa.encrypt(cipher.key_bytes(), public_key)?;
        frame(&encrypted_key, &encrypted_payload)
    }

    fn decrypt(&self, ciphertext: &[u8], private_key: &RsaPrivateKey) -> CompareResult<Vec<u8>> {
        let (encrypted_key, encrypted_payload) = unframe(ciphertext)?;

        let aes_key = Zeroizing::new(self.rsa.decrypt(encrypted_key, private_key)?);
        if aes_key.len() != KEY_LEN {
            return Err(CompareError::MalformedCiphertext(format!(
                "unwrapped AES key is {} bytes, expected {}",
                aes_key.len(),
                KEY_LEN
            )));
        }

        SessionCipher::new(&aes_key)?.decrypt(encrypted_payload)
    }
}
