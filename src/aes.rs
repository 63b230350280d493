use crate::error::{CompareError, CompareResult};
use arrayref::array_ref;
use libc::{c_void, madvise, mlock, munlock, MADV_DONTDUMP};
use rand::{rngs::OsRng, RngCore};
use ring::aead;
use std::{ptr, sync::atomic::Ordering};

pub const KEY_LEN: usize = 32; // 256 bits
pub const NONCE_LEN: usize = 12; // 96 bits
pub const TAG_LEN: usize = 16; // 128 bits

/// AES-256-GCM under a raw, single-use 256-bit key.
///
/// The hybrid and ECIES providers wrap or derive this key per message, so no
/// password-based derivation happens here.
pub struct SessionCipher {
    key: Vec<u8>,
}

pub(crate) fn secure_zero(buf: &mut [u8]) {
    for byte in buf.iter_mut() {
        unsafe { ptr::write_volatile(byte, 0) };
    }
    std::sync::atomic::fence(Ordering::SeqCst);
}

pub(crate) fn protect_buffer(buf: &mut [u8]) {
    let ptr = buf.as_ptr() as *const c_void;
    let size = buf.len();

    unsafe {
        let _ = mlock(ptr, size);
        let _ = madvise(ptr as *mut c_void, size, MADV_DONTDUMP);
    }
}

pub(crate) fn unprotect_buffer(buf: &mut [u8]) {
    let ptr = buf.as_ptr() as *const c_void;
    let size = buf.len();
    unsafe {
        let _ = munlock(ptr, size);
    }
    secure_zero(buf);
}

impl SessionCipher {
    /// Creates a cipher from an existing 256-bit key.
    ///
    /// # Arguments
    /// * `key` - Exactly 32 bytes of key material
    ///
    /// # Returns
    /// * `CompareResult<SessionCipher>` - The cipher or a malformed-input error
    pub fn new(key: &[u8]) -> CompareResult<Self> {
        if key.len() != KEY_LEN {
            return Err(CompareError::MalformedCiphertext(format!(
                "symmetric key must be {} bytes, got {}",
                KEY_LEN,
                key.len()
            )));
        }
        let mut protected_key = key.to_vec();
        protect_buffer(&mut protected_key);
        Ok(Self { key: protected_key })
    }

    /// Creates a cipher under a fresh random key.
    pub fn generate() -> Self {
        let mut key = vec![0u8; KEY_LEN];
        protect_buffer(&mut key);
        OsRng.fill_bytes(&mut key);
        Self { key }
    }

    pub fn key_bytes(&self) -> &[u8] {
        &self.key
    }

    fn aead_key(&self) -> CompareResult<aead::LessSafeKey> {
        let unbound_key = aead::UnboundKey::new(&aead::AES_256_GCM, &self.key)
            .map_err(|_| CompareError::Encryption("invalid AES-256 key".to_string()))?;
        Ok(aead::LessSafeKey::new(unbound_key))
    }

    /// Encrypts data using AES-256-GCM with a random nonce.
    ///
    /// # Arguments
    /// * `plaintext` - The data to encrypt
    ///
    /// # Returns
    /// * `CompareResult<Vec<u8>>` - nonce + ciphertext + tag
    pub fn encrypt(&self, plaintext: &[u8]) -> CompareResult<Vec<u8>> {
        let key = self.aead_key()?;

        let mut nonce_bytes = [0u8; NONCE_LEN];
        OsRng.fill_bytes(&mut nonce_bytes);

        let mut in_out = Vec::with_capacity(plaintext.len() + TAG_LEN);
        in_out.extend_from_slice(plaintext);

        let nonce = aead::Nonce::assume_unique_for_key(nonce_bytes);
        key.seal_in_place_append_tag(nonce, aead::Aad::empty(), &mut in_out)
            .map_err(|_| CompareError::Encryption("AES-GCM seal failed".to_string()))?;

        let mut result = Vec::with_capacity(NONCE_LEN + in_out.len());
        result.extend_from_slice(&nonce_bytes);
        result.extend_from_slice(&in_out);
        Ok(result)
    }

    /// Decrypts and authenticates data produced by [`SessionCipher::encrypt`].
    pub fn decrypt(&self, sealed: &[u8]) -> CompareResult<Vec<u8>> {
        if sealed.len() < NONCE_LEN + TAG_LEN {
            return Err(CompareError::MalformedCiphertext(format!(
                "sealed payload of {} bytes is shorter than nonce and tag",
                sealed.len()
            )));
        }

        let key = self.aead_key()?;
        let nonce_bytes = array_ref!(sealed, 0, NONCE_LEN);
        let nonce = aead::Nonce::assume_unique_for_key(*nonce_bytes);

        let mut decrypted = sealed[NONCE_LEN..].to_vec();
        let plaintext_len = key
            .open_in_place(nonce, aead::Aad::empty(), &mut decrypted)
            .map_err(|_| CompareError::Decryption("AES-GCM authentication failed".to_string()))?
            .len();
        decrypted.truncate(plaintext_len);

        Ok(decrypted)
    }
}

impl Drop for SessionCipher {
    fn drop(&mut self) {
        unprotect_buffer(&mut self.key);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encrypt_decrypt_valid_data() {
        let plaintext = b"Hello, secure world!";

        let cipher = SessionCipher::generate();
        let encrypted = cipher.encrypt(plaintext).unwrap();
        let decrypted = cipher.decrypt(&encrypted).unwrap();

        assert_eq!(plaintext.to_vec(), decrypted);
        assert_eq!(encrypted.len(), NONCE_LEN + plaintext.len() + TAG_LEN);
    }

    #[test]
    fn test_different_ciphertexts() {
        let cipher = SessionCipher::generate();
        let encrypted1 = cipher.encrypt(b"Same plaintext").unwrap();
        let encrypted2 = cipher.encrypt(b"Same plaintext").unwrap();

        assert_ne!(encrypted1, encrypted2);
    }

    #[test]
    fn test_shared_key() {
        let cipher1 = SessionCipher::generate();
        let cipher2 = SessionCipher::new(cipher1.key_bytes()).unwrap();

        let encrypted = cipher1.encrypt(b"Secret message").unwrap();
        assert_eq!(cipher2.decrypt(&encrypted).unwrap(), b"Secret message");
    }

    #[test]
    fn test_wrong_key() {
        let cipher1 = SessionCipher::generate();
        let cipher2 = SessionCipher::generate();
        let encrypted = cipher1.encrypt(b"Secret message").unwrap();

        assert!(matches!(
            cipher2.decrypt(&encrypted),
            Err(CompareError::Decryption(_))
        ));
    }

    #[test]
    fn test_tampered_data() {
        let cipher = SessionCipher::generate();
        let mut encrypted = cipher.encrypt(b"Secret message").unwrap();

        if let Some(byte) = encrypted.last_mut() {
            *byte ^= 1;
        }

        assert!(cipher.decrypt(&encrypted).is_err());
    }

    #[test]
    fn test_truncated_data() {
        let cipher = SessionCipher::generate();
        assert!(matches!(
            cipher.decrypt(&[0u8; NONCE_LEN + TAG_LEN - 1]),
            Err(CompareError::MalformedCiphertext(_))
        ));
    }

    #[test]
    fn test_empty_plaintext() {
        let cipher = SessionCipher::generate();
        let encrypted = cipher.encrypt(b"").unwrap();
        assert!(cipher.decrypt(&encrypted).unwrap().is_empty());
    }

    #[test]
    fn test_key_length_validation() {
        assert!(SessionCipher::new(&[0u8; 16]).is_err());
        assert!(SessionCipher::new(&[0u8; 33]).is_err());
        assert!(SessionCipher::new(&[7u8; KEY_LEN]).is_ok());
    }

    #[test]
    fn test_memory_protection() {
        let mut buffer = vec![0xFFu8; 32];
        protect_buffer(&mut buffer);
        unprotect_buffer(&mut buffer);

        assert!(
            buffer.iter().all(|&b| b == 0),
            "Buffer should be securely wiped after unprotection"
        );
    }
}
