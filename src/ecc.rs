//! ECIES over the NIST prime curves.
//!
//! Each message gets a fresh ephemeral key pair on the recipient's curve. The
//! ECDH shared secret is expanded with HKDF-SHA256 (salted with the ephemeral
//! public point) into a one-time AES-256-GCM key. The ciphertext layout is
//!
//! ```text
//! [uncompressed SEC1 ephemeral point][12-byte nonce][ciphertext][16-byte tag]
//! ```
//!
//! There is no plaintext size ceiling.

use crate::{
    aes::{SessionCipher, KEY_LEN, NONCE_LEN, TAG_LEN},
    error::{CompareError, CompareResult},
    provider::{AlgorithmProvider, KeyPair},
};
use p256::elliptic_curve::sec1::ToEncodedPoint;
use rand::rngs::OsRng;
use ring::hkdf;
use tracing::{debug, warn};
use zeroize::Zeroizing;

pub const ECC_NAME: &str = "ECC";
pub const ECC_KEY_SIZES: [usize; 3] = [256, 384, 521];
const ECIES_INFO: &[u8] = b"cipherbench ECIES AES-256-GCM";

/// Named curve selected by key-size alias.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EccCurve {
    P256,
    P384,
    P521,
}

impl EccCurve {
    pub fn from_key_size(key_size: usize) -> Option<Self> {
        match key_size {
            256 => Some(Self::P256),
            384 => Some(Self::P384),
            521 => Some(Self::P521),
            _ => None,
        }
    }

    pub fn key_size(&self) -> usize {
        match self {
            Self::P256 => 256,
            Self::P384 => 384,
            Self::P521 => 521,
        }
    }

    /// Standard name of the curve.
    pub fn curve_name(&self) -> &'static str {
        match self {
            Self::P256 => "secp256r1",
            Self::P384 => "secp384r1",
            Self::P521 => "secp521r1",
        }
    }

    /// Length of an uncompressed SEC1 point on this curve.
    pub fn encoded_point_len(&self) -> usize {
        let field_bytes = (self.key_size() + 7) / 8;
        1 + 2 * field_bytes
    }
}

#[derive(Debug, Clone)]
pub enum EccPublicKey {
    P256(p256::PublicKey),
    P384(p384::PublicKey),
    P521(p521::PublicKey),
}

impl EccPublicKey {
    pub fn curve(&self) -> EccCurve {
        match self {
            Self::P256(_) => EccCurve::P256,
            Self::P384(_) => EccCurve::P384,
            Self::P521(_) => EccCurve::P521,
        }
    }

    /// Uncompressed SEC1 encoding.
    pub fn to_sec1_bytes(&self) -> Vec<u8> {
        match self {
            Self::P256(key) => key.to_encoded_point(false).as_bytes().to_vec(),
            Self::P384(key) => key.to_encoded_point(false).as_bytes().to_vec(),
            Self::P521(key) => key.to_encoded_point(false).as_bytes().to_vec(),
        }
    }
}

pub enum EccPrivateKey {
    P256(p256::SecretKey),
    P384(p384::SecretKey),
    P521(p521::SecretKey),
}

impl EccPrivateKey {
    pub fn curve(&self) -> EccCurve {
        match self {
            Self::P256(_) => EccCurve::P256,
            Self::P384(_) => EccCurve::P384,
            Self::P521(_) => EccCurve::P521,
        }
    }
}

// Ephemeral side of the key agreement: (encoded ephemeral point, shared secret).
macro_rules! ephemeral_agreement {
    ($curve:ident, $recipient:expr) => {{
        let ephemeral = $curve::ecdh::EphemeralSecret::random(&mut OsRng);
        let encoded = ephemeral
            .public_key()
            .to_encoded_point(false)
            .as_bytes()
            .to_vec();
        let shared = ephemeral.diffie_hellman($recipient);
        (
            encoded,
            Zeroizing::new(shared.raw_secret_bytes().to_vec()),
        )
    }};
}

// Static side of the key agreement: shared secret from the received point.
macro_rules! static_agreement {
    ($curve:ident, $secret:expr, $encoded:expr) => {{
        let ephemeral = $curve::PublicKey::from_sec1_bytes($encoded).map_err(|_| {
            CompareError::MalformedCiphertext("invalid ephemeral public key".to_string())
        })?;
        let shared =
            $curve::ecdh::diffie_hellman($secret.to_nonzero_scalar(), ephemeral.as_affine());
        Zeroizing::new(shared.raw_secret_bytes().to_vec())
    }};
}

struct OkmLen(usize);

impl hkdf::KeyType for OkmLen {
    fn len(&self) -> usize {
        self.0
    }
}

fn derive_cipher(shared_secret: &[u8], ephemeral_point: &[u8]) -> CompareResult<SessionCipher> {
    let prk = hkdf::Salt::new(hkdf::HKDF_SHA256, ephemeral_point).extract(shared_secret);
    let info = [ECIES_INFO];
    let okm = prk
        .expand(&info, OkmLen(KEY_LEN))
        .map_err(|_| CompareError::Encryption("HKDF expansion failed".to_string()))?;

    let mut key = Zeroizing::new([0u8; KEY_LEN]);
    okm.fill(&mut key[..])
        .map_err(|_| CompareError::Encryption("HKDF expansion failed".to_string()))?;
    SessionCipher::new(&key[..])
}

/// ECIES provider.
///
/// The default provider maps unrecognised key sizes to P-256; a strict
/// provider rejects them instead.
#[derive(Debug, Default, Clone, Copy)]
pub struct EccProvider {
    strict: bool,
}

impl EccProvider {
    pub fn new() -> Self {
        Self { strict: false }
    }

    /// A provider that fails with `UnsupportedKeySize` instead of falling
    /// back to P-256.
    pub fn strict() -> Self {
        Self { strict: true }
    }

    pub fn is_strict(&self) -> bool {
        self.strict
    }

    fn select_curve(&self, key_size: usize) -> CompareResult<EccCurve> {
        match EccCurve::from_key_size(key_size) {
            Some(curve) => Ok(curve),
            None if self.strict => Err(CompareError::UnsupportedKeySize {
                algorithm: ECC_NAME,
                key_size,
            }),
            None => {
                warn!(key_size, "unrecognised ECC key size, defaulting to secp256r1");
                Ok(EccCurve::P256)
            }
        }
    }
}

impl AlgorithmProvider for EccProvider {
    type PublicKey = EccPublicKey;
    type PrivateKey = EccPrivateKey;

    fn name(&self) -> &'static str {
        ECC_NAME
    }

    fn supported_key_sizes(&self) -> &'static [usize] {
        &ECC_KEY_SIZES
    }

    fn generate_key_pair(
        &self,
        key_size: usize,
    ) -> CompareResult<KeyPair<EccPublicKey, EccPrivateKey>> {
        let curve = self.select_curve(key_size)?;
        let mut rng = OsRng;
        let keys = match curve {
            EccCurve::P256 => {
                let secret = p256::SecretKey::random(&mut rng);
                KeyPair::new(
                    EccPublicKey::P256(secret.public_key()),
                    EccPrivateKey::P256(secret),
                )
            }
            EccCurve::P384 => {
                let secret = p384::SecretKey::random(&mut rng);
                KeyPair::new(
                    EccPublicKey::P384(secret.public_key()),
                    EccPrivateKey::P384(secret),
                )
            }
            EccCurve::P521 => {
                let secret = p521::SecretKey::random(&mut rng);
                KeyPair::new(
                    EccPublicKey::P521(secret.public_key()),
                    EccPrivateKey::P521(secret),
                )
            }
        };
        debug!(curve = curve.curve_name(), "generated ECC key pair");
        Ok(keys)
    }

    fn encrypt(&self, plaintext: &[u8], public_key: &EccPublicKey) -> CompareResult<Vec<u8>> {
        let (ephemeral_point, shared_secret) = match public_key {
            EccPublicKey::P256(key) => ephemeral_agreement!(p256, key),
            EccPublicKey::P384(key) => ephemeral_agreement!(p384, key),
            EccPublicKey::P521(key) => ephemeral_agreement!(p521, key),
        };

        let cipher = derive_cipher(&shared_secret, &ephemeral_point)?;
        let sealed = cipher.encrypt(plaintext)?;

        let mut result = Vec::with_capacity(ephemeral_point.len() + sealed.len());
        result.extend_from_slice(&ephemeral_point);
        result.extend_from_slice(&sealed);
        Ok(result)
    }

    fn decrypt(&self, ciphertext: &[u8], private_key: &EccPrivateKey) -> CompareResult<Vec<u8>> {
        let point_len = private_key.curve().encoded_point_len();
        if ciphertext.len() < point_len + NONCE_LEN + TAG_LEN {
            return Err(CompareError::MalformedCiphertext(format!(
                "ECIES ciphertext of {} bytes is too short for {}",
                ciphertext.len(),
                private_key.curve().curve_name()
            )));
        }

        let (ephemeral_point, sealed) = ciphertext.split_at(point_len);
        let shared_secret = match private_key {
            EccPrivateKey::P256(secret) => static_agreement!(p256, secret, ephemeral_point),
            EccPrivateKey::P384(secret) => static_agreement!(p384, secret, ephemeral_point),
            EccPrivateKey::P521(secret) => static_agreement!(p521, secret, ephemeral_point),
        };

        let cipher = derive_cipher(&shared_secret, ephemeral_point)?;
        cipher.decrypt(sealed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rand::RngCore;
    use test_case::test_case;

    #[test_case(256, EccCurve::P256, 65)]
    #[test_case(384, EccCurve::P384, 97)]
    #[test_case(521, EccCurve::P521, 133)]
    fn test_encryption_decryption(key_size: usize, curve: EccCurve, point_len: usize) {
        let ecc = EccProvider::new();
        let keys = ecc.generate_key_pair(key_size).unwrap();
        assert_eq!(keys.public_key.curve(), curve);
        assert_eq!(keys.private_key.curve(), curve);
        assert_eq!(keys.public_key.to_sec1_bytes().len(), point_len);

        let plaintext = b"Lorem ipsum dolor sit amet";
        let encrypted = ecc.encrypt(plaintext, &keys.public_key).unwrap();
        assert_eq!(encrypted.len(), point_len + NONCE_LEN + plaintext.len() + TAG_LEN);

        let decrypted = ecc.decrypt(&encrypted, &keys.private_key).unwrap();
        assert_eq!(plaintext.to_vec(), decrypted);
    }

    #[test]
    fn test_large_data() {
        let ecc = EccProvider::new();
        let keys = ecc.generate_key_pair(384).unwrap();

        let mut large_data = vec![0u8; 1024 * 1024];
        OsRng.fill_bytes(&mut large_data);
        let encrypted = ecc.encrypt(&large_data, &keys.public_key).unwrap();
        let decrypted = ecc.decrypt(&encrypted, &keys.private_key).unwrap();

        assert_eq!(
            large_data, decrypted,
            "Decrypted large data does not match original data"
        );
    }

    #[test]
    fn test_different_ciphertexts() {
        let ecc = EccProvider::new();
        let keys = ecc.generate_key_pair(256).unwrap();

        let plaintext = b"Same plaintext";
        let encrypted1 = ecc.encrypt(plaintext, &keys.public_key).unwrap();
        let encrypted2 = ecc.encrypt(plaintext, &keys.public_key).unwrap();

        assert_ne!(encrypted1, encrypted2);
        assert_eq!(ecc.decrypt(&encrypted1, &keys.private_key).unwrap(), plaintext);
        assert_eq!(ecc.decrypt(&encrypted2, &keys.private_key).unwrap(), plaintext);
    }

    #[test]
    fn test_unrecognised_key_size_falls_back() {
        let keys = EccProvider::new().generate_key_pair(200).unwrap();
        assert_eq!(keys.public_key.curve(), EccCurve::P256);
    }

    #[test]
    fn test_strict_provider_rejects_unknown_size() {
        assert_eq!(
            EccProvider::strict().generate_key_pair(200).err().map(|e| e.to_string()),
            Some("Unsupported key size for ECC: 200".to_string())
        );
        assert!(EccProvider::strict().generate_key_pair(521).is_ok());
    }

    #[test]
    fn test_wrong_private_key() {
        let ecc = EccProvider::new();
        let keys1 = ecc.generate_key_pair(256).unwrap();
        let keys2 = ecc.generate_key_pair(256).unwrap();

        let encrypted = ecc.encrypt(b"Secret message", &keys1.public_key).unwrap();
        assert!(matches!(
            ecc.decrypt(&encrypted, &keys2.private_key),
            Err(CompareError::Decryption(_))
        ));
    }

    #[test]
    fn test_truncated_ciphertext() {
        let ecc = EccProvider::new();
        let keys = ecc.generate_key_pair(256).unwrap();
        assert!(matches!(
            ecc.decrypt(&[4u8; 40], &keys.private_key),
            Err(CompareError::MalformedCiphertext(_))
        ));
    }

    #[test]
    fn test_invalid_ephemeral_point() {
        let ecc = EccProvider::new();
        let keys = ecc.generate_key_pair(256).unwrap();
        let mut encrypted = ecc.encrypt(b"Secret message", &keys.public_key).unwrap();
        // SEC1 tag byte 0x07 is not a valid point encoding
        encrypted[0] = 0x07;
        assert!(matches!(
            ecc.decrypt(&encrypted, &keys.private_key),
            Err(CompareError::MalformedCiphertext(_))
        ));
    }

    #[test]
    fn test_tampered_payload() {
        let ecc = EccProvider::new();
        let keys = ecc.generate_key_pair(256).unwrap();
        let mut encrypted = ecc.encrypt(b"Secret message", &keys.public_key).unwrap();
        if let Some(byte) = encrypted.last_mut() {
            *byte ^= 1;
        }
        assert!(ecc.decrypt(&encrypted, &keys.private_key).is_err());
    }

    #[test]
    fn test_curve_mismatch() {
        let ecc = EccProvider::new();
        let keys256 = ecc.generate_key_pair(256).unwrap();
        let keys384 = ecc.generate_key_pair(384).unwrap();

        let encrypted = ecc.encrypt(b"Secret message", &keys256.public_key).unwrap();
        assert!(ecc.decrypt(&encrypted, &keys384.private_key).is_err());
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(32))]

        #[test]
        fn prop_round_trip(data in proptest::collection::vec(any::<u8>(), 0..4096)) {
            let ecc = EccProvider::new();
            let keys = ecc.generate_key_pair(256).unwrap();
            let encrypted = ecc.encrypt(&data, &keys.public_key).unwrap();
            prop_assert_eq!(ecc.decrypt(&encrypted, &keys.private_key).unwrap(), data);
        }
    }
}
