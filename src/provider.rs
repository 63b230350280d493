//! The capability set shared by every benchmarked algorithm.

use crate::error::{CompareError, CompareResult};
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

/// A public/private key pair produced by one provider.
///
/// Key pairs belong to a single trial (or a single session in the
/// session store) and are dropped with it.
pub struct KeyPair<Pub, Priv> {
    pub public_key: Pub,
    pub private_key: Priv,
}

impl<Pub, Priv> KeyPair<Pub, Priv> {
    pub fn new(public_key: Pub, private_key: Priv) -> Self {
        Self {
            public_key,
            private_key,
        }
    }
}

/// An asymmetric encryption scheme that can be exercised by the harness.
pub trait AlgorithmProvider: Send + Sync {
    type PublicKey;
    type PrivateKey;

    /// Display name, also used as the security table lookup key.
    fn name(&self) -> &'static str;

    /// Key sizes (in bits) this provider accepts.
    fn supported_key_sizes(&self) -> &'static [usize];

    fn supports_key_size(&self, key_size: usize) -> bool {
        self.supported_key_sizes().contains(&key_size)
    }

    /// Generates a fresh key pair of the requested size.
    ///
    /// # Arguments
    /// * `key_size` - Key size in bits
    ///
    /// # Returns
    /// * `CompareResult<KeyPair<..>>` - The key pair or an error
    fn generate_key_pair(
        &self,
        key_size: usize,
    ) -> CompareResult<KeyPair<Self::PublicKey, Self::PrivateKey>>;

    fn encrypt(&self, plaintext: &[u8], public_key: &Self::PublicKey) -> CompareResult<Vec<u8>>;

    fn decrypt(&self, ciphertext: &[u8], private_key: &Self::PrivateKey)
        -> CompareResult<Vec<u8>>;
}

/// Identifier of a registered provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Algorithm {
    Rsa,
    Ecc,
    RsaAesHybrid,
}

impl Algorithm {
    pub const ALL: [Algorithm; 3] = [Algorithm::Rsa, Algorithm::Ecc, Algorithm::RsaAesHybrid];

    pub fn name(&self) -> &'static str {
        match self {
            Self::Rsa => crate::rsa::RSA_NAME,
            Self::Ecc => crate::ecc::ECC_NAME,
            Self::RsaAesHybrid => crate::hybrid::HYBRID_NAME,
        }
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Algorithm {
    type Err = CompareError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "rsa" => Ok(Self::Rsa),
            "ecc" | "ecies" => Ok(Self::Ecc),
            "rsa+aes hybrid" | "rsa+aes" | "hybrid" => Ok(Self::RsaAesHybrid),
            _ => Err(CompareError::UnknownAlgorithm(s.to_string())),
        }
    }
}
