use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CompareError {
    #[error("Unsupported key size for {algorithm}: {key_size}")]
    UnsupportedKeySize {
        algorithm: &'static str,
        key_size: usize,
    },

    #[error("Data too large for RSA encryption. Max size: {max} bytes, got: {actual} bytes")]
    PayloadTooLarge { max: usize, actual: usize },

    #[error("Decryption failed - data mismatch")]
    IntegrityFailure,

    #[error("Malformed ciphertext: {0}")]
    MalformedCiphertext(String),

    #[error("Key generation failed: {0}")]
    KeyGeneration(String),

    #[error("Encryption failed: {0}")]
    Encryption(String),

    #[error("Decryption failed: {0}")]
    Decryption(String),

    #[error("Unknown algorithm: {0}")]
    UnknownAlgorithm(String),

    #[error("No key pair found for session {0}")]
    SessionNotFound(String),

    #[error("Invalid configuration: {0}")]
    Config(String),
}

pub type CompareResult<T> = Result<T, CompareError>;

impl From<std::io::Error> for CompareError {
    fn from(e: std::io::Error) -> Self {
        Self::Config(e.to_string())
    }
}

impl From<serde_json::Error> for CompareError {
    fn from(e: serde_json::Error) -> Self {
        Self::Config(e.to_string())
    }
}
