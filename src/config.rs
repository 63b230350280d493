use crate::error::{CompareError, CompareResult};
use serde::{Deserialize, Serialize};
use std::path::Path;

pub const DEFAULT_DATA_SIZES: [usize; 3] = [1024, 10240, 102400];
pub const DEFAULT_RSA_KEY_SIZE: usize = 2048;
pub const DEFAULT_ECC_KEY_SIZE: usize = 256;
pub const DEFAULT_SESSION_TTL_SECS: u64 = 15 * 60;
pub const DEFAULT_MAX_SESSIONS: usize = 256;

/// Parameters of one comparison run.
///
/// Key sizes are not checked here: an unsupported size is reported as a
/// failed trial, never substituted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TrialConfig {
    /// Payload sizes in bytes, in the order they are tested.
    pub data_sizes: Vec<usize>,
    pub rsa_key_size: usize,
    pub ecc_key_size: usize,
    /// Adds an RSA+AES hybrid lane when set.
    pub hybrid_key_size: Option<usize>,
}

impl Default for TrialConfig {
    fn default() -> Self {
        Self {
            data_sizes: DEFAULT_DATA_SIZES.to_vec(),
            rsa_key_size: DEFAULT_RSA_KEY_SIZE,
            ecc_key_size: DEFAULT_ECC_KEY_SIZE,
            hybrid_key_size: None,
        }
    }
}

impl TrialConfig {
    pub fn from_json_str(json: &str) -> CompareResult<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_json_file<P: AsRef<Path>>(path: P) -> CompareResult<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    pub fn validate(&self) -> CompareResult<()> {
        if self.data_sizes.is_empty() {
            return Err(CompareError::Config("dataSizes must not be empty".to_string()));
        }
        if self.data_sizes.contains(&0) {
            return Err(CompareError::Config(
                "dataSizes must be positive integers".to_string(),
            ));
        }
        Ok(())
    }
}

/// Expiry policy of the session key store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SessionConfig {
    pub ttl_secs: u64,
    pub max_sessions: usize,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            ttl_secs: DEFAULT_SESSION_TTL_SECS,
            max_sessions: DEFAULT_MAX_SESSIONS,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = TrialConfig::default();
        assert_eq!(config.data_sizes, vec![1024, 10240, 102400]);
        assert_eq!(config.rsa_key_size, 2048);
        assert_eq!(config.ecc_key_size, 256);
        assert_eq!(config.hybrid_key_size, None);
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config = TrialConfig::from_json_str(r#"{"dataSizes": [16, 32], "rsaKeySize": 1024}"#)
            .unwrap();
        assert_eq!(config.data_sizes, vec![16, 32]);
        assert_eq!(config.rsa_key_size, 1024);
        assert_eq!(config.ecc_key_size, DEFAULT_ECC_KEY_SIZE);
    }

    #[test]
    fn test_hybrid_lane() {
        let config = TrialConfig::from_json_str(r#"{"hybridKeySize": 3072}"#).unwrap();
        assert_eq!(config.hybrid_key_size, Some(3072));
    }

    #[test]
    fn test_invalid_data_sizes() {
        assert!(matches!(
            TrialConfig::from_json_str(r#"{"dataSizes": []}"#),
            Err(CompareError::Config(_))
        ));
        assert!(matches!(
            TrialConfig::from_json_str(r#"{"dataSizes": [16, 0]}"#),
            Err(CompareError::Config(_))
        ));
        assert!(matches!(
            TrialConfig::from_json_str(r#"{"dataSizes": [-1]}"#),
            Err(CompareError::Config(_))
        ));
    }

    #[test]
    fn test_unsupported_key_size_is_not_a_config_error() {
        let config = TrialConfig::from_json_str(r#"{"rsaKeySize": 1000}"#).unwrap();
        assert_eq!(config.rsa_key_size, 1000);
    }

    #[test]
    fn test_missing_file() {
        assert!(matches!(
            TrialConfig::from_json_file("/nonexistent/cipherbench.json"),
            Err(CompareError::Config(_))
        ));
    }

    #[test]
    fn test_session_config() {
        let config: SessionConfig = serde_json::from_str(r#"{"maxSessions": 4}"#).unwrap();
        assert_eq!(config.max_sessions, 4);
        assert_eq!(config.ttl_secs, DEFAULT_SESSION_TTL_SECS);
    }
}
