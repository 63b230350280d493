use crate::{ecc::ECC_NAME, hybrid::HYBRID_NAME, rsa::RSA_NAME};
use serde::{Deserialize, Serialize};

/// Qualitative strength of an (algorithm, key size) pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SecurityEstimate {
    pub algorithm: String,
    pub key_size: usize,
    pub security_bits: u32,
    pub estimated_break_time: String,
}

// (algorithm, key size, security bits, estimated break time)
const SECURITY_TABLE: &[(&str, usize, u32, &str)] = &[
    (RSA_NAME, 1024, 80, "Days to weeks on specialized hardware"),
    (RSA_NAME, 2048, 112, "Years with current technology"),
    (RSA_NAME, 3072, 128, "Decades with current technology"),
    (RSA_NAME, 4096, 152, "Beyond foreseeable future"),
    (ECC_NAME, 256, 128, "Decades with current technology"),
    (ECC_NAME, 384, 192, "Beyond foreseeable future"),
    (ECC_NAME, 521, 256, "Beyond foreseeable quantum computing threats"),
];

/// Table-driven security strength lookup.
#[derive(Debug, Default, Clone, Copy)]
pub struct SecurityEstimator;

impl SecurityEstimator {
    pub fn new() -> Self {
        Self
    }

    /// Unmapped pairs yield zero bits and an empty label rather than an error.
    pub fn estimate(&self, algorithm: &str, key_size: usize) -> SecurityEstimate {
        // The hybrid scheme is bounded by its RSA key exchange.
        let lookup = if algorithm == HYBRID_NAME {
            RSA_NAME
        } else {
            algorithm
        };

        let (security_bits, label) = SECURITY_TABLE
            .iter()
            .find(|(name, size, _, _)| *name == lookup && *size == key_size)
            .map(|(_, _, bits, label)| (*bits, *label))
            .unwrap_or((0, ""));

        SecurityEstimate {
            algorithm: algorithm.to_string(),
            key_size,
            security_bits,
            estimated_break_time: label.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case("RSA", 1024, 80)]
    #[test_case("RSA", 2048, 112)]
    #[test_case("RSA", 3072, 128)]
    #[test_case("RSA", 4096, 152)]
    #[test_case("ECC", 256, 128)]
    #[test_case("ECC", 384, 192)]
    #[test_case("ECC", 521, 256)]
    #[test_case("RSA+AES Hybrid", 2048, 112)]
    fn test_table_coverage(algorithm: &str, key_size: usize, bits: u32) {
        let estimate = SecurityEstimator::new().estimate(algorithm, key_size);
        assert_eq!(estimate.security_bits, bits);
        assert_eq!(estimate.algorithm, algorithm);
        assert_eq!(estimate.key_size, key_size);
        assert!(!estimate.estimated_break_time.is_empty());
    }

    #[test]
    fn test_labels() {
        let estimator = SecurityEstimator::new();
        assert_eq!(
            estimator.estimate("RSA", 2048).estimated_break_time,
            "Years with current technology"
        );
        assert_eq!(
            estimator.estimate("ECC", 521).estimated_break_time,
            "Beyond foreseeable quantum computing threats"
        );
    }

    #[test_case("RSA", 9999)]
    #[test_case("ECC", 2048)]
    #[test_case("DSA", 1024)]
    fn test_unmapped_pair(algorithm: &str, key_size: usize) {
        let estimate = SecurityEstimator::new().estimate(algorithm, key_size);
        assert_eq!(estimate.security_bits, 0);
        assert!(estimate.estimated_break_time.is_empty());
    }

    #[test]
    fn test_serialization() {
        let json = serde_json::to_value(SecurityEstimator::new().estimate("ECC", 384)).unwrap();
        assert_eq!(json["securityBits"], 192);
        assert_eq!(json["estimatedBreakTime"], "Beyond foreseeable future");
    }
}
