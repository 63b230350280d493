//! Benchmarks and compares asymmetric encryption schemes.
//!
//! RSA (PKCS#1 v1.5), ECIES over the NIST prime curves and an RSA+AES-256-GCM
//! hybrid are exercised through one [`AlgorithmProvider`] abstraction. The
//! [`ComparisonHarness`] measures key generation, encryption and decryption
//! for every (data size, algorithm) cell, verifies the round trip byte for
//! byte, and attaches a qualitative [`SecurityEstimate`].
//!
//! ```no_run
//! use cipherbench::{ComparisonHarness, TrialConfig};
//!
//! let results = ComparisonHarness::new().run_comparison(&TrialConfig::default());
//! for result in &results {
//!     println!("{} {} bytes: success={}", result.algorithm, result.data_size, result.success);
//! }
//! ```

mod aes;
mod config;
mod ecc;
mod error;
mod harness;
mod hybrid;
mod logging;
mod metrics;
mod provider;
mod rsa;
mod security;
mod session;

pub use crate::{
    aes::SessionCipher,
    config::{SessionConfig, TrialConfig},
    ecc::{EccCurve, EccPrivateKey, EccProvider, EccPublicKey},
    error::{CompareError, CompareResult},
    harness::{
        random_payload, random_text, test_algorithm, ComparisonHarness, TrialResult, TrialRunner,
        TrialTimings,
    },
    hybrid::{frame, unframe, RsaAesHybridProvider},
    logging::initialize_logging,
    metrics::{format_time, summarize, AlgorithmSummary, PerformanceMetrics},
    provider::{Algorithm, AlgorithmProvider, KeyPair},
    rsa::RsaProvider,
    security::{SecurityEstimate, SecurityEstimator},
    session::{KeyGeneration, SessionStore, TimedOutput},
};
