//! Runs the comparison matrix: data sizes × algorithm lanes.
//!
//! Trials run one after another on the calling thread so that no trial's
//! timings are skewed by another. Every trial owns its key pair, plaintext and
//! ciphertext; nothing survives the call.

use crate::{
    config::TrialConfig,
    ecc::EccProvider,
    error::{CompareError, CompareResult},
    hybrid::RsaAesHybridProvider,
    provider::{Algorithm, AlgorithmProvider},
    rsa::RsaProvider,
    security::{SecurityEstimate, SecurityEstimator},
};
use base64::{engine::general_purpose::STANDARD, Engine};
use constant_time_eq::constant_time_eq;
use rand::{rngs::OsRng, RngCore};
use serde::{Deserialize, Serialize};
use std::time::Instant;
use tracing::{debug, info, warn};

/// Phase durations of a successful trial, in milliseconds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrialTimings {
    pub key_generation_ms: f64,
    pub encryption_ms: f64,
    pub decryption_ms: f64,
}

/// Outcome of one key-generation / encrypt / decrypt / verify cycle.
///
/// `timings` and `security_estimate` are only present when `success` is true.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrialResult {
    pub algorithm: String,
    pub data_size: usize,
    pub key_size: usize,
    pub timings: Option<TrialTimings>,
    pub security_estimate: Option<SecurityEstimate>,
    pub success: bool,
    pub error_message: Option<String>,
}

impl TrialResult {
    fn failed(algorithm: &str, data_size: usize, key_size: usize, error: &CompareError) -> Self {
        Self {
            algorithm: algorithm.to_string(),
            data_size,
            key_size,
            timings: None,
            security_estimate: None,
            success: false,
            error_message: Some(error.to_string()),
        }
    }
}

/// Object-safe view of a provider, so lanes of different key types can sit in
/// one registry.
pub trait TrialRunner: Send + Sync {
    fn run_trial(&self, data: &[u8], key_size: usize, estimator: &SecurityEstimator)
        -> TrialResult;
}

impl<P: AlgorithmProvider> TrialRunner for P {
    fn run_trial(
        &self,
        data: &[u8],
        key_size: usize,
        estimator: &SecurityEstimator,
    ) -> TrialResult {
        test_algorithm(self, data, key_size, estimator)
    }
}

fn elapsed_ms(start: Instant) -> f64 {
    start.elapsed().as_secs_f64() * 1000.0
}

fn measure<P: AlgorithmProvider + ?Sized>(
    provider: &P,
    data: &[u8],
    key_size: usize,
) -> CompareResult<TrialTimings> {
    if !provider.supports_key_size(key_size) {
        return Err(CompareError::UnsupportedKeySize {
            algorithm: provider.name(),
            key_size,
        });
    }

    let start = Instant::now();
    let keys = provider.generate_key_pair(key_size)?;
    let key_generation_ms = elapsed_ms(start);

    let start = Instant::now();
    let encrypted = provider.encrypt(data, &keys.public_key)?;
    let encryption_ms = elapsed_ms(start);

    let start = Instant::now();
    let decrypted = provider.decrypt(&encrypted, &keys.private_key)?;
    let decryption_ms = elapsed_ms(start);

    if !constant_time_eq(data, &decrypted) {
        return Err(CompareError::IntegrityFailure);
    }

    Ok(TrialTimings {
        key_generation_ms,
        encryption_ms,
        decryption_ms,
    })
}

/// Runs a single trial against `provider`.
///
/// Errors never escape: they are recorded on the returned result.
pub fn test_algorithm<P: AlgorithmProvider + ?Sized>(
    provider: &P,
    data: &[u8],
    key_size: usize,
    estimator: &SecurityEstimator,
) -> TrialResult {
    let algorithm = provider.name();
    match measure(provider, data, key_size) {
        Ok(timings) => {
            debug!(
                algorithm,
                key_size,
                data_size = data.len(),
                "Successfully tested algorithm"
            );
            TrialResult {
                algorithm: algorithm.to_string(),
                data_size: data.len(),
                key_size,
                timings: Some(timings),
                security_estimate: Some(estimator.estimate(algorithm, key_size)),
                success: true,
                error_message: None,
            }
        }
        Err(e) => {
            warn!(algorithm, key_size, data_size = data.len(), "Trial failed: {}", e);
            TrialResult::failed(algorithm, data.len(), key_size, &e)
        }
    }
}

/// `len` bytes from the operating system's CSPRNG.
pub fn random_payload(len: usize) -> Vec<u8> {
    let mut data = vec![0u8; len];
    OsRng.fill_bytes(&mut data);
    data
}

/// Base64 text encoding `len` random bytes.
pub fn random_text(len: usize) -> String {
    STANDARD.encode(random_payload(len))
}

/// Owns one instance of every provider and runs comparisons over them.
#[derive(Debug, Default)]
pub struct ComparisonHarness {
    rsa: RsaProvider,
    ecc: EccProvider,
    hybrid: RsaAesHybridProvider,
    estimator: SecurityEstimator,
}

impl ComparisonHarness {
    pub fn new() -> Self {
        Self {
            rsa: RsaProvider::new(),
            ecc: EccProvider::new(),
            hybrid: RsaAesHybridProvider::new(),
            estimator: SecurityEstimator::new(),
        }
    }

    pub fn provider(&self, algorithm: Algorithm) -> &dyn TrialRunner {
        match algorithm {
            Algorithm::Rsa => &self.rsa,
            Algorithm::Ecc => &self.ecc,
            Algorithm::RsaAesHybrid => &self.hybrid,
        }
    }

    pub fn estimator(&self) -> &SecurityEstimator {
        &self.estimator
    }

    /// Lanes tested by `config`, in result order.
    pub fn lanes(config: &TrialConfig) -> Vec<(Algorithm, usize)> {
        let mut lanes = vec![
            (Algorithm::Rsa, config.rsa_key_size),
            (Algorithm::Ecc, config.ecc_key_size),
        ];
        if let Some(key_size) = config.hybrid_key_size {
            lanes.push((Algorithm::RsaAesHybrid, key_size));
        }
        lanes
    }

    /// Runs RSA and ECC (and the hybrid lane when configured) for every data
    /// size. Results are ordered data-size-major, algorithm-minor.
    pub fn run_comparison(&self, config: &TrialConfig) -> Vec<TrialResult> {
        self.run_matrix(&config.data_sizes, &Self::lanes(config))
    }

    /// Runs an arbitrary list of lanes for every data size.
    ///
    /// A fresh random payload is generated per data size and shared by the
    /// lanes of that size.
    pub fn run_matrix(
        &self,
        data_sizes: &[usize],
        lanes: &[(Algorithm, usize)],
    ) -> Vec<TrialResult> {
        info!(
            data_sizes = data_sizes.len(),
            lanes = lanes.len(),
            "Starting comparison"
        );

        let mut results = Vec::with_capacity(data_sizes.len() * lanes.len());
        for &data_size in data_sizes {
            let data = random_payload(data_size);
            for &(algorithm, key_size) in lanes {
                results.push(
                    self.provider(algorithm)
                        .run_trial(&data, key_size, &self.estimator),
                );
            }
        }

        let failures = results.iter().filter(|r| !r.success).count();
        info!(trials = results.len(), failures, "Comparison finished");
        results
    }
}
