use crate::harness::{TrialResult, TrialTimings};
use serde::{Deserialize, Serialize};

/// Formats a duration given in milliseconds with a unit suited to its size.
pub fn format_time(milliseconds: f64) -> String {
    if milliseconds < 1.0 {
        format!("{:.2}μs", milliseconds * 1000.0)
    } else if milliseconds < 1000.0 {
        format!("{:.2}ms", milliseconds)
    } else {
        format!("{:.2}s", milliseconds / 1000.0)
    }
}

/// Aggregate of a series of timings, in milliseconds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PerformanceMetrics {
    pub total: f64,
    pub average: f64,
    pub min: f64,
    pub max: f64,
}

impl PerformanceMetrics {
    /// Returns `None` for an empty series.
    pub fn from_timings(timings: &[f64]) -> Option<Self> {
        if timings.is_empty() {
            return None;
        }
        let total: f64 = timings.iter().sum();
        let min = timings.iter().copied().fold(f64::INFINITY, f64::min);
        let max = timings.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        Some(Self {
            total,
            average: total / timings.len() as f64,
            min,
            max,
        })
    }
}

/// Per-lane summary of a comparison run.
///
/// Phase metrics only cover successful trials.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AlgorithmSummary {
    pub algorithm: String,
    pub key_size: usize,
    pub trials: usize,
    pub failures: usize,
    pub key_generation: Option<PerformanceMetrics>,
    pub encryption: Option<PerformanceMetrics>,
    pub decryption: Option<PerformanceMetrics>,
}

fn phase(
    timings: &[TrialTimings],
    select: impl Fn(&TrialTimings) -> f64,
) -> Option<PerformanceMetrics> {
    let series: Vec<f64> = timings.iter().map(select).collect();
    PerformanceMetrics::from_timings(&series)
}

/// Groups results by (algorithm, key size) in first-seen order.
pub fn summarize(results: &[TrialResult]) -> Vec<AlgorithmSummary> {
    let mut lanes: Vec<(&str, usize)> = Vec::new();
    for result in results {
        let lane = (result.algorithm.as_str(), result.key_size);
        if !lanes.contains(&lane) {
            lanes.push(lane);
        }
    }

    lanes
        .into_iter()
        .map(|(algorithm, key_size)| {
            let lane_results: Vec<&TrialResult> = results
                .iter()
                .filter(|r| r.algorithm == algorithm && r.key_size == key_size)
                .collect();
            let timings: Vec<TrialTimings> = lane_results
                .iter()
                .filter(|r| r.success)
                .filter_map(|r| r.timings)
                .collect();

            AlgorithmSummary {
                algorithm: algorithm.to_string(),
                key_size,
                trials: lane_results.len(),
                failures: lane_results.iter().filter(|r| !r.success).count(),
                key_generation: phase(&timings, |t| t.key_generation_ms),
                encryption: phase(&timings, |t| t.encryption_ms),
                decryption: phase(&timings, |t| t.decryption_ms),
            }
        })
        .collect()
}
