use cipherbench::{format_time, initialize_logging, summarize, ComparisonHarness, TrialConfig};

fn main() {
    initialize_logging(false);

    let config = TrialConfig {
        data_sizes: vec![16, 64, 200, 4096],
        rsa_key_size: 2048,
        ecc_key_size: 256,
        hybrid_key_size: Some(2048),
    };

    println!("\n=== Comparison Example ===");
    let results = ComparisonHarness::new().run_comparison(&config);
    for result in &results {
        match (&result.timings, &result.error_message) {
            (Some(timings), _) => println!(
                "{:<16} {:>6} bytes  keygen {:>10}  encrypt {:>10}  decrypt {:>10}",
                result.algorithm,
                result.data_size,
                format_time(timings.key_generation_ms),
                format_time(timings.encryption_ms),
                format_time(timings.decryption_ms)
            ),
            (None, Some(error)) => println!(
                "{:<16} {:>6} bytes  ✗ {}",
                result.algorithm, result.data_size, error
            ),
            (None, None) => {}
        }
    }

    println!();
    for lane in summarize(&results) {
        println!(
            "{} ({} bits): {}/{} succeeded",
            lane.algorithm,
            lane.key_size,
            lane.trials - lane.failures,
            lane.trials
        );
    }
}
