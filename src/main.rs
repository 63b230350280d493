use cipherbench::{
    format_time, initialize_logging, summarize, Algorithm, AlgorithmSummary, CompareError,
    CompareResult, ComparisonHarness, SecurityEstimator, TrialConfig, TrialResult,
};
use clap::{Args, Parser, Subcommand};
use serde::Serialize;
use std::{path::PathBuf, process::ExitCode};
use tracing::error;

#[derive(Parser, Debug)]
#[clap(version, about, long_about = None)]
struct Cli {
    /// Do not log to stderr
    #[clap(long, global = true, env = "CIPHERBENCH_QUIET", default_value = "false")]
    quiet: bool,

    #[clap(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run RSA, ECC (and optionally RSA+AES hybrid) over a set of data sizes
    Compare(CompareArgs),
    /// Print the security estimate of an algorithm and key size
    Estimate {
        /// RSA, ECC or "RSA+AES Hybrid"
        algorithm: String,
        /// Key size in bits
        key_size: usize,
    },
}

#[derive(Args, Debug)]
struct CompareArgs {
    /// JSON configuration file (dataSizes, rsaKeySize, eccKeySize, hybridKeySize)
    #[clap(long, short)]
    config: Option<PathBuf>,

    /// Comma-separated payload sizes in bytes
    #[clap(long, value_delimiter = ',')]
    data_sizes: Option<Vec<usize>>,

    #[clap(long)]
    rsa_key_size: Option<usize>,

    #[clap(long)]
    ecc_key_size: Option<usize>,

    /// Adds an RSA+AES hybrid lane with this key size
    #[clap(long)]
    hybrid_key_size: Option<usize>,

    /// Print results as JSON instead of a table
    #[clap(long)]
    json: bool,
}

impl CompareArgs {
    fn trial_config(&self) -> CompareResult<TrialConfig> {
        let mut config = match &self.config {
            Some(path) => TrialConfig::from_json_file(path)?,
            None => TrialConfig::default(),
        };
        if let Some(data_sizes) = &self.data_sizes {
            config.data_sizes = data_sizes.clone();
        }
        if let Some(key_size) = self.rsa_key_size {
            config.rsa_key_size = key_size;
        }
        if let Some(key_size) = self.ecc_key_size {
            config.ecc_key_size = key_size;
        }
        if self.hybrid_key_size.is_some() {
            config.hybrid_key_size = self.hybrid_key_size;
        }
        config.validate()?;
        Ok(config)
    }
}

#[derive(Serialize)]
struct Report<'a> {
    config: &'a TrialConfig,
    results: &'a [TrialResult],
    summary: Vec<AlgorithmSummary>,
}

fn print_table(results: &[TrialResult], summary: &[AlgorithmSummary]) {
    println!(
        "{:<16} {:>10} {:>8} {:>12} {:>12} {:>12} {:>5}  {}",
        "ALGORITHM", "DATA", "KEY", "KEYGEN", "ENCRYPT", "DECRYPT", "BITS", "STATUS"
    );
    for result in results {
        let (keygen, encrypt, decrypt) = match &result.timings {
            Some(t) => (
                format_time(t.key_generation_ms),
                format_time(t.encryption_ms),
                format_time(t.decryption_ms),
            ),
            None => ("-".to_string(), "-".to_string(), "-".to_string()),
        };
        let bits = result
            .security_estimate
            .as_ref()
            .map(|e| e.security_bits.to_string())
            .unwrap_or_else(|| "-".to_string());
        let status = match &result.error_message {
            Some(message) => format!("✗ {}", message),
            None => "✓".to_string(),
        };
        println!(
            "{:<16} {:>10} {:>8} {:>12} {:>12} {:>12} {:>5}  {}",
            result.algorithm,
            result.data_size,
            result.key_size,
            keygen,
            encrypt,
            decrypt,
            bits,
            status
        );
    }

    println!();
    for lane in summary {
        let average = |m: Option<cipherbench::PerformanceMetrics>| {
            m.map(|m| format_time(m.average))
                .unwrap_or_else(|| "-".to_string())
        };
        println!(
            "{} ({} bits): {} trials, {} failed, avg keygen {}, avg encrypt {}, avg decrypt {}",
            lane.algorithm,
            lane.key_size,
            lane.trials,
            lane.failures,
            average(lane.key_generation),
            average(lane.encryption),
            average(lane.decryption)
        );
    }
}

fn compare(args: &CompareArgs) -> CompareResult<()> {
    let config = args.trial_config()?;
    let results = ComparisonHarness::new().run_comparison(&config);
    let summary = summarize(&results);

    if args.json {
        let report = Report {
            config: &config,
            results: &results,
            summary,
        };
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_table(&results, &summary);
    }
    Ok(())
}

fn estimate(algorithm: &str, key_size: usize) -> CompareResult<()> {
    let algorithm: Algorithm = algorithm.parse()?;
    let estimate = SecurityEstimator::new().estimate(algorithm.name(), key_size);
    if estimate.security_bits == 0 {
        println!("{} {}: no estimate available", estimate.algorithm, key_size);
    } else {
        println!(
            "{} {}: {} security bits, {}",
            estimate.algorithm, key_size, estimate.security_bits, estimate.estimated_break_time
        );
    }
    Ok(())
}

fn run(cli: &Cli) -> CompareResult<()> {
    match &cli.command {
        Command::Compare(args) => compare(args),
        Command::Estimate {
            algorithm,
            key_size,
        } => estimate(algorithm, *key_size),
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    initialize_logging(cli.quiet);

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e @ CompareError::Config(_)) | Err(e @ CompareError::UnknownAlgorithm(_)) => {
            error!("{}", e);
            eprintln!("Error: {}", e);
            ExitCode::from(2)
        }
        Err(e) => {
            error!("{}", e);
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_definition() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn test_flags_override_defaults() {
        let cli = Cli::parse_from([
            "cipherbench",
            "compare",
            "--data-sizes",
            "16,32",
            "--rsa-key-size",
            "1024",
            "--hybrid-key-size",
            "2048",
        ]);
        let Command::Compare(args) = cli.command else {
            panic!("expected compare subcommand");
        };
        let config = args.trial_config().unwrap();
        assert_eq!(config.data_sizes, vec![16, 32]);
        assert_eq!(config.rsa_key_size, 1024);
        assert_eq!(config.ecc_key_size, 256);
        assert_eq!(config.hybrid_key_size, Some(2048));
    }

    #[test]
    fn test_zero_data_size_rejected() {
        let cli = Cli::parse_from(["cipherbench", "compare", "--data-sizes", "0"]);
        let Command::Compare(args) = cli.command else {
            panic!("expected compare subcommand");
        };
        assert!(matches!(args.trial_config(), Err(CompareError::Config(_))));
    }

    #[test]
    fn test_unknown_algorithm() {
        assert!(matches!(
            estimate("dsa", 1024),
            Err(CompareError::UnknownAlgorithm(_))
        ));
    }
}
