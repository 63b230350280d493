use tracing_subscriber::EnvFilter;

/// Installs the global `tracing` subscriber.
///
/// The level is read from `RUST_LOG`, defaulting to `info`. With `quiet` set
/// nothing is installed and all events are dropped. Calling this more than
/// once is harmless: later calls leave the first subscriber in place.
pub fn initialize_logging(quiet: bool) {
    if quiet {
        return;
    }

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_level(true)
        .with_target(true)
        .with_writer(std::io::stderr)
        .compact()
        .try_init();
}
