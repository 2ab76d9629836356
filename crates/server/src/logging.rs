use tracing_subscriber::EnvFilter;

/// Install the global subscriber: stderr output, `RUST_LOG` filtering,
/// `info` when unset.
pub fn init() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
