use tracing_subscriber::EnvFilter;

const DEFAULT_FILTER: &str = "warn,matchday_odds=info";

/// Logs go to stderr so prompts and results on stdout stay readable.
pub fn init_logging() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}
