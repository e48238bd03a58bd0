use tracing_subscriber::EnvFilter;

/// Logs go to stderr; stdout carries only the run report.
pub fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info,hyper=warn")),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
