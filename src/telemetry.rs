//! Tracing subscriber bootstrap.

use tracing_subscriber::EnvFilter;

/// Installs a compact stderr subscriber filtered at `level`.
///
/// `RUST_LOG`, when set, overrides `level`. Calling this more than once is a
/// no-op after the first successful installation.
pub fn init_subscriber(level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .compact();

    if subscriber.try_init().is_err() {
        tracing::debug!("global tracing subscriber already installed");
    }
}
