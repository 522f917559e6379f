use tracing_subscriber::EnvFilter;

use crate::config::DEFAULT_LOG_FILTER;

/// Install the global fmt subscriber with the default filter.
pub fn init() {
    init_with_filter(DEFAULT_LOG_FILTER);
}

/// Install the global fmt subscriber. `RUST_LOG`, when set, wins over `filter`.
///
/// Calling this more than once is harmless; only the first subscriber sticks.
pub fn init_with_filter(filter: &str) {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));

    if tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .try_init()
        .is_err()
    {
        tracing::debug!("Global tracing subscriber already installed");
    }
}
