//! Tracing subscriber setup for the service embedding the adapters

use crate::config::LogConfig;
use tracing_subscriber::EnvFilter;

/// Install a global fmt subscriber
///
/// `RUST_LOG` wins over `config.filter`. Returns `false` when a subscriber
/// was already installed, which leaves the existing one in place.
pub fn init_tracing(config: &LogConfig) -> bool {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.filter));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_ansi(config.ansi)
        .try_init()
        .is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_second_init_is_noop() {
        let config = LogConfig::default();
        let _ = init_tracing(&config);
        assert!(!init_tracing(&config));
    }
}
