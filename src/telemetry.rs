//! Tracing subscriber setup for the binary.

use std::io;

use tracing::Level;
use tracing_subscriber::EnvFilter;

/// Default filter when neither `RUST_LOG` nor an explicit level is given.
const DEFAULT_FILTER: &str = "ppa_sim=info";

/// Builds the event filter.
///
/// An explicit `level` wins; otherwise `RUST_LOG` is honoured, falling back
/// to `info` for this crate.
pub fn env_filter(level: Option<Level>) -> EnvFilter {
    match level {
        Some(level) => EnvFilter::default().add_directive(level.into()),
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER)),
    }
}

/// Installs a global formatting subscriber that writes to stderr, keeping
/// stdout free for reports.
///
/// Returns `false` if a global subscriber was already installed.
pub fn init_tracing(level: Option<Level>) -> bool {
    tracing_subscriber::fmt()
        .with_env_filter(env_filter(level))
        .with_writer(io::stderr)
        .with_target(false)
        .try_init()
        .is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_level_sets_max() {
        let filter = env_filter(Some(Level::DEBUG));
        assert_eq!(filter.max_level_hint(), Some(tracing::level_filters::LevelFilter::DEBUG));
    }

    #[test]
    fn second_init_is_rejected() {
        init_tracing(Some(Level::WARN));
        assert!(!init_tracing(Some(Level::WARN)));
    }
}
