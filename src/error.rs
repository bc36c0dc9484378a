//! Error types shared by the simulation core and its input/output plumbing.
//!
//! The first three variants are the core's own failure kinds. None of them is
//! retriable: the computation is pure, so the same input yields the same
//! error until the upstream data is fixed.

use std::path::PathBuf;

use thiserror::Error;

/// Unified error type for every fallible operation in the crate.
#[derive(Debug, Error)]
pub enum SimError {
    /// Malformed turbine power curve, hub geometry, or roughness length.
    #[error("invalid spec: {0}")]
    InvalidSpec(String),

    /// Weather, price, and load series do not share one gap-free timestamp index.
    #[error("alignment error: {0}")]
    Alignment(String),

    /// Component outputs disagree in length or index for the same run.
    #[error("schema mismatch: {0}")]
    SchemaMismatch(String),

    /// A single input sample is unusable (non-finite or negative where a
    /// physical magnitude is expected).
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// Run configuration rejected before the engine starts.
    #[error("config error: {0}")]
    Config(String),

    /// An input file could not be opened or read.
    #[error("cannot read \"{}\": {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// A timestamp could not be represented after a calendar transformation.
    #[error("invalid timestamp: {0}")]
    Timestamp(String),
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, SimError>;

impl SimError {
    /// Returns `true` only for environment failures (file system, pipes).
    ///
    /// Data and turbine-spec errors are deterministic and never retriable.
    pub fn is_retriable(&self) -> bool {
        matches!(self, Self::Read { .. } | Self::Io(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn core_errors_are_not_retriable() {
        assert!(!SimError::InvalidSpec("x".into()).is_retriable());
        assert!(!SimError::Alignment("x".into()).is_retriable());
        assert!(!SimError::SchemaMismatch("x".into()).is_retriable());
    }

    #[test]
    fn read_error_names_path() {
        let err = SimError::Read {
            path: PathBuf::from("weather.csv"),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "missing"),
        };
        let msg = err.to_string();
        assert!(msg.contains("weather.csv"), "{msg}");
        assert!(err.is_retriable());
    }
}
