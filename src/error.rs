// File: src/error.rs

use std::path::PathBuf;
use thiserror::Error;

/// Hard failures surfaced to callers.
///
/// Per-entry match failures and unparseable timestamps are not errors; they
/// never reach this type.
#[derive(Debug, Error)]
pub enum TraceError {
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Export failed: {0}")]
    Csv(#[from] csv::Error),

    #[error("Invalid config file: {0}")]
    Config(#[from] toml::de::Error),

    #[error("Could not parse time string: {0}")]
    InvalidTime(String),

    #[error("Unknown granularity '{0}' (expected hourly or daily)")]
    InvalidGranularity(String),
}

impl TraceError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        TraceError::Io {
            path: path.into(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, TraceError>;
