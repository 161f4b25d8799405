//! Crate-wide error type.
//!
//! Configuration problems are reported as a list of [`ConfigError`]s by the
//! `validate()` methods; everything that aborts a run is funnelled through
//! [`Error`] so the binary can attach context once at the top level.

use thiserror::Error;

use crate::config::ConfigError;

/// Unified error for loading, simulating, redistributing, and exporting.
#[derive(Error, Debug)]
pub enum Error {
    /// File access failures.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV encoding or decoding failures.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// TOML deserialization failures.
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    /// JSON encoding failures.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A configuration or network field violates its constraint.
    #[error("{0}")]
    Config(ConfigError),

    /// Input tables are inconsistent with each other or with the horizon.
    #[error("validation error: {0}")]
    Validation(String),

    /// The hydraulic solver could not produce results.
    #[error("solver error: {0}")]
    Solver(String),

    /// A redistribution policy received parameters it cannot apply.
    #[error("response error: {0}")]
    Response(String),
}

impl From<ConfigError> for Error {
    fn from(err: ConfigError) -> Self {
        Error::Config(err)
    }
}

/// Convenience alias used throughout the library.
pub type Result<T> = std::result::Result<T, Error>;
