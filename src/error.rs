//! Crate-wide error taxonomy.
//!
//! A flat enum with a manual `Display` impl and `From` conversions at the
//! boundaries, rather than a `thiserror` derive.

use crate::model::ModelError;

/// Top-level error returned by the CLI and library entry points.
#[derive(Debug)]
pub enum AppError {
    /// Invalid or missing configuration (CLI arguments, config files).
    /// Always surfaced before any IO is attempted.
    Configuration(String),
    /// Failure reading or writing one of the output streams.
    Io(std::io::Error),
    /// A task or platform parameter violated a data-model invariant.
    Model(ModelError),
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Configuration(msg) => write!(f, "configuration error: {msg}"),
            Self::Io(err) => write!(f, "IO error: {err}"),
            Self::Model(err) => write!(f, "model error: {err}"),
        }
    }
}

impl std::error::Error for AppError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(err) => Some(err),
            Self::Model(err) => Some(err),
            Self::Configuration(_) => None,
        }
    }
}

impl From<std::io::Error> for AppError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<ModelError> for AppError {
    fn from(value: ModelError) -> Self {
        Self::Model(value)
    }
}
