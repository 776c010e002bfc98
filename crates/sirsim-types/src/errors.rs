//! # sirsim-types::errors
//!
//! Defines the common error types used throughout the sirsim workspace.
//! Using `thiserror` provides clean, descriptive error handling. All error
//! variants must have a deterministic `Debug` implementation for
//! reproducibility.

use thiserror::Error;

/// A general-purpose error for the simulation engine. Scheduling an event
/// in the past is deliberately absent: it is a programmer error, caught by
/// a debug assertion in the queue rather than surfaced at runtime.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SimError {
    /// A construction parameter violated its documented constraint.
    #[error("invalid parameter '{name}': {reason}")]
    InvalidParameter { name: &'static str, reason: String },
    /// An event factory was handed an individual index outside the
    /// population.
    #[error("individual index {idx} out of range for population of {n}")]
    IndexOutOfRange { idx: usize, n: usize },
    /// `run` was called on a simulation that has already run to completion.
    #[error("simulation has already run; construct a new instance")]
    AlreadyRun,
}

/// An error related to parsing or validating scenario files.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("I/O error reading scenario file: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parsing error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("YAML parsing error: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("validation error in scenario '{name}': {message}")]
    Validation { name: String, message: String },
    #[error("unsupported scenario file extension: {0}")]
    UnsupportedExtension(String),
}
