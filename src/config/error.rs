//! Configuration error types.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur during configuration loading and validation.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Port value is outside valid range (1-65535).
    #[error("invalid port '{value}': must be between 1 and 65535")]
    InvalidPort { value: String },

    /// Port string could not be parsed as a number.
    #[error("failed to parse port '{value}': {source}")]
    PortParseError {
        value: String,
        #[source]
        source: std::num::ParseIntError,
    },

    /// Bind address string could not be parsed.
    #[error("failed to parse bind address '{value}': {source}")]
    InvalidBindAddr {
        value: String,
        #[source]
        source: std::net::AddrParseError,
    },

    /// A fusion weight could not be parsed as a number.
    #[error("failed to parse {name}='{value}': {source}")]
    WeightParseError {
        name: &'static str,
        value: String,
        #[source]
        source: std::num::ParseFloatError,
    },

    /// Fusion weights must be non-negative and sum to 1.
    #[error("invalid fusion weights: lexical={lexical} vector={vector} (must be non-negative and sum to 1)")]
    InvalidWeights { lexical: f32, vector: f32 },

    /// Session TTL must be positive.
    #[error("invalid session TTL: {value} (must be positive seconds)")]
    InvalidSessionTtl { value: i64 },

    /// Path exists but is not a file (when a file was expected).
    #[error("path is not a file: {path}")]
    NotAFile { path: PathBuf },
}
