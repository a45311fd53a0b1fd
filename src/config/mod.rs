//! Environment-backed configuration.
//!
//! Every setting has a default. Override with `CAFEFINDER_*` environment
//! variables.

pub mod error;

#[cfg(test)]
mod tests;

pub use error::ConfigError;

use std::env;
use std::net::IpAddr;
use std::path::PathBuf;

use crate::embedding::DEFAULT_EMBEDDING_MODEL;
use crate::search::FusionWeights;
use crate::session::DEFAULT_SESSION_TTL_SECS;

/// Server configuration loaded from environment variables.
///
/// Use [`Config::from_env`] to read `CAFEFINDER_*` overrides on top of
/// defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// HTTP server port. Default: `8080`.
    pub port: u16,

    /// IP address to bind to. Default: `127.0.0.1`.
    pub bind_addr: IpAddr,

    /// Path of the local libSQL database file. Default: `./cafefinder.db`.
    pub database_path: PathBuf,

    /// Qdrant endpoint URL. Default: `http://localhost:6334`.
    pub qdrant_url: String,

    /// Base URL of the OpenAI-compatible embedding service.
    /// Default: `https://api.openai.com`.
    pub embedding_url: String,

    /// Bearer token for the embedding service, if it requires one.
    pub embedding_api_key: Option<String>,

    /// Embedding model name. Default: `text-embedding-3-small`.
    pub embedding_model: String,

    /// Lexical component of the fusion weights. Default: `0.05`.
    ///
    /// The weights are tunables, not derived constants; together with
    /// `vector_weight` they must be non-negative and sum to 1.
    pub lexical_weight: f32,

    /// Vector component of the fusion weights. Default: `0.95`.
    pub vector_weight: f32,

    /// Search session lifetime in seconds. Default: `3600`.
    pub session_ttl_secs: i64,
}

/// Default Qdrant URL used when `CAFEFINDER_QDRANT_URL` is not set.
pub const DEFAULT_QDRANT_URL: &str = "http://localhost:6334";

/// Default embedding service URL used when `CAFEFINDER_EMBEDDING_URL` is not
/// set.
pub const DEFAULT_EMBEDDING_URL: &str = "https://api.openai.com";

impl Default for Config {
    fn default() -> Self {
        let weights = FusionWeights::default();

        Self {
            port: 8080,
            bind_addr: IpAddr::V4(std::net::Ipv4Addr::new(127, 0, 0, 1)),
            database_path: PathBuf::from("./cafefinder.db"),
            qdrant_url: DEFAULT_QDRANT_URL.to_string(),
            embedding_url: DEFAULT_EMBEDDING_URL.to_string(),
            embedding_api_key: None,
            embedding_model: DEFAULT_EMBEDDING_MODEL.to_string(),
            lexical_weight: weights.lexical,
            vector_weight: weights.vector,
            session_ttl_secs: DEFAULT_SESSION_TTL_SECS,
        }
    }
}

impl Config {
    const ENV_PORT: &'static str = "CAFEFINDER_PORT";
    const ENV_BIND_ADDR: &'static str = "CAFEFINDER_BIND_ADDR";
    const ENV_DATABASE_PATH: &'static str = "CAFEFINDER_DATABASE_PATH";
    const ENV_QDRANT_URL: &'static str = "CAFEFINDER_QDRANT_URL";
    const ENV_EMBEDDING_URL: &'static str = "CAFEFINDER_EMBEDDING_URL";
    const ENV_EMBEDDING_API_KEY: &'static str = "CAFEFINDER_EMBEDDING_API_KEY";
    const ENV_EMBEDDING_MODEL: &'static str = "CAFEFINDER_EMBEDDING_MODEL";
    const ENV_LEXICAL_WEIGHT: &'static str = "CAFEFINDER_LEXICAL_WEIGHT";
    const ENV_VECTOR_WEIGHT: &'static str = "CAFEFINDER_VECTOR_WEIGHT";
    const ENV_SESSION_TTL_SECS: &'static str = "CAFEFINDER_SESSION_TTL_SECS";

    /// Loads configuration from environment variables (falling back to
    /// defaults).
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let port = Self::parse_port_from_env(defaults.port)?;
        let bind_addr = Self::parse_bind_addr_from_env(defaults.bind_addr)?;
        let database_path =
            Self::parse_path_from_env(Self::ENV_DATABASE_PATH, defaults.database_path);
        let qdrant_url = Self::parse_string_from_env(Self::ENV_QDRANT_URL, defaults.qdrant_url);
        let embedding_url =
            Self::parse_string_from_env(Self::ENV_EMBEDDING_URL, defaults.embedding_url);
        let embedding_api_key = Self::parse_optional_string_from_env(Self::ENV_EMBEDDING_API_KEY);
        let embedding_model =
            Self::parse_string_from_env(Self::ENV_EMBEDDING_MODEL, defaults.embedding_model);
        let lexical_weight =
            Self::parse_weight_from_env(Self::ENV_LEXICAL_WEIGHT, defaults.lexical_weight)?;
        let vector_weight =
            Self::parse_weight_from_env(Self::ENV_VECTOR_WEIGHT, defaults.vector_weight)?;
        let session_ttl_secs =
            Self::parse_i64_from_env(Self::ENV_SESSION_TTL_SECS, defaults.session_ttl_secs);

        Ok(Self {
            port,
            bind_addr,
            database_path,
            qdrant_url,
            embedding_url,
            embedding_api_key,
            embedding_model,
            lexical_weight,
            vector_weight,
            session_ttl_secs,
        })
    }

    /// Validates basic invariants the parsers cannot check per-field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.lexical_weight < 0.0
            || self.vector_weight < 0.0
            || (self.lexical_weight + self.vector_weight - 1.0).abs() > 1e-3
        {
            return Err(ConfigError::InvalidWeights {
                lexical: self.lexical_weight,
                vector: self.vector_weight,
            });
        }

        if self.session_ttl_secs <= 0 {
            return Err(ConfigError::InvalidSessionTtl {
                value: self.session_ttl_secs,
            });
        }

        if self.database_path.exists() && self.database_path.is_dir() {
            return Err(ConfigError::NotAFile {
                path: self.database_path.clone(),
            });
        }

        Ok(())
    }

    /// Returns the configured fusion weights.
    pub fn fusion_weights(&self) -> FusionWeights {
        FusionWeights::new(self.lexical_weight, self.vector_weight)
    }

    /// Returns `"{bind_addr}:{port}"` (useful for logging/binding).
    pub fn socket_addr(&self) -> String {
        format!("{}:{}", self.bind_addr, self.port)
    }

    fn parse_port_from_env(default: u16) -> Result<u16, ConfigError> {
        match env::var(Self::ENV_PORT) {
            Ok(value) => {
                let port: u16 = value.parse().map_err(|e| ConfigError::PortParseError {
                    value: value.clone(),
                    source: e,
                })?;

                if port == 0 {
                    return Err(ConfigError::InvalidPort { value });
                }

                Ok(port)
            }
            Err(_) => Ok(default),
        }
    }

    fn parse_bind_addr_from_env(default: IpAddr) -> Result<IpAddr, ConfigError> {
        match env::var(Self::ENV_BIND_ADDR) {
            Ok(value) => value
                .parse()
                .map_err(|e| ConfigError::InvalidBindAddr { value, source: e }),
            Err(_) => Ok(default),
        }
    }

    fn parse_weight_from_env(var_name: &'static str, default: f32) -> Result<f32, ConfigError> {
        match env::var(var_name) {
            Ok(value) => value.parse().map_err(|e| ConfigError::WeightParseError {
                name: var_name,
                value,
                source: e,
            }),
            Err(_) => Ok(default),
        }
    }

    fn parse_path_from_env(var_name: &str, default: PathBuf) -> PathBuf {
        env::var(var_name).map(PathBuf::from).unwrap_or(default)
    }

    fn parse_string_from_env(var_name: &str, default: String) -> String {
        env::var(var_name).unwrap_or(default)
    }

    fn parse_optional_string_from_env(var_name: &str) -> Option<String> {
        env::var(var_name)
            .ok()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    }

    fn parse_i64_from_env(var_name: &str, default: i64) -> i64 {
        env::var(var_name)
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(default)
    }
}
