use std::path::PathBuf;

use thiserror::Error;

/// Failures while assembling the session configuration.
///
/// Any of these aborts the session before a single probe is dispatched.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read configuration file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid configuration document {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("Invalid configuration value: {0}")]
    Invalid(String),

    #[error("Invalid DNS host '{host}': {source}")]
    DnsHost {
        host: String,
        #[source]
        source: std::net::AddrParseError,
    },

    #[error("Failed to build HTTP client: {0}")]
    HttpClient(#[from] reqwest::Error),
}

/// Failures of the log file sink.
#[derive(Debug, Error)]
pub enum SinkError {
    #[error("Failed to create log directory {path}: {source}")]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write log file {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
