use std::path::PathBuf;

use thiserror::Error;

/// Failures while bringing the daemon up.
#[derive(Debug, Error)]
pub enum SupervisorError {
    #[error("failed to prepare log file {path}: {source}")]
    LogFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to spawn {exe}: {source}")]
    Spawn {
        exe: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("daemon is not routing traffic through {endpoint}")]
    Unreachable { endpoint: String },
}

/// Failures talking to the daemon's control API.
#[derive(Debug, Error)]
pub enum ControlError {
    #[error("request to {url} failed: {message}")]
    Transport { url: String, message: String },

    #[error("{url} answered with HTTP {status}")]
    Status { url: String, status: u16 },

    #[error("malformed JSON from {url}: {source}")]
    Json {
        url: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("response from {url} has no '{field}' field")]
    MissingField { url: String, field: &'static str },

    #[error("daemon reported unknown mode '{value}'")]
    InvalidMode { value: String },

    #[error("daemon still reports '{actual}' after switching to '{expected}'")]
    NotApplied { expected: String, actual: String },
}

/// Failures of a configuration update, one variant per stage.
#[derive(Debug, Error)]
pub enum UpdateError {
    #[error("invalid url '{url}'")]
    InvalidUrl { url: String },

    #[error("failed to download config file from {url}: {message}")]
    Download { url: String, message: String },

    #[error("failed to write downloaded config file {path}: {source}")]
    Staging {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("downloaded config file {path} is not a YAML mapping: {reason}")]
    InvalidArtifact { path: PathBuf, reason: String },

    #[error("failed to backup old config file to {path}: {source}")]
    Backup {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to update config file {path}: {source}")]
    Swap {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("new config file failed validation; daemon left stopped")]
    Validation,
}
