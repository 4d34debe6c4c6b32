use std::path::PathBuf;

use thiserror::Error;

/// Failure of one backend call.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The request never got a response (backend down, DNS, timeout).
    #[error("backend unreachable: {0}")]
    Network(String),

    /// The backend answered with a non-2xx status.
    #[error("HTTP {status}")]
    Http { status: u16 },

    /// The body did not have the expected shape.
    #[error("unexpected response: {0}")]
    Decode(String),

    #[error("CSV export is disabled for this deployment")]
    ExportDisabled,

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl ApiError {
    /// HTTP status, for callers that treat e.g. 404 as "no data".
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Http { status } => Some(*status),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(e: reqwest::Error) -> Self {
        if let Some(status) = e.status() {
            Self::Http {
                status: status.as_u16(),
            }
        } else if e.is_decode() {
            Self::Decode(e.to_string())
        } else {
            Self::Network(e.to_string())
        }
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(e: serde_json::Error) -> Self {
        Self::Decode(e.to_string())
    }
}

/// Failure loading [`ClientConfig`](crate::ClientConfig).
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid value {value:?} for {var}")]
    InvalidEnv { var: &'static str, value: String },
}
