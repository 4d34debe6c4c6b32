//! Client configuration: TOML file, then environment overrides.
//!
//! | Variable | Meaning |
//! |---|---|
//! | `CONE_VIEWER_API_BASE` | backend base URL |
//! | `CONE_VIEWER_PLOT_LIMIT` | `limit` sent with `/plot-data` |
//! | `CONE_VIEWER_EXPORT` | `server`, `storage:<base-url>` or `disabled` |
//! | `CONE_VIEWER_DISPLAY_IDS` | `true` to show eye-suffixed subject ids |

use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

pub const ENV_API_BASE: &str = "CONE_VIEWER_API_BASE";
pub const ENV_PLOT_LIMIT: &str = "CONE_VIEWER_PLOT_LIMIT";
pub const ENV_EXPORT: &str = "CONE_VIEWER_EXPORT";
pub const ENV_DISPLAY_IDS: &str = "CONE_VIEWER_DISPLAY_IDS";

/// Where CSV downloads come from. Chosen once per deployment and handed to
/// the API client at construction.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ExportBackend {
    /// `GET /cones/export` with the filter query.
    #[default]
    ServerRoute,
    /// Precomputed `{base_url}/{display_id}.csv` files.
    ObjectStorage { base_url: String },
    Disabled,
}

impl FromStr for ExportBackend {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "server" | "server_route" => Ok(Self::ServerRoute),
            "disabled" | "none" => Ok(Self::Disabled),
            other => match other.strip_prefix("storage:") {
                Some(url) if !url.is_empty() => Ok(Self::ObjectStorage {
                    base_url: url.trim_end_matches('/').to_string(),
                }),
                _ => Err(()),
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    pub base_url: String,
    /// Server-side cap on returned cones per plot request.
    pub plot_limit: u32,
    pub export_backend: ExportBackend,
    /// Show `S001R`-style subject ids in the filter bar.
    pub display_ids: bool,
    pub timeout_secs: u64,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:8000".to_string(),
            plot_limit: 2000,
            export_backend: ExportBackend::ServerRoute,
            display_ids: false,
            timeout_secs: 30,
        }
    }
}

impl ClientConfig {
    /// Load `path` when given (missing file is an error), apply environment
    /// overrides.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let base = match path {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        base.with_env_overrides(|var| std::env::var(var).ok())
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    /// Apply overrides from `lookup` (normally the process environment).
    pub fn with_env_overrides(
        mut self,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ConfigError> {
        if let Some(url) = lookup(ENV_API_BASE).filter(|v| !v.trim().is_empty()) {
            self.base_url = url.trim().trim_end_matches('/').to_string();
        }
        if let Some(value) = lookup(ENV_PLOT_LIMIT) {
            self.plot_limit = value.trim().parse().map_err(|_| ConfigError::InvalidEnv {
                var: ENV_PLOT_LIMIT,
                value: value.clone(),
            })?;
        }
        if let Some(value) = lookup(ENV_EXPORT) {
            self.export_backend = value.parse().map_err(|()| ConfigError::InvalidEnv {
                var: ENV_EXPORT,
                value: value.clone(),
            })?;
        }
        if let Some(value) = lookup(ENV_DISPLAY_IDS) {
            self.display_ids = match value.trim().to_ascii_lowercase().as_str() {
                "1" | "true" | "yes" => true,
                "0" | "false" | "no" => false,
                _ => {
                    return Err(ConfigError::InvalidEnv {
                        var: ENV_DISPLAY_IDS,
                        value,
                    });
                }
            };
        }
        self.base_url = self.base_url.trim_end_matches('/').to_string();
        Ok(self)
    }
}
