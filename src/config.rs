//! Service configuration: JSON file, then environment overrides.

use crate::schema::{FORM_FIELDS, KNOWN_CLICK_TYPES};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("invalid value {value:?} for {var}")]
    Env { var: &'static str, value: String },
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceConfig {
    /// HTTP listener and frontend serving
    pub server: ServerConfig,
    /// Fitted model artifact locations
    pub models: ModelsConfig,
    /// Form fields and click types of the telemetry schema
    pub schema: SchemaConfig,
    /// Logging
    pub log: LogConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Built frontend served for unmatched paths, if set
    pub static_dir: Option<PathBuf>,
    pub cors_permissive: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelsConfig {
    pub scaler_path: PathBuf,
    pub cluster_path: PathBuf,
    pub classifier_path: PathBuf,
    /// Warn at startup when an artifact was trained with a different version
    pub expected_trainer_version: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SchemaConfig {
    /// Sub-fields of `Time_per_Field`, in column order
    pub form_fields: Vec<String>,
    /// Click labels encoded as counts, in column order
    pub known_click_types: Vec<String>,
    pub allow_unknown_fields: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    pub level: String,
    pub json: bool,
    /// Mirror log lines to this file (JSON), if set
    pub file: Option<PathBuf>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 5000,
            static_dir: None,
            cors_permissive: true,
        }
    }
}

impl Default for ModelsConfig {
    fn default() -> Self {
        Self {
            scaler_path: PathBuf::from("scaler.json"),
            cluster_path: PathBuf::from("kmeans.json"),
            classifier_path: PathBuf::from("logreg.json"),
            expected_trainer_version: Some("1.5.2".to_string()),
        }
    }
}

impl Default for SchemaConfig {
    fn default() -> Self {
        Self {
            form_fields: FORM_FIELDS.iter().map(|s| s.to_string()).collect(),
            known_click_types: KNOWN_CLICK_TYPES.iter().map(|s| s.to_string()).collect(),
            allow_unknown_fields: false,
        }
    }
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: true,
            file: None,
        }
    }
}

impl ServiceConfig {
    /// Load from JSON file if present; otherwise return default.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let data = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&data).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Apply `HOST`, `PORT`, `SCALER_PATH`, `KMEANS_PATH`, `LOGREG_PATH` and
    /// `STATIC_DIR` from the process environment.
    pub fn with_env(self) -> Result<Self, ConfigError> {
        self.with_overrides(|var| std::env::var(var).ok())
    }

    pub fn with_overrides<F>(mut self, lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&'static str) -> Option<String>,
    {
        if let Some(host) = lookup("HOST") {
            self.server.host = host;
        }
        if let Some(port) = lookup("PORT") {
            self.server.port = port
                .trim()
                .parse()
                .map_err(|_| ConfigError::Env { var: "PORT", value: port })?;
        }
        if let Some(dir) = lookup("STATIC_DIR") {
            self.server.static_dir = Some(PathBuf::from(dir));
        }
        if let Some(p) = lookup("SCALER_PATH") {
            self.models.scaler_path = PathBuf::from(p);
        }
        if let Some(p) = lookup("KMEANS_PATH") {
            self.models.cluster_path = PathBuf::from(p);
        }
        if let Some(p) = lookup("LOGREG_PATH") {
            self.models.classifier_path = PathBuf::from(p);
        }
        Ok(self)
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}
