//! Runtime settings: `crsplit.yaml` plus `CRSPLIT_*` environment overrides.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::catalog::{load_cost_overrides, CostTable};
use crate::settlement::TransportPreset;

pub const DEFAULT_CONFIG_PATH: &str = "crsplit.yaml";
pub const DEFAULT_BIND: &str = "127.0.0.1:3000";
pub const DEFAULT_TOLERANCE: f64 = 0.5;

pub const CONFIG_ENV: &str = "CRSPLIT_CONFIG";
pub const BIND_ENV: &str = "CRSPLIT_BIND";
pub const TOLERANCE_ENV: &str = "CRSPLIT_TOLERANCE";
pub const TRANSPORT_ENV: &str = "CRSPLIT_TRANSPORT";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },
    #[error("invalid value for {key}: '{value}'")]
    InvalidValue { key: String, value: String },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub bind: String,
    pub tolerance: f64,
    pub transport: TransportPreset,
    /// YAML/JSON file of per-unit cost overrides.
    pub cost_overrides_path: Option<PathBuf>,
    /// Batch parsing threads; 0 uses the rayon default.
    pub workers: usize,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            bind: DEFAULT_BIND.to_string(),
            tolerance: DEFAULT_TOLERANCE,
            transport: TransportPreset::default(),
            cost_overrides_path: None,
            workers: 0,
        }
    }
}

impl Settings {
    /// Settings from `CRSPLIT_CONFIG` (must exist) or `crsplit.yaml` (optional),
    /// with environment overrides applied last.
    pub fn load() -> Result<Self, ConfigError> {
        let settings = match std::env::var(CONFIG_ENV) {
            Ok(path) => Self::from_file(Path::new(&path))?,
            Err(_) if Path::new(DEFAULT_CONFIG_PATH).exists() => {
                Self::from_file(Path::new(DEFAULT_CONFIG_PATH))?
            }
            Err(_) => Self::default(),
        };
        settings.apply_env()
    }

    pub fn from_yaml_str(raw: &str) -> Result<Self, serde_yaml::Error> {
        if raw.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(raw)
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let raw = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let settings = Self::from_yaml_str(&raw).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        debug!(path = %path.display(), "loaded settings");
        Ok(settings)
    }

    pub fn apply_env(self) -> Result<Self, ConfigError> {
        self.apply_overrides(|key| std::env::var(key).ok())
    }

    /// Apply overrides from `lookup` (an environment-like key/value source).
    pub fn apply_overrides<F>(mut self, lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(bind) = lookup(BIND_ENV) {
            self.bind = bind;
        }
        if let Some(raw) = lookup(TOLERANCE_ENV) {
            self.tolerance = raw
                .trim()
                .parse::<f64>()
                .ok()
                .filter(|t| t.is_finite() && *t >= 0.0)
                .ok_or_else(|| ConfigError::InvalidValue {
                    key: TOLERANCE_ENV.to_string(),
                    value: raw.clone(),
                })?;
        }
        if let Some(raw) = lookup(TRANSPORT_ENV) {
            self.transport = raw.parse().map_err(|_| ConfigError::InvalidValue {
                key: TRANSPORT_ENV.to_string(),
                value: raw.clone(),
            })?;
        }
        Ok(self)
    }

    /// Catalog costs with the configured overrides applied.
    pub fn cost_table(&self) -> Result<CostTable, ConfigError> {
        let table = CostTable::default();
        match &self.cost_overrides_path {
            Some(path) => Ok(table.with_overrides(load_cost_overrides(path)?)),
            None => Ok(table),
        }
    }
}
