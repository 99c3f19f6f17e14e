//! Config file loading and resolution into the contexts the library crates take.
//!
//! Precedence: command-line flag (or its env var), then the JSON config
//! file, then built-in defaults.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;
use thiserror::Error;
use vaultkeep_core::{DEFAULT_FABRIC_NAME, RecoveryPointPath, VaultContext};
use vaultkeep_plane::HttpPlaneConfig;

pub const DEFAULT_CONFIG_FILE: &str = "vaultkeep.json";
pub const DEFAULT_ENDPOINT: &str = "https://management.azure.com";
pub const ACCESS_TOKEN_ENV: &str = "VAULTKEEP_ACCESS_TOKEN";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("{0} must be set by flag, environment, or config file")]
    Missing(&'static str),
}

/// On-disk shape of `vaultkeep.json`. Every field is optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    pub endpoint: Option<String>,
    pub subscription_id: Option<String>,
    pub vault_name: Option<String>,
    pub resource_group_name: Option<String>,
    pub vault_location: Option<String>,
    pub fabric_name: Option<String>,
    pub timeout_secs: Option<u64>,
}

impl FileConfig {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Load `explicit` if given, else `vaultkeep.json` in the working
    /// directory when present, else an empty config.
    pub fn discover(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        match explicit {
            Some(path) => Self::load(path),
            None => {
                let default = Path::new(DEFAULT_CONFIG_FILE);
                if default.is_file() {
                    Self::load(default)
                } else {
                    Ok(Self::default())
                }
            }
        }
    }
}

/// Flag values that override the file.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub endpoint: Option<String>,
    pub subscription_id: Option<String>,
    pub timeout_secs: Option<u64>,
    pub access_token: Option<String>,
}

#[derive(Debug, Clone)]
pub struct Settings {
    pub plane: HttpPlaneConfig,
    file: FileConfig,
}

impl Settings {
    pub fn resolve(file: FileConfig, overrides: Overrides) -> Result<Self, ConfigError> {
        let subscription_id = overrides
            .subscription_id
            .or_else(|| file.subscription_id.clone())
            .ok_or(ConfigError::Missing("subscription_id"))?;
        let endpoint = overrides
            .endpoint
            .or_else(|| file.endpoint.clone())
            .unwrap_or_else(|| DEFAULT_ENDPOINT.to_string());
        let timeout = overrides
            .timeout_secs
            .or(file.timeout_secs)
            .map(Duration::from_secs);

        Ok(Self {
            plane: HttpPlaneConfig {
                endpoint,
                subscription_id,
                access_token: overrides.access_token,
                timeout,
            },
            file,
        })
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.plane.timeout
    }

    /// Vault defaults for a restore of the recovery point at `rp`. Vault name
    /// and resource group fall back to the recovery point's own path; the
    /// location comes from `location_flag`, then the file, with no further
    /// fallback.
    pub fn vault_context(
        &self,
        rp: &RecoveryPointPath,
        location_flag: Option<&str>,
    ) -> Result<VaultContext, ConfigError> {
        let vault_location = location_flag
            .map(str::to_string)
            .or_else(|| self.file.vault_location.clone())
            .ok_or(ConfigError::Missing("vault_location"))?;

        Ok(VaultContext {
            subscription_id: self.plane.subscription_id.clone(),
            vault_name: self
                .file
                .vault_name
                .clone()
                .unwrap_or_else(|| rp.vault_name.clone()),
            resource_group_name: self
                .file
                .resource_group_name
                .clone()
                .unwrap_or_else(|| rp.resource_group.clone()),
            vault_location,
            fabric_name: self
                .file
                .fabric_name
                .clone()
                .unwrap_or_else(|| DEFAULT_FABRIC_NAME.to_string()),
        })
    }
}
