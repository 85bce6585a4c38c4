//! Configuration resolution for prl-tray.
//!
//! The only external override is the hypervisor tool location, read from
//! the environment. Preferences live in the platform config directory.

use crate::{
    AppError, AppResult,
    config::{HypervisorConfig, PREFERENCES_FILE_NAME},
};

use std::{ffi::OsString, fs, panic::Location, path::PathBuf};

use directories::ProjectDirs;
use error_location::ErrorLocation;
use prl_tray_core::{DEFAULT_PRLCTL_PATH, PRLCTL_PATH_ENV};
use tracing::{debug, info, instrument};

/// Resolved runtime configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Hypervisor tool settings.
    pub hypervisor: HypervisorConfig,
    /// File backing the user preference store.
    pub preferences_path: PathBuf,
}

impl Config {
    /// Resolve configuration from the environment and platform directories.
    #[track_caller]
    #[instrument]
    pub fn load() -> AppResult<Self> {
        let preferences_path = Self::preferences_path()?;
        let config = Self::from_env_value(std::env::var_os(PRLCTL_PATH_ENV), preferences_path)?;

        info!(
            command_path = ?config.hypervisor.command_path,
            preferences_path = ?config.preferences_path,
            "Configuration resolved"
        );

        Ok(config)
    }

    /// Build configuration from the raw `PRLCTL_PATH` value.
    ///
    /// Unset falls back to the default tool path; set but empty is rejected.
    #[track_caller]
    pub fn from_env_value(
        command_path: Option<OsString>,
        preferences_path: PathBuf,
    ) -> AppResult<Self> {
        let command_path = match command_path {
            Some(value) if value.is_empty() => {
                return Err(AppError::ConfigError {
                    reason: format!(
                        "{PRLCTL_PATH_ENV} is set but empty. Provide the prlctl path or unset it."
                    ),
                    location: ErrorLocation::from(Location::caller()),
                });
            }
            Some(value) => PathBuf::from(value),
            None => PathBuf::from(DEFAULT_PRLCTL_PATH),
        };

        Ok(Self {
            hypervisor: HypervisorConfig { command_path },
            preferences_path,
        })
    }

    #[track_caller]
    fn preferences_path() -> AppResult<PathBuf> {
        let proj_dirs = ProjectDirs::from("com", "prl-tray", "Prl-Tray").ok_or_else(|| {
            AppError::ConfigError {
                reason: "Failed to get config directory".to_string(),
                location: ErrorLocation::from(Location::caller()),
            }
        })?;

        let config_dir = proj_dirs.config_dir();

        if !config_dir.exists() {
            fs::create_dir_all(config_dir)?;
            debug!(config_dir = ?config_dir, "Created config directory");
        }

        Ok(config_dir.join(PREFERENCES_FILE_NAME))
    }
}
