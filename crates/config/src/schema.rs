//! Configuration schemas for the driver, worker, and user binaries.
//!
//! Each raw `*Config` struct derives `Deserialize` with field defaults so a
//! partial TOML file (or none at all) is always loadable; `load.rs` then
//! validates the merged result into the corresponding `Validated*Config`.

use serde::{Deserialize, Serialize};
use winjobs_shared::{Error, ErrorCode};

fn default_bind_addr() -> String {
    "0.0.0.0:8080".to_owned()
}

fn default_wait_time_between_requests() -> u64 {
    10
}

fn default_max_cores_to_use() -> u32 {
    0
}

/// Configuration consumed by the driver binary (spec.md §6).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DriverConfig {
    /// Address the axum HTTP server binds to. Not named in spec.md's
    /// configuration table (an implementation detail of the HTTP surface),
    /// but every driver needs one to actually listen.
    pub bind_addr: String,
    /// Folder the `queue.json`/`finished.json` mirror is written to.
    pub persisted_queue_folder_path: String,
    /// Folder uploaded zips are copied into on `/submit_job`.
    pub new_jobs_zip_folder_path: String,
    /// Extraction root studies are unpacked into.
    pub new_jobs_study_folder_path: String,
    /// Optional path to a `7z` executable, used by the archive adapter in
    /// preference to the built-in `zip` crate when set.
    pub seven_zip_file_path: Option<String>,
}

impl Default for DriverConfig {
    fn default() -> Self {
        Self {
            bind_addr: default_bind_addr(),
            persisted_queue_folder_path: "./data/driver/queue".to_owned(),
            new_jobs_zip_folder_path: "./data/driver/new_jobs_zip".to_owned(),
            new_jobs_study_folder_path: "./data/driver/studies".to_owned(),
            seven_zip_file_path: None,
        }
    }
}

/// Configuration consumed by the worker binary (spec.md §6).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorkerConfig {
    /// Driver host.
    pub driver_ip: String,
    /// Driver port.
    pub driver_port: u16,
    /// Local cache of downloaded study archives.
    pub local_zip_folder_path: String,
    /// Local extraction root for studies this worker runs.
    pub local_study_folder_path: String,
    /// Upper bound on cores used per run; `0` means "use all physical
    /// cores" (spec.md §4.7 step 2).
    #[serde(default = "default_max_cores_to_use")]
    pub max_cores_to_use: u32,
    /// Path to the Antares solver executable.
    pub antares_file_path: String,
    /// Target pacing interval between `/get_task` polls, in seconds.
    #[serde(default = "default_wait_time_between_requests")]
    pub wait_time_between_requests: u64,
    /// Optional path to a `7z` executable (see `DriverConfig`).
    pub seven_zip_file_path: Option<String>,
}

impl Default for WorkerConfig {
    fn default() -> Self {
        Self {
            driver_ip: "127.0.0.1".to_owned(),
            driver_port: 8080,
            local_zip_folder_path: "./data/worker/zip_cache".to_owned(),
            local_study_folder_path: "./data/worker/studies".to_owned(),
            max_cores_to_use: default_max_cores_to_use(),
            antares_file_path: "./antares-solver".to_owned(),
            wait_time_between_requests: default_wait_time_between_requests(),
            seven_zip_file_path: None,
        }
    }
}

/// Configuration consumed by the user CLI (spec.md §6).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct UserConfig {
    /// Driver host.
    pub driver_ip: String,
    /// Driver port.
    pub driver_port: u16,
    /// Local folder a study is packaged from / status polls write to.
    pub local_zip_folder_path: String,
    /// Optional path to a user-local `7z` executable.
    pub user_7z_path: Option<String>,
}

impl Default for UserConfig {
    fn default() -> Self {
        Self {
            driver_ip: "127.0.0.1".to_owned(),
            driver_port: 8080,
            local_zip_folder_path: "./data/user/zip_cache".to_owned(),
            user_7z_path: None,
        }
    }
}

/// Validation failures shared by every `Validated*Config` constructor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// A required path field was empty.
    EmptyPath {
        /// The offending field name.
        field: &'static str,
    },
    /// A numeric field was outside its allowed range.
    OutOfRange {
        /// The offending field name.
        field: &'static str,
        /// Human-readable reason.
        reason: &'static str,
    },
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyPath { field } => write!(formatter, "{field} must not be empty"),
            Self::OutOfRange { field, reason } => write!(formatter, "{field} {reason}"),
        }
    }
}

impl std::error::Error for ConfigError {}

impl From<ConfigError> for Error {
    fn from(error: ConfigError) -> Self {
        Self::expected(ErrorCode::validation("config"), error.to_string())
    }
}

fn require_non_empty(field: &'static str, value: &str) -> Result<(), ConfigError> {
    if value.trim().is_empty() {
        return Err(ConfigError::EmptyPath { field });
    }
    Ok(())
}

/// A `DriverConfig` that has passed validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedDriverConfig(DriverConfig);

impl ValidatedDriverConfig {
    /// Validate a raw `DriverConfig`.
    pub fn new(config: DriverConfig) -> Result<Self, ConfigError> {
        require_non_empty("bind_addr", &config.bind_addr)?;
        require_non_empty("persisted_queue_folder_path", &config.persisted_queue_folder_path)?;
        require_non_empty("new_jobs_zip_folder_path", &config.new_jobs_zip_folder_path)?;
        require_non_empty("new_jobs_study_folder_path", &config.new_jobs_study_folder_path)?;
        Ok(Self(config))
    }

    /// Access the validated config.
    #[must_use]
    pub const fn get(&self) -> &DriverConfig {
        &self.0
    }
}

/// A `WorkerConfig` that has passed validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedWorkerConfig(WorkerConfig);

impl ValidatedWorkerConfig {
    /// Validate a raw `WorkerConfig`.
    pub fn new(config: WorkerConfig) -> Result<Self, ConfigError> {
        require_non_empty("driver_ip", &config.driver_ip)?;
        require_non_empty("local_zip_folder_path", &config.local_zip_folder_path)?;
        require_non_empty("local_study_folder_path", &config.local_study_folder_path)?;
        require_non_empty("antares_file_path", &config.antares_file_path)?;
        if config.wait_time_between_requests == 0 {
            return Err(ConfigError::OutOfRange {
                field: "wait_time_between_requests",
                reason: "must be greater than zero",
            });
        }
        Ok(Self(config))
    }

    /// Access the validated config.
    #[must_use]
    pub const fn get(&self) -> &WorkerConfig {
        &self.0
    }
}

/// A `UserConfig` that has passed validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedUserConfig(UserConfig);

impl ValidatedUserConfig {
    /// Validate a raw `UserConfig`.
    pub fn new(config: UserConfig) -> Result<Self, ConfigError> {
        require_non_empty("driver_ip", &config.driver_ip)?;
        require_non_empty("local_zip_folder_path", &config.local_zip_folder_path)?;
        Ok(Self(config))
    }

    /// Access the validated config.
    #[must_use]
    pub const fn get(&self) -> &UserConfig {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn driver_config_defaults_are_valid() {
        assert!(ValidatedDriverConfig::new(DriverConfig::default()).is_ok());
    }

    #[test]
    fn worker_config_rejects_zero_wait_time() {
        let config = WorkerConfig {
            wait_time_between_requests: 0,
            ..WorkerConfig::default()
        };
        assert!(ValidatedWorkerConfig::new(config).is_err());
    }

    #[test]
    fn user_config_rejects_empty_driver_ip() {
        let config = UserConfig {
            driver_ip: String::new(),
            ..UserConfig::default()
        };
        assert!(ValidatedUserConfig::new(config).is_err());
    }
}
