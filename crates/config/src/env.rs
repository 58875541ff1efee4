//! Environment variable names and overrides, highest-precedence layer of
//! the config load order (defaults → optional TOML file → env).

use crate::schema::{DriverConfig, UserConfig, WorkerConfig};

/// Env var: driver HTTP bind address.
pub const ENV_DRIVER_BIND_ADDR: &str = "WINJOBS_DRIVER_BIND_ADDR";
/// Env var: persisted queue folder path.
pub const ENV_DRIVER_PERSISTED_QUEUE_FOLDER_PATH: &str = "WINJOBS_DRIVER_PERSISTED_QUEUE_FOLDER_PATH";
/// Env var: new-jobs zip upload folder.
pub const ENV_DRIVER_NEW_JOBS_ZIP_FOLDER_PATH: &str = "WINJOBS_DRIVER_NEW_JOBS_ZIP_FOLDER_PATH";
/// Env var: study extraction root.
pub const ENV_DRIVER_NEW_JOBS_STUDY_FOLDER_PATH: &str = "WINJOBS_DRIVER_NEW_JOBS_STUDY_FOLDER_PATH";
/// Env var: optional `7z` executable path (driver).
pub const ENV_DRIVER_SEVEN_ZIP_FILE_PATH: &str = "WINJOBS_DRIVER_7Z_FILE_PATH";

/// Env var: driver IP, as seen by a worker.
pub const ENV_WORKER_DRIVER_IP: &str = "WINJOBS_WORKER_DRIVER_IP";
/// Env var: driver port, as seen by a worker.
pub const ENV_WORKER_DRIVER_PORT: &str = "WINJOBS_WORKER_DRIVER_PORT";
/// Env var: local zip cache folder.
pub const ENV_WORKER_LOCAL_ZIP_FOLDER_PATH: &str = "WINJOBS_WORKER_LOCAL_ZIP_FOLDER_PATH";
/// Env var: local study extraction folder.
pub const ENV_WORKER_LOCAL_STUDY_FOLDER_PATH: &str = "WINJOBS_WORKER_LOCAL_STUDY_FOLDER_PATH";
/// Env var: max cores to use (`0` = all physical cores).
pub const ENV_WORKER_MAX_CORES_TO_USE: &str = "WINJOBS_WORKER_MAX_CORES_TO_USE";
/// Env var: path to the Antares solver executable.
pub const ENV_WORKER_ANTARES_FILE_PATH: &str = "WINJOBS_WORKER_ANTARES_FILE_PATH";
/// Env var: target polling interval in seconds.
pub const ENV_WORKER_WAIT_TIME_BETWEEN_REQUESTS: &str = "WINJOBS_WORKER_WAIT_TIME_BETWEEN_REQUESTS";
/// Env var: optional `7z` executable path (worker).
pub const ENV_WORKER_SEVEN_ZIP_FILE_PATH: &str = "WINJOBS_WORKER_7Z_FILE_PATH";

/// Env var: driver IP, as seen by the user CLI.
pub const ENV_USER_DRIVER_IP: &str = "WINJOBS_USER_DRIVER_IP";
/// Env var: driver port, as seen by the user CLI.
pub const ENV_USER_DRIVER_PORT: &str = "WINJOBS_USER_DRIVER_PORT";
/// Env var: local zip cache folder (user CLI).
pub const ENV_USER_LOCAL_ZIP_FOLDER_PATH: &str = "WINJOBS_USER_LOCAL_ZIP_FOLDER_PATH";
/// Env var: optional user-local `7z` executable path.
pub const ENV_USER_7Z_PATH: &str = "WINJOBS_USER_7Z_PATH";

/// Reads environment variables via an injectable lookup function, so tests
/// don't have to mutate the real process environment.
pub trait EnvSource {
    /// Look up a variable by name.
    fn get(&self, key: &str) -> Option<String>;
}

/// `EnvSource` backed by `std::env::var`.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessEnv;

impl EnvSource for ProcessEnv {
    fn get(&self, key: &str) -> Option<String> {
        std::env::var(key).ok()
    }
}

/// Apply env-var overrides to a `DriverConfig` in place.
pub fn apply_driver_env_overrides(config: &mut DriverConfig, env: &impl EnvSource) {
    if let Some(value) = env.get(ENV_DRIVER_BIND_ADDR) {
        config.bind_addr = value;
    }
    if let Some(value) = env.get(ENV_DRIVER_PERSISTED_QUEUE_FOLDER_PATH) {
        config.persisted_queue_folder_path = value;
    }
    if let Some(value) = env.get(ENV_DRIVER_NEW_JOBS_ZIP_FOLDER_PATH) {
        config.new_jobs_zip_folder_path = value;
    }
    if let Some(value) = env.get(ENV_DRIVER_NEW_JOBS_STUDY_FOLDER_PATH) {
        config.new_jobs_study_folder_path = value;
    }
    if let Some(value) = env.get(ENV_DRIVER_SEVEN_ZIP_FILE_PATH) {
        config.seven_zip_file_path = Some(value);
    }
}

/// Apply env-var overrides to a `WorkerConfig` in place.
pub fn apply_worker_env_overrides(config: &mut WorkerConfig, env: &impl EnvSource) {
    if let Some(value) = env.get(ENV_WORKER_DRIVER_IP) {
        config.driver_ip = value;
    }
    if let Some(value) = env.get(ENV_WORKER_DRIVER_PORT).and_then(|raw| raw.parse().ok()) {
        config.driver_port = value;
    }
    if let Some(value) = env.get(ENV_WORKER_LOCAL_ZIP_FOLDER_PATH) {
        config.local_zip_folder_path = value;
    }
    if let Some(value) = env.get(ENV_WORKER_LOCAL_STUDY_FOLDER_PATH) {
        config.local_study_folder_path = value;
    }
    if let Some(value) = env.get(ENV_WORKER_MAX_CORES_TO_USE).and_then(|raw| raw.parse().ok()) {
        config.max_cores_to_use = value;
    }
    if let Some(value) = env.get(ENV_WORKER_ANTARES_FILE_PATH) {
        config.antares_file_path = value;
    }
    if let Some(value) = env
        .get(ENV_WORKER_WAIT_TIME_BETWEEN_REQUESTS)
        .and_then(|raw| raw.parse().ok())
    {
        config.wait_time_between_requests = value;
    }
    if let Some(value) = env.get(ENV_WORKER_SEVEN_ZIP_FILE_PATH) {
        config.seven_zip_file_path = Some(value);
    }
}

/// Apply env-var overrides to a `UserConfig` in place.
pub fn apply_user_env_overrides(config: &mut UserConfig, env: &impl EnvSource) {
    if let Some(value) = env.get(ENV_USER_DRIVER_IP) {
        config.driver_ip = value;
    }
    if let Some(value) = env.get(ENV_USER_DRIVER_PORT).and_then(|raw| raw.parse().ok()) {
        config.driver_port = value;
    }
    if let Some(value) = env.get(ENV_USER_LOCAL_ZIP_FOLDER_PATH) {
        config.local_zip_folder_path = value;
    }
    if let Some(value) = env.get(ENV_USER_7Z_PATH) {
        config.user_7z_path = Some(value);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    impl EnvSource for BTreeMap<&'static str, &'static str> {
        fn get(&self, key: &str) -> Option<String> {
            self.get(key).map(|value| (*value).to_owned())
        }
    }

    #[test]
    fn worker_env_overrides_parse_numeric_fields() {
        let mut env = BTreeMap::new();
        env.insert(ENV_WORKER_DRIVER_PORT, "9090");
        env.insert(ENV_WORKER_MAX_CORES_TO_USE, "4");
        env.insert(ENV_WORKER_WAIT_TIME_BETWEEN_REQUESTS, "30");

        let mut config = WorkerConfig::default();
        apply_worker_env_overrides(&mut config, &env);

        assert_eq!(config.driver_port, 9090);
        assert_eq!(config.max_cores_to_use, 4);
        assert_eq!(config.wait_time_between_requests, 30);
    }

    #[test]
    fn invalid_numeric_override_is_ignored() {
        let mut env = BTreeMap::new();
        env.insert(ENV_WORKER_DRIVER_PORT, "not-a-port");

        let mut config = WorkerConfig::default();
        let original_port = config.driver_port;
        apply_worker_env_overrides(&mut config, &env);

        assert_eq!(config.driver_port, original_port);
    }
}
