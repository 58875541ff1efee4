//! Config loading helpers: defaults, then an optional TOML file, then env
//! overrides (highest precedence), then validation.

use std::path::Path;

use winjobs_shared::{Error, ErrorCode};

use crate::env::{self, EnvSource, ProcessEnv};
use crate::schema::{
    DriverConfig, UserConfig, ValidatedDriverConfig, ValidatedUserConfig, ValidatedWorkerConfig, WorkerConfig,
};

fn read_toml_file<T: serde::de::DeserializeOwned + Default>(path: Option<&Path>) -> Result<T, Error> {
    let Some(path) = path else {
        return Ok(T::default());
    };
    let text = std::fs::read_to_string(path).map_err(|error| {
        Error::expected(
            ErrorCode::new("config", "file_read"),
            format!("failed to read config file {}: {error}", path.display()),
        )
    })?;
    toml::from_str(&text).map_err(|error| {
        Error::expected(
            ErrorCode::new("config", "invalid_toml"),
            format!("invalid config TOML in {}: {error}", path.display()),
        )
    })
}

/// Load and validate the driver config: defaults, optional TOML file, then
/// process env overrides.
pub fn load_driver_config(config_path: Option<&Path>) -> Result<ValidatedDriverConfig, Error> {
    load_driver_config_with_env(config_path, &ProcessEnv)
}

/// Same as [`load_driver_config`] but with an injectable env source, for
/// tests that should never touch the real process environment.
pub fn load_driver_config_with_env(
    config_path: Option<&Path>,
    env_source: &impl EnvSource,
) -> Result<ValidatedDriverConfig, Error> {
    let mut config: DriverConfig = read_toml_file(config_path)?;
    env::apply_driver_env_overrides(&mut config, env_source);
    ValidatedDriverConfig::new(config).map_err(Error::from)
}

/// Load and validate the worker config: defaults, optional TOML file, then
/// process env overrides.
pub fn load_worker_config(config_path: Option<&Path>) -> Result<ValidatedWorkerConfig, Error> {
    load_worker_config_with_env(config_path, &ProcessEnv)
}

/// Same as [`load_worker_config`] but with an injectable env source.
pub fn load_worker_config_with_env(
    config_path: Option<&Path>,
    env_source: &impl EnvSource,
) -> Result<ValidatedWorkerConfig, Error> {
    let mut config: WorkerConfig = read_toml_file(config_path)?;
    env::apply_worker_env_overrides(&mut config, env_source);
    ValidatedWorkerConfig::new(config).map_err(Error::from)
}

/// Load and validate the user CLI config: defaults, optional TOML file,
/// then process env overrides.
pub fn load_user_config(config_path: Option<&Path>) -> Result<ValidatedUserConfig, Error> {
    load_user_config_with_env(config_path, &ProcessEnv)
}

/// Same as [`load_user_config`] but with an injectable env source.
pub fn load_user_config_with_env(
    config_path: Option<&Path>,
    env_source: &impl EnvSource,
) -> Result<ValidatedUserConfig, Error> {
    let mut config: UserConfig = read_toml_file(config_path)?;
    env::apply_user_env_overrides(&mut config, env_source);
    ValidatedUserConfig::new(config).map_err(Error::from)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::env::ENV_WORKER_DRIVER_PORT;
    use std::collections::BTreeMap;
    use std::io::Write;

    impl EnvSource for BTreeMap<&'static str, &'static str> {
        fn get(&self, key: &str) -> Option<String> {
            self.get(key).map(|value| (*value).to_owned())
        }
    }

    #[test]
    fn load_driver_config_without_file_uses_defaults() {
        let config = load_driver_config_with_env(None, &BTreeMap::new()).unwrap();
        assert_eq!(config.get().bind_addr, "0.0.0.0:8080");
    }

    #[test]
    fn load_worker_config_merges_file_then_env() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, r#"driver_ip = "10.0.0.5""#).unwrap();
        writeln!(file, r#"antares_file_path = "/opt/antares/solver""#).unwrap();

        let mut env = BTreeMap::new();
        env.insert(ENV_WORKER_DRIVER_PORT, "9999");

        let config = load_worker_config_with_env(Some(file.path()), &env).unwrap();
        assert_eq!(config.get().driver_ip, "10.0.0.5");
        assert_eq!(config.get().driver_port, 9999);
        assert_eq!(config.get().antares_file_path, "/opt/antares/solver");
    }

    #[test]
    fn load_worker_config_rejects_invalid_toml() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "this is not valid toml {{").unwrap();
        let result = load_worker_config_with_env(Some(file.path()), &BTreeMap::new());
        assert!(result.is_err());
    }
}
