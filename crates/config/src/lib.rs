//! # winjobs-config
//!
//! Typed configuration loading for the driver, worker, and user binaries
//! (spec.md §6, "Configuration (keys consumed)").
//!
//! Precedence, highest wins: environment variables, then an optional TOML
//! file, then built-in defaults. Every raw config is validated into a
//! `Validated*Config` wrapper before a binary may use it.

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]

pub mod env;
pub mod load;
pub mod schema;

pub use env::{EnvSource, ProcessEnv};
pub use load::{
    load_driver_config, load_driver_config_with_env, load_user_config, load_user_config_with_env,
    load_worker_config, load_worker_config_with_env,
};
pub use schema::{
    ConfigError, DriverConfig, UserConfig, ValidatedDriverConfig, ValidatedUserConfig, ValidatedWorkerConfig,
    WorkerConfig,
};

/// Returns the config crate version.
#[must_use]
pub const fn config_crate_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_crate_compiles() {
        assert!(!config_crate_version().is_empty());
    }
}
