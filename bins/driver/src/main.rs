//! `winjobs-driver` — the driver HTTP service (spec.md §4.1).

use std::path::PathBuf;

use clap::Parser;
use winjobs_facade::{build_driver_state, build_router, load_driver_config};

/// Command-line options for the driver binary.
#[derive(Debug, Parser)]
#[command(name = "winjobs-driver", version, about = "Antares Winjobs driver service")]
struct Args {
    /// Path to an optional TOML config file. See `DriverConfig` for the
    /// keys it may set; anything unset falls back to defaults, then to
    /// `WINJOBS_DRIVER_*` environment overrides.
    #[arg(long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let validated = load_driver_config(args.config.as_deref())?;
    let config = validated.get();

    let state = build_driver_state(config)?;
    let bind_addr = config.bind_addr.clone();
    let router = build_router(state);

    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    println!("winjobs-driver listening on {bind_addr}");
    axum::serve(listener, router).await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn args_parse_with_no_flags() {
        let args = Args::parse_from(["winjobs-driver"]);
        assert!(args.config.is_none());
    }

    #[test]
    fn args_parse_config_flag() {
        let args = Args::parse_from(["winjobs-driver", "--config", "driver.toml"]);
        assert_eq!(args.config, Some(PathBuf::from("driver.toml")));
    }
}
