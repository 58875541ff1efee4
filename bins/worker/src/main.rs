//! `winjobs-worker` — the worker polling loop (spec.md §4.7).

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use winjobs_facade::{
    load_worker_config, run_worker_loop, DriverClient, FsAntaresStudy, WorkerLoopConfig, ZipArchiveAdapter,
};

/// Command-line options for the worker binary.
#[derive(Debug, Parser)]
#[command(name = "winjobs-worker", version, about = "Antares Winjobs worker process")]
struct Args {
    /// Path to an optional TOML config file. See `WorkerConfig` for the
    /// keys it may set; anything unset falls back to defaults, then to
    /// `WINJOBS_WORKER_*` environment overrides.
    #[arg(long)]
    config: Option<PathBuf>,
    /// This worker's identity reported to the driver. Defaults to the
    /// `HOSTNAME` environment variable, falling back to `"worker"`.
    #[arg(long)]
    worker_name: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let validated = load_worker_config(args.config.as_deref())?;
    let config = validated.get();

    let worker_name = args
        .worker_name
        .or_else(|| std::env::var("HOSTNAME").ok())
        .unwrap_or_else(|| "worker".to_owned());

    let loop_config = Arc::new(WorkerLoopConfig {
        worker_name,
        max_cores_to_use: config.max_cores_to_use,
        local_zip_folder_path: PathBuf::from(&config.local_zip_folder_path),
        local_study_folder_path: PathBuf::from(&config.local_study_folder_path),
        antares_file_path: PathBuf::from(&config.antares_file_path),
        wait_time_between_requests: Duration::from_secs(config.wait_time_between_requests),
    });

    std::fs::create_dir_all(&loop_config.local_zip_folder_path)?;
    std::fs::create_dir_all(&loop_config.local_study_folder_path)?;

    let client = Arc::new(DriverClient::new(&config.driver_ip, config.driver_port));
    let archive = Arc::new(ZipArchiveAdapter);
    let study_handle = Arc::new(FsAntaresStudy);

    println!("winjobs-worker '{}' polling {}:{}", loop_config.worker_name, config.driver_ip, config.driver_port);
    run_worker_loop(loop_config, client, archive, study_handle).await;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn args_parse_with_worker_name_override() {
        let args = Args::parse_from(["winjobs-worker", "--worker-name", "w7"]);
        assert_eq!(args.worker_name, Some("w7".to_owned()));
    }

    #[test]
    fn args_parse_with_no_flags() {
        let args = Args::parse_from(["winjobs-worker"]);
        assert!(args.worker_name.is_none());
        assert!(args.config.is_none());
    }
}
