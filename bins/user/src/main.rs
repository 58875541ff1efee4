//! `winjobs-user` — packages a study, submits it to the driver, and polls
//! for completion (SPEC_FULL.md §2 supplement).

use std::path::PathBuf;
use std::time::Duration;

use clap::{Parser, Subcommand};
use winjobs_facade::{load_user_config, package_study, poll_until_complete, submit_study, DriverClient, ZipArchiveAdapter};

/// Command-line options for the user CLI.
#[derive(Debug, Parser)]
#[command(name = "winjobs-user", version, about = "Antares Winjobs user CLI")]
struct Cli {
    /// Path to an optional TOML config file. See `UserConfig` for the
    /// keys it may set; anything unset falls back to defaults, then to
    /// `WINJOBS_USER_*` environment overrides.
    #[arg(long)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Package a local study folder and submit it to the driver.
    Submit {
        /// Path to the study folder (not the zip).
        study_path: PathBuf,
        /// Scheduling priority, `[1, 100]`.
        #[arg(long, default_value_t = 50)]
        priority: u8,
        /// Submitter identity.
        #[arg(long)]
        submitter: String,
        /// Poll `/job_details/{id}` until the job reaches 100%.
        #[arg(long)]
        wait: bool,
    },
    /// Poll a job's status once, or until it completes with `--wait`.
    Status {
        /// The job id returned by a prior `submit`.
        job_id: String,
        /// Poll until the job reaches 100%.
        #[arg(long)]
        wait: bool,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let validated = load_user_config(cli.config.as_deref())?;
    let config = validated.get();
    let client = DriverClient::new(&config.driver_ip, config.driver_port);
    let archive = ZipArchiveAdapter;

    match cli.command {
        Commands::Submit {
            study_path,
            priority,
            submitter,
            wait,
        } => {
            let zip_path = package_study(&archive, &study_path, std::path::Path::new(&config.local_zip_folder_path))?;
            let job_id = submit_study(&client, &zip_path, priority, &submitter).await?;
            println!("submitted job {job_id}");

            if wait {
                let overview = poll_until_complete(&client, &job_id, Duration::from_secs(5)).await?;
                println!("job {job_id} complete: {}%", overview.percentage_complete);
            }
        },
        Commands::Status { job_id, wait } => {
            if wait {
                let overview = poll_until_complete(&client, &job_id, Duration::from_secs(5)).await?;
                println!("job {job_id} complete: {}%", overview.percentage_complete);
            } else {
                let overview = client.job_details(&job_id).await?;
                match overview {
                    Some(overview) => println!("job {job_id}: {}% ({})", overview.percentage_complete, overview.status),
                    None => println!("job {job_id} not found"),
                }
            }
        },
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_submit_subcommand() {
        let cli = Cli::parse_from(["winjobs-user", "submit", "./my_study", "--submitter", "alice", "--priority", "20"]);
        match cli.command {
            Commands::Submit { study_path, priority, submitter, wait } => {
                assert_eq!(study_path, PathBuf::from("./my_study"));
                assert_eq!(priority, 20);
                assert_eq!(submitter, "alice");
                assert!(!wait);
            },
            Commands::Status { .. } => panic!("expected Submit"),
        }
    }

    #[test]
    fn parses_status_subcommand_with_wait() {
        let cli = Cli::parse_from(["winjobs-user", "status", "some-job-id", "--wait"]);
        match cli.command {
            Commands::Status { job_id, wait } => {
                assert_eq!(job_id, "some-job-id");
                assert!(wait);
            },
            Commands::Submit { .. } => panic!("expected Status"),
        }
    }
}
