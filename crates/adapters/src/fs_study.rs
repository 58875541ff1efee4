//! Filesystem-backed implementation of `StudyHandlePort` (spec.md §4.5).

use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};
use std::process::Command;

use chrono::Utc;
use winjobs_domain::YearIndex;
use winjobs_ports::StudyHandlePort;
use winjobs_shared::{Error, ErrorCode, Result};

use crate::ini::IniDocument;

/// Marker the solver writes to `simulation.log` on a successful run. The
/// exact wording is the solver's own contract; this is the boundary's
/// implementation-chosen constant (spec.md §4.5 leaves it unspecified).
const SUCCESS_MARKER: &str = "Simulation completed successfully";

/// Filesystem + external-process implementation of the study handle
/// contract.
#[derive(Debug, Clone, Copy, Default)]
pub struct FsAntaresStudy;

impl StudyHandlePort for FsAntaresStudy {
    fn is_valid_study(&self, study_path: &Path) -> bool {
        study_path.is_dir()
            && study_path.join("input").is_dir()
            && study_path.join("output").is_dir()
            && study_path.join("study.antares").is_file()
    }

    fn get_active_playlist_years(&self, study_path: &Path) -> Result<Vec<YearIndex>> {
        let ini_path = study_path.join("settings").join("generaldata.ini");
        let text = std::fs::read_to_string(&ini_path).map_err(|error| {
            Error::expected(
                ErrorCode::preparation("generaldata_missing"),
                format!("failed to read {}: {error}", ini_path.display()),
            )
        })?;
        let doc = IniDocument::parse(&text);

        let general = doc.section("general").ok_or_else(|| {
            Error::expected(
                ErrorCode::preparation("missing_general_section"),
                format!("{} has no [general] section", ini_path.display()),
            )
        })?;
        let nbyears: u32 = general
            .get_first("nbyears")
            .ok_or_else(|| {
                Error::expected(
                    ErrorCode::preparation("missing_nbyears"),
                    "[general].nbyears is missing",
                )
            })?
            .parse()
            .map_err(|_| Error::expected(ErrorCode::preparation("invalid_nbyears"), "[general].nbyears is not an integer"))?;
        let default_playlist: Vec<YearIndex> = (0..nbyears).collect();

        let Some(playlist) = doc.section("playlist") else {
            return Ok(default_playlist);
        };

        if playlist.has_key("playlist_reset") {
            let years = parse_year_list(playlist.get_all("playlist_year +"))?;
            return Ok(years);
        }

        let removed = parse_year_list(playlist.get_all("playlist_year -"))?;
        Ok(default_playlist.into_iter().filter(|year| !removed.contains(year)).collect())
    }

    fn set_playlist(&self, study_path: &Path, years: &[YearIndex]) -> Result<()> {
        let ini_path = study_path.join("settings").join("generaldata.ini");
        let text = std::fs::read_to_string(&ini_path).map_err(Error::from)?;
        let mut doc = IniDocument::parse(&text);

        let mut entries = vec![("playlist_reset".to_owned(), "false".to_owned())];
        entries.extend(years.iter().map(|year| ("playlist_year +".to_owned(), year.to_string())));
        doc.replace_section("playlist", entries);

        std::fs::write(&ini_path, doc.render()).map_err(Error::from)
    }

    fn create_output_collection_folder(&self, study_path: &Path) -> Result<PathBuf> {
        let timestamp = Utc::now().format("%Y%m%d_%H%M%S").to_string();
        let output_dir = study_path.join("output").join(timestamp);
        std::fs::create_dir_all(&output_dir).map_err(Error::from)?;
        Ok(output_dir)
    }

    fn run_antares(&self, exe_path: &Path, study_path: &Path, cores: u32) -> Result<()> {
        let status = Command::new(exe_path)
            .arg(study_path)
            .arg("--force-parallel")
            .arg(cores.to_string())
            .status()
            .map_err(|error| {
                Error::unexpected(
                    ErrorCode::new("worker", "solver_spawn"),
                    format!("failed to spawn {}: {error}", exe_path.display()),
                    winjobs_shared::ErrorClass::NonRetriable,
                )
            })?;

        if status.success() {
            Ok(())
        } else {
            Err(Error::expected(
                ErrorCode::new("worker", "solver_exit"),
                format!("solver exited with {status}"),
            ))
        }
    }

    fn verify_if_last_run_was_successful(&self, study_path: &Path) -> Result<bool> {
        let output_root = study_path.join("output");
        let mut subfolders: Vec<PathBuf> = std::fs::read_dir(&output_root)
            .map_err(Error::from)?
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.path().is_dir())
            .map(|entry| entry.path())
            .collect();
        subfolders.sort();

        let Some(last) = subfolders.pop() else {
            return Ok(false);
        };

        let log_path = last.join("simulation.log");
        let Ok(file) = std::fs::File::open(&log_path) else {
            return Ok(false);
        };
        let lines: Vec<String> = BufReader::new(file).lines().map_while(std::result::Result::ok).collect();
        let tail = lines.iter().rev().take(5);
        Ok(tail.clone().any(|line| line.contains(SUCCESS_MARKER)))
    }
}

fn parse_year_list<'a>(raw: impl IntoIterator<Item = &'a str>) -> Result<Vec<YearIndex>> {
    raw.into_iter()
        .map(|value| {
            value
                .parse::<YearIndex>()
                .map_err(|_| Error::expected(ErrorCode::preparation("invalid_playlist_year"), format!("'{value}' is not a valid year index")))
        })
        .collect()
}
