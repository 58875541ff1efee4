//! Zip-backed implementation of `ArchivePort` (spec.md §1, §4.6).

use std::fs::File;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};

use winjobs_ports::ArchivePort;
use winjobs_shared::{Error, ErrorClass, ErrorCode, Result};
use zip::read::ZipArchive;
use zip::write::{SimpleFileOptions, ZipWriter};

/// `zip` crate-backed archive adapter.
#[derive(Debug, Clone, Copy, Default)]
pub struct ZipArchiveAdapter;

impl ArchivePort for ZipArchiveAdapter {
    fn extract(&self, zip_path: &Path, destination_dir: &Path) -> Result<()> {
        let file = File::open(zip_path).map_err(Error::from)?;
        let mut archive = ZipArchive::new(file).map_err(|error| zip_error("extract_open", &error))?;

        for index in 0..archive.len() {
            let mut entry = archive
                .by_index(index)
                .map_err(|error| zip_error("extract_entry", &error))?;
            let Some(relative_path) = entry.enclosed_name().map(Path::to_path_buf) else {
                return Err(Error::expected(
                    ErrorCode::preparation("unsafe_zip_entry"),
                    format!("zip entry {} has an unsafe path", entry.name()),
                ));
            };
            let target = destination_dir.join(relative_path);

            if entry.is_dir() {
                std::fs::create_dir_all(&target).map_err(Error::from)?;
                continue;
            }
            if let Some(parent) = target.parent() {
                std::fs::create_dir_all(parent).map_err(Error::from)?;
            }
            let mut out_file = File::create(&target).map_err(Error::from)?;
            io::copy(&mut entry, &mut out_file).map_err(Error::from)?;
        }
        Ok(())
    }

    fn archive_excluding_output(&self, source_dir: &Path, zip_path: &Path) -> Result<()> {
        let file = File::create(zip_path).map_err(Error::from)?;
        let mut writer = ZipWriter::new(file);
        let options = SimpleFileOptions::default().compression_method(zip::CompressionMethod::Deflated);

        let mut entries: Vec<PathBuf> = Vec::new();
        collect_entries(source_dir, source_dir, zip_path, &mut entries)?;

        for absolute in entries {
            let relative = absolute
                .strip_prefix(source_dir)
                .map_err(|_| Error::invariant(ErrorCode::internal(), "archive entry escaped source_dir"))?;
            let relative_str = relative.to_string_lossy().replace('\\', "/");

            if absolute.is_dir() {
                writer
                    .add_directory(format!("{relative_str}/"), options)
                    .map_err(|error| zip_error("archive_add_dir", &error))?;
                continue;
            }
            writer
                .start_file(relative_str, options)
                .map_err(|error| zip_error("archive_start_file", &error))?;
            let mut contents = Vec::new();
            File::open(&absolute)
                .and_then(|mut f| f.read_to_end(&mut contents))
                .map_err(Error::from)?;
            writer.write_all(&contents).map_err(Error::from)?;
        }

        writer.finish().map_err(|error| zip_error("archive_finish", &error))?;
        Ok(())
    }
}

/// Recursively collect every path under `dir` (relative to `root`),
/// skipping the top-level `output/` subtree and the destination zip file
/// itself (when it happens to live inside `root`).
fn collect_entries(root: &Path, dir: &Path, zip_path: &Path, out: &mut Vec<PathBuf>) -> Result<()> {
    for entry in std::fs::read_dir(dir).map_err(Error::from)? {
        let entry = entry.map_err(Error::from)?;
        let path = entry.path();
        if path == root.join("output") || path == zip_path {
            continue;
        }
        if path.is_dir() {
            out.push(path.clone());
            collect_entries(root, &path, zip_path, out)?;
        } else {
            out.push(path);
        }
    }
    Ok(())
}

fn zip_error(code: &str, error: &zip::result::ZipError) -> Error {
    Error::unexpected(ErrorCode::new("archive", code), error.to_string(), ErrorClass::NonRetriable)
}
