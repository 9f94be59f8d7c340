use glob::{glob, Pattern};
use once_cell::sync::Lazy;
use regex::Regex;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::error::{IndexError, Result};

/// Exactly four digits directly in front of the extension.
static YEAR_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?:^|[^0-9])([0-9]{4})\.[^.]+$").expect("year regex should parse"));

/// Files in `dir` matching `pattern`, sorted lexically. With a year prefix in
/// every name this is chronological order.
#[tracing::instrument(level = "debug", skip(dir), fields(dir = %dir.as_ref().display()))]
pub fn discover_snapshots<P: AsRef<Path>>(dir: P, pattern: &str) -> Result<Vec<PathBuf>> {
    let dir = dir.as_ref();
    let full = format!("{}/{}", Pattern::escape(&dir.to_string_lossy()), pattern);

    let mut files: Vec<PathBuf> = glob(&full)?
        .filter_map(|entry| entry.ok())
        .filter(|p| p.is_file())
        .collect();
    files.sort();

    if files.is_empty() {
        return Err(IndexError::NoDataFound {
            dir: dir.to_path_buf(),
            pattern: pattern.to_string(),
        });
    }
    debug!(count = files.len(), "discovered snapshot files");
    Ok(files)
}

/// Year encoded in a snapshot's file name, e.g. `flats_2019.parquet` → 2019.
pub fn year_from_filename<P: AsRef<Path>>(path: P) -> Result<i32> {
    let name = file_name(path.as_ref());
    let year = YEAR_RE
        .captures(&name)
        .and_then(|c| c.get(1))
        .and_then(|m| m.as_str().parse::<i32>().ok());
    year.ok_or(IndexError::UnparseableFilename { file: name })
}

pub(crate) fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| path.display().to_string())
}
