//! Removal of installed themes

use std::fs;
use std::io::{BufRead, Write};
use std::path::{Path, PathBuf};

use tracing::{info, warn};

use crate::error::{Result, ThemeError};

/// `~/.themes`, where themes are installed by default
pub fn default_themes_dir() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(".themes"))
}

/// Locations scanned on removal: the install root and `~/.local/share/themes`
pub fn removal_roots(themes_dir: &Path) -> Vec<PathBuf> {
    let mut roots = vec![themes_dir.to_path_buf()];
    if let Some(shared) = dirs::data_dir().map(|data| data.join("themes")) {
        if shared != themes_dir {
            roots.push(shared);
        }
    }
    roots
}

/// What a removal run did
#[derive(Debug, Default)]
pub struct RemovalReport {
    pub confirmed: bool,
    pub removed: Vec<PathBuf>,
    pub missing_roots: Vec<PathBuf>,
    pub failed: Vec<(PathBuf, ThemeError)>,
}

/// Delete every directory starting with `prefix` in `roots`
///
/// Asks once on `out` and reads the answer from `input`; only `y` (any
/// case) proceeds. Missing or unreadable roots are reported, not treated
/// as errors.
pub fn remove_installed(
    roots: &[PathBuf],
    prefix: &str,
    input: &mut dyn BufRead,
    out: &mut dyn Write,
) -> Result<RemovalReport> {
    let mut report = RemovalReport::default();

    let listed = roots
        .iter()
        .map(|root| root.display().to_string())
        .collect::<Vec<_>>()
        .join(" and in ");

    writeln!(out, "You do not need to delete files if you want to update theme.\n")
        .map_err(ThemeError::Console)?;
    write!(out, "Do you want to delete all \"{prefix}\" folders in {listed}? (y/N) ")
        .map_err(ThemeError::Console)?;
    out.flush().map_err(ThemeError::Console)?;

    let mut answer = String::new();
    input.read_line(&mut answer).map_err(ThemeError::Console)?;
    if !answer.trim().eq_ignore_ascii_case("y") {
        return Ok(report);
    }
    report.confirmed = true;

    for root in roots {
        if !root.exists() {
            writeln!(out, "The path {} does not exist.", root.display()).map_err(ThemeError::Console)?;
            report.missing_roots.push(root.clone());
            continue;
        }

        let dirs = match matching_dirs(root, prefix) {
            Ok(dirs) => dirs,
            Err(err) => {
                writeln!(out, "Error reading {}: {err}", root.display()).map_err(ThemeError::Console)?;
                warn!(%err, "theme root could not be listed");
                report.failed.push((root.clone(), err));
                continue;
            }
        };

        let mut found = false;
        for dir in dirs {
            found = true;
            write!(out, "Deleting folder {}... ", dir.display()).map_err(ThemeError::Console)?;

            match fs::remove_dir_all(&dir) {
                Ok(()) => {
                    writeln!(out, "Done.").map_err(ThemeError::Console)?;
                    info!(path = %dir.display(), "removed theme");
                    report.removed.push(dir);
                }
                Err(e) => {
                    let err = ThemeError::io("Failed to delete", &dir, e);
                    writeln!(out, "\nError deleting folder {}: {err}", dir.display())
                        .map_err(ThemeError::Console)?;
                    warn!(%err, "theme removal failed");
                    report.failed.push((dir, err));
                }
            }
        }

        if !found {
            writeln!(out, "No folders starting with \"{prefix}\" found in {}.", root.display())
                .map_err(ThemeError::Console)?;
        }
    }

    Ok(report)
}

fn matching_dirs(root: &Path, prefix: &str) -> Result<Vec<PathBuf>> {
    let entries = fs::read_dir(root).map_err(|e| ThemeError::io("Failed to list", root, e))?;

    let mut matches = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| ThemeError::io("Failed to list", root, e))?;
        let path = entry.path();
        if path.is_dir() && entry.file_name().to_string_lossy().starts_with(prefix) {
            matches.push(path);
        }
    }

    matches.sort();
    Ok(matches)
}
