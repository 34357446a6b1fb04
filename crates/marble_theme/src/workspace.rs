//! Scratch workspace and tree copying
//!
//! Every run stages the raw theme in a temporary directory. The directory
//! is owned by [`with_workspace`], which closes it after the body returns,
//! whether the body succeeded or not.

use std::fs;
use std::path::{Path, PathBuf};

use tempfile::TempDir;
use tracing::debug;
use walkdir::WalkDir;

use crate::error::{Result, ThemeError};

/// A temporary directory holding prepared templates
#[derive(Debug)]
pub struct Workspace {
    dir: TempDir,
}

impl Workspace {
    /// Create a workspace under `parent`, or the system temp dir
    pub fn create(parent: Option<&Path>) -> Result<Self> {
        let base = parent.map(Path::to_path_buf).unwrap_or_else(std::env::temp_dir);
        fs::create_dir_all(&base).map_err(|e| ThemeError::io("Failed to create", &base, e))?;

        let dir = tempfile::Builder::new()
            .prefix("marble-")
            .tempdir_in(&base)
            .map_err(|e| ThemeError::io("Failed to create workspace in", &base, e))?;

        debug!(path = %dir.path().display(), "created workspace");
        Ok(Self { dir })
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Path of a named subdirectory (not created)
    pub fn join(&self, name: impl AsRef<Path>) -> PathBuf {
        self.dir.path().join(name)
    }

    /// Remove the workspace, ignoring failures
    pub fn close(self) {
        let path = self.dir.path().to_path_buf();
        if let Err(err) = self.dir.close() {
            debug!(path = %path.display(), %err, "failed to remove workspace");
        }
    }
}

/// Run `body` with a fresh workspace and always remove it afterwards
pub fn with_workspace<T, E>(
    parent: Option<&Path>,
    body: impl FnOnce(&Workspace) -> std::result::Result<T, E>,
) -> std::result::Result<T, E>
where
    E: From<ThemeError>,
{
    let workspace = Workspace::create(parent)?;
    let result = body(&workspace);
    workspace.close();
    result
}

/// Recursively copy `source` into `destination`, overwriting files
///
/// `destination` is created if missing; existing files not present in
/// `source` are kept.
pub fn copy_tree(source: &Path, destination: &Path) -> Result<()> {
    fs::create_dir_all(destination)
        .map_err(|e| ThemeError::io("Failed to create", destination, e))?;

    for entry in WalkDir::new(source).min_depth(1) {
        let entry = entry.map_err(|source_err| ThemeError::Walk {
            path: source.to_path_buf(),
            source: source_err,
        })?;

        let Ok(relative) = entry.path().strip_prefix(source) else {
            continue;
        };
        let target = destination.join(relative);

        if entry.file_type().is_dir() {
            fs::create_dir_all(&target).map_err(|e| ThemeError::io("Failed to create", &target, e))?;
        } else {
            fs::copy(entry.path(), &target)
                .map_err(|e| ThemeError::io("Failed to copy", entry.path(), e))?;
        }
    }

    Ok(())
}

/// Copy a single file into a directory, keeping its name
pub fn copy_into(file: &Path, directory: &Path) -> Result<PathBuf> {
    let name = file
        .file_name()
        .ok_or_else(|| ThemeError::io("Failed to copy", file, std::io::ErrorKind::InvalidInput.into()))?;
    let target = directory.join(name);
    fs::copy(file, &target).map_err(|e| ThemeError::io("Failed to copy", file, e))?;
    Ok(target)
}
