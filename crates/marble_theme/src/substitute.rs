//! In-place keyword substitution over theme files

use std::fs;
use std::path::Path;

use tracing::debug;
use walkdir::WalkDir;

use crate::error::{Result, ThemeError};
use crate::resolve::Replacements;

/// Extensions treated as text; everything else is copied untouched
pub const TEXT_EXTENSIONS: &[&str] = &["css", "scss", "svg"];

/// Whether keywords should be substituted in this file
pub fn is_text_file(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| TEXT_EXTENSIONS.iter().any(|t| ext.eq_ignore_ascii_case(t)))
}

/// Replace keywords in one file
///
/// Returns `false` without touching the file when it is not a text file.
pub fn replace_keywords(path: &Path, replacements: &Replacements) -> Result<bool> {
    if !is_text_file(path) {
        return Ok(false);
    }

    let content = fs::read_to_string(path).map_err(|e| ThemeError::io("Failed to read", path, e))?;
    let replaced = replacements.apply(&content);

    if replaced != content {
        fs::write(path, replaced).map_err(|e| ThemeError::io("Failed to write", path, e))?;
    }

    Ok(true)
}

/// Replace keywords in every text file below `root`
///
/// Returns the number of text files visited.
pub fn replace_keywords_in_tree(root: &Path, replacements: &Replacements) -> Result<usize> {
    let mut visited = 0;

    for entry in WalkDir::new(root) {
        let entry = entry.map_err(|source| ThemeError::Walk {
            path: root.to_path_buf(),
            source,
        })?;

        if entry.file_type().is_file() && replace_keywords(entry.path(), replacements)? {
            visited += 1;
        }
    }

    debug!(root = %root.display(), visited, "substituted keywords");
    Ok(visited)
}
