//! Theme error types

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while resolving colors or installing a theme
#[derive(Error, Debug)]
pub enum ThemeError {
    /// Color string is not a 6 or 8 digit hex code
    #[error("Invalid HEX color code: {0}")]
    InvalidHex(String),

    /// Filesystem operation failed
    #[error("{action} {}: {source}", path.display())]
    Io {
        action: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Color schema could not be parsed
    #[error("Failed to parse color schema {}: {source}", path.display())]
    Schema {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// Flavor missing from the schema
    #[error("Unknown flavor: {0}")]
    UnknownFlavor(String),

    /// Accent missing from the flavor
    #[error("Unknown accent '{accent}' for flavor '{flavor}'")]
    UnknownAccent { flavor: String, accent: String },

    /// Directory walk failed
    #[error("Failed to walk {}: {source}", path.display())]
    Walk {
        path: PathBuf,
        #[source]
        source: walkdir::Error,
    },

    /// External gresource tooling failed
    #[error("gresource tooling failed: {0}")]
    Gresource(String),

    /// Reading the prompt answer or writing progress failed
    #[error("Console I/O failed: {0}")]
    Console(#[source] std::io::Error),

    /// Nothing was requested for an operation that needs a request
    #[error("No theme request to install")]
    NothingRequested,
}

impl ThemeError {
    /// Wrap an I/O error with the action and path it came from
    pub fn io(action: &'static str, path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            action,
            path: path.into(),
            source,
        }
    }
}

/// Result type for theme operations
pub type Result<T> = std::result::Result<T, ThemeError>;
