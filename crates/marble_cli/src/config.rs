//! Marble configuration file handling

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// File name searched for when no `--config` is given
pub const CONFIG_FILE: &str = "marble.toml";

/// Top-level Marble configuration (marble.toml)
#[derive(Debug, Default, Deserialize, Serialize)]
pub struct MarbleConfig {
    #[serde(default)]
    pub paths: PathsConfig,
    #[serde(default)]
    pub theme: ThemeConfig,
    #[serde(default)]
    pub gdm: GdmConfig,
}

/// Where the theme sources come from and where installs go
#[derive(Debug, Deserialize, Serialize)]
pub struct PathsConfig {
    /// Raw theme tree (fragments live next to it in `<raw_theme>_css`)
    #[serde(default = "default_raw_theme")]
    pub raw_theme: String,
    /// Tweak fragments and assets
    #[serde(default = "default_tweaks")]
    pub tweaks: String,
    /// Color schema
    #[serde(default = "default_colors")]
    pub colors: String,
    /// Themes root
    #[serde(default = "default_themes")]
    pub themes: String,
    /// Parent of the scratch workspace (system temp if unset)
    #[serde(default)]
    pub temp: Option<String>,
}

fn default_raw_theme() -> String {
    "theme/gnome-shell".to_string()
}

fn default_tweaks() -> String {
    "tweaks".to_string()
}

fn default_colors() -> String {
    "colors.json".to_string()
}

fn default_themes() -> String {
    "~/.themes".to_string()
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            raw_theme: default_raw_theme(),
            tweaks: default_tweaks(),
            colors: default_colors(),
            themes: default_themes(),
            temp: None,
        }
    }
}

/// Naming of installed themes
#[derive(Debug, Deserialize, Serialize)]
pub struct ThemeConfig {
    /// Prefix of every installed theme directory
    #[serde(default = "default_prefix")]
    pub prefix: String,
    /// Subdirectory and stylesheet name inside each theme
    #[serde(default = "default_theme_type")]
    pub theme_type: String,
}

fn default_prefix() -> String {
    marble_theme::DEFAULT_PREFIX.to_string()
}

fn default_theme_type() -> String {
    "gnome-shell".to_string()
}

impl Default for ThemeConfig {
    fn default() -> Self {
        Self {
            prefix: default_prefix(),
            theme_type: default_theme_type(),
        }
    }
}

/// Login screen bundle location
#[derive(Debug, Deserialize, Serialize)]
pub struct GdmConfig {
    #[serde(default = "default_shell_dir")]
    pub shell_dir: String,
    #[serde(default = "default_gresource")]
    pub gresource: String,
}

fn default_shell_dir() -> String {
    marble_theme::gdm::DEFAULT_SHELL_DIR.to_string()
}

fn default_gresource() -> String {
    marble_theme::gdm::GRESOURCE_NAME.to_string()
}

impl Default for GdmConfig {
    fn default() -> Self {
        Self {
            shell_dir: default_shell_dir(),
            gresource: default_gresource(),
        }
    }
}

/// Configured paths made absolute
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedPaths {
    pub raw_theme: PathBuf,
    pub tweaks: PathBuf,
    pub colors: PathBuf,
    pub themes: PathBuf,
    pub temp: Option<PathBuf>,
    pub shell_dir: PathBuf,
}

impl MarbleConfig {
    /// Load configuration from a file
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;

        let config: MarbleConfig = toml::from_str(&content)
            .with_context(|| format!("Failed to parse {}", path.display()))?;

        Ok(config)
    }

    /// Find and load the configuration
    ///
    /// An explicit path must exist. Otherwise `marble.toml` in `dir`, then
    /// in the user config directory, is used if present, falling back to
    /// defaults. Returns the config and the directory relative paths are
    /// resolved against.
    pub fn discover(explicit: Option<&Path>, dir: &Path) -> Result<(Self, PathBuf)> {
        if let Some(path) = explicit {
            if !path.is_file() {
                anyhow::bail!("No configuration file at {}", path.display());
            }
            let base = path
                .parent()
                .filter(|parent| !parent.as_os_str().is_empty())
                .map_or_else(|| dir.to_path_buf(), Path::to_path_buf);
            return Ok((Self::load(path)?, base));
        }

        let local = dir.join(CONFIG_FILE);
        if local.is_file() {
            return Ok((Self::load(&local)?, dir.to_path_buf()));
        }

        if let Some(user) = dirs::config_dir().map(|config| config.join("marble").join(CONFIG_FILE)) {
            if user.is_file() {
                tracing::debug!(path = %user.display(), "using user configuration");
                return Ok((Self::load(&user)?, dir.to_path_buf()));
            }
        }

        Ok((Self::default(), dir.to_path_buf()))
    }

    /// Expand `~` and make relative paths absolute against `base`
    pub fn resolve(&self, base: &Path) -> ResolvedPaths {
        ResolvedPaths {
            raw_theme: resolve_path(&self.paths.raw_theme, base),
            tweaks: resolve_path(&self.paths.tweaks, base),
            colors: resolve_path(&self.paths.colors, base),
            themes: resolve_path(&self.paths.themes, base),
            temp: self.paths.temp.as_deref().map(|temp| resolve_path(temp, base)),
            shell_dir: resolve_path(&self.gdm.shell_dir, base),
        }
    }
}

fn resolve_path(raw: &str, base: &Path) -> PathBuf {
    let expanded = PathBuf::from(shellexpand::tilde(raw).as_ref());
    if expanded.is_absolute() {
        expanded
    } else {
        base.join(expanded)
    }
}
