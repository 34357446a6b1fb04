//! Template assembly
//!
//! A theme template is the raw theme tree plus one stylesheet assembled from
//! the fragment directory next to it (`theme/gnome-shell` pairs with
//! `theme/gnome-shell_css`). Tweaks add fragments or assets before the
//! template is staged in the workspace; after that the staged tree is only
//! ever copied, never edited.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::color::Color;
use crate::error::{Result, ThemeError};
use crate::resolve::Replacements;
use crate::substitute::replace_keywords_in_tree;
use crate::workspace::{copy_into, copy_tree, Workspace};

/// Keyword aliases that switch buttons to the filled accent style
pub const FILLED_ALIASES: &[(&str, &str)] = &[
    ("@button-color", "@accent-color"),
    ("@button-hover", "@accent-color-hover"),
    ("@button-text", "@crust"),
];

/// Optional stylesheet adjustments
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Tweak {
    /// Restore the stock panel height
    PanelDefaultSize,
    /// Drop the pill background behind panel buttons
    PanelNoPill,
    /// Color panel button text with a hex color
    PanelTextColor(String),
    /// Swap the Show Apps icon for a launchpad icon
    Launchpad,
}

impl Tweak {
    pub fn id(&self) -> &'static str {
        match self {
            Self::PanelDefaultSize => "panel-default-size",
            Self::PanelNoPill => "panel-no-pill",
            Self::PanelTextColor(_) => "panel-text-color",
            Self::Launchpad => "launchpad",
        }
    }
}

/// Collects fragments, tweaks and assets, then renders the stylesheet
#[derive(Clone, Debug)]
pub struct TemplateBuilder {
    theme_type: String,
    source: PathBuf,
    fragments: PathBuf,
    prepended: Vec<String>,
    appended: Vec<String>,
    assets: Vec<PathBuf>,
    aliases: Replacements,
}

impl TemplateBuilder {
    /// Template for `theme_type` built from `source` and `<source>_css`
    pub fn new(theme_type: impl Into<String>, source: impl Into<PathBuf>) -> Self {
        let source = source.into();
        let mut fragments = source.clone().into_os_string();
        fragments.push("_css");

        Self {
            theme_type: theme_type.into(),
            source,
            fragments: PathBuf::from(fragments),
            prepended: Vec::new(),
            appended: Vec::new(),
            assets: Vec::new(),
            aliases: Replacements::new(),
        }
    }

    /// Use a different fragment directory
    pub fn fragments_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.fragments = dir.into();
        self
    }

    pub fn theme_type(&self) -> &str {
        &self.theme_type
    }

    /// Add text before the fragments
    pub fn prepend(&mut self, text: impl Into<String>) -> &mut Self {
        self.prepended.push(text.into());
        self
    }

    /// Add text after the fragments
    pub fn append(&mut self, text: impl Into<String>) -> &mut Self {
        self.appended.push(text.into());
        self
    }

    pub fn append_file(&mut self, path: &Path) -> Result<&mut Self> {
        let text = fs::read_to_string(path).map_err(|e| ThemeError::io("Failed to read", path, e))?;
        Ok(self.append(text))
    }

    /// Copy an extra file into the template root
    pub fn asset(&mut self, path: impl Into<PathBuf>) -> &mut Self {
        self.assets.push(path.into());
        self
    }

    /// Switch to the filled button style
    pub fn filled(&mut self) -> &mut Self {
        for (keyword, alias) in FILLED_ALIASES {
            self.aliases.push(*keyword, *alias);
        }
        self
    }

    /// Apply a tweak using the files under `tweaks_dir`
    pub fn tweak(&mut self, tweak: &Tweak, tweaks_dir: &Path) -> Result<&mut Self> {
        debug!(tweak = tweak.id(), "applying tweak");

        match tweak {
            Tweak::PanelDefaultSize => {
                self.append_file(&tweaks_dir.join("panel/def-size.css"))?;
            }
            Tweak::PanelNoPill => {
                self.append_file(&tweaks_dir.join("panel/no-pill.css"))?;
            }
            Tweak::PanelTextColor(hex) => {
                let color = Color::from_hex(hex)?;
                self.append(format!(
                    ".panel-button,\n.clock,\n.clock-display StIcon {{\n  color: {};\n}}\n",
                    color.to_css_rgba()
                ));
            }
            Tweak::Launchpad => {
                let dir = tweaks_dir.join("launchpad");
                self.append_file(&dir.join("launchpad.css"))?;
                for asset in sorted_files(&dir)? {
                    if asset.extension().is_some_and(|ext| ext == "css") {
                        continue;
                    }
                    self.asset(asset);
                }
            }
        }

        Ok(self)
    }

    /// Assemble the stylesheet text
    ///
    /// Prepended text comes first, then each fragment in file name order
    /// followed by a newline, then appended text each preceded by a newline.
    pub fn render(&self) -> Result<String> {
        let mut out = String::new();

        for text in &self.prepended {
            out.push_str(text);
            out.push('\n');
        }

        for fragment in sorted_files(&self.fragments)? {
            let text = fs::read_to_string(&fragment)
                .map_err(|e| ThemeError::io("Failed to read", &fragment, e))?;
            out.push_str(&text);
            out.push('\n');
        }

        for text in &self.appended {
            out.push('\n');
            out.push_str(text);
        }

        Ok(out)
    }

    /// Stage the template inside `workspace`
    pub fn prepare(&self, workspace: &Workspace) -> Result<ThemeTemplate> {
        let root = workspace.join(&self.theme_type);
        copy_tree(&self.source, &root)?;

        let template = ThemeTemplate {
            theme_type: self.theme_type.clone(),
            root,
        };

        let stylesheet = template.stylesheet();
        fs::write(&stylesheet, self.render()?)
            .map_err(|e| ThemeError::io("Failed to write", &stylesheet, e))?;

        for asset in &self.assets {
            copy_into(asset, template.root())?;
        }

        if !self.aliases.is_empty() {
            replace_keywords_in_tree(template.root(), &self.aliases)?;
        }

        debug!(root = %template.root().display(), assets = self.assets.len(), "staged template");
        Ok(template)
    }
}

/// A staged template tree
#[derive(Clone, Debug)]
pub struct ThemeTemplate {
    theme_type: String,
    root: PathBuf,
}

impl ThemeTemplate {
    pub fn theme_type(&self) -> &str {
        &self.theme_type
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// The assembled `<theme_type>.css`
    pub fn stylesheet(&self) -> PathBuf {
        self.root.join(format!("{}.css", self.theme_type))
    }
}

fn sorted_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let entries = fs::read_dir(dir).map_err(|e| ThemeError::io("Failed to list", dir, e))?;

    let mut files = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| ThemeError::io("Failed to list", dir, e))?;
        let path = entry.path();
        if path.is_file() {
            files.push(path);
        }
    }

    files.sort();
    Ok(files)
}
