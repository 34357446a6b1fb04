//! Color schema (`colors.json`)
//!
//! The schema carries two independent color sources:
//!
//! - **flavors**: named palettes (latte, frappe, ...) with fixed accent hex
//!   values, used by flavor/accent installs.
//! - **elements**: per-keyword HSLA recipes for light and dark modes, used
//!   by custom hue installs.
//!
//! Map order is preserved from the file since it decides substitution order.

use std::fmt::{Display, Formatter};
use std::fs;
use std::path::Path;
use std::str::FromStr;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::error::{Result, ThemeError};

/// Light or dark rendering of the theme
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    Light,
    Dark,
}

impl Mode {
    pub fn id(self) -> &'static str {
        match self {
            Self::Light => "light",
            Self::Dark => "dark",
        }
    }

    pub fn all() -> &'static [Mode] {
        const MODES: [Mode; 2] = [Mode::Light, Mode::Dark];
        &MODES
    }
}

impl Display for Mode {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for Mode {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "light" => Ok(Self::Light),
            "dark" => Ok(Self::Dark),
            other => Err(format!("unknown mode '{other}', expected light or dark")),
        }
    }
}

/// A named palette with its accent colors
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct Flavor {
    pub mode: Mode,
    /// Non-accent colors (base, text, surface0, ...) as hex strings
    #[serde(default)]
    pub palette: IndexMap<String, String>,
    /// Accent name -> hex string
    #[serde(default)]
    pub accents: IndexMap<String, String>,
}

impl Flavor {
    pub fn accent(&self, name: &str) -> Option<&str> {
        self.accents.get(name).map(String::as_str)
    }
}

/// HSLA recipe for one element in one mode
///
/// Saturation and lightness are percentages, alpha is 0-1. Without `h` the
/// element follows the requested accent hue.
#[derive(Clone, Copy, Debug, PartialEq, Deserialize, Serialize)]
pub struct Hsla {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub h: Option<f64>,
    #[serde(default)]
    pub s: f64,
    pub l: f64,
    #[serde(default = "opaque")]
    pub a: f64,
}

fn opaque() -> f64 {
    1.0
}

/// Element color for a mode: a recipe or a literal hex override
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
#[serde(untagged)]
pub enum ElementShade {
    Literal(String),
    Hsla(Hsla),
}

/// Per-mode shades of one element keyword
#[derive(Clone, Debug, Default, Deserialize, Serialize)]
pub struct ElementColors {
    #[serde(default)]
    pub light: Option<ElementShade>,
    #[serde(default)]
    pub dark: Option<ElementShade>,
}

impl ElementColors {
    pub fn shade(&self, mode: Mode) -> Option<&ElementShade> {
        match mode {
            Mode::Light => self.light.as_ref(),
            Mode::Dark => self.dark.as_ref(),
        }
    }
}

/// The whole color definition file
#[derive(Clone, Debug, Default, Deserialize, Serialize)]
pub struct ColorSchema {
    #[serde(default)]
    pub flavors: IndexMap<String, Flavor>,
    #[serde(default)]
    pub elements: IndexMap<String, ElementColors>,
    /// Named hue presets in degrees
    #[serde(default)]
    pub hues: IndexMap<String, f64>,
}

impl ColorSchema {
    /// Load and parse a schema file
    pub fn load(path: &Path) -> Result<Self> {
        let content =
            fs::read_to_string(path).map_err(|e| ThemeError::io("Failed to read", path, e))?;

        Self::parse(&content).map_err(|source| ThemeError::Schema {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn parse(content: &str) -> serde_json::Result<Self> {
        serde_json::from_str(content)
    }

    pub fn flavor(&self, name: &str) -> Result<&Flavor> {
        self.flavors
            .get(name)
            .ok_or_else(|| ThemeError::UnknownFlavor(name.to_string()))
    }

    pub fn flavor_names(&self) -> impl Iterator<Item = &str> {
        self.flavors.keys().map(String::as_str)
    }

    /// Accent names across all flavors, first-seen order
    pub fn accent_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = Vec::new();
        for flavor in self.flavors.values() {
            for accent in flavor.accents.keys() {
                if !names.contains(&accent.as_str()) {
                    names.push(accent);
                }
            }
        }
        names
    }

    /// Modes that at least one element defines
    pub fn element_modes(&self) -> Vec<Mode> {
        Mode::all()
            .iter()
            .copied()
            .filter(|mode| self.elements.values().any(|e| e.shade(*mode).is_some()))
            .collect()
    }

    pub fn hue(&self, name: &str) -> Option<f64> {
        self.hues.get(name).copied()
    }
}
