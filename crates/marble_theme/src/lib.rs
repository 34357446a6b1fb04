//! Marble Theme Engine
//!
//! Builds and installs the Marble GNOME Shell theme from a raw theme tree
//! and a color schema.
//!
//! # Overview
//!
//! - **Schema**: flavors with accent palettes, and an element table of HSLA
//!   recipes for custom hues ([`ColorSchema`])
//! - **Templates**: the raw tree plus a stylesheet assembled from fragments
//!   and tweaks ([`TemplateBuilder`])
//! - **Installation**: one substituted copy of the template per request
//!   ([`ThemeInstaller`]), or a login screen bundle ([`GlobalTheme`])
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use marble_theme::{plan_palette, with_workspace, ColorSchema, Selection, TemplateBuilder, ThemeInstaller};
//!
//! let schema = ColorSchema::load("colors.json".as_ref())?;
//! let selection = Selection { all: true, ..Default::default() };
//!
//! with_workspace(None, |ws| {
//!     let template = TemplateBuilder::new("gnome-shell", "theme/gnome-shell").prepare(ws)?;
//!     let installer = ThemeInstaller::new(&schema, &template, themes_dir);
//!     installer.install_all(&plan_palette(&selection, &schema), &mut std::io::stdout())
//! })?;
//! ```
//!
//! # Color modes
//!
//! Flavor/accent installs and custom hue installs are separate modes. A
//! request is one or the other ([`InstallRequest`]), never a mix. Both
//! fill the same `@keyword` vocabulary in the raw theme.

pub mod color;
pub mod error;
pub mod gdm;
pub mod installer;
pub mod remove;
pub mod resolve;
pub mod schema;
pub mod substitute;
pub mod template;
pub mod workspace;

// Re-export commonly used types
pub use color::{hex_to_rgba, hsl_to_rgb, rgb_to_hsl, Color, HOVER_LIGHTNESS_FACTOR};
pub use error::{Result, ThemeError};
pub use gdm::{GlobalTheme, GresourceTool, SystemGresource};
pub use installer::{
    plan_hue, plan_palette, CustomHue, InstallReport, InstallRequest, Selection, ThemeInstaller,
    DEFAULT_PREFIX,
};
pub use remove::{default_themes_dir, remove_installed, removal_roots, RemovalReport};
pub use resolve::{hue_replacements, palette_replacements, Replacements};
pub use schema::{ColorSchema, ElementColors, ElementShade, Flavor, Hsla, Mode};
pub use substitute::{replace_keywords, replace_keywords_in_tree};
pub use template::{TemplateBuilder, ThemeTemplate, Tweak};
pub use workspace::{with_workspace, Workspace};
