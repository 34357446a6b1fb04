//! Theme installation
//!
//! Each [`InstallRequest`] produces one theme directory. The staged
//! template is copied to the destination first and substitution only ever
//! runs on that copy, so requests never see each other's colors.

use std::io::Write;
use std::path::{Path, PathBuf};

use tracing::{debug, error, info};

use crate::error::{Result, ThemeError};
use crate::resolve::{hue_replacements, palette_replacements, Replacements};
use crate::schema::{ColorSchema, Mode};
use crate::substitute::replace_keywords_in_tree;
use crate::template::ThemeTemplate;
use crate::workspace::copy_tree;

/// Directory name prefix of every installed theme
pub const DEFAULT_PREFIX: &str = "Marble";

/// Flavor and accent names picked on the command line
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Selection {
    pub all: bool,
    pub flavors: Vec<String>,
    pub accents: Vec<String>,
}

impl Selection {
    fn wants_flavor(&self, name: &str) -> bool {
        self.all || self.flavors.iter().any(|f| f == name)
    }

    fn wants_accent(&self, name: &str) -> bool {
        self.all || self.accents.iter().any(|a| a == name)
    }
}

/// Custom hue settings
#[derive(Clone, Debug, PartialEq)]
pub struct CustomHue {
    /// Hue in degrees
    pub hue: f64,
    pub name: Option<String>,
    /// Saturation multiplier in percent
    pub saturation: Option<f64>,
}

/// One theme to install
#[derive(Clone, Debug, PartialEq)]
pub enum InstallRequest {
    /// Accent color from a flavor palette
    Palette { flavor: String, accent: String },
    /// Accent derived from a hue through the element table
    Hue {
        hue: f64,
        name: String,
        mode: Mode,
        saturation: Option<f64>,
    },
}

impl InstallRequest {
    /// Name used for the theme directory, without prefix
    pub fn name(&self) -> String {
        match self {
            Self::Palette { flavor, accent } => format!("{flavor}-{accent}"),
            Self::Hue { name, mode, .. } => format!("{name}-{mode}"),
        }
    }

    pub fn replacements(&self, schema: &ColorSchema) -> Result<Replacements> {
        match self {
            Self::Palette { flavor, accent } => palette_replacements(schema, flavor, accent),
            Self::Hue {
                hue,
                mode,
                saturation,
                ..
            } => hue_replacements(schema, *hue, *mode, *saturation),
        }
    }
}

/// Flavor/accent requests for a selection
///
/// Walks the schema in file order; selected names the schema does not know
/// produce nothing.
pub fn plan_palette(selection: &Selection, schema: &ColorSchema) -> Vec<InstallRequest> {
    let mut requests = Vec::new();

    for (flavor_name, flavor) in &schema.flavors {
        if !selection.wants_flavor(flavor_name) {
            continue;
        }
        for accent in flavor.accents.keys() {
            if selection.wants_accent(accent) {
                requests.push(InstallRequest::Palette {
                    flavor: flavor_name.clone(),
                    accent: accent.clone(),
                });
            }
        }
    }

    requests
}

/// Custom hue requests, one per mode
///
/// Selected flavors choose the modes. Without a flavor, or with `all`,
/// every mode the element table defines is installed.
pub fn plan_hue(custom: &CustomHue, selection: &Selection, schema: &ColorSchema) -> Vec<InstallRequest> {
    let available = schema.element_modes();

    let modes: Vec<Mode> = if selection.all || selection.flavors.is_empty() {
        available
    } else {
        let mut modes = Vec::new();
        for (name, flavor) in &schema.flavors {
            if selection.wants_flavor(name)
                && available.contains(&flavor.mode)
                && !modes.contains(&flavor.mode)
            {
                modes.push(flavor.mode);
            }
        }
        modes
    };

    let name = custom
        .name
        .clone()
        .unwrap_or_else(|| format!("hue{}", custom.hue));

    modes
        .into_iter()
        .map(|mode| InstallRequest::Hue {
            hue: custom.hue,
            name: name.clone(),
            mode,
            saturation: custom.saturation,
        })
        .collect()
}

/// Outcome of a batch of installs
#[derive(Debug, Default)]
pub struct InstallReport {
    pub installed: Vec<PathBuf>,
    pub failed: Vec<(String, ThemeError)>,
}

impl InstallReport {
    pub fn is_success(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Copies a staged template and applies colors for each request
#[derive(Debug)]
pub struct ThemeInstaller<'a> {
    schema: &'a ColorSchema,
    template: &'a ThemeTemplate,
    destination_root: PathBuf,
    prefix: String,
}

impl<'a> ThemeInstaller<'a> {
    pub fn new(
        schema: &'a ColorSchema,
        template: &'a ThemeTemplate,
        destination_root: impl Into<PathBuf>,
    ) -> Self {
        Self {
            schema,
            template,
            destination_root: destination_root.into(),
            prefix: DEFAULT_PREFIX.to_string(),
        }
    }

    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = prefix.into();
        self
    }

    pub fn template(&self) -> &ThemeTemplate {
        self.template
    }

    /// `<root>/<prefix>-<name>/<theme_type>`
    pub fn destination(&self, request: &InstallRequest) -> PathBuf {
        self.destination_root
            .join(format!("{}-{}", self.prefix, request.name()))
            .join(self.template.theme_type())
    }

    /// Copy the template to `destination` and apply the request's colors
    pub fn install_to(&self, request: &InstallRequest, destination: &Path) -> Result<()> {
        let replacements = request.replacements(self.schema)?;
        copy_tree(self.template.root(), destination)?;
        let files = replace_keywords_in_tree(destination, &replacements)?;
        debug!(
            destination = %destination.display(),
            keywords = replacements.len(),
            files,
            "installed theme"
        );
        Ok(())
    }

    /// Install at the default destination
    pub fn install(&self, request: &InstallRequest) -> Result<PathBuf> {
        let destination = self.destination(request);
        self.install_to(request, &destination)?;
        Ok(destination)
    }

    /// Install every request, continuing past failures
    ///
    /// Progress is written to `out` as `Creating <name> theme... Done.`.
    pub fn install_all(&self, requests: &[InstallRequest], out: &mut dyn Write) -> Result<InstallReport> {
        let mut report = InstallReport::default();

        for request in requests {
            let name = request.name();
            write!(out, "Creating {name} theme... ").map_err(ThemeError::Console)?;

            match self.install(request) {
                Ok(path) => {
                    writeln!(out, "Done.").map_err(ThemeError::Console)?;
                    info!(theme = %name, path = %path.display(), "theme installed");
                    report.installed.push(path);
                }
                Err(err) => {
                    writeln!(out, "\nError: {err}").map_err(ThemeError::Console)?;
                    error!(theme = %name, %err, "theme installation failed");
                    report.failed.push((name, err));
                }
            }
        }

        Ok(report)
    }
}
