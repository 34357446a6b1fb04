//! Command implementations

use anyhow::{Context, Result};
use marble_theme::{
    plan_hue, plan_palette, remove_installed, with_workspace, ColorSchema, CustomHue, GlobalTheme,
    GresourceTool, InstallRequest, TemplateBuilder, ThemeInstaller,
};
use std::io::{BufRead, Write};
use std::path::PathBuf;
use tracing::{debug, error, info};

use crate::cli::Cli;
use crate::config::{MarbleConfig, ResolvedPaths};

/// Message printed when nothing was selected
pub const NOTHING_SELECTED: &str =
    "No accent/flavor arguments specified. Use -h or --help to see the available options.";

/// Everything a command needs besides the arguments
pub struct Session<'a> {
    pub config: &'a MarbleConfig,
    pub paths: &'a ResolvedPaths,
    /// Directories scanned by `-r`
    pub removal_roots: Vec<PathBuf>,
}

impl Session<'_> {
    fn load_schema(&self) -> Result<ColorSchema> {
        ColorSchema::load(&self.paths.colors)
            .with_context(|| format!("Failed to load colors from {}", self.paths.colors.display()))
    }

    fn template_builder(&self, cli: &Cli) -> Result<TemplateBuilder> {
        let mut builder = TemplateBuilder::new(&self.config.theme.theme_type, &self.paths.raw_theme);
        if cli.filled {
            builder.filled();
        }
        for tweak in cli.tweaks.selected() {
            builder
                .tweak(&tweak, &self.paths.tweaks)
                .with_context(|| format!("Failed to apply {} tweak", tweak.id()))?;
        }
        Ok(builder)
    }

    /// Install one theme per planned request into the themes root
    pub fn install_local(&self, cli: &Cli, out: &mut dyn Write) -> Result<()> {
        let schema = self.load_schema()?;
        let requests = plan(cli, &schema)?;

        if requests.is_empty() {
            writeln!(out, "{NOTHING_SELECTED}")?;
            return Ok(());
        }

        let builder = self.template_builder(cli)?;
        let report = with_workspace(self.paths.temp.as_deref(), |ws| {
            let template = builder.prepare(ws)?;
            let installer = ThemeInstaller::new(&schema, &template, &self.paths.themes)
                .with_prefix(&self.config.theme.prefix);
            installer.install_all(&requests, out)
        })?;

        info!(
            installed = report.installed.len(),
            failed = report.failed.len(),
            "install finished"
        );
        Ok(())
    }

    /// Delete installed themes after asking on `out`
    ///
    /// Color flags given alongside `-r` are installed afterwards, so a
    /// clean reinstall is one command.
    pub fn remove_local(&self, cli: &Cli, input: &mut dyn BufRead, out: &mut dyn Write) -> Result<()> {
        let report = remove_installed(&self.removal_roots, &self.config.theme.prefix, input, out)?;
        debug!(
            confirmed = report.confirmed,
            removed = report.removed.len(),
            failed = report.failed.len(),
            "removal finished"
        );

        if cli.wants_install() {
            self.install_local(cli, out)?;
        }
        Ok(())
    }

    /// Install the first planned request as the login screen theme
    ///
    /// Failures are reported on `out` rather than returned.
    pub fn install_gdm<T: GresourceTool>(
        &self,
        cli: &Cli,
        tool: T,
        out: &mut dyn Write,
    ) -> Result<()> {
        let schema = self.load_schema()?;
        let requests = plan(cli, &schema)?;

        if requests.is_empty() {
            writeln!(out, "{NOTHING_SELECTED}")?;
            return Ok(());
        }

        let global = self.global_theme(tool);
        let builder = self.template_builder(cli)?;
        let result = with_workspace(self.paths.temp.as_deref(), |ws| {
            let template = builder.prepare(ws)?;
            let installer = ThemeInstaller::new(&schema, &template, &self.paths.themes)
                .with_prefix(&self.config.theme.prefix);
            global.install(&installer, &requests, ws)
        });

        match result {
            Ok(()) => {
                writeln!(out, "GDM theme installed successfully.")?;
                writeln!(out, "You need to restart gdm.service to apply changes.")?;
                writeln!(out, "Run \"systemctl restart gdm.service\" to restart GDM.")?;
            }
            Err(err) => {
                error!(%err, "GDM install failed");
                writeln!(out, "Error: {err}")?;
            }
        }
        Ok(())
    }

    /// Restore the stock login screen theme
    pub fn remove_gdm<T: GresourceTool>(&self, tool: T, out: &mut dyn Write) -> Result<()> {
        let global = self.global_theme(tool);
        match global.remove() {
            Ok(true) => writeln!(out, "GDM theme removed successfully.")?,
            Ok(false) => writeln!(
                out,
                "No GDM theme backup found at {}.",
                global.backup_path().display()
            )?,
            Err(err) => {
                error!(%err, "GDM removal failed");
                writeln!(out, "Error: {err}")?;
            }
        }
        Ok(())
    }

    fn global_theme<T: GresourceTool>(&self, tool: T) -> GlobalTheme<T> {
        GlobalTheme::new(&self.paths.shell_dir, tool).with_gresource(&self.config.gdm.gresource)
    }
}

/// Requests for the arguments
///
/// `--hue` switches to custom hue mode; otherwise flavors and accents are
/// planned against the schema.
pub fn plan(cli: &Cli, schema: &ColorSchema) -> Result<Vec<InstallRequest>> {
    let selection = cli.selection();

    let Some(raw_hue) = &cli.custom.hue else {
        return Ok(plan_palette(&selection, schema));
    };

    let custom = custom_hue(raw_hue, cli, schema)?;
    Ok(plan_hue(&custom, &selection, schema))
}

fn custom_hue(raw: &str, cli: &Cli, schema: &ColorSchema) -> Result<CustomHue> {
    let (hue, preset) = match raw.parse::<f64>() {
        Ok(degrees) => {
            if !(0.0..=360.0).contains(&degrees) {
                anyhow::bail!("Hue must be between 0 and 360, got {degrees}");
            }
            (degrees, None)
        }
        Err(_) => {
            let degrees = schema
                .hue(raw)
                .with_context(|| format!("Unknown hue '{raw}'"))?;
            (degrees, Some(raw.to_string()))
        }
    };

    Ok(CustomHue {
        hue,
        name: cli.custom.name.clone().or(preset),
        saturation: cli.custom.sat,
    })
}
