//! Marble CLI
//!
//! Installs the Marble GNOME Shell theme for the current user or for the
//! login screen:
//!
//! - `marble --mocha --blue` installs one flavor/accent combination
//! - `marble -a` installs every combination
//! - `marble --hue 200 --name ocean` installs a custom hue in light and dark
//! - `marble --gdm --mocha --blue` rebuilds the GDM theme bundle
//! - `marble -r` removes installed themes, `marble -r --mocha --blue` then
//!   reinstalls

mod cli;
mod commands;
mod config;

use anyhow::{Context, Result};
use clap::Parser;
use marble_theme::{removal_roots, SystemGresource};
use tracing_subscriber::EnvFilter;

use crate::cli::Cli;
use crate::commands::Session;
use crate::config::MarbleConfig;

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let cwd = std::env::current_dir().context("Failed to read the current directory")?;
    let (config, base) = MarbleConfig::discover(cli.config.as_deref(), &cwd)?;
    let paths = config.resolve(&base);
    tracing::debug!(?paths, "resolved paths");

    let session = Session {
        config: &config,
        paths: &paths,
        removal_roots: removal_roots(&paths.themes),
    };

    let stdin = std::io::stdin();
    let mut stdout = std::io::stdout();

    match (cli.gdm, cli.remove) {
        (true, true) => session.remove_gdm(SystemGresource, &mut stdout),
        (true, false) => session.install_gdm(&cli, SystemGresource, &mut stdout),
        (false, true) => session.remove_local(&cli, &mut stdin.lock(), &mut stdout),
        (false, false) => session.install_local(&cli, &mut stdout),
    }
}

fn init_tracing(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}
