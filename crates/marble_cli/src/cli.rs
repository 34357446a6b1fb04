//! Command line arguments

use clap::{ArgAction, Args, Parser};
use marble_theme::{Selection, Tweak};
use std::path::PathBuf;

/// Install the Marble GNOME Shell theme
#[derive(Parser, Debug)]
#[command(name = "marble")]
#[command(about = "Install, remove and customize the Marble GNOME Shell theme")]
#[command(version)]
pub struct Cli {
    /// Remove all installed Marble themes (or restore the stock GDM theme with --gdm)
    #[arg(short, long)]
    pub remove: bool,

    #[command(flatten)]
    pub accents: AccentArgs,

    #[command(flatten)]
    pub flavors: FlavorArgs,

    #[command(flatten)]
    pub custom: CustomColorArgs,

    /// Fill buttons with the accent color
    #[arg(long, help_heading = "Theme style")]
    pub filled: bool,

    /// Install the theme for the login screen (needs root)
    #[arg(long, help_heading = "GDM")]
    pub gdm: bool,

    #[command(flatten)]
    pub tweaks: TweakArgs,

    /// Configuration file (defaults to ./marble.toml when present)
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Increase logging (-v debug, -vv trace)
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,
}

/// Accent colors
#[derive(Args, Debug, Default)]
#[command(next_help_heading = "Accent colors")]
pub struct AccentArgs {
    /// All flavors and accents
    #[arg(short, long)]
    pub all: bool,
    #[arg(long)]
    pub rosewater: bool,
    #[arg(long)]
    pub flamingo: bool,
    #[arg(long)]
    pub pink: bool,
    #[arg(long)]
    pub mauve: bool,
    #[arg(long)]
    pub red: bool,
    #[arg(long)]
    pub maroon: bool,
    #[arg(long)]
    pub peach: bool,
    #[arg(long)]
    pub yellow: bool,
    #[arg(long)]
    pub green: bool,
    #[arg(long)]
    pub teal: bool,
    #[arg(long)]
    pub sky: bool,
    #[arg(long)]
    pub sapphire: bool,
    #[arg(long)]
    pub blue: bool,
    #[arg(long)]
    pub lavender: bool,
}

impl AccentArgs {
    /// Names of the accent flags that were passed
    pub fn selected(&self) -> Vec<String> {
        [
            ("rosewater", self.rosewater),
            ("flamingo", self.flamingo),
            ("pink", self.pink),
            ("mauve", self.mauve),
            ("red", self.red),
            ("maroon", self.maroon),
            ("peach", self.peach),
            ("yellow", self.yellow),
            ("green", self.green),
            ("teal", self.teal),
            ("sky", self.sky),
            ("sapphire", self.sapphire),
            ("blue", self.blue),
            ("lavender", self.lavender),
        ]
        .into_iter()
        .filter(|(_, set)| *set)
        .map(|(name, _)| name.to_string())
        .collect()
    }
}

/// Catppuccin flavors
#[derive(Args, Debug, Default)]
#[command(next_help_heading = "Flavors")]
pub struct FlavorArgs {
    #[arg(long)]
    pub latte: bool,
    #[arg(long)]
    pub frappe: bool,
    #[arg(long)]
    pub macchiato: bool,
    #[arg(long)]
    pub mocha: bool,
}

impl FlavorArgs {
    pub fn selected(&self) -> Vec<String> {
        [
            ("latte", self.latte),
            ("frappe", self.frappe),
            ("macchiato", self.macchiato),
            ("mocha", self.mocha),
        ]
        .into_iter()
        .filter(|(_, set)| *set)
        .map(|(name, _)| name.to_string())
        .collect()
    }
}

/// Custom color
#[derive(Args, Debug, Default)]
#[command(next_help_heading = "Custom color")]
pub struct CustomColorArgs {
    /// Hue in degrees (0-360) or a named hue from the color schema
    #[arg(long, value_name = "HUE")]
    pub hue: Option<String>,

    /// Theme name for the custom hue
    #[arg(long, requires = "hue")]
    pub name: Option<String>,

    /// Saturation multiplier in percent (100 keeps the schema values)
    #[arg(long, value_name = "PERCENT", requires = "hue", value_parser = parse_percent)]
    pub sat: Option<f64>,
}

fn parse_percent(raw: &str) -> Result<f64, String> {
    let value: f64 = raw
        .trim_end_matches('%')
        .parse()
        .map_err(|_| format!("'{raw}' is not a number"))?;
    if !(0.0..=1000.0).contains(&value) {
        return Err(format!("{value} is outside 0-1000"));
    }
    Ok(value)
}

/// Panel and overview tweaks
#[derive(Args, Debug, Default)]
#[command(next_help_heading = "Tweaks")]
pub struct TweakArgs {
    /// Use the stock panel size
    #[arg(short = 'P', long)]
    pub panel_default_size: bool,

    /// Remove the pill background from panel buttons
    #[arg(long)]
    pub panel_no_pill: bool,

    /// Panel text color
    #[arg(long, value_name = "HEX")]
    pub panel_text_color: Option<String>,

    /// Replace the Show Apps icon with a launchpad icon
    #[arg(long)]
    pub launchpad: bool,
}

impl TweakArgs {
    /// Requested tweaks in the order they are appended to the stylesheet
    pub fn selected(&self) -> Vec<Tweak> {
        let mut tweaks = Vec::new();
        if self.panel_default_size {
            tweaks.push(Tweak::PanelDefaultSize);
        }
        if self.panel_no_pill {
            tweaks.push(Tweak::PanelNoPill);
        }
        if let Some(color) = &self.panel_text_color {
            tweaks.push(Tweak::PanelTextColor(color.clone()));
        }
        if self.launchpad {
            tweaks.push(Tweak::Launchpad);
        }
        tweaks
    }
}

impl Cli {
    pub fn selection(&self) -> Selection {
        Selection {
            all: self.accents.all,
            flavors: self.flavors.selected(),
            accents: self.accents.selected(),
        }
    }

    /// Whether any color flag asks for an install
    pub fn wants_install(&self) -> bool {
        let selection = self.selection();
        selection.all
            || !selection.flavors.is_empty()
            || !selection.accents.is_empty()
            || self.custom.hue.is_some()
    }
}
