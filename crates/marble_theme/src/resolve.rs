//! Color resolution: turn a request into ordered keyword replacements

use tracing::debug;

use crate::color::{Color, HOVER_LIGHTNESS_FACTOR};
use crate::error::{Result, ThemeError};
use crate::schema::{ColorSchema, ElementShade, Mode};

/// Keyword that receives the accent color in flavor installs
pub const ACCENT_KEYWORD: &str = "@accent-color";
/// Keyword that receives the lightened accent in flavor installs
pub const ACCENT_HOVER_KEYWORD: &str = "@accent-color-hover";

/// Ordered (keyword, replacement) pairs
///
/// Pairs are applied in insertion order, so a keyword that is a prefix of
/// another must be pushed after it.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Replacements {
    pairs: Vec<(String, String)>,
}

impl Replacements {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, keyword: impl Into<String>, replacement: impl Into<String>) {
        self.pairs.push((keyword.into(), replacement.into()));
    }

    pub fn with(mut self, keyword: impl Into<String>, replacement: impl Into<String>) -> Self {
        self.push(keyword, replacement);
        self
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.pairs.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn get(&self, keyword: &str) -> Option<&str> {
        self.iter().find(|(k, _)| *k == keyword).map(|(_, v)| v)
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// Apply every pair to `text` in order
    pub fn apply(&self, text: &str) -> String {
        self.iter()
            .fold(text.to_string(), |acc, (keyword, replacement)| {
                acc.replace(keyword, replacement)
            })
    }
}

/// Replacements for a flavor/accent install
///
/// Emits the hover and accent keywords first, then `@<name>` for every
/// palette color and every accent of the flavor, in schema order.
pub fn palette_replacements(schema: &ColorSchema, flavor: &str, accent: &str) -> Result<Replacements> {
    let palette = schema.flavor(flavor)?;
    let accent_hex = palette
        .accent(accent)
        .ok_or_else(|| ThemeError::UnknownAccent {
            flavor: flavor.to_string(),
            accent: accent.to_string(),
        })?;

    let hover = Color::from_hex(accent_hex)?.adjust_lightness(HOVER_LIGHTNESS_FACTOR);

    let mut replacements = Replacements::new()
        .with(ACCENT_HOVER_KEYWORD, hover.to_hex())
        .with(ACCENT_KEYWORD, accent_hex);

    for (name, value) in palette.palette.iter().chain(palette.accents.iter()) {
        replacements.push(format!("@{name}"), value.as_str());
    }

    Ok(replacements)
}

/// Replacements for a custom hue install
///
/// `saturation` is a percentage multiplier applied to elements that follow
/// the accent hue; 100 leaves them unchanged. `@accent-color-hover` is
/// always derived from the resolved `@accent-color` and pushed before it.
pub fn hue_replacements(
    schema: &ColorSchema,
    hue: f64,
    mode: Mode,
    saturation: Option<f64>,
) -> Result<Replacements> {
    let multiplier = saturation.unwrap_or(100.0) / 100.0;
    let mut replacements = Replacements::new();

    for (keyword, element) in &schema.elements {
        if keyword == ACCENT_HOVER_KEYWORD {
            debug!("hover color is derived from the accent, table entry ignored");
            continue;
        }

        let Some(shade) = element.shade(mode) else {
            debug!(keyword = %keyword, %mode, "element has no shade for mode");
            continue;
        };

        let color = match shade {
            ElementShade::Literal(hex) => Color::from_hex(hex)?,
            ElementShade::Hsla(hsla) => {
                let (element_hue, scale) = match hsla.h {
                    Some(fixed) => (fixed, 1.0),
                    None => (hue, multiplier),
                };
                Color::from_hsl(
                    element_hue,
                    (hsla.s / 100.0 * scale).clamp(0.0, 1.0),
                    hsla.l / 100.0,
                    hsla.a,
                )
            }
        };

        if keyword == ACCENT_KEYWORD {
            let hover = color.adjust_lightness(HOVER_LIGHTNESS_FACTOR);
            replacements.push(ACCENT_HOVER_KEYWORD, hover.to_css_rgba());
        }
        replacements.push(keyword.as_str(), color.to_css_rgba());
    }

    Ok(replacements)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn schema() -> ColorSchema {
        ColorSchema::parse(
            r##"{
                "flavors": {
                    "mocha": {
                        "mode": "dark",
                        "palette": { "base": "#1e1e2e", "text": "#cdd6f4" },
                        "accents": { "red": "#f38ba8", "sapphire": "#74c7ec" }
                    }
                },
                "elements": {
                    "ACCENT-COLOR": { "light": { "s": 100, "l": 50 }, "dark": { "s": 100, "l": 50, "a": 0.5 } },
                    "TEXT-WHITE-COLOR": { "dark": { "h": 0, "s": 0, "l": 100, "a": 0.85 } },
                    "SHADOW-COLOR": { "dark": "#000000ff" }
                }
            }"##,
        )
        .unwrap()
    }

    #[test]
    fn palette_lists_hover_before_accent() {
        let replacements = palette_replacements(&schema(), "mocha", "sapphire").unwrap();
        let keywords: Vec<&str> = replacements.iter().map(|(k, _)| k).collect();
        assert_eq!(
            keywords,
            vec![
                "@accent-color-hover",
                "@accent-color",
                "@base",
                "@text",
                "@red",
                "@sapphire"
            ]
        );
        assert_eq!(replacements.get("@accent-color"), Some("#74c7ec"));

        let css = replacements.apply("a { color: @accent-color; } a:hover { color: @accent-color-hover; }");
        assert!(!css.contains("@accent"));
        assert!(!css.contains("-hover"));
    }

    #[test]
    fn palette_rejects_unknown_accent() {
        let err = palette_replacements(&schema(), "mocha", "chartreuse").unwrap_err();
        assert!(matches!(err, ThemeError::UnknownAccent { .. }));
    }

    #[test]
    fn hue_follows_requested_hue() {
        let replacements = hue_replacements(&schema(), 120.0, Mode::Dark, None).unwrap();
        assert_eq!(replacements.get("ACCENT-COLOR"), Some("rgba(0, 255, 0, 0.5)"));
        assert_eq!(
            replacements.get("TEXT-WHITE-COLOR"),
            Some("rgba(255, 255, 255, 0.85)")
        );
        assert_eq!(
            replacements.get("SHADOW-COLOR"),
            Some("rgba(0, 0, 0, 1)")
        );
    }

    #[test]
    fn hue_skips_elements_missing_the_mode() {
        let replacements = hue_replacements(&schema(), 0.0, Mode::Light, None).unwrap();
        assert_eq!(replacements.len(), 1);
        assert_eq!(replacements.get("ACCENT-COLOR"), Some("rgba(255, 0, 0, 1)"));
    }

    #[test]
    fn saturation_multiplier_only_scales_accent_elements() {
        let replacements = hue_replacements(&schema(), 0.0, Mode::Dark, Some(0.0)).unwrap();
        assert_eq!(replacements.get("ACCENT-COLOR"), Some("rgba(128, 128, 128, 0.5)"));
        assert_eq!(
            replacements.get("TEXT-WHITE-COLOR"),
            Some("rgba(255, 255, 255, 0.85)")
        );
    }

    #[test]
    fn hue_hover_is_derived_from_accent() {
        let schema = ColorSchema::parse(
            r##"{
                "elements": {
                    "@accent-color-hover": { "light": { "s": 10, "l": 10 } },
                    "@base": { "light": { "s": 15, "l": 95 } },
                    "@accent-color": { "light": { "s": 70, "l": 48 } }
                }
            }"##,
        )
        .unwrap();

        let replacements = hue_replacements(&schema, 210.0, Mode::Light, None).unwrap();
        let keywords: Vec<&str> = replacements.iter().map(|(k, _)| k).collect();
        assert_eq!(keywords, vec!["@base", "@accent-color-hover", "@accent-color"]);

        let accent = Color::from_hsl(210.0, 0.7, 0.48, 1.0);
        let hover = accent.adjust_lightness(HOVER_LIGHTNESS_FACTOR);
        assert_eq!(replacements.get("@accent-color"), Some(accent.to_css_rgba().as_str()));
        assert_eq!(
            replacements.get("@accent-color-hover"),
            Some(hover.to_css_rgba().as_str())
        );
    }

    #[test]
    fn apply_runs_pairs_in_order() {
        let replacements = Replacements::new().with("A", "B").with("B", "C");
        assert_eq!(replacements.apply("A B"), "C C");
    }
}
