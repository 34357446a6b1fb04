//! Color types and conversions
//!
//! Channels are stored as `f64` in `0.0..=1.0`. Hue is exposed in degrees at
//! the API surface and normalized to `0.0..1.0` internally, matching the
//! usual HLS conventions.

use crate::error::{Result, ThemeError};

/// Multiplier applied to the accent lightness to derive its hover shade
pub const HOVER_LIGHTNESS_FACTOR: f64 = 1.1;

/// RGBA color with f64 components (0.0 to 1.0)
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Color {
    pub r: f64,
    pub g: f64,
    pub b: f64,
    pub a: f64,
}

impl Color {
    pub const WHITE: Color = Color::rgb(1.0, 1.0, 1.0);
    pub const BLACK: Color = Color::rgb(0.0, 0.0, 0.0);

    pub const fn new(r: f64, g: f64, b: f64, a: f64) -> Self {
        Self { r, g, b, a }
    }

    pub const fn rgb(r: f64, g: f64, b: f64) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    /// Create from u8 color components and a 0-1 alpha
    pub fn from_rgb8(r: u8, g: u8, b: u8, a: f64) -> Self {
        Self {
            r: r as f64 / 255.0,
            g: g as f64 / 255.0,
            b: b as f64 / 255.0,
            a,
        }
    }

    /// Parse `#RRGGBB` or `#RRGGBBAA` (the `#` is optional)
    pub fn from_hex(hex: &str) -> Result<Self> {
        let (r, g, b, a) = hex_to_rgba(hex)?;
        Ok(Self::from_rgb8(r, g, b, a))
    }

    /// Create from hue in degrees and saturation/lightness in 0-1
    pub fn from_hsl(hue: f64, saturation: f64, lightness: f64, alpha: f64) -> Self {
        let (r, g, b) = hsl_to_rgb(
            hue.rem_euclid(360.0) / 360.0,
            saturation.clamp(0.0, 1.0),
            lightness.clamp(0.0, 1.0),
        );
        Self { r, g, b, a: alpha }
    }

    /// Hue in degrees, saturation and lightness in 0-1
    pub fn to_hsl(&self) -> (f64, f64, f64) {
        let (h, s, l) = rgb_to_hsl(self.r, self.g, self.b);
        (h * 360.0, s, l)
    }

    /// Set alpha and return new color
    pub fn with_alpha(self, alpha: f64) -> Self {
        Self { a: alpha, ..self }
    }

    /// Scale lightness by `factor`, keeping hue and saturation
    pub fn adjust_lightness(self, factor: f64) -> Self {
        let (h, s, l) = rgb_to_hsl(self.r, self.g, self.b);
        let l = (l * factor).clamp(0.0, 1.0);
        let (r, g, b) = hsl_to_rgb(h, s, l);
        Self { r, g, b, a: self.a }
    }

    /// Convert to u8 array [r, g, b]
    pub fn to_rgb8(&self) -> [u8; 3] {
        [channel8(self.r), channel8(self.g), channel8(self.b)]
    }

    /// `#rrggbb`, alpha dropped
    pub fn to_hex(&self) -> String {
        let [r, g, b] = self.to_rgb8();
        format!("#{r:02x}{g:02x}{b:02x}")
    }

    /// CSS `rgba(r, g, b, a)` notation
    pub fn to_css_rgba(&self) -> String {
        let [r, g, b] = self.to_rgb8();
        format!("rgba({r}, {g}, {b}, {})", self.a)
    }
}

fn channel8(value: f64) -> u8 {
    (value.clamp(0.0, 1.0) * 255.0).round() as u8
}

/// Convert hex(a) to (r, g, b, alpha)
///
/// Accepts an optional leading `#` followed by exactly six or eight hex
/// digits. Six digits imply an opaque color.
pub fn hex_to_rgba(hex: &str) -> Result<(u8, u8, u8, f64)> {
    let digits = hex.strip_prefix('#').unwrap_or(hex);
    if !matches!(digits.len(), 6 | 8) || !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
        return Err(ThemeError::InvalidHex(hex.to_string()));
    }

    let byte = |i: usize| {
        u8::from_str_radix(&digits[i..i + 2], 16)
            .map_err(|_| ThemeError::InvalidHex(hex.to_string()))
    };

    let alpha = if digits.len() == 8 {
        byte(6)? as f64 / 255.0
    } else {
        1.0
    };

    Ok((byte(0)?, byte(2)?, byte(4)?, alpha))
}

/// HLS to RGB, every value in 0-1 (hue wraps)
pub fn hsl_to_rgb(h: f64, s: f64, l: f64) -> (f64, f64, f64) {
    if s == 0.0 {
        return (l, l, l);
    }

    let m2 = if l <= 0.5 { l * (1.0 + s) } else { l + s - l * s };
    let m1 = 2.0 * l - m2;

    (
        hue_channel(m1, m2, h + 1.0 / 3.0),
        hue_channel(m1, m2, h),
        hue_channel(m1, m2, h - 1.0 / 3.0),
    )
}

fn hue_channel(m1: f64, m2: f64, hue: f64) -> f64 {
    let hue = hue.rem_euclid(1.0);
    if hue < 1.0 / 6.0 {
        m1 + (m2 - m1) * hue * 6.0
    } else if hue < 0.5 {
        m2
    } else if hue < 2.0 / 3.0 {
        m1 + (m2 - m1) * (2.0 / 3.0 - hue) * 6.0
    } else {
        m1
    }
}

/// RGB to HLS, every value in 0-1
pub fn rgb_to_hsl(r: f64, g: f64, b: f64) -> (f64, f64, f64) {
    let max = r.max(g).max(b);
    let min = r.min(g).min(b);
    let l = (max + min) / 2.0;

    if max == min {
        return (0.0, 0.0, l);
    }

    let d = max - min;
    let s = if l <= 0.5 {
        d / (max + min)
    } else {
        d / (2.0 - max - min)
    };

    let rc = (max - r) / d;
    let gc = (max - g) / d;
    let bc = (max - b) / d;

    let h = if r == max {
        bc - gc
    } else if g == max {
        2.0 + rc - bc
    } else {
        4.0 + gc - rc
    };

    ((h / 6.0).rem_euclid(1.0), s, l)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const EPS: f64 = 1e-6;

    fn hue_distance(a: f64, b: f64) -> f64 {
        let d = (a - b).abs().rem_euclid(1.0);
        d.min(1.0 - d)
    }

    #[test]
    fn hex_accepts_six_and_eight_digits() {
        assert_eq!(hex_to_rgba("#74c7ec").unwrap(), (0x74, 0xc7, 0xec, 1.0));
        assert_eq!(hex_to_rgba("1e1e2e").unwrap(), (0x1e, 0x1e, 0x2e, 1.0));

        let (r, g, b, a) = hex_to_rgba("#ffffff00").unwrap();
        assert_eq!((r, g, b), (255, 255, 255));
        assert_eq!(a, 0.0);
    }

    #[test]
    fn hex_rejects_malformed_input() {
        for bad in ["", "#", "#fff", "#12345", "#1234567", "#123456789", "#zzzzzz", "12 456"] {
            let err = hex_to_rgba(bad).unwrap_err();
            assert_eq!(err.to_string(), format!("Invalid HEX color code: {bad}"));
        }
    }

    #[test]
    fn hover_lightens_gray() {
        let hover = Color::from_hex("#808080")
            .unwrap()
            .adjust_lightness(HOVER_LIGHTNESS_FACTOR);
        assert_eq!(hover.to_hex(), "#8d8d8d");
    }

    #[test]
    fn hover_clamps_at_white() {
        let hover = Color::WHITE.adjust_lightness(HOVER_LIGHTNESS_FACTOR);
        assert_eq!(hover.to_hex(), "#ffffff");
    }

    #[test]
    fn hover_keeps_hue() {
        let base = Color::from_hex("#74c7ec").unwrap();
        let hover = base.adjust_lightness(HOVER_LIGHTNESS_FACTOR);
        let (h0, _, l0) = base.to_hsl();
        let (h1, _, l1) = hover.to_hsl();
        assert!((h0 - h1).abs() < 1.0, "hue drifted: {h0} -> {h1}");
        assert!(l1 > l0);
    }

    #[test]
    fn primary_hues_convert() {
        assert_eq!(Color::from_hsl(0.0, 1.0, 0.5, 1.0).to_rgb8(), [255, 0, 0]);
        assert_eq!(Color::from_hsl(120.0, 1.0, 0.5, 1.0).to_rgb8(), [0, 255, 0]);
        assert_eq!(Color::from_hsl(240.0, 1.0, 0.5, 1.0).to_rgb8(), [0, 0, 255]);
        assert_eq!(Color::from_hsl(360.0, 1.0, 0.5, 1.0).to_rgb8(), [255, 0, 0]);
    }

    #[test]
    fn css_rgba_format() {
        let color = Color::from_hsl(0.0, 0.0, 1.0, 0.85);
        assert_eq!(color.to_css_rgba(), "rgba(255, 255, 255, 0.85)");
        assert_eq!(Color::BLACK.to_css_rgba(), "rgba(0, 0, 0, 1)");
    }

    proptest! {
        #[test]
        fn valid_hex_components_in_range(r: u8, g: u8, b: u8, a: u8, with_alpha: bool, hash: bool) {
            let mut hex = format!("{}{r:02x}{g:02x}{b:02x}", if hash { "#" } else { "" });
            if with_alpha {
                hex.push_str(&format!("{a:02X}"));
            }
            let (pr, pg, pb, pa) = hex_to_rgba(&hex).unwrap();
            prop_assert_eq!((pr, pg, pb), (r, g, b));
            prop_assert!((0.0..=1.0).contains(&pa));
        }

        #[test]
        fn wrong_length_hex_is_rejected(digits in "[0-9a-f]{0,12}") {
            prop_assume!(digits.len() != 6 && digits.len() != 8);
            prop_assert!(hex_to_rgba(&digits).is_err());
        }

        #[test]
        fn hsl_round_trips(h in 0.0f64..360.0, s in 0.01f64..=1.0, l in 0.01f64..0.99) {
            let (r, g, b) = hsl_to_rgb(h / 360.0, s, l);
            for channel in [r, g, b] {
                prop_assert!((-EPS..=1.0 + EPS).contains(&channel));
            }

            let (h2, s2, l2) = rgb_to_hsl(r, g, b);
            prop_assert!((l - l2).abs() < EPS, "lightness {} -> {}", l, l2);
            prop_assert!((s - s2).abs() < 1e-4, "saturation {} -> {}", s, s2);
            prop_assert!(hue_distance(h / 360.0, h2) < 1e-4, "hue {} -> {}", h, h2 * 360.0);
        }
    }
}
