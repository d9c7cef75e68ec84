//! Color values for animation
//!
//! Colors are kept in CSS space: `r`, `g`, `b` in `0..=255` and alpha in `0..=1`.
//! Parsing never fails; malformed input becomes opaque black.

use crate::number::{format_fixed, parse_leading_f64};

/// RGBA color with 0-255 channels and 0-1 alpha
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Color {
    pub r: f64,
    pub g: f64,
    pub b: f64,
    pub a: f64,
}

impl Color {
    pub const BLACK: Color = Color::rgb(0.0, 0.0, 0.0);
    pub const WHITE: Color = Color::rgb(255.0, 255.0, 255.0);
    pub const TRANSPARENT: Color = Color::rgba(0.0, 0.0, 0.0, 0.0);

    pub const fn rgb(r: f64, g: f64, b: f64) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    pub const fn rgba(r: f64, g: f64, b: f64, a: f64) -> Self {
        Self { r, g, b, a }
    }

    /// Parse a 6-digit hex color, with or without the leading `#`
    pub fn from_hex_str(hex: &str) -> Option<Self> {
        let digits = hex.strip_prefix('#').unwrap_or(hex);
        if digits.len() != 6 || !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
            return None;
        }
        let channel = |i: usize| u8::from_str_radix(&digits[i..i + 2], 16).ok().map(f64::from);
        Some(Self::rgb(channel(0)?, channel(2)?, channel(4)?))
    }

    /// Parse an `rgb(r,g,b)` or `rgba(r,g,b,a)` string
    ///
    /// Missing or unparseable components default to 0 for the color channels
    /// and 1 for alpha. Returns `None` if the string is not in function notation.
    pub fn from_rgb_fn(value: &str) -> Option<Self> {
        let value = value.trim();
        let args = value
            .strip_prefix("rgba(")
            .or_else(|| value.strip_prefix("rgb("))?;
        let args = args.strip_suffix(')').unwrap_or(args);

        let mut parts = args.split(',').map(|part| parse_leading_f64(part.trim()));
        let mut next = |default: f64| parts.next().flatten().unwrap_or(default);
        let r = next(0.0);
        let g = next(0.0);
        let b = next(0.0);
        let a = next(1.0);
        Some(Self::rgba(r, g, b, a))
    }

    /// Parse any supported color notation, falling back to opaque black
    pub fn parse(value: &str) -> Self {
        Self::from_hex_str(value)
            .or_else(|| Self::from_rgb_fn(value))
            .unwrap_or_else(|| {
                tracing::trace!("Color: '{}' is not a recognized color, using black", value);
                Self::BLACK
            })
    }

    /// Interpolate each channel independently
    pub fn lerp(&self, other: &Self, t: f64) -> Self {
        Self {
            r: self.r + (other.r - self.r) * t,
            g: self.g + (other.g - self.g) * t,
            b: self.b + (other.b - self.b) * t,
            a: self.a + (other.a - self.a) * t,
        }
    }

    /// Serialize as `rgba(r,g,b,a)` with integer channels and one-decimal alpha
    pub fn to_css(&self) -> String {
        format!(
            "rgba({},{},{},{})",
            format_fixed(self.r, 0),
            format_fixed(self.g, 0),
            format_fixed(self.b, 0),
            format_fixed(self.a, 1)
        )
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::BLACK
    }
}

/// Whether a string is written in a color notation the engine passes through
pub fn is_color_literal(value: &str) -> bool {
    value.starts_with('#') || value.starts_with("rgb")
}

/// Normalize a color string for storage
///
/// Hex and `rgb`/`rgba` strings pass through unchanged; anything else becomes `#000000`.
pub fn normalize_color(value: &str) -> String {
    if is_color_literal(value) {
        value.to_string()
    } else {
        "#000000".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hex_parsing() {
        assert_eq!(Color::from_hex_str("#ff0000"), Some(Color::rgb(255.0, 0.0, 0.0)));
        assert_eq!(Color::from_hex_str("00FF80"), Some(Color::rgb(0.0, 255.0, 128.0)));
        assert_eq!(Color::from_hex_str("#fff"), None);
        assert_eq!(Color::from_hex_str("#gg0000"), None);
        assert_eq!(Color::from_hex_str("#ff00000"), None);
    }

    #[test]
    fn test_rgb_function_parsing() {
        assert_eq!(
            Color::from_rgb_fn("rgb(10, 20, 30)"),
            Some(Color::rgba(10.0, 20.0, 30.0, 1.0))
        );
        assert_eq!(
            Color::from_rgb_fn("rgba(255,255,255,0.5)"),
            Some(Color::rgba(255.0, 255.0, 255.0, 0.5))
        );
        // Missing components fall back to 0 / 1
        assert_eq!(
            Color::from_rgb_fn("rgb(10)"),
            Some(Color::rgba(10.0, 0.0, 0.0, 1.0))
        );
        assert_eq!(Color::from_rgb_fn("#ffffff"), None);
    }

    #[test]
    fn test_malformed_is_opaque_black() {
        assert_eq!(Color::parse("not-a-color"), Color::BLACK);
        assert_eq!(Color::parse(""), Color::BLACK);
        assert_eq!(Color::parse("#12345"), Color::BLACK);
        assert_eq!(Color::BLACK.a, 1.0);
    }

    #[test]
    fn test_lerp_and_css() {
        let red = Color::parse("#ff0000");
        let blue = Color::parse("#0000ff");
        assert_eq!(red.lerp(&blue, 0.0).to_css(), "rgba(255,0,0,1.0)");
        assert_eq!(red.lerp(&blue, 1.0).to_css(), "rgba(0,0,255,1.0)");
        assert_eq!(red.lerp(&blue, 0.5).to_css(), "rgba(128,0,128,1.0)");

        let faded = Color::WHITE.lerp(&Color::TRANSPARENT, 0.25);
        assert_eq!(faded.to_css(), "rgba(191,191,191,0.8)");
    }

    #[test]
    fn test_normalize_color() {
        assert_eq!(normalize_color("#abcdef"), "#abcdef");
        assert_eq!(normalize_color("rgba(1,2,3,0.4)"), "rgba(1,2,3,0.4)");
        assert_eq!(normalize_color("red"), "#000000");
        assert!(is_color_literal("rgb(0,0,0)"));
        assert!(!is_color_literal("transparent"));
    }
}
