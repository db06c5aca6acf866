//! Palette colors and alpha packing.

use crate::error::{ConfigError, Result};
use serde::Deserialize;
use std::fmt;

/// An opaque palette color.
///
/// Deserialized from a `#rrggbb` hex string.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Deserialize)]
#[serde(try_from = "String")]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

/// A fill color with straight (unpremultiplied) alpha.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgb {
    pub const WHITE: Rgb = Rgb::new(0xff, 0xff, 0xff);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parses `#rrggbb` or `#rrggbbaa`. The leading `#` is optional and a
    /// trailing alpha pair is accepted but ignored.
    pub fn from_hex(s: &str) -> Result<Self> {
        let digits = s.strip_prefix('#').unwrap_or(s);
        if !(digits.len() == 6 || digits.len() == 8)
            || !digits.bytes().all(|b| b.is_ascii_hexdigit())
        {
            return Err(ConfigError::InvalidColor(s.to_string()));
        }

        let channel = |i: usize| {
            u8::from_str_radix(&digits[i..i + 2], 16)
                .map_err(|_| ConfigError::InvalidColor(s.to_string()))
        };
        Ok(Self::new(channel(0)?, channel(2)?, channel(4)?))
    }

    /// Combines this color with an opacity in `[0, 1]`.
    ///
    /// The alpha byte is `floor(opacity * 255)`, so an opacity of exactly
    /// `0.0` yields a fully transparent fill. Out-of-range opacities are
    /// clamped.
    pub fn with_alpha(self, opacity: f32) -> Rgba {
        let a = (opacity.clamp(0.0, 1.0) * 255.0).floor() as u8;
        Rgba {
            r: self.r,
            g: self.g,
            b: self.b,
            a,
        }
    }
}

impl Rgba {
    /// Packed `#rrggbbaa` form, as accepted by CSS-style paint APIs.
    pub fn to_hex(&self) -> String {
        format!("#{:02x}{:02x}{:02x}{:02x}", self.r, self.g, self.b, self.a)
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

impl TryFrom<String> for Rgb {
    type Error = ConfigError;

    fn try_from(value: String) -> Result<Self> {
        Rgb::from_hex(&value)
    }
}
