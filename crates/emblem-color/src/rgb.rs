//! RGB color value type.

use std::fmt;
use std::str::FromStr;

/// An opaque RGB color with 8-bit channels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Rgb {
    /// Red channel.
    pub r: u8,
    /// Green channel.
    pub g: u8,
    /// Blue channel.
    pub b: u8,
}

impl Rgb {
    /// Construct a color from its channels.
    #[must_use]
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

impl fmt::Display for Rgb {
    /// Formats as a lowercase `rrggbb` hex triplet.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

/// Error parsing a hex color triplet.
#[derive(Debug, thiserror::Error)]
#[error("invalid hex color '{0}': expected rrggbb")]
pub struct ParseRgbError(String);

impl FromStr for Rgb {
    type Err = ParseRgbError;

    /// Parses `rrggbb` with an optional leading `#`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let hex = s.strip_prefix('#').unwrap_or(s);
        if hex.len() != 6 || !hex.is_ascii() {
            return Err(ParseRgbError(s.to_string()));
        }
        let channel = |range: std::ops::Range<usize>| {
            u8::from_str_radix(&hex[range], 16).map_err(|_| ParseRgbError(s.to_string()))
        };
        Ok(Self {
            r: channel(0..2)?,
            g: channel(2..4)?,
            b: channel(4..6)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::Rgb;

    #[test]
    fn test_hex_round_trip() {
        let color: Rgb = "cb1c1f".parse().unwrap();
        assert_eq!(color, Rgb::new(0xcb, 0x1c, 0x1f));
        assert_eq!(color.to_string(), "cb1c1f");
    }

    #[test]
    fn test_leading_hash_is_accepted() {
        let color: Rgb = "#f48024".parse().unwrap();
        assert_eq!(color, Rgb::new(0xf4, 0x80, 0x24));
    }

    #[test]
    fn test_malformed_hex_is_rejected() {
        assert!("f480".parse::<Rgb>().is_err());
        assert!("zzzzzz".parse::<Rgb>().is_err());
        assert!("f48024ff".parse::<Rgb>().is_err());
    }
}
