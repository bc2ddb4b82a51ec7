// Color - 8-bit RGB color parsed from "#rrggbb" strings

use crate::error::GraphError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Opaque RGB color
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const BLACK: Color = Color::from_rgb(0, 0, 0);
    pub const WHITE: Color = Color::from_rgb(255, 255, 255);

    pub const fn from_rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

impl FromStr for Color {
    type Err = GraphError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || GraphError::InvalidConfiguration(format!("invalid color '{}'", s));

        let hex = s.trim().strip_prefix('#').ok_or_else(invalid)?;
        if hex.len() != 6 || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(invalid());
        }

        let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).map_err(|_| invalid());
        Ok(Color::from_rgb(channel(0)?, channel(2)?, channel(4)?))
    }
}

impl TryFrom<String> for Color {
    type Error = GraphError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Color> for String {
    fn from(color: Color) -> Self {
        color.to_string()
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_hex() {
        let color: Color = "#f0fd96".parse().unwrap();
        assert_eq!(color, Color::from_rgb(0xf0, 0xfd, 0x96));
        assert_eq!(color.to_string(), "#f0fd96");

        let upper: Color = "#FF71F1".parse().unwrap();
        assert_eq!(upper, Color::from_rgb(0xff, 0x71, 0xf1));
    }

    #[test]
    fn test_rejects_malformed() {
        for bad in ["f0fd96", "#f0fd9", "#f0fd9g", "#", "", "#éééé", "#+f+f+f"] {
            let err = bad.parse::<Color>().unwrap_err();
            assert!(matches!(err, GraphError::InvalidConfiguration(_)), "{bad}");
        }
    }

    #[test]
    fn test_serde_as_string() {
        let json = serde_json::to_string(&Color::from_rgb(0x84, 0x84, 0x84)).unwrap();
        assert_eq!(json, "\"#848484\"");

        let back: Color = serde_json::from_str(&json).unwrap();
        assert_eq!(back, Color::from_rgb(0x84, 0x84, 0x84));
        assert!(serde_json::from_str::<Color>("\"red\"").is_err());
    }
}
