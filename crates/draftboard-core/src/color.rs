//! Widget fill colors.

use peniko::Color;
use serde::{Deserialize, Serialize};

/// Serializable color representation (RGBA8).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SerializableColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl SerializableColor {
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub const fn black() -> Self {
        Self::new(0, 0, 0, 255)
    }

    pub const fn transparent() -> Self {
        Self::new(0, 0, 0, 0)
    }

    /// Parse `#rgb`, `#rrggbb` or `#rrggbbaa`. Anything else is black.
    pub fn from_hex(color: &str) -> Self {
        if color == "transparent" {
            return Self::transparent();
        }

        let Some(hex) = color.trim().strip_prefix('#') else {
            return Self::black();
        };
        if !hex.is_ascii() {
            return Self::black();
        }
        let channel = |s: &str| u8::from_str_radix(s, 16).unwrap_or(0);

        match hex.len() {
            3 => Self::new(
                channel(&hex[0..1]) * 17,
                channel(&hex[1..2]) * 17,
                channel(&hex[2..3]) * 17,
                255,
            ),
            6 => Self::new(channel(&hex[0..2]), channel(&hex[2..4]), channel(&hex[4..6]), 255),
            8 => Self::new(
                channel(&hex[0..2]),
                channel(&hex[2..4]),
                channel(&hex[4..6]),
                u8::from_str_radix(&hex[6..8], 16).unwrap_or(255),
            ),
            _ => Self::black(),
        }
    }

    /// Format as `#rrggbb`, or `#rrggbbaa` when not fully opaque.
    pub fn to_hex(&self) -> String {
        if self.a == 255 {
            format!("#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
        } else {
            format!("#{:02X}{:02X}{:02X}{:02X}", self.r, self.g, self.b, self.a)
        }
    }
}

impl Default for SerializableColor {
    fn default() -> Self {
        Self::black()
    }
}

impl From<Color> for SerializableColor {
    fn from(color: Color) -> Self {
        let rgba = color.to_rgba8();
        Self {
            r: rgba.r,
            g: rgba.g,
            b: rgba.b,
            a: rgba.a,
        }
    }
}

impl From<SerializableColor> for Color {
    fn from(color: SerializableColor) -> Self {
        Color::from_rgba8(color.r, color.g, color.b, color.a)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_hex() {
        assert_eq!(
            SerializableColor::from_hex("#3B82F6"),
            SerializableColor::new(0x3B, 0x82, 0xF6, 255)
        );
        assert_eq!(SerializableColor::from_hex("#fff"), SerializableColor::new(255, 255, 255, 255));
        assert_eq!(SerializableColor::from_hex("#00000080"), SerializableColor::new(0, 0, 0, 0x80));
        assert_eq!(SerializableColor::from_hex("transparent"), SerializableColor::transparent());
    }

    #[test]
    fn test_parse_invalid_is_black() {
        assert_eq!(SerializableColor::from_hex("blue"), SerializableColor::black());
        assert_eq!(SerializableColor::from_hex("#12345"), SerializableColor::black());
    }

    #[test]
    fn test_to_hex() {
        assert_eq!(SerializableColor::from_hex("#10b981").to_hex(), "#10B981");
        assert_eq!(SerializableColor::new(1, 2, 3, 4).to_hex(), "#01020304");
    }

    #[test]
    fn test_peniko_conversion() {
        let color = SerializableColor::new(239, 68, 68, 255);
        let peniko_color: Color = color.into();
        assert_eq!(SerializableColor::from(peniko_color), color);
    }
}
