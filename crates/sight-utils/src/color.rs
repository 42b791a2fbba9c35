use core::fmt;
use core::str::FromStr;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ColorError {
    #[error("hex color `{0}` must have 6 (RGB) or 8 (RGBA) digits")]
    InvalidLength(String),
    #[error("hex color `{0}` contains a non-hex digit")]
    InvalidDigit(String),
}

/// 8-bit-per-channel color, typically parsed from a hex code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Rgba8 {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba8 {
    pub const WHITE: Self = Self::rgb(0xFF, 0xFF, 0xFF);
    pub const BLACK: Self = Self::rgb(0, 0, 0);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 0xFF }
    }

    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Parse `RRGGBB` or `RRGGBBAA` (no `#` prefix). Alpha defaults to opaque.
    pub fn parse_hex(hex: &str) -> Result<Self, ColorError> {
        let bytes = hex.as_bytes();
        if bytes.len() != 6 && bytes.len() != 8 {
            return Err(ColorError::InvalidLength(hex.to_owned()));
        }

        let channel = |i: usize| -> Result<u8, ColorError> {
            let pair = &bytes[i * 2..i * 2 + 2];
            match (hex_digit(pair[0]), hex_digit(pair[1])) {
                (Some(hi), Some(lo)) => Ok((hi << 4) | lo),
                _ => Err(ColorError::InvalidDigit(hex.to_owned())),
            }
        };

        let a = if bytes.len() == 8 { channel(3)? } else { 0xFF };
        Ok(Self::rgba(channel(0)?, channel(1)?, channel(2)?, a))
    }

    /// Channels scaled to `0.0..=1.0`.
    pub fn to_f32_array(self) -> [f32; 4] {
        [self.r, self.g, self.b, self.a].map(|c| c as f32 / 255.0)
    }
}

fn hex_digit(c: u8) -> Option<u8> {
    match c {
        b'0'..=b'9' => Some(c - b'0'),
        b'a'..=b'f' => Some(c - b'a' + 10),
        b'A'..=b'F' => Some(c - b'A' + 10),
        _ => None,
    }
}

impl FromStr for Rgba8 {
    type Err = ColorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse_hex(s)
    }
}

impl fmt::Display for Rgba8 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02X}{:02X}{:02X}{:02X}", self.r, self.g, self.b, self.a)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_rgb_with_opaque_alpha() {
        assert_eq!(Rgba8::parse_hex("ff8000"), Ok(Rgba8::rgba(0xFF, 0x80, 0x00, 0xFF)));
    }

    #[test]
    fn parses_rgba_mixed_case() {
        assert_eq!("1aB2c340".parse(), Ok(Rgba8::rgba(0x1A, 0xB2, 0xC3, 0x40)));
    }

    #[test]
    fn rejects_bad_length() {
        for hex in ["", "fff", "fffff", "fffffff", "fffffffff"] {
            assert_eq!(
                Rgba8::parse_hex(hex),
                Err(ColorError::InvalidLength(hex.to_owned()))
            );
        }
    }

    #[test]
    fn rejects_non_hex_digits() {
        assert!(matches!(
            Rgba8::parse_hex("12345g"),
            Err(ColorError::InvalidDigit(_))
        ));
        assert!(matches!(
            Rgba8::parse_hex("#12345"),
            Err(ColorError::InvalidDigit(_))
        ));
        // Multi-byte characters can't split a channel in half.
        assert!(Rgba8::parse_hex("ééé").is_err());
    }

    #[test]
    fn display_roundtrips() {
        let color = Rgba8::rgba(1, 2, 3, 4);
        assert_eq!(color.to_string(), "01020304");
        assert_eq!(color.to_string().parse(), Ok(color));
    }

    #[test]
    fn float_channels() {
        assert_eq!(Rgba8::WHITE.to_f32_array(), [1.0; 4]);
        assert_eq!(Rgba8::BLACK.to_f32_array(), [0.0, 0.0, 0.0, 1.0]);
    }
}
