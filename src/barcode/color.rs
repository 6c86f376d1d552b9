use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ZintError;

/// RGB の前景色・背景色。zint には `RRGGBB`（大文字16進）で渡す。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ColorRgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl ColorRgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// `RRGGBB` 形式（先頭の `#` は任意）をパースする。
    ///
    /// 6桁の16進数でなければ [`ZintError::FormatError`] を返す。
    pub fn parse(s: &str) -> crate::error::Result<Self> {
        let hex = s.trim().trim_start_matches('#');
        if hex.len() != 6 || !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(ZintError::format(format!(
                "color must be 6 hex digits (RRGGBB), got '{s}'"
            )));
        }
        let channel = |i: usize| {
            u8::from_str_radix(&hex[i..i + 2], 16)
                .map_err(|e| ZintError::format(format!("invalid color channel in '{s}': {e}")))
        };
        Ok(Self::new(channel(0)?, channel(2)?, channel(4)?))
    }
}

impl fmt::Display for ColorRgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }
}

impl FromStr for ColorRgb {
    type Err = ZintError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for ColorRgb {
    type Error = ZintError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::parse(&s)
    }
}

impl From<ColorRgb> for String {
    fn from(c: ColorRgb) -> Self {
        c.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_and_format_uppercase() {
        let c = ColorRgb::parse("#1a2b3c").expect("valid color");
        assert_eq!(c, ColorRgb::new(0x1a, 0x2b, 0x3c));
        assert_eq!(c.to_string(), "1A2B3C");
    }

    #[test]
    fn test_parse_rejects_wrong_length() {
        assert!(matches!(
            ColorRgb::parse("FFF"),
            Err(ZintError::FormatError(_))
        ));
    }

    #[test]
    fn test_parse_rejects_non_hex() {
        assert!(ColorRgb::parse("GG0000").is_err());
        // multi-byte input must not panic on slicing
        assert!(ColorRgb::parse("ééé").is_err());
    }
}
