// X-dimension + resolution (`--scalexdimdp`) parsing and scale arithmetic
//
// Format: `<number>(mm|in),<number>(dpi|dpmm)`, e.g. `0.33mm,300dpi`.

use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;

use crate::error::ZintError;

pub const MILS_PER_MM: f64 = 39.3701;
pub const MM_PER_INCH: f64 = 25.4;

/// Validation pattern for the X-dimension/resolution string (whitespace tolerant).
pub const XDIM_PATTERN: &str = r"^\s*(\d+(?:\.\d+)?)(mm|in)\s*,\s*(\d+(?:\.\d+)?)\s*(dpi|dpmm)\s*$";

pub(crate) static XDIM_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(XDIM_PATTERN).expect("X-dimension pattern must compile"));

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum XDimUnit {
    Mm,
    In,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolutionUnit {
    Dpi,
    Dpmm,
}

/// パース済みの X-dimension と出力解像度。
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct XDimResolution {
    pub x_dim: f64,
    pub x_unit: XDimUnit,
    pub resolution: f64,
    pub resolution_unit: ResolutionUnit,
}

impl XDimResolution {
    /// X-dimension in millimetres.
    pub fn x_dim_mm(&self) -> f64 {
        match self.x_unit {
            XDimUnit::Mm => self.x_dim,
            XDimUnit::In => self.x_dim * MM_PER_INCH,
        }
    }

    /// Resolution in dots per millimetre.
    pub fn dots_per_mm(&self) -> f64 {
        match self.resolution_unit {
            ResolutionUnit::Dpmm => self.resolution,
            ResolutionUnit::Dpi => self.resolution / MM_PER_INCH,
        }
    }

    /// 等価な `--scale` 値。
    ///
    /// 1 X-dimension あたりのピクセル数を整数に丸め（0.5 は切り上げ）、
    /// zint の scale 単位（1.0 = 2 px）に換算する。
    pub fn scale(&self) -> f64 {
        (self.x_dim_mm() * self.dots_per_mm()).round() / 2.0
    }
}

impl FromStr for XDimResolution {
    type Err = ZintError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let caps = XDIM_RE.captures(s).ok_or_else(|| {
            ZintError::format(format!(
                "X-dimension must look like <value>(mm|in),<res>(dpi|dpmm), got '{s}'"
            ))
        })?;

        let number = |i: usize| {
            caps[i]
                .parse::<f64>()
                .map_err(|e| ZintError::format(format!("invalid number '{}': {e}", &caps[i])))
        };

        let x_unit = match &caps[2] {
            "mm" => XDimUnit::Mm,
            _ => XDimUnit::In,
        };
        let resolution_unit = match &caps[4] {
            "dpi" => ResolutionUnit::Dpi,
            _ => ResolutionUnit::Dpmm,
        };

        Ok(Self {
            x_dim: number(1)?,
            x_unit,
            resolution: number(3)?,
            resolution_unit,
        })
    }
}

impl fmt::Display for XDimResolution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let x_unit = match self.x_unit {
            XDimUnit::Mm => "mm",
            XDimUnit::In => "in",
        };
        let res_unit = match self.resolution_unit {
            ResolutionUnit::Dpi => "dpi",
            ResolutionUnit::Dpmm => "dpmm",
        };
        write!(f, "{}{x_unit},{}{res_unit}", self.x_dim, self.resolution)
    }
}

pub fn mm_to_mils(mm: f64) -> f64 {
    mm * MILS_PER_MM
}

pub fn mils_to_mm(mils: f64) -> f64 {
    mils / MILS_PER_MM
}

pub fn dpi_to_dpmm(dpi: u32) -> u32 {
    (f64::from(dpi) / MM_PER_INCH).round() as u32
}

/// X-dimension（mils）と DPI から scale を求める。[`XDimResolution::scale`] と同じ丸め規則。
pub fn scale_from_mils(x_dim_mils: f64, dpi: f64) -> f64 {
    (x_dim_mils / 1000.0 * dpi).round() / 2.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_mm_dpi() {
        let x: XDimResolution = "0.33mm,300dpi".parse().expect("valid");
        assert_eq!(x.x_unit, XDimUnit::Mm);
        assert_eq!(x.resolution_unit, ResolutionUnit::Dpi);
        assert_eq!(x.to_string(), "0.33mm,300dpi");
    }

    #[test]
    fn test_parse_tolerates_whitespace_and_normalizes() {
        let x: XDimResolution = " 0.013in , 12 dpmm ".parse().expect("valid");
        assert_eq!(x.to_string(), "0.013in,12dpmm");
    }

    #[test]
    fn test_parse_rejects_malformed() {
        assert!("0.33cm,300dpi".parse::<XDimResolution>().is_err());
        assert!("0.33mm".parse::<XDimResolution>().is_err());
        assert!("".parse::<XDimResolution>().is_err());
    }

    #[test]
    fn test_scale_rounding() {
        // 0.5mm * 11.811 dpmm ≈ 5.9 px → 6 px → scale 3
        let x: XDimResolution = "0.5mm,300dpi".parse().unwrap();
        assert_eq!(x.scale(), 3.0);
        assert_eq!(scale_from_mils(20.0, 300.0), 3.0);
    }

    #[test]
    fn test_unit_conversions() {
        assert!((mils_to_mm(mm_to_mils(0.33)) - 0.33).abs() < 1e-9);
        assert_eq!(dpi_to_dpmm(300), 12);
        assert_eq!(dpi_to_dpmm(600), 24);
    }
}
