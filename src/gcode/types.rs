//! Value types shared by the emitter and its callers.

use crate::error::GcodeError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Tracked machine position
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Position {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Position {
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    pub fn origin() -> Self {
        Self::default()
    }
}

/// Measurement unit selected on the machine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Unit {
    #[serde(rename = "mm", alias = "millimeters")]
    Millimeters,
    #[serde(rename = "in", alias = "inches")]
    Inches,
}

impl Unit {
    /// G-code word selecting this unit
    pub fn code(&self) -> &'static str {
        match self {
            Unit::Millimeters => "G21",
            Unit::Inches => "G20",
        }
    }
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Millimeters => write!(f, "mm"),
            Self::Inches => write!(f, "in"),
        }
    }
}

impl FromStr for Unit {
    type Err = GcodeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "mm" | "millimeters" | "millimetres" => Ok(Self::Millimeters),
            "in" | "inch" | "inches" => Ok(Self::Inches),
            _ => Err(GcodeError::UnknownUnit(s.to_string())),
        }
    }
}

/// How the machine interprets coordinates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CoordinateMode {
    #[default]
    Absolute,
    Relative,
}

impl CoordinateMode {
    pub fn code(&self) -> &'static str {
        match self {
            CoordinateMode::Absolute => "G90",
            CoordinateMode::Relative => "G91",
        }
    }
}

/// Machine `S` range that normalized laser power is scaled into
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PowerRange {
    pub min: u32,
    pub max: u32,
}

impl Default for PowerRange {
    fn default() -> Self {
        Self { min: 0, max: 1000 }
    }
}

impl PowerRange {
    pub fn new(min: u32, max: u32) -> Self {
        Self { min, max }
    }

    /// Linear map of a power already known to be inside [0, 1]
    pub fn scale(&self, power: f64) -> u32 {
        let min = self.min as f64;
        let max = self.max as f64;
        (min + power * (max - min)).round() as u32
    }
}

/// Construction parameters for [`crate::gcode::Emitter`]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EmitterConfig {
    /// Operation tolerance; coordinate precision is derived from it
    pub tolerance: f64,
    pub power_range: PowerRange,
}

impl Default for EmitterConfig {
    fn default() -> Self {
        Self {
            tolerance: 1e-3,
            power_range: PowerRange::default(),
        }
    }
}

impl EmitterConfig {
    pub fn validate(&self) -> Result<(), GcodeError> {
        if !self.tolerance.is_finite() || self.tolerance <= 0.0 {
            return Err(GcodeError::InvalidConfig(format!(
                "tolerance must be a positive number, got {}",
                self.tolerance
            )));
        }
        if self.power_range.min > self.power_range.max {
            return Err(GcodeError::InvalidConfig(format!(
                "minimum power {} is greater than maximum power {}",
                self.power_range.min, self.power_range.max
            )));
        }
        Ok(())
    }

    /// Decimal places used for coordinates: |round(log10(tolerance))|
    pub fn precision(&self) -> usize {
        self.tolerance.log10().round().abs() as usize
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unit_from_str() {
        assert_eq!("mm".parse::<Unit>().unwrap(), Unit::Millimeters);
        assert_eq!("Inches".parse::<Unit>().unwrap(), Unit::Inches);
        let err = "cm".parse::<Unit>().unwrap_err();
        assert_eq!(err, GcodeError::UnknownUnit("cm".to_string()));
    }

    #[test]
    fn test_precision_law() {
        let cfg = |tolerance| EmitterConfig {
            tolerance,
            ..Default::default()
        };
        assert_eq!(cfg(0.1).precision(), 1);
        assert_eq!(cfg(0.01).precision(), 2);
        assert_eq!(cfg(0.001).precision(), 3);
        assert_eq!(cfg(1.0).precision(), 0);
        // log10(0.004) = -2.39 rounds to -2
        assert_eq!(cfg(0.004).precision(), 2);
        // log10(0.003) = -2.52 rounds to -3
        assert_eq!(cfg(0.003).precision(), 3);
    }

    #[test]
    fn test_validate_rejects_bad_config() {
        let zero = EmitterConfig {
            tolerance: 0.0,
            ..Default::default()
        };
        assert!(zero.validate().is_err());

        let inverted = EmitterConfig {
            power_range: PowerRange::new(500, 100),
            ..Default::default()
        };
        assert!(inverted.validate().is_err());
        assert!(EmitterConfig::default().validate().is_ok());
    }

    #[test]
    fn test_power_scale() {
        let range = PowerRange::new(100, 300);
        assert_eq!(range.scale(0.0), 100);
        assert_eq!(range.scale(0.5), 200);
        assert_eq!(range.scale(1.0), 300);
    }
}
