//! Unit conversion utilities
//!
//! Handles conversion between feet (the local site-plan unit) and metres
//! (the projected-coordinate unit). Conversions use the fixed factor
//! [`FEET_PER_METER`] so a round trip returns the input within float tolerance.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::constants::FEET_PER_METER;

/// Length unit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LengthUnit {
    /// International feet (site-plan space)
    #[default]
    Feet,
    /// Metres (projected space)
    Meters,
}

impl LengthUnit {
    /// Converts `value` expressed in `self` into `target` units.
    pub fn convert(self, value: f64, target: LengthUnit) -> f64 {
        match (self, target) {
            (LengthUnit::Feet, LengthUnit::Meters) => feet_to_meters(value),
            (LengthUnit::Meters, LengthUnit::Feet) => meters_to_feet(value),
            _ => value,
        }
    }

    /// Short suffix used when formatting lengths.
    pub fn suffix(self) -> &'static str {
        match self {
            LengthUnit::Feet => "ft",
            LengthUnit::Meters => "m",
        }
    }
}

impl fmt::Display for LengthUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Feet => write!(f, "Feet"),
            Self::Meters => write!(f, "Meters"),
        }
    }
}

impl FromStr for LengthUnit {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "feet" | "foot" | "ft" => Ok(Self::Feet),
            "meters" | "metres" | "meter" | "metre" | "m" => Ok(Self::Meters),
            _ => Err(format!("Unknown length unit: {}", s)),
        }
    }
}

/// Converts feet to metres.
pub fn feet_to_meters(feet: f64) -> f64 {
    feet / FEET_PER_METER
}

/// Converts metres to feet.
pub fn meters_to_feet(meters: f64) -> f64 {
    meters * FEET_PER_METER
}

/// Format a length stored in feet for display in the requested unit.
pub fn format_length(value_ft: f64, unit: LengthUnit) -> String {
    let value = LengthUnit::Feet.convert(value_ft, unit);
    format!("{:.2} {}", value, unit.suffix())
}
