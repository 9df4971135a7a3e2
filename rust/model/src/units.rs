// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Length units and conversion to the document's internal unit.
//!
//! All coordinates stored in a [`Document`](crate::Document) are in decimal
//! feet. Display lengths (templates, configuration) are converted on the way
//! in and out.

use serde::{Deserialize, Serialize};

/// Millimeters per internal unit (one foot).
pub const MILLIMETERS_PER_FOOT: f64 = 304.8;

/// Display length units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LengthUnit {
    #[default]
    Millimeters,
    Centimeters,
    Meters,
    Feet,
    Inches,
}

impl LengthUnit {
    /// Number of internal units (feet) in one unit of `self`.
    #[inline]
    pub fn internal_per_unit(self) -> f64 {
        match self {
            LengthUnit::Millimeters => 1.0 / MILLIMETERS_PER_FOOT,
            LengthUnit::Centimeters => 10.0 / MILLIMETERS_PER_FOOT,
            LengthUnit::Meters => 1000.0 / MILLIMETERS_PER_FOOT,
            LengthUnit::Feet => 1.0,
            LengthUnit::Inches => 1.0 / 12.0,
        }
    }

    /// Short symbol used in log output.
    pub fn symbol(self) -> &'static str {
        match self {
            LengthUnit::Millimeters => "mm",
            LengthUnit::Centimeters => "cm",
            LengthUnit::Meters => "m",
            LengthUnit::Feet => "ft",
            LengthUnit::Inches => "in",
        }
    }
}

/// Converts a display length to internal units.
#[inline]
pub fn convert_to_internal(value: f64, unit: LengthUnit) -> f64 {
    value * unit.internal_per_unit()
}

/// Converts an internal length to a display unit.
#[inline]
pub fn convert_from_internal(value: f64, unit: LengthUnit) -> f64 {
    value / unit.internal_per_unit()
}

/// Shorthand for millimeters → internal units.
#[inline]
pub fn mm(value: f64) -> f64 {
    convert_to_internal(value, LengthUnit::Millimeters)
}
