// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Generator configuration.
//!
//! Load order: JSON file (optional) → environment variables → defaults.
//! Lengths are given in millimeters and converted to internal units by the
//! accessor methods.

use std::path::Path;

use serde::{Deserialize, Serialize};
use shellgen_model::units::mm;
use shellgen_model::ElementId;

use crate::error::{Error, Result};

pub const DEFAULT_WIDTH_MM: f64 = 10000.0;
pub const DEFAULT_DEPTH_MM: f64 = 5000.0;
pub const DEFAULT_SILL_HEIGHT_MM: f64 = 850.0;
/// Ridge rise above the eaves: five feet.
pub const DEFAULT_ROOF_RISE_MM: f64 = 1524.0;
pub const DEFAULT_MARK: &str = "shellgen";

pub const DEFAULT_BASE_LEVEL: &str = "Уровень 1";
pub const DEFAULT_TOP_LEVEL: &str = "Уровень 2";
pub const DEFAULT_DOOR_FAMILY: &str = "Одиночные-Щитовые";
pub const DEFAULT_DOOR_TYPE: &str = "0915 x 2134 мм";
pub const DEFAULT_WINDOW_FAMILY: &str = "Фиксированные";
pub const DEFAULT_WINDOW_TYPE: &str = "0406 x 0610 мм";
pub const DEFAULT_ROOF_FAMILY: &str = "Базовая крыша";
pub const DEFAULT_ROOF_TYPE: &str = "Типовой - 400мм";

/// Selects a level by stable id, or by exact display name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LevelSelector {
    Id(ElementId),
    Name(String),
}

impl LevelSelector {
    pub fn name(name: impl Into<String>) -> Self {
        LevelSelector::Name(name.into())
    }
}

impl std::fmt::Display for LevelSelector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LevelSelector::Id(id) => write!(f, "{id}"),
            LevelSelector::Name(name) => write!(f, "'{name}'"),
        }
    }
}

/// Selects an element type by stable id, or by exact family and type name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TypeSelector {
    Id(ElementId),
    Name { family: String, name: String },
}

impl TypeSelector {
    pub fn name(family: impl Into<String>, name: impl Into<String>) -> Self {
        TypeSelector::Name {
            family: family.into(),
            name: name.into(),
        }
    }
}

impl std::fmt::Display for TypeSelector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TypeSelector::Id(id) => write!(f, "{id}"),
            TypeSelector::Name { family, name } => write!(f, "'{family} : {name}'"),
        }
    }
}

/// Settings for one shell generation run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShellConfig {
    /// Outer width along X, in millimeters.
    pub width_mm: f64,
    /// Outer depth along Y, in millimeters.
    pub depth_mm: f64,
    pub base_level: LevelSelector,
    pub top_level: LevelSelector,
    pub door: TypeSelector,
    pub window: TypeSelector,
    pub roof: TypeSelector,
    /// Window sill height above the base level, in millimeters.
    pub sill_height_mm: f64,
    /// Roof ridge rise above the eaves, in millimeters.
    pub roof_rise_mm: f64,
    /// Mark written on generated walls.
    pub mark: String,
    /// Generate again even if the document already holds a marked shell.
    pub allow_duplicates: bool,
}

impl Default for ShellConfig {
    fn default() -> Self {
        Self {
            width_mm: DEFAULT_WIDTH_MM,
            depth_mm: DEFAULT_DEPTH_MM,
            base_level: LevelSelector::name(DEFAULT_BASE_LEVEL),
            top_level: LevelSelector::name(DEFAULT_TOP_LEVEL),
            door: TypeSelector::name(DEFAULT_DOOR_FAMILY, DEFAULT_DOOR_TYPE),
            window: TypeSelector::name(DEFAULT_WINDOW_FAMILY, DEFAULT_WINDOW_TYPE),
            roof: TypeSelector::name(DEFAULT_ROOF_FAMILY, DEFAULT_ROOF_TYPE),
            sill_height_mm: DEFAULT_SILL_HEIGHT_MM,
            roof_rise_mm: DEFAULT_ROOF_RISE_MM,
            mark: DEFAULT_MARK.to_string(),
            allow_duplicates: false,
        }
    }
}

/// Parses a variable from `lookup` and applies it to a config field.
/// Unset or unparseable values leave the field alone.
fn env_override<T: std::str::FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    var: &str,
    target: &mut T,
) {
    if let Some(value) = lookup(var).and_then(|v| v.parse().ok()) {
        *target = value;
    }
}

impl ShellConfig {
    /// Parses a configuration from JSON. Missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| Error::Config(e.to_string()))
    }

    /// Loads the configuration file if given, then applies environment
    /// overrides and validates the result.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        Self::load_with(path, |var| std::env::var(var).ok())
    }

    /// Like [`ShellConfig::load`], reading overrides from `lookup`.
    pub fn load_with(
        path: Option<&Path>,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self> {
        let mut config = match path {
            Some(path) => Self::from_json(&std::fs::read_to_string(path)?)?,
            None => Self::default(),
        };
        config.apply_env_with(lookup);
        config.validate()?;
        Ok(config)
    }

    /// Applies `SHELLGEN_*` environment overrides.
    pub fn apply_env(&mut self) {
        self.apply_env_with(|var| std::env::var(var).ok());
    }

    /// Applies `SHELLGEN_*` overrides read from `lookup`.
    pub fn apply_env_with(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        env_override(&lookup, "SHELLGEN_WIDTH_MM", &mut self.width_mm);
        env_override(&lookup, "SHELLGEN_DEPTH_MM", &mut self.depth_mm);
        env_override(&lookup, "SHELLGEN_SILL_HEIGHT_MM", &mut self.sill_height_mm);
        env_override(&lookup, "SHELLGEN_ROOF_RISE_MM", &mut self.roof_rise_mm);
        env_override(&lookup, "SHELLGEN_ALLOW_DUPLICATES", &mut self.allow_duplicates);
    }

    /// Rejects non-positive or non-finite lengths.
    pub fn validate(&self) -> Result<()> {
        for (name, value) in [
            ("width_mm", self.width_mm),
            ("depth_mm", self.depth_mm),
            ("sill_height_mm", self.sill_height_mm),
            ("roof_rise_mm", self.roof_rise_mm),
        ] {
            if !value.is_finite() || value <= 0.0 {
                return Err(Error::InvalidDimensions(format!(
                    "{name} must be positive, got {value}"
                )));
            }
        }
        Ok(())
    }

    /// Width in internal units.
    pub fn width(&self) -> f64 {
        mm(self.width_mm)
    }

    /// Depth in internal units.
    pub fn depth(&self) -> f64 {
        mm(self.depth_mm)
    }

    /// Sill height in internal units.
    pub fn sill_height(&self) -> f64 {
        mm(self.sill_height_mm)
    }

    /// Roof rise in internal units.
    pub fn roof_rise(&self) -> f64 {
        mm(self.roof_rise_mm)
    }
}
