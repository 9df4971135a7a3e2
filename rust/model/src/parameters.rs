// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Built-in parameters and their typed values.
//!
//! Writable parameter values live in a per-element table on the document.
//! Read-only parameters (level elevation, curve length) are computed from the
//! element data on every read.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::keys::{ElementKey, ElementKind, LevelKey};

/// Identifiers for the built-in parameters the document understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BuiltInParameter {
    /// Level elevation (read-only).
    LevelElevation,
    /// Wall top constraint: the level the wall extends up to.
    WallTopConstraint,
    /// Wall offset from its base level.
    WallBaseOffset,
    /// Length of a wall's location curve (read-only).
    CurveLength,
    /// Sill height of a hosted instance above its level.
    InstanceSillHeight,
    /// Free-form identifying mark.
    Mark,
}

impl BuiltInParameter {
    pub fn as_str(&self) -> &'static str {
        match self {
            BuiltInParameter::LevelElevation => "LEVEL_ELEV",
            BuiltInParameter::WallTopConstraint => "WALL_HEIGHT_TYPE",
            BuiltInParameter::WallBaseOffset => "WALL_BASE_OFFSET",
            BuiltInParameter::CurveLength => "CURVE_ELEM_LENGTH",
            BuiltInParameter::InstanceSillHeight => "INSTANCE_SILL_HEIGHT_PARAM",
            BuiltInParameter::Mark => "ALL_MODEL_MARK",
        }
    }

    /// Whether the value is computed by the document.
    pub fn is_read_only(&self) -> bool {
        matches!(
            self,
            BuiltInParameter::LevelElevation | BuiltInParameter::CurveLength
        )
    }

    /// Whether this parameter exists on elements of `kind`.
    pub fn applies_to(&self, kind: ElementKind) -> bool {
        match self {
            BuiltInParameter::LevelElevation => kind == ElementKind::Level,
            BuiltInParameter::WallTopConstraint
            | BuiltInParameter::WallBaseOffset
            | BuiltInParameter::CurveLength => kind == ElementKind::Wall,
            BuiltInParameter::InstanceSillHeight => kind == ElementKind::Instance,
            BuiltInParameter::Mark => {
                matches!(kind, ElementKind::Wall | ElementKind::Instance | ElementKind::Roof)
            }
        }
    }
}

impl std::fmt::Display for BuiltInParameter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A typed parameter value.
#[derive(Debug, Clone, PartialEq)]
pub enum ParamValue {
    /// A length or other real number in internal units.
    Double(f64),
    String(String),
    /// Reference to a level.
    Level(LevelKey),
}

impl ParamValue {
    pub fn as_double(&self) -> Option<f64> {
        match self {
            ParamValue::Double(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            ParamValue::String(s) => Some(s),
            _ => None,
        }
    }

    /// Storage-type name used in error messages.
    pub fn storage_name(&self) -> &'static str {
        match self {
            ParamValue::Double(_) => "double",
            ParamValue::String(_) => "string",
            ParamValue::Level(_) => "element id",
        }
    }
}

/// Writable parameter values attached to one element.
pub type Parameters = FxHashMap<BuiltInParameter, ParamValue>;

/// Checks that `value` has the storage type `param` expects.
pub(crate) fn check_storage(param: BuiltInParameter, value: &ParamValue) -> Result<(), String> {
    let ok = match param {
        BuiltInParameter::WallTopConstraint => matches!(value, ParamValue::Level(_)),
        BuiltInParameter::Mark => matches!(value, ParamValue::String(_)),
        BuiltInParameter::LevelElevation
        | BuiltInParameter::WallBaseOffset
        | BuiltInParameter::CurveLength
        | BuiltInParameter::InstanceSillHeight => matches!(value, ParamValue::Double(v) if v.is_finite()),
    };
    if ok {
        Ok(())
    } else {
        Err(format!("{} value not accepted", value.storage_name()))
    }
}

/// Applicability check shared by reads and writes.
pub(crate) fn check_applicable(key: ElementKey, param: BuiltInParameter) -> crate::Result<()> {
    if param.applies_to(key.kind()) {
        Ok(())
    } else {
        Err(crate::Error::ParameterNotApplicable { key, param })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parameter_names() {
        assert_eq!(BuiltInParameter::WallTopConstraint.as_str(), "WALL_HEIGHT_TYPE");
        assert_eq!(
            BuiltInParameter::InstanceSillHeight.to_string(),
            "INSTANCE_SILL_HEIGHT_PARAM"
        );
    }

    #[test]
    fn read_only_parameters() {
        assert!(BuiltInParameter::LevelElevation.is_read_only());
        assert!(BuiltInParameter::CurveLength.is_read_only());
        assert!(!BuiltInParameter::InstanceSillHeight.is_read_only());
    }

    #[test]
    fn applicability() {
        assert!(BuiltInParameter::WallTopConstraint.applies_to(ElementKind::Wall));
        assert!(!BuiltInParameter::WallTopConstraint.applies_to(ElementKind::Instance));
        assert!(BuiltInParameter::Mark.applies_to(ElementKind::Roof));
        assert!(!BuiltInParameter::Mark.applies_to(ElementKind::Level));
    }

    #[test]
    fn storage_checks() {
        assert!(check_storage(BuiltInParameter::InstanceSillHeight, &ParamValue::Double(2.0)).is_ok());
        assert!(check_storage(BuiltInParameter::InstanceSillHeight, &ParamValue::String("2".into())).is_err());
        assert!(check_storage(BuiltInParameter::InstanceSillHeight, &ParamValue::Double(f64::NAN)).is_err());
        assert!(check_storage(BuiltInParameter::Mark, &ParamValue::String("a".into())).is_ok());
    }

    #[test]
    fn value_accessors() {
        assert_eq!(ParamValue::Double(1.5).as_double(), Some(1.5));
        assert_eq!(ParamValue::String("x".into()).as_str(), Some("x"));
        assert_eq!(ParamValue::String("3".into()).as_double(), None);
    }
}
