// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Element data stored in the document.

use nalgebra::{Point3, Vector3};
use serde::{Deserialize, Serialize};

use crate::geometry::Line;
use crate::keys::{ElementId, ElementTypeKey, LevelKey, ReferencePlaneKey, WallKey};

/// Category of an element type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Doors,
    Windows,
    Roofs,
}

impl Category {
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Doors => "Doors",
            Category::Windows => "Windows",
            Category::Roofs => "Roofs",
        }
    }

    /// Whether instances of this category are placed as hosted family instances.
    pub fn is_hosted_family(&self) -> bool {
        matches!(self, Category::Doors | Category::Windows)
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Structural classification of a placed instance. Doors and windows are
/// always placed as non-structural.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StructuralType {
    #[default]
    NonStructural,
}

/// A named horizontal elevation reference.
#[derive(Debug, Clone)]
pub struct LevelData {
    pub id: ElementId,
    pub name: String,
    /// Elevation in internal units.
    pub elevation: f64,
}

/// A named, instantiable type: a family symbol (doors, windows) or a roof type.
#[derive(Debug, Clone)]
pub struct ElementTypeData {
    pub id: ElementId,
    pub category: Category,
    pub family_name: String,
    pub type_name: String,
    /// Family symbols must be active before first placement.
    pub active: bool,
}

impl ElementTypeData {
    /// `"Family : Type"` label used in messages.
    pub fn label(&self) -> String {
        format!("{} : {}", self.family_name, self.type_name)
    }
}

/// A straight wall along a location line.
#[derive(Debug, Clone)]
pub struct WallData {
    pub id: ElementId,
    pub location: Line,
    pub base_level: LevelKey,
    /// Wall thickness in internal units.
    pub width: f64,
    pub structural: bool,
}

/// A door or window hosted by a wall.
#[derive(Debug, Clone)]
pub struct FamilyInstanceData {
    pub id: ElementId,
    pub symbol: ElementTypeKey,
    pub host: WallKey,
    pub level: LevelKey,
    pub location: Point3<f64>,
    pub structural_type: StructuralType,
}

/// A reference plane defined by two ends and a cut vector.
#[derive(Debug, Clone)]
pub struct ReferencePlaneData {
    pub id: ElementId,
    pub bubble_end: Point3<f64>,
    pub free_end: Point3<f64>,
    pub cut_vector: Vector3<f64>,
}

impl ReferencePlaneData {
    /// Unit normal of the plane.
    pub fn normal(&self) -> Vector3<f64> {
        (self.free_end - self.bubble_end).cross(&self.cut_vector).normalize()
    }
}

/// A roof extruded from an open profile along a reference plane's normal.
#[derive(Debug, Clone)]
pub struct ExtrusionRoofData {
    pub id: ElementId,
    pub profile: Vec<Line>,
    pub plane: ReferencePlaneKey,
    pub level: LevelKey,
    pub roof_type: ElementTypeKey,
    pub extrusion_start: f64,
    pub extrusion_end: f64,
}

impl ExtrusionRoofData {
    /// Extrusion depth along the plane normal.
    pub fn extrusion_length(&self) -> f64 {
        self.extrusion_end - self.extrusion_start
    }
}
