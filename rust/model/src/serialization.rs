// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! JSON serialization for documents.
//!
//! Two formats live here:
//!
//! - [`DocumentTemplate`]: the input format. Levels, element types and the
//!   default wall thickness, with lengths in a display unit.
//! - [`DocumentSnapshot`]: the full document. Every element with its stable
//!   id, coordinates in internal units, and writable parameter values.
//!   Element references are written as stable ids. A snapshot can be read
//!   back with [`Document::from_snapshot`].

use nalgebra::{Point3, Vector3};
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::document::{default_wall_width, Document};
use crate::error::{Error, Result};
use crate::geometry::Line;
use crate::keys::*;
use crate::parameters::{check_applicable, check_storage, BuiltInParameter, ParamValue};
use crate::query::ModelQuery;
use crate::types::*;
use crate::units::{convert_to_internal, LengthUnit};

/// Level entry of a template.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LevelTemplate {
    pub name: String,
    pub elevation: f64,
}

/// Element type entry of a template.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TypeTemplate {
    pub category: Category,
    pub family: String,
    pub name: String,
    /// Defaults to inactive for doors and windows, active for roofs.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub active: Option<bool>,
}

/// Template content for a new document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentTemplate {
    /// Unit of every length in the template.
    #[serde(default)]
    pub length_unit: LengthUnit,
    pub default_wall_width: f64,
    pub levels: Vec<LevelTemplate>,
    #[serde(default)]
    pub types: Vec<TypeTemplate>,
}

impl DocumentTemplate {
    /// Parses a template from JSON.
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| Error::Serialization(e.to_string()))
    }

    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).map_err(|e| Error::Serialization(e.to_string()))
    }
}

impl Document {
    /// Builds a document from template content.
    ///
    /// Rejects non-finite lengths and a non-positive wall width. Duplicate
    /// names are allowed, as in any host model.
    pub fn from_template(template: &DocumentTemplate) -> Result<Self> {
        let unit = template.length_unit;
        let wall_width = template.default_wall_width;
        if !wall_width.is_finite() || wall_width <= 0.0 {
            return Err(Error::InvalidTemplate(format!(
                "default wall width must be positive, got {wall_width}"
            )));
        }

        let mut builder =
            Document::builder().default_wall_width(convert_to_internal(wall_width, unit));

        for level in &template.levels {
            if !level.elevation.is_finite() {
                return Err(Error::InvalidTemplate(format!(
                    "level '{}' has a non-finite elevation",
                    level.name
                )));
            }
            builder = builder.level(level.name.clone(), convert_to_internal(level.elevation, unit));
        }

        for ty in &template.types {
            let active = ty.active.unwrap_or(ty.category == Category::Roofs);
            builder = builder.element_type(ty.category, ty.family.clone(), ty.name.clone(), active);
        }

        debug!(
            unit = unit.symbol(),
            levels = template.levels.len(),
            types = template.types.len(),
            "document built from template"
        );
        Ok(builder.build())
    }

    /// Restores a document from a snapshot.
    ///
    /// Stable ids are kept and new elements continue after the highest one.
    /// Every reference must resolve to an element of the right kind, and ids
    /// must be unique across the whole snapshot.
    pub fn from_snapshot(snapshot: &DocumentSnapshot) -> Result<Self> {
        let unit = snapshot.length_unit;
        let len = |v: f64| convert_to_internal(v, unit);
        let pt = |p: &[f64; 3]| Point3::new(len(p[0]), len(p[1]), len(p[2]));

        let mut doc = Document::new();
        doc.default_wall_width = len(snapshot.default_wall_width);
        let mut ids = IdTable::default();

        for l in &snapshot.levels {
            let key = doc.levels.insert(LevelData {
                id: ElementId(l.id),
                name: l.name.clone(),
                elevation: len(l.elevation),
            });
            ids.insert(l.id, key.into())?;
        }

        for t in &snapshot.types {
            let key = doc.types.insert(ElementTypeData {
                id: ElementId(t.id),
                category: t.category,
                family_name: t.family.clone(),
                type_name: t.name.clone(),
                active: t.active,
            });
            ids.insert(t.id, key.into())?;
        }

        let mut pending: Vec<(ElementKey, &[ParameterSnapshot])> = Vec::new();

        for w in &snapshot.walls {
            let key = doc.walls.insert(WallData {
                id: ElementId(w.id),
                location: Line::create_bound(pt(&w.start), pt(&w.end))?,
                base_level: ids.level(w.base_level)?,
                width: len(w.width),
                structural: w.structural,
            });
            ids.insert(w.id, key.into())?;
            pending.push((key.into(), &w.parameters));
        }

        for i in &snapshot.instances {
            let key = doc.instances.insert(FamilyInstanceData {
                id: ElementId(i.id),
                symbol: ids.element_type(i.symbol)?,
                host: ids.wall(i.host)?,
                level: ids.level(i.level)?,
                location: pt(&i.location),
                structural_type: StructuralType::NonStructural,
            });
            ids.insert(i.id, key.into())?;
            pending.push((key.into(), &i.parameters));
        }

        for p in &snapshot.reference_planes {
            let key = doc.planes.insert(ReferencePlaneData {
                id: ElementId(p.id),
                bubble_end: pt(&p.bubble_end),
                free_end: pt(&p.free_end),
                cut_vector: Vector3::new(p.cut_vector[0], p.cut_vector[1], p.cut_vector[2]),
            });
            ids.insert(p.id, key.into())?;
        }

        for r in &snapshot.roofs {
            let profile = r
                .profile
                .iter()
                .map(|[a, b]| Line::create_bound(pt(a), pt(b)))
                .collect::<Result<Vec<_>>>()?;
            let key = doc.roofs.insert(ExtrusionRoofData {
                id: ElementId(r.id),
                profile,
                plane: ids.plane(r.plane)?,
                level: ids.level(r.level)?,
                roof_type: ids.element_type(r.roof_type)?,
                extrusion_start: len(r.extrusion_start),
                extrusion_end: len(r.extrusion_end),
            });
            ids.insert(r.id, key.into())?;
            pending.push((key.into(), &r.parameters));
        }

        for (owner, params) in pending {
            for p in params {
                let value = match &p.value {
                    ValueSnapshot::Double(v) => ParamValue::Double(len(*v)),
                    ValueSnapshot::String(s) => ParamValue::String(s.clone()),
                    ValueSnapshot::ElementId(id) => ParamValue::Level(ids.level(*id)?),
                };
                check_applicable(owner, p.name)?;
                check_storage(p.name, &value)
                    .map_err(|reason| Error::InvalidParameterValue { param: p.name, reason })?;
                doc.write_parameter(owner, p.name, Some(value));
            }
        }

        doc.next_id = ids.max_id() + 1;
        debug!(elements = doc.element_count(), next_id = doc.next_id, "document restored from snapshot");
        Ok(doc)
    }

    /// Serializes the whole document to a JSON string.
    pub fn to_json(&self) -> Result<String> {
        let snapshot = self.to_snapshot();
        serde_json::to_string_pretty(&snapshot).map_err(|e| Error::Serialization(e.to_string()))
    }

    /// Creates a serializable snapshot of the document.
    pub fn to_snapshot(&self) -> DocumentSnapshot {
        let id_of = |key: ElementKey| self.element_id(key).map_or(0, |id| id.0);

        let levels = self
            .levels()
            .into_iter()
            .map(|(_, l)| LevelSnapshot {
                id: l.id.0,
                name: l.name.clone(),
                elevation: l.elevation,
            })
            .collect();

        let types = [Category::Doors, Category::Windows, Category::Roofs]
            .into_iter()
            .flat_map(|c| self.element_types(c))
            .map(|(_, t)| TypeSnapshot {
                id: t.id.0,
                category: t.category,
                family: t.family_name.clone(),
                name: t.type_name.clone(),
                active: t.active,
            })
            .collect();

        let walls = self
            .walls()
            .into_iter()
            .map(|(k, w)| WallSnapshot {
                id: w.id.0,
                start: point(&w.location.start()),
                end: point(&w.location.end()),
                base_level: id_of(w.base_level.into()),
                width: w.width,
                structural: w.structural,
                parameters: self.parameter_snapshots(k.into(), &id_of),
            })
            .collect();

        let instances = self
            .instances()
            .into_iter()
            .map(|(k, i)| InstanceSnapshot {
                id: i.id.0,
                symbol: id_of(i.symbol.into()),
                host: id_of(i.host.into()),
                level: id_of(i.level.into()),
                location: point(&i.location),
                parameters: self.parameter_snapshots(k.into(), &id_of),
            })
            .collect();

        let mut planes: Vec<PlaneSnapshot> = self
            .planes
            .values()
            .map(|p| PlaneSnapshot {
                id: p.id.0,
                bubble_end: point(&p.bubble_end),
                free_end: point(&p.free_end),
                cut_vector: [p.cut_vector.x, p.cut_vector.y, p.cut_vector.z],
            })
            .collect();
        planes.sort_by_key(|p| p.id);

        let roofs = self
            .roofs()
            .into_iter()
            .map(|(k, r)| RoofSnapshot {
                id: r.id.0,
                profile: r
                    .profile
                    .iter()
                    .map(|l| [point(&l.start()), point(&l.end())])
                    .collect(),
                plane: id_of(r.plane.into()),
                level: id_of(r.level.into()),
                roof_type: id_of(r.roof_type.into()),
                extrusion_start: r.extrusion_start,
                extrusion_end: r.extrusion_end,
                parameters: self.parameter_snapshots(k.into(), &id_of),
            })
            .collect();

        DocumentSnapshot {
            length_unit: LengthUnit::Feet,
            default_wall_width: self.default_wall_width,
            levels,
            types,
            walls,
            instances,
            reference_planes: planes,
            roofs,
        }
    }

    fn parameter_snapshots(
        &self,
        owner: ElementKey,
        id_of: &impl Fn(ElementKey) -> u64,
    ) -> Vec<ParameterSnapshot> {
        let mut out: Vec<ParameterSnapshot> = self
            .params
            .get(&owner)
            .into_iter()
            .flat_map(|p| p.iter())
            .map(|(param, value)| ParameterSnapshot {
                name: *param,
                value: match value {
                    ParamValue::Double(v) => ValueSnapshot::Double(*v),
                    ParamValue::String(s) => ValueSnapshot::String(s.clone()),
                    ParamValue::Level(k) => ValueSnapshot::ElementId(id_of((*k).into())),
                },
            })
            .collect();
        out.sort_by_key(|p| p.name);
        out
    }
}

fn point(p: &nalgebra::Point3<f64>) -> [f64; 3] {
    [p.x, p.y, p.z]
}

/// Stable id to key lookup used while restoring a snapshot.
#[derive(Default)]
struct IdTable(FxHashMap<u64, ElementKey>);

impl IdTable {
    fn insert(&mut self, id: u64, key: ElementKey) -> Result<()> {
        if id == 0 || self.0.insert(id, key).is_some() {
            return Err(Error::InvalidSnapshot(format!("duplicate or zero element id {id}")));
        }
        Ok(())
    }

    fn dangling(id: u64, kind: ElementKind) -> Error {
        Error::InvalidSnapshot(format!("#{id} is not a {kind}"))
    }

    fn level(&self, id: u64) -> Result<LevelKey> {
        match self.0.get(&id) {
            Some(ElementKey::Level(k)) => Ok(*k),
            _ => Err(Self::dangling(id, ElementKind::Level)),
        }
    }

    fn element_type(&self, id: u64) -> Result<ElementTypeKey> {
        match self.0.get(&id) {
            Some(ElementKey::ElementType(k)) => Ok(*k),
            _ => Err(Self::dangling(id, ElementKind::ElementType)),
        }
    }

    fn wall(&self, id: u64) -> Result<WallKey> {
        match self.0.get(&id) {
            Some(ElementKey::Wall(k)) => Ok(*k),
            _ => Err(Self::dangling(id, ElementKind::Wall)),
        }
    }

    fn plane(&self, id: u64) -> Result<ReferencePlaneKey> {
        match self.0.get(&id) {
            Some(ElementKey::ReferencePlane(k)) => Ok(*k),
            _ => Err(Self::dangling(id, ElementKind::ReferencePlane)),
        }
    }

    fn max_id(&self) -> u64 {
        self.0.keys().copied().max().unwrap_or(0)
    }
}

/// Serializable representation of a full document.
#[derive(Debug, Serialize, Deserialize)]
pub struct DocumentSnapshot {
    pub length_unit: LengthUnit,
    /// Thickness of walls created in the document.
    #[serde(default = "default_wall_width")]
    pub default_wall_width: f64,
    pub levels: Vec<LevelSnapshot>,
    pub types: Vec<TypeSnapshot>,
    pub walls: Vec<WallSnapshot>,
    pub instances: Vec<InstanceSnapshot>,
    pub reference_planes: Vec<PlaneSnapshot>,
    pub roofs: Vec<RoofSnapshot>,
}

impl DocumentSnapshot {
    /// Parses a snapshot written by [`Document::to_json`].
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| Error::Serialization(e.to_string()))
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct LevelSnapshot {
    pub id: u64,
    pub name: String,
    pub elevation: f64,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct TypeSnapshot {
    pub id: u64,
    pub category: Category,
    pub family: String,
    pub name: String,
    pub active: bool,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct WallSnapshot {
    pub id: u64,
    pub start: [f64; 3],
    pub end: [f64; 3],
    pub base_level: u64,
    pub width: f64,
    pub structural: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub parameters: Vec<ParameterSnapshot>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct InstanceSnapshot {
    pub id: u64,
    pub symbol: u64,
    pub host: u64,
    pub level: u64,
    pub location: [f64; 3],
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub parameters: Vec<ParameterSnapshot>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct PlaneSnapshot {
    pub id: u64,
    pub bubble_end: [f64; 3],
    pub free_end: [f64; 3],
    pub cut_vector: [f64; 3],
}

#[derive(Debug, Serialize, Deserialize)]
pub struct RoofSnapshot {
    pub id: u64,
    pub profile: Vec<[[f64; 3]; 2]>,
    pub plane: u64,
    pub level: u64,
    pub roof_type: u64,
    pub extrusion_start: f64,
    pub extrusion_end: f64,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub parameters: Vec<ParameterSnapshot>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ParameterSnapshot {
    pub name: BuiltInParameter,
    pub value: ValueSnapshot,
}

#[derive(Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValueSnapshot {
    Double(f64),
    String(String),
    ElementId(u64),
}
