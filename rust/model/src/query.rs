// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Capability traits at the boundary between model code and the host model.
//!
//! [`ModelQuery`] is the read side: collection queries by kind and category,
//! lookups by key or stable id, and parameter reads. [`ModelEdit`] is the
//! write side and is only implemented by [`Transaction`](crate::Transaction),
//! so every mutation happens inside an edit scope.
//!
//! Code written against these traits does not depend on the in-memory
//! [`Document`](crate::Document) and can be pointed at another host.

use nalgebra::{Point3, Vector3};

use crate::error::Result;
use crate::geometry::Line;
use crate::keys::*;
use crate::parameters::{BuiltInParameter, ParamValue};
use crate::types::*;

/// Read access to a building model.
///
/// Collections are returned in creation order.
pub trait ModelQuery {
    /// All levels in the model.
    fn levels(&self) -> Vec<(LevelKey, &LevelData)>;

    fn level(&self, key: LevelKey) -> Option<&LevelData>;

    /// Resolves a stable id to a level key.
    fn level_by_id(&self, id: ElementId) -> Option<LevelKey>;

    /// All element types of a category.
    fn element_types(&self, category: Category) -> Vec<(ElementTypeKey, &ElementTypeData)>;

    fn element_type(&self, key: ElementTypeKey) -> Option<&ElementTypeData>;

    /// Resolves a stable id to an element type key.
    fn element_type_by_id(&self, id: ElementId) -> Option<ElementTypeKey>;

    fn walls(&self) -> Vec<(WallKey, &WallData)>;

    fn wall(&self, key: WallKey) -> Option<&WallData>;

    fn instances(&self) -> Vec<(InstanceKey, &FamilyInstanceData)>;

    fn instance(&self, key: InstanceKey) -> Option<&FamilyInstanceData>;

    fn reference_plane(&self, key: ReferencePlaneKey) -> Option<&ReferencePlaneData>;

    fn roofs(&self) -> Vec<(RoofKey, &ExtrusionRoofData)>;

    fn roof(&self, key: RoofKey) -> Option<&ExtrusionRoofData>;

    /// Reads a built-in parameter.
    ///
    /// Returns `Ok(None)` when the parameter applies but has no value yet, and
    /// an error when the element is missing or the parameter does not apply.
    fn parameter(&self, owner: ElementKey, param: BuiltInParameter) -> Result<Option<ParamValue>>;

    /// Stable id of any element.
    fn element_id(&self, key: ElementKey) -> Option<ElementId>;
}

/// Write access to a building model. Only available inside a transaction.
pub trait ModelEdit: ModelQuery {
    /// Creates a straight wall on `base_level` using the default wall thickness.
    fn create_wall(&mut self, location: Line, base_level: LevelKey, structural: bool)
        -> Result<WallKey>;

    /// Writes a built-in parameter.
    fn set_parameter(
        &mut self,
        owner: ElementKey,
        param: BuiltInParameter,
        value: ParamValue,
    ) -> Result<()>;

    /// Activates a family symbol so instances of it can be placed.
    /// Activating an already active symbol does nothing.
    fn activate_symbol(&mut self, symbol: ElementTypeKey) -> Result<()>;

    /// Places a door or window on a host wall.
    fn create_family_instance(
        &mut self,
        location: Point3<f64>,
        symbol: ElementTypeKey,
        host: WallKey,
        level: LevelKey,
        structural_type: StructuralType,
    ) -> Result<InstanceKey>;

    /// Creates a reference plane through `bubble_end` and `free_end`,
    /// spanned together with `cut_vector`.
    fn create_reference_plane(
        &mut self,
        bubble_end: Point3<f64>,
        free_end: Point3<f64>,
        cut_vector: Vector3<f64>,
    ) -> Result<ReferencePlaneKey>;

    /// Extrudes an open profile sketched on `plane` into a roof.
    fn create_extrusion_roof(
        &mut self,
        profile: &[Line],
        plane: ReferencePlaneKey,
        level: LevelKey,
        roof_type: ElementTypeKey,
        extrusion_start: f64,
        extrusion_end: f64,
    ) -> Result<RoofKey>;
}

fn by_creation<'a, K: Copy, T: 'a>(
    items: impl Iterator<Item = (K, &'a T)>,
    id: impl Fn(&T) -> ElementId,
) -> Vec<(K, &'a T)> {
    let mut out: Vec<(K, &'a T)> = items.collect();
    out.sort_by_key(|(_, item)| id(*item));
    out
}

impl ModelQuery for crate::Document {
    fn levels(&self) -> Vec<(LevelKey, &LevelData)> {
        by_creation(self.levels.iter(), |l| l.id)
    }

    fn level(&self, key: LevelKey) -> Option<&LevelData> {
        self.levels.get(key)
    }

    fn level_by_id(&self, id: ElementId) -> Option<LevelKey> {
        self.levels.iter().find(|(_, l)| l.id == id).map(|(k, _)| k)
    }

    fn element_types(&self, category: Category) -> Vec<(ElementTypeKey, &ElementTypeData)> {
        by_creation(
            self.types.iter().filter(|(_, t)| t.category == category),
            |t| t.id,
        )
    }

    fn element_type(&self, key: ElementTypeKey) -> Option<&ElementTypeData> {
        self.types.get(key)
    }

    fn element_type_by_id(&self, id: ElementId) -> Option<ElementTypeKey> {
        self.types.iter().find(|(_, t)| t.id == id).map(|(k, _)| k)
    }

    fn walls(&self) -> Vec<(WallKey, &WallData)> {
        by_creation(self.walls.iter(), |w| w.id)
    }

    fn wall(&self, key: WallKey) -> Option<&WallData> {
        self.walls.get(key)
    }

    fn instances(&self) -> Vec<(InstanceKey, &FamilyInstanceData)> {
        by_creation(self.instances.iter(), |i| i.id)
    }

    fn instance(&self, key: InstanceKey) -> Option<&FamilyInstanceData> {
        self.instances.get(key)
    }

    fn reference_plane(&self, key: ReferencePlaneKey) -> Option<&ReferencePlaneData> {
        self.planes.get(key)
    }

    fn roofs(&self) -> Vec<(RoofKey, &ExtrusionRoofData)> {
        by_creation(self.roofs.iter(), |r| r.id)
    }

    fn roof(&self, key: RoofKey) -> Option<&ExtrusionRoofData> {
        self.roofs.get(key)
    }

    fn parameter(&self, owner: ElementKey, param: BuiltInParameter) -> Result<Option<ParamValue>> {
        if !self.contains(owner) {
            return Err(crate::Error::ElementNotFound(owner));
        }
        crate::parameters::check_applicable(owner, param)?;

        let computed = match (owner, param) {
            (ElementKey::Level(k), BuiltInParameter::LevelElevation) => {
                self.levels.get(k).map(|l| ParamValue::Double(l.elevation))
            }
            (ElementKey::Wall(k), BuiltInParameter::CurveLength) => self
                .walls
                .get(k)
                .map(|w| ParamValue::Double(w.location.length())),
            _ => None,
        };
        if computed.is_some() {
            return Ok(computed);
        }

        Ok(self.params.get(&owner).and_then(|p| p.get(&param)).cloned())
    }

    fn element_id(&self, key: ElementKey) -> Option<ElementId> {
        match key {
            ElementKey::Level(k) => self.levels.get(k).map(|e| e.id),
            ElementKey::ElementType(k) => self.types.get(k).map(|e| e.id),
            ElementKey::Wall(k) => self.walls.get(k).map(|e| e.id),
            ElementKey::Instance(k) => self.instances.get(k).map(|e| e.id),
            ElementKey::ReferencePlane(k) => self.planes.get(k).map(|e| e.id),
            ElementKey::Roof(k) => self.roofs.get(k).map(|e| e.id),
        }
    }
}
