// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Construction methods for document elements.
//!
//! Every element is created through the document, which checks referential
//! integrity (all referenced elements must exist) and the host placement
//! rules before inserting anything. These methods are reached through
//! [`ModelEdit`](crate::ModelEdit) on a [`Transaction`](crate::Transaction)
//! and record each change in the open journal.

use nalgebra::{Point3, Vector3};
use tracing::debug;

use crate::document::Document;
use crate::error::{Error, Result};
use crate::geometry::{check_chain, Line};
use crate::keys::*;
use crate::parameters::{check_applicable, check_storage, BuiltInParameter, ParamValue};
use crate::transaction::Change;
use crate::types::*;

/// Maximum distance between a hosted instance and its host wall's location
/// line, and between a profile point and its sketch plane.
pub const PLACEMENT_TOLERANCE: f64 = 1e-6;

impl Document {
    pub(crate) fn insert_wall(
        &mut self,
        location: Line,
        base_level: LevelKey,
        structural: bool,
    ) -> Result<WallKey> {
        self.require_transaction()?;
        if !self.levels.contains_key(base_level) {
            return Err(Error::LevelNotFound(base_level));
        }

        let id = self.allocate_id();
        let key = self.walls.insert(WallData {
            id,
            location,
            base_level,
            width: self.default_wall_width,
            structural,
        });
        self.record(Change::Created(key.into()))?;
        debug!(%id, length = location.length(), "wall created");
        Ok(key)
    }

    pub(crate) fn assign_parameter(
        &mut self,
        owner: ElementKey,
        param: BuiltInParameter,
        value: ParamValue,
    ) -> Result<()> {
        self.require_transaction()?;
        if !self.contains(owner) {
            return Err(Error::ElementNotFound(owner));
        }
        check_applicable(owner, param)?;
        if param.is_read_only() {
            return Err(Error::ReadOnlyParameter(param));
        }
        check_storage(param, &value)
            .map_err(|reason| Error::InvalidParameterValue { param, reason })?;

        if let (ElementKey::Wall(wall), ParamValue::Level(top)) = (owner, &value) {
            self.check_top_constraint(wall, *top)?;
        }

        let previous = self.write_parameter(owner, param, Some(value));
        self.record(Change::ParameterSet {
            owner,
            param,
            previous,
        })?;
        debug!(?owner, %param, "parameter set");
        Ok(())
    }

    fn check_top_constraint(&self, wall: WallKey, top: LevelKey) -> Result<()> {
        let invalid = |reason: &str| Error::InvalidParameterValue {
            param: BuiltInParameter::WallTopConstraint,
            reason: reason.to_string(),
        };
        let top_level = self
            .levels
            .get(top)
            .ok_or_else(|| invalid("level does not exist"))?;
        let base_level = self
            .walls
            .get(wall)
            .and_then(|w| self.levels.get(w.base_level))
            .ok_or_else(|| invalid("wall base level does not exist"))?;
        if top_level.elevation <= base_level.elevation {
            return Err(invalid("top level must be above the base level"));
        }
        Ok(())
    }

    pub(crate) fn activate(&mut self, symbol: ElementTypeKey) -> Result<()> {
        self.require_transaction()?;
        let ty = self
            .types
            .get_mut(symbol)
            .ok_or(Error::TypeNotFound(symbol))?;
        if ty.active {
            return Ok(());
        }
        ty.active = true;
        let label = ty.label();
        self.record(Change::SymbolActivated(symbol))?;
        debug!(symbol = %label, "family symbol activated");
        Ok(())
    }

    pub(crate) fn insert_instance(
        &mut self,
        location: Point3<f64>,
        symbol: ElementTypeKey,
        host: WallKey,
        level: LevelKey,
        structural_type: StructuralType,
    ) -> Result<InstanceKey> {
        self.require_transaction()?;
        let ty = self.types.get(symbol).ok_or(Error::TypeNotFound(symbol))?;
        if !ty.category.is_hosted_family() {
            return Err(Error::NotHostedFamily(ty.category));
        }
        if !ty.active {
            return Err(Error::InactiveSymbol(ty.label()));
        }
        let category = ty.category;
        let wall = self.walls.get(host).ok_or(Error::WallNotFound(host))?;
        if !self.levels.contains_key(level) {
            return Err(Error::LevelNotFound(level));
        }
        let distance = wall.location.distance_to_point(&location);
        if distance > PLACEMENT_TOLERANCE {
            return Err(Error::PointNotOnHost { distance });
        }

        let id = self.allocate_id();
        let key = self.instances.insert(FamilyInstanceData {
            id,
            symbol,
            host,
            level,
            location,
            structural_type,
        });
        self.record(Change::Created(key.into()))?;
        debug!(%id, %category, "family instance placed");
        Ok(key)
    }

    pub(crate) fn insert_plane(
        &mut self,
        bubble_end: Point3<f64>,
        free_end: Point3<f64>,
        cut_vector: Vector3<f64>,
    ) -> Result<ReferencePlaneKey> {
        self.require_transaction()?;
        let span = free_end - bubble_end;
        if span.norm() < PLACEMENT_TOLERANCE || span.cross(&cut_vector).norm() < PLACEMENT_TOLERANCE
        {
            return Err(Error::DegeneratePlane);
        }

        let id = self.allocate_id();
        let key = self.planes.insert(ReferencePlaneData {
            id,
            bubble_end,
            free_end,
            cut_vector,
        });
        self.record(Change::Created(key.into()))?;
        debug!(%id, "reference plane created");
        Ok(key)
    }

    pub(crate) fn insert_extrusion_roof(
        &mut self,
        profile: &[Line],
        plane: ReferencePlaneKey,
        level: LevelKey,
        roof_type: ElementTypeKey,
        extrusion_start: f64,
        extrusion_end: f64,
    ) -> Result<RoofKey> {
        self.require_transaction()?;
        if profile.is_empty() {
            return Err(Error::EmptyProfile);
        }
        check_chain(profile).map_err(Error::DisconnectedProfile)?;

        let plane_data = self
            .planes
            .get(plane)
            .ok_or(Error::ReferencePlaneNotFound(plane))?;
        let normal = plane_data.normal();
        for line in profile {
            for point in [line.start(), line.end()] {
                let distance = (point - plane_data.bubble_end).dot(&normal).abs();
                if distance > PLACEMENT_TOLERANCE {
                    return Err(Error::ProfileNotInPlane { distance });
                }
            }
        }

        if !self.levels.contains_key(level) {
            return Err(Error::LevelNotFound(level));
        }
        let ty = self
            .types
            .get(roof_type)
            .ok_or(Error::TypeNotFound(roof_type))?;
        if ty.category != Category::Roofs {
            return Err(Error::CategoryMismatch {
                expected: Category::Roofs,
                actual: ty.category,
            });
        }
        if !(extrusion_start.is_finite() && extrusion_end.is_finite())
            || extrusion_end <= extrusion_start
        {
            return Err(Error::InvalidExtrusion {
                start: extrusion_start,
                end: extrusion_end,
            });
        }

        let id = self.allocate_id();
        let key = self.roofs.insert(ExtrusionRoofData {
            id,
            profile: profile.to_vec(),
            plane,
            level,
            roof_type,
            extrusion_start,
            extrusion_end,
        });
        self.record(Change::Created(key.into()))?;
        debug!(%id, depth = extrusion_end - extrusion_start, "extrusion roof created");
        Ok(key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::{ModelEdit, ModelQuery};
    use crate::transaction::Transaction;

    struct Fixture {
        doc: Document,
        base: LevelKey,
        top: LevelKey,
        door: ElementTypeKey,
        roof_type: ElementTypeKey,
    }

    fn fixture() -> Fixture {
        let doc = Document::builder()
            .level("Level 1", 0.0)
            .level("Level 2", 10.0)
            .family_symbol(Category::Doors, "Single-Flush", "0915 x 2134mm")
            .roof_type("Basic Roof", "Generic - 400mm")
            .build();
        let base = doc.levels()[0].0;
        let top = doc.levels()[1].0;
        let door = doc.element_types(Category::Doors)[0].0;
        let roof_type = doc.element_types(Category::Roofs)[0].0;
        Fixture {
            doc,
            base,
            top,
            door,
            roof_type,
        }
    }

    fn line(x0: f64, y0: f64, x1: f64, y1: f64) -> Line {
        Line::create_bound(Point3::new(x0, y0, 0.0), Point3::new(x1, y1, 0.0)).unwrap()
    }

    // --- Wall tests ---

    #[test]
    fn wall_uses_default_width() {
        let mut f = fixture();
        let mut tx = Transaction::start(&mut f.doc, "t").unwrap();
        let wall = tx.create_wall(line(0.0, 0.0, 10.0, 0.0), f.base, false).unwrap();
        let data = tx.wall(wall).unwrap();
        assert_eq!(data.width, crate::document::default_wall_width());
        assert_eq!(data.base_level, f.base);
        assert!(!data.structural);
        tx.commit();
    }

    #[test]
    fn mutation_requires_transaction() {
        let mut f = fixture();
        assert!(matches!(
            f.doc.insert_wall(line(0.0, 0.0, 1.0, 0.0), f.base, false),
            Err(Error::NoActiveTransaction)
        ));
    }

    #[test]
    fn wall_on_missing_level_fails() {
        let mut f = fixture();
        // The generation counter keeps a removed level's key invalid.
        let stale = f.doc.levels.insert(LevelData {
            id: ElementId(99),
            name: "Temporary".into(),
            elevation: 0.0,
        });
        f.doc.levels.remove(stale);

        let mut tx = Transaction::start(&mut f.doc, "t").unwrap();
        assert!(matches!(
            tx.create_wall(line(0.0, 0.0, 1.0, 0.0), stale, false),
            Err(Error::LevelNotFound(_))
        ));
    }

    // --- Parameter tests ---

    #[test]
    fn top_constraint_must_be_above_base() {
        let mut f = fixture();
        let mut tx = Transaction::start(&mut f.doc, "t").unwrap();
        let wall = tx.create_wall(line(0.0, 0.0, 10.0, 0.0), f.base, false).unwrap();
        assert!(tx
            .set_parameter(wall.into(), BuiltInParameter::WallTopConstraint, ParamValue::Level(f.top))
            .is_ok());
        assert!(matches!(
            tx.set_parameter(wall.into(), BuiltInParameter::WallTopConstraint, ParamValue::Level(f.base)),
            Err(Error::InvalidParameterValue { .. })
        ));
    }

    #[test]
    fn read_only_parameter_rejected() {
        let mut f = fixture();
        let mut tx = Transaction::start(&mut f.doc, "t").unwrap();
        assert!(matches!(
            tx.set_parameter(f.base.into(), BuiltInParameter::LevelElevation, ParamValue::Double(1.0)),
            Err(Error::ReadOnlyParameter(_))
        ));
    }

    #[test]
    fn wrong_storage_type_rejected() {
        let mut f = fixture();
        let mut tx = Transaction::start(&mut f.doc, "t").unwrap();
        let wall = tx.create_wall(line(0.0, 0.0, 10.0, 0.0), f.base, false).unwrap();
        assert!(matches!(
            tx.set_parameter(wall.into(), BuiltInParameter::Mark, ParamValue::Double(1.0)),
            Err(Error::InvalidParameterValue { .. })
        ));
    }

    #[test]
    fn curve_length_reads_location() {
        let mut f = fixture();
        let mut tx = Transaction::start(&mut f.doc, "t").unwrap();
        let wall = tx.create_wall(line(0.0, 0.0, 6.0, 8.0), f.base, false).unwrap();
        assert_eq!(
            tx.parameter(wall.into(), BuiltInParameter::CurveLength).unwrap(),
            Some(ParamValue::Double(10.0))
        );
    }

    // --- Instance tests ---

    #[test]
    fn instance_requires_active_symbol() {
        let mut f = fixture();
        let mut tx = Transaction::start(&mut f.doc, "t").unwrap();
        let wall = tx.create_wall(line(0.0, 0.0, 10.0, 0.0), f.base, false).unwrap();
        let at = Point3::new(5.0, 0.0, 0.0);
        assert!(matches!(
            tx.create_family_instance(at, f.door, wall, f.base, StructuralType::NonStructural),
            Err(Error::InactiveSymbol(_))
        ));
        tx.activate_symbol(f.door).unwrap();
        let door = tx
            .create_family_instance(at, f.door, wall, f.base, StructuralType::NonStructural)
            .unwrap();
        assert_eq!(tx.instance(door).unwrap().host, wall);
    }

    #[test]
    fn activation_is_idempotent() {
        let mut f = fixture();
        let mut tx = Transaction::start(&mut f.doc, "t").unwrap();
        tx.activate_symbol(f.door).unwrap();
        tx.activate_symbol(f.door).unwrap();
        assert_eq!(tx.change_count(), 1);
    }

    #[test]
    fn instance_must_lie_on_host() {
        let mut f = fixture();
        let mut tx = Transaction::start(&mut f.doc, "t").unwrap();
        let wall = tx.create_wall(line(0.0, 0.0, 10.0, 0.0), f.base, false).unwrap();
        tx.activate_symbol(f.door).unwrap();
        let off = Point3::new(5.0, 1.0, 0.0);
        assert!(matches!(
            tx.create_family_instance(off, f.door, wall, f.base, StructuralType::NonStructural),
            Err(Error::PointNotOnHost { .. })
        ));
    }

    #[test]
    fn roof_type_cannot_be_hosted() {
        let mut f = fixture();
        let mut tx = Transaction::start(&mut f.doc, "t").unwrap();
        let wall = tx.create_wall(line(0.0, 0.0, 10.0, 0.0), f.base, false).unwrap();
        assert!(matches!(
            tx.create_family_instance(
                Point3::new(1.0, 0.0, 0.0),
                f.roof_type,
                wall,
                f.base,
                StructuralType::NonStructural
            ),
            Err(Error::NotHostedFamily(Category::Roofs))
        ));
    }

    // --- Roof tests ---

    fn plane(tx: &mut Transaction<'_>) -> ReferencePlaneKey {
        tx.create_reference_plane(
            Point3::origin(),
            Point3::new(0.0, 0.0, -1.0),
            Vector3::new(0.0, 1.0, 0.0),
        )
        .unwrap()
    }

    fn ridge() -> Vec<Line> {
        let a = Point3::origin();
        let b = Point3::new(0.0, 5.0, 3.0);
        let c = Point3::new(0.0, 10.0, 0.0);
        vec![Line::create_bound(a, b).unwrap(), Line::create_bound(b, c).unwrap()]
    }

    #[test]
    fn extrusion_roof_created() {
        let mut f = fixture();
        let mut tx = Transaction::start(&mut f.doc, "t").unwrap();
        let plane = plane(&mut tx);
        let roof = tx
            .create_extrusion_roof(&ridge(), plane, f.top, f.roof_type, 0.0, 20.0)
            .unwrap();
        let data = tx.roof(roof).unwrap();
        assert_eq!(data.profile.len(), 2);
        assert_eq!(data.extrusion_length(), 20.0);
    }

    #[test]
    fn degenerate_plane_rejected() {
        let mut f = fixture();
        let mut tx = Transaction::start(&mut f.doc, "t").unwrap();
        assert!(matches!(
            tx.create_reference_plane(
                Point3::origin(),
                Point3::new(0.0, 1.0, 0.0),
                Vector3::new(0.0, 2.0, 0.0)
            ),
            Err(Error::DegeneratePlane)
        ));
    }

    #[test]
    fn roof_profile_must_be_connected_and_planar() {
        let mut f = fixture();
        let mut tx = Transaction::start(&mut f.doc, "t").unwrap();
        let plane = plane(&mut tx);
        let mut broken = ridge();
        broken.swap(0, 1);
        assert!(matches!(
            tx.create_extrusion_roof(&broken, plane, f.top, f.roof_type, 0.0, 20.0),
            Err(Error::DisconnectedProfile(0))
        ));

        let skew = vec![line(0.0, 0.0, 3.0, 4.0)];
        assert!(matches!(
            tx.create_extrusion_roof(&skew, plane, f.top, f.roof_type, 0.0, 20.0),
            Err(Error::ProfileNotInPlane { .. })
        ));
    }

    #[test]
    fn roof_checks_type_and_range() {
        let mut f = fixture();
        let mut tx = Transaction::start(&mut f.doc, "t").unwrap();
        let plane = plane(&mut tx);
        assert!(matches!(
            tx.create_extrusion_roof(&ridge(), plane, f.top, f.door, 0.0, 20.0),
            Err(Error::CategoryMismatch { .. })
        ));
        assert!(matches!(
            tx.create_extrusion_roof(&ridge(), plane, f.top, f.roof_type, 5.0, 5.0),
            Err(Error::InvalidExtrusion { .. })
        ));
        assert!(matches!(
            tx.create_extrusion_roof(&[], plane, f.top, f.roof_type, 0.0, 5.0),
            Err(Error::EmptyProfile)
        ));
    }
}
