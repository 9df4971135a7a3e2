// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Named edit scopes.
//!
//! A [`Transaction`] mutably borrows the document for its whole lifetime, so
//! nothing else can observe the document while changes are pending. Every
//! change is recorded in an undo journal. Committing discards the journal;
//! rolling back (explicitly, or by dropping the transaction) replays it in
//! reverse. Elements created inside a rolled-back scope are removed from their
//! slot maps, which permanently invalidates their keys.

use nalgebra::{Point3, Vector3};
use tracing::{debug, warn};

use crate::document::Document;
use crate::error::{Error, Result};
use crate::geometry::Line;
use crate::keys::*;
use crate::parameters::{BuiltInParameter, ParamValue};
use crate::query::{ModelEdit, ModelQuery};
use crate::types::*;

/// One undoable change.
#[derive(Debug, Clone)]
pub(crate) enum Change {
    Created(ElementKey),
    ParameterSet {
        owner: ElementKey,
        param: BuiltInParameter,
        previous: Option<ParamValue>,
    },
    SymbolActivated(ElementTypeKey),
}

/// Undo journal of the open transaction.
#[derive(Debug)]
pub(crate) struct Journal {
    pub(crate) name: String,
    pub(crate) changes: Vec<Change>,
}

impl Document {
    /// Records a change in the open journal.
    pub(crate) fn record(&mut self, change: Change) -> Result<()> {
        let journal = self.journal.as_mut().ok_or(Error::NoActiveTransaction)?;
        journal.changes.push(change);
        Ok(())
    }

    /// Fails unless a transaction is open.
    pub(crate) fn require_transaction(&self) -> Result<()> {
        if self.journal.is_some() {
            Ok(())
        } else {
            Err(Error::NoActiveTransaction)
        }
    }

    fn undo(&mut self, change: Change) {
        match change {
            Change::Created(key) => self.remove_element(key),
            Change::ParameterSet {
                owner,
                param,
                previous,
            } => {
                self.write_parameter(owner, param, previous);
            }
            Change::SymbolActivated(key) => {
                if let Some(ty) = self.types.get_mut(key) {
                    ty.active = false;
                }
            }
        }
    }

    /// Opens a transaction, runs `f`, and commits if it returns `Ok`.
    /// Any error rolls the transaction back and is returned unchanged.
    ///
    /// # Example
    ///
    /// ```
    /// use nalgebra::Point3;
    /// use shellgen_model::{Document, Line, ModelEdit, ModelQuery};
    ///
    /// let mut doc = Document::builder().level("Level 1", 0.0).build();
    /// let (level, _) = doc.levels()[0];
    ///
    /// let wall = doc
    ///     .transact("Create wall", |tx| {
    ///         let line = Line::create_bound(Point3::origin(), Point3::new(10.0, 0.0, 0.0))?;
    ///         tx.create_wall(line, level, false)
    ///     })
    ///     .unwrap();
    ///
    /// assert!(doc.wall(wall).is_some());
    /// ```
    pub fn transact<T, E, F>(&mut self, name: &str, f: F) -> std::result::Result<T, E>
    where
        E: From<Error>,
        F: FnOnce(&mut Transaction<'_>) -> std::result::Result<T, E>,
    {
        let mut tx = Transaction::start(self, name)?;
        match f(&mut tx) {
            Ok(value) => {
                tx.commit();
                Ok(value)
            }
            Err(err) => {
                tx.rollback();
                Err(err)
            }
        }
    }
}

/// An open edit scope on a document.
#[derive(Debug)]
pub struct Transaction<'a> {
    doc: &'a mut Document,
    finished: bool,
}

impl<'a> Transaction<'a> {
    /// Opens a named transaction.
    ///
    /// Returns [`Error::TransactionAlreadyOpen`] if the document already has
    /// an open transaction; transactions do not nest.
    pub fn start(doc: &'a mut Document, name: &str) -> Result<Self> {
        if let Some(open) = doc.open_transaction() {
            return Err(Error::TransactionAlreadyOpen(open.to_string()));
        }
        doc.journal = Some(Journal {
            name: name.to_string(),
            changes: Vec::new(),
        });
        debug!(transaction = name, "transaction started");
        Ok(Self {
            doc,
            finished: false,
        })
    }

    /// Name given at start.
    pub fn name(&self) -> &str {
        self.doc.open_transaction().unwrap_or_default()
    }

    /// Number of changes recorded so far.
    pub fn change_count(&self) -> usize {
        self.doc.journal.as_ref().map_or(0, |j| j.changes.len())
    }

    /// Makes every change permanent. Returns the number of changes committed.
    pub fn commit(mut self) -> usize {
        self.finished = true;
        let journal = self.doc.journal.take();
        let (name, count) = journal
            .map(|j| (j.name, j.changes.len()))
            .unwrap_or_default();
        debug!(transaction = %name, changes = count, "transaction committed");
        count
    }

    /// Undoes every change made in this transaction.
    pub fn rollback(mut self) {
        self.finished = true;
        self.undo_all();
    }

    fn undo_all(&mut self) {
        let Some(journal) = self.doc.journal.take() else {
            return;
        };
        warn!(
            transaction = %journal.name,
            changes = journal.changes.len(),
            "transaction rolled back"
        );
        for change in journal.changes.into_iter().rev() {
            self.doc.undo(change);
        }
    }

    /// Read access to the document, including uncommitted changes.
    pub fn document(&self) -> &Document {
        self.doc
    }
}

impl Drop for Transaction<'_> {
    fn drop(&mut self) {
        if !self.finished {
            self.undo_all();
        }
    }
}

impl ModelQuery for Transaction<'_> {
    fn levels(&self) -> Vec<(LevelKey, &LevelData)> {
        self.doc.levels()
    }

    fn level(&self, key: LevelKey) -> Option<&LevelData> {
        self.doc.level(key)
    }

    fn level_by_id(&self, id: ElementId) -> Option<LevelKey> {
        self.doc.level_by_id(id)
    }

    fn element_types(&self, category: Category) -> Vec<(ElementTypeKey, &ElementTypeData)> {
        self.doc.element_types(category)
    }

    fn element_type(&self, key: ElementTypeKey) -> Option<&ElementTypeData> {
        self.doc.element_type(key)
    }

    fn element_type_by_id(&self, id: ElementId) -> Option<ElementTypeKey> {
        self.doc.element_type_by_id(id)
    }

    fn walls(&self) -> Vec<(WallKey, &WallData)> {
        self.doc.walls()
    }

    fn wall(&self, key: WallKey) -> Option<&WallData> {
        self.doc.wall(key)
    }

    fn instances(&self) -> Vec<(InstanceKey, &FamilyInstanceData)> {
        self.doc.instances()
    }

    fn instance(&self, key: InstanceKey) -> Option<&FamilyInstanceData> {
        self.doc.instance(key)
    }

    fn reference_plane(&self, key: ReferencePlaneKey) -> Option<&ReferencePlaneData> {
        self.doc.reference_plane(key)
    }

    fn roofs(&self) -> Vec<(RoofKey, &ExtrusionRoofData)> {
        self.doc.roofs()
    }

    fn roof(&self, key: RoofKey) -> Option<&ExtrusionRoofData> {
        self.doc.roof(key)
    }

    fn parameter(&self, owner: ElementKey, param: BuiltInParameter) -> Result<Option<ParamValue>> {
        self.doc.parameter(owner, param)
    }

    fn element_id(&self, key: ElementKey) -> Option<ElementId> {
        self.doc.element_id(key)
    }
}

impl ModelEdit for Transaction<'_> {
    fn create_wall(
        &mut self,
        location: Line,
        base_level: LevelKey,
        structural: bool,
    ) -> Result<WallKey> {
        self.doc.insert_wall(location, base_level, structural)
    }

    fn set_parameter(
        &mut self,
        owner: ElementKey,
        param: BuiltInParameter,
        value: ParamValue,
    ) -> Result<()> {
        self.doc.assign_parameter(owner, param, value)
    }

    fn activate_symbol(&mut self, symbol: ElementTypeKey) -> Result<()> {
        self.doc.activate(symbol)
    }

    fn create_family_instance(
        &mut self,
        location: Point3<f64>,
        symbol: ElementTypeKey,
        host: WallKey,
        level: LevelKey,
        structural_type: StructuralType,
    ) -> Result<InstanceKey> {
        self.doc
            .insert_instance(location, symbol, host, level, structural_type)
    }

    fn create_reference_plane(
        &mut self,
        bubble_end: Point3<f64>,
        free_end: Point3<f64>,
        cut_vector: Vector3<f64>,
    ) -> Result<ReferencePlaneKey> {
        self.doc.insert_plane(bubble_end, free_end, cut_vector)
    }

    fn create_extrusion_roof(
        &mut self,
        profile: &[Line],
        plane: ReferencePlaneKey,
        level: LevelKey,
        roof_type: ElementTypeKey,
        extrusion_start: f64,
        extrusion_end: f64,
    ) -> Result<RoofKey> {
        self.doc.insert_extrusion_roof(
            profile,
            plane,
            level,
            roof_type,
            extrusion_start,
            extrusion_end,
        )
    }
}
