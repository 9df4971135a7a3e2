// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Arena-based storage for building elements.
//!
//! The [`Document`] is the central owner of every element: levels, element
//! types, walls, hosted instances, reference planes and roofs. Each lives in a
//! slot map with generational keys, and each is also assigned a stable
//! [`ElementId`] that is never reused, not even after a rollback.
//!
//! Levels and element types are the document's "template" content and are
//! set up through [`DocumentBuilder`]. Everything else is created through a
//! [`Transaction`](crate::Transaction); the document itself exposes no public
//! mutation.

use rustc_hash::FxHashMap;
use slotmap::SlotMap;

use crate::keys::*;
use crate::parameters::{BuiltInParameter, ParamValue, Parameters};
use crate::transaction::Journal;
use crate::types::*;
use crate::units::mm;

/// Default wall thickness for new documents (200 mm).
pub fn default_wall_width() -> f64 {
    mm(200.0)
}

/// An in-memory building model.
///
/// # Example
///
/// ```
/// use shellgen_model::{Category, Document, ModelQuery};
///
/// let doc = Document::builder()
///     .level("Level 1", 0.0)
///     .level("Level 2", 12.0)
///     .family_symbol(Category::Doors, "Single-Flush", "0915 x 2134mm")
///     .build();
///
/// assert_eq!(doc.levels().len(), 2);
/// assert_eq!(doc.element_types(Category::Doors).len(), 1);
/// ```
#[derive(Debug)]
pub struct Document {
    // Entity storage
    pub(crate) levels: SlotMap<LevelKey, LevelData>,
    pub(crate) types: SlotMap<ElementTypeKey, ElementTypeData>,
    pub(crate) walls: SlotMap<WallKey, WallData>,
    pub(crate) instances: SlotMap<InstanceKey, FamilyInstanceData>,
    pub(crate) planes: SlotMap<ReferencePlaneKey, ReferencePlaneData>,
    pub(crate) roofs: SlotMap<RoofKey, ExtrusionRoofData>,

    // Writable parameter values, keyed by owner
    pub(crate) params: FxHashMap<ElementKey, Parameters>,

    pub(crate) default_wall_width: f64,
    pub(crate) next_id: u64,

    // Undo journal of the open transaction, if any
    pub(crate) journal: Option<Journal>,
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Document {
    /// Creates a new, empty document.
    pub fn new() -> Self {
        Self {
            levels: SlotMap::with_key(),
            types: SlotMap::with_key(),
            walls: SlotMap::with_key(),
            instances: SlotMap::with_key(),
            planes: SlotMap::with_key(),
            roofs: SlotMap::with_key(),
            params: FxHashMap::default(),
            default_wall_width: default_wall_width(),
            next_id: 1,
            journal: None,
        }
    }

    /// Starts building a document with template content.
    pub fn builder() -> DocumentBuilder {
        DocumentBuilder {
            doc: Document::new(),
        }
    }

    /// Thickness given to walls created in this document.
    pub fn default_wall_width(&self) -> f64 {
        self.default_wall_width
    }

    /// Name of the open transaction, if any.
    pub fn open_transaction(&self) -> Option<&str> {
        self.journal.as_ref().map(|j| j.name.as_str())
    }

    /// Total number of elements of all kinds.
    pub fn element_count(&self) -> usize {
        self.levels.len()
            + self.types.len()
            + self.walls.len()
            + self.instances.len()
            + self.planes.len()
            + self.roofs.len()
    }

    pub(crate) fn allocate_id(&mut self) -> ElementId {
        let id = ElementId(self.next_id);
        self.next_id += 1;
        id
    }

    /// Whether an element with this key currently exists.
    pub fn contains(&self, key: ElementKey) -> bool {
        match key {
            ElementKey::Level(k) => self.levels.contains_key(k),
            ElementKey::ElementType(k) => self.types.contains_key(k),
            ElementKey::Wall(k) => self.walls.contains_key(k),
            ElementKey::Instance(k) => self.instances.contains_key(k),
            ElementKey::ReferencePlane(k) => self.planes.contains_key(k),
            ElementKey::Roof(k) => self.roofs.contains_key(k),
        }
    }

    /// Removes an element and its parameters. Used by rollback only.
    pub(crate) fn remove_element(&mut self, key: ElementKey) {
        match key {
            ElementKey::Level(k) => {
                self.levels.remove(k);
            }
            ElementKey::ElementType(k) => {
                self.types.remove(k);
            }
            ElementKey::Wall(k) => {
                self.walls.remove(k);
            }
            ElementKey::Instance(k) => {
                self.instances.remove(k);
            }
            ElementKey::ReferencePlane(k) => {
                self.planes.remove(k);
            }
            ElementKey::Roof(k) => {
                self.roofs.remove(k);
            }
        }
        self.params.remove(&key);
    }

    /// Writes a raw parameter value, returning the previous one.
    pub(crate) fn write_parameter(
        &mut self,
        owner: ElementKey,
        param: BuiltInParameter,
        value: Option<ParamValue>,
    ) -> Option<ParamValue> {
        match value {
            Some(v) => self.params.entry(owner).or_default().insert(param, v),
            None => {
                let previous = self.params.get_mut(&owner).and_then(|p| p.remove(&param));
                if self.params.get(&owner).is_some_and(|p| p.is_empty()) {
                    self.params.remove(&owner);
                }
                previous
            }
        }
    }
}

/// Builder for a document's template content: levels, element types and the
/// default wall thickness.
#[derive(Debug)]
pub struct DocumentBuilder {
    doc: Document,
}

impl DocumentBuilder {
    /// Adds a level at `elevation` (internal units).
    pub fn level(mut self, name: impl Into<String>, elevation: f64) -> Self {
        let id = self.doc.allocate_id();
        self.doc.levels.insert(LevelData {
            id,
            name: name.into(),
            elevation,
        });
        self
    }

    /// Adds an inactive family symbol.
    pub fn family_symbol(
        self,
        category: Category,
        family_name: impl Into<String>,
        type_name: impl Into<String>,
    ) -> Self {
        self.element_type(category, family_name, type_name, false)
    }

    /// Adds a roof type. Roof types need no activation.
    pub fn roof_type(self, family_name: impl Into<String>, type_name: impl Into<String>) -> Self {
        self.element_type(Category::Roofs, family_name, type_name, true)
    }

    /// Adds an element type with an explicit activation state.
    pub fn element_type(
        mut self,
        category: Category,
        family_name: impl Into<String>,
        type_name: impl Into<String>,
        active: bool,
    ) -> Self {
        let id = self.doc.allocate_id();
        self.doc.types.insert(ElementTypeData {
            id,
            category,
            family_name: family_name.into(),
            type_name: type_name.into(),
            active,
        });
        self
    }

    /// Sets the thickness of walls created in the document (internal units).
    pub fn default_wall_width(mut self, width: f64) -> Self {
        self.doc.default_wall_width = width;
        self
    }

    pub fn build(self) -> Document {
        self.doc
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::ModelQuery;

    fn sample() -> Document {
        Document::builder()
            .level("Level 1", 0.0)
            .level("Level 2", 10.0)
            .family_symbol(Category::Windows, "Fixed", "0406 x 0610mm")
            .roof_type("Basic Roof", "Generic - 400mm")
            .build()
    }

    #[test]
    fn builder_assigns_sequential_ids() {
        let doc = sample();
        let ids: Vec<u64> = doc.levels().iter().map(|(_, l)| l.id.0).collect();
        assert_eq!(ids, vec![1, 2]);
        let (_, window) = doc.element_types(Category::Windows)[0];
        assert_eq!(window.id, ElementId(3));
        assert_eq!(doc.element_count(), 4);
    }

    #[test]
    fn symbols_start_inactive_roof_types_active() {
        let doc = sample();
        assert!(!doc.element_types(Category::Windows)[0].1.active);
        assert!(doc.element_types(Category::Roofs)[0].1.active);
    }

    #[test]
    fn default_wall_width_is_200mm() {
        let doc = Document::new();
        assert_eq!(doc.default_wall_width(), mm(200.0));
        let doc = Document::builder().default_wall_width(1.0).build();
        assert_eq!(doc.default_wall_width(), 1.0);
    }

    #[test]
    fn no_transaction_open_initially() {
        assert!(sample().open_transaction().is_none());
    }

    #[test]
    fn write_parameter_returns_previous() {
        let mut doc = sample();
        let (level, _) = doc.levels()[0];
        let key = ElementKey::Level(level);
        assert_eq!(
            doc.write_parameter(key, BuiltInParameter::Mark, Some(ParamValue::String("a".into()))),
            None
        );
        assert_eq!(
            doc.write_parameter(key, BuiltInParameter::Mark, None),
            Some(ParamValue::String("a".into()))
        );
        assert!(doc.params.is_empty());
    }
}
