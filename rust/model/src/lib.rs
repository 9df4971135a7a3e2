// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! # Shellgen Model
//!
//! Transactional in-memory building model.
//!
//! Elements (levels, element types, walls, hosted doors and windows,
//! reference planes, extrusion roofs) are stored in slot maps owned by a
//! [`Document`]. Reads go through [`ModelQuery`]; writes go through
//! [`ModelEdit`], which only a [`Transaction`] implements, so every mutation
//! happens inside a named edit scope that commits or rolls back as a whole.
//!
//! The two traits are the boundary between generator code and the model:
//! nothing above them depends on how the document stores its elements.

pub mod construction;
pub mod document;
pub mod error;
pub mod geometry;
pub mod keys;
pub mod parameters;
pub mod query;
pub mod serialization;
pub mod transaction;
pub mod types;
pub mod units;

pub use document::{Document, DocumentBuilder};
pub use error::{Error, Result};
pub use geometry::Line;
pub use keys::{
    ElementId, ElementKey, ElementKind, ElementTypeKey, InstanceKey, LevelKey, ReferencePlaneKey,
    RoofKey, WallKey,
};
pub use parameters::{BuiltInParameter, ParamValue};
pub use query::{ModelEdit, ModelQuery};
pub use serialization::{DocumentSnapshot, DocumentTemplate, LevelTemplate, TypeTemplate};
pub use transaction::Transaction;
pub use types::{
    Category, ElementTypeData, ExtrusionRoofData, FamilyInstanceData, LevelData,
    ReferencePlaneData, StructuralType, WallData,
};
pub use units::{convert_from_internal, convert_to_internal, LengthUnit};
