// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Element key types for arena-based storage.
//!
//! Each element gets a type-safe key for O(1) lookup inside the document.
//! Keys are created by `slotmap::SlotMap` and are generational: once an
//! element is removed (for example by a transaction rollback) its key stays
//! invalid forever, even if the slot is reused.
//!
//! Keys are session handles. For an identity that survives serialization use
//! [`ElementId`].

use serde::{Deserialize, Serialize};
use slotmap::new_key_type;

new_key_type! {
    /// Key for a level (named elevation reference).
    pub struct LevelKey;

    /// Key for an element type (family symbol or roof type).
    pub struct ElementTypeKey;

    /// Key for a straight wall.
    pub struct WallKey;

    /// Key for a hosted family instance (door, window).
    pub struct InstanceKey;

    /// Key for a reference plane.
    pub struct ReferencePlaneKey;

    /// Key for an extrusion roof.
    pub struct RoofKey;
}

/// Stable, never-reused element identity assigned by the document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ElementId(pub u64);

impl std::fmt::Display for ElementId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A key that can reference any element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ElementKey {
    Level(LevelKey),
    ElementType(ElementTypeKey),
    Wall(WallKey),
    Instance(InstanceKey),
    ReferencePlane(ReferencePlaneKey),
    Roof(RoofKey),
}

impl ElementKey {
    /// Returns the element kind of this key.
    pub fn kind(&self) -> ElementKind {
        match self {
            ElementKey::Level(_) => ElementKind::Level,
            ElementKey::ElementType(_) => ElementKind::ElementType,
            ElementKey::Wall(_) => ElementKind::Wall,
            ElementKey::Instance(_) => ElementKind::Instance,
            ElementKey::ReferencePlane(_) => ElementKind::ReferencePlane,
            ElementKey::Roof(_) => ElementKind::Roof,
        }
    }
}

/// Discriminant for element kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ElementKind {
    Level = 0,
    ElementType = 1,
    Wall = 2,
    Instance = 3,
    ReferencePlane = 4,
    Roof = 5,
}

impl ElementKind {
    /// Returns the kind name as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            ElementKind::Level => "Level",
            ElementKind::ElementType => "ElementType",
            ElementKind::Wall => "Wall",
            ElementKind::Instance => "FamilyInstance",
            ElementKind::ReferencePlane => "ReferencePlane",
            ElementKind::Roof => "ExtrusionRoof",
        }
    }
}

impl std::fmt::Display for ElementKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<LevelKey> for ElementKey {
    fn from(k: LevelKey) -> Self {
        ElementKey::Level(k)
    }
}

impl From<ElementTypeKey> for ElementKey {
    fn from(k: ElementTypeKey) -> Self {
        ElementKey::ElementType(k)
    }
}

impl From<WallKey> for ElementKey {
    fn from(k: WallKey) -> Self {
        ElementKey::Wall(k)
    }
}

impl From<InstanceKey> for ElementKey {
    fn from(k: InstanceKey) -> Self {
        ElementKey::Instance(k)
    }
}

impl From<ReferencePlaneKey> for ElementKey {
    fn from(k: ReferencePlaneKey) -> Self {
        ElementKey::ReferencePlane(k)
    }
}

impl From<RoofKey> for ElementKey {
    fn from(k: RoofKey) -> Self {
        ElementKey::Roof(k)
    }
}
