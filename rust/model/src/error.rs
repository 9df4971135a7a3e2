// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Error types for document operations.

use crate::keys::{ElementKey, ElementTypeKey, LevelKey, ReferencePlaneKey, WallKey};
use crate::parameters::BuiltInParameter;
use crate::types::Category;

/// Result type alias for document operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while querying or editing a document.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A modification was attempted outside of an open transaction.
    #[error("no transaction is open")]
    NoActiveTransaction,

    /// Transactions do not nest.
    #[error("transaction '{0}' is already open")]
    TransactionAlreadyOpen(String),

    /// A referenced element was not found in the document.
    #[error("element not found: {0:?}")]
    ElementNotFound(ElementKey),

    /// Level key not found in the document.
    #[error("level not found: {0:?}")]
    LevelNotFound(LevelKey),

    /// Wall key not found in the document.
    #[error("wall not found: {0:?}")]
    WallNotFound(WallKey),

    /// Element type key not found in the document.
    #[error("element type not found: {0:?}")]
    TypeNotFound(ElementTypeKey),

    /// Reference plane key not found in the document.
    #[error("reference plane not found: {0:?}")]
    ReferencePlaneNotFound(ReferencePlaneKey),

    /// An element type was used where a different category is required.
    #[error("element type has category {actual}, expected {expected}")]
    CategoryMismatch { expected: Category, actual: Category },

    /// Only door and window types can be placed as hosted instances.
    #[error("category {0} cannot be placed as a hosted family instance")]
    NotHostedFamily(Category),

    /// Family symbols must be activated before instances can be placed.
    #[error("family symbol '{0}' is not active")]
    InactiveSymbol(String),

    /// A curve is shorter than the document tolerance.
    #[error("curve is too short: length {0}")]
    CurveTooShort(f64),

    /// A hosted instance must lie on its host wall's location line.
    #[error("placement point is {distance} away from host wall location line")]
    PointNotOnHost { distance: f64 },

    /// Profile lines must be connected end to start.
    #[error("profile is not connected: line {0} does not end where line {next} starts", next = .0 + 1)]
    DisconnectedProfile(usize),

    /// A roof profile needs at least one line.
    #[error("profile must have at least one line")]
    EmptyProfile,

    /// Profile lines must lie in the sketch plane.
    #[error("profile point is {distance} away from the reference plane")]
    ProfileNotInPlane { distance: f64 },

    /// Extrusion end must exceed extrusion start.
    #[error("invalid extrusion range: start {start}, end {end}")]
    InvalidExtrusion { start: f64, end: f64 },

    /// Reference plane points are coincident or collinear.
    #[error("reference plane is degenerate")]
    DegeneratePlane,

    /// The parameter is computed by the document and cannot be written.
    #[error("parameter {0} is read-only")]
    ReadOnlyParameter(BuiltInParameter),

    /// The parameter does not apply to this element kind.
    #[error("parameter {param} does not apply to {key:?}")]
    ParameterNotApplicable { key: ElementKey, param: BuiltInParameter },

    /// The parameter value has the wrong storage type or an invalid target.
    #[error("invalid value for parameter {param}: {reason}")]
    InvalidParameterValue { param: BuiltInParameter, reason: String },

    /// A document template is inconsistent.
    #[error("invalid template: {0}")]
    InvalidTemplate(String),

    /// A document snapshot is inconsistent.
    #[error("invalid snapshot: {0}")]
    InvalidSnapshot(String),

    /// Serialization/deserialization error.
    #[error("serialization error: {0}")]
    Serialization(String),
}
