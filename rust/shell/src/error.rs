// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Error types for shell generation.

use shellgen_model::Category;

use crate::config::{LevelSelector, TypeSelector};

/// Result type alias for shell generation.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while generating a building shell.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// No level matches the selector.
    #[error("level not found: {0}")]
    LevelNotFound(LevelSelector),

    /// No element type of the category matches the selector.
    #[error("{category} type not found: {selector}")]
    TypeNotFound {
        category: Category,
        selector: TypeSelector,
    },

    /// The top level is not above the base level.
    #[error("top level '{top}' must be above base level '{base}'")]
    InvalidLevelPair { base: String, top: String },

    /// A configured length is not a positive finite number.
    #[error("invalid dimension: {0}")]
    InvalidDimensions(String),

    /// The document already contains walls carrying the generator mark.
    #[error("document already contains a shell marked '{0}'")]
    ShellAlreadyPresent(String),

    /// Configuration could not be parsed.
    #[error("configuration error: {0}")]
    Config(String),

    /// Configuration file could not be read.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The model rejected an operation.
    #[error(transparent)]
    Model(#[from] shellgen_model::Error),
}
