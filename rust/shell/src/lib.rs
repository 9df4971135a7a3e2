// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! # Shellgen
//!
//! Procedural building shell generator.
//!
//! Given a document with two levels and door, window and roof types, builds a
//! rectangular shell: four walls from the base level up to the top level, a
//! door on the first wall, a window on each of the other three, and a gable
//! extrusion roof. Every stage runs in its own transaction.
//!
//! ## Quick Start
//!
//! ```rust
//! use shellgen::{starter_template, ShellCommand, ShellConfig};
//! use shellgen_model::{Document, ModelQuery};
//!
//! let mut doc = Document::from_template(&starter_template()).unwrap();
//! let result = ShellCommand::new(ShellConfig::default()).execute(&mut doc);
//!
//! assert!(result.is_success());
//! assert_eq!(doc.walls().len(), 4);
//! ```
//!
//! The building blocks ([`generate_points`], [`create_walls`],
//! [`place_door`], [`place_windows`], [`roof_profile`], [`create_roof`])
//! take any [`ModelEdit`](shellgen_model::ModelEdit) and can be composed
//! into other transactions.

pub mod command;
pub mod config;
pub mod error;
pub mod levels;
pub mod openings;
pub mod points;
pub mod roof;
pub mod template;
pub mod walls;

pub use command::{generate_shell, CommandResult, CommandStatus, ShellCommand, ShellReport};
pub use config::{LevelSelector, ShellConfig, TypeSelector};
pub use error::{Error, Result};
pub use levels::{resolve_level, resolve_level_pair, LevelPair};
pub use openings::{place_door, place_windows, resolve_family_symbol, wall_midpoint};
pub use points::generate_points;
pub use roof::{create_roof, roof_profile, RoofProfile};
pub use template::starter_template;
pub use walls::{create_walls, has_marked_walls, DOOR_WALL, WINDOW_WALLS};
