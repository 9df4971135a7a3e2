// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! The shell generation command.
//!
//! Stages run in order, each inside its own named transaction:
//!
//! | Stage          | Transaction      |
//! |----------------|------------------|
//! | walls          | `Create walls`   |
//! | door           | `Insert door`    |
//! | windows        | `Insert windows` |
//! | roof           | `Create roof`    |
//!
//! Levels and element types are resolved before the first transaction opens,
//! so a missing level or type leaves the document untouched. A stage that
//! fails rolls back its own changes; stages committed before it stay.

use std::time::Instant;

use serde::Serialize;
use shellgen_model::{
    Category, Document, ElementId, ElementKey, InstanceKey, ModelQuery, RoofKey, WallKey,
};

use crate::config::ShellConfig;
use crate::error::{Error, Result};
use crate::levels::resolve_level_pair;
use crate::openings::{place_door, place_windows, resolve_family_symbol};
use crate::points::generate_points;
use crate::roof::{create_roof, roof_profile};
use crate::walls::{create_walls, has_marked_walls, DOOR_WALL, WINDOW_WALLS};

pub const CREATE_WALLS: &str = "Create walls";
pub const INSERT_DOOR: &str = "Insert door";
pub const INSERT_WINDOWS: &str = "Insert windows";
pub const CREATE_ROOF: &str = "Create roof";

/// Elements created by one generation run.
#[derive(Debug, Clone, PartialEq)]
pub struct ShellReport {
    pub walls: [WallKey; 4],
    pub door: InstanceKey,
    pub windows: Vec<InstanceKey>,
    pub roof: RoofKey,
}

impl ShellReport {
    /// Stable ids of every created element, walls first and roof last.
    pub fn element_ids(&self, doc: &impl ModelQuery) -> Vec<ElementId> {
        self.walls
            .iter()
            .map(|&w| ElementKey::from(w))
            .chain(std::iter::once(ElementKey::from(self.door)))
            .chain(self.windows.iter().map(|&w| ElementKey::from(w)))
            .chain(std::iter::once(ElementKey::from(self.roof)))
            .filter_map(|key| doc.element_id(key))
            .collect()
    }
}

/// Outcome reported to the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CommandStatus {
    Succeeded,
    Failed,
    Cancelled,
}

impl std::fmt::Display for CommandStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            CommandStatus::Succeeded => "succeeded",
            CommandStatus::Failed => "failed",
            CommandStatus::Cancelled => "cancelled",
        })
    }
}

#[derive(Debug, Clone)]
pub struct CommandResult {
    pub status: CommandStatus,
    pub message: Option<String>,
    pub report: Option<ShellReport>,
}

impl CommandResult {
    pub fn is_success(&self) -> bool {
        self.status == CommandStatus::Succeeded
    }
}

/// Builds a shell from the configured levels and types.
///
/// Returns [`Error::ShellAlreadyPresent`] when the document already holds
/// walls with the configured mark, unless duplicates are allowed.
pub fn generate_shell(doc: &mut Document, config: &ShellConfig) -> Result<ShellReport> {
    config.validate()?;
    if !config.allow_duplicates && has_marked_walls(&*doc, &config.mark) {
        return Err(Error::ShellAlreadyPresent(config.mark.clone()));
    }

    let levels = resolve_level_pair(&*doc, &config.base_level, &config.top_level)?;
    let door_symbol = resolve_family_symbol(&*doc, Category::Doors, &config.door)?;
    let window_symbol = resolve_family_symbol(&*doc, Category::Windows, &config.window)?;
    let roof_type = resolve_family_symbol(&*doc, Category::Roofs, &config.roof)?;

    let points = generate_points(config.width(), config.depth());

    let walls = doc.transact(CREATE_WALLS, |tx| {
        create_walls(tx, &levels, &points, &config.mark)
    })?;
    tracing::info!(count = walls.len(), "Walls created");

    let door = doc.transact(INSERT_DOOR, |tx| {
        place_door(tx, door_symbol, walls[DOOR_WALL], levels.base)
    })?;
    tracing::info!("Door inserted");

    let windows = doc.transact(INSERT_WINDOWS, |tx| {
        place_windows(
            tx,
            window_symbol,
            &walls[WINDOW_WALLS],
            levels.base,
            config.sill_height(),
        )
    })?;
    tracing::info!(count = windows.len(), "Windows inserted");

    let roof = doc.transact(CREATE_ROOF, |tx| {
        let profile = roof_profile(&*tx, walls[0], walls[1], levels.top, config.roof_rise())?;
        create_roof(tx, &profile, levels.top, roof_type)
    })?;
    tracing::info!("Roof created");

    Ok(ShellReport {
        walls,
        door,
        windows,
        roof,
    })
}

/// Host-facing command wrapper around [`generate_shell`].
#[derive(Debug, Clone, Default)]
pub struct ShellCommand {
    config: ShellConfig,
}

impl ShellCommand {
    pub fn new(config: ShellConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ShellConfig {
        &self.config
    }

    /// Runs the command and maps the outcome to a host status.
    pub fn execute(&self, doc: &mut Document) -> CommandResult {
        let start = Instant::now();
        tracing::info!(
            width_mm = self.config.width_mm,
            depth_mm = self.config.depth_mm,
            "Starting shell generation"
        );

        match generate_shell(doc, &self.config) {
            Ok(report) => {
                tracing::info!(
                    elapsed_ms = start.elapsed().as_millis(),
                    elements = doc.element_count(),
                    "Shell generation complete"
                );
                CommandResult {
                    status: CommandStatus::Succeeded,
                    message: None,
                    report: Some(report),
                }
            }
            Err(err @ Error::ShellAlreadyPresent(_)) => {
                tracing::warn!(error = %err, "Shell generation cancelled");
                CommandResult {
                    status: CommandStatus::Cancelled,
                    message: Some(err.to_string()),
                    report: None,
                }
            }
            Err(err) => {
                tracing::error!(error = %err, "Shell generation failed");
                CommandResult {
                    status: CommandStatus::Failed,
                    message: Some(err.to_string()),
                    report: None,
                }
            }
        }
    }
}
