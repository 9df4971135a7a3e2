// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Gable roof built as an extrusion over the wall loop.
//!
//! The roof profile is a two-segment gable sketched in the YZ plane at the
//! outer corner of the front wall, then extruded along X over the front
//! wall's length. The footprint is enlarged by half a wall thickness on every
//! side so the roof covers the outer faces of the walls.

use nalgebra::{Point3, Vector3};
use shellgen_model::{
    BuiltInParameter, ElementTypeKey, Error as ModelError, LevelKey, Line, ModelEdit, ModelQuery,
    RoofKey, WallKey,
};
use tracing::debug;

use crate::error::{Error, Result};

/// Gable outline and extrusion depth for an extrusion roof.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RoofProfile {
    /// Eave corner the profile starts from; also the sketch plane origin.
    pub origin: Point3<f64>,
    /// Rising slope, then falling slope.
    pub lines: [Line; 2],
    /// Extrusion depth along X.
    pub extrusion_length: f64,
}

/// Computes the roof profile from the front wall and one side wall.
///
/// The front wall must run along +X from its start point. The roof sits at
/// the elevation of `level`, and the ridge is `rise` above the eaves.
/// `rise` is taken as given; [`crate::ShellConfig::validate`] is what keeps
/// it positive for the command.
pub fn roof_profile(
    doc: &impl ModelQuery,
    front_wall: WallKey,
    side_wall: WallKey,
    level: LevelKey,
    rise: f64,
) -> Result<RoofProfile> {
    let front = doc
        .wall(front_wall)
        .ok_or(Error::Model(ModelError::WallNotFound(front_wall)))?;
    let side = doc
        .wall(side_wall)
        .ok_or(Error::Model(ModelError::WallNotFound(side_wall)))?;
    let elevation = doc
        .parameter(level.into(), BuiltInParameter::LevelElevation)?
        .and_then(|v| v.as_double())
        .ok_or(Error::Model(ModelError::LevelNotFound(level)))?;

    let df = front.width / 2.0;
    let origin = front.location.start() + Vector3::new(-df, -df, elevation);
    let extrusion_length = front.location.length() + 2.0 * df;
    let half_span = side.location.length() / 2.0 + df;

    let ridge = origin + Vector3::new(0.0, half_span, rise);
    let eave = origin + Vector3::new(0.0, 2.0 * half_span, 0.0);
    let lines = [Line::create_bound(origin, ridge)?, Line::create_bound(ridge, eave)?];

    Ok(RoofProfile {
        origin,
        lines,
        extrusion_length,
    })
}

/// Creates the sketch plane and the extrusion roof for `profile`.
///
/// The plane passes through the profile origin with its normal along +X;
/// the roof is extruded from 0 to the profile's extrusion length.
pub fn create_roof<M: ModelEdit>(
    tx: &mut M,
    profile: &RoofProfile,
    level: LevelKey,
    roof_type: ElementTypeKey,
) -> Result<RoofKey> {
    let plane = tx.create_reference_plane(
        profile.origin,
        profile.origin - Vector3::z(),
        Vector3::y(),
    )?;
    let roof = tx.create_extrusion_roof(
        &profile.lines,
        plane,
        level,
        roof_type,
        0.0,
        profile.extrusion_length,
    )?;
    debug!(length = profile.extrusion_length, "roof created");
    Ok(roof)
}
