// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Wall loop construction.

use nalgebra::Point3;
use shellgen_model::{BuiltInParameter, Line, ModelEdit, ModelQuery, ParamValue, WallKey};
use tracing::debug;

use crate::error::Result;
use crate::levels::LevelPair;

/// Index of the wall that receives the door.
pub const DOOR_WALL: usize = 0;

/// Indices of the walls that receive windows.
pub const WINDOW_WALLS: std::ops::RangeInclusive<usize> = 1..=3;

/// Creates four non-structural walls along consecutive point pairs.
///
/// Each wall sits on `levels.base`, is constrained to `levels.top`, and
/// carries `mark`. Walls come back in point order: wall `i` runs from
/// `points[i]` to `points[i + 1]`. Runs inside the caller's transaction, so a
/// failure on any wall discards the others with it.
pub fn create_walls<M: ModelEdit>(
    tx: &mut M,
    levels: &LevelPair,
    points: &[Point3<f64>; 5],
    mark: &str,
) -> Result<[WallKey; 4]> {
    let mut walls = [WallKey::default(); 4];
    for (i, pair) in points.windows(2).enumerate() {
        let line = Line::create_bound(pair[0], pair[1])?;
        let wall = tx.create_wall(line, levels.base, false)?;
        tx.set_parameter(
            wall.into(),
            BuiltInParameter::WallTopConstraint,
            ParamValue::Level(levels.top),
        )?;
        tx.set_parameter(
            wall.into(),
            BuiltInParameter::Mark,
            ParamValue::String(mark.to_string()),
        )?;
        debug!(index = i, length = line.length(), "wall placed");
        walls[i] = wall;
    }
    Ok(walls)
}

/// Returns true if any wall in the document carries `mark`.
pub fn has_marked_walls(doc: &impl ModelQuery, mark: &str) -> bool {
    doc.walls().into_iter().any(|(key, _)| {
        matches!(
            doc.parameter(key.into(), BuiltInParameter::Mark),
            Ok(Some(ParamValue::String(ref m))) if m == mark
        )
    })
}
