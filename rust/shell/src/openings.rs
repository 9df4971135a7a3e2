// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Door and window placement on host walls.

use nalgebra::Point3;
use shellgen_model::{
    BuiltInParameter, Category, ElementTypeKey, Error as ModelError, InstanceKey, LevelKey,
    ModelEdit, ModelQuery, ParamValue, StructuralType, WallKey,
};
use tracing::{debug, warn};

use crate::config::TypeSelector;
use crate::error::{Error, Result};

/// Finds the element type of `category` a selector refers to.
///
/// A selector by id must point at a type of the requested category.
pub fn resolve_family_symbol(
    doc: &impl ModelQuery,
    category: Category,
    selector: &TypeSelector,
) -> Result<ElementTypeKey> {
    let not_found = || Error::TypeNotFound {
        category,
        selector: selector.clone(),
    };
    match selector {
        TypeSelector::Id(id) => doc
            .element_type_by_id(*id)
            .filter(|key| {
                doc.element_type(*key)
                    .is_some_and(|ty| ty.category == category)
            })
            .ok_or_else(not_found),
        TypeSelector::Name { family, name } => {
            let matches: Vec<ElementTypeKey> = doc
                .element_types(category)
                .into_iter()
                .filter(|(_, ty)| ty.family_name == *family && ty.type_name == *name)
                .map(|(key, _)| key)
                .collect();
            if matches.len() > 1 {
                warn!(%category, %selector, count = matches.len(), "type name is ambiguous, using the first");
            }
            matches.first().copied().ok_or_else(not_found)
        }
    }
}

/// Midpoint of a wall's location line.
pub fn wall_midpoint(doc: &impl ModelQuery, wall: WallKey) -> Result<Point3<f64>> {
    doc.wall(wall)
        .map(|w| w.location.midpoint())
        .ok_or(Error::Model(ModelError::WallNotFound(wall)))
}

/// Places a door at the midpoint of `wall`, activating the symbol first.
pub fn place_door<M: ModelEdit>(
    tx: &mut M,
    symbol: ElementTypeKey,
    wall: WallKey,
    level: LevelKey,
) -> Result<InstanceKey> {
    tx.activate_symbol(symbol)?;
    let location = wall_midpoint(&*tx, wall)?;
    let door = tx.create_family_instance(
        location,
        symbol,
        wall,
        level,
        StructuralType::NonStructural,
    )?;
    debug!(x = location.x, y = location.y, "door placed");
    Ok(door)
}

/// Places one window at the midpoint of each wall and sets its sill height.
pub fn place_windows<M: ModelEdit>(
    tx: &mut M,
    symbol: ElementTypeKey,
    walls: &[WallKey],
    level: LevelKey,
    sill_height: f64,
) -> Result<Vec<InstanceKey>> {
    tx.activate_symbol(symbol)?;
    let mut windows = Vec::with_capacity(walls.len());
    for &wall in walls {
        let location = wall_midpoint(&*tx, wall)?;
        let window = tx.create_family_instance(
            location,
            symbol,
            wall,
            level,
            StructuralType::NonStructural,
        )?;
        tx.set_parameter(
            window.into(),
            BuiltInParameter::InstanceSillHeight,
            ParamValue::Double(sill_height),
        )?;
        windows.push(window);
    }
    debug!(count = windows.len(), sill_height, "windows placed");
    Ok(windows)
}
