// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Level resolution.

use shellgen_model::{LevelKey, ModelQuery};
use tracing::warn;

use crate::config::LevelSelector;
use crate::error::{Error, Result};

/// Base and top constraint levels for the shell's walls.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LevelPair {
    pub base: LevelKey,
    pub top: LevelKey,
}

/// Finds the level a selector refers to.
///
/// Names match exactly. When several levels share a name the first one
/// created wins and a warning is logged.
pub fn resolve_level(doc: &impl ModelQuery, selector: &LevelSelector) -> Result<LevelKey> {
    match selector {
        LevelSelector::Id(id) => doc
            .level_by_id(*id)
            .ok_or_else(|| Error::LevelNotFound(selector.clone())),
        LevelSelector::Name(name) => {
            let matches: Vec<LevelKey> = doc
                .levels()
                .into_iter()
                .filter(|(_, level)| level.name == *name)
                .map(|(key, _)| key)
                .collect();
            if matches.len() > 1 {
                warn!(level = %name, count = matches.len(), "level name is ambiguous, using the first");
            }
            matches
                .first()
                .copied()
                .ok_or_else(|| Error::LevelNotFound(selector.clone()))
        }
    }
}

/// Resolves base and top levels and checks that top is above base.
pub fn resolve_level_pair(
    doc: &impl ModelQuery,
    base: &LevelSelector,
    top: &LevelSelector,
) -> Result<LevelPair> {
    let base_key = resolve_level(doc, base)?;
    let top_key = resolve_level(doc, top)?;

    let (base_level, top_level) = match (doc.level(base_key), doc.level(top_key)) {
        (Some(b), Some(t)) => (b, t),
        _ => return Err(Error::LevelNotFound(base.clone())),
    };
    if top_level.elevation <= base_level.elevation {
        return Err(Error::InvalidLevelPair {
            base: base_level.name.clone(),
            top: top_level.name.clone(),
        });
    }

    Ok(LevelPair {
        base: base_key,
        top: top_key,
    })
}
