// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use shellgen_model::{Category, DocumentTemplate, LengthUnit, LevelTemplate, TypeTemplate};

use crate::config::{
    DEFAULT_BASE_LEVEL, DEFAULT_DOOR_FAMILY, DEFAULT_DOOR_TYPE, DEFAULT_ROOF_FAMILY,
    DEFAULT_ROOF_TYPE, DEFAULT_TOP_LEVEL, DEFAULT_WINDOW_FAMILY, DEFAULT_WINDOW_TYPE,
};

/// Template holding the levels and types the default configuration expects.
///
/// Two levels 4 m apart, one door, one window and one roof type, 200 mm walls.
pub fn starter_template() -> DocumentTemplate {
    let ty = |category, family: &str, name: &str| TypeTemplate {
        category,
        family: family.to_string(),
        name: name.to_string(),
        active: None,
    };
    DocumentTemplate {
        length_unit: LengthUnit::Millimeters,
        default_wall_width: 200.0,
        levels: vec![
            LevelTemplate {
                name: DEFAULT_BASE_LEVEL.to_string(),
                elevation: 0.0,
            },
            LevelTemplate {
                name: DEFAULT_TOP_LEVEL.to_string(),
                elevation: 4000.0,
            },
        ],
        types: vec![
            ty(Category::Doors, DEFAULT_DOOR_FAMILY, DEFAULT_DOOR_TYPE),
            ty(Category::Windows, DEFAULT_WINDOW_FAMILY, DEFAULT_WINDOW_TYPE),
            ty(Category::Roofs, DEFAULT_ROOF_FAMILY, DEFAULT_ROOF_TYPE),
        ],
    }
}
