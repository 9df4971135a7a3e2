// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! End-to-end shell generation against the starter template.

use approx::assert_relative_eq;
use nalgebra::Point3;
use shellgen::{
    generate_points, generate_shell, starter_template, CommandStatus, Error, LevelSelector,
    ShellCommand, ShellConfig, TypeSelector,
};
use shellgen_model::units::mm;
use shellgen_model::{BuiltInParameter, Category, Document, ModelQuery, ParamValue};

fn document() -> Document {
    Document::from_template(&starter_template()).unwrap()
}

#[test]
fn default_rectangle_in_internal_units() {
    let (w, d) = (mm(10000.0), mm(5000.0));
    let points = generate_points(w, d);
    assert_eq!(points.len(), 5);
    assert_eq!(points[0], Point3::new(-w / 2.0, -d / 2.0, 0.0));
    assert_eq!(points[1], Point3::new(w / 2.0, -d / 2.0, 0.0));
    assert_eq!(points[2], Point3::new(w / 2.0, d / 2.0, 0.0));
    assert_eq!(points[3], Point3::new(-w / 2.0, d / 2.0, 0.0));
    assert_eq!(points[4], points[0]);

    let (min_x, max_x) = points
        .iter()
        .fold((f64::MAX, f64::MIN), |(lo, hi), p| (lo.min(p.x), hi.max(p.x)));
    assert_relative_eq!(max_x - min_x, w);
}

#[test]
fn four_walls_span_base_to_top() {
    let mut doc = document();
    let report = generate_shell(&mut doc, &ShellConfig::default()).unwrap();
    let levels = doc.levels();
    let (base, top) = (levels[0].0, levels[1].0);

    assert_eq!(doc.walls().len(), 4);
    let points = generate_points(mm(10000.0), mm(5000.0));
    for (i, key) in report.walls.iter().enumerate() {
        let wall = doc.wall(*key).unwrap();
        assert_eq!(wall.base_level, base);
        assert_relative_eq!(wall.location.start().x, points[i].x, epsilon = 1e-12);
        assert_relative_eq!(wall.location.end().y, points[i + 1].y, epsilon = 1e-12);
        assert_eq!(
            doc.parameter((*key).into(), BuiltInParameter::WallTopConstraint)
                .unwrap(),
            Some(ParamValue::Level(top))
        );
    }
}

#[test]
fn door_on_first_wall_and_windows_on_the_rest() {
    let mut doc = document();
    let report = generate_shell(&mut doc, &ShellConfig::default()).unwrap();

    let door = doc.instance(report.door).unwrap();
    assert_eq!(door.host, report.walls[0]);
    let door_type = doc.element_type(door.symbol).unwrap();
    assert_eq!(door_type.category, Category::Doors);
    assert!(door_type.active);

    let hosts: Vec<_> = report
        .windows
        .iter()
        .map(|w| doc.instance(*w).unwrap().host)
        .collect();
    assert_eq!(hosts, report.walls[1..=3].to_vec());

    for (key, instance) in doc.instances() {
        let wall = doc.wall(instance.host).unwrap();
        assert_relative_eq!(wall.location.distance_to_point(&instance.location), 0.0, epsilon = 1e-9);
        if key != report.door {
            assert_eq!(
                doc.element_type(instance.symbol).unwrap().category,
                Category::Windows
            );
        }
    }
}

#[test]
fn window_sill_height_is_850_mm() {
    let mut doc = document();
    let report = generate_shell(&mut doc, &ShellConfig::default()).unwrap();
    for window in &report.windows {
        let value = doc
            .parameter((*window).into(), BuiltInParameter::InstanceSillHeight)
            .unwrap()
            .and_then(|v| v.as_double())
            .unwrap();
        assert_relative_eq!(value, 850.0 / 304.8, epsilon = 1e-12);
    }
}

#[test]
fn roof_covers_walls_and_sits_on_top_level() {
    let mut doc = document();
    let report = generate_shell(&mut doc, &ShellConfig::default()).unwrap();
    let roof = doc.roof(report.roof).unwrap();
    let top = doc.levels()[1].0;
    let front = doc.wall(report.walls[0]).unwrap();

    assert_eq!(roof.level, top);
    assert_relative_eq!(
        roof.extrusion_length(),
        front.location.length() + front.width,
        epsilon = 1e-9
    );
    assert_eq!(roof.profile.len(), 2);
    let ridge = roof.profile[0].end();
    assert_relative_eq!(ridge.z - roof.profile[0].start().z, 5.0, epsilon = 1e-9);
    assert_relative_eq!(roof.profile[0].start().z, mm(4000.0), epsilon = 1e-9);
}

#[test]
fn missing_level_leaves_document_untouched() {
    let mut doc = document();
    let before = doc.element_count();
    let config = ShellConfig {
        top_level: LevelSelector::name("Level 2"),
        ..ShellConfig::default()
    };
    assert!(matches!(
        generate_shell(&mut doc, &config),
        Err(Error::LevelNotFound(_))
    ));
    assert_eq!(doc.element_count(), before);
}

#[test]
fn missing_roof_type_leaves_document_untouched() {
    let mut doc = document();
    let before = doc.element_count();
    let config = ShellConfig {
        roof: TypeSelector::name("Basic Roof", "Generic - 400mm"),
        ..ShellConfig::default()
    };
    assert!(matches!(
        generate_shell(&mut doc, &config),
        Err(Error::TypeNotFound {
            category: Category::Roofs,
            ..
        })
    ));
    assert_eq!(doc.element_count(), before);
    assert!(doc.element_types(Category::Doors).iter().all(|(_, t)| !t.active));
}

#[test]
fn rerun_is_cancelled_unless_duplicates_allowed() {
    let mut doc = document();
    let command = ShellCommand::default();
    assert_eq!(command.execute(&mut doc).status, CommandStatus::Succeeded);
    assert_eq!(command.execute(&mut doc).status, CommandStatus::Cancelled);
    assert_eq!(doc.walls().len(), 4);

    let again = ShellCommand::new(ShellConfig {
        allow_duplicates: true,
        ..ShellConfig::default()
    });
    assert_eq!(again.execute(&mut doc).status, CommandStatus::Succeeded);
    assert_eq!(doc.walls().len(), 8);
    assert_eq!(doc.roofs().len(), 2);
}

#[test]
fn invalid_dimensions_fail_the_command() {
    let mut doc = document();
    let result = ShellCommand::new(ShellConfig {
        width_mm: -1.0,
        ..ShellConfig::default()
    })
    .execute(&mut doc);
    assert_eq!(result.status, CommandStatus::Failed);
    assert!(doc.walls().is_empty());
}
