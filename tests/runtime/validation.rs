use bevy_garland::asset::versioning::{VersionStatus, current_format_version, validate_version};
use bevy_garland::asset::*;

fn parse(source: &str) -> TreeSceneAsset {
    ron::from_str(source).unwrap()
}

#[test]
fn default_scene_is_valid() {
    assert_eq!(TreeSceneAsset::default().validate(), Ok(()));
}

#[test]
fn default_scene_uses_current_version() {
    assert_eq!(TreeSceneAsset::default().format_version(), current_format_version());
}

#[test]
fn outdated_scene_is_upgraded_in_place() {
    let mut scene = parse(r#"(garland_version: "0.1")"#);
    let status = scene.try_upgrade_version();
    assert!(matches!(status, VersionStatus::Outdated { .. }));
    assert_eq!(scene.format_version(), current_format_version());
    assert_eq!(scene.try_upgrade_version(), VersionStatus::Current);
}

#[test]
fn unknown_version_is_left_alone() {
    let mut scene = parse(r#"(garland_version: "9.9")"#);
    assert_eq!(scene.try_upgrade_version(), VersionStatus::Unknown);
    assert_eq!(scene.format_version(), "9.9");
}

#[test]
fn validate_version_statuses() {
    assert_eq!(validate_version(current_format_version()), VersionStatus::Current);
    assert_eq!(validate_version(""), VersionStatus::Unknown);
}

#[test]
fn negative_tree_radius_is_rejected() {
    let mut scene = TreeSceneAsset::default();
    scene.needles.tree.max_radius = -1.0;
    assert_eq!(
        scene.validate(),
        Err(TreeSceneError::NegativeRadius {
            field: "needles.tree.max_radius".to_string(),
            value: -1.0,
        })
    );
}

#[test]
fn zero_height_is_rejected() {
    let mut scene = TreeSceneAsset::default();
    scene.ornaments.tree.height = 0.0;
    assert!(matches!(
        scene.validate(),
        Err(TreeSceneError::NonPositiveHeight { field, .. }) if field == "ornaments.tree.height"
    ));
}

#[test]
fn inverted_range_is_rejected() {
    let mut scene = TreeSceneAsset::default();
    scene.photos.float_radius = ValueRange::new(0.5, 0.2);
    assert_eq!(
        scene.validate(),
        Err(TreeSceneError::InvertedRange {
            field: "photos.float_radius".to_string(),
            min: 0.5,
            max: 0.2,
        })
    );
}

#[test]
fn zero_assemble_rate_is_rejected() {
    let mut scene = TreeSceneAsset::default();
    scene.assemble_rate = 0.0;
    assert!(matches!(
        scene.validate(),
        Err(TreeSceneError::NonPositiveFactor { .. })
    ));
}

#[test]
fn non_finite_radius_is_rejected() {
    let mut scene = TreeSceneAsset::default();
    scene.starfield.radius = f32::NAN;
    assert!(scene.validate().is_err());
}

#[test]
fn empty_layers_are_valid() {
    let mut scene = TreeSceneAsset::default();
    scene.needles.count = 0;
    scene.ornaments.enabled = false;
    scene.starfield.count = 0;
    assert_eq!(scene.validate(), Ok(()));
}

#[test]
fn errors_name_the_offending_field() {
    let error = TreeSceneError::InvertedRange {
        field: "needles.scale".to_string(),
        min: 2.0,
        max: 1.0,
    };
    assert_eq!(
        error.to_string(),
        "needles.scale has min 2 greater than max 1"
    );
}
