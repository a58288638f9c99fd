use super::helpers::*;

use bevy::prelude::*;
use bevy_garland::photos::{PhotoMaterialHandle, PhotoMotion};
use bevy_garland::{
    AddPhotos, PendingPhotos, PhotoClickConsumed, PhotoPanel, PhotoSelection, SelectPhoto,
    ToggleTreeMode, TreeMode,
};

fn panels(app: &mut App) -> Vec<(Entity, PhotoPanel)> {
    let mut panels = query_all::<PhotoPanel>(app);
    panels.sort_by_key(|(_, panel)| panel.index);
    panels
}

fn selection(app: &App) -> Option<Entity> {
    app.world().resource::<PhotoSelection>().selected
}

fn click(app: &mut App, button: MouseButton) {
    app.init_resource::<ButtonInput<MouseButton>>();
    let mut mouse = app.world_mut().resource_mut::<ButtonInput<MouseButton>>();
    mouse.press(button);
    mouse.release(button);
}

fn click_photo(app: &mut App, photo: Entity) {
    let next = app.world().resource::<PhotoSelection>().toggled(photo);
    app.world_mut().trigger(SelectPhoto(next));
}

#[test]
fn scene_photos_spawn_with_the_tree() {
    let (mut app, _, tree) = setup_loaded_tree("with_photos.tree.ron");

    let panels = panels(&mut app);
    assert_eq!(panels.len(), 2);
    assert_eq!(panels[0].1.index, 0);
    assert_eq!(panels[0].1.path, "photos/first.png");
    assert_eq!(panels[1].1.index, 1);
    assert_eq!(panels[1].1.path, "photos/second.png");
    for (entity, panel) in &panels {
        assert_eq!(panel.parent_tree, tree);
        let child_of = app.world().get::<ChildOf>(*entity).expect("child of tree");
        assert_eq!(child_of.parent(), tree);
    }
}

#[test]
fn photos_requested_early_wait_for_the_tree() {
    let mut app = create_minimal_app();
    let handle = load_fixture(&mut app, "bare.tree.ron");
    let tree = spawn_tree(&mut app, handle.clone());

    app.world_mut().trigger(AddPhotos {
        tree,
        paths: vec!["queued.png".to_string()],
    });
    app.world_mut().flush();
    let pending = app.world().get::<PendingPhotos>(tree).expect("queued");
    assert_eq!(pending.0, vec!["queued.png".to_string()]);

    assert!(run_until_loaded(&mut app, &handle, 100));
    advance_frames(&mut app, 3);

    let panels = panels(&mut app);
    assert_eq!(panels.len(), 1);
    assert_eq!(panels[0].1.path, "queued.png");
    assert!(app.world().get::<PendingPhotos>(tree).expect("pending").0.is_empty());
}

#[test]
fn adding_photos_scatters_and_clears_selection() {
    let (mut app, _, tree) = setup_loaded_tree("with_photos.tree.ron");
    let first = panels(&mut app)[0].0;

    app.world_mut().trigger(ToggleTreeMode);
    app.world_mut().trigger(SelectPhoto(Some(first)));
    assert_eq!(selection(&app), Some(first));

    app.world_mut().trigger(AddPhotos {
        tree,
        paths: vec!["third.png".to_string(), "fourth.png".to_string()],
    });
    app.world_mut().flush();
    advance_frames(&mut app, 1);

    assert_eq!(*app.world().resource::<TreeMode>(), TreeMode::Scattered);
    assert_eq!(selection(&app), None);

    let panels = panels(&mut app);
    let indices: Vec<usize> = panels.iter().map(|(_, panel)| panel.index).collect();
    assert_eq!(indices, vec![0, 1, 2, 3]);
}

#[test]
fn adding_photos_respaces_existing_tree_positions() {
    let (mut app, handle, tree) = setup_loaded_tree("with_photos.tree.ron");
    let second = panels(&mut app)[1].0;
    let config = app
        .world()
        .resource::<Assets<bevy_garland::asset::TreeSceneAsset>>()
        .get(&handle)
        .expect("asset")
        .photos
        .clone();
    let half = config.tree.height / 2.0;

    let before = app.world().get::<PhotoMotion>(second).expect("motion").clone();
    assert!(before.tree_position.y.abs() < 1e-4);

    app.world_mut().trigger(AddPhotos {
        tree,
        paths: vec!["third.png".to_string(), "fourth.png".to_string()],
    });
    app.world_mut().flush();

    let after = app.world().get::<PhotoMotion>(second).expect("motion").clone();
    assert!((after.tree_position.y - (0.25 * config.tree.height - half)).abs() < 1e-4);
    assert_eq!(after.scatter_position, before.scatter_position);
}

#[test]
fn empty_add_is_ignored() {
    let (mut app, _, tree) = setup_loaded_tree("with_photos.tree.ron");
    app.world_mut().trigger(ToggleTreeMode);
    app.world_mut().trigger(AddPhotos {
        tree,
        paths: Vec::new(),
    });
    app.world_mut().flush();

    assert_eq!(count::<PhotoPanel>(&mut app), 2);
    assert_eq!(*app.world().resource::<TreeMode>(), TreeMode::TreeShape);
}

#[test]
fn select_and_clear() {
    let (mut app, ..) = setup_loaded_tree("with_photos.tree.ron");
    let panels = panels(&mut app);

    app.world_mut().trigger(SelectPhoto(Some(panels[1].0)));
    assert_eq!(selection(&app), Some(panels[1].0));

    app.world_mut().trigger(SelectPhoto(Some(panels[0].0)));
    assert_eq!(selection(&app), Some(panels[0].0));

    app.world_mut().trigger(SelectPhoto(None));
    assert_eq!(selection(&app), None);
}

#[test]
fn selecting_a_non_photo_clears_the_selection() {
    let (mut app, _, tree) = setup_loaded_tree("with_photos.tree.ron");
    let first = panels(&mut app)[0].0;

    app.world_mut().trigger(SelectPhoto(Some(first)));
    app.world_mut().trigger(SelectPhoto(Some(tree)));
    assert_eq!(selection(&app), None);
}

#[test]
fn clicking_a_photo_toggles_it() {
    let (mut app, ..) = setup_loaded_tree("with_photos.tree.ron");
    let panels = panels(&mut app);

    click_photo(&mut app, panels[0].0);
    assert_eq!(selection(&app), Some(panels[0].0));

    click_photo(&mut app, panels[1].0);
    assert_eq!(selection(&app), Some(panels[1].0));

    click_photo(&mut app, panels[1].0);
    assert_eq!(selection(&app), None);
}

#[test]
fn background_click_clears_the_selection() {
    let (mut app, ..) = setup_loaded_tree("with_photos.tree.ron");
    let first = panels(&mut app)[0].0;
    app.world_mut().trigger(SelectPhoto(Some(first)));

    click(&mut app, MouseButton::Left);
    app.update();

    assert_eq!(selection(&app), None);
}

#[test]
fn click_consumed_by_a_photo_keeps_the_selection() {
    let (mut app, ..) = setup_loaded_tree("with_photos.tree.ron");
    let first = panels(&mut app)[0].0;
    app.world_mut().trigger(SelectPhoto(Some(first)));

    click(&mut app, MouseButton::Left);
    app.insert_resource(PhotoClickConsumed(true));
    app.update();

    assert_eq!(selection(&app), Some(first));
    assert_eq!(
        *app.world().resource::<PhotoClickConsumed>(),
        PhotoClickConsumed(false)
    );
}

#[test]
fn secondary_click_keeps_the_selection() {
    let (mut app, ..) = setup_loaded_tree("with_photos.tree.ron");
    let first = panels(&mut app)[0].0;
    app.world_mut().trigger(SelectPhoto(Some(first)));

    click(&mut app, MouseButton::Right);
    app.update();

    assert_eq!(selection(&app), Some(first));
}

#[test]
fn scattered_photos_fade_in() {
    let (mut app, ..) = setup_loaded_tree("with_photos.tree.ron");
    advance_seconds(&mut app, 1.5);

    for (entity, _) in panels(&mut app) {
        assert_eq!(
            app.world().get::<Visibility>(entity),
            Some(&Visibility::Inherited)
        );
        let motion = app.world().get::<PhotoMotion>(entity).expect("motion");
        assert!(motion.opacity_progress > 0.9);
    }
}

#[test]
fn assembled_tree_hides_photos() {
    let (mut app, ..) = setup_loaded_tree("with_photos.tree.ron");
    advance_seconds(&mut app, 1.0);
    app.world_mut().trigger(ToggleTreeMode);
    advance_seconds(&mut app, 4.0);

    for (entity, _) in panels(&mut app) {
        assert_eq!(
            app.world().get::<Visibility>(entity),
            Some(&Visibility::Hidden)
        );
    }
}

#[test]
fn selected_photo_grows_and_draws_on_top() {
    let (mut app, handle, _) = setup_loaded_tree("with_photos.tree.ron");
    let panels = panels(&mut app);
    let (selected, other) = (panels[0].0, panels[1].0);
    let focus_scale = app
        .world()
        .resource::<Assets<bevy_garland::asset::TreeSceneAsset>>()
        .get(&handle)
        .expect("asset")
        .photos
        .focus_scale;

    app.world_mut().trigger(SelectPhoto(Some(selected)));
    advance_seconds(&mut app, 2.0);

    let transform = app.world().get::<Transform>(selected).expect("transform");
    assert!((transform.scale.x - focus_scale).abs() < 1e-3);
    assert_eq!(
        app.world().get::<Visibility>(selected),
        Some(&Visibility::Inherited)
    );

    let materials = app.world().resource::<Assets<StandardMaterial>>();
    let depth_bias = |entity: Entity| {
        let handle = &app.world().get::<PhotoMaterialHandle>(entity).expect("material").0;
        materials.get(handle).expect("material asset").depth_bias
    };
    assert!(depth_bias(selected) > 0.0);
    assert_eq!(depth_bias(other), 0.0);
}

#[test]
fn selected_photo_stays_visible_in_tree_mode() {
    let (mut app, ..) = setup_loaded_tree("with_photos.tree.ron");
    let first = panels(&mut app)[0].0;

    app.world_mut().trigger(ToggleTreeMode);
    app.world_mut().trigger(SelectPhoto(Some(first)));
    advance_seconds(&mut app, 3.0);

    assert_eq!(
        app.world().get::<Visibility>(first),
        Some(&Visibility::Inherited)
    );
}
