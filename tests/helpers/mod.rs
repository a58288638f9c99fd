#![allow(dead_code)]

use std::path::Path;
use std::time::Duration;

use bevy::asset::{AssetPlugin, AssetServer, LoadState};
use bevy::prelude::*;
use bevy::render::storage::ShaderStorageBuffer;
use bevy::time::TimeUpdateStrategy;
use bevy_garland::asset::{TreeSceneAsset, ValueRange};
use bevy_garland::{GarlandSimulationPlugin, GarlandTree, InstanceData, InstancedMaterial};

pub const FRAME: Duration = Duration::from_millis(50);

pub fn fixtures_path() -> String {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .to_string_lossy()
        .to_string()
}

pub fn create_minimal_app() -> App {
    let mut app = App::new();

    app.add_plugins(MinimalPlugins);

    app.add_plugins(AssetPlugin {
        file_path: fixtures_path(),
        ..default()
    });

    app.insert_resource(TimeUpdateStrategy::ManualDuration(FRAME));

    app.init_asset::<Mesh>();
    app.init_asset::<Image>();
    app.init_asset::<StandardMaterial>();
    app.init_asset::<ShaderStorageBuffer>();
    app.init_asset::<InstancedMaterial>();

    app.add_plugins(GarlandSimulationPlugin);

    app
}

pub fn load_fixture(app: &mut App, filename: &str) -> Handle<TreeSceneAsset> {
    let asset_server = app.world().resource::<AssetServer>();
    asset_server.load(filename.to_string())
}

pub fn run_until_loaded<T: Asset>(app: &mut App, handle: &Handle<T>, max_updates: u32) -> bool {
    for _ in 0..max_updates {
        app.update();

        let asset_server = app.world().resource::<AssetServer>();
        match asset_server.load_state(handle) {
            LoadState::Loaded => return true,
            LoadState::Failed(_) => return false,
            _ => continue,
        }
    }
    false
}

pub fn run_until_failed<T: Asset>(app: &mut App, handle: &Handle<T>, max_updates: u32) -> bool {
    for _ in 0..max_updates {
        app.update();

        let asset_server = app.world().resource::<AssetServer>();
        match asset_server.load_state(handle) {
            LoadState::Failed(_) => return true,
            LoadState::Loaded => return false,
            _ => continue,
        }
    }
    false
}

pub fn load_asset(app: &mut App, fixture: &str) -> TreeSceneAsset {
    let handle = load_fixture(app, fixture);
    for _ in 0..100 {
        app.update();
        let asset_server = app.world().resource::<AssetServer>();
        match asset_server.load_state(&handle) {
            LoadState::Loaded => {
                let assets = app.world().resource::<Assets<TreeSceneAsset>>();
                return assets.get(&handle).expect("asset should exist").clone();
            }
            LoadState::Failed(err) => {
                panic!("fixture failed to load '{fixture}': {err:?}");
            }
            _ => continue,
        }
    }
    panic!("fixture timed out loading: {fixture}");
}

pub fn spawn_tree(app: &mut App, handle: Handle<TreeSceneAsset>) -> Entity {
    app.world_mut().spawn(GarlandTree { handle }).id()
}

/// Loads `fixture`, spawns a tree for it and runs a few frames so its layers exist.
pub fn setup_loaded_tree(fixture: &str) -> (App, Handle<TreeSceneAsset>, Entity) {
    let mut app = create_minimal_app();
    let handle = load_fixture(&mut app, fixture);
    let entity = spawn_tree(&mut app, handle.clone());
    assert!(
        run_until_loaded(&mut app, &handle, 100),
        "fixture should load"
    );
    advance_frames(&mut app, 3);
    (app, handle, entity)
}

pub fn advance_frames(app: &mut App, n: u32) {
    for _ in 0..n {
        app.update();
    }
}

/// Advances virtual time by roughly `seconds` in fixed [`FRAME`] steps.
pub fn advance_seconds(app: &mut App, seconds: f32) {
    let frames = (seconds / FRAME.as_secs_f32()).ceil() as u32;
    advance_frames(app, frames);
}

/// Reads back the instance buffer contents written for a layer.
pub fn read_instances(app: &App, buffer: &Handle<ShaderStorageBuffer>) -> Vec<InstanceData> {
    let buffers = app.world().resource::<Assets<ShaderStorageBuffer>>();
    let data = buffers
        .get(buffer)
        .and_then(|buffer| buffer.data.as_ref())
        .expect("instance buffer should have data");
    bytemuck::pod_collect_to_vec::<u8, InstanceData>(data)
}

pub fn query_all<C: Component + Clone>(app: &mut App) -> Vec<(Entity, C)> {
    let mut query = app.world_mut().query::<(Entity, &C)>();
    query
        .iter(app.world())
        .map(|(entity, component)| (entity, component.clone()))
        .collect()
}

pub fn count<C: Component>(app: &mut App) -> usize {
    app.world_mut().query::<&C>().iter(app.world()).count()
}

/// Returns `true` if `value` lies within the closed range bounds.
pub fn in_range(range: ValueRange, value: f32) -> bool {
    value >= range.min && value <= range.max
}
