use bevy::prelude::*;
use bevy_garland::prelude::*;

use crate::cli::CliArgs;
use crate::ui::ViewerTree;
use crate::viewport::{
    BACKGROUND_COLOR, OrbitSettings, auto_rotate_camera, orbit_camera, setup_camera,
    setup_lights, zoom_camera,
};

pub struct GarlandViewerPlugin;

impl Plugin for GarlandViewerPlugin {
    fn build(&self, app: &mut App) {
        app.insert_resource(CliArgs::from_env())
            .add_plugins(GarlandPlugin)
            .add_plugins(crate::ui::plugin)
            .init_resource::<OrbitSettings>()
            .insert_resource(ClearColor(BACKGROUND_COLOR))
            .add_systems(Startup, (setup_camera, setup_lights, spawn_tree))
            .add_systems(
                Update,
                (orbit_camera, zoom_camera, auto_rotate_camera, report_scene_failure),
            );
    }
}

#[derive(Resource)]
struct SceneHandle(Handle<TreeSceneAsset>);

fn spawn_tree(mut commands: Commands, cli_args: Res<CliArgs>, asset_server: Res<AssetServer>) {
    info!("loading scene {}", cli_args.scene);
    let handle: Handle<TreeSceneAsset> = asset_server.load(cli_args.scene.clone());
    commands.insert_resource(SceneHandle(handle.clone()));

    commands.spawn((
        Name::new("Garland Tree"),
        ViewerTree,
        GarlandTree { handle },
        PendingPhotos(cli_args.photos.clone()),
    ));
}

fn report_scene_failure(
    mut commands: Commands,
    scene: Option<Res<SceneHandle>>,
    asset_server: Res<AssetServer>,
) {
    let Some(scene) = scene else {
        return;
    };
    match asset_server.load_state(&scene.0) {
        bevy::asset::LoadState::Failed(err) => {
            error!("failed to load scene: {err}");
            commands.remove_resource::<SceneHandle>();
        }
        bevy::asset::LoadState::Loaded => {
            commands.remove_resource::<SceneHandle>();
        }
        _ => {}
    }
}
