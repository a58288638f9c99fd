use bevy::asset::UnapprovedPathMode;
use bevy::picking::mesh_picking::MeshPickingPlugin;
use bevy::prelude::*;
use bevy::window::WindowResolution;

use garland_viewer::plugin::GarlandViewerPlugin;

fn main() {
    App::new()
        .add_plugins(
            DefaultPlugins
                .set(WindowPlugin {
                    primary_window: Some(Window {
                        title: "Garland".into(),
                        resolution: WindowResolution::new(1366, 768),
                        ..default()
                    }),
                    ..default()
                })
                .set(AssetPlugin {
                    unapproved_path_mode: UnapprovedPathMode::Allow,
                    ..default()
                }),
        )
        .add_plugins(MeshPickingPlugin)
        .add_plugins(GarlandViewerPlugin)
        .run();
}
