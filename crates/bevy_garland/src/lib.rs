//! **Garland** is a particle Christmas tree for the [Bevy game engine](https://bevyengine.org/).
//!
//! Thousands of needles and ornaments float in a loose cloud and, on request, ease into
//! the cone of a tree wound along a golden-angle spiral. User photos drift among them as
//! camera-facing panels and can be pulled in front of the camera with a click.
//!
//! # Getting started
//!
//! Add [`GarlandPlugin`] next to `DefaultPlugins` and spawn a [`GarlandTree`]:
//!
//! ```no_run
//! use bevy::picking::mesh_picking::MeshPickingPlugin;
//! use bevy::prelude::*;
//! use bevy_garland::prelude::*;
//!
//! fn main() {
//!     App::new()
//!         .add_plugins((DefaultPlugins, MeshPickingPlugin, GarlandPlugin))
//!         .add_systems(Startup, setup)
//!         .run();
//! }
//!
//! fn setup(mut commands: Commands, asset_server: Res<AssetServer>) {
//!     commands.spawn(GarlandTree {
//!         handle: asset_server.load("scenes/evergreen.tree.ron"),
//!     });
//! }
//! ```
//!
//! Trigger [`ToggleTreeMode`] to assemble or scatter every tree, and [`AddPhotos`] to hang
//! pictures on one of them.
//!
//! # Scene files
//!
//! A tree is described by a [`TreeSceneAsset`](asset::TreeSceneAsset) stored as RON with
//! the `.tree.ron` extension. Every field has a default, so the smallest valid scene only
//! names its format version:
//!
//! ```ron
//! (garland_version: "0.2")
//! ```

/// Scene asset definitions, loader and validation.
pub mod asset;
/// Ground glow and shooting stars.
pub mod ambience;
/// Seeding and per-frame motion of instanced particle layers.
pub mod layers;
/// Instanced material extension.
pub mod material;
mod mesh;
/// Scattered and assembled tree modes.
pub mod morph;
/// Photo panels and selection.
pub mod photos;
/// Closed-form particle placement.
pub mod placement;
/// Convenience re-exports.
pub mod prelude;
/// Runtime components of spawned trees.
pub mod runtime;
mod spawning;

use bevy::{asset::embedded_asset, pbr::MaterialPlugin, prelude::*};

use ambience::{animate_ground_radiance, move_shooting_stars, sync_shooting_stars};
use asset::{TreeSceneAsset, TreeSceneAssetLoader};
use morph::{handle_set_tree_mode, handle_toggle_tree_mode};
use photos::{
    animate_photos, clear_selection_on_background_click, clear_stale_selection,
    flush_pending_photos, handle_add_photos, handle_select_photo,
};
use spawning::{
    advance_layer_progress, cleanup_garland_entities, rotate_starfields, setup_garland_trees,
    write_layer_instances,
};

pub use mesh::{create_base_mesh, create_instanced_mesh};

/// Plugin that spawns, animates and renders garland trees.
///
/// Adds [`GarlandSimulationPlugin`] plus the instanced material that draws the particle
/// layers.
pub struct GarlandPlugin;

impl Plugin for GarlandPlugin {
    fn build(&self, app: &mut App) {
        embedded_asset!(app, "shaders/instanced_material.wgsl");

        app.add_plugins((
            MaterialPlugin::<runtime::InstancedMaterial>::default(),
            GarlandSimulationPlugin,
        ));
    }
}

/// Everything of [`GarlandPlugin`] that runs without a renderer.
///
/// Registers the scene asset and its loader, the tree mode and photo selection resources,
/// their observers, and every system that moves particles each frame. The app must
/// provide the `Mesh`, `Image`, `StandardMaterial`, `ShaderStorageBuffer` and
/// [`InstancedMaterial`] asset types.
pub struct GarlandSimulationPlugin;

impl Plugin for GarlandSimulationPlugin {
    fn build(&self, app: &mut App) {
        app.init_asset::<TreeSceneAsset>()
            .init_asset_loader::<TreeSceneAssetLoader>();

        app.register_type::<TreeMode>()
            .init_resource::<TreeMode>()
            .init_resource::<PhotoSelection>()
            .init_resource::<PhotoClickConsumed>();

        app.add_observer(handle_toggle_tree_mode)
            .add_observer(handle_set_tree_mode)
            .add_observer(handle_add_photos)
            .add_observer(handle_select_photo);

        app.add_systems(
            Update,
            (
                (setup_garland_trees, flush_pending_photos).chain(),
                (
                    advance_layer_progress,
                    write_layer_instances,
                    rotate_starfields,
                )
                    .chain(),
                (
                    clear_stale_selection,
                    clear_selection_on_background_click,
                    animate_photos,
                )
                    .chain(),
                animate_ground_radiance,
                (sync_shooting_stars, move_shooting_stars).chain(),
                cleanup_garland_entities,
            )
                .chain(),
        );
    }
}

pub use ambience::{GroundRadiance, ShootingStar};
pub use material::InstancedMaterialExtension;
pub use morph::{SetTreeMode, ToggleTreeMode, TreeMode};
pub use photos::{
    AddPhotos, PhotoClickConsumed, PhotoMotion, PhotoPanel, PhotoSelection, SelectPhoto,
};
pub use runtime::{
    GarlandTree, GarlandTreeRuntime, InstanceBufferHandle, InstanceData, InstancedMaterial,
    LayerKind, LayerRuntime, ParticleLayer, ParticleSeed, PendingPhotos,
};
