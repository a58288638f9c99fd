use bevy::{
    light::NotShadowCaster,
    picking::{events::Click, pointer::PointerButton},
    prelude::*,
};
use rand::Rng;

use crate::{
    asset::{PhotoConfig, TreeSceneAsset},
    morph::{SetTreeMode, TreeMode, approach},
    placement::{random_in_sphere, random_phase, sample_jitter, tree_position},
    runtime::{GarlandTree, GarlandTreeRuntime, PendingPhotos},
};

/// Opacity at or below which a photo is hidden.
pub const PHOTO_VISIBILITY_THRESHOLD: f32 = 0.01;

/// Selection progress below which an unselected photo keeps swaying.
const SWAY_SELECTION_LIMIT: f32 = 0.1;

/// Depth bias applied to the selected photo so it draws over the tree.
const SELECTED_DEPTH_BIAS: f32 = 1000.0;

/// Where photos look when no 3D camera exists.
const DEFAULT_VIEWPOINT: Vec3 = Vec3::new(0.0, 0.0, 18.0);

/// Appends photos to a tree. Scatters the tree and clears the selection.
#[derive(Event, Debug, Clone)]
pub struct AddPhotos {
    pub tree: Entity,
    pub paths: Vec<String>,
}

/// Selects a photo panel, or clears the selection with `None`.
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct SelectPhoto(pub Option<Entity>);

/// The photo panel currently pulled in front of the camera.
#[derive(Resource, Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct PhotoSelection {
    pub selected: Option<Entity>,
}

impl PhotoSelection {
    pub fn is_selected(&self, entity: Entity) -> bool {
        self.selected == Some(entity)
    }

    /// The selection after a click on `entity`: a click on the selected photo deselects it.
    pub fn toggled(&self, entity: Entity) -> Option<Entity> {
        if self.is_selected(entity) {
            None
        } else {
            Some(entity)
        }
    }
}

/// Set when a photo consumed the current primary click, so the background click
/// handler leaves the selection alone. Reset every frame.
#[derive(Resource, Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct PhotoClickConsumed(pub bool);

#[derive(Component, Debug, Clone)]
pub struct PhotoPanel {
    pub parent_tree: Entity,
    pub index: usize,
    pub path: String,
}

#[derive(Component)]
pub struct PhotoMaterialHandle(pub Handle<StandardMaterial>);

/// Animation state of one photo panel.
#[derive(Component, Debug, Clone, PartialEq)]
pub struct PhotoMotion {
    pub tree_position: Vec3,
    pub scatter_position: Vec3,
    pub float_speed: f32,
    pub float_offset: f32,
    pub float_radius: f32,
    pub position_progress: f32,
    pub opacity_progress: f32,
    pub selected_progress: f32,
}

impl PhotoMotion {
    pub fn new(config: &PhotoConfig, index: usize, total: usize, rng: &mut impl Rng) -> Self {
        Self {
            tree_position: photo_tree_position(config, index, total, rng),
            scatter_position: random_in_sphere(rng, config.scatter_radius),
            float_speed: config.float_speed.sample(rng),
            float_offset: random_phase(rng),
            float_radius: config.float_radius.sample(rng),
            position_progress: 0.0,
            opacity_progress: 0.0,
            selected_progress: 0.0,
        }
    }

    /// Eases all three progress values towards the current mode and selection.
    pub fn advance(
        &mut self,
        config: &PhotoConfig,
        assemble_rate: f32,
        mode: TreeMode,
        selected: bool,
        delta: f32,
    ) {
        let opacity_target = if mode.is_tree() { 0.0 } else { 1.0 };
        let selected_target = if selected { 1.0 } else { 0.0 };

        self.position_progress =
            approach(self.position_progress, mode.target(), assemble_rate, delta);
        self.opacity_progress =
            approach(self.opacity_progress, opacity_target, config.opacity_rate, delta);
        self.selected_progress =
            approach(self.selected_progress, selected_target, config.select_rate, delta);
    }

    /// Amplitude of the idle float. Photos stop drifting once assembled or faded out.
    pub fn float_intensity(&self) -> f32 {
        (1.0 - self.position_progress) * self.opacity_progress
    }
}

pub fn photo_tree_position(
    config: &PhotoConfig,
    index: usize,
    total: usize,
    rng: &mut impl Rng,
) -> Vec3 {
    tree_position(&config.tree, index, total, sample_jitter(rng))
}

/// Resolved placement of a photo for one frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PhotoPose {
    pub translation: Vec3,
    pub rotation: Quat,
    pub scale: f32,
    pub opacity: f32,
}

impl PhotoPose {
    pub fn is_visible(&self) -> bool {
        self.opacity > PHOTO_VISIBILITY_THRESHOLD
    }
}

/// Computes where a photo sits, given the viewpoint and focus point in the tree's space.
pub fn photo_pose(
    config: &PhotoConfig,
    motion: &PhotoMotion,
    time: f32,
    viewpoint: Vec3,
    focus: Vec3,
) -> PhotoPose {
    let t = motion.position_progress;
    let st = motion.selected_progress;
    let intensity = motion.float_intensity();
    let amplitude = motion.float_radius * intensity;
    let phase = time * motion.float_speed;

    let base = motion.scatter_position.lerp(motion.tree_position, t);
    let floating = base
        + Vec3::new(
            (phase + motion.float_offset).sin(),
            (phase * 0.7 + motion.float_offset).cos(),
            (phase * 1.3 + motion.float_offset).sin(),
        ) * amplitude;
    let translation = floating.lerp(focus, st);

    let mut rotation = Transform::from_translation(translation)
        .looking_to(translation - viewpoint, Vec3::Y)
        .rotation;
    if st <= SWAY_SELECTION_LIMIT {
        let roll = (time * 0.5 + motion.float_offset).sin() * config.sway * intensity;
        rotation *= Quat::from_rotation_z(roll);
    }

    PhotoPose {
        translation,
        rotation,
        scale: config.base_scale + (config.focus_scale - config.base_scale) * st,
        opacity: motion.opacity_progress + (1.0 - motion.opacity_progress) * st,
    }
}

pub(crate) fn flush_pending_photos(
    mut commands: Commands,
    mut trees: Query<(Entity, &mut PendingPhotos), With<GarlandTreeRuntime>>,
) {
    for (tree, mut pending) in trees.iter_mut() {
        if pending.0.is_empty() {
            continue;
        }
        let paths = std::mem::take(&mut pending.0);
        commands.trigger(AddPhotos { tree, paths });
    }
}

pub(crate) fn handle_add_photos(
    trigger: On<AddPhotos>,
    mut commands: Commands,
    assets: Res<Assets<TreeSceneAsset>>,
    asset_server: Res<AssetServer>,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    mut selection: ResMut<PhotoSelection>,
    mut trees: Query<(
        &GarlandTree,
        Option<&mut GarlandTreeRuntime>,
        Option<&mut PendingPhotos>,
    )>,
    mut panels: Query<(&PhotoPanel, &mut PhotoMotion)>,
) {
    let event = trigger.event();
    if event.paths.is_empty() {
        return;
    }

    let Ok((tree, runtime, pending)) = trees.get_mut(event.tree) else {
        warn!("cannot add photos to {}: not a garland tree", event.tree);
        return;
    };

    let (Some(asset), Some(mut runtime)) = (assets.get(&tree.handle), runtime) else {
        debug!(
            "tree {} is not ready, queueing {} photo(s)",
            event.tree,
            event.paths.len()
        );
        match pending {
            Some(mut pending) => pending.0.extend(event.paths.iter().cloned()),
            None => {
                commands
                    .entity(event.tree)
                    .insert(PendingPhotos(event.paths.clone()));
            }
        }
        return;
    };

    let config = &asset.photos;
    let rng = &mut runtime.rng;
    let start = panels
        .iter()
        .filter(|(panel, _)| panel.parent_tree == event.tree)
        .count();
    let total = start + event.paths.len();

    for (panel, mut motion) in panels.iter_mut() {
        if panel.parent_tree == event.tree {
            motion.tree_position = photo_tree_position(config, panel.index, total, rng);
        }
    }

    let quad = meshes.add(Rectangle::new(1.0, 1.0));
    for (offset, path) in event.paths.iter().enumerate() {
        let index = start + offset;
        let motion = PhotoMotion::new(config, index, total, rng);
        let material = materials.add(StandardMaterial {
            base_color: Color::WHITE.with_alpha(0.0),
            base_color_texture: Some(asset_server.load(path.clone())),
            alpha_mode: AlphaMode::Blend,
            unlit: true,
            double_sided: true,
            cull_mode: None,
            ..default()
        });

        commands
            .spawn((
                Name::new(format!("Photo {index}")),
                PhotoPanel {
                    parent_tree: event.tree,
                    index,
                    path: path.clone(),
                },
                Transform::from_translation(motion.scatter_position)
                    .with_scale(Vec3::splat(config.base_scale)),
                motion,
                Mesh3d(quad.clone()),
                MeshMaterial3d(material.clone()),
                PhotoMaterialHandle(material),
                Visibility::Hidden,
                NotShadowCaster,
                ChildOf(event.tree),
            ))
            .observe(on_photo_click);
    }

    info!(
        "added {} photo(s) to tree {} ({total} total)",
        event.paths.len(),
        event.tree
    );

    selection.selected = None;
    commands.trigger(SetTreeMode(TreeMode::Scattered));
}

pub(crate) fn handle_select_photo(
    trigger: On<SelectPhoto>,
    mut selection: ResMut<PhotoSelection>,
    panels: Query<&PhotoPanel>,
) {
    let next = trigger.event().0.filter(|entity| panels.contains(*entity));
    if selection.selected == next {
        return;
    }
    selection.selected = next;
    match next.and_then(|entity| panels.get(entity).ok()) {
        Some(panel) => info!("selected photo {} ({})", panel.index, panel.path),
        None => info!("photo selection cleared"),
    }
}

fn on_photo_click(
    mut event: On<Pointer<Click>>,
    mut commands: Commands,
    selection: Res<PhotoSelection>,
    mut consumed: ResMut<PhotoClickConsumed>,
) {
    if event.button != PointerButton::Primary {
        return;
    }
    event.propagate(false);
    consumed.0 = true;

    commands.trigger(SelectPhoto(selection.toggled(event.event_target())));
}

/// Drops a selection whose panel was despawned along with its tree.
pub(crate) fn clear_stale_selection(
    mut commands: Commands,
    selection: Res<PhotoSelection>,
    panels: Query<(), With<PhotoPanel>>,
) {
    if let Some(entity) = selection.selected.filter(|entity| !panels.contains(*entity)) {
        debug!("selected photo {entity} no longer exists");
        commands.trigger(SelectPhoto(None));
    }
}

/// Clears the selection when a primary click lands anywhere but a photo.
pub(crate) fn clear_selection_on_background_click(
    mut commands: Commands,
    mouse: Option<Res<ButtonInput<MouseButton>>>,
    selection: Res<PhotoSelection>,
    mut consumed: ResMut<PhotoClickConsumed>,
) {
    let released = mouse.is_some_and(|mouse| mouse.just_released(MouseButton::Left));
    if released && !consumed.0 && selection.selected.is_some() {
        commands.trigger(SelectPhoto(None));
    }
    consumed.0 = false;
}

pub(crate) fn animate_photos(
    time: Res<Time>,
    mode: Res<TreeMode>,
    selection: Res<PhotoSelection>,
    assets: Res<Assets<TreeSceneAsset>>,
    trees: Query<(&GarlandTree, &GlobalTransform)>,
    camera: Query<&GlobalTransform, With<Camera3d>>,
    mut panels: Query<(
        Entity,
        &PhotoPanel,
        &mut PhotoMotion,
        &mut Transform,
        &mut Visibility,
        &PhotoMaterialHandle,
    )>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    let delta = time.delta_secs();
    let elapsed = time.elapsed_secs();
    let camera = camera.iter().next();

    for (entity, panel, mut motion, mut transform, mut visibility, material) in &mut panels {
        let Ok((tree, tree_global)) = trees.get(panel.parent_tree) else {
            continue;
        };
        let Some(asset) = assets.get(&tree.handle) else {
            continue;
        };
        let config = &asset.photos;
        let selected = selection.is_selected(entity);

        motion.advance(config, asset.assemble_rate, *mode, selected, delta);

        let (viewpoint, focus) = match camera {
            Some(camera) => {
                let to_local = tree_global.affine().inverse();
                let viewpoint = to_local.transform_point3(camera.translation());
                let forward = to_local
                    .transform_vector3(camera.forward().as_vec3())
                    .normalize_or_zero();
                (viewpoint, viewpoint + forward * config.focus_distance)
            }
            None => (
                DEFAULT_VIEWPOINT,
                DEFAULT_VIEWPOINT - Vec3::Z * config.focus_distance,
            ),
        };

        let pose = photo_pose(config, &motion, elapsed, viewpoint, focus);
        transform.translation = pose.translation;
        transform.rotation = pose.rotation;
        transform.scale = Vec3::splat(pose.scale);

        let next_visibility = if pose.is_visible() {
            Visibility::Inherited
        } else {
            Visibility::Hidden
        };
        if *visibility != next_visibility {
            *visibility = next_visibility;
        }

        let depth_bias = if selected { SELECTED_DEPTH_BIAS } else { 0.0 };
        let stale = materials.get(&material.0).is_some_and(|m| {
            (m.base_color.alpha() - pose.opacity).abs() > f32::EPSILON
                || m.depth_bias != depth_bias
        });
        if !stale {
            continue;
        }
        if let Some(m) = materials.get_mut(&material.0) {
            m.base_color.set_alpha(pose.opacity);
            m.depth_bias = depth_bias;
        }
    }
}
