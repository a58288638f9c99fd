use std::f32::consts::FRAC_PI_2;

use bevy::{light::NotShadowCaster, prelude::*};
use rand::Rng;

use crate::{
    asset::{GroundConfig, ShootingStarConfig, TreeSceneAsset},
    morph::{TreeMode, approach},
    runtime::{GarlandTree, GarlandTreeRuntime},
};

/// Opacity at or below which the ground glow is hidden.
pub const GROUND_VISIBILITY_THRESHOLD: f32 = 0.01;

/// The glowing disc at the foot of a tree. Fades in while the tree is assembled.
#[derive(Component, Debug, Clone)]
pub struct GroundRadiance {
    pub parent_tree: Entity,
    pub opacity: f32,
    pub spin: f32,
    pub material: Handle<StandardMaterial>,
}

/// A meteor that exists only while the tree is assembled.
#[derive(Component, Debug, Clone)]
pub struct ShootingStar {
    pub parent_tree: Entity,
    pub start: Vec3,
    pub speed: f32,
}

fn srgba(color: [f32; 4]) -> Color {
    let [r, g, b, a] = color;
    Color::srgba(r, g, b, a)
}

fn ground_rotation(spin: f32) -> Quat {
    Quat::from_euler(EulerRot::XYZ, -FRAC_PI_2, 0.0, spin)
}

/// Emissive color of the ground glow at `opacity`.
pub fn ground_emissive(config: &GroundConfig, opacity: f32) -> LinearRgba {
    let base = LinearRgba::from(srgba(config.color));
    let intensity = opacity * config.max_emissive;
    LinearRgba::rgb(base.red * intensity, base.green * intensity, base.blue * intensity)
}

pub(crate) fn spawn_ground_radiance(
    commands: &mut Commands,
    tree: Entity,
    config: &GroundConfig,
    meshes: &mut Assets<Mesh>,
    materials: &mut Assets<StandardMaterial>,
) -> Entity {
    let mesh = meshes.add(
        Cone {
            radius: config.radius,
            height: config.height,
        }
        .mesh()
        .resolution(config.segments.max(3)),
    );
    let material = materials.add(StandardMaterial {
        base_color: srgba(config.color).with_alpha(0.0),
        emissive: ground_emissive(config, 0.0),
        alpha_mode: AlphaMode::Blend,
        perceptual_roughness: 1.0,
        metallic: 0.0,
        double_sided: true,
        cull_mode: None,
        ..default()
    });

    commands
        .spawn((
            Name::new("Ground Radiance"),
            GroundRadiance {
                parent_tree: tree,
                opacity: 0.0,
                spin: 0.0,
                material: material.clone(),
            },
            Mesh3d(mesh),
            MeshMaterial3d(material),
            Transform::from_xyz(0.0, config.offset_y, 0.0).with_rotation(ground_rotation(0.0)),
            Visibility::Hidden,
            NotShadowCaster,
            ChildOf(tree),
        ))
        .id()
}

pub(crate) fn animate_ground_radiance(
    time: Res<Time>,
    mode: Res<TreeMode>,
    assets: Res<Assets<TreeSceneAsset>>,
    trees: Query<&GarlandTree>,
    mut grounds: Query<(&mut GroundRadiance, &mut Transform, &mut Visibility)>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    let delta = time.delta_secs();

    for (mut ground, mut transform, mut visibility) in &mut grounds {
        let Ok(tree) = trees.get(ground.parent_tree) else {
            continue;
        };
        let Some(asset) = assets.get(&tree.handle) else {
            continue;
        };
        let config = &asset.ground;

        ground.opacity = approach(ground.opacity, mode.target(), config.fade_rate, delta);
        ground.spin += delta * config.spin_speed;
        transform.rotation = ground_rotation(ground.spin);

        let next_visibility = if ground.opacity > GROUND_VISIBILITY_THRESHOLD {
            Visibility::Inherited
        } else {
            Visibility::Hidden
        };
        if *visibility != next_visibility {
            *visibility = next_visibility;
        }

        if let Some(material) = materials.get_mut(&ground.material) {
            material.base_color.set_alpha(ground.opacity);
            material.emissive = ground_emissive(config, ground.opacity);
        }
    }
}

/// Draws the start point of a meteor.
pub fn shooting_star_start(config: &ShootingStarConfig, rng: &mut impl Rng) -> Vec3 {
    let half = config.spawn_half_width;
    Vec3::new(
        (rng.r#gen::<f32>() - 0.5) * 2.0 * half,
        config.spawn_height.sample(rng),
        (rng.r#gen::<f32>() - 0.5) * 2.0 * half,
    )
}

/// Moves a meteor along its diagonal path. Once it falls below the reset height it
/// goes back to `start`, shifted on X by `jitter`.
pub fn advance_shooting_star(
    position: Vec3,
    star: &ShootingStar,
    config: &ShootingStarConfig,
    delta: f32,
    jitter: f32,
) -> Vec3 {
    let mut next = position;
    next.x -= star.speed * delta * config.velocity.x;
    next.y -= star.speed * delta * config.velocity.y;
    if next.y < config.reset_below {
        next = star.start;
        next.x += jitter;
    }
    next
}

/// Spawns meteors for every assembled tree and removes them all once the tree scatters.
pub(crate) fn sync_shooting_stars(
    mut commands: Commands,
    mode: Res<TreeMode>,
    assets: Res<Assets<TreeSceneAsset>>,
    mut trees: Query<(Entity, &GarlandTree, &mut GarlandTreeRuntime)>,
    stars: Query<(Entity, &ShootingStar)>,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
) {
    if !mode.is_tree() {
        for (entity, _) in &stars {
            commands.entity(entity).despawn();
        }
        return;
    }

    for (tree_entity, tree, mut runtime) in &mut trees {
        if stars.iter().any(|(_, star)| star.parent_tree == tree_entity) {
            continue;
        }
        let Some(asset) = assets.get(&tree.handle) else {
            continue;
        };
        let config = &asset.shooting_stars;
        if !config.enabled || config.count == 0 {
            continue;
        }

        let mesh = meshes.add(
            Cone {
                radius: config.radius,
                height: config.length,
            }
            .mesh()
            .resolution(8),
        );
        let material = materials.add(StandardMaterial {
            base_color: Color::WHITE.with_alpha(config.opacity),
            alpha_mode: AlphaMode::Blend,
            unlit: true,
            ..default()
        });

        for _ in 0..config.count {
            let start = shooting_star_start(config, &mut runtime.rng);
            let speed = config.speed.sample(&mut runtime.rng);
            commands.spawn((
                Name::new("Shooting Star"),
                ShootingStar {
                    parent_tree: tree_entity,
                    start,
                    speed,
                },
                Mesh3d(mesh.clone()),
                MeshMaterial3d(material.clone()),
                Transform::from_translation(start)
                    .with_rotation(Quat::from_rotation_z(config.tilt)),
                NotShadowCaster,
            ));
        }
        debug!("spawned {} shooting stars for tree {tree_entity}", config.count);
    }
}

pub(crate) fn move_shooting_stars(
    time: Res<Time>,
    assets: Res<Assets<TreeSceneAsset>>,
    mut trees: Query<(&GarlandTree, &mut GarlandTreeRuntime)>,
    mut stars: Query<(&ShootingStar, &mut Transform)>,
) {
    let delta = time.delta_secs();

    for (star, mut transform) in &mut stars {
        let Ok((tree, mut runtime)) = trees.get_mut(star.parent_tree) else {
            continue;
        };
        let Some(asset) = assets.get(&tree.handle) else {
            continue;
        };
        let config = &asset.shooting_stars;
        let jitter = (runtime.rng.r#gen::<f32>() - 0.5) * config.reset_jitter;
        transform.translation =
            advance_shooting_star(transform.translation, star, config, delta, jitter);
    }
}
