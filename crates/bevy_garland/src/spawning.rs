use bevy::{
    camera::visibility::NoFrustumCulling,
    light::NotShadowCaster,
    pbr::ExtendedMaterial,
    prelude::*,
    render::storage::ShaderStorageBuffer,
};

use crate::{
    ambience::{GroundRadiance, ShootingStar, spawn_ground_radiance},
    asset::{LayerMaterial, LayerMesh, TreeSceneAsset},
    layers::{layer_instances, spawn_layer_seeds, spawn_star_seeds, star_instances},
    material::InstancedMaterialExtension,
    mesh::create_layer_mesh,
    morph::{TreeMode, approach},
    photos::PhotoPanel,
    runtime::{
        GarlandTree, GarlandTreeRuntime, InstanceBufferHandle, InstanceData, InstancedMaterial,
        LayerKind, LayerRuntime, ParticleLayer, ParticleSeed,
        PendingPhotos,
    },
};

const STAR_MESH: LayerMesh = LayerMesh::Icosphere {
    radius: 1.0,
    subdivisions: 0,
};

fn create_instanced_material(
    config: &LayerMaterial,
    instances: Handle<ShaderStorageBuffer>,
    instance_count: u32,
) -> InstancedMaterial {
    ExtendedMaterial {
        base: config.to_standard_material(),
        extension: InstancedMaterialExtension {
            instances,
            instance_count,
        },
    }
}

struct LayerSpawn<'a> {
    kind: LayerKind,
    mesh: &'a LayerMesh,
    material: &'a LayerMaterial,
    seeds: Vec<ParticleSeed>,
    instances: Vec<InstanceData>,
}

fn spawn_layer(
    commands: &mut Commands,
    tree: Entity,
    layer: LayerSpawn<'_>,
    meshes: &mut Assets<Mesh>,
    buffers: &mut Assets<ShaderStorageBuffer>,
    materials: &mut Assets<InstancedMaterial>,
) {
    let count = layer.seeds.len() as u32;
    let buffer = buffers.add(ShaderStorageBuffer::from(layer.instances));
    let mesh = create_layer_mesh(layer.mesh, count, meshes);
    let material = materials.add(create_instanced_material(
        layer.material,
        buffer.clone(),
        count,
    ));

    commands.spawn((
        Name::new(format!("{:?}", layer.kind)),
        ParticleLayer {
            parent_tree: tree,
            kind: layer.kind,
        },
        LayerRuntime {
            progress: 0.0,
            seeds: layer.seeds,
        },
        InstanceBufferHandle {
            buffer,
            instance_count: count,
        },
        Mesh3d(mesh),
        MeshMaterial3d(material),
        Transform::default(),
        Visibility::default(),
        NoFrustumCulling,
        NotShadowCaster,
        ChildOf(tree),
    ));
}

pub fn setup_garland_trees(
    mut commands: Commands,
    query: Query<(Entity, &GarlandTree, Option<&PendingPhotos>), Without<GarlandTreeRuntime>>,
    assets: Res<Assets<TreeSceneAsset>>,
    mut meshes: ResMut<Assets<Mesh>>,
    mut buffers: ResMut<Assets<ShaderStorageBuffer>>,
    mut materials: ResMut<Assets<InstancedMaterial>>,
    mut standard_materials: ResMut<Assets<StandardMaterial>>,
) {
    for (tree_entity, tree, pending) in query.iter() {
        let Some(asset) = assets.get(&tree.handle) else {
            continue;
        };

        let mut runtime = GarlandTreeRuntime::new(asset.seed);
        let mut layer_counts = Vec::new();

        for (kind, config) in [
            (LayerKind::Needles, &asset.needles),
            (LayerKind::Ornaments, &asset.ornaments),
        ] {
            if !config.enabled || config.count == 0 {
                continue;
            }
            let seeds = spawn_layer_seeds(config, &mut runtime.rng);
            let instances = layer_instances(config, &seeds, 0.0, 0.0);
            layer_counts.push(format!("{} {kind:?}", seeds.len()));
            spawn_layer(
                &mut commands,
                tree_entity,
                LayerSpawn {
                    kind,
                    mesh: &config.mesh,
                    material: &config.material,
                    seeds,
                    instances,
                },
                &mut meshes,
                &mut buffers,
                &mut materials,
            );
        }

        let starfield = &asset.starfield;
        let star_material = LayerMaterial {
            base_color: starfield.color,
            unlit: true,
            ..default()
        };
        if starfield.enabled && starfield.count > 0 {
            let seeds = spawn_star_seeds(starfield, &mut runtime.rng);
            let instances = star_instances(&seeds);
            layer_counts.push(format!("{} stars", seeds.len()));
            spawn_layer(
                &mut commands,
                tree_entity,
                LayerSpawn {
                    kind: LayerKind::Starfield,
                    mesh: &STAR_MESH,
                    material: &star_material,
                    seeds,
                    instances,
                },
                &mut meshes,
                &mut buffers,
                &mut materials,
            );
        }

        if asset.ground.enabled {
            spawn_ground_radiance(
                &mut commands,
                tree_entity,
                &asset.ground,
                &mut meshes,
                &mut standard_materials,
            );
        }

        let mut photos = asset.photos.paths.clone();
        if let Some(pending) = pending {
            photos.extend(pending.0.iter().cloned());
        }

        commands.entity(tree_entity).insert((
            runtime,
            PendingPhotos(photos),
            Transform::from_translation(asset.position),
            Visibility::default(),
        ));

        info!(
            "spawned garland tree '{}' ({})",
            asset.name,
            layer_counts.join(", ")
        );
    }
}

pub fn advance_layer_progress(
    time: Res<Time>,
    mode: Res<TreeMode>,
    assets: Res<Assets<TreeSceneAsset>>,
    trees: Query<&GarlandTree>,
    mut layers: Query<(&ParticleLayer, &mut LayerRuntime)>,
) {
    let delta = time.delta_secs();
    let target = mode.target();

    for (layer, mut runtime) in &mut layers {
        if layer.kind == LayerKind::Starfield {
            continue;
        }
        let Ok(tree) = trees.get(layer.parent_tree) else {
            continue;
        };
        let Some(asset) = assets.get(&tree.handle) else {
            continue;
        };
        runtime.progress = approach(runtime.progress, target, asset.assemble_rate, delta);
    }
}

pub fn write_layer_instances(
    time: Res<Time>,
    assets: Res<Assets<TreeSceneAsset>>,
    trees: Query<&GarlandTree>,
    layers: Query<(&ParticleLayer, &LayerRuntime, &InstanceBufferHandle)>,
    mut buffers: ResMut<Assets<ShaderStorageBuffer>>,
) {
    let elapsed = time.elapsed_secs();

    for (layer, runtime, handle) in &layers {
        let Ok(tree) = trees.get(layer.parent_tree) else {
            continue;
        };
        let Some(asset) = assets.get(&tree.handle) else {
            continue;
        };
        let config = match layer.kind {
            LayerKind::Needles => &asset.needles,
            LayerKind::Ornaments => &asset.ornaments,
            LayerKind::Starfield => continue,
        };
        if runtime.seeds.len() != handle.instance_count as usize {
            continue;
        }

        let instances = layer_instances(config, &runtime.seeds, runtime.progress, elapsed);
        if let Some(buffer) = buffers.get_mut(&handle.buffer) {
            buffer.set_data(instances);
        }
    }
}

pub fn rotate_starfields(
    time: Res<Time>,
    assets: Res<Assets<TreeSceneAsset>>,
    trees: Query<&GarlandTree>,
    mut layers: Query<(&ParticleLayer, &mut Transform)>,
) {
    for (layer, mut transform) in &mut layers {
        if layer.kind != LayerKind::Starfield {
            continue;
        }
        let Ok(tree) = trees.get(layer.parent_tree) else {
            continue;
        };
        let Some(asset) = assets.get(&tree.handle) else {
            continue;
        };
        transform.rotate_y(asset.starfield.rotation_speed * time.delta_secs());
    }
}

pub fn cleanup_garland_entities(
    mut commands: Commands,
    mut removed_trees: RemovedComponents<GarlandTree>,
    layers: Query<(Entity, &ParticleLayer)>,
    photos: Query<(Entity, &PhotoPanel)>,
    grounds: Query<(Entity, &GroundRadiance)>,
    stars: Query<(Entity, &ShootingStar)>,
) {
    for removed_tree in removed_trees.read() {
        let owned = layers
            .iter()
            .filter(|(_, layer)| layer.parent_tree == removed_tree)
            .map(|(entity, _)| entity)
            .chain(
                photos
                    .iter()
                    .filter(|(_, photo)| photo.parent_tree == removed_tree)
                    .map(|(entity, _)| entity),
            )
            .chain(
                grounds
                    .iter()
                    .filter(|(_, ground)| ground.parent_tree == removed_tree)
                    .map(|(entity, _)| entity),
            )
            .chain(
                stars
                    .iter()
                    .filter(|(_, star)| star.parent_tree == removed_tree)
                    .map(|(entity, _)| entity),
            );

        for entity in owned {
            commands.entity(entity).try_despawn();
        }
        if let Ok(mut tree) = commands.get_entity(removed_tree) {
            tree.remove::<(GarlandTreeRuntime, PendingPhotos)>();
        }
    }
}
