use bevy::mesh::VertexAttributeValues;
use bevy::prelude::*;
use bevy_garland::asset::{LayerConfig, LayerMesh, StarfieldConfig};
use bevy_garland::layers::*;
use bevy_garland::{InstanceData, create_base_mesh, create_instanced_mesh};
use rand::{SeedableRng, rngs::StdRng};

use crate::helpers::in_range;

fn index_count(mesh: &Mesh) -> usize {
    mesh.indices()
        .map(|indices| indices.len())
        .unwrap_or_else(|| mesh.count_vertices())
}

fn slots(mesh: &Mesh) -> Vec<f32> {
    match mesh.attribute(Mesh::ATTRIBUTE_UV_1) {
        Some(VertexAttributeValues::Float32x2(values)) => values.iter().map(|v| v[0]).collect(),
        other => panic!("expected Float32x2 UV_1, got {other:?}"),
    }
}

#[test]
fn instance_data_is_five_vec4s() {
    assert_eq!(std::mem::size_of::<InstanceData>(), 80);
}

#[test]
fn instance_data_stores_translation_in_last_column() {
    let transform = Transform::from_xyz(1.0, 2.0, 3.0).with_scale(Vec3::splat(0.5));
    let data = InstanceData::new(&transform, [0.1, 0.2, 0.3, 1.0]);
    assert_eq!(data.translation(), Vec3::new(1.0, 2.0, 3.0));
    assert_eq!(data.model_x[0], 0.5);
    assert_eq!(data.color, [0.1, 0.2, 0.3, 1.0]);
}

#[test]
fn instanced_mesh_repeats_the_base_mesh() {
    let base = create_base_mesh(&LayerMesh::Tetrahedron { radius: 0.08 });
    let merged = create_instanced_mesh(&base, 5);

    assert_eq!(merged.count_vertices(), base.count_vertices() * 5);
    assert_eq!(index_count(&merged), index_count(&base) * 5);
}

#[test]
fn instanced_mesh_tags_vertices_with_their_slot() {
    let base = create_base_mesh(&LayerMesh::Icosphere {
        radius: 0.12,
        subdivisions: 1,
    });
    let per_copy = base.count_vertices();
    let merged = create_instanced_mesh(&base, 3);
    let slots = slots(&merged);

    assert_eq!(slots[0], 0.0);
    assert_eq!(slots[per_copy - 1], 0.0);
    assert_eq!(slots[per_copy], 1.0);
    assert_eq!(slots[slots.len() - 1], 2.0);
}

#[test]
fn instanced_mesh_has_white_vertex_colors() {
    let base = create_base_mesh(&LayerMesh::default());
    let merged = create_instanced_mesh(&base, 2);
    match merged.attribute(Mesh::ATTRIBUTE_COLOR) {
        Some(VertexAttributeValues::Float32x4(colors)) => {
            assert!(colors.iter().all(|c| *c == [1.0, 1.0, 1.0, 1.0]));
        }
        other => panic!("expected Float32x4 colors, got {other:?}"),
    }
}

#[test]
fn empty_instanced_mesh_has_no_vertices() {
    let base = create_base_mesh(&LayerMesh::default());
    assert_eq!(create_instanced_mesh(&base, 0).count_vertices(), 0);
}

#[test]
fn seeds_follow_layer_count_and_scale() {
    let mut config = LayerConfig::needles();
    config.count = 64;
    let mut rng = StdRng::seed_from_u64(2);
    let seeds = spawn_layer_seeds(&config, &mut rng);

    assert_eq!(seeds.len(), 64);
    for seed in &seeds {
        assert!(in_range(config.scale, seed.scale));
        assert!(in_range(config.float_speed, seed.float_speed));
        assert!(seed.scatter_position.length() <= config.scatter_radius + 1e-3);
    }
}

#[test]
fn same_seed_draws_the_same_layer() {
    let config = LayerConfig::ornaments();
    let a = spawn_layer_seeds(&config, &mut StdRng::seed_from_u64(99));
    let b = spawn_layer_seeds(&config, &mut StdRng::seed_from_u64(99));
    assert_eq!(a, b);
}

#[test]
fn scattered_particles_start_near_their_scatter_position() {
    let mut config = LayerConfig::needles();
    config.count = 32;
    let seeds = spawn_layer_seeds(&config, &mut StdRng::seed_from_u64(4));
    let slack = config.float_intensity(0.0) * 3f32.sqrt() + 1e-4;

    for (index, seed) in seeds.iter().enumerate() {
        let transform = particle_transform(&config, seed, index, 0.0, 3.0);
        assert!(transform.translation.distance(seed.scatter_position) <= slack);
        assert_eq!(transform.scale, Vec3::splat(seed.scale));
    }
}

#[test]
fn layer_instances_carry_seed_colors() {
    let mut config = LayerConfig::ornaments();
    config.count = 16;
    let seeds = spawn_layer_seeds(&config, &mut StdRng::seed_from_u64(8));
    let instances = layer_instances(&config, &seeds, 0.5, 1.0);

    assert_eq!(instances.len(), seeds.len());
    for (instance, seed) in instances.iter().zip(&seeds) {
        assert_eq!(instance.color, seed.color);
    }
}

#[test]
fn untinted_layers_are_white() {
    let mut config = LayerConfig::needles();
    config.count = 8;
    for seed in spawn_layer_seeds(&config, &mut StdRng::seed_from_u64(8)) {
        assert_eq!(seed.color, [1.0, 1.0, 1.0, 1.0]);
    }
}

#[test]
fn star_instances_sit_on_their_seeds() {
    let mut config = StarfieldConfig::default();
    config.count = 20;
    let seeds = spawn_star_seeds(&config, &mut StdRng::seed_from_u64(1));
    let instances = star_instances(&seeds);

    assert_eq!(instances.len(), 20);
    for (instance, seed) in instances.iter().zip(&seeds) {
        assert!((instance.translation() - seed.tree_position).length() < 1e-3);
        assert!(in_range(config.size, seed.scale));
    }
}
