use bevy::{
    asset::RenderAssetUsages,
    mesh::{Indices, MeshVertexAttributeId, PrimitiveTopology, VertexAttributeValues},
    prelude::*,
};

use crate::asset::LayerMesh;

fn create_tetrahedron_mesh(radius: f32) -> Mesh {
    let scale = radius / 3f32.sqrt();
    Mesh::from(Tetrahedron::new(
        Vec3::new(1.0, 1.0, 1.0) * scale,
        Vec3::new(-1.0, -1.0, 1.0) * scale,
        Vec3::new(-1.0, 1.0, -1.0) * scale,
        Vec3::new(1.0, -1.0, -1.0) * scale,
    ))
}

fn create_icosphere_mesh(radius: f32, subdivisions: u32) -> Mesh {
    let sphere = Sphere::new(radius);
    match sphere.mesh().ico(subdivisions) {
        Ok(mesh) => mesh,
        Err(err) => {
            warn!("icosphere with {subdivisions} subdivisions unavailable ({err}), using a UV sphere");
            sphere.mesh().uv(16, 8)
        }
    }
}

/// Builds the mesh of a single particle, centered on the origin.
pub fn create_base_mesh(config: &LayerMesh) -> Mesh {
    match config {
        LayerMesh::Tetrahedron { radius } => create_tetrahedron_mesh(*radius),
        LayerMesh::Icosphere {
            radius,
            subdivisions,
        } => create_icosphere_mesh(*radius, *subdivisions),
    }
}

/// Merges `instance_count` copies of `base_mesh` into one mesh.
///
/// The instance slot of every vertex is stored in `UV_1.x`; the instanced material
/// reads it to fetch the matching transform from the instance buffer. Vertex colors
/// are white so the per-instance tint passes straight through.
pub fn create_instanced_mesh(base_mesh: &Mesh, instance_count: u32) -> Mesh {
    let base_positions: Vec<[f32; 3]> =
        extract_float32x3(base_mesh, Mesh::ATTRIBUTE_POSITION).unwrap_or_default();

    let base_normals: Vec<[f32; 3]> = extract_float32x3(base_mesh, Mesh::ATTRIBUTE_NORMAL)
        .unwrap_or_else(|| vec![[0.0, 0.0, 1.0]; base_positions.len()]);

    let base_uvs: Vec<[f32; 2]> = base_mesh
        .attribute(Mesh::ATTRIBUTE_UV_0)
        .and_then(|attr| match attr {
            VertexAttributeValues::Float32x2(v) => Some(v.clone()),
            _ => None,
        })
        .unwrap_or_else(|| vec![[0.0, 0.0]; base_positions.len()]);

    let base_indices: Vec<u32> = base_mesh
        .indices()
        .map(|indices| indices.iter().map(|i| i as u32).collect())
        .unwrap_or_else(|| (0..base_positions.len() as u32).collect());

    let vertices_per_mesh = base_positions.len();
    let total_vertices = instance_count as usize * vertices_per_mesh;
    let total_indices = instance_count as usize * base_indices.len();

    let mut positions: Vec<[f32; 3]> = Vec::with_capacity(total_vertices);
    let mut normals: Vec<[f32; 3]> = Vec::with_capacity(total_vertices);
    let mut uvs: Vec<[f32; 2]> = Vec::with_capacity(total_vertices);
    let mut slots: Vec<[f32; 2]> = Vec::with_capacity(total_vertices);
    let mut indices: Vec<u32> = Vec::with_capacity(total_indices);

    for slot in 0..instance_count {
        let base_vertex = (slot as usize * vertices_per_mesh) as u32;
        let slot_f32 = slot as f32;

        for i in 0..vertices_per_mesh {
            positions.push(base_positions[i]);
            normals.push(base_normals[i]);
            uvs.push(base_uvs[i]);
            slots.push([slot_f32, 0.0]);
        }

        for &idx in &base_indices {
            indices.push(base_vertex + idx);
        }
    }

    let colors = vec![[1.0_f32, 1.0, 1.0, 1.0]; positions.len()];

    let mut mesh = Mesh::new(
        PrimitiveTopology::TriangleList,
        RenderAssetUsages::default(),
    );
    mesh.insert_attribute(Mesh::ATTRIBUTE_POSITION, positions);
    mesh.insert_attribute(Mesh::ATTRIBUTE_NORMAL, normals);
    mesh.insert_attribute(Mesh::ATTRIBUTE_UV_0, uvs);
    mesh.insert_attribute(Mesh::ATTRIBUTE_UV_1, slots);
    mesh.insert_attribute(Mesh::ATTRIBUTE_COLOR, colors);
    mesh.insert_indices(Indices::U32(indices));
    mesh
}

pub(crate) fn create_layer_mesh(
    config: &LayerMesh,
    instance_count: u32,
    meshes: &mut Assets<Mesh>,
) -> Handle<Mesh> {
    let base_mesh = create_base_mesh(config);
    meshes.add(create_instanced_mesh(&base_mesh, instance_count))
}

fn extract_float32x3(
    mesh: &Mesh,
    attribute: impl Into<MeshVertexAttributeId>,
) -> Option<Vec<[f32; 3]>> {
    mesh.attribute(attribute).and_then(|attr| match attr {
        VertexAttributeValues::Float32x3(v) => Some(v.clone()),
        _ => None,
    })
}
