use bevy::pbr::ExtendedMaterial;
use bevy::prelude::*;
use bevy::render::render_resource::ShaderType;
use bevy::render::storage::ShaderStorageBuffer;
use bytemuck::{Pod, Zeroable};
use rand::{SeedableRng, rngs::StdRng};

use crate::asset::TreeSceneAsset;
use crate::material::InstancedMaterialExtension;

/// Spawns a particle tree described by a [`TreeSceneAsset`].
#[derive(Component)]
pub struct GarlandTree {
    pub handle: Handle<TreeSceneAsset>,
}

/// Photos waiting for their tree's scene to finish loading.
#[derive(Component, Default, Debug, Clone)]
pub struct PendingPhotos(pub Vec<String>);

/// Per-tree state created once the scene asset is available.
#[derive(Component)]
pub struct GarlandTreeRuntime {
    pub rng: StdRng,
}

impl GarlandTreeRuntime {
    pub fn new(seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self { rng }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Reflect)]
pub enum LayerKind {
    Needles,
    Ornaments,
    Starfield,
}

#[derive(Component, Debug, Clone, Copy)]
pub struct ParticleLayer {
    pub parent_tree: Entity,
    pub kind: LayerKind,
}

/// Everything that stays fixed about a particle between frames.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParticleSeed {
    pub tree_position: Vec3,
    pub scatter_position: Vec3,
    pub scale: f32,
    /// Initial rotation around X and Y.
    pub rotation: Vec2,
    pub float_speed: f32,
    pub float_offset: f32,
    /// Linear RGBA tint.
    pub color: [f32; 4],
}

#[derive(Component, Debug, Clone)]
pub struct LayerRuntime {
    /// Assembly progress, `0` scattered to `1` assembled.
    pub progress: f32,
    pub seeds: Vec<ParticleSeed>,
}

#[derive(Component, Debug, Clone)]
pub struct InstanceBufferHandle {
    pub buffer: Handle<ShaderStorageBuffer>,
    pub instance_count: u32,
}

/// One slot of the instance buffer read by the instanced material.
#[derive(Clone, Copy, Debug, Default, PartialEq, Pod, Zeroable, ShaderType)]
#[repr(C)]
pub struct InstanceData {
    pub model_x: [f32; 4],
    pub model_y: [f32; 4],
    pub model_z: [f32; 4],
    pub model_w: [f32; 4],
    pub color: [f32; 4], // linear rgba
}

impl InstanceData {
    pub fn new(transform: &Transform, color: [f32; 4]) -> Self {
        let [model_x, model_y, model_z, model_w] = Mat4::from_scale_rotation_translation(
            transform.scale,
            transform.rotation,
            transform.translation,
        )
        .to_cols_array_2d();
        Self {
            model_x,
            model_y,
            model_z,
            model_w,
            color,
        }
    }

    pub fn translation(&self) -> Vec3 {
        Vec3::new(self.model_w[0], self.model_w[1], self.model_w[2])
    }
}

pub type InstancedMaterial = ExtendedMaterial<StandardMaterial, InstancedMaterialExtension>;
