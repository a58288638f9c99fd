use bevy::{
    mesh::MeshVertexBufferLayoutRef,
    pbr::{MaterialExtension, MaterialExtensionKey, MaterialExtensionPipeline},
    prelude::*,
    render::{
        render_resource::{AsBindGroup, RenderPipelineDescriptor, SpecializedMeshPipelineError},
        storage::ShaderStorageBuffer,
    },
    shader::ShaderRef,
};

const SHADER_ASSET_PATH: &str = "embedded://bevy_garland/shaders/instanced_material.wgsl";

/// Places every copy of a merged layer mesh using the matching slot of `instances`.
///
/// Only the main pass reads `instances`. Prepass and shadow pipelines keep the
/// stock vertex shader and would draw every copy at the layer origin, so layers
/// are spawned with `NotShadowCaster` and cameras rendering them must not enable
/// `DepthPrepass`, `NormalPrepass`, `MotionVectorPrepass` or deferred rendering.
#[derive(Asset, AsBindGroup, Reflect, Debug, Clone)]
pub struct InstancedMaterialExtension {
    #[storage(100, read_only)]
    pub instances: Handle<ShaderStorageBuffer>,
    #[uniform(101)]
    pub instance_count: u32,
}

impl MaterialExtension for InstancedMaterialExtension {
    fn vertex_shader() -> ShaderRef {
        SHADER_ASSET_PATH.into()
    }

    fn specialize(
        _pipeline: &MaterialExtensionPipeline,
        descriptor: &mut RenderPipelineDescriptor,
        _layout: &MeshVertexBufferLayoutRef,
        _key: MaterialExtensionKey<Self>,
    ) -> Result<(), SpecializedMeshPipelineError> {
        // draw back faces
        descriptor.primitive.cull_mode = None;
        Ok(())
    }
}
