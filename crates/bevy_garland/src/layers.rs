use bevy::prelude::*;
use rand::Rng;

use crate::{
    asset::{LayerConfig, LayerSpin, StarfieldConfig},
    placement::{random_half_turn, random_in_shell, random_in_sphere, random_phase, sample_jitter, tree_position},
    runtime::{InstanceData, ParticleSeed},
};

const OPAQUE_WHITE: [f32; 4] = [1.0, 1.0, 1.0, 1.0];

fn linear_tint(srgba: [f32; 4]) -> [f32; 4] {
    let [r, g, b, a] = srgba;
    LinearRgba::from(Color::srgba(r, g, b, a)).to_f32_array()
}

/// Draws the fixed per-particle data of a needle or ornament layer.
pub fn spawn_layer_seeds(config: &LayerConfig, rng: &mut impl Rng) -> Vec<ParticleSeed> {
    let total = config.count as usize;
    (0..total)
        .map(|index| {
            let jitter = sample_jitter(rng);
            let rotation = match config.spin {
                LayerSpin::Tumble { .. } => Vec2::new(random_half_turn(rng), random_half_turn(rng)),
                LayerSpin::None | LayerSpin::Indexed { .. } => Vec2::ZERO,
            };
            let color = if config.palette.is_empty() {
                OPAQUE_WHITE
            } else {
                linear_tint(config.palette[rng.gen_range(0..config.palette.len())])
            };

            ParticleSeed {
                tree_position: tree_position(&config.tree, index, total, jitter),
                scatter_position: random_in_sphere(rng, config.scatter_radius),
                scale: config.scale.sample(rng),
                rotation,
                float_speed: config.float_speed.sample(rng),
                float_offset: random_phase(rng),
                color,
            }
        })
        .collect()
}

/// Draws the stars of a starfield shell. Stars never move relative to the shell.
pub fn spawn_star_seeds(config: &StarfieldConfig, rng: &mut impl Rng) -> Vec<ParticleSeed> {
    (0..config.count)
        .map(|_| {
            let position = random_in_shell(rng, config.radius, config.depth);
            ParticleSeed {
                tree_position: position,
                scatter_position: position,
                scale: config.size.sample(rng),
                rotation: Vec2::ZERO,
                float_speed: 0.0,
                float_offset: 0.0,
                color: OPAQUE_WHITE,
            }
        })
        .collect()
}

/// Returns the transform of particle `index` at assembly progress `t` and elapsed `time`.
pub fn particle_transform(
    config: &LayerConfig,
    seed: &ParticleSeed,
    index: usize,
    t: f32,
    time: f32,
) -> Transform {
    let mut translation = seed.scatter_position.lerp(seed.tree_position, t);

    let amplitude = config.float_intensity(t);
    let phase = time * seed.float_speed;
    translation.x += (phase + seed.float_offset).sin() * amplitude;
    translation.y += (phase * 0.8 + seed.float_offset).cos() * amplitude;
    translation.z += (phase * 1.2 + seed.float_offset).sin() * amplitude;

    if config.bob != 0.0 {
        translation.y += (1.0 - t) * (time * 0.5).sin() * config.bob;
    }

    let rotation = match config.spin {
        LayerSpin::None => Quat::IDENTITY,
        LayerSpin::Tumble { x_rate, y_rate } => Quat::from_euler(
            EulerRot::XYZ,
            seed.rotation.x + time * x_rate,
            seed.rotation.y + time * y_rate,
            0.0,
        ),
        LayerSpin::Indexed { rate } => {
            let angle = time * rate + index as f32;
            Quat::from_euler(EulerRot::XYZ, angle, angle, 0.0)
        }
    };

    Transform {
        translation,
        rotation,
        scale: Vec3::splat(seed.scale),
    }
}

/// Fills the instance buffer contents for a whole layer.
pub fn layer_instances(
    config: &LayerConfig,
    seeds: &[ParticleSeed],
    t: f32,
    time: f32,
) -> Vec<InstanceData> {
    seeds
        .iter()
        .enumerate()
        .map(|(index, seed)| {
            InstanceData::new(&particle_transform(config, seed, index, t, time), seed.color)
        })
        .collect()
}

pub fn star_instances(seeds: &[ParticleSeed]) -> Vec<InstanceData> {
    seeds
        .iter()
        .map(|seed| {
            let transform = Transform::from_translation(seed.tree_position)
                .with_scale(Vec3::splat(seed.scale));
            InstanceData::new(&transform, seed.color)
        })
        .collect()
}
