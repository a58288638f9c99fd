use std::f32::consts::{PI, TAU};

use bevy::math::Vec3;
use rand::Rng;

use crate::asset::TreeShape;

/// The golden angle used to wind particles around the trunk, in degrees.
pub const GOLDEN_ANGLE_DEGREES: f32 = 137.5;

/// Bounds of the per-particle radius jitter applied by [`sample_jitter`].
pub const JITTER_RANGE: (f32, f32) = (0.9, 1.1);

/// Returns the assembled position of particle `index` out of `total`.
///
/// Particles climb from the base (`index = 0`) to the apex while the radius shrinks
/// linearly to zero. Consecutive particles are rotated by the golden angle so the
/// spiral never lines up. `jitter` scales the radius and is usually drawn from
/// [`sample_jitter`].
pub fn phyllotaxis_position(
    index: usize,
    total: usize,
    max_radius: f32,
    height: f32,
    jitter: f32,
) -> Vec3 {
    let angle = index as f32 * GOLDEN_ANGLE_DEGREES.to_radians();
    let normalized_height = if total == 0 {
        0.0
    } else {
        index as f32 / total as f32
    };
    let radius = max_radius * (1.0 - normalized_height) * jitter;

    Vec3::new(
        angle.cos() * radius,
        normalized_height * height - height / 2.0,
        angle.sin() * radius,
    )
}

/// [`phyllotaxis_position`] for a [`TreeShape`], including its lift.
pub fn tree_position(shape: &TreeShape, index: usize, total: usize, jitter: f32) -> Vec3 {
    phyllotaxis_position(index, total, shape.max_radius, shape.height, jitter)
        + Vec3::Y * shape.lift
}

/// Draws a radius jitter factor uniformly from [`JITTER_RANGE`].
pub fn sample_jitter(rng: &mut impl Rng) -> f32 {
    let (min, max) = JITTER_RANGE;
    min + rng.r#gen::<f32>() * (max - min)
}

/// Returns a point uniformly distributed inside a ball of `radius`.
pub fn random_in_sphere(rng: &mut impl Rng, radius: f32) -> Vec3 {
    let direction = random_direction(rng);
    let distance = rng.r#gen::<f32>().cbrt() * radius;
    direction * distance
}

/// Returns a point whose distance from the origin lies in `[radius, radius + depth]`.
pub fn random_in_shell(rng: &mut impl Rng, radius: f32, depth: f32) -> Vec3 {
    let direction = random_direction(rng);
    let distance = radius + rng.r#gen::<f32>() * depth;
    direction * distance
}

fn random_direction(rng: &mut impl Rng) -> Vec3 {
    let theta = TAU * rng.r#gen::<f32>();
    let phi = (2.0 * rng.r#gen::<f32>() - 1.0).clamp(-1.0, 1.0).acos();
    Vec3::new(
        phi.sin() * theta.cos(),
        phi.sin() * theta.sin(),
        phi.cos(),
    )
}

/// Draws a random phase offset in `[0, 2π)`.
pub fn random_phase(rng: &mut impl Rng) -> f32 {
    rng.r#gen::<f32>() * TAU
}

/// Draws a random angle in `[0, π)`.
pub fn random_half_turn(rng: &mut impl Rng) -> f32 {
    rng.r#gen::<f32>() * PI
}
