use std::f32::consts::PI;

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use super::layer::{TreeShape, ValueRange, hex_rgba};

/// A shell of static background stars, drawn through the same instanced path as the tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Reflect)]
#[serde(default)]
pub struct StarfieldConfig {
    /// Whether the starfield is spawned.
    pub enabled: bool,
    /// Number of stars.
    pub count: u32,
    /// Inner radius of the shell.
    pub radius: f32,
    /// Thickness of the shell.
    pub depth: f32,
    /// Star radius.
    pub size: ValueRange,
    /// Rotation of the whole shell around Y, in radians per second.
    pub rotation_speed: f32,
    /// Star color (sRGBA).
    pub color: [f32; 4],
}

impl Default for StarfieldConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            count: 2000,
            radius: 100.0,
            depth: 50.0,
            size: ValueRange::new(0.05, 0.25),
            rotation_speed: 0.01,
            color: [1.0, 1.0, 1.0, 1.0],
        }
    }
}

/// Placement and animation of photo panels.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Reflect)]
#[serde(default)]
pub struct PhotoConfig {
    /// Assembled shape the photos spiral along.
    pub tree: TreeShape,
    /// Radius of the ball photos scatter into.
    pub scatter_radius: f32,
    /// Panel scale while not selected.
    pub base_scale: f32,
    /// Panel scale while focused.
    pub focus_scale: f32,
    /// Distance in front of the camera a focused photo moves to.
    pub focus_distance: f32,
    /// Angular speed of the idle float motion.
    pub float_speed: ValueRange,
    /// Amplitude of the idle float motion.
    pub float_radius: ValueRange,
    /// Maximum roll, in radians, applied while floating.
    pub sway: f32,
    /// Easing rate of the panel opacity.
    pub opacity_rate: f32,
    /// Easing rate of the focus animation.
    pub select_rate: f32,
    /// Image paths loaded when the tree spawns.
    pub paths: Vec<String>,
}

impl Default for PhotoConfig {
    fn default() -> Self {
        Self {
            tree: TreeShape::new(4.0, 11.0),
            scatter_radius: 15.0,
            base_scale: 1.8,
            focus_scale: 5.0,
            focus_distance: 5.0,
            float_speed: ValueRange::new(0.1, 0.3),
            float_radius: ValueRange::new(0.2, 0.5),
            sway: 0.05,
            opacity_rate: 3.0,
            select_rate: 5.0,
            paths: Vec::new(),
        }
    }
}

/// The glowing disc at the foot of the tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Reflect)]
#[serde(default)]
pub struct GroundConfig {
    /// Whether the disc is spawned.
    pub enabled: bool,
    /// Disc radius.
    pub radius: f32,
    /// Height of the flattened cone.
    pub height: f32,
    /// Radial segments.
    pub segments: u32,
    /// Vertical offset from the tree origin.
    pub offset_y: f32,
    /// Glow color (sRGBA).
    pub color: [f32; 4],
    /// Emissive multiplier at full opacity.
    pub max_emissive: f32,
    /// Spin around the disc normal, in radians per second.
    pub spin_speed: f32,
    /// Easing rate of the fade in and out.
    pub fade_rate: f32,
}

impl Default for GroundConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            radius: 12.0,
            height: 0.5,
            segments: 64,
            offset_y: -6.2,
            color: hex_rgba(0xffd700),
            max_emissive: 4.0,
            spin_speed: 0.05,
            fade_rate: 2.0,
        }
    }
}

/// Meteors streaking across the sky while the tree is assembled.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Reflect)]
#[serde(default)]
pub struct ShootingStarConfig {
    /// Whether meteors are spawned at all.
    pub enabled: bool,
    /// Number of meteors.
    pub count: u32,
    /// Radius of the trail cone.
    pub radius: f32,
    /// Length of the trail cone.
    pub length: f32,
    /// Roll of the trail around Z.
    pub tilt: f32,
    /// Trail opacity.
    pub opacity: f32,
    /// Half-width of the spawn area on X and Z.
    pub spawn_half_width: f32,
    /// Vertical spawn band.
    pub spawn_height: ValueRange,
    /// Speed multiplier per meteor.
    pub speed: ValueRange,
    /// Velocity at speed `1`, applied as `(-x, -y)`.
    pub velocity: Vec2,
    /// Meteors below this height are moved back to their start.
    pub reset_below: f32,
    /// Random X offset applied on reset.
    pub reset_jitter: f32,
}

impl Default for ShootingStarConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            count: 5,
            radius: 0.1,
            length: 5.0,
            tilt: PI / 3.0,
            opacity: 0.6,
            spawn_half_width: 50.0,
            spawn_height: ValueRange::new(20.0, 70.0),
            speed: ValueRange::new(1.0, 3.0),
            velocity: Vec2::new(10.0, 5.0),
            reset_below: -50.0,
            reset_jitter: 20.0,
        }
    }
}
