use bevy::prelude::*;
use rand::Rng;
use serde::{Deserialize, Deserializer, Serialize};

use super::serde_helpers::{is_true, is_zero_f32, serde_default};

/// A closed range of values from which particle properties are sampled uniformly.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Reflect)]
pub struct ValueRange {
    /// Lower bound, inclusive.
    pub min: f32,
    /// Upper bound, exclusive unless equal to `min`.
    pub max: f32,
}

impl ValueRange {
    /// Creates a range from `min` to `max`.
    pub const fn new(min: f32, max: f32) -> Self {
        Self { min, max }
    }

    /// A range that always yields `value`.
    pub const fn constant(value: f32) -> Self {
        Self {
            min: value,
            max: value,
        }
    }

    /// Samples a value uniformly from the range.
    pub fn sample(&self, rng: &mut impl Rng) -> f32 {
        self.min + rng.r#gen::<f32>() * (self.max - self.min)
    }

    /// Returns `true` if `min <= max` and both bounds are finite.
    pub fn is_ordered(&self) -> bool {
        self.min.is_finite() && self.max.is_finite() && self.min <= self.max
    }
}

impl Default for ValueRange {
    fn default() -> Self {
        Self::new(0.0, 1.0)
    }
}

/// The cone that particles assemble into.
///
/// Particles are placed along a golden-angle spiral from the base (widest) to the apex.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Reflect)]
pub struct TreeShape {
    /// Radius of the tree at its base.
    pub max_radius: f32,
    /// Total height of the tree, centered on the layer origin.
    pub height: f32,
    /// Vertical offset added to every assembled position.
    #[serde(default, skip_serializing_if = "is_zero_f32")]
    pub lift: f32,
}

impl TreeShape {
    /// Creates a tree shape without lift.
    pub const fn new(max_radius: f32, height: f32) -> Self {
        Self {
            max_radius,
            height,
            lift: 0.0,
        }
    }

    /// Returns this shape lifted by `lift` units.
    pub const fn with_lift(mut self, lift: f32) -> Self {
        self.lift = lift;
        self
    }
}

impl Default for TreeShape {
    fn default() -> Self {
        Self::new(4.5, 12.0)
    }
}

/// How particles of a layer rotate over time.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Reflect, Default)]
pub enum LayerSpin {
    /// Particles keep the identity rotation.
    #[default]
    None,
    /// Particles start at a random X/Y rotation in `[0, PI)` and keep spinning.
    Tumble {
        /// Spin around X, in radians per second.
        x_rate: f32,
        /// Spin around Y, in radians per second.
        y_rate: f32,
    },
    /// Particles rotate by `time * rate + index` around X and Y, so neighbours never align.
    Indexed {
        /// Spin rate in radians per second.
        rate: f32,
    },
}

/// The mesh drawn for every particle in a layer.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Reflect)]
pub enum LayerMesh {
    /// A regular tetrahedron inscribed in a sphere of `radius`.
    Tetrahedron {
        /// Circumscribed radius.
        radius: f32,
    },
    /// A subdivided icosahedron.
    Icosphere {
        /// Sphere radius.
        radius: f32,
        /// Subdivision level. `0` is a plain icosahedron.
        #[serde(default)]
        subdivisions: u32,
    },
}

impl LayerMesh {
    /// Returns the bounding radius of the base mesh.
    pub fn radius(&self) -> f32 {
        match self {
            Self::Tetrahedron { radius } | Self::Icosphere { radius, .. } => *radius,
        }
    }
}

impl Default for LayerMesh {
    fn default() -> Self {
        Self::Tetrahedron { radius: 0.08 }
    }
}

serde_default!(white, [f32; 4], [1.0, 1.0, 1.0, 1.0]);
serde_default!(black, [f32; 4], [0.0, 0.0, 0.0, 1.0]);
serde_default!(roughness, f32, 0.5);
serde_default!(emissive_intensity, f32, 1.0);

/// Surface settings shared by all particles of a layer.
///
/// Colors are sRGB(A) components in `[0, 1]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Reflect)]
pub struct LayerMaterial {
    /// Albedo, multiplied by the per-particle palette color.
    #[serde(default = "default_white", skip_serializing_if = "is_default_white")]
    pub base_color: [f32; 4],
    /// Emitted color.
    #[serde(default = "default_black", skip_serializing_if = "is_default_black")]
    pub emissive: [f32; 4],
    /// Multiplier applied to `emissive`.
    #[serde(
        default = "default_emissive_intensity",
        skip_serializing_if = "is_default_emissive_intensity"
    )]
    pub emissive_intensity: f32,
    /// Perceptual roughness.
    #[serde(default = "default_roughness", skip_serializing_if = "is_default_roughness")]
    pub roughness: f32,
    /// Metallic factor.
    #[serde(default, skip_serializing_if = "is_zero_f32")]
    pub metallic: f32,
    /// Skip lighting entirely.
    #[serde(default)]
    pub unlit: bool,
}

impl Default for LayerMaterial {
    fn default() -> Self {
        Self {
            base_color: default_white(),
            emissive: default_black(),
            emissive_intensity: default_emissive_intensity(),
            roughness: default_roughness(),
            metallic: 0.0,
            unlit: false,
        }
    }
}

impl LayerMaterial {
    /// Builds the Bevy material used as the base of the instanced material.
    pub fn to_standard_material(&self) -> StandardMaterial {
        let [r, g, b, a] = self.base_color;
        let [er, eg, eb, _] = self.emissive;
        let emissive = LinearRgba::from(Color::srgb(er, eg, eb));
        let intensity = self.emissive_intensity;

        StandardMaterial {
            base_color: Color::srgba(r, g, b, a),
            emissive: LinearRgba::rgb(
                emissive.red * intensity,
                emissive.green * intensity,
                emissive.blue * intensity,
            ),
            perceptual_roughness: self.roughness,
            metallic: self.metallic,
            unlit: self.unlit,
            ..default()
        }
    }
}

/// Configuration of one instanced particle layer (needles or ornaments).
///
/// Fields left out of a RON section keep the value of the layer's preset:
/// [`LayerConfig::needles`] for the `needles` section and standalone values,
/// [`LayerConfig::ornaments`] for the `ornaments` section.
#[derive(Debug, Clone, PartialEq, Serialize, Reflect)]
pub struct LayerConfig {
    /// Whether the layer is spawned at all.
    #[serde(skip_serializing_if = "is_true")]
    pub enabled: bool,
    /// Number of particles.
    pub count: u32,
    /// Assembled shape.
    pub tree: TreeShape,
    /// Radius of the ball particles scatter into.
    pub scatter_radius: f32,
    /// Uniform scale per particle.
    pub scale: ValueRange,
    /// Angular speed of the idle float motion.
    pub float_speed: ValueRange,
    /// Float amplitude while fully scattered.
    pub drift: f32,
    /// Fraction of `drift` that remains once the tree is assembled.
    pub drift_retained: f32,
    /// Amplitude of a slow whole-layer vertical sway that fades out as the tree assembles.
    pub bob: f32,
    /// Rotation behaviour.
    pub spin: LayerSpin,
    /// Mesh drawn per particle.
    pub mesh: LayerMesh,
    /// Shared surface settings.
    pub material: LayerMaterial,
    /// Per-particle tints picked at random. Empty means untinted.
    pub palette: Vec<[f32; 4]>,
}

impl Default for LayerConfig {
    fn default() -> Self {
        Self::needles()
    }
}

impl<'de> Deserialize<'de> for LayerConfig {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Self::deserialize_needles(deserializer)
    }
}

fn present<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    T::deserialize(deserializer).map(Some)
}

/// Declares `LayerOverrides`, a layer section where every field is optional,
/// and `apply`, which writes the fields that were present over a preset.
macro_rules! layer_overrides {
    ($($field:ident: $ty:ty),* $(,)?) => {
        #[derive(Deserialize)]
        #[serde(rename = "LayerConfig")]
        struct LayerOverrides {
            $(
                #[serde(default, deserialize_with = "present")]
                $field: Option<$ty>,
            )*
        }

        impl LayerOverrides {
            fn apply(self, mut base: LayerConfig) -> LayerConfig {
                $(
                    if let Some(value) = self.$field {
                        base.$field = value;
                    }
                )*
                base
            }
        }
    };
}

layer_overrides! {
    enabled: bool,
    count: u32,
    tree: TreeShape,
    scatter_radius: f32,
    scale: ValueRange,
    float_speed: ValueRange,
    drift: f32,
    drift_retained: f32,
    bob: f32,
    spin: LayerSpin,
    mesh: LayerMesh,
    material: LayerMaterial,
    palette: Vec<[f32; 4]>,
}

impl LayerConfig {
    /// The dark green needle cloud that makes up the body of the tree.
    pub fn needles() -> Self {
        Self {
            enabled: true,
            count: 3500,
            tree: TreeShape::new(4.5, 12.0),
            scatter_radius: 16.0,
            scale: ValueRange::new(0.4, 0.8),
            float_speed: ValueRange::new(0.2, 0.7),
            drift: 0.3,
            drift_retained: 0.3,
            bob: 0.0,
            spin: LayerSpin::Tumble {
                x_rate: 0.2,
                y_rate: 0.1,
            },
            mesh: LayerMesh::Tetrahedron { radius: 0.08 },
            material: LayerMaterial {
                base_color: hex_rgba(0x005533),
                emissive: hex_rgba(0x003311),
                emissive_intensity: 0.8,
                roughness: 0.3,
                metallic: 0.5,
                unlit: false,
            },
            palette: Vec::new(),
        }
    }

    /// Metallic baubles in red, gold and orange.
    pub fn ornaments() -> Self {
        Self {
            enabled: true,
            count: 1500,
            tree: TreeShape::new(4.8, 12.0).with_lift(0.2),
            scatter_radius: 18.0,
            scale: ValueRange::new(0.3, 0.9),
            float_speed: ValueRange::new(0.1, 0.4),
            drift: 0.4,
            drift_retained: 0.2,
            bob: 0.5,
            spin: LayerSpin::Indexed { rate: 0.1 },
            mesh: LayerMesh::Icosphere {
                radius: 0.12,
                subdivisions: 1,
            },
            material: LayerMaterial {
                base_color: default_white(),
                emissive: hex_rgba(0x444444),
                emissive_intensity: 0.5,
                roughness: 0.1,
                metallic: 0.9,
                unlit: false,
            },
            palette: vec![hex_rgba(0xff3333), hex_rgba(0xffd700), hex_rgba(0xff9a47)],
        }
    }

    /// Reads a layer section, filling missing fields from [`LayerConfig::needles`].
    pub(crate) fn deserialize_needles<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Self, D::Error> {
        LayerOverrides::deserialize(deserializer).map(|overrides| overrides.apply(Self::needles()))
    }

    /// Reads a layer section, filling missing fields from [`LayerConfig::ornaments`].
    pub(crate) fn deserialize_ornaments<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Self, D::Error> {
        LayerOverrides::deserialize(deserializer)
            .map(|overrides| overrides.apply(Self::ornaments()))
    }

    /// Float amplitude at assembly progress `t`.
    pub fn float_intensity(&self, t: f32) -> f32 {
        (1.0 - t * (1.0 - self.drift_retained)) * self.drift
    }
}

/// Converts a `0xRRGGBB` literal into opaque sRGBA components.
pub fn hex_rgba(hex: u32) -> [f32; 4] {
    let r = ((hex >> 16) & 0xff) as f32 / 255.0;
    let g = ((hex >> 8) & 0xff) as f32 / 255.0;
    let b = (hex & 0xff) as f32 / 255.0;
    [r, g, b, 1.0]
}
