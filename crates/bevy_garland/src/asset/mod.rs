mod effects;
mod layer;
pub(crate) mod serde_helpers;
/// Scene format version tracking and compatibility validation.
pub mod versioning;

pub use effects::{GroundConfig, PhotoConfig, ShootingStarConfig, StarfieldConfig};
pub use layer::{
    LayerConfig, LayerMaterial, LayerMesh, LayerSpin, TreeShape, ValueRange, hex_rgba,
};

use bevy::{
    asset::{AssetLoader, LoadContext, io::Reader},
    prelude::*,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use serde_helpers::serde_default;
use versioning::{VersionStatus, current_format_version};

/// Asset loader for [`TreeSceneAsset`] files in RON format.
#[derive(Default, TypePath)]
pub struct TreeSceneAssetLoader;

/// Errors that can occur when loading a [`TreeSceneAsset`].
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum TreeSceneLoaderError {
    /// An I/O error occurred while reading the scene file.
    #[error("Could not load scene: {0}")]
    Io(#[from] std::io::Error),
    /// The scene file contained invalid RON syntax.
    #[error("Could not parse RON: {0}")]
    Ron(#[from] ron::error::SpannedError),
    /// The scene file has an unknown format version.
    #[error("Unknown garland_version. You may need a newer version of Garland.")]
    UnknownVersion,
    /// The scene file has a version that requires breaking changes to upgrade.
    #[error(
        "Scene version \"{found}\" is incompatible with current version \"{current}\". Manual migration is required."
    )]
    IncompatibleVersion {
        /// The version found in the scene file.
        found: String,
        /// The current format version.
        current: String,
    },
    /// The scene parsed but describes an impossible tree.
    #[error("Invalid scene: {0}")]
    Invalid(#[from] TreeSceneError),
}

/// Validation failures of a decoded [`TreeSceneAsset`].
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TreeSceneError {
    /// A radius or distance is negative or not finite.
    #[error("{field} must be a finite, non-negative number (got {value})")]
    NegativeRadius {
        /// Dotted path of the offending field.
        field: String,
        /// The rejected value.
        value: f32,
    },
    /// A tree height is zero, negative or not finite.
    #[error("{field} must be greater than zero (got {value})")]
    NonPositiveHeight {
        /// Dotted path of the offending field.
        field: String,
        /// The rejected value.
        value: f32,
    },
    /// A range has `min > max`.
    #[error("{field} has min {min} greater than max {max}")]
    InvertedRange {
        /// Dotted path of the offending field.
        field: String,
        /// Lower bound.
        min: f32,
        /// Upper bound.
        max: f32,
    },
    /// A scale or easing rate is zero or negative.
    #[error("{field} must be greater than zero (got {value})")]
    NonPositiveFactor {
        /// Dotted path of the offending field.
        field: String,
        /// The rejected value.
        value: f32,
    },
}

impl AssetLoader for TreeSceneAssetLoader {
    type Asset = TreeSceneAsset;
    type Settings = ();
    type Error = TreeSceneLoaderError;

    async fn load(
        &self,
        reader: &mut dyn Reader,
        _settings: &(),
        load_context: &mut LoadContext<'_>,
    ) -> Result<Self::Asset, Self::Error> {
        let mut bytes = Vec::new();
        reader.read_to_end(&mut bytes).await?;
        let mut asset = ron::de::from_bytes::<TreeSceneAsset>(&bytes)?;

        match asset.try_upgrade_version() {
            VersionStatus::Current => {}
            VersionStatus::Outdated { found, current } => {
                let path = load_context.path();
                warn!(
                    "{path:?}: loaded scene with garland_version \"{found}\", current is \"{current}\""
                );
            }
            VersionStatus::Incompatible { found, current } => {
                return Err(TreeSceneLoaderError::IncompatibleVersion {
                    found,
                    current: current.to_string(),
                });
            }
            VersionStatus::Unknown => {
                return Err(TreeSceneLoaderError::UnknownVersion);
            }
        }

        asset.validate()?;
        Ok(asset)
    }

    fn extensions(&self) -> &[&str] {
        &["tree.ron"]
    }
}

serde_default!(name, String, "Garland".to_string());
serde_default!(position, Vec3, Vec3::new(0.0, -3.0, 0.0));
serde_default!(assemble_rate, f32, 2.0);

/// A complete tree scene: particle layers, photos and ambient effects.
///
/// Load it from a `.tree.ron` file or build it in code, then spawn a
/// [`GarlandTree`](crate::GarlandTree) that references it.
#[derive(Asset, TypePath, Debug, Clone, Serialize, Deserialize)]
pub struct TreeSceneAsset {
    garland_version: String,
    /// Display name.
    #[serde(default = "default_name")]
    pub name: String,
    /// Fixed seed for every random placement. `None` draws from entropy.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
    /// Offset of the tree relative to the entity it is spawned on.
    #[serde(default = "default_position", skip_serializing_if = "is_default_position")]
    pub position: Vec3,
    /// Easing rate of the scatter/assemble morph.
    #[serde(default = "default_assemble_rate")]
    pub assemble_rate: f32,
    /// The needle layer.
    #[serde(
        default = "LayerConfig::needles",
        deserialize_with = "LayerConfig::deserialize_needles"
    )]
    pub needles: LayerConfig,
    /// The ornament layer.
    #[serde(
        default = "LayerConfig::ornaments",
        deserialize_with = "LayerConfig::deserialize_ornaments"
    )]
    pub ornaments: LayerConfig,
    /// Background stars.
    #[serde(default)]
    pub starfield: StarfieldConfig,
    /// Photo panels.
    #[serde(default)]
    pub photos: PhotoConfig,
    /// Glow at the foot of the tree.
    #[serde(default)]
    pub ground: GroundConfig,
    /// Meteors shown while assembled.
    #[serde(default)]
    pub shooting_stars: ShootingStarConfig,
}

impl Default for TreeSceneAsset {
    fn default() -> Self {
        Self {
            garland_version: current_format_version().to_string(),
            name: default_name(),
            seed: None,
            position: default_position(),
            assemble_rate: default_assemble_rate(),
            needles: LayerConfig::needles(),
            ornaments: LayerConfig::ornaments(),
            starfield: StarfieldConfig::default(),
            photos: PhotoConfig::default(),
            ground: GroundConfig::default(),
            shooting_stars: ShootingStarConfig::default(),
        }
    }
}

impl TreeSceneAsset {
    /// Returns the format version this scene was written with.
    pub fn format_version(&self) -> &str {
        &self.garland_version
    }

    /// Validates `garland_version` and upgrades it in place when possible.
    pub fn try_upgrade_version(&mut self) -> VersionStatus {
        let status = versioning::validate_version(&self.garland_version);
        if matches!(status, VersionStatus::Outdated { .. }) {
            self.garland_version = current_format_version().to_string();
        }
        status
    }

    /// Checks that every radius, height, range and rate describes a drawable scene.
    pub fn validate(&self) -> Result<(), TreeSceneError> {
        positive_factor("assemble_rate", self.assemble_rate)?;

        validate_layer("needles", &self.needles)?;
        validate_layer("ornaments", &self.ornaments)?;

        non_negative("starfield.radius", self.starfield.radius)?;
        non_negative("starfield.depth", self.starfield.depth)?;
        ordered("starfield.size", self.starfield.size)?;

        let photos = &self.photos;
        non_negative("photos.tree.max_radius", photos.tree.max_radius)?;
        positive_height("photos.tree.height", photos.tree.height)?;
        non_negative("photos.scatter_radius", photos.scatter_radius)?;
        positive_factor("photos.base_scale", photos.base_scale)?;
        positive_factor("photos.focus_scale", photos.focus_scale)?;
        non_negative("photos.focus_distance", photos.focus_distance)?;
        ordered("photos.float_speed", photos.float_speed)?;
        ordered("photos.float_radius", photos.float_radius)?;
        positive_factor("photos.opacity_rate", photos.opacity_rate)?;
        positive_factor("photos.select_rate", photos.select_rate)?;

        non_negative("ground.radius", self.ground.radius)?;
        positive_factor("ground.fade_rate", self.ground.fade_rate)?;

        non_negative("shooting_stars.radius", self.shooting_stars.radius)?;
        non_negative("shooting_stars.length", self.shooting_stars.length)?;
        ordered("shooting_stars.spawn_height", self.shooting_stars.spawn_height)?;
        ordered("shooting_stars.speed", self.shooting_stars.speed)?;

        Ok(())
    }
}

fn validate_layer(name: &str, layer: &LayerConfig) -> Result<(), TreeSceneError> {
    non_negative(format!("{name}.tree.max_radius"), layer.tree.max_radius)?;
    positive_height(format!("{name}.tree.height"), layer.tree.height)?;
    non_negative(format!("{name}.scatter_radius"), layer.scatter_radius)?;
    ordered(format!("{name}.scale"), layer.scale)?;
    ordered(format!("{name}.float_speed"), layer.float_speed)?;
    non_negative(format!("{name}.mesh.radius"), layer.mesh.radius())?;
    Ok(())
}

fn non_negative(field: impl Into<String>, value: f32) -> Result<(), TreeSceneError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(TreeSceneError::NegativeRadius {
            field: field.into(),
            value,
        })
    }
}

fn positive_height(field: impl Into<String>, value: f32) -> Result<(), TreeSceneError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(TreeSceneError::NonPositiveHeight {
            field: field.into(),
            value,
        })
    }
}

fn positive_factor(field: impl Into<String>, value: f32) -> Result<(), TreeSceneError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(TreeSceneError::NonPositiveFactor {
            field: field.into(),
            value,
        })
    }
}

fn ordered(field: impl Into<String>, range: ValueRange) -> Result<(), TreeSceneError> {
    if range.is_ordered() {
        Ok(())
    } else {
        Err(TreeSceneError::InvertedRange {
            field: field.into(),
            min: range.min,
            max: range.max,
        })
    }
}
