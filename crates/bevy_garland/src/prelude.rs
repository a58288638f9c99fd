pub use crate::{GarlandPlugin, GarlandSimulationPlugin};

pub use crate::asset::{
    GroundConfig, LayerConfig, LayerMaterial, LayerMesh, LayerSpin, PhotoConfig,
    ShootingStarConfig, StarfieldConfig, TreeSceneAsset, TreeShape, ValueRange,
};

pub use crate::morph::{SetTreeMode, ToggleTreeMode, TreeMode};
pub use crate::photos::{AddPhotos, PhotoPanel, PhotoSelection, SelectPhoto};
pub use crate::runtime::{GarlandTree, LayerKind, ParticleLayer, PendingPhotos};
