use std::path::Path;

use bevy::prelude::*;

pub const DEFAULT_SCENE: &str = "scenes/evergreen.tree.ron";

/// Command line arguments: `garland [SCENE] [PHOTO...]`.
#[derive(Resource, Debug, Clone, PartialEq, Eq)]
pub struct CliArgs {
    /// Scene path, relative to the asset folder.
    pub scene: String,
    pub photos: Vec<String>,
}

impl Default for CliArgs {
    fn default() -> Self {
        Self {
            scene: DEFAULT_SCENE.to_string(),
            photos: Vec::new(),
        }
    }
}

impl CliArgs {
    pub fn from_env() -> Self {
        Self::parse(std::env::args().skip(1))
    }

    pub fn parse(args: impl IntoIterator<Item = String>) -> Self {
        let mut args = args.into_iter();
        let scene = args.next().unwrap_or_else(|| DEFAULT_SCENE.to_string());
        let photos = args.map(|photo| resolve_photo_path(&photo)).collect();
        Self { scene, photos }
    }
}

/// Photos given relative to the working directory are made absolute so the asset
/// server does not look for them inside the asset folder.
pub fn resolve_photo_path(photo: &str) -> String {
    let path = Path::new(photo);
    if path.is_absolute() {
        return photo.to_string();
    }
    match std::env::current_dir() {
        Ok(cwd) if cwd.join(path).exists() => cwd.join(path).to_string_lossy().to_string(),
        _ => photo.to_string(),
    }
}
