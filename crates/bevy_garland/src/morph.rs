use bevy::prelude::*;

/// Which shape the tree is morphing towards.
#[derive(Resource, Debug, Clone, Copy, PartialEq, Eq, Default, Reflect)]
#[reflect(Resource)]
pub enum TreeMode {
    /// Particles float in a loose cloud.
    #[default]
    Scattered,
    /// Particles settle into the cone of the tree.
    TreeShape,
}

impl TreeMode {
    /// Returns the other mode.
    pub fn toggled(self) -> Self {
        match self {
            Self::Scattered => Self::TreeShape,
            Self::TreeShape => Self::Scattered,
        }
    }

    /// Assembly progress this mode eases towards: `0` scattered, `1` assembled.
    pub fn target(self) -> f32 {
        match self {
            Self::Scattered => 0.0,
            Self::TreeShape => 1.0,
        }
    }

    /// Returns `true` when the tree is assembled or assembling.
    pub fn is_tree(self) -> bool {
        self == Self::TreeShape
    }
}

/// Eases `current` towards `target` by a fraction `delta * rate` of the remaining distance.
///
/// The fraction is clamped to `[0, 1]`, so long frames snap to the target instead of
/// overshooting it.
pub fn approach(current: f32, target: f32, rate: f32, delta: f32) -> f32 {
    let factor = (delta * rate).clamp(0.0, 1.0);
    current + (target - current) * factor
}

/// Switches between [`TreeMode::Scattered`] and [`TreeMode::TreeShape`].
#[derive(Event, Debug, Clone, Copy)]
pub struct ToggleTreeMode;

/// Forces a specific [`TreeMode`].
#[derive(Event, Debug, Clone, Copy)]
pub struct SetTreeMode(pub TreeMode);

pub(crate) fn handle_toggle_tree_mode(_trigger: On<ToggleTreeMode>, mut mode: ResMut<TreeMode>) {
    *mode = mode.toggled();
    info!("tree mode changed to {:?}", *mode);
}

pub(crate) fn handle_set_tree_mode(trigger: On<SetTreeMode>, mut mode: ResMut<TreeMode>) {
    let next = trigger.event().0;
    if *mode != next {
        *mode = next;
        info!("tree mode set to {next:?}");
    }
}
