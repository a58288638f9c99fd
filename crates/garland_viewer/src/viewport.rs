use std::f32::consts::PI;

use bevy::input::mouse::{AccumulatedMouseMotion, AccumulatedMouseScroll};
use bevy::post_process::bloom::Bloom;
use bevy::prelude::*;
use bevy_garland::prelude::*;

pub const BACKGROUND_COLOR: Color = Color::srgb(0.0, 2.0 / 255.0, 0.0);

const ORBIT_TARGET: Vec3 = Vec3::ZERO;
const INITIAL_DISTANCE: f32 = 18.0;
const FIELD_OF_VIEW_DEGREES: f32 = 50.0;

/// Auto-rotation speed of 1.0 completes an orbit in a minute.
const AUTO_ROTATE_RADIANS_PER_UNIT: f32 = 2.0 * PI / 60.0;

#[derive(Component)]
pub struct ViewerCamera;

/// Spherical coordinates of the camera around [`ORBIT_TARGET`].
#[derive(Component, Debug, Clone, Copy, PartialEq)]
pub struct OrbitRig {
    /// Angle around Y, `0` looks down -Z.
    pub yaw: f32,
    /// Angle from +Y.
    pub polar: f32,
    pub distance: f32,
}

impl Default for OrbitRig {
    fn default() -> Self {
        Self {
            yaw: 0.0,
            polar: PI / 2.0,
            distance: INITIAL_DISTANCE,
        }
    }
}

impl OrbitRig {
    pub fn translation(&self) -> Vec3 {
        let (sin_polar, cos_polar) = self.polar.sin_cos();
        let (sin_yaw, cos_yaw) = self.yaw.sin_cos();
        ORBIT_TARGET
            + Vec3::new(sin_polar * sin_yaw, cos_polar, sin_polar * cos_yaw) * self.distance
    }

    pub fn transform(&self) -> Transform {
        Transform::from_translation(self.translation()).looking_at(ORBIT_TARGET, Vec3::Y)
    }
}

#[derive(Debug, Resource)]
pub struct OrbitSettings {
    pub yaw_speed: f32,
    pub pitch_speed: f32,
    pub zoom_speed: f32,
    pub min_distance: f32,
    pub max_distance: f32,
    pub min_polar: f32,
    pub max_polar: f32,
    pub auto_rotate_speed: f32,
}

impl Default for OrbitSettings {
    fn default() -> Self {
        Self {
            yaw_speed: 0.005,
            pitch_speed: 0.005,
            zoom_speed: 1.0,
            min_distance: 8.0,
            max_distance: 35.0,
            min_polar: 0.01,
            max_polar: PI / 1.6,
            auto_rotate_speed: 0.5,
        }
    }
}

impl OrbitSettings {
    pub fn clamp(&self, rig: &mut OrbitRig) {
        rig.polar = rig.polar.clamp(self.min_polar, self.max_polar);
        rig.distance = rig.distance.clamp(self.min_distance, self.max_distance);
    }
}

pub fn setup_camera(mut commands: Commands) {
    let rig = OrbitRig::default();
    commands.spawn((
        ViewerCamera,
        Name::new("Camera"),
        Camera3d::default(),
        Camera {
            clear_color: ClearColorConfig::Custom(BACKGROUND_COLOR),
            ..default()
        },
        Projection::Perspective(PerspectiveProjection {
            fov: FIELD_OF_VIEW_DEGREES.to_radians(),
            ..default()
        }),
        rig.transform(),
        rig,
        Bloom::NATURAL,
    ));
}

pub fn setup_lights(mut commands: Commands) {
    commands.spawn((
        Name::new("Key Light"),
        SpotLight {
            color: Color::srgb_u8(0xff, 0xd7, 0x00),
            intensity: 4_000_000.0,
            range: 80.0,
            outer_angle: 0.3,
            inner_angle: 0.15,
            shadows_enabled: true,
            ..default()
        },
        Transform::from_xyz(15.0, 20.0, 15.0).looking_at(Vec3::ZERO, Vec3::Y),
    ));

    commands.spawn((
        Name::new("Red Fill"),
        PointLight {
            color: Color::srgb_u8(0xff, 0x33, 0x33),
            intensity: 1_500_000.0,
            range: 60.0,
            ..default()
        },
        Transform::from_xyz(-15.0, 5.0, 10.0),
    ));

    commands.spawn((
        Name::new("Cyan Under Light"),
        PointLight {
            color: Color::srgb_u8(0x00, 0xaa, 0xaa),
            intensity: 750_000.0,
            range: 40.0,
            ..default()
        },
        Transform::from_xyz(0.0, -10.0, 0.0),
    ));
}

pub fn orbit_camera(
    mut camera: Single<(&mut OrbitRig, &mut Transform), With<ViewerCamera>>,
    settings: Res<OrbitSettings>,
    selection: Res<PhotoSelection>,
    mouse_buttons: Res<ButtonInput<MouseButton>>,
    mouse_motion: Res<AccumulatedMouseMotion>,
) {
    if selection.selected.is_some() || !mouse_buttons.pressed(MouseButton::Left) {
        return;
    }

    let delta = mouse_motion.delta;
    if delta == Vec2::ZERO {
        return;
    }

    let (rig, transform) = &mut *camera;
    rig.yaw -= delta.x * settings.yaw_speed;
    rig.polar -= delta.y * settings.pitch_speed;
    settings.clamp(rig);
    **transform = rig.transform();
}

pub fn zoom_camera(
    mut camera: Single<(&mut OrbitRig, &mut Transform), With<ViewerCamera>>,
    settings: Res<OrbitSettings>,
    selection: Res<PhotoSelection>,
    mouse_scroll: Res<AccumulatedMouseScroll>,
) {
    if selection.selected.is_some() {
        return;
    }

    let delta = mouse_scroll.delta.y;
    if delta == 0.0 {
        return;
    }

    let (rig, transform) = &mut *camera;
    rig.distance -= delta * settings.zoom_speed;
    settings.clamp(rig);
    **transform = rig.transform();
}

pub fn auto_rotate_camera(
    mut camera: Single<(&mut OrbitRig, &mut Transform), With<ViewerCamera>>,
    settings: Res<OrbitSettings>,
    mode: Res<TreeMode>,
    selection: Res<PhotoSelection>,
    time: Res<Time>,
) {
    if !mode.is_tree() || selection.selected.is_some() {
        return;
    }

    let (rig, transform) = &mut *camera;
    rig.yaw += settings.auto_rotate_speed * AUTO_ROTATE_RADIANS_PER_UNIT * time.delta_secs();
    **transform = rig.transform();
}
