use bevy::picking::prelude::Pickable;
use bevy::prelude::*;
use bevy::window::FileDragAndDrop;
use bevy_garland::prelude::*;

const GOLD: Color = Color::srgb(1.0, 215.0 / 255.0, 0.0);
const CREAM: Color = Color::srgb(230.0 / 255.0, 210.0 / 255.0, 181.0 / 255.0);
const HUD_DIMMED_ALPHA: f32 = 0.3;
const OVERLAY_ALPHA: f32 = 0.6;

pub fn plugin(app: &mut App) {
    app.add_systems(Startup, setup_hud).add_systems(
        Update,
        (
            handle_toggle_click,
            handle_keyboard,
            add_dropped_photos,
            update_toggle_label,
            update_photo_count,
            sync_selection_overlay,
        ),
    );
}

#[derive(Component)]
pub struct ToggleButton;

#[derive(Component)]
pub struct ToggleLabel;

#[derive(Component)]
pub struct PhotoCountLabel;

/// Dims the scene while a photo is selected.
#[derive(Component)]
pub struct SelectionOverlay;

/// Text that fades out while a photo is selected.
#[derive(Component)]
struct HudText {
    alpha: f32,
}

/// The tree that dropped files are added to.
#[derive(Component)]
pub struct ViewerTree;

pub fn toggle_label(mode: TreeMode) -> &'static str {
    match mode {
        TreeMode::Scattered => "ASSEMBLE TREE",
        TreeMode::TreeShape => "SCATTER",
    }
}

pub fn photo_count_label(count: usize) -> String {
    format!("Photos loaded: {count}")
}

fn hud_text(content: impl Into<String>, size: f32, color: Color, alpha: f32) -> impl Bundle {
    (
        Text::new(content),
        TextFont {
            font_size: size,
            ..default()
        },
        TextColor(color.with_alpha(alpha)),
        HudText { alpha },
    )
}

fn setup_hud(mut commands: Commands) {
    commands.spawn((
        SelectionOverlay,
        Name::new("Selection Overlay"),
        Node {
            position_type: PositionType::Absolute,
            width: percent(100),
            height: percent(100),
            ..default()
        },
        BackgroundColor(Color::BLACK.with_alpha(0.0)),
        Pickable::IGNORE,
    ));

    commands.spawn((
        Name::new("Hud"),
        Node {
            position_type: PositionType::Absolute,
            top: px(30),
            left: px(30),
            flex_direction: FlexDirection::Column,
            row_gap: px(6),
            ..default()
        },
        children![
            hud_text("MERRY CHRISTMAS", 28.0, GOLD, 1.0),
            hud_text("Drop photos on the window to decorate", 14.0, CREAM, 0.8),
            (
                ToggleButton,
                Button,
                Node {
                    padding: UiRect::axes(px(20), px(10)),
                    margin: UiRect::vertical(px(14)),
                    align_self: AlignSelf::FlexStart,
                    border: UiRect::all(px(1)),
                    ..default()
                },
                BackgroundColor(GOLD.with_alpha(0.1)),
                BorderColor::all(GOLD),
                children![(
                    ToggleLabel,
                    hud_text(toggle_label(TreeMode::default()), 12.0, GOLD, 1.0),
                )],
            ),
            (
                PhotoCountLabel,
                hud_text(photo_count_label(0), 10.0, CREAM, 0.6),
            ),
        ],
    ));
}

fn handle_toggle_click(
    mut commands: Commands,
    selection: Res<PhotoSelection>,
    button_query: Query<&Interaction, (Changed<Interaction>, With<ToggleButton>)>,
) {
    if selection.selected.is_some() {
        return;
    }
    for interaction in &button_query {
        if *interaction == Interaction::Pressed {
            commands.trigger(ToggleTreeMode);
        }
    }
}

fn handle_keyboard(
    mut commands: Commands,
    keyboard: Res<ButtonInput<KeyCode>>,
    selection: Res<PhotoSelection>,
) {
    if keyboard.just_pressed(KeyCode::Escape) && selection.selected.is_some() {
        commands.trigger(SelectPhoto(None));
    }
    if keyboard.just_pressed(KeyCode::Space) && selection.selected.is_none() {
        commands.trigger(ToggleTreeMode);
    }
}

fn add_dropped_photos(
    mut commands: Commands,
    mut drops: MessageReader<FileDragAndDrop>,
    tree: Query<Entity, With<ViewerTree>>,
) {
    let paths: Vec<String> = drops
        .read()
        .filter_map(|drop| match drop {
            FileDragAndDrop::DroppedFile { path_buf, .. } => {
                Some(path_buf.to_string_lossy().to_string())
            }
            _ => None,
        })
        .collect();
    if paths.is_empty() {
        return;
    }

    let Some(tree) = tree.iter().next() else {
        warn!("dropped {} file(s) but no tree is spawned", paths.len());
        return;
    };
    commands.trigger(AddPhotos { tree, paths });
}

fn update_toggle_label(mode: Res<TreeMode>, mut labels: Query<&mut Text, With<ToggleLabel>>) {
    if !mode.is_changed() {
        return;
    }
    for mut text in &mut labels {
        text.0 = toggle_label(*mode).to_string();
    }
}

fn update_photo_count(
    photos: Query<(), With<PhotoPanel>>,
    mut labels: Query<&mut Text, With<PhotoCountLabel>>,
) {
    let label = photo_count_label(photos.iter().count());
    for mut text in &mut labels {
        if text.0 != label {
            text.0 = label.clone();
        }
    }
}

fn sync_selection_overlay(
    selection: Res<PhotoSelection>,
    mut overlay: Query<&mut BackgroundColor, With<SelectionOverlay>>,
    mut texts: Query<(&HudText, &mut TextColor)>,
) {
    if !selection.is_changed() {
        return;
    }

    let selected = selection.selected.is_some();
    for mut background in &mut overlay {
        let alpha = if selected { OVERLAY_ALPHA } else { 0.0 };
        background.0.set_alpha(alpha);
    }
    for (hud, mut color) in &mut texts {
        let alpha = if selected {
            hud.alpha * HUD_DIMMED_ALPHA
        } else {
            hud.alpha
        };
        color.0.set_alpha(alpha);
    }
}
