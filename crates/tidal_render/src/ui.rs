use bevy::prelude::*;
use bevy::window::{MonitorSelection, PrimaryWindow, WindowMode};
use tidal_core::Stage;
use tidal_sim::binary_system::BinaryState;
use tidal_sim::control::ControlState;
use tidal_sim::gesture::GestureLink;

/// Marker for the status panel text
#[derive(Component)]
pub struct StatusText;

/// Stage picker button
#[derive(Component)]
pub struct StageButton(pub Stage);

/// HUD frame counter for throttling
#[derive(Resource, Default)]
pub struct HudThrottle {
    pub frame: u32,
}

const STAGE_KEYS: [KeyCode; 4] = [
    KeyCode::Digit1,
    KeyCode::Digit2,
    KeyCode::Digit3,
    KeyCode::Digit4,
];

const BAR_WIDTH: usize = 20;

const BUTTON_IDLE: Color = Color::srgba(0.02, 0.1, 0.16, 0.8);
const BUTTON_ACTIVE: Color = Color::srgba(0.0, 0.52, 0.78, 0.9);

/// Spawn the HUD overlay
pub fn spawn_hud(mut commands: Commands) {
    // Title panel
    commands.spawn((
        Text::new("VFTS 352\nThe Kiss of Death"),
        TextFont {
            font_size: 22.0,
            ..default()
        },
        TextColor(Color::srgba(0.65, 0.95, 0.99, 0.95)),
        Node {
            position_type: PositionType::Absolute,
            top: Val::Px(16.0),
            left: Val::Px(16.0),
            ..default()
        },
    ));

    // Status panel
    commands.spawn((
        Text::new(""),
        TextFont {
            font_size: 14.0,
            ..default()
        },
        TextColor(Color::srgba(0.31, 0.76, 0.97, 0.9)),
        Node {
            position_type: PositionType::Absolute,
            top: Val::Px(16.0),
            right: Val::Px(16.0),
            ..default()
        },
        StatusText,
    ));

    // Stage picker along the bottom edge
    commands
        .spawn(Node {
            position_type: PositionType::Absolute,
            bottom: Val::Px(24.0),
            width: Val::Percent(100.0),
            justify_content: JustifyContent::Center,
            column_gap: Val::Px(12.0),
            ..default()
        })
        .with_children(|row| {
            for (i, stage) in Stage::ALL.into_iter().enumerate() {
                row.spawn((
                    Button,
                    Node {
                        width: Val::Px(150.0),
                        height: Val::Px(44.0),
                        justify_content: JustifyContent::Center,
                        align_items: AlignItems::Center,
                        ..default()
                    },
                    BackgroundColor(BUTTON_IDLE),
                    StageButton(stage),
                ))
                .with_children(|btn| {
                    btn.spawn((
                        Text::new(format!("[{}] {}", i + 1, stage.name())),
                        TextFont {
                            font_size: 16.0,
                            ..default()
                        },
                        TextColor(Color::WHITE),
                    ));
                });
            }
        });
}

pub fn stage_button_system(
    buttons: Query<(&Interaction, &StageButton), Changed<Interaction>>,
    mut state: ResMut<BinaryState>,
) {
    for (interaction, button) in &buttons {
        if *interaction == Interaction::Pressed {
            state.set_stage(button.0);
        }
    }
}

pub fn highlight_stage_buttons(
    state: Res<BinaryState>,
    mut buttons: Query<(&StageButton, &mut BackgroundColor)>,
) {
    for (button, mut bg) in buttons.iter_mut() {
        let color = if button.0 == state.stage {
            BUTTON_ACTIVE
        } else {
            BUTTON_IDLE
        };
        if bg.0 != color {
            bg.0 = color;
        }
    }
}

/// Stage hotkeys, gesture link connect/disconnect and pause
pub fn keyboard_controls(
    keyboard: Res<ButtonInput<KeyCode>>,
    mut state: ResMut<BinaryState>,
    mut link: ResMut<GestureLink>,
) {
    for (key, stage) in STAGE_KEYS.into_iter().zip(Stage::ALL) {
        if keyboard.just_pressed(key) {
            state.set_stage(stage);
        }
    }
    if keyboard.just_pressed(KeyCode::Space) {
        state.paused = !state.paused;
    }
    if keyboard.just_pressed(KeyCode::KeyC) {
        if let Err(e) = link.connect(&state.config.gesture_source) {
            error!("Gesture link failed: {e}");
        }
    }
    if keyboard.just_pressed(KeyCode::KeyX) {
        link.disconnect();
    }
}

pub fn toggle_fullscreen(
    keyboard: Res<ButtonInput<KeyCode>>,
    mut windows: Query<&mut Window, With<PrimaryWindow>>,
) {
    if !keyboard.just_pressed(KeyCode::F11) {
        return;
    }
    let Ok(mut window) = windows.get_single_mut() else {
        return;
    };
    window.mode = match window.mode {
        WindowMode::Windowed => WindowMode::BorderlessFullscreen(MonitorSelection::Current),
        _ => WindowMode::Windowed,
    };
}

/// Text gauge for openness, e.g. `[=====.....]`
pub fn openness_bar(openness: f32, width: usize) -> String {
    let filled = ((openness.clamp(0.0, 1.0) * width as f32).round() as usize).min(width);
    format!("[{}{}]", "=".repeat(filled), ".".repeat(width - filled))
}

/// Update HUD text every 10th frame
pub fn update_hud(
    state: Res<BinaryState>,
    control: Res<ControlState>,
    link: Res<GestureLink>,
    mut throttle: ResMut<HudThrottle>,
    mut query: Query<&mut Text, With<StatusText>>,
) {
    throttle.frame = throttle.frame.wrapping_add(1);
    if throttle.frame % 10 != 0 {
        return;
    }
    let Ok(mut text) = query.get_single_mut() else {
        return;
    };

    let sensor = if control.hand_detected { "Locked" } else { "Scan..." };
    let paused = if state.paused { " [PAUSED]" } else { "" };

    **text = format!(
        "{}\n\
         Sensor: {}\n\
         \n\
         Contract {} Expand\n\
         Openness: {:.2}\n\
         \n\
         Stage: {}{}\n\
         \n\
         [1-4] Stage  [C] Connect  [X] Disconnect\n\
         [Up/Down] Openness  [Space] Pause  [F11] Fullscreen",
        link.status().label(),
        sensor,
        openness_bar(control.openness, BAR_WIDTH),
        control.openness,
        state.stage,
        paused,
    );
}
