use bevy::ecs::hierarchy::ChildSpawnerCommands;
use bevy::prelude::*;
use bevy::window::PrimaryWindow;

use crate::assets_map::GameAssets;
use crate::config::tuning::Tuning;
use crate::game::{
    battle::BattleState,
    components::GamePhase,
    menu::{MenuCursor, MusicVolume, PauseChoice, PauseCursor, StageCursor, bar_fraction},
    outcome::RoundStatus,
    stage::{STAGES, StageId},
};

// ── Marker components ────────────────────────────────────────────────

#[derive(Component)]
struct TitleRoot;

#[derive(Component)]
struct StageSelectRoot;

#[derive(Component)]
struct PauseRoot;

#[derive(Component)]
struct SettingsRoot;

#[derive(Component)]
struct RoundOverOverlay;

/// Row `i` of the stage list; `STAGES.len()` is "Quit Game".
#[derive(Component)]
struct StageRow(usize);

#[derive(Component)]
struct StagePreview;

#[derive(Component)]
struct PauseOption(PauseChoice);

#[derive(Component)]
struct VolumeText;

#[derive(Component)]
struct VolumeFill;

#[derive(Component)]
struct SettingsBack;

// ── Colors & layout ──────────────────────────────────────────────────

const COLOR_TEXT: Color = Color::WHITE;
const COLOR_TEXT_DIM: Color = Color::srgb(0.78, 0.78, 0.78);
const COLOR_HIGHLIGHT: Color = Color::srgb(1.0, 1.0, 0.0);
const COLOR_ROW: Color = Color::srgba(0.0, 0.0, 0.0, 0.0);
const COLOR_ROW_SELECTED: Color = Color::srgba(1.0, 1.0, 0.0, 0.15);
const COLOR_BAR_BACK: Color = Color::srgb(0.31, 0.31, 0.31);
const COLOR_BAR_FILL: Color = Color::srgb(0.0, 0.78, 0.39);
const COLOR_BTN: Color = Color::srgb(0.39, 0.39, 0.39);

const VOLUME_BAR_WIDTH: f32 = 300.0;
const VOLUME_BAR_HEIGHT: f32 = 20.0;
const VOLUME_BAR_TOP: f32 = 320.0;

// ── Plugin ───────────────────────────────────────────────────────────

pub struct MenuPlugin;

impl Plugin for MenuPlugin {
    fn build(&self, app: &mut App) {
        app.insert_resource(StageCursor(MenuCursor::new(STAGES.len() + 1)));
        app.init_resource::<PauseCursor>();

        // Title
        app.add_systems(OnEnter(GamePhase::Title), spawn_title);
        app.add_systems(OnExit(GamePhase::Title), despawn::<TitleRoot>);
        app.add_systems(Update, title_input.run_if(in_state(GamePhase::Title)));

        // Stage select
        app.add_systems(OnEnter(GamePhase::StageSelect), spawn_stage_select);
        app.add_systems(OnExit(GamePhase::StageSelect), despawn::<StageSelectRoot>);
        app.add_systems(
            Update,
            (stage_select_input, update_stage_rows)
                .chain()
                .run_if(in_state(GamePhase::StageSelect)),
        );

        // Pause
        app.add_systems(OnEnter(GamePhase::Paused), spawn_pause_menu);
        app.add_systems(OnExit(GamePhase::Paused), despawn::<PauseRoot>);
        app.add_systems(
            Update,
            (pause_input, update_pause_rows)
                .chain()
                .run_if(in_state(GamePhase::Paused)),
        );

        // Settings
        app.add_systems(OnEnter(GamePhase::Settings), spawn_settings);
        app.add_systems(OnExit(GamePhase::Settings), despawn::<SettingsRoot>);
        app.add_systems(
            Update,
            (settings_input, update_volume_display)
                .chain()
                .run_if(in_state(GamePhase::Settings)),
        );

        // Round over
        app.add_systems(OnEnter(GamePhase::RoundOver), spawn_round_over_overlay);
        app.add_systems(OnExit(GamePhase::RoundOver), despawn::<RoundOverOverlay>);
    }
}

// ── Generic despawn ──────────────────────────────────────────────────

fn despawn<T: Component>(mut commands: Commands, query: Query<Entity, With<T>>) {
    for entity in &query {
        commands.entity(entity).despawn();
    }
}

fn full_screen(alpha: f32) -> (Node, BackgroundColor) {
    (
        Node {
            width: Val::Percent(100.0),
            height: Val::Percent(100.0),
            position_type: PositionType::Absolute,
            flex_direction: FlexDirection::Column,
            align_items: AlignItems::Center,
            ..default()
        },
        BackgroundColor(Color::srgba(0.0, 0.0, 0.0, alpha)),
    )
}

fn label(parent: &mut ChildSpawnerCommands, text: impl Into<String>, size: f32, color: Color, top: f32) {
    parent.spawn((
        Text::new(text),
        TextFont { font_size: size, ..default() },
        TextColor(color),
        Node { margin: UiRect::top(Val::Px(top)), ..default() },
    ));
}

// ═══════════════════════════════════════════════════════════════════════
// TITLE
// ═══════════════════════════════════════════════════════════════════════

fn spawn_title(mut commands: Commands, assets: Res<GameAssets>) {
    commands
        .spawn((
            TitleRoot,
            ImageNode::new(assets.title_bg.clone()),
            Node {
                width: Val::Percent(100.0),
                height: Val::Percent(100.0),
                ..default()
            },
        ))
        .with_children(|root| {
            root.spawn(full_screen(0.47)).with_children(|overlay| {
                label(overlay, "Kakutou Fighter", 80.0, COLOR_TEXT, 200.0);
                label(overlay, "Press ENTER to start", 36.0, COLOR_TEXT_DIM, 40.0);
            });
        });
}

fn title_input(keyboard: Res<ButtonInput<KeyCode>>, mut next_state: ResMut<NextState<GamePhase>>) {
    if keyboard.just_pressed(KeyCode::Enter) {
        next_state.set(GamePhase::StageSelect);
    }
}

// ═══════════════════════════════════════════════════════════════════════
// STAGE SELECT
// ═══════════════════════════════════════════════════════════════════════

fn spawn_stage_select(mut commands: Commands, assets: Res<GameAssets>, cursor: Res<StageCursor>) {
    let preview = assets.stage_bg(preview_stage(&cursor));
    commands
        .spawn((
            StageSelectRoot,
            StagePreview,
            ImageNode::new(preview),
            Node {
                width: Val::Percent(100.0),
                height: Val::Percent(100.0),
                ..default()
            },
        ))
        .with_children(|root| {
            root.spawn(full_screen(0.59)).with_children(|overlay| {
                label(overlay, "Select Stage", 60.0, COLOR_TEXT, 60.0);

                let names = STAGES.iter().map(|s| s.name).chain(["Quit Game"]);
                for (i, name) in names.enumerate() {
                    overlay
                        .spawn((
                            StageRow(i),
                            Node {
                                width: Val::Px(300.0),
                                height: Val::Px(50.0),
                                margin: UiRect::top(Val::Px(if i == 0 { 40.0 } else { 30.0 })),
                                justify_content: JustifyContent::Center,
                                align_items: AlignItems::Center,
                                ..default()
                            },
                            BackgroundColor(COLOR_ROW),
                        ))
                        .with_children(|row| {
                            row.spawn((
                                Text::new(name),
                                TextFont { font_size: 30.0, ..default() },
                                TextColor(COLOR_TEXT_DIM),
                            ));
                        });
                }

                label(overlay, "↑↓ Select  ENTER Confirm", 30.0, COLOR_TEXT_DIM, 40.0);
            });
        });
}

fn stage_select_input(
    keyboard: Res<ButtonInput<KeyCode>>,
    tuning: Res<Tuning>,
    mut cursor: ResMut<StageCursor>,
    mut battle: ResMut<BattleState>,
    mut next_state: ResMut<NextState<GamePhase>>,
    mut exit: MessageWriter<AppExit>,
) {
    if keyboard.just_pressed(KeyCode::ArrowUp) {
        cursor.0.up();
    }
    if keyboard.just_pressed(KeyCode::ArrowDown) {
        cursor.0.down();
    }
    if keyboard.just_pressed(KeyCode::Enter) {
        if cursor.0.index == STAGES.len() {
            battle.end_session();
            exit.write(AppExit::Success);
        } else {
            battle.start_round(StageId(cursor.0.index), &tuning);
            next_state.set(GamePhase::Battle);
        }
    }
}

fn update_stage_rows(
    cursor: Res<StageCursor>,
    assets: Res<GameAssets>,
    mut rows: Query<(&StageRow, &mut BackgroundColor, &Children)>,
    mut texts: Query<&mut TextColor>,
    mut preview: Query<&mut ImageNode, With<StagePreview>>,
) {
    for (row, mut bg, children) in &mut rows {
        let selected = row.0 == cursor.0.index;
        bg.0 = if selected { COLOR_ROW_SELECTED } else { COLOR_ROW };
        for child in children.iter() {
            if let Ok(mut color) = texts.get_mut(child) {
                color.0 = if selected { COLOR_HIGHLIGHT } else { COLOR_TEXT_DIM };
            }
        }
    }
    if cursor.is_changed() {
        for mut image in &mut preview {
            image.image = assets.stage_bg(preview_stage(&cursor));
        }
    }
}

/// The quit row keeps the first stage behind it.
fn preview_stage(cursor: &StageCursor) -> StageId {
    if cursor.0.index < STAGES.len() {
        StageId(cursor.0.index)
    } else {
        StageId(0)
    }
}

// ═══════════════════════════════════════════════════════════════════════
// PAUSE
// ═══════════════════════════════════════════════════════════════════════

fn spawn_pause_menu(mut commands: Commands, mut cursor: ResMut<PauseCursor>) {
    *cursor = PauseCursor::default();
    commands
        .spawn((PauseRoot, full_screen(0.63), GlobalZIndex(10)))
        .with_children(|overlay| {
            label(overlay, "Paused", 80.0, COLOR_TEXT, 100.0);
            for (i, choice) in PauseChoice::ALL.into_iter().enumerate() {
                overlay
                    .spawn((
                        PauseOption(choice),
                        Button,
                        Node {
                            width: Val::Px(240.0),
                            height: Val::Px(50.0),
                            margin: UiRect::top(Val::Px(if i == 0 { 30.0 } else { 20.0 })),
                            justify_content: JustifyContent::Center,
                            align_items: AlignItems::Center,
                            ..default()
                        },
                        BackgroundColor(COLOR_ROW),
                    ))
                    .with_children(|btn| {
                        btn.spawn((
                            Text::new(choice.label()),
                            TextFont { font_size: 36.0, ..default() },
                            TextColor(COLOR_TEXT_DIM),
                        ));
                    });
            }
            label(overlay, "↑↓ Select  ENTER Confirm  SPACE Continue", 24.0, COLOR_TEXT_DIM, 60.0);
        });
}

fn pause_input(
    keyboard: Res<ButtonInput<KeyCode>>,
    clicks: Query<(&Interaction, &PauseOption), Changed<Interaction>>,
    mut cursor: ResMut<PauseCursor>,
    mut next_state: ResMut<NextState<GamePhase>>,
) {
    if keyboard.just_pressed(KeyCode::ArrowUp) {
        cursor.0.up();
    }
    if keyboard.just_pressed(KeyCode::ArrowDown) {
        cursor.0.down();
    }

    let mut chosen = None;
    if keyboard.just_pressed(KeyCode::Enter) {
        chosen = Some(cursor.choice());
    }
    if keyboard.just_pressed(KeyCode::Space) {
        chosen = Some(PauseChoice::Continue);
    }
    for (interaction, option) in &clicks {
        if *interaction == Interaction::Pressed {
            chosen = Some(option.0);
        }
    }

    match chosen {
        Some(PauseChoice::Continue) => next_state.set(GamePhase::Battle),
        Some(PauseChoice::Settings) => next_state.set(GamePhase::Settings),
        Some(PauseChoice::Quit) => next_state.set(GamePhase::StageSelect),
        None => {}
    }
}

fn update_pause_rows(
    cursor: Res<PauseCursor>,
    mut rows: Query<(&PauseOption, &mut BackgroundColor, &Children)>,
    mut texts: Query<&mut TextColor>,
) {
    for (option, mut bg, children) in &mut rows {
        let selected = option.0 == cursor.choice();
        bg.0 = if selected { COLOR_ROW_SELECTED } else { COLOR_ROW };
        for child in children.iter() {
            if let Ok(mut color) = texts.get_mut(child) {
                color.0 = if selected { COLOR_HIGHLIGHT } else { COLOR_TEXT_DIM };
            }
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════
// SETTINGS
// ═══════════════════════════════════════════════════════════════════════

/// Volume bar bounds in window coordinates (origin top-left).
fn volume_bar_rect(tuning: &Tuning) -> Rect {
    let left = tuning.window_width * 0.5 - VOLUME_BAR_WIDTH * 0.5;
    Rect::new(
        left,
        VOLUME_BAR_TOP,
        left + VOLUME_BAR_WIDTH,
        VOLUME_BAR_TOP + VOLUME_BAR_HEIGHT,
    )
}

fn spawn_settings(mut commands: Commands, tuning: Res<Tuning>, volume: Res<MusicVolume>) {
    let bar = volume_bar_rect(&tuning);
    commands
        .spawn((SettingsRoot, full_screen(0.71), GlobalZIndex(10)))
        .with_children(|overlay| {
            label(overlay, "Settings", 80.0, COLOR_TEXT, 100.0);
            overlay.spawn((
                VolumeText,
                Text::new(format!("Music Volume: {}%", volume.percent())),
                TextFont { font_size: 36.0, ..default() },
                TextColor(COLOR_TEXT),
                Node { margin: UiRect::top(Val::Px(50.0)), ..default() },
            ));

            overlay
                .spawn((
                    Node {
                        position_type: PositionType::Absolute,
                        left: Val::Px(bar.min.x),
                        top: Val::Px(bar.min.y),
                        width: Val::Px(bar.width()),
                        height: Val::Px(bar.height()),
                        ..default()
                    },
                    BackgroundColor(COLOR_BAR_BACK),
                ))
                .with_children(|back| {
                    back.spawn((
                        VolumeFill,
                        Node {
                            width: Val::Px(bar.width() * volume.0),
                            height: Val::Percent(100.0),
                            ..default()
                        },
                        BackgroundColor(COLOR_BAR_FILL),
                    ));
                });

            overlay.spawn((
                Text::new("←/→ to change volume\nESC or ENTER to return to pause menu"),
                TextFont { font_size: 24.0, ..default() },
                TextColor(COLOR_TEXT_DIM),
                Node {
                    position_type: PositionType::Absolute,
                    top: Val::Px(400.0),
                    ..default()
                },
            ));

            overlay
                .spawn((
                    SettingsBack,
                    Button,
                    Node {
                        position_type: PositionType::Absolute,
                        top: Val::Px(480.0),
                        width: Val::Px(150.0),
                        height: Val::Px(50.0),
                        justify_content: JustifyContent::Center,
                        align_items: AlignItems::Center,
                        ..default()
                    },
                    BackgroundColor(COLOR_BTN),
                ))
                .with_children(|btn| {
                    btn.spawn((
                        Text::new("Back"),
                        TextFont { font_size: 36.0, ..default() },
                        TextColor(COLOR_TEXT),
                    ));
                });
        });
}

fn settings_input(
    keyboard: Res<ButtonInput<KeyCode>>,
    mouse: Res<ButtonInput<MouseButton>>,
    windows: Query<&Window, With<PrimaryWindow>>,
    back: Query<&Interaction, (Changed<Interaction>, With<SettingsBack>)>,
    tuning: Res<Tuning>,
    mut volume: ResMut<MusicVolume>,
    mut next_state: ResMut<NextState<GamePhase>>,
) {
    if keyboard.just_pressed(KeyCode::ArrowLeft) {
        volume.nudge(-tuning.volume_step);
    }
    if keyboard.just_pressed(KeyCode::ArrowRight) {
        volume.nudge(tuning.volume_step);
    }

    if mouse.just_pressed(MouseButton::Left) {
        let cursor = windows.single().ok().and_then(|w| w.cursor_position());
        if let Some(fraction) = cursor.and_then(|c| bar_fraction(c, volume_bar_rect(&tuning))) {
            volume.set(fraction);
        }
    }

    let back_clicked = back.iter().any(|i| *i == Interaction::Pressed);
    if back_clicked
        || keyboard.just_pressed(KeyCode::Escape)
        || keyboard.just_pressed(KeyCode::Enter)
    {
        next_state.set(GamePhase::Paused);
    }
}

fn update_volume_display(
    volume: Res<MusicVolume>,
    mut text: Query<&mut Text, With<VolumeText>>,
    mut fill: Query<&mut Node, With<VolumeFill>>,
) {
    if !volume.is_changed() {
        return;
    }
    for mut t in &mut text {
        **t = format!("Music Volume: {}%", volume.percent());
    }
    for mut node in &mut fill {
        node.width = Val::Px(VOLUME_BAR_WIDTH * volume.0);
    }
}

// ═══════════════════════════════════════════════════════════════════════
// ROUND OVER
// ═══════════════════════════════════════════════════════════════════════

fn spawn_round_over_overlay(mut commands: Commands, battle: Res<BattleState>) {
    let RoundStatus::Ended(result) = battle.status else {
        return;
    };
    commands
        .spawn((
            RoundOverOverlay,
            Node {
                width: Val::Percent(100.0),
                height: Val::Percent(100.0),
                flex_direction: FlexDirection::Column,
                justify_content: JustifyContent::Center,
                align_items: AlignItems::Center,
                row_gap: Val::Px(24.0),
                position_type: PositionType::Absolute,
                ..default()
            },
            GlobalZIndex(10),
        ))
        .with_children(|parent| {
            parent.spawn((
                Text::new(result.reason.banner()),
                TextFont { font_size: 80.0, ..default() },
                TextColor(COLOR_HIGHLIGHT),
            ));
            parent.spawn((
                Text::new(format!("Winner: {}", result.winner.label())),
                TextFont { font_size: 36.0, ..default() },
                TextColor(COLOR_TEXT),
            ));
        });
}
