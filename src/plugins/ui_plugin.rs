use bevy::prelude::*;

use crate::config::tuning::Tuning;
use crate::plugins::game_plugin::round_in_progress;
use crate::game::{
    battle::BattleState,
    components::*,
    input::Bindings,
};

pub struct UiPlugin;

impl Plugin for UiPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(OnEnter(GamePhase::Battle), setup_hud);
        app.add_systems(
            Update,
            (update_score_display, update_timer_display, update_hp_display)
                .run_if(in_state(GamePhase::Battle).or(in_state(GamePhase::RoundOver))),
        );
        app.add_systems(
            Update,
            pause_button_system.run_if(in_state(GamePhase::Battle).and(round_in_progress)),
        );
    }
}

#[derive(Component)]
struct WinsText(PlayerSlot);

#[derive(Component)]
struct HpText(PlayerSlot);

#[derive(Component)]
struct TimerText;

#[derive(Component)]
struct PauseButton;

const COLOR_HUD_TEXT: Color = Color::WHITE;
const COLOR_TIMER_BLINK: Color = Color::srgb(1.0, 0.0, 0.0);
const COLOR_PAUSE_BTN: Color = Color::srgb(0.7, 0.7, 0.7);
const COLOR_LEGEND_BAR: Color = Color::srgb(0.16, 0.16, 0.16);
const COLOR_LEGEND_TEXT: Color = Color::srgb(0.86, 0.86, 0.86);
const TIMER_FONT: f32 = 32.0;
const TIMER_FONT_CRITICAL: f32 = 38.0;

fn setup_hud(
    mut commands: Commands,
    tuning: Res<Tuning>,
    battle: Res<BattleState>,
    existing: Query<(), With<TimerText>>,
) {
    if !existing.is_empty() {
        return;
    }

    // Wins + hp, one column per player.
    for slot in PlayerSlot::ALL {
        let mut node = Node {
            position_type: PositionType::Absolute,
            top: Val::Px(10.0),
            flex_direction: FlexDirection::Column,
            row_gap: Val::Px(4.0),
            ..default()
        };
        match slot {
            PlayerSlot::P1 => {
                node.left = Val::Px(10.0);
                node.align_items = AlignItems::FlexStart;
            }
            PlayerSlot::P2 => {
                node.right = Val::Px(10.0);
                node.align_items = AlignItems::FlexEnd;
            }
        }
        commands.spawn((InBattle, node)).with_children(|col| {
            col.spawn((
                WinsText(slot),
                Text::new(format!("{} Wins: {}", slot.label(), battle.score.wins(slot))),
                TextFont { font_size: 32.0, ..default() },
                TextColor(COLOR_HUD_TEXT),
            ));
            col.spawn((
                HpText(slot),
                Text::new(format!("HP {}", battle.fighter(slot).hp)),
                TextFont { font_size: 24.0, ..default() },
                TextColor(battle.fighter(slot).color),
            ));
        });
    }

    // Timer, centered.
    commands
        .spawn((
            InBattle,
            Node {
                position_type: PositionType::Absolute,
                top: Val::Px(10.0),
                width: Val::Percent(100.0),
                justify_content: JustifyContent::Center,
                ..default()
            },
        ))
        .with_children(|row| {
            row.spawn((
                TimerText,
                Text::new(format!("Time: {}", battle.clock.display_seconds())),
                TextFont { font_size: TIMER_FONT, ..default() },
                TextColor(COLOR_HUD_TEXT),
            ));
        });

    // Pause button, top right under the score.
    commands
        .spawn((
            InBattle,
            PauseButton,
            Button,
            Node {
                position_type: PositionType::Absolute,
                right: Val::Px(10.0),
                top: Val::Px(70.0),
                width: Val::Px(100.0),
                height: Val::Px(40.0),
                justify_content: JustifyContent::Center,
                align_items: AlignItems::Center,
                ..default()
            },
            BackgroundColor(COLOR_PAUSE_BTN),
        ))
        .with_children(|btn| {
            btn.spawn((
                Text::new("PAUSE"),
                TextFont { font_size: 20.0, ..default() },
                TextColor(Color::BLACK),
            ));
        });

    // Control legend along the bottom edge.
    commands
        .spawn((
            InBattle,
            Node {
                position_type: PositionType::Absolute,
                bottom: Val::Px(0.0),
                width: Val::Px(tuning.window_width),
                height: Val::Px(40.0),
                justify_content: JustifyContent::SpaceBetween,
                align_items: AlignItems::Center,
                padding: UiRect::horizontal(Val::Px(10.0)),
                ..default()
            },
            BackgroundColor(COLOR_LEGEND_BAR),
        ))
        .with_children(|bar| {
            for slot in PlayerSlot::ALL {
                bar.spawn((
                    Text::new(Bindings::legend(slot)),
                    TextFont { font_size: 18.0, ..default() },
                    TextColor(COLOR_LEGEND_TEXT),
                ));
            }
        });
}

fn update_score_display(
    battle: Res<BattleState>,
    mut query: Query<(&WinsText, &mut Text)>,
) {
    if !battle.is_changed() {
        return;
    }
    for (marker, mut text) in &mut query {
        **text = format!("{} Wins: {}", marker.0.label(), battle.score.wins(marker.0));
    }
}

/// Whole seconds; larger once time is short, red on even low seconds.
fn update_timer_display(
    battle: Res<BattleState>,
    mut query: Query<(&mut Text, &mut TextColor, &mut TextFont), With<TimerText>>,
) {
    for (mut text, mut color, mut font) in &mut query {
        **text = format!("Time: {}", battle.clock.display_seconds());
        font.font_size = if battle.clock.is_critical() {
            TIMER_FONT_CRITICAL
        } else {
            TIMER_FONT
        };
        color.0 = if battle.clock.blink_on() {
            COLOR_TIMER_BLINK
        } else {
            COLOR_HUD_TEXT
        };
    }
}

fn update_hp_display(battle: Res<BattleState>, mut query: Query<(&HpText, &mut Text)>) {
    if !battle.is_changed() {
        return;
    }
    for (marker, mut text) in &mut query {
        **text = format!("HP {}", battle.fighter(marker.0).hp.max(0));
    }
}

fn pause_button_system(
    query: Query<&Interaction, (Changed<Interaction>, With<PauseButton>)>,
    mut next_state: ResMut<NextState<GamePhase>>,
) {
    for interaction in &query {
        if *interaction == Interaction::Pressed {
            next_state.set(GamePhase::Paused);
        }
    }
}
