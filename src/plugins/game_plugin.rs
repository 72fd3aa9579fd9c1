use bevy::prelude::*;

use crate::assets_map::GameAssets;
use crate::config::tuning::Tuning;
use crate::game::{
    battle::BattleState,
    body::Body,
    components::*,
    events::BattleEvent,
    input::{self, AttackIntent},
    outcome::RoundStatus,
};

// ── SystemSets (strict FixedUpdate ordering, battle-phase only) ─────

#[derive(SystemSet, Debug, Clone, PartialEq, Eq, Hash)]
pub enum FixedBattleSet {
    SimulateSet,
    OutcomeSet,
}

/// Shows the K.O. / Time Up banner before returning to stage select.
#[derive(Resource)]
pub struct RoundOverTimer(pub Timer);

pub struct GamePlugin;

impl Plugin for GamePlugin {
    fn build(&self, app: &mut App) {
        add_battle_flow(app);

        // ── Startup ─────────────────────────────────────────────────────
        app.add_systems(Startup, setup_game);

        // ── Battle scene ────────────────────────────────────────────────
        app.add_systems(
            Update,
            (sync_fighter_sprites, sync_attack_sprites).run_if(
                in_state(GamePhase::Battle)
                    .or(in_state(GamePhase::Paused))
                    .or(in_state(GamePhase::Settings))
                    .or(in_state(GamePhase::RoundOver)),
            ),
        );
        app.add_systems(OnEnter(GamePhase::Battle), spawn_battle_scene);
        app.add_systems(OnEnter(GamePhase::StageSelect), despawn_battle_scene);

        // ── Always-on ───────────────────────────────────────────────────
        app.add_systems(Update, tuning_reload_input);
    }
}

/// Phase routing around the simulation: fixed tick, pause freeze and the
/// round-over hand-off back to stage select. Needs no window or assets.
fn add_battle_flow(app: &mut App) {
    app.add_message::<BattleEvent>();
    app.init_state::<GamePhase>();
    app.init_resource::<AttackIntent>();

    app.configure_sets(
        FixedUpdate,
        (
            FixedBattleSet::SimulateSet.run_if(in_state(GamePhase::Battle)),
            FixedBattleSet::OutcomeSet.run_if(in_state(GamePhase::Battle)),
        )
            .chain(),
    );
    app.add_systems(
        FixedUpdate,
        simulate_battle.in_set(FixedBattleSet::SimulateSet),
    );
    app.add_systems(
        FixedUpdate,
        enter_round_over.in_set(FixedBattleSet::OutcomeSet),
    );

    app.add_systems(
        Update,
        (input::latch_attack_input, log_battle_events).run_if(in_state(GamePhase::Battle)),
    );
    app.add_systems(
        Update,
        pause_input.run_if(in_state(GamePhase::Battle).and(round_in_progress)),
    );

    app.add_systems(OnEnter(GamePhase::Battle), resume_battle);
    app.add_systems(OnEnter(GamePhase::Paused), freeze_battle);

    app.add_systems(OnEnter(GamePhase::RoundOver), start_round_over_timer);
    app.add_systems(
        Update,
        finish_round_over.run_if(in_state(GamePhase::RoundOver)),
    );
}

/// Pausing is only offered while the round is still being fought.
pub fn round_in_progress(battle: Res<BattleState>) -> bool {
    battle.status == RoundStatus::InProgress
}

// ── Startup ─────────────────────────────────────────────────────────

fn setup_game(mut commands: Commands, tuning: Res<Tuning>, asset_server: Res<AssetServer>) {
    commands.spawn(Camera2d);
    commands.insert_resource(GameAssets::load(&asset_server));
    commands.insert_resource(BattleState::new(&tuning));
}

// ── Coordinate mapping ──────────────────────────────────────────────

/// Screen pixels (origin top-left, y down) to world space (origin center, y up).
pub fn body_to_world(body: &Body, tuning: &Tuning, z: f32) -> Vec3 {
    let c = body.center();
    Vec3::new(
        c.x - tuning.window_width * 0.5,
        tuning.window_height * 0.5 - c.y,
        z,
    )
}

// ── Fixed tick ──────────────────────────────────────────────────────

/// One simulation tick. Physics counts ticks; the clock counts fixed seconds.
fn simulate_battle(
    time: Res<Time>,
    tuning: Res<Tuning>,
    keyboard: Res<ButtonInput<KeyCode>>,
    mut intent: ResMut<AttackIntent>,
    mut battle: ResMut<BattleState>,
    mut events: MessageWriter<BattleEvent>,
) {
    let triggers = intent.take();
    let produced = battle.step(&*keyboard, triggers, time.delta_secs(), &tuning);
    events.write_batch(produced);
}

fn enter_round_over(battle: Res<BattleState>, mut next_state: ResMut<NextState<GamePhase>>) {
    if matches!(battle.status, RoundStatus::Ended(_)) {
        next_state.set(GamePhase::RoundOver);
    }
}

// ── Battle phase systems ────────────────────────────────────────────

fn pause_input(
    keyboard: Res<ButtonInput<KeyCode>>,
    mut next_state: ResMut<NextState<GamePhase>>,
) {
    if keyboard.just_pressed(KeyCode::Escape) {
        next_state.set(GamePhase::Paused);
    }
}

fn freeze_battle(mut battle: ResMut<BattleState>) {
    battle.freeze();
}

fn resume_battle(mut battle: ResMut<BattleState>, mut intent: ResMut<AttackIntent>) {
    battle.unfreeze();
    // Presses made on a menu screen must not fire on the first tick back.
    intent.take();
}

fn log_battle_events(mut events: MessageReader<BattleEvent>) {
    for event in events.read() {
        if let BattleEvent::AttackLaunched { owner } = event {
            debug!("{} attacks", owner.label());
        }
    }
}

fn spawn_battle_scene(
    mut commands: Commands,
    tuning: Res<Tuning>,
    battle: Res<BattleState>,
    assets: Res<GameAssets>,
    existing: Query<(), With<FighterSprite>>,
) {
    // Coming back from the pause menu: the scene is still there.
    if !existing.is_empty() {
        return;
    }

    let screen = Vec2::new(tuning.window_width, tuning.window_height);
    let stage = battle.stage.spec();
    commands.spawn((
        InBattle,
        Sprite::from_color(stage.fallback, screen),
        Transform::from_translation(Vec3::new(0.0, 0.0, -2.0)),
    ));
    commands.spawn((
        InBattle,
        Sprite {
            image: assets.stage_bg(battle.stage),
            custom_size: Some(screen),
            ..default()
        },
        Transform::from_translation(Vec3::new(0.0, 0.0, -1.0)),
    ));

    for fighter in &battle.fighters {
        commands.spawn((
            InBattle,
            FighterSprite(fighter.slot),
            Sprite::from_color(fighter.color, fighter.body.size),
            Transform::from_translation(body_to_world(&fighter.body, &tuning, 1.0)),
        ));
    }
}

fn despawn_battle_scene(mut commands: Commands, query: Query<Entity, With<InBattle>>) {
    for entity in &query {
        commands.entity(entity).despawn();
    }
}

// ── Render sync ─────────────────────────────────────────────────────

fn sync_fighter_sprites(
    tuning: Res<Tuning>,
    battle: Res<BattleState>,
    mut query: Query<(&FighterSprite, &mut Transform)>,
) {
    for (marker, mut transform) in &mut query {
        let fighter = battle.fighter(marker.0);
        transform.translation = body_to_world(&fighter.body, &tuning, 1.0);
    }
}

/// Keep one sprite per live attack, reusing sprites by index.
fn sync_attack_sprites(
    mut commands: Commands,
    tuning: Res<Tuning>,
    battle: Res<BattleState>,
    mut query: Query<(Entity, &AttackSprite, &mut Transform)>,
) {
    let mut seen = 0;
    for (entity, marker, mut transform) in &mut query {
        match battle.attacks.get(marker.0) {
            Some(atk) => {
                transform.translation = body_to_world(&atk.body, &tuning, 2.0);
                seen = seen.max(marker.0 + 1);
            }
            None => commands.entity(entity).despawn(),
        }
    }
    for (index, atk) in battle.attacks.iter().enumerate().skip(seen) {
        commands.spawn((
            InBattle,
            AttackSprite(index),
            Sprite::from_color(Color::srgb(1.0, 0.0, 0.0), atk.body.size),
            Transform::from_translation(body_to_world(&atk.body, &tuning, 2.0)),
        ));
    }
}

// ── Round over ──────────────────────────────────────────────────────

fn start_round_over_timer(mut commands: Commands, tuning: Res<Tuning>) {
    commands.insert_resource(RoundOverTimer(Timer::from_seconds(
        tuning.result_display_secs,
        TimerMode::Once,
    )));
}

/// After the banner: full hp, no attacks, fresh clock, back to stage select.
fn finish_round_over(
    time: Res<Time>,
    tuning: Res<Tuning>,
    mut timer: ResMut<RoundOverTimer>,
    mut battle: ResMut<BattleState>,
    mut next_state: ResMut<NextState<GamePhase>>,
) {
    if timer.0.tick(time.delta()).is_finished() {
        battle.finish_round(&tuning);
        next_state.set(GamePhase::StageSelect);
    }
}

// ── Always-on ───────────────────────────────────────────────────────

/// Reload tuning with F5.
fn tuning_reload_input(
    keyboard: Res<ButtonInput<KeyCode>>,
    mut tuning: ResMut<Tuning>,
    mut fixed: ResMut<Time<Fixed>>,
) {
    if keyboard.just_pressed(KeyCode::F5) {
        tuning.reload();
        fixed.set_timestep_seconds(tuning.dt as f64);
    }
}
