use bevy::asset::{LoadState, UntypedAssetId};
use bevy::audio::Volume;
use bevy::prelude::*;

use crate::assets_map::GameAssets;
use crate::config::tuning::Tuning;
use crate::game::{components::GamePhase, menu::MusicVolume};

#[derive(Component, Debug, Clone, Copy, PartialEq, Eq)]
enum BgmTrack {
    Menu,
    Battle,
}

impl BgmTrack {
    fn for_phase(phase: GamePhase) -> Self {
        match phase {
            GamePhase::Title | GamePhase::StageSelect => Self::Menu,
            GamePhase::Battle | GamePhase::Paused | GamePhase::Settings | GamePhase::RoundOver => {
                Self::Battle
            }
        }
    }
}

pub struct MusicPlugin;

impl Plugin for MusicPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Startup, init_volume);
        app.add_systems(
            Update,
            (
                switch_bgm.run_if(state_changed::<GamePhase>),
                apply_volume.run_if(resource_changed::<MusicVolume>),
                report_failed_assets,
            ),
        );
    }
}

fn init_volume(mut commands: Commands, tuning: Res<Tuning>) {
    commands.insert_resource(MusicVolume(tuning.default_volume));
}

/// Keep exactly one looping track for the current phase.
fn switch_bgm(
    mut commands: Commands,
    phase: Res<State<GamePhase>>,
    assets: Res<GameAssets>,
    volume: Res<MusicVolume>,
    playing: Query<(Entity, &BgmTrack)>,
) {
    let wanted = BgmTrack::for_phase(*phase.get());
    let mut already = false;
    for (entity, track) in &playing {
        if *track == wanted {
            already = true;
        } else {
            commands.entity(entity).despawn();
        }
    }
    if already {
        return;
    }

    let source = match wanted {
        BgmTrack::Menu => assets.menu_bgm.clone(),
        BgmTrack::Battle => assets.battle_bgm.clone(),
    };
    debug!("bgm: {:?}", wanted);
    commands.spawn((
        wanted,
        AudioPlayer::new(source),
        PlaybackSettings::LOOP.with_volume(Volume::Linear(volume.0)),
    ));
}

fn apply_volume(volume: Res<MusicVolume>, mut sinks: Query<&mut AudioSink, With<BgmTrack>>) {
    for mut sink in &mut sinks {
        sink.set_volume(Volume::Linear(volume.0));
    }
}

/// Warn once per asset that failed to load. Missing files are not fatal.
/// The watch list is built on first run and shrinks as handles settle.
fn report_failed_assets(
    asset_server: Res<AssetServer>,
    assets: Res<GameAssets>,
    mut pending: Local<Option<Vec<(String, UntypedAssetId)>>>,
) {
    let pending = pending.get_or_insert_with(|| assets.labelled());
    pending.retain(|(label, id)| still_loading(label, asset_server.get_load_state(*id)));
}

/// False once `state` is settled; failures are logged on the way out.
fn still_loading(label: &str, state: Option<LoadState>) -> bool {
    match state {
        Some(LoadState::Loaded) => false,
        Some(LoadState::Failed(err)) => {
            warn!("{label} failed to load ({err}); continuing without it");
            false
        }
        _ => true,
    }
}
