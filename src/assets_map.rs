use bevy::asset::UntypedAssetId;
use bevy::prelude::*;

use crate::game::stage::{STAGES, StageId};

/// Handles for every image and track the game uses.
///
/// Any of these may fail to load; the game keeps running with flat colors and
/// no music.
#[derive(Resource)]
pub struct GameAssets {
    pub title_bg: Handle<Image>,
    pub stage_bgs: Vec<Handle<Image>>,
    pub menu_bgm: Handle<AudioSource>,
    pub battle_bgm: Handle<AudioSource>,
}

impl GameAssets {
    pub fn load(asset_server: &AssetServer) -> Self {
        Self {
            title_bg: asset_server.load("title.jpg"),
            stage_bgs: STAGES.iter().map(|s| asset_server.load(s.background)).collect(),
            menu_bgm: asset_server.load("sound/bgm/menu.ogg"),
            battle_bgm: asset_server.load("sound/bgm/battle.ogg"),
        }
    }

    pub fn stage_bg(&self, stage: StageId) -> Handle<Image> {
        self.stage_bgs
            .get(stage.0)
            .cloned()
            .unwrap_or_default()
    }

    /// Every handle with a label, for load-failure reporting.
    pub fn labelled(&self) -> Vec<(String, UntypedAssetId)> {
        let mut out = vec![
            ("title background".to_string(), self.title_bg.id().untyped()),
            ("menu music".to_string(), self.menu_bgm.id().untyped()),
            ("battle music".to_string(), self.battle_bgm.id().untyped()),
        ];
        for (stage, handle) in STAGES.iter().zip(&self.stage_bgs) {
            out.push((format!("{} background", stage.name), handle.id().untyped()));
        }
        out
    }
}
