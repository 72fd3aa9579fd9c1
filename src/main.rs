mod assets_map;
mod config;
mod game;
mod plugins;

use bevy::prelude::*;

use config::tuning::Tuning;
use plugins::{
    game_plugin::GamePlugin, menu_plugin::MenuPlugin, music_plugin::MusicPlugin,
    ui_plugin::UiPlugin,
};

fn main() {
    let tuning = Tuning::load_or_default();

    App::new()
        .add_plugins(DefaultPlugins.set(WindowPlugin {
            primary_window: Some(Window {
                title: "Kakutou Fighter".into(),
                resolution: (tuning.window_width as u32, tuning.window_height as u32).into(),
                resizable: false,
                ..default()
            }),
            ..default()
        }))
        .insert_resource(Time::<Fixed>::from_seconds(tuning.dt as f64))
        .insert_resource(tuning)
        .add_plugins(GamePlugin)
        .add_plugins(MenuPlugin)
        .add_plugins(UiPlugin)
        .add_plugins(MusicPlugin)
        .run();
}
