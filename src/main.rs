//! Action RPG control demo entry point.

use bevy::log::LogPlugin;
use bevy::prelude::*;
use rpg_control::persistence::{QUICK_SAVE_PATH, SaveSettings};

fn main() {
    App::new()
        .add_plugins(
            DefaultPlugins
                .set(WindowPlugin {
                    primary_window: Some(Window {
                        title: "RPG Control".to_string(),
                        resolution: (1600, 900).into(),
                        resizable: true,
                        ..default()
                    }),
                    ..default()
                })
                .set(LogPlugin {
                    filter: "info,wgpu=error,naga=warn,rpg_control=debug".to_string(),
                    ..default()
                }),
        )
        .insert_resource(SaveSettings::with_path(QUICK_SAVE_PATH))
        .add_plugins((
            rpg_control::config::plugin,
            rpg_control::plugin,
            rpg_control::arena::plugin,
        ))
        .run();
}
