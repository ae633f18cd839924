//! Development tools, only included with `cargo run --features dev`.
//!
//! Debug spawners and shortcuts go here.
//! This module is stripped from release builds.

use bevy::prelude::*;
use rand::Rng;

use crate::arena::{ARENA_HALF_EXTENT, ArenaAssets, dummy_bundle};
use crate::gameplay::movement::navigation::NavSurface;
use crate::gameplay::{Health, Player};

/// Distance kept from the arena edge when placing debug dummies.
const SPAWN_MARGIN: f32 = 2.0;

/// Attempts at finding a walkable spot before giving up.
const SPAWN_ATTEMPTS: usize = 8;

/// E: drops a training dummy on a random walkable spot.
/// Does nothing until the arena has loaded its assets.
fn debug_spawn_dummy(
    keyboard: Res<ButtonInput<KeyCode>>,
    surface: Res<NavSurface>,
    assets: Option<Res<ArenaAssets>>,
    mut commands: Commands,
) {
    if !keyboard.just_pressed(KeyCode::KeyE) {
        return;
    }
    let Some(assets) = assets else {
        warn!("arena assets missing, cannot spawn a debug dummy");
        return;
    };

    let mut rng = rand::rng();
    let reach = ARENA_HALF_EXTENT - SPAWN_MARGIN;
    let spot = (0..SPAWN_ATTEMPTS).find_map(|_| {
        let candidate = Vec3::new(
            rng.random_range(-reach..reach),
            0.0,
            rng.random_range(-reach..reach),
        );
        surface.surface().project(candidate, 0.5)
    });
    let Some(position) = spot else {
        warn!("no walkable spot found for a debug dummy");
        return;
    };
    debug!(?position, "spawning debug dummy");
    commands.spawn(dummy_bundle(&assets, position));
}

/// K: kills the player outright.
fn debug_kill_player(
    keyboard: Res<ButtonInput<KeyCode>>,
    player: Single<(Entity, &mut Health), With<Player>>,
) {
    if !keyboard.just_pressed(KeyCode::KeyK) {
        return;
    }
    let (entity, mut health) = player.into_inner();
    let lethal = health.current;
    health.take_damage(entity, lethal);
    info!("debug: player killed");
}

pub(crate) fn plugin(app: &mut App) {
    app.add_systems(
        Update,
        (debug_spawn_dummy, debug_kill_player).in_set(crate::GameSet::Input),
    );
}
