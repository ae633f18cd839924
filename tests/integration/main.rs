//! Drives the public gameplay plugin the way a frame loop would.

mod player_control;

use std::time::Duration;

use bevy::prelude::*;
use bevy::time::TimeUpdateStrategy;
use rpg_control::gameplay::action::{ActionScheduler, AgentActions};
use rpg_control::gameplay::animation::CombatAnimator;
use rpg_control::gameplay::combat::Fighter;
use rpg_control::gameplay::combat::target::CombatTarget;
use rpg_control::gameplay::control::PlayerController;
use rpg_control::gameplay::movement::Mover;
use rpg_control::gameplay::stats::BaseStats;
use rpg_control::gameplay::{Health, Player};

/// Builds an app with the gameplay plugin and a clock that advances 100ms per update.
pub fn create_game_app() -> App {
    let mut app = App::new();
    app.add_plugins(MinimalPlugins);
    app.insert_resource(TimeUpdateStrategy::ManualDuration(Duration::from_millis(100)));
    app.add_plugins(rpg_control::gameplay::plugin);
    // First update reports a zero delta.
    app.update();
    app
}

pub fn spawn_player(app: &mut App, position: Vec3) -> Entity {
    let transform = Transform::from_translation(position);
    app.world_mut()
        .spawn((
            Name::new("Player"),
            Player,
            PlayerController::default(),
            transform,
            GlobalTransform::from(transform),
            Health::new(100.0),
            BaseStats {
                health: 100.0,
                damage: 10.0,
            },
            ActionScheduler::default(),
            Mover::default(),
            Fighter::default(),
            CombatAnimator::default(),
        ))
        .id()
}

pub fn spawn_dummy(app: &mut App, position: Vec3) -> Entity {
    let transform = Transform::from_translation(position);
    app.world_mut()
        .spawn((
            Name::new("Dummy"),
            transform,
            GlobalTransform::from(transform),
            Health::new(50.0),
            CombatTarget::default(),
        ))
        .id()
}

/// Runs `f` with the action entry points of `agent`.
pub fn with_actions(app: &mut App, agent: Entity, f: impl FnOnce(&mut AgentActions)) {
    let world = app.world_mut();
    let mut query = world.query::<(&mut ActionScheduler, &mut Mover, &mut Fighter)>();
    let (mut scheduler, mut mover, mut fighter) = query.get_mut(world, agent).unwrap();
    f(&mut AgentActions {
        scheduler: &mut scheduler,
        mover: &mut mover,
        fighter: &mut fighter,
    });
}

pub fn position(app: &App, entity: Entity) -> Vec3 {
    app.world().get::<Transform>(entity).unwrap().translation
}
