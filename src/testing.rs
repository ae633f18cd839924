//! Testing utilities for Bevy systems.

#![cfg(test)]

use std::time::Duration;

use bevy::ecs::query::QueryFilter;
use bevy::prelude::*;
use bevy::time::TimeUpdateStrategy;

use crate::gameplay::action::{ActionScheduler, AgentActions};
use crate::gameplay::animation::CombatAnimator;
use crate::gameplay::combat::Fighter;
use crate::gameplay::combat::target::CombatTarget;
use crate::gameplay::control::PlayerController;
use crate::gameplay::movement::Mover;
use crate::gameplay::stats::BaseStats;
use crate::gameplay::{Health, Player};

/// Simulated duration of every frame in test apps.
pub const FRAME: Duration = Duration::from_millis(100);

/// Creates a minimal app whose clock advances by [`FRAME`] per update.
/// The first update still reports a zero delta.
pub fn create_test_app() -> App {
    let mut app = App::new();
    app.add_plugins(MinimalPlugins);
    app.insert_resource(TimeUpdateStrategy::ManualDuration(FRAME));
    app
}

/// Helper to advance the app by multiple frames.
pub fn advance(app: &mut App, frames: usize) {
    for _ in 0..frames {
        app.update();
    }
}

/// Asserts how many entities match the query filter `F`.
pub fn assert_entity_count<F: QueryFilter>(app: &mut App, expected: usize) {
    let mut query = app.world_mut().query_filtered::<Entity, F>();
    let actual = query.iter(app.world()).count();
    assert_eq!(actual, expected, "unexpected entity count");
}

/// Spawns an agent with every behavior component, standing at `position`.
/// Health 100, base damage 10, unarmed.
pub fn spawn_test_agent(world: &mut World, position: Vec3) -> Entity {
    let transform = Transform::from_translation(position);
    world
        .spawn((
            Name::new("Test Agent"),
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

/// Spawns a controllable agent (see [`spawn_test_agent`]).
pub fn spawn_test_player(world: &mut World, position: Vec3) -> Entity {
    let agent = spawn_test_agent(world, position);
    world
        .entity_mut(agent)
        .insert((Player, PlayerController::default()));
    agent
}

/// Spawns an attackable entity with `hp` health at `position`.
pub fn spawn_test_target(world: &mut World, position: Vec3, hp: f32) -> Entity {
    let transform = Transform::from_translation(position);
    world
        .spawn((
            Name::new("Test Target"),
            transform,
            GlobalTransform::from(transform),
            Health::new(hp),
            CombatTarget::default(),
        ))
        .id()
}

/// Runs `f` with the action entry points of `agent`.
pub fn with_agent_actions<R>(
    world: &mut World,
    agent: Entity,
    f: impl FnOnce(&mut AgentActions) -> R,
) -> R {
    let mut query = world.query::<(&mut ActionScheduler, &mut Mover, &mut Fighter)>();
    let (mut scheduler, mut mover, mut fighter) = query
        .get_mut(world, agent)
        .expect("agent should have scheduler, mover and fighter");
    f(&mut AgentActions {
        scheduler: &mut scheduler,
        mover: &mut mover,
        fighter: &mut fighter,
    })
}
