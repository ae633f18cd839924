//! Death handling: a dying agent gives up whatever it was doing.

use bevy::prelude::*;

use crate::GameSet;
use crate::gameplay::Health;
use crate::gameplay::action::{ActionScheduler, AgentActions};
use crate::gameplay::combat::Fighter;
use crate::gameplay::movement::Mover;

/// `SystemSet` for death handling. Other systems can order against this
/// (e.g., `.before(DeathCheck)`) instead of referencing the function directly.
#[derive(SystemSet, Debug, Clone, PartialEq, Eq, Hash)]
pub struct DeathCheck;

/// Cancels the current action of agents whose health reports death.
/// The scheduler is left without an owner, so this fires once per death.
fn cancel_actions_on_death(
    mut agents: Query<
        (Entity, &Health, &mut ActionScheduler, &mut Mover, &mut Fighter),
        Changed<Health>,
    >,
) {
    for (entity, health, mut scheduler, mut mover, mut fighter) in &mut agents {
        if !health.has_died() || scheduler.current().is_none() {
            continue;
        }
        info!(agent = ?entity, action = ?scheduler.current(), "agent died, cancelling action");
        AgentActions {
            scheduler: &mut scheduler,
            mover: &mut mover,
            fighter: &mut fighter,
        }
        .cancel_current_action();
    }
}

pub(super) fn plugin(app: &mut App) {
    app.add_systems(
        Update,
        cancel_actions_on_death
            .in_set(DeathCheck)
            .in_set(GameSet::Death),
    );
}
