//! Gameplay domain plugins: action arbitration, movement, combat, and pointer control.

pub mod action;
pub mod animation;
pub mod combat;
pub mod control;
pub mod movement;
pub mod stats;

use bevy::prelude::*;

use crate::GameSet;

// === Components ===

/// Marker for the controllable agent.
#[derive(Component, Debug, Clone, Copy, Reflect)]
#[reflect(Component)]
pub struct Player;

/// Hit points of any damageable entity.
///
/// Death is latched: once `has_died` reports true, further damage is ignored.
#[derive(Component, Debug, Clone, Reflect)]
#[reflect(Component)]
pub struct Health {
    pub current: f32,
    pub max: f32,
    dead: bool,
}

impl Health {
    #[must_use]
    pub const fn new(max: f32) -> Self {
        Self {
            current: max,
            max,
            dead: false,
        }
    }

    #[must_use]
    pub const fn has_died(&self) -> bool {
        self.dead
    }

    /// Applies `amount` damage from `instigator`. Returns `true` on the killing blow.
    pub fn take_damage(&mut self, instigator: Entity, amount: f32) -> bool {
        if self.dead {
            return false;
        }
        self.current = (self.current - amount).max(0.0);
        debug!(?instigator, amount, remaining = self.current, "damage applied");
        if self.current <= 0.0 {
            self.dead = true;
            return true;
        }
        false
    }
}

// === Plugin ===

/// Gameplay plugin without physics or navmesh backends.
///
/// Usable under `MinimalPlugins`: the pointer probe lives in the physics
/// backend, so tests feed [`control::PointerHits`] directly.
pub fn plugin(app: &mut App) {
    app.register_type::<Player>().register_type::<Health>();

    app.configure_sets(
        Update,
        (
            GameSet::Input,
            GameSet::Death,
            GameSet::Combat,
            GameSet::Movement,
            GameSet::Presentation,
        )
            .chain(),
    );

    app.add_plugins((
        action::plugin,
        animation::plugin,
        combat::plugin,
        control::plugin,
        movement::plugin,
        stats::plugin,
    ));
}
