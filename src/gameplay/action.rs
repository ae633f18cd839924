//! Action arbitration: at most one behavior owns the agent's intent at a time.
//!
//! Ownership decides which behavior chooses the agent's goal. It does not
//! restrict who may drive an already-owned executor: the fighter steers the
//! mover during pursuit without taking ownership from itself.

use bevy::prelude::*;

use super::combat::Fighter;
use super::movement::Mover;

// === Capability ===

/// A behavior that can exclusively own the agent and be cancelled.
pub trait Action {
    /// Stops the behavior immediately. Must be idempotent.
    fn cancel(&mut self);
}

/// Identifies which behavior owns the agent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Reflect)]
pub enum ActionKind {
    Movement,
    Combat,
}

/// Cancels the behavior instance that implements an [`ActionKind`].
pub trait ActionResolver {
    fn cancel_action(&mut self, kind: ActionKind);
}

// === Components ===

/// Holds the behavior currently owning the agent.
#[derive(Component, Debug, Default, Clone, Copy, PartialEq, Eq, Reflect)]
#[reflect(Component)]
pub struct ActionScheduler {
    current: Option<ActionKind>,
}

impl ActionScheduler {
    #[must_use]
    pub const fn current(&self) -> Option<ActionKind> {
        self.current
    }

    /// Makes `action` the owner. A different previous owner is cancelled first;
    /// re-acquiring the current owner is a no-op.
    pub fn start_action<R: ActionResolver + ?Sized>(&mut self, action: ActionKind, behaviors: &mut R) {
        if self.current == Some(action) {
            return;
        }
        if let Some(previous) = self.current {
            trace!(?previous, next = ?action, "cancelling previous action");
            behaviors.cancel_action(previous);
        }
        self.current = Some(action);
    }

    /// Cancels the owner, if any, and leaves the agent without one.
    pub fn cancel_current_action<R: ActionResolver + ?Sized>(&mut self, behaviors: &mut R) {
        if let Some(previous) = self.current.take() {
            behaviors.cancel_action(previous);
        }
    }
}

/// The agent's own behaviors, borrowed for cancellation.
pub struct AgentBehaviors<'a> {
    pub mover: &'a mut Mover,
    pub fighter: &'a mut Fighter,
}

impl ActionResolver for AgentBehaviors<'_> {
    fn cancel_action(&mut self, kind: ActionKind) {
        match kind {
            ActionKind::Movement => Action::cancel(&mut *self.mover),
            ActionKind::Combat => {
                Action::cancel(&mut *self.fighter);
                // Disengaging also halts any pursuit the fighter started.
                Action::cancel(&mut *self.mover);
            }
        }
    }
}

/// Scheduler plus the behaviors it arbitrates, borrowed from one agent.
///
/// Entry points that acquire ownership live here so the cancel-then-acquire
/// sequence happens inside a single call.
pub struct AgentActions<'a> {
    pub scheduler: &'a mut ActionScheduler,
    pub mover: &'a mut Mover,
    pub fighter: &'a mut Fighter,
}

impl AgentActions<'_> {
    fn acquire(&mut self, kind: ActionKind) {
        self.scheduler.start_action(
            kind,
            &mut AgentBehaviors {
                mover: &mut *self.mover,
                fighter: &mut *self.fighter,
            },
        );
    }

    /// Takes ownership for movement, then heads for `destination`.
    ///
    /// Callers validate reachability with [`Mover::can_move_to`] first.
    pub fn start_move_action(&mut self, destination: Vec3, speed_fraction: f32) {
        self.acquire(ActionKind::Movement);
        self.mover.move_to(destination, speed_fraction);
    }

    /// Takes ownership for combat, then engages `target`.
    pub fn attack(&mut self, target: Entity) {
        self.acquire(ActionKind::Combat);
        self.fighter.set_target(target);
    }

    pub fn cancel_current_action(&mut self) {
        self.scheduler.cancel_current_action(&mut AgentBehaviors {
            mover: &mut *self.mover,
            fighter: &mut *self.fighter,
        });
    }
}

// === Plugin ===

pub(super) fn plugin(app: &mut App) {
    app.register_type::<ActionScheduler>();
}
