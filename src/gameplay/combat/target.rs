//! Targetable marker: lets the pointer dispatcher engage an entity.

use bevy::prelude::*;

use crate::gameplay::Health;
use crate::gameplay::control::{InteractionContext, Raycastable};
use crate::gameplay::control::cursor::CursorType;

/// Frame-local view of a potential target.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TargetSnapshot {
    pub entity: Entity,
    pub position: Vec3,
    /// False for entities without health.
    pub has_died: bool,
}

impl TargetSnapshot {
    /// Reads `entity` from a position/health query. `None` when it is gone.
    #[must_use]
    pub fn query(
        entity: Entity,
        targets: &Query<(&GlobalTransform, Option<&Health>)>,
    ) -> Option<Self> {
        let (transform, health) = targets.get(entity).ok()?;
        Some(Self {
            entity,
            position: transform.translation(),
            has_died: health.is_some_and(Health::has_died),
        })
    }
}

/// Marks an entity the player can attack by pointing at it.
#[derive(Component, Debug, Clone, Copy, Reflect)]
#[reflect(Component)]
pub struct CombatTarget {
    pub enabled: bool,
}

impl Default for CombatTarget {
    fn default() -> Self {
        Self { enabled: true }
    }
}

impl Raycastable for CombatTarget {
    fn cursor_type(&self) -> CursorType {
        CursorType::Combat
    }

    /// Claims the pointer whenever attacking is possible; attacks only while
    /// the primary button is held.
    fn handle_raycast(&self, subject: &TargetSnapshot, context: &mut InteractionContext) -> bool {
        if !self.enabled {
            return false;
        }
        let fighter = &*context.actions.fighter;
        let mover = &*context.actions.mover;
        if !fighter.can_attack(context.position, mover, context.surface, Some(subject)) {
            return false;
        }
        if context.primary_held {
            context.actions.attack(subject.entity);
        }
        true
    }
}

pub(super) fn plugin(app: &mut App) {
    app.register_type::<CombatTarget>();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gameplay::action::{ActionKind, ActionScheduler, AgentActions};
    use crate::gameplay::combat::Fighter;
    use crate::gameplay::movement::Mover;
    use crate::gameplay::movement::navigation::OpenGround;
    use pretty_assertions::assert_eq;

    struct Agent {
        scheduler: ActionScheduler,
        mover: Mover,
        fighter: Fighter,
    }

    impl Agent {
        fn new() -> Self {
            Self {
                scheduler: ActionScheduler::default(),
                mover: Mover::default(),
                fighter: Fighter::default(),
            }
        }

        fn handle(&mut self, marker: CombatTarget, subject: &TargetSnapshot, primary_held: bool) -> bool {
            let ground = OpenGround::default();
            let mut context = InteractionContext {
                actions: AgentActions {
                    scheduler: &mut self.scheduler,
                    mover: &mut self.mover,
                    fighter: &mut self.fighter,
                },
                position: Vec3::ZERO,
                surface: &ground,
                primary_held,
            };
            marker.handle_raycast(subject, &mut context)
        }
    }

    fn subject(position: Vec3, has_died: bool) -> TargetSnapshot {
        let mut world = World::new();
        TargetSnapshot {
            entity: world.spawn_empty().id(),
            position,
            has_died,
        }
    }

    #[test]
    fn disabled_marker_is_ignored() {
        let mut agent = Agent::new();
        let target = subject(Vec3::X, false);
        assert!(!agent.handle(CombatTarget { enabled: false }, &target, true));
        assert_eq!(agent.fighter.target(), None);
    }

    #[test]
    fn hover_claims_without_attacking() {
        let mut agent = Agent::new();
        let target = subject(Vec3::X, false);
        assert!(agent.handle(CombatTarget::default(), &target, false));
        assert_eq!(agent.fighter.target(), None);
        assert_eq!(agent.scheduler.current(), None);
    }

    #[test]
    fn held_button_attacks() {
        let mut agent = Agent::new();
        let target = subject(Vec3::new(5.0, 0.0, 0.0), false);
        assert!(agent.handle(CombatTarget::default(), &target, true));
        assert_eq!(agent.fighter.target(), Some(target.entity));
        assert_eq!(agent.scheduler.current(), Some(ActionKind::Combat));
    }

    #[test]
    fn dead_target_is_not_claimed() {
        let mut agent = Agent::new();
        let target = subject(Vec3::X, true);
        assert!(!agent.handle(CombatTarget::default(), &target, true));
        assert_eq!(agent.fighter.target(), None);
    }

    #[test]
    fn combat_cursor() {
        assert_eq!(CombatTarget::default().cursor_type(), CursorType::Combat);
    }
}
