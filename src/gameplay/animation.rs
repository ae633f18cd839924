//! Animation signals and the attack-swing timer that stands in for impact events.
//!
//! The fighter raises set/reset triggers; a swing started by the attack
//! trigger reaches its impact frame after [`IMPACT_DELAY_SECS`] and raises an
//! [`AttackImpact`] message, the same moment an animation event would fire.

use bevy::prelude::*;

// === Constants ===

/// Time from swing start to the impact frame.
pub const IMPACT_DELAY_SECS: f32 = 0.3;

// === Components ===

/// Trigger raised by the fighter for the animation layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Reflect)]
pub enum AttackSignal {
    Attack,
    Stop,
}

/// Animation parameters of an agent.
#[derive(Component, Debug, Clone, Default, Reflect)]
#[reflect(Component)]
pub struct CombatAnimator {
    /// Velocity along the agent's forward axis.
    pub forward_speed: f32,
    attack: bool,
    stop_attack: bool,
    swing: Option<Timer>,
}

impl CombatAnimator {
    /// Sets a trigger and resets its counterpart.
    pub const fn trigger(&mut self, signal: AttackSignal) {
        match signal {
            AttackSignal::Attack => {
                self.stop_attack = false;
                self.attack = true;
            }
            AttackSignal::Stop => {
                self.attack = false;
                self.stop_attack = true;
            }
        }
    }

    #[must_use]
    pub const fn attack_pending(&self) -> bool {
        self.attack
    }

    #[must_use]
    pub const fn stop_pending(&self) -> bool {
        self.stop_attack
    }

    #[must_use]
    pub const fn is_swinging(&self) -> bool {
        self.swing.is_some()
    }
}

// === Messages ===

/// The impact frame of an attack swing. Consumed by the attacker's fighter.
#[derive(Message, Debug, Clone, Copy, PartialEq, Eq)]
pub struct AttackImpact {
    pub attacker: Entity,
}

// === Systems ===

/// Consumes animation triggers and advances swings.
/// Stop aborts the swing in progress; attack starts one when idle.
/// Runs in `GameSet::Combat`, after the engagement tick.
pub(super) fn play_attack_swings(
    time: Res<Time>,
    mut animators: Query<(Entity, &mut CombatAnimator)>,
    mut impacts: MessageWriter<AttackImpact>,
) {
    for (entity, mut animator) in &mut animators {
        if animator.stop_attack {
            animator.stop_attack = false;
            animator.swing = None;
        }
        if animator.attack && animator.swing.is_none() {
            animator.attack = false;
            animator.swing = Some(Timer::from_seconds(IMPACT_DELAY_SECS, TimerMode::Once));
        }

        let Some(swing) = animator.swing.as_mut() else {
            continue;
        };
        swing.tick(time.delta());
        if swing.just_finished() {
            animator.swing = None;
            impacts.write(AttackImpact { attacker: entity });
        }
    }
}

// === Plugin ===

pub(super) fn plugin(app: &mut App) {
    app.register_type::<CombatAnimator>()
        .add_message::<AttackImpact>();
}


#[cfg(test)]
mod integration_tests {
    use super::*;
    use crate::testing::{advance, create_test_app};
    use pretty_assertions::assert_eq;

    #[derive(Resource, Default)]
    struct Impacts(Vec<Entity>);

    fn record_impacts(mut reader: MessageReader<AttackImpact>, mut seen: ResMut<Impacts>) {
        seen.0.extend(reader.read().map(|impact| impact.attacker));
    }

    fn create_swing_test_app() -> App {
        let mut app = create_test_app();
        app.add_message::<AttackImpact>()
            .init_resource::<Impacts>()
            .add_systems(Update, (play_attack_swings, record_impacts).chain());
        app.update(); // Initialize time (first frame delta=0)
        app
    }

    #[test]
    fn swing_raises_impact_after_delay() {
        let mut app = create_swing_test_app();
        let agent = app.world_mut().spawn(CombatAnimator::default()).id();
        app.world_mut()
            .get_mut::<CombatAnimator>(agent)
            .unwrap()
            .trigger(AttackSignal::Attack);

        advance(&mut app, 2);
        assert!(app.world().resource::<Impacts>().0.is_empty());

        advance(&mut app, 2);
        assert_eq!(app.world().resource::<Impacts>().0, vec![agent]);
        assert!(!app.world().get::<CombatAnimator>(agent).unwrap().is_swinging());
    }

    #[test]
    fn stop_aborts_swing() {
        let mut app = create_swing_test_app();
        let agent = app.world_mut().spawn(CombatAnimator::default()).id();
        app.world_mut()
            .get_mut::<CombatAnimator>(agent)
            .unwrap()
            .trigger(AttackSignal::Attack);
        advance(&mut app, 1);

        app.world_mut()
            .get_mut::<CombatAnimator>(agent)
            .unwrap()
            .trigger(AttackSignal::Stop);
        advance(&mut app, 5);

        assert!(app.world().resource::<Impacts>().0.is_empty());
    }
}
