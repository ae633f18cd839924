//! Combat engagement: target pursuit, attack cadence, and damage contribution.

pub mod attack;
pub mod death;
pub mod target;
pub mod weapon;

use bevy::prelude::*;

use self::target::TargetSnapshot;
use self::weapon::{Hand, ProjectileProfile, WeaponCatalog, WeaponInstance, WeaponProfile};
use super::Health;
use super::action::Action;
use super::animation::{self, AttackSignal, CombatAnimator};
use super::movement::Mover;
use super::movement::navigation::NavigableSurface;
use super::stats::{BaseStats, ModifierProvider, Stat};
use crate::GameSet;
use crate::lazy::LazyValue;

// === Engagement State ===

/// Where the fighter stands relative to its target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Reflect)]
pub enum EngagementState {
    /// No live target.
    #[default]
    Idle,
    /// Target set, out of range: steering the mover toward it.
    Pursuing,
    /// Target set, in range: holding position and attacking on cooldown.
    Attacking,
}

/// What the fighter observed about its target this tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EngagementInput {
    /// No target, target gone, or target dead.
    TargetLost,
    OutOfRange,
    InRange,
}

impl EngagementState {
    /// Transition table. Every state accepts every input; the observation
    /// alone decides the next state, so the machine never gets stuck.
    ///
    /// | from \ input | `TargetLost` | `OutOfRange` | `InRange`   |
    /// |--------------|--------------|--------------|-------------|
    /// | `Idle`       | `Idle`       | `Pursuing`   | `Attacking` |
    /// | `Pursuing`   | `Idle`       | `Pursuing`   | `Attacking` |
    /// | `Attacking`  | `Idle`       | `Pursuing`   | `Attacking` |
    #[must_use]
    pub const fn next(self, input: EngagementInput) -> Self {
        match (self, input) {
            (Self::Idle | Self::Pursuing | Self::Attacking, EngagementInput::TargetLost) => {
                Self::Idle
            }
            (Self::Idle | Self::Pursuing | Self::Attacking, EngagementInput::OutOfRange) => {
                Self::Pursuing
            }
            (Self::Idle | Self::Pursuing | Self::Attacking, EngagementInput::InRange) => {
                Self::Attacking
            }
        }
    }
}

// === Components ===

/// Everything needed to deliver one hit, computed at the impact frame.
#[derive(Debug, Clone, PartialEq)]
pub struct Strike {
    pub target: Entity,
    pub damage: f32,
    pub weapon_id: String,
    pub hand: Hand,
    pub projectile: Option<ProjectileProfile>,
}

/// Combat engagement engine of an agent.
///
/// Take ownership through [`super::action::AgentActions::attack`]; the
/// engagement tick then pursues and attacks until the target is lost or the
/// action is cancelled. Attacking does not check whether the target is
/// already in its death animation: a target is attackable until its health
/// reports death.
#[derive(Component, Debug)]
pub struct Fighter {
    target: Option<Entity>,
    state: EngagementState,
    time_since_last_attack: f32,
    weapon: WeaponProfile,
    weapon_instance: LazyValue<WeaponInstance>,
    visuals_outdated: bool,
    signal: Option<AttackSignal>,
}

impl Default for Fighter {
    fn default() -> Self {
        Self::new(WeaponProfile::unarmed())
    }
}

impl Fighter {
    /// A fighter holding `weapon`. The weapon instance is created on first
    /// use, or when the fighter is added to the world.
    #[must_use]
    pub fn new(weapon: WeaponProfile) -> Self {
        let initial = weapon.clone();
        Self {
            target: None,
            state: EngagementState::Idle,
            time_since_last_attack: f32::INFINITY,
            weapon,
            weapon_instance: LazyValue::new(move || initial.spawn_instance()),
            visuals_outdated: true,
            signal: None,
        }
    }

    #[must_use]
    pub const fn target(&self) -> Option<Entity> {
        self.target
    }

    #[must_use]
    pub const fn state(&self) -> EngagementState {
        self.state
    }

    #[must_use]
    pub const fn weapon(&self) -> &WeaponProfile {
        &self.weapon
    }

    #[must_use]
    pub const fn time_since_last_attack(&self) -> f32 {
        self.time_since_last_attack
    }

    /// The held weapon instance, created on demand.
    pub fn weapon_instance(&mut self) -> &mut WeaponInstance {
        self.weapon_instance.value()
    }

    #[must_use]
    pub const fn weapon_instance_ready(&self) -> bool {
        self.weapon_instance.is_initialized()
    }

    /// Engages `target` without touching ownership.
    pub const fn set_target(&mut self, target: Entity) {
        self.target = Some(target);
    }

    /// Stops the attack signal and forgets the target. The mover is halted
    /// by whoever holds both (see `AgentBehaviors`).
    pub const fn cancel(&mut self) {
        self.signal = Some(AttackSignal::Stop);
        self.target = None;
        self.state = EngagementState::Idle;
    }

    #[must_use]
    pub fn in_range(&self, position: Vec3, target: Vec3) -> bool {
        position.distance(target) <= self.weapon.range
    }

    /// Whether attacking `target` from `position` is possible at all: it
    /// exists, is alive, and is either in range or reachable. Pure query.
    #[must_use]
    pub fn can_attack(
        &self,
        position: Vec3,
        mover: &Mover,
        surface: &dyn NavigableSurface,
        target: Option<&TargetSnapshot>,
    ) -> bool {
        let Some(target) = target else {
            return false;
        };
        if !self.in_range(position, target.position)
            && !mover.can_move_to(position, target.position, surface)
        {
            return false;
        }
        !target.has_died
    }

    /// One engagement tick. `target` is the current state of
    /// [`Fighter::target`], `None` when it no longer exists.
    pub fn tick(
        &mut self,
        dt: f32,
        transform: &mut Transform,
        mover: &mut Mover,
        target: Option<&TargetSnapshot>,
    ) {
        self.time_since_last_attack += dt;

        let input = match target {
            Some(target) if self.target.is_some() && !target.has_died => {
                if self.in_range(transform.translation, target.position) {
                    EngagementInput::InRange
                } else {
                    EngagementInput::OutOfRange
                }
            }
            _ => EngagementInput::TargetLost,
        };
        let next = self.state.next(input);
        if next != self.state {
            debug!(from = ?self.state, to = ?next, target = ?self.target, "engagement changed");
            self.state = next;
        }

        let Some(target) = target else {
            return;
        };
        match self.state {
            EngagementState::Idle => {}
            EngagementState::Pursuing => mover.move_to(target.position, 1.0),
            EngagementState::Attacking => {
                mover.cancel();
                face_toward(transform, target.position);
                if self.time_since_last_attack >= self.weapon.cooldown_secs {
                    self.signal = Some(AttackSignal::Attack);
                    self.time_since_last_attack = 0.0;
                }
            }
        }
    }

    /// Impact frame of an attack. `None` without a target.
    pub fn hit(&mut self, stats: &BaseStats) -> Option<Strike> {
        let target = self.target?;
        let damage = stats.stat(Stat::Damage, &[&*self]);
        self.weapon_instance.value().on_hit();
        Some(Strike {
            target,
            damage,
            weapon_id: self.weapon.id.clone(),
            hand: self.weapon.hand,
            projectile: self.weapon.projectile,
        })
    }

    /// Replaces the weapon profile and instance; the visual is re-attached
    /// during presentation.
    pub fn equip_weapon(&mut self, weapon: WeaponProfile) {
        debug!(weapon = %weapon.id, "equipping weapon");
        self.weapon_instance.set(weapon.spawn_instance());
        self.weapon = weapon;
        self.visuals_outdated = true;
    }

    /// Drains the pending animation trigger.
    pub const fn take_signal(&mut self) -> Option<AttackSignal> {
        self.signal.take()
    }

    #[must_use]
    pub const fn visuals_outdated(&self) -> bool {
        self.visuals_outdated
    }

    /// Acknowledges the visual re-attach, returning what to attach and where.
    pub fn mark_visuals_attached(&mut self) -> (String, Hand) {
        self.visuals_outdated = false;
        (self.weapon.id.clone(), self.weapon.hand)
    }

    /// Saved state: the equipped weapon id.
    #[must_use]
    pub fn capture_state(&self) -> String {
        self.weapon.id.clone()
    }

    /// Re-equips the saved weapon; an unknown id equips the catalog default.
    pub fn restore_state(&mut self, weapon_id: &str, catalog: &WeaponCatalog) {
        self.equip_weapon(catalog.resolve(weapon_id).clone());
    }
}

impl Action for Fighter {
    fn cancel(&mut self) {
        Self::cancel(self);
    }
}

impl ModifierProvider for Fighter {
    fn additive_modifiers(&self, stat: Stat) -> Vec<f32> {
        match stat {
            Stat::Damage => vec![self.weapon.damage],
            Stat::Health => Vec::new(),
        }
    }

    fn percentage_modifiers(&self, stat: Stat) -> Vec<f32> {
        match stat {
            Stat::Damage => vec![self.weapon.percentage_bonus],
            Stat::Health => Vec::new(),
        }
    }
}

/// Turns to look at `point` without pitching.
fn face_toward(transform: &mut Transform, point: Vec3) {
    let flat = Vec3::new(point.x, transform.translation.y, point.z);
    if transform.translation.distance_squared(flat) > f32::EPSILON {
        transform.look_at(flat, Vec3::Y);
    }
}

// === Systems ===

/// Creates the weapon instance as soon as a fighter enters the world.
fn init_weapon_instance(add: On<Add, Fighter>, mut fighters: Query<&mut Fighter>) {
    let Ok(mut fighter) = fighters.get_mut(add.entity) else {
        return;
    };
    fighter.weapon_instance.force_init();
}

/// Ticks every fighter against its target and forwards animation triggers.
/// Runs in `GameSet::Combat`.
fn engage_targets(
    time: Res<Time>,
    mut fighters: Query<(
        &mut Fighter,
        &mut Mover,
        &mut Transform,
        Option<&mut CombatAnimator>,
    )>,
    targets: Query<(&GlobalTransform, Option<&Health>)>,
) {
    let dt = time.delta_secs();
    for (mut fighter, mut mover, mut transform, animator) in &mut fighters {
        let target = fighter
            .target()
            .and_then(|entity| TargetSnapshot::query(entity, &targets));
        fighter.tick(dt, &mut transform, &mut mover, target.as_ref());

        if let (Some(signal), Some(mut animator)) = (fighter.take_signal(), animator) {
            animator.trigger(signal);
        }
    }
}

// === Plugin ===

pub(super) fn plugin(app: &mut App) {
    app.register_type::<EngagementState>();
    app.add_observer(init_weapon_instance);

    app.add_plugins((attack::plugin, death::plugin, target::plugin, weapon::plugin));

    // Tick → swing → impact → projectile flight, all within one frame.
    app.add_systems(
        Update,
        (
            engage_targets,
            animation::play_attack_swings,
            attack::resolve_attack_impacts,
            attack::move_projectiles,
        )
            .chain()
            .in_set(GameSet::Combat),
    );
}
