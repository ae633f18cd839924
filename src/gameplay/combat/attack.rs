//! Attack delivery: impact resolution, projectiles, and damage application.

use bevy::prelude::*;

use super::Fighter;
use super::weapon::{WeaponSockets, WeaponStruck};
use crate::gameplay::Health;
use crate::gameplay::animation::AttackImpact;
use crate::gameplay::stats::BaseStats;

// === Constants ===

/// Height above a target's origin that projectiles aim for.
const AIM_HEIGHT: f32 = 1.0;

/// Launch height above the attacker's origin when it has no hand sockets.
const LAUNCH_HEIGHT: f32 = 1.2;

// === Components ===

/// A projectile in flight toward a target.
/// Spawned by `resolve_attack_impacts`, moved by `move_projectiles`.
/// Damage is applied when the projectile reaches the target.
#[derive(Component, Debug, Clone, Reflect)]
#[reflect(Component)]
pub struct Projectile {
    pub target: Entity,
    pub instigator: Entity,
    pub damage: f32,
    pub speed: f32,
}

// === Systems ===

/// Delivers each attack impact: melee hits damage the target directly,
/// ranged hits launch a projectile from the weapon's hand socket.
/// Runs in `GameSet::Combat`.
pub(super) fn resolve_attack_impacts(
    mut impacts: MessageReader<AttackImpact>,
    mut attackers: Query<(&mut Fighter, &BaseStats, &Transform, Option<&WeaponSockets>)>,
    sockets: Query<&GlobalTransform>,
    mut healths: Query<&mut Health>,
    mut struck: MessageWriter<WeaponStruck>,
    mut commands: Commands,
) {
    for impact in impacts.read() {
        let Ok((mut fighter, stats, transform, hand_sockets)) = attackers.get_mut(impact.attacker)
        else {
            continue;
        };
        let Some(strike) = fighter.hit(stats) else {
            continue;
        };
        struck.write(WeaponStruck {
            attacker: impact.attacker,
            weapon_id: strike.weapon_id.clone(),
        });

        if let Some(projectile) = strike.projectile {
            let origin = hand_sockets
                .and_then(|hand_sockets| sockets.get(hand_sockets.socket(strike.hand)).ok())
                .map_or(
                    transform.translation + Vec3::Y * LAUNCH_HEIGHT,
                    GlobalTransform::translation,
                );
            debug!(attacker = ?impact.attacker, target = ?strike.target, damage = strike.damage, "projectile launched");
            commands.spawn((
                Name::new(format!("Projectile ({})", strike.weapon_id)),
                Projectile {
                    target: strike.target,
                    instigator: impact.attacker,
                    damage: strike.damage,
                    speed: projectile.speed,
                },
                Transform::from_translation(origin),
            ));
        } else if let Ok(mut health) = healths.get_mut(strike.target) {
            health.take_damage(impact.attacker, strike.damage);
        }
    }
}

/// Moves projectiles toward their target's aim point and applies damage on
/// arrival. If the target no longer exists, despawns the projectile harmlessly.
/// Runs in `GameSet::Combat`.
pub(super) fn move_projectiles(
    time: Res<Time>,
    mut commands: Commands,
    mut projectiles: Query<(Entity, &Projectile, &mut Transform)>,
    mut targets: Query<(&GlobalTransform, &mut Health)>,
) {
    for (entity, projectile, mut transform) in &mut projectiles {
        // Target gone: despawn projectile harmlessly
        let Ok((target_position, mut health)) = targets.get_mut(projectile.target) else {
            commands.entity(entity).despawn();
            continue;
        };

        let aim = target_position.translation() + Vec3::Y * AIM_HEIGHT;
        let offset = aim - transform.translation;
        let distance = offset.length();
        let step = projectile.speed * time.delta_secs();

        if step >= distance {
            // Damage to an already dead target is ignored by `Health`.
            health.take_damage(projectile.instigator, projectile.damage);
            commands.entity(entity).despawn();
            continue;
        }
        transform.translation += offset / distance * step;
        transform.look_to(offset, Vec3::Y);
    }
}

// === Plugin ===

pub(super) fn plugin(app: &mut App) {
    app.register_type::<Projectile>();
}
