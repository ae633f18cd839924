//! Weapon profiles, the catalog they are resolved from, and equipped weapon visuals.

use std::collections::HashMap;

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use super::Fighter;
use crate::GameSet;

// === Constants ===

/// Id of the built-in fallback weapon.
pub const UNARMED_ID: &str = "unarmed";

// === Profiles ===

/// Hand a weapon is held in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, Reflect)]
#[serde(rename_all = "snake_case")]
pub enum Hand {
    #[default]
    Right,
    Left,
}

/// Launch parameters of a ranged weapon.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Reflect)]
pub struct ProjectileProfile {
    /// Flight speed (world units per second).
    pub speed: f32,
}

/// Immutable per-equip weapon configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeaponProfile {
    pub id: String,
    pub display_name: String,
    /// Effective range (world units).
    pub range: f32,
    /// Minimum time between attacks.
    pub cooldown_secs: f32,
    /// Additive damage modifier.
    #[serde(default)]
    pub damage: f32,
    /// Percentage damage modifier (20.0 means +20%).
    #[serde(default)]
    pub percentage_bonus: f32,
    #[serde(default)]
    pub hand: Hand,
    /// Present for weapons that fire projectiles instead of striking directly.
    #[serde(default)]
    pub projectile: Option<ProjectileProfile>,
}

impl WeaponProfile {
    /// Fists: always available, melee, no damage bonus.
    #[must_use]
    pub fn unarmed() -> Self {
        Self {
            id: UNARMED_ID.to_string(),
            display_name: "Unarmed".to_string(),
            range: 2.0,
            cooldown_secs: 1.0,
            damage: 0.0,
            percentage_bonus: 0.0,
            hand: Hand::Right,
            projectile: None,
        }
    }

    #[must_use]
    pub const fn has_projectile(&self) -> bool {
        self.projectile.is_some()
    }

    /// Creates the runtime instance held by the wielder.
    #[must_use]
    pub fn spawn_instance(&self) -> WeaponInstance {
        WeaponInstance {
            profile_id: self.id.clone(),
            hand: self.hand,
            strikes: 0,
        }
    }
}

/// Every weapon profile the game knows, keyed by id.
#[derive(Resource, Debug, Clone)]
pub struct WeaponCatalog {
    default: WeaponProfile,
    weapons: HashMap<String, WeaponProfile>,
}

impl WeaponCatalog {
    /// Builds a catalog from `profiles`. `None` when `default_id` is missing.
    #[must_use]
    pub fn new(default_id: &str, profiles: impl IntoIterator<Item = WeaponProfile>) -> Option<Self> {
        let weapons: HashMap<String, WeaponProfile> = profiles
            .into_iter()
            .map(|profile| (profile.id.clone(), profile))
            .collect();
        let default = weapons.get(default_id)?.clone();
        Some(Self { default, weapons })
    }

    #[must_use]
    pub fn get(&self, id: &str) -> Option<&WeaponProfile> {
        self.weapons.get(id)
    }

    #[must_use]
    pub const fn default_weapon(&self) -> &WeaponProfile {
        &self.default
    }

    /// The profile for `id`, or the default weapon when `id` is unknown.
    #[must_use]
    pub fn resolve(&self, id: &str) -> &WeaponProfile {
        self.get(id).unwrap_or_else(|| {
            warn!(weapon = id, fallback = %self.default.id, "unknown weapon id, using default");
            &self.default
        })
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.weapons.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.weapons.is_empty()
    }
}

impl Default for WeaponCatalog {
    fn default() -> Self {
        let sword = WeaponProfile {
            id: "sword".to_string(),
            display_name: "Sword".to_string(),
            range: 2.0,
            cooldown_secs: 1.2,
            damage: 5.0,
            percentage_bonus: 20.0,
            hand: Hand::Right,
            projectile: None,
        };
        let bow = WeaponProfile {
            id: "bow".to_string(),
            display_name: "Bow".to_string(),
            range: 20.0,
            cooldown_secs: 1.5,
            damage: 3.0,
            percentage_bonus: 10.0,
            hand: Hand::Left,
            projectile: Some(ProjectileProfile { speed: 15.0 }),
        };
        let fireball = WeaponProfile {
            id: "fireball".to_string(),
            display_name: "Fireball".to_string(),
            range: 15.0,
            cooldown_secs: 2.0,
            damage: 8.0,
            percentage_bonus: 0.0,
            hand: Hand::Right,
            projectile: Some(ProjectileProfile { speed: 10.0 }),
        };
        let unarmed = WeaponProfile::unarmed();
        Self {
            default: unarmed.clone(),
            weapons: [unarmed, sword, bow, fireball]
                .into_iter()
                .map(|profile| (profile.id.clone(), profile))
                .collect(),
        }
    }
}

// === Components ===

/// Runtime weapon held by a fighter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WeaponInstance {
    pub profile_id: String,
    pub hand: Hand,
    strikes: u32,
}

impl WeaponInstance {
    /// Records an impact.
    pub const fn on_hit(&mut self) {
        self.strikes += 1;
    }

    #[must_use]
    pub const fn strikes(&self) -> u32 {
        self.strikes
    }
}

/// Attach points for held weapons.
#[derive(Component, Debug, Clone, Copy, Reflect)]
#[reflect(Component)]
pub struct WeaponSockets {
    pub right_hand: Entity,
    pub left_hand: Entity,
}

impl WeaponSockets {
    #[must_use]
    pub const fn socket(&self, hand: Hand) -> Entity {
        match hand {
            Hand::Right => self.right_hand,
            Hand::Left => self.left_hand,
        }
    }
}

/// Visual stand-in of the weapon a fighter holds. Child of a hand socket.
#[derive(Component, Debug, Clone, Reflect)]
#[reflect(Component)]
pub struct EquippedWeapon {
    pub owner: Entity,
    pub weapon_id: String,
}

// === Messages ===

/// Raised each time a fighter's weapon lands a hit. For audio/VFX consumers.
#[derive(Message, Debug, Clone, PartialEq)]
pub struct WeaponStruck {
    pub attacker: Entity,
    pub weapon_id: String,
}

// === Systems ===

/// Replaces the visual weapon of fighters whose equipment changed.
/// Fighters without sockets hold the weapon on their own root.
/// Runs in `GameSet::Presentation`.
fn attach_weapon_visuals(
    mut commands: Commands,
    mut fighters: Query<(Entity, &mut Fighter, Option<&WeaponSockets>)>,
    equipped: Query<(Entity, &EquippedWeapon)>,
) {
    for (entity, mut fighter, sockets) in &mut fighters {
        if !fighter.visuals_outdated() {
            continue;
        }
        for (visual, weapon) in &equipped {
            if weapon.owner == entity {
                commands.entity(visual).despawn();
            }
        }

        let (weapon_id, hand) = fighter.mark_visuals_attached();
        let parent = sockets.map_or(entity, |sockets| sockets.socket(hand));
        debug!(fighter = ?entity, weapon = %weapon_id, ?hand, "attaching weapon visual");
        commands.spawn((
            Name::new(format!("Weapon ({weapon_id})")),
            EquippedWeapon {
                owner: entity,
                weapon_id,
            },
            Transform::default(),
            ChildOf(parent),
        ));
    }
}

// === Plugin ===

pub(super) fn plugin(app: &mut App) {
    app.register_type::<WeaponSockets>()
        .register_type::<EquippedWeapon>()
        .init_resource::<WeaponCatalog>()
        .add_message::<WeaponStruck>();

    app.add_systems(
        Update,
        attach_weapon_visuals.in_set(GameSet::Presentation),
    );
}
