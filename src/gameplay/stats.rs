//! Base stats and modifier aggregation.
//!
//! A stat's value is `(base + Σadditive) × (1 + Σpercentage / 100)`, summed
//! over every [`ModifierProvider`] the caller passes in.

use bevy::prelude::*;

/// Stats that modifiers can target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Reflect)]
pub enum Stat {
    Health,
    Damage,
}

/// Something that contributes modifiers to an agent's stats.
pub trait ModifierProvider {
    /// Flat bonuses for `stat`. Empty when this provider does not affect it.
    fn additive_modifiers(&self, stat: Stat) -> Vec<f32>;
    /// Percentage bonuses for `stat` (20.0 means +20%).
    fn percentage_modifiers(&self, stat: Stat) -> Vec<f32>;
}

/// Unmodified stat values of an entity.
#[derive(Component, Debug, Clone, Copy, Reflect)]
#[reflect(Component)]
pub struct BaseStats {
    pub health: f32,
    pub damage: f32,
}

impl BaseStats {
    #[must_use]
    pub const fn base(&self, stat: Stat) -> f32 {
        match stat {
            Stat::Health => self.health,
            Stat::Damage => self.damage,
        }
    }

    /// Final value of `stat` after applying every provider's modifiers.
    #[must_use]
    pub fn stat(&self, stat: Stat, providers: &[&dyn ModifierProvider]) -> f32 {
        let additive: f32 = providers
            .iter()
            .flat_map(|provider| provider.additive_modifiers(stat))
            .sum();
        let percentage: f32 = providers
            .iter()
            .flat_map(|provider| provider.percentage_modifiers(stat))
            .sum();
        (self.base(stat) + additive) * (1.0 + percentage / 100.0)
    }
}

pub(super) fn plugin(app: &mut App) {
    app.register_type::<BaseStats>();
}
