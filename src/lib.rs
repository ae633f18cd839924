//! Single-agent action control: behavior arbitration, combat engagement,
//! navmesh movement, and pointer-driven interaction.

pub mod arena;
pub mod config;
#[cfg(feature = "dev")]
mod dev_tools;
pub mod gameplay;
pub mod lazy;
pub mod lifecycle;
pub mod persistence;
#[cfg(test)]
pub mod testing;
mod third_party;

use bevy::prelude::*;

/// Per-frame ordering of gameplay systems inside `Update`.
///
/// Configured as a chain by [`gameplay::plugin`]:
/// `Input → Death → Combat → Movement → Presentation`.
#[derive(SystemSet, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GameSet {
    /// Pointer probing, interaction dispatch, save/load keys.
    Input,
    /// Dying agents give up their current action.
    Death,
    /// Engagement tick, attack swings, impacts, projectiles.
    Combat,
    /// Path following and locomotion signals.
    Movement,
    /// Weapon attachment and cursor presentation.
    Presentation,
}

/// Full game plugin: gameplay, lifecycle, persistence, physics and navigation backends.
pub fn plugin(app: &mut App) {
    app.add_plugins((
        gameplay::plugin,
        lifecycle::plugin,
        persistence::plugin,
        third_party::plugin,
    ));
}
