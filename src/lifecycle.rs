//! Application lifecycle: objects that live for the whole session.

use bevy::prelude::*;

use crate::persistence::SaveStore;

/// Marker for the root that owns session-wide state (the save store).
#[derive(Component, Debug, Clone, Copy, Reflect)]
#[reflect(Component)]
pub struct PersistentRoot;

/// Spawns the persistent objects. Scheduled in `Startup`, so it runs once
/// per app no matter how many scenes come and go.
fn spawn_persistent_objects(mut commands: Commands) {
    debug!("spawning persistent objects");
    commands.spawn((
        Name::new("Persistent Objects"),
        PersistentRoot,
        SaveStore::default(),
    ));
}

pub fn plugin(app: &mut App) {
    app.register_type::<PersistentRoot>();
    app.add_systems(Startup, spawn_persistent_objects);
}
