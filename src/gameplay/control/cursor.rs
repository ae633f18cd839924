//! Cursor kinds chosen by the dispatcher and their presentation on the window.

use std::collections::HashMap;

use bevy::prelude::*;
use bevy::window::{CursorIcon, PrimaryWindow, SystemCursorIcon};

use crate::GameSet;

/// Abstract cursor requested by the interaction dispatcher.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Reflect)]
pub enum CursorType {
    #[default]
    None,
    Ui,
    Combat,
    Movement,
}

/// Cursor the dispatcher resolved this frame.
#[derive(Resource, Debug, Clone, Copy, PartialEq, Eq, Default, Reflect)]
#[reflect(Resource)]
pub struct ActiveCursor(pub CursorType);

/// Presentation of each cursor kind.
#[derive(Resource, Debug, Clone)]
pub struct CursorMappings(pub HashMap<CursorType, SystemCursorIcon>);

impl Default for CursorMappings {
    fn default() -> Self {
        Self(HashMap::from([
            (CursorType::None, SystemCursorIcon::Default),
            (CursorType::Ui, SystemCursorIcon::Pointer),
            (CursorType::Combat, SystemCursorIcon::Crosshair),
            (CursorType::Movement, SystemCursorIcon::Move),
        ]))
    }
}

impl CursorMappings {
    /// Icon for `cursor`; unmapped kinds show the default arrow.
    #[must_use]
    pub fn icon(&self, cursor: CursorType) -> SystemCursorIcon {
        self.0
            .get(&cursor)
            .copied()
            .unwrap_or(SystemCursorIcon::Default)
    }
}

/// Applies the active cursor to the primary window when it changes.
/// Runs in `GameSet::Presentation`.
fn apply_cursor(
    mut commands: Commands,
    active: Res<ActiveCursor>,
    mappings: Res<CursorMappings>,
    windows: Query<Entity, With<PrimaryWindow>>,
) {
    if !active.is_changed() {
        return;
    }
    let icon = mappings.icon(active.0);
    for window in &windows {
        commands.entity(window).insert(CursorIcon::System(icon));
    }
}

pub(super) fn plugin(app: &mut App) {
    app.register_type::<ActiveCursor>()
        .init_resource::<ActiveCursor>()
        .init_resource::<CursorMappings>();

    app.add_systems(Update, apply_cursor.in_set(GameSet::Presentation));
}
