//! Save and restore of persistable entities.
//!
//! Each [`SaveableEntity`] contributes one [`EntityRecord`] to the
//! [`SaveStore`] living on the persistent root. Quick save captures every
//! record (and writes the store to disk when a save path is set); quick load
//! reads it back and restores movers and fighters.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::GameSet;
use crate::gameplay::action::{ActionScheduler, AgentActions};
use crate::gameplay::combat::Fighter;
use crate::gameplay::combat::weapon::WeaponCatalog;
use crate::gameplay::movement::{Mover, MoverSnapshot};
use crate::lifecycle::PersistentRoot;

/// Save file location used by the game binary, relative to the working directory.
pub const QUICK_SAVE_PATH: &str = "saves/quick.json";

// === Errors ===

#[derive(Debug, thiserror::Error)]
pub enum SaveError {
    #[error("failed to access save file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed save data: {0}")]
    Json(#[from] serde_json::Error),
}

// === Components ===

/// Stable identifier of an entity whose state survives save/load.
#[derive(Component, Debug, Clone, PartialEq, Eq, Hash, Reflect)]
#[reflect(Component)]
pub struct SaveableEntity(pub String);

/// Captured state of one saveable entity.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EntityRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mover: Option<MoverSnapshot>,
    /// Equipped weapon id.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fighter: Option<String>,
}

/// Every captured record, keyed by [`SaveableEntity`] id.
#[derive(Component, Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SaveStore {
    records: BTreeMap<String, EntityRecord>,
}

impl SaveStore {
    #[must_use]
    pub fn record(&self, id: &str) -> Option<&EntityRecord> {
        self.records.get(id)
    }

    pub fn insert(&mut self, id: impl Into<String>, record: EntityRecord) {
        self.records.insert(id.into(), record);
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn to_json(&self) -> Result<String, SaveError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_json(source: &str) -> Result<Self, SaveError> {
        Ok(serde_json::from_str(source)?)
    }

    /// Writes the store as JSON, creating missing parent directories.
    pub fn write_to(&self, path: &Path) -> Result<(), SaveError> {
        let json = self.to_json()?;
        let io_error = |source: std::io::Error| SaveError::Io {
            path: path.to_path_buf(),
            source,
        };
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(io_error)?;
        }
        fs::write(path, json).map_err(io_error)
    }

    pub fn read_from(path: &Path) -> Result<Self, SaveError> {
        let json = fs::read_to_string(path).map_err(|source| SaveError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&json)
    }
}

// === Resources ===

/// Quick save/load bindings and the optional on-disk location.
#[derive(Resource, Debug, Clone)]
pub struct SaveSettings {
    /// Where the store is written; `None` keeps saves in memory only.
    pub path: Option<PathBuf>,
    pub save_key: KeyCode,
    pub load_key: KeyCode,
}

impl SaveSettings {
    /// Default bindings, persisting to `path`.
    #[must_use]
    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self {
            path: Some(path.into()),
            ..Self::default()
        }
    }
}

impl Default for SaveSettings {
    fn default() -> Self {
        Self {
            path: None,
            save_key: KeyCode::F5,
            load_key: KeyCode::F9,
        }
    }
}

// === Systems ===

/// Captures every saveable entity into the store.
/// Runs in `GameSet::Input`.
fn quick_save(
    keys: Res<ButtonInput<KeyCode>>,
    settings: Res<SaveSettings>,
    mut store: Single<&mut SaveStore, With<PersistentRoot>>,
    saveables: Query<(&SaveableEntity, &Transform, Option<&Mover>, Option<&Fighter>)>,
) {
    if !keys.just_pressed(settings.save_key) {
        return;
    }
    for (id, transform, mover, fighter) in &saveables {
        store.insert(
            id.0.clone(),
            EntityRecord {
                mover: mover.map(|_| Mover::capture_state(transform)),
                fighter: fighter.map(Fighter::capture_state),
            },
        );
    }
    info!(records = store.len(), "game saved");

    if let Some(path) = &settings.path {
        if let Err(error) = store.write_to(path) {
            warn!(%error, "failed to write save file");
        }
    }
}

/// Restores every saveable entity from the store. The agent's current
/// action is cancelled first so nothing resumes a stale goal.
/// Runs in `GameSet::Input`.
fn quick_load(
    keys: Res<ButtonInput<KeyCode>>,
    settings: Res<SaveSettings>,
    catalog: Res<WeaponCatalog>,
    mut store: Single<&mut SaveStore, With<PersistentRoot>>,
    mut saveables: Query<(
        &SaveableEntity,
        &mut Transform,
        Option<&mut Mover>,
        Option<&mut Fighter>,
        Option<&mut ActionScheduler>,
    )>,
) {
    if !keys.just_pressed(settings.load_key) {
        return;
    }
    if let Some(path) = &settings.path {
        match SaveStore::read_from(path) {
            Ok(loaded) => **store = loaded,
            Err(error) => warn!(%error, "failed to read save file, using in-memory save"),
        }
    }

    for (id, mut transform, mut mover, mut fighter, scheduler) in &mut saveables {
        let Some(record) = store.record(&id.0) else {
            continue;
        };
        if let (Some(scheduler), Some(mover), Some(fighter)) =
            (scheduler, mover.as_deref_mut(), fighter.as_deref_mut())
        {
            AgentActions {
                scheduler: scheduler.into_inner(),
                mover,
                fighter,
            }
            .cancel_current_action();
        }
        if let (Some(mover), Some(snapshot)) = (mover.as_deref_mut(), &record.mover) {
            mover.restore_state(&mut transform, snapshot);
        }
        if let (Some(fighter), Some(weapon_id)) = (fighter.as_deref_mut(), &record.fighter) {
            fighter.restore_state(weapon_id, &catalog);
        }
    }
    info!(records = store.len(), "game loaded");
}

// === Plugin ===

pub fn plugin(app: &mut App) {
    app.register_type::<SaveableEntity>()
        .init_resource::<SaveSettings>()
        .init_resource::<ButtonInput<KeyCode>>();

    app.add_systems(Update, (quick_save, quick_load).chain().in_set(GameSet::Input));
}
