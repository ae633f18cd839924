//! Data-driven configuration loaded at startup.

use std::fs;
use std::path::{Path, PathBuf};

use bevy::prelude::*;
use serde::Deserialize;

use crate::gameplay::combat::weapon::{WeaponCatalog, WeaponProfile};

/// Default location of the weapon catalog, relative to the working directory.
pub const WEAPON_CATALOG_PATH: &str = "assets/config/weapons.toml";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("default weapon `{0}` is not defined")]
    MissingDefault(String),
}

/// On-disk layout of the weapon catalog.
#[derive(Debug, Deserialize)]
struct WeaponCatalogFile {
    default: String,
    #[serde(rename = "weapon")]
    weapons: Vec<WeaponProfile>,
}

/// Parses a weapon catalog from TOML source.
pub fn parse_weapon_catalog(source: &str) -> Result<WeaponCatalog, ConfigError> {
    let file: WeaponCatalogFile = toml::from_str(source)?;
    WeaponCatalog::new(&file.default, file.weapons).ok_or(ConfigError::MissingDefault(file.default))
}

/// Reads and parses the weapon catalog at `path`.
pub fn load_weapon_catalog(path: impl AsRef<Path>) -> Result<WeaponCatalog, ConfigError> {
    let path = path.as_ref();
    let source = fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_weapon_catalog(&source)
}

/// Installs the weapon catalog from [`WEAPON_CATALOG_PATH`], falling back to
/// the built-in catalog when the file is missing or invalid.
pub fn plugin(app: &mut App) {
    let catalog = match load_weapon_catalog(WEAPON_CATALOG_PATH) {
        Ok(catalog) => {
            info!(weapons = catalog.len(), path = WEAPON_CATALOG_PATH, "weapon catalog loaded");
            catalog
        }
        Err(error) => {
            warn!(%error, "using built-in weapon catalog");
            WeaponCatalog::default()
        }
    };
    app.insert_resource(catalog);
}
