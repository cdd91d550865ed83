use std::collections::HashMap;
use std::path::PathBuf;
use std::{fs, io};

use holograph_core::location::Location;
use log::{error, warn};
use parking_lot::RwLock;
use thiserror::Error;

use crate::model::{HoloKind, HologramDefinition};

pub mod record;

pub const RECORD_EXTENSION: &str = "holo";

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("a hologram with id `{0}` already exists")]
    DuplicateId(String),
    #[error("hologram id `{0}` may only contain letters, digits, `-` and `_`")]
    InvalidId(String),
    #[error("failed to write hologram record {path:?}: {source}")]
    Io { path: PathBuf, source: io::Error },
}

/// All known definitions, mirrored on disk as one record file per id under
/// the data directory. The in-memory map is authoritative while running;
/// disk is only read by [`DefinitionStore::load_all`].
pub struct DefinitionStore {
    data_dir: PathBuf,
    definitions: RwLock<HashMap<String, HologramDefinition>>,
}

impl DefinitionStore {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        let data_dir = data_dir.into();
        if let Err(err) = fs::create_dir_all(&data_dir) {
            warn!(
                "Couldn't create hologram data directory {:?}: {}",
                data_dir, err
            );
        }
        DefinitionStore {
            data_dir,
            definitions: RwLock::new(HashMap::new()),
        }
    }

    /// Ids double as file names, so they are restricted to characters that
    /// are safe on every filesystem.
    fn is_valid_id(id: &str) -> bool {
        !id.is_empty()
            && id
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
    }

    pub fn record_path(&self, id: &str) -> PathBuf {
        self.data_dir.join(format!("{id}.{RECORD_EXTENSION}"))
    }

    pub fn create(
        &self,
        id: &str,
        kind: HoloKind,
        location: Location,
    ) -> Result<HologramDefinition, StoreError> {
        if !Self::is_valid_id(id) {
            return Err(StoreError::InvalidId(id.to_string()));
        }
        let mut definitions = self.definitions.write();
        if definitions.contains_key(id) {
            return Err(StoreError::DuplicateId(id.to_string()));
        }
        let def = HologramDefinition::new(id, kind, location);
        definitions.insert(id.to_string(), def.clone());
        Ok(def)
    }

    pub fn get(&self, id: &str) -> Option<HologramDefinition> {
        self.definitions.read().get(id).cloned()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.definitions.read().contains_key(id)
    }

    pub fn all(&self) -> Vec<HologramDefinition> {
        self.definitions.read().values().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.definitions.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.definitions.read().is_empty()
    }

    /// Puts an edited definition back, overwriting the stored one.
    pub fn replace(&self, def: HologramDefinition) {
        self.definitions
            .write()
            .insert(def.id().to_string(), def);
    }

    pub fn save(&self, def: &HologramDefinition) -> Result<(), StoreError> {
        let path = self.record_path(def.id());
        fs::write(&path, record::encode(def)).map_err(|source| StoreError::Io { path, source })
    }

    pub fn save_all(&self) {
        for def in self.all() {
            if let Err(err) = self.save(&def) {
                error!("Couldn't save hologram {}: {}", def.id(), err);
            }
        }
    }

    /// Drops the definition and deletes its record file. Returns what was
    /// removed, or `None` for unknown ids.
    pub fn remove(&self, id: &str) -> Option<HologramDefinition> {
        let removed = self.definitions.write().remove(id)?;
        let path = self.record_path(id);
        if path.exists() {
            if let Err(err) = fs::remove_file(&path) {
                error!("Couldn't delete hologram record {:?}: {}", path, err);
            }
        }
        Some(removed)
    }

    /// Replaces the in-memory state with whatever the data directory holds.
    /// Records that fail to decode are skipped with a log line so one bad
    /// file never blocks the rest.
    pub fn load_all(&self) -> Vec<HologramDefinition> {
        let mut loaded = Vec::new();
        let entries = match fs::read_dir(&self.data_dir) {
            Ok(entries) => entries,
            Err(err) => {
                warn!(
                    "Couldn't read hologram data directory {:?}: {}",
                    self.data_dir, err
                );
                self.definitions.write().clear();
                return loaded;
            }
        };

        let mut definitions = self.definitions.write();
        definitions.clear();
        for entry in entries {
            let Ok(entry) = entry else {
                continue;
            };
            let path = entry.path();
            if path.extension().and_then(|ext| ext.to_str()) != Some(RECORD_EXTENSION) {
                continue;
            }
            let content = match fs::read_to_string(&path) {
                Ok(content) => content,
                Err(err) => {
                    warn!("Skipping unreadable hologram record {:?}: {}", path, err);
                    continue;
                }
            };
            match record::decode(&content) {
                Ok(def) if !Self::is_valid_id(def.id()) => {
                    warn!(
                        "Skipping hologram record {:?}: invalid id `{}`",
                        path,
                        def.id()
                    );
                }
                Ok(def) if definitions.contains_key(def.id()) => {
                    warn!(
                        "Skipping hologram record {:?}: duplicate id `{}`",
                        path,
                        def.id()
                    );
                }
                Ok(def) => {
                    definitions.insert(def.id().to_string(), def.clone());
                    loaded.push(def);
                }
                Err(err) => {
                    warn!("Skipping malformed hologram record {:?}: {}", path, err);
                }
            }
        }
        loaded
    }
}
