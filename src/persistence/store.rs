//! Storage backends for saved portfolios

use super::snapshot::PortfolioRecord;
use super::PersistenceResult;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Per-user key-value sink for saved portfolios
pub trait SnapshotStore {
    /// Saved events of `user`, or `None` if nothing was ever saved for them
    fn load(&self, user: &str) -> PersistenceResult<Option<Vec<PortfolioRecord>>>;

    /// Replace the saved events of `user`
    fn save(&mut self, user: &str, events: &[PortfolioRecord]) -> PersistenceResult<()>;
}

/// Volatile store, mostly for tests and demos
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    users: HashMap<String, Vec<PortfolioRecord>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn users(&self) -> impl Iterator<Item = &str> {
        self.users.keys().map(String::as_str)
    }
}

impl SnapshotStore for MemoryStore {
    fn load(&self, user: &str) -> PersistenceResult<Option<Vec<PortfolioRecord>>> {
        Ok(self.users.get(user).cloned())
    }

    fn save(&mut self, user: &str, events: &[PortfolioRecord]) -> PersistenceResult<()> {
        self.users.insert(user.to_string(), events.to_vec());
        Ok(())
    }
}

/// Saved state of one user. Keys other than `events` are kept as found.
#[derive(Debug, Default, Serialize, Deserialize)]
struct UserRecord {
    #[serde(default)]
    events: Vec<PortfolioRecord>,
    #[serde(flatten)]
    extra: Map<String, Value>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct StoreDocument {
    #[serde(default)]
    users: IndexMap<String, UserRecord>,
    #[serde(flatten)]
    extra: Map<String, Value>,
}

/// All users in one JSON document: `{"users": {name: {"events": [...]}}}`
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl AsRef<Path>) -> Self {
        JsonFileStore {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_document(&self) -> PersistenceResult<StoreDocument> {
        if !self.path.exists() {
            debug!("Store file {:?} does not exist yet", self.path);
            return Ok(StoreDocument::default());
        }
        let text = std::fs::read_to_string(&self.path)?;
        if text.trim().is_empty() {
            return Ok(StoreDocument::default());
        }
        Ok(serde_json::from_str(&text)?)
    }

    fn write_document(&self, document: &StoreDocument) -> PersistenceResult<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        let text = serde_json::to_string_pretty(document)?;
        std::fs::write(&self.path, text)?;
        Ok(())
    }

    /// Names of every user in the document
    pub fn users(&self) -> PersistenceResult<Vec<String>> {
        Ok(self.read_document()?.users.into_keys().collect())
    }
}

impl SnapshotStore for JsonFileStore {
    fn load(&self, user: &str) -> PersistenceResult<Option<Vec<PortfolioRecord>>> {
        let mut document = self.read_document()?;
        let events = document.users.swap_remove(user).map(|record| record.events);
        if let Some(events) = &events {
            info!("Loaded {} events for user {} from {:?}", events.len(), user, self.path);
        }
        Ok(events)
    }

    fn save(&mut self, user: &str, events: &[PortfolioRecord]) -> PersistenceResult<()> {
        let mut document = self.read_document()?;
        document.users.entry(user.to_string()).or_default().events = events.to_vec();
        self.write_document(&document)?;
        info!("Saved {} events for user {} to {:?}", events.len(), user, self.path);
        Ok(())
    }
}
