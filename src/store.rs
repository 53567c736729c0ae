//! Item persistence.
//!
//! [`ItemStore`] is the only boundary between the tracker and durable
//! storage: fetch everything once, then persist deltas as [`ChangeSet`]s.
//! [`MemoryStore`] keeps items in a `Vec`; [`FileStore`] keeps them in a JSON
//! snapshot file guarded by a lock file.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::item::{Item, ItemId};
use crate::lock::{lock_path_for, FileLock, DEFAULT_LOCK_TIMEOUT_MS};
use crate::storage;

const ITEMS_SCHEMA_VERSION: &str = "todo.items.v1";

/// Inserts, updates and deletes to persist in one save.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ChangeSet {
    /// Replaced by id, or appended when the id is new.
    pub upserts: Vec<Item>,
    pub deletes: Vec<ItemId>,
}

impl ChangeSet {
    pub fn upsert(item: Item) -> Self {
        Self {
            upserts: vec![item],
            deletes: Vec::new(),
        }
    }

    pub fn delete(id: ItemId) -> Self {
        Self {
            upserts: Vec::new(),
            deletes: vec![id],
        }
    }

    pub fn is_empty(&self) -> bool {
        self.upserts.is_empty() && self.deletes.is_empty()
    }

    /// Apply this delta to a collection, keeping existing order.
    pub fn apply_to(&self, items: &mut Vec<Item>) {
        for item in &self.upserts {
            match items.iter_mut().find(|existing| existing.id() == item.id()) {
                Some(existing) => *existing = item.clone(),
                None => items.push(item.clone()),
            }
        }
        if !self.deletes.is_empty() {
            let present: HashSet<&ItemId> = items.iter().map(Item::id).collect();
            for id in &self.deletes {
                if !present.contains(id) {
                    tracing::warn!(item = %id, "delete of unknown item ignored");
                }
            }
            let deletes: HashSet<&ItemId> = self.deletes.iter().collect();
            items.retain(|item| !deletes.contains(item.id()));
        }
    }
}

pub trait ItemStore {
    /// Every stored item.
    fn fetch_all(&self) -> Result<Vec<Item>>;

    /// Persist a delta.
    fn save(&mut self, changes: &ChangeSet) -> Result<()>;

    fn delete(&mut self, id: &ItemId) -> Result<()> {
        self.save(&ChangeSet::delete(id.clone()))
    }
}

impl<S: ItemStore + ?Sized> ItemStore for Box<S> {
    fn fetch_all(&self) -> Result<Vec<Item>> {
        (**self).fetch_all()
    }

    fn save(&mut self, changes: &ChangeSet) -> Result<()> {
        (**self).save(changes)
    }

    fn delete(&mut self, id: &ItemId) -> Result<()> {
        (**self).delete(id)
    }
}

/// Items held in memory only; nothing survives the process.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    items: Vec<Item>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_items(items: Vec<Item>) -> Self {
        Self { items }
    }
}

impl ItemStore for MemoryStore {
    fn fetch_all(&self) -> Result<Vec<Item>> {
        Ok(self.items.clone())
    }

    fn save(&mut self, changes: &ChangeSet) -> Result<()> {
        changes.apply_to(&mut self.items);
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ItemSnapshot {
    pub schema_version: String,
    pub generated_at: DateTime<Utc>,
    pub items: Vec<Item>,
}

impl ItemSnapshot {
    pub fn empty() -> Self {
        Self {
            schema_version: ITEMS_SCHEMA_VERSION.to_string(),
            generated_at: Utc::now(),
            items: Vec::new(),
        }
    }
}

/// Items in a JSON snapshot file.
#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
    lock_timeout_ms: u64,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock_timeout_ms: DEFAULT_LOCK_TIMEOUT_MS,
        }
    }

    pub fn with_lock_timeout(mut self, timeout_ms: u64) -> Self {
        self.lock_timeout_ms = timeout_ms;
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load_snapshot(&self) -> Result<ItemSnapshot> {
        let Some(snapshot) = storage::read_json::<ItemSnapshot>(&self.path)? else {
            return Ok(ItemSnapshot::empty());
        };
        if snapshot.schema_version != ITEMS_SCHEMA_VERSION {
            return Err(Error::CorruptData(format!(
                "unsupported schema '{}' in {}",
                snapshot.schema_version,
                self.path.display()
            )));
        }
        Ok(snapshot)
    }
}

impl ItemStore for FileStore {
    fn fetch_all(&self) -> Result<Vec<Item>> {
        let snapshot = self.load_snapshot()?;
        tracing::debug!(
            path = %self.path.display(),
            items = snapshot.items.len(),
            "loaded item snapshot"
        );
        Ok(snapshot.items)
    }

    fn save(&mut self, changes: &ChangeSet) -> Result<()> {
        if changes.is_empty() {
            return Ok(());
        }
        let _lock = FileLock::acquire(lock_path_for(&self.path), self.lock_timeout_ms)?;
        let mut snapshot = self.load_snapshot()?;
        changes.apply_to(&mut snapshot.items);
        snapshot.generated_at = Utc::now();
        storage::write_json(&self.path, &snapshot)?;
        tracing::debug!(
            path = %self.path.display(),
            upserts = changes.upserts.len(),
            deletes = changes.deletes.len(),
            "saved item snapshot"
        );
        Ok(())
    }
}
