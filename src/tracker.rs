//! The tracker service.
//!
//! [`Tracker`] owns the in-memory collection and the store handle it was
//! opened with. Every mutation changes memory first and then saves the
//! delta. A failed save is logged and returned as [`Error::Store`]; the
//! in-memory change stays and nothing is retried.

use chrono::{DateTime, TimeZone, Utc};

use crate::error::{Error, Result};
use crate::item::{Item, ItemEdit, ItemId, NewItem, Status};
use crate::query::{self, ItemQuery};
use crate::seed;
use crate::stats::{self, Stats};
use crate::store::{ChangeSet, ItemStore};

pub struct Tracker<S: ItemStore> {
    store: S,
    items: Vec<Item>,
}

impl<S: ItemStore> Tracker<S> {
    /// Load every item from `store`.
    pub fn open(store: S) -> Result<Self> {
        let items = store.fetch_all().map_err(Error::store)?;
        tracing::debug!(items = items.len(), "tracker opened");
        Ok(Self { store, items })
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn items(&self) -> &[Item] {
        &self.items
    }

    pub fn get(&self, id: &ItemId) -> Option<&Item> {
        self.items.iter().find(|item| item.id() == id)
    }

    /// Resolve a full id or a unique prefix of one, ignoring case.
    pub fn resolve_id(&self, input: &str) -> Result<ItemId> {
        let candidate = ItemId::from(input);
        if candidate.as_str().is_empty() {
            return Err(Error::InvalidArgument("item id cannot be empty".to_string()));
        }
        if self.get(&candidate).is_some() {
            return Ok(candidate);
        }

        let mut matches: Vec<&ItemId> = self
            .items
            .iter()
            .map(Item::id)
            .filter(|id| id.as_str().starts_with(candidate.as_str()))
            .collect();
        matches.sort();
        matches.dedup();

        match matches.as_slice() {
            [] => Err(Error::ItemNotFound(input.trim().to_string())),
            [only] => Ok((*only).clone()),
            many => Err(Error::InvalidArgument(format!(
                "ambiguous item id '{}': {}",
                input.trim(),
                many.iter()
                    .map(|id| id.as_str())
                    .collect::<Vec<_>>()
                    .join(", ")
            ))),
        }
    }

    pub fn create(&mut self, new: NewItem, now: DateTime<Utc>) -> Result<Item> {
        let item = Item::create(new, now);
        self.items.push(item.clone());
        self.persist(ChangeSet::upsert(item.clone()))?;
        Ok(item)
    }

    pub fn edit(&mut self, id: &ItemId, edit: ItemEdit, now: DateTime<Utc>) -> Result<Item> {
        self.update(id, |item| {
            item.apply_edit(edit, now);
            Ok(())
        })
    }

    pub fn set_status(&mut self, id: &ItemId, status: Status, now: DateTime<Utc>) -> Result<Item> {
        self.update(id, |item| {
            item.set_status(status, now);
            Ok(())
        })
    }

    pub fn mark_complete(&mut self, id: &ItemId, now: DateTime<Utc>) -> Result<Item> {
        self.update(id, |item| {
            item.mark_complete(now);
            Ok(())
        })
    }

    pub fn start(&mut self, id: &ItemId, now: DateTime<Utc>) -> Result<Item> {
        self.update(id, |item| item.start(now))
    }

    /// Remove an item and return it.
    pub fn delete(&mut self, id: &ItemId) -> Result<Item> {
        let index = self.index_of(id)?;
        let removed = self.items.remove(index);
        if let Err(err) = self.store.delete(id) {
            tracing::error!(item = %id, error = %err, "failed to delete item from store");
            return Err(Error::store(err));
        }
        Ok(removed)
    }

    pub fn view(&self, query: &ItemQuery) -> Vec<&Item> {
        query::view(&self.items, query)
    }

    pub fn stats<Tz: TimeZone>(&self, now: &DateTime<Tz>, trend_window_days: u32) -> Stats {
        stats::aggregate(&self.items, now, trend_window_days)
    }

    /// Insert the sample items when the collection is empty. Returns how
    /// many were inserted.
    pub fn seed_if_empty<Tz: TimeZone>(&mut self, now: &DateTime<Tz>) -> Result<usize> {
        if !self.items.is_empty() {
            tracing::debug!(items = self.items.len(), "store not empty, skipping seed");
            return Ok(0);
        }
        self.load_sample_data(now)
    }

    /// Insert the sample items unconditionally.
    pub fn load_sample_data<Tz: TimeZone>(&mut self, now: &DateTime<Tz>) -> Result<usize> {
        let samples = seed::sample_items(now);
        let count = samples.len();
        self.items.extend(samples.iter().cloned());
        tracing::info!(count, "loading sample items");
        self.persist(ChangeSet {
            upserts: samples,
            deletes: Vec::new(),
        })?;
        Ok(count)
    }

    fn index_of(&self, id: &ItemId) -> Result<usize> {
        self.items
            .iter()
            .position(|item| item.id() == id)
            .ok_or_else(|| Error::ItemNotFound(id.to_string()))
    }

    fn update<F>(&mut self, id: &ItemId, change: F) -> Result<Item>
    where
        F: FnOnce(&mut Item) -> Result<()>,
    {
        let index = self.index_of(id)?;
        change(&mut self.items[index])?;
        let item = self.items[index].clone();
        self.persist(ChangeSet::upsert(item.clone()))?;
        Ok(item)
    }

    fn persist(&mut self, changes: ChangeSet) -> Result<()> {
        if let Err(err) = self.store.save(&changes) {
            tracing::error!(
                upserts = changes.upserts.len(),
                deletes = changes.deletes.len(),
                error = %err,
                "failed to save items"
            );
            return Err(Error::store(err));
        }
        Ok(())
    }
}
