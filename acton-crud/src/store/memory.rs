//! In-memory store
//!
//! Keeps [`Record`]s in insertion order. Useful for prototyping an admin
//! screen before a database exists, and for tests.

use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use parking_lot::RwLock;

use super::CrudStore;
use crate::error::CrudError;
use crate::item::Record;

/// Validation hook for [`MemoryStore`]
pub type Validator = Box<dyn Fn(&Record) -> Option<String> + Send + Sync>;

/// [`CrudStore`] backed by a vector of [`Record`]s
pub struct MemoryStore {
    records: RwLock<Vec<Record>>,
    next_id: AtomicU64,
    validator: Option<Validator>,
}

impl std::fmt::Debug for MemoryStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemoryStore")
            .field("records", &self.records.read().len())
            .field("next_id", &self.next_id.load(Ordering::Relaxed))
            .field("validator", &self.validator.is_some())
            .finish()
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryStore {
    /// Create an empty store; ids start at 1
    #[must_use]
    pub fn new() -> Self {
        Self {
            records: RwLock::new(Vec::new()),
            next_id: AtomicU64::new(1),
            validator: None,
        }
    }

    /// Create a store seeded with records
    ///
    /// Records without an id are assigned one.
    #[must_use]
    pub fn with_records(records: impl IntoIterator<Item = Record>) -> Self {
        let store = Self::new();
        for mut record in records {
            store.insert(&mut record);
        }
        store
    }

    /// Reject saves for which `validator` returns a message
    #[must_use]
    pub fn with_validator<F>(mut self, validator: F) -> Self
    where
        F: Fn(&Record) -> Option<String> + Send + Sync + 'static,
    {
        self.validator = Some(Box::new(validator));
        self
    }

    /// Number of stored records
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.read().len()
    }

    /// Whether the store is empty
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.read().is_empty()
    }

    /// Snapshot of a stored record
    #[must_use]
    pub fn get(&self, id: &str) -> Option<Record> {
        self.records
            .read()
            .iter()
            .find(|record| record.id.as_deref() == Some(id))
            .cloned()
    }

    fn insert(&self, record: &mut Record) {
        // Keep generated ids ahead of any numeric id supplied by the caller
        if let Some(numeric) = record.id.as_deref().and_then(|id| id.parse::<u64>().ok()) {
            self.next_id.fetch_max(numeric.saturating_add(1), Ordering::Relaxed);
        }
        if record.id.is_none() {
            let id = self.next_id.fetch_add(1, Ordering::Relaxed);
            record.id = Some(id.to_string());
        }

        let mut records = self.records.write();
        match records.iter_mut().find(|stored| stored.id == record.id) {
            Some(stored) => stored.clone_from(record),
            None => records.push(record.clone()),
        }
    }
}

#[async_trait]
impl CrudStore for MemoryStore {
    type Item = Record;

    async fn create_item(&self) -> Result<Record, CrudError> {
        Ok(Record::new())
    }

    async fn fetch_item(&self, id: &str) -> Result<Option<Record>, CrudError> {
        Ok(self.get(id))
    }

    async fn save_item(&self, item: &mut Record) -> Result<(), CrudError> {
        self.insert(item);
        Ok(())
    }

    async fn delete_item(&self, item: &Record) -> Result<(), CrudError> {
        let Some(id) = item.id.as_deref() else {
            return Err(CrudError::ItemNotFound("<unsaved>".to_string()));
        };

        let mut records = self.records.write();
        let before = records.len();
        records.retain(|record| record.id.as_deref() != Some(id));
        if records.len() == before {
            return Err(CrudError::ItemNotFound(id.to_string()));
        }
        Ok(())
    }

    async fn fetch_all_items(&self) -> Result<Vec<Record>, CrudError> {
        Ok(self.records.read().clone())
    }

    fn validate_item(&self, item: &Record) -> Option<String> {
        self.validator.as_ref().and_then(|validate| validate(item))
    }
}
