//! Persistence hooks for managed entities
//!
//! A [`CrudStore`] supplies everything the controller cannot know about an
//! entity: how items are created, loaded, saved, deleted and listed, and
//! optionally how they are validated. Field access defaults to the item's
//! [`FieldAccess`] implementation and can be overridden per store.
//!
//! # Example
//!
//! ```rust
//! use acton_crud::prelude::*;
//!
//! struct Notes;
//!
//! #[async_trait]
//! impl CrudStore for Notes {
//!     type Item = Record;
//!
//!     async fn create_item(&self) -> Result<Record, CrudError> {
//!         Ok(Record::new())
//!     }
//!
//!     async fn fetch_item(&self, _id: &str) -> Result<Option<Record>, CrudError> {
//!         Ok(None)
//!     }
//!
//!     async fn save_item(&self, _item: &mut Record) -> Result<(), CrudError> {
//!         Ok(())
//!     }
//!
//!     async fn delete_item(&self, _item: &Record) -> Result<(), CrudError> {
//!         Ok(())
//!     }
//!
//!     async fn fetch_all_items(&self) -> Result<Vec<Record>, CrudError> {
//!         Ok(Vec::new())
//!     }
//! }
//! ```

mod memory;

pub use memory::{MemoryStore, Validator};

use async_trait::async_trait;
use serde_json::Value;

use crate::error::CrudError;
use crate::item::FieldAccess;

/// Persistence contract implemented once per managed entity type
#[async_trait]
pub trait CrudStore: Send + Sync + 'static {
    /// Item type managed by this store
    type Item: FieldAccess + Send + Sync;

    /// Create a new, unsaved item
    async fn create_item(&self) -> Result<Self::Item, CrudError>;

    /// Load an item by id, `None` if it does not exist
    async fn fetch_item(&self, id: &str) -> Result<Option<Self::Item>, CrudError>;

    /// Persist an item, assigning an id if it has none
    async fn save_item(&self, item: &mut Self::Item) -> Result<(), CrudError>;

    /// Remove an item
    async fn delete_item(&self, item: &Self::Item) -> Result<(), CrudError>;

    /// Load every item shown on the list screen
    async fn fetch_all_items(&self) -> Result<Vec<Self::Item>, CrudError>;

    /// Read a field value from an item
    fn get_field_value(&self, item: &Self::Item, field: &str) -> Result<Value, CrudError> {
        item.get_field(field)
    }

    /// Write a field value to an item
    fn set_field_value(
        &self,
        item: &mut Self::Item,
        field: &str,
        value: Value,
    ) -> Result<(), CrudError> {
        item.set_field(field, value)
    }

    /// Check an item before it is saved
    ///
    /// Returns a message to show the user when the item must not be saved.
    fn validate_item(&self, _item: &Self::Item) -> Option<String> {
        None
    }
}
