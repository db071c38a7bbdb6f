//! Admin screens for two entity types
//!
//! Demonstrates:
//! - Configuration loading and observability initialization
//! - The built-in memory store with a validator
//! - A custom store over JSON objects
//! - Menu entries for the surrounding admin UI
//!
//! Run with: `cargo run --example contacts_admin`

use acton_crud::{observability, prelude::*};
use parking_lot::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};

/// Events kept as JSON objects, validated on save
#[derive(Default)]
struct EventStore {
    events: Mutex<Vec<Value>>,
    last_id: AtomicU64,
}

#[async_trait]
impl CrudStore for EventStore {
    type Item = Value;

    async fn create_item(&self) -> Result<Value, CrudError> {
        Ok(json!({}))
    }

    async fn fetch_item(&self, id: &str) -> Result<Option<Value>, CrudError> {
        Ok(self
            .events
            .lock()
            .iter()
            .find(|event| event.id().as_deref() == Some(id))
            .cloned())
    }

    async fn save_item(&self, item: &mut Value) -> Result<(), CrudError> {
        let mut events = self.events.lock();
        match item.id() {
            Some(id) => {
                if let Some(stored) = events.iter_mut().find(|e| e.id().as_deref() == Some(id.as_str())) {
                    stored.clone_from(item);
                }
            }
            None => {
                let id = self.last_id.fetch_add(1, Ordering::Relaxed) + 1;
                item.set_field("id", Value::from(id))?;
                events.push(item.clone());
            }
        }
        Ok(())
    }

    async fn delete_item(&self, item: &Value) -> Result<(), CrudError> {
        let id = item.id();
        self.events.lock().retain(|event| event.id() != id);
        Ok(())
    }

    async fn fetch_all_items(&self) -> Result<Vec<Value>, CrudError> {
        Ok(self.events.lock().clone())
    }

    fn validate_item(&self, item: &Value) -> Option<String> {
        let title = item.get("title").and_then(Value::as_str).unwrap_or_default();
        title.trim().is_empty().then(|| "An event needs a title.".to_string())
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    observability::init()?;

    let config = CrudConfig::load_for_service("contacts_admin")?;
    tracing::info!(
        base_path = %config.admin.base_path,
        timezone = %config.admin.timezone,
        "Configuration loaded"
    );

    let mut contacts = CrudController::new(
        "Contact",
        MemoryStore::with_records([
            Record::new().set("name", "Ada Lovelace").set("status", 1),
            Record::new().set("name", "Charles Babbage").set("status", 2),
        ]),
    );
    contacts.set_description("People we keep in touch with");
    contacts.add_field("name").with_label("Name");
    contacts
        .add_field("status")
        .with_label("Status")
        .with_options([(1, "Active"), (2, "Inactive")]);
    contacts
        .add_field("met_at")
        .with_label("Met")
        .with_description("When we first met")
        .with_type("timestamp")?;
    contacts.set_list_fields(["name", "status"]);

    let mut events = CrudController::new("Event", EventStore::default());
    events.set_submenu_slug("contact");
    events.add_field("title").with_label("Title");
    events.add_field("starts_at").with_label("Starts").with_type("timestamp")?;

    let admin = AdminRouter::new(&config)?
        .register(contacts)?
        .register(events)?;

    for entry in admin.menu().iter().filter(|entry| !entry.hidden) {
        tracing::info!(title = %entry.menu_title, path = %entry.path, "Menu entry");
    }

    let listener = tokio::net::TcpListener::bind("127.0.0.1:3000").await?;
    tracing::info!("Admin listening on http://127.0.0.1:3000/admin/contact");

    axum::serve(listener, admin.into_router()).await?;

    Ok(())
}
