//! acton-crud: declarative list/edit admin screens for axum applications
//!
//! Describe an entity type once (its name, fields and where its items are
//! stored) and get a list screen with row and bulk delete plus
//! an edit form with type-aware input handling.
//!
//! # Design Principles
//!
//! 1. **Declarative Schema**: fields are declared with a label, a type tag
//!    (`text`, `select`, `timestamp`) and optional select options
//! 2. **Pluggable Persistence**: every store operation goes through the
//!    [`CrudStore`](store::CrudStore) trait
//! 3. **Security by Default**: edit submissions require a CSRF token
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use acton_crud::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     acton_crud::observability::init()?;
//!     let config = CrudConfig::load_for_service("contacts")?;
//!
//!     let mut contacts = CrudController::new("Contact", MemoryStore::new());
//!     contacts.add_field("name").with_label("Name");
//!     contacts
//!         .add_field("status")
//!         .with_label("Status")
//!         .with_options([(1, "Active"), (2, "Inactive")]);
//!     contacts.add_field("met_at").with_label("Met").with_type("timestamp")?;
//!
//!     let app = AdminRouter::new(&config)?.register(contacts)?.into_router();
//!
//!     let listener = tokio::net::TcpListener::bind("127.0.0.1:3000").await?;
//!     axum::serve(listener, app).await?;
//!     Ok(())
//! }
//! ```

// Lint configuration is handled at the workspace level in Cargo.toml

pub mod config;
pub mod controller;
pub mod csrf;
pub mod error;
pub mod fields;
pub mod handlers;
pub mod item;
pub mod observability;
pub mod resources;
pub mod router;
pub mod store;
pub mod template;

pub mod prelude {
    //! Convenience re-exports for common types and traits
    //!
    //! # Examples
    //!
    //! ```rust
    //! use acton_crud::prelude::*;
    //! ```

    // Entity schema and controller
    pub use crate::controller::{CrudController, FormPage, FormRequest, ListPage, ListRequest};
    pub use crate::fields::{FieldSpec, FieldType, SelectOption};

    // Persistence
    pub use crate::item::{FieldAccess, Record};
    pub use crate::store::{CrudStore, MemoryStore};

    // Routing
    pub use crate::router::{AdminRouter, MenuEntry};

    // Configuration
    pub use crate::config::CrudConfig;
    pub use crate::csrf::CsrfTokens;

    // Error types
    pub use crate::error::CrudError;

    // Re-export key dependencies
    pub use async_trait::async_trait;
    pub use axum;
    pub use serde_json::{json, Value};
}
