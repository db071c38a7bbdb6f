//! Generic list/edit controller
//!
//! A [`CrudController`] pairs a [`CrudStore`] with a declarative field
//! schema and turns requests into page view models:
//!
//! - [`CrudController::render_list`] handles row/bulk deletes and builds the
//!   table shown on the list screen
//! - [`CrudController::render_form`] handles edit submissions and builds the
//!   edit form
//!
//! # Example
//!
//! ```rust
//! use acton_crud::prelude::*;
//!
//! # fn main() -> Result<(), CrudError> {
//! let mut contacts = CrudController::new("Contact", MemoryStore::new());
//! contacts.set_description("People we keep in touch with");
//! contacts.add_field("name").with_label("Name");
//! contacts
//!     .add_field("status")
//!     .with_label("Status")
//!     .with_options([(1, "Active"), (2, "Inactive")]);
//! contacts.add_field("met_at").with_label("Met").with_type("timestamp")?;
//! contacts.set_list_fields(["name", "status", "met_at"]);
//!
//! assert_eq!(contacts.type_id(), "contact");
//! # Ok(())
//! # }
//! ```

mod form;
mod list;

pub use form::{FormFieldView, FormPage, FormRequest, OptionView};
pub use list::{BulkAction, Cell, Column, ListPage, ListRequest, Row, RowAction};

use std::borrow::Cow;

use chrono_tz::Tz;

use crate::config::parse_timezone;
use crate::csrf::CsrfTokens;
use crate::error::CrudError;
use crate::fields::FieldSpec;
use crate::item::FieldAccess;
use crate::resources::AssetUrls;
use crate::store::CrudStore;

/// Controller for one managed entity type
pub struct CrudController<S: CrudStore> {
    store: S,
    type_name: String,
    type_id: String,
    fields: Vec<FieldSpec>,
    list_fields: Vec<String>,
    edit_fields: Vec<String>,
    description: Option<String>,
    submenu_slug: Option<String>,
    timezone: Option<Tz>,
    base_path: String,
    csrf: CsrfTokens,
    assets: Option<AssetUrls>,
}

impl<S: CrudStore> std::fmt::Debug for CrudController<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CrudController")
            .field("type_name", &self.type_name)
            .field("type_id", &self.type_id)
            .field("fields", &self.fields)
            .field("list_fields", &self.list_fields)
            .field("edit_fields", &self.edit_fields)
            .field("base_path", &self.base_path)
            .finish_non_exhaustive()
    }
}

impl<S: CrudStore> CrudController<S> {
    /// Create a controller for the entity named `type_name`
    #[must_use]
    pub fn new(type_name: impl Into<String>, store: S) -> Self {
        let mut controller = Self {
            store,
            type_name: String::new(),
            type_id: String::new(),
            fields: Vec::new(),
            list_fields: Vec::new(),
            edit_fields: Vec::new(),
            description: None,
            submenu_slug: None,
            timezone: None,
            base_path: "/admin".to_string(),
            csrf: CsrfTokens::default(),
            assets: None,
        };
        controller.set_type_name(type_name);
        controller
    }

    /// The backing store
    pub const fn store(&self) -> &S {
        &self.store
    }

    /// Set the human-readable entity name
    ///
    /// Also derives the type id: lowercase, spaces removed.
    pub fn set_type_name(&mut self, type_name: impl Into<String>) -> &mut Self {
        self.type_name = type_name.into();
        self.type_id = self.type_name.replace(' ', "").to_lowercase();
        self
    }

    /// Human-readable entity name
    #[must_use]
    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    /// Screen identifier derived from the type name
    #[must_use]
    pub fn type_id(&self) -> &str {
        &self.type_id
    }

    /// Set the text shown above the list table
    pub fn set_description(&mut self, description: impl Into<String>) -> &mut Self {
        self.description = Some(description.into());
        self
    }

    /// Text shown above the list table
    #[must_use]
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Place the list screen under a parent menu instead of the top level
    pub fn set_submenu_slug(&mut self, slug: impl Into<String>) -> &mut Self {
        self.submenu_slug = Some(slug.into());
        self
    }

    /// Parent menu slug
    #[must_use]
    pub fn submenu_slug(&self) -> Option<&str> {
        self.submenu_slug.as_deref()
    }

    /// Set the timezone used for timestamp fields
    ///
    /// # Errors
    ///
    /// Returns [`CrudError::Config`] if `name` is not a known IANA timezone.
    pub fn set_timezone(&mut self, name: &str) -> Result<&mut Self, CrudError> {
        self.timezone = Some(parse_timezone(name)?);
        Ok(self)
    }

    /// Timezone used for timestamp fields (UTC unless configured)
    #[must_use]
    pub fn timezone(&self) -> Tz {
        self.timezone.unwrap_or(Tz::UTC)
    }

    /// Set the path prefix used when building links
    pub fn set_base_path(&mut self, base_path: impl Into<String>) -> &mut Self {
        self.base_path = base_path.into();
        self
    }

    /// Set the CSRF token issuer
    pub fn set_csrf(&mut self, csrf: CsrfTokens) -> &mut Self {
        self.csrf = csrf;
        self
    }

    pub(crate) fn set_assets(&mut self, assets: AssetUrls) {
        self.assets = Some(assets);
    }

    pub(crate) fn set_default_timezone(&mut self, tz: Tz) {
        self.timezone.get_or_insert(tz);
    }

    /// Declare a field, or get the existing spec if already declared
    ///
    /// Returns the single stored spec for `name`, so repeated calls configure
    /// the same field.
    pub fn add_field(&mut self, name: &str) -> &mut FieldSpec {
        let index = match self.fields.iter().position(|spec| spec.name() == name) {
            Some(index) => index,
            None => {
                self.fields.push(FieldSpec::new(name));
                self.fields.len() - 1
            }
        };
        &mut self.fields[index]
    }

    /// Look up a declared field
    #[must_use]
    pub fn field_spec(&self, name: &str) -> Option<&FieldSpec> {
        self.fields.iter().find(|spec| spec.name() == name)
    }

    /// All declared fields in declaration order
    #[must_use]
    pub fn fields(&self) -> &[FieldSpec] {
        &self.fields
    }

    /// Choose and order the columns of the list screen
    ///
    /// Names not yet declared are declared as text fields.
    pub fn set_list_fields<I, N>(&mut self, names: I) -> &mut Self
    where
        I: IntoIterator<Item = N>,
        N: Into<String>,
    {
        self.list_fields = self.declare_all(names);
        self
    }

    /// Choose and order the inputs of the edit screen
    ///
    /// Names not yet declared are declared as text fields.
    pub fn set_edit_fields<I, N>(&mut self, names: I) -> &mut Self
    where
        I: IntoIterator<Item = N>,
        N: Into<String>,
    {
        self.edit_fields = self.declare_all(names);
        self
    }

    /// Fields shown on the list screen; all declared fields if unset
    #[must_use]
    pub fn list_fields(&self) -> Vec<&str> {
        self.subset_or_all(&self.list_fields)
    }

    /// Fields shown on the edit screen; all declared fields if unset
    #[must_use]
    pub fn edit_fields(&self) -> Vec<&str> {
        self.subset_or_all(&self.edit_fields)
    }

    /// List screen columns: the selection checkbox, then one per list field
    #[must_use]
    pub fn columns(&self) -> Vec<Column> {
        std::iter::once(Column::checkbox())
            .chain(self.list_fields().into_iter().map(|name| {
                let spec = self.spec_for(name);
                Column::field(name, spec.label())
            }))
            .collect()
    }

    /// URL of the list screen
    #[must_use]
    pub fn list_url(&self) -> String {
        format!("{}/{}", self.base_path, self.type_id)
    }

    /// URL of the edit screen, for an existing item or a new one
    #[must_use]
    pub fn form_url(&self, id: Option<&str>) -> String {
        match id {
            Some(id) => format!(
                "{}/{}/form?id={}",
                self.base_path,
                self.type_id,
                urlencoding::encode(id)
            ),
            None => format!("{}/{}/form", self.base_path, self.type_id),
        }
    }

    /// URL deleting a single item from the list screen
    #[must_use]
    pub fn delete_url(&self, id: &str) -> String {
        format!("{}?action=delete&id={}", self.list_url(), urlencoding::encode(id))
    }

    /// Action name CSRF tokens of the edit screen are bound to
    #[must_use]
    pub fn form_action(&self) -> String {
        format!("{}_form", self.type_id)
    }

    fn declare_all<I, N>(&mut self, names: I) -> Vec<String>
    where
        I: IntoIterator<Item = N>,
        N: Into<String>,
    {
        names
            .into_iter()
            .map(|name| {
                let name = name.into();
                self.add_field(&name);
                name
            })
            .collect()
    }

    fn subset_or_all<'a>(&'a self, subset: &'a [String]) -> Vec<&'a str> {
        if subset.is_empty() {
            self.fields.iter().map(FieldSpec::name).collect()
        } else {
            subset.iter().map(String::as_str).collect()
        }
    }

    fn spec_for(&self, name: &str) -> Cow<'_, FieldSpec> {
        self.field_spec(name)
            .map_or_else(|| Cow::Owned(FieldSpec::new(name)), Cow::Borrowed)
    }

    /// Load the item with `id`, or create a new one when no id is given or
    /// no item has that id
    async fn resolve_item(&self, id: Option<&str>) -> Result<S::Item, CrudError> {
        if let Some(id) = id {
            if let Some(item) = self.store.fetch_item(id).await? {
                return Ok(item);
            }
            tracing::debug!(
                type_id = %self.type_id,
                item_id = %id,
                "Item not found, editing a new item"
            );
        }
        self.store.create_item().await
    }

    /// Delete each listed item that can be fetched; returns how many were deleted
    ///
    /// Items are processed one at a time. A failure on one id is logged and
    /// does not stop the others.
    async fn delete_items(&self, ids: &[String]) -> usize {
        let mut deleted = 0;
        for id in ids {
            let item = match self.store.fetch_item(id).await {
                Ok(Some(item)) => item,
                Ok(None) => {
                    tracing::debug!(type_id = %self.type_id, item_id = %id, "Delete skipped, item not found");
                    continue;
                }
                Err(error) => {
                    tracing::warn!(type_id = %self.type_id, item_id = %id, %error, "Delete skipped, fetch failed");
                    continue;
                }
            };
            match self.store.delete_item(&item).await {
                Ok(()) => {
                    tracing::info!(type_id = %self.type_id, item_id = %id, "Item deleted");
                    deleted += 1;
                }
                Err(error) => {
                    tracing::warn!(type_id = %self.type_id, item_id = %id, %error, "Delete failed");
                }
            }
        }
        deleted
    }

    fn item_id(item: &S::Item) -> String {
        item.id().unwrap_or_default()
    }
}
