//! Admin router and menu registry
//!
//! [`AdminRouter`] collects the entity types of an application, mounts their
//! list and edit screens below the configured base path and records the menu
//! entries the surrounding admin UI should show.
//!
//! # Example
//!
//! ```rust
//! use acton_crud::prelude::*;
//!
//! # fn main() -> Result<(), CrudError> {
//! let mut contacts = CrudController::new("Contact", MemoryStore::new());
//! contacts.add_field("name").with_label("Name");
//!
//! let admin = AdminRouter::new(&CrudConfig::default())?.register(contacts)?;
//! assert_eq!(admin.menu()[0].path, "/admin/contact");
//!
//! let app: axum::Router = admin.into_router();
//! # Ok(())
//! # }
//! ```

use std::sync::Arc;

use axum::{routing::get, Router};
use chrono_tz::Tz;

use crate::config::CrudConfig;
use crate::controller::CrudController;
use crate::csrf::CsrfTokens;
use crate::error::CrudError;
use crate::handlers;
use crate::resources::AssetRegistry;
use crate::store::CrudStore;

/// Capability required for list screens
pub const MANAGE_CAPABILITY: &str = "manage_options";

/// Capability required for edit screens
pub const EDIT_CAPABILITY: &str = "activate_plugins";

/// One admin menu entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MenuEntry {
    /// Parent menu slug; `None` for top-level entries
    pub parent: Option<String>,
    /// Browser title of the screen
    pub page_title: String,
    /// Text shown in the menu
    pub menu_title: String,
    /// Capability a user needs to open the screen
    pub capability: &'static str,
    /// Screen identifier
    pub slug: String,
    /// Route of the screen
    pub path: String,
    /// Reachable by link only, not listed in the menu
    pub hidden: bool,
}

/// Builder for the admin routes of all registered entity types
pub struct AdminRouter {
    base_path: String,
    timezone: Tz,
    csrf: CsrfTokens,
    assets: AssetRegistry,
    router: Router,
    menu: Vec<MenuEntry>,
}

impl std::fmt::Debug for AdminRouter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AdminRouter")
            .field("base_path", &self.base_path)
            .field("timezone", &self.timezone)
            .field("menu", &self.menu)
            .finish_non_exhaustive()
    }
}

impl AdminRouter {
    /// Create the router and register the shared assets
    ///
    /// # Errors
    ///
    /// Returns [`CrudError::Config`] if the configured timezone is unknown.
    pub fn new(config: &CrudConfig) -> Result<Self, CrudError> {
        let base_path = config.admin.normalized_base_path();
        let timezone = config.admin.tz()?;
        let assets = AssetRegistry::register(&base_path, &config.admin.resource_path);

        tracing::info!(
            base_path = %base_path,
            timezone = %timezone,
            csrf_enabled = config.security.csrf_enabled,
            "Admin router created"
        );

        Ok(Self {
            base_path,
            timezone,
            csrf: CsrfTokens::from_settings(&config.security),
            assets,
            router: Router::new(),
            menu: Vec::new(),
        })
    }

    /// Mount the screens of one entity type and add its menu entries
    ///
    /// The controller inherits the router's base path, CSRF issuer and
    /// asset URLs, and its timezone unless it set its own.
    ///
    /// # Errors
    ///
    /// Returns [`CrudError::Config`] if the type id is empty, contains
    /// anything besides ASCII letters, digits, `-` and `_`, or is already
    /// registered.
    pub fn register<S: CrudStore>(
        mut self,
        mut controller: CrudController<S>,
    ) -> Result<Self, CrudError> {
        let type_id = controller.type_id().to_string();
        if type_id.is_empty() {
            return Err(CrudError::Config(
                "entity type name must not be empty".to_string(),
            ));
        }
        if !type_id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
        {
            return Err(CrudError::Config(format!(
                "entity type id '{type_id}' may only contain letters, digits, '-' and '_'"
            )));
        }
        if self.menu.iter().any(|entry| entry.slug == type_id) {
            return Err(CrudError::Config(format!(
                "entity type '{type_id}' is already registered"
            )));
        }

        controller
            .set_base_path(self.base_path.clone())
            .set_csrf(self.csrf.clone());
        controller.set_default_timezone(self.timezone);
        controller.set_assets(self.assets.urls().clone());

        let list_path = controller.list_url();
        let form_path = format!("{list_path}/form");
        self.menu.extend(menu_entries(&controller, &list_path, &form_path));

        let routes = Router::new()
            .route(
                &list_path,
                get(handlers::list_page::<S>).post(handlers::list_action::<S>),
            )
            .route(
                &form_path,
                get(handlers::form_page::<S>).post(handlers::form_submit::<S>),
            )
            .with_state(Arc::new(controller));
        self.router = self.router.merge(routes);

        tracing::info!(type_id = %type_id, path = %list_path, "Registered admin screens");
        Ok(self)
    }

    /// Menu entries of all registered types, in registration order
    #[must_use]
    pub fn menu(&self) -> &[MenuEntry] {
        &self.menu
    }

    /// Finish building: the entity routes plus the asset endpoint
    #[must_use]
    pub fn into_router(self) -> Router {
        self.router
            .route(self.assets.route(), get(handlers::resource))
    }
}

fn menu_entries<S: CrudStore>(
    controller: &CrudController<S>,
    list_path: &str,
    form_path: &str,
) -> [MenuEntry; 2] {
    let type_name = controller.type_name();
    let type_id = controller.type_id();

    let list = match controller.submenu_slug() {
        Some(parent) => MenuEntry {
            parent: Some(parent.to_string()),
            page_title: format!("Manage {type_name}"),
            menu_title: format!("Manage {type_name}"),
            capability: MANAGE_CAPABILITY,
            slug: type_id.to_string(),
            path: list_path.to_string(),
            hidden: false,
        },
        None => MenuEntry {
            parent: None,
            page_title: type_name.to_string(),
            menu_title: type_name.to_string(),
            capability: MANAGE_CAPABILITY,
            slug: type_id.to_string(),
            path: list_path.to_string(),
            hidden: false,
        },
    };

    let edit = MenuEntry {
        parent: None,
        page_title: format!("Edit {type_name}"),
        menu_title: format!("Edit {type_name}"),
        capability: EDIT_CAPABILITY,
        slug: controller.form_action(),
        path: form_path.to_string(),
        hidden: true,
    };

    [list, edit]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;

    fn controller(name: &str) -> CrudController<MemoryStore> {
        CrudController::new(name, MemoryStore::new())
    }

    #[test]
    fn test_top_level_menu() {
        let admin = AdminRouter::new(&CrudConfig::default())
            .unwrap()
            .register(controller("Event Venue"))
            .unwrap();

        let menu = admin.menu();
        assert_eq!(menu.len(), 2);
        assert_eq!(menu[0].parent, None);
        assert_eq!(menu[0].menu_title, "Event Venue");
        assert_eq!(menu[0].capability, MANAGE_CAPABILITY);
        assert_eq!(menu[0].slug, "eventvenue");
        assert_eq!(menu[0].path, "/admin/eventvenue");
        assert!(!menu[0].hidden);

        assert_eq!(menu[1].menu_title, "Edit Event Venue");
        assert_eq!(menu[1].slug, "eventvenue_form");
        assert_eq!(menu[1].path, "/admin/eventvenue/form");
        assert_eq!(menu[1].capability, EDIT_CAPABILITY);
        assert!(menu[1].hidden);
    }

    #[test]
    fn test_submenu_entry() {
        let mut ctl = controller("Speaker");
        ctl.set_submenu_slug("conference");
        let mut config = CrudConfig::default();
        config.admin.base_path = "/backoffice/".into();

        let admin = AdminRouter::new(&config).unwrap().register(ctl).unwrap();
        let entry = &admin.menu()[0];
        assert_eq!(entry.parent.as_deref(), Some("conference"));
        assert_eq!(entry.page_title, "Manage Speaker");
        assert_eq!(entry.path, "/backoffice/speaker");
    }

    #[test]
    fn test_duplicate_registration_is_rejected() {
        let admin = AdminRouter::new(&CrudConfig::default())
            .unwrap()
            .register(controller("Speaker"))
            .unwrap();
        let err = admin.register(controller("speaker")).unwrap_err();
        assert!(matches!(err, CrudError::Config(ref msg) if msg.contains("already registered")));
    }

    #[test]
    fn test_type_id_outside_url_segment_is_rejected() {
        let admin = AdminRouter::new(&CrudConfig::default()).unwrap();
        let err = admin.register(controller("Q&A / FAQ?")).unwrap_err();
        assert!(matches!(err, CrudError::Config(ref msg) if msg.contains("q&a/faq?")));

        let admin = AdminRouter::new(&CrudConfig::default()).unwrap();
        assert!(admin.register(controller("Event_Venue-2")).is_ok());
    }

    #[test]
    fn test_unknown_timezone_is_rejected() {
        let mut config = CrudConfig::default();
        config.admin.timezone = "Atlantis/Central".into();
        assert!(matches!(
            AdminRouter::new(&config),
            Err(CrudError::Config(_))
        ));
    }
}
