//! HTTP handlers for the admin screens
//!
//! Each registered entity type gets its own copy of the list and form
//! handlers, with its [`CrudController`] as router state.
//!
//! # Example Usage
//!
//! ```rust
//! use std::sync::Arc;
//!
//! use acton_crud::handlers;
//! use acton_crud::prelude::*;
//! use axum::{routing::get, Router};
//!
//! let controller = Arc::new(CrudController::new("Contact", MemoryStore::new()));
//! let app: Router = Router::new()
//!     .route(
//!         "/admin/contact",
//!         get(handlers::list_page::<MemoryStore>).post(handlers::list_action::<MemoryStore>),
//!     )
//!     .with_state(controller);
//! ```

use std::sync::Arc;

use axum::{
    extract::{Query, State},
    response::{Html, Response},
    Form,
};
use serde::Deserialize;

use crate::controller::{CrudController, FormRequest, ListRequest};
use crate::error::CrudError;
use crate::resources;
use crate::store::CrudStore;
use crate::template::{render_html, FormTemplate, ListTemplate};

/// Urlencoded key/value pairs, order and repeats preserved
type Pairs = Vec<(String, String)>;

/// Query parameters of the asset endpoint
#[derive(Debug, Deserialize)]
pub struct ResourceQuery {
    /// Asset name
    pub res: Option<String>,
}

/// Show the list screen
///
/// Row delete links arrive here as `?action=delete&id=...`.
///
/// # Errors
///
/// Returns an error if the store fails or the page cannot be rendered.
pub async fn list_page<S: CrudStore>(
    State(controller): State<Arc<CrudController<S>>>,
    Query(query): Query<Pairs>,
) -> Result<Html<String>, CrudError> {
    render_list(&controller, &ListRequest::from_pairs(query)).await
}

/// Handle a bulk action posted from the list screen
///
/// # Errors
///
/// Returns an error if the store fails or the page cannot be rendered.
pub async fn list_action<S: CrudStore>(
    State(controller): State<Arc<CrudController<S>>>,
    Query(query): Query<Pairs>,
    Form(body): Form<Pairs>,
) -> Result<Html<String>, CrudError> {
    let request = ListRequest::from_pairs(query.into_iter().chain(body));
    render_list(&controller, &request).await
}

/// Show the edit screen for a new item, or `?id=...` for an existing one
///
/// # Errors
///
/// Returns an error if the store fails or the page cannot be rendered.
pub async fn form_page<S: CrudStore>(
    State(controller): State<Arc<CrudController<S>>>,
    Query(query): Query<Pairs>,
) -> Result<Html<String>, CrudError> {
    render_form(&controller, &FormRequest::from_pairs(query)).await
}

/// Save a submitted edit form
///
/// # Errors
///
/// Returns an error if the store fails or the page cannot be rendered.
pub async fn form_submit<S: CrudStore>(
    State(controller): State<Arc<CrudController<S>>>,
    Query(query): Query<Pairs>,
    Form(body): Form<Pairs>,
) -> Result<Html<String>, CrudError> {
    let request = FormRequest::from_pairs(query.into_iter().chain(body));
    render_form(&controller, &request).await
}

/// Serve an embedded asset; unknown names get a 404
pub async fn resource(Query(query): Query<ResourceQuery>) -> Response {
    resources::serve(query.res.as_deref().unwrap_or_default())
}

async fn render_list<S: CrudStore>(
    controller: &CrudController<S>,
    request: &ListRequest,
) -> Result<Html<String>, CrudError> {
    tracing::debug!(
        type_id = %controller.type_id(),
        action = ?request.action,
        bulk_ids = request.bulk_ids.len(),
        "List request"
    );
    let page = controller.render_list(request).await?;
    render_html(&ListTemplate { page: &page }).inspect_err(|error| {
        tracing::error!(type_id = %controller.type_id(), %error, "Failed to render list page");
    })
}

async fn render_form<S: CrudStore>(
    controller: &CrudController<S>,
    request: &FormRequest,
) -> Result<Html<String>, CrudError> {
    tracing::debug!(
        type_id = %controller.type_id(),
        item_id = ?request.id,
        submitted = request.csrf_token.is_some(),
        "Form request"
    );
    let page = controller.render_form(request).await?;
    render_html(&FormTemplate { page: &page }).inspect_err(|error| {
        tracing::error!(type_id = %controller.type_id(), %error, "Failed to render form page");
    })
}
