//! Integration tests for the admin router
//!
//! Drives the list, form and asset endpoints end to end.

use std::time::Duration;

use acton_crud::prelude::*;
use axum::body::Body;
use axum_test::TestServer;
use http::{header, Request, StatusCode};
use tower::ServiceExt;

const SECRET: &str = "integration-secret";

fn config() -> CrudConfig {
    let mut config = CrudConfig::default();
    config.admin.timezone = "Europe/Stockholm".into();
    config.security.csrf_secret = Some(SECRET.into());
    config
}

fn token(action: &str) -> String {
    CsrfTokens::new(SECRET, Duration::from_secs(86400)).issue(action)
}

fn contacts<S: CrudStore<Item = Record>>(store: S) -> CrudController<S> {
    let mut ctl = CrudController::new("Contact", store);
    ctl.set_description("People we keep in touch with");
    ctl.add_field("name").with_label("Name");
    ctl.add_field("status")
        .with_label("Status")
        .with_options([(1, "Active"), (2, "Inactive")]);
    ctl.add_field("met_at")
        .with_label("Met")
        .with_type("timestamp")
        .unwrap();
    ctl
}

fn seeded() -> MemoryStore {
    MemoryStore::with_records([
        Record::with_id("1").set("name", "Ada").set("status", 1),
        Record::with_id("2").set("name", "Grace").set("status", 2),
        Record::with_id("3").set("name", "Linus").set("status", 1),
        Record::with_id("4")
            .set("name", "Barbara")
            .set("status", 2)
            .set("met_at", 1_705_321_800),
    ])
}

fn server<S: CrudStore<Item = Record>>(store: S) -> TestServer {
    let app = AdminRouter::new(&config())
        .unwrap()
        .register(contacts(store))
        .unwrap()
        .into_router();
    TestServer::new(app).unwrap()
}

/// Memory store whose lookups of item 2 fail
struct FlakyStore {
    inner: MemoryStore,
}

#[async_trait]
impl CrudStore for FlakyStore {
    type Item = Record;

    async fn create_item(&self) -> Result<Record, CrudError> {
        self.inner.create_item().await
    }

    async fn fetch_item(&self, id: &str) -> Result<Option<Record>, CrudError> {
        if id == "2" {
            return Err(CrudError::Store(anyhow::anyhow!("connection reset")));
        }
        self.inner.fetch_item(id).await
    }

    async fn save_item(&self, item: &mut Record) -> Result<(), CrudError> {
        self.inner.save_item(item).await
    }

    async fn delete_item(&self, item: &Record) -> Result<(), CrudError> {
        self.inner.delete_item(item).await
    }

    async fn fetch_all_items(&self) -> Result<Vec<Record>, CrudError> {
        self.inner.fetch_all_items().await
    }
}

#[tokio::test]
async fn test_list_page_renders_items() {
    let server = server(seeded());

    let response = server.get("/admin/contact").await;
    response.assert_status_ok();
    let html = response.text();

    assert!(html.contains("People we keep in touch with"));
    assert!(html.contains("Grace"));
    assert!(html.contains("Inactive"));
    // 2024-01-15 12:30 UTC in Stockholm
    assert!(html.contains("2024-01-15 13:30"));
    assert!(html.contains("Are you sure? This operation cannot be undone!"));
}

#[tokio::test]
async fn test_row_delete_link() {
    let server = server(seeded());

    let response = server
        .get("/admin/contact")
        .add_query_param("action", "delete")
        .add_query_param("id", "3")
        .await;
    response.assert_status_ok();
    let html = response.text();

    assert!(html.contains("Item deleted."));
    assert!(!html.contains("Linus"));
}

#[tokio::test]
async fn test_bulk_delete_skips_failing_items() {
    let server = server(FlakyStore { inner: seeded() });

    let response = server
        .post("/admin/contact")
        .form(&[
            ("action", "-1"),
            ("action2", "delete"),
            ("_bulkid[]", "1"),
            ("_bulkid[]", "2"),
            ("_bulkid[]", "4"),
        ])
        .await;
    response.assert_status_ok();
    let html = response.text();

    assert!(html.contains("2 item(s) deleted."));
    assert!(!html.contains("Ada"));
    assert!(html.contains("Grace"));
    assert!(html.contains("Linus"));
    assert!(!html.contains("Barbara"));
}

#[tokio::test]
async fn test_edit_form_shows_item() {
    let server = server(seeded());

    let response = server
        .get("/admin/contact/form")
        .add_query_param("id", "4")
        .await;
    response.assert_status_ok();
    let html = response.text();

    assert!(html.contains(r#"value="Barbara""#));
    assert!(html.contains(r#"<option value="2" selected>Inactive</option>"#));
    assert!(html.contains(r#"value="2024-01-15 13:30""#));
    assert!(html.contains("datetimepicker.js"));
    assert!(html.contains("_csrf_token"));
}

#[tokio::test]
async fn test_form_submission_saves_item() {
    let server = server(MemoryStore::new());

    let response = server
        .post("/admin/contact/form")
        .form(&[
            ("_csrf_token", token("contact_form").as_str()),
            ("name", "Margaret"),
            ("status", "1"),
            ("met_at", "2024-06-01 09:15"),
        ])
        .await;
    response.assert_status_ok();
    let html = response.text();

    assert!(html.contains("Contact saved."));
    assert!(html.contains(r#"name="id" value="1""#));

    let list = server.get("/admin/contact").await.text();
    assert!(list.contains("Margaret"));
    assert!(list.contains("2024-06-01 09:15"));
}

#[tokio::test]
async fn test_form_submission_with_bad_token_is_ignored() {
    let server = server(MemoryStore::new());

    let response = server
        .post("/admin/contact/form")
        .form(&[("_csrf_token", "forged"), ("name", "Mallory")])
        .await;
    response.assert_status_ok();
    assert!(!response.text().contains("Contact saved."));

    let list = server.get("/admin/contact").await.text();
    assert!(!list.contains("Mallory"));
}

#[tokio::test]
async fn test_validation_notice() {
    let store = MemoryStore::new().with_validator(|record| {
        record
            .get("name")
            .and_then(Value::as_str)
            .is_none_or(str::is_empty)
            .then(|| "Name is required.".to_string())
    });
    let server = server(store);

    let response = server
        .post("/admin/contact/form")
        .form(&[("_csrf_token", token("contact_form").as_str()), ("name", "")])
        .await;
    response.assert_status_ok();
    let html = response.text();

    assert!(html.contains("Name is required."));
    assert!(!html.contains("Contact saved."));
}

#[tokio::test]
async fn test_store_failure_is_a_server_error() {
    let server = server(FlakyStore { inner: seeded() });

    let response = server
        .get("/admin/contact/form")
        .add_query_param("id", "2")
        .expect_failure()
        .await;
    response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
}

#[tokio::test]
async fn test_resource_endpoint() {
    let server = server(MemoryStore::new());

    let response = server
        .get("/admin/crud-res")
        .add_query_param("res", "datetimepicker.css")
        .await;
    response.assert_status_ok();
    assert_eq!(response.header(header::CONTENT_TYPE), "text/css");

    let response = server
        .get("/admin/crud-res")
        .add_query_param("res", "secrets.txt")
        .expect_failure()
        .await;
    response.assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_script_served_as_javascript() {
    let app = AdminRouter::new(&CrudConfig::default())
        .unwrap()
        .into_router();

    let response = app
        .oneshot(
            Request::builder()
                .uri("/admin/crud-res?res=datetimepicker.js")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers().get(header::CONTENT_TYPE).unwrap(),
        "application/javascript"
    );
}
