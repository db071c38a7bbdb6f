//! Askama templates for the admin screens
//!
//! Templates live in `templates/crud/` and are compiled into the crate.
//! Output is HTML-escaped.

use askama::Template;
use axum::response::Html;

use crate::controller::{FormPage, ListPage};
use crate::error::CrudError;

/// List screen template
#[derive(Template)]
#[template(path = "crud/list.html")]
pub struct ListTemplate<'a> {
    /// Page view model
    pub page: &'a ListPage,
}

/// Edit screen template
#[derive(Template)]
#[template(path = "crud/form.html")]
pub struct FormTemplate<'a> {
    /// Page view model
    pub page: &'a FormPage,
}

/// Render a template into an HTML response body
///
/// # Errors
///
/// Returns [`CrudError::Template`] if rendering fails.
pub fn render_html<T: Template>(template: &T) -> Result<Html<String>, CrudError> {
    Ok(Html(template.render()?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::controller::{BulkAction, FormFieldView, OptionView};
    use crate::fields::FieldType;

    fn form_page() -> FormPage {
        FormPage {
            title: "Event".into(),
            type_id: "event".into(),
            item_id: Some("3".into()),
            action_url: "/admin/event/form".into(),
            back_url: "/admin/event".into(),
            csrf_field: "_csrf_token",
            csrf_token: "abc123".into(),
            fields: vec![
                FormFieldView {
                    name: "title".into(),
                    label: "Title".into(),
                    description: Some("Shown on the <b>poster</b>".into()),
                    field_type: FieldType::Text,
                    value: "Launch".into(),
                    options: Vec::new(),
                },
                FormFieldView {
                    name: "status".into(),
                    label: "Status".into(),
                    description: None,
                    field_type: FieldType::Select,
                    value: "2".into(),
                    options: vec![
                        OptionView {
                            value: "1".into(),
                            label: "Active".into(),
                            selected: false,
                        },
                        OptionView {
                            value: "2".into(),
                            label: "Inactive".into(),
                            selected: true,
                        },
                    ],
                },
            ],
            message: None,
            notice: Some("Title is required.".into()),
            script_url: None,
            style_url: None,
        }
    }

    #[test]
    fn test_form_template() {
        let page = form_page();
        let html = FormTemplate { page: &page }.render().unwrap();

        assert!(html.contains("abc123"));
        assert!(html.contains("Title is required."));
        assert!(html.contains(r#"<option value="2" selected>Inactive</option>"#));
        assert!(html.contains("&lt;b&gt;poster&lt;"));
        assert!(!html.contains("<script src="));
    }

    #[test]
    fn test_list_template_without_rows() {
        let page = ListPage {
            title: "Venue".into(),
            description: None,
            type_id: "venue".into(),
            message: Some("2 item(s) deleted.".into()),
            columns: Vec::new(),
            rows: Vec::new(),
            add_link: "/admin/venue/form".into(),
            action_url: "/admin/venue".into(),
            bulk_actions: vec![BulkAction {
                value: "delete".into(),
                label: "Delete".into(),
            }],
        };
        let html = render_html(&ListTemplate { page: &page }).unwrap().0;

        assert!(html.contains("2 item(s) deleted."));
        assert!(html.contains(r#"name="action2""#));
        assert!(html.contains("Add New"));
    }
}
