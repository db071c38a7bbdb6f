//! List screen: row/bulk delete handling and table construction

use super::CrudController;
use crate::error::CrudError;
use crate::fields::{display_value, value_text};
use crate::store::CrudStore;

/// Confirmation prompt attached to single-item delete links
pub const DELETE_CONFIRMATION: &str = "Are you sure? This operation cannot be undone!";

/// Decoded list screen request
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListRequest {
    /// Requested action (`delete`), from the row link or a bulk selector
    pub action: Option<String>,
    /// Item id of a row action
    pub id: Option<String>,
    /// Ids ticked in the checkbox column
    pub bulk_ids: Vec<String>,
}

impl ListRequest {
    /// Decode urlencoded query/body pairs
    ///
    /// The table renders a bulk-action selector above and below it: `action`
    /// wins unless it is empty or `-1`, then `action2` is used. Selected rows
    /// arrive as repeated `_bulkid[]` values.
    #[must_use]
    pub fn from_pairs<I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let mut request = Self::default();
        let mut bottom_action = None;

        for (key, value) in pairs {
            match key.as_str() {
                "action" if is_action(&value) => request.action = Some(value),
                "action2" if is_action(&value) => bottom_action = Some(value),
                "id" if !value.is_empty() => request.id = Some(value),
                "_bulkid[]" | "_bulkid" if !value.is_empty() => request.bulk_ids.push(value),
                _ => {}
            }
        }

        if request.action.is_none() {
            request.action = bottom_action;
        }
        request
    }

    fn is_delete(&self) -> bool {
        self.action.as_deref() == Some("delete")
    }
}

fn is_action(value: &str) -> bool {
    !value.is_empty() && value != "-1"
}

/// List table column
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Column {
    /// Column key: `cb` for the checkbox column, otherwise the field name
    pub key: String,
    /// Header text
    pub label: String,
    /// Whether this is the selection checkbox column
    pub checkbox: bool,
}

impl Column {
    pub(crate) fn checkbox() -> Self {
        Self {
            key: "cb".to_string(),
            label: String::new(),
            checkbox: true,
        }
    }

    pub(crate) fn field(name: &str, label: &str) -> Self {
        Self {
            key: name.to_string(),
            label: label.to_string(),
            checkbox: false,
        }
    }
}

/// Inline action link shown under the first column
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowAction {
    /// Link text
    pub label: String,
    /// Target URL
    pub href: String,
    /// Prompt the user must confirm before following the link
    pub confirm: Option<String>,
}

/// One rendered table cell
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cell {
    /// Field name of the column
    pub column: String,
    /// Display text
    pub text: String,
    /// Row actions (first column only)
    pub actions: Vec<RowAction>,
}

/// One rendered table row
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Row {
    /// Item id, submitted by the checkbox column
    pub id: String,
    /// Cells in list-field order (the checkbox column is not included)
    pub cells: Vec<Cell>,
}

impl Row {
    /// Display text of the cell for `column`
    #[must_use]
    pub fn cell(&self, column: &str) -> Option<&str> {
        self.cells
            .iter()
            .find(|cell| cell.column == column)
            .map(|cell| cell.text.as_str())
    }
}

/// Option of the bulk action selector
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BulkAction {
    /// Submitted value
    pub value: String,
    /// Display text
    pub label: String,
}

/// View model of the list screen
#[derive(Debug, Clone)]
pub struct ListPage {
    /// Page heading (the type name)
    pub title: String,
    /// Text shown above the table
    pub description: Option<String>,
    /// Screen identifier
    pub type_id: String,
    /// Outcome of a delete action
    pub message: Option<String>,
    /// Table columns, checkbox first
    pub columns: Vec<Column>,
    /// Table rows
    pub rows: Vec<Row>,
    /// Link to the edit screen for a new item
    pub add_link: String,
    /// Form action for bulk submissions
    pub action_url: String,
    /// Options of the bulk action selector
    pub bulk_actions: Vec<BulkAction>,
}

impl<S: CrudStore> CrudController<S> {
    /// Handle a list screen request and build the page
    ///
    /// Deletes requested rows first, then lists every item.
    ///
    /// # Errors
    ///
    /// Returns an error if the store fails to list items or an item's fields
    /// cannot be read. Failures while deleting individual items are logged
    /// and left out of the deleted count.
    pub async fn render_list(&self, request: &ListRequest) -> Result<ListPage, CrudError> {
        let message = self.handle_delete(request).await;

        let items = self.store.fetch_all_items().await?;
        let list_fields = self.list_fields();
        let tz = self.timezone();

        let mut rows = Vec::with_capacity(items.len());
        for item in &items {
            let id = Self::item_id(item);
            let mut cells = Vec::with_capacity(list_fields.len());

            for (index, name) in list_fields.iter().enumerate() {
                let value = self.store.get_field_value(item, name)?;
                let cell = if index == 0 {
                    Cell {
                        column: (*name).to_string(),
                        text: value_text(&value),
                        actions: self.row_actions(&id),
                    }
                } else {
                    Cell {
                        column: (*name).to_string(),
                        text: display_value(&self.spec_for(name), &value, tz),
                        actions: Vec::new(),
                    }
                };
                cells.push(cell);
            }

            rows.push(Row { id, cells });
        }

        tracing::debug!(type_id = %self.type_id, rows = rows.len(), "Rendered list");

        Ok(ListPage {
            title: self.type_name.clone(),
            description: self.description.clone(),
            type_id: self.type_id.clone(),
            message,
            columns: self.columns(),
            rows,
            add_link: self.form_url(None),
            action_url: self.list_url(),
            bulk_actions: vec![BulkAction {
                value: "delete".to_string(),
                label: "Delete".to_string(),
            }],
        })
    }

    async fn handle_delete(&self, request: &ListRequest) -> Option<String> {
        if !request.is_delete() {
            return None;
        }

        if !request.bulk_ids.is_empty() {
            let deleted = self.delete_items(&request.bulk_ids).await;
            tracing::info!(
                type_id = %self.type_id,
                requested = request.bulk_ids.len(),
                deleted,
                "Bulk delete finished"
            );
            return Some(format!("{deleted} item(s) deleted."));
        }

        let id = request.id.clone()?;
        let deleted = self.delete_items(std::slice::from_ref(&id)).await;
        (deleted == 1).then(|| "Item deleted.".to_string())
    }

    fn row_actions(&self, id: &str) -> Vec<RowAction> {
        vec![
            RowAction {
                label: "Edit".to_string(),
                href: self.form_url(Some(id)),
                confirm: None,
            },
            RowAction {
                label: "Delete".to_string(),
                href: self.delete_url(id),
                confirm: Some(DELETE_CONFIRMATION.to_string()),
            },
        ]
    }
}
