//! Edit screen: submission handling and form construction

use std::collections::HashMap;

use serde_json::Value;

use super::CrudController;
use crate::csrf::CSRF_FORM_FIELD;
use crate::error::CrudError;
use crate::fields::{format_timestamp, parse_timestamp, timestamp_of, value_text, FieldType};
use crate::item::FieldAccess;
use crate::store::CrudStore;

/// Decoded edit screen request
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormRequest {
    /// Id of the item being edited; absent for a new item
    pub id: Option<String>,
    /// Submitted CSRF token; absent on the initial request
    pub csrf_token: Option<String>,
    /// Submitted raw field values
    pub values: HashMap<String, String>,
}

impl FormRequest {
    /// Decode urlencoded query/body pairs
    #[must_use]
    pub fn from_pairs<I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let mut request = Self::default();
        for (key, value) in pairs {
            match key.as_str() {
                "id" => {
                    request.id = Some(value.clone()).filter(|id| !id.is_empty());
                    request.values.insert(key, value);
                }
                CSRF_FORM_FIELD => request.csrf_token = Some(value),
                _ => {
                    request.values.insert(key, value);
                }
            }
        }
        request
    }

    fn value(&self, field: &str) -> &str {
        self.values.get(field).map_or("", String::as_str)
    }
}

/// Select option as shown in the form
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OptionView {
    /// Submitted value
    pub value: String,
    /// Display text
    pub label: String,
    /// Whether this is the item's current value
    pub selected: bool,
}

/// One input of the edit form
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormFieldView {
    /// Field name, used as the input name
    pub name: String,
    /// Input label
    pub label: String,
    /// Help text below the input
    pub description: Option<String>,
    /// Field type
    pub field_type: FieldType,
    /// Current value, formatted for editing
    pub value: String,
    /// Options of a select field
    pub options: Vec<OptionView>,
}

impl FormFieldView {
    /// Whether the input is a drop-down
    #[must_use]
    pub fn is_select(&self) -> bool {
        self.field_type == FieldType::Select
    }

    /// Whether the input gets the date/time picker
    #[must_use]
    pub fn is_timestamp(&self) -> bool {
        self.field_type == FieldType::Timestamp
    }
}

/// View model of the edit screen
#[derive(Debug, Clone)]
pub struct FormPage {
    /// Page heading (the type name)
    pub title: String,
    /// Screen identifier
    pub type_id: String,
    /// Id of the item being edited, once it has one
    pub item_id: Option<String>,
    /// Form action
    pub action_url: String,
    /// Link back to the list screen
    pub back_url: String,
    /// Name of the hidden CSRF input
    pub csrf_field: &'static str,
    /// Token for the next submission
    pub csrf_token: String,
    /// Inputs in edit-field order
    pub fields: Vec<FormFieldView>,
    /// Success message
    pub message: Option<String>,
    /// Error notice; the item was not saved
    pub notice: Option<String>,
    /// Date/time picker script, if assets are registered
    pub script_url: Option<String>,
    /// Date/time picker stylesheet, if assets are registered
    pub style_url: Option<String>,
}

/// Outcome of an accepted submission
enum Submission {
    Saved,
    Rejected(String),
}

impl<S: CrudStore> CrudController<S> {
    /// Handle an edit screen request and build the page
    ///
    /// A request carrying a valid CSRF token is a submission: the item is
    /// loaded (or created), updated from the submitted values, validated and
    /// saved. Anything else shows the item as stored.
    ///
    /// # Errors
    ///
    /// Returns an error if the store fails to load, create or save the item,
    /// or a field cannot be read or written.
    pub async fn render_form(&self, request: &FormRequest) -> Result<FormPage, CrudError> {
        let action = self.form_action();
        let submitted = match request.csrf_token.as_deref() {
            Some(token) if self.csrf.verify(token, &action) => true,
            Some(_) => {
                tracing::warn!(
                    type_id = %self.type_id,
                    item_id = ?request.id,
                    "CSRF token rejected, showing form without saving"
                );
                false
            }
            None => false,
        };

        let mut item = self.resolve_item(request.id.as_deref()).await?;
        let outcome = if submitted {
            Some(self.submit(&mut item, request).await?)
        } else {
            None
        };

        let (message, notice) = match outcome {
            Some(Submission::Saved) => {
                tracing::info!(
                    type_id = %self.type_id,
                    item_id = %Self::item_id(&item),
                    "Item saved"
                );
                (Some(format!("{} saved.", self.type_name)), None)
            }
            Some(Submission::Rejected(text)) => {
                tracing::debug!(type_id = %self.type_id, notice = %text, "Item not saved");
                (None, Some(text))
            }
            None => (None, None),
        };

        let mut fields = self.form_fields(&item)?;
        // Keep what the user typed for an unparseable timestamp
        let invalid_input = notice
            .as_ref()
            .and_then(|_| self.first_invalid_timestamp(request));
        if let Some((name, raw)) = invalid_input {
            if let Some(view) = fields.iter_mut().find(|view| view.name == name) {
                view.value = raw;
            }
        }

        Ok(FormPage {
            title: self.type_name.clone(),
            type_id: self.type_id.clone(),
            item_id: item.id(),
            action_url: self.form_url(None),
            back_url: self.list_url(),
            csrf_field: CSRF_FORM_FIELD,
            csrf_token: self.csrf.issue(&action),
            fields,
            message,
            notice,
            script_url: self.assets.as_ref().map(|assets| assets.script.clone()),
            style_url: self.assets.as_ref().map(|assets| assets.style.clone()),
        })
    }

    /// Build the form inputs for `item`
    ///
    /// Timestamps are shown as `YYYY-MM-DD HH:MM` in the configured timezone,
    /// unset ones as empty inputs.
    ///
    /// # Errors
    ///
    /// Returns an error if a field value cannot be read.
    pub fn form_fields(&self, item: &S::Item) -> Result<Vec<FormFieldView>, CrudError> {
        let tz = self.timezone();
        self.edit_fields()
            .into_iter()
            .map(|name| {
                let spec = self.spec_for(name);
                let stored = self.store.get_field_value(item, name)?;
                let value = match spec.field_type() {
                    FieldType::Timestamp => timestamp_of(&stored)
                        .map(|epoch| format_timestamp(epoch, tz))
                        .unwrap_or_default(),
                    FieldType::Text | FieldType::Select => value_text(&stored),
                };
                let options = spec
                    .options()
                    .iter()
                    .map(|option| OptionView {
                        value: option.value.clone(),
                        label: option.label.clone(),
                        selected: option.value == value,
                    })
                    .collect();

                Ok(FormFieldView {
                    name: name.to_string(),
                    label: spec.label().to_string(),
                    description: spec.description().map(str::to_string),
                    field_type: spec.field_type(),
                    value,
                    options,
                })
            })
            .collect()
    }

    async fn submit(
        &self,
        item: &mut S::Item,
        request: &FormRequest,
    ) -> Result<Submission, CrudError> {
        match self.apply_submission(item, request) {
            Ok(()) => {}
            Err(CrudError::InvalidTimestamp { field, value }) => {
                tracing::warn!(type_id = %self.type_id, field = %field, value = %value, "Invalid date/time submitted");
                let label = self.spec_for(&field).label().to_string();
                return Ok(Submission::Rejected(format!("Invalid date/time for {label}.")));
            }
            Err(error) => return Err(error),
        }

        if let Some(text) = self.store.validate_item(item).filter(|text| !text.is_empty()) {
            return Ok(Submission::Rejected(text));
        }

        self.store.save_item(item).await?;
        Ok(Submission::Saved)
    }

    /// Write submitted values into `item`
    ///
    /// Every field is applied before a timestamp parse failure is reported,
    /// so the other inputs keep what the user typed.
    fn apply_submission(&self, item: &mut S::Item, request: &FormRequest) -> Result<(), CrudError> {
        let tz = self.timezone();
        let mut first_error = None;

        for name in self.edit_fields() {
            let raw = request.value(name);
            let value = match self.spec_for(name).field_type() {
                FieldType::Timestamp => match parse_timestamp(name, raw, tz) {
                    Ok(epoch) => Value::from(epoch),
                    Err(error) => {
                        first_error.get_or_insert(error);
                        continue;
                    }
                },
                FieldType::Text | FieldType::Select => Value::String(raw.to_string()),
            };
            self.store.set_field_value(item, name, value)?;
        }

        first_error.map_or(Ok(()), Err)
    }

    fn first_invalid_timestamp(&self, request: &FormRequest) -> Option<(String, String)> {
        let tz = self.timezone();
        self.edit_fields().into_iter().find_map(|name| {
            let raw = request.value(name);
            (self.spec_for(name).field_type() == FieldType::Timestamp
                && parse_timestamp(name, raw, tz).is_err())
            .then(|| (name.to_string(), raw.to_string()))
        })
    }
}
