//! Field specifications
//!
//! A [`FieldSpec`] describes one attribute of a managed entity: how it is
//! labelled, which widget edits it, and how its stored value is displayed.
//! Specs are declared through [`CrudController::add_field`] and configured
//! with a fluent interface:
//!
//! ```rust
//! use acton_crud::fields::{FieldSpec, FieldType};
//!
//! let mut spec = FieldSpec::new("status");
//! spec.with_label("Status")
//!     .with_description("Whether the account can sign in")
//!     .with_options([(1, "Active"), (2, "Inactive")]);
//!
//! assert_eq!(spec.field_type(), FieldType::Select);
//! ```
//!
//! [`CrudController::add_field`]: crate::controller::CrudController::add_field

mod format;

pub use format::{
    display_value, format_timestamp, is_falsy, parse_timestamp, timestamp_of, value_text,
    DISPLAY_FORMAT,
};

use std::str::FromStr;

use crate::error::CrudError;

/// Field type tag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FieldType {
    /// Free text (default)
    #[default]
    Text,
    /// One value out of a fixed set of options
    Select,
    /// UNIX timestamp, edited as a local date and time
    Timestamp,
}

impl FieldType {
    /// Get the type tag
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Select => "select",
            Self::Timestamp => "timestamp",
        }
    }
}

impl std::fmt::Display for FieldType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for FieldType {
    type Err = CrudError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "text" => Ok(Self::Text),
            "select" => Ok(Self::Select),
            "timestamp" => Ok(Self::Timestamp),
            other => Err(CrudError::InvalidFieldType(other.to_string())),
        }
    }
}

/// Option for select fields
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectOption {
    /// Stored value
    pub value: String,
    /// Display text
    pub label: String,
}

impl SelectOption {
    /// Create a new select option
    #[must_use]
    pub fn new(value: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            label: label.into(),
        }
    }
}

/// Declarative description of one managed attribute
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldSpec {
    name: String,
    label: String,
    field_type: FieldType,
    options: Vec<SelectOption>,
    description: Option<String>,
}

impl FieldSpec {
    /// Create a text field labelled with its own name
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            label: name.clone(),
            name,
            field_type: FieldType::default(),
            options: Vec::new(),
            description: None,
        }
    }

    /// Set the display label
    pub fn with_label(&mut self, label: impl Into<String>) -> &mut Self {
        self.label = label.into();
        self
    }

    /// Set the help text shown below the form input
    pub fn with_description(&mut self, description: impl Into<String>) -> &mut Self {
        self.description = Some(description.into());
        self
    }

    /// Set the field type from its tag
    ///
    /// # Errors
    ///
    /// Returns [`CrudError::InvalidFieldType`] if `field_type` is not one of
    /// `text`, `select` or `timestamp`. The previous type is kept.
    pub fn with_type(&mut self, field_type: &str) -> Result<&mut Self, CrudError> {
        let parsed = field_type.parse::<FieldType>()?;
        Ok(self.with_field_type(parsed))
    }

    /// Set the field type
    pub fn with_field_type(&mut self, field_type: FieldType) -> &mut Self {
        self.field_type = field_type;
        self
    }

    /// Replace the select options and turn this into a select field
    ///
    /// Options keep the order in which they are given.
    pub fn with_options<I, K, V>(&mut self, options: I) -> &mut Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: ToString,
        V: Into<String>,
    {
        self.options = options
            .into_iter()
            .map(|(value, label)| SelectOption::new(value.to_string(), label))
            .collect();
        self.field_type = FieldType::Select;
        self
    }

    /// Field name
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Display label
    #[must_use]
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Field type
    #[must_use]
    pub const fn field_type(&self) -> FieldType {
        self.field_type
    }

    /// Select options, in declaration order
    #[must_use]
    pub fn options(&self) -> &[SelectOption] {
        &self.options
    }

    /// Help text
    #[must_use]
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Look up the display text for a stored select value
    #[must_use]
    pub fn option_label(&self, value: &str) -> Option<&str> {
        self.options
            .iter()
            .find(|option| option.value == value)
            .map(|option| option.label.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let spec = FieldSpec::new("title");
        assert_eq!(spec.name(), "title");
        assert_eq!(spec.label(), "title");
        assert_eq!(spec.field_type(), FieldType::Text);
        assert!(spec.options().is_empty());
        assert!(spec.description().is_none());
    }

    #[test]
    fn test_chaining() {
        let mut spec = FieldSpec::new("starts_at");
        spec.with_label("Starts")
            .with_description("Local time")
            .with_type("timestamp")
            .unwrap()
            .with_label("Starts at");

        assert_eq!(spec.label(), "Starts at");
        assert_eq!(spec.description(), Some("Local time"));
        assert_eq!(spec.field_type(), FieldType::Timestamp);
    }

    #[test]
    fn test_with_type_rejects_unknown_tag() {
        let mut spec = FieldSpec::new("starts_at");
        spec.with_field_type(FieldType::Timestamp);

        let err = spec.with_type("datetime").unwrap_err();
        assert!(matches!(err, CrudError::InvalidFieldType(ref tag) if tag == "datetime"));
        assert_eq!(spec.field_type(), FieldType::Timestamp);
    }

    #[test]
    fn test_with_options_forces_select() {
        for prior in [FieldType::Text, FieldType::Select, FieldType::Timestamp] {
            let mut spec = FieldSpec::new("status");
            spec.with_field_type(prior)
                .with_options([(1, "Active"), (2, "Inactive")]);
            assert_eq!(spec.field_type(), FieldType::Select);
        }
    }

    #[test]
    fn test_with_options_replaces() {
        let mut spec = FieldSpec::new("status");
        spec.with_options([("a", "A"), ("b", "B")])
            .with_options([("c", "C")]);

        assert_eq!(spec.options(), &[SelectOption::new("c", "C")]);
        assert_eq!(spec.option_label("c"), Some("C"));
        assert_eq!(spec.option_label("a"), None);
    }

    #[test]
    fn test_field_type_round_trip() {
        for tag in ["text", "select", "timestamp"] {
            assert_eq!(tag.parse::<FieldType>().unwrap().as_str(), tag);
        }
        assert!("Text".parse::<FieldType>().is_err());
    }
}
