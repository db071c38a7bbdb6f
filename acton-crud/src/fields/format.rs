//! Type-aware value formatting and parsing
//!
//! Timestamps are stored as UNIX seconds and shown as `YYYY-MM-DD HH:MM` in
//! the configured timezone. The display format has minute resolution, so a
//! format/parse round trip drops seconds.

use chrono::{NaiveDate, NaiveDateTime, TimeZone};
use chrono_tz::Tz;
use serde_json::Value;

use super::{FieldSpec, FieldType};
use crate::error::CrudError;

/// Display format for timestamp fields
pub const DISPLAY_FORMAT: &str = "%Y-%m-%d %H:%M";

/// Accepted submission formats, tried in order
const INPUT_FORMATS: [&str; 3] = ["%Y-%m-%d %H:%M", "%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M"];

/// Render a stored value as plain text
#[must_use]
pub fn value_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Whether a stored value counts as "unset" (null, false, zero, empty)
#[must_use]
pub fn is_falsy(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f.abs() < f64::EPSILON),
        Value::String(s) => s.is_empty() || s == "0",
        Value::Array(items) => items.is_empty(),
        Value::Object(_) => false,
    }
}

/// Extract epoch seconds from a stored timestamp value
///
/// Returns `None` for falsy values and for values that are not numeric.
#[must_use]
#[allow(clippy::cast_possible_truncation)]
pub fn timestamp_of(value: &Value) -> Option<i64> {
    if is_falsy(value) {
        return None;
    }
    match value {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f as i64)),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// Format epoch seconds as `YYYY-MM-DD HH:MM` in `tz`
///
/// Zero renders as the empty string.
#[must_use]
pub fn format_timestamp(epoch: i64, tz: Tz) -> String {
    if epoch == 0 {
        return String::new();
    }
    tz.timestamp_opt(epoch, 0)
        .single()
        .map(|dt| dt.format(DISPLAY_FORMAT).to_string())
        .unwrap_or_default()
}

/// Parse a submitted date/time string in `tz` to epoch seconds
///
/// An empty (or blank) input parses to `0`. A bare date means midnight.
/// Ambiguous local times (DST fall-back) resolve to the earlier instant.
///
/// # Errors
///
/// Returns [`CrudError::InvalidTimestamp`] if the input matches none of the
/// accepted formats or names a local time skipped by a DST transition.
pub fn parse_timestamp(field: &str, raw: &str, tz: Tz) -> Result<i64, CrudError> {
    let input = raw.trim();
    if input.is_empty() {
        return Ok(0);
    }

    let invalid = || CrudError::InvalidTimestamp {
        field: field.to_string(),
        value: raw.to_string(),
    };

    let naive = INPUT_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(input, format).ok())
        .or_else(|| {
            NaiveDate::parse_from_str(input, "%Y-%m-%d")
                .ok()
                .and_then(|date| date.and_hms_opt(0, 0, 0))
        })
        .ok_or_else(invalid)?;

    tz.from_local_datetime(&naive)
        .earliest()
        .map(|dt| dt.timestamp())
        .ok_or_else(invalid)
}

/// Render a stored value for a list column
///
/// - `select` values are looked up in the field's options; a value without
///   an option renders empty and logs a warning.
/// - `timestamp` values render as local date/time, falsy values as empty.
/// - anything else renders as text.
#[must_use]
pub fn display_value(spec: &FieldSpec, value: &Value, tz: Tz) -> String {
    match spec.field_type() {
        FieldType::Select => {
            let key = value_text(value);
            spec.option_label(&key).map_or_else(
                || {
                    tracing::warn!(
                        field = spec.name(),
                        value = %key,
                        "Stored value has no matching select option"
                    );
                    String::new()
                },
                str::to_string,
            )
        }
        FieldType::Timestamp => {
            if is_falsy(value) {
                return String::new();
            }
            timestamp_of(value).map_or_else(
                || {
                    tracing::warn!(
                        field = spec.name(),
                        value = %value,
                        "Timestamp field holds a non-numeric value"
                    );
                    value_text(value)
                },
                |epoch| format_timestamp(epoch, tz),
            )
        }
        FieldType::Text => value_text(value),
    }
}
