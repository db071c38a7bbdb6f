//! Error types and error handling

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

/// Framework error type
#[derive(Debug, Error)]
pub enum CrudError {
    /// A field was configured with a type tag outside `text`, `select`, `timestamp`
    #[error("Unknown field type: {0}")]
    InvalidFieldType(String),

    /// No item exists for the requested id
    #[error("Item not found: {0}")]
    ItemNotFound(String),

    /// The default value accessor was used on an item that is not key/value addressable
    #[error("Unsupported item shape: {0}")]
    UnsupportedItemShape(String),

    /// A submitted timestamp could not be parsed
    #[error("Invalid timestamp '{value}' for field '{field}'")]
    InvalidTimestamp {
        /// Field name
        field: String,
        /// Raw submitted value
        value: String,
    },

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Persistence failure reported by a store
    #[error("Store error: {0}")]
    Store(#[from] anyhow::Error),

    /// Template rendering failure
    #[error("Template error: {0}")]
    Template(#[from] askama::Error),
}

impl CrudError {
    /// HTTP status used when the error escapes a handler
    #[must_use]
    pub const fn status_code(&self) -> StatusCode {
        match self {
            Self::ItemNotFound(_) => StatusCode::NOT_FOUND,
            Self::InvalidTimestamp { .. } => StatusCode::BAD_REQUEST,
            Self::InvalidFieldType(_)
            | Self::UnsupportedItemShape(_)
            | Self::Config(_)
            | Self::Store(_)
            | Self::Template(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for CrudError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(error = %self, "Admin request failed");
        } else {
            tracing::warn!(error = %self, "Admin request rejected");
        }
        (status, self.to_string()).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(
            CrudError::ItemNotFound("7".into()).status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            CrudError::InvalidTimestamp {
                field: "starts".into(),
                value: "soon".into(),
            }
            .status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            CrudError::Store(anyhow::anyhow!("connection reset")).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_display() {
        let err = CrudError::InvalidFieldType("color".into());
        assert_eq!(err.to_string(), "Unknown field type: color");
    }
}
