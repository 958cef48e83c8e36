//! Error-to-response mapping for the HTTP layer.
//!
//! | variant      | status |
//! |--------------|--------|
//! | `BadRequest` | 400    |
//! | `Validation` | 400    |
//! | `NotFound`   | 404    |
//! | `Conflict`   | 409    |
//! | `Internal`   | 500    |

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use clinica_core::{CrudError, ValidationErrors};
use log::error;
use serde_json::json;
use std::error::Error;
use std::fmt::{Display, Formatter};

const INTERNAL_ERROR_MESSAGE: &str = "internal server error";

#[derive(Debug)]
pub enum ApiError {
    /// Malformed body or path, rejected before validation.
    BadRequest(String),
    Validation(ValidationErrors),
    NotFound(String),
    Conflict(String),
    /// Store or runtime failure; the message is logged, never returned.
    Internal(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::BadRequest(_) | Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Conflict(_) => StatusCode::CONFLICT,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl Display for ApiError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::BadRequest(message)
            | Self::NotFound(message)
            | Self::Conflict(message)
            | Self::Internal(message) => write!(f, "{message}"),
            Self::Validation(err) => write!(f, "{err}"),
        }
    }
}

impl Error for ApiError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            _ => None,
        }
    }
}

impl From<CrudError> for ApiError {
    fn from(value: CrudError) -> Self {
        match value {
            CrudError::Validation(errors) => Self::Validation(errors),
            err @ CrudError::NotFound { .. } => Self::NotFound(err.to_string()),
            err @ CrudError::DuplicateKey { .. } => Self::Conflict(err.to_string()),
            CrudError::Store(err) => Self::Internal(err.to_string()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = match self {
            Self::Validation(errors) => json!({
                "error": "validation failed",
                "fields": errors.fields(),
            }),
            Self::Internal(details) => {
                error!("event=http_error module=http status=error error={details}");
                json!({ "error": INTERNAL_ERROR_MESSAGE })
            }
            other => json!({ "error": other.to_string() }),
        };

        (status, Json(body)).into_response()
    }
}
