use axum::extract::multipart::MultipartRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use crate::error::{PokedexError, ValidationError};

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub message: String,
    #[serde(rename = "missingFields", skip_serializing_if = "Option::is_none")]
    pub missing_fields: Option<Vec<&'static str>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
}

impl PokedexError {
    fn status_code(&self) -> StatusCode {
        match self {
            PokedexError::Validation(_) => StatusCode::BAD_REQUEST,
            PokedexError::NotFound(_) => StatusCode::NOT_FOUND,
            PokedexError::Request(_)
            | PokedexError::Storage(_)
            | PokedexError::Persistence(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn body(&self) -> ErrorBody {
        let (message, missing_fields, field) = match self {
            PokedexError::Validation(ValidationError::MissingFields(fields)) => (
                "Missing required fields".to_string(),
                Some(fields.clone()),
                None,
            ),
            PokedexError::Validation(ValidationError::InvalidField { field, .. }) => {
                (self.to_string(), None, Some(field.to_string()))
            }
            PokedexError::Validation(ValidationError::UnknownField(field)) => {
                (self.to_string(), None, Some(field.clone()))
            }
            PokedexError::Validation(ValidationError::InvalidId(_)) => {
                ("Invalid or missing Pokémon ID".to_string(), None, None)
            }
            PokedexError::NotFound(_) => ("Pokémon not found".to_string(), None, None),
            PokedexError::Request(_) => ("Error parsing form data".to_string(), None, None),
            PokedexError::Storage(_) => ("Failed to upload image".to_string(), None, None),
            PokedexError::Persistence(_) => ("Internal server error".to_string(), None, None),
        };

        ErrorBody {
            message,
            missing_fields,
            field,
        }
    }
}

impl From<MultipartRejection> for PokedexError {
    fn from(rejection: MultipartRejection) -> Self {
        PokedexError::Request(rejection.body_text())
    }
}

impl IntoResponse for PokedexError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!("Request failed: {}", self);
        } else {
            tracing::debug!("Request rejected: {}", self);
        }
        (status, Json(self.body())).into_response()
    }
}
