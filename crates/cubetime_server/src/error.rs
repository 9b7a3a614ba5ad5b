//! API error taxonomy and its JSON rendering.
//!
//! Validation maps to 422 with per-field messages, unknown ids to 404, and
//! everything else to a generic 500 whose detail only reaches the log.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use cubetime_core::{GroupServiceError, GroupValidationError, RepoError};
use log::error;
use serde_json::json;
use std::collections::BTreeMap;
use thiserror::Error;

const VALIDATION_MESSAGE: &str = "The given data was invalid.";
const INTERNAL_MESSAGE: &str = "An error occurred while processing your request.";

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("{0}")]
    Validation(GroupValidationError),

    #[error("{0} not found")]
    NotFound(&'static str),

    /// Detail is logged, never returned to the client.
    #[error("internal error: {0}")]
    Internal(String),
}

impl From<GroupServiceError> for ApiError {
    fn from(value: GroupServiceError) -> Self {
        match value {
            GroupServiceError::Validation(err) => Self::Validation(err),
            GroupServiceError::NotFound(_) => Self::NotFound("Group"),
            GroupServiceError::Internal(err) => Self::Internal(err.to_string()),
        }
    }
}

impl From<RepoError> for ApiError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::Validation(err) => Self::Validation(err),
            other => Self::Internal(other.to_string()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::Validation(err) => {
                let mut fields: BTreeMap<&str, Vec<&str>> = BTreeMap::new();
                for field_error in err.errors() {
                    fields
                        .entry(field_error.field.as_str())
                        .or_default()
                        .push(field_error.message.as_str());
                }
                (
                    StatusCode::UNPROCESSABLE_ENTITY,
                    Json(json!({ "message": VALIDATION_MESSAGE, "errors": fields })),
                )
                    .into_response()
            }
            ApiError::NotFound(entity) => (
                StatusCode::NOT_FOUND,
                Json(json!({ "message": format!("{entity} not found") })),
            )
                .into_response(),
            ApiError::Internal(detail) => {
                error!("event=http_error module=api status=error error_code=internal error={detail}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({ "message": INTERNAL_MESSAGE })),
                )
                    .into_response()
            }
        }
    }
}
