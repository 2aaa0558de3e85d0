//! API error type and [`axum::response::IntoResponse`] implementation.

use axum::{
  Json,
  http::StatusCode,
  response::{IntoResponse, Response},
};
use salinha_core::error::{Error as CoreError, RepositoryErrorKind};
use serde_json::json;
use thiserror::Error;

/// An error returned by an API handler.
#[derive(Debug, Error)]
pub enum ApiError {
  #[error(transparent)]
  Service(#[from] CoreError),

  #[error("bad request: {0}")]
  BadRequest(String),
}

fn repository_status(kind: RepositoryErrorKind) -> StatusCode {
  match kind {
    RepositoryErrorKind::PermissionDenied => StatusCode::FORBIDDEN,
    RepositoryErrorKind::Unavailable | RepositoryErrorKind::Network => {
      StatusCode::SERVICE_UNAVAILABLE
    }
    RepositoryErrorKind::NotFound => StatusCode::NOT_FOUND,
    RepositoryErrorKind::Unknown => StatusCode::INTERNAL_SERVER_ERROR,
  }
}

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    match self {
      ApiError::BadRequest(m) => {
        (StatusCode::BAD_REQUEST, Json(json!({ "error": m }))).into_response()
      }
      ApiError::Service(e) => {
        let message = e.user_message();
        match e {
          CoreError::Validation(errors) => (
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(json!({ "error": message, "fields": errors.fields })),
          )
            .into_response(),
          CoreError::Conflict { existing, .. } => (
            StatusCode::CONFLICT,
            Json(json!({ "error": message, "conflicts_with": existing })),
          )
            .into_response(),
          CoreError::NotFound(_) => {
            (StatusCode::NOT_FOUND, Json(json!({ "error": message })))
              .into_response()
          }
          CoreError::Repository { kind, .. } => {
            (repository_status(kind), Json(json!({ "error": message })))
              .into_response()
          }
        }
      }
    }
  }
}
