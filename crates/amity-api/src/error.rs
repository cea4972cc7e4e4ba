//! API error type and [`axum::response::IntoResponse`] implementation.

use axum::{
  Json,
  http::StatusCode,
  response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

/// An error returned by an API handler.
#[derive(Debug, Error)]
pub enum ApiError {
  #[error("not found: {0}")]
  NotFound(String),

  #[error("bad request: {0}")]
  BadRequest(String),

  #[error("forbidden: {0}")]
  Forbidden(String),

  #[error("store error: {0}")]
  Store(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    let (status, message) = match &self {
      ApiError::NotFound(m) => (StatusCode::NOT_FOUND, m.clone()),
      ApiError::BadRequest(m) => (StatusCode::BAD_REQUEST, m.clone()),
      ApiError::Forbidden(m) => (StatusCode::FORBIDDEN, m.clone()),
      ApiError::Store(e) => (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()),
    };
    (status, Json(json!({ "error": message }))).into_response()
  }
}

/// Map a backend error onto an API status.
///
/// Domain-rule violations travel wrapped inside backend error types; walk the
/// source chain so they surface as 4xx instead of a blanket 500.
pub fn from_store<E>(e: E) -> ApiError
where
  E: std::error::Error + Send + Sync + 'static,
{
  let mut source: Option<&(dyn std::error::Error + 'static)> = Some(&e);
  while let Some(err) = source {
    if let Some(core) = err.downcast_ref::<amity_core::Error>() {
      use amity_core::Error::*;
      return match core {
        SelfConnection | ConnectionExists(..) | UnknownPrivacySetting(_) => {
          ApiError::BadRequest(core.to_string())
        }
        PendingRequestNotFound { .. }
        | ConnectionNotFound(..)
        | MessageNotFound(_)
        | ThreadNotFound(_) => ApiError::NotFound(core.to_string()),
      };
    }
    source = err.source();
  }
  ApiError::Store(Box::new(e))
}
