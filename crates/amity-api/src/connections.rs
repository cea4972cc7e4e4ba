//! Handlers for connection (friendship) endpoints.
//!
//! | Method   | Path | Notes |
//! |----------|------|-------|
//! | `GET`    | `/users/:id/connections` | Confirmed connection ids |
//! | `DELETE` | `/users/:id/connections/:friend_id` | 404 if not connected |
//! | `GET`    | `/users/:id/connections/requests` | Ids awaiting this user |
//! | `POST`   | `/connections/requests` | Body: `{"from":...,"to":...}` |
//! | `POST`   | `/connections/requests/confirm` | Recipient accepts |
//! | `POST`   | `/connections/requests/ignore` | Recipient declines |

use amity_core::{
  friend::FriendLink,
  store::{FriendshipStore, SocialStore},
};
use axum::{
  Json,
  extract::{Path, State},
  http::StatusCode,
  response::IntoResponse,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::{AppState, error::ApiError, error::from_store};

// ─── List ─────────────────────────────────────────────────────────────────────

/// `GET /users/:id/connections`
pub async fn list<S>(
  State(state): State<AppState<S>>,
  Path(id): Path<Uuid>,
) -> Result<Json<Vec<Uuid>>, ApiError>
where
  S: SocialStore + 'static,
{
  let ids = state
    .store
    .confirmed_friend_ids(id)
    .await
    .map_err(from_store)?;
  Ok(Json(ids))
}

/// `GET /users/:id/connections/requests`
pub async fn pending<S>(
  State(state): State<AppState<S>>,
  Path(id): Path<Uuid>,
) -> Result<Json<Vec<Uuid>>, ApiError>
where
  S: SocialStore + 'static,
{
  let ids = state
    .store
    .pending_request_ids(id)
    .await
    .map_err(from_store)?;
  Ok(Json(ids))
}

// ─── Request lifecycle ────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct RequestBody {
  pub from: Uuid,
  pub to:   Uuid,
}

/// `POST /connections/requests`
pub async fn request<S>(
  State(state): State<AppState<S>>,
  Json(body): Json<RequestBody>,
) -> Result<impl IntoResponse, ApiError>
where
  S: SocialStore + 'static,
{
  let link = state
    .store
    .request_friend(body.from, body.to)
    .await
    .map_err(from_store)?;
  Ok((StatusCode::CREATED, Json(link)))
}

/// `POST /connections/requests/confirm`
pub async fn confirm<S>(
  State(state): State<AppState<S>>,
  Json(body): Json<RequestBody>,
) -> Result<Json<FriendLink>, ApiError>
where
  S: SocialStore + 'static,
{
  let link = state
    .store
    .confirm_request(body.from, body.to)
    .await
    .map_err(from_store)?;
  Ok(Json(link))
}

/// `POST /connections/requests/ignore`
pub async fn ignore<S>(
  State(state): State<AppState<S>>,
  Json(body): Json<RequestBody>,
) -> Result<StatusCode, ApiError>
where
  S: SocialStore + 'static,
{
  state
    .store
    .ignore_request(body.from, body.to)
    .await
    .map_err(from_store)?;
  Ok(StatusCode::NO_CONTENT)
}

// ─── Remove ───────────────────────────────────────────────────────────────────

/// `DELETE /users/:id/connections/:friend_id`
pub async fn remove<S>(
  State(state): State<AppState<S>>,
  Path((id, friend_id)): Path<(Uuid, Uuid)>,
) -> Result<StatusCode, ApiError>
where
  S: SocialStore + 'static,
{
  state
    .store
    .remove_friend(id, friend_id)
    .await
    .map_err(from_store)?;
  Ok(StatusCode::NO_CONTENT)
}
