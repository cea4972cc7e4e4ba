//! Handlers for `/users/{id}/status`.
//!
//! Reads are visibility-checked against the `Status` facet. Writes go to the
//! store and, when the user opted in, to the broadcast queue.

use amity_core::{
  privacy::Facet,
  status::ProfileStatus,
  store::{FriendshipStore, SocialStore, StatusStore},
  visibility::is_visible,
};
use axum::{
  Json,
  extract::{Path, Query, State},
  http::StatusCode,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::{
  AppState,
  error::{ApiError, from_store},
  notify::StatusUpdate,
  preferences_or_default, privacy_or_default,
};

// ─── Get ──────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct ViewerParams {
  pub viewer: Uuid,
}

/// `GET /users/:id/status?viewer=<uuid>`
pub async fn get_one<S>(
  State(state): State<AppState<S>>,
  Path(id): Path<Uuid>,
  Query(params): Query<ViewerParams>,
) -> Result<Json<Option<ProfileStatus>>, ApiError>
where
  S: SocialStore + 'static,
{
  if !state.access.is_elevated(params.viewer) {
    let privacy = privacy_or_default(&state, id).await?;
    let friend = state
      .store
      .is_friend(params.viewer, id)
      .await
      .map_err(from_store)?;
    if !is_visible(id, &privacy, params.viewer, Facet::Status, friend) {
      return Err(ApiError::Forbidden("status is not visible".to_owned()));
    }
  }

  let status = state.store.status(id).await.map_err(from_store)?;
  Ok(Json(status))
}

// ─── Update ───────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct UpdateBody {
  pub message: String,
}

/// `PUT /users/:id/status`
pub async fn update<S>(
  State(state): State<AppState<S>>,
  Path(id): Path<Uuid>,
  Json(body): Json<UpdateBody>,
) -> Result<Json<ProfileStatus>, ApiError>
where
  S: SocialStore + 'static,
{
  let message = body.message.trim().to_owned();
  if message.is_empty() {
    return Err(ApiError::BadRequest("status message is empty".to_owned()));
  }

  let status = state
    .store
    .set_status(id, message)
    .await
    .map_err(from_store)?;

  // Broadcast only for users who opted in; delivery is fire-and-forget.
  let prefs = preferences_or_default(&state, id).await?;
  if prefs.broadcast_status {
    state.notifier.submit(StatusUpdate {
      user_id:   id,
      message:   status.message.clone(),
      posted_at: status.posted_at,
    });
  }

  Ok(Json(status))
}

// ─── Clear ────────────────────────────────────────────────────────────────────

/// `DELETE /users/:id/status`
pub async fn clear<S>(
  State(state): State<AppState<S>>,
  Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError>
where
  S: SocialStore + 'static,
{
  if state.store.clear_status(id).await.map_err(from_store)? {
    Ok(StatusCode::NO_CONTENT)
  } else {
    Err(ApiError::NotFound(format!("no status for user {id}")))
  }
}
