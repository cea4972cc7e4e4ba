//! Handlers for private messaging endpoints.
//!
//! Messaging is connection-gated: sender and recipient must share a
//! confirmed connection.

use amity_core::{
  message::{Message, NewMessage, ThreadView},
  store::{FriendshipStore, MessageStore, SocialStore},
};
use axum::{
  Json,
  extract::{Path, State},
  http::StatusCode,
  response::IntoResponse,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
  AppState,
  error::{ApiError, from_store},
};

// ─── Send ─────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct SendBody {
  pub from:      Uuid,
  pub to:        Uuid,
  pub body:      String,
  pub thread_id: Option<Uuid>,
  pub subject:   Option<String>,
}

/// `POST /messages`
pub async fn send<S>(
  State(state): State<AppState<S>>,
  Json(body): Json<SendBody>,
) -> Result<impl IntoResponse, ApiError>
where
  S: SocialStore + 'static,
{
  if body.from == body.to {
    return Err(ApiError::BadRequest(
      "cannot message yourself".to_owned(),
    ));
  }
  if !state
    .store
    .is_friend(body.from, body.to)
    .await
    .map_err(from_store)?
  {
    return Err(ApiError::Forbidden("users are not connected".to_owned()));
  }

  let message = state
    .store
    .send_message(NewMessage {
      from:      body.from,
      to:        body.to,
      body:      body.body,
      thread_id: body.thread_id,
      subject:   body.subject,
    })
    .await
    .map_err(from_store)?;
  Ok((StatusCode::CREATED, Json(message)))
}

// ─── Threads ──────────────────────────────────────────────────────────────────

/// `GET /users/:id/threads` — most recently active first.
pub async fn threads<S>(
  State(state): State<AppState<S>>,
  Path(id): Path<Uuid>,
) -> Result<Json<Vec<ThreadView>>, ApiError>
where
  S: SocialStore + 'static,
{
  let views = state.store.threads_for(id).await.map_err(from_store)?;
  Ok(Json(views))
}

/// `GET /threads/:id/messages` — oldest first; 404 for unknown threads.
pub async fn in_thread<S>(
  State(state): State<AppState<S>>,
  Path(id): Path<Uuid>,
) -> Result<Json<Vec<Message>>, ApiError>
where
  S: SocialStore + 'static,
{
  if state.store.thread(id).await.map_err(from_store)?.is_none() {
    return Err(ApiError::NotFound(format!("thread {id} not found")));
  }
  let messages = state
    .store
    .messages_in_thread(id)
    .await
    .map_err(from_store)?;
  Ok(Json(messages))
}

// ─── Read state ───────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct UnreadCount {
  pub unread: u64,
}

/// `GET /users/:id/messages/unread`
pub async fn unread<S>(
  State(state): State<AppState<S>>,
  Path(id): Path<Uuid>,
) -> Result<Json<UnreadCount>, ApiError>
where
  S: SocialStore + 'static,
{
  let unread = state.store.unread_count(id).await.map_err(from_store)?;
  Ok(Json(UnreadCount { unread }))
}

#[derive(Debug, Deserialize)]
pub struct MarkReadBody {
  pub read: bool,
}

/// `POST /messages/:id/read`
pub async fn mark_read<S>(
  State(state): State<AppState<S>>,
  Path(id): Path<Uuid>,
  Json(body): Json<MarkReadBody>,
) -> Result<StatusCode, ApiError>
where
  S: SocialStore + 'static,
{
  state
    .store
    .mark_read(id, body.read)
    .await
    .map_err(from_store)?;
  Ok(StatusCode::NO_CONTENT)
}
