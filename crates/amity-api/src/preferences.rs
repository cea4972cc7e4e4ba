//! Handlers for `/users/{id}/preferences`.

use amity_core::{
  preferences::Preferences,
  store::{PreferenceStore, SocialStore},
};
use axum::{
  Json,
  extract::{Path, State},
};
use serde::Deserialize;
use uuid::Uuid;

use crate::{
  AppState,
  error::{ApiError, from_store},
  preferences_or_default,
};

/// `GET /users/:id/preferences` — materialises defaults on first read.
pub async fn get_one<S>(
  State(state): State<AppState<S>>,
  Path(id): Path<Uuid>,
) -> Result<Json<Preferences>, ApiError>
where
  S: SocialStore + 'static,
{
  Ok(Json(preferences_or_default(&state, id).await?))
}

#[derive(Debug, Deserialize)]
pub struct UpdateBody {
  pub email_on_request: bool,
  pub email_on_confirm: bool,
  pub email_on_message: bool,
  pub broadcast_status: bool,
}

/// `PUT /users/:id/preferences`
pub async fn update<S>(
  State(state): State<AppState<S>>,
  Path(id): Path<Uuid>,
  Json(body): Json<UpdateBody>,
) -> Result<Json<Preferences>, ApiError>
where
  S: SocialStore + 'static,
{
  let prefs = Preferences {
    user_id:          id,
    email_on_request: body.email_on_request,
    email_on_confirm: body.email_on_confirm,
    email_on_message: body.email_on_message,
    broadcast_status: body.broadcast_status,
  };

  state
    .store
    .save_preferences(prefs.clone())
    .await
    .map_err(from_store)?;
  Ok(Json(prefs))
}
