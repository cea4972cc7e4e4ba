//! Handlers for profile image endpoints.
//!
//! Image bytes never pass through this API; uploads are referenced by the
//! resource path the host stored them under, external images by URL. Reads
//! resolve uploaded-then-external and are checked against the `ProfileImage`
//! facet.

use amity_core::{
  image::{ExternalImage, ImageSize, ProfileImageRecord},
  privacy::Facet,
  store::{FriendshipStore, ImageStore, SocialStore},
  visibility::is_visible,
};
use axum::{
  Json,
  extract::{Path, Query, State},
  http::StatusCode,
  response::IntoResponse,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
  AppState,
  error::{ApiError, from_store},
  privacy_or_default,
};

// ─── Get ──────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct GetParams {
  pub viewer: Uuid,
  pub size:   Option<ImageSize>,
}

#[derive(Debug, Serialize)]
pub struct ImageLocation {
  /// `uploaded` or `external`.
  pub source:   &'static str,
  pub location: String,
}

/// `GET /users/:id/image?viewer=<uuid>[&size=thumbnail]`
pub async fn get_one<S>(
  State(state): State<AppState<S>>,
  Path(id): Path<Uuid>,
  Query(params): Query<GetParams>,
) -> Result<Json<ImageLocation>, ApiError>
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
    if !is_visible(id, &privacy, params.viewer, Facet::ProfileImage, friend) {
      return Err(ApiError::Forbidden("image is not visible".to_owned()));
    }
  }

  let size = params.size.unwrap_or(ImageSize::Main);

  // Uploaded images win over external ones.
  if let Some(record) = state.store.current_image(id).await.map_err(from_store)?
  {
    return Ok(Json(ImageLocation {
      source:   "uploaded",
      location: record.path_for(size).to_owned(),
    }));
  }
  if let Some(external) =
    state.store.external_image(id).await.map_err(from_store)?
  {
    return Ok(Json(ImageLocation {
      source:   "external",
      location: external.url_for(size).to_owned(),
    }));
  }

  Err(ApiError::NotFound(format!("no image for user {id}")))
}

// ─── Upload ───────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct UploadBody {
  pub main_path:      String,
  pub thumbnail_path: Option<String>,
}

/// `POST /users/:id/image` — records a new upload as current.
pub async fn upload<S>(
  State(state): State<AppState<S>>,
  Path(id): Path<Uuid>,
  Json(body): Json<UploadBody>,
) -> Result<impl IntoResponse, ApiError>
where
  S: SocialStore + 'static,
{
  let record = state
    .store
    .add_image(id, body.main_path, body.thumbnail_path)
    .await
    .map_err(from_store)?;
  Ok((StatusCode::CREATED, Json(record)))
}

// ─── External ─────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct ExternalBody {
  pub main_url:      String,
  pub thumbnail_url: Option<String>,
}

/// `PUT /users/:id/image/external`
pub async fn set_external<S>(
  State(state): State<AppState<S>>,
  Path(id): Path<Uuid>,
  Json(body): Json<ExternalBody>,
) -> Result<StatusCode, ApiError>
where
  S: SocialStore + 'static,
{
  state
    .store
    .save_external_image(ExternalImage {
      user_id:       id,
      main_url:      body.main_url,
      thumbnail_url: body.thumbnail_url,
    })
    .await
    .map_err(from_store)?;
  Ok(StatusCode::NO_CONTENT)
}

// ─── History ──────────────────────────────────────────────────────────────────

/// `GET /users/:id/image/history` — superseded uploads, newest first.
pub async fn history<S>(
  State(state): State<AppState<S>>,
  Path(id): Path<Uuid>,
) -> Result<Json<Vec<ProfileImageRecord>>, ApiError>
where
  S: SocialStore + 'static,
{
  let records = state.store.image_history(id).await.map_err(from_store)?;
  Ok(Json(records))
}
