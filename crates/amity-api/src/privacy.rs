//! Handlers for `/users/{id}/privacy` and the visibility check endpoint.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`  | `/users/:id/privacy` | Materialises defaults on first read |
//! | `PUT`  | `/users/:id/privacy` | 403 when changes are disabled |
//! | `GET`  | `/users/:id/visibility` | `?viewer=<uuid>&facet=<facet>` |

use amity_core::{
  privacy::{Facet, PrivacyProfile, PrivacySetting},
  store::{FriendshipStore, PrivacyStore, SocialStore},
  visibility::is_visible,
};
use axum::{
  Json,
  extract::{Path, Query, State},
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{AppState, error::ApiError, error::from_store, privacy_or_default};

// ─── Get ──────────────────────────────────────────────────────────────────────

/// `GET /users/:id/privacy`
pub async fn get_one<S>(
  State(state): State<AppState<S>>,
  Path(id): Path<Uuid>,
) -> Result<Json<PrivacyProfile>, ApiError>
where
  S: SocialStore + 'static,
{
  Ok(Json(privacy_or_default(&state, id).await?))
}

// ─── Update ───────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct UpdateBody {
  pub profile_image:   PrivacySetting,
  pub basic_info:      PrivacySetting,
  pub contact_info:    PrivacySetting,
  pub academic_info:   PrivacySetting,
  pub personal_info:   PrivacySetting,
  pub search:          PrivacySetting,
  pub friends_list:    PrivacySetting,
  pub status:          PrivacySetting,
  pub show_birth_year: bool,
}

/// `PUT /users/:id/privacy`
pub async fn update<S>(
  State(state): State<AppState<S>>,
  Path(id): Path<Uuid>,
  Json(body): Json<UpdateBody>,
) -> Result<Json<PrivacyProfile>, ApiError>
where
  S: SocialStore + 'static,
{
  if !state.settings.privacy_change_enabled {
    return Err(ApiError::Forbidden(
      "privacy changes are disabled".to_owned(),
    ));
  }

  let profile = PrivacyProfile {
    user_id:         id,
    profile_image:   body.profile_image,
    basic_info:      body.basic_info,
    contact_info:    body.contact_info,
    academic_info:   body.academic_info,
    personal_info:   body.personal_info,
    search:          body.search,
    friends_list:    body.friends_list,
    status:          body.status,
    show_birth_year: body.show_birth_year,
  };

  state
    .store
    .save_privacy(profile.clone())
    .await
    .map_err(from_store)?;
  Ok(Json(profile))
}

// ─── Visibility check ─────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct VisibilityParams {
  pub viewer: Uuid,
  pub facet:  Facet,
}

#[derive(Debug, Serialize)]
pub struct VisibilityAnswer {
  pub visible: bool,
}

/// `GET /users/:id/visibility?viewer=<uuid>&facet=<facet>`
pub async fn check<S>(
  State(state): State<AppState<S>>,
  Path(id): Path<Uuid>,
  Query(params): Query<VisibilityParams>,
) -> Result<Json<VisibilityAnswer>, ApiError>
where
  S: SocialStore + 'static,
{
  let visible = if state.access.is_elevated(params.viewer) {
    true
  } else {
    let privacy = privacy_or_default(&state, id).await?;
    let friend = state
      .store
      .is_friend(params.viewer, id)
      .await
      .map_err(from_store)?;
    is_visible(id, &privacy, params.viewer, params.facet, friend)
  };

  Ok(Json(VisibilityAnswer { visible }))
}
