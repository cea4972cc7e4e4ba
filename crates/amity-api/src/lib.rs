//! JSON REST API for Amity.
//!
//! Exposes an axum [`Router`] backed by any [`amity_core::store::SocialStore`]
//! implementation, plus the host-supplied directory and access oracle. Auth,
//! TLS, and transport concerns are the caller's responsibility: callers are
//! trusted to pass truthful `viewer` identities.
//!
//! # Mounting
//!
//! ```rust,ignore
//! .nest("/api", amity_api::api_router(state))
//! ```

pub mod connections;
pub mod error;
pub mod images;
pub mod messages;
pub mod notify;
pub mod preferences;
pub mod privacy;
pub mod search;
pub mod status;

use std::sync::Arc;

use amity_core::{
  preferences::Preferences,
  privacy::{PrivacyDefaults, PrivacyProfile},
  search::{AccessOracle, Directory},
  store::{PreferenceStore, PrivacyStore, SocialStore},
};
use axum::{
  Router,
  routing::{delete, get, post, put},
};
use uuid::Uuid;

pub use error::ApiError;
use error::from_store;
pub use notify::{StatusNotifier, StatusSink, StatusUpdate};

// ─── Settings ─────────────────────────────────────────────────────────────────

/// Feature switches for the API surface.
#[derive(Debug, Clone)]
pub struct ApiSettings {
  /// When off, privacy records stay locked to their current values.
  pub privacy_change_enabled: bool,
}

impl Default for ApiSettings {
  fn default() -> Self {
    Self {
      privacy_change_enabled: true,
    }
  }
}

// ─── Application state ────────────────────────────────────────────────────────

/// Shared state threaded through all axum handlers.
pub struct AppState<S> {
  pub store:     Arc<S>,
  pub directory: Arc<dyn Directory>,
  pub access:    Arc<dyn AccessOracle>,
  pub defaults:  PrivacyDefaults,
  pub settings:  ApiSettings,
  pub notifier:  StatusNotifier,
}

// Manual impl: `S` itself never needs to be `Clone` behind the `Arc`.
impl<S> Clone for AppState<S> {
  fn clone(&self) -> Self {
    Self {
      store:     self.store.clone(),
      directory: self.directory.clone(),
      access:    self.access.clone(),
      defaults:  self.defaults.clone(),
      settings:  self.settings.clone(),
      notifier:  self.notifier.clone(),
    }
  }
}

// ─── Router ───────────────────────────────────────────────────────────────────

/// Build a fully-materialised API router for `state`.
///
/// The returned `Router<()>` can be nested into any parent router regardless
/// of its own state type.
pub fn api_router<S>(state: AppState<S>) -> Router<()>
where
  S: SocialStore + 'static,
{
  Router::new()
    // Privacy
    .route(
      "/users/{id}/privacy",
      get(privacy::get_one::<S>).put(privacy::update::<S>),
    )
    .route("/users/{id}/visibility", get(privacy::check::<S>))
    // Connections
    .route("/users/{id}/connections", get(connections::list::<S>))
    .route(
      "/users/{id}/connections/{friend_id}",
      delete(connections::remove::<S>),
    )
    .route(
      "/users/{id}/connections/requests",
      get(connections::pending::<S>),
    )
    .route("/connections/requests", post(connections::request::<S>))
    .route(
      "/connections/requests/confirm",
      post(connections::confirm::<S>),
    )
    .route(
      "/connections/requests/ignore",
      post(connections::ignore::<S>),
    )
    // Status
    .route(
      "/users/{id}/status",
      get(status::get_one::<S>)
        .put(status::update::<S>)
        .delete(status::clear::<S>),
    )
    // Preferences
    .route(
      "/users/{id}/preferences",
      get(preferences::get_one::<S>).put(preferences::update::<S>),
    )
    // Images
    .route(
      "/users/{id}/image",
      get(images::get_one::<S>).post(images::upload::<S>),
    )
    .route("/users/{id}/image/external", put(images::set_external::<S>))
    .route("/users/{id}/image/history", get(images::history::<S>))
    // Messages
    .route("/messages", post(messages::send::<S>))
    .route("/messages/{id}/read", post(messages::mark_read::<S>))
    .route("/users/{id}/messages/unread", get(messages::unread::<S>))
    .route("/users/{id}/threads", get(messages::threads::<S>))
    .route("/threads/{id}/messages", get(messages::in_thread::<S>))
    // Search
    .route("/search", get(search::handler::<S>))
    .with_state(state)
}

// ─── Lazy records ─────────────────────────────────────────────────────────────

/// The stored privacy record, or one persisted from the configured defaults
/// on first touch.
pub(crate) async fn privacy_or_default<S>(
  state: &AppState<S>,
  user_id: Uuid,
) -> Result<PrivacyProfile, ApiError>
where
  S: SocialStore + 'static,
{
  match state
    .store
    .load_privacy(user_id)
    .await
    .map_err(from_store)?
  {
    Some(profile) => Ok(profile),
    None => {
      let profile = PrivacyProfile::from_defaults(user_id, &state.defaults);
      state
        .store
        .save_privacy(profile.clone())
        .await
        .map_err(from_store)?;
      Ok(profile)
    }
  }
}

/// The stored preferences record, persisted from defaults on first touch.
pub(crate) async fn preferences_or_default<S>(
  state: &AppState<S>,
  user_id: Uuid,
) -> Result<Preferences, ApiError>
where
  S: SocialStore + 'static,
{
  match state
    .store
    .load_preferences(user_id)
    .await
    .map_err(from_store)?
  {
    Some(prefs) => Ok(prefs),
    None => {
      let prefs = Preferences::defaults_for(user_id);
      state
        .store
        .save_preferences(prefs.clone())
        .await
        .map_err(from_store)?;
      Ok(prefs)
    }
  }
}

// ─── Integration tests ────────────────────────────────────────────────────────
