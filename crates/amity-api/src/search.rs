//! Handler for `GET /search`.

use amity_core::{
  search::{SearchResult, assemble_search_results},
  store::SocialStore,
};
use axum::{
  Json,
  extract::{Query, State},
};
use serde::Deserialize;
use uuid::Uuid;

use crate::{
  AppState,
  error::{ApiError, from_store},
};

#[derive(Debug, Deserialize)]
pub struct SearchParams {
  pub viewer: Uuid,
  /// Free-text query matched against directory names and emails.
  pub q:      String,
}

/// `GET /search?viewer=<uuid>&q=<text>`
pub async fn handler<S>(
  State(state): State<AppState<S>>,
  Query(params): Query<SearchParams>,
) -> Result<Json<Vec<SearchResult>>, ApiError>
where
  S: SocialStore + 'static,
{
  let hits = state.directory.search(&params.q);
  let results = assemble_search_results(
    state.store.as_ref(),
    state.access.as_ref(),
    &state.defaults,
    params.viewer,
    hits,
  )
  .await
  .map_err(from_store)?;
  Ok(Json(results))
}
