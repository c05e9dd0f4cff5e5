//! Handlers for `/products/:id/ai-summary`.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`  | `/products/:id/ai-summary` | Cache-only probe; never generates |
//! | `POST` | `/products/:id/ai-summary` | Get-or-create; `?force=true` regenerates |

use axum::{
  Json,
  extract::{Path, Query, State},
};
use kiosk_core::{provider::CompletionProvider, store::CatalogStore};
use serde::Deserialize;
use serde_json::{Value, json};

use crate::{ApiState, error::ApiError};

// ─── Probe ───────────────────────────────────────────────────────────────────

/// `GET /products/:id/ai-summary` — read-only cache lookup.
///
/// A 404 here means "no summary yet", which clients treat as an invitation
/// to generate, not as an error.
pub async fn get_cached<S, P>(
  State(state): State<ApiState<S, P>>,
  Path(id): Path<i64>,
) -> Result<Json<Value>, ApiError>
where
  S: CatalogStore,
  P: CompletionProvider,
{
  let record = state
    .summarizer
    .get_cached(id)
    .await
    .map_err(ApiError::from)?
    .ok_or_else(|| ApiError::NotFound("No summary yet".to_string()))?;

  Ok(Json(json!({
    "ok": true,
    "summary": record.summary,
    "meta": { "model": record.model, "updatedAt": record.created_at },
  })))
}

// ─── Generate ────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct GenerateParams {
  /// Bypass the cache and overwrite the stored summary.
  #[serde(default)]
  pub force: bool,
}

/// `POST /products/:id/ai-summary[?force=true]`
pub async fn generate<S, P>(
  State(state): State<ApiState<S, P>>,
  Path(id): Path<i64>,
  Query(params): Query<GenerateParams>,
) -> Result<Json<Value>, ApiError>
where
  S: CatalogStore,
  P: CompletionProvider,
{
  let outcome = if params.force {
    state.summarizer.regenerate(id).await
  } else {
    state.summarizer.get_or_create(id).await
  }
  .map_err(ApiError::from)?;

  Ok(Json(json!({
    "ok": true,
    "summary": outcome.record.summary,
    "cached": outcome.cached,
  })))
}
