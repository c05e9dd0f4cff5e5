//! Handlers for `/products` read endpoints.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`  | `/products` | Full catalog listing, ordered by id |
//! | `GET`  | `/products/:id` | Single product, 404 envelope when absent |

use axum::{
  Json,
  extract::{Path, State},
};
use kiosk_core::{provider::CompletionProvider, store::CatalogStore};
use serde_json::{Value, json};

use crate::{ApiState, error::ApiError};

/// `GET /products`
pub async fn list<S, P>(
  State(state): State<ApiState<S, P>>,
) -> Result<Json<Value>, ApiError>
where
  S: CatalogStore,
  P: CompletionProvider,
{
  let products = state
    .store
    .list_products()
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?;

  Ok(Json(json!({ "ok": true, "products": products })))
}

/// `GET /products/:id`
pub async fn get_one<S, P>(
  State(state): State<ApiState<S, P>>,
  Path(id): Path<i64>,
) -> Result<Json<Value>, ApiError>
where
  S: CatalogStore,
  P: CompletionProvider,
{
  let product = state
    .store
    .get_product(id)
    .await
    .map_err(|e| ApiError::Store(Box::new(e)))?
    .ok_or_else(|| ApiError::NotFound("Product not found".to_string()))?;

  Ok(Json(json!({ "ok": true, "product": product })))
}
