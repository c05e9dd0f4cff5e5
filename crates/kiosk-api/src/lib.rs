//! JSON REST API for kiosk.
//!
//! Exposes an axum [`Router`] backed by any [`CatalogStore`] +
//! [`CompletionProvider`] pair. TLS and transport concerns are the
//! caller's responsibility.
//!
//! # Mounting
//!
//! ```rust,ignore
//! .nest("/api", kiosk_api::api_router(state))
//! ```

pub mod error;
pub mod products;
pub mod summaries;

use std::sync::Arc;

use axum::{
  Json,
  Router,
  routing::get,
};
use kiosk_core::{provider::CompletionProvider, store::CatalogStore, summarizer::Summarizer};
use serde_json::{Value, json};

pub use error::ApiError;

// ─── Application state ───────────────────────────────────────────────────────

/// Shared state threaded through all handlers.
pub struct ApiState<S, P> {
  pub store:      Arc<S>,
  pub summarizer: Summarizer<S, P>,
}

impl<S, P> Clone for ApiState<S, P> {
  fn clone(&self) -> Self {
    Self {
      store:      Arc::clone(&self.store),
      summarizer: self.summarizer.clone(),
    }
  }
}

impl<S, P> ApiState<S, P>
where
  S: CatalogStore,
  P: CompletionProvider,
{
  pub fn new(store: Arc<S>, provider: Arc<P>) -> Self {
    Self {
      summarizer: Summarizer::new(Arc::clone(&store), provider),
      store,
    }
  }
}

// ─── Router ──────────────────────────────────────────────────────────────────

/// Build a fully-materialised API router for `state`.
///
/// The returned `Router<()>` can be nested into any parent router
/// regardless of its own state type.
pub fn api_router<S, P>(state: ApiState<S, P>) -> Router<()>
where
  S: CatalogStore + 'static,
  P: CompletionProvider + 'static,
{
  Router::new()
    .route("/health", get(health))
    // Products (read-only; seeding is an operator concern)
    .route("/products", get(products::list::<S, P>))
    .route("/products/{id}", get(products::get_one::<S, P>))
    // Summaries
    .route(
      "/products/{id}/ai-summary",
      get(summaries::get_cached::<S, P>).post(summaries::generate::<S, P>),
    )
    .with_state(state)
}

/// `GET /health` — liveness probe.
async fn health() -> Json<Value> { Json(json!({ "ok": true })) }

// ─── Integration tests ───────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
  use std::{collections::VecDeque, sync::Mutex};

  use axum::{
    body::Body,
    http::{Request, StatusCode},
  };
  use kiosk_core::{product::Product, provider::ProviderError, store::CatalogStore as _};
  use kiosk_store_sqlite::SqliteStore;
  use tower::ServiceExt as _;

  use super::*;

  // ── Stub provider ───────────────────────────────────────────────────────

  /// Plays back a queue of canned results; panics on an unexpected call so
  /// cache-hit tests catch accidental provider traffic.
  struct StubProvider {
    responses: Mutex<VecDeque<Result<String, ProviderError>>>,
  }

  impl StubProvider {
    fn new(responses: Vec<Result<String, ProviderError>>) -> Self {
      Self { responses: Mutex::new(responses.into()) }
    }
  }

  impl CompletionProvider for StubProvider {
    async fn complete(
      &self,
      _system: &str,
      _user: &str,
    ) -> Result<String, ProviderError> {
      self
        .responses
        .lock()
        .unwrap()
        .pop_front()
        .expect("unexpected provider call")
    }

    fn name(&self) -> &str { "stub" }

    fn model(&self) -> &str { "stub-model" }
  }

  // ── Helpers ─────────────────────────────────────────────────────────────

  const GOOD: &str =
    r#"{"one_liner":"Solid","pros":["a","b"],"cons":["c"],"best_for":["d"]}"#;
  const GOOD_ALT: &str =
    r#"{"one_liner":"Fresh take","pros":["x","y"],"cons":["z"],"best_for":["w"]}"#;

  async fn make_state(
    responses: Vec<Result<String, ProviderError>>,
  ) -> ApiState<SqliteStore, StubProvider> {
    let store = SqliteStore::open_in_memory().await.unwrap();
    store
      .upsert_product(Product {
        id:          1,
        title:       "Acme Phone X".into(),
        brand:       Some("Acme".into()),
        category:    Some("smartphones".into()),
        price:       Some(349.99),
        description: Some("A 6.1-inch phone.".into()),
      })
      .await
      .unwrap();

    ApiState::new(Arc::new(store), Arc::new(StubProvider::new(responses)))
  }

  async fn request(
    state: ApiState<SqliteStore, StubProvider>,
    method: &str,
    uri: &str,
  ) -> (StatusCode, Value) {
    let req = Request::builder()
      .method(method)
      .uri(uri)
      .body(Body::empty())
      .unwrap();
    let resp = api_router(state).oneshot(req).await.unwrap();
    let status = resp.status();
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
      .await
      .unwrap();
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    (status, body)
  }

  // ── Health ──────────────────────────────────────────────────────────────

  #[tokio::test]
  async fn health_returns_ok() {
    let state = make_state(vec![]).await;
    let (status, body) = request(state, "GET", "/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["ok"], true);
  }

  // ── Products ────────────────────────────────────────────────────────────

  #[tokio::test]
  async fn list_products_returns_catalog() {
    let state = make_state(vec![]).await;
    let (status, body) = request(state, "GET", "/products").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["products"][0]["id"], 1);
  }

  #[tokio::test]
  async fn get_product_returns_envelope() {
    let state = make_state(vec![]).await;
    let (status, body) = request(state, "GET", "/products/1").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["ok"], true);
    assert_eq!(body["product"]["title"], "Acme Phone X");
  }

  #[tokio::test]
  async fn get_unknown_product_returns_404_envelope() {
    let state = make_state(vec![]).await;
    let (status, body) = request(state, "GET", "/products/9999").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["ok"], false);
    assert_eq!(body["error"], "Product not found");
  }

  // ── Summary probe ───────────────────────────────────────────────────────

  #[tokio::test]
  async fn probe_before_generation_returns_404() {
    let state = make_state(vec![]).await;
    let (status, body) = request(state, "GET", "/products/1/ai-summary").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "No summary yet");
  }

  // ── Generation ──────────────────────────────────────────────────────────

  #[tokio::test]
  async fn post_generates_then_probe_returns_it() {
    let state = make_state(vec![Ok(GOOD.into())]).await;

    let (status, body) =
      request(state.clone(), "POST", "/products/1/ai-summary").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["cached"], false);
    assert_eq!(body["summary"]["one_liner"], "Solid");

    let (status, body) = request(state, "GET", "/products/1/ai-summary").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["summary"]["one_liner"], "Solid");
    assert_eq!(body["meta"]["model"], "stub-model");
    assert!(body["meta"]["updatedAt"].is_string());
  }

  #[tokio::test]
  async fn second_post_is_a_cache_hit_with_identical_content() {
    // One scripted response only: a second provider call would panic.
    let state = make_state(vec![Ok(GOOD.into())]).await;

    let (_, first) = request(state.clone(), "POST", "/products/1/ai-summary").await;
    let (status, second) = request(state, "POST", "/products/1/ai-summary").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(second["cached"], true);
    assert_eq!(first["summary"], second["summary"]);
  }

  #[tokio::test]
  async fn post_unknown_product_returns_404() {
    let state = make_state(vec![]).await;
    let (status, body) = request(state, "POST", "/products/9999/ai-summary").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Product not found");
  }

  #[tokio::test]
  async fn missing_credential_returns_500() {
    let state =
      make_state(vec![Err(ProviderError::MissingCredential)]).await;
    let (status, body) = request(state, "POST", "/products/1/ai-summary").await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["ok"], false);
  }

  #[tokio::test]
  async fn upstream_failure_returns_502_with_details() {
    let state = make_state(vec![Err(ProviderError::Upstream {
      status: 503,
      body:   r#"{"error":"model overloaded"}"#.into(),
    })])
    .await;

    let (status, body) = request(state.clone(), "POST", "/products/1/ai-summary").await;
    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(body["details"]["error"], "model overloaded");

    // Failures are not cached.
    let (status, _) = request(state, "GET", "/products/1/ai-summary").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
  }

  #[tokio::test]
  async fn malformed_output_returns_502_and_caches_nothing() {
    let state = make_state(vec![Ok("I cannot help with that.".into())]).await;

    let (status, body) = request(state.clone(), "POST", "/products/1/ai-summary").await;
    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(body["ok"], false);

    let (status, _) = request(state, "GET", "/products/1/ai-summary").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
  }

  #[tokio::test]
  async fn force_regenerates_over_cached_summary() {
    let state = make_state(vec![Ok(GOOD.into()), Ok(GOOD_ALT.into())]).await;

    let (_, first) = request(state.clone(), "POST", "/products/1/ai-summary").await;
    assert_eq!(first["summary"]["one_liner"], "Solid");

    let (status, second) =
      request(state.clone(), "POST", "/products/1/ai-summary?force=true").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(second["cached"], false);
    assert_eq!(second["summary"]["one_liner"], "Fresh take");

    // The overwrite is what the probe now sees.
    let (_, probed) = request(state, "GET", "/products/1/ai-summary").await;
    assert_eq!(probed["summary"]["one_liner"], "Fresh take");
  }

  #[tokio::test]
  async fn freeform_summary_shape_is_served_as_is() {
    let state = make_state(vec![Ok(r#"{"text":"A decent phone."}"#.into())]).await;
    let (_, body) = request(state, "POST", "/products/1/ai-summary").await;
    assert_eq!(body["summary"]["text"], "A decent phone.");
    assert!(body["summary"].get("one_liner").is_none());
  }
}
