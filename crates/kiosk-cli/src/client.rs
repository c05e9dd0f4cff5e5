//! Async HTTP client wrapping the kiosk JSON API.

use anyhow::{Context, Result, anyhow};
use chrono::{DateTime, Utc};
use kiosk_core::{product::Product, summary::Summary};
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use std::time::Duration;

/// Connection settings for the kiosk API.
#[derive(Debug, Clone)]
pub struct ApiConfig {
  pub base_url: String,
}

/// A cached summary as served by the probe endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct SummaryView {
  pub summary: Summary,
  pub meta:    SummaryMeta,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SummaryMeta {
  pub model:      String,
  #[serde(rename = "updatedAt")]
  pub updated_at: DateTime<Utc>,
}

/// Result of a generate call.
#[derive(Debug, Clone, Deserialize)]
pub struct GeneratedSummary {
  pub summary: Summary,
  pub cached:  bool,
}

#[derive(Debug, Deserialize)]
struct ProductsEnvelope {
  products: Vec<Product>,
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
  error: String,
}

/// Async HTTP client for the kiosk JSON REST API.
///
/// Cheap to clone — the inner [`reqwest::Client`] is `Arc`-based.
#[derive(Clone)]
pub struct ApiClient {
  client: Client,
  config: ApiConfig,
}

impl ApiClient {
  pub fn new(config: ApiConfig) -> Result<Self> {
    let client = Client::builder()
      .timeout(Duration::from_secs(90))
      .build()
      .context("failed to build HTTP client")?;
    Ok(Self { client, config })
  }

  fn url(&self, path: &str) -> String {
    format!("{}/api{}", self.config.base_url.trim_end_matches('/'), path)
  }

  // ── Products ──────────────────────────────────────────────────────────────

  /// `GET /api/products`
  pub async fn list_products(&self) -> Result<Vec<Product>> {
    let resp = self
      .client
      .get(self.url("/products"))
      .send()
      .await
      .context("GET /products failed")?;

    if !resp.status().is_success() {
      return Err(anyhow!("GET /products → {}", resp.status()));
    }
    let envelope: ProductsEnvelope =
      resp.json().await.context("deserialising products")?;
    Ok(envelope.products)
  }

  // ── Summaries ─────────────────────────────────────────────────────────────

  /// `GET /api/products/{id}/ai-summary`
  ///
  /// A 404 means "no summary yet" and resolves to `Ok(None)` — it is not
  /// an error from the caller's perspective.
  pub async fn get_summary(&self, product_id: i64) -> Result<Option<SummaryView>> {
    let resp = self
      .client
      .get(self.url(&format!("/products/{product_id}/ai-summary")))
      .send()
      .await
      .context("GET /ai-summary failed")?;

    if resp.status() == StatusCode::NOT_FOUND {
      return Ok(None);
    }
    if !resp.status().is_success() {
      return Err(anyhow!("GET /ai-summary → {}", resp.status()));
    }
    let view: SummaryView = resp.json().await.context("deserialising summary")?;
    Ok(Some(view))
  }

  /// `POST /api/products/{id}/ai-summary[?force=true]`
  ///
  /// On failure, surfaces the server's `error` message when the body
  /// carries one.
  pub async fn generate_summary(
    &self,
    product_id: i64,
    force: bool,
  ) -> Result<GeneratedSummary> {
    let mut url = self.url(&format!("/products/{product_id}/ai-summary"));
    if force {
      url.push_str("?force=true");
    }

    let resp = self
      .client
      .post(url)
      .send()
      .await
      .context("POST /ai-summary failed")?;

    let status = resp.status();
    if !status.is_success() {
      let message = resp
        .json::<ErrorEnvelope>()
        .await
        .map(|e| e.error)
        .unwrap_or_else(|_| format!("POST /ai-summary → {status}"));
      return Err(anyhow!(message));
    }

    resp.json().await.context("deserialising generated summary")
  }
}
