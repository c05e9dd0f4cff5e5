//! The `CatalogStore` trait and supporting types.
//!
//! The trait is implemented by storage backends (e.g. `kiosk-store-sqlite`).
//! Higher layers (`kiosk-api`, the orchestrator) depend on this abstraction,
//! not on any concrete backend.

use std::future::Future;

use crate::{
  product::Product,
  summary::{CachedSummary, Summary},
};

// ─── Write outcome ───────────────────────────────────────────────────────────

/// Result of [`CatalogStore::put_summary`].
///
/// Two concurrent cache misses for the same product may both reach the
/// insert; the store's unique key on `product_id` is the sole arbiter. The
/// losing writer must not error and must not overwrite — it re-reads the
/// winner's row and reports it as `Conflict`.
#[derive(Debug, Clone)]
pub enum PutOutcome {
  /// This writer created the record.
  Inserted(CachedSummary),
  /// A concurrent writer got there first; this is its record.
  Conflict(CachedSummary),
}

impl PutOutcome {
  pub fn into_record(self) -> CachedSummary {
    match self {
      Self::Inserted(r) | Self::Conflict(r) => r,
    }
  }
}

// ─── Trait ───────────────────────────────────────────────────────────────────

/// Abstraction over kiosk's durable storage: the product catalog plus the
/// one-summary-per-product cache.
///
/// All methods return `Send` futures so the trait can be used in
/// multi-threaded async runtimes (e.g. tokio with `axum`).
pub trait CatalogStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  // ── Products ──────────────────────────────────────────────────────────

  /// Point lookup by catalog id. `None` is not an error.
  fn get_product(
    &self,
    id: i64,
  ) -> impl Future<Output = Result<Option<Product>, Self::Error>> + Send + '_;

  /// List all products, ordered by id.
  fn list_products(
    &self,
  ) -> impl Future<Output = Result<Vec<Product>, Self::Error>> + Send + '_;

  /// Insert or update a product record. Used by tests and fixture loading;
  /// the summary engine itself never writes products.
  fn upsert_product(
    &self,
    product: Product,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  // ── Summary cache ─────────────────────────────────────────────────────

  /// Point lookup of the cached summary for a product. `None` is not an
  /// error — it simply means no summary has been generated yet.
  fn get_summary(
    &self,
    product_id: i64,
  ) -> impl Future<Output = Result<Option<CachedSummary>, Self::Error>> + Send + '_;

  /// Insert a summary if none exists for `product_id`.
  ///
  /// On a concurrent-insert conflict the existing record is re-read and
  /// returned as [`PutOutcome::Conflict`]; the existing row is never
  /// overwritten. First successful writer wins.
  fn put_summary<'a>(
    &'a self,
    product_id: i64,
    summary: &'a Summary,
    provider: &'a str,
    model: &'a str,
  ) -> impl Future<Output = Result<PutOutcome, Self::Error>> + Send + 'a;

  /// Unconditionally overwrite the cached summary for `product_id`.
  /// Only the explicit regeneration path calls this.
  fn replace_summary<'a>(
    &'a self,
    product_id: i64,
    summary: &'a Summary,
    provider: &'a str,
    model: &'a str,
  ) -> impl Future<Output = Result<CachedSummary, Self::Error>> + Send + 'a;
}
