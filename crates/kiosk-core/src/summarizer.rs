//! The summary orchestrator — get-or-create over store + provider.
//!
//! One request walks: check cache → load product → build prompt → call
//! provider → parse output → persist. A cache hit short-circuits before
//! any provider call (provider calls are billed; caching is the cost
//! control, not an optimisation). Failures are never cached — the next
//! request retries the whole pipeline.

use std::sync::Arc;

use crate::{
  Error, Result,
  parse::parse_summary,
  prompt,
  provider::CompletionProvider,
  store::{CatalogStore, PutOutcome},
  summary::{CachedSummary, Summary},
};

// ─── Outcome ─────────────────────────────────────────────────────────────────

/// What a generate call produced, and whether it came from the cache.
#[derive(Debug, Clone)]
pub struct SummaryOutcome {
  pub record: CachedSummary,
  /// `true` when the record was already present (cache hit, or a
  /// concurrent writer won the insert race).
  pub cached: bool,
}

// ─── Summarizer ──────────────────────────────────────────────────────────────

/// Ties the store and provider together behind idempotent summary
/// operations. Handles are injected at construction; the orchestrator owns
/// no global state.
pub struct Summarizer<S, P> {
  store:    Arc<S>,
  provider: Arc<P>,
}

impl<S, P> Clone for Summarizer<S, P> {
  fn clone(&self) -> Self {
    Self {
      store:    Arc::clone(&self.store),
      provider: Arc::clone(&self.provider),
    }
  }
}

impl<S, P> Summarizer<S, P>
where
  S: CatalogStore,
  P: CompletionProvider,
{
  pub fn new(store: Arc<S>, provider: Arc<P>) -> Self {
    Self { store, provider }
  }

  fn store_err(e: S::Error) -> Error { Error::Store(Box::new(e)) }

  // ── Read-only probe ───────────────────────────────────────────────────

  /// Cache-only lookup. Never calls the provider; `None` means "no
  /// summary yet", which callers must not treat as an error.
  pub async fn get_cached(&self, product_id: i64) -> Result<Option<CachedSummary>> {
    self
      .store
      .get_summary(product_id)
      .await
      .map_err(Self::store_err)
  }

  // ── Get-or-create ─────────────────────────────────────────────────────

  /// Return the cached summary for `product_id`, generating and persisting
  /// one first if none exists.
  ///
  /// Synchronous from the caller's view: either a complete record is
  /// persisted or nothing is. Two concurrent misses may both generate;
  /// the store's unique key arbitrates and the loser adopts the winner's
  /// record (reported as `cached: true`).
  pub async fn get_or_create(&self, product_id: i64) -> Result<SummaryOutcome> {
    if let Some(record) = self.get_cached(product_id).await? {
      tracing::debug!(product_id, "summary cache hit");
      return Ok(SummaryOutcome { record, cached: true });
    }

    let summary = self.generate(product_id).await?;

    let outcome = self
      .store
      .put_summary(product_id, &summary, self.provider.name(), self.provider.model())
      .await
      .map_err(Self::store_err)?;

    match outcome {
      PutOutcome::Inserted(record) => {
        tracing::info!(product_id, shape = record.summary.shape(), "summary generated");
        Ok(SummaryOutcome { record, cached: false })
      }
      PutOutcome::Conflict(record) => {
        // A concurrent request persisted first; ours is discarded.
        tracing::info!(product_id, "summary insert lost race, adopting existing record");
        Ok(SummaryOutcome { record, cached: true })
      }
    }
  }

  // ── Regenerate ────────────────────────────────────────────────────────

  /// Bypass the cache, run the full pipeline, and overwrite whatever was
  /// stored. The only path that replaces an existing record.
  pub async fn regenerate(&self, product_id: i64) -> Result<SummaryOutcome> {
    let summary = self.generate(product_id).await?;

    let record = self
      .store
      .replace_summary(product_id, &summary, self.provider.name(), self.provider.model())
      .await
      .map_err(Self::store_err)?;

    tracing::info!(product_id, shape = record.summary.shape(), "summary regenerated");
    Ok(SummaryOutcome { record, cached: false })
  }

  // ── Pipeline ──────────────────────────────────────────────────────────

  /// LOAD_PRODUCT → BUILD_PROMPT → CALL_PROVIDER → PARSE_OUTPUT.
  /// Persisting is left to the caller so the two write policies (insert
  /// vs. overwrite) stay in one place each.
  async fn generate(&self, product_id: i64) -> Result<Summary> {
    let product = self
      .store
      .get_product(product_id)
      .await
      .map_err(Self::store_err)?
      .ok_or(Error::ProductNotFound(product_id))?;

    let pair = prompt::build(&product);
    let raw = self.provider.complete(&pair.system, &pair.user).await?;
    Ok(parse_summary(&raw)?)
  }
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
  use std::{
    collections::HashMap,
    convert::Infallible,
    sync::{
      Mutex,
      atomic::{AtomicUsize, Ordering},
    },
  };

  use chrono::Utc;

  use super::*;
  use crate::product::Product;

  // ── Mock store ────────────────────────────────────────────────────────

  #[derive(Default)]
  struct MemStore {
    products:  Mutex<HashMap<i64, Product>>,
    summaries: Mutex<HashMap<i64, CachedSummary>>,
  }

  impl MemStore {
    fn with_product(product: Product) -> Self {
      let s = Self::default();
      s.products.lock().unwrap().insert(product.id, product);
      s
    }

    fn record(product_id: i64, summary: &Summary, provider: &str, model: &str) -> CachedSummary {
      CachedSummary {
        product_id,
        summary: summary.clone(),
        provider: provider.to_string(),
        model: model.to_string(),
        created_at: Utc::now(),
      }
    }
  }

  impl CatalogStore for MemStore {
    type Error = Infallible;

    async fn get_product(&self, id: i64) -> Result<Option<Product>, Infallible> {
      Ok(self.products.lock().unwrap().get(&id).cloned())
    }

    async fn list_products(&self) -> Result<Vec<Product>, Infallible> {
      Ok(self.products.lock().unwrap().values().cloned().collect())
    }

    async fn upsert_product(&self, product: Product) -> Result<(), Infallible> {
      self.products.lock().unwrap().insert(product.id, product);
      Ok(())
    }

    async fn get_summary(&self, product_id: i64) -> Result<Option<CachedSummary>, Infallible> {
      Ok(self.summaries.lock().unwrap().get(&product_id).cloned())
    }

    async fn put_summary(
      &self,
      product_id: i64,
      summary: &Summary,
      provider: &str,
      model: &str,
    ) -> Result<PutOutcome, Infallible> {
      let mut summaries = self.summaries.lock().unwrap();
      if let Some(existing) = summaries.get(&product_id) {
        return Ok(PutOutcome::Conflict(existing.clone()));
      }
      let record = Self::record(product_id, summary, provider, model);
      summaries.insert(product_id, record.clone());
      Ok(PutOutcome::Inserted(record))
    }

    async fn replace_summary(
      &self,
      product_id: i64,
      summary: &Summary,
      provider: &str,
      model: &str,
    ) -> Result<CachedSummary, Infallible> {
      let record = Self::record(product_id, summary, provider, model);
      self
        .summaries
        .lock()
        .unwrap()
        .insert(product_id, record.clone());
      Ok(record)
    }
  }

  // ── Mock provider ─────────────────────────────────────────────────────

  /// Returns canned responses in order (last one repeats) and counts calls.
  struct ScriptedProvider {
    responses: Vec<String>,
    calls:     AtomicUsize,
  }

  impl ScriptedProvider {
    fn new(responses: &[&str]) -> Self {
      Self {
        responses: responses.iter().map(|s| s.to_string()).collect(),
        calls:     AtomicUsize::new(0),
      }
    }

    fn call_count(&self) -> usize { self.calls.load(Ordering::SeqCst) }
  }

  impl CompletionProvider for ScriptedProvider {
    async fn complete(&self, _system: &str, _user: &str) -> crate::provider::Result<String> {
      let n = self.calls.fetch_add(1, Ordering::SeqCst);
      let idx = n.min(self.responses.len() - 1);
      Ok(self.responses[idx].clone())
    }

    fn name(&self) -> &str { "mock" }

    fn model(&self) -> &str { "mock-model" }
  }

  // ── Fixtures ──────────────────────────────────────────────────────────

  fn product(id: i64) -> Product {
    Product {
      id,
      title:       "Acme Phone X".into(),
      brand:       Some("Acme".into()),
      category:    Some("smartphones".into()),
      price:       Some(349.99),
      description: Some("A 6.1-inch phone.".into()),
    }
  }

  const GOOD: &str =
    r#"{"one_liner":"Solid phone","pros":["cheap","light"],"cons":["slow"],"best_for":["students"]}"#;
  const GOOD_ALT: &str =
    r#"{"one_liner":"Different take","pros":["bright screen","durable"],"cons":["heavy"],"best_for":["travel"]}"#;

  fn summarizer(
    store: MemStore,
    provider: ScriptedProvider,
  ) -> (Summarizer<MemStore, ScriptedProvider>, Arc<MemStore>, Arc<ScriptedProvider>) {
    let store = Arc::new(store);
    let provider = Arc::new(provider);
    (
      Summarizer::new(Arc::clone(&store), Arc::clone(&provider)),
      store,
      provider,
    )
  }

  // ── get_or_create ─────────────────────────────────────────────────────

  #[tokio::test]
  async fn miss_then_hit_is_idempotent() {
    let (sz, _store, provider) =
      summarizer(MemStore::with_product(product(1)), ScriptedProvider::new(&[GOOD]));

    let first = sz.get_or_create(1).await.unwrap();
    assert!(!first.cached);

    let second = sz.get_or_create(1).await.unwrap();
    assert!(second.cached);
    assert_eq!(first.record.summary, second.record.summary);

    // The second call must not have touched the provider.
    assert_eq!(provider.call_count(), 1);
  }

  #[tokio::test]
  async fn pre_seeded_cache_hit_issues_zero_provider_calls() {
    let store = MemStore::with_product(product(42));
    let seeded = Summary::Freeform { text: "seeded".into() };
    store.summaries.lock().unwrap().insert(
      42,
      MemStore::record(42, &seeded, "seed", "seed-model"),
    );

    let (sz, _store, provider) = summarizer(store, ScriptedProvider::new(&[GOOD]));

    let out = sz.get_or_create(42).await.unwrap();
    assert!(out.cached);
    assert_eq!(out.record.summary, seeded);
    assert_eq!(provider.call_count(), 0);
  }

  #[tokio::test]
  async fn unknown_product_fails_before_provider() {
    let (sz, _store, provider) =
      summarizer(MemStore::default(), ScriptedProvider::new(&[GOOD]));

    let err = sz.get_or_create(9999).await.unwrap_err();
    assert!(matches!(err, Error::ProductNotFound(9999)));
    assert_eq!(provider.call_count(), 0);
  }

  #[tokio::test]
  async fn malformed_output_writes_nothing() {
    let (sz, store, _provider) = summarizer(
      MemStore::with_product(product(1)),
      ScriptedProvider::new(&["I cannot help with that."]),
    );

    let err = sz.get_or_create(1).await.unwrap_err();
    assert!(matches!(err, Error::Malformed(_)));
    assert!(store.summaries.lock().unwrap().is_empty());
  }

  #[tokio::test]
  async fn insert_race_loser_adopts_existing_record() {
    // The winner's row lands between this writer's cache check and its
    // insert; the insert must resolve to the existing record.
    let store = MemStore::with_product(product(7));
    let winner = Summary::Freeform { text: "winner".into() };
    store.summaries.lock().unwrap().insert(
      7,
      MemStore::record(7, &winner, "mock", "mock-model"),
    );

    let loser = Summary::Freeform { text: "loser".into() };
    let outcome = store.put_summary(7, &loser, "mock", "mock-model").await.unwrap();
    assert!(matches!(
      outcome,
      PutOutcome::Conflict(ref r) if r.summary == winner
    ));
  }

  #[tokio::test]
  async fn get_or_create_reports_lost_race_as_cached() {
    // A store whose cache check misses but whose insert always loses:
    // models the window between CHECK_CACHE and PERSIST.
    struct RacyStore {
      inner:  MemStore,
      winner: CachedSummary,
    }

    impl CatalogStore for RacyStore {
      type Error = Infallible;

      async fn get_product(&self, id: i64) -> Result<Option<Product>, Infallible> {
        self.inner.get_product(id).await
      }
      async fn list_products(&self) -> Result<Vec<Product>, Infallible> {
        self.inner.list_products().await
      }
      async fn upsert_product(&self, product: Product) -> Result<(), Infallible> {
        self.inner.upsert_product(product).await
      }
      async fn get_summary(&self, _product_id: i64) -> Result<Option<CachedSummary>, Infallible> {
        Ok(None)
      }
      async fn put_summary(
        &self,
        _product_id: i64,
        _summary: &Summary,
        _provider: &str,
        _model: &str,
      ) -> Result<PutOutcome, Infallible> {
        Ok(PutOutcome::Conflict(self.winner.clone()))
      }
      async fn replace_summary(
        &self,
        product_id: i64,
        summary: &Summary,
        provider: &str,
        model: &str,
      ) -> Result<CachedSummary, Infallible> {
        self.inner.replace_summary(product_id, summary, provider, model).await
      }
    }

    let winner_summary = Summary::Freeform { text: "winner".into() };
    let store = RacyStore {
      inner:  MemStore::with_product(product(1)),
      winner: MemStore::record(1, &winner_summary, "mock", "mock-model"),
    };
    let sz = Summarizer::new(
      Arc::new(store),
      Arc::new(ScriptedProvider::new(&[GOOD])),
    );

    // The caller sees the winner's content, flagged as cached — no error.
    let out = sz.get_or_create(1).await.unwrap();
    assert!(out.cached);
    assert_eq!(out.record.summary, winner_summary);
  }

  #[tokio::test]
  async fn provider_failure_writes_nothing() {
    struct FailingProvider;
    impl CompletionProvider for FailingProvider {
      async fn complete(&self, _s: &str, _u: &str) -> crate::provider::Result<String> {
        Err(crate::provider::ProviderError::Upstream {
          status: 503,
          body:   r#"{"error":"overloaded"}"#.into(),
        })
      }
      fn name(&self) -> &str { "mock" }
      fn model(&self) -> &str { "mock-model" }
    }

    let store = Arc::new(MemStore::with_product(product(1)));
    let sz = Summarizer::new(Arc::clone(&store), Arc::new(FailingProvider));

    let err = sz.get_or_create(1).await.unwrap_err();
    assert!(matches!(
      err,
      Error::Provider(crate::provider::ProviderError::Upstream { status: 503, .. })
    ));
    assert!(store.summaries.lock().unwrap().is_empty());
  }

  // ── regenerate ────────────────────────────────────────────────────────

  #[tokio::test]
  async fn regenerate_overwrites_cached_record() {
    let (sz, _store, provider) = summarizer(
      MemStore::with_product(product(1)),
      ScriptedProvider::new(&[GOOD, GOOD_ALT]),
    );

    let first = sz.get_or_create(1).await.unwrap();
    let second = sz.regenerate(1).await.unwrap();

    assert!(!second.cached);
    assert_ne!(first.record.summary, second.record.summary);
    assert_eq!(provider.call_count(), 2);

    // The overwrite is what subsequent reads see.
    let probed = sz.get_cached(1).await.unwrap().unwrap();
    assert_eq!(probed.summary, second.record.summary);
  }

  #[tokio::test]
  async fn regenerate_unknown_product_fails() {
    let (sz, _store, _provider) =
      summarizer(MemStore::default(), ScriptedProvider::new(&[GOOD]));
    let err = sz.regenerate(5).await.unwrap_err();
    assert!(matches!(err, Error::ProductNotFound(5)));
  }

  // ── probe ─────────────────────────────────────────────────────────────

  #[tokio::test]
  async fn probe_never_generates() {
    let (sz, _store, provider) =
      summarizer(MemStore::with_product(product(1)), ScriptedProvider::new(&[GOOD]));

    assert!(sz.get_cached(1).await.unwrap().is_none());
    assert_eq!(provider.call_count(), 0);
  }

  // Client-side abandonment does not cancel server work; there is no
  // cancellation path to test here — the pipeline always runs to
  // completion once entered.
}
