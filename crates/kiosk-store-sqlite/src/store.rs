//! [`SqliteStore`] — the SQLite implementation of [`CatalogStore`].

use std::path::Path;

use chrono::Utc;
use rusqlite::OptionalExtension as _;

use kiosk_core::{
  product::Product,
  store::{CatalogStore, PutOutcome},
  summary::{CachedSummary, Summary},
};

use crate::{
  Error, Result,
  encode::{RawSummaryRow, encode_dt, encode_summary},
  schema::SCHEMA,
};

const SELECT_SUMMARY: &str =
  "SELECT product_id, summary_json, provider, model, created_at
   FROM product_summaries WHERE product_id = ?1";

const SELECT_PRODUCT: &str =
  "SELECT product_id, title, brand, category, price, description
   FROM products WHERE product_id = ?1";

// ─── Store ───────────────────────────────────────────────────────────────────

/// A kiosk catalog store backed by a single SQLite file.
///
/// Cloning is cheap — the inner connection is reference-counted.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store — useful for testing.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }
}

fn row_to_product(row: &rusqlite::Row<'_>) -> rusqlite::Result<Product> {
  Ok(Product {
    id:          row.get(0)?,
    title:       row.get(1)?,
    brand:       row.get(2)?,
    category:    row.get(3)?,
    price:       row.get(4)?,
    description: row.get(5)?,
  })
}

fn row_to_raw_summary(row: &rusqlite::Row<'_>) -> rusqlite::Result<RawSummaryRow> {
  Ok(RawSummaryRow {
    product_id:   row.get(0)?,
    summary_json: row.get(1)?,
    provider:     row.get(2)?,
    model:        row.get(3)?,
    created_at:   row.get(4)?,
  })
}

// ─── CatalogStore impl ───────────────────────────────────────────────────────

impl CatalogStore for SqliteStore {
  type Error = Error;

  // ── Products ──────────────────────────────────────────────────────────────

  async fn get_product(&self, id: i64) -> Result<Option<Product>> {
    let product = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(SELECT_PRODUCT, rusqlite::params![id], row_to_product)
            .optional()?,
        )
      })
      .await?;
    Ok(product)
  }

  async fn list_products(&self) -> Result<Vec<Product>> {
    let products = self
      .conn
      .call(|conn| {
        let mut stmt = conn.prepare(
          "SELECT product_id, title, brand, category, price, description
           FROM products ORDER BY product_id",
        )?;
        let rows = stmt
          .query_map([], row_to_product)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;
    Ok(products)
  }

  async fn upsert_product(&self, product: Product) -> Result<()> {
    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO products (product_id, title, brand, category, price, description)
           VALUES (?1, ?2, ?3, ?4, ?5, ?6)
           ON CONFLICT(product_id) DO UPDATE SET
             title       = excluded.title,
             brand       = excluded.brand,
             category    = excluded.category,
             price       = excluded.price,
             description = excluded.description",
          rusqlite::params![
            product.id,
            product.title,
            product.brand,
            product.category,
            product.price,
            product.description,
          ],
        )?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  // ── Summary cache ─────────────────────────────────────────────────────────

  async fn get_summary(&self, product_id: i64) -> Result<Option<CachedSummary>> {
    let raw: Option<RawSummaryRow> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(SELECT_SUMMARY, rusqlite::params![product_id], row_to_raw_summary)
            .optional()?,
        )
      })
      .await?;

    raw.map(RawSummaryRow::into_record).transpose()
  }

  async fn put_summary(
    &self,
    product_id: i64,
    summary: &Summary,
    provider: &str,
    model: &str,
  ) -> Result<PutOutcome> {
    let created_at = Utc::now();
    let summary_json = encode_summary(summary)?;
    let created_at_str = encode_dt(created_at);
    let provider_owned = provider.to_owned();
    let model_owned = model.to_owned();

    enum RawPut {
      Inserted,
      Conflict(RawSummaryRow),
    }

    let raw = self
      .conn
      .call(move |conn| {
        let inserted = conn.execute(
          "INSERT INTO product_summaries (product_id, summary_json, provider, model, created_at)
           VALUES (?1, ?2, ?3, ?4, ?5)",
          rusqlite::params![
            product_id,
            summary_json,
            provider_owned,
            model_owned,
            created_at_str,
          ],
        );

        match inserted {
          Ok(_) => Ok(RawPut::Inserted),
          Err(rusqlite::Error::SqliteFailure(e, msg))
            if e.code == rusqlite::ErrorCode::ConstraintViolation =>
          {
            // A concurrent writer got there first: re-read its row. A
            // foreign-key violation also lands here but has no row to
            // read, so it falls through as the original error.
            let existing = conn
              .query_row(SELECT_SUMMARY, rusqlite::params![product_id], row_to_raw_summary)
              .optional()?;
            match existing {
              Some(row) => Ok(RawPut::Conflict(row)),
              None => Err(rusqlite::Error::SqliteFailure(e, msg).into()),
            }
          }
          Err(e) => Err(e.into()),
        }
      })
      .await?;

    match raw {
      RawPut::Inserted => Ok(PutOutcome::Inserted(CachedSummary {
        product_id,
        summary: summary.clone(),
        provider: provider.to_owned(),
        model: model.to_owned(),
        created_at,
      })),
      RawPut::Conflict(row) => Ok(PutOutcome::Conflict(row.into_record()?)),
    }
  }

  async fn replace_summary(
    &self,
    product_id: i64,
    summary: &Summary,
    provider: &str,
    model: &str,
  ) -> Result<CachedSummary> {
    let record = CachedSummary {
      product_id,
      summary: summary.clone(),
      provider: provider.to_owned(),
      model: model.to_owned(),
      created_at: Utc::now(),
    };

    let summary_json = encode_summary(summary)?;
    let created_at_str = encode_dt(record.created_at);
    let provider_owned = provider.to_owned();
    let model_owned = model.to_owned();

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO product_summaries (product_id, summary_json, provider, model, created_at)
           VALUES (?1, ?2, ?3, ?4, ?5)
           ON CONFLICT(product_id) DO UPDATE SET
             summary_json = excluded.summary_json,
             provider     = excluded.provider,
             model        = excluded.model,
             created_at   = excluded.created_at",
          rusqlite::params![
            product_id,
            summary_json,
            provider_owned,
            model_owned,
            created_at_str,
          ],
        )?;
        Ok(())
      })
      .await?;

    Ok(record)
  }
}
