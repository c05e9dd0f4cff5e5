//! Encoding and decoding helpers between Rust domain types and the
//! plain-text representations stored in SQLite columns.
//!
//! Timestamps are stored as RFC 3339 strings. Summaries are stored as
//! compact JSON in whichever shape they carry.

use chrono::{DateTime, Utc};
use kiosk_core::summary::{CachedSummary, Summary};

use crate::{Error, Result};

// ─── DateTime<Utc> ───────────────────────────────────────────────────────────

pub fn encode_dt(dt: DateTime<Utc>) -> String { dt.to_rfc3339() }

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::DateParse(e.to_string()))
}

// ─── Summary ─────────────────────────────────────────────────────────────────

pub fn encode_summary(summary: &Summary) -> Result<String> {
  Ok(serde_json::to_string(summary)?)
}

pub fn decode_summary(s: &str) -> Result<Summary> {
  Ok(serde_json::from_str(s)?)
}

// ─── Row types ───────────────────────────────────────────────────────────────

/// Raw values read directly from a `product_summaries` row.
pub struct RawSummaryRow {
  pub product_id:   i64,
  pub summary_json: String,
  pub provider:     String,
  pub model:        String,
  pub created_at:   String,
}

impl RawSummaryRow {
  pub fn into_record(self) -> Result<CachedSummary> {
    Ok(CachedSummary {
      product_id: self.product_id,
      summary:    decode_summary(&self.summary_json)?,
      provider:   self.provider,
      model:      self.model,
      created_at: decode_dt(&self.created_at)?,
    })
  }
}
