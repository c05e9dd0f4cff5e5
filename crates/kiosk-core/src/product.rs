//! Product — the catalog record the summary engine reads.
//!
//! Products are sourced from an external catalog and owned by the store;
//! the summary engine never mutates one.

use serde::{Deserialize, Serialize};

/// A catalog item, keyed by the upstream catalog's numeric id.
///
/// Every field except `id` and `title` is optional — upstream records are
/// frequently sparse, and the prompt builder must cope with any combination
/// of missing fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
  pub id:          i64,
  pub title:       String,
  pub brand:       Option<String>,
  pub category:    Option<String>,
  pub price:       Option<f64>,
  pub description: Option<String>,
}
