//! Error types for `kiosk-core`.
//!
//! One failure taxonomy for the whole generation pipeline. None of these
//! are ever cached — a failed attempt leaves no record, so the next request
//! retries from a clean slate.

use thiserror::Error;

use crate::{parse::ParseError, provider::ProviderError};

#[derive(Debug, Error)]
pub enum Error {
  /// The requested product does not exist in the catalog store.
  #[error("product not found: {0}")]
  ProductNotFound(i64),

  /// The completion provider failed (missing credential, upstream error
  /// status, or a transport-level failure). Never retried automatically.
  #[error(transparent)]
  Provider(#[from] ProviderError),

  /// The provider answered but its output could not be parsed into a
  /// summary.
  #[error("malformed model output: {0}")]
  Malformed(#[from] ParseError),

  #[error("store error: {0}")]
  Store(#[source] Box<dyn std::error::Error + Send + Sync>),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
