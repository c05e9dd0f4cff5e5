//! API error type and [`axum::response::IntoResponse`] implementation.
//!
//! All externally-visible failures collapse into one `{ ok: false, error }`
//! envelope; provider failures additionally carry the raw upstream payload
//! under `details` for diagnostics.

use axum::{
  Json,
  http::StatusCode,
  response::{IntoResponse, Response},
};
use kiosk_core::provider::ProviderError;
use serde_json::json;
use thiserror::Error;

/// An error returned by an API handler.
#[derive(Debug, Error)]
pub enum ApiError {
  #[error("not found: {0}")]
  NotFound(String),

  /// Server-side misconfiguration (missing provider credential).
  #[error("configuration error: {0}")]
  Config(String),

  /// The upstream provider failed, or its output was unusable.
  #[error("bad gateway: {message}")]
  Upstream {
    message: String,
    /// Raw provider payload, when one exists.
    details: Option<serde_json::Value>,
  },

  #[error("store error: {0}")]
  Store(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl From<kiosk_core::Error> for ApiError {
  fn from(e: kiosk_core::Error) -> Self {
    match e {
      kiosk_core::Error::ProductNotFound(_) => {
        ApiError::NotFound("Product not found".to_string())
      }
      kiosk_core::Error::Provider(ProviderError::MissingCredential) => {
        ApiError::Config("provider credential missing in server config".to_string())
      }
      kiosk_core::Error::Provider(ProviderError::Upstream { status, body }) => {
        // Prefer the provider's own JSON error body; fall back to the raw
        // text when it isn't JSON.
        let details = Some(
          serde_json::from_str(&body)
            .unwrap_or_else(|_| serde_json::Value::String(body)),
        );
        ApiError::Upstream {
          message: format!("provider returned status {status}"),
          details,
        }
      }
      kiosk_core::Error::Provider(ProviderError::Transport(msg)) => ApiError::Upstream {
        message: format!("provider unreachable: {msg}"),
        details: None,
      },
      kiosk_core::Error::Malformed(e) => ApiError::Upstream {
        message: format!("could not generate summary: {e}"),
        details: None,
      },
      kiosk_core::Error::Store(e) => ApiError::Store(e),
    }
  }
}

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    let (status, body) = match self {
      ApiError::NotFound(m) => {
        (StatusCode::NOT_FOUND, json!({ "ok": false, "error": m }))
      }
      ApiError::Config(m) => (
        StatusCode::INTERNAL_SERVER_ERROR,
        json!({ "ok": false, "error": m }),
      ),
      ApiError::Upstream { message, details } => {
        let mut body = json!({ "ok": false, "error": message });
        if let Some(details) = details {
          body["details"] = details;
        }
        (StatusCode::BAD_GATEWAY, body)
      }
      ApiError::Store(e) => (
        StatusCode::INTERNAL_SERVER_ERROR,
        json!({ "ok": false, "error": e.to_string() }),
      ),
    };
    (status, Json(body)).into_response()
  }
}
