//! The `CompletionProvider` trait and its error type.
//!
//! A provider turns a (system, user) prompt pair into raw model text. One
//! request per call, no internal retry — retries are caller policy, and in
//! kiosk the caller policy is "the user presses regenerate".

use std::future::Future;

use thiserror::Error;

// ─── Error ───────────────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ProviderError {
  /// The API credential is not configured. Detected before any network
  /// call is issued.
  #[error("provider credential missing")]
  MissingCredential,

  /// The provider answered with a non-success status. `body` carries the
  /// raw provider payload, unmodified, for diagnostics.
  #[error("provider returned status {status}")]
  Upstream { status: u16, body: String },

  /// Network-level failure reaching the provider, including request
  /// timeouts.
  #[error("transport error: {0}")]
  Transport(String),
}

pub type Result<T, E = ProviderError> = std::result::Result<T, E>;

// ─── Trait ───────────────────────────────────────────────────────────────────

/// Abstraction over an external chat-completion service.
pub trait CompletionProvider: Send + Sync {
  /// Issue a single completion request and return the raw message content.
  fn complete<'a>(
    &'a self,
    system: &'a str,
    user: &'a str,
  ) -> impl Future<Output = Result<String>> + Send + 'a;

  /// Provider name recorded alongside cached summaries (e.g.
  /// `"huggingface"`).
  fn name(&self) -> &str;

  /// Model identifier recorded alongside cached summaries.
  fn model(&self) -> &str;
}
