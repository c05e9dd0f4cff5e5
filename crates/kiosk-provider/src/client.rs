//! [`ChatCompletionClient`] — reqwest implementation of
//! [`CompletionProvider`].

use std::time::Duration;

use kiosk_core::provider::{CompletionProvider, ProviderError, Result};

use crate::wire::{ChatMessage, ChatRequest, ChatResponse};

/// Fixed operating parameters for summary generation.
const MAX_TOKENS: u32 = 350;
const TEMPERATURE: f32 = 0.4;

/// Provider name recorded in cached summary rows.
const PROVIDER_NAME: &str = "huggingface";

// ─── Configuration ───────────────────────────────────────────────────────────

/// Connection settings for the completion endpoint.
///
/// Constructed once at process start from the server configuration and
/// passed into the client; nothing here is re-read from the environment at
/// request time.
#[derive(Debug, Clone)]
pub struct ProviderConfig {
  /// Bearer credential. May be empty, in which case every `complete` call
  /// fails fast with [`ProviderError::MissingCredential`] before any
  /// network traffic.
  pub api_key:  String,
  pub model:    String,
  pub base_url: String,
  /// Bound on total request wall time; elapsing surfaces as
  /// [`ProviderError::Transport`].
  pub timeout:  Duration,
}

impl Default for ProviderConfig {
  fn default() -> Self {
    Self {
      api_key:  String::new(),
      model:    "google/gemma-2-2b-it".to_string(),
      base_url: "https://router.huggingface.co/v1".to_string(),
      timeout:  Duration::from_secs(60),
    }
  }
}

// ─── Client ──────────────────────────────────────────────────────────────────

/// Chat-completion client for any OpenAI-compatible endpoint.
///
/// Cheap to clone — the inner [`reqwest::Client`] is `Arc`-based.
#[derive(Clone)]
pub struct ChatCompletionClient {
  client: reqwest::Client,
  config: ProviderConfig,
}

impl ChatCompletionClient {
  pub fn new(config: ProviderConfig) -> Result<Self> {
    let client = reqwest::Client::builder()
      .timeout(config.timeout)
      .build()
      .map_err(|e| ProviderError::Transport(e.to_string()))?;
    Ok(Self { client, config })
  }

  fn endpoint(&self) -> String {
    format!(
      "{}/chat/completions",
      self.config.base_url.trim_end_matches('/')
    )
  }
}

impl CompletionProvider for ChatCompletionClient {
  async fn complete(&self, system: &str, user: &str) -> Result<String> {
    // Checked per invocation, before any network call.
    if self.config.api_key.is_empty() {
      return Err(ProviderError::MissingCredential);
    }

    let request = ChatRequest {
      model:       &self.config.model,
      messages:    vec![
        ChatMessage { role: "system", content: system },
        ChatMessage { role: "user", content: user },
      ],
      max_tokens:  MAX_TOKENS,
      temperature: TEMPERATURE,
    };

    tracing::debug!(model = %self.config.model, "issuing completion request");

    let response = self
      .client
      .post(self.endpoint())
      .bearer_auth(&self.config.api_key)
      .json(&request)
      .send()
      .await
      .map_err(|e| ProviderError::Transport(e.to_string()))?;

    let status = response.status();
    if !status.is_success() {
      // Keep the raw upstream payload intact for diagnostics.
      let body = response.text().await.unwrap_or_default();
      tracing::warn!(status = status.as_u16(), "provider returned error status");
      return Err(ProviderError::Upstream { status: status.as_u16(), body });
    }

    let parsed: ChatResponse = response
      .json()
      .await
      .map_err(|e| ProviderError::Transport(e.to_string()))?;

    parsed
      .choices
      .into_iter()
      .next()
      .map(|choice| choice.message.content)
      .ok_or_else(|| ProviderError::Upstream {
        status: status.as_u16(),
        body:   "provider response contained no choices".to_string(),
      })
  }

  fn name(&self) -> &str { PROVIDER_NAME }

  fn model(&self) -> &str { &self.config.model }
}
