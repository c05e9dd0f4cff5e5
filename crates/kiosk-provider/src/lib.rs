//! HTTP chat-completion client for kiosk.
//!
//! Implements [`kiosk_core::provider::CompletionProvider`] against any
//! OpenAI-compatible `/chat/completions` endpoint (the catalog deployment
//! targets the Hugging Face router). One request per call, no retries,
//! raw upstream error bodies passed through for diagnostics.

mod client;
mod wire;

pub use client::{ChatCompletionClient, ProviderConfig};
