//! Wire types for the chat-completion endpoint.

use serde::{Deserialize, Serialize};

// ─── Request ─────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct ChatRequest<'a> {
  pub model:       &'a str,
  pub messages:    Vec<ChatMessage<'a>>,
  pub max_tokens:  u32,
  pub temperature: f32,
}

#[derive(Debug, Serialize)]
pub struct ChatMessage<'a> {
  /// `"system"` or `"user"`.
  pub role:    &'a str,
  pub content: &'a str,
}

// ─── Response ────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct ChatResponse {
  pub choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
pub struct ChatChoice {
  pub message: ResponseMessage,
}

#[derive(Debug, Deserialize)]
pub struct ResponseMessage {
  pub content: String,
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn request_serializes_to_provider_shape() {
    let req = ChatRequest {
      model:       "google/gemma-2-2b-it",
      messages:    vec![
        ChatMessage { role: "system", content: "be neutral" },
        ChatMessage { role: "user", content: "summarise this" },
      ],
      max_tokens:  350,
      temperature: 0.4,
    };

    let json = serde_json::to_value(&req).unwrap();
    assert_eq!(json["model"], "google/gemma-2-2b-it");
    assert_eq!(json["messages"][0]["role"], "system");
    assert_eq!(json["messages"][1]["content"], "summarise this");
    assert_eq!(json["max_tokens"], 350);
  }

  #[test]
  fn response_deserializes_choices() {
    let raw = r#"{
      "id": "cmpl-1",
      "choices": [{"index": 0, "message": {"role": "assistant", "content": "{\"text\":\"ok\"}"}}]
    }"#;
    let resp: ChatResponse = serde_json::from_str(raw).unwrap();
    assert_eq!(resp.choices.len(), 1);
    assert_eq!(resp.choices[0].message.content, r#"{"text":"ok"}"#);
  }

  #[test]
  fn response_tolerates_empty_choices() {
    let resp: ChatResponse = serde_json::from_str(r#"{"choices": []}"#).unwrap();
    assert!(resp.choices.is_empty());
  }
}
