//! Summary types — the AI-derived analysis of a product.
//!
//! Two shapes exist in the wild: the structured pros/cons object current
//! models emit, and the freeform text blob produced by older models. Both
//! must persist and render; consumers switch on the variant explicitly.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ─── Summary ─────────────────────────────────────────────────────────────────

/// An AI-generated product summary.
///
/// Serialised untagged so the persisted JSON matches what the model emits:
/// a structured summary is a flat `{one_liner, pros, cons, best_for}`
/// object, a freeform one is `{text}`. On deserialisation the structured
/// shape is tried first; an object carrying `one_liner` always resolves to
/// [`Summary::Structured`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Summary {
  /// The current structured shape. Array cardinality is instructed in the
  /// prompt (pros 2–5, cons 1–4, best_for 1–3) but deliberately not
  /// enforced here; absent arrays deserialise as empty.
  Structured {
    one_liner: String,
    #[serde(default)]
    pros:      Vec<String>,
    #[serde(default)]
    cons:      Vec<String>,
    #[serde(default)]
    best_for:  Vec<String>,
  },
  /// Legacy free-form shape from older/alternate models.
  Freeform { text: String },
}

impl Summary {
  /// Short label for logs.
  pub fn shape(&self) -> &'static str {
    match self {
      Self::Structured { .. } => "structured",
      Self::Freeform { .. } => "freeform",
    }
  }
}

// ─── CachedSummary ───────────────────────────────────────────────────────────

/// The persisted, at-most-one-per-product result of a successful generation.
///
/// Created once by the get-or-create path and replaced only by an explicit
/// regeneration; uniqueness is enforced by the store's key constraint on
/// `product_id`, not by application locking.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CachedSummary {
  pub product_id: i64,
  pub summary:    Summary,
  /// Provider name the summary came from (e.g. `"huggingface"`).
  pub provider:   String,
  /// Model identifier used for generation.
  pub model:      String,
  /// Server-assigned write timestamp.
  pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn structured_roundtrips_as_flat_object() {
    let s = Summary::Structured {
      one_liner: "Compact daily driver".into(),
      pros:      vec!["cheap".into(), "light".into()],
      cons:      vec!["slow".into()],
      best_for:  vec!["students".into()],
    };
    let json = serde_json::to_value(&s).unwrap();
    assert_eq!(json["one_liner"], "Compact daily driver");
    assert!(json.get("text").is_none());

    let back: Summary = serde_json::from_value(json).unwrap();
    assert_eq!(back, s);
  }

  #[test]
  fn freeform_roundtrips() {
    let s = Summary::Freeform { text: "A decent phone overall.".into() };
    let json = serde_json::to_string(&s).unwrap();
    assert_eq!(json, r#"{"text":"A decent phone overall."}"#);

    let back: Summary = serde_json::from_str(&json).unwrap();
    assert_eq!(back, s);
  }

  #[test]
  fn structured_with_missing_arrays_defaults_empty() {
    let back: Summary =
      serde_json::from_str(r#"{"one_liner":"x"}"#).unwrap();
    assert!(matches!(
      back,
      Summary::Structured { ref pros, ref cons, ref best_for, .. }
        if pros.is_empty() && cons.is_empty() && best_for.is_empty()
    ));
  }
}
