//! Summary parser — extracts a [`Summary`] from raw model output.
//!
//! Models are instructed to emit only a JSON object but routinely wrap it
//! in prose or code fences. The parser tries a strict parse of the whole
//! text first, then falls back to the substring between the first `{` and
//! the last `}` inclusive. No third attempt is made.

use thiserror::Error;

use crate::summary::Summary;

// ─── Error ───────────────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ParseError {
  #[error("no JSON object found in model output")]
  NoJsonObject,

  #[error("model output is not valid JSON: {0}")]
  InvalidJson(#[source] serde_json::Error),

  /// Valid JSON, but the object carries neither `one_liner` nor `text`.
  #[error("JSON value is not a recognisable summary shape")]
  UnrecognizedShape,
}

pub type Result<T, E = ParseError> = std::result::Result<T, E>;

// ─── Parser ──────────────────────────────────────────────────────────────────

/// Parse raw model output into a [`Summary`].
///
/// Field cardinality (pros 2–5 etc.) is a prompt instruction, not a
/// response constraint — absent arrays deserialise as empty and no bound
/// is checked here.
pub fn parse_summary(raw: &str) -> Result<Summary> {
  let value = extract_json(raw)?;
  serde_json::from_value(value).map_err(|_| ParseError::UnrecognizedShape)
}

/// Strict parse of the full text, else strict parse of the first-`{` to
/// last-`}` slice.
fn extract_json(raw: &str) -> Result<serde_json::Value> {
  match serde_json::from_str(raw) {
    Ok(v) => Ok(v),
    Err(_) => {
      let start = raw.find('{').ok_or(ParseError::NoJsonObject)?;
      let end = raw.rfind('}').ok_or(ParseError::NoJsonObject)?;
      if end < start {
        return Err(ParseError::NoJsonObject);
      }
      serde_json::from_str(&raw[start..=end]).map_err(ParseError::InvalidJson)
    }
  }
}
