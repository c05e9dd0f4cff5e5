//! Server configuration, deserialised from `config.toml` and `KIOSK__*`
//! environment overrides.

use std::{
  path::{Path, PathBuf},
  time::Duration,
};

use serde::Deserialize;

/// Runtime server configuration.
#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
  pub host:       String,
  pub port:       u16,
  pub store_path: PathBuf,
  pub provider:   ProviderSettings,
}

/// The `[provider]` section.
///
/// `api_key` defaults to empty: the server starts without a credential but
/// every generation request fails with a configuration error until one is
/// set.
#[derive(Debug, Deserialize, Clone)]
pub struct ProviderSettings {
  #[serde(default)]
  pub api_key:      String,
  #[serde(default = "default_model")]
  pub model:        String,
  #[serde(default = "default_base_url")]
  pub base_url:     String,
  #[serde(default = "default_timeout_secs")]
  pub timeout_secs: u64,
}

fn default_model() -> String { "google/gemma-2-2b-it".to_string() }

fn default_base_url() -> String { "https://router.huggingface.co/v1".to_string() }

fn default_timeout_secs() -> u64 { 60 }

impl ProviderSettings {
  pub fn to_provider_config(&self) -> kiosk_provider::ProviderConfig {
    kiosk_provider::ProviderConfig {
      api_key:  self.api_key.clone(),
      model:    self.model.clone(),
      base_url: self.base_url.clone(),
      timeout:  Duration::from_secs(self.timeout_secs),
    }
  }
}

/// Expand a leading `~` to the user's home directory.
pub fn expand_tilde(path: &Path) -> PathBuf {
  let s = path.to_string_lossy();
  if let Some(rest) = s.strip_prefix("~/")
    && let Ok(home) = std::env::var("HOME")
  {
    return PathBuf::from(home).join(rest);
  }
  path.to_path_buf()
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn full_config_parses() {
    let raw = r#"
      host = "127.0.0.1"
      port = 3001
      store_path = "kiosk.db"

      [provider]
      api_key = "hf_test"
      model = "google/gemma-2-2b-it"
    "#;

    let cfg: ServerConfig = config::Config::builder()
      .add_source(config::File::from_str(raw, config::FileFormat::Toml))
      .build()
      .unwrap()
      .try_deserialize()
      .unwrap();

    assert_eq!(cfg.port, 3001);
    assert_eq!(cfg.provider.api_key, "hf_test");
    // Unset fields fall back to defaults.
    assert_eq!(cfg.provider.base_url, "https://router.huggingface.co/v1");
    assert_eq!(cfg.provider.timeout_secs, 60);
  }

  #[test]
  fn provider_section_defaults_to_no_credential() {
    let raw = r#"
      host = "0.0.0.0"
      port = 3001
      store_path = "kiosk.db"

      [provider]
    "#;

    let cfg: ServerConfig = config::Config::builder()
      .add_source(config::File::from_str(raw, config::FileFormat::Toml))
      .build()
      .unwrap()
      .try_deserialize()
      .unwrap();

    assert!(cfg.provider.api_key.is_empty());
  }

  #[test]
  fn tilde_expansion() {
    // Only applies to a leading "~/".
    assert_eq!(
      expand_tilde(Path::new("/var/kiosk.db")),
      PathBuf::from("/var/kiosk.db")
    );
    if let Ok(home) = std::env::var("HOME") {
      assert_eq!(
        expand_tilde(Path::new("~/kiosk.db")),
        PathBuf::from(home).join("kiosk.db")
      );
    }
  }
}
