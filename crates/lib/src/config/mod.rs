//! Configuration loading and validation.
//!
//! The configuration file is read once per run (JSON or YAML, chosen by
//! extension) and is read-only afterwards. Everything derived from it lives
//! in the manifest being assembled, never in the configuration itself.

mod types;

use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::debug;

use crate::consts::{CONFIG_ENV_VAR, DEFAULT_CONFIG_FILE};

pub use types::*;

/// Errors that can occur while loading the configuration file.
#[derive(Debug, Error)]
pub enum ConfigError {
  #[error("failed to read config {}: {source}", path.display())]
  Read { path: PathBuf, source: std::io::Error },

  #[error("failed to parse JSON config {}: {source}", path.display())]
  ParseJson { path: PathBuf, source: serde_json::Error },

  #[error("failed to parse YAML config {}: {source}", path.display())]
  ParseYaml { path: PathBuf, source: serde_yaml::Error },

  #[error("unsupported config format: {} (expected .json, .yaml or .yml)", path.display())]
  UnsupportedFormat { path: PathBuf },
}

/// Returns the configuration file to use when none is given.
///
/// `PWAGEN_CONFIG` takes precedence over `pwa.yaml` in the working directory.
pub fn default_config_path() -> PathBuf {
  if let Ok(path) = std::env::var(CONFIG_ENV_VAR) {
    return PathBuf::from(path);
  }
  PathBuf::from(DEFAULT_CONFIG_FILE)
}

/// Load a configuration file.
pub fn load_config(path: &Path) -> Result<Configuration, ConfigError> {
  let extension = path
    .extension()
    .and_then(|ext| ext.to_str())
    .map(|ext| ext.to_ascii_lowercase());

  let content = match extension.as_deref() {
    Some("json" | "yaml" | "yml") => fs::read_to_string(path).map_err(|source| ConfigError::Read {
      path: path.to_path_buf(),
      source,
    })?,
    _ => {
      return Err(ConfigError::UnsupportedFormat {
        path: path.to_path_buf(),
      });
    }
  };

  debug!(path = %path.display(), "loading configuration");

  if extension.as_deref() == Some("json") {
    parse_json(&content).map_err(|source| ConfigError::ParseJson {
      path: path.to_path_buf(),
      source,
    })
  } else {
    parse_yaml(&content).map_err(|source| ConfigError::ParseYaml {
      path: path.to_path_buf(),
      source,
    })
  }
}

pub fn parse_json(content: &str) -> Result<Configuration, serde_json::Error> {
  serde_json::from_str(content)
}

pub fn parse_yaml(content: &str) -> Result<Configuration, serde_yaml::Error> {
  serde_yaml::from_str(content)
}

impl Configuration {
  /// Check required configuration and every icon size.
  ///
  /// Runs before any image is processed or any file is written.
  pub fn validate(&self) -> Result<(), ValidationError> {
    self.manifest.validate()?;
    self.background_fetch.validate()
  }
}

impl BackgroundFetchSpec {
  /// Check the background fetch section alone, independent of the manifest.
  pub fn validate(&self) -> Result<(), ValidationError> {
    if self.enabled && self.cache_name.trim().is_empty() {
      return Err(ValidationError::MissingField("background_fetch.cache_name".to_string()));
    }
    for (field, url) in [("progress_url", &self.progress_url), ("success_url", &self.success_url)] {
      if url.as_ref().is_some_and(|url| url.path.trim().is_empty()) {
        return Err(ValidationError::MissingField(format!("background_fetch.{}.path", field)));
      }
    }
    Ok(())
  }
}

impl ManifestConfig {
  pub fn validate(&self) -> Result<(), ValidationError> {
    for (index, icon) in self.icons.iter().enumerate() {
      validate_icon(icon, &format!("manifest.icons[{}]", index))?;
    }

    for (index, screenshot) in self.screenshots.iter().enumerate() {
      if screenshot.src.trim().is_empty() {
        return Err(ValidationError::MissingField(format!("manifest.screenshots[{}].src", index)));
      }
    }

    for (index, shortcut) in self.shortcuts.iter().enumerate() {
      if shortcut.name.trim().is_empty() {
        return Err(ValidationError::MissingField(format!("manifest.shortcuts[{}].name", index)));
      }
      for (icon_index, icon) in shortcut.icons.iter().flatten().enumerate() {
        validate_icon(icon, &format!("manifest.shortcuts[{}].icons[{}]", index, icon_index))?;
      }
    }

    Ok(())
  }
}

fn validate_icon(icon: &IconSpec, location: &str) -> Result<(), ValidationError> {
  if icon.src.trim().is_empty() {
    return Err(ValidationError::MissingField(format!("{}.src", location)));
  }
  icon.sizes()?;
  Ok(())
}
