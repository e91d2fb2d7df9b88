use std::fmt;

use serde::{Deserialize, Serialize};

use crate::config::FormFactor;

/// The three kinds of image artifacts a manifest references.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ArtifactKind {
  Icon,
  ShortcutIcon,
  Screenshot,
}

impl ArtifactKind {
  /// Name used as the first naming component and in diagnostics.
  pub fn as_str(self) -> &'static str {
    match self {
      ArtifactKind::Icon => "icon",
      ArtifactKind::ShortcutIcon => "shortcut-icon",
      ArtifactKind::Screenshot => "screenshot",
    }
  }
}

impl fmt::Display for ArtifactKind {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

/// A manifest `icons[]` entry (also used inside shortcuts).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IconEntry {
  pub src: String,
  #[serde(rename = "type")]
  pub mime_type: String,
  pub sizes: String,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub purpose: Option<String>,
}

/// A manifest `screenshots[]` entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScreenshotEntry {
  pub src: String,
  #[serde(rename = "type")]
  pub mime_type: String,
  pub sizes: String,
  pub form_factor: FormFactor,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub label: Option<String>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub platform: Option<String>,
}
