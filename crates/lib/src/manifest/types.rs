//! Manifest document types.
//!
//! The document is an explicit builder: pass-through members first, then
//! typed entries appended to named, ordered sequences. Insertion order is
//! what gets serialized.
//!
//! # Example
//!
//! ```json
//! {
//!   "name": "Demo",
//!   "start_url": "/",
//!   "icons": [
//!     { "src": "/pwa/icon-48x48-1a2b3c4d.png", "type": "image/png", "sizes": "48x48" }
//!   ],
//!   "shortcuts": [
//!     { "name": "Inbox", "url": "/inbox" }
//!   ]
//! }
//! ```

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::artifact::{IconEntry, ScreenshotEntry};

/// The web-app manifest produced by one generation run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ManifestDocument {
  #[serde(flatten)]
  members: Map<String, Value>,

  #[serde(default, skip_serializing_if = "Vec::is_empty")]
  icons: Vec<IconEntry>,

  #[serde(default, skip_serializing_if = "Vec::is_empty")]
  screenshots: Vec<ScreenshotEntry>,

  #[serde(default, skip_serializing_if = "Vec::is_empty")]
  shortcuts: Vec<ShortcutEntry>,
}

impl ManifestDocument {
  /// Start a document from configured members, dropping nulls and empty
  /// arrays/objects.
  pub fn from_members(members: &Map<String, Value>) -> Self {
    let members = members
      .iter()
      .filter(|(_, value)| !is_empty_value(value))
      .map(|(key, value)| (key.clone(), value.clone()))
      .collect();
    Self {
      members,
      ..Self::default()
    }
  }

  pub fn push_icon(&mut self, entry: IconEntry) {
    self.icons.push(entry);
  }

  pub fn push_screenshot(&mut self, entry: ScreenshotEntry) {
    self.screenshots.push(entry);
  }

  pub fn push_shortcut(&mut self, entry: ShortcutEntry) {
    self.shortcuts.push(entry);
  }

  pub fn members(&self) -> &Map<String, Value> {
    &self.members
  }

  pub fn icons(&self) -> &[IconEntry] {
    &self.icons
  }

  pub fn screenshots(&self) -> &[ScreenshotEntry] {
    &self.screenshots
  }

  pub fn shortcuts(&self) -> &[ShortcutEntry] {
    &self.shortcuts
  }

  /// Pretty-printed JSON; slashes and non-ASCII characters are not escaped.
  pub fn to_json(&self) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(self)
  }
}

fn is_empty_value(value: &Value) -> bool {
  match value {
    Value::Null => true,
    Value::Array(items) => items.is_empty(),
    Value::Object(map) => map.is_empty(),
    _ => false,
  }
}

/// A manifest `shortcuts[]` entry.
///
/// `icons` is only serialized when at least one shortcut icon was built.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShortcutEntry {
  pub name: String,

  #[serde(flatten)]
  pub fields: Map<String, Value>,

  #[serde(default, skip_serializing_if = "Vec::is_empty")]
  pub icons: Vec<IconEntry>,
}
