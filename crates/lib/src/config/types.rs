use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

use crate::consts::DEFAULT_CACHE_NAME;

/// The whole configuration tree, loaded once per run and never mutated.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Configuration {
  /// Web-app manifest members plus the image sections.
  #[serde(default)]
  pub manifest: ManifestConfig,

  #[serde(default)]
  pub background_fetch: BackgroundFetchSpec,

  /// Base used by the route table for `absolute_url` and `network_path` references.
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub base_url: Option<String>,

  /// Named routes: `name -> path template` with `{param}` placeholders.
  #[serde(default)]
  pub routes: BTreeMap<String, String>,

  /// Message catalog for the `pwa` translation domain.
  #[serde(default)]
  pub translations: BTreeMap<String, String>,
}

/// The `manifest` section.
///
/// Every key other than `icons`, `screenshots` and `shortcuts` is a
/// pass-through member copied into the generated manifest in file order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ManifestConfig {
  #[serde(default)]
  pub icons: Vec<IconSpec>,

  #[serde(default)]
  pub screenshots: Vec<ScreenshotSpec>,

  #[serde(default)]
  pub shortcuts: Vec<ShortcutSpec>,

  #[serde(flatten)]
  pub members: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IconSpec {
  pub src: String,

  /// Raw sizes as written in the file; see [`IconSpec::sizes`].
  #[serde(default)]
  pub sizes: Vec<SizeValue>,

  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub format: Option<String>,

  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub purpose: Option<IconPurpose>,
}

impl IconSpec {
  /// Validate every configured size, in configuration order.
  ///
  /// A single bad size fails the whole spec.
  pub fn sizes(&self) -> Result<Vec<IconSize>, ValidationError> {
    self
      .sizes
      .iter()
      .map(|value| {
        value.to_icon_size().ok_or_else(|| ValidationError::InvalidSize {
          src: self.src.clone(),
          value: value.to_string(),
        })
      })
      .collect()
  }
}

/// An icon size as found in configuration, before validation.
///
/// Sizes are kept loose so that `-1`, `1.5`, `"big"` or `null` reach
/// validation and fail the run with a [`ValidationError`] instead of a parse
/// error.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SizeValue {
  Integer(i64),
  Float(f64),
  Text(String),
  Other(Value),
}

impl SizeValue {
  /// Returns the size if it is a non-negative integer-valued quantity.
  pub fn to_icon_size(&self) -> Option<IconSize> {
    match self {
      SizeValue::Integer(n) => u32::try_from(*n).ok().map(IconSize),
      SizeValue::Float(f) if f.is_finite() && f.fract() == 0.0 && *f >= 0.0 && *f <= u32::MAX as f64 => {
        Some(IconSize(*f as u32))
      }
      _ => None,
    }
  }
}

impl fmt::Display for SizeValue {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      SizeValue::Integer(n) => write!(f, "{}", n),
      SizeValue::Float(x) => write!(f, "{}", x),
      SizeValue::Text(s) => write!(f, "\"{}\"", s),
      SizeValue::Other(value) => write!(f, "{}", value),
    }
  }
}

/// A validated square icon size. `0` means "any size, no resize".
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct IconSize(pub u32);

impl IconSize {
  pub const ANY: IconSize = IconSize(0);

  pub fn is_any(self) -> bool {
    self.0 == 0
  }

  /// The manifest `sizes` label: `any` or `{n}x{n}`.
  pub fn label(self) -> String {
    if self.is_any() {
      "any".to_string()
    } else {
      format!("{}x{}", self.0, self.0)
    }
  }
}

impl fmt::Display for IconSize {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(&self.label())
  }
}

/// Manifest icon purpose hint.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum IconPurpose {
  Any,
  Maskable,
  Monochrome,
  /// Anything else, e.g. the space separated `"any maskable"`.
  Other(String),
}

impl IconPurpose {
  pub fn as_str(&self) -> &str {
    match self {
      IconPurpose::Any => "any",
      IconPurpose::Maskable => "maskable",
      IconPurpose::Monochrome => "monochrome",
      IconPurpose::Other(s) => s,
    }
  }
}

impl From<String> for IconPurpose {
  fn from(value: String) -> Self {
    match value.as_str() {
      "any" => IconPurpose::Any,
      "maskable" => IconPurpose::Maskable,
      "monochrome" => IconPurpose::Monochrome,
      _ => IconPurpose::Other(value),
    }
  }
}

impl From<IconPurpose> for String {
  fn from(value: IconPurpose) -> Self {
    match value {
      IconPurpose::Other(s) => s,
      other => other.as_str().to_string(),
    }
  }
}

impl fmt::Display for IconPurpose {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

/// Screenshot orientation category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FormFactor {
  Wide,
  Narrow,
}

impl FormFactor {
  /// `wide` only when strictly wider than tall; squares are `narrow`.
  pub fn infer(width: u32, height: u32) -> Self {
    if width > height {
      FormFactor::Wide
    } else {
      FormFactor::Narrow
    }
  }

  pub fn as_str(self) -> &'static str {
    match self {
      FormFactor::Wide => "wide",
      FormFactor::Narrow => "narrow",
    }
  }
}

impl fmt::Display for FormFactor {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScreenshotSpec {
  pub src: String,

  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub format: Option<String>,

  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub form_factor: Option<FormFactor>,

  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub label: Option<String>,

  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub platform: Option<String>,
}

/// A manifest shortcut. Fields other than `name` and `icons` pass through.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShortcutSpec {
  pub name: String,

  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub icons: Option<Vec<IconSpec>>,

  #[serde(flatten)]
  pub fields: Map<String, Value>,
}

impl ShortcutSpec {
  pub fn has_icons(&self) -> bool {
    self.icons.as_ref().is_some_and(|icons| !icons.is_empty())
  }
}

/// Background fetch cache policy and UI hooks.
///
/// `success_message`/`failure_message`: `None` omits the handler, while
/// `Some("")` still emits it with an empty title.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BackgroundFetchSpec {
  #[serde(default)]
  pub enabled: bool,

  #[serde(default = "default_cache_name")]
  pub cache_name: String,

  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub progress_url: Option<UrlSpec>,

  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub success_url: Option<UrlSpec>,

  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub success_message: Option<String>,

  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub failure_message: Option<String>,
}

fn default_cache_name() -> String {
  DEFAULT_CACHE_NAME.to_string()
}

impl Default for BackgroundFetchSpec {
  fn default() -> Self {
    Self {
      enabled: false,
      cache_name: default_cache_name(),
      progress_url: None,
      success_url: None,
      success_message: None,
      failure_message: None,
    }
  }
}

/// A route reference resolved through the router collaborator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UrlSpec {
  /// Route name, or a literal path/URL.
  pub path: String,

  #[serde(default)]
  pub params: Map<String, Value>,

  #[serde(default)]
  pub path_type_reference: UrlReference,
}

/// Kind of URL a route is rendered as.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UrlReference {
  AbsoluteUrl,
  #[default]
  AbsolutePath,
  RelativePath,
  NetworkPath,
}

/// Configuration that fails the run before anything is written.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
  #[error("icon size must be a non-negative integer, got {value} for icon \"{src}\"")]
  InvalidSize { src: String, value: String },

  #[error("missing required configuration: {0}")]
  MissingField(String),
}
