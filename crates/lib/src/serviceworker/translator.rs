//! Message translation for service-worker UI strings.

use std::collections::BTreeMap;

use tracing::debug;

use crate::consts::TRANSLATION_DOMAIN;

pub trait Translator {
  /// Translate `key` in this translator's message domain.
  fn translate(&self, key: &str) -> String;
}

/// Catalog lookup; unknown keys translate to themselves.
#[derive(Debug, Clone)]
pub struct CatalogTranslator {
  domain: String,
  catalog: BTreeMap<String, String>,
}

impl CatalogTranslator {
  pub fn new(catalog: BTreeMap<String, String>) -> Self {
    Self {
      domain: TRANSLATION_DOMAIN.to_string(),
      catalog,
    }
  }

  pub fn domain(&self) -> &str {
    &self.domain
  }
}

impl Default for CatalogTranslator {
  fn default() -> Self {
    Self::new(BTreeMap::new())
  }
}

impl Translator for CatalogTranslator {
  fn translate(&self, key: &str) -> String {
    match self.catalog.get(key) {
      Some(message) => message.clone(),
      None => {
        debug!(domain = %self.domain, key, "no translation, using key");
        key.to_string()
      }
    }
  }
}
