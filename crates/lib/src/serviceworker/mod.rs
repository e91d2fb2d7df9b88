//! Service-worker script fragments.
//!
//! A generated service worker is the concatenation of the output of every
//! [`ServiceWorkerRule`], highest priority first. Rules only produce
//! JavaScript text; where it ends up is the caller's concern.

mod background_fetch;
mod router;
mod translator;

use std::cmp::Reverse;

use thiserror::Error;
use tracing::debug;

pub use background_fetch::{BackgroundFetchCache, emit};
pub use router::{RouteError, RouteTable, Router, Segment, parse_template};
pub use translator::{CatalogTranslator, Translator};

#[derive(Debug, Error)]
pub enum EmitError {
  #[error("unable to resolve background_fetch.{field}: {source}")]
  Route {
    field: &'static str,
    #[source]
    source: RouteError,
  },
}

/// A producer of one part of the service-worker script.
pub trait ServiceWorkerRule {
  fn process(&self, debug: bool) -> Result<String, EmitError>;

  /// Higher priorities are emitted first.
  fn priority(&self) -> i32;
}

/// Run every rule by descending priority and concatenate their output.
///
/// Rules with equal priority keep the order they were given in.
pub fn compose_rules(rules: &[&dyn ServiceWorkerRule], debug: bool) -> Result<String, EmitError> {
  let mut ordered = rules.to_vec();
  ordered.sort_by_key(|rule| Reverse(rule.priority()));

  let mut script = String::new();
  for rule in ordered {
    let fragment = rule.process(debug)?;
    debug!(priority = rule.priority(), bytes = fragment.len(), "rule processed");
    script.push_str(&fragment);
  }
  Ok(script)
}

/// Escape `value` for use inside a JavaScript string literal delimited by `quote`.
pub fn escape_js(value: &str, quote: char) -> String {
  let mut out = String::with_capacity(value.len());
  for ch in value.chars() {
    match ch {
      '\\' => out.push_str("\\\\"),
      '\n' => out.push_str("\\n"),
      '\r' => out.push_str("\\r"),
      '\t' => out.push_str("\\t"),
      '\u{2028}' => out.push_str("\\u2028"),
      '\u{2029}' => out.push_str("\\u2029"),
      c if c == quote => {
        out.push('\\');
        out.push(c);
      }
      c => out.push(c),
    }
  }
  out
}
