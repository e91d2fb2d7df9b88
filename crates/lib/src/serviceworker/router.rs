//! Named route resolution.
//!
//! Route templates are plain paths with `{param}` placeholders:
//!
//! ```text
//! downloads:        /downloads
//! download_status:  /downloads/{id}/status
//! ```
//!
//! Parameters consumed by the template are substituted (percent-encoded,
//! `/` kept). Leftover parameters are appended as a query string in the
//! order they were configured.

use std::collections::BTreeMap;

use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};
use serde_json::{Map, Value};
use thiserror::Error;
use tracing::debug;

use crate::config::{Configuration, UrlReference};

const QUERY: &AsciiSet = &NON_ALPHANUMERIC.remove(b'-').remove(b'_').remove(b'.').remove(b'~');
const PATH: &AsciiSet = &QUERY.remove(b'/');

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RouteError {
  #[error("unknown route: {0}")]
  UnknownRoute(String),

  #[error("route \"{route}\" is missing parameter \"{param}\"")]
  MissingParameter { route: String, param: String },

  #[error("unclosed parameter at position {pos} in route template \"{template}\"")]
  Unclosed { template: String, pos: usize },

  #[error("empty parameter name at position {pos} in route template \"{template}\"")]
  EmptyParameter { template: String, pos: usize },

  #[error("route \"{0}\" needs a base_url to be rendered as an absolute or network URL")]
  MissingBaseUrl(String),
}

/// Resolves a route name and parameters into a URL string.
pub trait Router {
  fn generate(&self, route: &str, params: &Map<String, Value>, reference: UrlReference) -> Result<String, RouteError>;
}

/// A parsed piece of a route template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
  Literal(String),
  Param(String),
}

/// Split a template into literal and `{param}` segments.
pub fn parse_template(template: &str) -> Result<Vec<Segment>, RouteError> {
  let mut segments = Vec::new();
  let mut literal = String::new();
  let mut chars = template.char_indices();

  while let Some((pos, ch)) = chars.next() {
    if ch != '{' {
      literal.push(ch);
      continue;
    }

    if !literal.is_empty() {
      segments.push(Segment::Literal(std::mem::take(&mut literal)));
    }

    let mut name = String::new();
    let mut found_close = false;
    for (_, c) in chars.by_ref() {
      if c == '}' {
        found_close = true;
        break;
      }
      name.push(c);
    }

    if !found_close {
      return Err(RouteError::Unclosed {
        template: template.to_string(),
        pos,
      });
    }
    let name = name.trim();
    if name.is_empty() {
      return Err(RouteError::EmptyParameter {
        template: template.to_string(),
        pos,
      });
    }
    segments.push(Segment::Param(name.to_string()));
  }

  if !literal.is_empty() {
    segments.push(Segment::Literal(literal));
  }

  Ok(segments)
}

/// Router backed by the `routes` table of the configuration.
#[derive(Debug, Clone, Default)]
pub struct RouteTable {
  routes: BTreeMap<String, Vec<Segment>>,
  base_url: Option<String>,
}

impl RouteTable {
  pub fn new(base_url: Option<String>) -> Self {
    Self {
      routes: BTreeMap::new(),
      base_url: base_url.map(|url| url.trim_end_matches('/').to_string()),
    }
  }

  /// Build the table from `routes` and `base_url`, rejecting malformed templates up front.
  pub fn from_config(config: &Configuration) -> Result<Self, RouteError> {
    let mut table = Self::new(config.base_url.clone());
    for (name, template) in &config.routes {
      table.add(name, template)?;
    }
    Ok(table)
  }

  pub fn add(&mut self, name: &str, template: &str) -> Result<(), RouteError> {
    let segments = parse_template(template)?;
    self.routes.insert(name.to_string(), segments);
    Ok(())
  }

  pub fn contains(&self, name: &str) -> bool {
    self.routes.contains_key(name)
  }

  fn render_path(&self, route: &str, params: &Map<String, Value>) -> Result<(String, Vec<String>), RouteError> {
    let Some(segments) = self.routes.get(route) else {
      // literal paths and full URLs are used as-is
      if route.starts_with('/') || route.contains("://") {
        return Ok((route.to_string(), Vec::new()));
      }
      return Err(RouteError::UnknownRoute(route.to_string()));
    };

    let mut path = String::new();
    let mut used = Vec::new();
    for segment in segments {
      match segment {
        Segment::Literal(text) => path.push_str(text),
        Segment::Param(name) => {
          let value = params.get(name).ok_or_else(|| RouteError::MissingParameter {
            route: route.to_string(),
            param: name.clone(),
          })?;
          path.extend(utf8_percent_encode(&param_to_string(value), PATH));
          used.push(name.clone());
        }
      }
    }
    Ok((path, used))
  }

  fn base_url(&self, route: &str) -> Result<&str, RouteError> {
    self
      .base_url
      .as_deref()
      .ok_or_else(|| RouteError::MissingBaseUrl(route.to_string()))
  }
}

impl Router for RouteTable {
  fn generate(&self, route: &str, params: &Map<String, Value>, reference: UrlReference) -> Result<String, RouteError> {
    let (path, used) = self.render_path(route, params)?;

    let query: Vec<String> = params
      .iter()
      .filter(|(key, _)| !used.contains(*key))
      .map(|(key, value)| {
        format!(
          "{}={}",
          utf8_percent_encode(key, QUERY),
          utf8_percent_encode(&param_to_string(value), QUERY)
        )
      })
      .collect();
    let mut url = path;
    if !query.is_empty() {
      url.push(if url.contains('?') { '&' } else { '?' });
      url.push_str(&query.join("&"));
    }

    if url.contains("://") {
      debug!(route, url = %url, "route resolved");
      return Ok(url);
    }

    let url = match reference {
      UrlReference::AbsolutePath => url,
      UrlReference::RelativePath => url.trim_start_matches('/').to_string(),
      UrlReference::AbsoluteUrl => format!("{}{}", self.base_url(route)?, url),
      UrlReference::NetworkPath => {
        let base = self.base_url(route)?;
        let host = base.split_once("://").map(|(_, rest)| rest).unwrap_or(base);
        format!("//{}{}", host, url)
      }
    };
    debug!(route, url = %url, "route resolved");
    Ok(url)
  }
}

fn param_to_string(value: &Value) -> String {
  match value {
    Value::String(s) => s.clone(),
    Value::Null => String::new(),
    other => other.to_string(),
  }
}
