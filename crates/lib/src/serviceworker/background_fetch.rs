//! Background fetch cache rule.
//!
//! When enabled, finished background fetches are copied into a named cache.
//! Optional fragments open a page on notification click and set the
//! notification title on success or failure. Fragments are appended in a
//! fixed order: cache copy, success click, progress click, success title,
//! failure title.

use tracing::debug;

use super::{EmitError, Router, ServiceWorkerRule, Translator, escape_js};
use crate::config::{BackgroundFetchSpec, UrlSpec};

pub struct BackgroundFetchCache<'a> {
  spec: &'a BackgroundFetchSpec,
  router: &'a dyn Router,
  translator: &'a dyn Translator,
}

impl<'a> BackgroundFetchCache<'a> {
  pub const PRIORITY: i32 = 1024;

  pub fn new(spec: &'a BackgroundFetchSpec, router: &'a dyn Router, translator: &'a dyn Translator) -> Self {
    Self {
      spec,
      router,
      translator,
    }
  }

  fn resolve(&self, field: &'static str, url: &UrlSpec) -> Result<String, EmitError> {
    self
      .router
      .generate(&url.path, &url.params, url.path_type_reference)
      .map_err(|source| EmitError::Route { field, source })
  }
}

impl ServiceWorkerRule for BackgroundFetchCache<'_> {
  fn process(&self, _debug: bool) -> Result<String, EmitError> {
    let spec = self.spec;
    if !spec.enabled {
      return Ok(String::new());
    }

    let mut script = cache_fragment(&spec.cache_name);

    if let Some(url) = &spec.success_url {
      let url = self.resolve("success_url", url)?;
      script.push_str(&click_fragment(&url, "!=="));
    }

    if let Some(url) = &spec.progress_url {
      let url = self.resolve("progress_url", url)?;
      script.push_str(&click_fragment(&url, "==="));
    }

    if let Some(message) = &spec.success_message {
      script.push_str(&title_fragment("backgroundfetchsuccess", &self.translator.translate(message)));
    }

    if let Some(message) = &spec.failure_message {
      script.push_str(&title_fragment("backgroundfetchfail", &self.translator.translate(message)));
    }

    debug!(cache = %spec.cache_name, bytes = script.len(), "background fetch fragments emitted");
    Ok(script)
  }

  fn priority(&self) -> i32 {
    Self::PRIORITY
  }
}

/// Emit the background fetch fragments for `spec`. Empty when disabled.
pub fn emit(spec: &BackgroundFetchSpec, router: &dyn Router, translator: &dyn Translator) -> Result<String, EmitError> {
  BackgroundFetchCache::new(spec, router, translator).process(false)
}

fn cache_fragment(cache_name: &str) -> String {
  format!(
    r#"
// Background Fetch Cache
addEventListener('backgroundfetchsuccess', event => {{
  event.waitUntil(
    (async () => {{
      try {{
        const cache = await caches.open('{cache}');
        const records = await event.registration.matchAll();
        const promises = records.map(async record => {{
          const response = await record.responseReady;
          await cache.put(record.request, response);
        }});
        await Promise.all(promises);
      }} catch (err) {{
        console.error(err)
      }}
    }})()
  );
}});
"#,
    cache = escape_js(cache_name, '\'')
  )
}

/// `skip_when` is the comparison against `'success'` that makes the handler bail out.
fn click_fragment(url: &str, skip_when: &str) -> String {
  format!(
    r#"
addEventListener('backgroundfetchclick', (event) => {{
  const bgFetch = event.registration;
  console.log('Background Fetch Cache: click');
  if (bgFetch.result {skip_when} 'success') {{
    console.log('Background Fetch Cache: success');
    return;
  }}
  console.log('Background Fetch Cache: openWindow {url}');
  clients.openWindow('{url}');
}});
"#,
    url = escape_js(url, '\'')
  )
}

fn title_fragment(event: &str, title: &str) -> String {
  format!(
    r#"
addEventListener("{event}", (event) => {{
  event.updateUI({{ title: "{title}" }});
}});
"#,
    title = escape_js(title, '"')
  )
}

#[cfg(test)]
mod tests {
  use serde_json::json;

  use super::*;
  use crate::config::UrlReference;
  use crate::serviceworker::{CatalogTranslator, RouteTable};
  use crate::util::testutil::RecordingTranslator;

  fn enabled() -> BackgroundFetchSpec {
    BackgroundFetchSpec {
      enabled: true,
      cache_name: "v1".to_string(),
      ..BackgroundFetchSpec::default()
    }
  }

  fn url(path: &str) -> UrlSpec {
    UrlSpec {
      path: path.to_string(),
      params: serde_json::Map::new(),
      path_type_reference: UrlReference::AbsolutePath,
    }
  }

  fn routes() -> RouteTable {
    let mut table = RouteTable::new(Some("https://app.example.com".to_string()));
    table.add("downloads_done", "/downloads/done").unwrap();
    table.add("download", "/downloads/{id}").unwrap();
    table
  }

  fn listeners(script: &str) -> usize {
    script.matches("addEventListener(").count()
  }

  #[test]
  fn disabled_emits_nothing() {
    let spec = BackgroundFetchSpec {
      success_url: Some(url("downloads_done")),
      success_message: Some("Done".to_string()),
      ..BackgroundFetchSpec::default()
    };
    let script = emit(&spec, &routes(), &CatalogTranslator::default()).unwrap();
    assert_eq!(script, "");
  }

  #[test]
  fn enabled_without_extras_emits_only_the_cache_copy() {
    let translator = RecordingTranslator::new();
    let script = emit(&enabled(), &routes(), &translator).unwrap();

    assert_eq!(listeners(&script), 1);
    assert!(script.starts_with("\n// Background Fetch Cache\n"));
    assert!(script.contains("const cache = await caches.open('v1');"));
    assert!(!script.contains("backgroundfetchclick"));
    assert!(!script.contains("updateUI"));
    assert!(translator.keys().is_empty());
  }

  #[test]
  fn fragments_follow_fixed_order() {
    let spec = BackgroundFetchSpec {
      progress_url: Some(UrlSpec {
        path: "download".to_string(),
        params: json!({"id": 7}).as_object().unwrap().clone(),
        path_type_reference: UrlReference::AbsoluteUrl,
      }),
      success_url: Some(url("downloads_done")),
      success_message: Some("bg.success".to_string()),
      failure_message: Some("bg.failure".to_string()),
      ..enabled()
    };
    let mut catalog = std::collections::BTreeMap::new();
    catalog.insert("bg.success".to_string(), "All done".to_string());
    catalog.insert("bg.failure".to_string(), "Download failed".to_string());
    let translator = CatalogTranslator::new(catalog);

    let script = emit(&spec, &routes(), &translator).unwrap();
    assert_eq!(listeners(&script), 5);

    let cache = script.find("caches.open('v1')").unwrap();
    let success_click = script.find("if (bgFetch.result !== 'success')").unwrap();
    let progress_click = script.find("if (bgFetch.result === 'success')").unwrap();
    let success_title = script.find(r#"addEventListener("backgroundfetchsuccess""#).unwrap();
    let failure_title = script.find(r#"addEventListener("backgroundfetchfail""#).unwrap();
    assert!(cache < success_click);
    assert!(success_click < progress_click);
    assert!(progress_click < success_title);
    assert!(success_title < failure_title);

    assert!(script.contains("clients.openWindow('/downloads/done');"));
    assert!(script.contains("clients.openWindow('https://app.example.com/downloads/7');"));
    assert!(script.contains(r#"event.updateUI({ title: "All done" });"#));
    assert!(script.contains(r#"event.updateUI({ title: "Download failed" });"#));
  }

  #[test]
  fn empty_message_still_emits_and_translates() {
    let translator = RecordingTranslator::new();
    let spec = BackgroundFetchSpec {
      success_message: Some(String::new()),
      ..enabled()
    };

    let script = emit(&spec, &routes(), &translator).unwrap();
    assert_eq!(translator.keys(), vec![String::new()]);
    assert_eq!(listeners(&script), 2);
    assert!(script.contains(r#"event.updateUI({ title: "" });"#));
    assert!(!script.contains("backgroundfetchfail"));
  }

  #[test]
  fn values_are_escaped_for_their_quotes() {
    let spec = BackgroundFetchSpec {
      cache_name: "it's".to_string(),
      failure_message: Some(r#"Say "retry""#.to_string()),
      ..enabled()
    };
    let script = emit(&spec, &routes(), &CatalogTranslator::default()).unwrap();
    assert!(script.contains(r"caches.open('it\'s')"));
    assert!(script.contains(r#"title: "Say \"retry\"""#));
  }

  #[test]
  fn unresolvable_route_is_an_error() {
    let spec = BackgroundFetchSpec {
      progress_url: Some(url("missing_route")),
      ..enabled()
    };
    let err = emit(&spec, &routes(), &CatalogTranslator::default()).unwrap_err();
    assert!(matches!(err, EmitError::Route { field: "progress_url", .. }));
  }

  #[test]
  fn declares_its_priority() {
    let spec = enabled();
    let routes = routes();
    let translator = CatalogTranslator::default();
    let rule = BackgroundFetchCache::new(&spec, &routes, &translator);
    assert_eq!(rule.priority(), 1024);
    assert_eq!(rule.process(true).unwrap(), rule.process(false).unwrap());
  }
}
