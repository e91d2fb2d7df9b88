//! Implementation of the `pwagen sw` command.
//!
//! Renders the background fetch service-worker fragments from the
//! configuration, either to stdout or to a file.

use std::path::PathBuf;

use anyhow::{Context, Result};

use pwagen_lib::serviceworker::{BackgroundFetchCache, CatalogTranslator, RouteTable, compose_rules};
use pwagen_lib::store::{ArtifactSink, FsSink};

use super::load;
use crate::output::{print_info, print_success};

pub struct SwArgs {
  pub config: Option<PathBuf>,
  pub output: Option<PathBuf>,
  pub debug: bool,
}

pub fn cmd_sw(args: &SwArgs) -> Result<()> {
  let (_, config) = load(args.config.as_deref())?;
  config
    .background_fetch
    .validate()
    .context("Invalid background_fetch configuration")?;

  let router = RouteTable::from_config(&config).context("Invalid route table")?;
  let translator = CatalogTranslator::new(config.translations.clone());
  let background_fetch = BackgroundFetchCache::new(&config.background_fetch, &router, &translator);

  let script = compose_rules(&[&background_fetch], args.debug).context("Failed to render service worker")?;

  match &args.output {
    Some(path) => {
      let mut sink = FsSink;
      if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
        sink
          .ensure_dir(parent)
          .with_context(|| format!("Failed to create {}", parent.display()))?;
      }
      sink
        .write(path, script.as_bytes())
        .with_context(|| format!("Failed to write {}", path.display()))?;
      print_success(&format!("Service worker written to {}", path.display()));
    }
    None if script.is_empty() => print_info("Background fetch is disabled, nothing to emit"),
    None => print!("{}", script),
  }

  Ok(())
}
