//! Implementation of the `pwagen build` command.
//!
//! Loads the configuration, stores every icon, screenshot and shortcut icon
//! under the public folder and writes the manifest.

use std::path::PathBuf;
use std::time::Instant;

use anyhow::{Context, Result};
use serde::Serialize;
use tracing::info;

use pwagen_lib::imaging::RasterProcessor;
use pwagen_lib::manifest::{AssembleOptions, GenerationReport, ManifestAssembler};
use pwagen_lib::source::FsSource;
use pwagen_lib::store::FsSink;

use super::{config_dir, load};
use crate::output::{OutputFormat, format_duration, print_json, print_stat, print_success, print_written};

pub struct BuildArgs {
  pub config: Option<PathBuf>,
  pub url_prefix: String,
  pub public_folder: PathBuf,
  pub asset_folder: String,
  pub output: String,
}

#[derive(Serialize)]
struct BuildSummary {
  manifest: PathBuf,
  artifacts: Vec<String>,
  icons: usize,
  screenshots: usize,
  shortcuts: usize,
}

impl From<&GenerationReport> for BuildSummary {
  fn from(report: &GenerationReport) -> Self {
    Self {
      manifest: report.manifest_path.clone(),
      artifacts: report
        .artifacts
        .iter()
        .map(|artifact| artifact.reference.src.clone())
        .collect(),
      icons: report.icon_count,
      screenshots: report.screenshot_count,
      shortcuts: report.shortcut_count,
    }
  }
}

pub fn cmd_build(args: &BuildArgs, format: OutputFormat) -> Result<()> {
  let start = Instant::now();
  let (path, config) = load(args.config.as_deref())?;
  config.validate().context("Invalid configuration")?;
  info!(config = %path.display(), "configuration loaded");

  let source = FsSource::new(config_dir(&path));
  let processor = RasterProcessor::new();
  let options = AssembleOptions::new(
    args.url_prefix.as_str(),
    args.public_folder.as_path(),
    &args.asset_folder,
    &args.output,
  );

  let report = ManifestAssembler::new(&source)
    .with_processor(&processor)
    .generate(&config.manifest, &options, &mut FsSink)
    .context("Manifest generation failed")?;

  let summary = BuildSummary::from(&report);
  if format.is_json() {
    print_json(&summary)?;
  } else {
    print_success(&format!("Manifest written to {}", report.manifest_path.display()));
    print_stat("Icons", &report.icon_count.to_string());
    print_stat("Screenshots", &report.screenshot_count.to_string());
    print_stat("Shortcuts", &report.shortcut_count.to_string());
    print_stat("Artifacts", &report.artifacts.len().to_string());
    for src in &summary.artifacts {
      print_written(src);
    }
    print_stat("Duration", &format_duration(start.elapsed()));
  }

  Ok(())
}
