use std::path::PathBuf;

use anyhow::{Context, Result};

use pwagen_lib::icons::{IconSetOptions, create_icons};
use pwagen_lib::imaging::RasterProcessor;
use pwagen_lib::store::FsSink;

use crate::output::{print_stat, print_success, print_written};

pub struct IconsArgs {
  pub source: PathBuf,
  pub output: PathBuf,
  pub sizes: Vec<u32>,
  pub filename: String,
  pub format: Option<String>,
}

pub fn cmd_icons(args: &IconsArgs) -> Result<()> {
  let options = IconSetOptions {
    filename: args.filename.clone(),
    format: args.format.clone(),
    sizes: args.sizes.clone(),
    ..IconSetOptions::new(&args.source, &args.output)
  };

  let written = create_icons(&options, &RasterProcessor::new(), &mut FsSink)
    .with_context(|| format!("Failed to generate icons from {}", args.source.display()))?;

  print_success("Icons generated");
  print_stat("Count", &written.len().to_string());
  for path in &written {
    print_written(&path.display().to_string());
  }

  Ok(())
}
