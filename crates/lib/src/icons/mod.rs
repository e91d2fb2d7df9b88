//! Standalone icon-set generation.
//!
//! Resizes one source image into a set of square icons named
//! `<filename>-<n>x<n>.<format>`, independent of any manifest.

use std::fs;
use std::path::PathBuf;

use thiserror::Error;
use tracing::info;

use crate::consts::DEFAULT_ICON_SIZES;
use crate::imaging::{ImageError, ImageProcessor};
use crate::store::{ArtifactSink, media};

#[derive(Debug, Error)]
pub enum IconSetError {
  #[error("source file not found: {}", .0.display())]
  SourceMissing(PathBuf),

  #[error("failed to read {}: {source}", path.display())]
  SourceRead { path: PathBuf, source: std::io::Error },

  #[error("unable to determine the format of {}, pass one explicitly", .0.display())]
  UnknownFormat(PathBuf),

  #[error("icon sizes must be positive, got 0")]
  ZeroSize,

  #[error("failed to create directory {}: {source}", path.display())]
  CreateDir { path: PathBuf, source: std::io::Error },

  #[error("failed to generate the {size}x{size} icon: {source}")]
  Image { size: u32, source: ImageError },

  #[error("failed to write {}: {source}", path.display())]
  Write { path: PathBuf, source: std::io::Error },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IconSetOptions {
  pub source: PathBuf,
  pub output_dir: PathBuf,
  /// File name stem shared by every icon.
  pub filename: String,
  /// Target format; probed from the source when absent.
  pub format: Option<String>,
  pub sizes: Vec<u32>,
}

impl IconSetOptions {
  pub fn new(source: impl Into<PathBuf>, output_dir: impl Into<PathBuf>) -> Self {
    Self {
      source: source.into(),
      output_dir: output_dir.into(),
      filename: "icon".to_string(),
      format: None,
      sizes: DEFAULT_ICON_SIZES.to_vec(),
    }
  }
}

/// Generate every icon of the set, in size order, returning the written paths.
pub fn create_icons(
  options: &IconSetOptions,
  processor: &dyn ImageProcessor,
  sink: &mut dyn ArtifactSink,
) -> Result<Vec<PathBuf>, IconSetError> {
  if !options.source.is_file() {
    return Err(IconSetError::SourceMissing(options.source.clone()));
  }
  if options.sizes.contains(&0) {
    return Err(IconSetError::ZeroSize);
  }

  let data = fs::read(&options.source).map_err(|source| IconSetError::SourceRead {
    path: options.source.clone(),
    source,
  })?;

  let format = match &options.format {
    Some(format) => format.trim().trim_start_matches('.').to_lowercase(),
    None => media::probe(&data)
      .map(|media| media.extension.to_string())
      .ok_or_else(|| IconSetError::UnknownFormat(options.source.clone()))?,
  };

  sink
    .ensure_dir(&options.output_dir)
    .map_err(|source| IconSetError::CreateDir {
      path: options.output_dir.clone(),
      source,
    })?;

  let mut written = Vec::with_capacity(options.sizes.len());
  for &size in &options.sizes {
    let bytes = processor
      .process(&data, Some(size), Some(size), Some(format.as_str()))
      .map_err(|source| IconSetError::Image { size, source })?;

    let path = options
      .output_dir
      .join(format!("{}-{}x{}.{}", options.filename, size, size, format));
    sink.write(&path, &bytes).map_err(|source| IconSetError::Write {
      path: path.clone(),
      source,
    })?;
    info!(path = %path.display(), size, "icon written");
    written.push(path);
  }

  Ok(written)
}
