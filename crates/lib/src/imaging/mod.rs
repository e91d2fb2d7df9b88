//! Image-processing collaborator.
//!
//! Decoding, resizing and encoding are not part of the pipeline itself. The
//! pipeline only asks an [`ImageProcessor`] for final bytes and pixel
//! dimensions. [`RasterProcessor`] is the bundled implementation.

mod raster;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use raster::{RasterProcessor, parse_format};

/// Errors reported by an image processor.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ImageError {
  #[error("failed to decode image: {0}")]
  Decode(String),

  #[error("failed to encode image as {format}: {message}")]
  Encode { format: String, message: String },

  #[error("unsupported image format: {0}")]
  UnsupportedFormat(String),
}

/// Pixel dimensions of an image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Dimensions {
  pub width: u32,
  pub height: u32,
}

impl Dimensions {
  /// The manifest `sizes` label, `{width}x{height}`.
  pub fn label(&self) -> String {
    format!("{}x{}", self.width, self.height)
  }
}

pub trait ImageProcessor {
  /// Produce final bytes.
  ///
  /// Resizes when a width and/or height is given and re-encodes to `format`
  /// (an extension such as `png` or `webp`) when one is given. Without a
  /// format the source encoding is kept.
  fn process(
    &self,
    data: &[u8],
    width: Option<u32>,
    height: Option<u32>,
    format: Option<&str>,
  ) -> Result<Vec<u8>, ImageError>;

  /// Inspect the pixel dimensions of encoded bytes.
  fn dimensions(&self, data: &[u8]) -> Result<Dimensions, ImageError>;
}
