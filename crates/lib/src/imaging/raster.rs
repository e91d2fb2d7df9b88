use std::io::Cursor;

use image::imageops::FilterType;
use image::{DynamicImage, ImageFormat, ImageReader};
use tracing::debug;

use super::{Dimensions, ImageError, ImageProcessor};

/// Raster image processor backed by the `image` crate.
#[derive(Debug, Clone, Copy)]
pub struct RasterProcessor {
  filter: FilterType,
}

impl Default for RasterProcessor {
  fn default() -> Self {
    Self {
      filter: FilterType::Lanczos3,
    }
  }
}

impl RasterProcessor {
  pub fn new() -> Self {
    Self::default()
  }
}

/// Resolve a format name (`png`, `.webp`, `jpeg`, `image/avif`, ...).
pub fn parse_format(name: &str) -> Result<ImageFormat, ImageError> {
  let trimmed = name.trim().trim_start_matches('.');
  ImageFormat::from_extension(trimmed)
    .or_else(|| ImageFormat::from_mime_type(trimmed))
    .ok_or_else(|| ImageError::UnsupportedFormat(name.to_string()))
}

impl ImageProcessor for RasterProcessor {
  fn process(
    &self,
    data: &[u8],
    width: Option<u32>,
    height: Option<u32>,
    format: Option<&str>,
  ) -> Result<Vec<u8>, ImageError> {
    let target = match format {
      Some(name) => parse_format(name)?,
      None => image::guess_format(data).map_err(|e| ImageError::Decode(e.to_string()))?,
    };

    let img = image::load_from_memory(data).map_err(|e| ImageError::Decode(e.to_string()))?;

    let img = match (width, height) {
      (Some(w), Some(h)) => img.resize_exact(w, h, self.filter),
      (Some(w), None) => img.resize(w, u32::MAX, self.filter),
      (None, Some(h)) => img.resize(u32::MAX, h, self.filter),
      (None, None) => img,
    };

    // JPEG has no alpha channel
    let img = if target == ImageFormat::Jpeg {
      DynamicImage::ImageRgb8(img.to_rgb8())
    } else {
      img
    };

    let mut out = Cursor::new(Vec::new());
    img.write_to(&mut out, target).map_err(|e| ImageError::Encode {
      format: format!("{:?}", target).to_lowercase(),
      message: e.to_string(),
    })?;

    let out = out.into_inner();
    debug!(width = img.width(), height = img.height(), bytes = out.len(), "image processed");
    Ok(out)
  }

  fn dimensions(&self, data: &[u8]) -> Result<Dimensions, ImageError> {
    let (width, height) = ImageReader::new(Cursor::new(data))
      .with_guessed_format()
      .map_err(|e| ImageError::Decode(e.to_string()))?
      .into_dimensions()
      .map_err(|e| ImageError::Decode(e.to_string()))?;
    Ok(Dimensions { width, height })
  }
}
