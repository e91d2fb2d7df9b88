//! Media type probing from file content.
//!
//! The declared extension of a source file is never trusted; the stored
//! artifact's extension and `type` always come from the bytes.

use image::ImageFormat;

/// A probed media type and its canonical extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MediaType {
  pub mime: &'static str,
  pub extension: &'static str,
}

pub const SVG: MediaType = MediaType {
  mime: "image/svg+xml",
  extension: "svg",
};

/// Probe the media type of `data`.
///
/// Returns `None` when no candidate extension exists for the content.
pub fn probe(data: &[u8]) -> Option<MediaType> {
  if let Ok(format) = image::guess_format(data) {
    return from_image_format(format);
  }
  if looks_like_svg(data) {
    return Some(SVG);
  }
  None
}

/// Canonical media type for a raster format.
pub fn from_image_format(format: ImageFormat) -> Option<MediaType> {
  let extension = format.extensions_str().first()?;
  Some(MediaType {
    mime: format.to_mime_type(),
    extension,
  })
}

fn looks_like_svg(data: &[u8]) -> bool {
  let head = &data[..data.len().min(1024)];
  let Ok(text) = std::str::from_utf8(head).or_else(|e| std::str::from_utf8(&head[..e.valid_up_to()])) else {
    return false;
  };
  let text = text.trim_start_matches('\u{feff}').trim_start();

  if text.starts_with("<svg") {
    return true;
  }
  (text.starts_with("<?xml") || text.starts_with("<!DOCTYPE svg")) && text.contains("<svg")
}
