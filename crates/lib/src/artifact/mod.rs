//! Icon, shortcut icon and screenshot artifacts.
//!
//! [`ImageArtifactBuilder`] turns raw source bytes into final bytes through
//! the image processor, applies the manifest vocabulary rules (`sizes`,
//! `purpose`, `form_factor`) and stores the result through an
//! [`ArtifactStore`].

mod types;

use tracing::debug;

use crate::config::{FormFactor, IconPurpose, IconSize};
use crate::error::{PipelineError, Result};
use crate::imaging::ImageProcessor;
use crate::store::ArtifactStore;

pub use types::*;

pub struct ImageArtifactBuilder<'p> {
  processor: &'p dyn ImageProcessor,
}

impl<'p> ImageArtifactBuilder<'p> {
  pub fn new(processor: &'p dyn ImageProcessor) -> Self {
    Self { processor }
  }

  /// Build a manifest icon.
  ///
  /// Size `any` keeps the source bytes untouched; any other size is resized
  /// to a square (and re-encoded to `format` when given).
  pub fn build_icon(
    &self,
    store: &mut ArtifactStore<'_>,
    data: &[u8],
    size: IconSize,
    purpose: Option<&IconPurpose>,
    format: Option<&str>,
  ) -> Result<IconEntry> {
    self.build_square(store, ArtifactKind::Icon, data, size, purpose, format)
  }

  /// Same as [`Self::build_icon`], named `shortcut-icon-*`.
  pub fn build_shortcut_icon(
    &self,
    store: &mut ArtifactStore<'_>,
    data: &[u8],
    size: IconSize,
    purpose: Option<&IconPurpose>,
    format: Option<&str>,
  ) -> Result<IconEntry> {
    self.build_square(store, ArtifactKind::ShortcutIcon, data, size, purpose, format)
  }

  /// Build a manifest screenshot.
  ///
  /// `sizes` always reflects the final bytes. Without a declared form
  /// factor it is inferred from them.
  pub fn build_screenshot(
    &self,
    store: &mut ArtifactStore<'_>,
    data: &[u8],
    format: Option<&str>,
    form_factor: Option<FormFactor>,
  ) -> Result<ScreenshotEntry> {
    let kind = ArtifactKind::Screenshot;
    let reencoded;
    let data = match format {
      Some(format) => {
        reencoded = self
          .processor
          .process(data, None, None, Some(format))
          .map_err(|source| PipelineError::Image { kind, source })?;
        reencoded.as_slice()
      }
      None => data,
    };

    let dimensions = self
      .processor
      .dimensions(data)
      .map_err(|source| PipelineError::Image { kind, source })?;
    let sizes = dimensions.label();
    let form_factor = form_factor.unwrap_or_else(|| FormFactor::infer(dimensions.width, dimensions.height));
    debug!(sizes = %sizes, form_factor = %form_factor, "screenshot inspected");

    let reference = store.store(
      data,
      kind.as_str(),
      &[Some(kind.as_str()), Some(form_factor.as_str()), Some(sizes.as_str())],
    )?;

    Ok(ScreenshotEntry {
      src: reference.src,
      mime_type: reference.mime_type,
      sizes,
      form_factor,
      label: None,
      platform: None,
    })
  }

  fn build_square(
    &self,
    store: &mut ArtifactStore<'_>,
    kind: ArtifactKind,
    data: &[u8],
    size: IconSize,
    purpose: Option<&IconPurpose>,
    format: Option<&str>,
  ) -> Result<IconEntry> {
    let resized;
    let data = if size.is_any() {
      data
    } else {
      resized = self
        .processor
        .process(data, Some(size.0), Some(size.0), format)
        .map_err(|source| PipelineError::Image { kind, source })?;
      resized.as_slice()
    };

    let label = size.label();
    let purpose = purpose.map(IconPurpose::as_str);
    let reference = store.store(data, kind.as_str(), &[Some(kind.as_str()), purpose, Some(label.as_str())])?;

    Ok(IconEntry {
      src: reference.src,
      mime_type: reference.mime_type,
      sizes: label,
      purpose: purpose.map(str::to_string),
    })
  }
}
