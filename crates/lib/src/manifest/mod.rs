//! Web-app manifest assembly.
//!
//! [`ManifestAssembler`] walks the `manifest` configuration in a fixed order
//! (pass-through members, icons, screenshots, shortcuts), turns every
//! configured image into a stored artifact and collects the entries into a
//! [`ManifestDocument`]. [`ManifestAssembler::generate`] then writes that
//! document exactly once.
//!
//! Artifacts written before a failure are left in place. The manifest file
//! itself is only written when the whole run succeeded.

mod types;

use std::path::PathBuf;

use tracing::{debug, info};

use crate::artifact::{ArtifactKind, IconEntry, ImageArtifactBuilder};
use crate::config::{IconSpec, ManifestConfig};
use crate::error::{PipelineError, Result};
use crate::imaging::ImageProcessor;
use crate::source::AssetSource;
use crate::store::{ArtifactSink, ArtifactStore, StoreOptions, StoredArtifact, normalize_folder};

pub use types::*;

/// Options of one generation run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssembleOptions {
  pub store: StoreOptions,
  /// Manifest location relative to the output root, normalized to `/name`.
  pub output_file: String,
}

impl AssembleOptions {
  pub fn new(public_url_prefix: impl Into<String>, output_root: impl Into<PathBuf>, asset_folder: &str, output_file: &str) -> Self {
    Self {
      store: StoreOptions::new(public_url_prefix, output_root, asset_folder),
      output_file: normalize_folder(output_file),
    }
  }

  pub fn manifest_path(&self) -> PathBuf {
    self.store.local_path(&self.output_file)
  }
}

/// Outcome of a successful [`ManifestAssembler::generate`] run.
#[derive(Debug, Clone)]
pub struct GenerationReport {
  pub manifest_path: PathBuf,
  pub document: ManifestDocument,
  /// Every artifact written, in write order.
  pub artifacts: Vec<StoredArtifact>,
  pub icon_count: usize,
  pub screenshot_count: usize,
  pub shortcut_count: usize,
}

pub struct ManifestAssembler<'a> {
  processor: Option<&'a dyn ImageProcessor>,
  source: &'a dyn AssetSource,
}

impl<'a> ManifestAssembler<'a> {
  /// An assembler without an image processor. Configurations with images
  /// fail with [`PipelineError::MissingProcessor`].
  pub fn new(source: &'a dyn AssetSource) -> Self {
    Self { processor: None, source }
  }

  pub fn with_processor(mut self, processor: &'a dyn ImageProcessor) -> Self {
    self.processor = Some(processor);
    self
  }

  /// Build the manifest document, storing every artifact through `store`.
  ///
  /// The whole configuration is validated before any source is read.
  pub fn assemble(&self, config: &ManifestConfig, store: &mut ArtifactStore<'_>) -> Result<ManifestDocument> {
    config.validate()?;

    let mut document = ManifestDocument::from_members(&config.members);
    debug!(members = document.members().len(), "pass-through members copied");

    if !config.icons.is_empty() {
      let builder = self.builder(ArtifactKind::Icon)?;
      store.prepare()?;
      for spec in &config.icons {
        for entry in self.build_icons(&builder, store, ArtifactKind::Icon, spec)? {
          document.push_icon(entry);
        }
      }
    }

    if !config.screenshots.is_empty() {
      let kind = ArtifactKind::Screenshot;
      let builder = self.builder(kind)?;
      store.prepare()?;
      for spec in &config.screenshots {
        let data = self.read(kind, &spec.src)?;
        let mut entry = builder.build_screenshot(store, &data, spec.format.as_deref(), spec.form_factor)?;
        entry.label = spec.label.clone();
        entry.platform = spec.platform.clone();
        document.push_screenshot(entry);
      }
    }

    if !config.shortcuts.is_empty() {
      let builder = if config.shortcuts.iter().any(|shortcut| shortcut.has_icons()) {
        let builder = self.builder(ArtifactKind::ShortcutIcon)?;
        store.prepare()?;
        Some(builder)
      } else {
        None
      };

      for shortcut in &config.shortcuts {
        let mut entry = ShortcutEntry {
          name: shortcut.name.clone(),
          fields: shortcut.fields.clone(),
          icons: Vec::new(),
        };
        if let Some(builder) = &builder {
          for spec in shortcut.icons.iter().flatten() {
            entry
              .icons
              .extend(self.build_icons(builder, store, ArtifactKind::ShortcutIcon, spec)?);
          }
        }
        document.push_shortcut(entry);
      }
    }

    Ok(document)
  }

  /// Assemble the manifest and write it to [`AssembleOptions::manifest_path`].
  pub fn generate(
    &self,
    config: &ManifestConfig,
    options: &AssembleOptions,
    sink: &mut dyn ArtifactSink,
  ) -> Result<GenerationReport> {
    let mut store = ArtifactStore::new(options.store.clone(), sink);
    let document = self.assemble(config, &mut store)?;
    let json = document.to_json()?;

    let manifest_path = options.manifest_path();
    store.write_file(&manifest_path, json.as_bytes())?;
    info!(path = %manifest_path.display(), "manifest written");

    let shortcut_count = document.shortcuts().len();
    Ok(GenerationReport {
      manifest_path,
      icon_count: document.icons().len(),
      screenshot_count: document.screenshots().len(),
      shortcut_count,
      document,
      artifacts: store.into_stored(),
    })
  }

  fn builder(&self, kind: ArtifactKind) -> Result<ImageArtifactBuilder<'a>> {
    let processor = self.processor.ok_or(PipelineError::MissingProcessor { kind })?;
    Ok(ImageArtifactBuilder::new(processor))
  }

  fn read(&self, kind: ArtifactKind, src: &str) -> Result<Vec<u8>> {
    self.source.read(src).map_err(|source| PipelineError::SourceRead {
      kind,
      src: src.to_string(),
      source,
    })
  }

  /// One entry per configured size, in configuration order.
  fn build_icons(
    &self,
    builder: &ImageArtifactBuilder<'_>,
    store: &mut ArtifactStore<'_>,
    kind: ArtifactKind,
    spec: &IconSpec,
  ) -> Result<Vec<IconEntry>> {
    let sizes = spec.sizes()?;
    if sizes.is_empty() {
      return Ok(Vec::new());
    }

    let data = self.read(kind, &spec.src)?;
    let format = spec.format.as_deref();
    let purpose = spec.purpose.as_ref();
    sizes
      .into_iter()
      .map(|size| match kind {
        ArtifactKind::ShortcutIcon => builder.build_shortcut_icon(store, &data, size, purpose, format),
        _ => builder.build_icon(store, &data, size, purpose, format),
      })
      .collect()
  }
}
