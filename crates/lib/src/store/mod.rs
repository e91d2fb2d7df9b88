//! Content-named artifact storage.
//!
//! Every artifact is written under the public folder with a deterministic
//! name built from its naming components and a short content hash.
//!
//! # Layout
//!
//! ```text
//! <output_root>/
//! └── <asset_folder>/
//!     ├── icon-maskable-192x192-1a2b3c4d.png
//!     ├── shortcut-icon-any-9f8e7d6c.svg
//!     └── screenshot-wide-1280x720-0a1b2c3d.webp
//! ```
//!
//! Storing the same bytes with the same components twice resolves to the
//! same path, and the second write replaces the first with identical content.

pub mod media;
pub mod sink;

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info};

use crate::util::hash::{ArtifactHash, hash_bytes};

pub use media::MediaType;
pub use sink::{ArtifactSink, FsSink, MemorySink};

/// Errors raised while persisting artifacts.
#[derive(Debug, Error)]
pub enum StorageError {
  #[error("unable to determine the media type of the {kind} artifact")]
  UnknownMediaType { kind: String },

  #[error("failed to create directory {}: {source}", path.display())]
  CreateDir { path: PathBuf, source: std::io::Error },

  #[error("failed to write {}: {source}", path.display())]
  Write { path: PathBuf, source: std::io::Error },
}

/// Public reference to a stored artifact, as it appears in the manifest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArtifactReference {
  pub src: String,
  #[serde(rename = "type")]
  pub mime_type: String,
}

/// Record of one artifact written during a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredArtifact {
  pub kind: String,
  pub hash: ArtifactHash,
  /// Location on disk (under the output root).
  pub path: PathBuf,
  pub reference: ArtifactReference,
}

/// Where artifacts go and how they are addressed publicly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreOptions {
  /// Prepended verbatim to every relative path to form `src`.
  pub public_url_prefix: String,
  /// Public folder on disk.
  pub output_root: PathBuf,
  /// Asset subfolder, normalized to `/name` (or empty for the root).
  pub asset_folder: String,
}

impl StoreOptions {
  pub fn new(public_url_prefix: impl Into<String>, output_root: impl Into<PathBuf>, asset_folder: &str) -> Self {
    Self {
      public_url_prefix: public_url_prefix.into(),
      output_root: output_root.into(),
      asset_folder: normalize_folder(asset_folder),
    }
  }

  /// Absolute location of the asset folder.
  pub fn asset_dir(&self) -> PathBuf {
    self.local_path(&self.asset_folder)
  }

  /// Map a `/relative` path onto the output root.
  pub fn local_path(&self, relative: &str) -> PathBuf {
    let relative = relative.trim_start_matches('/');
    if relative.is_empty() {
      self.output_root.clone()
    } else {
      self.output_root.join(relative)
    }
  }
}

/// Normalize a folder or file option to a single leading slash.
///
/// `"pwa/"`, `"/pwa"` and `"//pwa//"` all become `"/pwa"`; `"/"` becomes `""`.
pub fn normalize_folder(folder: &str) -> String {
  let trimmed = folder.trim_matches('/');
  if trimmed.is_empty() {
    String::new()
  } else {
    format!("/{}", trimmed)
  }
}

/// Build the relative artifact path.
///
/// `<asset_folder>/<components without nulls joined by "-">-<hash>.<extension>`
pub fn artifact_path(asset_folder: &str, components: &[Option<&str>], hash: &ArtifactHash, extension: &str) -> String {
  let mut parts: Vec<&str> = components.iter().flatten().copied().collect();
  parts.push(&hash.0);
  format!("{}/{}.{}", asset_folder, parts.join("-"), extension)
}

/// Persists artifacts through a sink and hands back their public references.
pub struct ArtifactStore<'a> {
  options: StoreOptions,
  sink: &'a mut dyn ArtifactSink,
  folder_ready: bool,
  stored: Vec<StoredArtifact>,
}

impl<'a> ArtifactStore<'a> {
  pub fn new(options: StoreOptions, sink: &'a mut dyn ArtifactSink) -> Self {
    Self {
      options,
      sink,
      folder_ready: false,
      stored: Vec::new(),
    }
  }

  pub fn options(&self) -> &StoreOptions {
    &self.options
  }

  /// Create the asset folder. Runs at most once per store.
  pub fn prepare(&mut self) -> Result<(), StorageError> {
    if self.folder_ready {
      return Ok(());
    }
    let dir = self.options.asset_dir();
    self
      .sink
      .ensure_dir(&dir)
      .map_err(|source| StorageError::CreateDir { path: dir.clone(), source })?;
    debug!(path = %dir.display(), "asset folder ready");
    self.folder_ready = true;
    Ok(())
  }

  /// Store `data` and return its public reference.
  ///
  /// `kind` labels the artifact in logs and errors; the file name comes only
  /// from `components`, the content hash and the probed extension.
  pub fn store(
    &mut self,
    data: &[u8],
    kind: &str,
    components: &[Option<&str>],
  ) -> Result<ArtifactReference, StorageError> {
    let media = media::probe(data).ok_or_else(|| StorageError::UnknownMediaType { kind: kind.to_string() })?;
    self.prepare()?;

    let hash = hash_bytes(data).short();
    let relative = artifact_path(&self.options.asset_folder, components, &hash, media.extension);
    let path = self.options.local_path(&relative);
    debug!(
      kind,
      mime = media.mime,
      relative = %relative,
      replaces = self.sink.exists(&path),
      "resolved artifact path"
    );

    self
      .sink
      .write(&path, data)
      .map_err(|source| StorageError::Write { path: path.clone(), source })?;

    let reference = ArtifactReference {
      src: format!("{}{}", self.options.public_url_prefix, relative),
      mime_type: media.mime.to_string(),
    };
    info!(kind, src = %reference.src, size = data.len(), "artifact stored");

    self.stored.push(StoredArtifact {
      kind: kind.to_string(),
      hash,
      path,
      reference: reference.clone(),
    });

    Ok(reference)
  }

  /// Artifacts written so far, in write order.
  pub fn into_stored(self) -> Vec<StoredArtifact> {
    self.stored
  }

  /// Write a non-artifact file (the manifest) through the same sink.
  pub fn write_file(&mut self, path: &Path, data: &[u8]) -> Result<(), StorageError> {
    if let Some(parent) = path.parent() {
      self.sink.ensure_dir(parent).map_err(|source| StorageError::CreateDir {
        path: parent.to_path_buf(),
        source,
      })?;
    }
    self.sink.write(path, data).map_err(|source| StorageError::Write {
      path: path.to_path_buf(),
      source,
    })
  }
}
