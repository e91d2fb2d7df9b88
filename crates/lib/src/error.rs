//! Error taxonomy for a generation run.

use thiserror::Error;

use crate::artifact::ArtifactKind;
use crate::config::ValidationError;
use crate::imaging::ImageError;
use crate::store::StorageError;

/// Every way a manifest generation run can fail.
///
/// None of these are retried. Artifacts already written before a failure
/// stay on disk; only the manifest file is all-or-nothing.
#[derive(Debug, Error)]
pub enum PipelineError {
  #[error("invalid configuration: {0}")]
  Validation(#[from] ValidationError),

  #[error("unable to read the {kind} source \"{src}\": {source}")]
  SourceRead {
    kind: ArtifactKind,
    src: String,
    source: std::io::Error,
  },

  #[error("storage failure: {0}")]
  Storage(#[from] StorageError),

  #[error("image processor not found: {kind} artifacts need one")]
  MissingProcessor { kind: ArtifactKind },

  #[error("image processing failed for {kind}: {source}")]
  Image { kind: ArtifactKind, source: ImageError },

  #[error("unable to generate the manifest file: {0}")]
  Serialization(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, PipelineError>;
