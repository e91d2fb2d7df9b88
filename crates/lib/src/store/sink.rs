//! Filesystem capability used by the artifact store and the manifest writer.
//!
//! Business logic only ever sees an [`ArtifactSink`]; the real disk is one
//! implementation ([`FsSink`]) and tests inject [`MemorySink`].

use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;

pub trait ArtifactSink {
  /// Create `path` and any missing parents.
  fn ensure_dir(&mut self, path: &Path) -> io::Result<()>;

  /// Replace the file at `path` with `data`.
  ///
  /// Readers must never observe a partially written file.
  fn write(&mut self, path: &Path, data: &[u8]) -> io::Result<()>;

  fn exists(&self, path: &Path) -> bool;
}

/// Writes to the local filesystem.
#[derive(Debug, Default, Clone, Copy)]
pub struct FsSink;

impl ArtifactSink for FsSink {
  fn ensure_dir(&mut self, path: &Path) -> io::Result<()> {
    fs::create_dir_all(path)
  }

  fn write(&mut self, path: &Path, data: &[u8]) -> io::Result<()> {
    let parent = match path.parent() {
      Some(parent) if !parent.as_os_str().is_empty() => parent,
      _ => Path::new("."),
    };

    // Write to a sibling temp file, then rename over the target
    let mut temp = NamedTempFile::new_in(parent)?;
    temp.write_all(data)?;
    temp.flush()?;
    publish_permissions(temp.as_file(), path)?;
    temp.persist(path).map_err(|e| e.error)?;

    Ok(())
  }

  fn exists(&self, path: &Path) -> bool {
    path.exists()
  }
}

/// Temp files are created owner-only. Published files must stay readable by
/// the web server: keep the mode of the file being replaced, else 0644.
#[cfg(unix)]
fn publish_permissions(file: &fs::File, target: &Path) -> io::Result<()> {
  use std::os::unix::fs::PermissionsExt;

  let permissions = match fs::metadata(target) {
    Ok(existing) => existing.permissions(),
    Err(_) => fs::Permissions::from_mode(0o644),
  };
  file.set_permissions(permissions)
}

#[cfg(not(unix))]
fn publish_permissions(_file: &fs::File, _target: &Path) -> io::Result<()> {
  Ok(())
}

/// In-memory sink used by tests.
///
/// Writes fail with `NotFound` unless the parent directory was created
/// through [`ArtifactSink::ensure_dir`] first.
#[derive(Debug, Default, Clone)]
pub struct MemorySink {
  dirs: BTreeSet<PathBuf>,
  files: BTreeMap<PathBuf, Vec<u8>>,
  denied: BTreeSet<PathBuf>,
  writes: usize,
}

impl MemorySink {
  pub fn new() -> Self {
    Self::default()
  }

  /// Make directory creation at `path` fail with `PermissionDenied`.
  pub fn deny_dir(&mut self, path: impl Into<PathBuf>) {
    self.denied.insert(path.into());
  }

  pub fn file(&self, path: &Path) -> Option<&[u8]> {
    self.files.get(path).map(Vec::as_slice)
  }

  pub fn files(&self) -> &BTreeMap<PathBuf, Vec<u8>> {
    &self.files
  }

  pub fn has_dir(&self, path: &Path) -> bool {
    self.dirs.contains(path)
  }

  /// Total number of successful writes, overwrites included.
  pub fn write_count(&self) -> usize {
    self.writes
  }
}

impl ArtifactSink for MemorySink {
  fn ensure_dir(&mut self, path: &Path) -> io::Result<()> {
    if self.denied.contains(path) {
      return Err(io::Error::new(
        io::ErrorKind::PermissionDenied,
        format!("permission denied: {}", path.display()),
      ));
    }
    for ancestor in path.ancestors() {
      if ancestor.as_os_str().is_empty() {
        continue;
      }
      self.dirs.insert(ancestor.to_path_buf());
    }
    Ok(())
  }

  fn write(&mut self, path: &Path, data: &[u8]) -> io::Result<()> {
    if let Some(parent) = path.parent() {
      if !parent.as_os_str().is_empty() && !self.dirs.contains(parent) {
        return Err(io::Error::new(
          io::ErrorKind::NotFound,
          format!("directory does not exist: {}", parent.display()),
        ));
      }
    }
    self.files.insert(path.to_path_buf(), data.to_vec());
    self.writes += 1;
    Ok(())
  }

  fn exists(&self, path: &Path) -> bool {
    self.files.contains_key(path) || self.dirs.contains(path)
  }
}
