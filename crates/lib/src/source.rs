//! Reading configured source images.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

pub trait AssetSource {
  /// Load the raw bytes of a configured `src`.
  fn read(&self, src: &str) -> io::Result<Vec<u8>>;
}

/// Reads sources from disk, resolving relative paths against `base_dir`.
#[derive(Debug, Clone)]
pub struct FsSource {
  base_dir: PathBuf,
}

impl FsSource {
  pub fn new(base_dir: impl Into<PathBuf>) -> Self {
    Self {
      base_dir: base_dir.into(),
    }
  }

  pub fn resolve(&self, src: &str) -> PathBuf {
    let path = Path::new(src);
    if path.is_absolute() {
      path.to_path_buf()
    } else {
      self.base_dir.join(path)
    }
  }
}

impl AssetSource for FsSource {
  fn read(&self, src: &str) -> io::Result<Vec<u8>> {
    fs::read(self.resolve(src))
  }
}
