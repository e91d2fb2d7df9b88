//! Test utilities for pwagen-lib.
//!
//! In-memory image fixtures and collaborator doubles shared by unit tests.

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::io::{self, Cursor};

use image::{ImageFormat, Rgba, RgbaImage};

use crate::imaging::{Dimensions, ImageError, ImageProcessor, RasterProcessor};
use crate::serviceworker::Translator;
use crate::source::AssetSource;

/// Encode a `width`x`height` PNG with a simple gradient.
pub fn png_bytes(width: u32, height: u32) -> Vec<u8> {
  let img = RgbaImage::from_fn(width, height, |x, y| Rgba([(x % 256) as u8, (y % 256) as u8, 128, 255]));
  let mut out = Cursor::new(Vec::new());
  img.write_to(&mut out, ImageFormat::Png).unwrap();
  out.into_inner()
}

/// One recorded `process` call: width, height, format.
pub type ProcessCall = (Option<u32>, Option<u32>, Option<String>);

/// Real raster processor that records every `process` call.
#[derive(Default)]
pub struct RecordingProcessor {
  inner: RasterProcessor,
  calls: RefCell<Vec<ProcessCall>>,
}

impl RecordingProcessor {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn calls(&self) -> Vec<ProcessCall> {
    self.calls.borrow().clone()
  }
}

impl ImageProcessor for RecordingProcessor {
  fn process(
    &self,
    data: &[u8],
    width: Option<u32>,
    height: Option<u32>,
    format: Option<&str>,
  ) -> Result<Vec<u8>, ImageError> {
    self.calls.borrow_mut().push((width, height, format.map(str::to_string)));
    self.inner.process(data, width, height, format)
  }

  fn dimensions(&self, data: &[u8]) -> Result<Dimensions, ImageError> {
    self.inner.dimensions(data)
  }
}

/// Source reader serving fixed bytes by `src`.
#[derive(Debug, Default, Clone)]
pub struct MapSource {
  files: BTreeMap<String, Vec<u8>>,
  reads: RefCell<Vec<String>>,
}

impl MapSource {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn with(mut self, src: &str, data: Vec<u8>) -> Self {
    self.files.insert(src.to_string(), data);
    self
  }

  /// Every `src` read so far, in order.
  pub fn reads(&self) -> Vec<String> {
    self.reads.borrow().clone()
  }
}

impl AssetSource for MapSource {
  fn read(&self, src: &str) -> io::Result<Vec<u8>> {
    self.reads.borrow_mut().push(src.to_string());
    self
      .files
      .get(src)
      .cloned()
      .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, format!("no such file: {}", src)))
  }
}

/// Translator that returns keys unchanged and records every lookup.
#[derive(Debug, Default)]
pub struct RecordingTranslator {
  keys: RefCell<Vec<String>>,
}

impl RecordingTranslator {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn keys(&self) -> Vec<String> {
    self.keys.borrow().clone()
  }
}

impl Translator for RecordingTranslator {
  fn translate(&self, key: &str) -> String {
    self.keys.borrow_mut().push(key.to_string());
    key.to_string()
  }
}
