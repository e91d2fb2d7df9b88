//! pwagen-lib: Core types and logic for pwagen
//!
//! This crate turns a PWA configuration into deployable assets:
//! - `ManifestAssembler`: builds and writes the web-app manifest
//! - `ImageArtifactBuilder`: produces icons, shortcut icons and screenshots
//! - `ArtifactStore`: content-named artifact storage behind an `ArtifactSink`
//! - `BackgroundFetchCache`: service-worker fragments for background fetch
//! - `create_icons`: standalone icon-set generation

pub mod artifact;
pub mod config;
pub mod consts;
pub mod error;
pub mod icons;
pub mod imaging;
pub mod manifest;
pub mod serviceworker;
pub mod source;
pub mod store;
pub mod util;
