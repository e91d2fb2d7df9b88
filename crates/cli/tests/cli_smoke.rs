//! CLI smoke tests for pwagen.
//!
//! These tests run the real binary against temporary projects and check exit
//! codes, console output and the files written.

use std::path::Path;

use assert_cmd::Command;
use assert_cmd::cargo::cargo_bin_cmd;
use image::{ImageFormat, Rgba, RgbaImage};
use predicates::prelude::*;
use tempfile::TempDir;

/// Get a Command for the pwagen binary.
fn pwagen_cmd() -> Command {
  cargo_bin_cmd!("pwagen")
}

fn write_png(path: &Path, width: u32, height: u32) {
  let img = RgbaImage::from_pixel(width, height, Rgba([30, 144, 255, 255]));
  img.save_with_format(path, ImageFormat::Png).unwrap();
}

/// Create a temp project with `pwa.yaml`, a square logo and a wide screenshot.
fn temp_project(config: &str) -> TempDir {
  let temp = TempDir::new().unwrap();
  std::fs::write(temp.path().join("pwa.yaml"), config).unwrap();
  write_png(&temp.path().join("logo.png"), 64, 64);
  write_png(&temp.path().join("desktop.png"), 80, 45);
  temp
}

fn read_json(path: &Path) -> serde_json::Value {
  serde_json::from_slice(&std::fs::read(path).unwrap()).unwrap()
}

const FULL_CONFIG: &str = r#"
manifest:
  name: Demo App
  short_name: Demo
  description: ~
  categories: []
  start_url: /
  icons:
    - src: logo.png
      sizes: [48, 0]
      purpose: maskable
  screenshots:
    - src: desktop.png
      label: Dashboard
  shortcuts:
    - name: Inbox
      url: /inbox
      icons:
        - src: logo.png
          sizes: [24]
    - name: Compose
      url: /compose
"#;

const BAD_SIZE_CONFIG: &str = r#"
manifest:
  name: Demo App
  icons:
    - src: logo.png
      sizes: [48, -1]
"#;

const SW_CONFIG: &str = r#"
base_url: https://app.example.com
routes:
  downloads_done: /downloads/done
translations:
  bg.done: All downloads finished
background_fetch:
  enabled: true
  cache_name: media-v1
  success_url:
    path: downloads_done
  success_message: bg.done
"#;

// =============================================================================
// Help & Version
// =============================================================================

#[test]
fn help_flag_works() {
  pwagen_cmd()
    .arg("--help")
    .assert()
    .success()
    .stdout(predicate::str::contains("Usage"));
}

#[test]
fn version_flag_works() {
  pwagen_cmd()
    .arg("--version")
    .assert()
    .success()
    .stdout(predicate::str::contains("pwagen"));
}

#[test]
fn subcommand_help_works() {
  for cmd in &["build", "icons", "sw"] {
    pwagen_cmd()
      .arg(cmd)
      .arg("--help")
      .assert()
      .success()
      .stdout(predicate::str::contains("Usage"));
  }
}

// =============================================================================
// build
// =============================================================================

#[test]
fn build_writes_manifest_and_artifacts() {
  let temp = temp_project(FULL_CONFIG);
  let public = temp.path().join("public");

  pwagen_cmd()
    .arg("build")
    .arg("--config")
    .arg(temp.path().join("pwa.yaml"))
    .arg("--public-folder")
    .arg(&public)
    .assert()
    .success()
    .stdout(predicate::str::contains("Manifest written"))
    .stdout(predicate::str::contains("Icons: 2"));

  let manifest = read_json(&public.join("pwa.json"));
  let keys: Vec<_> = manifest.as_object().unwrap().keys().cloned().collect();
  assert_eq!(
    keys,
    vec!["name", "short_name", "start_url", "icons", "screenshots", "shortcuts"]
  );

  let icons = manifest["icons"].as_array().unwrap();
  assert_eq!(icons.len(), 2);
  assert_eq!(icons[0]["sizes"], "48x48");
  assert_eq!(icons[1]["sizes"], "any");
  assert_eq!(icons[0]["purpose"], "maskable");

  assert_eq!(manifest["screenshots"][0]["form_factor"], "wide");
  assert_eq!(manifest["screenshots"][0]["sizes"], "80x45");
  assert_eq!(manifest["shortcuts"][0]["icons"].as_array().unwrap().len(), 1);
  assert!(manifest["shortcuts"][1].get("icons").is_none());

  for icon in icons {
    let src = icon["src"].as_str().unwrap();
    assert!(src.starts_with("/pwa/icon-maskable-"), "{}", src);
    assert!(public.join(src.trim_start_matches('/')).is_file());
  }
}

#[test]
fn build_accepts_underscore_options() {
  let temp = temp_project(FULL_CONFIG);
  let public = temp.path().join("www");

  pwagen_cmd()
    .arg("build")
    .arg("--config")
    .arg(temp.path().join("pwa.yaml"))
    .arg("--public_folder")
    .arg(&public)
    .arg("--url_prefix")
    .arg("https://cdn.example.com")
    .arg("--asset_folder")
    .arg("static/pwa/")
    .arg("--output")
    .arg("manifest.webmanifest")
    .assert()
    .success();

  let manifest = read_json(&public.join("manifest.webmanifest"));
  let src = manifest["icons"][0]["src"].as_str().unwrap();
  assert!(src.starts_with("https://cdn.example.com/static/pwa/icon-"), "{}", src);
  assert!(public.join("static/pwa").is_dir());
}

#[test]
fn build_json_summary() {
  let temp = temp_project(FULL_CONFIG);

  let assert = pwagen_cmd()
    .arg("build")
    .arg("--config")
    .arg(temp.path().join("pwa.yaml"))
    .arg("--public-folder")
    .arg(temp.path().join("public"))
    .arg("--message-format")
    .arg("json")
    .assert()
    .success();

  let summary: serde_json::Value = serde_json::from_slice(&assert.get_output().stdout).unwrap();
  assert_eq!(summary["icons"], 2);
  assert_eq!(summary["screenshots"], 1);
  assert_eq!(summary["shortcuts"], 2);
  assert_eq!(summary["artifacts"].as_array().unwrap().len(), 4);
}

#[test]
fn build_uses_config_env_var() {
  let temp = temp_project(FULL_CONFIG);
  let public = temp.path().join("public");

  pwagen_cmd()
    .arg("build")
    .arg("--public-folder")
    .arg(&public)
    .env("PWAGEN_CONFIG", temp.path().join("pwa.yaml"))
    .assert()
    .success();

  assert!(public.join("pwa.json").is_file());
}

#[test]
fn build_bad_size_fails_without_manifest() {
  let temp = temp_project(BAD_SIZE_CONFIG);
  let public = temp.path().join("public");

  pwagen_cmd()
    .arg("build")
    .arg("--config")
    .arg(temp.path().join("pwa.yaml"))
    .arg("--public-folder")
    .arg(&public)
    .assert()
    .failure()
    .code(1)
    .stderr(predicate::str::contains("icon size"));

  assert!(!public.join("pwa.json").exists());
  assert!(!public.join("pwa").exists());
}

#[test]
fn build_missing_source_fails() {
  let temp = temp_project(
    r#"
manifest:
  icons:
    - src: missing.png
      sizes: [16]
"#,
  );
  let public = temp.path().join("public");

  pwagen_cmd()
    .arg("build")
    .arg("--config")
    .arg(temp.path().join("pwa.yaml"))
    .arg("--public-folder")
    .arg(&public)
    .assert()
    .failure()
    .stderr(predicate::str::contains("missing.png"));

  assert!(!public.join("pwa.json").exists());
}

#[test]
fn build_nonexistent_config_fails() {
  pwagen_cmd()
    .arg("build")
    .arg("--config")
    .arg("/nonexistent/path/pwa.yaml")
    .assert()
    .failure()
    .stderr(predicate::str::contains("Failed to load"));
}

// =============================================================================
// icons
// =============================================================================

#[test]
fn icons_writes_requested_sizes() {
  let temp = temp_project(FULL_CONFIG);
  let out = temp.path().join("icons");

  pwagen_cmd()
    .arg("icons")
    .arg(temp.path().join("logo.png"))
    .arg(&out)
    .args(["32", "16"])
    .args(["--filename", "app", "--format", "webp"])
    .assert()
    .success()
    .stdout(predicate::str::contains("Count: 2"));

  assert!(out.join("app-32x32.webp").is_file());
  assert!(out.join("app-16x16.webp").is_file());
}

#[test]
fn icons_default_sizes_and_format() {
  let temp = temp_project(FULL_CONFIG);
  let out = temp.path().join("icons");

  pwagen_cmd()
    .arg("icons")
    .arg(temp.path().join("logo.png"))
    .arg(&out)
    .assert()
    .success();

  for size in [16, 32, 48, 96, 144, 180, 256, 512, 1024] {
    assert!(out.join(format!("icon-{0}x{0}.png", size)).is_file(), "missing {}", size);
  }
}

#[test]
fn icons_missing_source_fails() {
  let temp = TempDir::new().unwrap();

  pwagen_cmd()
    .arg("icons")
    .arg(temp.path().join("nope.png"))
    .arg(temp.path().join("out"))
    .assert()
    .failure()
    .stderr(predicate::str::contains("not found"));
}

// =============================================================================
// sw
// =============================================================================

#[test]
fn sw_prints_background_fetch_fragments() {
  let temp = temp_project(SW_CONFIG);

  pwagen_cmd()
    .arg("sw")
    .arg("--config")
    .arg(temp.path().join("pwa.yaml"))
    .assert()
    .success()
    .stdout(predicate::str::contains("caches.open('media-v1')"))
    .stdout(predicate::str::contains("clients.openWindow('/downloads/done');"))
    .stdout(predicate::str::contains(r#"title: "All downloads finished""#));
}

#[test]
fn sw_writes_to_file() {
  let temp = temp_project(SW_CONFIG);
  let target = temp.path().join("dist/sw-background-fetch.js");

  pwagen_cmd()
    .arg("sw")
    .arg("--config")
    .arg(temp.path().join("pwa.yaml"))
    .arg("--output")
    .arg(&target)
    .assert()
    .success();

  let script = std::fs::read_to_string(&target).unwrap();
  assert!(script.starts_with("\n// Background Fetch Cache\n"));
}

#[test]
fn sw_disabled_emits_nothing() {
  let temp = temp_project("manifest:\n  name: Demo\n");

  pwagen_cmd()
    .arg("sw")
    .arg("--config")
    .arg(temp.path().join("pwa.yaml"))
    .assert()
    .success()
    .stdout(predicate::str::contains("disabled"))
    .stdout(predicate::str::contains("addEventListener").not());
}

#[test]
fn sw_ignores_manifest_errors() {
  let config = format!("{}{}", BAD_SIZE_CONFIG, SW_CONFIG);
  let temp = temp_project(&config);

  pwagen_cmd()
    .arg("sw")
    .arg("--config")
    .arg(temp.path().join("pwa.yaml"))
    .assert()
    .success()
    .stdout(predicate::str::contains("caches.open('media-v1')"));
}

#[test]
fn sw_debug_flag_does_not_change_output() {
  let temp = temp_project(SW_CONFIG);
  let config = temp.path().join("pwa.yaml");

  let plain = pwagen_cmd().arg("sw").arg("--config").arg(&config).assert().success();
  let debug = pwagen_cmd()
    .arg("sw")
    .arg("--config")
    .arg(&config)
    .arg("--debug")
    .assert()
    .success();

  assert_eq!(plain.get_output().stdout, debug.get_output().stdout);
}

#[test]
fn sw_unknown_route_fails() {
  let temp = temp_project(
    r#"
background_fetch:
  enabled: true
  progress_url:
    path: nowhere
"#,
  );

  pwagen_cmd()
    .arg("sw")
    .arg("--config")
    .arg(temp.path().join("pwa.yaml"))
    .assert()
    .failure()
    .stderr(predicate::str::contains("unknown route"));
}
