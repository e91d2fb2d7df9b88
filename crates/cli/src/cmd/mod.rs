mod build;
mod icons;
mod sw;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use pwagen_lib::config::{Configuration, default_config_path, load_config};

pub use build::{BuildArgs, cmd_build};
pub use icons::{IconsArgs, cmd_icons};
pub use sw::{SwArgs, cmd_sw};

/// Load the configuration, falling back to the default path.
///
/// Each command validates the sections it uses.
fn load(config: Option<&Path>) -> Result<(PathBuf, Configuration)> {
  let path = config.map(Path::to_path_buf).unwrap_or_else(default_config_path);
  let configuration = load_config(&path).with_context(|| format!("Failed to load {}", path.display()))?;
  Ok((path, configuration))
}

/// Directory relative `src` entries are resolved against.
fn config_dir(path: &Path) -> PathBuf {
  match path.parent() {
    Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
    _ => PathBuf::from("."),
  }
}
