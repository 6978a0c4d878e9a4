use std::path::Path;
use std::path::PathBuf;

use stylebridge_core::types::PluginOptions;
use stylebridge_filesystem::search::find_ancestor_file;
use stylebridge_filesystem::FileSystem;
use thiserror::Error;

pub const CONFIG_FILE_NAME: &str = ".stylebridgerc";

#[derive(Debug, Error)]
pub enum ConfigError {
  #[error("Failed to parse {path}")]
  ParseFailure {
    path: PathBuf,
    #[source]
    source: serde_json5::Error,
  },
  #[error("Failed to read {path}")]
  ReadConfigFile {
    path: PathBuf,
    #[source]
    source: std::io::Error,
  },
  #[error("Invalid generateScopedName pattern {pattern:?}: {message}")]
  InvalidScopedNamePattern { pattern: String, message: String },
}

/// The nearest `.stylebridgerc` at or above `project_root`
pub fn find_config(fs: &dyn FileSystem, project_root: &Path) -> Option<PathBuf> {
  let root = project_root.ancestors().last().unwrap_or(project_root);

  find_ancestor_file(fs, &[CONFIG_FILE_NAME], project_root, root)
}

/// Plugin options from the nearest `.stylebridgerc` (JSON5), or defaults when there is none
pub fn load_options(fs: &dyn FileSystem, project_root: &Path) -> Result<PluginOptions, ConfigError> {
  let Some(path) = find_config(fs, project_root) else {
    tracing::debug!(root = %project_root.display(), "No {CONFIG_FILE_NAME} found, using defaults");
    return Ok(PluginOptions::default());
  };

  let raw = fs
    .read_to_string(&path)
    .map_err(|source| ConfigError::ReadConfigFile {
      path: path.clone(),
      source,
    })?;

  let options = serde_json5::from_str(&raw).map_err(|source| ConfigError::ParseFailure {
    path: path.clone(),
    source,
  })?;

  tracing::debug!(path = %path.display(), "Loaded plugin options");
  Ok(options)
}
