use std::path::PathBuf;

use serde::Deserialize;
use serde::Serialize;

use super::Namespace;

/// How the import being resolved was written
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ImportKind {
  /// A file passed directly as a build input
  EntryPoint,
  #[default]
  ImportStatement,
  RequireCall,
  DynamicImport,
  RequireResolve,
  /// `@import` inside a stylesheet
  ImportRule,
  /// `composes: x from "..."` inside a CSS-Modules stylesheet
  ComposesFrom,
  /// `url()` inside a stylesheet
  UrlToken,
}

/// Data carried from the resolve hook to the load hook of the same path
#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PluginData {
  /// Absolute path of the stylesheet the virtual module was produced from
  pub original_path: PathBuf,

  /// Compiled CSS, only present when it was not written to disk
  pub css: Option<String>,
}

/// Arguments of the host's resolve callback
#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolveArgs {
  /// The import specifier as written in the importing file
  pub path: String,
  pub importer: PathBuf,
  /// Namespace of the importing module
  pub namespace: Namespace,
  /// Directory the specifier should be resolved from
  pub resolve_dir: PathBuf,
  pub kind: ImportKind,
  pub plugin_data: Option<PluginData>,
}

#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OnResolveResult {
  pub path: PathBuf,
  pub namespace: Namespace,
  /// Files that invalidate this result when they change
  pub watch_files: Vec<PathBuf>,
  pub plugin_data: Option<PluginData>,
}

/// Arguments of the host's load callback
#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoadArgs {
  pub path: PathBuf,
  pub namespace: Namespace,
  pub plugin_data: Option<PluginData>,
}

/// How the host should interpret loaded contents
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Loader {
  #[default]
  Js,
  Css,
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OnLoadResult {
  pub contents: String,
  /// Directory imports inside `contents` are resolved from
  pub resolve_dir: Option<PathBuf>,
  pub loader: Loader,
  pub watch_files: Vec<PathBuf>,
}
