use std::fmt;
use std::path::Path;
use std::path::PathBuf;
use std::sync::Arc;

use serde::Deserialize;

use super::ClassMap;

pub const DEFAULT_SCOPED_NAME_PATTERN: &str = "[name]__[local]___[hash]";

/// The options a host build passes when constructing the plugin
///
/// Transform chain steps are not part of this struct since they are code, not data; they are
/// handed to the plugin constructor separately.
#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PluginOptions {
  pub modules: ModulesOption,
  /// Project root used to name entry point outputs. Defaults to the file-system cwd.
  pub root_dir: Option<PathBuf>,
  pub sass: SassOptions,
  pub less: LessOptions,
  pub stylus: StylusOptions,
  /// Write compiled CSS to a temporary file, otherwise inline it into the virtual module
  pub write_to_file: bool,
}

impl Default for PluginOptions {
  fn default() -> Self {
    Self {
      modules: ModulesOption::default(),
      root_dir: None,
      sass: SassOptions::default(),
      less: LessOptions::default(),
      stylus: StylusOptions::default(),
      write_to_file: true,
    }
  }
}

/// `modules: true | false | { ...options }`
#[derive(Clone, Debug, Deserialize)]
#[serde(untagged)]
pub enum ModulesOption {
  Enabled(bool),
  Configured(CssModulesOptions),
}

impl Default for ModulesOption {
  fn default() -> Self {
    ModulesOption::Enabled(true)
  }
}

impl ModulesOption {
  /// The effective CSS-Modules options, or `None` when CSS Modules are disabled.
  pub fn options(&self) -> Option<CssModulesOptions> {
    match self {
      ModulesOption::Enabled(true) => Some(CssModulesOptions::default()),
      ModulesOption::Enabled(false) => None,
      ModulesOption::Configured(options) => Some(options.clone()),
    }
  }
}

#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CssModulesOptions {
  /// Pattern for scoped class names, supports `[name]`, `[local]` and `[hash]`
  pub generate_scoped_name: String,
  /// Also scope `--dashed-idents`
  pub dashed_idents: bool,
  #[serde(skip)]
  pub on_class_map: Option<ClassMapHook>,
}

impl Default for CssModulesOptions {
  fn default() -> Self {
    Self {
      generate_scoped_name: DEFAULT_SCOPED_NAME_PATTERN.to_string(),
      dashed_idents: false,
      on_class_map: None,
    }
  }
}

type ClassMapFn = dyn Fn(&Path, &ClassMap) -> anyhow::Result<()> + Send + Sync;

/// User callback receiving every class map produced for a module stylesheet
#[derive(Clone)]
pub struct ClassMapHook(Arc<ClassMapFn>);

impl ClassMapHook {
  pub fn new(hook: impl Fn(&Path, &ClassMap) -> anyhow::Result<()> + Send + Sync + 'static) -> Self {
    Self(Arc::new(hook))
  }

  pub fn call(&self, source_path: &Path, class_map: &ClassMap) -> anyhow::Result<()> {
    (self.0)(source_path, class_map)
  }
}

impl fmt::Debug for ClassMapHook {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str("ClassMapHook")
  }
}

/// Which Sass compiler handles `.sass` and `.scss` files
#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub enum SassImplementation {
  /// The in-process `grass` compiler
  #[default]
  Grass,
  /// An external dart-sass compatible executable reading from stdin
  External { command: String },
}

#[derive(Clone, Copy, Debug, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum OutputStyle {
  #[default]
  Expanded,
  Compressed,
}

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SassOptions {
  pub implementation: SassImplementation,
  pub load_paths: Vec<PathBuf>,
  pub style: OutputStyle,
  /// Silence `@warn` and deprecation output
  pub quiet: bool,
}

#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LessOptions {
  pub command: String,
  pub include_paths: Vec<PathBuf>,
  /// Extra arguments passed to the compiler verbatim
  pub args: Vec<String>,
}

impl Default for LessOptions {
  fn default() -> Self {
    Self {
      command: "lessc".to_string(),
      include_paths: Vec::new(),
      args: Vec::new(),
    }
  }
}

#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct StylusOptions {
  pub command: String,
  pub include_paths: Vec<PathBuf>,
  /// Extra arguments passed to the compiler verbatim
  pub args: Vec<String>,
}

impl Default for StylusOptions {
  fn default() -> Self {
    Self {
      command: "stylus".to_string(),
      include_paths: Vec::new(),
      args: Vec::new(),
    }
  }
}
