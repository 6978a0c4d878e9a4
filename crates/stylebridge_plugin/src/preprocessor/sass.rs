use std::path::Path;
use std::path::PathBuf;

use async_trait::async_trait;
use stylebridge_core::types::OutputStyle;
use stylebridge_core::types::SassOptions;
use stylebridge_filesystem::tracking_file_system::TrackingFileSystem;
use stylebridge_filesystem::FileSystem;
use stylebridge_filesystem::FileSystemRef;

use super::process::run_compiler;
use super::{CompileInput, Compiled, PreprocessError, StyleCompiler};

/// Compiles `.sass` and `.scss` in-process with `grass`
///
/// Every read grass makes goes through a [`TrackingFileSystem`], so imported partials are
/// reported as dependencies of the stylesheet.
#[derive(Debug)]
pub struct GrassCompiler {
  fs: FileSystemRef,
  options: SassOptions,
}

impl GrassCompiler {
  pub fn new(fs: FileSystemRef, options: SassOptions) -> Self {
    Self { fs, options }
  }
}

#[derive(Debug)]
struct GrassFs<'a>(&'a TrackingFileSystem);

impl grass::Fs for GrassFs<'_> {
  fn is_dir(&self, path: &Path) -> bool {
    self.0.is_dir(path)
  }

  fn is_file(&self, path: &Path) -> bool {
    self.0.is_file(path)
  }

  fn read(&self, path: &Path) -> std::io::Result<Vec<u8>> {
    self.0.read(path)
  }
}

fn compile_with_grass(
  fs: FileSystemRef,
  options: &SassOptions,
  path: &Path,
) -> Result<Compiled, PreprocessError> {
  let tracking = TrackingFileSystem::new(fs);
  let grass_fs = GrassFs(&tracking);
  let style = match options.style {
    OutputStyle::Expanded => grass::OutputStyle::Expanded,
    OutputStyle::Compressed => grass::OutputStyle::Compressed,
  };
  let grass_options = grass::Options::default()
    .fs(&grass_fs)
    .style(style)
    .quiet(options.quiet)
    .load_paths(options.load_paths.as_slice());

  let css = grass::from_path(path, &grass_options).map_err(|err| PreprocessError::Compile {
    path: path.to_path_buf(),
    message: err.to_string(),
  })?;

  let mut dependencies: Vec<PathBuf> = Vec::new();
  for read in tracking.read_paths() {
    if read != path && !dependencies.contains(&read) {
      dependencies.push(read);
    }
  }

  Ok(Compiled { css, dependencies })
}

#[async_trait]
impl StyleCompiler for GrassCompiler {
  async fn compile(&self, input: &CompileInput) -> Result<Compiled, PreprocessError> {
    let fs = self.fs.clone();
    let options = self.options.clone();
    let path = input.path.clone();

    tokio::task::spawn_blocking(move || compile_with_grass(fs, &options, &path))
      .await
      .map_err(|err| PreprocessError::Compile {
        path: input.path.clone(),
        message: err.to_string(),
      })?
  }
}

/// Compiles `.sass` and `.scss` with a dart-sass compatible executable reading from stdin
#[derive(Debug)]
pub struct ExternalSassCompiler {
  command: String,
  options: SassOptions,
}

impl ExternalSassCompiler {
  pub fn new(command: String, options: SassOptions) -> Self {
    Self { command, options }
  }

  pub(crate) fn args(&self, input: &CompileInput) -> Vec<String> {
    let mut args = vec!["--stdin".to_string(), "--no-source-map".to_string()];
    if input.path.extension().is_some_and(|ext| ext == "sass") {
      args.push("--indented".to_string());
    }
    for load_path in std::iter::once(input.source_dir())
      .chain(self.options.load_paths.iter().map(|path| path.as_path()))
    {
      args.push(format!("--load-path={}", load_path.to_string_lossy()));
    }
    if self.options.style == OutputStyle::Compressed {
      args.push("--style=compressed".to_string());
    }
    if self.options.quiet {
      args.push("--quiet".to_string());
    }
    args
  }
}

#[async_trait]
impl StyleCompiler for ExternalSassCompiler {
  async fn compile(&self, input: &CompileInput) -> Result<Compiled, PreprocessError> {
    let css = run_compiler(&self.command, &self.args(input), &input.source, &input.path).await?;

    Ok(Compiled {
      css,
      dependencies: Vec::new(),
    })
  }
}
