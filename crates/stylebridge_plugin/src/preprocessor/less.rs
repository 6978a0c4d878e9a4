use std::path::Path;

use async_trait::async_trait;
use stylebridge_core::types::LessOptions;

use super::process::run_compiler;
use super::{CompileInput, Compiled, PreprocessError, StyleCompiler};

/// Compiles `.less` files with the `lessc` executable, reading the source from stdin
#[derive(Debug)]
pub struct LessCompiler {
  options: LessOptions,
}

impl LessCompiler {
  pub fn new(options: LessOptions) -> Self {
    Self { options }
  }

  pub(crate) fn args(&self, input: &CompileInput) -> Vec<String> {
    // Relative urls in the output are rewritten against the directory of the specifier
    let rootpath = match Path::new(&input.specifier).parent() {
      Some(dir) if !dir.as_os_str().is_empty() => dir.to_string_lossy().into_owned(),
      _ => ".".to_string(),
    };

    let include_paths = std::iter::once(input.source_dir())
      .chain(self.options.include_paths.iter().map(|path| path.as_path()))
      .map(|path| path.to_string_lossy().into_owned())
      .collect::<Vec<_>>();
    let separator = if cfg!(windows) { ";" } else { ":" };

    let mut args = vec![
      "--no-color".to_string(),
      format!("--include-path={}", include_paths.join(separator)),
      format!("--rootpath={rootpath}"),
    ];
    args.extend(self.options.args.iter().cloned());
    args.push("-".to_string());
    args
  }
}

#[async_trait]
impl StyleCompiler for LessCompiler {
  async fn compile(&self, input: &CompileInput) -> Result<Compiled, PreprocessError> {
    let source = input.source_text()?;
    let css = run_compiler(
      &self.options.command,
      &self.args(input),
      source.as_bytes(),
      &input.path,
    )
    .await?;

    Ok(Compiled {
      css,
      dependencies: Vec::new(),
    })
  }
}
