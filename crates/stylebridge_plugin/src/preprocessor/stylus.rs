use async_trait::async_trait;
use stylebridge_core::types::StylusOptions;

use super::process::run_compiler;
use super::{CompileInput, Compiled, PreprocessError, StyleCompiler};

/// Compiles `.styl` files with the `stylus` executable, which reads stdin and prints CSS when no
/// file arguments are given
#[derive(Debug)]
pub struct StylusCompiler {
  options: StylusOptions,
}

impl StylusCompiler {
  pub fn new(options: StylusOptions) -> Self {
    Self { options }
  }

  pub(crate) fn args(&self, input: &CompileInput) -> Vec<String> {
    let mut args = Vec::new();
    for include in std::iter::once(input.source_dir())
      .chain(self.options.include_paths.iter().map(|path| path.as_path()))
    {
      args.push("--include".to_string());
      args.push(include.to_string_lossy().into_owned());
    }
    args.extend(self.options.args.iter().cloned());
    args
  }
}

#[async_trait]
impl StyleCompiler for StylusCompiler {
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
