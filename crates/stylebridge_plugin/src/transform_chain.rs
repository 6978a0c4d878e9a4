use std::fmt::Debug;
use std::path::Path;
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::RwLock;

use anyhow::anyhow;
use anyhow::Context;
use lightningcss::css_modules::{CssModuleExports, CssModuleReference, Pattern};
use lightningcss::stylesheet::{ParserOptions, PrinterOptions, StyleSheet};
use lightningcss::targets::Targets;
use stylebridge_core::types::ClassMap;
use stylebridge_core::types::CssModulesOptions;

mod import_dependencies;
pub use import_dependencies::ImportDependencies;

mod prefixer;
pub use prefixer::Prefixer;

/// Side information a transform step reports next to the CSS it produces
#[derive(Clone, Debug, PartialEq)]
pub enum Message {
  /// The output depends on this file
  Dependency { file: PathBuf },
  /// The output depends on every file under `dir` matching `glob` (all files when `None`)
  DirDependency { dir: PathBuf, glob: Option<String> },
  Warning { text: String },
  /// Anything else, kept for steps that talk to each other
  Other { kind: String, text: String },
}

/// State shared by the steps of one chain run
#[derive(Debug)]
pub struct StepContext<'a> {
  /// Source stylesheet path
  pub from: &'a Path,
  /// Where the output will be written
  pub to: &'a Path,
  /// Browser targets used when printing, steps may narrow them
  pub targets: Targets,
  pub messages: Vec<Message>,
}

/// One pluggable rewrite applied to a parsed stylesheet
pub trait TransformStep: Debug + Send + Sync {
  fn name(&self) -> &str;

  fn process(
    &self,
    stylesheet: &mut StyleSheet<'_, '_>,
    ctx: &mut StepContext<'_>,
  ) -> anyhow::Result<()>;
}

pub struct ChainInput<'a> {
  pub css: &'a str,
  pub from: &'a Path,
  pub to: &'a Path,
  /// Scoped class name hashes use `from` relative to this directory
  pub project_root: &'a Path,
  /// Scope class names first when set
  pub css_modules: Option<&'a CssModulesOptions>,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct ChainOutput {
  pub css: String,
  pub messages: Vec<Message>,
  /// Present exactly when CSS Modules were applied
  pub class_map: Option<ClassMap>,
}

/// The ordered list of configured transform steps
#[derive(Clone, Debug, Default)]
pub struct TransformChain {
  steps: Vec<Arc<dyn TransformStep>>,
}

impl TransformChain {
  pub fn new(steps: Vec<Arc<dyn TransformStep>>) -> Self {
    Self { steps }
  }

  pub fn run(&self, input: ChainInput<'_>) -> anyhow::Result<ChainOutput> {
    // Nothing would change the stylesheet, so keep the source text as written
    if self.steps.is_empty() && input.css_modules.is_none() {
      return Ok(ChainOutput {
        css: input.css.to_string(),
        messages: Vec::new(),
        class_map: None,
      });
    }

    let css_modules = input
      .css_modules
      .map(|options| {
        Ok::<_, anyhow::Error>(lightningcss::css_modules::Config {
          pattern: parse_pattern(&options.generate_scoped_name)?,
          dashed_idents: options.dashed_idents,
          ..Default::default()
        })
      })
      .transpose()?;

    let filename = pathdiff::diff_paths(input.from, input.project_root)
      .unwrap_or_else(|| input.from.to_path_buf())
      .to_string_lossy()
      .replace('\\', "/");

    let warnings = Arc::new(RwLock::new(Vec::new()));
    let mut stylesheet = StyleSheet::parse(
      input.css,
      ParserOptions {
        filename,
        css_modules,
        warnings: Some(warnings.clone()),
        ..ParserOptions::default()
      },
    )
    .map_err(|err| anyhow!("Failed to parse {}: {}", input.from.display(), err))?;

    let mut ctx = StepContext {
      from: input.from,
      to: input.to,
      targets: Targets::default(),
      messages: Vec::new(),
    };

    if let Ok(warnings) = warnings.read() {
      ctx.messages.extend(warnings.iter().map(|warning| Message::Warning {
        text: warning.to_string(),
      }));
    }

    for step in &self.steps {
      tracing::trace!(step = step.name(), "Running transform step");
      step
        .process(&mut stylesheet, &mut ctx)
        .with_context(|| format!("Transform step {} failed", step.name()))?;
    }

    let result = stylesheet
      .to_css(PrinterOptions {
        targets: ctx.targets,
        ..PrinterOptions::default()
      })
      .map_err(|err| anyhow!("Failed to print {}: {}", input.from.display(), err))?;

    Ok(ChainOutput {
      css: result.code,
      messages: ctx.messages,
      class_map: result.exports.map(class_map),
    })
  }
}

pub(crate) fn parse_pattern(pattern: &str) -> anyhow::Result<Pattern<'_>> {
  Pattern::parse(pattern).map_err(|err| anyhow!("Invalid scoped name pattern {pattern:?}: {err}"))
}

/// Flatten CSS-Modules exports into `original -> "scoped [composed...]"`
fn class_map(exports: CssModuleExports) -> ClassMap {
  exports
    .into_iter()
    .map(|(original, export)| {
      let mut scoped = export.name;
      for composes in export.composes {
        let name = match composes {
          CssModuleReference::Local { name } => name,
          CssModuleReference::Global { name } => name,
          CssModuleReference::Dependency { name, specifier } => {
            tracing::warn!(
              class = original.as_str(),
              specifier = specifier.as_str(),
              "composes from another file is kept unscoped"
            );
            name
          }
        };
        scoped.push(' ');
        scoped.push_str(&name);
      }
      (original, scoped)
    })
    .collect()
}
