use std::fmt::Debug;
use std::path::Path;
use std::path::PathBuf;
use std::sync::Arc;

use async_trait::async_trait;
use stylebridge_core::types::PluginOptions;
use stylebridge_core::types::SassImplementation;
use stylebridge_filesystem::FileSystemRef;
use thiserror::Error;

mod less;
pub use less::LessCompiler;

mod process;

mod sass;
pub use sass::ExternalSassCompiler;
pub use sass::GrassCompiler;

mod stylus;
pub use stylus::StylusCompiler;

/// Stylesheet languages the plugin accepts, keyed by file extension
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum StyleSyntax {
  Css,
  Sass,
  Scss,
  Less,
  Stylus,
}

impl StyleSyntax {
  pub fn from_extension(extension: &str) -> Option<Self> {
    match extension {
      "css" => Some(StyleSyntax::Css),
      "sass" => Some(StyleSyntax::Sass),
      "scss" => Some(StyleSyntax::Scss),
      "less" => Some(StyleSyntax::Less),
      "styl" => Some(StyleSyntax::Stylus),
      _ => None,
    }
  }

  pub fn from_path(path: &Path) -> Option<Self> {
    path
      .extension()
      .and_then(|extension| extension.to_str())
      .and_then(Self::from_extension)
  }
}

#[derive(Debug, Error)]
pub enum PreprocessError {
  #[error("Unable to run `{command}`, make sure it is installed or configure another command")]
  MissingCompiler {
    command: String,
    #[source]
    source: std::io::Error,
  },
  #[error("Failed to compile {}: {message}", path.display())]
  Compile { path: PathBuf, message: String },
  #[error("Failed to run `{command}`")]
  Io {
    command: String,
    #[source]
    source: std::io::Error,
  },
}

/// What a compiler is given for one stylesheet
#[derive(Clone, Debug)]
pub struct CompileInput {
  /// Raw file contents
  pub source: Vec<u8>,
  /// Absolute path of the stylesheet
  pub path: PathBuf,
  /// The import specifier the stylesheet was reached through
  pub specifier: String,
}

impl CompileInput {
  pub fn source_text(&self) -> Result<&str, PreprocessError> {
    std::str::from_utf8(&self.source).map_err(|err| PreprocessError::Compile {
      path: self.path.clone(),
      message: err.to_string(),
    })
  }

  /// Directory of the stylesheet, used as an include path by every compiler
  pub fn source_dir(&self) -> &Path {
    self.path.parent().unwrap_or_else(|| Path::new(""))
  }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Compiled {
  pub css: String,
  /// Files the compiler read besides the stylesheet itself
  pub dependencies: Vec<PathBuf>,
}

/// A single preprocessor behind a uniform asynchronous interface
#[async_trait]
pub trait StyleCompiler: Debug + Send + Sync {
  async fn compile(&self, input: &CompileInput) -> Result<Compiled, PreprocessError>;
}

/// `.css` sources are handed on untouched
#[derive(Debug, Default)]
pub struct PassThrough;

#[async_trait]
impl StyleCompiler for PassThrough {
  async fn compile(&self, input: &CompileInput) -> Result<Compiled, PreprocessError> {
    Ok(Compiled {
      css: input.source_text()?.to_string(),
      dependencies: Vec::new(),
    })
  }
}

/// One compiler per [`StyleSyntax`]
#[derive(Clone, Debug)]
pub struct Preprocessors {
  pub css: Arc<dyn StyleCompiler>,
  pub sass: Arc<dyn StyleCompiler>,
  pub less: Arc<dyn StyleCompiler>,
  pub stylus: Arc<dyn StyleCompiler>,
}

impl Preprocessors {
  pub fn from_options(options: &PluginOptions, fs: FileSystemRef) -> Self {
    let sass: Arc<dyn StyleCompiler> = match &options.sass.implementation {
      SassImplementation::Grass => Arc::new(GrassCompiler::new(fs, options.sass.clone())),
      SassImplementation::External { command } => Arc::new(ExternalSassCompiler::new(
        command.clone(),
        options.sass.clone(),
      )),
    };

    Self {
      css: Arc::new(PassThrough),
      sass,
      less: Arc::new(LessCompiler::new(options.less.clone())),
      stylus: Arc::new(StylusCompiler::new(options.stylus.clone())),
    }
  }

  pub fn compiler_for(&self, syntax: StyleSyntax) -> &dyn StyleCompiler {
    match syntax {
      StyleSyntax::Css => self.css.as_ref(),
      StyleSyntax::Sass | StyleSyntax::Scss => self.sass.as_ref(),
      StyleSyntax::Less => self.less.as_ref(),
      StyleSyntax::Stylus => self.stylus.as_ref(),
    }
  }

  pub async fn compile(
    &self,
    syntax: StyleSyntax,
    input: &CompileInput,
  ) -> Result<Compiled, PreprocessError> {
    tracing::debug!(?syntax, path = %input.path.display(), "Preprocessing");
    self.compiler_for(syntax).compile(input).await
  }
}

#[cfg(test)]
mod tests {
  use stylebridge_filesystem::in_memory_file_system::InMemoryFileSystem;

  use super::*;

  fn input(path: &str, source: &str) -> CompileInput {
    CompileInput {
      source: source.as_bytes().to_vec(),
      path: PathBuf::from(path),
      specifier: format!("./{}", Path::new(path).file_name().unwrap().to_string_lossy()),
    }
  }

  #[test]
  fn syntax_from_path() {
    assert_eq!(
      StyleSyntax::from_path(Path::new("/a/b.module.scss")),
      Some(StyleSyntax::Scss)
    );
    assert_eq!(
      StyleSyntax::from_path(Path::new("/a/b.styl")),
      Some(StyleSyntax::Stylus)
    );
    assert_eq!(StyleSyntax::from_path(Path::new("/a/b.scss.js")), None);
    assert_eq!(StyleSyntax::from_path(Path::new("/a/styles")), None);
  }

  #[tokio::test]
  async fn css_passes_through_unchanged() {
    let fs = Arc::new(InMemoryFileSystem::default());
    let preprocessors = Preprocessors::from_options(&PluginOptions::default(), fs);
    let source = "/* keep me */\n.a   {  color : red }\n";

    let compiled = preprocessors
      .compile(StyleSyntax::Css, &input("/app/a.css", source))
      .await
      .unwrap();

    assert_eq!(compiled.css, source);
    assert!(compiled.dependencies.is_empty());
  }

  #[tokio::test]
  async fn scss_is_compiled_with_grass_by_default() {
    let fs = Arc::new(InMemoryFileSystem::default());
    fs.write_file("/app/a.scss", ".a { .b { color: red; } }");
    let preprocessors = Preprocessors::from_options(&PluginOptions::default(), fs);

    let compiled = preprocessors
      .compile(
        StyleSyntax::Scss,
        &input("/app/a.scss", ".a { .b { color: red; } }"),
      )
      .await
      .unwrap();

    assert!(compiled.css.contains(".a .b"));
  }

  #[tokio::test]
  async fn invalid_utf8_is_a_compile_error() {
    let preprocessors =
      Preprocessors::from_options(&PluginOptions::default(), Arc::new(InMemoryFileSystem::default()));
    let input = CompileInput {
      source: vec![0xff, 0xfe],
      path: PathBuf::from("/app/a.css"),
      specifier: "./a.css".into(),
    };

    let error = preprocessors
      .compile(StyleSyntax::Css, &input)
      .await
      .unwrap_err();

    assert!(matches!(error, PreprocessError::Compile { .. }));
  }
}
