use std::path::Path;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::anyhow;
use anyhow::Context;
use async_trait::async_trait;
use regex::Regex;
use stylebridge_core::plugin::BundlerPlugin;
use stylebridge_core::plugin::HookFilter;
use stylebridge_core::types::ClassMap;
use stylebridge_core::types::ImportKind;
use stylebridge_core::types::LoadArgs;
use stylebridge_core::types::Loader;
use stylebridge_core::types::Namespace;
use stylebridge_core::types::OnLoadResult;
use stylebridge_core::types::OnResolveResult;
use stylebridge_core::types::PluginData;
use stylebridge_core::types::PluginOptions;
use stylebridge_core::types::ResolveArgs;
use stylebridge_filesystem::os_file_system::OsFileSystem;
use stylebridge_filesystem::FileSystemRef;

use crate::config_loader::ConfigError;
use crate::css_modules::CssModulesTracker;
use crate::dependency_collector::collect_dependencies;
use crate::path_resolver::PathResolver;
use crate::preprocessor::{CompileInput, Preprocessors, StyleSyntax};
use crate::temp_output::TempOutputNamer;
use crate::tracing_setup;
use crate::transform_chain::{parse_pattern, TransformChain, TransformStep};
use crate::virtual_module;

const PLUGIN_NAME: &str = "stylebridge";
const STYLESHEET_FILTER: &str = r".\.(css|sass|scss|less|styl)$";

/// Everything needed to build a [`StylesheetPlugin`]. Unset fields fall back to the OS
/// file-system, a fresh temp root and the compilers selected by the options.
#[derive(Default)]
pub struct StylesheetPluginInit {
  pub options: PluginOptions,
  pub steps: Vec<Arc<dyn TransformStep>>,
  pub fs: Option<FileSystemRef>,
  pub temp_root: Option<PathBuf>,
  pub preprocessors: Option<Preprocessors>,
}

/// Compiles stylesheet imports to CSS and hands them back to the bundler as virtual modules
///
/// The resolve hook does all the work: it compiles the stylesheet, runs the transform chain,
/// records CSS-Modules class maps and writes the output below the temp root. The load hook only
/// renders the JavaScript for module and inline stylesheets.
#[derive(Debug)]
pub struct StylesheetPlugin {
  fs: FileSystemRef,
  resolve_filter: HookFilter,
  load_filters: Vec<HookFilter>,
  write_to_file: bool,
  resolver: PathResolver,
  namer: TempOutputNamer,
  preprocessors: Preprocessors,
  chain: TransformChain,
  modules: CssModulesTracker,
}

impl StylesheetPlugin {
  pub fn new(init: StylesheetPluginInit) -> anyhow::Result<Self> {
    let StylesheetPluginInit {
      options,
      steps,
      fs,
      temp_root,
      preprocessors,
    } = init;

    if let Err(err) = tracing_setup::init_from_env() {
      tracing::warn!("Log output was not installed: {err:#}");
    }

    let fs = fs.unwrap_or_else(|| Arc::new(OsFileSystem));
    let project_root = match &options.root_dir {
      Some(root_dir) => root_dir.clone(),
      None => fs.cwd().context("Failed to read the current working directory")?,
    };

    let modules = options.modules.options();
    if let Some(modules) = &modules {
      parse_pattern(&modules.generate_scoped_name).map_err(|err| {
        ConfigError::InvalidScopedNamePattern {
          pattern: modules.generate_scoped_name.clone(),
          message: err.to_string(),
        }
      })?;
    }

    let temp_root = temp_root.unwrap_or_else(TempOutputNamer::unique_temp_root);
    fs.create_directory(&temp_root)
      .with_context(|| format!("Failed to create {}", temp_root.display()))?;
    tracing::debug!(temp_root = %temp_root.display(), root = %project_root.display(), "Plugin created");

    let preprocessors =
      preprocessors.unwrap_or_else(|| Preprocessors::from_options(&options, fs.clone()));

    let any = Regex::new(".*")?;
    let load_filters = vec![
      HookFilter::new(any.clone(), Some(Namespace::Module)),
      HookFilter::new(any, Some(Namespace::InlineText)),
    ];

    Ok(Self {
      resolve_filter: HookFilter::new(Regex::new(STYLESHEET_FILTER)?, None),
      load_filters,
      resolver: PathResolver::new(fs.clone(), project_root.clone()),
      modules: CssModulesTracker::new(modules, project_root.clone()),
      namer: TempOutputNamer::new(temp_root, project_root),
      write_to_file: options.write_to_file,
      preprocessors,
      chain: TransformChain::new(steps),
      fs,
    })
  }

  /// Where compiled stylesheets are written
  pub fn temp_root(&self) -> &Path {
    self.namer.temp_root()
  }

  pub fn modules(&self) -> &CssModulesTracker {
    &self.modules
  }

  fn class_map(&self, args: &LoadArgs) -> ClassMap {
    let record = args
      .plugin_data
      .as_ref()
      .and_then(|data| self.modules.store().get(&data.original_path))
      .or_else(|| self.modules.store().find_by_temp_path(&args.path));

    match record {
      Some(record) => record.class_map,
      None => {
        tracing::warn!(path = %args.path.display(), "No class map recorded, exporting an empty one");
        ClassMap::new()
      }
    }
  }
}

fn inline_css(args: &LoadArgs) -> anyhow::Result<&str> {
  args
    .plugin_data
    .as_ref()
    .and_then(|data| data.css.as_deref())
    .ok_or_else(|| anyhow!("No inline CSS attached to {}", args.path.display()))
}

#[async_trait]
impl BundlerPlugin for StylesheetPlugin {
  fn name(&self) -> &str {
    PLUGIN_NAME
  }

  fn resolve_filter(&self) -> HookFilter {
    self.resolve_filter.clone()
  }

  fn load_filters(&self) -> Vec<HookFilter> {
    self.load_filters.clone()
  }

  #[tracing::instrument(level = "debug", skip_all, fields(specifier = %args.path))]
  async fn resolve(&self, args: ResolveArgs) -> anyhow::Result<Option<OnResolveResult>> {
    if args.namespace != Namespace::File {
      tracing::debug!(namespace = %args.namespace, "Skipping import from another namespace");
      return Ok(None);
    }

    let source_path = self.resolver.resolve(&args.path, &args.resolve_dir);
    if !self.fs.is_file(&source_path) {
      // e.g. `BasePicker.scss` that is really `BasePicker.scss.js`
      tracing::debug!(path = %source_path.display(), "Skipping specifier that is not a stylesheet file");
      return Ok(None);
    }
    let Some(syntax) = StyleSyntax::from_path(&source_path) else {
      return Ok(None);
    };

    let temp_path = self
      .namer
      .output_path(&source_path, args.kind == ImportKind::EntryPoint);
    let source = self
      .fs
      .read(&source_path)
      .with_context(|| format!("Failed to read {}", source_path.display()))?;

    let compiled = self
      .preprocessors
      .compile(
        syntax,
        &CompileInput {
          source,
          path: source_path.clone(),
          specifier: args.path.clone(),
        },
      )
      .await?;

    let output = self
      .modules
      .process(&self.chain, &compiled.css, &source_path, &temp_path)
      .with_context(|| format!("Failed to transform {}", source_path.display()))?;

    let watch_files = collect_dependencies(
      self.fs.as_ref(),
      &source_path,
      &compiled.dependencies,
      &output.messages,
    )
    .with_context(|| format!("Failed to collect dependencies of {}", source_path.display()))?;

    let css = if self.write_to_file {
      if let Some(dir) = temp_path.parent() {
        self
          .fs
          .create_directory(dir)
          .with_context(|| format!("Failed to create {}", dir.display()))?;
      }
      self
        .fs
        .write(&temp_path, output.css.as_bytes())
        .with_context(|| format!("Failed to write {}", temp_path.display()))?;
      None
    } else {
      Some(output.css)
    };

    let namespace = if self.modules.applies_to(&source_path) {
      Namespace::Module
    } else if !self.write_to_file {
      Namespace::InlineText
    } else {
      Namespace::File
    };

    tracing::debug!(
      source = %source_path.display(),
      output = %temp_path.display(),
      %namespace,
      "Resolved stylesheet"
    );

    Ok(Some(OnResolveResult {
      path: temp_path,
      namespace,
      watch_files,
      plugin_data: Some(PluginData {
        original_path: source_path,
        css,
      }),
    }))
  }

  async fn load(&self, args: LoadArgs) -> anyhow::Result<Option<OnLoadResult>> {
    let contents = match args.namespace {
      Namespace::Module => {
        let class_map = self.class_map(&args);
        if self.write_to_file {
          virtual_module::module_with_import(&args.path, &class_map)?
        } else {
          virtual_module::module_with_inline_css(&class_map, inline_css(&args)?)?
        }
      }
      Namespace::InlineText => virtual_module::inline_text(inline_css(&args)?)?,
      _ => return Ok(None),
    };

    tracing::debug!(path = %args.path.display(), namespace = %args.namespace, "Loaded virtual module");

    Ok(Some(OnLoadResult {
      contents,
      resolve_dir: args.path.parent().map(Path::to_path_buf),
      loader: Loader::Js,
      watch_files: Vec::new(),
    }))
  }
}
