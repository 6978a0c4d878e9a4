use std::path::Path;
use std::path::PathBuf;

use dashmap::DashMap;
use stylebridge_core::types::ClassMap;
use stylebridge_core::types::CssModulesOptions;

use crate::transform_chain::{ChainInput, ChainOutput, TransformChain};

/// A `.module.` stylesheet is one whose file name, without its extension, ends in `.module`
pub fn is_module_file(path: &Path) -> bool {
  path
    .file_stem()
    .and_then(|stem| stem.to_str())
    .is_some_and(|stem| stem.ends_with(".module"))
}

#[derive(Clone, Debug, PartialEq)]
pub struct ModuleRecord {
  pub source_path: PathBuf,
  pub temp_path: PathBuf,
  pub class_map: ClassMap,
}

/// Latest class map per module stylesheet, keyed by source path
#[derive(Debug, Default)]
pub struct ModuleRecordStore {
  records: DashMap<PathBuf, ModuleRecord>,
}

impl ModuleRecordStore {
  /// Insert a record, replacing the previous one for the same source
  pub fn record(&self, record: ModuleRecord) {
    self.records.insert(record.source_path.clone(), record);
  }

  pub fn get(&self, source_path: &Path) -> Option<ModuleRecord> {
    self
      .records
      .get(source_path)
      .map(|record| record.value().clone())
  }

  /// Lookup for loads that arrive without plugin data
  pub fn find_by_temp_path(&self, temp_path: &Path) -> Option<ModuleRecord> {
    self
      .records
      .iter()
      .find(|record| record.temp_path == temp_path)
      .map(|record| record.value().clone())
  }

  pub fn len(&self) -> usize {
    self.records.len()
  }

  pub fn is_empty(&self) -> bool {
    self.records.is_empty()
  }
}

/// Runs the transform chain for one stylesheet, scoping class names for module files
#[derive(Debug)]
pub struct CssModulesTracker {
  options: Option<CssModulesOptions>,
  project_root: PathBuf,
  store: ModuleRecordStore,
}

impl CssModulesTracker {
  pub fn new(options: Option<CssModulesOptions>, project_root: PathBuf) -> Self {
    Self {
      options,
      project_root,
      store: ModuleRecordStore::default(),
    }
  }

  pub fn store(&self) -> &ModuleRecordStore {
    &self.store
  }

  /// True when `path` gets a class map
  pub fn applies_to(&self, path: &Path) -> bool {
    self.options.is_some() && is_module_file(path)
  }

  pub fn process(
    &self,
    chain: &TransformChain,
    css: &str,
    source_path: &Path,
    temp_path: &Path,
  ) -> anyhow::Result<ChainOutput> {
    let css_modules = self.options.as_ref().filter(|_| is_module_file(source_path));

    let output = chain.run(ChainInput {
      css,
      from: source_path,
      to: temp_path,
      project_root: &self.project_root,
      css_modules,
    })?;

    let (Some(options), Some(class_map)) = (css_modules, &output.class_map) else {
      return Ok(output);
    };

    if let Some(hook) = &options.on_class_map {
      hook.call(source_path, class_map)?;
    }

    tracing::debug!(
      source = %source_path.display(),
      classes = class_map.len(),
      "Recorded class map"
    );
    self.store.record(ModuleRecord {
      source_path: source_path.to_path_buf(),
      temp_path: temp_path.to_path_buf(),
      class_map: class_map.clone(),
    });

    Ok(output)
  }
}

#[cfg(test)]
mod tests {
  use std::sync::Arc;

  use anyhow::anyhow;
  use parking_lot::Mutex;
  use stylebridge_core::types::ClassMapHook;

  use super::*;

  fn tracker(options: Option<CssModulesOptions>) -> CssModulesTracker {
    CssModulesTracker::new(options, PathBuf::from("/app"))
  }

  #[test]
  fn module_files() {
    assert!(is_module_file(Path::new("/app/styles/basic.module.scss")));
    assert!(is_module_file(Path::new("basic.module.css")));
    assert!(!is_module_file(Path::new("/app/styles/basic.scss")));
    assert!(!is_module_file(Path::new("/app/module.css")));
    assert!(!is_module_file(Path::new("/app/styles.module/basic.css")));
  }

  #[test]
  fn recording_twice_keeps_the_latest() {
    let tracker = tracker(Some(CssModulesOptions::default()));
    let chain = TransformChain::default();
    let source = Path::new("/app/styles/basic.module.css");
    let temp = Path::new("/tmp/out/styles/basic.module.css");

    tracker
      .process(&chain, ".title { color: red }", source, temp)
      .unwrap();
    tracker
      .process(&chain, ".heading { color: blue }", source, temp)
      .unwrap();

    let record = tracker.store().get(source).unwrap();
    assert_eq!(tracker.store().len(), 1);
    assert!(record.class_map.contains_key("heading"));
    assert!(!record.class_map.contains_key("title"));
  }

  #[test]
  fn new_temp_path_replaces_the_old_record() {
    let tracker = tracker(Some(CssModulesOptions::default()));
    let chain = TransformChain::default();
    let source = Path::new("/app/styles/basic.module.css");

    tracker
      .process(&chain, ".a {}", source, Path::new("/tmp/out/1/basic.module.css"))
      .unwrap();
    tracker
      .process(&chain, ".b {}", source, Path::new("/tmp/out/2/basic.module.css"))
      .unwrap();

    assert_eq!(tracker.store().len(), 1);
    assert!(tracker
      .store()
      .find_by_temp_path(Path::new("/tmp/out/1/basic.module.css"))
      .is_none());
    assert_eq!(
      tracker.store().get(source).unwrap().temp_path,
      PathBuf::from("/tmp/out/2/basic.module.css")
    );
  }

  #[test]
  fn plain_files_are_not_recorded() {
    let tracker = tracker(Some(CssModulesOptions::default()));
    let css = ".title { color: red }";

    let output = tracker
      .process(
        &TransformChain::default(),
        css,
        Path::new("/app/basic.css"),
        Path::new("/tmp/basic.css"),
      )
      .unwrap();

    assert_eq!(output.css, css);
    assert_eq!(output.class_map, None);
    assert!(tracker.store().is_empty());
  }

  #[test]
  fn disabled_modules_leave_module_files_alone() {
    let tracker = tracker(None);
    let path = Path::new("/app/basic.module.css");

    let output = tracker
      .process(&TransformChain::default(), ".a {}", path, path)
      .unwrap();

    assert!(!tracker.applies_to(path));
    assert_eq!(output.class_map, None);
    assert!(tracker.store().is_empty());
  }

  #[test]
  fn class_maps_are_forwarded_to_the_hook() {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let hook_seen = seen.clone();
    let tracker = tracker(Some(CssModulesOptions {
      on_class_map: Some(ClassMapHook::new(move |path, class_map| {
        hook_seen
          .lock()
          .push((path.to_path_buf(), class_map.len()));
        Ok(())
      })),
      ..CssModulesOptions::default()
    }));
    let source = Path::new("/app/a.module.css");

    tracker
      .process(&TransformChain::default(), ".a {} .b {}", source, source)
      .unwrap();

    assert_eq!(*seen.lock(), vec![(source.to_path_buf(), 2)]);
  }

  #[test]
  fn hook_errors_fail_processing() {
    let tracker = tracker(Some(CssModulesOptions {
      on_class_map: Some(ClassMapHook::new(|_, _| Err(anyhow!("rejected")))),
      ..CssModulesOptions::default()
    }));
    let source = Path::new("/app/a.module.css");

    let error = tracker
      .process(&TransformChain::default(), ".a {}", source, source)
      .unwrap_err();

    assert_eq!(error.to_string(), "rejected");
    assert!(tracker.store().is_empty());
  }
}
