use std::ffi::OsStr;
use std::path::Component;
use std::path::Path;
use std::path::PathBuf;
use std::sync::atomic::AtomicU64;
use std::sync::atomic::Ordering;

/// Chooses where the compiled CSS of each stylesheet is written
///
/// Entry points keep a stable path mirroring their location in the project, because the host
/// derives output file names from it. Every other stylesheet gets a fresh directory per call: the
/// host can mis-resolve many sibling temp files sharing one directory.
#[derive(Debug)]
pub struct TempOutputNamer {
  temp_root: PathBuf,
  project_root: PathBuf,
  counter: AtomicU64,
}

impl TempOutputNamer {
  pub fn new(temp_root: PathBuf, project_root: PathBuf) -> Self {
    Self {
      temp_root,
      project_root,
      counter: AtomicU64::new(0),
    }
  }

  /// A new, unique temp root below the OS temp directory. It is never removed by the plugin.
  pub fn unique_temp_root() -> PathBuf {
    std::env::temp_dir().join(format!("stylebridge-{:016x}", rand::random::<u64>()))
  }

  pub fn temp_root(&self) -> &Path {
    &self.temp_root
  }

  pub fn output_path(&self, source_path: &Path, is_entry_point: bool) -> PathBuf {
    let file_name = format!(
      "{}.css",
      source_path
        .file_stem()
        .unwrap_or_else(|| OsStr::new("index"))
        .to_string_lossy()
    );

    let directory = if is_entry_point {
      let source_dir = source_path.parent().unwrap_or_else(|| Path::new(""));
      self.temp_root.join(self.relative_dir(source_dir))
    } else {
      let id = self.counter.fetch_add(1, Ordering::Relaxed);
      self
        .temp_root
        .join(format!("{id:x}-{:08x}", rand::random::<u32>()))
    };

    directory.join(file_name)
  }

  /// `source_dir` relative to the project root, with every component kept below the temp root
  fn relative_dir(&self, source_dir: &Path) -> PathBuf {
    let relative =
      pathdiff::diff_paths(source_dir, &self.project_root).unwrap_or_else(|| source_dir.into());

    relative
      .components()
      .filter_map(|component| match component {
        Component::Normal(name) => Some(name.to_os_string()),
        Component::ParentDir => Some("__".into()),
        Component::CurDir | Component::RootDir | Component::Prefix(_) => None,
      })
      .collect()
  }
}
