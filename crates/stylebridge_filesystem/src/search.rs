use std::path::Path;
use std::path::PathBuf;

use crate::FileSystem;

/// Walk up from `from` (inclusive) until `root`, returning the first of `filenames` found.
pub fn find_ancestor_file<P: AsRef<Path>>(
  fs: &dyn FileSystem,
  filenames: &[&str],
  from: P,
  root: P,
) -> Option<PathBuf> {
  for dir in from.as_ref().ancestors() {
    for filename in filenames {
      let fullpath = dir.join(filename);
      if fs.is_file(&fullpath) {
        return Some(fullpath);
      }
    }

    if dir == root.as_ref() {
      break;
    }
  }

  None
}

/// Look for `node_modules/<specifier>` in `from` and each of its ancestors, nearest first.
pub fn find_node_module_file(fs: &dyn FileSystem, specifier: &str, from: &Path) -> Option<PathBuf> {
  for dir in from.ancestors() {
    // Never look for node_modules inside node_modules/node_modules
    if dir.file_name().is_some_and(|name| name == "node_modules") {
      continue;
    }

    let candidate = dir.join("node_modules").join(specifier);
    if fs.is_file(&candidate) {
      return Some(candidate);
    }
  }

  None
}

/// Recursively list every file below `dir`, depth first, in `read_dir` order.
pub fn walk_files(fs: &dyn FileSystem, dir: &Path) -> std::io::Result<Vec<PathBuf>> {
  let mut files = Vec::new();
  let mut pending = vec![dir.to_path_buf()];

  while let Some(current) = pending.pop() {
    let mut subdirectories = Vec::new();
    for entry in fs.read_dir(&current)? {
      if fs.is_dir(&entry) {
        subdirectories.push(entry);
      } else {
        files.push(entry);
      }
    }

    // Reverse so the first listed subdirectory is visited first
    pending.extend(subdirectories.into_iter().rev());
  }

  Ok(files)
}
