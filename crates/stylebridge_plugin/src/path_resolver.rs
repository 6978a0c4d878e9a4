use std::path::Path;
use std::path::PathBuf;

use dashmap::DashMap;
use stylebridge_filesystem::path::resolve;
use stylebridge_filesystem::search::find_node_module_file;
use stylebridge_filesystem::FileSystemRef;

/// Locates the stylesheet an import specifier refers to
///
/// Bare specifiers are first tried as installed package assets (`node_modules/<specifier>`,
/// looking up from the importing directory and then from the project root). Anything that is not
/// found that way is resolved relative to the importing directory, so resolution never fails; a
/// missing file is detected later by the caller.
#[derive(Debug)]
pub struct PathResolver {
  fs: FileSystemRef,
  project_root: PathBuf,
  /// Successful package lookups. Misses are retried, a package may be installed mid-session.
  packages: DashMap<(PathBuf, String), PathBuf>,
}

impl PathResolver {
  pub fn new(fs: FileSystemRef, project_root: PathBuf) -> Self {
    Self {
      fs,
      project_root,
      packages: DashMap::new(),
    }
  }

  pub fn resolve(&self, specifier: &str, resolve_dir: &Path) -> PathBuf {
    if !is_path_like(specifier) {
      if let Some(resolved) = self.resolve_package(specifier, resolve_dir) {
        return resolved;
      }
    }

    resolve(resolve_dir, Path::new(specifier))
  }

  fn resolve_package(&self, specifier: &str, resolve_dir: &Path) -> Option<PathBuf> {
    // `~lib/theme.css` is the Sass and webpack spelling of a package import
    let package_specifier = match specifier.strip_prefix('~') {
      Some(rest) if !rest.starts_with('/') => rest,
      _ => specifier,
    };

    let key = (resolve_dir.to_path_buf(), package_specifier.to_string());
    if let Some(cached) = self.packages.get(&key) {
      return Some(cached.clone());
    }

    let resolved = find_node_module_file(self.fs.as_ref(), package_specifier, resolve_dir)
      .or_else(|| find_node_module_file(self.fs.as_ref(), package_specifier, &self.project_root));

    tracing::trace!(specifier, ?resolved, "Package lookup");
    if let Some(resolved) = &resolved {
      self.packages.insert(key, resolved.clone());
    }
    resolved
  }
}

fn is_path_like(specifier: &str) -> bool {
  specifier == "."
    || specifier == ".."
    || specifier.starts_with("./")
    || specifier.starts_with("../")
    || Path::new(specifier).is_absolute()
}

#[cfg(test)]
mod tests {
  use std::sync::Arc;

  use stylebridge_filesystem::in_memory_file_system::InMemoryFileSystem;

  use super::*;

  fn resolver(fs: InMemoryFileSystem) -> PathResolver {
    PathResolver::new(Arc::new(fs), PathBuf::from("/app"))
  }

  #[test]
  fn resolves_relative_specifiers_from_the_importing_directory() {
    let resolver = resolver(InMemoryFileSystem::default());

    assert_eq!(
      resolver.resolve("./styles/basic.css", Path::new("/app/src")),
      PathBuf::from("/app/src/styles/basic.css")
    );
    assert_eq!(
      resolver.resolve("../styles/basic.css", Path::new("/app/src")),
      PathBuf::from("/app/styles/basic.css")
    );
  }

  #[test]
  fn prefers_installed_package_assets() {
    let fs = InMemoryFileSystem::default();
    fs.write_file("/app/node_modules/bootstrap/dist/css/bootstrap.css", "");
    fs.write_file("/app/src/bootstrap/dist/css/bootstrap.css", "");
    let resolver = resolver(fs);

    assert_eq!(
      resolver.resolve("bootstrap/dist/css/bootstrap.css", Path::new("/app/src")),
      PathBuf::from("/app/node_modules/bootstrap/dist/css/bootstrap.css")
    );
  }

  #[test]
  fn strips_the_package_tilde() {
    let fs = InMemoryFileSystem::default();
    fs.write_file("/app/node_modules/lib/theme.scss", "");
    let resolver = resolver(fs);

    assert_eq!(
      resolver.resolve("~lib/theme.scss", Path::new("/app/src")),
      PathBuf::from("/app/node_modules/lib/theme.scss")
    );
  }

  #[test]
  fn falls_back_to_the_project_root_node_modules() {
    let fs = InMemoryFileSystem::default();
    fs.write_file("/app/node_modules/lib/theme.css", "");
    let resolver = resolver(fs);

    assert_eq!(
      resolver.resolve("lib/theme.css", Path::new("/elsewhere/src")),
      PathBuf::from("/app/node_modules/lib/theme.css")
    );
  }

  #[test]
  fn bare_specifiers_without_a_package_resolve_relatively() {
    let resolver = resolver(InMemoryFileSystem::default());

    assert_eq!(
      resolver.resolve("styles/basic.css", Path::new("/app")),
      PathBuf::from("/app/styles/basic.css")
    );
  }

  #[test]
  fn relative_specifiers_skip_package_lookup() {
    let fs = InMemoryFileSystem::default();
    fs.write_file("/app/node_modules/styles/basic.css", "");
    let resolver = resolver(fs);

    assert_eq!(
      resolver.resolve("./styles/basic.css", Path::new("/app")),
      PathBuf::from("/app/styles/basic.css")
    );
  }
}
