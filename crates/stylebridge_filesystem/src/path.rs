use std::path::Component;
use std::path::Path;
use std::path::PathBuf;

/// Lexically resolve `path` against `base`, dropping `.` and folding `..` without touching the
/// file-system. Absolute inputs ignore `base`.
pub fn resolve(base: &Path, path: &Path) -> PathBuf {
  let mut result: Vec<Component> = if path.is_absolute() {
    vec![]
  } else {
    base.components().collect()
  };

  for component in path.components() {
    match component {
      Component::Prefix(prefix) => {
        result = vec![Component::Prefix(prefix)];
      }
      Component::RootDir => {
        result.retain(|c| matches!(c, Component::Prefix(_)));
        result.push(Component::RootDir);
      }
      Component::CurDir => {}
      Component::ParentDir => {
        if matches!(result.last(), Some(Component::Normal(_))) {
          result.pop();
        }
      }
      Component::Normal(path) => {
        result.push(Component::Normal(path));
      }
    }
  }

  PathBuf::from_iter(result)
}


#[cfg(test)]
mod test {
  use super::*;

  #[test]
  fn test_resolve_relative() {
    assert_eq!(
      resolve(Path::new("/app/src"), Path::new("./styles/../basic.css")),
      PathBuf::from("/app/src/basic.css")
    );
  }

  #[test]
  fn test_resolve_absolute_ignores_base() {
    assert_eq!(
      resolve(Path::new("/app/src"), Path::new("/other/basic.css")),
      PathBuf::from("/other/basic.css")
    );
  }

  #[test]
  fn test_parent_dir_stops_at_root() {
    assert_eq!(
      resolve(Path::new("/app"), Path::new("../../../basic.css")),
      PathBuf::from("/basic.css")
    );
  }

  #[test]
  fn test_resolve_drops_current_dir_components() {
    assert_eq!(
      resolve(Path::new("/foo"), Path::new("./bar/./../baz/")),
      PathBuf::from("/foo/baz")
    );
  }
}
