use std::path::Path;
use std::path::PathBuf;

use crate::FileSystem;

#[derive(Debug, Default)]
pub struct OsFileSystem;

impl FileSystem for OsFileSystem {
  fn cwd(&self) -> std::io::Result<PathBuf> {
    std::env::current_dir()
  }

  fn create_directory(&self, path: &Path) -> std::io::Result<()> {
    std::fs::create_dir_all(path)
  }

  fn read(&self, path: &Path) -> std::io::Result<Vec<u8>> {
    std::fs::read(path)
  }

  fn read_to_string(&self, path: &Path) -> std::io::Result<String> {
    std::fs::read_to_string(path)
  }

  fn write(&self, path: &Path, contents: &[u8]) -> std::io::Result<()> {
    std::fs::write(path, contents)
  }

  fn read_dir(&self, path: &Path) -> std::io::Result<Vec<PathBuf>> {
    let mut entries = std::fs::read_dir(path)?
      .map(|entry| entry.map(|entry| entry.path()))
      .collect::<std::io::Result<Vec<_>>>()?;

    // read_dir order is platform dependent
    entries.sort();
    Ok(entries)
  }

  fn is_file(&self, path: &Path) -> bool {
    path.is_file()
  }

  fn is_dir(&self, path: &Path) -> bool {
    path.is_dir()
  }
}

#[cfg(test)]
mod test {
  use assert_fs::prelude::*;

  use super::*;

  #[test]
  fn test_write_and_read_back() -> Result<(), Box<dyn std::error::Error>> {
    let dir = assert_fs::TempDir::new()?;
    let fs = OsFileSystem;
    let nested = dir.child("a/b");

    fs.create_directory(nested.path())?;
    fs.create_directory(nested.path())?;
    fs.write(&nested.path().join("out.css"), b".a{}")?;

    assert_eq!(fs.read_to_string(&nested.path().join("out.css"))?, ".a{}");
    assert!(fs.is_dir(nested.path()));
    assert!(fs.is_file(&nested.path().join("out.css")));

    Ok(())
  }

  #[test]
  fn test_read_dir_is_sorted() -> Result<(), Box<dyn std::error::Error>> {
    let dir = assert_fs::TempDir::new()?;
    dir.child("b.css").write_str("")?;
    dir.child("a.css").write_str("")?;
    dir.child("sub").create_dir_all()?;

    let entries = OsFileSystem.read_dir(dir.path())?;

    assert_eq!(
      entries,
      vec![
        dir.child("a.css").path().to_path_buf(),
        dir.child("b.css").path().to_path_buf(),
        dir.child("sub").path().to_path_buf(),
      ]
    );

    Ok(())
  }
}
