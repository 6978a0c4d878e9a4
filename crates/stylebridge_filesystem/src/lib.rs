use std::io::Result;
use std::path::Path;
use std::path::PathBuf;
use std::sync::Arc;

/// In-memory file-system for testing
pub mod in_memory_file_system;

/// File-system implementation using std::fs
pub mod os_file_system;

pub mod path;

pub mod search;

/// Records every path read through a delegate file-system
pub mod tracking_file_system;

pub type FileSystemRef = Arc<dyn FileSystem + Send + Sync>;

impl std::fmt::Debug for dyn FileSystem + Send + Sync {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.write_str("FileSystem")
  }
}

/// Trait abstracting file-system operations
///
/// Everything the stylesheet pipeline touches on disk goes through this trait, so the whole
/// resolve and load flow can run against an [`in_memory_file_system::InMemoryFileSystem`].
#[cfg_attr(test, mockall::automock)]
pub trait FileSystem {
  fn cwd(&self) -> Result<PathBuf> {
    Err(std::io::Error::new(
      std::io::ErrorKind::Other,
      "Not implemented",
    ))
  }

  /// Create a directory and all of its missing parents. Succeeds if it already exists.
  fn create_directory(&self, path: &Path) -> Result<()>;

  fn read(&self, path: &Path) -> Result<Vec<u8>>;

  fn read_to_string(&self, path: &Path) -> Result<String> {
    let bytes = self.read(path)?;
    String::from_utf8(bytes)
      .map_err(|err| std::io::Error::new(std::io::ErrorKind::InvalidData, err))
  }

  /// Write a file, replacing any previous contents. The parent directory must exist.
  fn write(&self, path: &Path, contents: &[u8]) -> Result<()>;

  /// List the direct children of a directory.
  fn read_dir(&self, path: &Path) -> Result<Vec<PathBuf>>;

  fn is_file(&self, path: &Path) -> bool;

  fn is_dir(&self, path: &Path) -> bool;
}
