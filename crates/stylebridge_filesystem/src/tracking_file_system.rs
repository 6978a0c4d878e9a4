use std::path::{Path, PathBuf};

use parking_lot::Mutex;

use crate::{FileSystem, FileSystemRef};

#[derive(PartialEq, Eq, Debug, Clone)]
pub enum FileSystemOperation {
  Read(PathBuf),
  Stat(PathBuf),
  ReadDir(PathBuf),
  Write(PathBuf),
  Cwd,
}

impl FileSystemOperation {
  /// Return the path this operation refers to if it's a path-based operation.
  pub fn path(&self) -> Option<&Path> {
    match self {
      FileSystemOperation::Read(path) => Some(path),
      FileSystemOperation::Stat(path) => Some(path),
      FileSystemOperation::ReadDir(path) => Some(path),
      FileSystemOperation::Write(path) => Some(path),
      FileSystemOperation::Cwd => None,
    }
  }
}

/// This is a FileSystem implementation that tracks reads and writes to a delegate filesystem
/// implementation.
///
/// Compilers that pull in partials on their own (Sass `@use`, `@import`) are handed one of these,
/// so every file they read can be reported back as a watch dependency.
pub struct TrackingFileSystem {
  delegate: FileSystemRef,
  operations: Mutex<Vec<FileSystemOperation>>,
}

impl std::fmt::Debug for TrackingFileSystem {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("TrackingFileSystem")
      .field("operations", &self.operations.lock().len())
      .finish()
  }
}

impl TrackingFileSystem {
  pub fn new(delegate: FileSystemRef) -> Self {
    Self {
      delegate,
      operations: Mutex::new(Vec::new()),
    }
  }

  /// Take all the recorded operations and clear the operations buffer.
  pub fn take_operations(&self) -> Vec<FileSystemOperation> {
    std::mem::take(&mut *self.operations.lock())
  }

  /// Paths of every successful or attempted file read, in the order they happened.
  pub fn read_paths(&self) -> Vec<PathBuf> {
    self
      .operations
      .lock()
      .iter()
      .filter_map(|operation| match operation {
        FileSystemOperation::Read(path) => Some(path.clone()),
        _ => None,
      })
      .collect()
  }

  fn record(&self, operation: FileSystemOperation) {
    self.operations.lock().push(operation);
  }
}

impl FileSystem for TrackingFileSystem {
  fn cwd(&self) -> std::io::Result<PathBuf> {
    self.record(FileSystemOperation::Cwd);
    self.delegate.cwd()
  }

  fn create_directory(&self, path: &Path) -> std::io::Result<()> {
    self.record(FileSystemOperation::Write(path.to_path_buf()));
    self.delegate.create_directory(path)
  }

  fn read(&self, path: &Path) -> std::io::Result<Vec<u8>> {
    self.record(FileSystemOperation::Read(path.to_path_buf()));
    self.delegate.read(path)
  }

  fn read_to_string(&self, path: &Path) -> std::io::Result<String> {
    self.record(FileSystemOperation::Read(path.to_path_buf()));
    self.delegate.read_to_string(path)
  }

  fn write(&self, path: &Path, contents: &[u8]) -> std::io::Result<()> {
    self.record(FileSystemOperation::Write(path.to_path_buf()));
    self.delegate.write(path, contents)
  }

  fn read_dir(&self, path: &Path) -> std::io::Result<Vec<PathBuf>> {
    self.record(FileSystemOperation::ReadDir(path.to_path_buf()));
    self.delegate.read_dir(path)
  }

  fn is_file(&self, path: &Path) -> bool {
    self.record(FileSystemOperation::Stat(path.to_path_buf()));
    self.delegate.is_file(path)
  }

  fn is_dir(&self, path: &Path) -> bool {
    self.record(FileSystemOperation::Stat(path.to_path_buf()));
    self.delegate.is_dir(path)
  }
}
