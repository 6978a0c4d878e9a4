use std::collections::BTreeMap;
use std::path::Path;
use std::path::PathBuf;

use parking_lot::RwLock;

use crate::path::resolve;
use crate::FileSystem;

/// In memory implementation of a file-system entry
#[derive(Debug)]
enum InMemoryFileSystemEntry {
  File { contents: Vec<u8> },
  Directory,
}

/// In memory implementation of the `FileSystem` trait, for testing purposes.
///
/// Writing a file creates its parent directories, so fixtures only need to list files.
#[derive(Debug)]
pub struct InMemoryFileSystem {
  files: RwLock<BTreeMap<PathBuf, InMemoryFileSystemEntry>>,
  current_working_directory: RwLock<PathBuf>,
}

impl InMemoryFileSystem {
  /// Change the current working directory. Used for resolving relative paths.
  pub fn set_current_working_directory(&self, cwd: PathBuf) {
    *self.current_working_directory.write() = cwd;
  }

  /// Write a file at path.
  pub fn write_file(&self, path: impl AsRef<Path>, contents: impl Into<String>) {
    let contents: String = contents.into();
    let path = self.absolute(path.as_ref());
    let mut files = self.files.write();

    insert_ancestors(&mut files, &path);
    files.insert(
      path,
      InMemoryFileSystemEntry::File {
        contents: contents.into_bytes(),
      },
    );
  }

  /// All file paths currently stored, in sorted order.
  pub fn files(&self) -> Vec<PathBuf> {
    self
      .files
      .read()
      .iter()
      .filter(|(_, entry)| matches!(entry, InMemoryFileSystemEntry::File { .. }))
      .map(|(path, _)| path.clone())
      .collect()
  }

  fn absolute(&self, path: &Path) -> PathBuf {
    resolve(&self.current_working_directory.read(), path)
  }
}

fn insert_ancestors(files: &mut BTreeMap<PathBuf, InMemoryFileSystemEntry>, path: &Path) {
  for ancestor in path.ancestors().skip(1) {
    if ancestor.as_os_str().is_empty() {
      break;
    }
    files
      .entry(ancestor.to_path_buf())
      .or_insert(InMemoryFileSystemEntry::Directory);
  }
}

impl Default for InMemoryFileSystem {
  fn default() -> Self {
    Self {
      files: Default::default(),
      current_working_directory: RwLock::new(PathBuf::from("/")),
    }
  }
}

impl FileSystem for InMemoryFileSystem {
  fn cwd(&self) -> std::io::Result<PathBuf> {
    Ok(self.current_working_directory.read().clone())
  }

  fn create_directory(&self, path: &Path) -> std::io::Result<()> {
    let path = self.absolute(path);
    let mut files = self.files.write();

    if let Some(InMemoryFileSystemEntry::File { .. }) = files.get(&path) {
      return Err(std::io::Error::new(
        std::io::ErrorKind::AlreadyExists,
        "Path is a file",
      ));
    }

    insert_ancestors(&mut files, &path);
    files.insert(path, InMemoryFileSystemEntry::Directory);
    Ok(())
  }

  fn read(&self, path: &Path) -> std::io::Result<Vec<u8>> {
    let path = self.absolute(path);
    let files = self.files.read();
    files.get(&path).map_or_else(
      || {
        Err(std::io::Error::new(
          std::io::ErrorKind::NotFound,
          "File not found",
        ))
      },
      |entry| match entry {
        InMemoryFileSystemEntry::File { contents } => Ok(contents.clone()),
        InMemoryFileSystemEntry::Directory => Err(std::io::Error::new(
          std::io::ErrorKind::InvalidInput,
          "Path is a directory",
        )),
      },
    )
  }

  fn write(&self, path: &Path, contents: &[u8]) -> std::io::Result<()> {
    let path = self.absolute(path);
    let mut files = self.files.write();

    let parent_exists = path
      .parent()
      .map(|parent| matches!(files.get(parent), Some(InMemoryFileSystemEntry::Directory)))
      .unwrap_or(false);
    if !parent_exists {
      return Err(std::io::Error::new(
        std::io::ErrorKind::NotFound,
        "Parent directory not found",
      ));
    }

    files.insert(
      path,
      InMemoryFileSystemEntry::File {
        contents: contents.to_vec(),
      },
    );
    Ok(())
  }

  fn read_dir(&self, path: &Path) -> std::io::Result<Vec<PathBuf>> {
    let path = self.absolute(path);
    let files = self.files.read();

    match files.get(&path) {
      Some(InMemoryFileSystemEntry::Directory) => {}
      Some(InMemoryFileSystemEntry::File { .. }) => {
        return Err(std::io::Error::new(
          std::io::ErrorKind::InvalidInput,
          "Not a directory",
        ));
      }
      None => {
        return Err(std::io::Error::new(
          std::io::ErrorKind::NotFound,
          "Directory not found",
        ));
      }
    }

    Ok(
      files
        .keys()
        .filter(|entry| entry.parent() == Some(path.as_path()))
        .cloned()
        .collect(),
    )
  }

  fn is_file(&self, path: &Path) -> bool {
    let files = self.files.read();
    let file = files.get(&self.absolute(path));
    matches!(file, Some(InMemoryFileSystemEntry::File { .. }))
  }

  fn is_dir(&self, path: &Path) -> bool {
    let files = self.files.read();
    let file = files.get(&self.absolute(path));
    matches!(file, Some(InMemoryFileSystemEntry::Directory))
  }
}
