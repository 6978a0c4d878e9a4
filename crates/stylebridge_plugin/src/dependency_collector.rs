use std::io::ErrorKind;
use std::path::Path;
use std::path::PathBuf;

use anyhow::Context;
use stylebridge_filesystem::search::walk_files;
use stylebridge_filesystem::FileSystem;

use crate::transform_chain::Message;

const DEFAULT_DIR_GLOB: &str = "**/*";

/// Build the watch list for one stylesheet: the source itself, then what the preprocessor read,
/// then everything the transform chain reported
///
/// A reported directory that does not exist contributes no files.
pub fn collect_dependencies(
  fs: &dyn FileSystem,
  source_path: &Path,
  preprocessor_dependencies: &[PathBuf],
  messages: &[Message],
) -> anyhow::Result<Vec<PathBuf>> {
  let mut files = vec![source_path.to_path_buf()];
  files.extend(preprocessor_dependencies.iter().cloned());

  for message in messages {
    match message {
      Message::Dependency { file } => files.push(file.clone()),
      Message::DirDependency { dir, glob } => {
        let glob = glob.as_deref().unwrap_or(DEFAULT_DIR_GLOB);
        let entries = match walk_files(fs, dir) {
          Ok(entries) => entries,
          Err(err) if err.kind() == ErrorKind::NotFound => {
            tracing::debug!(dir = %dir.display(), "Directory dependency does not exist");
            Vec::new()
          }
          Err(err) => {
            return Err(err).with_context(|| format!("Failed to list {}", dir.display()));
          }
        };
        for file in entries {
          let Ok(relative) = file.strip_prefix(dir) else {
            continue;
          };
          let relative = relative.to_string_lossy().replace('\\', "/");
          if glob_match::glob_match(glob, &relative) {
            files.push(file);
          }
        }
      }
      Message::Warning { text } => {
        tracing::warn!(source = %source_path.display(), "{text}");
      }
      Message::Other { .. } => {}
    }
  }

  Ok(files)
}

#[cfg(test)]
mod tests {
  use stylebridge_filesystem::in_memory_file_system::InMemoryFileSystem;

  use super::*;

  #[test]
  fn source_comes_first() {
    let fs = InMemoryFileSystem::default();

    let files = collect_dependencies(
      &fs,
      Path::new("/app/a.scss"),
      &[PathBuf::from("/app/_vars.scss")],
      &[
        Message::Dependency {
          file: PathBuf::from("/app/b.css"),
        },
        Message::Warning {
          text: "ignored".into(),
        },
        Message::Other {
          kind: "custom".into(),
          text: "ignored".into(),
        },
      ],
    )
    .unwrap();

    assert_eq!(
      files,
      vec![
        PathBuf::from("/app/a.scss"),
        PathBuf::from("/app/_vars.scss"),
        PathBuf::from("/app/b.css"),
      ]
    );
  }

  #[test]
  fn directory_dependencies_are_expanded() {
    let fs = InMemoryFileSystem::default();
    fs.write_file("/app/tokens/colors.json", "{}");
    fs.write_file("/app/tokens/spacing/scale.json", "{}");
    fs.write_file("/app/tokens/README.md", "");

    let all = collect_dependencies(
      &fs,
      Path::new("/app/a.css"),
      &[],
      &[Message::DirDependency {
        dir: PathBuf::from("/app/tokens"),
        glob: None,
      }],
    )
    .unwrap();
    let json = collect_dependencies(
      &fs,
      Path::new("/app/a.css"),
      &[],
      &[Message::DirDependency {
        dir: PathBuf::from("/app/tokens"),
        glob: Some("**/*.json".into()),
      }],
    )
    .unwrap();

    assert_eq!(all.len(), 4);
    assert_eq!(
      json,
      vec![
        PathBuf::from("/app/a.css"),
        PathBuf::from("/app/tokens/colors.json"),
        PathBuf::from("/app/tokens/spacing/scale.json"),
      ]
    );
  }

  #[test]
  fn missing_directories_contribute_nothing() {
    let fs = InMemoryFileSystem::default();

    let files = collect_dependencies(
      &fs,
      Path::new("/app/a.css"),
      &[],
      &[
        Message::DirDependency {
          dir: PathBuf::from("/app/not-yet-created"),
          glob: None,
        },
        Message::Dependency {
          file: PathBuf::from("/app/b.css"),
        },
      ],
    )
    .unwrap();

    assert_eq!(
      files,
      vec![PathBuf::from("/app/a.css"), PathBuf::from("/app/b.css")]
    );
  }

  #[test]
  fn other_listing_errors_name_the_directory() {
    let fs = InMemoryFileSystem::default();
    fs.write_file("/app/tokens", "not a directory");

    let error = collect_dependencies(
      &fs,
      Path::new("/app/a.css"),
      &[],
      &[Message::DirDependency {
        dir: PathBuf::from("/app/tokens"),
        glob: None,
      }],
    )
    .unwrap_err();

    assert_eq!(error.to_string(), "Failed to list /app/tokens");
  }
}
