use std::path::Path;
use std::process::Stdio;

use tokio::io::AsyncWriteExt;
use tokio::process::Command;

use super::PreprocessError;

/// Run a compiler executable, feeding `stdin` and returning its stdout as CSS.
///
/// A command that cannot be spawned because it does not exist is reported as a missing compiler,
/// a non-zero exit as a compile error carrying stderr.
pub(crate) async fn run_compiler(
  command: &str,
  args: &[String],
  stdin: &[u8],
  path: &Path,
) -> Result<String, PreprocessError> {
  tracing::debug!(command, ?args, "Spawning compiler");

  let mut child = Command::new(command)
    .args(args)
    .stdin(Stdio::piped())
    .stdout(Stdio::piped())
    .stderr(Stdio::piped())
    .kill_on_drop(true)
    .spawn()
    .map_err(|source| match source.kind() {
      std::io::ErrorKind::NotFound => PreprocessError::MissingCompiler {
        command: command.to_string(),
        source,
      },
      _ => PreprocessError::Io {
        command: command.to_string(),
        source,
      },
    })?;

  // Feed stdin while stdout is drained, large inputs would otherwise fill the pipe
  let mut child_stdin = child.stdin.take();
  let input = stdin.to_vec();
  let writer = tokio::spawn(async move {
    if let Some(child_stdin) = child_stdin.as_mut() {
      child_stdin.write_all(&input).await?;
      child_stdin.shutdown().await?;
    }
    Ok::<_, std::io::Error>(())
  });

  let output = child
    .wait_with_output()
    .await
    .map_err(|source| PreprocessError::Io {
      command: command.to_string(),
      source,
    })?;

  if !output.status.success() {
    let stderr = String::from_utf8_lossy(&output.stderr);
    let stdout = String::from_utf8_lossy(&output.stdout);
    let message = if stderr.trim().is_empty() {
      stdout.trim().to_string()
    } else {
      stderr.trim().to_string()
    };

    return Err(PreprocessError::Compile {
      path: path.to_path_buf(),
      message: format!("`{command}` exited with {}: {message}", output.status),
    });
  }

  match writer.await {
    Ok(Ok(())) => {}
    // The compiler succeeded without reading all of its input
    Ok(Err(err)) if err.kind() == std::io::ErrorKind::BrokenPipe => {
      tracing::debug!(command, "Compiler closed stdin early");
    }
    Ok(Err(source)) => {
      return Err(PreprocessError::Io {
        command: command.to_string(),
        source,
      })
    }
    Err(err) => {
      return Err(PreprocessError::Io {
        command: command.to_string(),
        source: std::io::Error::new(std::io::ErrorKind::Other, err),
      })
    }
  }

  String::from_utf8(output.stdout).map_err(|err| PreprocessError::Compile {
    path: path.to_path_buf(),
    message: format!("`{command}` produced invalid UTF-8: {err}"),
  })
}

#[cfg(test)]
mod tests {
  use super::*;

  #[tokio::test]
  async fn missing_executables_are_reported_as_missing_compilers() {
    let error = run_compiler(
      "stylebridge-test-compiler-that-does-not-exist",
      &[],
      b".a{}",
      Path::new("/app/a.less"),
    )
    .await
    .unwrap_err();

    assert!(matches!(
      error,
      PreprocessError::MissingCompiler { ref command, .. }
        if command == "stylebridge-test-compiler-that-does-not-exist"
    ));
  }

  #[cfg(unix)]
  #[tokio::test]
  async fn stdout_of_a_successful_run_is_returned() {
    let css = run_compiler("cat", &[], b".a { color: red; }", Path::new("/app/a.less"))
      .await
      .unwrap();

    assert_eq!(css, ".a { color: red; }");
  }

  #[cfg(unix)]
  #[tokio::test]
  async fn compilers_that_ignore_stdin_still_succeed() {
    let stdin = vec![b'a'; 1024 * 1024];

    let css = run_compiler(
      "sh",
      &["-c".to_string(), "printf '.a{}'".to_string()],
      &stdin,
      Path::new("/app/a.less"),
    )
    .await
    .unwrap();

    assert_eq!(css, ".a{}");
  }

  #[cfg(unix)]
  #[tokio::test]
  async fn failing_runs_are_compile_errors() {
    let error = run_compiler(
      "sh",
      &["-c".to_string(), "echo 'missing partial' >&2; exit 1".to_string()],
      b"",
      Path::new("/app/a.less"),
    )
    .await
    .unwrap_err();

    match error {
      PreprocessError::Compile { path, message } => {
        assert_eq!(path, Path::new("/app/a.less"));
        assert!(message.contains("missing partial"));
      }
      other => panic!("unexpected error {other:?}"),
    }
  }
}
