//! Opt-in log output for hosts embedding the plugin.
//!
//! Nothing is installed unless `STYLEBRIDGE_LOG` is set. Its value is an `EnvFilter` directive,
//! a bare level such as `debug` only enables the stylebridge crates. Setting
//! `STYLEBRIDGE_LOG_DIR` writes daily rotated files there instead of standard error.
//!
//! [`StylesheetPlugin::new`](crate::StylesheetPlugin::new) calls [`init_from_env`], hosts that
//! configure logging themselves can call [`setup_tracing`] directly.
use std::path::PathBuf;
use std::sync::Mutex;

use anyhow::anyhow;
use anyhow::Context;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::EnvFilter;

pub const LOG_VAR: &str = "STYLEBRIDGE_LOG";
pub const LOG_DIR_VAR: &str = "STYLEBRIDGE_LOG_DIR";

const CRATES: [&str; 3] = [
  "stylebridge_core",
  "stylebridge_filesystem",
  "stylebridge_plugin",
];
const MAX_LOG_FILES: usize = 7;

static INSTALLED: Mutex<Option<TracingGuard>> = Mutex::new(None);

#[derive(Clone, Debug, PartialEq)]
pub enum LogOutput {
  Stderr,
  Directory { directory: PathBuf, max_files: usize },
}

#[derive(Clone, Debug, PartialEq)]
pub struct TracingOptions {
  pub directive: String,
  pub output: LogOutput,
}

impl TracingOptions {
  pub fn from_env() -> Option<Self> {
    Self::from_vars(std::env::var(LOG_VAR).ok(), std::env::var(LOG_DIR_VAR).ok())
  }

  fn from_vars(log: Option<String>, log_dir: Option<String>) -> Option<Self> {
    let directive = log.filter(|log| !log.trim().is_empty())?;
    let output = match log_dir.filter(|dir| !dir.is_empty()) {
      Some(directory) => LogOutput::Directory {
        directory: PathBuf::from(directory),
        max_files: MAX_LOG_FILES,
      },
      None => LogOutput::Stderr,
    };

    Some(Self { directive, output })
  }
}

/// Expand a bare level to one directive per stylebridge crate, anything else is kept as written
fn scoped_directive(directive: &str) -> String {
  let directive = directive.trim();
  if directive.parse::<LevelFilter>().is_err() {
    return directive.to_string();
  }

  CRATES
    .iter()
    .map(|name| format!("{name}={directive}"))
    .collect::<Vec<_>>()
    .join(",")
}

pub fn env_filter(directive: &str) -> anyhow::Result<EnvFilter> {
  EnvFilter::builder()
    .parse(scoped_directive(directive))
    .with_context(|| format!("Invalid {LOG_VAR} directive {directive:?}"))
}

/// Flushes file output until dropped
#[must_use]
pub struct TracingGuard {
  #[allow(unused)]
  worker_guard: Option<WorkerGuard>,
}

/// Install a global subscriber, fails when the host already installed one
pub fn setup_tracing(options: &TracingOptions) -> anyhow::Result<TracingGuard> {
  let filter = env_filter(&options.directive)?;

  let worker_guard = match &options.output {
    LogOutput::Stderr => {
      tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|err| anyhow!(err).context("Failed to install the stderr subscriber"))?;
      None
    }
    LogOutput::Directory {
      directory,
      max_files,
    } => {
      let appender = tracing_appender::rolling::Builder::new()
        .rotation(tracing_appender::rolling::Rotation::DAILY)
        .max_log_files(*max_files)
        .filename_prefix("stylebridge")
        .filename_suffix("log")
        .build(directory)
        .with_context(|| format!("Failed to open log directory {}", directory.display()))?;
      let (writer, worker_guard) = tracing_appender::non_blocking(appender);

      tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(writer)
        .with_ansi(false)
        .try_init()
        .map_err(|err| anyhow!(err).context("Failed to install the file subscriber"))?;
      Some(worker_guard)
    }
  };

  Ok(TracingGuard { worker_guard })
}

/// Install the subscriber described by the environment once per process.
///
/// Returns whether this call installed it.
pub fn init_from_env() -> anyhow::Result<bool> {
  let Some(options) = TracingOptions::from_env() else {
    return Ok(false);
  };

  let mut installed = INSTALLED
    .lock()
    .map_err(|_| anyhow!("Tracing setup panicked in another thread"))?;
  if installed.is_some() {
    return Ok(false);
  }

  *installed = Some(setup_tracing(&options)?);
  Ok(true)
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn nothing_is_installed_without_a_directive() {
    assert_eq!(TracingOptions::from_vars(None, Some("/tmp/logs".into())), None);
    assert_eq!(TracingOptions::from_vars(Some("  ".into()), None), None);
  }

  #[test]
  fn log_dir_selects_file_output() {
    assert_eq!(
      TracingOptions::from_vars(Some("debug".into()), None),
      Some(TracingOptions {
        directive: "debug".into(),
        output: LogOutput::Stderr,
      })
    );
    assert_eq!(
      TracingOptions::from_vars(Some("debug".into()), Some("/tmp/logs".into())),
      Some(TracingOptions {
        directive: "debug".into(),
        output: LogOutput::Directory {
          directory: PathBuf::from("/tmp/logs"),
          max_files: MAX_LOG_FILES,
        },
      })
    );
  }

  #[test]
  fn bare_levels_only_enable_stylebridge_crates() {
    assert_eq!(
      scoped_directive("debug"),
      "stylebridge_core=debug,stylebridge_filesystem=debug,stylebridge_plugin=debug"
    );
    assert_eq!(
      scoped_directive("stylebridge_plugin::path_resolver=trace,warn"),
      "stylebridge_plugin::path_resolver=trace,warn"
    );
  }

  #[test]
  fn invalid_directives_are_rejected() {
    assert!(env_filter("trace").is_ok());

    let error = env_filter("stylebridge_plugin=loud").unwrap_err();

    assert_eq!(
      error.to_string(),
      "Invalid STYLEBRIDGE_LOG directive \"stylebridge_plugin=loud\""
    );
  }

  #[test]
  fn file_output_only_keeps_stylebridge_events() {
    let dir = assert_fs::TempDir::new().unwrap();
    let guard = setup_tracing(&TracingOptions {
      directive: "info".into(),
      output: LogOutput::Directory {
        directory: dir.path().to_path_buf(),
        max_files: 2,
      },
    })
    .unwrap();

    tracing::info!(target: "stylebridge_plugin::stylesheet_plugin", "kept event");
    tracing::info!(target: "other_crate", "dropped event");
    drop(guard);

    let logs = std::fs::read_dir(dir.path())
      .unwrap()
      .map(|entry| std::fs::read_to_string(entry.unwrap().path()).unwrap())
      .collect::<String>();

    assert!(logs.contains("kept event"));
    assert!(!logs.contains("dropped event"));
  }
}
