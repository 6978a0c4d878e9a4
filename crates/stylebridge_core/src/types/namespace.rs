use std::fmt;

use serde::Deserialize;
use serde::Serialize;

/// The label a host bundler uses to route a resolved path to the right load hook
///
/// The host reports entry points with an empty namespace, which is treated as `File`.
#[derive(Default, Debug, Clone, PartialEq, Eq, Hash)]
pub enum Namespace {
  /// Regular files on disk, loaded by the host itself
  #[default]
  File,
  /// Virtual module exporting a CSS-Modules class map
  Module,
  /// Virtual module exporting the compiled CSS as a string
  InlineText,
  /// Any namespace owned by another plugin
  Other(String),
}

impl Namespace {
  pub fn as_str(&self) -> &str {
    match self {
      Namespace::File => "file",
      Namespace::Module => "stylebridge-module",
      Namespace::InlineText => "stylebridge-inline",
      Namespace::Other(name) => name.as_str(),
    }
  }

  pub fn from_name(name: &str) -> Self {
    match name {
      "" | "file" => Namespace::File,
      "stylebridge-module" => Namespace::Module,
      "stylebridge-inline" => Namespace::InlineText,
      other => Namespace::Other(other.to_string()),
    }
  }
}

impl fmt::Display for Namespace {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

impl Serialize for Namespace {
  fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
  where
    S: serde::Serializer,
  {
    self.as_str().serialize(serializer)
  }
}

impl<'de> Deserialize<'de> for Namespace {
  fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
  where
    D: serde::Deserializer<'de>,
  {
    let name: String = Deserialize::deserialize(deserializer)?;
    Ok(Self::from_name(&name))
  }
}
