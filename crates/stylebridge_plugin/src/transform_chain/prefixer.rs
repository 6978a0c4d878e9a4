use anyhow::anyhow;
use lightningcss::stylesheet::{MinifyOptions, StyleSheet};
use lightningcss::targets::{Browsers, Targets};

use super::{StepContext, TransformStep};

/// Adds vendor prefixes and lowers syntax for a set of browsers
#[derive(Debug, Clone)]
pub struct Prefixer {
  browsers: Browsers,
}

impl Prefixer {
  pub fn new(browsers: Browsers) -> Self {
    Self { browsers }
  }

  /// Build from a browserslist query such as `"> 0.5%, last 2 versions"`
  pub fn from_query(query: &str) -> anyhow::Result<Self> {
    let browsers = Browsers::from_browserslist(query.split(',').map(str::trim))
      .map_err(|err| anyhow!("Invalid browserslist query {query:?}: {err}"))?
      .ok_or_else(|| anyhow!("Browserslist query {query:?} matched no browsers"))?;

    Ok(Self::new(browsers))
  }
}

impl TransformStep for Prefixer {
  fn name(&self) -> &str {
    "prefixer"
  }

  fn process(
    &self,
    stylesheet: &mut StyleSheet<'_, '_>,
    ctx: &mut StepContext<'_>,
  ) -> anyhow::Result<()> {
    let targets = Targets {
      browsers: Some(self.browsers),
      ..Targets::default()
    };

    stylesheet
      .minify(MinifyOptions {
        targets,
        ..MinifyOptions::default()
      })
      .map_err(|err| anyhow!("{err}"))?;
    ctx.targets = targets;

    Ok(())
  }
}

#[cfg(test)]
mod tests {
  use std::path::Path;
  use std::sync::Arc;

  use crate::transform_chain::{ChainInput, TransformChain};

  use super::*;

  #[test]
  fn prefixes_for_old_safari() {
    let chain = TransformChain::new(vec![Arc::new(Prefixer::from_query("safari 13").unwrap())]);

    let output = chain
      .run(ChainInput {
        css: ".a { user-select: none }",
        from: Path::new("/app/a.css"),
        to: Path::new("/tmp/a.css"),
        project_root: Path::new("/app"),
        css_modules: None,
      })
      .unwrap();

    assert!(output.css.contains("-webkit-user-select: none"));
  }

  #[test]
  fn rejects_queries_without_browsers() {
    assert!(Prefixer::from_query("not a browser").is_err());
  }
}
