use std::path::Path;

use lightningcss::rules::CssRule;
use lightningcss::stylesheet::StyleSheet;
use stylebridge_filesystem::path::resolve;

use super::{Message, StepContext, TransformStep};

/// Reports local `@import` targets as file dependencies so edits to them trigger a rebuild
#[derive(Debug, Default, Clone)]
pub struct ImportDependencies;

fn is_local(url: &str) -> bool {
  !(url.contains("://") || url.starts_with("//") || url.starts_with("data:"))
}

impl TransformStep for ImportDependencies {
  fn name(&self) -> &str {
    "import-dependencies"
  }

  fn process(
    &self,
    stylesheet: &mut StyleSheet<'_, '_>,
    ctx: &mut StepContext<'_>,
  ) -> anyhow::Result<()> {
    let base = ctx.from.parent().unwrap_or(ctx.from);

    for rule in &stylesheet.rules.0 {
      if let CssRule::Import(import) = rule {
        let url: &str = &import.url;
        if is_local(url) {
          ctx.messages.push(Message::Dependency {
            file: resolve(base, Path::new(url)),
          });
        }
      }
    }

    Ok(())
  }
}
