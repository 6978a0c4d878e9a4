use std::fmt::Debug;

use async_trait::async_trait;
use regex::Regex;

use crate::types::LoadArgs;
use crate::types::Namespace;
use crate::types::OnLoadResult;
use crate::types::OnResolveResult;
use crate::types::ResolveArgs;

/// Decides which paths a hook is invoked for
#[derive(Clone, Debug)]
pub struct HookFilter {
  pub filter: Regex,
  /// Only match paths in this namespace, any namespace when `None`
  pub namespace: Option<Namespace>,
}

impl HookFilter {
  pub fn new(filter: Regex, namespace: Option<Namespace>) -> Self {
    Self { filter, namespace }
  }

  pub fn matches(&self, path: &str, namespace: &Namespace) -> bool {
    let namespace_matches = self
      .namespace
      .as_ref()
      .map_or(true, |expected| expected == namespace);

    namespace_matches && self.filter.is_match(path)
  }
}

/// A plugin registered into a host bundler's resolve and load hooks
///
/// Returning `Ok(None)` from either hook means the plugin does not handle the path and the host
/// moves on to the next plugin or its own default behaviour.
#[async_trait]
pub trait BundlerPlugin: Debug + Send + Sync {
  fn name(&self) -> &str;

  /// Which import specifiers `resolve` is called for
  fn resolve_filter(&self) -> HookFilter;

  /// Which resolved paths `load` is called for
  fn load_filters(&self) -> Vec<HookFilter>;

  async fn resolve(&self, args: ResolveArgs) -> anyhow::Result<Option<OnResolveResult>>;

  async fn load(&self, args: LoadArgs) -> anyhow::Result<Option<OnLoadResult>>;
}
