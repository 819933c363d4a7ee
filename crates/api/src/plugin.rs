use crate::ApiResult;
use crate::host::DevServer;
use crate::models::{Enforce, ResolvedConfig};
use async_trait::async_trait;

/// Lifecycle hooks a bundler host invokes on a plugin.
///
/// Hooks are called in order: `config_resolved`, then `configure_server` (dev
/// only), then any number of `resolve_id`/`load` calls.
#[async_trait]
pub trait BundlerPlugin: Send + Sync {
    fn name(&self) -> &str;

    fn enforce(&self) -> Option<Enforce> {
        None
    }

    fn config_resolved(&mut self, _config: &ResolvedConfig) -> ApiResult<()> {
        Ok(())
    }

    fn configure_server(&mut self, _server: &DevServer) -> ApiResult<()> {
        Ok(())
    }

    /// Map an import specifier to the id this plugin serves, if any.
    fn resolve_id(&self, id: &str) -> Option<String>;

    /// Produce module source for an id returned by `resolve_id`.
    async fn load(&self, id: &str) -> ApiResult<Option<String>>;
}
