//! Collaborators a bundler host hands to plugins during dev-server setup.
//!
//! The host owns the module graph, the HMR socket and the file watcher. Plugins
//! only ever talk to them through these traits, so any bundler (or the
//! standalone dev host in `layoutgen-cli`) can drive the same plugin code.

use crate::ApiResult;
use crate::models::{HmrPayload, ModuleNode, WatchEvent};
use std::path::Path;
use std::sync::Arc;

/// Callback invoked for every watch event the host delivers.
pub type WatchListener = Arc<dyn Fn(&WatchEvent) + Send + Sync>;

pub trait ModuleGraph: Send + Sync {
    /// Look up a module that has already been loaded.
    fn get_module_by_id(&self, id: &str) -> Option<ModuleNode>;

    /// Drop the cached transform result so the next request reloads it.
    fn invalidate_module(&self, module: &ModuleNode);
}

pub trait HmrChannel: Send + Sync {
    fn send(&self, payload: HmrPayload);
}

pub trait FileWatcher: Send + Sync {
    /// Start watching an additional path (recursively for directories).
    fn add(&self, path: &Path) -> ApiResult<()>;

    /// Register a listener for `add`/`unlink`/`change` events.
    fn subscribe(&self, listener: WatchListener);
}

/// Handles available in `configure_server`.
#[derive(Clone)]
pub struct DevServer {
    pub module_graph: Arc<dyn ModuleGraph>,
    pub watcher: Arc<dyn FileWatcher>,
    /// Absent when the host runs without a client socket (e.g. middleware mode).
    pub ws: Option<Arc<dyn HmrChannel>>,
}
