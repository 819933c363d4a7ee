use super::MODULE_ID_VIRTUAL;
use crate::util::path_to_string;
use layoutgen_api::{HmrChannel, HmrPayload, ModuleGraph, WatchEvent};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::debug;

/// Does a change at `path` affect the generated layouts module?
///
/// With no page directories configured every change counts.
pub fn is_relevant_change(path: &Path, layout_dirs: &[PathBuf], pages_dirs: &[PathBuf]) -> bool {
    let path = PathBuf::from(path_to_string(path));
    pages_dirs.is_empty()
        || pages_dirs.iter().any(|dir| path.starts_with(dir))
        || layout_dirs.iter().any(|dir| path.starts_with(dir))
}

/// Invalidates the virtual module and asks clients to reload on relevant changes.
pub struct ReloadHandler {
    layout_dirs: Arc<[PathBuf]>,
    pages_dirs: Arc<[PathBuf]>,
    module_graph: Arc<dyn ModuleGraph>,
    ws: Option<Arc<dyn HmrChannel>>,
}

impl ReloadHandler {
    pub fn new(
        layout_dirs: Arc<[PathBuf]>,
        pages_dirs: Arc<[PathBuf]>,
        module_graph: Arc<dyn ModuleGraph>,
        ws: Option<Arc<dyn HmrChannel>>,
    ) -> Self {
        Self {
            layout_dirs,
            pages_dirs,
            module_graph,
            ws,
        }
    }

    /// Returns true when the module was invalidated.
    pub fn handle(&self, event: &WatchEvent) -> bool {
        if !is_relevant_change(&event.path, &self.layout_dirs, &self.pages_dirs) {
            return false;
        }

        debug!("reload ({}) {}", event.kind, event.path.display());
        // Nothing to invalidate until the host has loaded the module once
        let Some(module) = self.module_graph.get_module_by_id(MODULE_ID_VIRTUAL) else {
            return false;
        };

        self.module_graph.invalidate_module(&module);
        if let Some(ws) = &self.ws {
            ws.send(HmrPayload::full_reload());
        }
        true
    }
}
