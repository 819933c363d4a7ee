//! Minimal dev host used by `layoutgen watch`: just enough module graph and
//! HMR plumbing to drive the plugin outside a bundler.

use dashmap::DashSet;
use layoutgen_api::{HmrChannel, HmrPayload, ModuleGraph, ModuleNode};
use tokio::sync::mpsc;

pub struct DevModuleGraph {
    loaded: DashSet<String>,
    invalidated: mpsc::UnboundedSender<String>,
}

impl DevModuleGraph {
    pub fn new(invalidated: mpsc::UnboundedSender<String>) -> Self {
        Self {
            loaded: DashSet::new(),
            invalidated,
        }
    }

    pub fn mark_loaded(&self, id: &str) {
        self.loaded.insert(id.to_string());
    }
}

impl ModuleGraph for DevModuleGraph {
    fn get_module_by_id(&self, id: &str) -> Option<ModuleNode> {
        self.loaded.contains(id).then(|| ModuleNode::new(id))
    }

    fn invalidate_module(&self, module: &ModuleNode) {
        // Stays unloaded until regenerated, so bursts collapse into one rebuild
        if self.loaded.remove(&module.id).is_some() {
            let _ = self.invalidated.send(module.id.clone());
        }
    }
}

/// Prints HMR payloads as JSON lines on stderr.
pub struct StderrHmr;

impl HmrChannel for StderrHmr {
    fn send(&self, payload: HmrPayload) {
        match serde_json::to_string(&payload) {
            Ok(line) => eprintln!("{}", line),
            Err(e) => tracing::warn!("Failed to encode HMR payload: {}", e),
        }
    }
}
