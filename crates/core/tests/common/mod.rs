#![allow(dead_code)]

use layoutgen_api::{
    ApiResult, DevServer, FileWatcher, HmrChannel, HmrPayload, ModuleGraph, ModuleNode,
    WatchEvent, WatchListener,
};
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

pub fn touch(root: &Path, rel: &str) {
    let path = root.join(rel);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, "<template><slot /></template>").unwrap();
}

#[derive(Default)]
pub struct MockModuleGraph {
    pub loaded: Mutex<HashSet<String>>,
    pub invalidated: Mutex<Vec<String>>,
}

impl MockModuleGraph {
    pub fn with_loaded(id: &str) -> Self {
        let graph = Self::default();
        graph.loaded.lock().unwrap().insert(id.to_string());
        graph
    }

    pub fn invalidation_count(&self) -> usize {
        self.invalidated.lock().unwrap().len()
    }
}

impl ModuleGraph for MockModuleGraph {
    fn get_module_by_id(&self, id: &str) -> Option<ModuleNode> {
        self.loaded
            .lock()
            .unwrap()
            .contains(id)
            .then(|| ModuleNode::new(id))
    }

    fn invalidate_module(&self, module: &ModuleNode) {
        self.invalidated.lock().unwrap().push(module.id.clone());
    }
}

#[derive(Default)]
pub struct MockHmr {
    pub sent: Mutex<Vec<HmrPayload>>,
}

impl HmrChannel for MockHmr {
    fn send(&self, payload: HmrPayload) {
        self.sent.lock().unwrap().push(payload);
    }
}

/// Records watched paths and lets tests deliver events by hand.
#[derive(Default)]
pub struct MockWatcher {
    pub watched: Mutex<Vec<PathBuf>>,
    listeners: Mutex<Vec<WatchListener>>,
}

impl MockWatcher {
    pub fn emit(&self, event: WatchEvent) {
        let listeners = self.listeners.lock().unwrap().clone();
        for listener in listeners {
            listener(&event);
        }
    }
}

impl FileWatcher for MockWatcher {
    fn add(&self, path: &Path) -> ApiResult<()> {
        self.watched.lock().unwrap().push(path.to_path_buf());
        Ok(())
    }

    fn subscribe(&self, listener: WatchListener) {
        self.listeners.lock().unwrap().push(listener);
    }
}

pub struct MockServer {
    pub graph: Arc<MockModuleGraph>,
    pub hmr: Arc<MockHmr>,
    pub watcher: Arc<MockWatcher>,
}

impl MockServer {
    pub fn new(graph: MockModuleGraph) -> Self {
        Self {
            graph: Arc::new(graph),
            hmr: Arc::new(MockHmr::default()),
            watcher: Arc::new(MockWatcher::default()),
        }
    }

    pub fn dev_server(&self) -> DevServer {
        DevServer {
            module_graph: self.graph.clone(),
            watcher: self.watcher.clone(),
            ws: Some(self.hmr.clone()),
        }
    }
}
