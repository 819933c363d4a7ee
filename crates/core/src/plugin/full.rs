use super::reload::ReloadHandler;
use super::{MODULE_ID_VIRTUAL, MODULE_IDS};
use crate::codegen::{get_client_code, get_import_code};
use crate::error::Result;
use crate::options::ResolvedOptions;
use crate::project::FileContainer;
use crate::project::scanner::get_files_from_path;
use crate::util::{path_to_string, resolve_dirs};
use layoutgen_api::{DevServer, ResolvedConfig};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{debug, info, trace, warn};

/// Scans layout directories on every load and reloads on file changes.
#[derive(Debug)]
pub struct FullMode {
    options: ResolvedOptions,
    root: PathBuf,
    layout_dirs: Arc<[PathBuf]>,
    pages_dirs: Arc<[PathBuf]>,
}

impl FullMode {
    pub fn new(options: ResolvedOptions) -> Self {
        Self {
            options,
            root: PathBuf::from("."),
            layout_dirs: Arc::from(Vec::new()),
            pages_dirs: Arc::from(Vec::new()),
        }
    }

    pub fn options(&self) -> &ResolvedOptions {
        &self.options
    }

    pub fn layout_dirs(&self) -> &[PathBuf] {
        &self.layout_dirs
    }

    pub fn pages_dirs(&self) -> &[PathBuf] {
        &self.pages_dirs
    }

    /// Resolve layout and page directories against the project root. Every
    /// directory a glob expands to is kept.
    pub fn config_resolved(&mut self, config: &ResolvedConfig) -> Result<()> {
        self.root = config.root.clone();

        let to_paths = |dirs: Vec<String>| -> Arc<[PathBuf]> {
            dirs.into_iter().map(PathBuf::from).collect()
        };
        self.layout_dirs = to_paths(resolve_dirs(Some(&self.options.layouts_dirs), &self.root)?);
        self.pages_dirs = to_paths(resolve_dirs(Some(&self.options.pages_dirs), &self.root)?);

        info!(
            "Resolved {} layout dirs and {} page dirs under {}",
            self.layout_dirs.len(),
            self.pages_dirs.len(),
            self.root.display()
        );
        Ok(())
    }

    /// Watch resolved directories and subscribe the reload handler.
    pub fn configure_server(&self, server: &DevServer) {
        for dir in self.layout_dirs.iter().chain(self.pages_dirs.iter()) {
            if let Err(e) = server.watcher.add(dir) {
                warn!("Failed to watch {}: {}", dir.display(), e);
            }
        }

        let handler = ReloadHandler::new(
            self.layout_dirs.clone(),
            self.pages_dirs.clone(),
            server.module_graph.clone(),
            server.ws.clone(),
        );
        server.watcher.subscribe(Arc::new(move |event| {
            handler.handle(event);
        }));
    }

    pub fn resolve_id(&self, id: &str) -> Option<String> {
        MODULE_IDS
            .iter()
            .any(|module_id| id.starts_with(module_id))
            .then(|| MODULE_ID_VIRTUAL.to_string())
    }

    /// Scan and generate from the current file-system state. Nothing is cached.
    pub async fn load(&self, id: &str) -> Result<Option<String>> {
        if id != MODULE_ID_VIRTUAL {
            return Ok(None);
        }

        let mut containers = Vec::with_capacity(self.layout_dirs.len());
        // Resolved dirs are always absolute
        for layouts_dir in self.layout_dirs.iter() {
            debug!("Loading layout dir: {}", layouts_dir.display());

            let files = get_files_from_path(layouts_dir, &self.options).await?;
            containers.push(FileContainer {
                path: path_to_string(layouts_dir),
                files,
            });
        }

        let import_code = get_import_code(&containers, &self.options);
        let client_code = get_client_code(&import_code, &self.options);
        trace!("Client code:\n{}", client_code);
        Ok(Some(client_code))
    }
}
