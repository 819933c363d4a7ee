use crate::host::{DevModuleGraph, StderrHmr};
use layoutgen_api::{BundlerPlugin, DevServer, ResolvedConfig};
use layoutgen_core::LayoutsPlugin;
use layoutgen_core::runtime::NotifyWatcher;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};

const MODULE_ID: &str = "virtual:generated-layouts";

pub async fn run(
    root: PathBuf,
    config: Option<PathBuf>,
    out: Option<PathBuf>,
) -> Result<(), Box<dyn std::error::Error>> {
    let options = crate::load_options(&root, config.as_deref())?;
    let mut plugin = LayoutsPlugin::new(options);
    plugin.config_resolved(&ResolvedConfig::new(root.clone()))?;

    let cancel_token = CancellationToken::new();
    let watcher = NotifyWatcher::start(cancel_token.clone())?;
    let (tx, mut invalidated) = mpsc::unbounded_channel();
    let graph = Arc::new(DevModuleGraph::new(tx));

    let server = DevServer {
        module_graph: graph.clone(),
        watcher,
        ws: Some(Arc::new(StderrHmr)),
    };
    plugin.configure_server(&server)?;

    let id = plugin
        .resolve_id(MODULE_ID)
        .ok_or("layouts module id did not resolve")?;
    emit(&plugin, &graph, &id, out.as_deref()).await?;

    if plugin.is_client_side() {
        info!("Client-side layouts resolve at compile time; nothing to watch.");
    } else {
        info!("Watching {} for layout changes.", root.display());
    }
    info!("Press Ctrl+C to stop.");

    let shutdown = tokio::signal::ctrl_c();
    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            _ = &mut shutdown => break,
            Some(module_id) = invalidated.recv() => {
                info!("{} invalidated, regenerating", module_id);
                if let Err(e) = emit(&plugin, &graph, &id, out.as_deref()).await {
                    error!("Failed to regenerate layouts module: {}", e);
                }
            }
        }
    }

    cancel_token.cancel();
    info!("Watcher stopped.");
    Ok(())
}

/// The module is marked loaded even when generation fails, so the next
/// relevant change triggers another attempt.
async fn emit(
    plugin: &LayoutsPlugin,
    graph: &DevModuleGraph,
    id: &str,
    out: Option<&Path>,
) -> Result<(), Box<dyn std::error::Error>> {
    let result = generate(plugin, id, out).await;
    graph.mark_loaded(id);
    result
}

async fn generate(
    plugin: &LayoutsPlugin,
    id: &str,
    out: Option<&Path>,
) -> Result<(), Box<dyn std::error::Error>> {
    let code = plugin
        .load(id)
        .await?
        .ok_or_else(|| format!("no module served for `{}`", id))?;
    crate::write_module(&code, out)?;
    Ok(())
}
