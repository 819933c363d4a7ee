use layoutgen_api::{BundlerPlugin, ResolvedConfig};
use layoutgen_core::LayoutsPlugin;
use std::path::PathBuf;
use tracing::info;

pub async fn run(
    root: PathBuf,
    config: Option<PathBuf>,
    out: Option<PathBuf>,
    id: String,
) -> Result<(), Box<dyn std::error::Error>> {
    let options = crate::load_options(&root, config.as_deref())?;
    let mut plugin = LayoutsPlugin::new(options);
    plugin.config_resolved(&ResolvedConfig::new(root.clone()))?;

    let resolved = plugin
        .resolve_id(&id)
        .ok_or_else(|| format!("`{}` is not a layouts module id", id))?;
    let code = plugin
        .load(&resolved)
        .await?
        .ok_or_else(|| format!("no module served for `{}`", resolved))?;

    crate::write_module(&code, out.as_deref())?;
    if let Some(out) = &out {
        info!("Wrote layouts module to {}", out.display());
    }
    Ok(())
}
