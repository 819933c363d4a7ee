use super::{ROUTE_HELPERS, js_string};
use crate::options::{DEFAULT_EXTENSION, DEFAULT_LAYOUT, DEFAULT_LAYOUTS_DIR};
use crate::util::normalize_path;
use layoutgen_api::ImportMode;

/// Static configuration for the scan-free module.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientSideOptions {
    pub layout_dir: String,
    pub default_layout: String,
    pub import_mode: ImportMode,
}

impl ClientSideOptions {
    pub fn new(layout_dir: Option<&str>, default_layout: Option<&str>, ssg: bool) -> Self {
        Self {
            layout_dir: layout_dir.unwrap_or(DEFAULT_LAYOUTS_DIR).to_string(),
            default_layout: default_layout.unwrap_or(DEFAULT_LAYOUT).to_string(),
            import_mode: if ssg { ImportMode::Sync } else { ImportMode::Async },
        }
    }
}

/// Emit a module that discovers layouts through `import.meta.glob` when the
/// host compiles it, instead of scanning the disk now.
///
/// The prefix is stripped by its JS length, which counts UTF-16 units.
pub fn create_virtual_module_code(options: &ClientSideOptions) -> String {
    let normalized = normalize_path(&options.layout_dir);
    let target = normalized
        .trim_start_matches("./")
        .trim_matches('/');
    let prefix = format!("/{}/", target);
    let glob = format!("{}**/*.{}", prefix, DEFAULT_EXTENSION);
    let eager = options.import_mode.is_sync();

    format!(
        r#"const DEFAULT_LAYOUT = {default_layout};

const LAYOUTS_PREFIX = {prefix};

const layouts = {{}};
const modules = import.meta.glob({glob}, {{ eager: {eager} }});
for (const [path, module] of Object.entries(modules)) {{
  const name = path.slice(LAYOUTS_PREFIX.length, -{ext_len});
  layouts[name] = {component};
}}
{helpers}"#,
        default_layout = js_string(&options.default_layout),
        glob = js_string(&glob),
        eager = eager,
        prefix = js_string(&prefix),
        ext_len = DEFAULT_EXTENSION.len() + 1,
        component = if eager { "module.default" } else { "module" },
        helpers = ROUTE_HELPERS,
    )
}
