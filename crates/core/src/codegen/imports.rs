use super::js_string;
use crate::options::ResolvedOptions;
use crate::project::{FileContainer, LayoutFile};
use layoutgen_api::ImportMode;
use tracing::debug;

/// Binding name for a layout. The container index keeps layouts with the same
/// name in different directories from clashing.
pub fn layout_identifier(container_index: usize, file: &LayoutFile) -> String {
    format!("__layout_{}_{}", container_index, file.identifier())
}

/// Emit one import per layout followed by the `layouts` lookup table.
///
/// When two containers define the same layout name the later one wins, since
/// a later key in an object literal overrides an earlier one.
pub fn get_import_code(containers: &[FileContainer], options: &ResolvedOptions) -> String {
    let mut head = Vec::new();
    let mut entries = Vec::new();

    for (index, container) in containers.iter().enumerate() {
        for file in &container.files {
            let ident = layout_identifier(index, file);
            let source = js_string(&file.import_path);
            let mode = options.import_mode_for(&file.name);
            debug!("Layout {} -> {} ({})", file.name, file.import_path, mode);

            head.push(match mode {
                ImportMode::Sync => format!("import {} from {};", ident, source),
                ImportMode::Async => format!("const {} = () => import({});", ident, source),
            });
            entries.push(format!("  {}: {},", js_string(&file.name), ident));
        }
    }

    let mut code = String::new();
    if !head.is_empty() {
        code.push_str(&head.join("\n"));
        code.push_str("\n\n");
    }
    code.push_str("export const layouts = {\n");
    for entry in entries {
        code.push_str(&entry);
        code.push('\n');
    }
    code.push_str("};\n");
    code
}
