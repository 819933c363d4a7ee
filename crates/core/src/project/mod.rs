pub mod scanner;

use crate::util::{normalize_path, path_to_name, path_to_string};
use std::path::{Path, PathBuf};

/// A layout component discovered under a layouts directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LayoutFile {
    /// Path relative to the layouts dir without extension, e.g. `auth/login`.
    pub name: String,
    pub path: PathBuf,
    /// Specifier emitted in the generated `import`.
    pub import_path: String,
}

impl LayoutFile {
    pub fn new(layouts_dir: &Path, relative: &Path) -> Self {
        let stem = relative
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        let name = match relative.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => {
                format!("{}/{}", path_to_string(parent), stem)
            }
            _ => stem,
        };

        let path = layouts_dir.join(relative);
        let import_path = to_import_path(&path_to_string(&path));

        Self {
            name: normalize_path(&name),
            path,
            import_path,
        }
    }

    /// Identifier fragment for this layout's import binding.
    pub fn identifier(&self) -> String {
        path_to_name(&self.name)
    }
}

/// Layout files found under one resolved layouts directory, in discovery order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileContainer {
    pub path: String,
    pub files: Vec<LayoutFile>,
}

/// Drive-letter paths need a leading slash to stay root-absolute for the host.
fn to_import_path(path: &str) -> String {
    if path.starts_with('/') {
        path.to_string()
    } else {
        format!("/{}", path)
    }
}
