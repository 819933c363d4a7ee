//! User-facing configuration and its fully-defaulted form.

use crate::error::Result;
use indexmap::IndexMap;
use layoutgen_api::ImportMode;
use serde::{Deserialize, Deserializer};
use std::fmt;
use std::path::Path;
use std::sync::Arc;

pub const DEFAULT_LAYOUT: &str = "default";
pub const DEFAULT_LAYOUTS_DIR: &str = "src/layouts";
pub const DEFAULT_PAGES_DIR: &str = "src/pages";
pub const DEFAULT_EXTENSION: &str = "vue";

/// Set by static-site generators; every layout must then be importable eagerly.
pub const SSG_ENV_VAR: &str = "VITE_SSG";

pub fn ssg_from_env() -> bool {
    std::env::var_os(SSG_ENV_VAR).is_some_and(|v| !v.is_empty())
}

/// One directory, or several. Entries may be globs such as `src/**/layouts`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum DirSpec {
    Single(String),
    Many(Vec<String>),
}

impl DirSpec {
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        let dirs: &[String] = match self {
            DirSpec::Single(dir) => std::slice::from_ref(dir),
            DirSpec::Many(dirs) => dirs,
        };
        dirs.iter().map(String::as_str)
    }

    pub fn is_many(&self) -> bool {
        matches!(self, DirSpec::Many(_))
    }

    pub fn has_glob(&self) -> bool {
        self.iter().any(|dir| dir.contains('*'))
    }
}

impl From<&str> for DirSpec {
    fn from(dir: &str) -> Self {
        DirSpec::Single(dir.to_string())
    }
}

impl From<Vec<&str>> for DirSpec {
    fn from(dirs: Vec<&str>) -> Self {
        DirSpec::Many(dirs.into_iter().map(String::from).collect())
    }
}

/// Picks sync or async loading for a layout by name.
#[derive(Clone)]
pub struct ImportModeFn(Arc<dyn Fn(&str) -> ImportMode + Send + Sync>);

impl ImportModeFn {
    pub fn new(f: impl Fn(&str) -> ImportMode + Send + Sync + 'static) -> Self {
        Self(Arc::new(f))
    }

    /// Only `default_layout` is bundled eagerly.
    pub fn default_for(default_layout: &str) -> Self {
        let default_layout = default_layout.to_string();
        Self::new(move |name| {
            if name == default_layout {
                ImportMode::Sync
            } else {
                ImportMode::Async
            }
        })
    }

    pub fn mode(&self, name: &str) -> ImportMode {
        (self.0)(name)
    }
}

impl fmt::Debug for ImportModeFn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ImportModeFn(..)")
    }
}

/// Declarative form of `importMode` accepted in config files.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
enum ImportModeConfig {
    Uniform(ImportMode),
    PerLayout(IndexMap<String, ImportMode>),
}

impl<'de> Deserialize<'de> for ImportModeFn {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        Ok(match ImportModeConfig::deserialize(deserializer)? {
            ImportModeConfig::Uniform(mode) => ImportModeFn::new(move |_| mode),
            // Unlisted layouts keep the stock rule for the stock default name
            ImportModeConfig::PerLayout(table) => {
                let fallback = ImportModeFn::default_for(DEFAULT_LAYOUT);
                ImportModeFn::new(move |name| {
                    table
                        .get(name)
                        .copied()
                        .unwrap_or_else(|| fallback.mode(name))
                })
            }
        })
    }
}

/// Options as the user wrote them. `None` means "not given", which matters for
/// mode selection, not only for defaulting.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct UserOptions {
    pub default_layout: Option<String>,
    #[serde(alias = "layoutDirs", alias = "layoutDir")]
    pub layouts_dirs: Option<DirSpec>,
    /// `Many(vec![])` disables page-directory filtering of watch events.
    pub pages_dirs: Option<DirSpec>,
    pub extensions: Option<Vec<String>>,
    pub exclude: Option<Vec<String>>,
    pub import_mode: Option<ImportModeFn>,
}

impl UserOptions {
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    pub fn with_default_layout(mut self, name: impl Into<String>) -> Self {
        self.default_layout = Some(name.into());
        self
    }

    pub fn with_layouts_dirs(mut self, dirs: impl Into<DirSpec>) -> Self {
        self.layouts_dirs = Some(dirs.into());
        self
    }

    pub fn with_pages_dirs(mut self, dirs: impl Into<DirSpec>) -> Self {
        self.pages_dirs = Some(dirs.into());
        self
    }

    pub fn with_extensions(mut self, extensions: &[&str]) -> Self {
        self.extensions = Some(extensions.iter().map(|e| e.to_string()).collect());
        self
    }

    pub fn with_exclude(mut self, patterns: &[&str]) -> Self {
        self.exclude = Some(patterns.iter().map(|p| p.to_string()).collect());
        self
    }

    pub fn with_import_mode(
        mut self,
        f: impl Fn(&str) -> ImportMode + Send + Sync + 'static,
    ) -> Self {
        self.import_mode = Some(ImportModeFn::new(f));
        self
    }

    /// True when only `layouts_dirs` and `default_layout` were given and the
    /// layouts dir is a single plain path. Such setups can skip scanning.
    pub fn is_client_side_compatible(&self) -> bool {
        let customized = self.pages_dirs.is_some()
            || self.extensions.is_some()
            || self.exclude.is_some()
            || self.import_mode.is_some();
        if customized {
            return false;
        }

        match &self.layouts_dirs {
            Some(dirs) => !dirs.is_many() && !dirs.has_glob(),
            None => true,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ResolvedOptions {
    pub default_layout: String,
    pub layouts_dirs: DirSpec,
    pub pages_dirs: DirSpec,
    pub extensions: Vec<String>,
    pub exclude: Vec<String>,
    pub import_mode: ImportModeFn,
    /// Static-site build: every layout is imported synchronously.
    pub ssg: bool,
}

impl ResolvedOptions {
    /// Merge over defaults, reading the SSG flag from the environment once.
    pub fn resolve(user: UserOptions) -> Self {
        Self::resolve_with_ssg(user, ssg_from_env())
    }

    pub fn resolve_with_ssg(user: UserOptions, ssg: bool) -> Self {
        let default_layout = user
            .default_layout
            .unwrap_or_else(|| DEFAULT_LAYOUT.to_string());
        let import_mode = user
            .import_mode
            .unwrap_or_else(|| ImportModeFn::default_for(&default_layout));

        Self {
            layouts_dirs: user
                .layouts_dirs
                .unwrap_or_else(|| DirSpec::from(DEFAULT_LAYOUTS_DIR)),
            pages_dirs: user
                .pages_dirs
                .unwrap_or_else(|| DirSpec::from(DEFAULT_PAGES_DIR)),
            extensions: user
                .extensions
                .unwrap_or_else(|| vec![DEFAULT_EXTENSION.to_string()]),
            exclude: user.exclude.unwrap_or_default(),
            import_mode,
            default_layout,
            ssg,
        }
    }

    /// Effective import mode; the SSG flag overrides the configured selector.
    pub fn import_mode_for(&self, name: &str) -> ImportMode {
        if self.ssg {
            ImportMode::Sync
        } else {
            self.import_mode.mode(name)
        }
    }
}
