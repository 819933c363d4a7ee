use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// How a layout module is loaded by the generated code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImportMode {
    /// Static import, bundled with the entry chunk.
    Sync,
    /// Lazy `import()` thunk, loaded on demand.
    Async,
}

impl ImportMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ImportMode::Sync => "sync",
            ImportMode::Async => "async",
        }
    }

    pub fn is_sync(&self) -> bool {
        matches!(self, ImportMode::Sync)
    }
}

impl fmt::Display for ImportMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Ordering hint a plugin gives its host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Enforce {
    Pre,
    Post,
}

/// The part of the host's resolved configuration plugins get to see.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedConfig {
    /// Project root; relative directory specs resolve against it.
    pub root: PathBuf,
}

impl ResolvedConfig {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

/// A module the host has loaded and may invalidate.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ModuleNode {
    pub id: String,
}

impl ModuleNode {
    pub fn new(id: impl Into<String>) -> Self {
        Self { id: id.into() }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WatchEventKind {
    Add,
    Unlink,
    Change,
}

impl fmt::Display for WatchEventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            WatchEventKind::Add => "add",
            WatchEventKind::Unlink => "unlink",
            WatchEventKind::Change => "change",
        };
        f.write_str(s)
    }
}

/// A single file-system change delivered by the host watcher.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct WatchEvent {
    pub kind: WatchEventKind,
    pub path: PathBuf,
}

impl WatchEvent {
    pub fn new(kind: WatchEventKind, path: impl Into<PathBuf>) -> Self {
        Self {
            kind,
            path: path.into(),
        }
    }
}

/// Messages pushed to connected clients over the host's HMR socket.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum HmrPayload {
    FullReload { path: String },
}

impl HmrPayload {
    /// Reload every page, which is what a regenerated layout table requires.
    pub fn full_reload() -> Self {
        HmrPayload::FullReload {
            path: "*".to_string(),
        }
    }
}
