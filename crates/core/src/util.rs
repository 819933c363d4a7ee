//! Path helpers shared by the scanner, the generators and the plugin shell.

use crate::error::Result;
use crate::options::DirSpec;
use ignore::WalkBuilder;
use ignore::overrides::OverrideBuilder;
use once_cell::sync::Lazy;
use regex::Regex;
use std::path::{Component, Path, PathBuf};
use tracing::debug;

static BRACKET_CHARS: Lazy<Regex> = Lazy::new(|| Regex::new(r"[\[:\]()]").unwrap());
static NON_IDENT_CHARS: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^\w$]").unwrap());

/// Directories never descended into while expanding directory globs.
const SKIPPED_DIRS: &[&str] = &["node_modules", ".git"];

/// Rewrite Windows separators to `/`.
pub fn normalize_path(path: &str) -> String {
    path.replace('\\', "/")
}

pub fn path_to_string(path: &Path) -> String {
    normalize_path(&path.to_string_lossy())
}

/// `["vue", "md"]` becomes `{vue,md}`, a single extension is returned as is.
pub fn extensions_to_glob(extensions: &[String]) -> String {
    match extensions {
        [] => String::new(),
        [single] => single.clone(),
        many => format!("{{{}}}", many.join(",")),
    }
}

/// Turn a relative path into a fragment usable inside a JS identifier.
///
/// Bracket characters used by dynamic route files (`[id]`, `(group)`) become
/// `$`. Any other character that cannot appear in an identifier (separators,
/// dots, dashes, spaces, `@`, `+`) becomes `_`. Distinct inputs may produce
/// the same name; callers own collision handling.
pub fn path_to_name(path: &str) -> String {
    let name = BRACKET_CHARS.replace_all(path, "$");
    NON_IDENT_CHARS.replace_all(&name, "_").into_owned()
}

/// Lexically resolve `dir` against `root`, the way `path.resolve` does:
/// absolute specs win, `.` and `..` are folded without touching the disk.
pub fn resolve_path(root: &Path, dir: &str) -> PathBuf {
    let joined = root.join(dir);
    let mut resolved = PathBuf::new();
    for component in joined.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                resolved.pop();
            }
            other => resolved.push(other.as_os_str()),
        }
    }
    resolved
}

/// Resolve directory specs to absolute, normalized paths.
///
/// Specs containing `**` are expanded against the file system and every
/// matching directory is kept, in walk order.
pub fn resolve_dirs(dirs: Option<&DirSpec>, root: &Path) -> Result<Vec<String>> {
    let Some(dirs) = dirs else {
        return Ok(Vec::new());
    };

    let root = if root.is_absolute() {
        root.to_path_buf()
    } else {
        std::env::current_dir()?.join(root)
    };

    let mut resolved = Vec::new();
    for dir in dirs.iter() {
        if dir.contains("**") {
            let matches = expand_dir_glob(dir, &root)?;
            debug!("Expanded {} to {} directories", dir, matches.len());
            resolved.extend(matches.iter().map(|m| path_to_string(m)));
        } else {
            resolved.push(path_to_string(&resolve_path(&root, dir)));
        }
    }

    Ok(resolved)
}

/// Split `src/**/layouts` into the literal base `src` and the glob `**/layouts`.
fn split_glob_base(pattern: &str) -> (String, String) {
    let pattern = normalize_path(pattern);
    let is_magic = |segment: &str| segment.contains(['*', '?', '[', '{']);

    let segments: Vec<&str> = pattern.split('/').collect();
    let split_at = segments
        .iter()
        .position(|&s| is_magic(s))
        .unwrap_or(segments.len());

    let mut base = segments[..split_at].join("/");
    if base.is_empty() && pattern.starts_with('/') {
        base.push('/');
    }
    (base, segments[split_at..].join("/"))
}

fn expand_dir_glob(pattern: &str, root: &Path) -> Result<Vec<PathBuf>> {
    let (base, glob) = split_glob_base(pattern);
    let walk_root = resolve_path(root, &base);
    if !walk_root.is_dir() {
        return Ok(Vec::new());
    }

    let mut builder = OverrideBuilder::new(&walk_root);
    builder.add(&glob)?;
    let matcher = builder.build()?;

    let matches = WalkBuilder::new(&walk_root)
        .standard_filters(false)
        .hidden(true)
        .filter_entry(|entry| {
            entry
                .file_name()
                .to_str()
                .map_or(true, |name| !SKIPPED_DIRS.contains(&name))
        })
        .sort_by_file_name(|a, b| a.cmp(b))
        .build()
        .filter_map(|entry| {
            let entry = entry.ok()?;
            if entry.depth() == 0 || !entry.file_type()?.is_dir() {
                return None;
            }
            matcher
                .matched(entry.path(), true)
                .is_whitelist()
                .then(|| entry.into_path())
        })
        .collect();

    Ok(matches)
}
