use super::LayoutFile;
use crate::error::Result;
use crate::options::ResolvedOptions;
use crate::util::extensions_to_glob;
use ignore::WalkBuilder;
use ignore::overrides::{Override, OverrideBuilder};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Always skipped, in addition to the user's `exclude` globs. Dotfiles are
/// listed explicitly since override whitelists bypass the walker's hidden filter.
pub const DEFAULT_IGNORES: &[&str] = &["node_modules", ".*", "**/__*__/*"];

/// Scan one layouts directory without blocking the async runtime.
///
/// A directory that does not exist contributes no layouts.
pub async fn get_files_from_path(dir: &Path, options: &ResolvedOptions) -> Result<Vec<LayoutFile>> {
    let dir = dir.to_path_buf();
    let extensions = options.extensions.clone();
    let exclude = options.exclude.clone();

    tokio::task::spawn_blocking(move || Scanner::collect_layouts(&dir, &extensions, &exclude))
        .await?
}

pub struct Scanner;

impl Scanner {
    pub fn collect_layouts(
        dir: &Path,
        extensions: &[String],
        exclude: &[String],
    ) -> Result<Vec<LayoutFile>> {
        if !dir.is_dir() {
            debug!("Layouts dir {} does not exist, skipping", dir.display());
            return Ok(Vec::new());
        }

        let Some(overrides) = Self::build_overrides(dir, extensions, exclude)? else {
            return Ok(Vec::new());
        };

        let files: Vec<LayoutFile> = Self::collect_paths(dir, overrides)
            .iter()
            .filter_map(|path| {
                let relative = path.strip_prefix(dir).ok()?;
                Some(LayoutFile::new(dir, relative))
            })
            .collect();

        debug!("Found {} layouts in {}", files.len(), dir.display());
        Ok(files)
    }

    /// `None` when no extension is configured, which can match nothing.
    fn build_overrides(
        dir: &Path,
        extensions: &[String],
        exclude: &[String],
    ) -> Result<Option<Override>> {
        let ext = extensions_to_glob(extensions);
        if ext.is_empty() {
            return Ok(None);
        }

        let mut builder = OverrideBuilder::new(dir);
        builder.add(&format!("**/*.{}", ext))?;
        // Later globs take precedence, so exclusions go last
        for pattern in DEFAULT_IGNORES.iter().copied().chain(exclude.iter().map(String::as_str)) {
            builder.add(&format!("!{}", pattern))?;
        }
        Ok(Some(builder.build()?))
    }

    fn collect_paths(root: &Path, overrides: Override) -> Vec<PathBuf> {
        WalkBuilder::new(root)
            .standard_filters(false)
            .hidden(true)
            .overrides(overrides)
            .sort_by_file_name(|a, b| a.cmp(b))
            .build()
            .filter_map(|entry| {
                let entry = entry.ok()?;
                if entry.file_type()?.is_file() {
                    return Some(entry.into_path());
                }
                None
            })
            .collect()
    }
}
