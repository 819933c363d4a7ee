//! Bundler plugin serving the generated layouts module.
//!
//! The generation strategy is picked once, from which options the user set:
//! a lone plain layouts dir (plus optionally a default layout name) gets the
//! scan-free client-side module, anything else gets full scanning with
//! watch-driven reloads.

mod client_side;
mod full;
pub mod reload;

pub use client_side::ClientSideMode;
pub use full::FullMode;
pub use reload::{ReloadHandler, is_relevant_change};

use crate::codegen::ClientSideOptions;
use crate::options::{DirSpec, ResolvedOptions, UserOptions, ssg_from_env};
use async_trait::async_trait;
use layoutgen_api::{ApiResult, BundlerPlugin, DevServer, Enforce, ResolvedConfig};
use tracing::debug;

pub const PLUGIN_NAME: &str = "vite-plugin-layouts";

/// Public specifiers applications import the layouts module by.
pub const MODULE_IDS: &[&str] = &["layouts-generated", "virtual:generated-layouts"];

/// Id the full-mode module is served under.
pub const MODULE_ID_VIRTUAL: &str = "/@vite-plugin-layouts/generated-layouts";

#[derive(Debug)]
pub enum Mode {
    Full(FullMode),
    ClientSide(ClientSideMode),
}

#[derive(Debug)]
pub struct LayoutsPlugin {
    mode: Mode,
}

impl LayoutsPlugin {
    pub fn new(user: UserOptions) -> Self {
        Self::new_with_ssg(user, ssg_from_env())
    }

    /// Like `new`, with the SSG flag given instead of read from the environment.
    pub fn new_with_ssg(user: UserOptions, ssg: bool) -> Self {
        let mode = if user.is_client_side_compatible() {
            let layout_dir = match &user.layouts_dirs {
                Some(DirSpec::Single(dir)) => Some(dir.as_str()),
                _ => None,
            };
            let options =
                ClientSideOptions::new(layout_dir, user.default_layout.as_deref(), ssg);
            Mode::ClientSide(ClientSideMode::new(options))
        } else {
            Mode::Full(FullMode::new(ResolvedOptions::resolve_with_ssg(user, ssg)))
        };

        debug!(
            "Layouts plugin running in {} mode",
            match &mode {
                Mode::Full(_) => "full",
                Mode::ClientSide(_) => "client-side",
            }
        );
        Self { mode }
    }

    pub fn mode(&self) -> &Mode {
        &self.mode
    }

    pub fn is_client_side(&self) -> bool {
        matches!(self.mode, Mode::ClientSide(_))
    }
}

#[async_trait]
impl BundlerPlugin for LayoutsPlugin {
    fn name(&self) -> &str {
        PLUGIN_NAME
    }

    fn enforce(&self) -> Option<Enforce> {
        match self.mode {
            Mode::Full(_) => Some(Enforce::Pre),
            Mode::ClientSide(_) => None,
        }
    }

    fn config_resolved(&mut self, config: &ResolvedConfig) -> ApiResult<()> {
        match &mut self.mode {
            Mode::Full(full) => Ok(full.config_resolved(config)?),
            Mode::ClientSide(_) => Ok(()),
        }
    }

    fn configure_server(&mut self, server: &DevServer) -> ApiResult<()> {
        if let Mode::Full(full) = &self.mode {
            full.configure_server(server);
        }
        Ok(())
    }

    fn resolve_id(&self, id: &str) -> Option<String> {
        match &self.mode {
            Mode::Full(full) => full.resolve_id(id),
            Mode::ClientSide(client) => client.resolve_id(id),
        }
    }

    async fn load(&self, id: &str) -> ApiResult<Option<String>> {
        match &self.mode {
            Mode::Full(full) => Ok(full.load(id).await?),
            Mode::ClientSide(client) => Ok(client.load(id)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mode_selection() {
        let plugin = LayoutsPlugin::new_with_ssg(
            UserOptions::default().with_layouts_dirs("src/layouts"),
            false,
        );
        assert!(plugin.is_client_side());
        assert_eq!(plugin.enforce(), None);

        let plugin =
            LayoutsPlugin::new_with_ssg(UserOptions::default().with_layouts_dirs(vec!["a", "b"]), false);
        assert!(!plugin.is_client_side());
        assert_eq!(plugin.enforce(), Some(Enforce::Pre));

        let plugin = LayoutsPlugin::new_with_ssg(
            UserOptions::default().with_layouts_dirs("src/**/layouts"),
            false,
        );
        assert!(!plugin.is_client_side());
    }

    #[test]
    fn test_client_side_options_carry_over() {
        let plugin = LayoutsPlugin::new_with_ssg(
            UserOptions::default()
                .with_layouts_dirs("app/layouts")
                .with_default_layout("main"),
            true,
        );
        let Mode::ClientSide(client) = plugin.mode() else {
            panic!("expected client-side mode");
        };
        assert_eq!(client.options().layout_dir, "app/layouts");
        assert_eq!(client.options().default_layout, "main");
        assert!(client.options().import_mode.is_sync());
    }

    #[test]
    fn test_full_mode_resolve_id() {
        let plugin = LayoutsPlugin::new_with_ssg(UserOptions::default().with_exclude(&["x"]), false);
        assert_eq!(plugin.resolve_id("virtual:generated-layouts").as_deref(), Some(MODULE_ID_VIRTUAL));
        assert_eq!(plugin.resolve_id("layouts-generated").as_deref(), Some(MODULE_ID_VIRTUAL));
        assert_eq!(
            plugin.resolve_id("virtual:generated-layouts?v=1").as_deref(),
            Some(MODULE_ID_VIRTUAL)
        );
        assert_eq!(plugin.resolve_id("vue"), None);
    }

    #[test]
    fn test_relative_root_resolves_absolute_dirs() {
        let mut plugin = LayoutsPlugin::new_with_ssg(full_options_for_test(), false);
        plugin.config_resolved(&ResolvedConfig::new("app")).unwrap();
        let Mode::Full(full) = plugin.mode() else {
            panic!("expected full mode");
        };
        assert!(!full.layout_dirs().is_empty());
        assert!(full.layout_dirs().iter().all(|dir| dir.is_absolute()));
        assert!(full.pages_dirs().iter().all(|dir| dir.is_absolute()));
    }

    fn full_options_for_test() -> UserOptions {
        UserOptions::default().with_exclude(&["x"])
    }

    #[test]
    fn test_client_side_resolve_id_is_exact() {
        let plugin = LayoutsPlugin::new_with_ssg(UserOptions::default(), false);
        assert_eq!(
            plugin.resolve_id("virtual:generated-layouts").as_deref(),
            Some("\0virtual:generated-layouts")
        );
        assert_eq!(plugin.resolve_id("virtual:generated-layouts?v=1"), None);
    }

    #[tokio::test]
    async fn test_client_side_load() {
        let plugin = LayoutsPlugin::new_with_ssg(UserOptions::default(), false);
        let code = plugin.load("\0layouts-generated").await.unwrap().unwrap();
        assert!(code.contains("import.meta.glob(\"/src/layouts/**/*.vue\""));
        assert!(plugin.load("layouts-generated").await.unwrap().is_none());
    }
}
