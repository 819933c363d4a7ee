pub mod error;
pub mod host;
pub mod models;
pub mod plugin;

// Re-export commonly used types
pub use error::{ApiError, ApiResult};
pub use host::{DevServer, FileWatcher, HmrChannel, ModuleGraph, WatchListener};
pub use models::*;
pub use plugin::BundlerPlugin;
