//! Layout resolution engine: scans layout directories and generates the
//! virtual module that wraps application routes in their layout components.

pub mod error;
pub mod logging;
pub mod options;
pub mod util;

pub mod codegen;
pub mod plugin;
pub mod project;
pub mod runtime;

pub use error::{LayoutsError, Result};
pub use options::{DirSpec, ImportModeFn, ResolvedOptions, UserOptions};
pub use plugin::{LayoutsPlugin, MODULE_ID_VIRTUAL, MODULE_IDS, Mode};
pub use project::{FileContainer, LayoutFile};
