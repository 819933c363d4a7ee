use super::MODULE_IDS;
use crate::codegen::{ClientSideOptions, create_virtual_module_code};

/// Prefix marking ids that belong to a plugin rather than to a file.
const PRIVATE_ID_PREFIX: char = '\0';

/// Fixed-shape module; layouts are resolved by the host at compile time.
#[derive(Debug, Clone)]
pub struct ClientSideMode {
    options: ClientSideOptions,
}

impl ClientSideMode {
    pub fn new(options: ClientSideOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &ClientSideOptions {
        &self.options
    }

    pub fn resolve_id(&self, id: &str) -> Option<String> {
        MODULE_IDS
            .iter()
            .find(|module_id| **module_id == id)
            .map(|module_id| format!("{}{}", PRIVATE_ID_PREFIX, module_id))
    }

    pub fn load(&self, id: &str) -> Option<String> {
        let module_id = id.strip_prefix(PRIVATE_ID_PREFIX)?;
        MODULE_IDS
            .contains(&module_id)
            .then(|| create_virtual_module_code(&self.options))
    }
}
