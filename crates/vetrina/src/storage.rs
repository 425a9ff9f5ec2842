use sfoglia::{Error, PreferenceStore, Result};
use web_sys::Storage;

use crate::error::WebError;

/// `window.localStorage`. Private browsing modes may refuse access, in which
/// case every call fails and the page keeps its default theme.
#[derive(Debug, Clone)]
pub struct LocalStore {
    storage: Option<Storage>,
}

impl LocalStore {
    pub fn new(window: &web_sys::Window) -> Self {
        Self {
            storage: window.local_storage().ok().flatten(),
        }
    }

    fn storage(&self) -> Result<&Storage> {
        self.storage
            .as_ref()
            .ok_or_else(|| Error::Storage(WebError::StorageUnavailable.to_string()))
    }
}

impl PreferenceStore for LocalStore {
    fn load(&self, key: &str) -> Result<Option<String>> {
        self.storage()?
            .get_item(key)
            .map_err(|e| Error::Storage(WebError::from(e).to_string()))
    }

    fn save(&self, key: &str, value: &str) -> Result<()> {
        self.storage()?
            .set_item(key, value)
            .map_err(|e| Error::Storage(WebError::from(e).to_string()))
    }
}
