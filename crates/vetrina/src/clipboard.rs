use sfoglia::{Clipboard, Error, Result};
use wasm_bindgen_futures::JsFuture;

use crate::error::WebError;

/// The async Clipboard API (`navigator.clipboard`).
#[derive(Debug, Clone)]
pub struct NavigatorClipboard {
    clipboard: web_sys::Clipboard,
}

impl NavigatorClipboard {
    pub fn new(window: &web_sys::Window) -> Self {
        Self {
            clipboard: window.navigator().clipboard(),
        }
    }
}

impl Clipboard for NavigatorClipboard {
    async fn write_text(&self, text: &str) -> Result<()> {
        JsFuture::from(self.clipboard.write_text(text))
            .await
            .map(|_| ())
            .map_err(|e| Error::Clipboard(WebError::from(e).to_string()))
    }
}
