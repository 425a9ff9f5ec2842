use thiserror::Error;
use wasm_bindgen::JsValue;

/// Error type produced by the browser binding.
#[derive(Debug, Clone, Error)]
pub enum WebError {
    /// `window` or `document` is missing (not running in a page).
    #[error("DOM is not available")]
    DomUnavailable,

    /// `localStorage` is disabled or blocked.
    #[error("localStorage is not available")]
    StorageUnavailable,

    /// Wrapper around JavaScript exceptions.
    #[error("JavaScript error: {0}")]
    Js(String),
}

impl From<JsValue> for WebError {
    fn from(value: JsValue) -> Self {
        value
            .as_string()
            .map_or_else(|| Self::Js(format!("{value:?}")), Self::Js)
    }
}

impl From<WebError> for JsValue {
    fn from(value: WebError) -> Self {
        Self::from(value.to_string())
    }
}

/// Maps a rejected DOM call into the page error type.
pub(crate) fn dom_error(value: JsValue) -> sfoglia::Error {
    sfoglia::Error::Dom(WebError::from(value).to_string())
}
