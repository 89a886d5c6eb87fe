//! Error handling for the browser binding

use thiserror::Error;
use viewer_selector::SelectorError;
use wasm_bindgen::prelude::*;

/// Error type for all binding operations
#[derive(Error, Debug)]
pub enum WasmError {
    /// Error raised by the selector core.
    #[error("Selector error: {0}")]
    Selector(#[from] SelectorError),

    /// Configuration object could not be read.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Required DOM object is unavailable or has the wrong type.
    #[error("DOM error: {0}")]
    Dom(String),

    /// JavaScript interop error.
    #[error("JavaScript error: {0}")]
    JavaScript(String),
}

impl From<JsValue> for WasmError {
    fn from(js_val: JsValue) -> Self {
        let message = js_val
            .as_string()
            .unwrap_or_else(|| format!("{js_val:?}"));
        WasmError::JavaScript(message)
    }
}

impl From<serde_wasm_bindgen::Error> for WasmError {
    fn from(err: serde_wasm_bindgen::Error) -> Self {
        WasmError::Config(err.to_string())
    }
}

impl From<WasmError> for JsValue {
    fn from(err: WasmError) -> Self {
        js_sys::Error::new(&err.to_string()).into()
    }
}

/// Converts a rejected DOM call into a core surface error
pub(crate) fn surface_error(js_val: JsValue) -> SelectorError {
    SelectorError::surface(WasmError::from(js_val).to_string())
}

/// Result type for binding operations
pub type WasmResult<T> = Result<T, WasmError>;
