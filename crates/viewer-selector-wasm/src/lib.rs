//! Browser binding for the viewer selector
//!
//! Builds the dialog DOM around the embedded viewer page, wires the page
//! events into the [`viewer_selector`] core, and exports a `ViewerSelector`
//! class to JavaScript:
//!
//! ```js
//! const selector = new ViewerSelector(document.body);
//! selector.on('profile', (profile) => console.log(profile));
//! selector.show(document.body);
//! selector.queryCurrentViewerProfile();
//! ```

// `#[wasm_bindgen]` expands to unsafe FFI glue.
#![allow(unsafe_code)]

/// DOM dialog surface
pub mod dialog;
/// Binding error type
pub mod error;
/// Console logging setup
pub mod logging;
/// JavaScript-facing selector class
pub mod selector;
/// `postMessage` transport
pub mod transport;

pub use dialog::DomDialog;
pub use error::{WasmError, WasmResult};
pub use selector::ViewerSelector;
pub use transport::IframeTransport;

use wasm_bindgen::prelude::*;

/// Module initialization hook
#[wasm_bindgen(start)]
pub fn start() {
    logging::init_logging();
}
