//! Logging setup for the browser binding

use std::sync::Once;

static INIT: Once = Once::new();

/// Route `tracing` events to the browser console and install the panic hook.
///
/// Safe to call more than once; only the first call has an effect.
pub fn init_logging() {
    INIT.call_once(|| {
        console_error_panic_hook::set_once();
        if tracing_wasm::try_set_as_global_default().is_err() {
            web_sys::console::warn_1(&"viewer-selector: tracing subscriber already installed".into());
        }
    });
}
