//! `postMessage` delivery into the embedded frame

use serde::Serialize;
use serde_wasm_bindgen::Serializer;
use viewer_selector::{HostRequest, Origin, PeerTransport, SelectorError, SelectorResult};
use web_sys::HtmlIFrameElement;

/// Posts host requests to the frame's current browsing context
pub struct IframeTransport {
    iframe: HtmlIFrameElement,
}

impl IframeTransport {
    /// Create a transport for `iframe`
    pub fn new(iframe: HtmlIFrameElement) -> Self {
        Self { iframe }
    }
}

impl PeerTransport for IframeTransport {
    fn post(&self, request: &HostRequest, target_origin: &Origin) -> SelectorResult<()> {
        let window = self
            .iframe
            .content_window()
            .ok_or_else(|| SelectorError::transport("embedded frame has no browsing context"))?;

        let message = request
            .serialize(&Serializer::json_compatible())
            .map_err(|e| SelectorError::transport(e.to_string()))?;

        // The browser silently drops the message when the frame hosts
        // another origin.
        window
            .post_message(&message, target_origin.as_str())
            .map_err(|e| SelectorError::transport(format!("postMessage failed: {e:?}")))
    }
}
