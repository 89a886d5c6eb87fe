//! DOM dialog hosting the embedded viewer page
//!
//! The container is built once and moved between parents on every `show`.
//! Moving it reloads the iframe, which the selector accounts for by
//! resetting its request queue.

use crate::error::{surface_error, WasmError, WasmResult};
use tracing::warn;
use viewer_selector::{DialogSurface, SelectorConfig, SelectorResult};
use wasm_bindgen::JsCast;
use web_sys::{CssStyleDeclaration, Document, Element, HtmlElement, HtmlIFrameElement};

/// Dimmed full-screen backdrop, dismisses the dialog when clicked
const OVERLAY_STYLE: &[(&str, &str)] = &[
    ("position", "fixed"),
    ("left", "0"),
    ("top", "0"),
    ("width", "100%"),
    ("height", "100%"),
    ("background", "rgba(0, 0, 0, 0.3)"),
];

const FRAME_STYLE: &[(&str, &str)] = &[
    ("box-sizing", "border-box"),
    ("position", "fixed"),
    ("top", "24px"),
    ("left", "25%"),
    ("width", "50%"),
    ("height", "80%"),
    ("right", "24px"),
    ("padding", "24px"),
    ("background", "#fafafa"),
    ("border", "none"),
    ("box-shadow", "0px 5px 20px #666"),
];

/// Overlay plus iframe, wrapped in one container element
pub struct DomDialog {
    container: HtmlElement,
    overlay: HtmlElement,
    iframe: HtmlIFrameElement,
}

impl DomDialog {
    /// Build the dialog, hidden, and append it to `document.body`
    pub fn create(document: &Document, config: &SelectorConfig) -> WasmResult<Self> {
        let container = create_html(document, "div")?;
        container.class_list().add_1(&config.class_name)?;
        container.style().set_property("display", "none")?;

        let overlay = create_html(document, "div")?;
        apply_style(&overlay.style(), OVERLAY_STYLE)?;

        let iframe = document
            .create_element("iframe")?
            .dyn_into::<HtmlIFrameElement>()
            .map_err(|_| WasmError::Dom("iframe element has unexpected type".to_string()))?;
        iframe.set_src(&config.peer_url());
        apply_style(&iframe.style(), FRAME_STYLE)?;

        container.append_child(&overlay)?;
        container.append_child(&iframe)?;

        let body = document
            .body()
            .ok_or_else(|| WasmError::Dom("document has no body".to_string()))?;
        body.append_child(&container)?;

        Ok(Self {
            container,
            overlay,
            iframe,
        })
    }

    /// Element wrapping the overlay and the frame
    pub fn container(&self) -> &HtmlElement {
        &self.container
    }

    /// Dismiss overlay
    pub fn overlay(&self) -> &HtmlElement {
        &self.overlay
    }

    /// Embedded browsing context element
    pub fn iframe(&self) -> &HtmlIFrameElement {
        &self.iframe
    }
}

impl DialogSurface for DomDialog {
    type Container = Element;

    fn reparent(&self, container: &Element) -> SelectorResult<()> {
        if let Some(parent) = self.container.parent_node() {
            parent.remove_child(&self.container).map_err(surface_error)?;
        }
        container
            .append_child(&self.container)
            .map_err(surface_error)?;
        Ok(())
    }

    fn set_visible(&self, visible: bool) {
        let value = if visible { "block" } else { "none" };
        if let Err(e) = self.container.style().set_property("display", value) {
            warn!(error = ?e, value, "Failed to set dialog display");
        }
    }

    fn remove(&self) {
        self.container.remove();
    }
}

fn create_html(document: &Document, tag: &str) -> WasmResult<HtmlElement> {
    document
        .create_element(tag)?
        .dyn_into::<HtmlElement>()
        .map_err(|_| WasmError::Dom(format!("<{tag}> is not an HTML element")))
}

fn apply_style(style: &CssStyleDeclaration, properties: &[(&str, &str)]) -> WasmResult<()> {
    for (name, value) in properties {
        style.set_property(name, value)?;
    }
    Ok(())
}
