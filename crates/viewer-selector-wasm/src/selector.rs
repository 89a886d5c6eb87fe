//! JavaScript-facing viewer selector
//!
//! Owns the DOM listeners feeding the core state machine: the window
//! `message` listener, the frame `load` listener and the overlay `click`
//! listener. All of them hold only a weak reference to the core, and all of
//! them are removed again by `dispose`.

use crate::dialog::DomDialog;
use crate::error::{WasmError, WasmResult};
use crate::transport::IframeTransport;
use serde::Serialize;
use serde_wasm_bindgen::Serializer;
use std::cell::RefCell;
use std::rc::{Rc, Weak};
use tracing::{debug, warn};
use viewer_selector::{
    DeviceProfile, ListenerId, Origin, SelectorConfig, SelectorEvent,
    ViewerSelector as CoreSelector,
};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{Element, Event, EventTarget, MessageEvent, Window};

type DomSelector = CoreSelector<DomDialog, IframeTransport>;

/// Event listeners installed on the page for one selector
struct DomListeners {
    window: Window,
    on_message: Closure<dyn FnMut(MessageEvent)>,
    on_load: Closure<dyn FnMut(Event)>,
    on_dismiss: Closure<dyn FnMut(Event)>,
}

impl DomListeners {
    fn install(window: Window, selector: &Rc<DomSelector>) -> WasmResult<Self> {
        let on_message = {
            let selector = Rc::downgrade(selector);
            Closure::<dyn FnMut(MessageEvent)>::new(move |event: MessageEvent| {
                receive_message(&selector, &event);
            })
        };

        let on_load = {
            let selector = Rc::downgrade(selector);
            Closure::<dyn FnMut(Event)>::new(move |_: Event| {
                if let Some(selector) = selector.upgrade() {
                    selector.on_peer_load();
                }
            })
        };

        let on_dismiss = {
            let selector = Rc::downgrade(selector);
            Closure::<dyn FnMut(Event)>::new(move |_: Event| {
                if let Some(selector) = selector.upgrade() {
                    selector.hide();
                }
            })
        };

        let dialog = selector.dialog();
        window.add_event_listener_with_callback("message", on_message.as_ref().unchecked_ref())?;
        dialog
            .iframe()
            .add_event_listener_with_callback("load", on_load.as_ref().unchecked_ref())?;
        dialog
            .overlay()
            .add_event_listener_with_callback("click", on_dismiss.as_ref().unchecked_ref())?;

        Ok(Self {
            window,
            on_message,
            on_load,
            on_dismiss,
        })
    }

    fn uninstall(&self, dialog: &DomDialog) {
        detach(&self.window, "message", self.on_message.as_ref());
        detach(dialog.iframe(), "load", self.on_load.as_ref());
        detach(dialog.overlay(), "click", self.on_dismiss.as_ref());
    }
}

fn detach(target: &EventTarget, kind: &str, callback: &JsValue) {
    if let Err(e) = target.remove_event_listener_with_callback(kind, callback.unchecked_ref()) {
        warn!(kind, error = ?e, "Failed to remove listener");
    }
}

fn receive_message(selector: &Weak<DomSelector>, event: &MessageEvent) {
    let Some(selector) = selector.upgrade() else {
        return;
    };

    // Foreign traffic is dropped before its payload is decoded.
    let sender = Origin::from(event.origin());
    if &sender != selector.channel().origin() {
        debug!(sender = %sender, "Ignoring window message from another origin");
        return;
    }

    match serde_wasm_bindgen::from_value::<serde_json::Value>(event.data()) {
        Ok(raw) => selector.handle_message(&sender, &raw),
        Err(e) => debug!(error = %e, "Ignoring undecodable peer message"),
    }
}

/// Modal dialog letting the user pick a viewer profile in the embedded page
#[wasm_bindgen]
pub struct ViewerSelector {
    inner: Rc<DomSelector>,
    listeners: RefCell<Option<DomListeners>>,
    root: RefCell<Element>,
}

#[wasm_bindgen]
impl ViewerSelector {
    /// Creates a selector for the default viewer page.
    #[wasm_bindgen(constructor)]
    pub fn new(root: Element) -> WasmResult<ViewerSelector> {
        Self::build(root, SelectorConfig::default())
    }

    /// Creates a selector from a `{ peerOrigin, peerPath, className }` object.
    #[wasm_bindgen(js_name = withConfig)]
    pub fn with_config(root: Element, config: JsValue) -> WasmResult<ViewerSelector> {
        if !config.is_object() || js_sys::Array::is_array(&config) {
            return Err(WasmError::Config("configuration must be an object".to_string()));
        }
        let config: SelectorConfig = serde_wasm_bindgen::from_value(config)?;
        Self::build(root, config)
    }

    /// Attaches the dialog to `root` and asks the peer to present.
    pub fn show(&self, root: Element) -> WasmResult<()> {
        self.inner.show(&root)?;
        self.root.replace(root);
        Ok(())
    }

    /// Hides the dialog.
    pub fn hide(&self) {
        self.inner.hide();
    }

    /// Asks the peer for the current profile; the answer arrives as a `profile` event.
    #[wasm_bindgen(js_name = queryCurrentViewerProfile)]
    pub fn query_current_viewer_profile(&self) {
        self.inner.query_current_viewer_profile();
    }

    /// Registers `handler` for `event` and returns an id for `off`.
    pub fn on(&self, event: &str, handler: js_sys::Function) -> WasmResult<u32> {
        let event: SelectorEvent = event.parse()?;
        let id = self.inner.on(
            event,
            Rc::new(move |profile: &DeviceProfile| {
                let payload = match profile.as_value().serialize(&Serializer::json_compatible()) {
                    Ok(payload) => payload,
                    Err(e) => {
                        warn!(error = %e, "Failed to convert profile for listener");
                        return;
                    }
                };
                if let Err(e) = handler.call1(&JsValue::NULL, &payload) {
                    warn!(error = ?e, "Profile listener threw");
                }
            }),
        );
        Ok(id.as_u32())
    }

    /// Removes a listener registered with `on`.
    pub fn off(&self, id: u32) -> bool {
        self.inner.off(ListenerId::from_u32(id))
    }

    /// Element the dialog was last shown in.
    #[wasm_bindgen(getter)]
    pub fn root(&self) -> Element {
        self.root.borrow().clone()
    }

    /// Whether `show` was called more recently than `hide`.
    #[wasm_bindgen(getter, js_name = isShowing)]
    pub fn is_showing(&self) -> bool {
        self.inner.is_showing()
    }

    /// Whether the dialog is currently displayed.
    #[wasm_bindgen(getter, js_name = isVisible)]
    pub fn is_visible(&self) -> bool {
        self.inner.is_visible()
    }

    /// Removes the dialog and every page listener. Further calls do nothing.
    pub fn dispose(&self) {
        if let Some(listeners) = self.listeners.borrow_mut().take() {
            listeners.uninstall(self.inner.dialog());
        }
        self.inner.dispose();
    }
}

impl ViewerSelector {
    fn build(root: Element, config: SelectorConfig) -> WasmResult<ViewerSelector> {
        config.validate()?;
        let origin = config.origin()?;

        let window = web_sys::window().ok_or_else(|| WasmError::Dom("no global window".to_string()))?;
        let document = window
            .document()
            .ok_or_else(|| WasmError::Dom("window has no document".to_string()))?;

        let dialog = DomDialog::create(&document, &config)?;
        let transport = IframeTransport::new(dialog.iframe().clone());
        let inner = Rc::new(CoreSelector::new(dialog, transport, origin));
        let listeners = match DomListeners::install(window, &inner) {
            Ok(listeners) => listeners,
            Err(e) => {
                inner.dispose();
                return Err(e);
            }
        };

        debug!(url = %config.peer_url(), "Viewer selector created");
        Ok(ViewerSelector {
            inner,
            listeners: RefCell::new(Some(listeners)),
            root: RefCell::new(root),
        })
    }

    /// Core state machine, for embedding in other Rust code
    pub fn core(&self) -> &CoreSelector<DomDialog, IframeTransport> {
        &self.inner
    }
}

impl Drop for ViewerSelector {
    fn drop(&mut self) {
        self.dispose();
    }
}
