//! Viewer selector dialog state machine
//!
//! The logical state (`showing`) tracks whether `show` was called more
//! recently than `hide`. Whether the dialog is actually displayed is further
//! gated by the peer: it is only revealed once the peer reports itself
//! presentable while the selector is showing.

use crate::channel::{PeerChannel, PeerTransport};
use crate::errors::SelectorResult;
use crate::notifier::{EventEmitter, Listener, ListenerId, Notifier, SelectorEvent};
use crate::protocol::{DeviceProfile, HostRequest, Origin, PeerEvent};
use serde_json::Value;
use std::cell::Cell;
use tracing::{debug, warn};

/// Document fragment hosting the overlay and the embedded context
pub trait DialogSurface {
    /// Element the dialog can be attached to
    type Container: ?Sized;

    /// Detach from the current parent, if any, and append to `container`.
    ///
    /// Moving the fragment makes the embedded context reload.
    fn reparent(&self, container: &Self::Container) -> SelectorResult<()>;

    /// Set the display state of the dialog
    fn set_visible(&self, visible: bool);

    /// Remove the fragment from the document for good
    fn remove(&self);
}

/// Default notifier type
pub type ProfileEmitter = EventEmitter<SelectorEvent, DeviceProfile>;

/// Modal selector embedding the remote viewer configuration page
pub struct ViewerSelector<D, T, N = ProfileEmitter> {
    dialog: D,
    channel: PeerChannel<T>,
    notifier: N,
    showing: Cell<bool>,
    visible: Cell<bool>,
    disposed: Cell<bool>,
}

impl<D, T> ViewerSelector<D, T>
where
    D: DialogSurface,
    T: PeerTransport,
{
    /// Create a hidden selector with its own event emitter
    pub fn new(dialog: D, transport: T, origin: Origin) -> Self {
        Self::with_notifier(dialog, transport, origin, EventEmitter::new())
    }
}

impl<D, T, N> ViewerSelector<D, T, N>
where
    D: DialogSurface,
    T: PeerTransport,
    N: Notifier<SelectorEvent, DeviceProfile>,
{
    /// Create a hidden selector broadcasting through `notifier`
    pub fn with_notifier(dialog: D, transport: T, origin: Origin, notifier: N) -> Self {
        debug!(origin = %origin, "Creating viewer selector");
        dialog.set_visible(false);
        Self {
            dialog,
            channel: PeerChannel::new(transport, origin),
            notifier,
            showing: Cell::new(false),
            visible: Cell::new(false),
            disposed: Cell::new(false),
        }
    }

    /// Attach the dialog to `container` and ask the peer to present.
    ///
    /// Always re-homes the dialog, even when already showing in the same
    /// container. The dialog stays hidden until the peer reports ready.
    pub fn show(&self, container: &D::Container) -> SelectorResult<()> {
        if self.disposed.get() {
            return Ok(());
        }

        self.rehome(container)?;
        self.showing.set(true);
        debug!("Viewer selector showing, awaiting peer");
        self.channel.send(HostRequest::Present);
        Ok(())
    }

    /// Hide the dialog immediately, whatever the peer state
    pub fn hide(&self) {
        if self.disposed.get() {
            return;
        }

        self.showing.set(false);
        self.visible.set(false);
        self.dialog.set_visible(false);
        debug!("Viewer selector hidden");
    }

    /// Ask the peer for its current profile.
    ///
    /// The answer, if any, arrives later as a `profile` event.
    pub fn query_current_viewer_profile(&self) {
        if self.disposed.get() {
            return;
        }
        self.channel.send(HostRequest::Query);
    }

    /// Forward the embedded context's load completion
    pub fn on_peer_load(&self) {
        self.channel.on_load();
    }

    /// Handle a message posted to the host window
    pub fn handle_message(&self, sender: &Origin, raw: &Value) {
        let Some(event) = self.channel.receive(sender, raw) else {
            return;
        };

        match event {
            PeerEvent::Ready { presentable } => self.handle_ready(presentable),
            PeerEvent::DeviceProfile { profile } => {
                let notified = self.notifier.emit(&SelectorEvent::Profile, &profile);
                debug!(listeners = notified, "Broadcast device profile");
            }
        }
    }

    /// Subscribe to selector events
    pub fn on(&self, event: SelectorEvent, listener: Listener<DeviceProfile>) -> ListenerId {
        self.notifier.on(event, listener)
    }

    /// Unsubscribe a listener
    pub fn off(&self, id: ListenerId) -> bool {
        self.notifier.off(id)
    }

    /// Whether `show` was called more recently than `hide`
    pub fn is_showing(&self) -> bool {
        self.showing.get()
    }

    /// Whether the dialog is currently displayed
    pub fn is_visible(&self) -> bool {
        self.visible.get()
    }

    /// Whether [`ViewerSelector::dispose`] has run
    pub fn is_disposed(&self) -> bool {
        self.disposed.get()
    }

    /// Channel to the embedded peer
    pub fn channel(&self) -> &PeerChannel<T> {
        &self.channel
    }

    /// Dialog surface
    pub fn dialog(&self) -> &D {
        &self.dialog
    }

    /// Tear down: hide, remove the dialog, close the channel and drop all
    /// listeners. Every later call is a no-op.
    pub fn dispose(&self) {
        if self.disposed.get() {
            return;
        }

        self.hide();
        self.disposed.set(true);
        self.dialog.remove();
        self.channel.close();
        self.notifier.clear();
        debug!("Viewer selector disposed");
    }

    fn handle_ready(&self, presentable: bool) {
        if presentable && self.showing.get() {
            self.visible.set(true);
            self.dialog.set_visible(true);
            debug!("Peer presentable, revealing dialog");
        } else {
            debug!(presentable, showing = self.showing.get(), "Peer ready, dialog stays hidden");
        }
    }

    // The queue reset is tied to the move: the reparented frame reloads
    // and only its next load may flush. A failed move may have left the
    // dialog detached, so it no longer counts as shown.
    fn rehome(&self, container: &D::Container) -> SelectorResult<()> {
        self.channel.reset_queue();
        if let Err(e) = self.dialog.reparent(container) {
            warn!(error = %e, "Failed to attach viewer selector dialog");
            self.showing.set(false);
            self.visible.set(false);
            self.dialog.set_visible(false);
            return Err(e);
        }
        Ok(())
    }
}
