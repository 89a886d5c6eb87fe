//! Channel to the embedded viewer peer
//!
//! The peer lives in a cross-origin browsing context that loads
//! asynchronously and reloads whenever its element is re-parented. Requests
//! are buffered in send order until the context reports a completed load,
//! then flushed and delivered directly until the next [`PeerChannel::reset_queue`].
//!
//! A request sent to a peer that never loads stays buffered forever. There
//! is no retry, timeout or failure signal.

use crate::errors::SelectorResult;
use crate::protocol::{HostRequest, Origin, PeerEvent};
use serde_json::Value;
use std::cell::{Cell, RefCell};
use tracing::{debug, warn};

/// Delivery of host requests into the embedded context
pub trait PeerTransport {
    /// Post a request, scoped to exactly `target_origin`.
    ///
    /// If the context currently hosts a document from another origin the
    /// platform drops the message; implementations treat that as success.
    fn post(&self, request: &HostRequest, target_origin: &Origin) -> SelectorResult<()>;
}

/// Buffering, origin-authenticated channel to one embedded peer
pub struct PeerChannel<T> {
    transport: T,
    origin: Origin,
    /// `None` once the current load has completed
    queue: RefCell<Option<Vec<HostRequest>>>,
    closed: Cell<bool>,
}

impl<T: PeerTransport> PeerChannel<T> {
    /// Create a channel in the loading state
    pub fn new(transport: T, origin: Origin) -> Self {
        Self {
            transport,
            origin,
            queue: RefCell::new(Some(Vec::new())),
            closed: Cell::new(false),
        }
    }

    /// Expected peer origin
    pub fn origin(&self) -> &Origin {
        &self.origin
    }

    /// Underlying transport
    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Whether requests are currently delivered without buffering
    pub fn is_ready(&self) -> bool {
        !self.closed.get() && self.queue.borrow().is_none()
    }

    /// Number of requests waiting for the next load
    pub fn pending(&self) -> usize {
        self.queue.borrow().as_ref().map_or(0, Vec::len)
    }

    /// Whether [`PeerChannel::close`] has been called
    pub fn is_closed(&self) -> bool {
        self.closed.get()
    }

    /// Send a request, buffering it while the peer is loading
    pub fn send(&self, request: HostRequest) {
        if self.closed.get() {
            debug!(kind = request.kind(), "Dropping request on closed peer channel");
            return;
        }

        {
            let mut queue = self.queue.borrow_mut();
            if let Some(pending) = queue.as_mut() {
                pending.push(request);
                debug!(kind = request.kind(), pending = pending.len(), "Queued peer request");
                return;
            }
        }

        self.deliver(&request);
    }

    /// Flush buffered requests after the peer finished loading.
    ///
    /// A no-op when the queue has already been flushed for this load.
    pub fn on_load(&self) {
        if self.closed.get() {
            return;
        }

        let Some(pending) = self.queue.borrow_mut().take() else {
            debug!("Peer load signal with no queue, ignoring");
            return;
        };

        debug!(count = pending.len(), "Peer loaded, flushing queued requests");
        for request in &pending {
            self.deliver(request);
        }
    }

    /// Authenticate and classify an inbound message.
    ///
    /// Messages whose sender origin differs from the expected origin are
    /// discarded before their contents are inspected.
    pub fn receive(&self, sender: &Origin, raw: &Value) -> Option<PeerEvent> {
        if self.closed.get() {
            return None;
        }

        if *sender != self.origin {
            warn!(sender = %sender, expected = %self.origin, "Discarding message from unexpected origin");
            return None;
        }

        PeerEvent::classify(raw)
    }

    /// Return to the loading state.
    ///
    /// Must accompany every operation that makes the embedded context
    /// reload. Requests already buffered for the previous load are dropped.
    pub fn reset_queue(&self) {
        if self.closed.get() {
            return;
        }

        let previous = self.queue.replace(Some(Vec::new()));
        if let Some(dropped) = previous.filter(|q| !q.is_empty()) {
            debug!(count = dropped.len(), "Discarded requests queued for previous load");
        }
    }

    /// Tear the channel down. Idempotent.
    pub fn close(&self) {
        if self.closed.replace(true) {
            return;
        }
        self.queue.replace(None);
        debug!(origin = %self.origin, "Peer channel closed");
    }

    fn deliver(&self, request: &HostRequest) {
        if let Err(e) = self.transport.post(request, &self.origin) {
            warn!(kind = request.kind(), error = %e, "Failed to deliver request to peer");
        }
    }
}
