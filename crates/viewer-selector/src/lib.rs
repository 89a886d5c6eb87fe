//! Viewer Selector - embedded viewer profile picker
//!
//! A modal dialog embeds a cross-origin viewer configuration page and talks
//! to it over a small message protocol:
//!
//! - host→peer `present` / `query` requests are buffered while the embedded
//!   context is loading and flushed in order once it has loaded
//! - peer→host `ready` / `deviceprofile` notifications are only considered
//!   when posted from the configured peer origin
//! - the dialog is revealed only after the peer reports it is presentable
//!
//! The DOM side is abstracted behind [`DialogSurface`] and [`PeerTransport`];
//! the `viewer-selector-wasm` crate provides the browser implementations.

#![forbid(unsafe_code)]

/// Embedded-peer channel with buffering and origin authentication
pub mod channel;

/// Selector configuration
pub mod config;

/// Error type
pub mod errors;

/// Host application notification channel
pub mod notifier;

/// Message protocol
pub mod protocol;

/// Dialog state machine
pub mod selector;

pub use channel::{PeerChannel, PeerTransport};
pub use config::SelectorConfig;
pub use errors::{SelectorError, SelectorResult};
pub use notifier::{EventEmitter, Listener, ListenerId, Notifier, SelectorEvent};
pub use protocol::{DeviceProfile, HostRequest, Origin, PeerEvent};
pub use selector::{DialogSurface, ProfileEmitter, ViewerSelector};
