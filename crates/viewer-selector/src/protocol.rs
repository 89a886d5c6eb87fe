//! Wire protocol spoken with the embedded viewer peer
//!
//! Every message is a JSON object with a mandatory `type` field. Host
//! requests are typed outbound; inbound traffic arrives as raw JSON and is
//! only classified after the sender origin has been authenticated.

use crate::errors::{SelectorError, SelectorResult};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use tracing::trace;
use url::Url;

/// `type` tag of the peer readiness notification
pub const READY: &str = "ready";
/// `type` tag of the peer profile notification
pub const DEVICE_PROFILE: &str = "deviceprofile";
/// `type` tag of the host presentation request
pub const PRESENT: &str = "present";
/// `type` tag of the host profile query
pub const QUERY: &str = "query";

/// ASCII serialization of a web origin (`scheme://host[:port]`)
///
/// Two origins are the same only if their serializations are byte-equal.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Origin(String);

impl Origin {
    /// Parse and validate a tuple origin.
    ///
    /// The input must already be in serialized form: no path, query,
    /// fragment or trailing slash.
    pub fn parse(input: &str) -> SelectorResult<Self> {
        let url = Url::parse(input)
            .map_err(|e| SelectorError::invalid_origin(input, e.to_string()))?;

        let origin = url.origin();
        if !origin.is_tuple() {
            return Err(SelectorError::invalid_origin(input, "opaque origin"));
        }

        let serialized = origin.ascii_serialization();
        if serialized != input {
            return Err(SelectorError::invalid_origin(
                input,
                format!("not a serialized origin, expected {serialized}"),
            ));
        }

        Ok(Self(serialized))
    }

    /// Borrow the serialized origin
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Wraps an origin as reported by the platform for an incoming message.
impl From<String> for Origin {
    fn from(origin: String) -> Self {
        Self(origin)
    }
}

impl From<&str> for Origin {
    fn from(origin: &str) -> Self {
        Self(origin.to_string())
    }
}

impl fmt::Display for Origin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Opaque device profile chosen in the embedded peer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DeviceProfile(pub Value);

impl DeviceProfile {
    /// Borrow the raw profile document
    pub fn as_value(&self) -> &Value {
        &self.0
    }

    /// Take the raw profile document
    pub fn into_value(self) -> Value {
        self.0
    }
}

/// Requests sent from the host page to the peer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum HostRequest {
    /// Enter presentation-capable UI mode
    Present,
    /// Report the current device profile
    Query,
}

impl HostRequest {
    /// Wire name of this request
    pub fn kind(&self) -> &'static str {
        match self {
            HostRequest::Present => PRESENT,
            HostRequest::Query => QUERY,
        }
    }

    /// Encode as a JSON document
    pub fn to_value(&self) -> SelectorResult<Value> {
        serde_json::to_value(self).map_err(SelectorError::from)
    }
}

/// Notifications sent from the peer to the host page
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum PeerEvent {
    /// Peer finished initializing
    Ready {
        /// Whether the dialog may be revealed
        presentable: bool,
    },
    /// Current or changed device profile
    #[serde(rename = "deviceprofile")]
    DeviceProfile {
        /// The selected profile
        profile: DeviceProfile,
    },
}

impl PeerEvent {
    /// Classify an authenticated inbound message.
    ///
    /// Returns `None` for anything that is not an object with a known
    /// string `type`. Missing payload fields fall back to `false` / `null`.
    pub fn classify(raw: &Value) -> Option<Self> {
        let Some(kind) = raw.get("type").and_then(Value::as_str) else {
            trace!("Ignoring peer message without a type");
            return None;
        };

        match kind {
            READY => Some(PeerEvent::Ready {
                presentable: raw
                    .get("presentable")
                    .and_then(Value::as_bool)
                    .unwrap_or(false),
            }),
            DEVICE_PROFILE => Some(PeerEvent::DeviceProfile {
                profile: DeviceProfile(raw.get("profile").cloned().unwrap_or(Value::Null)),
            }),
            other => {
                trace!(kind = other, "Ignoring unrecognized peer message");
                None
            }
        }
    }

    /// Wire name of this event
    pub fn kind(&self) -> &'static str {
        match self {
            PeerEvent::Ready { .. } => READY,
            PeerEvent::DeviceProfile { .. } => DEVICE_PROFILE,
        }
    }
}
