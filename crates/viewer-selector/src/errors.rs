//! Error type for the viewer selector core
//!
//! Only configuration problems and failures of the hosting surface are
//! surfaced. Protocol-level problems (spoofed origins, unknown message
//! types, undeliverable requests) are dropped with a log line instead.

/// Unified error type for viewer selector operations
#[derive(Debug, thiserror::Error)]
pub enum SelectorError {
    /// The configured peer origin is not a valid tuple origin
    #[error("Invalid origin: {origin}: {reason}")]
    InvalidOrigin {
        /// The rejected origin string
        origin: String,
        /// Why it was rejected
        reason: String,
    },

    /// Configuration failed validation
    #[error("Invalid configuration: {message}")]
    InvalidConfig {
        /// Error message describing the invalid field
        message: String,
    },

    /// The dialog surface could not be built or re-parented
    #[error("Surface error: {message}")]
    Surface {
        /// Error message reported by the hosting surface
        message: String,
    },

    /// A request could not be handed to the embedded peer
    #[error("Transport error: {message}")]
    Transport {
        /// Error message reported by the transport
        message: String,
    },

    /// JSON encoding or decoding failed
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl SelectorError {
    /// Create an invalid origin error
    pub fn invalid_origin(origin: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidOrigin {
            origin: origin.into(),
            reason: reason.into(),
        }
    }

    /// Create an invalid configuration error
    pub fn invalid_config(message: impl Into<String>) -> Self {
        Self::InvalidConfig {
            message: message.into(),
        }
    }

    /// Create a surface error
    pub fn surface(message: impl Into<String>) -> Self {
        Self::Surface {
            message: message.into(),
        }
    }

    /// Create a transport error
    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport {
            message: message.into(),
        }
    }
}

/// Result type for viewer selector operations
pub type SelectorResult<T> = Result<T, SelectorError>;
