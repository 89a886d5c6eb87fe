//! Selector configuration

use crate::errors::{SelectorError, SelectorResult};
use crate::protocol::Origin;
use serde::{Deserialize, Serialize};

/// Origin serving the viewer configuration page
pub const DEFAULT_PEER_ORIGIN: &str = "https://embed.whatcardboard.com";
/// Path of the embeddable page on [`DEFAULT_PEER_ORIGIN`]
pub const DEFAULT_PEER_PATH: &str = "/v0/1/iframe/";
/// Class name put on the dialog container
pub const DEFAULT_CLASS_NAME: &str = "webvr-polyfill-viewer-selector";

/// Where the embedded peer lives and how the dialog is labelled
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SelectorConfig {
    /// Serialized origin of the peer, also the only accepted sender origin
    pub peer_origin: String,
    /// Path of the peer page, appended to the origin
    pub peer_path: String,
    /// Class name of the dialog container
    pub class_name: String,
}

impl Default for SelectorConfig {
    fn default() -> Self {
        Self {
            peer_origin: DEFAULT_PEER_ORIGIN.to_string(),
            peer_path: DEFAULT_PEER_PATH.to_string(),
            class_name: DEFAULT_CLASS_NAME.to_string(),
        }
    }
}

impl SelectorConfig {
    /// Load from a JSON object. Missing fields take their defaults.
    pub fn from_json_str(json: &str) -> SelectorResult<Self> {
        let raw: serde_json::Value = serde_json::from_str(json)?;
        if !raw.is_object() {
            return Err(SelectorError::invalid_config(
                "configuration must be a JSON object",
            ));
        }
        let config: Self = serde_json::from_value(raw)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration
    pub fn validate(&self) -> SelectorResult<()> {
        Origin::parse(&self.peer_origin)?;

        if !self.peer_path.starts_with('/') {
            return Err(SelectorError::invalid_config(format!(
                "peerPath must start with '/': {}",
                self.peer_path
            )));
        }

        if self.class_name.is_empty() || self.class_name.chars().any(char::is_whitespace) {
            return Err(SelectorError::invalid_config(format!(
                "className must be a single non-empty class: {:?}",
                self.class_name
            )));
        }

        Ok(())
    }

    /// Parsed peer origin
    pub fn origin(&self) -> SelectorResult<Origin> {
        Origin::parse(&self.peer_origin)
    }

    /// Full URL of the embedded page
    pub fn peer_url(&self) -> String {
        format!("{}{}", self.peer_origin, self.peer_path)
    }
}
