//! Protocol constants and stream configuration.

use serde::{Deserialize, Serialize};
use subs_protocol::VersionValidator;

/// The protocol version this implementation speaks.
pub const PROTOCOL_VERSION: &str = "1.0";

/// The TCP port peers use unless told otherwise.
pub const DEFAULT_PORT: u16 = 4610;

/// Maximum number of bytes taken from the transport per receive.
///
/// One read is assumed to hold exactly one whole packet. Packets are
/// well under this size, but there is no framing on the wire, so a peer
/// that coalesces or splits writes will break this assumption.
pub const DEFAULT_READ_SIZE: usize = 1024;

/// Configuration for a [`Stream`](crate::Stream).
///
/// Create one with `StreamConfig::default()` and override just the fields
/// you care about.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StreamConfig {
    /// The protocol version stamped on and expected from every packet.
    pub version: String,

    /// Maximum bytes per transport read. Must be non-zero.
    pub read_size: usize,
}

impl Default for StreamConfig {
    fn default() -> Self {
        Self {
            version: PROTOCOL_VERSION.to_string(),
            read_size: DEFAULT_READ_SIZE,
        }
    }
}

impl StreamConfig {
    /// Builds the standard validator for this configuration's version.
    pub fn validator(&self) -> VersionValidator {
        VersionValidator::new(self.version.clone())
    }
}
