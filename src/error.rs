// ============================================================================
// src/error.rs – error kinds surfaced by the SoftAP command path
// ============================================================================

use std::io;
use thiserror::Error;

/// Every failure the encode/deliver path can produce. None of these are
/// retried or replaced with defaults by the core.
#[derive(Debug, Error)]
pub enum SoftapError {
    /// The configuration record cannot be encoded (missing passphrase for a
    /// keyed mode, malformed numeric field, unknown token, bad SSID).
    #[error("invalid softap config: {0}")]
    InvalidConfig(String),

    /// Key-derivation inputs outside their contract.
    #[error("invalid key derivation parameter: {0}")]
    InvalidParameter(String),

    /// The assembled command would not fit in the driver buffer.
    #[error("command too big: {needed} bytes needed, capacity is {capacity}")]
    BufferOverflow { needed: usize, capacity: usize },

    /// The transport rejected the command or could not deliver it.
    #[error("delivery to {iface} failed: {source}")]
    SinkFailure {
        iface: String,
        #[source]
        source: io::Error,
    },
}

impl SoftapError {
    pub(crate) fn invalid_config(msg: impl Into<String>) -> Self {
        Self::InvalidConfig(msg.into())
    }

    pub(crate) fn invalid_parameter(msg: impl Into<String>) -> Self {
        Self::InvalidParameter(msg.into())
    }
}
