// ============================================================================
// src/softap.rs – AP_CFG command assembly and driver hand-off
// ============================================================================
//! Turns a [`SoftApConfig`] into the driver's fixed-grammar private command
//!
//! `ASCII_CMD=AP_CFG,SSID=..,SEC=..,KEY=..,CHANNEL=..,PREAMBLE=..,MAX_SCB=..,END`
//!
//! and passes it to a [`CommandSink`]. Field order is dictated by the driver's
//! parser and must not change.

use crate::command::{CommandBuffer, DEFAULT_CAPACITY};
use crate::error::SoftapError;
use crate::util::kdf::{self, PSK_ITERATIONS, SHA1_LEN};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::io;
use std::str::FromStr;
use tracing::{debug, error, info};
use zeroize::Zeroizing;

/// KEY value sent for open networks; the driver ignores it but the grammar
/// requires the field.
pub const OPEN_KEY_PLACEHOLDER: &str = "12345678";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Security {
    #[default]
    #[serde(rename = "open")]
    Open,
    #[serde(rename = "wpa-psk")]
    WpaPsk,
    #[serde(rename = "wpa2-psk")]
    Wpa2Psk,
}

impl Security {
    pub fn token(self) -> &'static str {
        match self {
            Security::Open => "open",
            Security::WpaPsk => "wpa-psk",
            Security::Wpa2Psk => "wpa2-psk",
        }
    }

    /// Pre-shared-key modes need a passphrase.
    pub fn is_keyed(self) -> bool {
        !matches!(self, Security::Open)
    }
}

impl FromStr for Security {
    type Err = SoftapError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "open" => Ok(Security::Open),
            "wpa-psk" => Ok(Security::WpaPsk),
            "wpa2-psk" => Ok(Security::Wpa2Psk),
            other => Err(SoftapError::invalid_config(format!(
                "unknown security mode {other:?} (expected open, wpa-psk or wpa2-psk)"
            ))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum Preamble {
    #[default]
    Long,
    Short,
}

impl TryFrom<u8> for Preamble {
    type Error = SoftapError;

    fn try_from(v: u8) -> Result<Self, Self::Error> {
        match v {
            0 => Ok(Preamble::Long),
            1 => Ok(Preamble::Short),
            other => Err(SoftapError::invalid_config(format!(
                "preamble must be 0 (long) or 1 (short), got {other}"
            ))),
        }
    }
}

impl From<Preamble> for u8 {
    fn from(p: Preamble) -> u8 {
        match p {
            Preamble::Long => 0,
            Preamble::Short => 1,
        }
    }
}

impl FromStr for Preamble {
    type Err = SoftapError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "0" | "long" => Ok(Preamble::Long),
            "1" | "short" => Ok(Preamble::Short),
            other => Err(SoftapError::invalid_config(format!(
                "preamble must be 0/long or 1/short, got {other:?}"
            ))),
        }
    }
}

/// Fully resolved AP parameters. Defaults have already been applied by the
/// caller; nothing here is filled in during encoding.
#[derive(Clone)]
pub struct SoftApConfig {
    pub ssid: String,
    pub security: Security,
    pub passphrase: Option<Zeroizing<String>>,
    pub channel: u8,
    pub preamble: Preamble,
    pub max_stations: u16,
}

impl fmt::Debug for SoftApConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SoftApConfig")
            .field("ssid", &self.ssid)
            .field("security", &self.security)
            .field("passphrase", &self.passphrase.as_ref().map(|_| "<redacted>"))
            .field("channel", &self.channel)
            .field("preamble", &self.preamble)
            .field("max_stations", &self.max_stations)
            .finish()
    }
}

impl SoftApConfig {
    pub fn validate(&self) -> Result<(), SoftapError> {
        if self.ssid.is_empty() {
            return Err(SoftapError::invalid_config("SSID is empty"));
        }
        if self.ssid.contains(',') {
            return Err(SoftapError::invalid_config(
                "SSID may not contain ',' (field separator)",
            ));
        }
        if self.security.is_keyed() && self.passphrase.as_ref().map_or(true, |p| p.is_empty()) {
            return Err(SoftapError::invalid_config(format!(
                "security {} requires a passphrase",
                self.security.token()
            )));
        }
        if self.max_stations == 0 {
            return Err(SoftapError::invalid_config("max stations must be >= 1"));
        }
        Ok(())
    }
}

/// Transport for finished commands, e.g. a driver private ioctl.
pub trait CommandSink {
    fn send(&mut self, iface: &str, payload: &[u8]) -> io::Result<()>;
}

/// Builds AP_CFG commands into a buffer of `capacity` bytes.
#[derive(Debug, Clone, Copy)]
pub struct ApCfgEncoder {
    capacity: usize,
}

impl Default for ApCfgEncoder {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

impl ApCfgEncoder {
    pub fn new(capacity: usize) -> Self {
        Self { capacity }
    }

    /// Assemble the complete command without delivering it.
    pub fn build(&self, config: &SoftApConfig) -> Result<Zeroizing<String>, SoftapError> {
        config.validate()?;

        let mut buf = CommandBuffer::new(self.capacity);
        buf.append_field("ASCII_CMD", "AP_CFG")?;
        buf.append_field("SSID", &config.ssid)?;
        buf.append_field("SEC", config.security.token())?;

        let key = if config.security.is_keyed() {
            let passphrase = config
                .passphrase
                .as_deref()
                .ok_or_else(|| SoftapError::invalid_config("passphrase missing"))?;
            kdf::derive(passphrase, &config.ssid, PSK_ITERATIONS, SHA1_LEN)?.to_hex()
        } else {
            Zeroizing::new(OPEN_KEY_PLACEHOLDER.to_string())
        };
        buf.append_field("KEY", &key)?;

        buf.append_field("CHANNEL", &config.channel.to_string())?;
        buf.append_field("PREAMBLE", &u8::from(config.preamble).to_string())?;
        buf.append_field("MAX_SCB", &config.max_stations.to_string())?;
        debug!(cursor = buf.cursor(), capacity = buf.capacity(), "AP_CFG fields written");

        buf.finish()
    }

    /// Build the command and hand it to `sink` for `iface`. Nothing reaches
    /// the sink unless the whole command was assembled.
    pub fn encode<S: CommandSink + ?Sized>(
        &self,
        config: &SoftApConfig,
        iface: &str,
        sink: &mut S,
    ) -> Result<(), SoftapError> {
        let command = self.build(config)?;
        debug!(iface, command = %redact(&command), "sending AP_CFG");

        sink.send(iface, command.as_bytes()).map_err(|source| {
            error!(iface, %source, "softap set - failed");
            SoftapError::SinkFailure {
                iface: iface.to_string(),
                source,
            }
        })?;

        info!(iface, ssid = %config.ssid, security = config.security.token(), "softap set - ok");
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BssAction {
    Start,
    Stop,
}

impl fmt::Display for BssAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            BssAction::Start => "start",
            BssAction::Stop => "stop",
        })
    }
}

/// Send the payload-less BSS start/stop command. `sink` must already be
/// bound to the driver function for `action`.
pub fn bss_control<S: CommandSink + ?Sized>(
    sink: &mut S,
    iface: &str,
    action: BssAction,
) -> Result<(), SoftapError> {
    sink.send(iface, &[]).map_err(|source| {
        error!(iface, %action, %source, "softap bss control failed");
        SoftapError::SinkFailure {
            iface: iface.to_string(),
            source,
        }
    })?;
    info!(iface, %action, "softap bss control - ok");
    Ok(())
}

/// Command text with the KEY value masked, for logs and `--redact` output.
pub fn redact(command: &str) -> String {
    command
        .split(',')
        .map(|field| {
            if field.starts_with("KEY=") {
                "KEY=<redacted>"
            } else {
                field
            }
        })
        .collect::<Vec<_>>()
        .join(",")
}
