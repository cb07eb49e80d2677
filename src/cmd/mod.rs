// ============================================================================
// src/cmd/mod.rs – command subsystem root + AP argument resolution
// ============================================================================
pub mod encode; // softapctl encode
pub mod lifecycle; // softapctl start | stop
pub mod set; // softapctl set

use crate::config::ApDefaults;
use crate::error::SoftapError;
use crate::softap::{SoftApConfig, Security};
use clap::Args;
use std::str::FromStr;
use tracing::warn;
use zeroize::Zeroizing;

/// Positional AP parameters, in the order the legacy `softap set` took them.
/// Anything omitted falls back to `[defaults]` from the config file.
#[derive(Clone, Default, Args)]
pub struct ApArgs {
    /// Network name
    #[arg(value_name = "SSID")]
    pub ssid: Option<String>,
    /// open | wpa-psk | wpa2-psk
    #[arg(value_name = "SECURITY")]
    pub security: Option<String>,
    /// WPA passphrase (ignored for open networks)
    #[arg(value_name = "PASSPHRASE")]
    pub passphrase: Option<String>,
    /// Channel number (0 lets the driver choose)
    #[arg(value_name = "CHANNEL")]
    pub channel: Option<String>,
    /// 0 = long, 1 = short
    #[arg(value_name = "PREAMBLE")]
    pub preamble: Option<String>,
    /// Maximum associated stations
    #[arg(value_name = "MAX_SCB")]
    pub max_scb: Option<String>,
}

impl ApArgs {
    /// Apply defaults and parse every field into a [`SoftApConfig`].
    pub fn resolve(&self, defaults: &ApDefaults) -> Result<SoftApConfig, SoftapError> {
        let security = match &self.security {
            Some(raw) => raw.parse::<Security>()?,
            None => defaults.security,
        };

        let passphrase = match &self.passphrase {
            Some(_) if !security.is_keyed() => {
                warn!("passphrase given for an open network; ignoring it");
                None
            }
            Some(p) => Some(Zeroizing::new(p.clone())),
            None => None,
        };

        let channel = match &self.channel {
            Some(raw) => parse_number(raw, "channel")?,
            None => defaults.channel,
        };
        let preamble = match &self.preamble {
            Some(raw) => raw.parse()?,
            None => defaults.preamble,
        };
        let max_stations = match &self.max_scb {
            Some(raw) => parse_number(raw, "max stations")?,
            None => defaults.max_stations,
        };

        Ok(SoftApConfig {
            ssid: self.ssid.clone().unwrap_or_else(|| defaults.ssid.clone()),
            security,
            passphrase,
            channel,
            preamble,
            max_stations,
        })
    }
}

fn parse_number<T: FromStr>(raw: &str, what: &str) -> Result<T, SoftapError> {
    raw.trim()
        .parse()
        .map_err(|_| SoftapError::invalid_config(format!("{what} {raw:?} is not a valid number")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::softap::Preamble;

    fn args(fields: &[&str]) -> ApArgs {
        let mut it = fields.iter().map(|s| s.to_string());
        ApArgs {
            ssid: it.next(),
            security: it.next(),
            passphrase: it.next(),
            channel: it.next(),
            preamble: it.next(),
            max_scb: it.next(),
        }
    }

    #[test]
    fn empty_args_take_every_default() {
        let cfg = ApArgs::default().resolve(&ApDefaults::default()).unwrap();
        assert_eq!(cfg.ssid, "AndroidAP");
        assert_eq!(cfg.security, Security::Open);
        assert!(cfg.passphrase.is_none());
        assert_eq!(cfg.channel, 6);
        assert_eq!(cfg.preamble, Preamble::Long);
        assert_eq!(cfg.max_stations, 8);
    }

    #[test]
    fn explicit_args_override_defaults() {
        let cfg = args(&["MyNet", "wpa2-psk", "secretpw", "11", "1", "4"])
            .resolve(&ApDefaults::default())
            .unwrap();
        assert_eq!(cfg.ssid, "MyNet");
        assert_eq!(cfg.security, Security::Wpa2Psk);
        assert_eq!(cfg.passphrase.as_deref().map(String::as_str), Some("secretpw"));
        assert_eq!(cfg.channel, 11);
        assert_eq!(cfg.preamble, Preamble::Short);
        assert_eq!(cfg.max_stations, 4);
    }

    #[test]
    fn open_network_drops_passphrase() {
        let cfg = args(&["Cafe", "open", "ignored!"])
            .resolve(&ApDefaults::default())
            .unwrap();
        assert!(cfg.passphrase.is_none());
    }

    #[test]
    fn malformed_fields_are_invalid_config() {
        let defaults = ApDefaults::default();
        for bad in [
            args(&["n", "wep"]),
            args(&["n", "open", "x", "six"]),
            args(&["n", "open", "x", "300"]),
            args(&["n", "open", "x", "6", "2"]),
            args(&["n", "open", "x", "6", "0", "-1"]),
        ] {
            assert!(matches!(
                bad.resolve(&defaults),
                Err(SoftapError::InvalidConfig(_))
            ));
        }
    }
}
