// ============================================================================
// src/config.rs – strict config loader (AP defaults + driver constants)
// ============================================================================

use crate::command::DEFAULT_CAPACITY;
use crate::softap::{Preamble, Security};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use tracing::debug;

pub const DEFAULT_CONFIG_PATH: &str = "/etc/softapctl/softapctl.toml";

/// Values substituted for AP parameters the caller leaves out.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ApDefaults {
    #[serde(default = "default_ssid")]
    pub ssid: String,
    #[serde(default)]
    pub security: Security,
    #[serde(default = "default_channel")]
    pub channel: u8,
    #[serde(default)]
    pub preamble: Preamble,
    #[serde(default = "default_max_stations")]
    pub max_stations: u16,
}

fn default_ssid() -> String {
    "AndroidAP".to_string()
}

fn default_channel() -> u8 {
    6
}

fn default_max_stations() -> u16 {
    8
}

impl Default for ApDefaults {
    fn default() -> Self {
        Self {
            ssid: default_ssid(),
            security: Security::default(),
            channel: default_channel(),
            preamble: Preamble::default(),
            max_stations: default_max_stations(),
        }
    }
}

/// Driver-specific protocol constants. Only change these to match a driver
/// that was built with a different control buffer or private table.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Driver {
    /// Maximum command length in bytes, excluding the NUL added on delivery.
    #[serde(default = "default_capacity")]
    pub command_capacity: usize,
    #[serde(default = "default_cfg_function")]
    pub cfg_function: String,
    #[serde(default = "default_start_function")]
    pub start_function: String,
    #[serde(default = "default_stop_function")]
    pub stop_function: String,
}

fn default_capacity() -> usize {
    DEFAULT_CAPACITY
}

fn default_cfg_function() -> String {
    "WL_AP_CFG".to_string()
}

fn default_start_function() -> String {
    "AP_BSS_START".to_string()
}

fn default_stop_function() -> String {
    "WL_AP_STOP".to_string()
}

impl Default for Driver {
    fn default() -> Self {
        Self {
            command_capacity: default_capacity(),
            cfg_function: default_cfg_function(),
            start_function: default_start_function(),
            stop_function: default_stop_function(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    #[serde(default)]
    pub defaults: ApDefaults,
    #[serde(default)]
    pub driver: Driver,
}

impl Config {
    pub fn load<P: AsRef<Path>>(p: P) -> Result<Self> {
        let s = fs::read_to_string(&p)
            .with_context(|| format!("read config: {}", p.as_ref().display()))?;
        let cfg: Self = match p.as_ref().extension().and_then(|e| e.to_str()) {
            Some("toml") => toml::from_str(&s).context("toml parse")?,
            Some("json") => serde_json::from_str(&s).context("json parse")?,
            _ => serde_yaml::from_str(&s).context("yaml parse")?,
        };
        Ok(cfg)
    }

    /// Load an explicit path, else the system path if present, else built-ins.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        if let Some(p) = path {
            return Self::load(p);
        }
        let system = Path::new(DEFAULT_CONFIG_PATH);
        if system.is_file() {
            return Self::load(system);
        }
        debug!("no config at {DEFAULT_CONFIG_PATH}; using built-in defaults");
        Ok(Self::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::Builder;

    fn write_temp(suffix: &str, body: &str) -> tempfile::NamedTempFile {
        let mut f = Builder::new().suffix(suffix).tempfile().unwrap();
        f.write_all(body.as_bytes()).unwrap();
        f
    }

    #[test]
    fn builtin_defaults_match_legacy_controller() {
        let cfg = Config::default();
        assert_eq!(cfg.defaults.ssid, "AndroidAP");
        assert_eq!(cfg.defaults.security, Security::Open);
        assert_eq!(cfg.defaults.channel, 6);
        assert_eq!(cfg.defaults.preamble, Preamble::Long);
        assert_eq!(cfg.defaults.max_stations, 8);
        assert_eq!(cfg.driver.command_capacity, 1024);
        assert_eq!(cfg.driver.cfg_function, "WL_AP_CFG");
        assert_eq!(cfg.driver.start_function, "AP_BSS_START");
        assert_eq!(cfg.driver.stop_function, "WL_AP_STOP");
    }

    #[test]
    fn loads_partial_toml() {
        let f = write_temp(
            ".toml",
            "[defaults]\nssid = \"Lab\"\nsecurity = \"wpa2-psk\"\npreamble = 1\n\n[driver]\ncommand_capacity = 256\n",
        );
        let cfg = Config::load(f.path()).unwrap();
        assert_eq!(cfg.defaults.ssid, "Lab");
        assert_eq!(cfg.defaults.security, Security::Wpa2Psk);
        assert_eq!(cfg.defaults.preamble, Preamble::Short);
        assert_eq!(cfg.defaults.channel, 6);
        assert_eq!(cfg.driver.command_capacity, 256);
        assert_eq!(cfg.driver.cfg_function, "WL_AP_CFG");
    }

    #[test]
    fn loads_yaml_and_json() {
        let y = write_temp(".yaml", "defaults:\n  channel: 11\n  max_stations: 4\n");
        let cfg = Config::load(y.path()).unwrap();
        assert_eq!(cfg.defaults.channel, 11);
        assert_eq!(cfg.defaults.max_stations, 4);

        let j = write_temp(".json", r#"{"driver": {"stop_function": "AP_STOP"}}"#);
        let cfg = Config::load(j.path()).unwrap();
        assert_eq!(cfg.driver.stop_function, "AP_STOP");
        assert_eq!(cfg.defaults.ssid, "AndroidAP");
    }

    #[test]
    fn rejects_bad_values_and_unknown_keys() {
        let bad_preamble = write_temp(".toml", "[defaults]\npreamble = 3\n");
        assert!(Config::load(bad_preamble.path()).is_err());

        let bad_security = write_temp(".toml", "[defaults]\nsecurity = \"wep\"\n");
        assert!(Config::load(bad_security.path()).is_err());

        let unknown = write_temp(".toml", "[driver]\nbuffer = 10\n");
        assert!(Config::load(unknown.path()).is_err());
    }

    #[test]
    fn explicit_missing_path_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("absent.toml");
        assert!(Config::load_or_default(Some(missing.as_path())).is_err());
    }
}
