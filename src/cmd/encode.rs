// ============================================================================
// src/cmd/encode.rs – print the AP_CFG command without touching a device
// ============================================================================

use crate::cmd::ApArgs;
use crate::config::Config;
use crate::softap::{redact, ApCfgEncoder};
use anyhow::{Context, Result};
use zeroize::Zeroizing;

pub fn run_encode(cfg: &Config, ap: &ApArgs, redacted: bool) -> Result<()> {
    let command = render(cfg, ap, redacted)?;
    println!("{}", command.as_str());
    Ok(())
}

pub fn render(cfg: &Config, ap: &ApArgs, redacted: bool) -> Result<Zeroizing<String>> {
    let ap = ap.resolve(&cfg.defaults).context("softap encode - bad arguments")?;
    let command = ApCfgEncoder::new(cfg.driver.command_capacity)
        .build(&ap)
        .context("softap encode")?;
    if redacted {
        Ok(Zeroizing::new(redact(&command)))
    } else {
        Ok(command)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn keyed() -> ApArgs {
        ApArgs {
            ssid: Some("MyNet".to_string()),
            security: Some("wpa2-psk".to_string()),
            passphrase: Some("secretpw".to_string()),
            channel: Some("11".to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn renders_full_command() {
        let out = render(&Config::default(), &keyed(), false).unwrap();
        assert_eq!(
            out.as_str(),
            "ASCII_CMD=AP_CFG,SSID=MyNet,SEC=wpa2-psk,KEY=143e7333f30998a247b0e3cb0d11c2c1a22422b3,CHANNEL=11,PREAMBLE=0,MAX_SCB=8,END"
        );
    }

    #[test]
    fn redaction_masks_only_the_key() {
        let out = render(&Config::default(), &keyed(), true).unwrap();
        assert_eq!(
            out.as_str(),
            "ASCII_CMD=AP_CFG,SSID=MyNet,SEC=wpa2-psk,KEY=<redacted>,CHANNEL=11,PREAMBLE=0,MAX_SCB=8,END"
        );
    }

    #[test]
    fn missing_passphrase_fails() {
        let ap = ApArgs {
            security: Some("wpa-psk".to_string()),
            ..Default::default()
        };
        assert!(render(&Config::default(), &ap, false).is_err());
    }
}
