// ============================================================================
// src/cmd/set.rs – push an AP_CFG command to the driver
// ============================================================================

use crate::cmd::ApArgs;
use crate::config::Config;
use crate::softap::{ApCfgEncoder, CommandSink};
use crate::ui::UX;
use crate::wext::{PrivateFnSink, WextControl};
use anyhow::{Context, Result};

pub fn run_set(ui: &UX, cfg: &Config, iface: &str, ap: &ApArgs) -> Result<()> {
    let control = WextControl::open().context("open wireless control socket")?;
    let mut sink = PrivateFnSink::new(&control, &cfg.driver.cfg_function);
    apply(ui, cfg, iface, ap, &mut sink)?;
    ui.success(&format!("Softap set on {iface} - Ok"));
    Ok(())
}

/// Resolve `ap` against the configured defaults and deliver it via `sink`.
pub fn apply<S: CommandSink + ?Sized>(
    ui: &UX,
    cfg: &Config,
    iface: &str,
    ap: &ApArgs,
    sink: &mut S,
) -> Result<()> {
    let ap = ap.resolve(&cfg.defaults).context("softap set - bad arguments")?;
    ui.info(&format!(
        "Configuring SSID {} ({}) on {}",
        ap.ssid,
        ap.security.token(),
        iface
    ));
    ApCfgEncoder::new(cfg.driver.command_capacity)
        .encode(&ap, iface, sink)
        .with_context(|| format!("softap set on {iface}"))?;
    Ok(())
}
