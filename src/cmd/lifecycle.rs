// ============================================================================
// src/cmd/lifecycle.rs – BSS start / stop
// ============================================================================

use crate::config::Driver;
use crate::softap::{bss_control, BssAction};
use crate::ui::UX;
use crate::wext::{PrivateFnSink, WextControl};
use anyhow::{Context, Result};

/// Driver private function carrying `action`.
pub fn function_for(driver: &Driver, action: BssAction) -> &str {
    match action {
        BssAction::Start => driver.start_function.as_str(),
        BssAction::Stop => driver.stop_function.as_str(),
    }
}

pub fn run_bss(ui: &UX, driver: &Driver, iface: &str, action: BssAction) -> Result<()> {
    let control = WextControl::open().context("open wireless control socket")?;
    let mut sink = PrivateFnSink::new(&control, function_for(driver, action));
    bss_control(&mut sink, iface, action).with_context(|| format!("softap {action} on {iface}"))?;
    ui.success(&format!("Softap {action} on {iface} - Ok"));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn actions_map_to_configured_functions() {
        let mut driver = Driver::default();
        assert_eq!(function_for(&driver, BssAction::Start), "AP_BSS_START");
        assert_eq!(function_for(&driver, BssAction::Stop), "WL_AP_STOP");

        driver.stop_function = "AP_BSS_STOP".to_string();
        assert_eq!(function_for(&driver, BssAction::Stop), "AP_BSS_STOP");
    }
}
