//! Scenarios shipped with the crate.

use super::Scenario;
use crate::expectations;

/// Boot of the ESP-IDF IR NEC transceiver example up to the first
/// received frame.
///
/// The six `IR_main` setup steps must log in order, then a decoded frame
/// must start. Every step uses the runner's default timeout.
#[must_use]
pub fn ir_nec_transceiver() -> Scenario {
    Scenario::from_static(
        "ir_nec_transceiver",
        expectations![
            "IR_main: create RMT RX channel",
            "IR_main: register RX done callback",
            "IR_main: create RMT TX channel",
            "IR_main: modulate carrier to TX channel",
            "IR_main: install IR NEC encoder",
            "IR_main: enable RMT TX and RX channels",
            "NEC frame start---",
        ],
    )
}

/// Look up a built-in scenario by name.
///
/// Accepts the scenario name and the short alias used on the command line.
#[must_use]
pub fn by_name(name: &str) -> Option<Scenario> {
    match name {
        "ir-nec" | "ir_nec_transceiver" => Some(ir_nec_transceiver()),
        _ => None,
    }
}

/// Names accepted by [`by_name`].
pub const NAMES: &[&str] = &["ir-nec", "ir_nec_transceiver"];
