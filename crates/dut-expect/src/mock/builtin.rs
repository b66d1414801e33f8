//! Built-in mock DUT logs.
//!
//! These reproduce real device output closely enough to exercise the
//! matcher end to end: ESP-IDF colour codes, ROM boot chatter, and the
//! `\r\n`-terminated frame dump of the IR NEC transceiver example.

use std::time::Duration;

use super::event::{EventTimeline, MockEvent};

/// NEC address sent by the IR transceiver example.
pub const IR_NEC_ADDRESS: u16 = 0xFE01;

/// NEC command sent by the IR transceiver example.
pub const IR_NEC_COMMAND: u16 = 0x748B;

/// The lines printed by the IR NEC firmware between boot and the first
/// decoded frame, in order, without colour codes.
pub const IR_NEC_MILESTONES: [&str; 7] = [
    "IR_main: create RMT RX channel",
    "IR_main: register RX done callback",
    "IR_main: create RMT TX channel",
    "IR_main: modulate carrier to TX channel",
    "IR_main: install IR NEC encoder",
    "IR_main: enable RMT TX and RX channels",
    "NEC frame start---",
];

const LEADING: (u32, u32) = (9000, 4500);
const PAYLOAD_MARK: u32 = 560;
const ZERO_SPACE: u32 = 560;
const ONE_SPACE: u32 = 1690;

fn esp_log(level: char, millis: u32, tag: &str, message: &str) -> String {
    let colour = match level {
        'E' => "0;31",
        'W' => "0;33",
        _ => "0;32",
    };
    format!("\x1b[{colour}m{level} ({millis}) {tag}: {message}\x1b[0m")
}

/// The RMT symbol dump for one NEC frame, as printed by the example.
///
/// Address and command are sent least significant bit first.
#[must_use]
pub fn nec_symbol_lines(address: u16, command: u16) -> Vec<String> {
    let payload = u32::from(address) | (u32::from(command) << 16);

    let mut lines = Vec::with_capacity(34);
    lines.push(format!("{{0:{}}},{{1:{}}}", LEADING.0, LEADING.1));
    for bit in 0..32 {
        let space = if payload >> bit & 1 == 1 { ONE_SPACE } else { ZERO_SPACE };
        lines.push(format!("{{0:{PAYLOAD_MARK}}},{{1:{space}}}"));
    }
    lines.push(format!("{{0:{PAYLOAD_MARK}}},{{1:0}}"));
    lines
}

/// A realistic boot and receive log of the ESP-IDF IR NEC transceiver
/// example, ending in `Eof`.
///
/// Lines keep their ANSI colour codes, as a raw serial capture would.
#[must_use]
pub fn ir_nec_boot_log() -> EventTimeline {
    let mut events = vec![
        MockEvent::line("ESP-ROM:esp32s3-20210327"),
        MockEvent::line("Build:Mar 27 2021"),
        MockEvent::line("rst:0x1 (POWERON),boot:0x8 (SPI_FAST_FLASH_BOOT)"),
        MockEvent::line("SPIWP:0xee"),
        MockEvent::line("mode:DIO, clock div:1"),
        MockEvent::line("entry 0x403c9908"),
        MockEvent::delay_ms(20),
        MockEvent::line(esp_log('I', 27, "boot", "ESP-IDF v5.1 2nd stage bootloader")),
        MockEvent::line(esp_log('I', 31, "boot", "chip revision: v0.1")),
        MockEvent::line(esp_log('I', 96, "boot", "Loaded app from partition at offset 0x10000")),
        MockEvent::delay_ms(20),
        MockEvent::line(esp_log('I', 254, "cpu_start", "Pro cpu start user code")),
        MockEvent::line(esp_log('I', 289, "main_task", "Calling app_main()")),
    ];

    let milestones = [301, 312, 318, 325, 330, 336];
    for (millis, line) in milestones.into_iter().zip(&IR_NEC_MILESTONES[..6]) {
        let message = line.trim_start_matches("IR_main: ");
        events.push(MockEvent::line(esp_log('I', millis, "IR_main", message)));
        events.push(MockEvent::delay(Duration::from_millis(5)));
    }

    events.push(MockEvent::delay_ms(150));
    events.push(MockEvent::line(IR_NEC_MILESTONES[6]));
    events.extend(
        nec_symbol_lines(IR_NEC_ADDRESS, IR_NEC_COMMAND)
            .into_iter()
            .map(MockEvent::Line),
    );
    events.push(MockEvent::line(format!(
        "---NEC frame end: Address={IR_NEC_ADDRESS:04X}, Command={IR_NEC_COMMAND:04X}"
    )));
    events.push(MockEvent::line(""));
    events.push(MockEvent::line(esp_log(
        'I',
        1354,
        "IR_main",
        "Replaying stored NEC frame with 34 symbols",
    )));
    events.push(MockEvent::eof());

    EventTimeline::from_events(events)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lines(timeline: &EventTimeline) -> Vec<&str> {
        timeline
            .events()
            .iter()
            .filter_map(|e| match e {
                MockEvent::Line(l) => Some(l.as_str()),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn symbol_dump_has_leading_payload_and_stop() {
        let dump = nec_symbol_lines(IR_NEC_ADDRESS, IR_NEC_COMMAND);
        assert_eq!(dump.len(), 34);
        assert_eq!(dump[0], "{0:9000},{1:4500}");
        // 0xFE01: bit 0 set, bits 1..=8 clear.
        assert_eq!(dump[1], "{0:560},{1:1690}");
        assert_eq!(dump[2], "{0:560},{1:560}");
        assert_eq!(dump[33], "{0:560},{1:0}");
    }

    #[test]
    fn boot_log_contains_milestones_in_order() {
        let timeline = ir_nec_boot_log();
        let lines = lines(&timeline);
        let mut from = 0;
        for milestone in IR_NEC_MILESTONES {
            let pos = lines[from..]
                .iter()
                .position(|l| l.contains(milestone))
                .unwrap_or_else(|| panic!("missing {milestone}"));
            from += pos + 1;
        }
        assert!(lines.iter().any(|l| l.contains("Address=FE01, Command=748B")));
        assert_eq!(timeline.events().last(), Some(&MockEvent::Eof));
    }

    #[test]
    fn app_lines_are_coloured() {
        let timeline = ir_nec_boot_log();
        let coloured = lines(&timeline)
            .into_iter()
            .find(|l| l.contains("create RMT RX channel"))
            .unwrap();
        assert!(coloured.starts_with("\x1b[0;32mI (301) IR_main: "));
        assert!(coloured.ends_with("\x1b[0m"));
    }
}
