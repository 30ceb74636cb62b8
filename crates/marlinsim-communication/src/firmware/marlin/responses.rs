//! Response line formats
//!
//! Numeric fields use two decimals, matching what Marlin prints and what
//! host parsers expect.

use marlinsim_core::{HeaterId, Heaters, Position};

/// Command acknowledgement
pub const OK: &str = "ok";

/// Keep-alive emitted once per busy interval during long operations
pub const BUSY: &str = "echo:busy: processing";

/// Append an acknowledgement line
pub fn with_ok(line: &str) -> String {
    format!("{}\n{}", line, OK)
}

/// Temperature report, e.g. `ok T:200.12 /200.00 B:60.03 /60.00 @:127 B@:0`
///
/// Without the acknowledgement the report keeps its leading space, as
/// Marlin's auto-report does during blocking heats.
pub fn temperature_report(heaters: &Heaters, acknowledge: bool) -> String {
    let mut report = String::from(if acknowledge { "ok " } else { " " });
    for id in HeaterId::ALL {
        let heater = heaters.get(id);
        if id != HeaterId::Hotend {
            report.push(' ');
        }
        report.push_str(&format!(
            "{}:{:.2} /{:.2}",
            id.report_label(),
            heater.value,
            heater.target
        ));
    }
    report.push_str(" @:127 B@:0");
    report
}

/// Position report followed by `ok`
pub fn position_report(position: &Position) -> String {
    with_ok(&format!(
        "X:{:.2} Y:{:.2} Z:{:.2} E:0.00 Count X:0 Y:0 Z:0",
        position.x, position.y, position.z
    ))
}

/// Feed-rate report followed by `ok`
pub fn feed_rate_report(percent: &str) -> String {
    with_ok(&format!("FR:{}%", percent))
}

/// Fan-off echo followed by `ok`
pub fn fan_off_report(index: &str) -> String {
    with_ok(&format!("M106 P{} S0", index))
}
