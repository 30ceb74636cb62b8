//! Word extraction from command lines
//!
//! Parsing is sparse and forgiving: the first matching word wins, anything
//! that does not match (or does not convert) is reported as absent and the
//! caller leaves its field untouched.

use marlinsim_core::Axis;
use regex::Regex;
use std::sync::OnceLock;

fn axis_regex(axis: Axis) -> &'static Regex {
    static X_WORD: OnceLock<Regex> = OnceLock::new();
    static Y_WORD: OnceLock<Regex> = OnceLock::new();
    static Z_WORD: OnceLock<Regex> = OnceLock::new();

    let (cell, pattern) = match axis {
        Axis::X => (&X_WORD, r"X([+-]?\d+(?:\.\d*)?)"),
        Axis::Y => (&Y_WORD, r"Y([+-]?\d+(?:\.\d*)?)"),
        Axis::Z => (&Z_WORD, r"Z([+-]?\d+(?:\.\d*)?)"),
    };
    cell.get_or_init(|| Regex::new(pattern).expect("invalid regex pattern"))
}

/// First capture group of `regex` in `line`
fn capture<'a>(regex: &Regex, line: &'a str) -> Option<&'a str> {
    regex
        .captures(line)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}

/// Coordinate supplied for `axis`, e.g. `X-12.5`
pub fn axis_value(line: &str, axis: Axis) -> Option<f64> {
    capture(axis_regex(axis), line).and_then(|v| v.parse().ok())
}

/// Unsigned `S<value>` setpoint (M104, M140)
pub fn set_temperature(line: &str) -> Option<f64> {
    static S_WORD: OnceLock<Regex> = OnceLock::new();
    let regex =
        S_WORD.get_or_init(|| Regex::new(r"S(\d+(?:\.\d*)?)").expect("invalid regex pattern"));
    capture(regex, line).and_then(|v| v.parse().ok())
}

/// Unsigned `S<value>` or `R<value>` setpoint (M109, M190)
pub fn wait_temperature(line: &str) -> Option<f64> {
    static SR_WORD: OnceLock<Regex> = OnceLock::new();
    let regex =
        SR_WORD.get_or_init(|| Regex::new(r"[SR](\d+(?:\.\d*)?)").expect("invalid regex pattern"));
    capture(regex, line).and_then(|v| v.parse().ok())
}

/// Integer feed-rate percentage digits (M220 `S<n>`), kept verbatim
pub fn feed_rate_percent(line: &str) -> Option<&str> {
    static S_INT: OnceLock<Regex> = OnceLock::new();
    let regex = S_INT.get_or_init(|| Regex::new(r"S(\d+)").expect("invalid regex pattern"));
    capture(regex, line)
}

/// Fan index digits (`P<n>`), kept verbatim
pub fn fan_index(line: &str) -> Option<&str> {
    static P_INT: OnceLock<Regex> = OnceLock::new();
    let regex = P_INT.get_or_init(|| Regex::new(r"P(\d+)").expect("invalid regex pattern"));
    capture(regex, line)
}

/// Axes named anywhere on a homing line; every axis when none is named
pub fn homing_axes(line: &str) -> Vec<Axis> {
    let named: Vec<Axis> = Axis::ALL
        .into_iter()
        .filter(|axis| line.contains(axis.letter()))
        .collect();

    if named.is_empty() {
        Axis::ALL.to_vec()
    } else {
        named
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_axis_values() {
        let line = "G1 X10.5 Y-3 Z+0.25 F3000";
        assert_eq!(axis_value(line, Axis::X), Some(10.5));
        assert_eq!(axis_value(line, Axis::Y), Some(-3.0));
        assert_eq!(axis_value(line, Axis::Z), Some(0.25));
        assert_eq!(axis_value("G1 F1200", Axis::X), None);
        assert_eq!(axis_value("G1 X12.", Axis::X), Some(12.0));
        assert_eq!(axis_value("G1 Xabc", Axis::X), None);
    }

    #[test]
    fn test_temperature_words() {
        assert_eq!(set_temperature("M104 S200"), Some(200.0));
        assert_eq!(set_temperature("M104 S-5"), None);
        assert_eq!(set_temperature("M104 T0"), None);
        assert_eq!(wait_temperature("M109 R215.5"), Some(215.5));
        assert_eq!(wait_temperature("M190 S60"), Some(60.0));
        assert_eq!(wait_temperature("M109"), None);
    }

    #[test]
    fn test_integer_words() {
        assert_eq!(feed_rate_percent("M220 S150"), Some("150"));
        assert_eq!(feed_rate_percent("M220 S1.5"), Some("1"));
        assert_eq!(feed_rate_percent("M220"), None);
        assert_eq!(fan_index("M107 P2"), Some("2"));
        assert_eq!(fan_index("M107"), None);
    }

    #[test]
    fn test_homing_axes() {
        assert_eq!(homing_axes("G28"), Axis::ALL.to_vec());
        assert_eq!(homing_axes("G28 X"), vec![Axis::X]);
        assert_eq!(homing_axes("G28 Z X"), vec![Axis::X, Axis::Z]);
        assert_eq!(homing_axes("N12 G28*45"), Axis::ALL.to_vec());
    }
}
