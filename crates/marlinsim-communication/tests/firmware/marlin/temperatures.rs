use super::Harness;
use marlinsim_communication::{LineSink, MarlinFirmware, OutputLog};
use marlinsim_core::{CancelToken, FixedNoise, HeaterId, ManualClock, Result};
use std::time::Duration;

const BUSY: &str = "echo:busy: processing";

fn hotend(h: &Harness) -> (f64, f64) {
    let heater = h.fw.state().heaters.get(HeaterId::Hotend);
    (heater.value, heater.target)
}

fn bed(h: &Harness) -> (f64, f64) {
    let heater = h.fw.state().heaters.get(HeaterId::Bed);
    (heater.value, heater.target)
}

#[test]
fn test_first_report_initializes_heaters() {
    let mut h = Harness::new();
    assert_eq!(h.send("M104 S200"), "ok");
    assert_eq!(
        h.send("M105"),
        "ok T:21.25 /200.00 B:21.25 /0.00 @:127 B@:0"
    );
}

#[test]
fn test_hotend_trends_to_target() {
    let mut h = Harness::new();
    h.send("M104 S200");
    h.send("M105");

    let mut last = hotend(&h).0;
    for _ in 0..10 {
        h.clock.advance(Duration::from_secs(10));
        let report = h.send("M105");
        assert!(report.contains("/200.00 B:"));
        assert!(report.ends_with("/0.00 @:127 B@:0"));
        let value = hotend(&h).0;
        assert!(value > last);
        last = value;
    }

    // 100 s at 0.6 °C/s on top of the initial 21.25
    assert!((last - 81.4).abs() < 0.5);
    // the idle bed settles at room temperature
    assert!((bed(&h).0 - 20.0).abs() <= 0.25);
}

#[test]
fn test_converged_heater_stays_within_noise() {
    let mut h = Harness::new();
    h.send("M140 S60");
    for _ in 0..400 {
        h.clock.advance(Duration::from_secs(1));
        h.send("M105");
    }
    for _ in 0..20 {
        h.clock.advance(Duration::from_secs(1));
        h.send("M105");
        let (value, target) = bed(&h);
        assert!((value - target).abs() <= 0.25);
    }
}

#[test]
fn test_set_targets_without_waiting() {
    let mut h = Harness::new();
    assert_eq!(h.send("M140 S60"), "ok");
    assert_eq!(h.send("M104 T0"), "ok");
    assert_eq!(bed(&h).1, 60.0);
    assert_eq!(hotend(&h).1, 0.0);
    assert!(h.out.lines().is_empty());
}

#[test]
fn test_wait_for_hotend() {
    let mut h = Harness::new();
    assert_eq!(h.send("M109 S200"), "");

    let lines = h.out.lines();
    assert!(!lines.is_empty());
    assert_eq!(lines.len() % 3, 0);
    for step in lines.chunks(3) {
        assert_eq!(step[0], BUSY);
        assert!(step[1].starts_with(" T:"));
        assert!(step[2].ends_with(" @:127 B@:0"));
    }
    assert_eq!(
        lines.last().map(String::as_str),
        Some(" T:200.00 /200.00 B:20.00 /0.00 @:127 B@:0")
    );
    let (value, target) = hotend(&h);
    assert_eq!(target, 200.0);
    assert!((value - 200.0).abs() <= 2.0);
}

#[test]
fn test_wait_for_bed_with_r_word() {
    let mut h = Harness::new();
    assert_eq!(h.send("M190 R60"), "");
    let (value, target) = bed(&h);
    assert_eq!(target, 60.0);
    assert!((value - 60.0).abs() <= 2.0);
    assert_eq!(hotend(&h).1, 0.0);
}

#[test]
fn test_wait_without_target_returns_immediately() {
    let mut h = Harness::new();
    assert_eq!(h.send("M109"), "");
    assert!(h.out.lines().is_empty());
    assert!(!h.fw.state().heaters.get(HeaterId::Hotend).is_initialized());
}

/// Sink that cancels the firmware after a number of lines
struct CancellingSink {
    log: OutputLog,
    cancel: CancelToken,
    after: usize,
}

impl LineSink for CancellingSink {
    fn send_line(&mut self, line: &str) -> Result<()> {
        self.log.send_line(line)?;
        if self.log.lines().len() >= self.after {
            self.cancel.cancel();
        }
        Ok(())
    }
}

#[test]
fn test_cancel_interrupts_heating_wait() {
    let cancel = CancelToken::new();
    let mut fw = MarlinFirmware::default()
        .with_clock(ManualClock::new(0))
        .with_noise(FixedNoise(0.5))
        .with_cancel_token(cancel.clone());
    let mut sink = CancellingSink {
        log: OutputLog::new(),
        cancel,
        after: 4,
    };

    let err = fw.process_line("M109 S200", &mut sink).unwrap_err();
    assert!(err.is_cancelled());
    // busy, report, report, busy; the pause after the next report stops
    assert_eq!(sink.log.lines().len(), 5);
    assert_eq!(fw.state().heaters.get(HeaterId::Hotend).target, 200.0);
}
