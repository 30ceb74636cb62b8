use super::Harness;
use marlinsim_core::{Clock, Position};

const BUSY: &str = "echo:busy: processing";

#[test]
fn test_home_all_axes_after_three_busy_steps() {
    let mut h = Harness::new();
    h.send("G1 X10 Y20 Z30");

    assert_eq!(h.send("G28"), "ok");
    assert_eq!(h.out.lines(), vec![BUSY, BUSY, BUSY]);
    assert_eq!(h.fw.state().position, Position::default());
    // two line delays plus three busy intervals
    assert_eq!(h.clock.now_ms(), 3_020);
}

#[test]
fn test_home_single_axis() {
    let mut h = Harness::new();
    h.send("G1 X10 Y20 Z30");
    h.send("G28 X");
    assert_eq!(h.fw.state().position, Position::new(0.0, 20.0, 30.0));

    h.send("G28 Y Z");
    assert_eq!(h.fw.state().position, Position::default());
}

#[test]
fn test_numbered_home() {
    let mut h = Harness::new();
    h.send("G1 X10 Y20 Z30");
    assert_eq!(h.send("N4 G28*17"), "ok");
    assert_eq!(h.out.count(BUSY), 3);
    assert_eq!(h.fw.state().position, Position::default());
}

#[test]
fn test_cancel_stops_homing_before_zeroing() {
    let mut h = Harness::new();
    h.send("G1 X10");
    h.fw.cancel_token().cancel();

    let err = h.fw.process_line("G28", &mut h.out).unwrap_err();
    assert!(err.is_cancelled());
    assert_eq!(h.fw.state().position.x, 10.0);
}
