use super::Harness;
use marlinsim_core::{AxisMode, Position};
use proptest::prelude::*;

#[test]
fn test_absolute_moves_replace_position() {
    let mut h = Harness::new();
    assert_eq!(h.send("G1 X10 Y20 Z0.3"), "ok");
    assert_eq!(h.send("G0 X15"), "ok");
    assert_eq!(h.fw.state().position, Position::new(15.0, 20.0, 0.3));
    assert!(h.out.lines().is_empty());
}

#[test]
fn test_relative_moves_accumulate() {
    let mut h = Harness::new();
    h.send("G91");
    h.send("G1 X10 Y5");
    h.send("G1 X10");
    assert_eq!(
        h.send("M114"),
        "X:20.00 Y:5.00 Z:0.00 E:0.00 Count X:0 Y:0 Z:0\nok"
    );
}

#[test]
fn test_mode_switch_keeps_position() {
    let mut h = Harness::new();
    h.send("G1 X3 Y4 Z5");
    h.send("G91");
    assert_eq!(h.fw.state().axis_mode, AxisMode::Relative);
    h.send("G90");
    assert_eq!(h.fw.state().axis_mode, AxisMode::Absolute);
    assert_eq!(h.fw.state().position, Position::new(3.0, 4.0, 5.0));
}

#[test]
fn test_numbered_line_with_checksum() {
    let mut h = Harness::new();
    assert_eq!(h.send("N7 G1 X-2.5 F1200*91"), "ok");
    assert_eq!(h.fw.state().position.x, -2.5);
}

#[test]
fn test_malformed_words_are_ignored() {
    let mut h = Harness::new();
    h.send("G1 X5");
    assert_eq!(h.send("G1 Xfoo Y"), "ok");
    assert_eq!(h.fw.state().position, Position::new(5.0, 0.0, 0.0));
}

fn coordinate() -> impl Strategy<Value = f64> {
    (-5000i32..5000).prop_map(|v| f64::from(v) / 10.0)
}

proptest! {
    #[test]
    fn prop_absolute_final_position_is_last_value(moves in prop::collection::vec(coordinate(), 1..20)) {
        let mut h = Harness::new();
        for x in &moves {
            h.send(&format!("G1 X{}", x));
        }
        prop_assert_eq!(h.fw.state().position.x, *moves.last().unwrap());
    }

    #[test]
    fn prop_relative_final_position_is_sum(moves in prop::collection::vec(coordinate(), 1..20)) {
        let mut h = Harness::new();
        h.send("G91");
        for y in &moves {
            h.send(&format!("G1 Y{}", y));
        }
        let expected: f64 = moves.iter().sum();
        prop_assert!((h.fw.state().position.y - expected).abs() < 1e-6);
    }

    #[test]
    fn prop_repeated_absolute_move_is_idempotent(x in coordinate(), z in coordinate()) {
        let mut h = Harness::new();
        let line = format!("G0 X{} Z{}", x, z);
        h.send(&line);
        let first = h.fw.state().position;
        h.send(&line);
        prop_assert_eq!(h.fw.state().position, first);
    }
}
