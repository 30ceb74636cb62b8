use super::Harness;
use marlinsim_core::Clock;

const BUSY: &str = "echo:busy: processing";

#[test]
fn test_bed_leveling_session() {
    let mut h = Harness::new();
    assert_eq!(h.send("G29 V4"), "ok");

    let lines = h.out.lines();
    assert_eq!(lines.len(), 1 + 3 + 16 * 4 + 6);
    assert_eq!(lines[0], " G29 Auto Bed Leveling");
    assert_eq!(&lines[1..4], &[BUSY, BUSY, BUSY]);
    assert_eq!(lines[4], "Bed X: 50.000 Y: 50.000 Z: 0.000");
    assert_eq!(lines[8], "Bed X: 133.000 Y: 50.000 Z: 0.016");
    assert_eq!(lines[64], "Bed X: 50.000 Y: 299.000 Z: -0.046");
    assert_eq!(lines[68], "Bilinear Leveling Grid:");
    assert_eq!(lines[69], "      0      1      2      3");
    assert_eq!(lines[73], " 3 -0.0463 -0.0363 -0.0638 -0.0175");
    assert_eq!(h.out.count(BUSY), 51);
    assert_eq!(h.clock.now_ms(), 51_010);
}

#[test]
fn test_plain_g29_is_only_acknowledged() {
    let mut h = Harness::new();
    assert_eq!(h.send("G29"), "ok");
    assert!(h.out.lines().is_empty());
}
