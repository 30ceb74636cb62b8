use super::Harness;

#[test]
fn test_fan_on_echoes_line() {
    let mut h = Harness::new();
    assert_eq!(h.send("M106 S255"), "M106 S255\nok");
    assert_eq!(h.send("M106 P1 S128"), "M106 P1 S128\nok");
}

#[test]
fn test_fan_off_reports_index() {
    let mut h = Harness::new();
    assert_eq!(h.send("M107"), "M106 P0 S0\nok");
    assert_eq!(h.send("M107 P2"), "M106 P2 S0\nok");
}

#[test]
fn test_feed_rate() {
    let mut h = Harness::new();
    assert_eq!(h.send("M220 S150"), "FR:150%\nok");
    assert_eq!(h.send("M220"), "ok");
    assert_eq!(h.send("M220 B"), "ok");
}
