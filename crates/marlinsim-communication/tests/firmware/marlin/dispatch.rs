use super::Harness;

#[test]
fn test_unknown_commands_are_acknowledged() {
    let mut h = Harness::new();
    assert_eq!(h.send("M117 Printing..."), "ok");
    assert_eq!(h.send("G4 P500"), "ok");
    assert_eq!(h.send("N99 M110*15"), "ok");
}

#[test]
fn test_non_commands_are_silent() {
    let mut h = Harness::new();
    assert_eq!(h.send(""), "");
    assert_eq!(h.send("echo:hello"), "");
    assert_eq!(h.send("T0"), "");
    assert!(h.out.lines().is_empty());
}

#[test]
fn test_numbered_lines_reach_their_handler() {
    let mut h = Harness::new();
    assert_eq!(
        h.send("N12 M114*40"),
        "X:0.00 Y:0.00 Z:0.00 E:0.00 Count X:0 Y:0 Z:0\nok"
    );
    assert!(h.send("N13 M105*41").starts_with("ok T:"));
}

#[test]
fn test_shadowed_command_runs_first_match() {
    let mut h = Harness::new();
    h.send("G1 X4");
    // G10 is claimed by the G1 handler and carries no axis words
    assert_eq!(h.send("G10"), "ok");
    assert_eq!(h.fw.state().position.x, 4.0);
}
