use marlinsim_communication::{
    Firmware, LineSink, MarlinFirmware, MemoryTransport, Session, SessionConfig, SessionEnd,
};
use marlinsim_core::{CancelToken, Error, FixedNoise, ManualClock, Result};
use std::time::Duration;

fn firmware() -> MarlinFirmware {
    MarlinFirmware::default()
        .with_clock(ManualClock::new(0))
        .with_noise(FixedNoise(0.5))
}

fn config() -> SessionConfig {
    SessionConfig {
        poll_interval: Duration::ZERO,
        ..SessionConfig::default()
    }
}

#[test]
fn test_session_replays_script() {
    let transport = MemoryTransport::with_input([
        "[ESP3D] screen ready",
        "  M105  ",
        "",
        "G28 X",
        "hello",
        "M114",
    ]);
    let output = transport.output();
    let mut session = Session::new(Box::new(transport), Box::new(firmware()), config());

    let summary = session.run().unwrap();

    assert_eq!(summary.end, SessionEnd::EndOfInput);
    assert_eq!(summary.lines_received, 6);
    assert_eq!(summary.lines_ignored, 1);
    assert_eq!(summary.responses_sent, 3);
    assert_eq!(
        output.lines(),
        vec![
            "ok T:21.25 /0.00 B:21.25 /0.00 @:127 B@:0",
            "echo:busy: processing",
            "echo:busy: processing",
            "echo:busy: processing",
            "ok",
            "X:0.00 Y:0.00 Z:0.00 E:0.00 Count X:0 Y:0 Z:0\nok",
        ]
    );
}

#[test]
fn test_blocking_heat_has_no_final_response() {
    let transport = MemoryTransport::with_input(["M190 S25"]);
    let output = transport.output();
    let mut session = Session::new(Box::new(transport), Box::new(firmware()), config());

    let summary = session.run().unwrap();

    assert_eq!(summary.responses_sent, 0);
    let lines = output.lines();
    assert!(!lines.is_empty());
    assert!(lines.iter().all(|l| l != "ok"));
}

#[test]
fn test_cancelled_before_start() {
    let cancel = CancelToken::new();
    cancel.cancel();
    let transport = MemoryTransport::with_input(["M105"]);
    let mut session = Session::new(Box::new(transport), Box::new(firmware()), config())
        .with_cancel_token(cancel);

    let summary = session.run().unwrap();

    assert_eq!(summary.end, SessionEnd::Cancelled);
    assert_eq!(summary.lines_received, 0);
}

/// Firmware that trips the shared token as soon as it sees a line
struct Interrupting {
    cancel: CancelToken,
}

impl Firmware for Interrupting {
    fn process_line(&mut self, _line: &str, out: &mut dyn LineSink) -> Result<String> {
        out.send_line("echo:busy: processing")?;
        self.cancel.cancel();
        Err(Error::Cancelled)
    }

    fn name(&self) -> &'static str {
        "Interrupting"
    }
}

#[test]
fn test_cancel_during_command_ends_session() {
    let cancel = CancelToken::new();
    let transport = MemoryTransport::with_input(["G28", "M105"]);
    let output = transport.output();
    let firmware = Interrupting {
        cancel: cancel.clone(),
    };
    let mut session =
        Session::new(Box::new(transport), Box::new(firmware), config()).with_cancel_token(cancel);

    let summary = session.run().unwrap();

    assert_eq!(summary.end, SessionEnd::Cancelled);
    assert_eq!(summary.lines_received, 1);
    assert_eq!(output.lines(), vec!["echo:busy: processing"]);
}
