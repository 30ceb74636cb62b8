//! Command dispatch table
//!
//! A linear, ordered scan: the first entry whose prefix matches wins, so
//! registration order matters (`G1` shadows `G10`..`G19`, for instance).

use super::{handlers, MarlinFirmware};
use crate::communication::LineSink;
use marlinsim_core::Result;

/// Command handler; intermediate lines go to the sink, the final response is returned
pub type Handler = fn(&mut MarlinFirmware, &str, &mut dyn LineSink) -> Result<String>;

/// One registered command
pub struct CommandEntry {
    /// Command word (or words) the line must carry
    pub prefix: &'static str,
    pub handler: Handler,
}

impl std::fmt::Debug for CommandEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CommandEntry")
            .field("prefix", &self.prefix)
            .finish()
    }
}

/// Supported commands in match order
pub static COMMANDS: [CommandEntry; 15] = [
    CommandEntry { prefix: "G0", handler: handlers::linear_move },
    CommandEntry { prefix: "G1", handler: handlers::linear_move },
    CommandEntry { prefix: "G28", handler: handlers::home },
    CommandEntry { prefix: "G29 V4", handler: handlers::bed_leveling },
    CommandEntry { prefix: "G90", handler: handlers::absolute_mode },
    CommandEntry { prefix: "G91", handler: handlers::relative_mode },
    CommandEntry { prefix: "M104", handler: handlers::set_hotend_temperature },
    CommandEntry { prefix: "M105", handler: handlers::report_temperatures },
    CommandEntry { prefix: "M106", handler: handlers::fan_on },
    CommandEntry { prefix: "M107", handler: handlers::fan_off },
    CommandEntry { prefix: "M109", handler: handlers::wait_hotend_temperature },
    CommandEntry { prefix: "M114", handler: handlers::report_position },
    CommandEntry { prefix: "M140", handler: handlers::set_bed_temperature },
    CommandEntry { prefix: "M190", handler: handlers::wait_bed_temperature },
    CommandEntry { prefix: "M220", handler: handlers::feed_rate },
];

/// Whether `line` addresses the command `prefix`
///
/// Plain lines must start with the prefix. Lines carrying an `N<seq>` line
/// number match when the prefix appears anywhere after the start.
pub fn matches_prefix(line: &str, prefix: &str) -> bool {
    if line.starts_with(prefix) {
        return true;
    }
    line.starts_with('N') && line.find(prefix).is_some_and(|idx| idx != 0)
}

/// First registered command matching `line`
pub fn lookup(line: &str) -> Option<&'static CommandEntry> {
    COMMANDS
        .iter()
        .find(|entry| matches_prefix(line, entry.prefix))
}

/// Response for lines no handler claimed: G/M/N lines are acknowledged,
/// anything else is silently dropped
pub fn fallback(line: &str) -> &'static str {
    if line.starts_with(&['G', 'M', 'N'][..]) {
        super::responses::OK
    } else {
        ""
    }
}
