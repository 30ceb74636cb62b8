//! Command handlers
//!
//! Every handler has the `dispatch::Handler` shape. Long-running commands
//! write their busy notifications and intermediate reports to the sink and
//! return only the final response.

use super::{leveling, params, responses, MarlinFirmware};
use crate::communication::LineSink;
use marlinsim_core::{Axis, AxisMode, HeaterId, Result};

/// G0/G1: update the axes present on the line
pub fn linear_move(fw: &mut MarlinFirmware, line: &str, _out: &mut dyn LineSink) -> Result<String> {
    for axis in Axis::ALL {
        if let Some(value) = params::axis_value(line, axis) {
            fw.state.apply_axis(axis, value);
        }
    }
    Ok(responses::OK.to_string())
}

/// G28: simulate the homing moves, then zero the requested axes
pub fn home(fw: &mut MarlinFirmware, line: &str, out: &mut dyn LineSink) -> Result<String> {
    fw.send_busy(3, out)?;
    let axes = params::homing_axes(line);
    fw.state.home(&axes);
    tracing::debug!("Homed {:?}", axes);
    Ok(responses::OK.to_string())
}

/// G29 V4: replay the canned probing session and mesh report
pub fn bed_leveling(
    fw: &mut MarlinFirmware,
    _line: &str,
    out: &mut dyn LineSink,
) -> Result<String> {
    out.send_line(leveling::BANNER)?;
    fw.send_busy(leveling::BUSY_PER_STEP, out)?;

    for point in &leveling::PROBE_POINTS {
        out.send_line(&leveling::probe_line(point))?;
        fw.send_busy(leveling::BUSY_PER_STEP, out)?;
    }

    for line in leveling::grid_report() {
        out.send_line(&line)?;
    }
    Ok(responses::OK.to_string())
}

/// G90
pub fn absolute_mode(
    fw: &mut MarlinFirmware,
    _line: &str,
    _out: &mut dyn LineSink,
) -> Result<String> {
    fw.state.axis_mode = AxisMode::Absolute;
    Ok(responses::OK.to_string())
}

/// G91
pub fn relative_mode(
    fw: &mut MarlinFirmware,
    _line: &str,
    _out: &mut dyn LineSink,
) -> Result<String> {
    fw.state.axis_mode = AxisMode::Relative;
    Ok(responses::OK.to_string())
}

/// M104: set the hotend target without waiting
pub fn set_hotend_temperature(
    fw: &mut MarlinFirmware,
    line: &str,
    _out: &mut dyn LineSink,
) -> Result<String> {
    if let Some(target) = params::set_temperature(line) {
        fw.set_target(HeaterId::Hotend, target);
    }
    Ok(responses::OK.to_string())
}

/// M140: set the bed target without waiting
pub fn set_bed_temperature(
    fw: &mut MarlinFirmware,
    line: &str,
    _out: &mut dyn LineSink,
) -> Result<String> {
    if let Some(target) = params::set_temperature(line) {
        fw.set_target(HeaterId::Bed, target);
    }
    Ok(responses::OK.to_string())
}

/// M105: bring both heaters up to date and report them
pub fn report_temperatures(
    fw: &mut MarlinFirmware,
    _line: &str,
    _out: &mut dyn LineSink,
) -> Result<String> {
    fw.update_temperatures();
    Ok(responses::temperature_report(&fw.state.heaters, true))
}

/// M106: echo the command back
pub fn fan_on(_fw: &mut MarlinFirmware, line: &str, _out: &mut dyn LineSink) -> Result<String> {
    Ok(responses::with_ok(line))
}

/// M107: report the fan as switched off (fan 0 unless `P` names one)
pub fn fan_off(_fw: &mut MarlinFirmware, line: &str, _out: &mut dyn LineSink) -> Result<String> {
    Ok(responses::fan_off_report(params::fan_index(line).unwrap_or("0")))
}

/// M109: set the hotend target and block until it is reached
pub fn wait_hotend_temperature(
    fw: &mut MarlinFirmware,
    line: &str,
    out: &mut dyn LineSink,
) -> Result<String> {
    wait_for(fw, HeaterId::Hotend, line, out)
}

/// M190: set the bed target and block until it is reached
pub fn wait_bed_temperature(
    fw: &mut MarlinFirmware,
    line: &str,
    out: &mut dyn LineSink,
) -> Result<String> {
    wait_for(fw, HeaterId::Bed, line, out)
}

fn wait_for(
    fw: &mut MarlinFirmware,
    id: HeaterId,
    line: &str,
    out: &mut dyn LineSink,
) -> Result<String> {
    if let Some(target) = params::wait_temperature(line) {
        fw.set_target(id, target);
        fw.wait_for_heater(id, out)?;
    }
    // no final response; hosts poll with M105
    Ok(String::new())
}

/// M114
pub fn report_position(
    fw: &mut MarlinFirmware,
    _line: &str,
    _out: &mut dyn LineSink,
) -> Result<String> {
    Ok(responses::position_report(&fw.state.position))
}

/// M220: echo the feed-rate override percentage
pub fn feed_rate(_fw: &mut MarlinFirmware, line: &str, _out: &mut dyn LineSink) -> Result<String> {
    Ok(match params::feed_rate_percent(line) {
        Some(percent) => responses::feed_rate_report(percent),
        None => responses::OK.to_string(),
    })
}
