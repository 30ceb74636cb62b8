//! Canned `G29 V4` bilinear bed-leveling session
//!
//! A fixed 4x4 probe serpentine over a 300 mm bed and the resulting mesh.
//! The values are a plausible, slightly warped bed; hosts only care about
//! the shape of the output.

/// Opening line echoed when probing starts
pub const BANNER: &str = " G29 Auto Bed Leveling";

/// Busy notifications after the banner and after every probe line
pub const BUSY_PER_STEP: usize = 3;

/// A probed bed point in millimeters
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProbePoint {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

const fn point(x: f64, y: f64, z: f64) -> ProbePoint {
    ProbePoint { x, y, z }
}

/// Probe order: rows alternate direction
pub const PROBE_POINTS: [ProbePoint; 16] = [
    point(50.0, 50.0, 0.000),
    point(133.0, 50.0, 0.016),
    point(216.0, 50.0, -0.013),
    point(299.0, 50.0, -0.051),
    point(299.0, 133.0, -0.005),
    point(216.0, 133.0, -0.041),
    point(133.0, 133.0, -0.031),
    point(50.0, 133.0, -0.036),
    point(50.0, 216.0, -0.050),
    point(133.0, 216.0, 0.055),
    point(216.0, 216.0, 0.051),
    point(299.0, 216.0, 0.026),
    point(299.0, 299.0, -0.018),
    point(216.0, 299.0, -0.064),
    point(133.0, 299.0, -0.036),
    point(50.0, 299.0, -0.046),
];

/// Resulting mesh, row-major
pub const MESH: [[f64; 4]; 4] = [
    [0.0, 0.0162, -0.0125, -0.0512],
    [-0.0363, -0.0313, -0.0412, -0.0050],
    [-0.0500, 0.0550, 0.0512, 0.0262],
    [-0.0463, -0.0363, -0.0638, -0.0175],
];

/// One probe result line, e.g. `Bed X: 50.000 Y: 50.000 Z: 0.000`
pub fn probe_line(point: &ProbePoint) -> String {
    format!("Bed X: {:.3} Y: {:.3} Z: {:.3}", point.x, point.y, point.z)
}

/// Title, column header and one line per mesh row
pub fn grid_report() -> Vec<String> {
    let mut lines = Vec::with_capacity(MESH.len() + 2);
    lines.push("Bilinear Leveling Grid:".to_string());

    let header: String = (0..MESH[0].len()).map(|col| format!("{:>7}", col)).collect();
    lines.push(header);

    for (row, values) in MESH.iter().enumerate() {
        let cells: Vec<String> = values.iter().map(|v| format!("{:+.4}", v)).collect();
        lines.push(format!(" {} {}", row, cells.join(" ")));
    }
    lines
}
