//! Control point type and the waveform domain constants.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Start of one waveform period, in percent.
pub const POSITION_MIN: f64 = 0.0;
/// End of one waveform period, in percent.
pub const POSITION_MAX: f64 = 100.0;
/// Lowest output amplitude.
pub const VOLTAGE_MIN: f64 = 0.0;
/// Highest output amplitude.
pub const VOLTAGE_MAX: f64 = 3.0;
/// Voltage given to a boundary point when it has to be regenerated.
pub const DEFAULT_BOUNDARY_VOLTAGE: f64 = 1.5;
/// Two positions closer than this are the same key.
pub const POSITION_EPSILON: f64 = 1e-6;

/// A user-placed anchor of the waveform.
///
/// `position` is the percentage along one period (0-100) and `voltage` is the
/// output amplitude (0-3).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ControlPoint {
    pub position: f64,
    pub voltage: f64,
}

impl ControlPoint {
    pub fn new(position: f64, voltage: f64) -> Self {
        Self { position, voltage }
    }

    /// True when this point sits on position 0 or 100.
    pub fn is_boundary(&self) -> bool {
        is_boundary_position(self.position)
    }

    /// True when `position` matches this point's key.
    pub fn has_position(&self, position: f64) -> bool {
        same_position(self.position, position)
    }
}

impl From<(f64, f64)> for ControlPoint {
    fn from((position, voltage): (f64, f64)) -> Self {
        Self::new(position, voltage)
    }
}

impl fmt::Display for ControlPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:.2}%, {:.2} V)", self.position, self.voltage)
    }
}

/// Position equality under [`POSITION_EPSILON`].
pub fn same_position(a: f64, b: f64) -> bool {
    (a - b).abs() <= POSITION_EPSILON
}

/// True for the two mandatory positions 0 and 100.
pub fn is_boundary_position(position: f64) -> bool {
    same_position(position, POSITION_MIN) || same_position(position, POSITION_MAX)
}

/// `n` evenly spaced positions over [0, 100], both ends included exactly.
pub fn linspace_positions(n: usize) -> Vec<f64> {
    match n {
        0 => Vec::new(),
        1 => vec![POSITION_MIN],
        _ => {
            let last = (n - 1) as f64;
            (0..n)
                .map(|i| {
                    if i == n - 1 {
                        POSITION_MAX
                    } else {
                        POSITION_MIN + (POSITION_MAX - POSITION_MIN) * i as f64 / last
                    }
                })
                .collect()
        }
    }
}
