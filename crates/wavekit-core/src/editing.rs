//! Editing rules: how raw pointer input and typed values become point-set edits.
//!
//! The rules sit between the UI and the [`PointSet`]. They snap coordinates to
//! the active grid, keep voltages inside the output range, and reject typed
//! values that do not land on the voltage grid. A rejected edit leaves the set
//! exactly as it was.

use crate::error::{WaveformError, WaveformResult};
use crate::point::{POSITION_MAX, POSITION_MIN, VOLTAGE_MAX, VOLTAGE_MIN};
use crate::point_set::{PointSet, UpsertPolicy};
use crate::prompt::IntegerRequest;
use serde::{Deserialize, Serialize};
use std::ops::RangeInclusive;
use tracing::debug;

/// Position grid intervals offered to the user, in percent.
pub const X_GRID_INTERVALS: [f64; 5] = [2.0, 5.0, 10.0, 25.0, 50.0];
/// Voltage grid intervals offered to the user.
pub const Y_GRID_INTERVALS: [f64; 10] = [0.1, 0.2, 0.3, 0.4, 0.5, 0.6, 0.7, 0.8, 0.9, 1.0];
/// Default erase radius of the secondary gesture, per axis.
pub const DEFAULT_ERASE_TOLERANCE: f64 = 2.0;
/// Resolutions the resolution dialog accepts (even values only).
pub const EDITOR_RESOLUTION_RANGE: RangeInclusive<usize> = 10..=100;

const GRID_EPSILON: f64 = 1e-9;

/// Grid intervals and flags shared by the render surface and the rules.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GridSettings {
    /// Position grid spacing in percent
    pub x_interval: f64,
    /// Voltage grid spacing
    pub y_interval: f64,
    /// Position grid shown (and used for snapping)
    pub x_enabled: bool,
    /// Voltage grid shown (and used for snapping and typed-value checks)
    pub y_enabled: bool,
    /// Snap pointer input to the enabled grids
    pub snap: bool,
}

impl Default for GridSettings {
    fn default() -> Self {
        Self {
            x_interval: 10.0,
            y_interval: 0.5,
            x_enabled: true,
            y_enabled: true,
            snap: false,
        }
    }
}

impl GridSettings {
    /// Checks both intervals against the offered choices.
    pub fn validate(&self) -> WaveformResult<()> {
        if !X_GRID_INTERVALS.iter().any(|i| approx_eq(*i, self.x_interval)) {
            return Err(WaveformError::validation(
                "x_interval",
                format!("{} is not one of {:?}", self.x_interval, X_GRID_INTERVALS),
            ));
        }
        if !Y_GRID_INTERVALS.iter().any(|i| approx_eq(*i, self.y_interval)) {
            return Err(WaveformError::validation(
                "y_interval",
                format!("{} is not one of {:?}", self.y_interval, Y_GRID_INTERVALS),
            ));
        }
        Ok(())
    }
}

/// Rounds `value` to the nearest multiple of `interval`.
pub fn snap_value(value: f64, interval: f64) -> f64 {
    if interval <= 0.0 {
        return value;
    }
    (value / interval).round() * interval
}

/// The policy layer between raw input and the point set.
#[derive(Debug, Clone, PartialEq)]
pub struct EditingRules {
    pub grid: GridSettings,
    pub upsert: UpsertPolicy,
    pub erase_tolerance: f64,
}

impl Default for EditingRules {
    fn default() -> Self {
        Self {
            grid: GridSettings::default(),
            upsert: UpsertPolicy::default(),
            erase_tolerance: DEFAULT_ERASE_TOLERANCE,
        }
    }
}

impl EditingRules {
    pub fn new(grid: GridSettings, upsert: UpsertPolicy, erase_tolerance: f64) -> Self {
        Self {
            grid,
            upsert,
            erase_tolerance,
        }
    }

    /// Maps a raw pointer coordinate to the point it would create.
    pub fn snap_coordinate(&self, x: f64, y: f64) -> (f64, f64) {
        let x = if self.grid.snap && self.grid.x_enabled {
            snap_value(x, self.grid.x_interval)
        } else {
            x
        };
        let y = if self.grid.snap && self.grid.y_enabled {
            snap_value(y, self.grid.y_interval)
        } else {
            y
        };
        (
            x.clamp(POSITION_MIN, POSITION_MAX),
            y.clamp(VOLTAGE_MIN, VOLTAGE_MAX),
        )
    }

    /// Add-or-move gesture at `(x, y)`. Returns the index of the touched point.
    pub fn primary_gesture(&self, points: &mut PointSet, x: f64, y: f64) -> WaveformResult<usize> {
        if !x.is_finite() || !y.is_finite() {
            return Err(WaveformError::validation(
                "coordinate",
                format!("({x}, {y}) is not a finite coordinate"),
            ));
        }
        let (x, y) = self.snap_coordinate(x, y);
        debug!("Primary gesture resolved to ({:.2}, {:.2})", x, y);
        points.upsert_with(x, y, &self.upsert)
    }

    /// Erase gesture at `(x, y)`. Returns how many points were erased.
    pub fn secondary_gesture(&self, points: &mut PointSet, x: f64, y: f64) -> usize {
        points.remove_near(x, y, self.erase_tolerance)
    }

    /// Checks a typed voltage: inside [0, 3] and, with the voltage grid on,
    /// an exact multiple of the grid interval. Returns the canonical value.
    pub fn validate_voltage(&self, value: f64) -> WaveformResult<f64> {
        let in_range =
            value >= VOLTAGE_MIN - GRID_EPSILON && value <= VOLTAGE_MAX + GRID_EPSILON;
        if !value.is_finite() || !in_range {
            return Err(WaveformError::validation(
                "voltage",
                format!("{value} is outside {VOLTAGE_MIN}..={VOLTAGE_MAX}"),
            ));
        }
        if !self.grid.y_enabled {
            return Ok(value.clamp(VOLTAGE_MIN, VOLTAGE_MAX));
        }
        let snapped = snap_value(value, self.grid.y_interval);
        if !approx_eq(snapped, value) {
            return Err(WaveformError::validation(
                "voltage",
                format!("{value} is not on the {} V grid", self.grid.y_interval),
            ));
        }
        Ok(value.clamp(VOLTAGE_MIN, VOLTAGE_MAX))
    }

    /// Sets the voltage of the point at `index` from a typed value.
    ///
    /// With linked boundaries, a boundary edit is mirrored onto the opposite
    /// boundary, the same as a pointer edit.
    pub fn edit_voltage(
        &self,
        points: &mut PointSet,
        index: usize,
        value: f64,
    ) -> WaveformResult<()> {
        let value = self.validate_voltage(value)?;
        points.set_voltage(index, value)?;
        if self.upsert.link_boundaries && points.get(index).is_some_and(|p| p.is_boundary()) {
            let opposite = if index == 0 { points.last_index() } else { 0 };
            points.set_voltage(opposite, value)?;
            debug!("Mirrored boundary voltage {:.2} onto index {}", value, opposite);
        }
        Ok(())
    }

    /// Moves the point at `index` to a typed position. Boundary points refuse.
    pub fn edit_position(
        &self,
        points: &mut PointSet,
        index: usize,
        value: f64,
    ) -> WaveformResult<usize> {
        points.set_position(index, value)
    }

    /// The resolution dialog, defaulting to the nearest valid count to `current`.
    pub fn resolution_request(&self, current: usize) -> IntegerRequest {
        let (min, max) = (*EDITOR_RESOLUTION_RANGE.start(), *EDITOR_RESOLUTION_RANGE.end());
        let default = current.clamp(min, max) & !1;
        IntegerRequest::new(
            "Change Resolution",
            "Enter new resolution (10-100, even numbers only):",
            min as i64,
            max as i64,
            default as i64,
        )
    }

    /// Checks a resolution typed into the resolution dialog.
    pub fn validate_resolution(&self, resolution: usize) -> WaveformResult<usize> {
        if !EDITOR_RESOLUTION_RANGE.contains(&resolution) || resolution % 2 != 0 {
            return Err(WaveformError::validation(
                "resolution",
                format!(
                    "{resolution} must be an even number in {}..={}",
                    EDITOR_RESOLUTION_RANGE.start(),
                    EDITOR_RESOLUTION_RANGE.end()
                ),
            ));
        }
        Ok(resolution)
    }
}

fn approx_eq(a: f64, b: f64) -> bool {
    (a - b).abs() <= GRID_EPSILON.max(b.abs() * 1e-12)
}
