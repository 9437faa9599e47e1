//! Curve evaluation.
//!
//! Turns a [`PointSet`] into a dense [`SampledCurve`] by piecewise-linear
//! interpolation, and refines the shape around a single interior point by
//! replacing its neighbourhood with samples of the quadratic through it.

use crate::error::{WaveformError, WaveformResult};
use crate::point::{linspace_positions, ControlPoint};
use crate::point_set::PointSet;
use serde::Serialize;
use std::ops::RangeInclusive;
use tracing::debug;

/// Default number of points a smoothing pass lays down.
pub const DEFAULT_SMOOTH_SAMPLES: usize = 5;
/// Accepted range for the smoothing sample count.
pub const SMOOTH_SAMPLES_RANGE: RangeInclusive<usize> = 3..=5;

/// A waveform evaluated at evenly spaced positions.
///
/// Derived from a [`PointSet`] and never mutated after creation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SampledCurve {
    samples: Vec<ControlPoint>,
}

impl SampledCurve {
    pub fn samples(&self) -> &[ControlPoint] {
        &self.samples
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn voltages(&self) -> impl Iterator<Item = f64> + '_ {
        self.samples.iter().map(|s| s.voltage)
    }

    pub fn into_samples(self) -> Vec<ControlPoint> {
        self.samples
    }
}

/// Samples `points` at `resolution` positions spread evenly over [0, 100].
///
/// A position that coincides with a control point yields that point's voltage
/// exactly. `resolution` must be at least 2.
pub fn evaluate(points: &PointSet, resolution: usize) -> WaveformResult<SampledCurve> {
    if resolution < 2 {
        return Err(WaveformError::validation(
            "resolution",
            format!("{resolution} is below the minimum of 2"),
        ));
    }

    let samples = linspace_positions(resolution)
        .into_iter()
        .map(|x| ControlPoint::new(x, value_at(points, x)))
        .collect::<Vec<_>>();

    debug!(
        "Evaluated {} control points at resolution {}",
        points.len(),
        resolution
    );
    Ok(SampledCurve { samples })
}

/// Linear interpolation of the waveform at `position`.
///
/// Positions outside the covered range take the nearest end value.
pub fn value_at(points: &PointSet, position: f64) -> f64 {
    interpolate(points.points(), position)
}

fn interpolate(points: &[ControlPoint], position: f64) -> f64 {
    let (Some(first), Some(last)) = (points.first(), points.last()) else {
        return 0.0;
    };
    if position <= first.position {
        return first.voltage;
    }
    if position >= last.position {
        return last.voltage;
    }

    let upper = points.partition_point(|p| p.position < position);
    let hi = points[upper];
    if hi.has_position(position) {
        return hi.voltage;
    }
    let lo = points[upper - 1];
    if lo.has_position(position) {
        return lo.voltage;
    }

    let t = (position - lo.position) / (hi.position - lo.position);
    lo.voltage + t * (hi.voltage - lo.voltage)
}

/// Reshapes the curve around the interior point at `index`.
///
/// Fits the quadratic through the point and its two neighbours and replaces
/// those three points with `samples` points of that quadratic, spread evenly
/// from the left neighbour to the right neighbour. New voltages are clamped at
/// 0. `samples` is clamped into 3..=5.
///
/// Returns the index range of the inserted points, or `None` without touching
/// the set when `index` is the first point, the last point, or out of range.
pub fn smooth_around_point(
    points: &mut PointSet,
    index: usize,
    samples: usize,
) -> Option<RangeInclusive<usize>> {
    if index == 0 || index >= points.last_index() {
        debug!("Smoothing refused for index {}", index);
        return None;
    }

    let prev = *points.get(index - 1)?;
    let target = *points.get(index)?;
    let next = *points.get(index + 1)?;
    let quad = Quadratic::through(prev, target, next);

    let count = samples.clamp(*SMOOTH_SAMPLES_RANGE.start(), *SMOOTH_SAMPLES_RANGE.end());
    let last = (count - 1) as f64;
    let replacement = (0..count)
        .map(|i| {
            let x = if i == count - 1 {
                next.position
            } else {
                prev.position + (next.position - prev.position) * i as f64 / last
            };
            ControlPoint::new(x, quad.eval(x).max(0.0))
        })
        .collect::<Vec<_>>();

    let start = index - 1;
    match points.splice_checked(start..=index + 1, replacement) {
        Ok(()) => {
            debug!("Smoothed around {} with {} samples", target, count);
            Some(start..=start + count - 1)
        }
        Err(e) => {
            debug!("Smoothing around {} rejected: {}", target, e);
            None
        }
    }
}

/// The parabola through three points with distinct positions, in Lagrange form.
#[derive(Debug, Clone, Copy)]
struct Quadratic {
    nodes: [ControlPoint; 3],
}

impl Quadratic {
    fn through(a: ControlPoint, b: ControlPoint, c: ControlPoint) -> Self {
        Self { nodes: [a, b, c] }
    }

    fn eval(&self, x: f64) -> f64 {
        let [a, b, c] = self.nodes;
        let la = (x - b.position) * (x - c.position)
            / ((a.position - b.position) * (a.position - c.position));
        let lb = (x - a.position) * (x - c.position)
            / ((b.position - a.position) * (b.position - c.position));
        let lc = (x - a.position) * (x - b.position)
            / ((c.position - a.position) * (c.position - b.position));
        a.voltage * la + b.voltage * lb + c.voltage * lc
    }
}
