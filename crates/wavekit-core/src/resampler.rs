//! Control-point count changes.

use crate::error::{WaveformError, WaveformResult};
use crate::interpolator;
use crate::point_set::PointSet;
use tracing::info;

/// Rebuilds `points` as `new_resolution` evenly spaced control points.
///
/// The result's points are the samples of the current curve; original control
/// points survive only where they coincide with a new sample position.
/// Resolutions below 2 are rejected.
pub fn resample(points: &PointSet, new_resolution: usize) -> WaveformResult<PointSet> {
    if new_resolution < 2 {
        return Err(WaveformError::validation(
            "resolution",
            format!("{new_resolution} is below the minimum of 2"),
        ));
    }

    let curve = interpolator::evaluate(points, new_resolution)?;
    let resampled = PointSet::from_points(curve.into_samples())?;
    info!(
        "Resampled waveform from {} to {} points",
        points.len(),
        resampled.len()
    );
    Ok(resampled)
}
