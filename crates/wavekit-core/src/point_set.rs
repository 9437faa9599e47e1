//! Ordered control-point storage.
//!
//! A [`PointSet`] is the single source of truth of a waveform. It keeps its
//! points strictly increasing by position and always holds exactly one point
//! at 0% and one at 100%. Every mutator either completes or leaves the set
//! untouched.

use crate::error::{WaveformError, WaveformResult};
use crate::point::{
    is_boundary_position, same_position, ControlPoint, DEFAULT_BOUNDARY_VOLTAGE, POSITION_EPSILON,
    POSITION_MAX, POSITION_MIN,
};
use serde::Serialize;
use std::ops::RangeInclusive;
use tracing::debug;

/// Distance from either end inside which an upsert lands on the boundary point.
pub const DEFAULT_BOUNDARY_SNAP: f64 = 1.0;

/// How [`PointSet::upsert_with`] treats positions near the ends.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UpsertPolicy {
    /// Positions closer than this to 0 or 100 are moved onto the boundary.
    pub boundary_snap: f64,
    /// Writing one boundary also writes the other, keeping the period continuous.
    pub link_boundaries: bool,
}

impl Default for UpsertPolicy {
    fn default() -> Self {
        Self {
            boundary_snap: DEFAULT_BOUNDARY_SNAP,
            link_boundaries: false,
        }
    }
}

/// The ordered set of control points of one waveform period.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PointSet {
    points: Vec<ControlPoint>,
}

impl Default for PointSet {
    fn default() -> Self {
        Self::new()
    }
}

impl PointSet {
    /// Creates the default waveform: a flat line at 1.5 V.
    pub fn new() -> Self {
        Self {
            points: default_boundaries().to_vec(),
        }
    }

    /// Builds a set from arbitrary points, checking every invariant.
    pub fn from_points(points: Vec<ControlPoint>) -> WaveformResult<Self> {
        let mut set = Self::new();
        set.replace_all(points)?;
        Ok(set)
    }

    pub fn points(&self) -> &[ControlPoint] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Never true for a well-formed set; present for API symmetry.
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&ControlPoint> {
        self.points.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ControlPoint> {
        self.points.iter()
    }

    pub fn last_index(&self) -> usize {
        self.points.len().saturating_sub(1)
    }

    /// Index of the point whose position matches `position`.
    pub fn index_of(&self, position: f64) -> Option<usize> {
        self.points.iter().position(|p| p.has_position(position))
    }

    /// Points as `(position, voltage)` pairs, in order.
    pub fn as_pairs(&self) -> Vec<(f64, f64)> {
        self.points.iter().map(|p| (p.position, p.voltage)).collect()
    }

    /// Inserts a point, or replaces the voltage of the point at that position.
    ///
    /// Uses the default [`UpsertPolicy`]. Returns the index the point ended up at.
    pub fn upsert(&mut self, position: f64, voltage: f64) -> WaveformResult<usize> {
        self.upsert_with(position, voltage, &UpsertPolicy::default())
    }

    /// Inserts or replaces a point under an explicit policy.
    ///
    /// The voltage is stored as given; range checks belong to the caller.
    pub fn upsert_with(
        &mut self,
        position: f64,
        voltage: f64,
        policy: &UpsertPolicy,
    ) -> WaveformResult<usize> {
        if !position.is_finite() {
            return Err(WaveformError::validation(
                "position",
                format!("{position} is not a finite number"),
            ));
        }
        if !voltage.is_finite() {
            return Err(WaveformError::validation(
                "voltage",
                format!("{voltage} is not a finite number"),
            ));
        }

        let position = snap_to_boundary(position, policy.boundary_snap);

        let index = match self
            .points
            .binary_search_by(|p| compare_position(p.position, position))
        {
            Ok(i) => {
                self.points[i].voltage = voltage;
                i
            }
            Err(i) => {
                self.points.insert(i, ControlPoint::new(position, voltage));
                i
            }
        };

        if policy.link_boundaries && is_boundary_position(position) {
            let mirror = if index == 0 { self.last_index() } else { 0 };
            self.points[mirror].voltage = voltage;
        }

        debug!("Upserted point {} at index {}", self.points[index], index);
        Ok(index)
    }

    /// Removes every point within `tolerance` of `(position, voltage)` on both axes.
    ///
    /// Boundary points caught by the erase are regenerated at the default
    /// voltage. Returns how many points were erased.
    pub fn remove_near(&mut self, position: f64, voltage: f64, tolerance: f64) -> usize {
        let before = self.points.len();
        self.points.retain(|p| {
            (p.position - position).abs() > tolerance || (p.voltage - voltage).abs() > tolerance
        });
        let removed = before - self.points.len();
        self.restore_boundaries();

        if removed > 0 {
            debug!(
                "Erased {} point(s) near ({:.2}, {:.2})",
                removed, position, voltage
            );
        }
        removed
    }

    /// Removes all points at exactly `position`.
    ///
    /// Boundary positions are refused with an invariant violation and the set is
    /// left unchanged. Returns how many points were removed.
    pub fn remove_by_position(&mut self, position: f64) -> WaveformResult<usize> {
        if is_boundary_position(position) {
            return Err(WaveformError::invariant(format!(
                "boundary point at {position} cannot be removed"
            )));
        }
        let before = self.points.len();
        self.points.retain(|p| !p.has_position(position));
        let removed = before - self.points.len();
        debug!("Removed {} point(s) at position {:.2}", removed, position);
        Ok(removed)
    }

    /// Replaces the whole set.
    ///
    /// The new points must be finite, inside [0, 100], strictly increasing and
    /// start at 0 and end at 100. On failure the current points are kept.
    pub fn replace_all(&mut self, points: Vec<ControlPoint>) -> WaveformResult<()> {
        let points = validate_points(points)?;
        debug!("Replaced point set with {} points", points.len());
        self.points = points;
        Ok(())
    }

    /// Resets to the two default boundary points.
    pub fn clear(&mut self) {
        self.points = default_boundaries().to_vec();
        debug!("Point set cleared");
    }

    /// Sets the voltage of the point at `index`.
    pub fn set_voltage(&mut self, index: usize, voltage: f64) -> WaveformResult<()> {
        if !voltage.is_finite() {
            return Err(WaveformError::validation(
                "voltage",
                format!("{voltage} is not a finite number"),
            ));
        }
        let point = self.points.get_mut(index).ok_or_else(|| {
            WaveformError::validation("index", format!("no point at index {index}"))
        })?;
        point.voltage = voltage;
        Ok(())
    }

    /// Moves an interior point to a new position and returns its new index.
    ///
    /// Boundary points cannot be moved, and the target must lie strictly inside
    /// (0, 100) without landing on another point.
    pub fn set_position(&mut self, index: usize, position: f64) -> WaveformResult<usize> {
        let point = *self.points.get(index).ok_or_else(|| {
            WaveformError::validation("index", format!("no point at index {index}"))
        })?;
        if point.is_boundary() {
            return Err(WaveformError::invariant(format!(
                "boundary point at {} cannot be moved",
                point.position
            )));
        }
        if !position.is_finite() || position <= POSITION_MIN || position >= POSITION_MAX {
            return Err(WaveformError::validation(
                "position",
                format!("{position} is not strictly inside 0..100"),
            ));
        }
        if self
            .index_of(position)
            .is_some_and(|existing| existing != index)
        {
            return Err(WaveformError::validation(
                "position",
                format!("a point already exists at {position}"),
            ));
        }

        self.points.remove(index);
        let new_index = self
            .points
            .binary_search_by(|p| compare_position(p.position, position))
            .unwrap_or_else(|i| i);
        self.points
            .insert(new_index, ControlPoint::new(position, point.voltage));
        Ok(new_index)
    }

    /// Swaps `range` for `replacement`, keeping the set valid.
    pub(crate) fn splice_checked(
        &mut self,
        range: RangeInclusive<usize>,
        replacement: Vec<ControlPoint>,
    ) -> WaveformResult<()> {
        let mut candidate = self.points.clone();
        candidate.splice(range, replacement);
        self.replace_all(candidate)
    }

    fn restore_boundaries(&mut self) {
        let [start, end] = default_boundaries();
        if !self.points.first().is_some_and(|p| p.has_position(POSITION_MIN)) {
            self.points.insert(0, start);
        }
        if !self.points.last().is_some_and(|p| p.has_position(POSITION_MAX)) {
            self.points.push(end);
        }
    }
}

impl<'a> IntoIterator for &'a PointSet {
    type Item = &'a ControlPoint;
    type IntoIter = std::slice::Iter<'a, ControlPoint>;

    fn into_iter(self) -> Self::IntoIter {
        self.points.iter()
    }
}

fn default_boundaries() -> [ControlPoint; 2] {
    [
        ControlPoint::new(POSITION_MIN, DEFAULT_BOUNDARY_VOLTAGE),
        ControlPoint::new(POSITION_MAX, DEFAULT_BOUNDARY_VOLTAGE),
    ]
}

/// Moves positions near either end onto the end, and clamps into [0, 100].
pub fn snap_to_boundary(position: f64, tolerance: f64) -> f64 {
    if position < POSITION_MIN + tolerance {
        POSITION_MIN
    } else if position > POSITION_MAX - tolerance {
        POSITION_MAX
    } else {
        position
    }
}

fn compare_position(a: f64, b: f64) -> std::cmp::Ordering {
    if same_position(a, b) {
        std::cmp::Ordering::Equal
    } else {
        a.total_cmp(&b)
    }
}

fn validate_points(mut points: Vec<ControlPoint>) -> WaveformResult<Vec<ControlPoint>> {
    if points.len() < 2 {
        return Err(WaveformError::invariant(format!(
            "a waveform needs at least 2 points, got {}",
            points.len()
        )));
    }
    if let Some(bad) = points
        .iter()
        .find(|p| !p.position.is_finite() || !p.voltage.is_finite())
    {
        return Err(WaveformError::validation(
            "point",
            format!("{:?} is not finite", bad),
        ));
    }
    if let Some(bad) = points.iter().find(|p| {
        p.position < POSITION_MIN - POSITION_EPSILON || p.position > POSITION_MAX + POSITION_EPSILON
    }) {
        return Err(WaveformError::validation(
            "position",
            format!("{} is outside 0..=100", bad.position),
        ));
    }
    if let Some(pair) = points
        .windows(2)
        .find(|w| w[1].position <= w[0].position || same_position(w[0].position, w[1].position))
    {
        return Err(WaveformError::invariant(format!(
            "positions must be strictly increasing ({} then {})",
            pair[0].position, pair[1].position
        )));
    }

    let last = points.len() - 1;
    if !same_position(points[0].position, POSITION_MIN) {
        return Err(WaveformError::invariant(format!(
            "first point must sit at 0, found {}",
            points[0].position
        )));
    }
    if !same_position(points[last].position, POSITION_MAX) {
        return Err(WaveformError::invariant(format!(
            "last point must sit at 100, found {}",
            points[last].position
        )));
    }
    points[0].position = POSITION_MIN;
    points[last].position = POSITION_MAX;
    Ok(points)
}
