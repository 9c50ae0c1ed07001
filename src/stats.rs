//! Derived statistics over a frozen [`RetainedSequence`] and, for tracks, its [`Timeline`].
//!
//! Every function is a read-only query. An empty sequence is a usage error
//! ([`GpsError::EmptySequence`]) everywhere except [`total_length`]; a single
//! position degrades to zero lengths, gradients and speeds.

use crate::error::{GpsError, Result};
use crate::geo_utils::{distance_3d, gradient_degrees, haversine_distance};
use crate::ingest::{RetainedSequence, Timeline};
use crate::location::LocationMatcher;
use crate::{Bounds, Position};

// =============================================================================
// Distance and Elevation
// =============================================================================

/// Accumulated 3-D path length in meters.
pub fn total_length(sequence: &RetainedSequence) -> f64 {
    sequence.cumulative_length()
}

/// Horizontal distance from first to last position; 0 if they are the same location.
pub fn net_length(sequence: &RetainedSequence, matcher: &LocationMatcher) -> Result<f64> {
    let first = sequence.first()?;
    let last = sequence.last()?;

    if matcher.same_location(first, last) {
        return Ok(0.0);
    }
    Ok(haversine_distance(first, last))
}

/// Sum of the climbs only. Descents are ignored, not subtracted.
pub fn total_height_gain(sequence: &RetainedSequence) -> Result<f64> {
    if sequence.is_empty() {
        return Err(GpsError::EmptySequence);
    }

    Ok(sequence
        .positions()
        .windows(2)
        .map(|w| w[1].elevation - w[0].elevation)
        .filter(|&delta| delta > 0.0)
        .sum())
}

/// Elevation of the last position above the first, clamped at 0.
pub fn net_height_gain(sequence: &RetainedSequence) -> Result<f64> {
    let delta = sequence.last()?.elevation - sequence.first()?.elevation;
    Ok(delta.max(0.0))
}

/// Latitude, longitude and elevation extremes.
pub fn bounds(sequence: &RetainedSequence) -> Result<Bounds> {
    Bounds::from_positions(sequence.positions()).ok_or(GpsError::EmptySequence)
}

// =============================================================================
// Gradients
// =============================================================================

fn segment_gradients(positions: &[Position]) -> impl Iterator<Item = f64> + '_ {
    positions.windows(2).map(|w| gradient_degrees(&w[0], &w[1]))
}

/// Largest signed segment gradient in degrees. Negative on purely descending terrain.
pub fn max_gradient(sequence: &RetainedSequence) -> Result<f64> {
    fold_gradients(sequence, f64::NEG_INFINITY, f64::max)
}

/// Smallest signed segment gradient in degrees.
pub fn min_gradient(sequence: &RetainedSequence) -> Result<f64> {
    fold_gradients(sequence, f64::INFINITY, f64::min)
}

/// Largest absolute segment gradient in degrees.
pub fn steepest_gradient(sequence: &RetainedSequence) -> Result<f64> {
    if sequence.is_empty() {
        return Err(GpsError::EmptySequence);
    }
    Ok(segment_gradients(sequence.positions())
        .map(f64::abs)
        .fold(0.0, f64::max))
}

fn fold_gradients(
    sequence: &RetainedSequence,
    init: f64,
    pick: fn(f64, f64) -> f64,
) -> Result<f64> {
    match sequence.len() {
        0 => Err(GpsError::EmptySequence),
        1 => Ok(0.0),
        _ => Ok(segment_gradients(sequence.positions()).fold(init, pick)),
    }
}

// =============================================================================
// Timing (tracks)
// =============================================================================

/// Seconds from the first fix to the last departure.
pub fn total_time(timeline: &Timeline) -> Result<u64> {
    timeline.departed().last().copied().ok_or(GpsError::EmptySequence)
}

/// Seconds spent dwelling at retained positions.
pub fn resting_time(timeline: &Timeline) -> Result<u64> {
    if timeline.is_empty() {
        return Err(GpsError::EmptySequence);
    }
    Ok(timeline
        .arrived()
        .iter()
        .zip(timeline.departed())
        .map(|(arrived, departed)| departed - arrived)
        .sum())
}

/// Seconds spent moving: `total_time - resting_time`.
pub fn travelling_time(timeline: &Timeline) -> Result<u64> {
    Ok(total_time(timeline)? - resting_time(timeline)?)
}

/// Travel duration of each segment, `arrived[i] - departed[i - 1]`.
///
/// Their sum always equals [`travelling_time`].
pub fn segment_travel_times(timeline: &Timeline) -> Vec<u64> {
    timeline
        .arrived()
        .iter()
        .skip(1)
        .zip(timeline.departed())
        .map(|(arrived, departed)| arrived - departed)
        .collect()
}

/// Highest segment speed in m/s (3-D distance over travel time).
pub fn max_speed(sequence: &RetainedSequence, timeline: &Timeline) -> Result<f64> {
    max_segment_rate(sequence, timeline, distance_3d)
}

/// Highest climbing rate in m/s.
pub fn max_rate_of_ascent(sequence: &RetainedSequence, timeline: &Timeline) -> Result<f64> {
    max_segment_rate(sequence, timeline, |from, to| to.elevation - from.elevation)
}

/// Highest descending rate in m/s, as a positive number.
pub fn max_rate_of_descent(sequence: &RetainedSequence, timeline: &Timeline) -> Result<f64> {
    max_segment_rate(sequence, timeline, |from, to| from.elevation - to.elevation)
}

/// Mean speed in m/s over either the total or the travelling time. 0 if that time is 0.
pub fn average_speed(
    sequence: &RetainedSequence,
    timeline: &Timeline,
    include_rests: bool,
) -> Result<f64> {
    let time = if include_rests {
        total_time(timeline)?
    } else {
        travelling_time(timeline)?
    };

    if time == 0 {
        return Ok(0.0);
    }
    Ok(total_length(sequence) / time as f64)
}

/// Max over segments of `measure(from, to) / travel_time`, floored at 0.
///
/// A segment with zero travel time has no defined rate and is an error.
fn max_segment_rate(
    sequence: &RetainedSequence,
    timeline: &Timeline,
    measure: impl Fn(&Position, &Position) -> f64,
) -> Result<f64> {
    if sequence.is_empty() || timeline.is_empty() {
        return Err(GpsError::EmptySequence);
    }

    let positions = sequence.positions();
    let mut best = 0.0_f64;

    for (i, duration) in segment_travel_times(timeline).into_iter().enumerate() {
        let index = i + 1;
        if duration == 0 {
            return Err(GpsError::ZeroTravelTime { index });
        }
        let rate = measure(&positions[index - 1], &positions[index]) / duration as f64;
        best = best.max(rate);
    }

    Ok(best)
}

// =============================================================================
// Unit Tests
// =============================================================================
