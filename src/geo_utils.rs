//! # Geographic Utilities
//!
//! Geodesy primitives shared by ingestion and the statistics engine.
//!
//! | Function | Description |
//! |----------|-------------|
//! | [`haversine_distance`] | Great-circle (horizontal) distance between two positions |
//! | [`distance_3d`] | Hypotenuse of horizontal distance and elevation change |
//! | [`gradient_degrees`] | Signed slope angle of the segment between two positions |
//! | [`polyline_length`] | Sum of consecutive 3-D segment distances |
//!
//! ## Example
//!
//! ```rust
//! use route_stats::{Position, geo_utils};
//!
//! let a = Position::with_elevation(51.5074, -0.1278, 10.0);
//! let b = Position::with_elevation(51.5080, -0.1290, 25.0);
//!
//! let flat = geo_utils::haversine_distance(&a, &b);
//! let slant = geo_utils::distance_3d(&a, &b);
//! assert!(slant > flat);
//! ```
//!
//! ## Algorithm Notes
//!
//! Horizontal distances use the haversine formula from the `geo` crate (spherical Earth,
//! mean radius). Elevation is treated as a straight vertical offset, which is accurate for
//! the short segments produced by GPS loggers.

use geo::{Distance, Haversine, Point};

use crate::Position;

// =============================================================================
// Distance Functions
// =============================================================================

/// Calculate the great-circle distance between two positions, ignoring elevation.
///
/// Uses the haversine formula on a spherical Earth (mean radius 6,371 km).
///
/// # Arguments
///
/// * `p1` - First position
/// * `p2` - Second position
///
/// # Returns
///
/// Horizontal distance in meters between the two positions.
///
/// # Example
///
/// ```rust
/// use route_stats::{Position, geo_utils};
///
/// let london = Position::new(51.5074, -0.1278);
/// let paris = Position::new(48.8566, 2.3522);
///
/// let distance = geo_utils::haversine_distance(&london, &paris);
/// assert!((distance - 343_560.0).abs() < 1000.0); // ~344 km
/// ```
#[inline]
pub fn haversine_distance(p1: &Position, p2: &Position) -> f64 {
    let point1 = Point::new(p1.longitude, p1.latitude);
    let point2 = Point::new(p2.longitude, p2.latitude);
    Haversine::distance(point1, point2)
}

/// Distance between two positions including the elevation change.
///
/// # Arguments
///
/// * `p1` - Start of the segment
/// * `p2` - End of the segment
///
/// # Returns
///
/// Straight-line length in meters of the horizontal distance and the
/// elevation difference combined.
#[inline]
pub fn distance_3d(p1: &Position, p2: &Position) -> f64 {
    let horizontal = haversine_distance(p1, p2);
    let vertical = p2.elevation - p1.elevation;
    horizontal.hypot(vertical)
}

/// Slope angle in degrees of the segment from `from` to `to`.
///
/// Positive when climbing. A purely vertical segment is +/-90 and a
/// zero-length segment is 0.
///
/// # Arguments
///
/// * `from` - Start of the segment
/// * `to` - End of the segment
///
/// # Returns
///
/// `atan2(elevation change, horizontal distance)` in degrees, in `[-90, 90]`.
#[inline]
pub fn gradient_degrees(from: &Position, to: &Position) -> f64 {
    let horizontal = haversine_distance(from, to);
    let vertical = to.elevation - from.elevation;
    vertical.atan2(horizontal).to_degrees()
}

/// Total 3-D length of a sequence of positions in meters.
///
/// Sums the 3-D distance between consecutive positions. Empty or
/// single-position input returns 0.0.
///
/// # Arguments
///
/// * `positions` - Slice of positions in travel order
///
/// # Returns
///
/// Total length in meters.
pub fn polyline_length(positions: &[Position]) -> f64 {
    if positions.len() < 2 {
        return 0.0;
    }

    positions
        .windows(2)
        .map(|w| distance_3d(&w[0], &w[1]))
        .sum()
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn approx_eq(a: f64, b: f64, epsilon: f64) -> bool {
        (a - b).abs() < epsilon
    }

    #[test]
    fn test_haversine_distance_same_point() {
        let p = Position::new(51.5074, -0.1278);
        assert_eq!(haversine_distance(&p, &p), 0.0);
    }

    #[test]
    fn test_haversine_distance_known_value() {
        // London to Paris is approximately 344 km
        let london = Position::new(51.5074, -0.1278);
        let paris = Position::new(48.8566, 2.3522);
        let dist = haversine_distance(&london, &paris);
        assert!(approx_eq(dist, 343_560.0, 5000.0));
    }

    #[test]
    fn test_haversine_ignores_elevation() {
        let low = Position::with_elevation(0.0, 0.0, 0.0);
        let high = Position::with_elevation(0.0, 0.0, 500.0);
        assert_eq!(haversine_distance(&low, &high), 0.0);
    }

    #[test]
    fn test_distance_3d_vertical_only() {
        let low = Position::with_elevation(0.0, 0.0, 0.0);
        let high = Position::with_elevation(0.0, 0.0, 30.0);
        assert!(approx_eq(distance_3d(&low, &high), 30.0, 1e-9));
    }

    #[test]
    fn test_distance_3d_is_hypotenuse() {
        let a = Position::with_elevation(0.0, 0.0, 0.0);
        let b = Position::with_elevation(0.0, 0.001, 100.0);
        let h = haversine_distance(&a, &b);
        assert!(approx_eq(distance_3d(&a, &b), (h * h + 100.0 * 100.0).sqrt(), 1e-9));
    }

    #[test]
    fn test_gradient_sign_and_magnitude() {
        let a = Position::with_elevation(0.0, 0.0, 0.0);
        let b = Position::with_elevation(0.0, 0.001, 0.0);
        let h = haversine_distance(&a, &b);
        let up = Position { elevation: h, ..b };

        assert!(approx_eq(gradient_degrees(&a, &up), 45.0, 1e-9));
        assert!(approx_eq(gradient_degrees(&up, &a), -45.0, 1e-9));
        assert_eq!(gradient_degrees(&a, &b), 0.0);
    }

    #[test]
    fn test_gradient_zero_length_segment() {
        let p = Position::with_elevation(1.0, 1.0, 5.0);
        assert_eq!(gradient_degrees(&p, &p), 0.0);
    }

    #[test]
    fn test_polyline_length_empty_and_single() {
        assert_eq!(polyline_length(&[]), 0.0);
        assert_eq!(polyline_length(&[Position::new(51.5074, -0.1278)]), 0.0);
    }

    #[test]
    fn test_polyline_length_sums_segments() {
        let track = vec![
            Position::with_elevation(51.5074, -0.1278, 0.0),
            Position::with_elevation(51.5080, -0.1280, 5.0),
            Position::with_elevation(51.5090, -0.1290, 2.0),
        ];
        let expected = distance_3d(&track[0], &track[1]) + distance_3d(&track[1], &track[2]);
        assert!(approx_eq(polyline_length(&track), expected, 1e-9));
    }
}
