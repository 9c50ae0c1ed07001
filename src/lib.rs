//! # Route Stats
//!
//! GPS route and track ingestion with summary statistics.
//!
//! This library provides:
//! - Reading GPX-shaped route (`<rte>`) and track (`<trk>`) documents
//! - Tolerance-based merging of noisy, near-duplicate fixes into waypoints
//! - Distance, elevation, gradient, speed and resting/travelling time statistics
//! - Name and position lookups that honour the same merge tolerance
//!
//! ## Features
//!
//! - **`serde`** - Derive `Serialize`/`Deserialize` for positions, configs and summaries
//!
//! ## Quick Start
//!
//! ```rust
//! use route_stats::{IngestConfig, Track, Waypoints};
//!
//! let gpx = r#"<gpx><trk><name>Morning walk</name><trkseg>
//!     <trkpt lat="0" lon="0"><ele>10</ele><time>0</time></trkpt>
//!     <trkpt lat="0" lon="0.00001"><ele>10</ele><time>10</time></trkpt>
//!     <trkpt lat="0" lon="0.01"><ele>20</ele><time>20</time></trkpt>
//! </trkseg></trk></gpx>"#;
//!
//! let track = Track::from_gpx_str(gpx, IngestConfig::new(5.0).unwrap()).unwrap();
//! assert_eq!(track.num_positions(), 2);
//! assert_eq!(track.resting_time().unwrap(), 10);
//! println!("{} is {:.0}m long", track.name(), track.total_length());
//! ```
//!
//! ## Merge Model
//!
//! Each incoming fix is compared against the *last retained* position. If the two are
//! closer than the configured granularity the fix is discarded (for a track, it extends
//! the departure time of the retained waypoint instead). Everything downstream reads the
//! frozen result; there are no mutators after construction.

pub mod config;
pub mod document;
pub mod error;
pub mod geo_utils;
pub mod ingest;
pub mod location;
pub mod lookup;
pub mod report;
pub mod route;
pub mod stats;
pub mod track;
pub mod waypoints;

pub use config::IngestConfig;
pub use error::{GpsError, Result};
pub use ingest::{RawFix, RetainedSequence, SequenceBuilder, Timeline, TrackBuilder};
pub use location::LocationMatcher;
pub use report::{FixDecision, IngestReport};
pub use route::{Route, RouteSummary};
pub use track::{Track, TrackSummary};
pub use waypoints::Waypoints;

// ============================================================================
// Core Types
// ============================================================================

/// A geodetic fix: latitude and longitude in degrees, elevation in metres.
///
/// `PartialEq` is plain coordinate equality. Whether two positions are the
/// "same place" is a separate question answered by [`LocationMatcher`].
///
/// # Example
/// ```
/// use route_stats::Position;
/// let summit = Position::with_elevation(53.4534, -1.8544, 636.0); // Kinder Scout
/// let sea_level = Position::new(51.5074, -0.1278);
/// assert_eq!(sea_level.elevation, 0.0);
/// assert!(summit.is_valid());
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Position {
    pub latitude: f64,
    pub longitude: f64,
    pub elevation: f64,
}

impl Position {
    /// Create a position at elevation 0.
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self { latitude, longitude, elevation: 0.0 }
    }

    /// Create a position with an explicit elevation.
    pub fn with_elevation(latitude: f64, longitude: f64, elevation: f64) -> Self {
        Self { latitude, longitude, elevation }
    }

    /// Check if the position has valid coordinates.
    pub fn is_valid(&self) -> bool {
        self.latitude.is_finite()
            && self.longitude.is_finite()
            && self.elevation.is_finite()
            && self.latitude >= -90.0
            && self.latitude <= 90.0
            && self.longitude >= -180.0
            && self.longitude <= 180.0
    }
}

impl std::fmt::Display for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "lat: {}, lon: {}, ele: {}m",
            self.latitude, self.longitude, self.elevation
        )
    }
}

/// Bounding box of a retained sequence, including the elevation range.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Bounds {
    pub min_lat: f64,
    pub max_lat: f64,
    pub min_lng: f64,
    pub max_lng: f64,
    pub min_ele: f64,
    pub max_ele: f64,
}

impl Bounds {
    /// Create bounds from positions. Returns `None` for an empty slice.
    pub fn from_positions(positions: &[Position]) -> Option<Self> {
        let first = positions.first()?;
        let mut bounds = Self {
            min_lat: first.latitude,
            max_lat: first.latitude,
            min_lng: first.longitude,
            max_lng: first.longitude,
            min_ele: first.elevation,
            max_ele: first.elevation,
        };

        for p in &positions[1..] {
            bounds.min_lat = bounds.min_lat.min(p.latitude);
            bounds.max_lat = bounds.max_lat.max(p.latitude);
            bounds.min_lng = bounds.min_lng.min(p.longitude);
            bounds.max_lng = bounds.max_lng.max(p.longitude);
            bounds.min_ele = bounds.min_ele.min(p.elevation);
            bounds.max_ele = bounds.max_ele.max(p.elevation);
        }

        Some(bounds)
    }
}

// ============================================================================
// Tests
// ============================================================================
