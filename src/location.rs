//! Same-location predicate.
//!
//! Position identity throughout the crate is spatial tolerance, never coordinate
//! equality: two fixes a metre apart are the same waypoint if the granularity says so.
//! The matcher is the only place that decision is made, so ingestion and lookups
//! always agree.

use crate::config::IngestConfig;
use crate::error::Result;
use crate::geo_utils::haversine_distance;
use crate::Position;

/// Classifies pairs of positions as the same place under a fixed granularity.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LocationMatcher {
    granularity: f64,
}

impl LocationMatcher {
    /// Build a matcher from a config, rejecting an invalid granularity.
    pub fn new(config: &IngestConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { granularity: config.granularity })
    }

    /// Distance threshold in meters.
    pub fn granularity(&self) -> f64 {
        self.granularity
    }

    /// True when the horizontal distance is strictly below the granularity.
    ///
    /// Identical latitude/longitude always match, so a granularity of 0 merges
    /// exactly the bit-identical coordinates and nothing else.
    #[inline]
    pub fn same_location(&self, p1: &Position, p2: &Position) -> bool {
        (p1.latitude == p2.latitude && p1.longitude == p2.longitude)
            || haversine_distance(p1, p2) < self.granularity
    }
}
