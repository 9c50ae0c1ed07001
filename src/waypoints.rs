//! Queries shared by every entity built on a [`RetainedSequence`].

use crate::error::Result;
use crate::ingest::RetainedSequence;
use crate::location::LocationMatcher;
use crate::{lookup, stats, Bounds, Position};

/// Read-only view of a retained sequence together with the matcher it was built with.
///
/// Implementors only provide the two accessors; every statistic and lookup is
/// derived from them.
pub trait Waypoints {
    fn sequence(&self) -> &RetainedSequence;

    fn matcher(&self) -> &LocationMatcher;

    /// Granularity in meters, fixed at construction.
    fn granularity(&self) -> f64 {
        self.matcher().granularity()
    }

    fn num_positions(&self) -> usize {
        self.sequence().len()
    }

    fn positions(&self) -> &[Position] {
        self.sequence().positions()
    }

    /// Bounds-checked indexed access.
    fn position(&self, index: usize) -> Result<Position> {
        self.sequence().get(index).copied()
    }

    // --- distance and elevation ---

    fn total_length(&self) -> f64 {
        stats::total_length(self.sequence())
    }

    fn net_length(&self) -> Result<f64> {
        stats::net_length(self.sequence(), self.matcher())
    }

    fn total_height_gain(&self) -> Result<f64> {
        stats::total_height_gain(self.sequence())
    }

    fn net_height_gain(&self) -> Result<f64> {
        stats::net_height_gain(self.sequence())
    }

    fn bounds(&self) -> Result<Bounds> {
        stats::bounds(self.sequence())
    }

    fn min_latitude(&self) -> Result<f64> {
        Ok(self.bounds()?.min_lat)
    }

    fn max_latitude(&self) -> Result<f64> {
        Ok(self.bounds()?.max_lat)
    }

    fn min_longitude(&self) -> Result<f64> {
        Ok(self.bounds()?.min_lng)
    }

    fn max_longitude(&self) -> Result<f64> {
        Ok(self.bounds()?.max_lng)
    }

    fn min_elevation(&self) -> Result<f64> {
        Ok(self.bounds()?.min_ele)
    }

    fn max_elevation(&self) -> Result<f64> {
        Ok(self.bounds()?.max_ele)
    }

    // --- gradients (degrees) ---

    fn max_gradient(&self) -> Result<f64> {
        stats::max_gradient(self.sequence())
    }

    fn min_gradient(&self) -> Result<f64> {
        stats::min_gradient(self.sequence())
    }

    fn steepest_gradient(&self) -> Result<f64> {
        stats::steepest_gradient(self.sequence())
    }

    // --- lookups ---

    fn find_position(&self, name: &str) -> Result<Position> {
        lookup::find_position(self.sequence(), name)
    }

    fn find_name_of(&self, position: &Position) -> Result<&str> {
        lookup::find_name_of(self.sequence(), self.matcher(), position)
    }

    fn times_visited(&self, position: &Position) -> usize {
        lookup::times_visited(self.sequence(), self.matcher(), position)
    }

    /// 0 when no position has that name.
    fn times_visited_named(&self, name: &str) -> usize {
        lookup::times_visited_named(self.sequence(), self.matcher(), name)
    }
}
