//! Name and position lookups over a retained sequence.
//!
//! Position matching goes through the same [`LocationMatcher`] used during
//! ingestion, so a lookup finds a waypoint whenever ingestion would have
//! merged the query into it.

use crate::error::{GpsError, Result};
use crate::ingest::RetainedSequence;
use crate::location::LocationMatcher;
use crate::Position;

/// First retained position whose name is exactly `name`.
pub fn find_position(sequence: &RetainedSequence, name: &str) -> Result<Position> {
    sequence
        .names()
        .iter()
        .position(|n| n == name)
        .map(|idx| sequence.positions()[idx])
        .ok_or_else(|| GpsError::NameNotFound(name.to_string()))
}

/// Name of the first retained position at the same location as `position`.
///
/// Unnamed waypoints match too and yield an empty string.
pub fn find_name_of<'a>(
    sequence: &'a RetainedSequence,
    matcher: &LocationMatcher,
    position: &Position,
) -> Result<&'a str> {
    sequence
        .positions()
        .iter()
        .position(|p| matcher.same_location(p, position))
        .map(|idx| sequence.names()[idx].as_str())
        .ok_or(GpsError::PositionNotFound)
}

/// How many retained positions are at the same location as `position`.
pub fn times_visited(
    sequence: &RetainedSequence,
    matcher: &LocationMatcher,
    position: &Position,
) -> usize {
    sequence
        .positions()
        .iter()
        .filter(|p| matcher.same_location(p, position))
        .count()
}

/// Visit count for the position called `name`; 0 when no position has that name.
pub fn times_visited_named(
    sequence: &RetainedSequence,
    matcher: &LocationMatcher,
    name: &str,
) -> usize {
    match find_position(sequence, name) {
        Ok(position) => times_visited(sequence, matcher, &position),
        Err(_) => 0,
    }
}
