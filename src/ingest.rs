//! # Ingestion and Merge
//!
//! Turns an ordered stream of raw fixes into the retained model in one forward pass.
//!
//! ## Algorithm
//! 1. The first fix is always retained; for a track its timestamp becomes the epoch
//! 2. Each later fix is compared with the *last retained* position (not the previous raw fix)
//! 3. Same location: the fix is discarded; a track pushes the waypoint's departure time forward
//! 4. Different location: the fix is appended and the running 3-D length is extended
//!
//! Comparing against the last retained position means slow drift across many
//! near-duplicate fixes collapses into one waypoint instead of a chain of
//! marginal comparisons.
//!
//! The builders only ever append a waypoint or extend the last one, so the
//! cumulative length is never re-derived during ingestion.

use log::debug;

use crate::error::{GpsError, Result};
use crate::geo_utils::{distance_3d, polyline_length};
use crate::location::LocationMatcher;
use crate::report::{FixDecision, IngestReport};
use crate::Position;

// =============================================================================
// Raw Input
// =============================================================================

/// One recorded sample before any merge decision.
#[derive(Debug, Clone, PartialEq)]
pub struct RawFix {
    pub position: Position,
    pub name: Option<String>,
    /// Seconds on any fixed clock (Unix time, device uptime...). Required for tracks.
    pub timestamp: Option<i64>,
}

impl RawFix {
    pub fn new(position: Position) -> Self {
        Self { position, name: None, timestamp: None }
    }

    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn at(mut self, timestamp: i64) -> Self {
        self.timestamp = Some(timestamp);
        self
    }
}

// =============================================================================
// Retained Model
// =============================================================================

/// The positions kept after merging, with index-aligned names and the
/// accumulated 3-D path length.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RetainedSequence {
    positions: Vec<Position>,
    /// Empty string means unnamed
    names: Vec<String>,
    cumulative_length: f64,
}

impl RetainedSequence {
    pub fn positions(&self) -> &[Position] {
        &self.positions
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// Sum of 3-D distances between consecutive positions, accumulated during ingestion.
    pub fn cumulative_length(&self) -> f64 {
        self.cumulative_length
    }

    /// The same length computed from scratch over the final positions.
    pub fn recomputed_length(&self) -> f64 {
        polyline_length(&self.positions)
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Bounds-checked indexed access.
    pub fn get(&self, index: usize) -> Result<&Position> {
        self.positions.get(index).ok_or(GpsError::IndexOutOfRange {
            index,
            len: self.positions.len(),
        })
    }

    pub fn first(&self) -> Result<&Position> {
        self.positions.first().ok_or(GpsError::EmptySequence)
    }

    pub fn last(&self) -> Result<&Position> {
        self.positions.last().ok_or(GpsError::EmptySequence)
    }

    fn retain(&mut self, position: Position, name: String) {
        if let Some(previous) = self.positions.last() {
            self.cumulative_length += distance_3d(previous, &position);
        }
        self.positions.push(position);
        self.names.push(name);
    }
}

/// Arrival and departure times (seconds since the first fix) per retained position.
///
/// `arrived[i] <= departed[i]` and `departed[i - 1] <= arrived[i]` always hold.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Timeline {
    arrived: Vec<u64>,
    departed: Vec<u64>,
}

impl Timeline {
    pub fn arrived(&self) -> &[u64] {
        &self.arrived
    }

    pub fn departed(&self) -> &[u64] {
        &self.departed
    }

    pub fn len(&self) -> usize {
        self.arrived.len()
    }

    pub fn is_empty(&self) -> bool {
        self.arrived.is_empty()
    }

    fn retain(&mut self, elapsed: u64) {
        self.arrived.push(elapsed);
        self.departed.push(elapsed);
    }

    fn extend_last(&mut self, elapsed: u64) {
        if let Some(last) = self.departed.last_mut() {
            *last = elapsed;
        }
    }
}

// =============================================================================
// Builders
// =============================================================================

/// Builds a [`RetainedSequence`] from untimed fixes (routes).
#[derive(Debug)]
pub struct SequenceBuilder {
    matcher: LocationMatcher,
    sequence: RetainedSequence,
    report: IngestReport,
    seen: usize,
}

impl SequenceBuilder {
    pub fn new(matcher: LocationMatcher) -> Self {
        Self {
            matcher,
            sequence: RetainedSequence::default(),
            report: IngestReport::new(),
            seen: 0,
        }
    }

    /// Offer the next fix. Returns true if it became a new waypoint.
    pub fn push(&mut self, fix: RawFix) -> bool {
        self.accept(fix, None)
    }

    /// Number of fixes offered so far.
    pub fn seen(&self) -> usize {
        self.seen
    }

    pub fn finish(self) -> (RetainedSequence, IngestReport) {
        (self.sequence, self.report)
    }

    fn is_same_as_last(&self, position: &Position) -> bool {
        self.sequence
            .positions
            .last()
            .is_some_and(|last| self.matcher.same_location(last, position))
    }

    fn accept(&mut self, fix: RawFix, elapsed: Option<u64>) -> bool {
        let index = self.seen;
        self.seen += 1;

        if self.is_same_as_last(&fix.position) {
            debug!("Fix {} ignored: {}", index, fix.position);
            self.report.record(FixDecision::Ignored { index, position: fix.position });
            return false;
        }

        debug!("Fix {} added: {}", index, fix.position);
        self.report.record(FixDecision::Added { index, position: fix.position, elapsed });
        self.sequence.retain(fix.position, fix.name.unwrap_or_default());
        true
    }
}

/// Builds a [`RetainedSequence`] plus its [`Timeline`] from timestamped fixes (tracks).
#[derive(Debug)]
pub struct TrackBuilder {
    inner: SequenceBuilder,
    timeline: Timeline,
    epoch: Option<i64>,
    last_timestamp: i64,
}

impl TrackBuilder {
    pub fn new(matcher: LocationMatcher) -> Self {
        Self {
            inner: SequenceBuilder::new(matcher),
            timeline: Timeline::default(),
            epoch: None,
            last_timestamp: 0,
        }
    }

    /// Offer the next fix. Returns true if it became a new waypoint.
    ///
    /// Fails if the fix has no timestamp or goes back in time. The builder
    /// must be abandoned after an error.
    pub fn push(&mut self, fix: RawFix) -> Result<bool> {
        let index = self.inner.seen();
        let timestamp = fix.timestamp.ok_or(GpsError::MissingTimestamp { index })?;

        let epoch = match self.epoch {
            Some(epoch) => {
                if timestamp < self.last_timestamp {
                    return Err(GpsError::TimestampOutOfOrder {
                        index,
                        previous: self.last_timestamp,
                        found: timestamp,
                    });
                }
                epoch
            }
            None => {
                self.epoch = Some(timestamp);
                timestamp
            }
        };
        self.last_timestamp = timestamp;

        // Non-negative: timestamps never decrease from the epoch
        let elapsed = timestamp.abs_diff(epoch);

        let retained = self.inner.accept(fix, Some(elapsed));
        if retained {
            self.timeline.retain(elapsed);
        } else {
            self.timeline.extend_last(elapsed);
        }
        Ok(retained)
    }

    pub fn finish(self) -> (RetainedSequence, Timeline, IngestReport) {
        let (sequence, report) = self.inner.finish();
        (sequence, self.timeline, report)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::IngestConfig;

    fn approx_eq(a: f64, b: f64, epsilon: f64) -> bool {
        (a - b).abs() < epsilon
    }

    fn matcher(granularity: f64) -> LocationMatcher {
        LocationMatcher::new(&IngestConfig::new(granularity).unwrap()).unwrap()
    }

    fn fix(lat: f64, lon: f64) -> RawFix {
        RawFix::new(Position::new(lat, lon))
    }

    #[test]
    fn test_first_fix_always_retained() {
        let mut builder = SequenceBuilder::new(matcher(5.0));
        assert!(builder.push(fix(51.5, -0.1)));
        let (seq, report) = builder.finish();
        assert_eq!(seq.len(), 1);
        assert_eq!(seq.names(), &["".to_string()]);
        assert_eq!(seq.cumulative_length(), 0.0);
        assert_eq!(report.retained(), 1);
    }

    #[test]
    fn test_near_duplicate_discarded() {
        let mut builder = SequenceBuilder::new(matcher(5.0));
        builder.push(fix(0.0, 0.0).named("start"));
        assert!(!builder.push(fix(0.0, 0.00001).named("noise")));
        let (seq, report) = builder.finish();
        assert_eq!(seq.len(), 1);
        assert_eq!(seq.names()[0], "start");
        assert_eq!(report.discarded(), 1);
    }

    #[test]
    fn test_compares_against_last_retained_not_last_raw() {
        // Each step is ~3.3m: under 5m from the previous raw fix, but the
        // third fix is ~6.7m from the retained one and so becomes new.
        let mut builder = SequenceBuilder::new(matcher(5.0));
        builder.push(fix(0.0, 0.0));
        assert!(!builder.push(fix(0.0, 0.00003)));
        assert!(builder.push(fix(0.0, 0.00006)));
        let (seq, _) = builder.finish();
        assert_eq!(seq.len(), 2);
        assert_eq!(seq.positions()[1], Position::new(0.0, 0.00006));
    }

    #[test]
    fn test_cumulative_length_matches_recomputed() {
        let mut builder = SequenceBuilder::new(matcher(5.0));
        for i in 0..20 {
            let lat = 51.5 + i as f64 * 0.0003;
            let ele = (i as f64 * 0.7).sin() * 30.0;
            builder.push(RawFix::new(Position::with_elevation(lat, -0.1, ele)));
            // jitter that should merge
            builder.push(RawFix::new(Position::with_elevation(lat, -0.100001, ele)));
        }
        let (seq, report) = builder.finish();
        assert_eq!(seq.len(), 20);
        assert_eq!(report.discarded(), 20);
        assert!(approx_eq(seq.cumulative_length(), seq.recomputed_length(), 1e-6));
    }

    #[test]
    fn test_names_stay_aligned() {
        let mut builder = SequenceBuilder::new(matcher(1.0));
        builder.push(fix(0.0, 0.0).named("A"));
        builder.push(fix(0.0, 0.01));
        builder.push(fix(0.0, 0.02).named("C"));
        let (seq, _) = builder.finish();
        assert_eq!(seq.names(), &["A".to_string(), String::new(), "C".to_string()]);
        assert_eq!(seq.positions().len(), seq.names().len());
    }

    #[test]
    fn test_get_bounds_checked() {
        let mut builder = SequenceBuilder::new(matcher(1.0));
        builder.push(fix(0.0, 0.0));
        let (seq, _) = builder.finish();
        assert!(seq.get(0).is_ok());
        assert!(matches!(seq.get(1), Err(GpsError::IndexOutOfRange { index: 1, len: 1 })));
    }

    #[test]
    fn test_empty_sequence_first_last() {
        let seq = RetainedSequence::default();
        assert!(matches!(seq.first(), Err(GpsError::EmptySequence)));
        assert!(matches!(seq.last(), Err(GpsError::EmptySequence)));
        assert_eq!(seq.cumulative_length(), 0.0);
    }

    #[test]
    fn test_track_merge_extends_departure() {
        let mut builder = TrackBuilder::new(matcher(5.0));
        assert!(builder.push(fix(0.0, 0.0).at(1000)).unwrap());
        assert!(!builder.push(fix(0.0, 0.00001).at(1010)).unwrap());
        assert!(builder.push(fix(0.0, 0.01).at(1020)).unwrap());

        let (seq, timeline, report) = builder.finish();
        assert_eq!(seq.len(), 2);
        assert_eq!(timeline.arrived(), &[0, 20]);
        assert_eq!(timeline.departed(), &[10, 20]);
        assert_eq!(report.retained(), 2);
        assert_eq!(report.discarded(), 1);
    }

    #[test]
    fn test_track_repeated_dwell_keeps_latest_departure() {
        let mut builder = TrackBuilder::new(matcher(5.0));
        builder.push(fix(0.0, 0.0).at(0)).unwrap();
        builder.push(fix(0.0, 0.00001).at(5)).unwrap();
        builder.push(fix(0.0, 0.00002).at(9)).unwrap();
        let (_, timeline, _) = builder.finish();
        assert_eq!(timeline.arrived(), &[0]);
        assert_eq!(timeline.departed(), &[9]);
    }

    #[test]
    fn test_track_missing_timestamp() {
        let mut builder = TrackBuilder::new(matcher(5.0));
        builder.push(fix(0.0, 0.0).at(0)).unwrap();
        let err = builder.push(fix(0.0, 0.01)).unwrap_err();
        assert!(matches!(err, GpsError::MissingTimestamp { index: 1 }));
    }

    #[test]
    fn test_track_time_reversal_rejected() {
        let mut builder = TrackBuilder::new(matcher(5.0));
        builder.push(fix(0.0, 0.0).at(100)).unwrap();
        builder.push(fix(0.0, 0.01).at(150)).unwrap();
        let err = builder.push(fix(0.0, 0.02).at(140)).unwrap_err();
        assert!(matches!(
            err,
            GpsError::TimestampOutOfOrder { index: 2, previous: 150, found: 140 }
        ));
    }

    #[test]
    fn test_track_negative_epoch() {
        let mut builder = TrackBuilder::new(matcher(5.0));
        builder.push(fix(0.0, 0.0).at(-30)).unwrap();
        builder.push(fix(0.0, 0.01).at(-5)).unwrap();
        let (_, timeline, _) = builder.finish();
        assert_eq!(timeline.arrived(), &[0, 25]);
    }
}
