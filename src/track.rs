//! Timestamped tracks (`<trk>`).
//!
//! A track is a route plus a timeline: for every retained waypoint, when the
//! traveller arrived and when they left. Fixes merged into a waypoint push its
//! departure later, which is where resting time comes from.

use std::path::Path;

use log::{info, warn};

use crate::config::IngestConfig;
use crate::document::{self, RawDocument};
use crate::error::{GpsError, Result};
use crate::ingest::{RawFix, RetainedSequence, Timeline, TrackBuilder};
use crate::location::LocationMatcher;
use crate::report::IngestReport;
use crate::route::RouteSummary;
use crate::stats;
use crate::waypoints::Waypoints;

const UNNAMED: &str = "Unnamed Track";

/// A recorded track: waypoints with arrival and departure times.
#[derive(Debug, Clone)]
pub struct Track {
    name: Option<String>,
    matcher: LocationMatcher,
    sequence: RetainedSequence,
    timeline: Timeline,
    report: IngestReport,
}

/// Every track statistic in one value.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TrackSummary {
    pub route: RouteSummary,
    /// Seconds
    pub total_time: u64,
    pub resting_time: u64,
    pub travelling_time: u64,
    /// m/s; `None` when some segment has zero travel time
    pub max_speed: Option<f64>,
    pub max_rate_of_ascent: Option<f64>,
    pub max_rate_of_descent: Option<f64>,
    pub average_speed: f64,
    pub average_moving_speed: f64,
}

impl Track {
    /// Build a track from timestamped fixes already in memory.
    ///
    /// Every fix needs a timestamp and timestamps must never decrease.
    pub fn from_fixes(
        name: Option<String>,
        fixes: impl IntoIterator<Item = RawFix>,
        config: IngestConfig,
    ) -> Result<Self> {
        let matcher = LocationMatcher::new(&config)?;

        let mut builder = TrackBuilder::new(matcher);
        for fix in fixes {
            builder
                .push(fix)
                .inspect_err(|e| warn!("Rejected track fix: {}", e))?;
        }
        let (sequence, timeline, mut report) = builder.finish();

        if let Some(name) = &name {
            report.set_name("Track", name.as_str());
        }

        info!(
            "Track '{}': {} positions retained, {} discarded over {}s (granularity {}m)",
            name.as_deref().unwrap_or(UNNAMED),
            report.retained(),
            report.discarded(),
            timeline.departed().last().copied().unwrap_or(0),
            matcher.granularity()
        );

        Ok(Self { name, matcher, sequence, timeline, report })
    }

    /// Build a track from the `<trk>` element of a GPX document.
    pub fn from_gpx_str(source: &str, config: IngestConfig) -> Result<Self> {
        let RawDocument { name, fixes } = document::read_track(source)
            .inspect_err(|e| warn!("Rejected track document: {}", e))?;
        Self::from_fixes(name, fixes, config)
    }

    /// Build a track from a GPX file.
    pub fn from_file(path: impl AsRef<Path>, config: IngestConfig) -> Result<Self> {
        let path = path.as_ref();
        let source = document::read_source(path)?;
        info!("Source file '{}' opened okay", path.display());

        let mut track = Self::from_gpx_str(&source, config)?;
        track.report.set_source(path.display().to_string());
        Ok(track)
    }

    /// The document's track name, or "Unnamed Track".
    pub fn name(&self) -> &str {
        self.name.as_deref().unwrap_or(UNNAMED)
    }

    pub fn names(&self) -> &[String] {
        self.sequence.names()
    }

    pub fn timeline(&self) -> &Timeline {
        &self.timeline
    }

    pub fn report(&self) -> &IngestReport {
        &self.report
    }

    pub fn build_report(&self) -> String {
        self.report.to_string()
    }

    // --- timing (seconds) ---

    pub fn total_time(&self) -> Result<u64> {
        stats::total_time(&self.timeline)
    }

    pub fn resting_time(&self) -> Result<u64> {
        stats::resting_time(&self.timeline)
    }

    pub fn travelling_time(&self) -> Result<u64> {
        stats::travelling_time(&self.timeline)
    }

    // --- speeds (m/s) ---

    pub fn max_speed(&self) -> Result<f64> {
        stats::max_speed(&self.sequence, &self.timeline)
    }

    pub fn max_rate_of_ascent(&self) -> Result<f64> {
        stats::max_rate_of_ascent(&self.sequence, &self.timeline)
    }

    pub fn max_rate_of_descent(&self) -> Result<f64> {
        stats::max_rate_of_descent(&self.sequence, &self.timeline)
    }

    pub fn average_speed(&self, include_rests: bool) -> Result<f64> {
        stats::average_speed(&self.sequence, &self.timeline, include_rests)
    }

    pub fn summary(&self) -> Result<TrackSummary> {
        let route = RouteSummary::collect(self.name(), self)?;

        Ok(TrackSummary {
            route,
            total_time: self.total_time()?,
            resting_time: self.resting_time()?,
            travelling_time: self.travelling_time()?,
            max_speed: defined_rate(self.max_speed())?,
            max_rate_of_ascent: defined_rate(self.max_rate_of_ascent())?,
            max_rate_of_descent: defined_rate(self.max_rate_of_descent())?,
            average_speed: self.average_speed(true)?,
            average_moving_speed: self.average_speed(false)?,
        })
    }
}

/// Zero travel time makes a rate undefined rather than failing the whole summary.
fn defined_rate(rate: Result<f64>) -> Result<Option<f64>> {
    match rate {
        Ok(rate) => Ok(Some(rate)),
        Err(GpsError::ZeroTravelTime { .. }) => Ok(None),
        Err(e) => Err(e),
    }
}

impl Waypoints for Track {
    fn sequence(&self) -> &RetainedSequence {
        &self.sequence
    }

    fn matcher(&self) -> &LocationMatcher {
        &self.matcher
    }
}
