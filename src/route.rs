//! Untimed routes (`<rte>`).

use std::path::Path;

use log::{info, warn};

use crate::config::IngestConfig;
use crate::document::{self, RawDocument};
use crate::error::Result;
use crate::ingest::{RawFix, RetainedSequence, SequenceBuilder};
use crate::location::LocationMatcher;
use crate::report::IngestReport;
use crate::waypoints::Waypoints;
use crate::Bounds;

const UNNAMED: &str = "Unnamed Route";

/// A planned route: ordered waypoints with no timing.
///
/// Built once from its fixes and immutable afterwards.
#[derive(Debug, Clone)]
pub struct Route {
    name: Option<String>,
    matcher: LocationMatcher,
    sequence: RetainedSequence,
    report: IngestReport,
}

/// Every route statistic in one value.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RouteSummary {
    pub name: String,
    pub num_positions: usize,
    /// Meters
    pub total_length: f64,
    pub net_length: f64,
    pub total_height_gain: f64,
    pub net_height_gain: f64,
    pub bounds: Bounds,
    /// Degrees
    pub min_gradient: f64,
    pub max_gradient: f64,
    pub steepest_gradient: f64,
}

impl Route {
    /// Build a route from fixes already in memory.
    pub fn from_fixes(
        name: Option<String>,
        fixes: impl IntoIterator<Item = RawFix>,
        config: IngestConfig,
    ) -> Result<Self> {
        let matcher = LocationMatcher::new(&config)?;

        let mut builder = SequenceBuilder::new(matcher);
        for fix in fixes {
            builder.push(fix);
        }
        let (sequence, mut report) = builder.finish();

        if let Some(name) = &name {
            report.set_name("Route", name.as_str());
        }

        info!(
            "Route '{}': {} positions retained, {} discarded (granularity {}m)",
            name.as_deref().unwrap_or(UNNAMED),
            report.retained(),
            report.discarded(),
            matcher.granularity()
        );

        Ok(Self { name, matcher, sequence, report })
    }

    /// Build a route from the `<rte>` element of a GPX document.
    pub fn from_gpx_str(source: &str, config: IngestConfig) -> Result<Self> {
        let RawDocument { name, fixes } = document::read_route(source)
            .inspect_err(|e| warn!("Rejected route document: {}", e))?;
        Self::from_fixes(name, fixes, config)
    }

    /// Build a route from a GPX file.
    pub fn from_file(path: impl AsRef<Path>, config: IngestConfig) -> Result<Self> {
        let path = path.as_ref();
        let source = document::read_source(path)?;
        info!("Source file '{}' opened okay", path.display());

        let mut route = Self::from_gpx_str(&source, config)?;
        route.report.set_source(path.display().to_string());
        Ok(route)
    }

    /// The document's route name, or "Unnamed Route".
    pub fn name(&self) -> &str {
        self.name.as_deref().unwrap_or(UNNAMED)
    }

    pub fn names(&self) -> &[String] {
        self.sequence.names()
    }

    pub fn report(&self) -> &IngestReport {
        &self.report
    }

    /// Human-readable log of every merge decision.
    pub fn build_report(&self) -> String {
        self.report.to_string()
    }

    pub fn summary(&self) -> Result<RouteSummary> {
        RouteSummary::collect(self.name(), self)
    }
}

impl RouteSummary {
    pub(crate) fn collect(name: &str, waypoints: &impl Waypoints) -> Result<Self> {
        Ok(Self {
            name: name.to_string(),
            num_positions: waypoints.num_positions(),
            total_length: waypoints.total_length(),
            net_length: waypoints.net_length()?,
            total_height_gain: waypoints.total_height_gain()?,
            net_height_gain: waypoints.net_height_gain()?,
            bounds: waypoints.bounds()?,
            min_gradient: waypoints.min_gradient()?,
            max_gradient: waypoints.max_gradient()?,
            steepest_gradient: waypoints.steepest_gradient()?,
        })
    }
}

impl Waypoints for Route {
    fn sequence(&self) -> &RetainedSequence {
        &self.sequence
    }

    fn matcher(&self) -> &LocationMatcher {
        &self.matcher
    }
}
