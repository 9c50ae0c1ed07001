//! Processing report: one entry per fix decision made during ingestion.
//!
//! The rendered text is a diagnostic for humans. Code should read the
//! counts and decisions directly.

use std::fmt;

use crate::Position;

/// What ingestion did with a single raw fix.
#[derive(Debug, Clone, PartialEq)]
pub enum FixDecision {
    /// Retained as a new waypoint. `elapsed` is set for tracks.
    Added {
        index: usize,
        position: Position,
        elapsed: Option<u64>,
    },
    /// Merged into the previous waypoint.
    Ignored { index: usize, position: Position },
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct IngestReport {
    source: Option<String>,
    /// ("Route", "Morning walk") style label for the entity name line
    name: Option<(&'static str, String)>,
    decisions: Vec<FixDecision>,
}

impl IngestReport {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn set_source(&mut self, source: impl Into<String>) {
        self.source = Some(source.into());
    }

    pub(crate) fn set_name(&mut self, kind: &'static str, name: impl Into<String>) {
        self.name = Some((kind, name.into()));
    }

    pub(crate) fn record(&mut self, decision: FixDecision) {
        self.decisions.push(decision);
    }

    /// Every decision, in input order.
    pub fn decisions(&self) -> &[FixDecision] {
        &self.decisions
    }

    /// Number of fixes kept as distinct waypoints.
    pub fn retained(&self) -> usize {
        self.decisions
            .iter()
            .filter(|d| matches!(d, FixDecision::Added { .. }))
            .count()
    }

    /// Number of fixes merged into a previous waypoint.
    pub fn discarded(&self) -> usize {
        self.decisions.len() - self.retained()
    }

    /// Total fixes seen.
    pub fn total(&self) -> usize {
        self.decisions.len()
    }
}

impl fmt::Display for IngestReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(source) = &self.source {
            writeln!(f, "Source file '{}' opened okay.", source)?;
        }
        if let Some((kind, name)) = &self.name {
            writeln!(f, "{} name is: {}", kind, name)?;
        }
        for decision in &self.decisions {
            match decision {
                FixDecision::Added { position, elapsed, .. } => {
                    writeln!(f, "Position added: {}", position)?;
                    if let Some(t) = elapsed {
                        writeln!(f, " at time: {}", t)?;
                    }
                }
                FixDecision::Ignored { position, .. } => {
                    writeln!(f, "Position ignored: {}", position)?;
                }
            }
        }
        writeln!(f, "{} positions added.", self.retained())
    }
}
