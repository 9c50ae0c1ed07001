//! Ingestion configuration.

use crate::error::{GpsError, Result};

/// Configuration for route and track ingestion.
///
/// Supplied once when a [`Route`](crate::Route) or [`Track`](crate::Track) is built.
/// There is no way to change it afterwards: the retained sequence was derived
/// from it and would no longer be consistent.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct IngestConfig {
    /// Distance in meters below which two positions are the same location.
    /// Fixes closer than this to the last retained position are merged into it.
    /// Default: 5.0 meters (typical consumer GPS jitter)
    pub granularity: f64,
}

impl Default for IngestConfig {
    fn default() -> Self {
        Self { granularity: 5.0 }
    }
}

impl IngestConfig {
    /// Create a validated config.
    ///
    /// Returns [`GpsError::InvalidGranularity`] for negative, NaN or infinite values.
    pub fn new(granularity: f64) -> Result<Self> {
        let config = Self { granularity };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.granularity.is_finite() && self.granularity >= 0.0 {
            Ok(())
        } else {
            Err(GpsError::InvalidGranularity(self.granularity))
        }
    }
}
