pub mod format;

use chrono::{DateTime, Utc};
use horizoncore::ephemeris::{BodyDetails, EphemerisRow, ObservationWindow, SkyRegion, Target};
use horizoncore::DetectionResult;
use serde::Serialize;

pub use format::ReportFormatter;

/// Everything known about one target over one window.
#[derive(Debug, Clone, Serialize)]
pub struct ObjectReport {
    pub target: Target,
    pub window_start: DateTime<Utc>,
    pub window_stop: DateTime<Utc>,
    #[serde(flatten)]
    pub outcome: ReportOutcome,
}

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ReportOutcome {
    Observed(Observation),
    Failed { reason: String },
}

#[derive(Debug, Clone, Serialize)]
pub struct Observation {
    /// Position at the start of the window.
    pub current: EphemerisRow,
    pub details: BodyDetails,
    pub detection: DetectionResult,
    pub samples: Vec<EphemerisRow>,
}

impl ObjectReport {
    pub fn observed(target: Target, window: &ObservationWindow, observation: Observation) -> Self {
        Self {
            target,
            window_start: window.start,
            window_stop: window.stop,
            outcome: ReportOutcome::Observed(observation),
        }
    }

    pub fn failed(target: Target, window: &ObservationWindow, reason: impl Into<String>) -> Self {
        Self {
            target,
            window_start: window.start,
            window_stop: window.stop,
            outcome: ReportOutcome::Failed {
                reason: reason.into(),
            },
        }
    }

    pub fn observation(&self) -> Option<&Observation> {
        match &self.outcome {
            ReportOutcome::Observed(observation) => Some(observation),
            ReportOutcome::Failed { .. } => None,
        }
    }

    pub fn is_failed(&self) -> bool {
        matches!(self.outcome, ReportOutcome::Failed { .. })
    }

    /// True when the position at the window start lies inside `region`.
    /// Failed reports have no position and are never inside.
    pub fn in_region(&self, region: &SkyRegion) -> bool {
        self.observation().is_some_and(|observation| {
            region.contains(observation.current.azimuth_deg, observation.current.altitude_deg)
        })
    }
}

/// Reports to list, keeping only those inside `region` when one is set.
pub fn select<'a>(
    reports: &'a [ObjectReport],
    region: Option<&SkyRegion>,
) -> Vec<&'a ObjectReport> {
    reports
        .iter()
        .filter(|report| region.map_or(true, |region| report.in_region(region)))
        .collect()
}
