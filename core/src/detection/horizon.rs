//! Rise, transit and set detection over a sampled altitude series.
//!
//! Rise and set instants are linearly interpolated between the two samples
//! that straddle the horizon. Transit is reported at sample resolution, at
//! the first sample holding the window's highest altitude. Only the first
//! crossing in each direction is reported, and the two directions are
//! searched independently of each other.

use chrono::{DateTime, Utc};

use crate::detection::classify::classify;
use crate::math::interpolation::horizon_crossing;
use crate::math::stats::StatsHelper;
use crate::prelude::{
    DetectResult, DetectionResult, HorizonEvent, HorizonState, Sample, SampleSeries,
};

/// Stateless detector; every call is independent of the previous one.
#[derive(Debug, Clone, Copy, Default)]
pub struct HorizonDetector;

impl HorizonDetector {
    pub fn new() -> Self {
        Self
    }

    pub fn detect(&self, series: &SampleSeries) -> DetectionResult {
        detect(series)
    }
}

/// Runs horizon event detection over an already validated series.
pub fn detect(series: &SampleSeries) -> DetectionResult {
    let state = classify(series);
    if state == HorizonState::AlwaysBelow {
        return DetectionResult::below_horizon();
    }

    let samples = series.samples();
    DetectionResult {
        rise: first_crossing(samples, |prev, next| !prev.is_above() && next.is_above())
            .map(|at| HorizonEvent::Rise { at }),
        transit: find_transit(samples),
        set: first_crossing(samples, |prev, next| prev.is_above() && !next.is_above())
            .map(|at| HorizonEvent::Set { at }),
        state,
    }
}

/// Validates raw samples and runs detection.
pub fn detect_samples(samples: Vec<Sample>) -> DetectResult<DetectionResult> {
    let series = SampleSeries::new(samples)?;
    Ok(detect(&series))
}

fn first_crossing<F>(samples: &[Sample], straddles: F) -> Option<DateTime<Utc>>
where
    F: Fn(&Sample, &Sample) -> bool,
{
    samples
        .windows(2)
        .find(|pair| straddles(&pair[0], &pair[1]))
        .map(|pair| horizon_crossing(&pair[0], &pair[1]))
}

fn find_transit(samples: &[Sample]) -> Option<HorizonEvent> {
    let altitudes: Vec<f64> = samples.iter().map(|s| s.altitude_deg).collect();
    match StatsHelper::argmax(&altitudes) {
        Some((idx, altitude_deg)) if altitude_deg > 0.0 => Some(HorizonEvent::Transit {
            at: samples[idx].timestamp,
            altitude_deg,
        }),
        _ => None,
    }
}
