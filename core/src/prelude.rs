use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One altitude reading for an object at a given instant.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Sample {
    pub timestamp: DateTime<Utc>,
    pub altitude_deg: f64,
}

impl Sample {
    pub fn new(timestamp: DateTime<Utc>, altitude_deg: f64) -> Self {
        Self {
            timestamp,
            altitude_deg,
        }
    }

    /// Strictly above the horizon. Zero altitude is not above.
    pub fn is_above(&self) -> bool {
        self.altitude_deg > 0.0
    }
}

/// Ordered, validated altitude samples for one object and one observer.
///
/// A series always holds at least two samples with strictly increasing
/// timestamps and finite altitudes in `[-90, 90]`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SampleSeries {
    samples: Vec<Sample>,
}

impl SampleSeries {
    pub fn new(samples: Vec<Sample>) -> DetectResult<Self> {
        if samples.len() < 2 {
            return Err(DetectError::InvalidInput(format!(
                "expected at least 2 samples, got {}",
                samples.len()
            )));
        }

        for (idx, sample) in samples.iter().enumerate() {
            if !sample.altitude_deg.is_finite() || sample.altitude_deg.abs() > 90.0 {
                return Err(DetectError::InvalidInput(format!(
                    "sample {} has altitude {} outside [-90, 90]",
                    idx, sample.altitude_deg
                )));
            }
        }

        if let Some(idx) = samples
            .windows(2)
            .position(|pair| pair[1].timestamp <= pair[0].timestamp)
        {
            return Err(DetectError::InvalidInput(format!(
                "timestamps not strictly increasing at sample {}",
                idx + 1
            )));
        }

        Ok(Self { samples })
    }

    /// Zips parallel timestamp and altitude columns into a series.
    pub fn from_parts(timestamps: &[DateTime<Utc>], altitudes: &[f64]) -> DetectResult<Self> {
        if timestamps.len() != altitudes.len() {
            return Err(DetectError::InvalidInput(format!(
                "{} timestamps but {} altitudes",
                timestamps.len(),
                altitudes.len()
            )));
        }
        let samples = timestamps
            .iter()
            .zip(altitudes)
            .map(|(&timestamp, &altitude_deg)| Sample::new(timestamp, altitude_deg))
            .collect();
        Self::new(samples)
    }

    pub fn samples(&self) -> &[Sample] {
        &self.samples
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// Always false for a constructed series.
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn start(&self) -> DateTime<Utc> {
        self.samples[0].timestamp
    }

    pub fn stop(&self) -> DateTime<Utc> {
        self.samples[self.samples.len() - 1].timestamp
    }

    pub fn altitudes(&self) -> Vec<f64> {
        self.samples.iter().map(|s| s.altitude_deg).collect()
    }
}

/// Which kind of horizon event was detected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HorizonEventKind {
    Rise,
    Transit,
    Set,
}

/// A single rise, transit or set instant.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum HorizonEvent {
    Rise { at: DateTime<Utc> },
    Transit { at: DateTime<Utc>, altitude_deg: f64 },
    Set { at: DateTime<Utc> },
}

impl HorizonEvent {
    pub fn at(&self) -> DateTime<Utc> {
        match *self {
            HorizonEvent::Rise { at } | HorizonEvent::Set { at } => at,
            HorizonEvent::Transit { at, .. } => at,
        }
    }

    pub fn kind(&self) -> HorizonEventKind {
        match self {
            HorizonEvent::Rise { .. } => HorizonEventKind::Rise,
            HorizonEvent::Transit { .. } => HorizonEventKind::Transit,
            HorizonEvent::Set { .. } => HorizonEventKind::Set,
        }
    }
}

/// Horizon classification of a whole observation window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HorizonState {
    AlwaysBelow,
    CrossesHorizon,
    AlwaysAbove,
}

/// Outcome of running the detector over one series.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DetectionResult {
    pub rise: Option<HorizonEvent>,
    pub transit: Option<HorizonEvent>,
    pub set: Option<HorizonEvent>,
    pub state: HorizonState,
}

impl DetectionResult {
    pub fn below_horizon() -> Self {
        Self {
            rise: None,
            transit: None,
            set: None,
            state: HorizonState::AlwaysBelow,
        }
    }

    pub fn is_below_horizon(&self) -> bool {
        self.state == HorizonState::AlwaysBelow
    }

    pub fn rise_time(&self) -> Option<DateTime<Utc>> {
        self.rise.map(|e| e.at())
    }

    pub fn transit_time(&self) -> Option<DateTime<Utc>> {
        self.transit.map(|e| e.at())
    }

    pub fn set_time(&self) -> Option<DateTime<Utc>> {
        self.set.map(|e| e.at())
    }

    pub fn transit_altitude(&self) -> Option<f64> {
        match self.transit {
            Some(HorizonEvent::Transit { altitude_deg, .. }) => Some(altitude_deg),
            _ => None,
        }
    }

    /// True when the first set crossing lies before the first rise crossing.
    ///
    /// Rise and set are searched independently, so a series that starts above
    /// the horizon, dips, and rises again reports a set ahead of the rise.
    pub fn set_precedes_rise(&self) -> bool {
        matches!(
            (self.rise_time(), self.set_time()),
            (Some(rise), Some(set)) if set < rise
        )
    }

    /// Present events in rise, transit, set order.
    pub fn events(&self) -> Vec<HorizonEvent> {
        [self.rise, self.transit, self.set]
            .into_iter()
            .flatten()
            .collect()
    }
}

/// Common error type for the detection core.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum DetectError {
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("invalid observer: {0}")]
    InvalidObserver(String),
    #[error("invalid window: {0}")]
    InvalidWindow(String),
}

pub type DetectResult<T> = Result<T, DetectError>;

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, 20, 0, 0, 0).unwrap()
    }

    #[test]
    fn series_rejects_single_sample() {
        let err = SampleSeries::new(vec![Sample::new(t0(), 10.0)]).unwrap_err();
        assert!(matches!(err, DetectError::InvalidInput(_)));
    }

    #[test]
    fn series_rejects_empty_input() {
        assert!(SampleSeries::new(Vec::new()).is_err());
    }

    #[test]
    fn series_rejects_duplicate_timestamps() {
        let samples = vec![Sample::new(t0(), -1.0), Sample::new(t0(), 1.0)];
        assert!(matches!(
            SampleSeries::new(samples),
            Err(DetectError::InvalidInput(_))
        ));
    }

    #[test]
    fn series_rejects_out_of_range_altitude() {
        let samples = vec![
            Sample::new(t0(), 10.0),
            Sample::new(t0() + Duration::hours(1), f64::NAN),
        ];
        assert!(SampleSeries::new(samples).is_err());

        let samples = vec![
            Sample::new(t0(), 91.0),
            Sample::new(t0() + Duration::hours(1), 0.0),
        ];
        assert!(SampleSeries::new(samples).is_err());
    }

    #[test]
    fn series_from_parts_checks_lengths() {
        let times = [t0(), t0() + Duration::minutes(15)];
        assert!(SampleSeries::from_parts(&times, &[1.0]).is_err());

        let series = SampleSeries::from_parts(&times, &[1.0, 2.0]).unwrap();
        assert_eq!(series.len(), 2);
        assert!(!series.is_empty());
        assert_eq!(series.start(), times[0]);
        assert_eq!(series.stop(), times[1]);
        assert_eq!(series.altitudes(), vec![1.0, 2.0]);
    }

    #[test]
    fn zero_altitude_is_not_above() {
        assert!(!Sample::new(t0(), 0.0).is_above());
        assert!(Sample::new(t0(), 1e-9).is_above());
    }

    #[test]
    fn set_before_rise_is_flagged() {
        let result = DetectionResult {
            rise: Some(HorizonEvent::Rise {
                at: t0() + Duration::hours(5),
            }),
            transit: None,
            set: Some(HorizonEvent::Set {
                at: t0() + Duration::hours(1),
            }),
            state: HorizonState::CrossesHorizon,
        };
        assert!(result.set_precedes_rise());
        assert_eq!(result.events().len(), 2);
        assert_eq!(result.events()[0].kind(), HorizonEventKind::Rise);
    }
}
