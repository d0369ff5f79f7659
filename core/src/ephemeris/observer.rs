use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::prelude::{DetectError, DetectResult};

/// Fixed geographic location of the observer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ObserverConfig {
    pub name: String,
    pub latitude_deg: f64,
    pub longitude_deg: f64,
    pub elevation_m: f64,
}

impl Default for ObserverConfig {
    fn default() -> Self {
        Self {
            name: "Kansas City, MO".into(),
            latitude_deg: 39.0997,
            longitude_deg: -94.5786,
            elevation_m: 0.0,
        }
    }
}

impl ObserverConfig {
    pub fn new(
        name: impl Into<String>,
        latitude_deg: f64,
        longitude_deg: f64,
        elevation_m: f64,
    ) -> DetectResult<Self> {
        let config = Self {
            name: name.into(),
            latitude_deg,
            longitude_deg,
            elevation_m,
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> DetectResult<()> {
        if !(-90.0..=90.0).contains(&self.latitude_deg) {
            return Err(DetectError::InvalidObserver(format!(
                "latitude {} outside [-90, 90]",
                self.latitude_deg
            )));
        }
        if !(-180.0..=180.0).contains(&self.longitude_deg) {
            return Err(DetectError::InvalidObserver(format!(
                "longitude {} outside [-180, 180]",
                self.longitude_deg
            )));
        }
        if !self.elevation_m.is_finite() {
            return Err(DetectError::InvalidObserver("elevation is not finite".into()));
        }
        Ok(())
    }

    pub fn elevation_km(&self) -> f64 {
        self.elevation_m / 1000.0
    }
}

/// Upper bound on the number of instants a window may hold.
pub const MAX_WINDOW_SAMPLES: i64 = 100_000;

/// Bounded, evenly stepped observation window.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ObservationWindow {
    pub start: DateTime<Utc>,
    pub stop: DateTime<Utc>,
    pub step_minutes: u32,
}

impl ObservationWindow {
    pub fn new(start: DateTime<Utc>, stop: DateTime<Utc>, step_minutes: u32) -> DetectResult<Self> {
        if stop <= start {
            return Err(DetectError::InvalidWindow(format!(
                "stop {} is not after start {}",
                stop, start
            )));
        }
        if step_minutes == 0 {
            return Err(DetectError::InvalidWindow("step must be positive".into()));
        }
        let steps = (stop - start).num_minutes() / i64::from(step_minutes);
        if steps >= MAX_WINDOW_SAMPLES {
            return Err(DetectError::InvalidWindow(format!(
                "{} samples exceed the limit of {}",
                steps + 1,
                MAX_WINDOW_SAMPLES
            )));
        }
        Ok(Self {
            start,
            stop,
            step_minutes,
        })
    }

    /// Window of `hours` starting at `start`.
    pub fn starting_at(start: DateTime<Utc>, hours: u32, step_minutes: u32) -> DetectResult<Self> {
        let stop = start
            .checked_add_signed(Duration::hours(i64::from(hours)))
            .ok_or_else(|| {
                DetectError::InvalidWindow(format!("{} h after {} is out of range", hours, start))
            })?;
        Self::new(start, stop, step_minutes)
    }

    pub fn step(&self) -> Duration {
        Duration::minutes(i64::from(self.step_minutes))
    }

    pub fn duration(&self) -> Duration {
        self.stop - self.start
    }

    /// Number of sample instants, both endpoints included when the step
    /// divides the window evenly.
    pub fn expected_len(&self) -> usize {
        let step_secs = self.step().num_seconds();
        (self.duration().num_seconds() / step_secs) as usize + 1
    }

    pub fn sample_times(&self) -> Vec<DateTime<Utc>> {
        (0..self.expected_len())
            .map(|i| self.start + Duration::minutes(i64::from(self.step_minutes) * i as i64))
            .collect()
    }
}
