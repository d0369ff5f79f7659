use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::ephemeris::body::Target;
use crate::prelude::{DetectResult, Sample, SampleSeries};

/// One ephemeris line for an object as seen by the observer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EphemerisRow {
    pub timestamp: DateTime<Utc>,
    pub ra_deg: f64,
    pub dec_deg: f64,
    pub azimuth_deg: f64,
    pub altitude_deg: f64,
    pub distance_au: Option<f64>,
    pub range_rate_kms: Option<f64>,
    pub magnitude: Option<f64>,
    pub illumination_pct: Option<f64>,
    pub angular_diameter_arcsec: Option<f64>,
}

impl EphemerisRow {
    /// Row with only the positional columns populated.
    pub fn position(
        timestamp: DateTime<Utc>,
        ra_deg: f64,
        dec_deg: f64,
        azimuth_deg: f64,
        altitude_deg: f64,
    ) -> Self {
        Self {
            timestamp,
            ra_deg,
            dec_deg,
            azimuth_deg,
            altitude_deg,
            distance_au: None,
            range_rate_kms: None,
            magnitude: None,
            illumination_pct: None,
            angular_diameter_arcsec: None,
        }
    }

    pub fn sample(&self) -> Sample {
        Sample::new(self.timestamp, self.altitude_deg)
    }
}

/// Complete provider answer for one target over one window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ephemeris {
    pub target: Target,
    pub rows: Vec<EphemerisRow>,
}

impl Ephemeris {
    pub fn new(target: Target, rows: Vec<EphemerisRow>) -> Self {
        Self { target, rows }
    }

    pub fn to_series(&self) -> DetectResult<SampleSeries> {
        SampleSeries::new(self.rows.iter().map(EphemerisRow::sample).collect())
    }

    /// Position at the start of the window.
    pub fn current(&self) -> Option<&EphemerisRow> {
        self.rows.first()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}
