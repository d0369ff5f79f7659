use std::f64::consts::PI;

use chrono::{DateTime, Utc};
use horizoncore::ephemeris::{BodyKind, Ephemeris, EphemerisRow, Target, Velocity};
use horizoncore::math::angles::normalize_degrees;
use rand::{rngs::StdRng, Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use super::{ensure_complete, EphemerisRequest, ProviderError, SampleProvider};

/// Shape of the generated altitude curve.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SyntheticConfig {
    /// Altitude at culmination, before noise.
    pub peak_altitude_deg: f64,
    /// Half the swing between culmination and lower culmination.
    pub amplitude_deg: f64,
    pub period_hours: f64,
    pub noise_deg: f64,
    pub seed: u64,
}

impl Default for SyntheticConfig {
    fn default() -> Self {
        Self {
            peak_altitude_deg: 35.0,
            amplitude_deg: 45.0,
            period_hours: 23.934,
            noise_deg: 0.05,
            seed: 0,
        }
    }
}

/// Offline stand-in for the live services.
///
/// Every target follows a cosine altitude curve with the configured peak,
/// phase-shifted by a hash of its name so different targets culminate at
/// different times.
#[derive(Debug, Clone, Default)]
pub struct SyntheticProvider {
    config: SyntheticConfig,
}

impl SyntheticProvider {
    pub fn new(config: SyntheticConfig) -> Self {
        Self { config }
    }

    /// Offset of the target's culmination from the Unix epoch, in hours.
    fn phase_hours(&self, target: &Target) -> f64 {
        (name_hash(&target.name) % 10_000) as f64 / 10_000.0 * self.config.period_hours
    }

    fn altitude_at(&self, target: &Target, at: DateTime<Utc>) -> (f64, f64) {
        let hours = at.timestamp() as f64 / 3600.0 - self.phase_hours(target);
        let turn = (hours / self.config.period_hours).rem_euclid(1.0);
        let mean = self.config.peak_altitude_deg - self.config.amplitude_deg;
        let altitude = mean + self.config.amplitude_deg * (2.0 * PI * turn).cos();
        let azimuth = normalize_degrees(180.0 + 360.0 * turn);
        (azimuth, altitude)
    }

    fn row(&self, target: &Target, at: DateTime<Utc>, jitter: f64) -> EphemerisRow {
        let (azimuth_deg, altitude_deg) = self.altitude_at(target, at);
        let ra_deg = normalize_degrees(self.phase_hours(target) * 15.0);
        let mut row = EphemerisRow::position(
            at,
            ra_deg,
            0.0,
            azimuth_deg,
            (altitude_deg + jitter).clamp(-90.0, 90.0),
        );

        match target.kind {
            BodyKind::Planet => {
                row.distance_au = Some(1.52);
                row.magnitude = Some(1.1);
                row.angular_diameter_arcsec = Some(6.2);
            }
            BodyKind::Moon => {
                row.distance_au = Some(0.002_57);
                row.illumination_pct = Some(50.0);
                row.angular_diameter_arcsec = Some(1_865.0);
            }
            BodyKind::Star => {}
            BodyKind::Spacecraft => {
                row.distance_au = Some(165.0);
                row.range_rate_kms = Some(16.9);
            }
        }
        row
    }
}

impl SampleProvider for SyntheticProvider {
    fn name(&self) -> &'static str {
        "synthetic"
    }

    async fn fetch(&self, request: &EphemerisRequest) -> Result<Ephemeris, ProviderError> {
        let seed = self.config.seed ^ name_hash(&request.target.name);
        let mut rng = StdRng::seed_from_u64(seed);
        let noise = self.config.noise_deg.abs();

        let rows = request
            .window
            .sample_times()
            .into_iter()
            .map(|at| {
                let jitter = if noise > 0.0 {
                    rng.gen_range(-noise..noise)
                } else {
                    0.0
                };
                self.row(&request.target, at, jitter)
            })
            .collect();

        ensure_complete(Ephemeris::new(request.target.clone(), rows))
    }

    async fn heliocentric_velocity(
        &self,
        target: &Target,
        _at: DateTime<Utc>,
    ) -> Result<Option<Velocity>, ProviderError> {
        Ok(match target.kind {
            BodyKind::Spacecraft => Some(Velocity::new(-3.9, -10.2, 12.5)),
            _ => None,
        })
    }
}

/// FNV-1a over the name bytes; stable across runs and platforms.
fn name_hash(name: &str) -> u64 {
    name.bytes().fold(0xcbf2_9ce4_8422_2325, |hash, byte| {
        (hash ^ u64::from(byte)).wrapping_mul(0x0100_0000_01b3)
    })
}
