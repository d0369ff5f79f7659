use chrono::{DateTime, Utc};
use horizoncore::ephemeris::{Ephemeris, EphemerisRow, TargetSource};
use horizoncore::math::angles::{degrees_to_radians, normalize_degrees, radians_to_degrees};

use super::{ensure_complete, EphemerisRequest, ProviderError, SampleProvider};

const J2000_JD: f64 = 2_451_545.0;
const UNIX_EPOCH_JD: f64 = 2_440_587.5;

/// Horizontal coordinates of catalogue stars, computed locally.
///
/// Uses mean sidereal time and the catalogue position as given; no
/// precession, nutation, aberration or refraction is applied.
#[derive(Debug, Clone, Copy, Default)]
pub struct FixedStarProvider;

impl SampleProvider for FixedStarProvider {
    fn name(&self) -> &'static str {
        "fixed-star"
    }

    async fn fetch(&self, request: &EphemerisRequest) -> Result<Ephemeris, ProviderError> {
        let (ra_deg, dec_deg) = match request.target.source {
            TargetSource::FixedStar {
                ra_deg, dec_deg, ..
            } => (ra_deg, dec_deg),
            TargetSource::Horizons { .. } => {
                return Err(ProviderError::Unsupported {
                    provider: self.name(),
                    target: request.target.name.clone(),
                })
            }
        };

        let rows = request
            .window
            .sample_times()
            .into_iter()
            .map(|at| {
                let (azimuth_deg, altitude_deg) = horizontal_position(
                    ra_deg,
                    dec_deg,
                    request.observer.latitude_deg,
                    request.observer.longitude_deg,
                    at,
                );
                EphemerisRow::position(at, ra_deg, dec_deg, azimuth_deg, altitude_deg)
            })
            .collect();

        ensure_complete(Ephemeris::new(request.target.clone(), rows))
    }
}

pub fn julian_date(at: DateTime<Utc>) -> f64 {
    at.timestamp_millis() as f64 / 86_400_000.0 + UNIX_EPOCH_JD
}

/// Greenwich mean sidereal time in degrees, `[0, 360)`.
pub fn greenwich_sidereal_deg(at: DateTime<Utc>) -> f64 {
    let d = julian_date(at) - J2000_JD;
    let t = d / 36_525.0;
    normalize_degrees(
        280.460_618_37 + 360.985_647_366_29 * d + 0.000_387_933 * t * t
            - t * t * t / 38_710_000.0,
    )
}

pub fn local_sidereal_deg(at: DateTime<Utc>, longitude_deg: f64) -> f64 {
    normalize_degrees(greenwich_sidereal_deg(at) + longitude_deg)
}

/// Azimuth (from north, eastward) and altitude in degrees.
pub fn horizontal_position(
    ra_deg: f64,
    dec_deg: f64,
    latitude_deg: f64,
    longitude_deg: f64,
    at: DateTime<Utc>,
) -> (f64, f64) {
    let hour_angle = degrees_to_radians(local_sidereal_deg(at, longitude_deg) - ra_deg);
    let dec = degrees_to_radians(dec_deg);
    let lat = degrees_to_radians(latitude_deg);

    let sin_alt = dec.sin() * lat.sin() + dec.cos() * lat.cos() * hour_angle.cos();
    let altitude = sin_alt.clamp(-1.0, 1.0).asin();

    let azimuth = (-hour_angle.sin() * dec.cos())
        .atan2(lat.cos() * dec.sin() - lat.sin() * dec.cos() * hour_angle.cos());

    (
        normalize_degrees(radians_to_degrees(azimuth)),
        radians_to_degrees(altitude),
    )
}
