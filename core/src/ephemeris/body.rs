use serde::{Deserialize, Serialize};

use crate::ephemeris::record::EphemerisRow;
use crate::math::units::au_to_km;

/// Broad class of a tracked object; decides which details a report carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BodyKind {
    Planet,
    Moon,
    Star,
    Spacecraft,
}

/// Where positions for a target come from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "source", rename_all = "snake_case")]
pub enum TargetSource {
    /// JPL Horizons `COMMAND` identifier, e.g. `499` for Mars or `-31` for Voyager 1.
    Horizons { command: String },
    /// Catalogue position (J2000) of an object outside the solar system.
    FixedStar {
        ra_deg: f64,
        dec_deg: f64,
        magnitude: Option<f64>,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Target {
    pub name: String,
    pub kind: BodyKind,
    #[serde(flatten)]
    pub source: TargetSource,
}

impl Target {
    pub fn horizons(name: impl Into<String>, kind: BodyKind, command: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind,
            source: TargetSource::Horizons {
                command: command.into(),
            },
        }
    }

    pub fn fixed_star(name: impl Into<String>, ra_deg: f64, dec_deg: f64, magnitude: Option<f64>) -> Self {
        Self {
            name: name.into(),
            kind: BodyKind::Star,
            source: TargetSource::FixedStar {
                ra_deg,
                dec_deg,
                magnitude,
            },
        }
    }

    pub fn horizons_command(&self) -> Option<&str> {
        match &self.source {
            TargetSource::Horizons { command } => Some(command),
            TargetSource::FixedStar { .. } => None,
        }
    }
}

/// Cartesian velocity in km/s.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Velocity {
    pub vx: f64,
    pub vy: f64,
    pub vz: f64,
}

impl Velocity {
    pub fn new(vx: f64, vy: f64, vz: f64) -> Self {
        Self { vx, vy, vz }
    }

    pub fn magnitude(&self) -> f64 {
        (self.vx * self.vx + self.vy * self.vy + self.vz * self.vz).sqrt()
    }
}

/// Kind-specific facts about a target at the start of the window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum BodyDetails {
    Planet {
        distance_au: Option<f64>,
        magnitude: Option<f64>,
        angular_size_arcsec: Option<f64>,
    },
    Moon {
        distance_km: Option<f64>,
        phase_pct: Option<f64>,
        angular_size_arcsec: Option<f64>,
    },
    Star {
        magnitude: Option<f64>,
    },
    Spacecraft {
        distance_au: Option<f64>,
        range_rate_kms: Option<f64>,
        heliocentric: Option<Velocity>,
    },
}

impl BodyDetails {
    /// Picks the fields a body of `kind` legitimately has from the current row.
    pub fn from_row(target: &Target, row: &EphemerisRow, heliocentric: Option<Velocity>) -> Self {
        match target.kind {
            BodyKind::Planet => BodyDetails::Planet {
                distance_au: row.distance_au,
                magnitude: row.magnitude,
                angular_size_arcsec: row.angular_diameter_arcsec,
            },
            BodyKind::Moon => BodyDetails::Moon {
                distance_km: row.distance_au.map(au_to_km),
                phase_pct: row.illumination_pct,
                angular_size_arcsec: row.angular_diameter_arcsec,
            },
            BodyKind::Star => {
                let catalogue_mag = match &target.source {
                    TargetSource::FixedStar { magnitude, .. } => *magnitude,
                    TargetSource::Horizons { .. } => None,
                };
                BodyDetails::Star {
                    magnitude: row.magnitude.or(catalogue_mag),
                }
            }
            BodyKind::Spacecraft => BodyDetails::Spacecraft {
                distance_au: row.distance_au,
                range_rate_kms: row.range_rate_kms,
                heliocentric,
            },
        }
    }

    pub fn kind(&self) -> BodyKind {
        match self {
            BodyDetails::Planet { .. } => BodyKind::Planet,
            BodyDetails::Moon { .. } => BodyKind::Moon,
            BodyDetails::Star { .. } => BodyKind::Star,
            BodyDetails::Spacecraft { .. } => BodyKind::Spacecraft,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use chrono::{TimeZone, Utc};

    fn row() -> EphemerisRow {
        EphemerisRow {
            timestamp: Utc.with_ymd_and_hms(2025, 3, 20, 0, 0, 0).unwrap(),
            ra_deg: 10.0,
            dec_deg: 5.0,
            azimuth_deg: 120.0,
            altitude_deg: 15.0,
            distance_au: Some(0.00257),
            range_rate_kms: Some(-0.3),
            magnitude: Some(-12.1),
            illumination_pct: Some(78.5),
            angular_diameter_arcsec: Some(1850.0),
        }
    }

    #[test]
    fn moon_details_convert_distance_to_km() {
        let target = Target::horizons("Moon", BodyKind::Moon, "301");
        match BodyDetails::from_row(&target, &row(), None) {
            BodyDetails::Moon {
                distance_km,
                phase_pct,
                ..
            } => {
                assert_relative_eq!(distance_km.unwrap(), 384_466.5, epsilon = 1.0);
                assert_eq!(phase_pct, Some(78.5));
            }
            other => panic!("unexpected details {:?}", other),
        }
    }

    #[test]
    fn star_falls_back_to_catalogue_magnitude() {
        let target = Target::fixed_star("Sirius", 101.287155, -16.716116, Some(-1.46));
        let mut row = row();
        row.magnitude = None;
        assert_eq!(
            BodyDetails::from_row(&target, &row, None),
            BodyDetails::Star {
                magnitude: Some(-1.46)
            }
        );
    }

    #[test]
    fn spacecraft_keeps_velocity() {
        let target = Target::horizons("Voyager 1", BodyKind::Spacecraft, "-31");
        let velocity = Velocity::new(3.0, 4.0, 12.0);
        let details = BodyDetails::from_row(&target, &row(), Some(velocity));
        assert_eq!(details.kind(), BodyKind::Spacecraft);
        assert_relative_eq!(velocity.magnitude(), 13.0);
    }

    #[test]
    fn target_source_serializes_flat() {
        let target = Target::horizons("Mars", BodyKind::Planet, "499");
        let json = serde_json::to_value(&target).unwrap();
        assert_eq!(json["source"], "horizons");
        assert_eq!(json["command"], "499");
        assert_eq!(target.horizons_command(), Some("499"));
    }
}
