use std::f64::consts::PI;
use std::fmt;

use serde::{Deserialize, Serialize};

pub fn radians_to_degrees(radians: f64) -> f64 {
    radians * 180.0 / PI
}

pub fn degrees_to_radians(degrees: f64) -> f64 {
    degrees * PI / 180.0
}

/// Wraps any angle into `[0, 360)`.
pub fn normalize_degrees(degrees: f64) -> f64 {
    let wrapped = degrees.rem_euclid(360.0);
    if wrapped >= 360.0 {
        0.0
    } else {
        wrapped
    }
}

/// Sixteen-point compass rose, clockwise from north.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CompassPoint {
    N,
    NNE,
    NE,
    ENE,
    E,
    ESE,
    SE,
    SSE,
    S,
    SSW,
    SW,
    WSW,
    W,
    WNW,
    NW,
    NNW,
}

impl CompassPoint {
    pub const ALL: [CompassPoint; 16] = [
        CompassPoint::N,
        CompassPoint::NNE,
        CompassPoint::NE,
        CompassPoint::ENE,
        CompassPoint::E,
        CompassPoint::ESE,
        CompassPoint::SE,
        CompassPoint::SSE,
        CompassPoint::S,
        CompassPoint::SSW,
        CompassPoint::SW,
        CompassPoint::WSW,
        CompassPoint::W,
        CompassPoint::WNW,
        CompassPoint::NW,
        CompassPoint::NNW,
    ];

    /// Width of one compass sector in degrees.
    pub const SECTOR_DEG: f64 = 22.5;

    pub fn label(&self) -> &'static str {
        match self {
            CompassPoint::N => "N",
            CompassPoint::NNE => "NNE",
            CompassPoint::NE => "NE",
            CompassPoint::ENE => "ENE",
            CompassPoint::E => "E",
            CompassPoint::ESE => "ESE",
            CompassPoint::SE => "SE",
            CompassPoint::SSE => "SSE",
            CompassPoint::S => "S",
            CompassPoint::SSW => "SSW",
            CompassPoint::SW => "SW",
            CompassPoint::WSW => "WSW",
            CompassPoint::W => "W",
            CompassPoint::WNW => "WNW",
            CompassPoint::NW => "NW",
            CompassPoint::NNW => "NNW",
        }
    }

    /// Centre bearing of the sector in degrees.
    pub fn bearing(&self) -> f64 {
        let idx = Self::ALL.iter().position(|p| p == self).unwrap_or(0);
        idx as f64 * Self::SECTOR_DEG
    }
}

impl fmt::Display for CompassPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Maps an azimuth in degrees to the nearest of the 16 compass points.
///
/// Exact half-sector bearings round to the even sector index.
pub fn compass_direction(azimuth_deg: f64) -> CompassPoint {
    let sector = (azimuth_deg / CompassPoint::SECTOR_DEG).round_ties_even() as i64;
    CompassPoint::ALL[sector.rem_euclid(16) as usize]
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn degree_conversion_uses_full_precision_pi() {
        assert_abs_diff_eq!(radians_to_degrees(PI), 180.0, epsilon = 1e-12);
        assert_abs_diff_eq!(radians_to_degrees(PI / 2.0), 90.0, epsilon = 1e-12);
        assert_abs_diff_eq!(degrees_to_radians(180.0), PI, epsilon = 1e-12);
    }

    #[test]
    fn compass_spot_checks() {
        assert_eq!(compass_direction(0.0), CompassPoint::N);
        assert_eq!(compass_direction(22.5), CompassPoint::NNE);
        assert_eq!(compass_direction(359.0), CompassPoint::N);
        assert_eq!(compass_direction(180.0), CompassPoint::S);
        assert_eq!(compass_direction(90.0), CompassPoint::E);
        assert_eq!(compass_direction(270.0), CompassPoint::W);
        assert_eq!(compass_direction(130.0), CompassPoint::SE);
    }

    #[test]
    fn compass_wraps_out_of_range_bearings() {
        assert_eq!(compass_direction(-10.0), CompassPoint::N);
        assert_eq!(compass_direction(-90.0), CompassPoint::W);
        assert_eq!(compass_direction(405.0), CompassPoint::NE);
    }

    #[test]
    fn compass_half_sector_rounds_to_even() {
        // 11.25 sits exactly between N (0) and NNE (1).
        assert_eq!(compass_direction(11.25), CompassPoint::N);
        // 33.75 sits between NNE (1) and NE (2).
        assert_eq!(compass_direction(33.75), CompassPoint::NE);
    }

    #[test]
    fn compass_labels_and_bearings() {
        assert_eq!(CompassPoint::WSW.to_string(), "WSW");
        assert_abs_diff_eq!(CompassPoint::SW.bearing(), 225.0);
        for point in CompassPoint::ALL {
            assert_eq!(compass_direction(point.bearing()), point);
        }
    }

    #[test]
    fn normalize_wraps_into_range() {
        assert_abs_diff_eq!(normalize_degrees(-30.0), 330.0);
        assert_abs_diff_eq!(normalize_degrees(720.0), 0.0);
    }
}
