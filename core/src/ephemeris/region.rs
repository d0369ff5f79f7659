use serde::{Deserialize, Serialize};

use crate::math::angles::normalize_degrees;
use crate::prelude::{DetectError, DetectResult};

/// Patch of sky bounded by azimuth and altitude, bounds inclusive.
///
/// When `azimuth_min_deg` is greater than `azimuth_max_deg` the patch wraps
/// through north, so `300..=60` covers the northern horizon.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SkyRegion {
    pub azimuth_min_deg: f64,
    pub azimuth_max_deg: f64,
    pub altitude_min_deg: f64,
    pub altitude_max_deg: f64,
}

impl Default for SkyRegion {
    /// The south-facing patch from south-east to south-west, up to 60°.
    fn default() -> Self {
        Self {
            azimuth_min_deg: 120.0,
            azimuth_max_deg: 220.0,
            altitude_min_deg: 0.0,
            altitude_max_deg: 60.0,
        }
    }
}

impl SkyRegion {
    pub fn validate(&self) -> DetectResult<()> {
        let azimuths = [self.azimuth_min_deg, self.azimuth_max_deg];
        if azimuths.iter().any(|az| !(0.0..=360.0).contains(az)) {
            return Err(DetectError::InvalidInput(format!(
                "region azimuth {}..{} outside [0, 360]",
                self.azimuth_min_deg, self.azimuth_max_deg
            )));
        }
        if !(-90.0..=90.0).contains(&self.altitude_min_deg)
            || !(-90.0..=90.0).contains(&self.altitude_max_deg)
            || self.altitude_min_deg > self.altitude_max_deg
        {
            return Err(DetectError::InvalidInput(format!(
                "region altitude {}..{} is not a range within [-90, 90]",
                self.altitude_min_deg, self.altitude_max_deg
            )));
        }
        Ok(())
    }

    pub fn contains(&self, azimuth_deg: f64, altitude_deg: f64) -> bool {
        if !(self.altitude_min_deg..=self.altitude_max_deg).contains(&altitude_deg) {
            return false;
        }
        let azimuth = normalize_degrees(azimuth_deg);
        if self.azimuth_min_deg <= self.azimuth_max_deg {
            (self.azimuth_min_deg..=self.azimuth_max_deg).contains(&azimuth)
        } else {
            azimuth >= self.azimuth_min_deg || azimuth <= self.azimuth_max_deg
        }
    }
}
