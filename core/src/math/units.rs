/// Astronomical unit in kilometres.
pub const AU_KM: f64 = 149_597_870.7;
/// Speed of light in vacuum, km/s.
pub const SPEED_OF_LIGHT_KMS: f64 = 299_792.458;

pub fn au_to_km(au: f64) -> f64 {
    au * AU_KM
}

/// One-way light travel time for a distance in kilometres.
pub fn light_time_seconds(distance_km: f64) -> f64 {
    distance_km / SPEED_OF_LIGHT_KMS
}
