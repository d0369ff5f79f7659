use chrono::{DateTime, Duration, Utc};

use crate::prelude::Sample;

/// Fraction of the way from `y0` to `y1` at which the line reaches `target`.
///
/// Callers must guarantee `y0 != y1`.
pub fn crossing_fraction(y0: f64, y1: f64, target: f64) -> f64 {
    (target - y0) / (y1 - y0)
}

/// Linearly interpolated instant at which altitude passes through zero
/// between two consecutive samples.
///
/// The pair must straddle the horizon with one side strictly above it, which
/// keeps the altitudes distinct. The offset is rounded to whole microseconds.
pub fn horizon_crossing(prev: &Sample, next: &Sample) -> DateTime<Utc> {
    let elapsed = (next.timestamp - prev.timestamp).num_microseconds();
    let elapsed_secs = match elapsed {
        Some(us) => us as f64 / 1e6,
        None => (next.timestamp - prev.timestamp).num_seconds() as f64,
    };
    let delta_secs = elapsed_secs * crossing_fraction(prev.altitude_deg, next.altitude_deg, 0.0);
    prev.timestamp + Duration::microseconds((delta_secs * 1e6).round() as i64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use chrono::TimeZone;

    #[test]
    fn fraction_matches_linear_ratio() {
        assert_abs_diff_eq!(crossing_fraction(-2.0, 5.0, 0.0), 2.0 / 7.0, epsilon = 1e-15);
        assert_abs_diff_eq!(crossing_fraction(10.0, -5.0, 0.0), 10.0 / 15.0, epsilon = 1e-15);
    }

    #[test]
    fn crossing_lands_between_samples() {
        let t0 = Utc.with_ymd_and_hms(2025, 3, 20, 2, 0, 0).unwrap();
        let prev = Sample::new(t0, -2.0);
        let next = Sample::new(t0 + Duration::hours(1), 5.0);

        let crossing = horizon_crossing(&prev, &next);
        let offset = (crossing - t0).num_microseconds().unwrap();
        // 3600 s * 2/7
        assert_eq!(offset, 1_028_571_429);
    }

    #[test]
    fn crossing_at_sample_when_altitude_is_zero() {
        let t0 = Utc.with_ymd_and_hms(2025, 3, 20, 2, 0, 0).unwrap();
        let prev = Sample::new(t0, 0.0);
        let next = Sample::new(t0 + Duration::minutes(15), 4.0);
        assert_eq!(horizon_crossing(&prev, &next), t0);
    }
}
