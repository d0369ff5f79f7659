//! Sexagesimal rendering of angles and hour angles.

use std::fmt;

/// Degrees, arcminutes and arcseconds with an explicit sign.
///
/// Seconds are kept to a tenth, and carried into minutes and degrees
/// so `59.96"` never renders as `60.0"`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Dms {
    pub negative: bool,
    pub degrees: u32,
    pub minutes: u32,
    pub seconds: f64,
}

impl Dms {
    pub fn from_degrees(value: f64) -> Self {
        let (whole, minutes, seconds) = split_tenths(value.abs());
        Self {
            negative: value < 0.0 && (whole, minutes, seconds) != (0, 0, 0.0),
            degrees: whole,
            minutes,
            seconds,
        }
    }
}

impl fmt::Display for Dms {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.negative { '-' } else { '+' };
        write!(
            f,
            "{}{}° {}' {:.1}\"",
            sign, self.degrees, self.minutes, self.seconds
        )
    }
}

/// Hours, minutes and seconds of time.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hms {
    pub hours: u32,
    pub minutes: u32,
    pub seconds: f64,
}

impl Hms {
    pub fn from_hours(value: f64) -> Self {
        let (hours, minutes, seconds) = split_tenths(value.rem_euclid(24.0));
        Self {
            hours: hours % 24,
            minutes,
            seconds,
        }
    }

    /// Right ascension given in degrees (15 degrees per hour).
    pub fn from_ra_degrees(ra_deg: f64) -> Self {
        Self::from_hours(ra_deg / 15.0)
    }
}

impl fmt::Display for Hms {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}h {}m {:.1}s", self.hours, self.minutes, self.seconds)
    }
}

fn split_tenths(value: f64) -> (u32, u32, f64) {
    let tenths = (value * 36_000.0).round() as u64;
    let whole = (tenths / 36_000) as u32;
    let minutes = ((tenths % 36_000) / 600) as u32;
    let seconds = (tenths % 600) as f64 / 10.0;
    (whole, minutes, seconds)
}
