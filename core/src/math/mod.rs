pub mod angles;
pub mod interpolation;
pub mod sexagesimal;
pub mod stats;
pub mod units;

pub use angles::{compass_direction, degrees_to_radians, radians_to_degrees, CompassPoint};
pub use interpolation::{crossing_fraction, horizon_crossing};
pub use sexagesimal::{Dms, Hms};
pub use stats::StatsHelper;
pub use units::{au_to_km, light_time_seconds, AU_KM, SPEED_OF_LIGHT_KMS};
