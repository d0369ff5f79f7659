pub mod body;
pub mod catalog;
pub mod observer;
pub mod record;
pub mod region;

pub use body::{BodyDetails, BodyKind, Target, TargetSource, Velocity};
pub use observer::{ObservationWindow, ObserverConfig, MAX_WINDOW_SAMPLES};
pub use record::{Ephemeris, EphemerisRow};
pub use region::SkyRegion;
