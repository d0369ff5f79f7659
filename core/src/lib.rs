//! Horizon event detection core for the sky-position reporting tools.
//!
//! The detector turns a sampled altitude series into rise, transit and set
//! instants. Around it sit the numeric helpers the reports need (degree
//! conversion, compass points, sexagesimal rendering) and the ephemeris data
//! model shared with the sample providers.

pub mod detection;
pub mod ephemeris;
pub mod math;
pub mod prelude;
pub mod telemetry;

pub use detection::{detect, detect_samples, HorizonDetector};
pub use prelude::{
    DetectError, DetectResult, DetectionResult, HorizonEvent, HorizonState, Sample, SampleSeries,
};
