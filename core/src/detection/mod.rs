pub mod classify;
pub mod horizon;

pub use classify::classify;
pub use horizon::{detect, detect_samples, HorizonDetector};
