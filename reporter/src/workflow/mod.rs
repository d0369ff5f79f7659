pub mod config;
pub mod runner;

pub use config::{CliOverrides, ReportConfig};
pub use runner::Runner;
