use anyhow::{bail, Context};
use chrono::{
    DateTime, Duration, DurationRound, FixedOffset, NaiveDate, NaiveDateTime, TimeZone, Utc,
};
use horizoncore::ephemeris::{catalog, ObservationWindow, ObserverConfig, SkyRegion, Target};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::provider::horizons::DEFAULT_HORIZONS_URL;
use crate::provider::SyntheticConfig;

/// Longest window accepted, a little over a year.
pub const MAX_WINDOW_HOURS: u32 = 366 * 24;

/// A target given either by catalogue name or spelled out in full.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TargetConfig {
    Named(String),
    Custom(Target),
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportConfig {
    pub observer: ObserverConfig,
    /// Local wall-clock start of the window at `utc_offset_hours`; the
    /// current instant when absent.
    pub start: Option<NaiveDateTime>,
    pub window_hours: u32,
    pub step_minutes: u32,
    /// Fixed offset used when printing times, e.g. `-6` for CST. No
    /// daylight saving is applied.
    pub utc_offset_hours: f64,
    pub horizons_url: String,
    pub synthetic: SyntheticConfig,
    pub targets: Vec<TargetConfig>,
    /// Only list targets currently inside this patch of sky.
    pub region: Option<SkyRegion>,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            observer: ObserverConfig::default(),
            start: None,
            window_hours: 24,
            step_minutes: 15,
            utc_offset_hours: -6.0,
            horizons_url: DEFAULT_HORIZONS_URL.to_string(),
            synthetic: SyntheticConfig::default(),
            targets: vec![
                TargetConfig::Named("Voyager 1".into()),
                TargetConfig::Named("Voyager 2".into()),
            ],
            region: None,
        }
    }
}

/// Command-line values that take precedence over the config file.
#[derive(Clone, Debug, Default)]
pub struct CliOverrides {
    pub targets: Vec<String>,
    pub latitude_deg: Option<f64>,
    pub longitude_deg: Option<f64>,
    pub elevation_m: Option<f64>,
    pub start: Option<NaiveDateTime>,
    pub window_hours: Option<u32>,
    pub step_minutes: Option<u32>,
    pub utc_offset_hours: Option<f64>,
    pub seed: Option<u64>,
    /// Enable the region filter, using the default region unless the
    /// config file names one.
    pub region: bool,
}

impl ReportConfig {
    pub fn load<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path_ref = path.as_ref();
        let contents = fs::read_to_string(path_ref)
            .with_context(|| format!("reading report config {}", path_ref.display()))?;
        let config: ReportConfig = serde_yaml::from_str(&contents)
            .with_context(|| format!("parsing report config {}", path_ref.display()))?;
        config
            .validate()
            .with_context(|| format!("validating report config {}", path_ref.display()))?;
        Ok(config)
    }

    /// Defaults with the command line applied on top.
    pub fn from_args(overrides: &CliOverrides) -> anyhow::Result<Self> {
        let mut config = Self::default();
        config.apply(overrides)?;
        Ok(config)
    }

    pub fn apply(&mut self, overrides: &CliOverrides) -> anyhow::Result<()> {
        if !overrides.targets.is_empty() {
            self.targets = overrides
                .targets
                .iter()
                .cloned()
                .map(TargetConfig::Named)
                .collect();
        }
        if let Some(lat) = overrides.latitude_deg {
            self.observer.latitude_deg = lat;
            self.observer.name = "custom location".into();
        }
        if let Some(lon) = overrides.longitude_deg {
            self.observer.longitude_deg = lon;
            self.observer.name = "custom location".into();
        }
        if let Some(elevation) = overrides.elevation_m {
            self.observer.elevation_m = elevation;
        }
        if let Some(start) = overrides.start {
            self.start = Some(start);
        }
        if let Some(hours) = overrides.window_hours {
            self.window_hours = hours;
        }
        if let Some(step) = overrides.step_minutes {
            self.step_minutes = step;
        }
        if let Some(offset) = overrides.utc_offset_hours {
            self.utc_offset_hours = offset;
        }
        if let Some(seed) = overrides.seed {
            self.synthetic.seed = seed;
        }
        if overrides.region && self.region.is_none() {
            self.region = Some(SkyRegion::default());
        }
        self.validate()
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        self.observer.validate()?;
        if self.window_hours == 0 {
            bail!("window_hours must be positive");
        }
        if self.window_hours > MAX_WINDOW_HOURS {
            bail!(
                "window_hours {} exceeds the limit of {}",
                self.window_hours,
                MAX_WINDOW_HOURS
            );
        }
        if self.step_minutes == 0 {
            bail!("step_minutes must be positive");
        }
        if self.targets.is_empty() {
            bail!("no targets configured");
        }
        if let Some(region) = &self.region {
            region.validate()?;
        }
        self.utc_offset()?;
        Ok(())
    }

    pub fn utc_offset(&self) -> anyhow::Result<FixedOffset> {
        let seconds = (self.utc_offset_hours * 3600.0).round();
        if !seconds.is_finite() || seconds.abs() >= 86_400.0 {
            bail!("utc offset {} h is out of range", self.utc_offset_hours);
        }
        FixedOffset::east_opt(seconds as i32)
            .with_context(|| format!("utc offset {} h is out of range", self.utc_offset_hours))
    }

    /// Window of the configured length starting at the configured start,
    /// or at `now` when none is set, truncated to the minute so it matches
    /// what the ephemeris service accepts.
    pub fn window_starting(&self, now: DateTime<Utc>) -> anyhow::Result<ObservationWindow> {
        let start = match self.start {
            Some(local) => self
                .utc_offset()?
                .from_local_datetime(&local)
                .single()
                .with_context(|| format!("start {} has no single UTC instant", local))?
                .with_timezone(&Utc),
            None => now,
        };
        let start = start
            .duration_trunc(Duration::minutes(1))
            .context("truncating window start")?;
        Ok(ObservationWindow::starting_at(
            start,
            self.window_hours,
            self.step_minutes,
        )?)
    }

    pub fn resolve_targets(&self) -> anyhow::Result<Vec<Target>> {
        self.targets
            .iter()
            .map(|entry| match entry {
                TargetConfig::Custom(target) => Ok(target.clone()),
                TargetConfig::Named(name) => catalog::lookup(name).with_context(|| {
                    format!(
                        "unknown target {:?}; known targets: {}",
                        name,
                        catalog::names().join(", ")
                    )
                }),
            })
            .collect()
    }
}

/// Parses a window start given as `YYYY-MM-DD`, `YYYY-MM-DD HH:MM` or
/// `YYYY-MM-DDTHH:MM:SS`. A bare date means local midnight.
pub fn parse_start(value: &str) -> anyhow::Result<NaiveDateTime> {
    let value = value.trim();
    let formats = [
        "%Y-%m-%dT%H:%M:%S",
        "%Y-%m-%d %H:%M:%S",
        "%Y-%m-%dT%H:%M",
        "%Y-%m-%d %H:%M",
    ];
    for format in formats {
        if let Ok(at) = NaiveDateTime::parse_from_str(value, format) {
            return Ok(at);
        }
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .with_context(|| format!("{:?} is not a date (YYYY-MM-DD) or date and time", value))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use horizoncore::ephemeris::{BodyKind, TargetSource};
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn defaults_track_both_voyagers() {
        let config = ReportConfig::default();
        let targets = config.resolve_targets().unwrap();
        let commands: Vec<_> = targets.iter().filter_map(|t| t.horizons_command()).collect();
        assert_eq!(commands, vec!["-31", "-32"]);
        assert_eq!(config.utc_offset().unwrap().local_minus_utc(), -6 * 3600);
    }

    #[test]
    fn config_load_reads_yaml() {
        let mut temp = NamedTempFile::new().unwrap();
        temp.write_all(
            b"observer:\n  name: Greenwich\n  latitude_deg: 51.4769\n  longitude_deg: -0.0005\n\
window_hours: 12\nutc_offset_hours: 0\ntargets:\n  - Mars\n  - name: Vega\n    kind: star\n    \
source: fixed_star\n    ra_deg: 279.234735\n    dec_deg: 38.783689\n    magnitude: 0.03\n",
        )
        .unwrap();
        let path = temp.into_temp_path();
        let config = ReportConfig::load(&path).unwrap();

        assert_eq!(config.observer.name, "Greenwich");
        assert_eq!(config.window_hours, 12);
        assert_eq!(config.step_minutes, 15);

        let targets = config.resolve_targets().unwrap();
        assert_eq!(targets[0].horizons_command(), Some("499"));
        assert_eq!(targets[1].kind, BodyKind::Star);
        assert!(matches!(
            targets[1].source,
            TargetSource::FixedStar { magnitude: Some(_), .. }
        ));
    }

    #[test]
    fn config_load_rejects_bad_observer() {
        let mut temp = NamedTempFile::new().unwrap();
        temp.write_all(b"observer:\n  latitude_deg: 120.0\n").unwrap();
        let path = temp.into_temp_path();
        assert!(ReportConfig::load(&path).is_err());
    }

    #[test]
    fn overrides_replace_targets_and_site() {
        let overrides = CliOverrides {
            targets: vec!["moon".into(), "sirius".into()],
            latitude_deg: Some(-33.86),
            longitude_deg: Some(151.21),
            window_hours: Some(48),
            utc_offset_hours: Some(10.0),
            seed: Some(42),
            ..Default::default()
        };
        let config = ReportConfig::from_args(&overrides).unwrap();
        assert_eq!(config.observer.latitude_deg, -33.86);
        assert_eq!(config.window_hours, 48);
        assert_eq!(config.synthetic.seed, 42);
        let names: Vec<_> = config
            .resolve_targets()
            .unwrap()
            .into_iter()
            .map(|t| t.name)
            .collect();
        assert_eq!(names, vec!["Moon", "Sirius"]);
    }

    #[test]
    fn unknown_target_names_fail_resolution() {
        let overrides = CliOverrides {
            targets: vec!["Vulcan".into()],
            ..Default::default()
        };
        let config = ReportConfig::from_args(&overrides).unwrap();
        let err = config.resolve_targets().unwrap_err();
        assert!(err.to_string().contains("Vulcan"));
    }

    #[test]
    fn zero_step_is_rejected() {
        let overrides = CliOverrides {
            step_minutes: Some(0),
            ..Default::default()
        };
        assert!(ReportConfig::from_args(&overrides).is_err());
    }

    #[test]
    fn oversized_window_is_rejected_before_building() {
        let overrides = CliOverrides {
            window_hours: Some(u32::MAX),
            ..Default::default()
        };
        assert!(ReportConfig::from_args(&overrides).is_err());

        let mut config = ReportConfig::default();
        config.window_hours = u32::MAX;
        let now = Utc.with_ymd_and_hms(2025, 3, 20, 6, 30, 0).unwrap();
        assert!(config.window_starting(now).is_err());

        config.window_hours = MAX_WINDOW_HOURS;
        assert!(config.validate().is_ok());
        assert!(config.window_starting(now).is_ok());
    }

    #[test]
    fn configured_start_replaces_now_at_the_local_offset() {
        let overrides = CliOverrides {
            start: Some(parse_start("2025-12-21").unwrap()),
            ..Default::default()
        };
        let config = ReportConfig::from_args(&overrides).unwrap();
        let now = Utc.with_ymd_and_hms(2025, 3, 20, 6, 30, 0).unwrap();
        let window = config.window_starting(now).unwrap();
        // Local midnight at UTC-6.
        assert_eq!(window.start, Utc.with_ymd_and_hms(2025, 12, 21, 6, 0, 0).unwrap());
    }

    #[test]
    fn start_accepts_dates_and_times() {
        let evening = NaiveDate::from_ymd_opt(2025, 3, 20)
            .unwrap()
            .and_hms_opt(21, 30, 0)
            .unwrap();
        assert_eq!(parse_start("2025-03-20 21:30").unwrap(), evening);
        assert_eq!(parse_start("2025-03-20T21:30:00").unwrap(), evening);
        assert!(parse_start("20/03/2025").is_err());
        assert!(parse_start("2025-02-30").is_err());
    }

    #[test]
    fn region_flag_enables_the_default_region() {
        let overrides = CliOverrides {
            region: true,
            ..Default::default()
        };
        let config = ReportConfig::from_args(&overrides).unwrap();
        assert_eq!(config.region, Some(SkyRegion::default()));
        assert_eq!(ReportConfig::default().region, None);
    }

    #[test]
    fn yaml_region_and_start_are_read_and_checked() {
        let mut temp = NamedTempFile::new().unwrap();
        temp.write_all(
            b"start: 2025-06-01T22:00:00\nregion:\n  azimuth_min_deg: 300\n  azimuth_max_deg: 60\n",
        )
        .unwrap();
        let path = temp.into_temp_path();
        let config = ReportConfig::load(&path).unwrap();
        let region = config.region.unwrap();
        assert_eq!(region.azimuth_min_deg, 300.0);
        assert_eq!(region.altitude_max_deg, 60.0);
        assert_eq!(config.start, Some(parse_start("2025-06-01 22:00").unwrap()));

        let mut temp = NamedTempFile::new().unwrap();
        temp.write_all(b"region:\n  altitude_min_deg: 70\n").unwrap();
        let path = temp.into_temp_path();
        assert!(ReportConfig::load(&path).is_err());
    }

    #[test]
    fn window_start_is_truncated_to_the_minute() {
        let config = ReportConfig::default();
        let now = Utc.with_ymd_and_hms(2025, 3, 20, 6, 30, 42).unwrap();
        let window = config.window_starting(now).unwrap();
        assert_eq!(window.start, Utc.with_ymd_and_hms(2025, 3, 20, 6, 30, 0).unwrap());
        assert_eq!(window.expected_len(), 97);
    }
}
