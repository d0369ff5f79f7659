//! Plain-text rendering of object reports.

use chrono::{DateTime, FixedOffset, Utc};
use horizoncore::ephemeris::{
    BodyDetails, EphemerisRow, ObservationWindow, ObserverConfig, SkyRegion, Velocity,
};
use horizoncore::math::{au_to_km, compass_direction, light_time_seconds, Dms, Hms};
use horizoncore::{DetectionResult, HorizonState};

use crate::report::{ObjectReport, Observation, ReportOutcome};

const NOT_OBSERVED: &str = "Not observed in this time period";
const TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S %:z";
const TABLE_TIME_FORMAT: &str = "%Y-%m-%d %H:%M %:z";

pub struct ReportFormatter {
    offset: FixedOffset,
    show_table: bool,
}

impl ReportFormatter {
    pub fn new(offset: FixedOffset) -> Self {
        Self {
            offset,
            show_table: false,
        }
    }

    pub fn with_table(mut self, show_table: bool) -> Self {
        self.show_table = show_table;
        self
    }

    pub fn time(&self, at: DateTime<Utc>) -> String {
        at.with_timezone(&self.offset).format(TIME_FORMAT).to_string()
    }

    pub fn header(
        &self,
        observer: &ObserverConfig,
        window: &ObservationWindow,
        region: Option<&SkyRegion>,
    ) -> String {
        let mut lines = vec![
            format!(
                "Observer: {} (lat {:.4}, lon {:.4}, elevation {:.0} m)",
                observer.name, observer.latitude_deg, observer.longitude_deg, observer.elevation_m
            ),
            format!(
                "Window: {} to {} ({} min steps)",
                self.time(window.start),
                self.time(window.stop),
                window.step_minutes
            ),
            format!("Times: fixed offset UTC{}, no daylight saving", self.offset),
        ];
        if let Some(region) = region {
            lines.push(format!(
                "Region: azimuth {:.1}° to {:.1}°, altitude {:.1}° to {:.1}°",
                region.azimuth_min_deg,
                region.azimuth_max_deg,
                region.altitude_min_deg,
                region.altitude_max_deg
            ));
        }
        lines.join("\n")
    }

    pub fn render(&self, report: &ObjectReport) -> String {
        let name = &report.target.name;
        let mut lines = vec![String::new(), format!("{}:", name), "-".repeat(40)];

        match &report.outcome {
            ReportOutcome::Failed { reason } => {
                lines.push(format!("  Error retrieving data: {}", reason));
            }
            ReportOutcome::Observed(observation) => {
                lines.extend(self.position_lines(&observation.current));
                lines.extend(details_lines(&observation.details));
                let hours = (report.window_stop - report.window_start).num_hours();
                lines.push(String::new());
                lines.push(format!("  Viewing events in the next {} hours:", hours));
                lines.extend(self.event_lines(name, &observation.detection));
                if self.show_table {
                    lines.push(String::new());
                    lines.extend(self.table_lines(observation));
                }
            }
        }

        lines.join("\n")
    }

    fn position_lines(&self, row: &EphemerisRow) -> Vec<String> {
        vec![
            format!("  Current position (at {}):", self.time(row.timestamp)),
            format!("    Right Ascension: {}", Hms::from_ra_degrees(row.ra_deg)),
            format!("    Declination: {}", Dms::from_degrees(row.dec_deg)),
            format!("    Altitude: {}", altitude_phrase(row.altitude_deg)),
            format!("    Azimuth: {}", azimuth_phrase(row.azimuth_deg)),
        ]
    }

    pub fn event_lines(&self, name: &str, detection: &DetectionResult) -> Vec<String> {
        if detection.is_below_horizon() {
            return vec![format!(
                "    {} remains below the horizon during the entire period.",
                name
            )];
        }

        let or_not_observed = |at: Option<DateTime<Utc>>| {
            at.map_or_else(|| NOT_OBSERVED.to_string(), |at| self.time(at))
        };

        let transit = match (detection.transit_time(), detection.transit_altitude()) {
            (Some(at), Some(altitude)) => {
                format!("{} (altitude: {:.2}°)", self.time(at), altitude)
            }
            _ => NOT_OBSERVED.to_string(),
        };

        let mut lines = vec![
            format!("    Rise: {}", or_not_observed(detection.rise_time())),
            format!("    Transit: {}", transit),
            format!("    Set: {}", or_not_observed(detection.set_time())),
        ];
        if detection.state == HorizonState::AlwaysAbove {
            lines.push(format!(
                "    {} remains above the horizon during the entire period.",
                name
            ));
        }
        if detection.set_precedes_rise() {
            lines.push(
                "    Note: set precedes rise in this window (first crossing of each kind is reported)."
                    .to_string(),
            );
        }
        lines
    }

    fn table_lines(&self, observation: &Observation) -> Vec<String> {
        let mut lines = vec![format!(
            "  {:<24} {:>10} {:>10}  {:<4}",
            "Time", "Altitude", "Azimuth", "Dir"
        )];
        lines.push(format!("  {}", "-".repeat(54)));
        for row in &observation.samples {
            let above = if row.altitude_deg > 0.0 { "*" } else { " " };
            lines.push(format!(
                "  {:<24} {:>+9.2}° {:>9.2}°  {:<4} {}",
                row.timestamp
                    .with_timezone(&self.offset)
                    .format(TABLE_TIME_FORMAT)
                    .to_string(),
                row.altitude_deg,
                row.azimuth_deg,
                compass_direction(row.azimuth_deg).label(),
                above
            ));
        }
        lines.push("  * = above horizon".to_string());
        lines
    }
}

pub fn altitude_phrase(altitude_deg: f64) -> String {
    if altitude_deg > 0.0 {
        format!(
            "{:.2}° ({:.2} degrees above horizon)",
            altitude_deg, altitude_deg
        )
    } else {
        format!(
            "{:.2}° ({:.2} degrees below horizon)",
            altitude_deg,
            altitude_deg.abs()
        )
    }
}

pub fn azimuth_phrase(azimuth_deg: f64) -> String {
    format!("{:.2}° ({})", azimuth_deg, compass_direction(azimuth_deg))
}

/// Human-scale distance: billions, millions or thousands of km with three
/// decimals, plain km below that.
pub fn format_distance_km(distance_km: f64) -> String {
    if distance_km >= 1e9 {
        format!("{:.3} billion km", distance_km / 1e9)
    } else if distance_km >= 1e6 {
        format!("{:.3} million km", distance_km / 1e6)
    } else if distance_km >= 1e3 {
        format!("{:.3} thousand km", distance_km / 1e3)
    } else {
        format!("{:.0} km", distance_km)
    }
}

fn details_lines(details: &BodyDetails) -> Vec<String> {
    let mut lines = Vec::new();
    match details {
        BodyDetails::Planet {
            distance_au,
            magnitude,
            angular_size_arcsec,
        } => {
            if let Some(au) = distance_au {
                let km = au_to_km(*au);
                lines.push(format!(
                    "    Distance: {:.4} AU ({})",
                    au,
                    format_distance_km(km)
                ));
                lines.push(format!(
                    "    Light time: {:.2} minutes",
                    light_time_seconds(km) / 60.0
                ));
            }
            if let Some(mag) = magnitude {
                lines.push(format!("    Apparent magnitude: {:.2}", mag));
            }
            if let Some(size) = angular_size_arcsec {
                lines.push(format!("    Angular size: {:.2} arcseconds", size));
            }
        }
        BodyDetails::Moon {
            distance_km,
            phase_pct,
            angular_size_arcsec,
        } => {
            if let Some(phase) = phase_pct {
                lines.push(format!("    Phase: {:.1}%", phase));
            }
            if let Some(km) = distance_km {
                lines.push(format!("    Distance: {}", format_distance_km(*km)));
                lines.push(format!(
                    "    Light time: {:.2} seconds",
                    light_time_seconds(*km)
                ));
            }
            if let Some(size) = angular_size_arcsec {
                lines.push(format!("    Angular size: {:.2} arcseconds", size));
            }
        }
        BodyDetails::Star { magnitude } => {
            if let Some(mag) = magnitude {
                lines.push(format!("    Apparent magnitude: {:.2}", mag));
            }
        }
        BodyDetails::Spacecraft {
            distance_au,
            range_rate_kms,
            heliocentric,
        } => {
            if let Some(au) = distance_au {
                let km = au_to_km(*au);
                let minutes = light_time_seconds(km) / 60.0;
                lines.push(format!(
                    "    Distance: {:.2} AU ({})",
                    au,
                    format_distance_km(km)
                ));
                lines.push(format!(
                    "    Light time: {:.2} minutes ({:.2} hours)",
                    minutes,
                    minutes / 60.0
                ));
            }
            if let Some(rate) = range_rate_kms {
                let direction = if *rate > 0.0 { "away from" } else { "toward" };
                lines.push(format!(
                    "    Velocity relative to Earth: {:.2} km/s ({} Earth)",
                    rate.abs(),
                    direction
                ));
            }
            lines.push(String::new());
            lines.extend(heliocentric_lines(heliocentric.as_ref()));
        }
    }
    lines
}

fn heliocentric_lines(velocity: Option<&Velocity>) -> Vec<String> {
    let mut lines = vec!["  Heliocentric velocity (relative to Sun):".to_string()];
    match velocity {
        Some(v) => {
            lines.push(format!("    X component: {:.2} km/s", v.vx));
            lines.push(format!("    Y component: {:.2} km/s", v.vy));
            lines.push(format!("    Z component: {:.2} km/s", v.vz));
            lines.push(format!("    Total magnitude: {:.2} km/s", v.magnitude()));
        }
        None => lines.push("    Not available from the ephemeris service".to_string()),
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};
    use horizoncore::ephemeris::{BodyKind, Target};
    use horizoncore::HorizonEvent;

    fn cst() -> FixedOffset {
        FixedOffset::west_opt(6 * 3600).unwrap()
    }

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, 20, 12, 0, 0).unwrap()
    }

    fn window() -> ObservationWindow {
        ObservationWindow::starting_at(t0(), 24, 15).unwrap()
    }

    fn row(altitude_deg: f64) -> EphemerisRow {
        EphemerisRow::position(t0(), 101.287155, -16.716116, 157.5, altitude_deg)
    }

    fn crossing() -> DetectionResult {
        DetectionResult {
            rise: Some(HorizonEvent::Rise {
                at: t0() + Duration::hours(1),
            }),
            transit: Some(HorizonEvent::Transit {
                at: t0() + Duration::hours(4),
                altitude_deg: 30.0,
            }),
            set: None,
            state: HorizonState::CrossesHorizon,
        }
    }

    fn observed(target: Target, details: BodyDetails, detection: DetectionResult) -> ObjectReport {
        ObjectReport::observed(
            target,
            &window(),
            Observation {
                current: row(12.346),
                details,
                detection,
                samples: vec![row(12.346), row(-3.0)],
            },
        )
    }

    #[test]
    fn times_use_the_configured_offset() {
        let formatter = ReportFormatter::new(cst());
        assert_eq!(formatter.time(t0()), "2025-03-20 06:00:00 -06:00");
    }

    #[test]
    fn missing_events_are_not_observed() {
        let lines = ReportFormatter::new(cst()).event_lines("Mars", &crossing());
        assert_eq!(lines[0], "    Rise: 2025-03-20 07:00:00 -06:00");
        assert_eq!(lines[1], "    Transit: 2025-03-20 10:00:00 -06:00 (altitude: 30.00°)");
        assert_eq!(lines[2], "    Set: Not observed in this time period");
        assert_eq!(lines.len(), 3);
    }

    #[test]
    fn below_horizon_is_a_single_line() {
        let lines =
            ReportFormatter::new(cst()).event_lines("Voyager 2", &DetectionResult::below_horizon());
        assert_eq!(
            lines,
            vec!["    Voyager 2 remains below the horizon during the entire period."]
        );
    }

    #[test]
    fn always_above_and_set_before_rise_get_notes() {
        let formatter = ReportFormatter::new(cst());
        let above = DetectionResult {
            rise: None,
            transit: crossing().transit,
            set: None,
            state: HorizonState::AlwaysAbove,
        };
        let lines = formatter.event_lines("Polaris", &above);
        assert!(lines[3].contains("Polaris remains above the horizon"));

        let swapped = DetectionResult {
            rise: Some(HorizonEvent::Rise {
                at: t0() + Duration::hours(6),
            }),
            set: Some(HorizonEvent::Set {
                at: t0() + Duration::hours(1),
            }),
            ..crossing()
        };
        let lines = formatter.event_lines("Moon", &swapped);
        assert!(lines.last().unwrap().contains("set precedes rise"));
    }

    #[test]
    fn altitude_and_azimuth_phrases() {
        assert_eq!(
            altitude_phrase(12.346),
            "12.35° (12.35 degrees above horizon)"
        );
        assert_eq!(
            altitude_phrase(-7.5),
            "-7.50° (7.50 degrees below horizon)"
        );
        assert_eq!(azimuth_phrase(157.5), "157.50° (SSE)");
    }

    #[test]
    fn distances_pick_a_readable_scale() {
        assert_eq!(format_distance_km(24_903_000_000.0), "24.903 billion km");
        assert_eq!(format_distance_km(227_900_000.0), "227.900 million km");
        assert_eq!(format_distance_km(384_400.0), "384.400 thousand km");
        assert_eq!(format_distance_km(420.0), "420 km");
    }

    #[test]
    fn spacecraft_report_includes_light_time_and_velocity() {
        let target = Target::horizons("Voyager 1", BodyKind::Spacecraft, "-31");
        let details = BodyDetails::Spacecraft {
            distance_au: Some(166.47),
            range_rate_kms: Some(-14.12),
            heliocentric: None,
        };
        let text = ReportFormatter::new(cst()).render(&observed(target, details, crossing()));

        assert!(text.contains("Voyager 1:"));
        assert!(text.contains("    Right Ascension: 6h 45m 8.9s"));
        assert!(text.contains("    Declination: -16° 42' 58.0\""));
        assert!(text.contains("    Distance: 166.47 AU (24.904 billion km)"));
        assert!(text.contains("hours)"));
        assert!(text.contains("14.12 km/s (toward Earth)"));
        assert!(text.contains("Not available from the ephemeris service"));
        assert!(text.contains("Viewing events in the next 24 hours:"));
        assert!(!text.contains("* = above horizon"));
    }

    #[test]
    fn moon_light_time_is_in_seconds() {
        let target = Target::horizons("Moon", BodyKind::Moon, "301");
        let details = BodyDetails::Moon {
            distance_km: Some(384_400.0),
            phase_pct: Some(71.2),
            angular_size_arcsec: Some(1865.0),
        };
        let text = ReportFormatter::new(cst()).render(&observed(target, details, crossing()));
        assert!(text.contains("    Phase: 71.2%"));
        assert!(text.contains("    Light time: 1.28 seconds"));
    }

    #[test]
    fn table_marks_samples_above_horizon() {
        let target = Target::fixed_star("Sirius", 101.287155, -16.716116, Some(-1.46));
        let details = BodyDetails::Star {
            magnitude: Some(-1.46),
        };
        let text = ReportFormatter::new(cst())
            .with_table(true)
            .render(&observed(target, details, crossing()));
        let starred: Vec<_> = text.lines().filter(|l| l.trim_end().ends_with('*')).collect();
        assert_eq!(starred.len(), 1);
        assert!(starred[0].contains("+12.35°"));
        assert!(text.contains("* = above horizon"));
    }

    #[test]
    fn header_names_the_fixed_offset_and_region() {
        let formatter = ReportFormatter::new(cst());
        let header = formatter.header(&ObserverConfig::default(), &window(), None);
        assert!(header.contains("Observer: Kansas City, MO (lat 39.0997, lon -94.5786"));
        assert!(header.contains("Window: 2025-03-20 06:00:00 -06:00 to 2025-03-21 06:00:00 -06:00"));
        assert!(header.ends_with("Times: fixed offset UTC-06:00, no daylight saving"));
        assert!(!header.contains("Region"));

        let region = SkyRegion::default();
        let header = formatter.header(&ObserverConfig::default(), &window(), Some(&region));
        assert!(header.ends_with("Region: azimuth 120.0° to 220.0°, altitude 0.0° to 60.0°"));
    }

    #[test]
    fn failures_are_reported_inline() {
        let target = Target::horizons("Voyager 2", BodyKind::Spacecraft, "-32");
        let report = ObjectReport::failed(target, &window(), "ephemeris service error: timeout");
        let text = ReportFormatter::new(cst()).render(&report);
        assert!(text.contains("  Error retrieving data: ephemeris service error: timeout"));
    }
}
