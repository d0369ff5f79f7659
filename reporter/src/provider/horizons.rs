//! JPL Horizons client.
//!
//! Observer tables are requested in CSV form with angles in degrees. The
//! `$$SOE`/`$$EOE` block is cut out together with its header line, then
//! read with the `csv` crate and mapped by column name, since the set of
//! columns depends on the quantities requested and on the target.

use std::collections::HashMap;
use std::sync::OnceLock;
use std::time::Duration as StdDuration;

use chrono::{DateTime, Duration, NaiveDateTime, Utc};
use horizoncore::ephemeris::{
    Ephemeris, EphemerisRow, ObservationWindow, ObserverConfig, Target, Velocity,
};
use horizoncore::telemetry::LogManager;
use regex::Regex;

use super::{ensure_complete, EphemerisRequest, ProviderError, SampleProvider};

pub const DEFAULT_HORIZONS_URL: &str = "https://ssd.jpl.nasa.gov/api/horizons.api";

// 1 = RA/Dec, 4 = az/el, 9 = magnitude, 10 = illuminated fraction,
// 13 = angular diameter, 20 = observer range and range rate.
const OBSERVER_QUANTITIES: &str = "1,4,9,10,13,20";
const HORIZONS_TIME_FORMAT: &str = "%Y-%m-%d %H:%M";

pub struct HorizonsProvider {
    client: reqwest::Client,
    base_url: String,
    logger: LogManager,
}

impl HorizonsProvider {
    pub fn new(base_url: impl Into<String>) -> Result<Self, ProviderError> {
        let client = reqwest::Client::builder()
            .timeout(StdDuration::from_secs(60))
            .user_agent(concat!("skyreport/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self {
            client,
            base_url: base_url.into(),
            logger: LogManager::new("horizons"),
        })
    }

    async fn query(&self, params: &[(String, String)]) -> Result<String, ProviderError> {
        let response = self
            .client
            .get(&self.base_url)
            .query(params)
            .send()
            .await?
            .error_for_status()?;
        Ok(response.text().await?)
    }

    fn command<'a>(&self, target: &'a Target) -> Result<&'a str, ProviderError> {
        target
            .horizons_command()
            .ok_or_else(|| ProviderError::Unsupported {
                provider: self.name(),
                target: target.name.clone(),
            })
    }
}

impl SampleProvider for HorizonsProvider {
    fn name(&self) -> &'static str {
        "horizons"
    }

    async fn fetch(&self, request: &EphemerisRequest) -> Result<Ephemeris, ProviderError> {
        let command = self.command(&request.target)?;
        self.logger.record(&format!(
            "querying {} ({}) from {} to {}",
            request.target.name, command, request.window.start, request.window.stop
        ));

        let params = observer_params(command, &request.observer, &request.window);
        let body = self.query(&params).await?;
        let rows = parse_observer_table(&body)?;

        self.logger
            .record(&format!("{} rows for {}", rows.len(), request.target.name));
        ensure_complete(Ephemeris::new(request.target.clone(), rows))
    }

    async fn heliocentric_velocity(
        &self,
        target: &Target,
        at: DateTime<Utc>,
    ) -> Result<Option<Velocity>, ProviderError> {
        let command = self.command(target)?;
        let body = self.query(&vector_params(command, at)).await?;
        parse_vector_table(&body)
    }
}

fn quoted(value: impl AsRef<str>) -> String {
    format!("'{}'", value.as_ref())
}

fn param(key: &str, value: impl AsRef<str>) -> (String, String) {
    (key.to_string(), quoted(value))
}

/// Query parameters for a topocentric observer table.
pub fn observer_params(
    command: &str,
    observer: &ObserverConfig,
    window: &ObservationWindow,
) -> Vec<(String, String)> {
    vec![
        ("format".to_string(), "text".to_string()),
        param("COMMAND", command),
        param("OBJ_DATA", "NO"),
        param("MAKE_EPHEM", "YES"),
        param("EPHEM_TYPE", "OBSERVER"),
        param("CENTER", "coord@399"),
        param("COORD_TYPE", "GEODETIC"),
        param(
            "SITE_COORD",
            format!(
                "{},{},{}",
                observer.longitude_deg,
                observer.latitude_deg,
                observer.elevation_km()
            ),
        ),
        param("START_TIME", window.start.format(HORIZONS_TIME_FORMAT).to_string()),
        param("STOP_TIME", window.stop.format(HORIZONS_TIME_FORMAT).to_string()),
        param("STEP_SIZE", format!("{}m", window.step_minutes)),
        param("QUANTITIES", OBSERVER_QUANTITIES),
        param("ANG_FORMAT", "DEG"),
        param("APPARENT", "AIRLESS"),
        param("TIME_DIGITS", "SECONDS"),
        param("CSV_FORMAT", "YES"),
    ]
}

/// Query parameters for a heliocentric state vector at `at`.
pub fn vector_params(command: &str, at: DateTime<Utc>) -> Vec<(String, String)> {
    let stop = at + Duration::hours(1);
    vec![
        ("format".to_string(), "text".to_string()),
        param("COMMAND", command),
        param("OBJ_DATA", "NO"),
        param("MAKE_EPHEM", "YES"),
        param("EPHEM_TYPE", "VECTORS"),
        param("CENTER", "500@10"),
        param("START_TIME", at.format(HORIZONS_TIME_FORMAT).to_string()),
        param("STOP_TIME", stop.format(HORIZONS_TIME_FORMAT).to_string()),
        param("STEP_SIZE", "1h"),
        param("VEC_TABLE", "2"),
        param("OUT_UNITS", "KM-S"),
        param("CSV_FORMAT", "YES"),
    ]
}

const DATA_BLOCK_PATTERN: &str = r"(?ms)^([^\n]*)\n\*+\r?\n\$\$SOE\r?\n(.*?)^\$\$EOE";

fn data_block_regex() -> Result<&'static Regex, ProviderError> {
    static RE: OnceLock<Regex> = OnceLock::new();
    if let Some(re) = RE.get() {
        return Ok(re);
    }
    let re = Regex::new(DATA_BLOCK_PATTERN).map_err(|err| ProviderError::Parse(err.to_string()))?;
    Ok(RE.get_or_init(|| re))
}

/// Header line and data lines between `$$SOE` and `$$EOE`.
fn extract_block(body: &str) -> Result<(String, String), ProviderError> {
    let captures = data_block_regex()?
        .captures(body)
        .ok_or_else(|| ProviderError::Service(summarize(body)))?;
    let header = captures.get(1).map_or("", |m| m.as_str()).trim().to_string();
    let data = captures.get(2).map_or("", |m| m.as_str()).to_string();
    Ok((header, data))
}

/// Short excerpt of a response that carried no data block.
fn summarize(body: &str) -> String {
    let excerpt: Vec<&str> = body
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('*'))
        .take(3)
        .collect();
    if excerpt.is_empty() {
        "empty response".to_string()
    } else {
        excerpt.join(" / ")
    }
}

/// Column name up to its first underscore or parenthesis, e.g.
/// `Date__(UT)__HR:MN:SS` becomes `Date`.
fn column_key(header: &str) -> String {
    let trimmed = header.trim();
    let end = trimmed.find(['_', '(']).unwrap_or(trimmed.len());
    trimmed[..end].trim().to_string()
}

struct Table {
    columns: HashMap<String, usize>,
    records: Vec<csv::StringRecord>,
}

impl Table {
    fn parse(body: &str) -> Result<Self, ProviderError> {
        let (header, data) = extract_block(body)?;
        let text = format!("{}\n{}", header, data);
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .trim(csv::Trim::All)
            .from_reader(text.as_bytes());

        let mut columns = HashMap::new();
        let headers = reader
            .headers()
            .map_err(|err| ProviderError::Parse(format!("header: {}", err)))?;
        for (idx, name) in headers.iter().enumerate() {
            let key = column_key(name);
            if !key.is_empty() {
                columns.entry(key).or_insert(idx);
            }
        }

        let records = reader
            .records()
            .collect::<Result<Vec<_>, _>>()
            .map_err(|err| ProviderError::Parse(format!("data: {}", err)))?;

        Ok(Self { columns, records })
    }

    fn index(&self, key: &str) -> Result<usize, ProviderError> {
        self.columns
            .get(key)
            .copied()
            .ok_or_else(|| ProviderError::Parse(format!("missing column {}", key)))
    }
}

fn field<'r>(record: &'r csv::StringRecord, idx: usize) -> Result<&'r str, ProviderError> {
    record
        .get(idx)
        .ok_or_else(|| ProviderError::Parse(format!("row too short for column {}", idx)))
}

fn required_f64(record: &csv::StringRecord, idx: usize) -> Result<f64, ProviderError> {
    let raw = field(record, idx)?;
    raw.parse::<f64>()
        .map_err(|_| ProviderError::Parse(format!("not a number: {:?}", raw)))
}

/// `n.a.` and blank cells are absent values.
fn optional_f64(record: &csv::StringRecord, idx: Option<usize>) -> Result<Option<f64>, ProviderError> {
    let Some(idx) = idx else {
        return Ok(None);
    };
    let raw = field(record, idx)?;
    if raw.is_empty() || raw.eq_ignore_ascii_case("n.a.") {
        return Ok(None);
    }
    raw.parse::<f64>()
        .map(Some)
        .map_err(|_| ProviderError::Parse(format!("not a number: {:?}", raw)))
}

pub fn parse_timestamp(raw: &str) -> Result<DateTime<Utc>, ProviderError> {
    let cleaned = raw.trim().trim_start_matches("A.D.").trim();
    ["%Y-%b-%d %H:%M:%S%.f", "%Y-%b-%d %H:%M"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(cleaned, fmt).ok())
        .map(|naive| naive.and_utc())
        .ok_or_else(|| ProviderError::Parse(format!("unrecognised timestamp {:?}", raw)))
}

/// Parses a CSV observer table into rows. Any malformed row fails the
/// whole table.
pub fn parse_observer_table(body: &str) -> Result<Vec<EphemerisRow>, ProviderError> {
    let table = Table::parse(body)?;
    let date = table.index("Date")?;
    let ra = table.index("R.A.")?;
    let dec = table.index("DEC")?;
    let azimuth = table.index("Azi")?;
    let elevation = table.index("Elev")?;
    let magnitude = table.columns.get("APmag").copied();
    let illumination = table.columns.get("Illu%").copied();
    let diameter = table.columns.get("Ang-diam").copied();
    let delta = table.columns.get("delta").copied();
    let deldot = table.columns.get("deldot").copied();

    table
        .records
        .iter()
        .map(|record| {
            Ok(EphemerisRow {
                timestamp: parse_timestamp(field(record, date)?)?,
                ra_deg: required_f64(record, ra)?,
                dec_deg: required_f64(record, dec)?,
                azimuth_deg: required_f64(record, azimuth)?,
                altitude_deg: required_f64(record, elevation)?,
                distance_au: optional_f64(record, delta)?,
                range_rate_kms: optional_f64(record, deldot)?,
                magnitude: optional_f64(record, magnitude)?,
                illumination_pct: optional_f64(record, illumination)?,
                angular_diameter_arcsec: optional_f64(record, diameter)?,
            })
        })
        .collect()
}

/// First velocity of a CSV vector table, if the table has any rows.
pub fn parse_vector_table(body: &str) -> Result<Option<Velocity>, ProviderError> {
    let table = Table::parse(body)?;
    let vx = table.index("VX")?;
    let vy = table.index("VY")?;
    let vz = table.index("VZ")?;

    table
        .records
        .first()
        .map(|record| {
            Ok(Velocity::new(
                required_f64(record, vx)?,
                required_f64(record, vy)?,
                required_f64(record, vz)?,
            ))
        })
        .transpose()
}
