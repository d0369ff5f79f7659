use anyhow::{bail, Context};
use chrono::{NaiveDateTime, Utc};
use clap::Parser;
use horizoncore::ephemeris::{catalog, ObservationWindow};
use log::info;
use provider::{HorizonsProvider, LiveProvider, SyntheticProvider};
use report::{ObjectReport, ReportFormatter};
use std::fs;
use std::path::PathBuf;
use tokio::runtime::Builder as TokioBuilder;
use workflow::config::parse_start;
use workflow::{CliOverrides, ReportConfig, Runner};

mod provider;
mod report;
mod workflow;

#[derive(Parser)]
#[command(author, version, about = "Rise, transit and set report for tracked sky objects")]
struct Args {
    /// Load a report config from YAML
    #[arg(long)]
    config: Option<PathBuf>,
    /// Catalogue target to report on; repeat for several
    #[arg(long = "target")]
    targets: Vec<String>,
    /// Observer latitude in degrees, north positive
    #[arg(long, allow_negative_numbers = true)]
    lat: Option<f64>,
    /// Observer longitude in degrees, east positive
    #[arg(long, allow_negative_numbers = true)]
    lon: Option<f64>,
    /// Observer elevation in metres
    #[arg(long, allow_negative_numbers = true)]
    elevation: Option<f64>,
    /// Window start in local time, YYYY-MM-DD or "YYYY-MM-DD HH:MM"; now if omitted
    #[arg(long, visible_alias = "date", value_parser = parse_start)]
    start: Option<NaiveDateTime>,
    /// Length of the observation window
    #[arg(long)]
    hours: Option<u32>,
    #[arg(long)]
    step_minutes: Option<u32>,
    /// Fixed UTC offset in hours for printed times
    #[arg(long, allow_negative_numbers = true)]
    utc_offset: Option<f64>,
    /// Generate synthetic positions instead of querying live services
    #[arg(long, default_value_t = false)]
    offline: bool,
    /// Seed for the synthetic generator
    #[arg(long)]
    seed: Option<u64>,
    /// Print the per-sample altitude table
    #[arg(long, default_value_t = false)]
    table: bool,
    /// Only list targets currently at azimuth 120-220° and altitude 0-60°,
    /// or inside the region set in the config file
    #[arg(long, default_value_t = false)]
    region: bool,
    /// Emit reports as JSON instead of text
    #[arg(long, default_value_t = false)]
    json: bool,
    /// Write the report to a file instead of stdout
    #[arg(long)]
    output: Option<PathBuf>,
    /// List the built-in target names and exit
    #[arg(long, default_value_t = false)]
    list_targets: bool,
}

impl Args {
    fn overrides(&self) -> CliOverrides {
        CliOverrides {
            targets: self.targets.clone(),
            latitude_deg: self.lat,
            longitude_deg: self.lon,
            elevation_m: self.elevation,
            start: self.start,
            window_hours: self.hours,
            step_minutes: self.step_minutes,
            utc_offset_hours: self.utc_offset,
            seed: self.seed,
            region: self.region,
        }
    }
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();

    if args.list_targets {
        for name in catalog::names() {
            println!("{}", name);
        }
        return Ok(());
    }

    let overrides = args.overrides();
    let config = if let Some(path) = &args.config {
        let mut config = ReportConfig::load(path)?;
        config
            .apply(&overrides)
            .context("applying command-line overrides")?;
        config
    } else {
        ReportConfig::from_args(&overrides)?
    };

    let runtime = TokioBuilder::new_current_thread()
        .enable_all()
        .build()
        .context("creating runtime for provider requests")?;
    let now = Utc::now();

    let result = if args.offline {
        let provider = SyntheticProvider::new(config.synthetic.clone());
        runtime.block_on(Runner::new(config.clone(), provider).execute(now))?
    } else {
        let horizons = HorizonsProvider::new(config.horizons_url.clone())
            .context("building ephemeris client")?;
        runtime.block_on(Runner::new(config.clone(), LiveProvider::new(horizons)).execute(now))?
    };

    let observed = result
        .reports
        .iter()
        .filter_map(ObjectReport::observation)
        .count();
    info!(
        "observed {} of {} targets ({} below horizon, {} failed)",
        observed,
        result.reports.len(),
        result.metrics.below_horizon,
        result.metrics.errors
    );

    let listed = report::select(&result.reports, config.region.as_ref());
    if config.region.is_some() {
        info!("{} of {} targets inside the region", listed.len(), result.reports.len());
    }

    let rendered = if args.json {
        serde_json::to_string_pretty(&listed).context("serialising reports")?
    } else {
        render_text(&config, &result.window, &listed, args.table)?
    };

    match &args.output {
        Some(path) => {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                fs::create_dir_all(parent)
                    .with_context(|| format!("creating {}", parent.display()))?;
            }
            fs::write(path, format!("{}\n", rendered))
                .with_context(|| format!("writing report {}", path.display()))?;
            info!("report written to {}", path.display());
        }
        None => println!("{}", rendered),
    }

    if result.reports.iter().all(ObjectReport::is_failed) {
        bail!("no target could be observed");
    }
    Ok(())
}

fn render_text(
    config: &ReportConfig,
    window: &ObservationWindow,
    reports: &[&ObjectReport],
    show_table: bool,
) -> anyhow::Result<String> {
    let formatter = ReportFormatter::new(config.utc_offset()?).with_table(show_table);
    let mut sections = vec![formatter.header(&config.observer, window, config.region.as_ref())];
    if config.region.is_some() && reports.is_empty() {
        sections.push("\nNo objects found in the specified region.".to_string());
    }
    sections.extend(reports.iter().map(|report| formatter.render(report)));
    Ok(sections.join("\n"))
}
