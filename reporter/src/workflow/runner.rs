use chrono::{DateTime, Utc};
use horizoncore::detect;
use horizoncore::ephemeris::{BodyDetails, BodyKind, ObservationWindow, Target, Velocity};
use horizoncore::telemetry::{LogManager, MetricsRecorder, MetricsSnapshot};

use crate::provider::{EphemerisRequest, ProviderError, SampleProvider};
use crate::report::{ObjectReport, Observation};
use crate::workflow::config::ReportConfig;

pub struct WorkflowResult {
    pub window: ObservationWindow,
    pub reports: Vec<ObjectReport>,
    pub metrics: MetricsSnapshot,
}

/// Fetches, detects and assembles a report for every configured target.
///
/// Targets are handled one after another. A failure for one target is
/// recorded in its report and does not stop the rest.
pub struct Runner<P> {
    config: ReportConfig,
    provider: P,
    logger: LogManager,
    metrics: MetricsRecorder,
}

impl<P: SampleProvider> Runner<P> {
    pub fn new(config: ReportConfig, provider: P) -> Self {
        Self {
            config,
            provider,
            logger: LogManager::new("runner"),
            metrics: MetricsRecorder::new(),
        }
    }

    pub async fn execute(&self, now: DateTime<Utc>) -> anyhow::Result<WorkflowResult> {
        let window = self.config.window_starting(now)?;
        let targets = self.config.resolve_targets()?;
        self.logger.record(&format!(
            "{} targets via {} for {} from {} to {}",
            targets.len(),
            self.provider.name(),
            self.config.observer.name,
            window.start,
            window.stop
        ));

        let mut reports = Vec::with_capacity(targets.len());
        for target in targets {
            reports.push(self.process(target, &window).await);
        }

        Ok(WorkflowResult {
            window,
            reports,
            metrics: self.metrics.snapshot(),
        })
    }

    async fn process(&self, target: Target, window: &ObservationWindow) -> ObjectReport {
        let request = EphemerisRequest {
            target,
            observer: self.config.observer.clone(),
            window: window.clone(),
        };

        match self.observe(&request).await {
            Ok(observation) => {
                self.metrics.record_processed();
                if observation.detection.is_below_horizon() {
                    self.metrics.record_below_horizon();
                }
                ObjectReport::observed(request.target, window, observation)
            }
            Err(err) => {
                self.metrics.record_error();
                self.logger
                    .warn(&format!("{} failed: {}", request.target.name, err));
                ObjectReport::failed(request.target, window, err.to_string())
            }
        }
    }

    async fn observe(&self, request: &EphemerisRequest) -> Result<Observation, ProviderError> {
        let ephemeris = self.provider.fetch(request).await?;
        let series = ephemeris.to_series()?;
        let detection = detect(&series);
        let current = ephemeris
            .current()
            .cloned()
            .ok_or(ProviderError::TooFewSamples(0))?;

        let heliocentric = match request.target.kind {
            BodyKind::Spacecraft => self.velocity(&request.target, current.timestamp).await,
            _ => None,
        };
        let details = BodyDetails::from_row(&request.target, &current, heliocentric);

        Ok(Observation {
            current,
            details,
            detection,
            samples: ephemeris.rows,
        })
    }

    /// Velocity is supplementary; failures are logged and dropped.
    async fn velocity(&self, target: &Target, at: DateTime<Utc>) -> Option<Velocity> {
        match self.provider.heliocentric_velocity(target, at).await {
            Ok(velocity) => velocity,
            Err(err) => {
                self.logger.warn(&format!(
                    "heliocentric velocity for {} unavailable: {}",
                    target.name, err
                ));
                None
            }
        }
    }
}
