pub mod fixed_star;
pub mod horizons;
pub mod synthetic;

use chrono::{DateTime, Utc};
use horizoncore::ephemeris::{
    Ephemeris, ObservationWindow, ObserverConfig, Target, TargetSource, Velocity,
};
use horizoncore::DetectError;

pub use fixed_star::FixedStarProvider;
pub use horizons::HorizonsProvider;
pub use synthetic::{SyntheticConfig, SyntheticProvider};

/// Everything a provider needs to produce one ephemeris.
#[derive(Debug, Clone)]
pub struct EphemerisRequest {
    pub target: Target,
    pub observer: ObserverConfig,
    pub window: ObservationWindow,
}

#[derive(thiserror::Error, Debug)]
pub enum ProviderError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("ephemeris service error: {0}")]
    Service(String),
    #[error("malformed ephemeris response: {0}")]
    Parse(String),
    #[error("provider returned {0} samples, at least 2 are required")]
    TooFewSamples(usize),
    #[error("{provider} cannot serve target {target}")]
    Unsupported {
        provider: &'static str,
        target: String,
    },
    #[error(transparent)]
    Series(#[from] DetectError),
}

/// Source of time-ordered positions for a target.
///
/// A fetch either returns the complete series for the window or fails;
/// partial data never reaches the detector.
#[allow(async_fn_in_trait)]
pub trait SampleProvider {
    fn name(&self) -> &'static str;

    async fn fetch(&self, request: &EphemerisRequest) -> Result<Ephemeris, ProviderError>;

    /// Velocity relative to the Sun, when the provider can supply one.
    async fn heliocentric_velocity(
        &self,
        _target: &Target,
        _at: DateTime<Utc>,
    ) -> Result<Option<Velocity>, ProviderError> {
        Ok(None)
    }
}

pub(crate) fn ensure_complete(ephemeris: Ephemeris) -> Result<Ephemeris, ProviderError> {
    if ephemeris.len() < 2 {
        return Err(ProviderError::TooFewSamples(ephemeris.len()));
    }
    Ok(ephemeris)
}

/// Routes each target to Horizons or to the local star calculation.
pub struct LiveProvider {
    horizons: HorizonsProvider,
    stars: FixedStarProvider,
}

impl LiveProvider {
    pub fn new(horizons: HorizonsProvider) -> Self {
        Self {
            horizons,
            stars: FixedStarProvider,
        }
    }
}

impl SampleProvider for LiveProvider {
    fn name(&self) -> &'static str {
        "live"
    }

    async fn fetch(&self, request: &EphemerisRequest) -> Result<Ephemeris, ProviderError> {
        match request.target.source {
            TargetSource::Horizons { .. } => self.horizons.fetch(request).await,
            TargetSource::FixedStar { .. } => self.stars.fetch(request).await,
        }
    }

    async fn heliocentric_velocity(
        &self,
        target: &Target,
        at: DateTime<Utc>,
    ) -> Result<Option<Velocity>, ProviderError> {
        match target.source {
            TargetSource::Horizons { .. } => self.horizons.heliocentric_velocity(target, at).await,
            TargetSource::FixedStar { .. } => Ok(None),
        }
    }
}
