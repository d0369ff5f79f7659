use crate::math::stats::StatsHelper;
use crate::prelude::{HorizonState, SampleSeries};

/// Classifies a window as wholly below, wholly above, or crossing the horizon.
///
/// Zero altitude counts as below.
pub fn classify(series: &SampleSeries) -> HorizonState {
    let altitudes = series.altitudes();
    let max = StatsHelper::max(&altitudes).unwrap_or(f64::NEG_INFINITY);
    let min = StatsHelper::min(&altitudes).unwrap_or(f64::NEG_INFINITY);

    if max <= 0.0 {
        HorizonState::AlwaysBelow
    } else if min > 0.0 {
        HorizonState::AlwaysAbove
    } else {
        HorizonState::CrossesHorizon
    }
}
