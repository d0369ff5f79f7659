pub struct StatsHelper;

impl StatsHelper {
    /// Index and value of the largest element, first occurrence on ties.
    pub fn argmax(values: &[f64]) -> Option<(usize, f64)> {
        let mut best: Option<(usize, f64)> = None;
        for (idx, &value) in values.iter().enumerate() {
            match best {
                Some((_, current)) if value <= current => {}
                _ => best = Some((idx, value)),
            }
        }
        best
    }

    pub fn max(values: &[f64]) -> Option<f64> {
        Self::argmax(values).map(|(_, value)| value)
    }

    pub fn min(values: &[f64]) -> Option<f64> {
        values.iter().copied().reduce(f64::min)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_sequence_yields_none() {
        assert_eq!(StatsHelper::argmax(&[]), None);
        assert_eq!(StatsHelper::max(&[]), None);
        assert_eq!(StatsHelper::min(&[]), None);
    }

    #[test]
    fn argmax_prefers_first_tie() {
        assert_eq!(StatsHelper::argmax(&[1.0, 5.0, 3.0, 5.0]), Some((1, 5.0)));
    }

    #[test]
    fn min_and_max_handle_negatives() {
        let values = [-10.0, -2.0, -30.0];
        assert_eq!(StatsHelper::max(&values), Some(-2.0));
        assert_eq!(StatsHelper::min(&values), Some(-30.0));
    }
}
