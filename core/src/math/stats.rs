pub struct StatsHelper;

impl StatsHelper {
    pub fn sum(samples: &[f64]) -> f64 {
        samples.iter().sum()
    }

    pub fn mean(samples: &[f64]) -> Option<f64> {
        if samples.is_empty() {
            return None;
        }
        Some(Self::sum(samples) / samples.len() as f64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mean_of_empty_sequence_is_none() {
        assert_eq!(StatsHelper::mean(&[]), None);
        assert_eq!(StatsHelper::sum(&[]), 0.0);
    }

    #[test]
    fn mean_handles_signed_values() {
        assert_eq!(StatsHelper::mean(&[0.25, -0.75]), Some(-0.25));
    }
}
