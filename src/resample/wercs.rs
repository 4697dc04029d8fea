//! WERCS: weighted relevance-based combination strategy

use super::{make_rng, round_count, validate_o_percentage, validate_u_percentage, Resampler};
use crate::dataset::Dataset;
use crate::error::Result;
use crate::relevance::{RelevanceProfile, RelevanceSpec};

/// Binless combination strategy: draws a with-replacement oversample from
/// the whole dataset weighted by utility (rare rows favored) and a
/// with-replacement undersample weighted by `1 - utility` (normal rows
/// favored), and appends both to the original rows.
///
/// Degenerate weights (all zero on either side) make weighted sampling
/// undefined and are surfaced as an error rather than silently falling
/// back to uniform draws.
#[derive(Debug, Clone)]
pub struct Wercs {
    o_percentage: f64,
    u_percentage: f64,
    relevance: RelevanceSpec,
    threshold: f64,
    seed: Option<u64>,
}

impl Wercs {
    /// `o_percentage` sizes the weighted oversample (> 1), `u_percentage`
    /// sizes the weighted undersample (in (0, 1), `1 - u_percentage` of the
    /// dataset is drawn).
    pub fn new(o_percentage: f64, u_percentage: f64) -> Result<Self> {
        Ok(Self {
            o_percentage: validate_o_percentage(o_percentage)?,
            u_percentage: validate_u_percentage(u_percentage)?,
            relevance: RelevanceSpec::Default,
            threshold: 0.9,
            seed: None,
        })
    }

    /// Set the relevance function.
    pub fn with_relevance(mut self, spec: RelevanceSpec) -> Self {
        self.relevance = spec;
        self
    }

    /// Set the utility threshold. WERCS never segments, so the threshold
    /// only participates in profile validation.
    pub fn with_threshold(mut self, threshold: f64) -> Self {
        self.threshold = threshold;
        self
    }

    /// Set the random seed for reproducible sampling.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }
}

impl Resampler for Wercs {
    fn resample(&self, dataset: &Dataset) -> Result<Dataset> {
        let mut rng = make_rng(self.seed);
        let profile = RelevanceProfile::attach(dataset, &self.relevance, self.threshold)?;
        let utilities = profile.utilities();
        let n = dataset.n_rows();

        let over_weights: Vec<f64> = utilities.iter().copied().collect();
        let n_over = round_count(self.o_percentage - 1.0, n);
        let mut oversample = dataset.sample_weighted(n_over, &over_weights, &mut rng)?;
        let mut counter = 0;
        oversample.reindex_synthetic("oversampled", &mut counter);

        let under_weights: Vec<f64> = utilities.iter().map(|&u| 1.0 - u).collect();
        let n_under = round_count(1.0 - self.u_percentage, n);
        let mut undersample = dataset.sample_weighted(n_under, &under_weights, &mut rng)?;
        let mut counter = 0;
        undersample.reindex_synthetic("undersampled", &mut counter);

        Dataset::concat(&[dataset.clone(), oversample, undersample])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::{Column, Value};
    use crate::error::ImbalanceError;

    fn skewed_dataset() -> Dataset {
        // 18 targets near zero, 2 extreme ones.
        let mut y: Vec<Value> = (0..18).map(|i| Value::Float((i % 3) as f64 * 0.1)).collect();
        y.push(Value::Float(50.0));
        y.push(Value::Float(60.0));
        let x = (0..20).map(|i| Value::Float(i as f64)).collect();
        Dataset::new(vec![Column::new("x", x), Column::new("y", y)], None).unwrap()
    }

    #[test]
    fn test_output_size_arithmetic() {
        let df = skewed_dataset();
        let wercs = Wercs::new(2.0, 0.5).unwrap().with_seed(42);
        let out = wercs.resample(&df).unwrap();
        // 20 originals + round(1.0 * 20) oversampled + round(0.5 * 20) undersampled.
        assert_eq!(out.n_rows(), 20 + 20 + 10);
    }

    #[test]
    fn test_oversample_favors_high_utility_rows() {
        let df = skewed_dataset();
        let spec = RelevanceSpec::custom(|y| if y > 5.0 { 1.0 } else { 0.0 });
        let wercs = Wercs::new(3.0, 0.5)
            .unwrap()
            .with_relevance(spec)
            .with_seed(42);
        let out = wercs.resample(&df).unwrap();
        // With a hard step function every oversampled row is an extreme one:
        // 2 rare originals + round(2 * 20) = 40 weighted draws, all rare.
        let rare = out
            .target_values()
            .unwrap()
            .iter()
            .filter(|&&y| y > 5.0)
            .count();
        assert_eq!(rare, 2 + 40);
    }

    #[test]
    fn test_all_zero_weights_rejected() {
        let df = skewed_dataset();
        // Relevance constant at 0 means all-zero oversampling weights.
        let spec = RelevanceSpec::custom(|_| 0.0);
        let wercs = Wercs::new(2.0, 0.5)
            .unwrap()
            .with_relevance(spec)
            .with_seed(1);
        assert!(matches!(
            wercs.resample(&df),
            Err(ImbalanceError::DataQuality(_))
        ));
    }

    #[test]
    fn test_reproducible_under_seed() {
        let df = skewed_dataset();
        let a = Wercs::new(2.5, 0.4).unwrap().with_seed(9).resample(&df).unwrap();
        let b = Wercs::new(2.5, 0.4).unwrap().with_seed(9).resample(&df).unwrap();
        assert_eq!(a, b);
    }
}
