//! Random undersampling of normal bins

use super::{make_rng, round_count, validate_u_percentage, Resampler};
use crate::dataset::Dataset;
use crate::error::{ImbalanceError, Result};
use crate::relevance::{RelevanceProfile, RelevanceSpec};
use crate::segment::Segmenter;

/// Thins every normal bin to a `1 - u_percentage` fraction (uniform,
/// without replacement) and keeps all rare bins intact. Output rows are
/// grouped by bin; no ordering is guaranteed across bins.
#[derive(Debug, Clone)]
pub struct RandomUndersampler {
    u_percentage: f64,
    relevance: RelevanceSpec,
    threshold: f64,
    sort_by_target: bool,
    seed: Option<u64>,
}

impl RandomUndersampler {
    /// `u_percentage` is the fraction of each normal bin to remove; it must
    /// lie strictly in (0, 1).
    pub fn new(u_percentage: f64) -> Result<Self> {
        Ok(Self {
            u_percentage: validate_u_percentage(u_percentage)?,
            relevance: RelevanceSpec::Default,
            threshold: 0.9,
            sort_by_target: true,
            seed: None,
        })
    }

    /// Set the relevance function.
    pub fn with_relevance(mut self, spec: RelevanceSpec) -> Self {
        self.relevance = spec;
        self
    }

    /// Set the rare/normal utility threshold.
    pub fn with_threshold(mut self, threshold: f64) -> Self {
        self.threshold = threshold;
        self
    }

    /// Control the pre-sort before segmentation.
    pub fn with_sort(mut self, sort_by_target: bool) -> Self {
        self.sort_by_target = sort_by_target;
        self
    }

    /// Set the random seed for reproducible sampling.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }
}

impl Resampler for RandomUndersampler {
    fn resample(&self, dataset: &Dataset) -> Result<Dataset> {
        let mut rng = make_rng(self.seed);
        let profile = RelevanceProfile::attach(dataset, &self.relevance, self.threshold)?;
        let segments = Segmenter::new()
            .with_sort(self.sort_by_target)
            .segment(dataset, &profile.tags())?;

        let mut parts = Vec::new();
        for bin in &segments.normal {
            let bin_df = dataset.select_by_id(bin)?;
            let keep = round_count(1.0 - self.u_percentage, bin_df.n_rows());
            parts.push(bin_df.sample_n(keep, &mut rng));
        }
        for bin in &segments.rare {
            parts.push(dataset.select_by_id(bin)?);
        }

        if parts.iter().map(Dataset::n_rows).sum::<usize>() == 0 {
            return Err(ImbalanceError::DataQuality(format!(
                "undersampling removed every row (u_percentage = {} and no rare \
                 rows); lower u_percentage or the threshold",
                self.u_percentage
            )));
        }

        Dataset::concat(&parts)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::{Column, Value};

    fn step_relevance() -> RelevanceSpec {
        RelevanceSpec::custom(|y| if y > 5.0 { 1.0 } else { 0.0 })
    }

    fn imbalanced_dataset(n_normal: usize, n_rare: usize) -> Dataset {
        let mut y = Vec::new();
        for i in 0..n_normal {
            y.push(Value::Float((i % 5) as f64 * 0.1));
        }
        for i in 0..n_rare {
            y.push(Value::Float(10.0 + i as f64));
        }
        let x = (0..(n_normal + n_rare))
            .map(|i| Value::Float(i as f64))
            .collect();
        Dataset::new(vec![Column::new("x", x), Column::new("y", y)], None).unwrap()
    }

    #[test]
    fn test_expected_row_count() {
        // 40 normal rows thinned to 20, plus all 10 rare rows.
        let df = imbalanced_dataset(40, 10);
        let ru = RandomUndersampler::new(0.5)
            .unwrap()
            .with_relevance(step_relevance())
            .with_threshold(0.5)
            .with_seed(42);
        let out = ru.resample(&df).unwrap();
        assert_eq!(out.n_rows(), 30);
    }

    #[test]
    fn test_never_grows() {
        let df = imbalanced_dataset(20, 5);
        let ru = RandomUndersampler::new(0.3)
            .unwrap()
            .with_relevance(step_relevance())
            .with_threshold(0.5)
            .with_seed(1);
        let out = ru.resample(&df).unwrap();
        assert!(out.n_rows() <= df.n_rows());
    }

    #[test]
    fn test_rare_rows_all_retained() {
        let df = imbalanced_dataset(30, 4);
        let ru = RandomUndersampler::new(0.5)
            .unwrap()
            .with_relevance(step_relevance())
            .with_threshold(0.5)
            .with_seed(5);
        let out = ru.resample(&df).unwrap();
        let rare_count = out
            .target_values()
            .unwrap()
            .iter()
            .filter(|&&y| y > 5.0)
            .count();
        assert_eq!(rare_count, 4);
    }

    #[test]
    fn test_removing_every_row_names_the_cause() {
        // 2 normal rows, no rare ones: round(0.1 * 2) = 0 rows survive.
        let df = imbalanced_dataset(2, 0);
        let ru = RandomUndersampler::new(0.9)
            .unwrap()
            .with_relevance(step_relevance())
            .with_threshold(0.5)
            .with_seed(1);
        let err = ru.resample(&df).unwrap_err();
        assert!(matches!(err, ImbalanceError::DataQuality(_)));
        assert!(err.to_string().contains("u_percentage"), "{err}");
    }

    #[test]
    fn test_invalid_u_percentage_rejected_at_construction() {
        assert!(RandomUndersampler::new(0.0).is_err());
        assert!(RandomUndersampler::new(1.0).is_err());
        assert!(RandomUndersampler::new(-0.4).is_err());
    }
}
