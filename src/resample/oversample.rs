//! Random oversampling of rare bins

use super::{make_rng, round_count, validate_o_percentage, Resampler};
use crate::dataset::Dataset;
use crate::error::Result;
use crate::relevance::{RelevanceProfile, RelevanceSpec};
use crate::segment::Segmenter;

/// Duplicates rare-bin rows: each rare bin is grown by a with-replacement
/// draw of `round((o_percentage - 1) * bin_size)` rows, every duplicate
/// carrying a fresh synthetic id so it never collides with the original
/// row. Normal bins pass through unchanged.
#[derive(Debug, Clone)]
pub struct RandomOversampler {
    o_percentage: f64,
    relevance: RelevanceSpec,
    threshold: f64,
    sort_by_target: bool,
    seed: Option<u64>,
}

impl RandomOversampler {
    /// `o_percentage` is the multiplicative target size of each rare bin;
    /// it must be greater than 1.
    pub fn new(o_percentage: f64) -> Result<Self> {
        Ok(Self {
            o_percentage: validate_o_percentage(o_percentage)?,
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

impl Resampler for RandomOversampler {
    fn resample(&self, dataset: &Dataset) -> Result<Dataset> {
        let mut rng = make_rng(self.seed);
        let profile = RelevanceProfile::attach(dataset, &self.relevance, self.threshold)?;
        let segments = Segmenter::new()
            .with_sort(self.sort_by_target)
            .segment(dataset, &profile.tags())?;

        let mut counter = 0;
        let mut parts = Vec::new();
        for bin in &segments.rare {
            let bin_df = dataset.select_by_id(bin)?;
            let n_extra = round_count(self.o_percentage - 1.0, bin_df.n_rows());
            let mut duplicates = bin_df.sample_with_replacement(n_extra, &mut rng);
            duplicates.reindex_synthetic("oversampled", &mut counter);
            parts.push(duplicates);
            parts.push(bin_df);
        }
        for bin in &segments.normal {
            parts.push(dataset.select_by_id(bin)?);
        }

        Dataset::concat(&parts)
    }
}
