//! Combined undersampling and noise-based synthetic oversampling

use super::{make_rng, round_count, validate_o_percentage, validate_u_percentage, Resampler};
use crate::dataset::Dataset;
use crate::error::{ImbalanceError, Result};
use crate::noise::NoiseSynthesizer;
use crate::relevance::{RelevanceProfile, RelevanceSpec};
use crate::segment::Segmenter;

/// Undersamples normal bins and, instead of duplicating rare rows, invokes
/// the noise synthesizer per rare bin. Output is the undersampled normal
/// rows, the original rare rows, and the synthetic noisy rare rows.
#[derive(Debug, Clone)]
pub struct GaussianNoise {
    o_percentage: f64,
    u_percentage: f64,
    perm_amp: f64,
    categorical_columns: Option<Vec<String>>,
    relevance: RelevanceSpec,
    threshold: f64,
    sort_by_target: bool,
    seed: Option<u64>,
}

impl GaussianNoise {
    /// `o_percentage` sizes the synthetic output per rare bin (> 1),
    /// `u_percentage` is the removed fraction of each normal bin (in (0, 1)),
    /// `perm_amp` scales the Gaussian noise as a fraction of each continuous
    /// column's standard deviation (>= 0).
    pub fn new(o_percentage: f64, u_percentage: f64, perm_amp: f64) -> Result<Self> {
        if !perm_amp.is_finite() || perm_amp < 0.0 {
            return Err(ImbalanceError::invalid_config(
                "perm_amp",
                perm_amp,
                "must be a finite non-negative number",
            ));
        }
        Ok(Self {
            o_percentage: validate_o_percentage(o_percentage)?,
            u_percentage: validate_u_percentage(u_percentage)?,
            perm_amp,
            categorical_columns: None,
            relevance: RelevanceSpec::Default,
            threshold: 0.9,
            sort_by_target: true,
            seed: None,
        })
    }

    /// Name the columns to treat as categorical during synthesis. When not
    /// set, they are inferred heuristically.
    pub fn with_categorical_columns(mut self, columns: Vec<String>) -> Self {
        self.categorical_columns = Some(columns);
        self
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

impl Resampler for GaussianNoise {
    fn resample(&self, dataset: &Dataset) -> Result<Dataset> {
        let mut rng = make_rng(self.seed);
        let profile = RelevanceProfile::attach(dataset, &self.relevance, self.threshold)?;
        let segments = Segmenter::new()
            .with_sort(self.sort_by_target)
            .segment(dataset, &profile.tags())?;

        let categorical = match &self.categorical_columns {
            Some(columns) => {
                for name in columns {
                    dataset.column(name)?;
                }
                columns.clone()
            }
            None => dataset.infer_categorical_columns(),
        };
        let mut synthesizer = NoiseSynthesizer::new(categorical, self.perm_amp)?;

        let mut parts = Vec::new();
        for bin in &segments.normal {
            let bin_df = dataset.select_by_id(bin)?;
            let keep = round_count(1.0 - self.u_percentage, bin_df.n_rows());
            parts.push(bin_df.sample_n(keep, &mut rng));
        }
        for bin in &segments.rare {
            let bin_df = dataset.select_by_id(bin)?;
            let synthetic = synthesizer.synthesize(&bin_df, self.o_percentage, &mut rng)?;
            parts.push(bin_df);
            parts.push(synthetic);
        }

        Dataset::concat(&parts)
    }
}
