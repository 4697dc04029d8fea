//! Stratified train/test splitting by target histogram
//!
//! Independent of relevance and thresholds: the target range is cut into
//! equal-width buckets and each bucket is sampled proportionally, so both
//! partitions approximate the full target distribution — which a naive
//! global random split does not guarantee for small rare buckets.

use crate::dataset::Dataset;
use crate::error::{ImbalanceError, Result};
use crate::histogram::Histogram;
use crate::resample::make_rng;

/// Splits a dataset into disjoint train and test partitions, stratified by
/// an equal-width histogram of the target column.
///
/// Bucket membership is the strict open interval `(left, right)`: a row
/// whose target lands exactly on a bucket edge belongs to no bucket and is
/// silently dropped from both partitions. This matches the historical
/// behavior; `len(train) + len(test)` can therefore fall short of the
/// input row count.
#[derive(Debug, Clone)]
pub struct StratifiedSplitter {
    test_fraction: f64,
    bins: usize,
    seed: Option<u64>,
}

impl StratifiedSplitter {
    /// `test_fraction` is the share of each bucket drawn into the test
    /// partition; it must lie strictly in (0, 1). Buckets default to 10.
    pub fn new(test_fraction: f64) -> Result<Self> {
        if !test_fraction.is_finite() || test_fraction <= 0.0 || test_fraction >= 1.0 {
            return Err(ImbalanceError::invalid_config(
                "test_fraction",
                test_fraction,
                "must lie strictly in (0, 1)",
            ));
        }
        Ok(Self {
            test_fraction,
            bins: 10,
            seed: None,
        })
    }

    /// Set the histogram bucket count.
    pub fn with_bins(mut self, bins: usize) -> Result<Self> {
        if bins == 0 {
            return Err(ImbalanceError::invalid_config(
                "bins",
                bins,
                "must be a positive integer",
            ));
        }
        self.bins = bins;
        Ok(self)
    }

    /// Set the random seed for reproducible sampling.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Split into `(train, test)`. Disjoint by construction: each bucket's
    /// test rows are drawn without replacement and the complement goes to
    /// train.
    pub fn split(&self, dataset: &Dataset) -> Result<(Dataset, Dataset)> {
        let mut rng = make_rng(self.seed);
        let y = dataset.target_values()?;
        let hist = Histogram::build(&y, self.bins)?;

        let mut train_positions: Vec<usize> = Vec::new();
        let mut test_positions: Vec<usize> = Vec::new();

        for bucket in 0..hist.n_buckets() {
            let (left, right) = hist.bucket_edges(bucket);
            let members: Vec<usize> = (0..dataset.n_rows())
                .filter(|&pos| y[pos] > left && y[pos] < right)
                .collect();
            if members.is_empty() {
                continue;
            }

            let n_test = ((self.test_fraction * members.len() as f64).round() as usize)
                .min(members.len());
            let chosen = rand::seq::index::sample(&mut rng, members.len(), n_test);
            let mut in_test = vec![false; members.len()];
            for i in chosen.iter() {
                in_test[i] = true;
            }
            for (i, &pos) in members.iter().enumerate() {
                if in_test[i] {
                    test_positions.push(pos);
                } else {
                    train_positions.push(pos);
                }
            }
        }

        tracing::debug!(
            train = train_positions.len(),
            test = test_positions.len(),
            dropped = dataset.n_rows() - train_positions.len() - test_positions.len(),
            "stratified split"
        );

        Ok((
            dataset.select_positions(&train_positions),
            dataset.select_positions(&test_positions),
        ))
    }
}
