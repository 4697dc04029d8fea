//! Equal-width histograms over the target column
//!
//! Shared by the histogram-frequency resampler and the stratified splitter.
//! Edges follow the numpy convention: `bins` equal-width buckets spanning
//! the observed range, each bucket left-closed/right-open except the last,
//! which also includes the maximum. A degenerate range (all targets equal)
//! is widened by half a unit on each side so every value still lands in a
//! bucket.

use crate::error::{ImbalanceError, Result};
use ndarray::Array1;

/// Bucket edges plus the bucket assignment of every row.
#[derive(Debug, Clone)]
pub struct Histogram {
    /// `n_buckets + 1` edges, ascending.
    edges: Vec<f64>,
    /// Bucket index per row, in row order.
    assignments: Vec<usize>,
    /// Row count per bucket.
    counts: Vec<usize>,
}

impl Histogram {
    /// Bucket the given values into `bins` equal-width buckets.
    pub fn build(values: &Array1<f64>, bins: usize) -> Result<Self> {
        if bins == 0 {
            return Err(ImbalanceError::invalid_config(
                "bins",
                bins,
                "must be a positive integer",
            ));
        }
        if values.is_empty() {
            return Err(ImbalanceError::DataQuality(
                "cannot build a histogram over zero rows".to_string(),
            ));
        }

        let mut min = f64::INFINITY;
        let mut max = f64::NEG_INFINITY;
        for &v in values.iter() {
            min = min.min(v);
            max = max.max(v);
        }
        if min == max {
            min -= 0.5;
            max += 0.5;
        }

        let width = (max - min) / bins as f64;
        let edges: Vec<f64> = (0..=bins).map(|i| min + width * i as f64).collect();

        let mut counts = vec![0usize; bins];
        let assignments: Vec<usize> = values
            .iter()
            .map(|&v| {
                let idx = (((v - min) / width) as usize).min(bins - 1);
                counts[idx] += 1;
                idx
            })
            .collect();

        Ok(Self {
            edges,
            assignments,
            counts,
        })
    }

    pub fn n_buckets(&self) -> usize {
        self.counts.len()
    }

    pub fn counts(&self) -> &[usize] {
        &self.counts
    }

    /// Mean row count across buckets.
    pub fn mean_count(&self) -> f64 {
        self.counts.iter().sum::<usize>() as f64 / self.counts.len() as f64
    }

    /// `(left, right)` edges of a bucket.
    pub fn bucket_edges(&self, bucket: usize) -> (f64, f64) {
        (self.edges[bucket], self.edges[bucket + 1])
    }

    /// Row positions assigned to a bucket, in row order.
    pub fn bucket_positions(&self, bucket: usize) -> Vec<usize> {
        self.assignments
            .iter()
            .enumerate()
            .filter(|(_, &b)| b == bucket)
            .map(|(pos, _)| pos)
            .collect()
    }
}
