//! Synthetic row generation by bootstrap plus Gaussian perturbation
//!
//! Given a subset of rows, produces `floor((inflation - 1) * |subset|)` new
//! rows. Categorical columns are redrawn from the subset's own empirical
//! frequency distribution; continuous columns are bootstrap-resampled from
//! the observed values with additive zero-mean Gaussian noise scaled by the
//! column's standard deviation. Cells are drawn independently per column,
//! so a synthetic row is not a perturbed copy of any single real row.

use crate::dataset::{sample_std, Column, Dataset, RowId, Value};
use crate::error::{ImbalanceError, Result};
use rand::distributions::WeightedIndex;
use rand::prelude::*;
use rand_distr::Normal;

/// Generates noisy synthetic rows from a subset of a dataset.
///
/// Owns a running counter so synthetic row ids stay unique across repeated
/// calls within one resampling session.
#[derive(Debug, Clone)]
pub struct NoiseSynthesizer {
    categorical_columns: Vec<String>,
    amplitude: f64,
    counter: usize,
}

impl NoiseSynthesizer {
    /// `amplitude` is the noise standard deviation as a fraction of each
    /// continuous column's own standard deviation (the permutation
    /// amplitude). Must be finite and non-negative.
    pub fn new(categorical_columns: Vec<String>, amplitude: f64) -> Result<Self> {
        if !amplitude.is_finite() || amplitude < 0.0 {
            return Err(ImbalanceError::invalid_config(
                "perm_amp",
                amplitude,
                "must be a finite non-negative number",
            ));
        }
        Ok(Self {
            categorical_columns,
            amplitude,
            counter: 0,
        })
    }

    /// Generate `floor((inflation - 1) * |subset|)` synthetic rows with the
    /// subset's schema. An inflation at or below 1, or an empty subset,
    /// yields an empty (zero-row) result.
    pub fn synthesize(
        &mut self,
        subset: &Dataset,
        inflation: f64,
        rng: &mut StdRng,
    ) -> Result<Dataset> {
        let n_source = subset.n_rows();
        let n = ((inflation - 1.0) * n_source as f64).floor().max(0.0) as usize;
        if n == 0 || n_source == 0 {
            return Ok(subset.empty_like());
        }

        let mut columns = Vec::with_capacity(subset.n_columns());
        for col in subset.columns() {
            let values = if self.categorical_columns.contains(&col.name) {
                self.draw_categorical(col, n, rng)?
            } else {
                self.draw_continuous(subset, &col.name, n, rng)?
            };
            columns.push(Column::new(col.name.clone(), values));
        }

        let index = (0..n)
            .map(|_| {
                let id = RowId::Synthetic(format!("noise-{}", self.counter));
                self.counter += 1;
                id
            })
            .collect();

        Ok(Dataset::from_parts(
            columns,
            index,
            subset.target_name().to_string(),
        ))
    }

    /// Draw `n` values with replacement according to the column's empirical
    /// category frequencies. Rare categories stay rare: the draw respects
    /// the subset's own distribution, not a uniform one.
    fn draw_categorical(
        &self,
        col: &Column,
        n: usize,
        rng: &mut StdRng,
    ) -> Result<Vec<Value>> {
        let counts = col.value_counts();
        let weights: Vec<f64> = counts.iter().map(|(_, c)| *c as f64).collect();
        let dist = WeightedIndex::new(&weights).map_err(|e| {
            ImbalanceError::DataQuality(format!(
                "cannot resample categorical column '{}': {e}",
                col.name
            ))
        })?;
        Ok((0..n).map(|_| counts[dist.sample(rng)].0.clone()).collect())
    }

    /// Bootstrap-draw `n` base values, then add zero-mean Gaussian noise
    /// with standard deviation `column_std * amplitude`. A constant column
    /// (std = 0) collapses the noise to zero: synthetic values equal the
    /// bootstrap draws exactly.
    fn draw_continuous(
        &self,
        subset: &Dataset,
        name: &str,
        n: usize,
        rng: &mut StdRng,
    ) -> Result<Vec<Value>> {
        let values = subset.numeric_column(name)?;
        let noise_std = sample_std(&values) * self.amplitude;
        let noise = if noise_std > 0.0 {
            Some(Normal::new(0.0, noise_std).map_err(|e| {
                ImbalanceError::DataQuality(format!(
                    "cannot build noise distribution for column '{name}': {e}"
                ))
            })?)
        } else {
            None
        };

        let len = values.len();
        Ok((0..n)
            .map(|_| {
                let base = values[rng.gen_range(0..len)];
                let perturbation = noise.as_ref().map_or(0.0, |d| d.sample(rng));
                Value::Float(base + perturbation)
            })
            .collect())
    }
}
