//! Relevance (utility) functions and rare/normal classification
//!
//! A relevance function maps a target value to [0, 1]; higher means rarer.
//! Rows whose utility reaches the threshold are tagged rare. The default
//! function scores distance from the target's own center of mass:
//! `f(x) = 1 - pdf(x; mu, sigma) / pdf(mu; mu, sigma)`, so the most typical
//! value scores 0 and extreme values approach 1.
//!
//! Ref: Branco, P., Torgo, L. and Ribeiro, R.P., Pre-processing approaches
//! for imbalanced distributions in regression. Neurocomputing 343, 2019.

use crate::dataset::{sample_std, Dataset};
use crate::error::{ImbalanceError, Result};
use ndarray::Array1;
use statrs::distribution::{Continuous, Normal};
use std::fmt;
use std::sync::Arc;

/// A caller-supplied relevance function: target value to [0, 1].
pub type RelevanceFn = dyn Fn(f64) -> f64 + Send + Sync;

/// Which relevance function to use.
#[derive(Clone)]
pub enum RelevanceSpec {
    /// Gaussian distance-from-center rarity built from the dataset's own
    /// target mean and standard deviation.
    Default,
    /// Caller-supplied function.
    Custom(Arc<RelevanceFn>),
}

impl RelevanceSpec {
    /// Wrap a closure as a custom relevance function.
    pub fn custom(f: impl Fn(f64) -> f64 + Send + Sync + 'static) -> Self {
        RelevanceSpec::Custom(Arc::new(f))
    }
}

impl fmt::Debug for RelevanceSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RelevanceSpec::Default => write!(f, "RelevanceSpec::Default"),
            RelevanceSpec::Custom(_) => write!(f, "RelevanceSpec::Custom(..)"),
        }
    }
}

impl Default for RelevanceSpec {
    fn default() -> Self {
        RelevanceSpec::Default
    }
}

/// Per-row utility values plus the rare/normal threshold.
///
/// Utilities are computed once at attach time from the dataset's current
/// row sequence; they go stale if rows are added or removed afterward.
#[derive(Debug, Clone)]
pub struct RelevanceProfile {
    utilities: Array1<f64>,
    threshold: f64,
}

impl RelevanceProfile {
    /// Evaluate the relevance function over every observed target value and
    /// validate the results.
    ///
    /// Errors: `InvalidConfig` for a threshold outside (0, 1); `DataQuality`
    /// when the function produces a value outside [0, 1] for some observed
    /// target, or when the default function is undefined (zero target
    /// variance).
    pub fn attach(dataset: &Dataset, spec: &RelevanceSpec, threshold: f64) -> Result<Self> {
        validate_threshold(threshold)?;

        let y = dataset.target_values()?;
        let utilities = match spec {
            RelevanceSpec::Default => {
                let mean = y.mean().ok_or_else(|| {
                    ImbalanceError::DataQuality("target column has no rows".to_string())
                })?;
                let std = sample_std(&y);
                if !(std.is_finite() && std > 0.0) {
                    return Err(ImbalanceError::DataQuality(
                        "target standard deviation is zero; the default relevance \
                         function is undefined. Supply a custom relevance function."
                            .to_string(),
                    ));
                }
                let dist = Normal::new(mean, std).map_err(|e| {
                    ImbalanceError::DataQuality(format!(
                        "cannot build default relevance function: {e}"
                    ))
                })?;
                let peak = dist.pdf(mean);
                y.mapv(|x| 1.0 - dist.pdf(x) / peak)
            }
            RelevanceSpec::Custom(f) => y.mapv(|x| f(x)),
        };

        for &u in utilities.iter() {
            if !u.is_finite() || !(0.0..=1.0).contains(&u) {
                return Err(ImbalanceError::DataQuality(format!(
                    "the relevance function must return values in [0, 1], got {u}. \
                     Re-define your relevance function."
                )));
            }
        }

        Ok(Self {
            utilities,
            threshold,
        })
    }

    pub fn utilities(&self) -> &Array1<f64> {
        &self.utilities
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    /// Rare tag per row: `utility >= threshold`.
    pub fn tags(&self) -> Vec<bool> {
        self.utilities
            .iter()
            .map(|&u| u >= self.threshold)
            .collect()
    }
}

fn validate_threshold(threshold: f64) -> Result<()> {
    if !threshold.is_finite() || threshold <= 0.0 || threshold >= 1.0 {
        return Err(ImbalanceError::invalid_config(
            "threshold",
            threshold,
            "must lie strictly in (0, 1)",
        ));
    }
    Ok(())
}
