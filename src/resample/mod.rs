//! Resampling strategies for imbalanced regression targets
//!
//! Four relevance-based strategies plus one histogram-frequency variant:
//! - [`RandomUndersampler`] - thins normal bins, keeps rare bins intact
//! - [`RandomOversampler`] - duplicates rare-bin rows under fresh ids
//! - [`GaussianNoise`] - undersamples normals, synthesizes noisy rare rows
//! - [`Wercs`] - binless utility-weighted over- and undersampling
//! - [`Gnhf`] - relevance-free, rebalances by target histogram frequency
//!
//! Each strategy owns its configuration and performs a full session per
//! call: relevance attachment, segmentation, sampling. Nothing is shared
//! across instances or calls.

mod gaussian_noise;
mod gnhf;
mod oversample;
mod undersample;
mod wercs;

pub use gaussian_noise::GaussianNoise;
pub use gnhf::Gnhf;
pub use oversample::RandomOversampler;
pub use undersample::RandomUndersampler;
pub use wercs::Wercs;

use crate::dataset::Dataset;
use crate::error::{ImbalanceError, Result};
use rand::prelude::*;

/// A rebalancing strategy: consumes a dataset, returns a same-schema
/// dataset with a less skewed target distribution.
pub trait Resampler {
    fn resample(&self, dataset: &Dataset) -> Result<Dataset>;
}

/// One RNG per resampling call: seeded when a seed was configured, from
/// entropy otherwise. A fixed seed makes the whole pipeline reproducible.
pub(crate) fn make_rng(seed: Option<u64>) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    }
}

/// `round(frac * len)` as a sample size.
pub(crate) fn round_count(frac: f64, len: usize) -> usize {
    (frac * len as f64).round().max(0.0) as usize
}

/// Oversampling factor: output per rare bin is `o_percentage` times the
/// original size, so the added fraction is `o_percentage - 1`.
pub(crate) fn validate_o_percentage(o_percentage: f64) -> Result<f64> {
    if !o_percentage.is_finite() || o_percentage <= 1.0 {
        return Err(ImbalanceError::invalid_config(
            "o_percentage",
            o_percentage,
            "must be greater than 1",
        ));
    }
    Ok(o_percentage)
}

/// Undersampling fraction: this share of each normal bin is removed, so
/// `1 - u_percentage` is retained.
pub(crate) fn validate_u_percentage(u_percentage: f64) -> Result<f64> {
    if !u_percentage.is_finite() || u_percentage <= 0.0 || u_percentage >= 1.0 {
        return Err(ImbalanceError::invalid_config(
            "u_percentage",
            u_percentage,
            "must lie strictly in (0, 1)",
        ));
    }
    Ok(u_percentage)
}
