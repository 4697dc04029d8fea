//! imbalreg - Preprocessing for imbalanced regression datasets
//!
//! Most regression datasets cluster near "normal" target values while the
//! interesting rows sit in a rare tail. This crate rebalances such datasets
//! before model training: a relevance (utility) function scores each row's
//! rarity, a segmenter groups the target-sorted rows into maximal rare and
//! normal runs, and a resampling strategy thins, duplicates, or synthesizes
//! rows until the target distribution is less skewed.
//!
//! # Modules
//!
//! ## Core engine
//! - [`dataset`] - In-memory columnar table with stable row identifiers
//! - [`relevance`] - Relevance functions and rare/normal classification
//! - [`segment`] - Maximal contiguous rare/normal runs over sorted targets
//! - [`noise`] - Bootstrap + Gaussian-noise synthetic row generation
//!
//! ## Strategies
//! - [`resample`] - Undersampling, oversampling, noise combination, WERCS,
//!   and histogram-frequency rebalancing
//! - [`split`] - Stratified train/test splitting by target histogram
//!
//! # Example
//!
//! ```
//! use imbalreg::prelude::*;
//!
//! let columns = vec![
//!     Column::new("x", (0..20).map(|i| Value::Float(i as f64)).collect()),
//!     Column::new(
//!         "y",
//!         (0..20)
//!             .map(|i| Value::Float(if i < 18 { 0.1 * (i % 3) as f64 } else { 50.0 + i as f64 }))
//!             .collect(),
//!     ),
//! ];
//! let dataset = Dataset::new(columns, Some("y"))?;
//!
//! let rebalanced = RandomOversampler::new(2.0)?
//!     .with_threshold(0.8)
//!     .with_seed(42)
//!     .resample(&dataset)?;
//! assert!(rebalanced.n_rows() >= dataset.n_rows());
//! # Ok::<(), imbalreg::ImbalanceError>(())
//! ```

pub mod error;

// Core engine
pub mod dataset;
pub mod histogram;
pub mod noise;
pub mod relevance;
pub mod segment;

// Strategies
pub mod resample;
pub mod split;

pub use dataset::{Column, Dataset, RowId, Value};
pub use error::{ImbalanceError, Result};
pub use relevance::{RelevanceProfile, RelevanceSpec};
pub use resample::{GaussianNoise, Gnhf, RandomOversampler, RandomUndersampler, Resampler, Wercs};
pub use segment::{Segmenter, Segments};
pub use split::StratifiedSplitter;

/// Re-export commonly used types
pub mod prelude {
    pub use crate::dataset::{Column, Dataset, RowId, Value};
    pub use crate::error::{ImbalanceError, Result};
    pub use crate::histogram::Histogram;
    pub use crate::noise::NoiseSynthesizer;
    pub use crate::relevance::{RelevanceProfile, RelevanceSpec};
    pub use crate::resample::{
        GaussianNoise, Gnhf, RandomOversampler, RandomUndersampler, Resampler, Wercs,
    };
    pub use crate::segment::{Segmenter, Segments};
    pub use crate::split::StratifiedSplitter;
}
