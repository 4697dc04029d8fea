//! In-memory columnar dataset
//!
//! A small ordered table with a designated numeric target column. Provides
//! exactly the capabilities the resamplers need: row selection by stable
//! identifier, uniform and weighted random sampling, same-schema
//! concatenation, and per-column descriptive statistics.
//!
//! Row identity survives sorting, grouping, and reconstitution: every row
//! carries a [`RowId`] that is either its original ingestion position or a
//! synthetic id (prefix + running counter + base id) that can never collide
//! with an original one.

use crate::error::{ImbalanceError, Result};
use ndarray::Array1;
use rand::distributions::{Distribution, WeightedIndex};
use rand::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::fmt;

/// A single cell value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Value {
    Float(f64),
    Int(i64),
    Str(String),
    Bool(bool),
    /// Missing cell. Rejected at ingestion; only exists so callers can
    /// represent incomplete data long enough for validation to name it.
    Null,
}

impl Value {
    /// True for `Null` and for `Float(NaN)`.
    pub fn is_missing(&self) -> bool {
        match self {
            Value::Null => true,
            Value::Float(f) => f.is_nan(),
            _ => false,
        }
    }

    /// Numeric view of the value, if it has one.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Float(f) => Some(*f),
            Value::Int(i) => Some(*i as f64),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Float(v) => write!(f, "{v}"),
            Value::Int(v) => write!(f, "{v}"),
            Value::Str(v) => write!(f, "{v}"),
            Value::Bool(v) => write!(f, "{v}"),
            Value::Null => write!(f, "null"),
        }
    }
}

/// Stable row identifier.
///
/// Original rows are numbered by ingestion position. Synthetic rows
/// (oversampled duplicates, noise-generated rows) carry a strategy prefix,
/// a running counter, and the base id they were derived from, so they are
/// disjoint from every original identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RowId {
    Original(usize),
    Synthetic(String),
}

impl fmt::Display for RowId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RowId::Original(i) => write!(f, "{i}"),
            RowId::Synthetic(s) => write!(f, "{s}"),
        }
    }
}

/// A named column of values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Column {
    pub name: String,
    pub values: Vec<Value>,
}

impl Column {
    pub fn new(name: impl Into<String>, values: Vec<Value>) -> Self {
        Self {
            name: name.into(),
            values,
        }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Count of each distinct value, in first-seen order.
    ///
    /// The deterministic ordering matters: weighted draws over these counts
    /// must be reproducible under a fixed seed.
    pub fn value_counts(&self) -> Vec<(Value, usize)> {
        let mut counts: Vec<(Value, usize)> = Vec::new();
        for value in &self.values {
            match counts.iter_mut().find(|(v, _)| v == value) {
                Some((_, c)) => *c += 1,
                None => counts.push((value.clone(), 1)),
            }
        }
        counts
    }

    /// Number of distinct values.
    pub fn n_unique(&self) -> usize {
        self.value_counts().len()
    }

    fn all_str(&self) -> bool {
        self.values.iter().all(|v| matches!(v, Value::Str(_)))
    }

    fn all_bool(&self) -> bool {
        self.values.iter().all(|v| matches!(v, Value::Bool(_)))
    }

    fn all_int(&self) -> bool {
        self.values.iter().all(|v| matches!(v, Value::Int(_)))
    }
}

/// Ordered table of same-length columns with a designated target column.
///
/// Invariants established at construction: at least one column and one row,
/// unique column names, no missing cells, numeric target, target stored as
/// the last column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dataset {
    columns: Vec<Column>,
    index: Vec<RowId>,
    target: String,
}

impl Dataset {
    /// Build a dataset from columns.
    ///
    /// `target` names the target column; when `None` the last column is
    /// used. The target column is moved to the last position, matching the
    /// layout every downstream component assumes.
    pub fn new(mut columns: Vec<Column>, target: Option<&str>) -> Result<Self> {
        if columns.is_empty() {
            return Err(ImbalanceError::TypeMismatch(
                "dataset must have at least one column".to_string(),
            ));
        }

        let n_rows = columns[0].len();
        for col in &columns {
            if col.len() != n_rows {
                return Err(ImbalanceError::TypeMismatch(format!(
                    "column '{}' has {} rows, expected {}",
                    col.name,
                    col.len(),
                    n_rows
                )));
            }
        }
        if n_rows == 0 {
            return Err(ImbalanceError::DataQuality(
                "dataset has no rows".to_string(),
            ));
        }

        let mut seen = HashSet::new();
        for col in &columns {
            if !seen.insert(col.name.clone()) {
                return Err(ImbalanceError::TypeMismatch(format!(
                    "duplicate column name '{}'",
                    col.name
                )));
            }
        }

        let target = match target {
            Some(name) => {
                if !columns.iter().any(|c| c.name == name) {
                    return Err(ImbalanceError::ColumnNotFound(name.to_string()));
                }
                name.to_string()
            }
            None => columns[columns.len() - 1].name.clone(),
        };

        for col in &columns {
            if col.values.iter().any(Value::is_missing) {
                return Err(ImbalanceError::DataQuality(format!(
                    "column '{}' contains missing values; remove them before resampling",
                    col.name
                )));
            }
            // Infinite floats would poison every downstream statistic and
            // produce infinite-width histogram buckets.
            if col
                .values
                .iter()
                .any(|v| matches!(v, Value::Float(f) if f.is_infinite()))
            {
                return Err(ImbalanceError::DataQuality(format!(
                    "column '{}' contains non-finite values; remove them before resampling",
                    col.name
                )));
            }
        }

        // Rearrange so the target is the last column.
        if columns[columns.len() - 1].name != target {
            let pos = columns
                .iter()
                .position(|c| c.name == target)
                .expect("target presence checked above");
            let target_col = columns.remove(pos);
            columns.push(target_col);
        }

        let target_col = &columns[columns.len() - 1];
        if !target_col.values.iter().all(|v| v.as_f64().is_some()) {
            return Err(ImbalanceError::TypeMismatch(format!(
                "target column '{target}' must be numeric"
            )));
        }

        let index = (0..n_rows).map(RowId::Original).collect();
        Ok(Self {
            columns,
            index,
            target,
        })
    }

    pub fn n_rows(&self) -> usize {
        self.index.len()
    }

    pub fn n_columns(&self) -> usize {
        self.columns.len()
    }

    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.name.as_str()).collect()
    }

    pub fn target_name(&self) -> &str {
        &self.target
    }

    pub fn index(&self) -> &[RowId] {
        &self.index
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    /// Column by label.
    pub fn column(&self, name: &str) -> Result<&Column> {
        self.columns
            .iter()
            .find(|c| c.name == name)
            .ok_or_else(|| ImbalanceError::ColumnNotFound(name.to_string()))
    }

    /// Column values as a numeric vector.
    pub fn numeric_column(&self, name: &str) -> Result<Array1<f64>> {
        let col = self.column(name)?;
        let values: Option<Vec<f64>> = col.values.iter().map(Value::as_f64).collect();
        values
            .map(Array1::from_vec)
            .ok_or_else(|| {
                ImbalanceError::TypeMismatch(format!("column '{name}' is not numeric"))
            })
    }

    /// Target column as a numeric vector.
    pub fn target_values(&self) -> Result<Array1<f64>> {
        let target = self.target.clone();
        self.numeric_column(&target)
    }

    /// Rows at the given positions, in the given order.
    pub(crate) fn select_positions(&self, positions: &[usize]) -> Dataset {
        let columns = self
            .columns
            .iter()
            .map(|col| Column {
                name: col.name.clone(),
                values: positions.iter().map(|&p| col.values[p].clone()).collect(),
            })
            .collect();
        let index = positions.iter().map(|&p| self.index[p].clone()).collect();
        Dataset {
            columns,
            index,
            target: self.target.clone(),
        }
    }

    /// Rows matching the given identifiers, in the given order.
    pub fn select_by_id(&self, ids: &[RowId]) -> Result<Dataset> {
        let lookup: HashMap<&RowId, usize> = self
            .index
            .iter()
            .enumerate()
            .map(|(pos, id)| (id, pos))
            .collect();
        let mut positions = Vec::with_capacity(ids.len());
        for id in ids {
            let pos = lookup
                .get(id)
                .ok_or_else(|| ImbalanceError::RowNotFound(id.to_string()))?;
            positions.push(*pos);
        }
        Ok(self.select_positions(&positions))
    }

    /// Assemble a dataset from already-validated parts. Internal: callers
    /// are components that derived the parts from an existing dataset.
    pub(crate) fn from_parts(columns: Vec<Column>, index: Vec<RowId>, target: String) -> Dataset {
        Dataset {
            columns,
            index,
            target,
        }
    }

    /// A zero-row dataset with this dataset's schema. Internal: public
    /// construction rejects empty tables, but resampling legitimately
    /// produces empty intermediate parts.
    pub(crate) fn empty_like(&self) -> Dataset {
        Dataset {
            columns: self
                .columns
                .iter()
                .map(|c| Column {
                    name: c.name.clone(),
                    values: Vec::new(),
                })
                .collect(),
            index: Vec::new(),
            target: self.target.clone(),
        }
    }

    /// Uniform sample without replacement. `n` is capped at the row count.
    pub fn sample_n(&self, n: usize, rng: &mut StdRng) -> Dataset {
        let n = n.min(self.n_rows());
        let positions = rand::seq::index::sample(rng, self.n_rows(), n).into_vec();
        self.select_positions(&positions)
    }

    /// Uniform sample with replacement.
    pub fn sample_with_replacement(&self, n: usize, rng: &mut StdRng) -> Dataset {
        let len = self.n_rows();
        let positions: Vec<usize> = (0..n).map(|_| rng.gen_range(0..len)).collect();
        self.select_positions(&positions)
    }

    /// Weighted sample with replacement. Errors when the weights cannot
    /// define a distribution (all zero, negative, or wrong length).
    pub fn sample_weighted(
        &self,
        n: usize,
        weights: &[f64],
        rng: &mut StdRng,
    ) -> Result<Dataset> {
        if weights.len() != self.n_rows() {
            return Err(ImbalanceError::TypeMismatch(format!(
                "got {} weights for {} rows",
                weights.len(),
                self.n_rows()
            )));
        }
        let dist = WeightedIndex::new(weights).map_err(|e| {
            ImbalanceError::DataQuality(format!("weighted sampling is undefined: {e}"))
        })?;
        let positions: Vec<usize> = (0..n).map(|_| dist.sample(rng)).collect();
        Ok(self.select_positions(&positions))
    }

    /// Replace every row id with a fresh synthetic id derived from the
    /// strategy `prefix`, a running `counter`, and the previous id.
    pub(crate) fn reindex_synthetic(&mut self, prefix: &str, counter: &mut usize) {
        for id in &mut self.index {
            let base = id.to_string();
            *id = RowId::Synthetic(format!("{prefix}-{counter}-{base}"));
            *counter += 1;
        }
    }

    /// Concatenate same-schema parts in order. Empty parts are allowed;
    /// the result must end up non-empty.
    pub fn concat(parts: &[Dataset]) -> Result<Dataset> {
        let first = parts.first().ok_or_else(|| {
            ImbalanceError::TypeMismatch("cannot concatenate zero datasets".to_string())
        })?;

        let mut out = first.empty_like();
        for part in parts {
            if part.column_names() != first.column_names() || part.target != first.target {
                return Err(ImbalanceError::TypeMismatch(
                    "cannot concatenate datasets with different schemas".to_string(),
                ));
            }
            for (dst, src) in out.columns.iter_mut().zip(&part.columns) {
                dst.values.extend(src.values.iter().cloned());
            }
            out.index.extend(part.index.iter().cloned());
        }

        if out.n_rows() == 0 {
            return Err(ImbalanceError::DataQuality(
                "concatenation produced an empty dataset".to_string(),
            ));
        }
        Ok(out)
    }

    /// Heuristic categorical-column detection: string and boolean columns
    /// always; integer columns when distinct/total < 0.05.
    ///
    /// Emits an informational warning — inference can misfire on odd
    /// schemas, and callers who know their columns should pass them.
    pub fn infer_categorical_columns(&self) -> Vec<String> {
        tracing::warn!(
            "categorical_columns not supplied; inferring from column contents. \
             Consider passing them explicitly."
        );

        let n_rows = self.n_rows();
        let mut categorical = Vec::new();
        for col in &self.columns {
            if col.all_str() || col.all_bool() {
                categorical.push(col.name.clone());
            } else if col.all_int() && (col.n_unique() as f64) / (n_rows as f64) < 0.05 {
                categorical.push(col.name.clone());
            }
        }
        categorical
    }
}

/// Sample standard deviation (ddof = 1). Zero for fewer than two values.
pub(crate) fn sample_std(values: &Array1<f64>) -> f64 {
    if values.len() < 2 {
        return 0.0;
    }
    values.std(1.0)
}
