//! Segmentation of a tagged dataset into maximal rare/normal runs
//!
//! After a stable sort by target value, contiguous rows with the same
//! rare/normal tag form a bin. Bins are maximal: each ends exactly where
//! the tag flips or the sequence does. Every bin is an ordered list of
//! stable row identifiers, so later selection never depends on positional
//! offsets surviving a sort.

use crate::dataset::{Dataset, RowId};
use crate::error::{ImbalanceError, Result};
use std::cmp::Ordering;

/// Output of segmentation: ordered bins of row identifiers, one collection
/// per classification. Their union is a partition of the dataset's index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segments {
    pub rare: Vec<Vec<RowId>>,
    pub normal: Vec<Vec<RowId>>,
}

impl Segments {
    /// Total number of row identifiers across both collections.
    pub fn total_rows(&self) -> usize {
        self.rare.iter().map(Vec::len).sum::<usize>()
            + self.normal.iter().map(Vec::len).sum::<usize>()
    }
}

/// Partitions a dataset's rows into maximal contiguous same-tag runs.
#[derive(Debug, Clone)]
pub struct Segmenter {
    sort_by_target: bool,
}

impl Segmenter {
    /// Segmenter that sorts by target value first (the normal mode: runs
    /// are maximal under monotonic rarity).
    pub fn new() -> Self {
        Self {
            sort_by_target: true,
        }
    }

    /// Control the pre-sort. With sorting disabled, runs follow the
    /// original row order: bins are a local-alternation artifact of input
    /// order rather than a grouping by target similarity. That is a
    /// caller-controlled trade-off, not an error.
    pub fn with_sort(mut self, sort_by_target: bool) -> Self {
        self.sort_by_target = sort_by_target;
        self
    }

    /// Walk the (optionally sorted) row sequence once, closing a bin each
    /// time the tag changes. `tags[i]` is the rare flag of row position `i`
    /// in the dataset's current order.
    pub fn segment(&self, dataset: &Dataset, tags: &[bool]) -> Result<Segments> {
        let n = dataset.n_rows();
        if tags.len() != n {
            return Err(ImbalanceError::TypeMismatch(format!(
                "got {} tags for {} rows",
                tags.len(),
                n
            )));
        }

        let mut order: Vec<usize> = (0..n).collect();
        if self.sort_by_target {
            let y = dataset.target_values()?;
            // Stable: ties keep their original relative order.
            order.sort_by(|&a, &b| y[a].partial_cmp(&y[b]).unwrap_or(Ordering::Equal));
        }

        let index = dataset.index();
        let mut segments = Segments {
            rare: Vec::new(),
            normal: Vec::new(),
        };

        let mut run_tag = tags[order[0]];
        let mut run: Vec<RowId> = Vec::new();
        for &pos in &order {
            if tags[pos] != run_tag {
                push_run(&mut segments, run_tag, std::mem::take(&mut run));
                run_tag = tags[pos];
            }
            run.push(index[pos].clone());
        }
        push_run(&mut segments, run_tag, run);

        tracing::debug!(
            rare_bins = segments.rare.len(),
            normal_bins = segments.normal.len(),
            "segmented dataset"
        );
        Ok(segments)
    }
}

impl Default for Segmenter {
    fn default() -> Self {
        Self::new()
    }
}

fn push_run(segments: &mut Segments, rare: bool, run: Vec<RowId>) {
    if rare {
        segments.rare.push(run);
    } else {
        segments.normal.push(run);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::{Column, Value};
    use std::collections::HashSet;

    fn dataset_with_targets(targets: &[f64]) -> Dataset {
        Dataset::new(
            vec![Column::new(
                "y",
                targets.iter().map(|&v| Value::Float(v)).collect(),
            )],
            None,
        )
        .unwrap()
    }

    #[test]
    fn test_partition_invariant() {
        let df = dataset_with_targets(&[5.0, 1.0, 9.0, 3.0, 7.0, 2.0]);
        let tags = vec![true, false, true, false, true, false];
        let segments = Segmenter::new().segment(&df, &tags).unwrap();

        let mut seen: HashSet<RowId> = HashSet::new();
        for bin in segments.rare.iter().chain(segments.normal.iter()) {
            for id in bin {
                assert!(seen.insert(id.clone()), "duplicate id {id}");
            }
        }
        assert_eq!(seen.len(), df.n_rows());
        for id in df.index() {
            assert!(seen.contains(id));
        }
    }

    #[test]
    fn test_sorted_runs_are_maximal() {
        // Sorted targets: 1, 2, 3, 10, 11 — tags split at 5.0.
        let df = dataset_with_targets(&[10.0, 1.0, 11.0, 2.0, 3.0]);
        let tags: Vec<bool> = df
            .target_values()
            .unwrap()
            .iter()
            .map(|&y| y > 5.0)
            .collect();
        let segments = Segmenter::new().segment(&df, &tags).unwrap();

        assert_eq!(segments.normal.len(), 1);
        assert_eq!(segments.rare.len(), 1);
        assert_eq!(
            segments.normal[0],
            vec![RowId::Original(1), RowId::Original(3), RowId::Original(4)]
        );
        assert_eq!(
            segments.rare[0],
            vec![RowId::Original(0), RowId::Original(2)]
        );
    }

    #[test]
    fn test_single_row_yields_single_bin() {
        let df = dataset_with_targets(&[4.0]);
        let segments = Segmenter::new().segment(&df, &[true]).unwrap();
        assert_eq!(segments.rare.len(), 1);
        assert!(segments.normal.is_empty());
        assert_eq!(segments.rare[0], vec![RowId::Original(0)]);
    }

    #[test]
    fn test_unsorted_mode_follows_input_order() {
        let df = dataset_with_targets(&[1.0, 9.0, 2.0, 8.0]);
        let tags = vec![false, true, false, true];
        let segments = Segmenter::new().with_sort(false).segment(&df, &tags).unwrap();
        // Alternating tags in input order: four single-row bins.
        assert_eq!(segments.rare.len(), 2);
        assert_eq!(segments.normal.len(), 2);
        assert_eq!(segments.total_rows(), 4);
    }

    #[test]
    fn test_tag_length_mismatch() {
        let df = dataset_with_targets(&[1.0, 2.0]);
        let result = Segmenter::new().segment(&df, &[true]);
        assert!(matches!(result, Err(ImbalanceError::TypeMismatch(_))));
    }
}
