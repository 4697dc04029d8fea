//! Integration test: stratified train/test splitting

use imbalreg::prelude::*;
use std::collections::HashSet;

/// Targets spread across the range with an off-edge step so rows avoid
/// bucket boundaries; the rare tail sits far above the bulk.
fn imbalanced_dataset() -> Dataset {
    let mut targets: Vec<f64> = (0..90).map(|i| 0.11 + (i % 30) as f64 * 0.313).collect();
    targets.extend((0..10).map(|i| 80.17 + i as f64 * 0.71));
    Dataset::new(
        vec![
            Column::new(
                "x",
                (0..targets.len()).map(|i| Value::Float(i as f64)).collect(),
            ),
            Column::new(
                "y",
                targets.iter().map(|&v| Value::Float(v)).collect(),
            ),
        ],
        Some("y"),
    )
    .unwrap()
}

#[test]
fn test_train_and_test_are_disjoint() {
    let df = imbalanced_dataset();
    let (train, test) = StratifiedSplitter::new(0.3)
        .unwrap()
        .with_seed(42)
        .split(&df)
        .unwrap();

    let train_ids: HashSet<&RowId> = train.index().iter().collect();
    let test_ids: HashSet<&RowId> = test.index().iter().collect();
    assert!(train_ids.is_disjoint(&test_ids));
    assert!(train.n_rows() + test.n_rows() <= df.n_rows());
}

#[test]
fn test_rare_tail_is_represented_in_both_partitions() {
    // A naive global split can starve the 10-row tail; stratification
    // must put tail rows on both sides.
    let df = imbalanced_dataset();
    let (train, test) = StratifiedSplitter::new(0.3)
        .unwrap()
        .with_seed(42)
        .split(&df)
        .unwrap();

    let tail_in = |part: &Dataset| {
        part.target_values()
            .unwrap()
            .iter()
            .filter(|&&y| y > 50.0)
            .count()
    };
    assert!(tail_in(&train) > 0, "no tail rows in train");
    assert!(tail_in(&test) > 0, "no tail rows in test");
}

#[test]
fn test_partitions_preserve_schema() {
    let df = imbalanced_dataset();
    let (train, test) = StratifiedSplitter::new(0.25)
        .unwrap()
        .with_seed(3)
        .split(&df)
        .unwrap();
    assert_eq!(train.column_names(), df.column_names());
    assert_eq!(test.column_names(), df.column_names());
    assert_eq!(train.target_name(), "y");
    assert_eq!(test.target_name(), "y");
}

#[test]
fn test_split_then_resample_pipeline() {
    // The splitter and a resampler compose: rebalance the training side
    // only, leaving the held-out test untouched.
    let df = imbalanced_dataset();
    let (train, test) = StratifiedSplitter::new(0.2)
        .unwrap()
        .with_seed(8)
        .split(&df)
        .unwrap();

    let spec = RelevanceSpec::custom(|y| if y > 50.0 { 1.0 } else { 0.0 });
    let rebalanced = RandomOversampler::new(3.0)
        .unwrap()
        .with_relevance(spec)
        .with_threshold(0.5)
        .with_seed(8)
        .resample(&train)
        .unwrap();

    assert!(rebalanced.n_rows() > train.n_rows());
    // Test partition identifiers never appear among the training originals.
    let test_ids: HashSet<&RowId> = test.index().iter().collect();
    for id in rebalanced.index() {
        if matches!(id, RowId::Original(_)) {
            assert!(!test_ids.contains(id));
        }
    }
}
