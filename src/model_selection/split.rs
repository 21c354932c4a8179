//! Hold-out train/test split.

use crate::dataset::InMemoryDataset;
use crate::preprocessing::PreprocessingError;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

/// Row indices of a train/test split, each sorted ascending.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SplitIndices {
    pub train: Vec<usize>,
    pub test: Vec<usize>,
}

/// Split `y.len()` rows so the test part holds `ceil(test_size * n)` rows.
///
/// With `stratify`, each class contributes to the test part in proportion to
/// its size; leftover test slots go to the classes with the largest
/// fractional share (lowest class index on ties).
pub fn train_test_split_indices(
    y: &[usize],
    test_size: f64,
    stratify: bool,
    seed: u64,
) -> Result<SplitIndices, PreprocessingError> {
    if !(test_size > 0.0 && test_size < 1.0) {
        return Err(PreprocessingError::InvalidParameter(format!(
            "test_size must be in (0, 1), got {}",
            test_size
        )));
    }
    let n = y.len();
    let n_test = (test_size * n as f64).ceil() as usize;
    if n_test == 0 || n_test >= n {
        return Err(PreprocessingError::InvalidParameter(format!(
            "test_size {} leaves an empty partition for {} samples",
            test_size, n
        )));
    }

    let mut rng = StdRng::seed_from_u64(seed);
    let mut test = Vec::with_capacity(n_test);
    let mut train = Vec::with_capacity(n - n_test);

    if stratify {
        let n_classes = y.iter().copied().max().map_or(0, |m| m + 1);
        let mut members: Vec<Vec<usize>> = vec![Vec::new(); n_classes];
        for (i, &label) in y.iter().enumerate() {
            members[label].push(i);
        }
        for (class, rows) in members.iter().enumerate() {
            if rows.len() == 1 {
                return Err(PreprocessingError::InsufficientSamples {
                    class,
                    count: 1,
                    required: 2,
                    operation: "stratified train/test split",
                });
            }
        }

        let shares: Vec<f64> = members
            .iter()
            .map(|rows| rows.len() as f64 * n_test as f64 / n as f64)
            .collect();
        let mut allocation: Vec<usize> = shares.iter().map(|s| s.floor() as usize).collect();
        let mut remaining = n_test - allocation.iter().sum::<usize>();
        let mut by_fraction: Vec<usize> = (0..n_classes).collect();
        by_fraction.sort_by(|&a, &b| {
            let fa = shares[a] - shares[a].floor();
            let fb = shares[b] - shares[b].floor();
            fb.total_cmp(&fa).then(a.cmp(&b))
        });
        for class in by_fraction.into_iter().cycle() {
            if remaining == 0 {
                break;
            }
            if allocation[class] < members[class].len() {
                allocation[class] += 1;
                remaining -= 1;
            }
        }

        for (rows, take) in members.iter_mut().zip(allocation) {
            rows.shuffle(&mut rng);
            test.extend_from_slice(&rows[..take]);
            train.extend_from_slice(&rows[take..]);
        }
    } else {
        let mut rows: Vec<usize> = (0..n).collect();
        rows.shuffle(&mut rng);
        test.extend_from_slice(&rows[..n_test]);
        train.extend_from_slice(&rows[n_test..]);
    }

    // a class present in y must keep at least one training row
    let n_classes = y.iter().copied().max().map_or(0, |m| m + 1);
    let mut train_counts = vec![0usize; n_classes];
    for &i in &train {
        train_counts[y[i]] += 1;
    }
    let mut totals = vec![0usize; n_classes];
    for &label in y {
        totals[label] += 1;
    }
    if let Some(class) = (0..n_classes).find(|&c| totals[c] > 0 && train_counts[c] == 0) {
        return Err(PreprocessingError::InsufficientSamples {
            class,
            count: 0,
            required: 1,
            operation: "training partition of the train/test split",
        });
    }

    train.sort_unstable();
    test.sort_unstable();
    Ok(SplitIndices { train, test })
}

/// Split a dataset into `(train, test)`.
pub fn train_test_split(
    data: &InMemoryDataset,
    test_size: f64,
    stratify: bool,
    seed: u64,
) -> Result<(InMemoryDataset, InMemoryDataset), PreprocessingError> {
    let split = train_test_split_indices(data.y(), test_size, stratify, seed)?;
    Ok((data.select(&split.train), data.select(&split.test)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_test_size_rounds_up() {
        let y = vec![0; 10];
        let split = train_test_split_indices(&y, 0.25, false, 0).unwrap();
        assert_eq!(split.test.len(), 3);
        assert_eq!(split.train.len(), 7);
    }

    #[test]
    fn test_stratified_preserves_proportions() {
        let mut y = vec![0; 90];
        y.extend(vec![1; 10]);
        let split = train_test_split_indices(&y, 0.2, true, 42).unwrap();
        let test_minority = split.test.iter().filter(|&&i| y[i] == 1).count();
        assert_eq!(split.test.len(), 20);
        assert_eq!(test_minority, 2);
    }

    #[test]
    fn test_partitions_are_disjoint_and_complete() {
        let y: Vec<usize> = (0..50).map(|i| i % 3).collect();
        let split = train_test_split_indices(&y, 0.3, true, 1).unwrap();
        let mut all: Vec<usize> = split.train.iter().chain(&split.test).copied().collect();
        all.sort_unstable();
        assert_eq!(all, (0..50).collect::<Vec<_>>());
    }

    #[test]
    fn test_deterministic_for_seed() {
        let y: Vec<usize> = (0..40).map(|i| i % 2).collect();
        assert_eq!(
            train_test_split_indices(&y, 0.2, true, 9).unwrap(),
            train_test_split_indices(&y, 0.2, true, 9).unwrap()
        );
    }

    #[test]
    fn test_stratified_split_keeps_every_class_in_train() {
        // 3 test slots over two classes of 2: the tie gives class 0 both rows
        let y = vec![0, 0, 1, 1];
        let result = train_test_split_indices(&y, 0.6, true, 0);
        assert!(matches!(
            result,
            Err(PreprocessingError::InsufficientSamples { class: 0, count: 0, .. })
        ));
    }

    #[test]
    fn test_shuffled_split_never_drops_a_class_from_train() {
        let y = vec![0, 1, 1, 1];
        let mut rejected = 0;
        for seed in 0..50 {
            match train_test_split_indices(&y, 0.5, false, seed) {
                Ok(split) => assert!(split.train.contains(&0)),
                Err(PreprocessingError::InsufficientSamples { class, .. }) => {
                    assert_eq!(class, 0);
                    rejected += 1;
                }
                Err(other) => panic!("unexpected error {:?}", other),
            }
        }
        assert!(rejected > 0);
    }

    #[test]
    fn test_invalid_sizes() {
        let y = vec![0, 1, 0, 1];
        assert!(train_test_split_indices(&y, 0.0, true, 0).is_err());
        assert!(train_test_split_indices(&y, 1.0, true, 0).is_err());
        assert!(train_test_split_indices(&[0, 0, 1], 0.3, true, 0).is_err());
    }
}
