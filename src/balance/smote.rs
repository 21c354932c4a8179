//! SMOTE oversampling.
//!
//! Every class smaller than the majority is grown to the majority count with
//! synthetic rows `x + u * (neighbour - x)`, where `x` is a random member of
//! the class, `neighbour` one of its `k` nearest same-class neighbours
//! (Euclidean) and `u` is uniform in `[0, 1)`.

use crate::dataset::InMemoryDataset;
use crate::preprocessing::PreprocessingError;
use log::info;
use ndarray::{Array2, ArrayView1, Axis};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

#[derive(Clone, Debug, PartialEq)]
pub struct Smote {
    k_neighbors: usize,
    seed: u64,
}

impl Default for Smote {
    fn default() -> Self {
        Self {
            k_neighbors: 5,
            seed: 42,
        }
    }
}

fn squared_distance(a: ArrayView1<f64>, b: ArrayView1<f64>) -> f64 {
    a.iter().zip(b.iter()).map(|(u, v)| (u - v) * (u - v)).sum()
}

/// For each row of `points`, the indices of its `k` nearest other rows.
/// Equal distances are broken by row index.
fn nearest_neighbors(points: &Array2<f64>, k: usize) -> Vec<Vec<usize>> {
    let n = points.nrows();
    (0..n)
        .map(|i| {
            let mut others: Vec<(f64, usize)> = (0..n)
                .filter(|&j| j != i)
                .map(|j| (squared_distance(points.row(i), points.row(j)), j))
                .collect();
            others.sort_by(|a, b| a.0.total_cmp(&b.0).then(a.1.cmp(&b.1)));
            others.into_iter().take(k).map(|(_, j)| j).collect()
        })
        .collect()
}

impl Smote {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_k_neighbors(mut self, k_neighbors: usize) -> Self {
        self.k_neighbors = k_neighbors;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn k_neighbors(&self) -> usize {
        self.k_neighbors
    }

    /// Oversample `data` so every present class has the majority count.
    /// Original rows come first, synthetic rows follow class by class.
    ///
    /// # Errors
    /// - `MissingValues` when the features contain NaN;
    /// - `InvalidParameter` when `k_neighbors` is 0 or only one class is present;
    /// - `InsufficientSamples` when a class to oversample has `k_neighbors`
    ///   or fewer members.
    pub fn fit_resample(
        &self,
        data: &InMemoryDataset,
        n_classes: usize,
    ) -> Result<InMemoryDataset, PreprocessingError> {
        if self.k_neighbors == 0 {
            return Err(PreprocessingError::InvalidParameter(
                "k_neighbors must be at least 1".to_string(),
            ));
        }
        if data.has_missing() {
            return Err(PreprocessingError::MissingValues(
                "SMOTE requires imputed features".to_string(),
            ));
        }

        let counts = data.class_counts(n_classes);
        let present = counts.iter().filter(|&&c| c > 0).count();
        if present < 2 {
            return Err(PreprocessingError::InvalidParameter(format!(
                "SMOTE needs at least 2 classes, found {}",
                present
            )));
        }
        let majority = counts.iter().copied().max().unwrap_or(0);

        for (class, &count) in counts.iter().enumerate() {
            if count > 0 && count < majority && count <= self.k_neighbors {
                return Err(PreprocessingError::InsufficientSamples {
                    class,
                    count,
                    required: self.k_neighbors + 1,
                    operation: "SMOTE oversampling",
                });
            }
        }

        let mut rng = StdRng::seed_from_u64(self.seed);
        let n_features = data.n_features();
        let mut synthetic: Vec<f64> = Vec::new();
        let mut synthetic_y: Vec<usize> = Vec::new();

        for (class, &count) in counts.iter().enumerate() {
            if count == 0 || count == majority {
                continue;
            }
            let members: Vec<usize> = data
                .y()
                .iter()
                .enumerate()
                .filter(|&(_, &label)| label == class)
                .map(|(i, _)| i)
                .collect();
            let points = data.x().select(Axis(0), &members);
            let neighbors = nearest_neighbors(&points, self.k_neighbors);

            let n_new = majority - count;
            for _ in 0..n_new {
                let i = rng.gen_range(0..count);
                let nn = neighbors[i][rng.gen_range(0..neighbors[i].len())];
                let step: f64 = rng.gen();
                let (base, other) = (points.row(i), points.row(nn));
                synthetic.extend(base.iter().zip(other.iter()).map(|(b, o)| b + step * (o - b)));
                synthetic_y.push(class);
            }
            info!(
                "SMOTE: class {} grown from {} to {} samples",
                class, count, majority
            );
        }

        if synthetic_y.is_empty() {
            return Ok(data.clone());
        }
        let extra = Array2::from_shape_vec((synthetic_y.len(), n_features), synthetic).map_err(
            |e| PreprocessingError::InvalidShape {
                expected: format!("{} columns", n_features),
                got: e.to_string(),
            },
        )?;
        data.concat(&InMemoryDataset::new(extra, synthetic_y)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    fn imbalanced() -> InMemoryDataset {
        let mut rows = Vec::new();
        let mut y = Vec::new();
        for i in 0..20 {
            rows.extend_from_slice(&[i as f64, 0.0]);
            y.push(0);
        }
        for i in 0..8 {
            rows.extend_from_slice(&[100.0 + i as f64, 10.0 + i as f64]);
            y.push(1);
        }
        InMemoryDataset::new(Array2::from_shape_vec((28, 2), rows).unwrap(), y).unwrap()
    }

    #[test]
    fn test_classes_have_equal_counts_after_resampling() {
        let data = imbalanced();
        let balanced = Smote::new().fit_resample(&data, 2).unwrap();
        assert_eq!(balanced.class_counts(2), vec![20, 20]);
        // originals first
        assert_eq!(balanced.select(&(0..28).collect::<Vec<_>>()), data);
    }

    #[test]
    fn test_synthetic_rows_lie_within_minority_hull() {
        let balanced = Smote::new().fit_resample(&imbalanced(), 2).unwrap();
        for i in 28..40 {
            let row = balanced.x().row(i);
            assert_eq!(balanced.y()[i], 1);
            assert!(row[0] >= 100.0 && row[0] <= 107.0);
            assert!(row[1] >= 10.0 && row[1] <= 17.0);
        }
    }

    #[test]
    fn test_deterministic_for_seed() {
        let a = Smote::new().with_seed(7).fit_resample(&imbalanced(), 2).unwrap();
        let b = Smote::new().with_seed(7).fit_resample(&imbalanced(), 2).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_too_few_minority_samples_is_fatal() {
        let data = InMemoryDataset::new(
            array![[0.0], [1.0], [2.0], [3.0], [4.0], [5.0], [6.0], [10.0], [11.0]],
            vec![0, 0, 0, 0, 0, 0, 0, 1, 1],
        )
        .unwrap();
        match Smote::new().fit_resample(&data, 2) {
            Err(PreprocessingError::InsufficientSamples {
                class, count, required, ..
            }) => {
                assert_eq!((class, count, required), (1, 2, 6));
            }
            other => panic!("expected InsufficientSamples, got {:?}", other),
        }
        // a smaller k is accepted
        let balanced = Smote::new().with_k_neighbors(1).fit_resample(&data, 2).unwrap();
        assert_eq!(balanced.class_counts(2), vec![7, 7]);
    }

    #[test]
    fn test_single_class_and_nan_rejected() {
        let single = InMemoryDataset::new(array![[0.0], [1.0]], vec![0, 0]).unwrap();
        assert!(matches!(
            Smote::new().fit_resample(&single, 2),
            Err(PreprocessingError::InvalidParameter(_))
        ));
        let nan = InMemoryDataset::new(array![[f64::NAN], [1.0]], vec![0, 1]).unwrap();
        assert!(matches!(
            Smote::new().fit_resample(&nan, 2),
            Err(PreprocessingError::MissingValues(_))
        ));
    }

    #[test]
    fn test_already_balanced_is_unchanged() {
        let data = InMemoryDataset::new(array![[0.0], [1.0]], vec![0, 1]).unwrap();
        assert_eq!(Smote::new().fit_resample(&data, 2).unwrap(), data);
    }
}
