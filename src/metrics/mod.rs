//! Evaluation metrics for classifiers.

mod report;

pub use report::{ClassMetrics, ClassificationReport};

use crate::dataset::InMemoryDataset;
use crate::model::InferenceModel;
use serde::{Deserialize, Serialize};

/// Fraction of positions where `y_true` and `y_pred` agree; 0 for empty input.
pub fn accuracy(y_true: &[usize], y_pred: &[usize]) -> f64 {
    if y_true.is_empty() {
        return 0.0;
    }
    let correct = y_true.iter().zip(y_pred).filter(|(t, p)| t == p).count();
    correct as f64 / y_true.len() as f64
}

/// Score of one model on a held-out partition.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Evaluation {
    pub accuracy: f64,
    pub report: ClassificationReport,
}

/// Predict `test` with `model` and score the predictions.
pub fn evaluate<M: InferenceModel>(model: &M, test: &InMemoryDataset, labels: &[String]) -> Evaluation {
    let y_pred = model.predict_batch(test.x());
    Evaluation {
        accuracy: accuracy(test.y(), &y_pred),
        report: ClassificationReport::new(test.y(), &y_pred, labels),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Classifier, RandomForest, RandomForestParams};
    use ndarray::Array2;

    /// Two features, class 1 above 0.5 on the first, every 7th label flipped.
    fn noisy_dataset(n: usize, offset: usize) -> InMemoryDataset {
        let mut x = Array2::zeros((n, 2));
        let mut y = Vec::with_capacity(n);
        for i in 0..n {
            let k = i + offset;
            x[[i, 0]] = (k % 10) as f64 / 10.0;
            x[[i, 1]] = ((k * 7) % 13) as f64;
            let label = usize::from(k % 10 >= 5);
            y.push(if k % 7 == 0 { 1 - label } else { label });
        }
        InMemoryDataset::new(x, y).unwrap()
    }

    #[test]
    fn test_accuracy() {
        assert!((accuracy(&[0, 1, 1, 0], &[0, 1, 0, 0]) - 0.75).abs() < 1e-12);
        assert_eq!(accuracy(&[], &[]), 0.0);
    }

    #[test]
    fn test_accuracy_invariant_to_row_order() {
        let y_true = vec![0, 1, 1, 0, 2, 2, 1];
        let y_pred = vec![0, 1, 0, 0, 2, 1, 1];
        let order = [6, 2, 4, 0, 5, 1, 3];
        let shuffled_true: Vec<usize> = order.iter().map(|&i| y_true[i]).collect();
        let shuffled_pred: Vec<usize> = order.iter().map(|&i| y_pred[i]).collect();
        assert_eq!(accuracy(&y_true, &y_pred), accuracy(&shuffled_true, &shuffled_pred));
    }

    #[test]
    fn test_evaluate_forest_invariant_to_test_row_order() {
        let train = noisy_dataset(60, 0);
        let test = noisy_dataset(21, 60);
        let model = RandomForest::new(
            RandomForestParams::default()
                .with_n_estimators(15)
                .with_seed(11),
        )
        .fit(&train, 2)
        .unwrap();
        let labels = vec!["nem sempre".to_string(), "sempre".to_string()];

        let n = test.n_samples();
        let order: Vec<usize> = (0..n)
            .rev()
            .step_by(2)
            .chain((0..n).rev().skip(1).step_by(2))
            .collect();
        let permuted = test.select(&order);
        assert_ne!(permuted.y(), test.y());

        let original = evaluate(&model, &test, &labels);
        let shuffled = evaluate(&model, &permuted, &labels);
        assert_eq!(original, shuffled);
    }
}
