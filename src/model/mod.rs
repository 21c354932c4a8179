//! Classification models.
//!
//! Models follow the fitted/unfitted type-state pattern: [`Classifier::fit`]
//! consumes training data and returns a different type implementing
//! [`InferenceModel`], so an untrained model cannot be asked to predict.

pub mod forest;
pub mod state;
pub mod tree;

pub use forest::{ForestParams, RandomForest, RandomForestParams};
pub use state::{Fitted, Unfitted};
pub use tree::{DecisionTree, DecisionTreeConfig, MaxFeatures, Node};

use crate::dataset::InMemoryDataset;
use crate::preprocessing::PreprocessingError;
use crate::serialization::SerializableParams;
use ndarray::{Array2, ArrayView1, Axis};

/// An untrained model that can be fitted on labelled data.
pub trait Classifier {
    type Fitted: InferenceModel;

    /// Fit on `data`, whose labels are codes in `0..n_classes`.
    fn fit(&self, data: &InMemoryDataset, n_classes: usize)
        -> Result<Self::Fitted, PreprocessingError>;
}

/// A trained model.
pub trait InferenceModel {
    /// Serializable representation of the fitted state.
    type Params: SerializableParams;

    fn n_classes(&self) -> usize;

    fn n_features_in(&self) -> usize;

    /// Class probabilities for one row.
    fn predict_proba(&self, row: ArrayView1<f64>) -> Vec<f64>;

    /// Most probable class; ties go to the lowest class index.
    fn predict(&self, row: ArrayView1<f64>) -> usize {
        argmax(&self.predict_proba(row))
    }

    fn predict_batch(&self, x: &Array2<f64>) -> Vec<usize> {
        x.axis_iter(Axis(0)).map(|row| self.predict(row)).collect()
    }

    fn predict_proba_batch(&self, x: &Array2<f64>) -> Vec<Vec<f64>> {
        x.axis_iter(Axis(0))
            .map(|row| self.predict_proba(row))
            .collect()
    }

    fn extract_params(&self) -> Self::Params;

    fn from_params(params: Self::Params) -> Result<Self, PreprocessingError>
    where
        Self: Sized;
}

/// Index of the first maximum.
pub fn argmax(values: &[f64]) -> usize {
    let mut best = 0;
    for (i, &v) in values.iter().enumerate() {
        if v > values[best] {
            best = i;
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_argmax_ties_go_to_lowest_index() {
        assert_eq!(argmax(&[0.5, 0.5]), 0);
        assert_eq!(argmax(&[0.2, 0.3, 0.3]), 1);
        assert_eq!(argmax(&[]), 0);
    }
}
