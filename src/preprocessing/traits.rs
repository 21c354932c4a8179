//! Core traits for preprocessing transformers.
//!
//! - [`Transformer`]: the configurable, unfitted state; learns from data.
//! - [`FittedTransformer`]: the learned state; transforms new data and can be
//!   persisted through its parameter struct.

use crate::preprocessing::error::PreprocessingError;
use crate::serialization::SerializableParams;

/// Trait for unfitted transformers with hyperparameters.
///
/// # Example
/// ```ignore
/// use nutriml::preprocessing::{SimpleImputer, Transformer};
///
/// let imputer = SimpleImputer::new();
/// let fitted = imputer.fit(&data)?;
/// let filled = fitted.transform(&data)?;
/// ```
pub trait Transformer: Clone {
    /// Input data type for transformation.
    type Input: ?Sized;
    /// Output data type after transformation.
    type Output;
    /// Serializable representation of learned parameters.
    type Params: SerializableParams;
    /// The fitted transformer type ready for inference.
    type Fitted: FittedTransformer<Params = Self::Params, Input = Self::Input, Output = Self::Output>;

    /// Fit the transformer to the training data.
    ///
    /// # Errors
    /// Returns [`PreprocessingError`] if the data is empty, is missing a
    /// required column, or has a shape the transformer cannot handle.
    fn fit(&self, data: &Self::Input) -> Result<Self::Fitted, PreprocessingError>;

    /// Fit the transformer and transform the data in one step.
    fn fit_transform(&self, data: &Self::Input) -> Result<Self::Output, PreprocessingError> {
        let fitted = self.fit(data)?;
        fitted.transform(data)
    }
}

/// Trait for fitted transformers ready for inference.
///
/// # Guarantees
/// `extract_params()` followed by `from_params()` rebuilds an equivalent
/// transformer. The parameters are persisted inside the model artifact.
pub trait FittedTransformer: Clone {
    /// Input data type for transformation.
    type Input: ?Sized;
    /// Output data type after transformation.
    type Output;
    /// Serializable representation of learned parameters.
    type Params: SerializableParams;

    /// Transform data using learned parameters.
    fn transform(&self, data: &Self::Input) -> Result<Self::Output, PreprocessingError>;

    /// Extract learned parameters as a serializable representation.
    fn extract_params(&self) -> Self::Params;

    /// Reconstruct a fitted transformer from parameters.
    fn from_params(params: Self::Params) -> Result<Self, PreprocessingError>
    where
        Self: Sized;

    /// Returns the number of features seen during fit.
    fn n_features_in(&self) -> usize;
}
