//! Simple Imputer.
//!
//! Fills missing values (NaN) in a numeric matrix with the column mean
//! learned at fit time.
//!
//! # Example
//! ```ignore
//! use nutriml::preprocessing::{SimpleImputer, Transformer};
//!
//! let fitted = SimpleImputer::new().fit(&data)?;
//! let imputed = fitted.transform(&data)?;
//! ```

use crate::preprocessing::error::PreprocessingError;
use crate::preprocessing::traits::{FittedTransformer, Transformer};
use ndarray::{Array2, ArrayView1, Axis};
use serde::{Deserialize, Serialize};

/// Serializable parameters for a fitted SimpleImputer.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SimpleImputerParams {
    /// Fill value (column mean) for each feature.
    pub statistics_: Vec<f64>,
}

/// Mean imputer (unfitted).
#[derive(Clone, Debug, Default)]
pub struct SimpleImputer;

impl SimpleImputer {
    pub fn new() -> Self {
        Self
    }
}

/// Mean of the non-NaN values, `None` when every value is missing.
fn column_mean(column: ArrayView1<f64>) -> Option<f64> {
    let (sum, count) = column
        .iter()
        .filter(|v| !v.is_nan())
        .fold((0.0, 0usize), |(s, c), v| (s + v, c + 1));
    (count > 0).then(|| sum / count as f64)
}

impl Transformer for SimpleImputer {
    type Input = Array2<f64>;
    type Output = Array2<f64>;
    type Params = SimpleImputerParams;
    type Fitted = FittedSimpleImputer;

    fn fit(&self, data: &Self::Input) -> Result<Self::Fitted, PreprocessingError> {
        if data.nrows() == 0 {
            return Err(PreprocessingError::EmptyData(
                "Cannot fit SimpleImputer on empty data".to_string(),
            ));
        }

        // All-missing columns fall back to 0.0
        let statistics_ = data
            .axis_iter(Axis(1))
            .map(|col| column_mean(col).unwrap_or(0.0))
            .collect();

        Ok(FittedSimpleImputer { statistics_ })
    }
}

/// Fitted SimpleImputer ready for inference.
#[derive(Clone, Debug)]
pub struct FittedSimpleImputer {
    statistics_: Vec<f64>,
}

impl FittedSimpleImputer {
    /// Get the imputation statistics (fill values) for each feature.
    pub fn statistics(&self) -> &[f64] {
        &self.statistics_
    }
}

impl FittedTransformer for FittedSimpleImputer {
    type Input = Array2<f64>;
    type Output = Array2<f64>;
    type Params = SimpleImputerParams;

    fn transform(&self, data: &Self::Input) -> Result<Self::Output, PreprocessingError> {
        if data.ncols() != self.statistics_.len() {
            return Err(PreprocessingError::FeatureMismatch {
                expected_features: self.statistics_.len(),
                got_features: data.ncols(),
            });
        }

        let mut result = data.clone();
        for (mut col, &fill) in result.axis_iter_mut(Axis(1)).zip(&self.statistics_) {
            col.mapv_inplace(|v| if v.is_nan() { fill } else { v });
        }
        Ok(result)
    }

    fn extract_params(&self) -> Self::Params {
        SimpleImputerParams {
            statistics_: self.statistics_.clone(),
        }
    }

    fn from_params(params: Self::Params) -> Result<Self, PreprocessingError> {
        if params.statistics_.iter().any(|v| !v.is_finite()) {
            return Err(PreprocessingError::NumericalError(
                "imputer statistics must be finite".to_string(),
            ));
        }
        Ok(Self {
            statistics_: params.statistics_,
        })
    }

    fn n_features_in(&self) -> usize {
        self.statistics_.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    fn create_test_data_with_missing() -> Array2<f64> {
        array![[1.0, f64::NAN], [3.0, 4.0], [5.0, 6.0]]
    }

    #[test]
    fn test_simple_imputer_mean() {
        let data = create_test_data_with_missing();
        let fitted = SimpleImputer::new().fit(&data).unwrap();

        let stats = fitted.statistics();
        assert!((stats[0] - 3.0).abs() < 1e-9);
        assert!((stats[1] - 5.0).abs() < 1e-9);

        let imputed = fitted.transform(&data).unwrap();
        assert!((imputed[[0, 1]] - 5.0).abs() < 1e-9);
        assert!((imputed[[1, 1]] - 4.0).abs() < 1e-9);
        assert!(imputed.iter().all(|v| !v.is_nan()));
    }

    #[test]
    fn test_simple_imputer_all_missing_column_uses_zero() {
        let data = array![[f64::NAN, 1.0], [f64::NAN, 2.0]];
        let fitted = SimpleImputer::new().fit(&data).unwrap();
        assert_eq!(fitted.statistics()[0], 0.0);
    }

    #[test]
    fn test_simple_imputer_feature_mismatch() {
        let data = create_test_data_with_missing();
        let fitted = SimpleImputer::new().fit(&data).unwrap();

        let wrong_data = array![[1.0, 2.0, 3.0]];
        let result = fitted.transform(&wrong_data);
        assert!(matches!(
            result,
            Err(PreprocessingError::FeatureMismatch {
                expected_features: 2,
                got_features: 3
            })
        ));
    }

    #[test]
    fn test_simple_imputer_empty_data() {
        let data = Array2::<f64>::zeros((0, 2));
        assert!(SimpleImputer::new().fit(&data).is_err());
    }

    #[test]
    fn test_params_roundtrip_rejects_non_finite() {
        let data = create_test_data_with_missing();
        let fitted = SimpleImputer::new().fit(&data).unwrap();

        let rebuilt = FittedSimpleImputer::from_params(fitted.extract_params()).unwrap();
        assert_eq!(rebuilt.transform(&data).unwrap(), fitted.transform(&data).unwrap());

        let bad = SimpleImputerParams {
            statistics_: vec![f64::NAN, 1.0],
        };
        assert!(matches!(
            FittedSimpleImputer::from_params(bad),
            Err(PreprocessingError::NumericalError(_))
        ));
    }
}
