//! Feature preprocessor for recoded survey frames.
//!
//! Turns a [`Frame`] into a dense `Array2<f64>` without missing values:
//! categorical columns are filled with their mode and label-encoded, then
//! numeric gaps are filled with the column mean.

use crate::dataset::{Column, Frame};
use crate::preprocessing::encoding::{FittedLabelEncoder, HandleUnknown, LabelEncoder, LabelEncoderParams};
use crate::preprocessing::error::PreprocessingError;
use crate::preprocessing::imputation::{FittedSimpleImputer, SimpleImputer, SimpleImputerParams};
use crate::preprocessing::traits::{FittedTransformer, Transformer};
use log::debug;
use ndarray::Array2;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Fill value for a categorical column that has no values at all.
const EMPTY_CATEGORY: &str = "";

/// Unfitted preprocessor.
#[derive(Clone, Debug)]
pub struct Preprocessor {
    target_column: String,
    exclude: Vec<String>,
    handle_unknown: HandleUnknown,
}

impl Preprocessor {
    /// Preprocessor that treats every column except `target_column` as a feature.
    pub fn new(target_column: impl Into<String>) -> Self {
        Self {
            target_column: target_column.into(),
            exclude: Vec::new(),
            handle_unknown: HandleUnknown::default(),
        }
    }

    /// Columns (identifiers, dates) left out of the feature matrix.
    pub fn with_exclude(mut self, exclude: Vec<String>) -> Self {
        self.exclude = exclude;
        self
    }

    pub fn with_handle_unknown(mut self, handle_unknown: HandleUnknown) -> Self {
        self.handle_unknown = handle_unknown;
        self
    }

    fn is_feature(&self, name: &str) -> bool {
        name != self.target_column && !self.exclude.iter().any(|e| e == name)
    }
}

/// Per-feature learned state.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub enum FeatureParams {
    Numeric,
    Categorical {
        fill: String,
        encoder: LabelEncoderParams,
    },
}

/// Serializable parameters for a fitted [`Preprocessor`].
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PreprocessorParams {
    pub target_column: String,
    pub exclude: Vec<String>,
    pub feature_names: Vec<String>,
    pub features: Vec<FeatureParams>,
    pub imputer: SimpleImputerParams,
}

/// Mode of the present values; ties go to the lexicographically smallest.
fn categorical_mode(values: &[Option<String>]) -> Option<String> {
    let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
    for v in values.iter().flatten() {
        *counts.entry(v.as_str()).or_insert(0) += 1;
    }
    let mut best: Option<(&str, usize)> = None;
    for (value, count) in counts {
        if best.map_or(true, |(_, c)| count > c) {
            best = Some((value, count));
        }
    }
    best.map(|(v, _)| v.to_string())
}

fn fill_categorical(values: &[Option<String>], fill: &str) -> Vec<Option<String>> {
    values
        .iter()
        .map(|v| Some(v.clone().unwrap_or_else(|| fill.to_string())))
        .collect()
}

impl Transformer for Preprocessor {
    type Input = Frame;
    type Output = Array2<f64>;
    type Params = PreprocessorParams;
    type Fitted = FittedPreprocessor;

    fn fit(&self, data: &Frame) -> Result<FittedPreprocessor, PreprocessingError> {
        if data.column(&self.target_column).is_none() {
            return Err(PreprocessingError::MissingColumn(self.target_column.clone()));
        }
        if data.n_rows() == 0 {
            return Err(PreprocessingError::EmptyData(
                "Cannot fit Preprocessor on a frame without rows".to_string(),
            ));
        }

        let mut feature_names = Vec::new();
        let mut features = Vec::new();
        let mut encoders = Vec::new();
        for (name, column) in data.iter().filter(|(name, _)| self.is_feature(name)) {
            match column {
                Column::Numeric(_) => {
                    features.push(FeatureParams::Numeric);
                    encoders.push(None);
                }
                Column::Categorical(values) => {
                    let fill = categorical_mode(values).unwrap_or_else(|| EMPTY_CATEGORY.to_string());
                    let encoder = LabelEncoder::new(name)
                        .with_handle_unknown(self.handle_unknown)
                        .fit(&fill_categorical(values, &fill))?;
                    debug!("Encoded '{}' with {} categories", name, encoder.n_classes());
                    features.push(FeatureParams::Categorical {
                        fill,
                        encoder: encoder.extract_params(),
                    });
                    encoders.push(Some(encoder));
                }
            }
            feature_names.push(name.to_string());
        }

        if feature_names.is_empty() {
            return Err(PreprocessingError::EmptyData(
                "No feature columns left after removing target and identifiers".to_string(),
            ));
        }

        let raw = encode_frame(data, &feature_names, &features, &encoders)?;
        let imputer = SimpleImputer::new().fit(&raw)?;

        Ok(FittedPreprocessor {
            params: PreprocessorParams {
                target_column: self.target_column.clone(),
                exclude: self.exclude.clone(),
                feature_names,
                features,
                imputer: imputer.extract_params(),
            },
            encoders,
            imputer,
        })
    }
}

/// Lay out features column by column; numeric gaps stay NaN.
fn encode_frame(
    data: &Frame,
    feature_names: &[String],
    features: &[FeatureParams],
    encoders: &[Option<FittedLabelEncoder>],
) -> Result<Array2<f64>, PreprocessingError> {
    let n_rows = data.n_rows();
    let mut out = Array2::<f64>::from_elem((n_rows, feature_names.len()), f64::NAN);

    for (j, name) in feature_names.iter().enumerate() {
        let column = data
            .column(name)
            .ok_or_else(|| PreprocessingError::MissingColumn(name.clone()))?;
        match (&features[j], column, &encoders[j]) {
            (FeatureParams::Numeric, Column::Numeric(values), _) => {
                for (i, v) in values.iter().enumerate() {
                    out[[i, j]] = v.unwrap_or(f64::NAN);
                }
            }
            (FeatureParams::Categorical { fill, .. }, Column::Categorical(values), Some(encoder)) => {
                let codes = encoder.transform(&fill_categorical(values, fill))?;
                for (i, code) in codes.into_iter().enumerate() {
                    out[[i, j]] = code as f64;
                }
            }
            (expected, _, _) => {
                let kind = match expected {
                    FeatureParams::Numeric => "numeric",
                    FeatureParams::Categorical { .. } => "categorical",
                };
                return Err(PreprocessingError::InvalidShape {
                    expected: format!("{} column '{}'", kind, name),
                    got: if column.is_numeric() { "numeric" } else { "categorical" }.to_string(),
                });
            }
        }
    }
    Ok(out)
}

/// Fitted preprocessor ready for inference.
#[derive(Clone, Debug)]
pub struct FittedPreprocessor {
    params: PreprocessorParams,
    encoders: Vec<Option<FittedLabelEncoder>>,
    imputer: FittedSimpleImputer,
}

impl FittedPreprocessor {
    /// Feature column names in matrix order.
    pub fn feature_names(&self) -> &[String] {
        &self.params.feature_names
    }

    pub fn target_column(&self) -> &str {
        &self.params.target_column
    }

    /// Label encoder of a categorical feature.
    pub fn encoder(&self, name: &str) -> Option<&FittedLabelEncoder> {
        let idx = self.params.feature_names.iter().position(|n| n == name)?;
        self.encoders[idx].as_ref()
    }
}

impl FittedTransformer for FittedPreprocessor {
    type Input = Frame;
    type Output = Array2<f64>;
    type Params = PreprocessorParams;

    fn transform(&self, data: &Frame) -> Result<Array2<f64>, PreprocessingError> {
        let raw = encode_frame(
            data,
            &self.params.feature_names,
            &self.params.features,
            &self.encoders,
        )?;
        self.imputer.transform(&raw)
    }

    fn extract_params(&self) -> PreprocessorParams {
        self.params.clone()
    }

    fn from_params(params: PreprocessorParams) -> Result<Self, PreprocessingError> {
        if params.features.len() != params.feature_names.len() {
            return Err(PreprocessingError::InvalidShape {
                expected: format!("{} feature params", params.feature_names.len()),
                got: format!("{}", params.features.len()),
            });
        }
        let encoders = params
            .features
            .iter()
            .map(|f| match f {
                FeatureParams::Numeric => Ok(None),
                FeatureParams::Categorical { encoder, .. } => {
                    FittedLabelEncoder::from_params(encoder.clone()).map(Some)
                }
            })
            .collect::<Result<Vec<_>, _>>()?;
        let imputer = FittedSimpleImputer::from_params(params.imputer.clone())?;
        if imputer.n_features_in() != params.feature_names.len() {
            return Err(PreprocessingError::FeatureMismatch {
                expected_features: params.feature_names.len(),
                got_features: imputer.n_features_in(),
            });
        }
        Ok(Self {
            params,
            encoders,
            imputer,
        })
    }

    fn n_features_in(&self) -> usize {
        self.params.feature_names.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frame() -> Frame {
        let mut frame = Frame::new();
        frame
            .push_column("idade_anos", Column::Numeric(vec![Some(2.0), None, Some(4.0), None]))
            .unwrap();
        frame
            .push_column(
                "cidade",
                Column::Categorical(vec![
                    Some("Recife".to_string()),
                    None,
                    Some("Belém".to_string()),
                    Some("Recife".to_string()),
                ]),
            )
            .unwrap();
        frame
            .push_column(
                "data_nascimento",
                Column::Categorical(vec![Some("2020-01-01".to_string()); 4]),
            )
            .unwrap();
        frame
            .push_column(
                "acesso_alimentos_basicos",
                Column::Categorical(vec![Some("Sim, sempre".to_string()); 4]),
            )
            .unwrap();
        frame
    }

    fn preprocessor() -> Preprocessor {
        Preprocessor::new("acesso_alimentos_basicos").with_exclude(vec!["data_nascimento".to_string()])
    }

    #[test]
    fn test_fit_transform_has_no_missing_values() {
        let fitted = preprocessor().fit(&frame()).unwrap();
        let x = fitted.transform(&frame()).unwrap();

        assert_eq!(fitted.feature_names(), &["idade_anos", "cidade"]);
        assert_eq!(x.dim(), (4, 2));
        assert!(x.iter().all(|v| !v.is_nan()));
        // mean fill
        assert!((x[[1, 0]] - 3.0).abs() < 1e-6);
        // mode fill: Recife, encoded after Belém
        assert_eq!(x[[1, 1]], 1.0);
        assert_eq!(x[[2, 1]], 0.0);
    }

    #[test]
    fn test_missing_target_column_is_fatal() {
        let mut data = frame();
        data.remove_column("acesso_alimentos_basicos");
        assert!(matches!(
            preprocessor().fit(&data),
            Err(PreprocessingError::MissingColumn(c)) if c == "acesso_alimentos_basicos"
        ));
    }

    #[test]
    fn test_mode_ties_pick_smallest() {
        let values = vec![Some("b".to_string()), Some("a".to_string()), None];
        assert_eq!(categorical_mode(&values), Some("a".to_string()));
        assert_eq!(categorical_mode(&[None, None]), None);
    }

    #[test]
    fn test_unknown_category_uses_fallback() {
        let fitted = preprocessor().fit(&frame()).unwrap();
        let mut row = frame().select_rows(&[0]);
        row.remove_column("cidade");
        row.push_column("cidade", Column::Categorical(vec![Some("Manaus".to_string())]))
            .unwrap();
        let x = fitted.transform(&row).unwrap();
        assert_eq!(x[[0, 1]], 1.0);
    }

    #[test]
    fn test_params_roundtrip() {
        let fitted = preprocessor().fit(&frame()).unwrap();
        let restored = FittedPreprocessor::from_params(fitted.extract_params()).unwrap();
        assert_eq!(
            fitted.transform(&frame()).unwrap(),
            restored.transform(&frame()).unwrap()
        );
        assert_eq!(restored.n_features_in(), 2);
    }
}
