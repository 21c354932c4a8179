//! Label encoding for one text column.

use crate::preprocessing::encoding::HandleUnknown;
use crate::preprocessing::error::PreprocessingError;
use crate::preprocessing::traits::{FittedTransformer, Transformer};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Label encoder for a single categorical column.
///
/// Missing cells are not allowed at transform time: impute first.
///
/// # Example
/// ```ignore
/// let column = vec![Some("Norte".to_string()), Some("Sul".to_string())];
/// let fitted = LabelEncoder::new("regiao").fit(&column)?;
/// assert_eq!(fitted.transform(&column)?, vec![0, 1]);
/// ```
#[derive(Clone, Debug)]
pub struct LabelEncoder {
    column: String,
    handle_unknown: HandleUnknown,
}

impl LabelEncoder {
    /// Create a new LabelEncoder for the named column.
    pub fn new(column: impl Into<String>) -> Self {
        Self {
            column: column.into(),
            handle_unknown: HandleUnknown::default(),
        }
    }

    pub fn with_handle_unknown(mut self, handle_unknown: HandleUnknown) -> Self {
        self.handle_unknown = handle_unknown;
        self
    }
}

/// Serializable parameters for a fitted LabelEncoder.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct LabelEncoderParams {
    pub column: String,
    /// Unique classes in sorted order.
    pub classes_: Vec<String>,
    /// Code used for unknown values when `handle_unknown` is `Ignore`.
    pub fallback: usize,
    pub handle_unknown: HandleUnknown,
}

impl Transformer for LabelEncoder {
    type Input = [Option<String>];
    type Output = Vec<usize>;
    type Params = LabelEncoderParams;
    type Fitted = FittedLabelEncoder;

    fn fit(&self, data: &Self::Input) -> Result<Self::Fitted, PreprocessingError> {
        let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
        for value in data.iter().flatten() {
            *counts.entry(value.as_str()).or_insert(0) += 1;
        }

        if counts.is_empty() {
            return Err(PreprocessingError::EmptyData(format!(
                "Cannot fit LabelEncoder on column '{}' without values",
                self.column
            )));
        }

        let classes_: Vec<String> = counts.keys().map(|k| k.to_string()).collect();
        // BTreeMap order makes the first maximum the lexicographically smallest
        let mut fallback = 0;
        let mut best = 0;
        for (idx, &count) in counts.values().enumerate() {
            if count > best {
                best = count;
                fallback = idx;
            }
        }

        FittedLabelEncoder::from_params(LabelEncoderParams {
            column: self.column.clone(),
            classes_,
            fallback,
            handle_unknown: self.handle_unknown,
        })
    }
}

/// Fitted LabelEncoder ready for inference.
#[derive(Clone, Debug)]
pub struct FittedLabelEncoder {
    params: LabelEncoderParams,
    class_to_idx: BTreeMap<String, usize>,
}

impl FittedLabelEncoder {
    /// Get the unique classes in code order.
    pub fn classes(&self) -> &[String] {
        &self.params.classes_
    }

    /// Get the number of classes.
    pub fn n_classes(&self) -> usize {
        self.params.classes_.len()
    }

    /// Encode one value.
    pub fn encode(&self, value: &str) -> Result<usize, PreprocessingError> {
        match self.class_to_idx.get(value) {
            Some(&idx) => Ok(idx),
            None => match self.params.handle_unknown {
                HandleUnknown::Ignore => Ok(self.params.fallback),
                HandleUnknown::Error => Err(PreprocessingError::UnknownCategory {
                    column: self.params.column.clone(),
                    value: value.to_string(),
                }),
            },
        }
    }

    /// Map a code back to its class.
    pub fn decode(&self, code: usize) -> Option<&str> {
        self.params.classes_.get(code).map(String::as_str)
    }
}

impl FittedTransformer for FittedLabelEncoder {
    type Input = [Option<String>];
    type Output = Vec<usize>;
    type Params = LabelEncoderParams;

    fn transform(&self, data: &Self::Input) -> Result<Self::Output, PreprocessingError> {
        data.iter()
            .map(|value| match value {
                Some(v) => self.encode(v),
                None => Err(PreprocessingError::MissingValues(format!(
                    "column '{}' must be imputed before label encoding",
                    self.params.column
                ))),
            })
            .collect()
    }

    fn extract_params(&self) -> Self::Params {
        self.params.clone()
    }

    fn from_params(params: Self::Params) -> Result<Self, PreprocessingError> {
        if params.fallback >= params.classes_.len() {
            return Err(PreprocessingError::InvalidParameter(format!(
                "fallback code {} out of bounds for {} classes",
                params.fallback,
                params.classes_.len()
            )));
        }
        let class_to_idx = params
            .classes_
            .iter()
            .enumerate()
            .map(|(idx, class)| (class.clone(), idx))
            .collect();
        Ok(Self {
            params,
            class_to_idx,
        })
    }

    fn n_features_in(&self) -> usize {
        1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn column(values: &[Option<&str>]) -> Vec<Option<String>> {
        values.iter().map(|v| v.map(str::to_string)).collect()
    }

    #[test]
    fn test_label_encoder_sorted_dense_codes() {
        let data = column(&[Some("Sul"), Some("Norte"), Some("Nordeste"), Some("Norte")]);
        let fitted = LabelEncoder::new("regiao").fit(&data).unwrap();

        assert_eq!(fitted.classes(), &["Nordeste", "Norte", "Sul"]);
        assert_eq!(fitted.transform(&data).unwrap(), vec![2, 1, 0, 1]);
        assert_eq!(fitted.decode(2), Some("Sul"));
    }

    #[test]
    fn test_label_encoder_unknown_ignored_maps_to_mode() {
        let data = column(&[Some("b"), Some("a"), Some("b")]);
        let fitted = LabelEncoder::new("x").fit(&data).unwrap();
        assert_eq!(fitted.encode("zzz").unwrap(), 1);
    }

    #[test]
    fn test_label_encoder_unknown_error() {
        let data = column(&[Some("a"), Some("b")]);
        let fitted = LabelEncoder::new("x")
            .with_handle_unknown(HandleUnknown::Error)
            .fit(&data)
            .unwrap();
        assert!(matches!(
            fitted.encode("c"),
            Err(PreprocessingError::UnknownCategory { .. })
        ));
    }

    #[test]
    fn test_label_encoder_rejects_missing_on_transform() {
        let train = column(&[Some("a"), None]);
        let fitted = LabelEncoder::new("x").fit(&train).unwrap();
        assert!(matches!(
            fitted.transform(&train),
            Err(PreprocessingError::MissingValues(_))
        ));
    }

    #[test]
    fn test_label_encoder_empty_data() {
        let data = column(&[None, None]);
        assert!(LabelEncoder::new("x").fit(&data).is_err());
    }

    #[test]
    fn test_label_encoder_params_restore() {
        let data = column(&[Some("c"), Some("a"), Some("c")]);
        let fitted = LabelEncoder::new("x").fit(&data).unwrap();
        let restored = FittedLabelEncoder::from_params(fitted.extract_params()).unwrap();
        assert_eq!(
            restored.transform(&data).unwrap(),
            fitted.transform(&data).unwrap()
        );
    }
}
