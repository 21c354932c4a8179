//! Class labels for the prediction target.

use crate::dataset::RawTable;
use crate::preprocessing::encoding::{FittedLabelEncoder, HandleUnknown, LabelEncoder};
use crate::preprocessing::error::PreprocessingError;
use crate::preprocessing::traits::{FittedTransformer, Transformer};
use log::warn;
use serde::{Deserialize, Serialize};

/// Label for households that always have access to basic food.
pub const ALWAYS_LABEL: &str = "sempre";
/// Label for every other food-access answer, missing included.
pub const NOT_ALWAYS_LABEL: &str = "nem sempre";

/// How raw target answers become class labels.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum TargetRule {
    /// Each distinct trimmed answer is a class; rows without an answer are dropped.
    Categorical,
    /// "Sim, sempre" against everything else.
    #[default]
    FoodAccessBinary,
}

/// Encoded target column.
#[derive(Clone, Debug)]
pub struct EncodedTarget {
    /// Class labels in code order.
    pub labels: Vec<String>,
    /// Class code per kept row.
    pub y: Vec<usize>,
    /// Indices of the input rows that carry a label.
    pub kept_rows: Vec<usize>,
}

impl EncodedTarget {
    pub fn n_classes(&self) -> usize {
        self.labels.len()
    }
}

/// Derives class labels from one column of the raw table.
#[derive(Clone, Debug)]
pub struct TargetEncoder {
    column: String,
    rule: TargetRule,
}

impl TargetEncoder {
    pub fn new(column: impl Into<String>, rule: TargetRule) -> Self {
        Self {
            column: column.into(),
            rule,
        }
    }

    fn label(&self, raw: Option<&str>) -> Option<String> {
        match self.rule {
            TargetRule::Categorical => raw.map(|v| v.trim().to_string()),
            TargetRule::FoodAccessBinary => Some(
                if raw.map(str::trim) == Some("Sim, sempre") {
                    ALWAYS_LABEL
                } else {
                    NOT_ALWAYS_LABEL
                }
                .to_string(),
            ),
        }
    }

    /// Encode the target column.
    ///
    /// # Errors
    /// `MissingColumn` when the column is absent, `InvalidParameter` when
    /// fewer than two classes remain.
    pub fn encode(&self, raw: &RawTable) -> Result<EncodedTarget, PreprocessingError> {
        let values = raw
            .column(&self.column)
            .ok_or_else(|| PreprocessingError::MissingColumn(self.column.clone()))?;

        let mut kept_rows = Vec::with_capacity(values.len());
        let mut labels = Vec::with_capacity(values.len());
        for (row, value) in values.into_iter().enumerate() {
            if let Some(label) = self.label(value) {
                kept_rows.push(row);
                labels.push(Some(label));
            }
        }
        let dropped = raw.n_rows() - kept_rows.len();
        if dropped > 0 {
            warn!("Dropped {} rows without a '{}' value", dropped, self.column);
        }

        let encoder: FittedLabelEncoder = LabelEncoder::new(self.column.as_str())
            .with_handle_unknown(HandleUnknown::Error)
            .fit(&labels)?;
        if encoder.n_classes() < 2 {
            return Err(PreprocessingError::InvalidParameter(format!(
                "target '{}' needs at least 2 classes, found {}",
                self.column,
                encoder.n_classes()
            )));
        }
        let y = encoder.transform(&labels)?;

        Ok(EncodedTarget {
            labels: encoder.classes().to_vec(),
            y,
            kept_rows,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table() -> RawTable {
        RawTable::from_records(
            &["acesso_alimentos_basicos"],
            &[
                vec!["Sim, sempre"],
                vec!["Sim, quase sempre"],
                vec![""],
                vec![" Sim, sempre "],
                vec!["Não"],
            ],
        )
    }

    #[test]
    fn test_food_access_binary() {
        let target = TargetEncoder::new("acesso_alimentos_basicos", TargetRule::FoodAccessBinary)
            .encode(&table())
            .unwrap();
        assert_eq!(target.labels, vec!["nem sempre", "sempre"]);
        assert_eq!(target.y, vec![1, 0, 0, 1, 0]);
        assert_eq!(target.kept_rows, vec![0, 1, 2, 3, 4]);
    }

    #[test]
    fn test_categorical_drops_missing_rows() {
        let target = TargetEncoder::new("acesso_alimentos_basicos", TargetRule::Categorical)
            .encode(&table())
            .unwrap();
        assert_eq!(target.n_classes(), 3);
        assert_eq!(target.kept_rows, vec![0, 1, 3, 4]);
        assert_eq!(target.y, vec![2, 1, 2, 0]);
    }

    #[test]
    fn test_single_class_is_rejected() {
        let raw = RawTable::from_records(&["alvo"], &[vec!["a"], vec!["a"]]);
        assert!(matches!(
            TargetEncoder::new("alvo", TargetRule::Categorical).encode(&raw),
            Err(PreprocessingError::InvalidParameter(_))
        ));
    }

    #[test]
    fn test_missing_target_column() {
        assert!(matches!(
            TargetEncoder::new("alvo", TargetRule::FoodAccessBinary).encode(&table()),
            Err(PreprocessingError::MissingColumn(_))
        ));
    }
}
