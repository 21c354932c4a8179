//! Training pipeline configuration.
//!
//! Defaults reproduce the survey setup; the `NUTRIML_*` environment
//! variables override a handful of operational settings.

use crate::model::RandomForestParams;
use crate::model_selection::ParamGrid;
use crate::pipeline::PipelineError;
use crate::predict::MODEL_FILENAME;
use crate::preprocessing::TargetRule;
use crate::recoding::{columns, RecodingTable, SurveySchema};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::str::FromStr;

/// Order of oversampling and hold-out split.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum BalanceOrder {
    /// Split first and oversample only the training partition.
    #[default]
    SplitThenBalance,
    /// Oversample the whole dataset, then split. Synthetic rows derived from
    /// test rows can end up in training, which inflates test scores.
    BalanceThenSplit,
}

impl FromStr for BalanceOrder {
    type Err = PipelineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "split-then-balance" => Ok(BalanceOrder::SplitThenBalance),
            "balance-then-split" => Ok(BalanceOrder::BalanceThenSplit),
            other => Err(PipelineError::Configuration(format!(
                "unknown balance order '{}' (expected split-then-balance or balance-then-split)",
                other
            ))),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PipelineConfig {
    pub target_column: String,
    pub target_rule: TargetRule,
    /// Columns never used as features.
    pub identifier_columns: Vec<String>,
    pub recoding: RecodingTable,
    pub schema: SurveySchema,
    pub delimiter: u8,
    pub test_size: f64,
    pub stratify: bool,
    pub seed: u64,
    pub balance_order: BalanceOrder,
    pub smote_k_neighbors: usize,
    pub cv_folds: usize,
    pub grid: ParamGrid,
    /// Forest used for the baseline; also the base of every grid candidate.
    pub baseline: RandomForestParams,
    pub model_path: PathBuf,
    pub verbose: bool,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            target_column: columns::ACESSO_ALIMENTOS.to_string(),
            target_rule: TargetRule::FoodAccessBinary,
            identifier_columns: vec![columns::DATA_NASCIMENTO.to_string()],
            recoding: RecodingTable::survey_default(),
            schema: SurveySchema::default(),
            delimiter: b',',
            test_size: 0.2,
            stratify: true,
            seed: 42,
            balance_order: BalanceOrder::SplitThenBalance,
            smote_k_neighbors: 5,
            cv_folds: 5,
            grid: ParamGrid::default(),
            baseline: RandomForestParams::default(),
            model_path: PathBuf::from(MODEL_FILENAME),
            verbose: false,
        }
    }
}

fn parse_env<T: FromStr>(name: &str, raw: &str) -> Result<T, PipelineError> {
    raw.trim()
        .parse()
        .map_err(|_| PipelineError::Configuration(format!("invalid value '{}' for {}", raw, name)))
}

impl PipelineConfig {
    pub fn with_target(mut self, column: impl Into<String>, rule: TargetRule) -> Self {
        self.target_column = column.into();
        self.target_rule = rule;
        self
    }

    pub fn with_identifier_columns(mut self, columns: Vec<String>) -> Self {
        self.identifier_columns = columns;
        self
    }

    pub fn with_recoding(mut self, recoding: RecodingTable) -> Self {
        self.recoding = recoding;
        self
    }

    pub fn with_schema(mut self, schema: SurveySchema) -> Self {
        self.schema = schema;
        self
    }

    pub fn with_delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = delimiter;
        self
    }

    pub fn with_test_size(mut self, test_size: f64) -> Self {
        self.test_size = test_size;
        self
    }

    pub fn with_stratify(mut self, stratify: bool) -> Self {
        self.stratify = stratify;
        self
    }

    /// Seed for the split, SMOTE and every forest.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self.baseline.seed = seed;
        self
    }

    pub fn with_balance_order(mut self, balance_order: BalanceOrder) -> Self {
        self.balance_order = balance_order;
        self
    }

    pub fn with_smote_k_neighbors(mut self, k: usize) -> Self {
        self.smote_k_neighbors = k;
        self
    }

    pub fn with_cv_folds(mut self, cv_folds: usize) -> Self {
        self.cv_folds = cv_folds;
        self
    }

    pub fn with_grid(mut self, grid: ParamGrid) -> Self {
        self.grid = grid;
        self
    }

    pub fn with_baseline(mut self, baseline: RandomForestParams) -> Self {
        self.baseline = baseline;
        self
    }

    pub fn with_model_path(mut self, model_path: impl Into<PathBuf>) -> Self {
        self.model_path = model_path.into();
        self
    }

    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    /// Defaults overridden by `NUTRIML_SEED`, `NUTRIML_MODEL_PATH`,
    /// `NUTRIML_BALANCE_ORDER`, `NUTRIML_CV_FOLDS` and `NUTRIML_TEST_SIZE`.
    pub fn from_env() -> Result<Self, PipelineError> {
        Self::default().apply_overrides(|name| std::env::var(name).ok())
    }

    /// Apply overrides from any variable source.
    pub fn apply_overrides<F>(mut self, lookup: F) -> Result<Self, PipelineError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(raw) = lookup("NUTRIML_SEED") {
            self = self.with_seed(parse_env("NUTRIML_SEED", &raw)?);
        }
        if let Some(raw) = lookup("NUTRIML_MODEL_PATH") {
            self.model_path = PathBuf::from(raw);
        }
        if let Some(raw) = lookup("NUTRIML_BALANCE_ORDER") {
            self.balance_order = raw.parse()?;
        }
        if let Some(raw) = lookup("NUTRIML_CV_FOLDS") {
            self.cv_folds = parse_env("NUTRIML_CV_FOLDS", &raw)?;
        }
        if let Some(raw) = lookup("NUTRIML_TEST_SIZE") {
            self.test_size = parse_env("NUTRIML_TEST_SIZE", &raw)?;
        }
        self.validate()?;
        Ok(self)
    }

    pub fn validate(&self) -> Result<(), PipelineError> {
        if !(self.test_size > 0.0 && self.test_size < 1.0) {
            return Err(PipelineError::Configuration(format!(
                "test_size must be in (0, 1), got {}",
                self.test_size
            )));
        }
        if self.cv_folds < 2 {
            return Err(PipelineError::Configuration(format!(
                "cv_folds must be at least 2, got {}",
                self.cv_folds
            )));
        }
        if self.grid.is_empty() {
            return Err(PipelineError::Configuration(
                "parameter grid has no candidates".to_string(),
            ));
        }
        if self.smote_k_neighbors == 0 {
            return Err(PipelineError::Configuration(
                "smote_k_neighbors must be at least 1".to_string(),
            ));
        }
        if self.target_column.trim().is_empty() {
            return Err(PipelineError::Configuration(
                "target column name is empty".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name: &str| map.get(name).cloned()
    }

    #[test]
    fn test_defaults_are_valid() {
        let config = PipelineConfig::default();
        config.validate().unwrap();
        assert_eq!(config.model_path, PathBuf::from("modelo_acesso_alimentar.bin"));
        assert_eq!(config.balance_order, BalanceOrder::SplitThenBalance);
        assert_eq!(config.grid.len(), 12);
    }

    #[test]
    fn test_overrides() {
        let config = PipelineConfig::default()
            .apply_overrides(lookup(&[
                ("NUTRIML_SEED", "7"),
                ("NUTRIML_BALANCE_ORDER", "balance-then-split"),
                ("NUTRIML_CV_FOLDS", "3"),
                ("NUTRIML_TEST_SIZE", "0.1"),
                ("NUTRIML_MODEL_PATH", "/tmp/m.bin"),
            ]))
            .unwrap();
        assert_eq!(config.seed, 7);
        assert_eq!(config.baseline.seed, 7);
        assert_eq!(config.balance_order, BalanceOrder::BalanceThenSplit);
        assert_eq!(config.cv_folds, 3);
        assert!((config.test_size - 0.1).abs() < 1e-12);
        assert_eq!(config.model_path, PathBuf::from("/tmp/m.bin"));
    }

    #[test]
    fn test_invalid_overrides_are_configuration_errors() {
        for vars in [
            [("NUTRIML_SEED", "abc")],
            [("NUTRIML_BALANCE_ORDER", "sideways")],
            [("NUTRIML_CV_FOLDS", "1")],
            [("NUTRIML_TEST_SIZE", "1.5")],
        ] {
            assert!(matches!(
                PipelineConfig::default().apply_overrides(lookup(&vars)),
                Err(PipelineError::Configuration(_))
            ));
        }
    }

    #[test]
    fn test_validate_rejects_empty_grid_and_zero_k() {
        let grid = ParamGrid {
            max_depth: vec![],
            ..ParamGrid::default()
        };
        assert!(PipelineConfig::default().with_grid(grid).validate().is_err());
        assert!(PipelineConfig::default()
            .with_smote_k_neighbors(0)
            .validate()
            .is_err());
    }
}
