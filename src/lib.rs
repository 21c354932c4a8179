//! # nutriml
//!
//! Food-access classification for household nutrition surveys.
//!
//! The crate takes a survey table of free-text answers, recodes it into
//! numbers, fills the gaps, balances the classes with SMOTE, and trains a
//! random forest whose hyperparameters are chosen by cross-validated grid
//! search. The trained pipeline is stored as one artifact that can answer
//! predictions for a single form submission.
//!
//! ## Core Design Principles
//!
//! - **Stateful Type Safety**: models carry their training state in the type
//!   (`RandomForest<Unfitted>` vs `RandomForest<Fitted>`), and the training
//!   [`Pipeline`] carries its stage, so stages run in order exactly once.
//! - **Fit/Transform Separation**: every learned step has an unfitted
//!   configuration and a fitted value with serializable parameters.
//! - **Total Recoding**: no answer makes recoding fail; unmapped values get
//!   the sentinel code 9 and unparsable numbers become missing.
//! - **Determinism**: one seed drives the split, SMOTE and every tree.
//!
//! ## Quick Start
//!
//! ```ignore
//! use nutriml::{pipeline, PipelineConfig, Predictor};
//! use std::collections::BTreeMap;
//!
//! let report = pipeline::run("pesquisa.csv", PipelineConfig::default())?;
//! println!("{}", report.tuned.report);
//!
//! let predictor = Predictor::load(nutriml::MODEL_FILENAME)?;
//! // every field in `required_fields()` must be answered; "" means unanswered
//! let form: BTreeMap<String, String> = predictor
//!     .required_fields()
//!     .into_iter()
//!     .map(|field| (field, String::new()))
//!     .collect();
//! let prediction = predictor.predict_form(&form)?;
//! println!("{} ({:.0}%)", prediction.label, prediction.confidence * 100.0);
//! ```
//!
//! ## Module Structure
//!
//! - `dataset`: raw CSV table, typed frame, numeric dataset
//! - `recoding`: lookup tables, indicator scores, month and benefit parsing
//! - `preprocessing`: imputation, label encoding, feature/target encoding
//! - `balance`: SMOTE oversampling
//! - `model`: decision tree and random forest
//! - `model_selection`: hold-out split, stratified K-fold, grid search
//! - `metrics`: accuracy and classification report
//! - `pipeline`: staged training run
//! - `predict`: model artifact and predictor

/// Raw and typed survey tables.
pub mod dataset;

/// Recoding of survey answers into numbers.
pub mod recoding;

/// Data preprocessing transformers.
pub mod preprocessing;

/// Class balancing.
pub mod balance;

/// Classification models with compile-time state safety.
pub mod model;

/// Splitting, cross-validation and hyperparameter search.
pub mod model_selection;

/// Evaluation metrics.
pub mod metrics;

/// Training run configuration.
pub mod config;

/// Staged training pipeline.
pub mod pipeline;

/// Model artifact and inference.
pub mod predict;

/// Model persistence utilities.
pub mod serialization;

/// Descriptive summaries.
pub mod summary;

pub use config::{BalanceOrder, PipelineConfig};
pub use pipeline::{Pipeline, PipelineError, TrainingReport};
pub use predict::{ModelArtifact, Prediction, Predictor, MODEL_FILENAME};
pub use preprocessing::PreprocessingError;
