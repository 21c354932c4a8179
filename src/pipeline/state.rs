//! Type-state markers for the training pipeline.
//!
//! ```text
//! Loaded --> Recoded --> Encoded --> Balanced --> TrainedBaseline --> Tuned --> Persisted
//! ```
//!
//! Each state owns what the stages so far produced; a transition consumes
//! the pipeline and returns it in the next state, so stages cannot be
//! skipped or repeated.

use crate::dataset::{InMemoryDataset, RawTable};
use crate::metrics::Evaluation;
use crate::model::{Fitted, RandomForest};
use crate::model_selection::GridSearchResult;
use crate::pipeline::TrainingReport;
use crate::predict::ModelArtifact;
use crate::preprocessing::FittedPreprocessor;
use crate::recoding::{RecodedTable, Recoder};
use crate::summary::GroupSummary;
use std::path::PathBuf;

/// Marker trait for pipeline states.
pub trait State {}

/// Raw table read from disk.
#[derive(Clone, Debug)]
pub struct Loaded {
    pub(crate) raw: RawTable,
}

/// Answers recoded to typed columns.
#[derive(Clone, Debug)]
pub struct Recoded {
    pub(crate) raw: RawTable,
    pub(crate) recoded: RecodedTable,
    /// Recoder with the column types this run settled on.
    pub(crate) recoder: Recoder,
}

/// Everything a trained model needs to see the data again.
#[derive(Clone, Debug)]
pub(crate) struct Encoding {
    pub raw_columns: Vec<String>,
    pub recoder: Recoder,
    pub preprocessor: FittedPreprocessor,
    pub class_labels: Vec<String>,
    pub development_index: Vec<f64>,
    pub index_by_region: Vec<GroupSummary>,
}

/// Numeric features and class codes.
#[derive(Clone, Debug)]
pub struct Encoded {
    pub(crate) encoding: Encoding,
    pub(crate) dataset: InMemoryDataset,
}

/// Hold-out split with an oversampled training partition.
#[derive(Clone, Debug)]
pub struct Balanced {
    pub(crate) encoding: Encoding,
    pub(crate) train: InMemoryDataset,
    pub(crate) test: InMemoryDataset,
}

#[derive(Clone, Debug)]
pub struct TrainedBaseline {
    pub(crate) encoding: Encoding,
    pub(crate) train: InMemoryDataset,
    pub(crate) test: InMemoryDataset,
    pub(crate) baseline_model: RandomForest<Fitted>,
    pub(crate) baseline: Evaluation,
}

#[derive(Clone, Debug)]
pub struct Tuned {
    pub(crate) encoding: Encoding,
    pub(crate) train: InMemoryDataset,
    pub(crate) test: InMemoryDataset,
    pub(crate) baseline: Evaluation,
    pub(crate) search: GridSearchResult,
    pub(crate) tuned: Evaluation,
}

/// Artifact written to disk.
#[derive(Clone, Debug)]
pub struct Persisted {
    pub(crate) report: TrainingReport,
    pub(crate) artifact: ModelArtifact,
    pub(crate) path: PathBuf,
}

impl State for Loaded {}
impl State for Recoded {}
impl State for Encoded {}
impl State for Balanced {}
impl State for TrainedBaseline {}
impl State for Tuned {}
impl State for Persisted {}
