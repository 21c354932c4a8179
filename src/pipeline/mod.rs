//! Training pipeline: load, recode, encode, balance, train, tune, persist.
//!
//! # Example
//! ```ignore
//! use nutriml::{Pipeline, PipelineConfig};
//!
//! let report = Pipeline::load("pesquisa.csv", PipelineConfig::default())?
//!     .recode()
//!     .encode()?
//!     .balance()?
//!     .train_baseline()?
//!     .tune()?
//!     .persist()?
//!     .into_report();
//! println!("{}", report.tuned.report);
//! ```

mod error;
pub mod state;

pub use error::PipelineError;
pub use state::{Balanced, Encoded, Loaded, Persisted, Recoded, State, TrainedBaseline, Tuned};

use crate::balance::Smote;
use crate::config::{BalanceOrder, PipelineConfig};
use crate::dataset::{InMemoryDataset, RawTable};
use crate::metrics::{evaluate, Evaluation};
use crate::model::{Classifier, InferenceModel, RandomForest, RandomForestParams};
use crate::model_selection::{train_test_split, CvResult, GridSearchCV, StratifiedKFold};
use crate::predict::{ModelArtifact, ARTIFACT_VERSION};
use crate::preprocessing::{FittedTransformer, Preprocessor, TargetEncoder, Transformer};
use crate::recoding::{columns, Recoder};
use crate::summary::{mean_index_by_group, GroupSummary};
use log::info;
use ndarray::Axis;
use serde::Serialize;
use state::Encoding;
use std::path::{Path, PathBuf};

/// Summary of one training run.
#[derive(Clone, Debug, Serialize)]
pub struct TrainingReport {
    pub class_labels: Vec<String>,
    pub feature_names: Vec<String>,
    /// Training partition class counts after balancing.
    pub train_class_counts: Vec<usize>,
    pub n_test: usize,
    pub mean_development_index: f64,
    pub development_index_by_region: Vec<GroupSummary>,
    pub baseline: Evaluation,
    pub tuned: Evaluation,
    pub best_params: RandomForestParams,
    pub best_cv_score: f64,
    pub cv_results: Vec<CvResult>,
    pub model_path: PathBuf,
}

impl TrainingReport {
    pub fn to_json(&self) -> Result<String, PipelineError> {
        serde_json::to_string_pretty(self).map_err(|e| PipelineError::Serialization(e.to_string()))
    }
}

/// Training pipeline in state `S`.
#[derive(Clone, Debug)]
pub struct Pipeline<S: State> {
    config: PipelineConfig,
    state: S,
}

impl<S: State> Pipeline<S> {
    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    fn advance<T: State>(self, state: T) -> Pipeline<T> {
        Pipeline {
            config: self.config,
            state,
        }
    }
}

impl Pipeline<Loaded> {
    /// Read the survey file.
    ///
    /// # Errors
    /// `Configuration` for an invalid config, `MissingInput` when the file
    /// does not exist.
    pub fn load<P: AsRef<Path>>(path: P, config: PipelineConfig) -> Result<Self, PipelineError> {
        config.validate()?;
        let raw = RawTable::from_csv_path(path.as_ref(), config.delimiter)?;
        info!(
            "Loaded {} rows x {} columns from {}",
            raw.n_rows(),
            raw.headers().len(),
            path.as_ref().display()
        );
        Ok(Self {
            config,
            state: Loaded { raw },
        })
    }

    pub fn from_table(raw: RawTable, config: PipelineConfig) -> Result<Self, PipelineError> {
        config.validate()?;
        Ok(Self {
            config,
            state: Loaded { raw },
        })
    }

    pub fn raw(&self) -> &RawTable {
        &self.state.raw
    }

    /// Recode raw answers. Never fails.
    pub fn recode(self) -> Pipeline<Recoded> {
        let recoder = Recoder::new(self.config.recoding.clone(), self.config.schema.clone());
        let recoded = recoder.recode(&self.state.raw);
        let frozen = Recoder::new(
            self.config.recoding.clone(),
            self.config.schema.freeze(&recoded.inferred_numeric),
        );
        info!(
            "Recoded {} columns into {} features",
            self.state.raw.headers().len(),
            recoded.frame.n_columns()
        );
        Pipeline {
            config: self.config,
            state: Recoded {
                raw: self.state.raw,
                recoded,
                recoder: frozen,
            },
        }
    }
}

impl Pipeline<Recoded> {
    pub fn recoded(&self) -> &crate::recoding::RecodedTable {
        &self.state.recoded
    }

    /// Fit the preprocessor on the whole table and encode the target.
    ///
    /// # Errors
    /// `MissingColumn` when the target column is absent.
    pub fn encode(self) -> Result<Pipeline<Encoded>, PipelineError> {
        let config = &self.config;
        let frame = &self.state.recoded.frame;
        let preprocessor = Preprocessor::new(config.target_column.as_str())
            .with_exclude(config.identifier_columns.clone())
            .fit(frame)?;
        let x = preprocessor.transform(frame)?;

        let target =
            TargetEncoder::new(config.target_column.as_str(), config.target_rule).encode(&self.state.raw)?;
        let x = x.select(Axis(0), &target.kept_rows);
        let dataset = InMemoryDataset::new(x, target.y.clone())?;

        info!(
            "Encoded {} samples, {} features, classes {:?} with counts {:?}",
            dataset.n_samples(),
            dataset.n_features(),
            target.labels,
            dataset.class_counts(target.n_classes())
        );

        let encoding = Encoding {
            raw_columns: self.state.raw.headers().to_vec(),
            recoder: self.state.recoder.clone(),
            preprocessor,
            class_labels: target.labels,
            development_index: self.state.recoded.development_index.clone(),
            index_by_region: mean_index_by_group(
                &self.state.raw,
                &self.state.recoded.development_index,
                columns::REGIAO,
            ),
        };
        Ok(self.advance(Encoded { encoding, dataset }))
    }
}

impl Pipeline<Encoded> {
    pub fn dataset(&self) -> &InMemoryDataset {
        &self.state.dataset
    }

    pub fn class_labels(&self) -> &[String] {
        &self.state.encoding.class_labels
    }

    pub fn feature_names(&self) -> &[String] {
        self.state.encoding.preprocessor.feature_names()
    }

    /// Hold out a test partition and oversample, in the configured order.
    ///
    /// # Errors
    /// `Configuration` when a class is too small to split or oversample.
    pub fn balance(self) -> Result<Pipeline<Balanced>, PipelineError> {
        let config = &self.config;
        let n_classes = self.state.encoding.class_labels.len();
        let smote = Smote::new()
            .with_k_neighbors(config.smote_k_neighbors)
            .with_seed(config.seed);

        let (train, test) = match config.balance_order {
            BalanceOrder::SplitThenBalance => {
                let (train, test) =
                    train_test_split(&self.state.dataset, config.test_size, config.stratify, config.seed)?;
                (smote.fit_resample(&train, n_classes)?, test)
            }
            BalanceOrder::BalanceThenSplit => {
                let balanced = smote.fit_resample(&self.state.dataset, n_classes)?;
                train_test_split(&balanced, config.test_size, config.stratify, config.seed)?
            }
        };
        info!(
            "Balanced ({:?}): train {:?}, test {} rows",
            config.balance_order,
            train.class_counts(n_classes),
            test.n_samples()
        );

        let Encoded { encoding, .. } = self.state;
        Ok(Pipeline {
            config: self.config,
            state: Balanced {
                encoding,
                train,
                test,
            },
        })
    }
}

impl Pipeline<Balanced> {
    pub fn train(&self) -> &InMemoryDataset {
        &self.state.train
    }

    pub fn test(&self) -> &InMemoryDataset {
        &self.state.test
    }

    /// Fit the default forest and score it on the test partition.
    pub fn train_baseline(self) -> Result<Pipeline<TrainedBaseline>, PipelineError> {
        let Balanced {
            encoding,
            train,
            test,
        } = self.state;
        let n_classes = encoding.class_labels.len();
        let baseline_model = RandomForest::new(self.config.baseline.clone()).fit(&train, n_classes)?;
        let baseline = evaluate(&baseline_model, &test, &encoding.class_labels);
        info!("Baseline accuracy: {:.4}\n{}", baseline.accuracy, baseline.report);
        Ok(Pipeline {
            config: self.config,
            state: TrainedBaseline {
                encoding,
                train,
                test,
                baseline_model,
                baseline,
            },
        })
    }
}

impl Pipeline<TrainedBaseline> {
    pub fn baseline(&self) -> &Evaluation {
        &self.state.baseline
    }

    pub fn baseline_model(&self) -> &RandomForest<crate::model::Fitted> {
        &self.state.baseline_model
    }

    /// Grid search over the configured candidates, then score the refitted
    /// best model on the same test partition as the baseline.
    pub fn tune(self) -> Result<Pipeline<Tuned>, PipelineError> {
        let TrainedBaseline {
            encoding,
            train,
            test,
            baseline,
            ..
        } = self.state;
        let config = &self.config;
        let n_classes = encoding.class_labels.len();
        let search = GridSearchCV::new(config.grid.clone())
            .with_base_params(config.baseline.clone())
            .with_cv(StratifiedKFold::new(config.cv_folds))
            .with_verbose(config.verbose)
            .fit(&train, n_classes)?;
        let tuned = evaluate(&search.best_estimator, &test, &encoding.class_labels);
        info!("Tuned accuracy: {:.4}\n{}", tuned.accuracy, tuned.report);
        Ok(Pipeline {
            config: self.config,
            state: Tuned {
                encoding,
                train,
                test,
                baseline,
                search,
                tuned,
            },
        })
    }
}

impl Pipeline<Tuned> {
    pub fn tuned(&self) -> &Evaluation {
        &self.state.tuned
    }

    pub fn search(&self) -> &crate::model_selection::GridSearchResult {
        &self.state.search
    }

    pub fn report(&self) -> TrainingReport {
        let state = &self.state;
        let n_classes = state.encoding.class_labels.len();
        let index = &state.encoding.development_index;
        TrainingReport {
            class_labels: state.encoding.class_labels.clone(),
            feature_names: state.encoding.preprocessor.feature_names().to_vec(),
            train_class_counts: state.train.class_counts(n_classes),
            n_test: state.test.n_samples(),
            mean_development_index: if index.is_empty() {
                0.0
            } else {
                index.iter().sum::<f64>() / index.len() as f64
            },
            development_index_by_region: state.encoding.index_by_region.clone(),
            baseline: state.baseline.clone(),
            tuned: state.tuned.clone(),
            best_params: state.search.best_params.clone(),
            best_cv_score: state.search.best_score,
            cv_results: state.search.cv_results.clone(),
            model_path: self.config.model_path.clone(),
        }
    }

    /// Everything inference needs, in one value.
    pub fn artifact(&self) -> ModelArtifact {
        let encoding = &self.state.encoding;
        ModelArtifact {
            format_version: ARTIFACT_VERSION,
            target_column: self.config.target_column.clone(),
            target_rule: self.config.target_rule,
            class_labels: encoding.class_labels.clone(),
            raw_columns: encoding.raw_columns.clone(),
            recoding: encoding.recoder.table().clone(),
            schema: encoding.recoder.schema().clone(),
            preprocessor: encoding.preprocessor.extract_params(),
            forest: self.state.search.best_estimator.extract_params(),
            seed: self.config.seed,
        }
    }

    /// Write the artifact to `config.model_path`, replacing any previous one.
    pub fn persist(self) -> Result<Pipeline<Persisted>, PipelineError> {
        let report = self.report();
        let artifact = self.artifact();
        let path = self.config.model_path.clone();
        artifact.save(&path)?;
        Ok(self.advance(Persisted {
            report,
            artifact,
            path,
        }))
    }
}

impl Pipeline<Persisted> {
    pub fn path(&self) -> &Path {
        &self.state.path
    }

    pub fn artifact(&self) -> &ModelArtifact {
        &self.state.artifact
    }

    pub fn report(&self) -> &TrainingReport {
        &self.state.report
    }

    pub fn into_report(self) -> TrainingReport {
        self.state.report
    }
}

/// Run every stage on the file at `path`.
pub fn run<P: AsRef<Path>>(path: P, config: PipelineConfig) -> Result<TrainingReport, PipelineError> {
    Ok(Pipeline::load(path, config)?
        .recode()
        .encode()?
        .balance()?
        .train_baseline()?
        .tune()?
        .persist()?
        .into_report())
}
