//! Model persistence and single-row inference.
//!
//! A trained pipeline is stored as one bincode [`ModelArtifact`] holding
//! everything needed to go from a raw form submission to a class label:
//! the recoding table, the frozen survey schema, the fitted preprocessor and
//! the forest.

use crate::dataset::RawTable;
use crate::model::{argmax, ForestParams, Fitted, InferenceModel, RandomForest, RandomForestParams};
use crate::pipeline::PipelineError;
use crate::preprocessing::{FittedPreprocessor, FittedTransformer, PreprocessorParams, PreprocessingError, TargetRule};
use crate::recoding::{Recoder, RecodingTable, SurveySchema};
use crate::serialization::SerializableParams;
use log::{debug, info};
use ndarray::ArrayView1;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

/// Default artifact location, relative to the working directory.
pub const MODEL_FILENAME: &str = "modelo_acesso_alimentar.bin";

/// Bumped whenever the artifact layout changes.
pub const ARTIFACT_VERSION: u32 = 1;

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ModelArtifact {
    pub format_version: u32,
    pub target_column: String,
    pub target_rule: TargetRule,
    /// Class labels in code order.
    pub class_labels: Vec<String>,
    /// Header of the training table; form fields are laid out over it.
    pub raw_columns: Vec<String>,
    pub recoding: RecodingTable,
    pub schema: SurveySchema,
    pub preprocessor: PreprocessorParams,
    pub forest: ForestParams,
    pub seed: u64,
}

impl ModelArtifact {
    pub fn feature_names(&self) -> &[String] {
        &self.preprocessor.feature_names
    }

    pub fn best_params(&self) -> &RandomForestParams {
        &self.forest.params
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>, PipelineError> {
        Ok(<Self as SerializableParams>::to_bytes(self)?)
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, PipelineError> {
        let artifact = <Self as SerializableParams>::from_bytes(bytes)?;
        if artifact.format_version != ARTIFACT_VERSION {
            return Err(PipelineError::Serialization(format!(
                "artifact format version {} is not supported (expected {})",
                artifact.format_version, ARTIFACT_VERSION
            )));
        }
        Ok(artifact)
    }

    /// Write the artifact, replacing any existing file.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), PipelineError> {
        let bytes = self.to_bytes()?;
        std::fs::write(path.as_ref(), &bytes)?;
        info!(
            "Model saved to {} ({} bytes)",
            path.as_ref().display(),
            bytes.len()
        );
        Ok(())
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, PipelineError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(PipelineError::MissingInput(path.to_path_buf()));
        }
        Self::from_bytes(&std::fs::read(path)?)
    }
}

/// Encoded feature values with their column names.
#[derive(Clone, Debug, PartialEq)]
pub struct FeatureRow {
    pub names: Vec<String>,
    pub values: Vec<f64>,
}

impl FeatureRow {
    pub fn new(names: Vec<String>, values: Vec<f64>) -> Self {
        Self { names, values }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Prediction {
    pub label: String,
    pub class_index: usize,
    /// Probability of the predicted class.
    pub confidence: f64,
    pub probabilities: Vec<f64>,
}

/// Loaded model ready to answer predictions.
#[derive(Clone, Debug)]
pub struct Predictor {
    artifact: ModelArtifact,
    recoder: Recoder,
    preprocessor: FittedPreprocessor,
    forest: RandomForest<Fitted>,
}

impl Predictor {
    pub fn from_artifact(artifact: ModelArtifact) -> Result<Self, PipelineError> {
        let preprocessor = FittedPreprocessor::from_params(artifact.preprocessor.clone())?;
        let forest = RandomForest::<Fitted>::from_params(artifact.forest.clone())?;
        if forest.n_features_in() != preprocessor.n_features_in() {
            return Err(PreprocessingError::FeatureMismatch {
                expected_features: preprocessor.n_features_in(),
                got_features: forest.n_features_in(),
            }
            .into());
        }
        if forest.n_classes() != artifact.class_labels.len() {
            return Err(PipelineError::Serialization(format!(
                "forest has {} classes but {} labels are stored",
                forest.n_classes(),
                artifact.class_labels.len()
            )));
        }
        let recoder = Recoder::new(artifact.recoding.clone(), artifact.schema.clone());
        Ok(Self {
            artifact,
            recoder,
            preprocessor,
            forest,
        })
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, PipelineError> {
        Self::from_artifact(ModelArtifact::load(path)?)
    }

    pub fn artifact(&self) -> &ModelArtifact {
        &self.artifact
    }

    pub fn class_labels(&self) -> &[String] {
        &self.artifact.class_labels
    }

    pub fn feature_names(&self) -> &[String] {
        self.preprocessor.feature_names()
    }

    /// Predict from already encoded features. Names must equal the training
    /// feature names, in the same order.
    pub fn predict_encoded(&self, row: &FeatureRow) -> Result<Prediction, PipelineError> {
        if row.names != self.feature_names() {
            return Err(PipelineError::SchemaMismatch {
                expected: self.feature_names().to_vec(),
                got: row.names.clone(),
            });
        }
        if row.values.len() != row.names.len() {
            return Err(PreprocessingError::FeatureMismatch {
                expected_features: row.names.len(),
                got_features: row.values.len(),
            }
            .into());
        }
        if row.values.iter().any(|v| v.is_nan()) {
            return Err(PreprocessingError::MissingValues(
                "encoded feature row contains NaN".to_string(),
            )
            .into());
        }

        let probabilities = self.forest.predict_proba(ArrayView1::from(&row.values[..]));
        let class_index = argmax(&probabilities);
        let prediction = Prediction {
            label: self.artifact.class_labels[class_index].clone(),
            class_index,
            confidence: probabilities[class_index],
            probabilities,
        };
        debug!(
            "Predicted '{}' with confidence {:.3}",
            prediction.label, prediction.confidence
        );
        Ok(prediction)
    }

    /// Raw columns a form must answer: the training header without the
    /// target and the identifier columns.
    pub fn required_fields(&self) -> Vec<String> {
        let params = &self.artifact.preprocessor;
        self.artifact
            .raw_columns
            .iter()
            .filter(|c| **c != params.target_column && !params.exclude.contains(c))
            .cloned()
            .collect()
    }

    /// Recode and preprocess raw form answers. Every required field must be
    /// present and unknown fields are rejected. An empty value marks an
    /// unanswered question and is imputed like any missing cell.
    pub fn encode_form(&self, form: &BTreeMap<String, String>) -> Result<FeatureRow, PipelineError> {
        let raw_columns = &self.artifact.raw_columns;
        if form.keys().any(|k| !raw_columns.contains(k)) {
            return Err(PipelineError::SchemaMismatch {
                expected: raw_columns.clone(),
                got: form.keys().cloned().collect(),
            });
        }
        let required = self.required_fields();
        if required.iter().any(|c| !form.contains_key(c)) {
            let got = form.keys().filter(|k| required.contains(k)).cloned().collect();
            return Err(PipelineError::SchemaMismatch {
                expected: required,
                got,
            });
        }
        let recoded = self.recoder.recode_form(raw_columns, form);
        let x = self.preprocessor.transform(&recoded.frame)?;
        Ok(FeatureRow::new(
            self.feature_names().to_vec(),
            x.row(0).to_vec(),
        ))
    }

    pub fn predict_form(&self, form: &BTreeMap<String, String>) -> Result<Prediction, PipelineError> {
        self.predict_encoded(&self.encode_form(form)?)
    }

    /// Predict every row of a raw table with the training layout. Missing
    /// cells are passed on as empty answers.
    pub fn predict_table(&self, table: &RawTable) -> Result<Vec<Prediction>, PipelineError> {
        (0..table.n_rows())
            .map(|row| {
                let form: BTreeMap<String, String> = table
                    .headers()
                    .iter()
                    .enumerate()
                    .map(|(col, name)| {
                        (name.clone(), table.value(row, col).unwrap_or_default().to_string())
                    })
                    .collect();
                self.predict_form(&form)
            })
            .collect()
    }
}
