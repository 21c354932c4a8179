//! Exhaustive hyperparameter search with cross-validation.

use crate::dataset::InMemoryDataset;
use crate::metrics::accuracy;
use crate::model::{Classifier, Fitted, InferenceModel, RandomForest, RandomForestParams};
use crate::model_selection::kfold::StratifiedKFold;
use crate::preprocessing::PreprocessingError;
use log::{debug, info};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

/// Candidate values per forest hyperparameter.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ParamGrid {
    pub n_estimators: Vec<usize>,
    pub max_depth: Vec<Option<usize>>,
    pub min_samples_split: Vec<usize>,
}

impl Default for ParamGrid {
    fn default() -> Self {
        Self {
            n_estimators: vec![100, 200],
            max_depth: vec![None, Some(10), Some(20)],
            min_samples_split: vec![2, 5],
        }
    }
}

impl ParamGrid {
    pub fn len(&self) -> usize {
        self.n_estimators.len() * self.max_depth.len() * self.min_samples_split.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Every combination applied over `base`. Keys vary in sorted-name
    /// order: `max_depth` slowest, `n_estimators` fastest.
    pub fn candidates(&self, base: &RandomForestParams) -> Vec<RandomForestParams> {
        let mut out = Vec::with_capacity(self.len());
        for &max_depth in &self.max_depth {
            for &min_samples_split in &self.min_samples_split {
                for &n_estimators in &self.n_estimators {
                    out.push(
                        base.clone()
                            .with_max_depth(max_depth)
                            .with_min_samples_split(min_samples_split)
                            .with_n_estimators(n_estimators),
                    );
                }
            }
        }
        out
    }
}

/// Cross-validation outcome of one candidate.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CvResult {
    pub params: RandomForestParams,
    pub fold_scores: Vec<f64>,
    pub mean_score: f64,
    pub std_score: f64,
    /// 1 for the best candidate; equal scores share a rank.
    pub rank: usize,
}

#[derive(Clone, Debug)]
pub struct GridSearchResult {
    pub best_params: RandomForestParams,
    pub best_score: f64,
    pub best_index: usize,
    pub cv_results: Vec<CvResult>,
    /// Best candidate refitted on the whole training data.
    pub best_estimator: RandomForest<Fitted>,
}

#[derive(Clone, Debug)]
pub struct GridSearchCV {
    grid: ParamGrid,
    base: RandomForestParams,
    cv: StratifiedKFold,
    verbose: bool,
}

impl GridSearchCV {
    pub fn new(grid: ParamGrid) -> Self {
        Self {
            grid,
            base: RandomForestParams::default(),
            cv: StratifiedKFold::default(),
            verbose: false,
        }
    }

    /// Parameters not covered by the grid (seed, bootstrap, max_features).
    pub fn with_base_params(mut self, base: RandomForestParams) -> Self {
        self.base = base;
        self
    }

    pub fn with_cv(mut self, cv: StratifiedKFold) -> Self {
        self.cv = cv;
        self
    }

    /// Log every candidate's score at `info` instead of `debug`.
    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    /// Score every candidate by mean fold accuracy, pick the best (first on
    /// ties) and refit it on all of `data`.
    pub fn fit(
        &self,
        data: &InMemoryDataset,
        n_classes: usize,
    ) -> Result<GridSearchResult, PreprocessingError> {
        if self.grid.is_empty() {
            return Err(PreprocessingError::InvalidParameter(
                "parameter grid is empty".to_string(),
            ));
        }
        let candidates = self.grid.candidates(&self.base);
        let folds = self.cv.split(data.y())?;
        let fold_data: Vec<(InMemoryDataset, InMemoryDataset)> = folds
            .iter()
            .map(|fold| (data.select(&fold.train), data.select(&fold.validation)))
            .collect();

        info!(
            "Grid search: {} candidates x {} folds = {} fits",
            candidates.len(),
            fold_data.len(),
            candidates.len() * fold_data.len()
        );

        let jobs: Vec<(usize, usize)> = (0..candidates.len())
            .flat_map(|c| (0..fold_data.len()).map(move |f| (c, f)))
            .collect();
        let scores = jobs
            .par_iter()
            .map(|&(c, f)| -> Result<f64, PreprocessingError> {
                let (train, validation) = &fold_data[f];
                let model = RandomForest::new(candidates[c].clone()).fit(train, n_classes)?;
                Ok(accuracy(validation.y(), &model.predict_batch(validation.x())))
            })
            .collect::<Result<Vec<f64>, PreprocessingError>>()?;

        let n_folds = fold_data.len();
        let mut cv_results: Vec<CvResult> = candidates
            .into_iter()
            .enumerate()
            .map(|(c, params)| {
                let fold_scores = scores[c * n_folds..(c + 1) * n_folds].to_vec();
                let mean_score = fold_scores.iter().sum::<f64>() / n_folds as f64;
                let std_score = (fold_scores
                    .iter()
                    .map(|s| (s - mean_score).powi(2))
                    .sum::<f64>()
                    / n_folds as f64)
                    .sqrt();
                CvResult {
                    params,
                    fold_scores,
                    mean_score,
                    std_score,
                    rank: 0,
                }
            })
            .collect();

        let means: Vec<f64> = cv_results.iter().map(|r| r.mean_score).collect();
        for result in cv_results.iter_mut() {
            result.rank = 1 + means.iter().filter(|&&m| m > result.mean_score).count();
        }

        for result in &cv_results {
            let line = format!(
                "max_depth={:?} min_samples_split={} n_estimators={}: {:.4} (+/- {:.4})",
                result.params.max_depth,
                result.params.min_samples_split,
                result.params.n_estimators,
                result.mean_score,
                result.std_score
            );
            if self.verbose {
                info!("{}", line);
            } else {
                debug!("{}", line);
            }
        }

        let mut best_index = 0;
        for (i, result) in cv_results.iter().enumerate() {
            if result.mean_score > cv_results[best_index].mean_score {
                best_index = i;
            }
        }
        let best_params = cv_results[best_index].params.clone();
        let best_score = cv_results[best_index].mean_score;
        info!("Best CV accuracy {:.4} with {:?}", best_score, best_params);

        let best_estimator = RandomForest::new(best_params.clone()).fit(data, n_classes)?;

        Ok(GridSearchResult {
            best_params,
            best_score,
            best_index,
            cv_results,
            best_estimator,
        })
    }
}
