//! Random forest classifier.
//!
//! Trees are grown in parallel with rayon. Tree `i` draws its bootstrap
//! sample and feature subsets from an RNG seeded with `seed + i`, so a
//! forest depends only on its parameters and data, not on thread scheduling.

use crate::dataset::InMemoryDataset;
use crate::model::tree::{DecisionTree, DecisionTreeConfig, MaxFeatures};
use crate::model::{Classifier, Fitted, InferenceModel, Unfitted};
use crate::preprocessing::PreprocessingError;
use log::debug;
use ndarray::ArrayView1;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::marker::PhantomData;

/// Hyperparameters of a [`RandomForest`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RandomForestParams {
    pub n_estimators: usize,
    pub max_depth: Option<usize>,
    pub min_samples_split: usize,
    pub max_features: MaxFeatures,
    pub bootstrap: bool,
    pub seed: u64,
}

impl Default for RandomForestParams {
    fn default() -> Self {
        Self {
            n_estimators: 100,
            max_depth: None,
            min_samples_split: 2,
            max_features: MaxFeatures::Sqrt,
            bootstrap: true,
            seed: 42,
        }
    }
}

impl RandomForestParams {
    pub fn with_n_estimators(mut self, n_estimators: usize) -> Self {
        self.n_estimators = n_estimators;
        self
    }

    pub fn with_max_depth(mut self, max_depth: Option<usize>) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub fn with_min_samples_split(mut self, min_samples_split: usize) -> Self {
        self.min_samples_split = min_samples_split;
        self
    }

    pub fn with_max_features(mut self, max_features: MaxFeatures) -> Self {
        self.max_features = max_features;
        self
    }

    pub fn with_bootstrap(mut self, bootstrap: bool) -> Self {
        self.bootstrap = bootstrap;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    fn tree_config(&self) -> DecisionTreeConfig {
        DecisionTreeConfig {
            max_depth: self.max_depth,
            min_samples_split: self.min_samples_split,
            min_samples_leaf: 1,
            max_features: self.max_features,
        }
    }
}

/// Serializable state of a fitted forest.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ForestParams {
    pub params: RandomForestParams,
    pub n_classes: usize,
    pub n_features: usize,
    pub trees: Vec<DecisionTree>,
}

/// Random forest with Gini CART trees; `S` is [`Unfitted`] or [`Fitted`].
#[derive(Clone, Debug)]
pub struct RandomForest<S> {
    params: RandomForestParams,
    trees: Vec<DecisionTree>,
    n_classes: usize,
    n_features: usize,
    _state: PhantomData<S>,
}

impl<S> RandomForest<S> {
    pub fn params(&self) -> &RandomForestParams {
        &self.params
    }
}

impl RandomForest<Unfitted> {
    pub fn new(params: RandomForestParams) -> Self {
        Self {
            params,
            trees: Vec::new(),
            n_classes: 0,
            n_features: 0,
            _state: PhantomData,
        }
    }
}

impl Default for RandomForest<Unfitted> {
    fn default() -> Self {
        Self::new(RandomForestParams::default())
    }
}

impl Classifier for RandomForest<Unfitted> {
    type Fitted = RandomForest<Fitted>;

    fn fit(
        &self,
        data: &InMemoryDataset,
        n_classes: usize,
    ) -> Result<RandomForest<Fitted>, PreprocessingError> {
        if self.params.n_estimators == 0 {
            return Err(PreprocessingError::InvalidParameter(
                "n_estimators must be at least 1".to_string(),
            ));
        }
        if data.has_missing() {
            return Err(PreprocessingError::MissingValues(
                "RandomForest cannot be fitted on data with NaN".to_string(),
            ));
        }

        let x = data.x();
        let y = data.y();
        let n = data.n_samples();
        let config = self.params.tree_config();
        let trees = (0..self.params.n_estimators)
            .into_par_iter()
            .map(|i| {
                let mut rng = StdRng::seed_from_u64(self.params.seed.wrapping_add(i as u64));
                let samples: Vec<usize> = if self.params.bootstrap {
                    (0..n).map(|_| rng.gen_range(0..n)).collect()
                } else {
                    (0..n).collect()
                };
                DecisionTree::fit(x, y, &samples, n_classes, &config, &mut rng)
            })
            .collect::<Result<Vec<_>, _>>()?;

        debug!(
            "Fitted forest: {} trees, {} samples, {} features",
            trees.len(),
            n,
            data.n_features()
        );

        Ok(RandomForest {
            params: self.params.clone(),
            trees,
            n_classes,
            n_features: data.n_features(),
            _state: PhantomData,
        })
    }
}

impl RandomForest<Fitted> {
    pub fn trees(&self) -> &[DecisionTree] {
        &self.trees
    }
}

impl InferenceModel for RandomForest<Fitted> {
    type Params = ForestParams;

    fn n_classes(&self) -> usize {
        self.n_classes
    }

    fn n_features_in(&self) -> usize {
        self.n_features
    }

    fn predict_proba(&self, row: ArrayView1<f64>) -> Vec<f64> {
        let mut proba = vec![0.0; self.n_classes];
        for tree in &self.trees {
            for (p, t) in proba.iter_mut().zip(tree.predict_proba(row)) {
                *p += t;
            }
        }
        let n_trees = self.trees.len() as f64;
        proba.iter_mut().for_each(|p| *p /= n_trees);
        proba
    }

    fn extract_params(&self) -> ForestParams {
        ForestParams {
            params: self.params.clone(),
            n_classes: self.n_classes,
            n_features: self.n_features,
            trees: self.trees.clone(),
        }
    }

    fn from_params(params: ForestParams) -> Result<Self, PreprocessingError> {
        if params.trees.is_empty() {
            return Err(PreprocessingError::InvalidParameter(
                "forest has no trees".to_string(),
            ));
        }
        for tree in &params.trees {
            if tree.n_classes() != params.n_classes || tree.n_features() != params.n_features {
                return Err(PreprocessingError::FeatureMismatch {
                    expected_features: params.n_features,
                    got_features: tree.n_features(),
                });
            }
            tree.validate()?;
        }
        Ok(RandomForest {
            params: params.params,
            trees: params.trees,
            n_classes: params.n_classes,
            n_features: params.n_features,
            _state: PhantomData,
        })
    }
}
