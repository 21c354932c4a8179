//! CART decision tree with Gini impurity.

use crate::preprocessing::PreprocessingError;
use ndarray::{Array2, ArrayView1};
use rand::rngs::StdRng;
use rand::seq::index;
use serde::{Deserialize, Serialize};

/// Number of features considered at each split.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum MaxFeatures {
    All,
    /// `floor(sqrt(n_features))`, at least 1.
    #[default]
    Sqrt,
    Fixed(usize),
}

impl MaxFeatures {
    pub fn resolve(&self, n_features: usize) -> usize {
        let k = match self {
            MaxFeatures::All => n_features,
            MaxFeatures::Sqrt => (n_features as f64).sqrt() as usize,
            MaxFeatures::Fixed(k) => *k,
        };
        k.clamp(1, n_features.max(1))
    }
}

/// Growth limits of a single tree.
#[derive(Clone, Debug, PartialEq)]
pub struct DecisionTreeConfig {
    pub max_depth: Option<usize>,
    pub min_samples_split: usize,
    pub min_samples_leaf: usize,
    pub max_features: MaxFeatures,
}

impl Default for DecisionTreeConfig {
    fn default() -> Self {
        Self {
            max_depth: None,
            min_samples_split: 2,
            min_samples_leaf: 1,
            max_features: MaxFeatures::Sqrt,
        }
    }
}

/// Tree node, stored in a flat arena. Children are arena indices.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum Node {
    /// Class frequencies of the training samples that reached the leaf.
    Leaf { distribution: Vec<f64> },
    /// Samples with `x[feature] <= threshold` go left.
    Split {
        feature: usize,
        threshold: f64,
        left: usize,
        right: usize,
    },
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DecisionTree {
    nodes: Vec<Node>,
    n_classes: usize,
    n_features: usize,
}

fn gini(counts: &[usize], total: usize) -> f64 {
    if total == 0 {
        return 0.0;
    }
    let total = total as f64;
    1.0 - counts
        .iter()
        .map(|&c| {
            let p = c as f64 / total;
            p * p
        })
        .sum::<f64>()
}

struct BestSplit {
    feature: usize,
    threshold: f64,
    impurity: f64,
}

struct Builder<'a> {
    x: &'a Array2<f64>,
    y: &'a [usize],
    n_classes: usize,
    config: &'a DecisionTreeConfig,
    rng: &'a mut StdRng,
    nodes: Vec<Node>,
}

impl<'a> Builder<'a> {
    fn class_counts(&self, samples: &[usize]) -> Vec<usize> {
        let mut counts = vec![0; self.n_classes];
        for &s in samples {
            counts[self.y[s]] += 1;
        }
        counts
    }

    fn leaf(&mut self, counts: &[usize], total: usize) -> usize {
        let distribution = counts.iter().map(|&c| c as f64 / total as f64).collect();
        self.nodes.push(Node::Leaf { distribution });
        self.nodes.len() - 1
    }

    fn grow(&mut self, samples: &mut [usize], depth: usize) -> usize {
        let counts = self.class_counts(samples);
        let n = samples.len();
        let pure = counts.iter().filter(|&&c| c > 0).count() <= 1;
        let depth_reached = self.config.max_depth.map_or(false, |d| depth >= d);
        if pure || depth_reached || n < self.config.min_samples_split {
            return self.leaf(&counts, n);
        }

        let Some(best) = self.best_split(samples, &counts) else {
            return self.leaf(&counts, n);
        };

        // Partition in place: left block first.
        let mut mid = 0;
        for i in 0..n {
            if self.x[[samples[i], best.feature]] <= best.threshold {
                samples.swap(i, mid);
                mid += 1;
            }
        }

        let idx = self.nodes.len();
        self.nodes.push(Node::Leaf {
            distribution: Vec::new(),
        });
        let (left_samples, right_samples) = samples.split_at_mut(mid);
        let left = self.grow(left_samples, depth + 1);
        let right = self.grow(right_samples, depth + 1);
        self.nodes[idx] = Node::Split {
            feature: best.feature,
            threshold: best.threshold,
            left,
            right,
        };
        idx
    }

    fn best_split(&mut self, samples: &[usize], counts: &[usize]) -> Option<BestSplit> {
        let n_features = self.x.ncols();
        let k = self.config.max_features.resolve(n_features);
        // Features are visited in random order until `k` of them vary
        // within the node; constant features do not count.
        let visit_order = index::sample(&mut *self.rng, n_features, n_features).into_vec();
        let n = samples.len();
        let min_leaf = self.config.min_samples_leaf.max(1);

        let mut best: Option<BestSplit> = None;
        let mut order: Vec<usize> = samples.to_vec();
        let mut informative = 0;
        for feature in visit_order {
            if informative == k {
                break;
            }
            order.sort_by(|&a, &b| self.x[[a, feature]].total_cmp(&self.x[[b, feature]]));
            if self.x[[order[0], feature]] == self.x[[order[n - 1], feature]] {
                continue;
            }
            informative += 1;

            let mut left = vec![0usize; self.n_classes];
            let mut right = counts.to_vec();
            for i in 0..n - 1 {
                let class = self.y[order[i]];
                left[class] += 1;
                right[class] -= 1;

                let here = self.x[[order[i], feature]];
                let next = self.x[[order[i + 1], feature]];
                let n_left = i + 1;
                let n_right = n - n_left;
                if here == next || n_left < min_leaf || n_right < min_leaf {
                    continue;
                }

                let impurity = (n_left as f64 * gini(&left, n_left)
                    + n_right as f64 * gini(&right, n_right))
                    / n as f64;
                if best.as_ref().map_or(true, |b| impurity < b.impurity) {
                    let mut threshold = (here + next) / 2.0;
                    // midpoint can round up to `next` for adjacent floats
                    if threshold >= next {
                        threshold = here;
                    }
                    best = Some(BestSplit {
                        feature,
                        threshold,
                        impurity,
                    });
                }
            }
        }
        best
    }
}

impl DecisionTree {
    /// Grow a tree on the rows of `x` listed in `samples` (repeats allowed,
    /// as produced by bootstrapping).
    pub fn fit(
        x: &Array2<f64>,
        y: &[usize],
        samples: &[usize],
        n_classes: usize,
        config: &DecisionTreeConfig,
        rng: &mut StdRng,
    ) -> Result<Self, PreprocessingError> {
        if samples.is_empty() {
            return Err(PreprocessingError::EmptyData(
                "Cannot grow a tree without samples".to_string(),
            ));
        }
        if config.min_samples_split < 2 {
            return Err(PreprocessingError::InvalidParameter(format!(
                "min_samples_split must be at least 2, got {}",
                config.min_samples_split
            )));
        }
        if let Some(&bad) = y.iter().find(|&&c| c >= n_classes) {
            return Err(PreprocessingError::InvalidParameter(format!(
                "class code {} out of range for {} classes",
                bad, n_classes
            )));
        }

        let mut builder = Builder {
            x,
            y,
            n_classes,
            config,
            rng,
            nodes: Vec::new(),
        };
        let mut samples = samples.to_vec();
        builder.grow(&mut samples, 0);
        Ok(Self {
            nodes: builder.nodes,
            n_classes,
            n_features: x.ncols(),
        })
    }

    /// Class distribution of the leaf `row` falls into.
    pub fn predict_proba(&self, row: ArrayView1<f64>) -> &[f64] {
        let mut idx = 0;
        loop {
            match &self.nodes[idx] {
                Node::Leaf { distribution } => return distribution,
                Node::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => {
                    idx = if row[*feature] <= *threshold {
                        *left
                    } else {
                        *right
                    };
                }
            }
        }
    }

    pub fn n_classes(&self) -> usize {
        self.n_classes
    }

    pub fn n_features(&self) -> usize {
        self.n_features
    }

    pub fn n_leaves(&self) -> usize {
        self.nodes
            .iter()
            .filter(|n| matches!(n, Node::Leaf { .. }))
            .count()
    }

    pub fn depth(&self) -> usize {
        fn walk(nodes: &[Node], idx: usize) -> usize {
            match &nodes[idx] {
                Node::Leaf { .. } => 0,
                Node::Split { left, right, .. } => 1 + walk(nodes, *left).max(walk(nodes, *right)),
            }
        }
        walk(&self.nodes, 0)
    }

    /// Structural checks for trees restored from bytes.
    pub(crate) fn validate(&self) -> Result<(), PreprocessingError> {
        if self.nodes.is_empty() {
            return Err(PreprocessingError::InvalidParameter(
                "tree has no nodes".to_string(),
            ));
        }
        for (idx, node) in self.nodes.iter().enumerate() {
            match node {
                Node::Leaf { distribution } if distribution.len() != self.n_classes => {
                    return Err(PreprocessingError::InvalidShape {
                        expected: format!("{} class frequencies", self.n_classes),
                        got: format!("{} in node {}", distribution.len(), idx),
                    });
                }
                Node::Split {
                    feature,
                    left,
                    right,
                    ..
                } if *feature >= self.n_features
                    || *left <= idx
                    || *right <= idx
                    || *left >= self.nodes.len()
                    || *right >= self.nodes.len() =>
                {
                    return Err(PreprocessingError::InvalidParameter(format!(
                        "malformed split at node {}",
                        idx
                    )));
                }
                _ => {}
            }
        }
        Ok(())
    }
}
