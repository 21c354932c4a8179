//! Data splitting, cross-validation and hyperparameter search.

pub mod grid;
pub mod kfold;
pub mod split;

pub use grid::{CvResult, GridSearchCV, GridSearchResult, ParamGrid};
pub use kfold::{Fold, StratifiedKFold};
pub use split::{train_test_split, train_test_split_indices, SplitIndices};
