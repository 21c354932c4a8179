/// A marker type indicating that a model is **not yet trained**.
///
/// Used as the state parameter of [`RandomForest`](crate::model::RandomForest):
/// a `RandomForest<Unfitted>` only carries hyperparameters and can be fitted,
/// while prediction methods exist only on `RandomForest<Fitted>`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Unfitted;

/// A marker type indicating that a model has been **fully trained**.
///
/// A fitted forest holds its trees and the hyperparameters it was grown
/// with, and nothing else; it is what gets persisted.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Fitted;
