//! Class balancing of the training data.

mod smote;

pub use smote::Smote;
