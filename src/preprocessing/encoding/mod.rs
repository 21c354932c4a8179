//! Categorical feature encoding.
//!
//! Survey answers that are not covered by a recoding table stay as text until
//! preprocessing, where [`LabelEncoder`] maps each distinct value of a column
//! to a dense integer code (0, 1, 2, ...) in sorted order.

mod label;

pub use label::{FittedLabelEncoder, LabelEncoder, LabelEncoderParams};

/// Strategy for handling unknown categories during transform.
#[derive(Clone, Copy, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub enum HandleUnknown {
    /// Raise an error when unknown categories are encountered.
    Error,
    /// Map unknown categories to the column's most frequent code.
    #[default]
    Ignore,
}
