//! Preprocessing: imputation, categorical encoding and target encoding.
//!
//! Every transformer comes in two states. The unfitted value
//! ([`Transformer`]) holds configuration and learns from data; the fitted
//! value ([`FittedTransformer`]) applies what was learned and can be stored
//! through its parameter struct.

pub mod encoding;
pub mod error;
pub mod imputation;
pub mod preprocessor;
pub mod target;
pub mod traits;

pub use encoding::{FittedLabelEncoder, HandleUnknown, LabelEncoder, LabelEncoderParams};
pub use error::PreprocessingError;
pub use imputation::{FittedSimpleImputer, SimpleImputer, SimpleImputerParams};
pub use preprocessor::{FeatureParams, FittedPreprocessor, Preprocessor, PreprocessorParams};
pub use target::{EncodedTarget, TargetEncoder, TargetRule, ALWAYS_LABEL, NOT_ALWAYS_LABEL};
pub use traits::{FittedTransformer, Transformer};
