//! Missing value imputation.
//!
//! NaN marks a missing cell in numeric matrices.

mod simple;

pub use simple::{FittedSimpleImputer, SimpleImputer, SimpleImputerParams};
