//! Error types for preprocessing, balancing and model fitting.

use std::fmt;

/// Error type for preprocessing operations.
#[derive(Debug)]
pub enum PreprocessingError {
    /// Shape mismatch between expected and actual dimensions.
    InvalidShape { expected: String, got: String },
    /// Numerical computation error (overflow, degenerate statistics, etc.).
    NumericalError(String),
    /// Data contains missing values (NaN) when not expected.
    MissingValues(String),
    /// Invalid hyperparameter value.
    InvalidParameter(String),
    /// Serialization or deserialization error.
    SerializationError(String),
    /// I/O error during file operations.
    IoError(String),
    /// Empty data provided where non-empty was required.
    EmptyData(String),
    /// Feature dimension mismatch.
    FeatureMismatch {
        expected_features: usize,
        got_features: usize,
    },
    /// A structurally required column is absent from the input.
    MissingColumn(String),
    /// A categorical value was not seen during fit.
    UnknownCategory { column: String, value: String },
    /// A class has too few samples for the requested operation.
    InsufficientSamples {
        class: usize,
        count: usize,
        required: usize,
        operation: &'static str,
    },
}

impl fmt::Display for PreprocessingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PreprocessingError::InvalidShape { expected, got } => {
                write!(f, "Invalid shape: expected {}, got {}", expected, got)
            }
            PreprocessingError::NumericalError(msg) => {
                write!(f, "Numerical error: {}", msg)
            }
            PreprocessingError::MissingValues(msg) => {
                write!(f, "Missing values: {}", msg)
            }
            PreprocessingError::InvalidParameter(msg) => {
                write!(f, "Invalid parameter: {}", msg)
            }
            PreprocessingError::SerializationError(msg) => {
                write!(f, "Serialization error: {}", msg)
            }
            PreprocessingError::IoError(msg) => {
                write!(f, "I/O error: {}", msg)
            }
            PreprocessingError::EmptyData(msg) => {
                write!(f, "Empty data: {}", msg)
            }
            PreprocessingError::FeatureMismatch {
                expected_features,
                got_features,
            } => {
                write!(
                    f,
                    "Feature mismatch: expected {} features, got {}",
                    expected_features, got_features
                )
            }
            PreprocessingError::MissingColumn(column) => {
                write!(f, "Missing column: required column '{}' is absent", column)
            }
            PreprocessingError::UnknownCategory { column, value } => {
                write!(
                    f,
                    "Unknown category: value '{}' was not seen in column '{}'",
                    value, column
                )
            }
            PreprocessingError::InsufficientSamples {
                class,
                count,
                required,
                operation,
            } => {
                write!(
                    f,
                    "Insufficient samples: class {} has {} samples, {} requires at least {}",
                    class, count, operation, required
                )
            }
        }
    }
}

impl std::error::Error for PreprocessingError {}

impl From<std::io::Error> for PreprocessingError {
    fn from(err: std::io::Error) -> Self {
        PreprocessingError::IoError(err.to_string())
    }
}

impl From<bincode::Error> for PreprocessingError {
    fn from(err: bincode::Error) -> Self {
        PreprocessingError::SerializationError(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_invalid_shape() {
        let err = PreprocessingError::InvalidShape {
            expected: "(2, 3)".to_string(),
            got: "(3, 2)".to_string(),
        };
        assert!(err.to_string().contains("Invalid shape"));
    }

    #[test]
    fn test_error_display_missing_column_names_column() {
        let err = PreprocessingError::MissingColumn("acesso_alimentos_basicos".to_string());
        let msg = err.to_string();
        assert!(msg.contains("Missing column"));
        assert!(msg.contains("acesso_alimentos_basicos"));
    }

    #[test]
    fn test_error_display_unknown_category() {
        let err = PreprocessingError::UnknownCategory {
            column: "estado".to_string(),
            value: "Atlântida".to_string(),
        };
        assert!(err.to_string().contains("Atlântida"));
    }

    #[test]
    fn test_error_display_insufficient_samples() {
        let err = PreprocessingError::InsufficientSamples {
            class: 1,
            count: 3,
            required: 5,
            operation: "StratifiedKFold",
        };
        let msg = err.to_string();
        assert!(msg.contains("class 1"));
        assert!(msg.contains("StratifiedKFold"));
    }

    #[test]
    fn test_error_display_feature_mismatch() {
        let err = PreprocessingError::FeatureMismatch {
            expected_features: 5,
            got_features: 3,
        };
        assert!(err.to_string().contains("Feature mismatch"));
    }

    #[test]
    fn test_error_from_io_error() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "test");
        let err: PreprocessingError = io_err.into();
        assert!(matches!(err, PreprocessingError::IoError(_)));
    }

    #[test]
    fn test_error_from_bincode_error() {
        let bad_bytes: &[u8] = &[0xff, 0xff, 0xff, 0xff];
        let bincode_result: Result<String, bincode::Error> = bincode::deserialize(bad_bytes);
        if let Err(e) = bincode_result {
            let err: PreprocessingError = e.into();
            assert!(matches!(err, PreprocessingError::SerializationError(_)));
        }
    }

    #[test]
    fn test_error_is_std_error() {
        let err = PreprocessingError::InvalidParameter("test".to_string());
        let _: &dyn std::error::Error = &err;
    }
}
