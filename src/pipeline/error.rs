//! Errors that abort the training pipeline or an inference call.

use crate::preprocessing::PreprocessingError;
use std::fmt;
use std::path::PathBuf;

/// Fatal pipeline error.
///
/// Value-level problems (unmapped categories, unparsable numbers) never
/// surface here; they are replaced by sentinels or imputed in place.
#[derive(Debug)]
pub enum PipelineError {
    /// The input file does not exist.
    MissingInput(PathBuf),
    /// I/O failure while reading or writing a file.
    Io(String),
    /// The delimited input could not be parsed.
    Csv(String),
    /// A structurally required column (e.g. the target) is absent.
    MissingColumn(String),
    /// Invalid configuration, including training-time statistical
    /// preconditions such as too few samples per class for the CV folds.
    Configuration(String),
    /// Inference input does not match the training feature schema.
    SchemaMismatch {
        expected: Vec<String>,
        got: Vec<String>,
    },
    /// The model artifact could not be encoded or decoded.
    Serialization(String),
    /// Any other preprocessing or model failure.
    Preprocessing(PreprocessingError),
}

impl fmt::Display for PipelineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PipelineError::MissingInput(path) => {
                write!(f, "Missing input: file '{}' not found", path.display())
            }
            PipelineError::Io(msg) => write!(f, "I/O error: {}", msg),
            PipelineError::Csv(msg) => write!(f, "CSV error: {}", msg),
            PipelineError::MissingColumn(column) => {
                write!(f, "Missing column: required column '{}' is absent", column)
            }
            PipelineError::Configuration(msg) => write!(f, "Configuration error: {}", msg),
            PipelineError::SchemaMismatch { expected, got } => {
                let missing: Vec<&str> = expected
                    .iter()
                    .filter(|c| !got.contains(*c))
                    .map(String::as_str)
                    .collect();
                let extra: Vec<&str> = got
                    .iter()
                    .filter(|c| !expected.contains(*c))
                    .map(String::as_str)
                    .collect();
                write!(
                    f,
                    "Schema mismatch: expected {} columns, got {} (missing: [{}], unexpected: [{}])",
                    expected.len(),
                    got.len(),
                    missing.join(", "),
                    extra.join(", ")
                )?;
                if missing.is_empty() && extra.is_empty() {
                    write!(f, "; column order differs")?;
                }
                Ok(())
            }
            PipelineError::Serialization(msg) => write!(f, "Serialization error: {}", msg),
            PipelineError::Preprocessing(err) => write!(f, "{}", err),
        }
    }
}

impl std::error::Error for PipelineError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            PipelineError::Preprocessing(err) => Some(err),
            _ => None,
        }
    }
}

impl From<PreprocessingError> for PipelineError {
    fn from(err: PreprocessingError) -> Self {
        match err {
            PreprocessingError::MissingColumn(column) => PipelineError::MissingColumn(column),
            PreprocessingError::InsufficientSamples { .. } => {
                PipelineError::Configuration(err.to_string())
            }
            PreprocessingError::SerializationError(msg) => PipelineError::Serialization(msg),
            other => PipelineError::Preprocessing(other),
        }
    }
}

impl From<std::io::Error> for PipelineError {
    fn from(err: std::io::Error) -> Self {
        PipelineError::Io(err.to_string())
    }
}

impl From<csv::Error> for PipelineError {
    fn from(err: csv::Error) -> Self {
        PipelineError::Csv(err.to_string())
    }
}

impl From<bincode::Error> for PipelineError {
    fn from(err: bincode::Error) -> Self {
        PipelineError::Serialization(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_column_is_lifted() {
        let err: PipelineError = PreprocessingError::MissingColumn("alvo".to_string()).into();
        assert!(matches!(err, PipelineError::MissingColumn(ref c) if c == "alvo"));
    }

    #[test]
    fn test_insufficient_samples_is_configuration_error() {
        let err: PipelineError = PreprocessingError::InsufficientSamples {
            class: 0,
            count: 2,
            required: 5,
            operation: "StratifiedKFold",
        }
        .into();
        assert!(matches!(err, PipelineError::Configuration(_)));
    }

    #[test]
    fn test_schema_mismatch_lists_missing_and_extra() {
        let err = PipelineError::SchemaMismatch {
            expected: vec!["a".to_string(), "b".to_string()],
            got: vec!["a".to_string(), "c".to_string()],
        };
        let msg = err.to_string();
        assert!(msg.contains("missing: [b]"));
        assert!(msg.contains("unexpected: [c]"));
    }

    #[test]
    fn test_schema_mismatch_reports_reordering() {
        let err = PipelineError::SchemaMismatch {
            expected: vec!["a".to_string(), "b".to_string()],
            got: vec!["b".to_string(), "a".to_string()],
        };
        assert!(err.to_string().contains("order differs"));
    }

    #[test]
    fn test_missing_input_names_path() {
        let err = PipelineError::MissingInput(PathBuf::from("dados/entrevistas.csv"));
        assert!(err.to_string().contains("dados/entrevistas.csv"));
    }
}
