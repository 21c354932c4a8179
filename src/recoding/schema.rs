use serde::{Deserialize, Serialize};

use super::columns;

/// How the non-table columns of the survey are typed during recoding.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SurveySchema {
    /// Ages written as `"<N> meses"`.
    pub month_columns: Vec<String>,
    /// Columns parsed as plain numbers (missing when unparsable).
    pub numeric_columns: Vec<String>,
    /// Multi-valued benefits field, expanded into indicator columns.
    pub benefits_column: Option<String>,
    pub food_access_column: String,
    pub cough_column: String,
    pub kitchen_column: String,
    /// Type remaining columns as numeric when every present value parses.
    pub infer_numeric: bool,
}

impl Default for SurveySchema {
    fn default() -> Self {
        Self {
            month_columns: vec![columns::IDADE_MESES.to_string()],
            numeric_columns: vec![columns::IDADE_ANOS.to_string()],
            benefits_column: Some(columns::BENEFICIOS.to_string()),
            food_access_column: columns::ACESSO_ALIMENTOS.to_string(),
            cough_column: columns::PRESENCA_TOSSE.to_string(),
            kitchen_column: columns::POSSUI_COZINHA.to_string(),
            infer_numeric: true,
        }
    }
}

impl SurveySchema {
    pub fn with_month_columns(mut self, month_columns: Vec<String>) -> Self {
        self.month_columns = month_columns;
        self
    }

    pub fn with_numeric_columns(mut self, numeric_columns: Vec<String>) -> Self {
        self.numeric_columns = numeric_columns;
        self
    }

    pub fn with_benefits_column(mut self, benefits_column: Option<String>) -> Self {
        self.benefits_column = benefits_column;
        self
    }

    pub fn with_infer_numeric(mut self, infer_numeric: bool) -> Self {
        self.infer_numeric = infer_numeric;
        self
    }

    pub fn is_month_column(&self, name: &str) -> bool {
        self.month_columns.iter().any(|c| c == name)
    }

    pub fn is_numeric_column(&self, name: &str) -> bool {
        self.numeric_columns.iter().any(|c| c == name)
    }

    pub fn is_benefits_column(&self, name: &str) -> bool {
        self.benefits_column.as_deref() == Some(name)
    }

    /// Schema that types `inferred` columns as numeric and infers nothing
    /// else, so a later recode types columns exactly as this one did.
    pub fn freeze(&self, inferred: &[String]) -> Self {
        let mut frozen = self.clone();
        for name in inferred {
            if !frozen.is_numeric_column(name) {
                frozen.numeric_columns.push(name.clone());
            }
        }
        frozen.infer_numeric = false;
        frozen
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_schema() {
        let schema = SurveySchema::default();
        assert!(schema.is_month_column("idade_meses"));
        assert!(schema.is_numeric_column("idade_anos"));
        assert!(schema.is_benefits_column("beneficios"));
        assert!(schema.infer_numeric);
    }

    #[test]
    fn test_freeze_adds_inferred_columns_once() {
        let frozen = SurveySchema::default()
            .freeze(&["peso".to_string(), "idade_anos".to_string()]);
        assert_eq!(frozen.numeric_columns, vec!["idade_anos", "peso"]);
        assert!(!frozen.infer_numeric);
    }
}
