//! Typed, column-oriented table produced by recoding.

use crate::preprocessing::PreprocessingError;

/// One named column of a [`Frame`].
#[derive(Clone, Debug, PartialEq)]
pub enum Column {
    /// Numeric values; `None` is missing.
    Numeric(Vec<Option<f64>>),
    /// Free-text categorical values; `None` is missing.
    Categorical(Vec<Option<String>>),
}

impl Column {
    pub fn len(&self) -> usize {
        match self {
            Column::Numeric(v) => v.len(),
            Column::Categorical(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn is_numeric(&self) -> bool {
        matches!(self, Column::Numeric(_))
    }

    /// Number of missing cells.
    pub fn missing_count(&self) -> usize {
        match self {
            Column::Numeric(v) => v.iter().filter(|x| x.is_none()).count(),
            Column::Categorical(v) => v.iter().filter(|x| x.is_none()).count(),
        }
    }

    /// Keep only the rows at `indices`, in that order.
    pub fn select(&self, indices: &[usize]) -> Column {
        match self {
            Column::Numeric(v) => Column::Numeric(indices.iter().map(|&i| v[i]).collect()),
            Column::Categorical(v) => {
                Column::Categorical(indices.iter().map(|&i| v[i].clone()).collect())
            }
        }
    }
}

/// Ordered collection of equally long named columns.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Frame {
    names: Vec<String>,
    columns: Vec<Column>,
}

impl Frame {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a column.
    ///
    /// # Errors
    /// `InvalidShape` when the length differs from existing columns,
    /// `InvalidParameter` when the name is already taken.
    pub fn push_column(
        &mut self,
        name: impl Into<String>,
        column: Column,
    ) -> Result<(), PreprocessingError> {
        let name = name.into();
        if self.names.contains(&name) {
            return Err(PreprocessingError::InvalidParameter(format!(
                "duplicate column '{}'",
                name
            )));
        }
        if let Some(first) = self.columns.first() {
            if first.len() != column.len() {
                return Err(PreprocessingError::InvalidShape {
                    expected: format!("{} rows", first.len()),
                    got: format!("{} rows in column '{}'", column.len(), name),
                });
            }
        }
        self.names.push(name);
        self.columns.push(column);
        Ok(())
    }

    pub fn column(&self, name: &str) -> Option<&Column> {
        self.names
            .iter()
            .position(|n| n == name)
            .map(|idx| &self.columns[idx])
    }

    pub fn remove_column(&mut self, name: &str) -> Option<Column> {
        let idx = self.names.iter().position(|n| n == name)?;
        self.names.remove(idx);
        Some(self.columns.remove(idx))
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn n_rows(&self) -> usize {
        self.columns.first().map(Column::len).unwrap_or(0)
    }

    pub fn n_columns(&self) -> usize {
        self.columns.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Column)> {
        self.names.iter().map(String::as_str).zip(self.columns.iter())
    }

    /// Keep only the rows at `indices`, in that order.
    pub fn select_rows(&self, indices: &[usize]) -> Frame {
        Frame {
            names: self.names.clone(),
            columns: self.columns.iter().map(|c| c.select(indices)).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_push_and_lookup() {
        let mut frame = Frame::new();
        frame
            .push_column("idade_anos", Column::Numeric(vec![Some(3.0), None]))
            .unwrap();
        frame
            .push_column(
                "estado",
                Column::Categorical(vec![Some("Bahia".to_string()), None]),
            )
            .unwrap();

        assert_eq!(frame.n_rows(), 2);
        assert_eq!(frame.names(), &["idade_anos", "estado"]);
        assert_eq!(frame.column("idade_anos").unwrap().missing_count(), 1);
        assert!(frame.column("renda").is_none());
    }

    #[test]
    fn test_push_rejects_length_mismatch() {
        let mut frame = Frame::new();
        frame
            .push_column("a", Column::Numeric(vec![Some(1.0)]))
            .unwrap();
        let result = frame.push_column("b", Column::Numeric(vec![Some(1.0), Some(2.0)]));
        assert!(matches!(result, Err(PreprocessingError::InvalidShape { .. })));
    }

    #[test]
    fn test_push_rejects_duplicate_name() {
        let mut frame = Frame::new();
        frame.push_column("a", Column::Numeric(vec![])).unwrap();
        assert!(frame.push_column("a", Column::Numeric(vec![])).is_err());
    }

    #[test]
    fn test_remove_and_select_rows() {
        let mut frame = Frame::new();
        frame
            .push_column("a", Column::Numeric(vec![Some(1.0), Some(2.0), Some(3.0)]))
            .unwrap();
        frame
            .push_column("b", Column::Numeric(vec![Some(4.0), Some(5.0), Some(6.0)]))
            .unwrap();

        let selected = frame.select_rows(&[2, 0]);
        assert_eq!(
            selected.column("a"),
            Some(&Column::Numeric(vec![Some(3.0), Some(1.0)]))
        );

        assert!(frame.remove_column("a").is_some());
        assert_eq!(frame.names(), &["b"]);
    }
}
