//! Raw survey table loaded from delimited text.

use crate::pipeline::PipelineError;
use csv::{ReaderBuilder, Trim};
use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

/// Untyped survey table: one row per surveyed household/child.
///
/// Empty and whitespace-only cells are stored as `None`. Every row has
/// exactly `headers.len()` cells.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RawTable {
    headers: Vec<String>,
    rows: Vec<Vec<Option<String>>>,
}

fn clean_cell(cell: &str) -> Option<String> {
    let trimmed = cell.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

impl RawTable {
    /// Build a table from headers and rows. Short rows are padded with
    /// missing cells, long rows are truncated.
    pub fn new(headers: Vec<String>, rows: Vec<Vec<Option<String>>>) -> Self {
        let width = headers.len();
        let rows = rows
            .into_iter()
            .map(|mut row| {
                row.resize(width, None);
                row
            })
            .collect();
        Self { headers, rows }
    }

    /// Build a table from string literals, treating blank cells as missing.
    pub fn from_records(headers: &[&str], rows: &[Vec<&str>]) -> Self {
        Self::new(
            headers.iter().map(|h| h.trim().to_string()).collect(),
            rows.iter()
                .map(|row| row.iter().map(|cell| clean_cell(cell)).collect())
                .collect(),
        )
    }

    /// Build a single-row table from form fields, laid out over `columns`.
    /// Columns absent from the form become missing cells.
    pub fn from_form(columns: &[String], form: &BTreeMap<String, String>) -> Self {
        let row = columns
            .iter()
            .map(|c| form.get(c).and_then(|v| clean_cell(v)))
            .collect();
        Self::new(columns.to_vec(), vec![row])
    }

    /// Read a delimited file.
    ///
    /// # Errors
    /// [`PipelineError::MissingInput`] when the file does not exist,
    /// [`PipelineError::Csv`] when it cannot be parsed.
    pub fn from_csv_path<P: AsRef<Path>>(path: P, delimiter: u8) -> Result<Self, PipelineError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(PipelineError::MissingInput(path.to_path_buf()));
        }
        let file = File::open(path)?;
        Self::from_reader(BufReader::new(file), delimiter)
    }

    /// Read delimited text from any reader. The first record is the header.
    pub fn from_reader<R: Read>(reader: R, delimiter: u8) -> Result<Self, PipelineError> {
        let mut rdr = ReaderBuilder::new()
            .delimiter(delimiter)
            .flexible(true)
            .trim(Trim::All)
            .from_reader(reader);

        let headers: Vec<String> = rdr
            .headers()?
            .iter()
            .map(|h| h.trim_start_matches('\u{feff}').trim().to_string())
            .collect();
        if headers.is_empty() || headers.iter().all(String::is_empty) {
            return Err(PipelineError::Csv("input has no header row".to_string()));
        }

        let mut rows = Vec::new();
        for result in rdr.records() {
            let record = result?;
            rows.push(record.iter().map(clean_cell).collect());
        }

        Ok(Self::new(headers, rows))
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn n_rows(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.column_index(name).is_some()
    }

    /// Cell at `row` in column `col`.
    pub fn value(&self, row: usize, col: usize) -> Option<&str> {
        self.rows
            .get(row)
            .and_then(|r| r.get(col))
            .and_then(|cell| cell.as_deref())
    }

    /// All cells of a named column, or `None` when the column is absent.
    pub fn column(&self, name: &str) -> Option<Vec<Option<&str>>> {
        let idx = self.column_index(name)?;
        Some(self.rows.iter().map(|r| r[idx].as_deref()).collect())
    }

    /// Cells of a named column; an absent column reads as all-missing.
    pub fn column_or_missing(&self, name: &str) -> Vec<Option<&str>> {
        self.column(name)
            .unwrap_or_else(|| vec![None; self.n_rows()])
    }
}
