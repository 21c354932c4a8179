use log::{debug, warn};
use std::collections::BTreeMap;

use super::benefits::{benefit_column, parse_benefits, BENEFIT_CODES, TOTAL_BENEFITS_COLUMN};
use super::indicators::IndicatorScores;
use super::numeric::{parse_months, parse_number};
use super::schema::SurveySchema;
use super::table::{RecodingTable, SENTINEL_CODE};
use crate::dataset::{Column, Frame, RawTable};

/// Output of [`Recoder::recode`].
#[derive(Clone, Debug, PartialEq)]
pub struct RecodedTable {
    /// Typed columns, in input order followed by any table columns the
    /// input lacked.
    pub frame: Frame,
    /// Composite development index per row, in `[0, 1]`.
    pub development_index: Vec<f64>,
    /// Columns typed as numeric by inspection of their values.
    pub inferred_numeric: Vec<String>,
}

/// Applies a [`RecodingTable`] and a [`SurveySchema`] to raw survey rows.
#[derive(Clone, Debug, PartialEq)]
pub struct Recoder {
    table: RecodingTable,
    schema: SurveySchema,
}

impl Recoder {
    pub fn new(table: RecodingTable, schema: SurveySchema) -> Self {
        Self { table, schema }
    }

    pub fn table(&self) -> &RecodingTable {
        &self.table
    }

    pub fn schema(&self) -> &SurveySchema {
        &self.schema
    }

    /// Recode a whole table. Never fails: unmapped values become the
    /// sentinel code and unparsable numbers become missing.
    pub fn recode(&self, raw: &RawTable) -> RecodedTable {
        self.recode_inner(raw, true)
    }

    /// Recode one form submission laid out over `columns`.
    pub fn recode_form(
        &self,
        columns: &[String],
        form: &BTreeMap<String, String>,
    ) -> RecodedTable {
        self.recode_inner(&RawTable::from_form(columns, form), false)
    }

    fn recode_inner(&self, raw: &RawTable, report: bool) -> RecodedTable {
        let mut frame = Frame::new();
        let mut inferred_numeric = Vec::new();

        for name in raw.headers() {
            if frame.column(name).is_some() {
                warn!("Duplicate column '{}' ignored", name);
                continue;
            }
            let values = raw.column_or_missing(name);

            if self.table.contains_column(name) {
                let codes = self.table_codes(name, &values);
                if report {
                    warn_if_sentinel_heavy(name, &codes);
                }
                push(&mut frame, name, Column::Numeric(codes));
            } else if self.schema.is_benefits_column(name) {
                for (col, column) in benefit_columns(&values) {
                    push(&mut frame, &col, column);
                }
            } else if self.schema.is_month_column(name) {
                let parsed = values.iter().map(|v| parse_months(*v)).collect();
                push(&mut frame, name, Column::Numeric(parsed));
            } else if self.schema.is_numeric_column(name) {
                let parsed = values.iter().map(|v| v.and_then(parse_number)).collect();
                push(&mut frame, name, Column::Numeric(parsed));
            } else if self.schema.infer_numeric && looks_numeric(&values) {
                debug!("Column '{}' inferred as numeric", name);
                inferred_numeric.push(name.clone());
                let parsed = values.iter().map(|v| v.and_then(parse_number)).collect();
                push(&mut frame, name, Column::Numeric(parsed));
            } else {
                let text = values.iter().map(|v| v.map(str::to_string)).collect();
                push(&mut frame, name, Column::Categorical(text));
            }
        }

        // Table columns the input lacks are emitted entirely as sentinel.
        for name in self.table.columns() {
            if !raw.has_column(name) {
                if report {
                    warn!(
                        "Column '{}' missing from input; filled with code {}",
                        name, SENTINEL_CODE
                    );
                }
                let codes = vec![Some(SENTINEL_CODE as f64); raw.n_rows()];
                push(&mut frame, name, Column::Numeric(codes));
            }
        }

        let food = raw.column_or_missing(&self.schema.food_access_column);
        let cough = raw.column_or_missing(&self.schema.cough_column);
        let kitchen = raw.column_or_missing(&self.schema.kitchen_column);
        let development_index = (0..raw.n_rows())
            .map(|i| IndicatorScores::from_answers(food[i], cough[i], kitchen[i]).index())
            .collect();

        RecodedTable {
            frame,
            development_index,
            inferred_numeric,
        }
    }

    fn table_codes(&self, name: &str, values: &[Option<&str>]) -> Vec<Option<f64>> {
        values
            .iter()
            .map(|v| Some(self.table.code(name, *v) as f64))
            .collect()
    }
}

fn push(frame: &mut Frame, name: &str, column: Column) {
    if let Err(e) = frame.push_column(name, column) {
        warn!("Column '{}' dropped: {}", name, e);
    }
}

fn benefit_columns(values: &[Option<&str>]) -> Vec<(String, Column)> {
    let flags: Vec<_> = values.iter().map(|v| parse_benefits(*v)).collect();
    let mut out: Vec<(String, Column)> = BENEFIT_CODES
        .iter()
        .map(|&code| {
            let col = flags
                .iter()
                .map(|f| Some(if f.has(code) { 1.0 } else { 0.0 }))
                .collect();
            (benefit_column(code), Column::Numeric(col))
        })
        .collect();
    let totals = flags.iter().map(|f| Some(f.count() as f64)).collect();
    out.push((TOTAL_BENEFITS_COLUMN.to_string(), Column::Numeric(totals)));
    out
}

fn looks_numeric(values: &[Option<&str>]) -> bool {
    let mut present = values.iter().flatten().peekable();
    present.peek().is_some() && present.all(|v| parse_number(v).is_some())
}

fn warn_if_sentinel_heavy(name: &str, codes: &[Option<f64>]) {
    if codes.is_empty() {
        return;
    }
    let sentinel = codes
        .iter()
        .filter(|c| **c == Some(SENTINEL_CODE as f64))
        .count();
    if sentinel * 2 > codes.len() {
        warn!(
            "Column '{}': {} of {} values unmapped (code {})",
            name,
            sentinel,
            codes.len(),
            SENTINEL_CODE
        );
    }
}
