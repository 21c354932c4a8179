use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::columns;

/// Code emitted for unmapped or missing categorical values.
pub const SENTINEL_CODE: i64 = 9;

fn normalize(value: &str) -> String {
    value.trim().to_lowercase()
}

/// Declarative per-column lookup of raw answers to integer codes.
///
/// Lookups ignore surrounding whitespace and letter case. Adding a survey
/// field means adding an entry here, not a new code path.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct RecodingTable {
    columns: BTreeMap<String, BTreeMap<String, i64>>,
}

impl RecodingTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add (or replace) the mapping for one column.
    pub fn with_column(mut self, column: &str, mapping: &[(&str, i64)]) -> Self {
        self.insert_column(column, mapping);
        self
    }

    pub fn insert_column(&mut self, column: &str, mapping: &[(&str, i64)]) {
        let codes = mapping
            .iter()
            .map(|(raw, code)| (normalize(raw), *code))
            .collect();
        self.columns.insert(column.to_string(), codes);
    }

    /// Mapped column names in sorted order.
    pub fn columns(&self) -> impl Iterator<Item = &str> {
        self.columns.keys().map(String::as_str)
    }

    pub fn contains_column(&self, column: &str) -> bool {
        self.columns.contains_key(column)
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Code for a raw value of `column`; [`SENTINEL_CODE`] when the column,
    /// the value, or both are unknown.
    pub fn code(&self, column: &str, raw: Option<&str>) -> i64 {
        let (Some(mapping), Some(raw)) = (self.columns.get(column), raw) else {
            return SENTINEL_CODE;
        };
        mapping
            .get(&normalize(raw))
            .copied()
            .unwrap_or(SENTINEL_CODE)
    }

    /// Lookup tables for the household nutrition survey.
    pub fn survey_default() -> Self {
        Self::new()
            .with_column(
                columns::REGIAO,
                &[
                    ("Norte", 1),
                    ("Nordeste", 2),
                    ("Centro-Oeste", 3),
                    ("Sudeste", 4),
                    ("Sul", 5),
                ],
            )
            .with_column(
                columns::TIPO_MORADIA,
                &[
                    ("Casa", 1),
                    ("Apartamento", 2),
                    ("Cômodo", 3),
                    ("Barraco", 4),
                    ("Outro", 5),
                ],
            )
            .with_column(columns::POSSUI_COZINHA, &[("Sim", 1), ("Não", 0)])
            .with_column(
                columns::OCUPACAO,
                &[
                    ("Empregado com carteira", 1),
                    ("Empregado sem carteira", 2),
                    ("Autônomo", 3),
                    ("Desempregado", 4),
                    ("Aposentado", 5),
                    ("Do lar", 6),
                    ("Estudante", 7),
                ],
            )
            .with_column(
                columns::ESCOLARIDADE,
                &[
                    ("Sem escolaridade", 0),
                    ("Fundamental incompleto", 1),
                    ("Fundamental completo", 2),
                    ("Médio incompleto", 3),
                    ("Médio completo", 4),
                    ("Superior incompleto", 5),
                    ("Superior completo", 6),
                ],
            )
            .with_column(
                columns::RENDA_FAMILIAR,
                &[
                    ("Sem renda", 0),
                    ("Até 1 salário mínimo", 1),
                    ("De 1 a 2 salários mínimos", 2),
                    ("De 2 a 3 salários mínimos", 3),
                    ("Mais de 3 salários mínimos", 4),
                ],
            )
            .with_column(
                columns::RACA_COR,
                &[
                    ("Branca", 1),
                    ("Preta", 2),
                    ("Parda", 3),
                    ("Amarela", 4),
                    ("Indígena", 5),
                ],
            )
            .with_column(columns::PRESENCA_TOSSE, &[("Sim", 1), ("Não", 0)])
            .with_column(
                columns::TIPO_RESPIRACAO,
                &[
                    ("Normal", 1),
                    ("Rápida", 2),
                    ("Com chiado", 3),
                    ("Difícil", 4),
                ],
            )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_values_map_to_codes() {
        let table = RecodingTable::survey_default();
        assert_eq!(table.code(columns::REGIAO, Some("Nordeste")), 2);
        assert_eq!(table.code(columns::RACA_COR, Some("Indígena")), 5);
        assert_eq!(table.code(columns::ESCOLARIDADE, Some("Sem escolaridade")), 0);
    }

    #[test]
    fn test_lookup_ignores_case_and_whitespace() {
        let table = RecodingTable::survey_default();
        assert_eq!(table.code(columns::POSSUI_COZINHA, Some("  NÃO ")), 0);
        assert_eq!(table.code(columns::REGIAO, Some("centro-oeste")), 3);
    }

    #[test]
    fn test_unmapped_and_missing_become_sentinel() {
        let table = RecodingTable::survey_default();
        assert_eq!(table.code(columns::REGIAO, Some("Atlântida")), SENTINEL_CODE);
        assert_eq!(table.code(columns::REGIAO, None), SENTINEL_CODE);
        assert_eq!(table.code("coluna_inexistente", Some("Sim")), SENTINEL_CODE);
    }

    #[test]
    fn test_recoding_is_total_over_arbitrary_input() {
        let table = RecodingTable::survey_default();
        let inputs = ["", " ", "9", "😀", "Sim, sempre", "NULL", "\t\n"];
        for column in table.columns().map(str::to_string).collect::<Vec<_>>() {
            for raw in inputs {
                let code = table.code(&column, Some(raw));
                assert!(code >= 0, "{} -> {}", raw, code);
            }
        }
    }

    #[test]
    fn test_with_column_replaces_mapping() {
        let table = RecodingTable::new()
            .with_column("x", &[("a", 1)])
            .with_column("x", &[("b", 2)]);
        assert_eq!(table.code("x", Some("a")), SENTINEL_CODE);
        assert_eq!(table.code("x", Some("b")), 2);
        assert_eq!(table.len(), 1);
    }
}
