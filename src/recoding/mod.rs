//! Feature recoding of raw survey answers.
//!
//! Recoding turns free-text answers into numbers before any statistics are
//! computed:
//!
//! - a declarative [`RecodingTable`] maps `column → raw value → code`, with
//!   the sentinel code 9 for anything unmapped or missing;
//! - three indicator recoders (food access, cough, kitchen) feed the
//!   descriptive development index and never fail;
//! - `"<N> meses"` ages are stripped of their unit and parsed;
//! - the multi-valued benefits field (letters A–G) becomes one indicator
//!   column per letter plus a total.
//!
//! Recoding is total: no input value makes it fail.

pub mod benefits;
pub mod indicators;
pub mod numeric;
mod recoder;
pub mod schema;
mod table;

pub use benefits::{parse_benefits, BenefitFlags, BENEFIT_CODES, TOTAL_BENEFITS_COLUMN};
pub use indicators::{
    cough_score, development_index, food_access_score, kitchen_score, IndicatorScores,
};
pub use numeric::{parse_months, parse_number};
pub use recoder::{RecodedTable, Recoder};
pub use schema::SurveySchema;
pub use table::{RecodingTable, SENTINEL_CODE};

/// Column names of the household survey.
pub mod columns {
    pub const REGIAO: &str = "regiao";
    pub const IDADE_ANOS: &str = "idade_anos";
    pub const IDADE_MESES: &str = "idade_meses";
    pub const TIPO_MORADIA: &str = "tipo_moradia";
    pub const POSSUI_COZINHA: &str = "possui_cozinha";
    pub const OCUPACAO: &str = "ocupacao";
    pub const ESCOLARIDADE: &str = "escolaridade";
    pub const RENDA_FAMILIAR: &str = "renda_familiar";
    pub const RACA_COR: &str = "raca_cor";
    pub const PRESENCA_TOSSE: &str = "presenca_tosse";
    pub const TIPO_RESPIRACAO: &str = "tipo_respiracao";
    pub const ACESSO_ALIMENTOS: &str = "acesso_alimentos_basicos";
    pub const BENEFICIOS: &str = "beneficios";
    pub const DATA_NASCIMENTO: &str = "data_nascimento";
    pub const INDICE_DESENVOLVIMENTO: &str = "indice_desenvolvimento";
}
