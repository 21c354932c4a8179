//! Indicator recoders for the development index.
//!
//! Each recoder maps one answer to a score in `[0, 1]` where 1 is the
//! favourable outcome. They are evaluated on raw answers, independently of
//! the integer recoding used for model features.

use serde::{Deserialize, Serialize};

/// Basic-food-access frequency: "Sim, sempre" → 1.0, "Sim, quase sempre" → 0.5,
/// anything else (including missing) → 0.0.
pub fn food_access_score(raw: Option<&str>) -> f64 {
    match raw.map(str::trim) {
        Some("Sim, sempre") => 1.0,
        Some("Sim, quase sempre") => 0.5,
        _ => 0.0,
    }
}

/// Cough presence, inverted: "não" → 1.0, "sim" → 0.0, anything else → 0.0.
pub fn cough_score(raw: Option<&str>) -> f64 {
    match raw.map(|v| v.trim().to_lowercase()).as_deref() {
        Some("não") => 1.0,
        _ => 0.0,
    }
}

/// Kitchen presence: "sim" → 1.0, "não" → 0.0, anything else → 0.0.
pub fn kitchen_score(raw: Option<&str>) -> f64 {
    match raw.map(|v| v.trim().to_lowercase()).as_deref() {
        Some("sim") => 1.0,
        _ => 0.0,
    }
}

/// Unweighted mean of the three sub-scores (`indice_desenvolvimento`).
pub fn development_index(food_access: f64, cough: f64, kitchen: f64) -> f64 {
    (food_access + cough + kitchen) / 3.0
}

/// Sub-scores of one surveyed household.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct IndicatorScores {
    pub food_access: f64,
    pub cough: f64,
    pub kitchen: f64,
}

impl IndicatorScores {
    pub fn from_answers(food_access: Option<&str>, cough: Option<&str>, kitchen: Option<&str>) -> Self {
        Self {
            food_access: food_access_score(food_access),
            cough: cough_score(cough),
            kitchen: kitchen_score(kitchen),
        }
    }

    pub fn index(&self) -> f64 {
        development_index(self.food_access, self.cough, self.kitchen)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_food_access_exact_values() {
        assert_eq!(food_access_score(Some("Sim, sempre")), 1.0);
        assert_eq!(food_access_score(Some("Sim, quase sempre")), 0.5);
        assert_eq!(food_access_score(Some("Às vezes")), 0.0);
        assert_eq!(food_access_score(Some("Não")), 0.0);
        assert_eq!(food_access_score(None), 0.0);
    }

    #[test]
    fn test_food_access_ignores_surrounding_whitespace() {
        assert_eq!(food_access_score(Some("  Sim, sempre ")), 1.0);
    }

    #[test]
    fn test_cough_is_case_and_whitespace_insensitive() {
        for raw in [" Sim ", "sim", "SIM"] {
            assert_eq!(cough_score(Some(raw)), 0.0);
        }
        for raw in [" Não ", "não", "NÃO"] {
            assert_eq!(cough_score(Some(raw)), 1.0);
        }
        assert_eq!(cough_score(Some("talvez")), 0.0);
        assert_eq!(cough_score(None), 0.0);
    }

    #[test]
    fn test_kitchen_is_case_and_whitespace_insensitive() {
        for raw in [" Sim ", "sim", "SIM"] {
            assert_eq!(kitchen_score(Some(raw)), 1.0);
        }
        for raw in [" Não ", "não", "NÃO"] {
            assert_eq!(kitchen_score(Some(raw)), 0.0);
        }
        assert_eq!(kitchen_score(None), 0.0);
    }

    #[test]
    fn test_development_index_is_mean_in_unit_range() {
        let scores = IndicatorScores::from_answers(Some("Sim, quase sempre"), Some("Não"), Some("Sim"));
        assert!((scores.index() - 2.5 / 3.0).abs() < 1e-12);

        let worst = IndicatorScores::from_answers(None, Some("Sim"), Some("Não"));
        assert_eq!(worst.index(), 0.0);

        let best = IndicatorScores::from_answers(Some("Sim, sempre"), Some("não"), Some("sim"));
        assert_eq!(best.index(), 1.0);
    }
}
