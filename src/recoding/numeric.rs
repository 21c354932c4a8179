//! Lenient numeric parsing for survey answers.

/// Parse a number written with either decimal point or decimal comma.
/// Returns `None` for blank, unparsable or non-finite input.
pub fn parse_number(raw: &str) -> Option<f64> {
    let cleaned = raw.trim().replace(',', ".");
    if cleaned.is_empty() {
        return None;
    }
    cleaned.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Parse an age given as `"<N> meses"` (or `"1 mês"`, or a bare number).
/// Unparsable values become missing.
pub fn parse_months(raw: Option<&str>) -> Option<f64> {
    let lowered = raw?.trim().to_lowercase();
    let number = ["meses", "mês", "mes"]
        .iter()
        .find_map(|suffix| lowered.strip_suffix(suffix))
        .unwrap_or(&lowered);
    parse_number(number)
}
