//! Multi-valued social benefits field.
//!
//! Households list the benefits they receive as letter codes A–G, joined by
//! commas (`"A,C"`), other separators, or nothing at all (`"AC"`).

/// Benefit letter codes in column order.
pub const BENEFIT_CODES: [char; 7] = ['A', 'B', 'C', 'D', 'E', 'F', 'G'];

/// Name of the derived total-benefits column.
pub const TOTAL_BENEFITS_COLUMN: &str = "total_beneficios";

const SEPARATORS: [char; 5] = [',', ';', ' ', '|', '/'];

/// Indicator per benefit letter.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct BenefitFlags([bool; 7]);

impl BenefitFlags {
    pub fn has(&self, code: char) -> bool {
        BENEFIT_CODES
            .iter()
            .position(|&c| c == code.to_ascii_uppercase())
            .map(|idx| self.0[idx])
            .unwrap_or(false)
    }

    pub fn count(&self) -> usize {
        self.0.iter().filter(|&&b| b).count()
    }

    pub fn as_array(&self) -> [bool; 7] {
        self.0
    }

    fn set(&mut self, code: char) {
        if let Some(idx) = BENEFIT_CODES.iter().position(|&c| c == code) {
            self.0[idx] = true;
        }
    }
}

/// Indicator column name for one benefit letter, e.g. `beneficio_A`.
pub fn benefit_column(code: char) -> String {
    format!("beneficio_{}", code)
}

/// Parse a benefits answer. Missing input and unknown tokens yield no flags.
///
/// Single-letter tokens are accepted in either case; longer tokens count only
/// when they consist solely of upper-case codes (`"ACE"`), so words such as
/// "nenhum" are ignored.
pub fn parse_benefits(raw: Option<&str>) -> BenefitFlags {
    let mut flags = BenefitFlags::default();
    let Some(raw) = raw else {
        return flags;
    };
    for token in raw.split(SEPARATORS.as_slice()).filter(|t| !t.is_empty()) {
        let mut chars = token.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => flags.set(c.to_ascii_uppercase()),
            _ => {
                if token.chars().all(|c| BENEFIT_CODES.contains(&c)) {
                    token.chars().for_each(|c| flags.set(c));
                }
            }
        }
    }
    flags
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_comma_joined() {
        let flags = parse_benefits(Some("A,C, G"));
        assert!(flags.has('A'));
        assert!(flags.has('C'));
        assert!(flags.has('G'));
        assert!(!flags.has('B'));
        assert_eq!(flags.count(), 3);
    }

    #[test]
    fn test_char_joined() {
        let flags = parse_benefits(Some("BDF"));
        assert_eq!(flags.as_array(), [false, true, false, true, false, true, false]);
    }

    #[test]
    fn test_lowercase_single_letters() {
        assert_eq!(parse_benefits(Some("a;b")).count(), 2);
    }

    #[test]
    fn test_missing_and_unknown_tokens() {
        assert_eq!(parse_benefits(None).count(), 0);
        assert_eq!(parse_benefits(Some("nenhum")).count(), 0);
        assert_eq!(parse_benefits(Some("Z,H")).count(), 0);
    }

    #[test]
    fn test_duplicates_count_once() {
        assert_eq!(parse_benefits(Some("A,A,AA")).count(), 1);
    }
}
